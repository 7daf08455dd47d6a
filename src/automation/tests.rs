//! Tests for locating and clicking against scripted screens

use crate::automation::{
    AutomationEvent, ClickSpec, LocateAndClick, LocateOutcome, RetryPolicy, RetryingLocator,
};
use crate::error::FaultKind;
use crate::test_support::{
    RecordingPointer, RecordingSink, RecordingSleeper, ScriptedScreen, noise_screen, save_crop,
    save_noise,
};
use crate::template_matching::Point;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

fn locator(
    screen: ScriptedScreen,
) -> (
    RetryingLocator<ScriptedScreen>,
    Arc<RecordingSleeper>,
    Arc<RecordingSink>,
) {
    let sleeper = Arc::new(RecordingSleeper::default());
    let sink = Arc::new(RecordingSink::default());
    let locator = RetryingLocator::with_hooks(screen, sleeper.clone(), sink.clone());
    (locator, sleeper, sink)
}

fn no_wait(max_attempts: u32) -> RetryPolicy {
    RetryPolicy::new(max_attempts, 0.0, 0.7).unwrap()
}

// ============================================================
// RETRYING LOCATOR
// ============================================================

#[test]
fn test_locate_exhausts_all_attempts() {
    let dir = tempfile::tempdir().unwrap();
    let template = save_noise(dir.path(), "Never.png", 42);
    let (locator, _sleeper, sink) = locator(ScriptedScreen::repeating(noise_screen(120, 90, 1)));

    let outcome = locator.locate(&template, &no_wait(3));

    assert!(matches!(outcome, LocateOutcome::Exhausted { attempts: 3, .. }));
    assert_eq!(outcome.point(), None);
    assert_eq!(locator.capturer().captures(), 3, "one capture per attempt");

    let misses = sink
        .events()
        .iter()
        .filter(|e| matches!(e, AutomationEvent::MatchMissed { .. }))
        .count();
    assert_eq!(misses, 3);
    assert!(matches!(
        sink.events().last(),
        Some(AutomationEvent::RetriesExhausted { attempts: 3, .. })
    ));
}

#[test]
fn test_locate_stops_at_first_match() {
    let dir = tempfile::tempdir().unwrap();
    let target = noise_screen(120, 90, 8);
    let template = save_crop(dir.path(), "Start.png", &target, 70, 30, 30, 20);
    let screen = ScriptedScreen::new(vec![
        Some(noise_screen(120, 90, 9)),
        Some(target),
        Some(noise_screen(120, 90, 10)),
    ]);
    let (locator, sleeper, _sink) = locator(screen);

    let policy = RetryPolicy::new(3, 0.5, 0.7).unwrap();
    let outcome = locator.locate(&template, &policy);

    match outcome {
        LocateOutcome::Found { result, attempt } => {
            assert_eq!(attempt, 2);
            assert_eq!(result.center(), Point::new(85, 40));
        }
        other => panic!("expected a match, got {other:?}"),
    }
    assert_eq!(locator.capturer().captures(), 2, "no third attempt");
    assert_eq!(sleeper.sleeps(), vec![Duration::from_millis(500)]);
}

#[test]
fn test_exhausted_reports_best_score_seen() {
    let dir = tempfile::tempdir().unwrap();
    let target = noise_screen(120, 90, 12);
    let template = save_crop(dir.path(), "Lv1.png", &target, 40, 20, 24, 16);
    let (locator, _sleeper, _sink) = locator(ScriptedScreen::new(vec![
        Some(noise_screen(120, 90, 13)),
        Some(target),
    ]));

    // Above the score range, so even the exact crop on frame 2 misses
    let policy = RetryPolicy {
        threshold: 1.0 + f32::EPSILON,
        ..no_wait(2)
    };
    let outcome = locator.locate(&template, &policy);

    match outcome {
        LocateOutcome::Exhausted {
            attempts: 2,
            best: Some(best),
        } => {
            assert_eq!(best.center(), Point::new(52, 28));
            assert!(best.confidence >= 0.99);
        }
        other => panic!("expected exhausted with a best score, got {other:?}"),
    }
    assert_eq!(outcome.point(), None);
}

#[test]
fn test_locate_no_sleep_after_last_attempt() {
    let dir = tempfile::tempdir().unwrap();
    let template = save_noise(dir.path(), "Never.png", 5);
    let (locator, sleeper, _sink) = locator(ScriptedScreen::repeating(noise_screen(60, 60, 2)));

    let policy = RetryPolicy::new(4, 1.0, 0.7).unwrap();
    locator.locate(&template, &policy);

    assert_eq!(sleeper.sleeps(), vec![Duration::from_secs(1); 3]);
}

#[test]
fn test_capture_failure_aborts_without_retry() {
    let dir = tempfile::tempdir().unwrap();
    let template = save_noise(dir.path(), "Any.png", 5);
    let screen = ScriptedScreen::new(vec![None, Some(noise_screen(60, 60, 2))]);
    let (locator, sleeper, sink) = locator(screen);

    let outcome = locator.locate(&template, &no_wait(3));

    assert!(matches!(outcome, LocateOutcome::Aborted(_)));
    assert_eq!(outcome.point(), None);
    assert_eq!(locator.capturer().captures(), 1);
    assert!(sleeper.sleeps().is_empty());
    assert!(matches!(
        sink.events().as_slice(),
        [AutomationEvent::LocateAborted {
            kind: FaultKind::Capture,
            ..
        }]
    ));
}

#[test]
fn test_missing_template_aborts() {
    let (locator, _sleeper, sink) = locator(ScriptedScreen::repeating(noise_screen(60, 60, 2)));

    let outcome = locator.locate(Path::new("template_path/Missing.png"), &no_wait(3));

    assert!(matches!(outcome, LocateOutcome::Aborted(_)));
    assert_eq!(locator.capturer().captures(), 1);
    assert!(sink.events().iter().any(|e| matches!(
        e,
        AutomationEvent::LocateAborted {
            kind: FaultKind::TemplateLoad,
            ..
        }
    )));
}

#[test]
fn test_oversized_template_is_a_miss_not_an_abort() {
    let dir = tempfile::tempdir().unwrap();
    let template = save_noise(dir.path(), "Wide.png", 3);
    // 24x16 template on a 20x20 screen
    let (locator, _sleeper, _sink) = locator(ScriptedScreen::repeating(noise_screen(20, 20, 2)));

    let outcome = locator.locate(&template, &no_wait(2));

    assert!(matches!(outcome, LocateOutcome::Exhausted { attempts: 2, best: None }));
    assert_eq!(locator.capturer().captures(), 2);
}

// ============================================================
// LOCATE AND CLICK
// ============================================================

fn clicker(
    screen: ScriptedScreen,
) -> (
    LocateAndClick<ScriptedScreen, RecordingPointer>,
    Arc<RecordingSleeper>,
) {
    let sleeper = Arc::new(RecordingSleeper::default());
    let action = LocateAndClick::with_hooks(
        screen,
        RecordingPointer::default(),
        sleeper.clone(),
        Arc::new(RecordingSink::default()),
    );
    (action, sleeper)
}

#[test]
fn test_perform_absent_never_clicks() {
    let dir = tempfile::tempdir().unwrap();
    let template = save_noise(dir.path(), "Shop.png", 77);
    let (mut action, sleeper) = clicker(ScriptedScreen::repeating(noise_screen(100, 80, 3)));

    let clicked = action.perform(
        &template,
        &no_wait(3),
        &ClickSpec::default(),
        Duration::from_secs(1),
    );

    assert!(!clicked);
    assert!(action.actuator().device().calls.is_empty());
    assert_eq!(action.locator().capturer().captures(), 3);
    assert!(
        !sleeper.sleeps().contains(&Duration::from_secs(1)),
        "no settle delay without a click"
    );
}

#[test]
fn test_perform_found_clicks_once_and_settles() {
    let dir = tempfile::tempdir().unwrap();
    let screen = noise_screen(100, 80, 4);
    let template = save_crop(dir.path(), "Home.png", &screen, 10, 50, 20, 20);
    let (mut action, sleeper) = clicker(ScriptedScreen::repeating(screen));

    let spec = ClickSpec {
        clicks: 2,
        move_duration_secs: 0.0,
        click_interval_secs: 0.2,
    };
    let clicked = action.perform(&template, &no_wait(3), &spec, Duration::from_millis(1500));

    assert!(clicked);
    let device = action.actuator().device();
    assert_eq!(device.moves(), vec![Point::new(20, 60)]);
    assert_eq!(device.clicks(), 2);
    assert_eq!(
        sleeper.sleeps(),
        vec![Duration::from_millis(200), Duration::from_millis(1500)]
    );
}

#[test]
fn test_perform_survives_click_failure() {
    let dir = tempfile::tempdir().unwrap();
    let screen = noise_screen(100, 80, 4);
    let template = save_crop(dir.path(), "Close.png", &screen, 40, 10, 20, 20);
    let sink = Arc::new(RecordingSink::default());
    let device = RecordingPointer {
        fail_clicks: true,
        ..Default::default()
    };
    let mut action = LocateAndClick::with_hooks(
        ScriptedScreen::repeating(screen),
        device,
        Arc::new(RecordingSleeper::default()),
        sink.clone(),
    );

    let policy = no_wait(1);
    let clicked = action.perform(&template, &policy, &ClickSpec::default(), Duration::ZERO);

    // Located counts as performed even though the click itself failed
    assert!(clicked);
    assert!(
        sink.events()
            .iter()
            .any(|e| matches!(e, AutomationEvent::ClickFailed { .. }))
    );
}
