mod args;

use args::{Args, Command};
use clap::Parser;
use desktop_autoclick::automation::{
    ActionConfig, LocateAndClick, LocateOutcome, RetryPolicy, RetryingLocator,
};
use desktop_autoclick::pointer::{DryRunPointer, EnigoPointer, PointerDevice};
use desktop_autoclick::screen::{ImageFileScreen, ScreenCapturer, XcapScreen};
use desktop_autoclick::workflow::{RunReport, Workflow, WorkflowRunner};
use env_logger::Env;
use image::ImageFormat;
use std::io::Cursor;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

const EXIT_INTERRUPTED: i32 = 130;

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();

    let default_filter = if args.debug { "debug" } else { "info" };
    env_logger::Builder::from_env(Env::default().default_filter_or(default_filter))
        .format_timestamp_millis()
        .init();
    log::debug!(
        "desktop-autoclick v{} (built {})",
        env!("AUTOCLICK_VERSION"),
        env!("AUTOCLICK_BUILD_YEAR")
    );

    let work = async move {
        match args.command {
            Command::Run {
                workflow,
                templates,
                dry_run,
            } => run_workflow(&workflow, templates, dry_run).await,
            Command::Locate {
                template,
                threshold,
                attempts,
                interval,
                screen,
                click,
            } => {
                let policy = match RetryPolicy::new(attempts, interval, threshold) {
                    Ok(policy) => policy,
                    Err(e) => {
                        log::error!("❌ {}", e);
                        return ExitCode::FAILURE;
                    }
                };
                locate(template, policy, screen, click).await
            }
            Command::Screenshot { output } => screenshot(&output).await,
        }
    };

    tokio::select! {
        code = work => code,
        _ = tokio::signal::ctrl_c() => {
            // The blocking worker cannot be cancelled, leave without waiting for it
            log::warn!("🛑 Interrupted, stopping");
            std::process::exit(EXIT_INTERRUPTED);
        }
    }
}

async fn run_workflow(path: &Path, templates: Option<PathBuf>, dry_run: bool) -> ExitCode {
    let mut workflow = match Workflow::load(path) {
        Ok(workflow) => workflow,
        Err(e) => {
            log::error!("❌ {}", e);
            return ExitCode::FAILURE;
        }
    };
    if let Some(dir) = templates {
        workflow.template_dir = Some(dir);
    }
    log::info!(
        "🚀 Running workflow '{}' ({} click steps{})",
        workflow.name,
        workflow.click_count(),
        if dry_run { ", dry run" } else { "" }
    );

    // Input handles are not Send on every platform, so build them on the worker thread
    let task = tokio::task::spawn_blocking(move || -> Result<RunReport, String> {
        let device: Box<dyn PointerDevice> = if dry_run {
            Box::new(DryRunPointer::default())
        } else {
            Box::new(EnigoPointer::new().map_err(|e| e.to_string())?)
        };
        let mut runner = WorkflowRunner::new(XcapScreen::new(), device);
        Ok(runner.run(&workflow))
    });

    match task.await {
        Ok(Ok(report)) => {
            log::info!(
                "✅ Done: {} performed, {} missed{}",
                report.performed,
                report.missed,
                if report.aborted { ", aborted" } else { "" }
            );
            ExitCode::SUCCESS
        }
        Ok(Err(e)) => {
            log::error!("❌ Pointer unavailable: {}", e);
            ExitCode::FAILURE
        }
        Err(e) => {
            log::error!("❌ Workflow thread failed: {}", e);
            ExitCode::FAILURE
        }
    }
}

async fn locate(
    template: PathBuf,
    policy: RetryPolicy,
    screen: Option<PathBuf>,
    click: bool,
) -> ExitCode {
    let task = tokio::task::spawn_blocking(move || -> Result<bool, String> {
        if click {
            let device = EnigoPointer::new().map_err(|e| e.to_string())?;
            let mut action = LocateAndClick::new(XcapScreen::new(), device);
            return Ok(action.perform_with(&template, &ActionConfig::new(policy)));
        }

        let capturer: Box<dyn ScreenCapturer> = match screen {
            Some(path) => Box::new(ImageFileScreen::new(path)),
            None => Box::new(XcapScreen::new()),
        };
        let outcome = RetryingLocator::new(capturer).locate(&template, &policy);
        match outcome {
            LocateOutcome::Found { result, attempt } => {
                let center = result.center();
                println!(
                    "{} at ({}, {}) confidence {:.3} (attempt {})",
                    template.display(),
                    center.x,
                    center.y,
                    result.confidence,
                    attempt
                );
                Ok(true)
            }
            LocateOutcome::Exhausted {
                best: Some(best), ..
            } => {
                let center = best.center();
                println!(
                    "{} not found: best ({}, {}) confidence {:.3} below threshold {:.2}",
                    template.display(),
                    center.x,
                    center.y,
                    best.confidence,
                    policy.threshold
                );
                Ok(false)
            }
            LocateOutcome::Exhausted { best: None, .. } | LocateOutcome::Aborted(_) => {
                println!("{} not found", template.display());
                Ok(false)
            }
        }
    });

    match task.await {
        Ok(Ok(true)) => ExitCode::SUCCESS,
        Ok(Ok(false)) => ExitCode::FAILURE,
        Ok(Err(e)) => {
            log::error!("❌ Pointer unavailable: {}", e);
            ExitCode::FAILURE
        }
        Err(e) => {
            log::error!("❌ Locate thread failed: {}", e);
            ExitCode::FAILURE
        }
    }
}

async fn screenshot(output: &Path) -> ExitCode {
    let captured = tokio::task::spawn_blocking(|| XcapScreen::new().capture()).await;
    let buffer = match captured {
        Ok(Ok(buffer)) => buffer,
        Ok(Err(e)) => {
            log::error!("❌ Screenshot failed: {}", e);
            return ExitCode::FAILURE;
        }
        Err(e) => {
            log::error!("❌ Screenshot thread failed: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let mut png = Vec::new();
    if let Err(e) = buffer
        .as_image()
        .write_to(&mut Cursor::new(&mut png), ImageFormat::Png)
    {
        log::error!("❌ PNG encoding failed: {}", e);
        return ExitCode::FAILURE;
    }
    if let Err(e) = tokio::fs::write(output, &png).await {
        log::error!("❌ Write failed: {}", e);
        return ExitCode::FAILURE;
    }

    let (width, height) = buffer.dimensions();
    println!("✅ Screenshot {}x{} saved to {}", width, height, output.display());
    ExitCode::SUCCESS
}
