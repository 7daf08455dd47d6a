/// Template matching implementation
///
/// Zero-mean normalized cross-correlation over every placement where the
/// template fits entirely inside the screen. Window means and variances come
/// from imageproc integral images; every term is accumulated in integers so
/// nearly flat windows cannot pick up rounding noise.
use super::types::{MatchResult, Point, Template};
use crate::automation::events::{AutomationEvent, EventSink, LogSink};
use crate::error::{AutomationError, AutomationResult};
use crate::screen::PixelBuffer;
use image::{GrayImage, ImageBuffer, Luma};
use imageproc::integral_image::{integral_image, integral_squared_image};
use std::path::Path;
use std::sync::Arc;

type IntegralImage = ImageBuffer<Luma<u64>, Vec<u64>>;

/// Stateless matcher; the sink only receives score and fault reports
pub struct TemplateMatcher {
    sink: Arc<dyn EventSink>,
}

impl TemplateMatcher {
    pub fn new() -> Self {
        Self::with_sink(Arc::new(LogSink))
    }

    pub fn with_sink(sink: Arc<dyn EventSink>) -> Self {
        Self { sink }
    }

    /// Load the template at `template_path` and look for it on `screen`.
    ///
    /// # Returns
    /// * `Err(TemplateLoad)` if the template cannot be read
    /// * `Ok(None)` if the best score is below `threshold` or matching faulted
    /// * `Ok(Some(result))` otherwise
    pub fn find(
        &self,
        screen: &PixelBuffer,
        template_path: &Path,
        threshold: f32,
    ) -> AutomationResult<Option<MatchResult>> {
        Ok(self
            .score(screen, template_path, threshold)?
            .filter(|best| best.confidence >= threshold))
    }

    /// Like `find`, but hands back the best placement whatever its score.
    /// `threshold` is only used for reporting.
    pub fn score(
        &self,
        screen: &PixelBuffer,
        template_path: &Path,
        threshold: f32,
    ) -> AutomationResult<Option<MatchResult>> {
        let template = Template::load(template_path)?;
        Ok(self.score_template(screen, &template, threshold))
    }

    /// Match an already loaded template. Faults are reported and read as "not found".
    pub fn find_template(
        &self,
        screen: &PixelBuffer,
        template: &Template,
        threshold: f32,
    ) -> Option<MatchResult> {
        self.score_template(screen, template, threshold)
            .filter(|best| best.confidence >= threshold)
    }

    fn score_template(
        &self,
        screen: &PixelBuffer,
        template: &Template,
        threshold: f32,
    ) -> Option<MatchResult> {
        let best = match best_match(&screen.to_luma(), &template.gray) {
            Ok(best) => best,
            Err(e) => {
                self.sink.emit(AutomationEvent::MatchFaulted {
                    template: template.path.clone(),
                    description: e.to_string(),
                });
                return None;
            }
        };

        self.sink.emit(AutomationEvent::MatchScored {
            template: template.path.clone(),
            confidence: best.confidence,
            threshold,
        });
        Some(best)
    }
}

impl Default for TemplateMatcher {
    fn default() -> Self {
        Self::new()
    }
}

/// Find the highest scoring placement of `template` on `screen`.
///
/// Scores follow the TM_CCOEFF_NORMED definition: the Pearson correlation
/// between template and window intensities. Windows without any intensity
/// variation score 0. Ties keep the first placement in row-major order.
pub fn best_match(screen: &GrayImage, template: &GrayImage) -> AutomationResult<MatchResult> {
    let (screen_width, screen_height) = screen.dimensions();
    let (template_width, template_height) = template.dimensions();

    if template_width == 0 || template_height == 0 {
        return Err(fault("template is empty".to_string()));
    }
    if template_width > screen_width || template_height > screen_height {
        return Err(fault(format!(
            "template {template_width}x{template_height} does not fit in screen {screen_width}x{screen_height}"
        )));
    }

    let n = u64::from(template_width) * u64::from(template_height);
    let (t_sum, t_sq_sum) = template.pixels().fold((0u64, 0u64), |(sum, sq), p| {
        let v = u64::from(p[0]);
        (sum + v, sq + v * v)
    });
    // n * variance, exact in integers
    let t_var = i128::from(n) * i128::from(t_sq_sum) - i128::from(t_sum) * i128::from(t_sum);
    if t_var <= 0 {
        return Err(fault("template has no contrast".to_string()));
    }

    let sums = integral_image::<_, u64>(screen);
    let squares = integral_squared_image::<_, u64>(screen);

    let mut best: Option<(u32, u32, f64)> = None;
    for y in 0..=(screen_height - template_height) {
        for x in 0..=(screen_width - template_width) {
            let w_sum = window_sum(&sums, x, y, template_width, template_height);
            let w_sq_sum = window_sum(&squares, x, y, template_width, template_height);
            let w_var = i128::from(n) * i128::from(w_sq_sum) - i128::from(w_sum) * i128::from(w_sum);

            let score = if w_var <= 0 {
                0.0
            } else {
                let cross = cross_correlation(screen, template, x, y);
                let numerator = i128::from(n) * i128::from(cross) - i128::from(t_sum) * i128::from(w_sum);
                (numerator as f64 / ((t_var as f64) * (w_var as f64)).sqrt()).clamp(-1.0, 1.0)
            };

            if best.is_none_or(|(_, _, top)| score > top) {
                best = Some((x, y, score));
            }
        }
    }
    let (best_x, best_y, best_score) = best.unwrap_or((0, 0, 0.0));

    let result = MatchResult {
        top_left: Point::new(best_x, best_y),
        width: template_width,
        height: template_height,
        confidence: best_score as f32,
    };

    if !result.is_within_bounds(screen_width, screen_height) {
        return Err(fault(format!(
            "match center ({},{}) outside screen",
            result.center().x,
            result.center().y
        )));
    }
    Ok(result)
}

/// Sum of the `width` x `height` window at (x, y), read from an integral
/// image whose first row and column are zero.
fn window_sum(integral: &IntegralImage, x: u32, y: u32, width: u32, height: u32) -> u64 {
    let at = |px: u32, py: u32| integral.get_pixel(px, py)[0];
    (at(x + width, y + height) + at(x, y)) - (at(x + width, y) + at(x, y + height))
}

/// Exact sum of template x screen products for the window at (x, y).
fn cross_correlation(screen: &GrayImage, template: &GrayImage, x: u32, y: u32) -> u64 {
    let screen_width = screen.width() as usize;
    let template_width = template.width() as usize;
    let screen_raw = screen.as_raw();

    template
        .as_raw()
        .chunks_exact(template_width)
        .enumerate()
        .map(|(row, template_row)| {
            let start = (y as usize + row) * screen_width + x as usize;
            template_row
                .iter()
                .zip(&screen_raw[start..start + template_width])
                .map(|(&t, &w)| u64::from(t) * u64::from(w))
                .sum::<u64>()
        })
        .sum()
}

fn fault(description: String) -> AutomationError {
    AutomationError::MatchFault { description }
}
