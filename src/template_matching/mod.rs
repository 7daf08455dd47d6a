/// Template matching for locating UI elements in screenshots
///
/// Matching works on intensity images with zero-mean normalized
/// cross-correlation, so scores are comparable across templates and a
/// flat or unrelated region scores near zero.
pub mod matcher;
pub mod types;

pub use matcher::{TemplateMatcher, best_match};
pub use types::{MatchResult, Point, Template};
