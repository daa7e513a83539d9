//! Names of the posted form fields.
//!
//! The renderer and the parser both go through these, so a page always posts
//! back what the parser expects.

use tasting_survey_types::{COMMENT_KEY, FieldPath};

pub const NAME: &str = "name";
pub const RATINGS: &str = "ratings";
pub const RANKING: &str = "ranking";
pub const NEW_IDEAS: &str = "newIdeas";
pub const FEEDBACK: &str = "feedback";

/// Separator between item ids in the hidden ranking input.
pub const RANKING_SEPARATOR: char = ',';

/// `ratings.<item>.<field>`
pub fn grade_path(item: &str, field: &str) -> FieldPath {
    FieldPath::new(RATINGS).child(item).child(field)
}

/// `ratings.<item>.comment`
pub fn comment_path(item: &str) -> FieldPath {
    FieldPath::new(RATINGS).child(item).child(COMMENT_KEY)
}
