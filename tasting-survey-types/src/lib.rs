//! Core types for the tasting survey.
//!
//! This crate provides the data the submission pipeline works on:
//! - `Catalog` - the configured items, rating scale, graded fields and texts
//! - `FormState` - the typed snapshot of a posted form
//! - `ResponseModel` and `Ranking` - the canonical record of one submission
//! - `json` - the JSON document that record is delivered as

mod field_path;
pub use field_path::FieldPath;

mod catalog;
pub use catalog::{COMMENT_KEY, Catalog, Item, Labels, RatingField, RatingScale};

mod form_state;
pub use form_state::{FormState, RankingInput, RatingInput};

mod ranking;
pub use ranking::{Ranking, RankingError};

mod response;
pub use response::{ItemRating, ResponseModel};

pub mod json;

mod error;
pub use error::CatalogError;
