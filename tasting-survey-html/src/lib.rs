//! # tasting-survey-html
//!
//! The browser side of the tasting survey: renders the survey form and the
//! thank-you page from a [`Catalog`](tasting_survey_types::Catalog), and turns
//! the posted fields back into a [`FormState`](tasting_survey_types::FormState).
//!
//! ## Usage
//!
//! ```rust,ignore
//! use tasting_survey_html::{HtmlOptions, parse_form, render_form};
//! use tasting_survey_types::{Catalog, FormState};
//!
//! let catalog = Catalog::load("survey.toml")?;
//! let page = render_form(&catalog, &FormState::initial(&catalog), None, &HtmlOptions::new());
//!
//! // later, with the posted pairs
//! let form = parse_form(pairs);
//! ```

mod generator;
pub use generator::{Banner, BannerKind, HtmlOptions, escape_html, render_form, render_thank_you};

pub mod fields;

mod form_input;
pub use form_input::parse_form;
