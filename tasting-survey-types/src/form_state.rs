use std::collections::HashMap;

use crate::Catalog;

/// What the reorder widget reported for the ranking.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum RankingInput {
    /// The widget did not report an order (script disabled, widget failed).
    #[default]
    Unavailable,

    /// Item ids, most preferred first.
    Order(Vec<String>),
}

/// Raw rating inputs for one item, as posted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RatingInput {
    /// Field key to selected level.
    pub grades: HashMap<String, String>,
    pub comment: String,
}

/// Typed snapshot of the survey form, assembled by the UI layer.
///
/// Nothing here is validated against the catalog yet; that happens when a
/// [`ResponseModel`](crate::ResponseModel) is built from it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormState {
    pub name: String,
    /// Item id to rating inputs.
    pub ratings: HashMap<String, RatingInput>,
    pub ranking: RankingInput,
    pub new_ideas: String,
    pub feedback: String,
}

impl FormState {
    pub fn new() -> Self {
        Self::default()
    }

    /// The state of a freshly rendered form: every grade at the scale's
    /// default level and the ranking in catalog order.
    pub fn initial(catalog: &Catalog) -> Self {
        let mut state = Self::new();
        let level = catalog.scale().default_level();
        for item in catalog.items() {
            for field in catalog.fields() {
                state.set_grade(&item.id, &field.key, level);
            }
        }
        state.ranking = RankingInput::Order(catalog.items().iter().map(|i| i.id.clone()).collect());
        state
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_ranking<I, S>(mut self, order: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.ranking = RankingInput::Order(order.into_iter().map(Into::into).collect());
        self
    }

    pub fn with_new_ideas(mut self, text: impl Into<String>) -> Self {
        self.new_ideas = text.into();
        self
    }

    pub fn with_feedback(mut self, text: impl Into<String>) -> Self {
        self.feedback = text.into();
        self
    }

    pub fn with_grade(mut self, item: &str, field: &str, level: impl Into<String>) -> Self {
        self.set_grade(item, field, level);
        self
    }

    pub fn set_grade(&mut self, item: &str, field: &str, level: impl Into<String>) {
        self.ratings
            .entry(item.to_string())
            .or_default()
            .grades
            .insert(field.to_string(), level.into());
    }

    pub fn set_comment(&mut self, item: &str, comment: impl Into<String>) {
        self.ratings.entry(item.to_string()).or_default().comment = comment.into();
    }

    /// The posted level for one graded field, if any.
    pub fn grade(&self, item: &str, field: &str) -> Option<&str> {
        self.ratings
            .get(item)
            .and_then(|rating| rating.grades.get(field))
            .map(String::as_str)
    }

    pub fn comment(&self, item: &str) -> &str {
        self.ratings
            .get(item)
            .map(|rating| rating.comment.as_str())
            .unwrap_or_default()
    }
}
