use chrono::{DateTime, FixedOffset};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::{Catalog, FormState, Ranking};

/// The grades and comment one submitter gave one item.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemRating {
    /// Field key to level, in catalog field order.
    #[serde(flatten)]
    pub grades: IndexMap<String, String>,

    #[serde(default)]
    pub comment: String,
}

/// The complete record of one submission.
///
/// Built fresh from the form for every attempt and never changed afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponseModel {
    pub name: String,

    /// Item id to rating, in catalog item order. Holds every catalog item.
    pub ratings: IndexMap<String, ItemRating>,

    pub ranking: Ranking,

    pub new_ideas: String,

    pub feedback: String,

    pub timestamp: DateTime<FixedOffset>,
}

impl ResponseModel {
    /// Build the canonical record from the posted form.
    ///
    /// Missing or off-scale grades fall back to the scale's default level. A
    /// ranking that is unavailable or not a permutation of the catalog's items
    /// becomes empty; neither case fails the build.
    pub fn build(catalog: &Catalog, form: &FormState, timestamp: DateTime<FixedOffset>) -> Self {
        let scale = catalog.scale();

        let ratings = catalog
            .items()
            .iter()
            .map(|item| {
                let grades = catalog
                    .fields()
                    .iter()
                    .map(|field| {
                        let level = match form.grade(&item.id, &field.key) {
                            Some(level) if scale.contains(level) => level,
                            Some(level) => {
                                warn!(item = %item.id, field = %field.key, grade = level, "Grade is not on the scale, using default");
                                scale.default_level()
                            }
                            None => scale.default_level(),
                        };
                        (field.key.clone(), level.to_string())
                    })
                    .collect();

                let rating = ItemRating {
                    grades,
                    comment: form.comment(&item.id).to_string(),
                };
                (item.id.clone(), rating)
            })
            .collect();

        let ranking = Ranking::resolve(catalog, &form.ranking).unwrap_or_else(|err| {
            warn!(%err, "Ranking degraded to empty");
            Ranking::empty()
        });

        Self {
            name: form.name.trim().to_string(),
            ratings,
            ranking,
            new_ideas: form.new_ideas.clone(),
            feedback: form.feedback.clone(),
            timestamp,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Item, RankingInput, RatingField, RatingScale};

    fn catalog() -> Catalog {
        Catalog::new(
            "t",
            RatingScale::new(["1", "2", "3", "4", "5"]),
            vec![
                RatingField::new("filling", "Füllung"),
                RatingField::new("topping", "Topping"),
                RatingField::new("overall", "Gesamt"),
            ],
            vec![Item::new("a", "A"), Item::new("b", "B")],
        )
        .unwrap()
    }

    fn timestamp() -> DateTime<FixedOffset> {
        DateTime::parse_from_rfc3339("2024-05-01T12:34:56.123+02:00").unwrap()
    }

    #[test]
    fn every_item_gets_a_rating() {
        let form = FormState::new().with_grade("a", "overall", "1");

        let model = ResponseModel::build(&catalog(), &form, timestamp());

        assert_eq!(model.ratings.len(), 2);
        assert_eq!(model.ratings["a"].grades["overall"], "1");
        assert_eq!(model.ratings["a"].grades["filling"], "3");
        assert_eq!(model.ratings["b"].grades["topping"], "3");
    }

    #[test]
    fn grades_follow_field_order() {
        let model = ResponseModel::build(&catalog(), &FormState::new(), timestamp());

        let keys: Vec<_> = model.ratings["a"].grades.keys().collect();
        assert_eq!(keys, vec!["filling", "topping", "overall"]);
    }

    #[test]
    fn off_scale_grade_uses_default() {
        let form = FormState::new().with_grade("a", "overall", "7");

        let model = ResponseModel::build(&catalog(), &form, timestamp());

        assert_eq!(model.ratings["a"].grades["overall"], "3");
    }

    #[test]
    fn ignores_items_outside_the_catalog() {
        let form = FormState::new().with_grade("ghost", "overall", "1");

        let model = ResponseModel::build(&catalog(), &form, timestamp());

        assert!(!model.ratings.contains_key("ghost"));
    }

    #[test]
    fn unavailable_ranking_degrades_to_empty() {
        let mut form = FormState::new().with_feedback("lecker");
        form.ranking = RankingInput::Unavailable;

        let model = ResponseModel::build(&catalog(), &form, timestamp());

        assert!(model.ranking.is_empty());
        assert_eq!(model.feedback, "lecker");
    }

    #[test]
    fn duplicate_ranking_degrades_to_empty() {
        let form = FormState::new().with_ranking(["a", "a"]);

        let model = ResponseModel::build(&catalog(), &form, timestamp());

        assert!(model.ranking.is_empty());
    }

    #[test]
    fn building_leaves_catalog_untouched() {
        let catalog = catalog();
        let before = catalog.clone();

        let _ = ResponseModel::build(&catalog, &FormState::initial(&catalog), timestamp());

        assert_eq!(catalog, before);
    }

    #[test]
    fn name_is_trimmed() {
        let form = FormState::new().with_name("  Anna \n");
        let model = ResponseModel::build(&catalog(), &form, timestamp());
        assert_eq!(model.name, "Anna");

        let model = ResponseModel::build(&catalog(), &FormState::new(), timestamp());
        assert_eq!(model.name, "");
    }
}
