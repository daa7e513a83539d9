//! Turning posted form pairs into a [`FormState`].

use tasting_survey_types::{COMMENT_KEY, FieldPath, FormState, RankingInput};
use tracing::debug;

use crate::fields;

/// Collect posted `(name, value)` pairs into a typed form state.
///
/// Unknown names are skipped. An empty or missing ranking value means the
/// reorder widget never reported an order.
pub fn parse_form<I, K, V>(pairs: I) -> FormState
where
    I: IntoIterator<Item = (K, V)>,
    K: AsRef<str>,
    V: Into<String>,
{
    let mut state = FormState::new();

    for (key, value) in pairs {
        let path = FieldPath::new(key.as_ref());
        let value = value.into();

        match path.as_str() {
            fields::NAME => state.name = value,
            fields::NEW_IDEAS => state.new_ideas = value,
            fields::FEEDBACK => state.feedback = value,
            fields::RANKING => state.ranking = parse_ranking(&value),
            _ => {
                if let Some(rest) = path.strip_prefix(fields::RATINGS) {
                    let segments: Vec<&str> = rest.segments().collect();
                    match segments.as_slice() {
                        [item, COMMENT_KEY] => state.set_comment(item, value),
                        [item, field] => state.set_grade(item, field, value),
                        _ => debug!(field = %path, "Ignoring malformed rating field"),
                    }
                } else {
                    debug!(field = %path, "Ignoring unknown form field");
                }
            }
        }
    }

    state
}

fn parse_ranking(value: &str) -> RankingInput {
    let order: Vec<String> = value
        .split(fields::RANKING_SEPARATOR)
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .map(str::to_string)
        .collect();

    if order.is_empty() {
        RankingInput::Unavailable
    } else {
        RankingInput::Order(order)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn parses_all_fields() {
        let state = parse_form([
            ("name", "Anna"),
            ("ratings.praline-1.overall", "2"),
            ("ratings.praline-1.comment", "sehr süß"),
            ("ratings.praline-2.overall", "4"),
            ("ranking", "praline-2,praline-1"),
            ("newIdeas", "Lakritz"),
            ("feedback", "Danke!"),
        ]);

        assert_eq!(state.name, "Anna");
        assert_eq!(state.grade("praline-1", "overall"), Some("2"));
        assert_eq!(state.comment("praline-1"), "sehr süß");
        assert_eq!(state.grade("praline-2", "overall"), Some("4"));
        assert_eq!(
            state.ranking,
            RankingInput::Order(vec!["praline-2".to_string(), "praline-1".to_string()])
        );
        assert_eq!(state.new_ideas, "Lakritz");
        assert_eq!(state.feedback, "Danke!");
    }

    #[test]
    fn empty_ranking_is_unavailable() {
        let state = parse_form([("ranking", "")]);
        assert_eq!(state.ranking, RankingInput::Unavailable);

        let state = parse_form([("name", "Anna")]);
        assert_eq!(state.ranking, RankingInput::Unavailable);
    }

    #[test]
    fn ranking_keeps_duplicates_for_the_builder_to_reject() {
        let state = parse_form([("ranking", "a, a ,b")]);
        assert_eq!(
            state.ranking,
            RankingInput::Order(vec!["a".to_string(), "a".to_string(), "b".to_string()])
        );
    }

    #[test]
    fn skips_unknown_and_malformed_fields() {
        let state = parse_form([
            ("csrf", "x"),
            ("ratings.praline-1", "3"),
            ("ratings.praline-1.overall.extra", "3"),
        ]);

        assert_eq!(state, FormState::new());
    }
}
