use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::{Catalog, RankingInput};

/// Why a reported ranking was not accepted.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RankingError {
    #[error("ranking widget did not report an order")]
    Unavailable,

    #[error("ranking has {actual} entries, expected {expected}")]
    WrongLength { expected: usize, actual: usize },

    #[error("ranking lists '{0}' more than once")]
    Duplicate(String),

    #[error("ranking contains unknown item '{0}'")]
    UnknownItem(String),
}

/// The submitter's ordering of all items, most preferred first.
///
/// A non-empty ranking is always a permutation of the catalog's item ids.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Ranking(Vec<String>);

impl Ranking {
    pub fn empty() -> Self {
        Self(Vec::new())
    }

    /// All items in catalog order.
    pub fn catalog_order(catalog: &Catalog) -> Self {
        Self(catalog.items().iter().map(|item| item.id.clone()).collect())
    }

    /// Check a reported order against the catalog.
    pub fn resolve(catalog: &Catalog, input: &RankingInput) -> Result<Self, RankingError> {
        let RankingInput::Order(order) = input else {
            return Err(RankingError::Unavailable);
        };

        if order.len() != catalog.len() {
            return Err(RankingError::WrongLength {
                expected: catalog.len(),
                actual: order.len(),
            });
        }

        let mut seen = HashSet::with_capacity(order.len());
        for id in order {
            if !catalog.contains_item(id) {
                return Err(RankingError::UnknownItem(id.clone()));
            }
            if !seen.insert(id.as_str()) {
                return Err(RankingError::Duplicate(id.clone()));
            }
        }

        Ok(Self(order.clone()))
    }

    pub fn ids(&self) -> &[String] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }
}
