use std::collections::HashSet;
use std::path::Path;

use serde::Deserialize;

use crate::CatalogError;

/// Key under which an item's free-text comment sits next to its grades.
pub const COMMENT_KEY: &str = "comment";

/// One surveyed product.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Item {
    /// Stable identifier, used as JSON key and in form field names.
    pub id: String,

    /// Display name.
    pub name: String,

    #[serde(default)]
    pub description: String,

    /// Image file name, relative to the assets directory.
    #[serde(default)]
    pub image: Option<String>,
}

impl Item {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: String::new(),
            image: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_image(mut self, image: impl Into<String>) -> Self {
        self.image = Some(image.into());
        self
    }
}

/// A graded aspect every item is rated on (e.g. `overall`, or `filling`).
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RatingField {
    pub key: String,

    /// Prompt shown above the radio group.
    pub ask: String,
}

impl RatingField {
    pub fn new(key: impl Into<String>, ask: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            ask: ask.into(),
        }
    }
}

/// The discrete levels a graded field can take.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RatingScale {
    levels: Vec<String>,

    /// Index of the pre-selected level. Falls back to the midpoint.
    #[serde(default)]
    default: Option<usize>,
}

impl RatingScale {
    pub fn new<I, S>(levels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            levels: levels.into_iter().map(Into::into).collect(),
            default: None,
        }
    }

    /// Pre-select the level at `index` instead of the midpoint.
    pub fn with_default(mut self, index: usize) -> Self {
        self.default = Some(index);
        self
    }

    pub fn levels(&self) -> &[String] {
        &self.levels
    }

    pub fn default_index(&self) -> usize {
        self.default.unwrap_or(self.levels.len() / 2)
    }

    /// The level used when a grade is missing or off the scale.
    pub fn default_level(&self) -> &str {
        self.levels
            .get(self.default_index())
            .map(String::as_str)
            .unwrap_or_default()
    }

    pub fn contains(&self, level: &str) -> bool {
        self.levels.iter().any(|l| l == level)
    }
}

/// Prompts and headings of the fixed parts of the form.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Labels {
    pub name: String,
    pub comment: String,
    pub ranking_heading: String,
    pub ranking_hint: String,
    pub ideas_heading: String,
    pub new_ideas: String,
    pub feedback: String,
    pub submit: String,
}

impl Default for Labels {
    fn default() -> Self {
        Self {
            name: "Name (optional)".to_string(),
            comment: "Optionales Feedback zu dieser Praline:".to_string(),
            ranking_heading: "Ranking der Pralinen".to_string(),
            ranking_hint: "Die Pralinen nach persönlicher Präferenz ordnen \
                           (von Lieblingspraline (oben) bis weniger beliebt (unten))."
                .to_string(),
            ideas_heading: "Ideen und Rückmeldungen".to_string(),
            new_ideas: "Ideen für neue Pralinensorten?".to_string(),
            feedback: "Weitere Rückmeldungen:".to_string(),
            submit: "Abschicken".to_string(),
        }
    }
}

fn default_thank_you() -> String {
    "Vielen Dank für das Ausfüllen der Umfrage!".to_string()
}

/// The configured survey: items, how they are graded, and the page texts.
///
/// Loaded once at startup and shared read-only afterwards.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Catalog {
    title: String,

    #[serde(default)]
    icon: Option<String>,

    #[serde(default)]
    intro: Option<String>,

    #[serde(default = "default_thank_you")]
    thank_you: String,

    #[serde(default)]
    thank_you_image: Option<String>,

    scale: RatingScale,

    fields: Vec<RatingField>,

    items: Vec<Item>,

    #[serde(default)]
    labels: Labels,
}

impl Catalog {
    /// Create and validate a catalog.
    pub fn new(
        title: impl Into<String>,
        scale: RatingScale,
        fields: Vec<RatingField>,
        items: Vec<Item>,
    ) -> Result<Self, CatalogError> {
        let catalog = Self {
            title: title.into(),
            icon: None,
            intro: None,
            thank_you: default_thank_you(),
            thank_you_image: None,
            scale,
            fields,
            items,
            labels: Labels::default(),
        };
        catalog.validate()?;
        Ok(catalog)
    }

    /// Parse and validate a catalog from TOML text.
    pub fn from_toml_str(text: &str) -> Result<Self, CatalogError> {
        let catalog: Self = toml::from_str(text)?;
        catalog.validate()?;
        Ok(catalog)
    }

    /// Read, parse and validate a catalog file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, CatalogError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| CatalogError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    pub fn with_intro(mut self, intro: impl Into<String>) -> Self {
        self.intro = Some(intro.into());
        self
    }

    pub fn with_icon(mut self, icon: impl Into<String>) -> Self {
        self.icon = Some(icon.into());
        self
    }

    pub fn with_thank_you(mut self, text: impl Into<String>) -> Self {
        self.thank_you = text.into();
        self
    }

    pub fn with_labels(mut self, labels: Labels) -> Self {
        self.labels = labels;
        self
    }

    fn validate(&self) -> Result<(), CatalogError> {
        if self.items.is_empty() {
            return Err(CatalogError::NoItems);
        }
        if self.fields.is_empty() {
            return Err(CatalogError::NoFields);
        }
        if self.scale.levels.is_empty() {
            return Err(CatalogError::EmptyScale);
        }
        let index = self.scale.default_index();
        if index >= self.scale.levels.len() {
            return Err(CatalogError::DefaultOutOfRange {
                index,
                len: self.scale.levels.len(),
            });
        }

        let mut seen = HashSet::new();
        for item in &self.items {
            check_identifier(&item.id)?;
            if !seen.insert(item.id.as_str()) {
                return Err(CatalogError::DuplicateItem(item.id.clone()));
            }
        }

        let mut seen = HashSet::new();
        for field in &self.fields {
            check_identifier(&field.key)?;
            if field.key == COMMENT_KEY {
                return Err(CatalogError::ReservedField(field.key.clone()));
            }
            if !seen.insert(field.key.as_str()) {
                return Err(CatalogError::DuplicateField(field.key.clone()));
            }
        }

        Ok(())
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn icon(&self) -> Option<&str> {
        self.icon.as_deref()
    }

    pub fn intro(&self) -> Option<&str> {
        self.intro.as_deref()
    }

    pub fn thank_you(&self) -> &str {
        &self.thank_you
    }

    pub fn thank_you_image(&self) -> Option<&str> {
        self.thank_you_image.as_deref()
    }

    pub fn scale(&self) -> &RatingScale {
        &self.scale
    }

    pub fn fields(&self) -> &[RatingField] {
        &self.fields
    }

    pub fn items(&self) -> &[Item] {
        &self.items
    }

    pub fn labels(&self) -> &Labels {
        &self.labels
    }

    pub fn item(&self, id: &str) -> Option<&Item> {
        self.items.iter().find(|item| item.id == id)
    }

    pub fn contains_item(&self, id: &str) -> bool {
        self.item(id).is_some()
    }

    /// Number of configured items.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

fn check_identifier(id: &str) -> Result<(), CatalogError> {
    let valid = !id.is_empty()
        && id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
    if valid {
        Ok(())
    } else {
        Err(CatalogError::InvalidId(id.to_string()))
    }
}
