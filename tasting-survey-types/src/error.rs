use std::path::PathBuf;

/// Error type for loading and validating a survey catalog.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    /// The catalog file could not be read.
    #[error("Failed to read catalog {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The catalog file is not valid TOML or misses required keys.
    #[error("Invalid catalog: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Catalog has no items")]
    NoItems,

    #[error("Catalog has no rating fields")]
    NoFields,

    #[error("Rating scale has no levels")]
    EmptyScale,

    #[error("Default level {index} is outside the scale of {len} levels")]
    DefaultOutOfRange { index: usize, len: usize },

    /// Identifiers end up in form field names and JSON keys.
    #[error("Invalid identifier '{0}': use ASCII letters, digits, '-' or '_'")]
    InvalidId(String),

    #[error("Duplicate item id '{0}'")]
    DuplicateItem(String),

    #[error("Duplicate rating field '{0}'")]
    DuplicateField(String),

    /// The per-item comment is stored next to the grades under this key.
    #[error("Rating field key '{0}' is reserved")]
    ReservedField(String),
}
