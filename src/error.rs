use thiserror::Error;

#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("Movie \"{title}\" violates a store constraint: {detail}")]
    ConstraintViolation { title: String, detail: String },

    #[error("Storage error: {0}")]
    Storage(#[from] rusqlite::Error),

    #[error("Catalog is empty")]
    EmptyCatalog,

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("TOML deserialization failed: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Template error: {0}")]
    Template(String),
}

impl CatalogError {
    /// Classifies a failed insert: uniqueness/NOT NULL failures become
    /// `ConstraintViolation`, everything else stays a storage fault.
    pub fn from_insert(title: &str, err: rusqlite::Error) -> Self {
        match &err {
            rusqlite::Error::SqliteFailure(code, msg)
                if code.code == rusqlite::ErrorCode::ConstraintViolation =>
            {
                CatalogError::ConstraintViolation {
                    title: title.to_string(),
                    detail: msg.clone().unwrap_or_else(|| code.to_string()),
                }
            }
            _ => CatalogError::Storage(err),
        }
    }

    pub fn is_constraint_violation(&self) -> bool {
        matches!(self, CatalogError::ConstraintViolation { .. })
    }
}

pub type Result<T> = std::result::Result<T, CatalogError>;
