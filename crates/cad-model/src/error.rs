use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ModelError {
    #[error("invalid color '{0}': expected #RRGGBB")]
    InvalidColor(String),
    #[error("invalid line weight {0}: expected 1..=16 or -1 to clear")]
    InvalidLineWeight(i32),
    #[error("entity name must not be empty")]
    EmptyName,
}

pub type Result<T> = std::result::Result<T, ModelError>;
