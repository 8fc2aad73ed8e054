use thiserror::Error;

use crate::models::TabId;

/// Errors surfaced by a single browser action. None of them end the session.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BrowserError {
    #[error("Request error: {0}")]
    Fetch(String),

    #[error("Tab not found!")]
    NotFound(TabId),

    #[error("Cannot close the last tab!")]
    LastTab,

    #[error("History is empty!")]
    EmptyHistory,

    #[error("{0}")]
    InvalidInput(String),
}

pub type Result<T> = std::result::Result<T, BrowserError>;
