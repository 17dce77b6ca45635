use crate::{catalog::CatalogError, ranking::SearchError};

#[derive(thiserror::Error, Debug)]
pub enum AppError {
    #[error("not found")]
    NotFound,

    #[error("{0}")]
    Validation(#[from] SearchError),

    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("catalog error: {0}")]
    Catalog(#[from] CatalogError),

    #[error("unexpected error: {0:?}")]
    Other(#[from] anyhow::Error),
}
