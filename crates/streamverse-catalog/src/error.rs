use thiserror::Error;

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Catalog responded {status} for {endpoint}")]
    Status { status: u16, endpoint: String },

    #[error("Invalid catalog URL: {0}")]
    InvalidUrl(String),
}

pub type Result<T> = std::result::Result<T, CatalogError>;
