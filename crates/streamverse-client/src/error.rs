use streamverse_catalog::CatalogError;
use streamverse_shared::AuthError;
use streamverse_store::StoreError;
use thiserror::Error;

/// Failures of the document store port.
#[derive(Debug, Error)]
pub enum BackendError {
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    #[error("Permission denied: {0}")]
    PermissionDenied(String),

    #[error("Backend unavailable: {0}")]
    Unavailable(String),
}

#[derive(Debug, Error)]
pub enum ClientError {
    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error(transparent)]
    Backend(#[from] BackendError),

    #[error(transparent)]
    Catalog(#[from] CatalogError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("Not signed in")]
    NotSignedIn,
}

pub type Result<T> = std::result::Result<T, ClientError>;
