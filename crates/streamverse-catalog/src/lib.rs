//! # streamverse-catalog
//!
//! Read-only client for the third-party movie catalog (TMDB v3).  Every
//! listing endpoint is paged; only the first page is ever requested.

pub mod client;
pub mod details;
pub mod error;
pub mod images;
pub mod models;

pub use client::{CatalogClient, CatalogConfig};
pub use details::TitlePage;
pub use error::CatalogError;
pub use models::{CastMember, Genre, MovieDetails, MovieSummary, Video};
