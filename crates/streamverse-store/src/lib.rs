//! # streamverse-store
//!
//! Local document store backing the StreamVerse client, built on SQLite.
//!
//! Documents are JSON bodies addressed by `(collection, key)`.  The crate
//! exposes a synchronous [`Database`] handle with typed helpers for every
//! collection the client uses, and a cloneable [`Store`] that serialises
//! access to it and delivers live snapshots of individual documents to
//! subscribers whenever they change.

pub mod accounts;
pub mod database;
pub mod documents;
pub mod entitlements;
pub mod favorites;
pub mod live;
pub mod migrations;
pub mod models;
pub mod payments;
pub mod profiles;
pub mod settings;
pub mod store;

mod error;

pub use database::Database;
pub use documents::{DocKey, Query};
pub use error::{Result, StoreError};
pub use live::LiveDocument;
pub use models::*;
pub use store::Store;
