//! # streamverse-client
//!
//! Headless application shell of the StreamVerse streaming catalog.
//!
//! - [`identity`] and [`backend`] are the ports to the identity provider and
//!   the document store, with local implementations.
//! - [`sync`] keeps one shared view of the signed-in user and their
//!   entitlement.
//! - [`router`] gates routes on the session and loads page models.
//! - [`commands`] holds the page actions (auth, browsing, favorites,
//!   checkout, billing).

pub mod backend;
pub mod commands;
pub mod config;
pub mod error;
pub mod events;
pub mod hero;
pub mod identity;
pub mod router;
pub mod state;
pub mod sync;

pub use backend::DocumentBackend;
pub use config::ClientConfig;
pub use error::{BackendError, ClientError};
pub use events::{Notice, NoticeLevel};
pub use identity::{IdentityProvider, LocalIdentityProvider};
pub use router::{Navigation, Route, Screen};
pub use state::App;
pub use sync::{Phase, SessionSync, ShellView};

use tracing_subscriber::EnvFilter;

const DEFAULT_LOG_FILTER: &str =
    "streamverse_client=debug,streamverse_store=info,streamverse_catalog=info,warn";

/// Install the global tracing subscriber (respects `RUST_LOG`).  Calling it
/// again is harmless.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER)),
        )
        .with_writer(std::io::stderr)
        .try_init();
}
