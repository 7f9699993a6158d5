//! Page command handlers.
//!
//! Each sub-module groups the commands of one page.  Commands take the
//! [`App`](crate::state::App) shell and report blocking outcomes as
//! [`Notice`](crate::events::Notice)s.

pub mod auth;
pub mod billing;
pub mod catalog;
pub mod favorites;
pub mod subscription;

use streamverse_shared::UserId;

use crate::error::{ClientError, Result};
use crate::state::App;

/// The signed-in user, or [`ClientError::NotSignedIn`].
pub(crate) fn require_uid(app: &App) -> Result<UserId> {
    app.session()
        .map(|s| s.uid)
        .ok_or(ClientError::NotSignedIn)
}
