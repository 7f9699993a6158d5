//! Saved titles of the signed-in user.

use chrono::Utc;
use futures::future::join_all;
use streamverse_shared::{Favorite, FavoriteId, NewFavorite, TitleId};
use tracing::{debug, info};

use super::require_uid;
use crate::error::Result;
use crate::state::App;

pub async fn list(app: &App) -> Result<Vec<Favorite>> {
    let uid = require_uid(app)?;
    Ok(app.backend().list_favorites(&uid).await?)
}

pub async fn add(
    app: &App,
    title_id: TitleId,
    title: &str,
    poster_path: Option<&str>,
) -> Result<Favorite> {
    let uid = require_uid(app)?;
    let favorite = app
        .backend()
        .add_favorite(NewFavorite {
            title_id,
            title: title.to_string(),
            poster_path: poster_path.map(str::to_string),
            owner_id: uid,
            created_at: Utc::now(),
        })
        .await?;
    info!(title_id, favorite = %favorite.id, "favorite added");
    Ok(favorite)
}

/// Remove by key.  Removing a favorite that is already gone succeeds.
pub async fn remove(app: &App, id: &FavoriteId) -> Result<()> {
    require_uid(app)?;
    if !app.backend().remove_favorite(id).await? {
        debug!(favorite = %id, "favorite already removed");
    }
    Ok(())
}

pub async fn is_favorite(app: &App, title_id: TitleId) -> Result<bool> {
    let uid = require_uid(app)?;
    Ok(!app.backend().find_favorites(&uid, title_id).await?.is_empty())
}

/// Flip the saved state of a title and return the new state.  Un-saving
/// removes every duplicate entry for the title.
pub async fn toggle(
    app: &App,
    title_id: TitleId,
    title: &str,
    poster_path: Option<&str>,
) -> Result<bool> {
    let uid = require_uid(app)?;
    let existing = app.backend().find_favorites(&uid, title_id).await?;

    if existing.is_empty() {
        add(app, title_id, title, poster_path).await?;
        return Ok(true);
    }

    let removals = join_all(existing.iter().map(|f| app.backend().remove_favorite(&f.id))).await;
    for removal in removals {
        removal?;
    }
    info!(title_id, removed = existing.len(), "favorite removed");
    Ok(false)
}
