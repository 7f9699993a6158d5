//! `favorites` collection.  Keys are store-assigned [`FavoriteId`]s.

use streamverse_shared::constants::COLLECTION_FAVORITES;
use streamverse_shared::{Favorite, FavoriteId, NewFavorite, TitleId, UserId};

use crate::database::Database;
use crate::documents::Query;
use crate::error::Result;

impl Database {
    // ------------------------------------------------------------------
    // Create
    // ------------------------------------------------------------------

    pub fn add_favorite(&self, favorite: NewFavorite) -> Result<Favorite> {
        let id = FavoriteId::new();
        let body = serde_json::to_value(&favorite)?;
        self.insert_document(COLLECTION_FAVORITES, id.as_str(), &body)?;
        Ok(Favorite { id, favorite })
    }

    // ------------------------------------------------------------------
    // Read
    // ------------------------------------------------------------------

    /// All favorites saved by `owner`, newest first.
    pub fn list_favorites(&self, owner: &UserId) -> Result<Vec<Favorite>> {
        self.favorites_matching(Query::new().where_eq("ownerId", owner.as_str()))
    }

    /// Favorites saved by `owner` for one catalog title (possibly several).
    pub fn find_favorites(&self, owner: &UserId, title_id: TitleId) -> Result<Vec<Favorite>> {
        self.favorites_matching(
            Query::new()
                .where_eq("ownerId", owner.as_str())
                .where_eq("titleId", title_id),
        )
    }

    fn favorites_matching(&self, query: Query) -> Result<Vec<Favorite>> {
        let docs = self.query_documents(COLLECTION_FAVORITES, &query.newest_first())?;

        let mut favorites = Vec::with_capacity(docs.len());
        for (key, body) in docs {
            match serde_json::from_value::<NewFavorite>(body) {
                Ok(favorite) => favorites.push(Favorite {
                    id: FavoriteId(key),
                    favorite,
                }),
                Err(e) => {
                    tracing::warn!(key = %key, error = %e, "skipping malformed favorite");
                }
            }
        }
        Ok(favorites)
    }

    // ------------------------------------------------------------------
    // Delete
    // ------------------------------------------------------------------

    /// Delete a favorite by its store key.  Returns `true` if it existed.
    pub fn remove_favorite(&self, id: &FavoriteId) -> Result<bool> {
        self.delete_document(COLLECTION_FAVORITES, id.as_str())
    }
}
