//! Browsing: the home feed, search and the title detail page.

use rand::seq::SliceRandom;
use streamverse_catalog::{CatalogClient, CatalogError, MovieSummary, TitlePage};
use streamverse_shared::constants::ACTION_GENRE_ID;
use streamverse_shared::TitleId;
use tracing::warn;

use crate::state::App;

#[derive(Debug, Clone, Default)]
pub struct HomeFeed {
    /// Picked at random from the popular listing.
    pub featured: Option<MovieSummary>,
    pub popular: Vec<MovieSummary>,
    pub trending: Vec<MovieSummary>,
    pub top_rated: Vec<MovieSummary>,
    pub action: Vec<MovieSummary>,
}

#[derive(Debug, Clone, Default)]
pub struct SearchResults {
    pub query: String,
    pub results: Vec<MovieSummary>,
}

#[derive(Debug, Clone)]
pub struct MovieScreen {
    pub id: TitleId,
    /// `None` while the catalog is unreachable.
    pub page: Option<TitlePage>,
    pub is_favorite: bool,
}

/// Fetch the four landing listings concurrently.  A failed listing is
/// logged and shown empty.
pub async fn home_feed(catalog: &CatalogClient) -> HomeFeed {
    let (popular, trending, top_rated, action) = tokio::join!(
        catalog.popular(),
        catalog.trending(),
        catalog.top_rated(),
        catalog.discover_by_genre(ACTION_GENRE_ID),
    );

    let popular = or_empty("popular", popular);
    let featured = popular.choose(&mut rand::thread_rng()).cloned();

    HomeFeed {
        featured,
        popular,
        trending: or_empty("trending", trending),
        top_rated: or_empty("top_rated", top_rated),
        action: or_empty("action", action),
    }
}

pub async fn search(app: &App, query: &str) -> SearchResults {
    let results = or_empty("search", app.catalog().search(query).await);
    SearchResults {
        query: query.trim().to_string(),
        results,
    }
}

/// The title page.  A catalog failure leaves the page empty rather than
/// failing the navigation.
pub async fn movie_screen(app: &App, id: TitleId) -> MovieScreen {
    let page = match app.catalog().title_page(id).await {
        Ok(page) => Some(page),
        Err(e) => {
            warn!(id, error = %e, "title details unavailable");
            None
        }
    };
    let is_favorite = super::favorites::is_favorite(app, id).await.unwrap_or(false);
    MovieScreen { id, page, is_favorite }
}

fn or_empty(listing: &str, result: std::result::Result<Vec<MovieSummary>, CatalogError>) -> Vec<MovieSummary> {
    result.unwrap_or_else(|e| {
        warn!(listing, error = %e, "catalog listing unavailable");
        Vec::new()
    })
}
