//! Assembly of the title detail page: trailer choice, leading cast and
//! related titles.

use streamverse_shared::constants::{CAST_LIMIT, RELATED_LIMIT};
use streamverse_shared::TitleId;
use tracing::warn;

use crate::client::CatalogClient;
use crate::error::Result;
use crate::images;
use crate::models::{CastMember, MovieDetails, MovieSummary, Video};

#[derive(Debug, Clone)]
pub struct TitlePage {
    pub details: MovieDetails,
    pub trailer: Option<Video>,
    pub cast: Vec<CastMember>,
    pub related: Vec<MovieSummary>,
}

impl TitlePage {
    pub fn trailer_embed_url(&self) -> Option<String> {
        self.trailer.as_ref().map(|v| images::youtube_embed_url(&v.key))
    }
}

/// Prefer an official YouTube trailer, then any YouTube video.
pub fn pick_trailer(videos: &[Video]) -> Option<&Video> {
    videos
        .iter()
        .find(|v| v.kind == "Trailer" && v.site == "YouTube")
        .or_else(|| videos.iter().find(|v| v.site == "YouTube"))
}

/// Similar titles followed by same-genre titles, without the title itself.
pub fn merge_related(
    id: TitleId,
    similar: Vec<MovieSummary>,
    same_genre: Vec<MovieSummary>,
) -> Vec<MovieSummary> {
    similar
        .into_iter()
        .chain(same_genre)
        .filter(|m| m.id != id)
        .take(RELATED_LIMIT)
        .collect()
}

impl CatalogClient {
    /// Fetch everything the detail view shows.  Only the detail request is
    /// required; related listings degrade to empty on failure.
    pub async fn title_page(&self, id: TitleId) -> Result<TitlePage> {
        let details = self.details(id).await?;

        let trailer = pick_trailer(details.videos()).cloned();
        let cast = details.cast().iter().take(CAST_LIMIT).cloned().collect();

        let related = match details.genres.first() {
            Some(genre) => {
                let (similar, same_genre) =
                    tokio::join!(self.similar(id), self.discover_by_genre(genre.id));
                merge_related(id, or_empty("similar", similar), or_empty("genre", same_genre))
            }
            None => Vec::new(),
        };

        Ok(TitlePage {
            details,
            trailer,
            cast,
            related,
        })
    }
}

fn or_empty(what: &str, result: Result<Vec<MovieSummary>>) -> Vec<MovieSummary> {
    result.unwrap_or_else(|e| {
        warn!(listing = what, error = %e, "related listing unavailable");
        Vec::new()
    })
}
