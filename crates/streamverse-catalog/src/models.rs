//! Catalog response payloads.  Unknown fields are ignored and most fields
//! are optional because the catalog omits them freely.

use serde::{Deserialize, Serialize};
use streamverse_shared::TitleId;

/// One entry of a paged listing.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MovieSummary {
    pub id: TitleId,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub overview: String,
    pub poster_path: Option<String>,
    pub backdrop_path: Option<String>,
    pub release_date: Option<String>,
    #[serde(default)]
    pub vote_average: f64,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct Page<T> {
    #[serde(default = "Vec::new")]
    pub results: Vec<T>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Genre {
    pub id: u32,
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Video {
    pub key: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub site: String,
    #[serde(rename = "type", default)]
    pub kind: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CastMember {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub character: String,
    pub profile_path: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub(crate) struct Credits {
    #[serde(default)]
    pub cast: Vec<CastMember>,
}

/// Single-title detail with the `videos` and `credits` sub-resources
/// embedded.
#[derive(Debug, Clone, Deserialize)]
pub struct MovieDetails {
    pub id: TitleId,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub overview: String,
    pub poster_path: Option<String>,
    pub backdrop_path: Option<String>,
    pub release_date: Option<String>,
    #[serde(default)]
    pub vote_average: f64,
    pub runtime: Option<u32>,
    #[serde(default)]
    pub genres: Vec<Genre>,
    #[serde(default)]
    pub(crate) videos: Option<Page<Video>>,
    #[serde(default)]
    pub(crate) credits: Option<Credits>,
}

impl MovieDetails {
    pub fn videos(&self) -> &[Video] {
        self.videos.as_ref().map(|p| p.results.as_slice()).unwrap_or(&[])
    }

    pub fn cast(&self) -> &[CastMember] {
        self.credits.as_ref().map(|c| c.cast.as_slice()).unwrap_or(&[])
    }

    /// Four-digit release year, if the catalog has a date.
    pub fn release_year(&self) -> Option<&str> {
        self.release_date
            .as_deref()
            .and_then(|d| d.split('-').next())
            .filter(|y| y.len() == 4)
    }
}
