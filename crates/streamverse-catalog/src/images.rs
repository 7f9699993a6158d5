//! Image and trailer URL helpers.

/// Poster/backdrop sizes the views use.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageSize {
    W200,
    W500,
    Original,
}

impl ImageSize {
    pub fn as_str(&self) -> &'static str {
        match self {
            ImageSize::W200 => "w200",
            ImageSize::W500 => "w500",
            ImageSize::Original => "original",
        }
    }
}

/// Full image URL for a catalog path such as `/abc.jpg`.
pub fn image_url(base: &str, size: ImageSize, path: Option<&str>) -> Option<String> {
    let path = path.filter(|p| !p.is_empty())?;
    Some(format!(
        "{}/{}{}",
        base.trim_end_matches('/'),
        size.as_str(),
        path
    ))
}

pub fn youtube_watch_url(key: &str) -> String {
    format!("https://www.youtube.com/watch?v={key}")
}

pub fn youtube_embed_url(key: &str) -> String {
    format!("https://www.youtube.com/embed/{key}?autoplay=1")
}
