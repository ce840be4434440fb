//! Favorite models

use serde::{Deserialize, Serialize};

/// Placeholder poster shown when a favorite has none
pub const PLACEHOLDER_POSTER: &str = "/images/placeholder.png";

/// A saved-for-later movie, with denormalized title and poster for display
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Favorite {
    #[serde(deserialize_with = "crate::models::string_or_number")]
    pub movie_id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub poster: Option<String>,
}

impl Favorite {
    pub fn poster_or_placeholder(&self) -> &str {
        self.poster.as_deref().unwrap_or(PLACEHOLDER_POSTER)
    }
}

/// Request body for adding a favorite
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewFavorite {
    pub movie_id: String,
    pub title: String,
    pub poster: String,
}

impl From<&crate::models::Movie> for NewFavorite {
    fn from(movie: &crate::models::Movie) -> Self {
        Self {
            movie_id: movie.id.clone(),
            title: movie.title.clone(),
            poster: movie.image_url.clone(),
        }
    }
}
