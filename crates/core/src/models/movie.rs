//! Movie catalog entries

use serde::{Deserialize, Serialize};

/// A subtitle file rendered natively by the player
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubtitleTrack {
    pub language: String,
    pub url: String,
    pub label: String,
}

impl SubtitleTrack {
    pub fn new(language: impl Into<String>, url: impl Into<String>) -> Self {
        let language = language.into();
        let label = default_label(&language).to_string();
        Self {
            language,
            url: url.into(),
            label,
        }
    }
}

/// Display label used when the backend does not send one
pub fn default_label(language: &str) -> &'static str {
    if language == "en" {
        "English"
    } else {
        "Español"
    }
}

/// A catalog title
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Movie {
    pub id: String,
    pub title: String,
    pub image_url: String,
    pub category: String,
    pub year: u16,
    pub rating: f32,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub video_url: Option<String>,
    /// Identifier the backend knows this title by, when it differs from `id`
    #[serde(default)]
    pub backend_id: Option<String>,
    #[serde(default)]
    pub subtitles: Vec<SubtitleTrack>,
}

impl Movie {
    /// Identifier to use for `GET /api/movies/{id}`
    pub fn lookup_id(&self) -> &str {
        self.backend_id.as_deref().unwrap_or(&self.id)
    }
}
