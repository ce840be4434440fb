//! Client-local comments (never sent to the backend)

use chrono::{DateTime, Utc};
use uuid::Uuid;

/// A comment on a movie detail page. Lives for the page session only.
#[derive(Debug, Clone, PartialEq)]
pub struct Comment {
    pub id: Uuid,
    pub author: String,
    pub text: String,
    pub timestamp: DateTime<Utc>,
    /// 0 when the author did not attach stars
    pub stars: u8,
}

impl Comment {
    pub fn new(author: String, text: String, stars: u8) -> Self {
        Self {
            id: Uuid::new_v4(),
            author,
            text,
            timestamp: Utc::now(),
            stars: stars.min(5),
        }
    }

    /// "N estrella(s)" label, or `None` when no stars were given
    pub fn stars_label(&self) -> Option<String> {
        match self.stars {
            0 => None,
            1 => Some("1 estrella".to_string()),
            n => Some(format!("{} estrellas", n)),
        }
    }
}
