//! Star ratings

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// A 1-5 star value
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct StarValue(u8);

impl StarValue {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 5;

    pub fn new(value: u8) -> Result<Self> {
        if (Self::MIN..=Self::MAX).contains(&value) {
            Ok(Self(value))
        } else {
            Err(Error::InvalidValue(format!(
                "rating must be between {} and {}, got {}",
                Self::MIN,
                Self::MAX,
                value
            )))
        }
    }

    pub fn get(self) -> u8 {
        self.0
    }

    /// Filled/empty flags for rendering five stars
    pub fn stars(self) -> [bool; 5] {
        let mut stars = [false; 5];
        for (i, star) in stars.iter_mut().enumerate() {
            *star = (i as u8) < self.0;
        }
        stars
    }
}

impl TryFrom<u8> for StarValue {
    type Error = Error;

    fn try_from(value: u8) -> Result<Self> {
        Self::new(value)
    }
}

impl From<StarValue> for u8 {
    fn from(value: StarValue) -> Self {
        value.0
    }
}

impl fmt::Display for StarValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/5", self.0)
    }
}

/// A user's rating of one movie. The id is assigned by the backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", try_from = "RatingRecord")]
pub struct Rating {
    #[serde(rename = "_id")]
    pub id: String,
    pub user_id: Option<String>,
    pub movie_id: String,
    pub rating: StarValue,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

/// Wire shape of [`Rating`]
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RatingRecord {
    #[serde(rename = "_id", default)]
    mongo_id: Option<String>,
    #[serde(default)]
    id: Option<String>,
    #[serde(default)]
    user_id: Option<String>,
    #[serde(deserialize_with = "crate::models::string_or_number")]
    movie_id: String,
    rating: StarValue,
    #[serde(default)]
    created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    updated_at: Option<DateTime<Utc>>,
}

impl TryFrom<RatingRecord> for Rating {
    type Error = String;

    fn try_from(raw: RatingRecord) -> std::result::Result<Self, String> {
        Ok(Self {
            id: super::record_id(raw.mongo_id, raw.id)?,
            user_id: raw.user_id,
            movie_id: raw.movie_id,
            rating: raw.rating,
            created_at: raw.created_at,
            updated_at: raw.updated_at,
        })
    }
}

/// Request body for `POST /api/ratings`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewRating {
    pub movie_id: String,
    pub rating: StarValue,
}
