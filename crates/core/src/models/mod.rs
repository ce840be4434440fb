//! Data models for STREAMIA

mod comment;
mod favorite;
mod movie;
mod rating;
mod user;

pub use comment::*;
pub use favorite::*;
pub use movie::*;
pub use rating::*;
pub use user::*;

use serde::{Deserialize, Deserializer};

/// Accepts identifiers sent either as JSON strings or numbers
pub(crate) fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Text(String),
        Integer(i64),
        Float(f64),
    }

    Ok(match Raw::deserialize(deserializer)? {
        Raw::Text(s) => s,
        Raw::Integer(n) => n.to_string(),
        Raw::Float(f) => f.to_string(),
    })
}

/// Record id from `_id`, or from the `id` virtual some backends send
/// alongside it (or instead of it)
pub(crate) fn record_id(mongo_id: Option<String>, virtual_id: Option<String>) -> Result<String, String> {
    mongo_id
        .or(virtual_id)
        .ok_or_else(|| "missing field `_id`".to_string())
}
