//! Movie lookup and playback source resolution
//!
//! `GET /api/movies/{id}` answers in several shapes depending on where the
//! asset lives (Cloudinary resource listings, eager transformations,
//! Pexels-style `video_files`, or a plain `videoUrl`). The helpers below
//! normalise those into one URL plus subtitle tracks.

use serde_json::Value;
use streamia_core::models::default_label;
use streamia_core::{Movie, SubtitleTrack};

use crate::client::ApiClient;
use crate::response::ApiResponse;

/// What the player needs to start
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaybackSource {
    pub url: String,
    pub subtitles: Vec<SubtitleTrack>,
}

impl ApiClient {
    /// `GET /api/movies/{id}`, returning the raw document
    pub async fn movie(&self, id: &str) -> ApiResponse<Value> {
        self.get(&format!("/api/movies/{}", id)).await
    }
}

fn str_field<'a>(value: &'a Value, key: &str) -> Option<&'a str> {
    value.get(key).and_then(Value::as_str)
}

fn first_item<'a>(value: &'a Value, key: &str) -> Option<&'a Value> {
    value.get(key).and_then(Value::as_array).and_then(|a| a.first())
}

/// Find the video URL in a movie lookup response
pub fn extract_video_url(res: &Value) -> Option<String> {
    let direct = str_field(res, "secure_url").or_else(|| str_field(res, "secureUrl"));
    if let Some(url) = direct {
        return Some(url.to_string());
    }

    for listing in ["resources", "eager"] {
        if let Some(item) = first_item(res, listing) {
            if let Some(url) = str_field(item, "secure_url").or_else(|| str_field(item, "url")) {
                return Some(url.to_string());
            }
        }
    }

    if let Some(url) = str_field(res, "videoUrl").or_else(|| str_field(res, "url")) {
        return Some(url.to_string());
    }

    if let Some(file) = first_item(res, "video_files") {
        return str_field(file, "link")
            .or_else(|| str_field(file, "file"))
            .map(str::to_string);
    }

    if let Some(video) = first_item(res, "videos") {
        if let Some(file) = first_item(video, "video_files") {
            return str_field(file, "link").map(str::to_string);
        }
        if let Some(url) = str_field(video, "url") {
            return Some(url.to_string());
        }
    }

    ["data", "movie", "video"]
        .iter()
        .filter_map(|key| res.get(*key))
        .find(|nested| nested.is_object())
        .and_then(extract_video_url)
}

/// Subtitle tracks declared by a movie lookup response
pub fn extract_subtitles(res: &Value) -> Vec<SubtitleTrack> {
    if let Some(list) = res.get("subtitles").and_then(Value::as_array) {
        return list
            .iter()
            .filter_map(|s| {
                let url = str_field(s, "url").or_else(|| str_field(s, "secure_url"))?;
                let language = str_field(s, "language").unwrap_or("es");
                let label = str_field(s, "label").unwrap_or_else(|| default_label(language));
                Some(SubtitleTrack {
                    language: language.to_string(),
                    url: url.to_string(),
                    label: label.to_string(),
                })
            })
            .collect();
    }

    if let Some(resources) = res.get("resources").and_then(Value::as_array) {
        return resources
            .iter()
            .filter(|r| matches!(str_field(r, "format"), Some("vtt") | Some("srt")))
            .filter_map(|r| {
                let url = str_field(r, "secure_url")?;
                let public_id = str_field(r, "public_id").unwrap_or_default();
                let language = if public_id.contains("en") { "en" } else { "es" };
                Some(SubtitleTrack::new(language, url))
            })
            .collect();
    }

    Vec::new()
}

/// Combine the lookup response with the catalog entry. The catalog's own
/// video URL and subtitles are used when the backend provides none.
pub fn resolve_playback(res: &Value, movie: &Movie) -> Option<PlaybackSource> {
    let url = extract_video_url(res).or_else(|| movie.video_url.clone())?;
    let mut subtitles = extract_subtitles(res);
    if subtitles.is_empty() {
        subtitles = movie.subtitles.clone();
    }
    Some(PlaybackSource { url, subtitles })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use streamia_core::Catalog;

    #[test]
    fn test_cloudinary_shapes() {
        assert_eq!(
            extract_video_url(&json!({ "secure_url": "https://a/v.mp4" })).as_deref(),
            Some("https://a/v.mp4")
        );
        assert_eq!(
            extract_video_url(&json!({ "resources": [{ "url": "http://b/v.mp4" }] })).as_deref(),
            Some("http://b/v.mp4")
        );
        assert_eq!(
            extract_video_url(&json!({ "eager": [{ "secure_url": "https://c/v.mp4" }] }))
                .as_deref(),
            Some("https://c/v.mp4")
        );
    }

    #[test]
    fn test_nested_and_pexels_shapes() {
        let nested = json!({ "success": true, "data": { "videoUrl": "https://d/v.mp4" } });
        assert_eq!(extract_video_url(&nested).as_deref(), Some("https://d/v.mp4"));

        let pexels = json!({ "videos": [{ "video_files": [{ "link": "https://e/v.mp4" }] }] });
        assert_eq!(extract_video_url(&pexels).as_deref(), Some("https://e/v.mp4"));

        assert_eq!(extract_video_url(&json!({ "title": "x" })), None);
    }

    #[test]
    fn test_subtitles_from_resources() {
        let res = json!({
            "resources": [
                { "format": "mp4", "secure_url": "https://a/v.mp4", "public_id": "movie" },
                { "format": "vtt", "secure_url": "https://a/en.vtt", "public_id": "movie_en" },
                { "format": "vtt", "secure_url": "https://a/es.vtt", "public_id": "movie_es" }
            ]
        });
        let subs = extract_subtitles(&res);
        assert_eq!(subs.len(), 2);
        assert_eq!(subs[0].language, "en");
        assert_eq!(subs[0].label, "English");
        assert_eq!(subs[1].label, "Español");
    }

    #[test]
    fn test_explicit_subtitles_default_language() {
        let res = json!({ "subtitles": [{ "url": "https://a/s.vtt" }] });
        let subs = extract_subtitles(&res);
        assert_eq!(subs, vec![SubtitleTrack::new("es", "https://a/s.vtt")]);
    }

    #[test]
    fn test_resolve_falls_back_to_catalog() {
        let mut movie = Catalog::builtin().get("2").unwrap().clone();
        assert!(resolve_playback(&json!({}), &movie).is_none());

        movie.video_url = Some("https://cdn/batman.mp4".to_string());
        movie.subtitles = vec![SubtitleTrack::new("en", "https://cdn/batman.vtt")];
        let source = resolve_playback(&json!({}), &movie).unwrap();
        assert_eq!(source.url, "https://cdn/batman.mp4");
        assert_eq!(source.subtitles.len(), 1);
    }
}
