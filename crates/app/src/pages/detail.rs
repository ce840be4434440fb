//! Movie detail page: favorite toggle, star rating, local comments and
//! the entry point into playback

use streamia_core::{sanitize_input, Catalog, Comment, DisplayNameStore, Movie, Rating, StarValue};
use streamia_net::{resolve_playback, ApiClient};
use tracing::{info, warn};
use uuid::Uuid;

use super::favorites::FavoriteToggle;
use crate::player::{PlaybackRequest, LOAD_ERROR};
use crate::session::display_label;

pub const RATING_REQUIRES_LOGIN: &str = "Inicia sesión para calificar";
pub const COMMENT_REQUIRES_LOGIN: &str = "Inicia sesión para comentar";
pub const NO_VIDEO_URL: &str =
    "No se encontró una URL de video válida para esta película. Revisa el id o la respuesta del backend.";

pub struct MovieDetailPage {
    api: ApiClient,
    names: DisplayNameStore,
    movie: Option<Movie>,
    favorites: FavoriteToggle,
    user_rating: Option<Rating>,
    comments: Vec<Comment>,
    notice: Option<String>,
    video_error: Option<String>,
    loading_video: bool,
    playback: Option<PlaybackRequest>,
}

impl MovieDetailPage {
    /// Look `movie_id` up in the catalog. An unknown id renders as not found.
    pub fn new(api: ApiClient, names: DisplayNameStore, catalog: &Catalog, movie_id: &str) -> Self {
        Self {
            favorites: FavoriteToggle::new(api.clone()),
            api,
            names,
            movie: catalog.get(movie_id).cloned(),
            user_rating: None,
            comments: Vec::new(),
            notice: None,
            video_error: None,
            loading_video: false,
            playback: None,
        }
    }

    pub fn movie(&self) -> Option<&Movie> {
        self.movie.as_ref()
    }

    pub fn is_not_found(&self) -> bool {
        self.movie.is_none()
    }

    /// Fetch favorite ids and the user's existing rating for this title
    pub async fn load(&mut self) {
        let Some(movie) = self.movie.as_ref() else {
            return;
        };
        let movie_id = movie.id.clone();
        let backend_id = movie.backend_id.clone();
        self.favorites.load().await;

        if !self.api.tokens().is_present() {
            self.user_rating = None;
            return;
        }
        let resp = self.api.ratings().await;
        match resp.data {
            Some(ratings) if resp.success => {
                self.user_rating = ratings.into_iter().find(|r| {
                    r.movie_id == movie_id || backend_id.as_deref() == Some(r.movie_id.as_str())
                });
            }
            _ => warn!(error = ?resp.error, movie_id = %movie_id, "Failed to load rating"),
        }
    }

    pub fn take_notice(&mut self) -> Option<String> {
        self.notice.take()
    }

    /// Label for the current user's comments
    pub fn current_user(&self) -> String {
        display_label(&self.api, &self.names)
    }

    pub fn is_favorite(&self) -> bool {
        self.movie
            .as_ref()
            .is_some_and(|m| self.favorites.is_favorite(&m.id))
    }

    pub async fn toggle_favorite(&mut self) -> bool {
        let Some(movie) = self.movie.clone() else {
            return false;
        };
        let ok = self.favorites.toggle(&movie).await;
        if let Some(notice) = self.favorites.take_notice() {
            self.notice = Some(notice);
        }
        ok
    }

    pub fn user_rating(&self) -> Option<StarValue> {
        self.user_rating.as_ref().map(|r| r.rating)
    }

    /// Filled flags for the five-star widget
    pub fn stars(&self) -> [bool; 5] {
        self.user_rating().map(StarValue::stars).unwrap_or_default()
    }

    /// Submit a new rating or change the existing one
    pub async fn rate(&mut self, value: u8) -> bool {
        let Some(movie_id) = self.movie.as_ref().map(|m| m.id.clone()) else {
            return false;
        };
        if !self.api.tokens().is_present() {
            self.notice = Some(RATING_REQUIRES_LOGIN.to_string());
            return false;
        }
        let value = match StarValue::new(value) {
            Ok(value) => value,
            Err(e) => {
                self.notice = Some(e.to_string());
                return false;
            }
        };

        let resp = match &self.user_rating {
            Some(existing) => self.api.update_rating(&existing.id, value).await,
            None => self.api.submit_rating(&movie_id, value).await,
        };
        match resp.data {
            Some(rating) if resp.success => {
                info!(movie_id = %movie_id, rating = %rating.rating, "Rating saved");
                self.user_rating = Some(rating);
                true
            }
            _ => {
                self.notice = Some(resp.error_or("No se pudo guardar la calificación"));
                false
            }
        }
    }

    pub async fn clear_rating(&mut self) -> bool {
        let Some(existing) = self.user_rating.as_ref() else {
            return false;
        };
        let resp = self.api.delete_rating(&existing.id).await;
        if resp.success {
            self.user_rating = None;
            true
        } else {
            self.notice = Some(resp.error_or("No se pudo eliminar la calificación"));
            false
        }
    }

    /// Newest first
    pub fn comments(&self) -> &[Comment] {
        &self.comments
    }

    /// Post a comment locally. Blank text is ignored.
    pub fn add_comment(&mut self, text: &str, stars: u8) -> bool {
        let text = sanitize_input(text);
        if text.is_empty() {
            return false;
        }
        if !self.api.tokens().is_present() {
            self.notice = Some(COMMENT_REQUIRES_LOGIN.to_string());
            return false;
        }
        let comment = Comment::new(self.current_user(), text, stars);
        self.comments.insert(0, comment);
        true
    }

    pub fn delete_comment(&mut self, id: Uuid) {
        self.comments.retain(|c| c.id != id);
    }

    pub fn is_loading_video(&self) -> bool {
        self.loading_video
    }

    pub fn video_error(&self) -> Option<&str> {
        self.video_error.as_deref()
    }

    pub fn playback(&self) -> Option<&PlaybackRequest> {
        self.playback.as_ref()
    }

    /// Look the title up on the backend and prepare playback
    pub async fn play(&mut self) -> bool {
        let Some(movie) = self.movie.clone() else {
            return false;
        };
        self.loading_video = true;
        self.video_error = None;
        self.playback = None;

        let resp = self.api.movie(movie.lookup_id()).await;
        self.loading_video = false;

        let body = match resp.data {
            Some(body) if resp.success => body,
            _ => {
                warn!(movie_id = %movie.id, error = ?resp.error, "Movie lookup failed");
                self.video_error = Some(LOAD_ERROR.to_string());
                return false;
            }
        };

        match resolve_playback(&body, &movie) {
            Some(source) => {
                info!(movie_id = %movie.id, url = %source.url, "Playback ready");
                self.playback = Some(PlaybackRequest {
                    title: movie.title.clone(),
                    source,
                });
                true
            }
            None => {
                self.video_error = Some(NO_VIDEO_URL.to_string());
                false
            }
        }
    }

    pub fn close_player(&mut self) {
        self.playback = None;
        self.video_error = None;
    }
}
