//! Favorites page and the favorite toggle shared by home and detail

use std::collections::BTreeSet;

use streamia_core::{filter_by_title, Favorite, Movie, NewFavorite};
use streamia_net::ApiClient;
use tracing::{debug, info, warn};

pub const FAVORITES_REQUIRE_LOGIN: &str = "Inicia sesión para usar favoritos";

const ROW_LEN: usize = 6;

pub struct FavoritesPage {
    api: ApiClient,
    items: Vec<Favorite>,
    query: String,
    loading: bool,
    error: Option<String>,
    notice: Option<String>,
}

impl FavoritesPage {
    pub fn new(api: ApiClient) -> Self {
        Self {
            api,
            items: Vec::new(),
            query: String::new(),
            loading: false,
            error: None,
            notice: None,
        }
    }

    pub async fn load(&mut self) {
        self.loading = true;
        self.error = None;
        let resp = self.api.favorites().await;
        match resp.data {
            Some(items) if resp.success => {
                debug!(count = items.len(), "Favorites loaded");
                self.items = items;
            }
            _ => {
                self.items.clear();
                self.error = Some(resp.error_or("No se pudieron cargar los favoritos"));
            }
        }
        self.loading = false;
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn take_notice(&mut self) -> Option<String> {
        self.notice.take()
    }

    pub fn set_query(&mut self, query: &str) {
        self.query = query.to_string();
    }

    pub fn items(&self) -> &[Favorite] {
        &self.items
    }

    pub fn visible(&self) -> Vec<&Favorite> {
        filter_by_title(&self.items, &self.query, |f| f.title.as_str())
    }

    /// The two rows of up to six cards each
    pub fn rows(&self) -> (Vec<&Favorite>, Vec<&Favorite>) {
        let visible = self.visible();
        let first = visible.iter().take(ROW_LEN).copied().collect();
        let second = visible.iter().skip(ROW_LEN).take(ROW_LEN).copied().collect();
        (first, second)
    }

    pub fn count_label(&self) -> String {
        format!("{} películas", self.items.len())
    }

    pub async fn remove(&mut self, movie_id: &str) -> bool {
        let resp = self.api.remove_favorite(movie_id).await;
        if resp.success {
            self.items.retain(|f| f.movie_id != movie_id);
            true
        } else {
            self.notice = Some(resp.error_or("No se pudo quitar de favoritos"));
            false
        }
    }
}

/// Favorite state for a set of catalog titles
pub struct FavoriteToggle {
    api: ApiClient,
    ids: BTreeSet<String>,
    notice: Option<String>,
}

impl FavoriteToggle {
    pub fn new(api: ApiClient) -> Self {
        Self {
            api,
            ids: BTreeSet::new(),
            notice: None,
        }
    }

    /// Fetch the signed-in user's favorite ids. Anonymous users have none.
    pub async fn load(&mut self) {
        if !self.api.tokens().is_present() {
            self.ids.clear();
            return;
        }
        let resp = self.api.favorites().await;
        match resp.data {
            Some(items) if resp.success => {
                self.ids = items.into_iter().map(|f| f.movie_id).collect();
            }
            _ => warn!(error = ?resp.error, "Failed to load favorite ids"),
        }
    }

    pub fn is_favorite(&self, movie_id: &str) -> bool {
        self.ids.contains(movie_id)
    }

    pub fn ids(&self) -> &BTreeSet<String> {
        &self.ids
    }

    pub fn take_notice(&mut self) -> Option<String> {
        self.notice.take()
    }

    /// Add or remove `movie`. Returns whether the backend accepted the change.
    pub async fn toggle(&mut self, movie: &Movie) -> bool {
        if !self.api.tokens().is_present() {
            self.notice = Some(FAVORITES_REQUIRE_LOGIN.to_string());
            return false;
        }

        if self.is_favorite(&movie.id) {
            let resp = self.api.remove_favorite(&movie.id).await;
            if !resp.success {
                self.notice = Some(resp.error_or("No se pudo quitar de favoritos"));
                return false;
            }
            self.ids.remove(&movie.id);
            info!(movie_id = %movie.id, "Removed from favorites");
        } else {
            let resp = self.api.add_favorite(&NewFavorite::from(movie)).await;
            if !resp.success {
                self.notice = Some(resp.error_or("No se pudo agregar a favoritos"));
                return false;
            }
            self.ids.insert(movie.id.clone());
            info!(movie_id = %movie.id, "Added to favorites");
        }
        true
    }
}
