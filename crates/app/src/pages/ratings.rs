//! "Mis Calificaciones" page

use streamia_core::{filter_by_title, Catalog, Movie, Rating, StarValue};
use streamia_net::ApiClient;
use tracing::debug;

pub const RATINGS_REQUIRE_LOGIN: &str = "Debes iniciar sesión para ver tus calificaciones";

/// One rated title, joined with its catalog entry
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RatedMovie<'a> {
    pub movie: &'a Movie,
    pub rating: &'a Rating,
}

impl RatedMovie<'_> {
    pub fn stars(&self) -> [bool; 5] {
        self.rating.rating.stars()
    }
}

pub struct RatingsPage {
    api: ApiClient,
    catalog: Catalog,
    ratings: Vec<Rating>,
    query: String,
    loading: bool,
    error: Option<String>,
}

impl RatingsPage {
    pub fn new(api: ApiClient, catalog: Catalog) -> Self {
        Self {
            api,
            catalog,
            ratings: Vec::new(),
            query: String::new(),
            loading: false,
            error: None,
        }
    }

    pub async fn load(&mut self) {
        self.error = None;
        if !self.api.tokens().is_present() {
            self.ratings.clear();
            self.error = Some(RATINGS_REQUIRE_LOGIN.to_string());
            return;
        }

        self.loading = true;
        let resp = self.api.ratings().await;
        match resp.data {
            Some(ratings) if resp.success => {
                debug!(count = ratings.len(), "Ratings loaded");
                self.ratings = ratings;
            }
            _ => {
                self.ratings.clear();
                self.error = Some(resp.error_or("Error al cargar las calificaciones"));
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

    pub fn set_query(&mut self, query: &str) {
        self.query = query.to_string();
    }

    /// Rated titles matching the search. Ratings for movies missing from
    /// the catalog are skipped.
    pub fn entries(&self) -> Vec<RatedMovie<'_>> {
        let joined: Vec<RatedMovie<'_>> = self
            .ratings
            .iter()
            .filter_map(|rating| {
                let movie = self.catalog.get(&rating.movie_id)?;
                Some(RatedMovie { movie, rating })
            })
            .collect();
        filter_by_title(&joined, &self.query, |entry| entry.movie.title.as_str())
            .into_iter()
            .copied()
            .collect()
    }

    /// The user's rating for a catalog or backend movie id
    pub fn stars_for(&self, movie_id: &str) -> Option<StarValue> {
        let movie = self.catalog.get(movie_id);
        self.ratings
            .iter()
            .find(|r| {
                r.movie_id == movie_id
                    || movie.is_some_and(|m| m.id == r.movie_id || m.backend_id.as_deref() == Some(r.movie_id.as_str()))
            })
            .map(|r| r.rating)
    }

    pub fn summary(&self) -> String {
        match self.ratings.len() {
            0 => "Aún no has calificado ninguna película".to_string(),
            1 => "Has calificado 1 película".to_string(),
            n => format!("Has calificado {} películas", n),
        }
    }
}
