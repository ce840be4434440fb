//! Built-in movie catalog
//!
//! The catalog is static in this build: it is loaded once and never
//! mutated. Playback URLs are resolved against the backend on demand.

use crate::models::Movie;

/// Number of titles in each home screen carousel
const CAROUSEL_LEN: usize = 8;
/// Index the "trending" carousel starts at
const TRENDING_OFFSET: usize = 4;

/// Read-only movie collection
#[derive(Debug, Clone)]
pub struct Catalog {
    movies: Vec<Movie>,
}

impl Catalog {
    pub fn new(movies: Vec<Movie>) -> Self {
        Self { movies }
    }

    /// The titles shipped with the client
    pub fn builtin() -> Self {
        Self::new(builtin_movies())
    }

    pub fn all(&self) -> &[Movie] {
        &self.movies
    }

    pub fn len(&self) -> usize {
        self.movies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.movies.is_empty()
    }

    /// Find a title by catalog id or backend id
    pub fn get(&self, id: &str) -> Option<&Movie> {
        self.movies
            .iter()
            .find(|m| m.id == id || m.backend_id.as_deref() == Some(id))
    }

    /// Case-insensitive substring match on title. A blank query matches everything.
    pub fn search(&self, query: &str) -> Vec<&Movie> {
        filter_by_title(&self.movies, query, |m| m.title.as_str())
    }

    pub fn popular(&self) -> &[Movie] {
        let end = self.movies.len().min(CAROUSEL_LEN);
        &self.movies[..end]
    }

    pub fn trending(&self) -> &[Movie] {
        let start = self.movies.len().min(TRENDING_OFFSET);
        let end = self.movies.len().min(TRENDING_OFFSET + CAROUSEL_LEN);
        &self.movies[start..end]
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self::builtin()
    }
}

/// Filter `items` whose title contains `query`, ignoring case
pub fn filter_by_title<'a, T, F>(items: &'a [T], query: &str, title: F) -> Vec<&'a T>
where
    F: Fn(&T) -> &str,
{
    let needle = query.trim().to_lowercase();
    items
        .iter()
        .filter(|item| needle.is_empty() || title(item).to_lowercase().contains(&needle))
        .collect()
}

#[allow(clippy::too_many_arguments)]
fn movie(
    id: &str,
    title: &str,
    image_url: &str,
    category: &str,
    year: u16,
    rating: f32,
    description: &str,
    backend_id: Option<&str>,
) -> Movie {
    Movie {
        id: id.to_string(),
        title: title.to_string(),
        image_url: image_url.to_string(),
        category: category.to_string(),
        year,
        rating,
        description: Some(description.to_string()),
        video_url: None,
        backend_id: backend_id.map(str::to_string),
        subtitles: Vec::new(),
    }
}

fn builtin_movies() -> Vec<Movie> {
    vec![
        movie(
            "1",
            "John Wick 4",
            "https://image.tmdb.org/t/p/w500/vZloFAK7NmvMGKE7VkF5UHaz0I.jpg",
            "Acción",
            2023,
            8.5,
            "John Wick libra una guerra total contra el Alto Consejo, enfrentando nuevos enemigos y alianzas en una batalla imparable.",
            Some("68fe440f0f375de5da710444"),
        ),
        movie(
            "2",
            "Batman",
            "https://i.ibb.co/rBZd4CY/imagen-2025-10-25-175217428.png",
            "Drama",
            2023,
            7.8,
            "Batman investiga una red de corrupción en Gotham mientras se enfrenta a un enigmático asesino serial.",
            None,
        ),
        movie(
            "3",
            "Demon Slayer",
            "https://i.ibb.co/4RGmBZzf/imagen-2025-10-25-172857480.png",
            "Anime",
            2023,
            9.2,
            "Los cazadores de demonios son arrastrados al Castillo del Infinito para afrontar batallas definitivas contra demonios de alto rango.",
            Some("68fe73ef1f47ab544c72e3d8"),
        ),
        movie(
            "4",
            "K-Pop Demon Hunters",
            "/images/kpopdemonhunters.jpg",
            "Comedia",
            2023,
            7.5,
            "Un grupo de idols K-Pop dobla como cazadoras de demonios, equilibrando escenarios y peligros sobrenaturales.",
            None,
        ),
        movie(
            "5",
            "Weapons",
            "/images/waapons.jpg",
            "Thriller",
            2023,
            8.0,
            "Un thriller que entrelaza historias oscuras alrededor de un misterioso accidente y sus consecuencias.",
            Some("68fe776a1f47ab544c72e3dd"),
        ),
        movie(
            "6",
            "Wicked",
            "https://i.ibb.co/BVsCYh27/imagen-2025-10-25-174605393.png",
            "Drama",
            1989,
            8.9,
            "La historia no contada de las brujas de Oz, donde amistad y destino chocan en un mundo de magia.",
            Some("68fe51230f375de5da710446"),
        ),
        movie(
            "7",
            "Elio",
            "/images/eliomovie.jpg",
            "Suspense",
            2023,
            7.2,
            "Elio es transportado accidentalmente a una asamblea intergaláctica y debe representar a la Tierra.",
            None,
        ),
    ]
}
