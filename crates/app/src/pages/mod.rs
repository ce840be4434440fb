//! Page view models
//!
//! Pages change local state only after the backend confirms a write. A
//! failed write leaves the page as it was and shows the server's message
//! as the page notice.

mod catalog;
mod detail;
mod favorites;
mod ratings;

pub use catalog::CatalogPage;
pub use detail::{MovieDetailPage, COMMENT_REQUIRES_LOGIN, NO_VIDEO_URL, RATING_REQUIRES_LOGIN};
pub use favorites::{FavoriteToggle, FavoritesPage, FAVORITES_REQUIRE_LOGIN};
pub use ratings::{RatedMovie, RatingsPage, RATINGS_REQUIRE_LOGIN};
