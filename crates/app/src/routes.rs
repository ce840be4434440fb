//! Application routes and the guard in front of protected pages

use tracing::debug;

use crate::session::SessionStore;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    Home,
    About,
    Contact,
    Manual,
    Sitemap,
    Login,
    Register,
    RecoverPassword,
    /// Reset link, with the token from `?token=` when present
    ResetPassword(Option<String>),
    MovieDetail(String),
    Favorites,
    Ratings,
    EditProfile,
}

impl Route {
    pub fn path(&self) -> String {
        match self {
            Route::Home => "/".to_string(),
            Route::About => "/about".to_string(),
            Route::Contact => "/contact".to_string(),
            Route::Manual => "/manual".to_string(),
            Route::Sitemap => "/sitemap".to_string(),
            Route::Login => "/login".to_string(),
            Route::Register => "/register".to_string(),
            Route::RecoverPassword => "/recover-password".to_string(),
            Route::ResetPassword(None) => "/reset-password".to_string(),
            Route::ResetPassword(Some(token)) => {
                format!("/reset-password?token={}", urlencoding::encode(token))
            }
            Route::MovieDetail(id) => format!("/movie/{}", id),
            Route::Favorites => "/favorites".to_string(),
            Route::Ratings => "/ratings".to_string(),
            Route::EditProfile => "/edit-profile".to_string(),
        }
    }

    /// Resolve a path. Unknown paths yield `None`.
    pub fn parse(path: &str) -> Option<Self> {
        let (path, query) = match path.split_once('?') {
            Some((path, query)) => (path, Some(query)),
            None => (path, None),
        };
        let trimmed = path.trim_end_matches('/');

        let route = match trimmed {
            "" => Route::Home,
            "/about" => Route::About,
            "/contact" => Route::Contact,
            "/manual" => Route::Manual,
            "/sitemap" => Route::Sitemap,
            "/login" => Route::Login,
            "/register" => Route::Register,
            "/recover-password" => Route::RecoverPassword,
            "/reset-password" => Route::ResetPassword(query.and_then(token_param)),
            "/favorites" => Route::Favorites,
            "/ratings" => Route::Ratings,
            "/edit-profile" => Route::EditProfile,
            other => {
                let id = other.strip_prefix("/movie/")?;
                if id.is_empty() || id.contains('/') {
                    return None;
                }
                Route::MovieDetail(id.to_string())
            }
        };
        Some(route)
    }

    pub fn is_protected(&self) -> bool {
        matches!(self, Route::EditProfile | Route::Ratings | Route::Favorites)
    }
}

/// Percent-decoded `token` query value. Undecodable values count as absent.
fn token_param(query: &str) -> Option<String> {
    let (_, raw) = query
        .split('&')
        .filter_map(|pair| pair.split_once('='))
        .find(|(key, _)| *key == "token")?;
    match urlencoding::decode(raw) {
        Ok(token) if !token.is_empty() => Some(token.into_owned()),
        Ok(_) => None,
        Err(e) => {
            debug!(error = %e, "Reset token is not valid UTF-8");
            None
        }
    }
}

/// What the router should do with a navigation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouteDecision {
    Allow,
    /// Session still resolving; show a loading indicator
    Wait,
    /// Send to login, remembering where the user was going
    Redirect { to: Route, from: Route },
}

pub fn guard(route: &Route, session: &SessionStore) -> RouteDecision {
    if !route.is_protected() {
        return RouteDecision::Allow;
    }
    if session.is_loading() {
        return RouteDecision::Wait;
    }
    if session.is_authenticated() {
        RouteDecision::Allow
    } else {
        RouteDecision::Redirect {
            to: Route::Login,
            from: route.clone(),
        }
    }
}
