//! Line-oriented command shell
//!
//! Drives the session and page view models from text commands, one per
//! line. Each command produces plain output lines.

use streamia_core::Catalog;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tracing::debug;

use crate::config::AppConfig;
use crate::forms::LoginForm;
use crate::pages::{CatalogPage, FavoriteToggle, FavoritesPage, MovieDetailPage, RatingsPage};
use crate::routes::{guard, Route, RouteDecision};
use crate::session::SessionStore;

pub const HELP: &str = "\
Comandos:
  login <correo> <contraseña>   iniciar sesión
  logout                        cerrar sesión
  whoami                        usuario actual
  movies [búsqueda]             catálogo
  favorites                     mis favoritos
  fav <id>                      marcar o quitar favorito
  ratings                       mis calificaciones
  rate <id> <1-5>               calificar una película
  play <id>                     obtener la URL de reproducción
  health                        comprobar el backend
  help                          esta ayuda
  quit                          salir";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Login { email: String, password: String },
    Logout,
    Whoami,
    Movies(Option<String>),
    Favorites,
    Fav(String),
    Ratings,
    Rate { movie_id: String, value: u8 },
    Play(String),
    Health,
    Help,
    Quit,
}

impl Command {
    /// Parse one input line. Blank lines yield `Ok(None)`.
    pub fn parse(line: &str) -> Result<Option<Self>, String> {
        let mut words = line.split_whitespace();
        let Some(name) = words.next() else {
            return Ok(None);
        };
        let rest: Vec<&str> = words.collect();

        let command = match (name, rest.as_slice()) {
            ("login", [email, password]) => Command::Login {
                email: email.to_string(),
                password: password.to_string(),
            },
            ("logout", []) => Command::Logout,
            ("whoami", []) => Command::Whoami,
            ("movies", []) => Command::Movies(None),
            ("movies", query) => Command::Movies(Some(query.join(" "))),
            ("favorites", []) => Command::Favorites,
            ("fav", [id]) => Command::Fav(id.to_string()),
            ("ratings", []) => Command::Ratings,
            ("rate", [id, value]) => Command::Rate {
                movie_id: id.to_string(),
                value: value
                    .parse()
                    .map_err(|_| format!("Calificación no válida: {}", value))?,
            },
            ("play", [id]) => Command::Play(id.to_string()),
            ("health", []) => Command::Health,
            ("help", []) => Command::Help,
            ("quit" | "exit", []) => Command::Quit,
            _ => return Err(format!("Comando no reconocido: {}. Escribe help", line.trim())),
        };
        Ok(Some(command))
    }
}

pub struct Shell {
    session: SessionStore,
    catalog: Catalog,
    config: AppConfig,
}

impl Shell {
    pub fn new(session: SessionStore, catalog: Catalog, config: AppConfig) -> Self {
        Self {
            session,
            catalog,
            config,
        }
    }

    pub fn session(&self) -> &SessionStore {
        &self.session
    }

    /// Read commands until `quit` or end of input
    pub async fn run<R, W>(&mut self, input: R, mut output: W) -> std::io::Result<()>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        let banner = format!(
            "{} {} ({}). Escribe help para ver los comandos.\n",
            self.config.app_name,
            self.config.app_version,
            self.session.display_name()
        );
        output.write_all(banner.as_bytes()).await?;
        output.flush().await?;

        let mut lines = input.lines();
        while let Some(line) = lines.next_line().await? {
            let command = match Command::parse(&line) {
                Ok(Some(command)) => command,
                Ok(None) => continue,
                Err(message) => {
                    output.write_all(format!("{}\n", message).as_bytes()).await?;
                    continue;
                }
            };
            if command == Command::Quit {
                break;
            }
            for out in self.execute(command).await {
                output.write_all(format!("{}\n", out).as_bytes()).await?;
            }
            output.flush().await?;
        }
        Ok(())
    }

    /// `Some(lines)` when `route` is not reachable right now
    fn blocked(&self, route: Route) -> Option<Vec<String>> {
        match guard(&route, &self.session) {
            RouteDecision::Allow => None,
            RouteDecision::Wait => Some(vec!["Cargando sesión...".to_string()]),
            RouteDecision::Redirect { from, .. } => {
                debug!(from = %from.path(), "Protected route requires login");
                Some(vec!["Inicia sesión para continuar: login <correo> <contraseña>".to_string()])
            }
        }
    }

    pub async fn execute(&mut self, command: Command) -> Vec<String> {
        match command {
            Command::Login { email, password } => {
                let mut form = LoginForm::default();
                form.set_email(&email);
                form.set_password(&password);
                if form.submit(&mut self.session).await {
                    let notice = self.session.take_notice().unwrap_or_default();
                    vec![format!("{} ({})", notice, self.session.display_name())]
                } else if !form.errors.is_empty() {
                    ["email", "password"]
                        .iter()
                        .filter_map(|field| form.errors.get(field))
                        .map(str::to_string)
                        .collect()
                } else {
                    vec![self.session.error().unwrap_or("Login failed").to_string()]
                }
            }
            Command::Logout => {
                self.session.logout().await;
                vec!["Sesión cerrada".to_string()]
            }
            Command::Whoami => {
                let status = if self.session.is_authenticated() {
                    "con sesión"
                } else {
                    "sin sesión"
                };
                vec![format!("{} ({})", self.session.display_name(), status)]
            }
            Command::Movies(query) => {
                let mut page = CatalogPage::new(self.catalog.clone());
                page.set_query(query.as_deref().unwrap_or_default());
                if let Some(message) = page.empty_message() {
                    return vec![message];
                }
                page.visible()
                    .iter()
                    .map(|m| format!("{:>2}  {} ({}) · {} · {:.1}", m.id, m.title, m.year, m.category, m.rating))
                    .collect()
            }
            Command::Favorites => {
                if let Some(lines) = self.blocked(Route::Favorites) {
                    return lines;
                }
                let mut page = FavoritesPage::new(self.session.api().clone());
                page.load().await;
                if let Some(error) = page.error() {
                    return vec![error.to_string()];
                }
                let mut lines = vec![format!("Mis Favoritos: {}", page.count_label())];
                lines.extend(page.items().iter().map(|f| format!("  {}  {}", f.movie_id, f.title)));
                lines
            }
            Command::Fav(movie_id) => {
                let Some(movie) = self.catalog.get(&movie_id).cloned() else {
                    return vec!["Película no encontrada".to_string()];
                };
                let mut toggle = FavoriteToggle::new(self.session.api().clone());
                toggle.load().await;
                let was_favorite = toggle.is_favorite(&movie.id);
                if toggle.toggle(&movie).await {
                    let verb = if was_favorite { "Quitada de" } else { "Agregada a" };
                    vec![format!("{} favoritos: {}", verb, movie.title)]
                } else {
                    vec![toggle.take_notice().unwrap_or_default()]
                }
            }
            Command::Ratings => {
                if let Some(lines) = self.blocked(Route::Ratings) {
                    return lines;
                }
                let mut page = RatingsPage::new(self.session.api().clone(), self.catalog.clone());
                page.load().await;
                if let Some(error) = page.error() {
                    return vec![error.to_string()];
                }
                let mut lines = vec![page.summary()];
                lines.extend(
                    page.entries()
                        .iter()
                        .map(|e| format!("  {}  {}", e.movie.title, e.rating.rating)),
                );
                lines
            }
            Command::Rate { movie_id, value } => {
                let mut page = self.detail(&movie_id);
                if page.is_not_found() {
                    return vec!["Película no encontrada".to_string()];
                }
                page.load().await;
                if page.rate(value).await {
                    let title = page.movie().map(|m| m.title.clone()).unwrap_or_default();
                    vec![format!("{}: {}/5", title, value)]
                } else {
                    vec![page.take_notice().unwrap_or_default()]
                }
            }
            Command::Play(movie_id) => {
                let mut page = self.detail(&movie_id);
                if page.is_not_found() {
                    return vec!["Película no encontrada".to_string()];
                }
                if !page.play().await {
                    return vec![page.video_error().unwrap_or_default().to_string()];
                }
                match page.playback() {
                    Some(request) => {
                        let mut lines = vec![format!("{}: {}", request.title, request.source.url)];
                        lines.extend(
                            request
                                .subtitles()
                                .iter()
                                .map(|s| format!("  subtítulos {}: {}", s.label, s.url)),
                        );
                        lines
                    }
                    None => Vec::new(),
                }
            }
            Command::Health => {
                let reachable = self.session.api().health(self.config.health_timeout).await;
                let status = if reachable { "disponible" } else { "no disponible" };
                vec![format!("Backend {}: {}", self.session.api().base_url(), status)]
            }
            Command::Help => vec![HELP.to_string()],
            Command::Quit => Vec::new(),
        }
    }

    fn detail(&self, movie_id: &str) -> MovieDetailPage {
        MovieDetailPage::new(
            self.session.api().clone(),
            self.session.names().clone(),
            &self.catalog,
            movie_id,
        )
    }
}
