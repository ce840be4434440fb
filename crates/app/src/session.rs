//! Session store
//!
//! Owns who is signed in. The persisted token is the single source of
//! truth for "authenticated"; `user` is whatever profile the backend last
//! returned for it.

use streamia_core::{AuthPayload, Credentials, DisplayNameStore, ProfileUpdate, Registration, User};
use streamia_net::{ApiClient, ApiResponse};
use tracing::{debug, info, warn};

pub const GUEST_NAME: &str = "Invitado";
pub const FALLBACK_NAME: &str = "Usuario";
pub const NO_TOKEN: &str = "No authentication token found";

/// Guest label without a token, otherwise the stored name or a generic one
pub fn display_label(api: &ApiClient, names: &DisplayNameStore) -> String {
    if !api.tokens().is_present() {
        return GUEST_NAME.to_string();
    }
    names.get().unwrap_or_else(|| FALLBACK_NAME.to_string())
}

/// Where the session is in its lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Anonymous,
    Authenticating,
    Authenticated,
}

pub struct SessionStore {
    api: ApiClient,
    names: DisplayNameStore,
    state: SessionState,
    user: Option<User>,
    error: Option<String>,
    notice: Option<String>,
    loading: bool,
}

impl SessionStore {
    /// A fresh store is loading until [`SessionStore::restore`] has run
    pub fn new(api: ApiClient, names: DisplayNameStore) -> Self {
        Self {
            api,
            names,
            state: SessionState::Anonymous,
            user: None,
            error: None,
            notice: None,
            loading: true,
        }
    }

    pub fn api(&self) -> &ApiClient {
        &self.api
    }

    pub fn names(&self) -> &DisplayNameStore {
        &self.names
    }

    /// A session whose token was discarded (any 401 does that) reads as
    /// anonymous even before the store hears about it
    pub fn state(&self) -> SessionState {
        match self.state {
            SessionState::Authenticated if !self.is_authenticated() => SessionState::Anonymous,
            state => state,
        }
    }

    pub fn user(&self) -> Option<&User> {
        self.user.as_ref().filter(|_| self.is_authenticated())
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn notice(&self) -> Option<&str> {
        self.notice.as_deref()
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn is_authenticated(&self) -> bool {
        self.api.tokens().is_present()
    }

    pub fn clear_error(&mut self) {
        self.error = None;
    }

    /// Hand the transient success notice to the caller, once
    pub fn take_notice(&mut self) -> Option<String> {
        self.notice.take()
    }

    /// Label used for the current user in the navigation bar and comments
    pub fn display_name(&self) -> String {
        display_label(&self.api, &self.names)
    }

    fn begin(&mut self) {
        self.loading = true;
        self.error = None;
        self.notice = None;
    }

    /// Report a failed account call. A 401 also ends the local session.
    fn reject<T>(&mut self, resp: ApiResponse<T>, fallback: &str) -> bool {
        if resp.is_unauthorized() {
            info!("Session rejected by backend");
            self.clear_local();
        }
        let message = resp.error_or(fallback);
        self.fail(message)
    }

    fn fail(&mut self, message: String) -> bool {
        debug!(error = %message, "Session operation failed");
        self.error = Some(message);
        self.loading = false;
        false
    }

    /// Persist a freshly issued token and user
    fn establish(&mut self, payload: AuthPayload, notice: &str) -> bool {
        if let Err(e) = self.api.tokens().save(&payload.token) {
            warn!(error = %e, "Failed to persist session token");
            self.state = SessionState::Anonymous;
            return self.fail("No se pudo guardar la sesión".to_string());
        }
        self.remember_name(&payload.user);
        info!(user_id = %payload.user.id, "Signed in");
        self.user = Some(payload.user);
        self.state = SessionState::Authenticated;
        self.notice = Some(notice.to_string());
        self.loading = false;
        true
    }

    fn remember_name(&self, user: &User) {
        let name = user.display_name();
        if name.is_empty() {
            return;
        }
        if let Err(e) = self.names.set(&name) {
            warn!(error = %e, "Failed to store display name");
        }
    }

    fn finish_auth(&mut self, resp: ApiResponse<AuthPayload>, notice: &str, fallback: &str) -> bool {
        match resp.data {
            Some(payload) if resp.success => self.establish(payload, notice),
            _ => {
                self.state = SessionState::Anonymous;
                let message = resp.error.unwrap_or_else(|| fallback.to_string());
                self.fail(message)
            }
        }
    }

    pub async fn login(&mut self, credentials: &Credentials) -> bool {
        self.begin();
        self.state = SessionState::Authenticating;
        let resp = self.api.login(credentials).await;
        self.finish_auth(resp, "Inicio de sesión exitoso", "Login failed")
    }

    pub async fn register(&mut self, registration: &Registration) -> bool {
        self.begin();
        self.state = SessionState::Authenticating;
        let resp = self.api.register(registration).await;
        self.finish_auth(resp, "Registro exitoso. ¡Bienvenido a STREAMIA!", "Registration failed")
    }

    /// Tell the backend when possible, then always drop the local session
    pub async fn logout(&mut self) {
        if self.is_authenticated() {
            let resp = self.api.logout().await;
            if !resp.success {
                warn!(error = ?resp.error, "Logout notification failed");
            }
        }
        self.clear_local();
        info!("Signed out");
    }

    fn clear_local(&mut self) {
        if let Err(e) = self.api.tokens().clear() {
            warn!(error = %e, "Failed to discard session token");
        }
        if let Err(e) = self.names.clear() {
            warn!(error = %e, "Failed to clear display name");
        }
        self.user = None;
        self.state = SessionState::Anonymous;
        self.loading = false;
    }

    /// Replace the stored user with the backend's updated profile
    pub async fn update_profile(&mut self, update: &ProfileUpdate) -> bool {
        if !self.is_authenticated() {
            return self.fail(NO_TOKEN.to_string());
        }
        self.begin();
        let mut resp = self.api.update_profile(update).await;
        match resp.data.take() {
            Some(user) if resp.success => {
                self.remember_name(&user);
                self.user = Some(user);
                self.notice = Some("Perfil actualizado correctamente".to_string());
                self.loading = false;
                true
            }
            _ => self.reject(resp, "Profile update failed"),
        }
    }

    pub async fn delete_account(&mut self) -> bool {
        if !self.is_authenticated() {
            return self.fail(NO_TOKEN.to_string());
        }
        self.begin();
        let resp = self.api.delete_account().await;
        if resp.success {
            self.clear_local();
            self.notice = Some("Cuenta eliminada".to_string());
            true
        } else {
            self.reject(resp, "Account deletion failed")
        }
    }

    /// Rebuild the session from a persisted token at application start
    pub async fn restore(&mut self) {
        if !self.is_authenticated() {
            self.state = SessionState::Anonymous;
            self.loading = false;
            return;
        }

        self.loading = true;
        let resp = self.api.profile().await;
        match resp.data {
            Some(user) if resp.success => {
                info!(user_id = %user.id, "Session restored");
                self.remember_name(&user);
                self.user = Some(user);
                self.state = SessionState::Authenticated;
                self.loading = false;
            }
            _ => {
                warn!(error = ?resp.error, "Stored session is no longer valid");
                self.clear_local();
            }
        }
    }

    pub async fn request_password_recovery(&mut self, email: &str) -> bool {
        self.begin();
        let resp = self.api.recover_password(email).await;
        if resp.success {
            self.notice = Some(
                "Si el correo está registrado, recibirás un enlace para restablecer tu contraseña"
                    .to_string(),
            );
            self.loading = false;
            true
        } else {
            let message = resp.error_or("No se pudo enviar el correo de recuperación");
            self.fail(message)
        }
    }

    pub async fn reset_password(&mut self, token: &str, password: &str, confirm: &str) -> bool {
        self.begin();
        let resp = self.api.reset_password(token, password, confirm).await;
        if resp.success {
            self.notice = Some("Contraseña actualizada correctamente".to_string());
            self.loading = false;
            true
        } else {
            let message = resp.error_or("No se pudo actualizar la contraseña. Intenta de nuevo.");
            self.fail(message)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{mock_backend, EMAIL, PASSWORD, TAKEN_EMAIL, TOKEN};
    use streamia_net::EMAIL_TAKEN;

    async fn session() -> (crate::testing::MockBackend, SessionStore) {
        let backend = mock_backend().await;
        let store = SessionStore::new(backend.client(), backend.names());
        (backend, store)
    }

    #[tokio::test]
    async fn test_login_persists_token() {
        let (backend, mut session) = session().await;
        assert_eq!(session.display_name(), GUEST_NAME);

        assert!(session.login(&Credentials::new(EMAIL, PASSWORD)).await);
        assert_eq!(session.state(), SessionState::Authenticated);
        assert!(session.is_authenticated());
        assert_eq!(backend.tokens().token().as_deref(), Some(TOKEN));
        assert_eq!(session.user().unwrap().first_name, "Ana");
        assert_eq!(session.display_name(), "Ana Gómez");
        assert!(session.take_notice().is_some());
        assert!(session.take_notice().is_none());
    }

    #[tokio::test]
    async fn test_display_label_fallbacks() {
        let backend = mock_backend().await;
        let api = backend.client();
        assert_eq!(display_label(&api, &backend.names()), GUEST_NAME);

        backend.tokens().save(TOKEN).unwrap();
        assert_eq!(display_label(&api, &backend.names()), FALLBACK_NAME);

        backend.names().set("Ana Gómez").unwrap();
        assert_eq!(display_label(&api, &backend.names()), "Ana Gómez");
    }

    #[tokio::test]
    async fn test_invalid_credentials() {
        let (backend, mut session) = session().await;

        assert!(!session.login(&Credentials::new(EMAIL, "wrong")).await);
        assert_eq!(session.state(), SessionState::Anonymous);
        assert!(!backend.tokens().is_present());
        assert_eq!(session.error(), Some("Credenciales inválidas"));
        assert!(!session.is_loading());

        session.clear_error();
        assert!(session.error().is_none());
    }

    #[tokio::test]
    async fn test_register_conflict() {
        let (_backend, mut session) = session().await;
        let registration = Registration {
            first_name: "Ana".into(),
            last_name: "Gómez".into(),
            age: 28,
            email: TAKEN_EMAIL.into(),
            password: PASSWORD.into(),
            confirm_password: PASSWORD.into(),
        };
        assert!(!session.register(&registration).await);
        assert_eq!(session.error(), Some(EMAIL_TAKEN));
    }

    #[tokio::test]
    async fn test_logout_clears_everything() {
        let (backend, mut session) = session().await;
        session.login(&Credentials::new(EMAIL, PASSWORD)).await;

        session.logout().await;
        assert!(!session.is_authenticated());
        assert!(session.user().is_none());
        assert!(backend.names().get().is_none());
        assert_eq!(session.display_name(), GUEST_NAME);
    }

    #[tokio::test]
    async fn test_restore() {
        let backend = mock_backend().await;
        let mut session = SessionStore::new(backend.signed_in_client(), backend.names());
        assert!(session.is_loading());

        session.restore().await;
        assert!(!session.is_loading());
        assert_eq!(session.state(), SessionState::Authenticated);
        assert_eq!(session.user().unwrap().email, EMAIL);
    }

    #[tokio::test]
    async fn test_restore_with_stale_token() {
        let backend = mock_backend().await;
        backend.tokens().save("expired").unwrap();
        let mut session = SessionStore::new(backend.client(), backend.names());

        session.restore().await;
        assert!(!session.is_authenticated());
        assert_eq!(session.state(), SessionState::Anonymous);
    }

    #[tokio::test]
    async fn test_profile_update_requires_token() {
        let (_backend, mut session) = session().await;
        assert!(!session.update_profile(&ProfileUpdate::default()).await);
        assert_eq!(session.error(), Some(NO_TOKEN));
        assert!(!session.delete_account().await);
    }

    #[tokio::test]
    async fn test_profile_update_replaces_user() {
        let (backend, mut session) = session().await;
        session.login(&Credentials::new(EMAIL, PASSWORD)).await;

        let update = ProfileUpdate {
            first_name: Some("Anita".into()),
            ..Default::default()
        };
        assert!(session.update_profile(&update).await);
        assert_eq!(session.user().unwrap().first_name, "Anita");
        assert_eq!(backend.names().get().as_deref(), Some("Anita Gómez"));
    }

    #[tokio::test]
    async fn test_rejected_token_ends_session() {
        let (backend, mut session) = session().await;
        session.login(&Credentials::new(EMAIL, PASSWORD)).await;
        backend.tokens().save("stale").unwrap();

        let update = ProfileUpdate {
            first_name: Some("Anita".into()),
            ..Default::default()
        };
        assert!(!session.update_profile(&update).await);
        assert_eq!(session.state(), SessionState::Anonymous);
        assert!(session.user().is_none());
        assert!(!session.is_authenticated());
        assert_eq!(session.error(), Some(streamia_net::SESSION_EXPIRED));
        assert!(backend.names().get().is_none());
        assert_eq!(session.display_name(), GUEST_NAME);
    }

    #[tokio::test]
    async fn test_token_dropped_elsewhere() {
        let (backend, mut session) = session().await;
        session.login(&Credentials::new(EMAIL, PASSWORD)).await;

        // a page request answered 401 and the client discarded the token
        backend.tokens().clear().unwrap();
        assert_eq!(session.state(), SessionState::Anonymous);
        assert!(session.user().is_none());
    }

    #[tokio::test]
    async fn test_delete_account() {
        let (_backend, mut session) = session().await;
        session.login(&Credentials::new(EMAIL, PASSWORD)).await;

        assert!(session.delete_account().await);
        assert!(!session.is_authenticated());
        assert!(session.user().is_none());
    }

    #[tokio::test]
    async fn test_password_reset() {
        let (_backend, mut session) = session().await;
        assert!(session.request_password_recovery(EMAIL).await);

        assert!(!session.reset_password("bogus", "Nueva#2025x", "Nueva#2025x").await);
        assert_eq!(
            session.error(),
            Some("Token de recuperación no válido o expirado")
        );
        assert!(session.reset_password("valid-token", "Nueva#2025x", "Nueva#2025x").await);
        assert!(session.error().is_none());
    }
}
