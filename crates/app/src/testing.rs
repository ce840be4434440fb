//! Stateful in-process backend for session and page tests

use std::sync::{Arc, Mutex};

use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{delete, get, post, put};
use axum::{Json, Router};
use serde_json::{json, Value};
use streamia_core::{DisplayNameStore, MemoryStore, TokenStore};
use streamia_net::ApiClient;

pub(crate) const EMAIL: &str = "ana@example.com";
pub(crate) const PASSWORD: &str = "Secreta#2025";
pub(crate) const TOKEN: &str = "jwt-ana";
pub(crate) const TAKEN_EMAIL: &str = "taken@example.com";

pub(crate) struct Backend {
    pub user: Value,
    pub favorites: Vec<Value>,
    pub ratings: Vec<Value>,
    pub next_rating: u32,
    /// `METHOD path` of every authorized write, in order
    pub calls: Vec<String>,
    /// Make favorite and rating writes answer 500
    pub fail_writes: bool,
}

impl Default for Backend {
    fn default() -> Self {
        Self {
            user: json!({
                "_id": "u1",
                "firstName": "Ana",
                "lastName": "Gómez",
                "age": 28,
                "email": EMAIL
            }),
            favorites: Vec::new(),
            ratings: Vec::new(),
            next_rating: 1,
            calls: Vec::new(),
            fail_writes: false,
        }
    }
}

type Shared = Arc<Mutex<Backend>>;

pub(crate) struct MockBackend {
    pub base_url: String,
    pub state: Shared,
    store: Arc<MemoryStore>,
}

impl MockBackend {
    /// API client sharing this backend's key-value store
    pub fn client(&self) -> ApiClient {
        ApiClient::new(&self.base_url, self.tokens()).unwrap()
    }

    pub fn tokens(&self) -> TokenStore {
        TokenStore::new(self.store.clone())
    }

    pub fn names(&self) -> DisplayNameStore {
        DisplayNameStore::new(self.store.clone())
    }

    /// Client already holding a valid token
    pub fn signed_in_client(&self) -> ApiClient {
        self.tokens().save(TOKEN).unwrap();
        self.client()
    }

    pub fn calls(&self) -> Vec<String> {
        self.state.lock().unwrap().calls.clone()
    }

    pub fn set_fail_writes(&self, fail: bool) {
        self.state.lock().unwrap().fail_writes = fail;
    }
}

fn reply(status: StatusCode, body: Value) -> Response {
    (status, Json(body)).into_response()
}

fn authorized(headers: &HeaderMap) -> bool {
    headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v == format!("Bearer {}", TOKEN))
}

fn unauthorized() -> Response {
    reply(StatusCode::UNAUTHORIZED, json!({ "message": "Token inválido" }))
}

async fn login(State(state): State<Shared>, Json(body): Json<Value>) -> Response {
    if body["email"] == EMAIL && body["password"] == PASSWORD {
        let user = state.lock().unwrap().user.clone();
        reply(StatusCode::OK, json!({ "user": user, "token": TOKEN }))
    } else {
        reply(
            StatusCode::BAD_REQUEST,
            json!({ "message": "Credenciales inválidas" }),
        )
    }
}

async fn register(State(state): State<Shared>, Json(body): Json<Value>) -> Response {
    if body["email"] == TAKEN_EMAIL {
        return reply(StatusCode::CONFLICT, json!({ "message": "duplicate" }));
    }
    let mut backend = state.lock().unwrap();
    backend.user = json!({
        "_id": "u2",
        "firstName": body["firstName"],
        "lastName": body["lastName"],
        "age": body["age"],
        "email": body["email"]
    });
    reply(
        StatusCode::CREATED,
        json!({ "user": backend.user, "token": TOKEN }),
    )
}

async fn profile(State(state): State<Shared>, headers: HeaderMap) -> Response {
    if !authorized(&headers) {
        return unauthorized();
    }
    reply(StatusCode::OK, state.lock().unwrap().user.clone())
}

async fn update_profile(
    State(state): State<Shared>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    if !authorized(&headers) {
        return unauthorized();
    }
    let mut backend = state.lock().unwrap();
    if let (Some(user), Some(changes)) = (backend.user.as_object_mut(), body.as_object()) {
        for (key, value) in changes {
            if key != "password" && key != "confirmPassword" {
                user.insert(key.clone(), value.clone());
            }
        }
    }
    reply(StatusCode::OK, backend.user.clone())
}

async fn delete_account(headers: HeaderMap) -> Response {
    if !authorized(&headers) {
        return unauthorized();
    }
    reply(StatusCode::OK, json!({ "message": "Cuenta eliminada" }))
}

async fn reset_password(Json(body): Json<Value>) -> Response {
    if body["token"] == "valid-token" {
        reply(StatusCode::OK, json!({ "message": "ok" }))
    } else {
        reply(
            StatusCode::BAD_REQUEST,
            json!({ "message": "Token de recuperación no válido o expirado" }),
        )
    }
}

async fn list_favorites(State(state): State<Shared>, headers: HeaderMap) -> Response {
    if !authorized(&headers) {
        return unauthorized();
    }
    let favorites = state.lock().unwrap().favorites.clone();
    reply(StatusCode::OK, Value::Array(favorites))
}

async fn add_favorite(
    State(state): State<Shared>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    if !authorized(&headers) {
        return unauthorized();
    }
    let mut backend = state.lock().unwrap();
    backend.calls.push("POST /api/favorites".to_string());
    if backend.fail_writes {
        return reply(
            StatusCode::INTERNAL_SERVER_ERROR,
            json!({ "message": "Error interno" }),
        );
    }
    backend.favorites.push(body.clone());
    reply(StatusCode::CREATED, body)
}

async fn remove_favorite(
    State(state): State<Shared>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Response {
    if !authorized(&headers) {
        return unauthorized();
    }
    let mut backend = state.lock().unwrap();
    backend.calls.push(format!("DELETE /api/favorites/{}", id));
    if backend.fail_writes {
        return reply(
            StatusCode::INTERNAL_SERVER_ERROR,
            json!({ "message": "Error interno" }),
        );
    }
    backend.favorites.retain(|f| f["movieId"] != id.as_str());
    reply(StatusCode::OK, json!({ "message": "Eliminado" }))
}

async fn list_ratings(State(state): State<Shared>, headers: HeaderMap) -> Response {
    if !authorized(&headers) {
        return unauthorized();
    }
    let ratings = state.lock().unwrap().ratings.clone();
    reply(StatusCode::OK, Value::Array(ratings))
}

async fn create_rating(
    State(state): State<Shared>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    if !authorized(&headers) {
        return unauthorized();
    }
    let mut backend = state.lock().unwrap();
    backend.calls.push("POST /api/ratings".to_string());
    if backend.fail_writes {
        return reply(
            StatusCode::INTERNAL_SERVER_ERROR,
            json!({ "message": "Error interno" }),
        );
    }
    let rating = json!({
        "_id": format!("r{}", backend.next_rating),
        "userId": "u1",
        "movieId": body["movieId"],
        "rating": body["rating"]
    });
    backend.next_rating += 1;
    backend.ratings.push(rating.clone());
    reply(StatusCode::CREATED, rating)
}

async fn update_rating(
    State(state): State<Shared>,
    headers: HeaderMap,
    Path(id): Path<String>,
    Json(body): Json<Value>,
) -> Response {
    if !authorized(&headers) {
        return unauthorized();
    }
    let mut backend = state.lock().unwrap();
    backend.calls.push(format!("PUT /api/ratings/{}", id));
    let Some(rating) = backend.ratings.iter_mut().find(|r| r["_id"] == id.as_str()) else {
        return reply(
            StatusCode::NOT_FOUND,
            json!({ "message": "Calificación no encontrada" }),
        );
    };
    rating["rating"] = body["rating"].clone();
    let updated = rating.clone();
    reply(StatusCode::OK, updated)
}

async fn delete_rating(
    State(state): State<Shared>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Response {
    if !authorized(&headers) {
        return unauthorized();
    }
    let mut backend = state.lock().unwrap();
    backend.calls.push(format!("DELETE /api/ratings/{}", id));
    backend.ratings.retain(|r| r["_id"] != id.as_str());
    reply(StatusCode::OK, json!({ "message": "Eliminada" }))
}

async fn movie(Path(id): Path<String>) -> Response {
    match id.as_str() {
        "missing" => reply(
            StatusCode::NOT_FOUND,
            json!({ "message": "Película no encontrada" }),
        ),
        "no-video" => reply(StatusCode::OK, json!({ "success": true, "data": { "title": "x" } })),
        _ => reply(
            StatusCode::OK,
            json!({
                "success": true,
                "data": { "videoUrl": format!("https://cdn.streamia.test/{}.mp4", id) },
                "subtitles": [{ "language": "en", "url": format!("https://cdn.streamia.test/{}_en.vtt", id) }]
            }),
        ),
    }
}

/// Start the mock backend on an ephemeral local port
pub(crate) async fn mock_backend() -> MockBackend {
    let state: Shared = Arc::new(Mutex::new(Backend::default()));

    let router = Router::new()
        .route("/health", get(|| async { "ok" }))
        .route("/api/users/login", post(login))
        .route("/api/users/register", post(register))
        .route(
            "/api/users/logout",
            post(|| async { Json(json!({ "message": "ok" })) }),
        )
        .route(
            "/api/users/recover-password",
            post(|| async { Json(json!({ "message": "Correo enviado" })) }),
        )
        .route("/api/users/reset-password", post(reset_password))
        .route("/api/users/profile", get(profile).put(update_profile))
        .route("/api/users/account", delete(delete_account))
        .route("/api/favorites", get(list_favorites).post(add_favorite))
        .route("/api/favorites/{id}", delete(remove_favorite))
        .route("/api/ratings", get(list_ratings).post(create_rating))
        .route(
            "/api/ratings/{id}",
            put(update_rating).delete(delete_rating),
        )
        .route("/api/movies/{id}", get(movie))
        .with_state(state.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind mock backend");
    let addr = listener.local_addr().expect("mock backend address");
    tokio::spawn(async move {
        axum::serve(listener, router)
            .await
            .expect("mock backend stopped");
    });

    MockBackend {
        base_url: format!("http://{}", addr),
        state,
        store: Arc::new(MemoryStore::new()),
    }
}
