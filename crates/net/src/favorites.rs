//! Favorites and ratings endpoints

use serde_json::{json, Value};
use streamia_core::{Favorite, NewFavorite, NewRating, Rating, StarValue};

use crate::client::ApiClient;
use crate::response::ApiResponse;

impl ApiClient {
    /// `GET /api/favorites` for the signed-in user
    pub async fn favorites(&self) -> ApiResponse<Vec<Favorite>> {
        self.get("/api/favorites").await
    }

    /// `POST /api/favorites`
    pub async fn add_favorite(&self, favorite: &NewFavorite) -> ApiResponse<Value> {
        self.post("/api/favorites", Some(favorite)).await
    }

    /// `DELETE /api/favorites/{movie_id}`
    pub async fn remove_favorite(&self, movie_id: &str) -> ApiResponse<Value> {
        self.delete(&format!("/api/favorites/{}", movie_id)).await
    }

    /// `GET /api/ratings` for the signed-in user
    pub async fn ratings(&self) -> ApiResponse<Vec<Rating>> {
        self.get("/api/ratings").await
    }

    /// `POST /api/ratings`. The backend answers with the stored rating.
    pub async fn submit_rating(&self, movie_id: &str, value: StarValue) -> ApiResponse<Rating> {
        let body = NewRating {
            movie_id: movie_id.to_string(),
            rating: value,
        };
        self.post("/api/ratings", Some(&body)).await
    }

    /// `PUT /api/ratings/{rating_id}`
    pub async fn update_rating(&self, rating_id: &str, value: StarValue) -> ApiResponse<Rating> {
        self.put(
            &format!("/api/ratings/{}", rating_id),
            &json!({ "rating": value }),
        )
        .await
    }

    /// `DELETE /api/ratings/{rating_id}`
    pub async fn delete_rating(&self, rating_id: &str) -> ApiResponse<Value> {
        self.delete(&format!("/api/ratings/{}", rating_id)).await
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::extract::Path;
    use axum::routing::{delete, get, post};
    use axum::{Json, Router};
    use streamia_core::{MemoryStore, TokenStore};

    use super::*;
    use crate::testing::serve;

    fn client(base: &str) -> ApiClient {
        ApiClient::new(base, TokenStore::new(Arc::new(MemoryStore::new()))).unwrap()
    }

    #[tokio::test]
    async fn test_favorites_endpoints() {
        let router = Router::new()
            .route(
                "/api/favorites",
                get(|| async {
                    Json(json!([
                        { "movieId": "3", "title": "Demon Slayer", "poster": "/p.png" },
                        { "movieId": 6, "title": "Wicked" }
                    ]))
                })
                .post(|Json(body): Json<Value>| async move { Json(json!({ "saved": body })) }),
            )
            .route(
                "/api/favorites/{id}",
                delete(|Path(id): Path<String>| async move { Json(json!({ "removed": id })) }),
            );
        let base = serve(router).await;
        let client = client(&base);

        let list = client.favorites().await.into_result().unwrap();
        assert_eq!(list.len(), 2);
        assert_eq!(list[1].movie_id, "6");

        let added = client
            .add_favorite(&NewFavorite {
                movie_id: "1".into(),
                title: "John Wick 4".into(),
                poster: "/jw.jpg".into(),
            })
            .await;
        assert_eq!(added.data.unwrap()["saved"]["movieId"], "1");

        let removed = client.remove_favorite("1").await;
        assert_eq!(removed.data.unwrap()["removed"], "1");
    }

    #[tokio::test]
    async fn test_rating_endpoints() {
        let router = Router::new()
            .route(
                "/api/ratings",
                post(|Json(body): Json<Value>| async move {
                    Json(json!({ "_id": "r9", "movieId": body["movieId"], "rating": body["rating"] }))
                }),
            )
            .route(
                "/api/ratings/{id}",
                axum::routing::put(|Path(id): Path<String>, Json(body): Json<Value>| async move {
                    Json(json!({ "_id": id, "movieId": "2", "rating": body["rating"] }))
                }),
            );
        let base = serve(router).await;
        let client = client(&base);

        let created = client
            .submit_rating("2", StarValue::new(3).unwrap())
            .await
            .into_result()
            .unwrap();
        assert_eq!(created.id, "r9");
        assert_eq!(created.rating.get(), 3);

        let updated = client
            .update_rating("r9", StarValue::new(5).unwrap())
            .await
            .into_result()
            .unwrap();
        assert_eq!(updated.rating.get(), 5);
    }
}
