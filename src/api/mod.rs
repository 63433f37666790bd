//! API handlers for Bookshelf REST endpoints

pub mod auth;
pub mod books;
pub mod genres;
pub mod health;
pub mod openapi;
pub mod reading_lists;
pub mod user_books;

use axum::{
    async_trait,
    extract::{FromRequest, FromRequestParts, Path, Query, Request},
    http::{request::Parts, HeaderMap},
    routing::{get, post, put},
    Json, Router,
};
use axum_extra::{
    extract::CookieJar,
    headers::{authorization::Bearer, Authorization, HeaderMapExt},
};
use serde::de::DeserializeOwned;
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::{error::AppError, models::user::SessionClaims, AppState};

/// Extractor for the authenticated user. Fails with 401 when no valid session token is present.
pub struct AuthenticatedUser(pub SessionClaims);

#[async_trait]
impl FromRequestParts<AppState> for AuthenticatedUser {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let token = session_token(&parts.headers, &state.config.auth.cookie_name)
            .ok_or_else(|| AppError::Authentication("Missing session token".to_string()))?;

        let claims = state.services.users.verify_token(&token)?;
        Ok(AuthenticatedUser(claims))
    }
}

/// Extractor for endpoints that also serve anonymous callers.
/// A token that is present but invalid is still rejected.
pub struct OptionalUser(pub Option<SessionClaims>);

#[async_trait]
impl FromRequestParts<AppState> for OptionalUser {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        match session_token(&parts.headers, &state.config.auth.cookie_name) {
            Some(token) => Ok(OptionalUser(Some(state.services.users.verify_token(&token)?))),
            None => Ok(OptionalUser(None)),
        }
    }
}

impl OptionalUser {
    pub fn user_id(&self) -> Option<i32> {
        self.0.as_ref().map(|claims| claims.user_id)
    }
}

/// Session token from `Authorization: Bearer`, falling back to the session cookie
pub(crate) fn session_token(headers: &HeaderMap, cookie_name: &str) -> Option<String> {
    if let Some(Authorization(bearer)) = headers.typed_get::<Authorization<Bearer>>() {
        return Some(bearer.token().to_string());
    }

    CookieJar::from_headers(headers)
        .get(cookie_name)
        .map(|cookie| cookie.value().to_string())
        .filter(|value| !value.is_empty())
}

/// JSON body whose parse failures render as 400 with the standard error body
pub struct JsonBody<T>(pub T);

#[async_trait]
impl<S, T> FromRequest<S> for JsonBody<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|rejection| AppError::BadRequest(rejection.body_text()))?;
        Ok(JsonBody(value))
    }
}

/// Path parameters whose parse failures render as 400 with the standard error body
pub struct PathParams<T>(pub T);

#[async_trait]
impl<S, T> FromRequestParts<S> for PathParams<T>
where
    T: DeserializeOwned + Send,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(value) = Path::<T>::from_request_parts(parts, state)
            .await
            .map_err(|rejection| AppError::BadRequest(rejection.body_text()))?;
        Ok(PathParams(value))
    }
}

/// Query string parameters, rejected the same way as `PathParams`
pub struct QueryParams<T>(pub T);

#[async_trait]
impl<S, T> FromRequestParts<S> for QueryParams<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(value) = Query::<T>::from_request_parts(parts, state)
            .await
            .map_err(|rejection| AppError::BadRequest(rejection.body_text()))?;
        Ok(QueryParams(value))
    }
}

/// Create the application router with all routes
pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let api_v1 = Router::new()
        // Health check
        .route("/health", get(health::health_check))
        .route("/ready", get(health::readiness_check))
        // Authentication
        .route("/auth/register", post(auth::register))
        .route("/auth/login", post(auth::login))
        .route("/auth/logout", post(auth::logout))
        .route("/auth/me", get(auth::me))
        .route(
            "/auth/profile",
            put(auth::update_profile).delete(auth::delete_account),
        )
        // Books
        .route("/books", get(books::list_books).post(books::create_book))
        .route(
            "/books/:id",
            get(books::get_book)
                .put(books::update_book)
                .delete(books::delete_book),
        )
        .route(
            "/books/:id/genres",
            get(books::get_book_genres)
                .put(books::set_book_genres)
                .post(books::add_book_genre),
        )
        .route(
            "/books/:id/genres/:genre_id",
            axum::routing::delete(books::remove_book_genre),
        )
        // Genres
        .route("/genres", get(genres::list_genres).post(genres::create_genre))
        .route(
            "/genres/:id",
            get(genres::get_genre)
                .put(genres::update_genre)
                .delete(genres::delete_genre),
        )
        .route("/genres/:id/books", get(genres::list_genre_books))
        // Reading lists
        .route(
            "/reading-lists",
            get(reading_lists::my_lists).post(reading_lists::create_list),
        )
        .route("/reading-lists/public", get(reading_lists::public_lists))
        .route(
            "/reading-lists/:id",
            get(reading_lists::get_list)
                .put(reading_lists::update_list)
                .delete(reading_lists::delete_list),
        )
        .route(
            "/reading-lists/:id/books",
            post(reading_lists::add_list_book).delete(reading_lists::remove_list_book),
        )
        .route(
            "/reading-lists/:id/books/:book_id",
            put(reading_lists::update_list_entry),
        )
        // Reading status
        .route("/user-books", get(user_books::list_user_books))
        .route("/user-books/read", get(user_books::read_books))
        .route("/user-books/stats", get(user_books::status_stats))
        .route(
            "/user-books/:book_id",
            get(user_books::get_status)
                .put(user_books::set_status)
                .delete(user_books::remove_status),
        )
        .with_state(state);

    Router::new()
        .nest("/api/v1", api_v1)
        .merge(openapi::create_openapi_router())
        .layer(TraceLayer::new_for_http())
        .layer(CompressionLayer::new())
        .layer(cors)
}
