//! Reading status endpoints (always scoped to the current user)

use axum::{
    extract::State,
    http::StatusCode,
    Json,
};

use crate::{
    error::AppResult,
    models::{
        pagination::{Page, PageQuery, Pagination},
        user_book::{SetStatus, StatusCount, UserBook, UserBookEntry, UserBookQuery},
    },
    AppState,
};

use super::{AuthenticatedUser, JsonBody, PathParams, QueryParams};

/// Books the current user has read, most recent first
#[utoipa::path(
    get,
    path = "/user-books/read",
    tag = "user-books",
    security(("bearer_auth" = [])),
    params(PageQuery),
    responses(
        (status = 200, description = "Page of read books", body = Page<UserBookEntry>),
        (status = 401, description = "Not authenticated", body = crate::error::ErrorResponse)
    )
)]
pub async fn read_books(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    QueryParams(query): QueryParams<PageQuery>,
) -> AppResult<Json<Page<UserBookEntry>>> {
    let pagination = query.pagination(&state.config.pagination);
    let page = state.services.user_books.read_books(claims.user_id, pagination).await?;
    Ok(Json(page))
}

/// Books of the current user, optionally filtered by status
#[utoipa::path(
    get,
    path = "/user-books",
    tag = "user-books",
    security(("bearer_auth" = [])),
    params(UserBookQuery),
    responses(
        (status = 200, description = "Page of books with status", body = Page<UserBookEntry>),
        (status = 400, description = "Unknown status"),
        (status = 401, description = "Not authenticated", body = crate::error::ErrorResponse)
    )
)]
pub async fn list_user_books(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    QueryParams(query): QueryParams<UserBookQuery>,
) -> AppResult<Json<Page<UserBookEntry>>> {
    let pagination = Pagination::new(query.page, query.limit, &state.config.pagination);
    let page = state
        .services
        .user_books
        .list(claims.user_id, query.status, pagination)
        .await?;
    Ok(Json(page))
}

/// Number of books per status
#[utoipa::path(
    get,
    path = "/user-books/stats",
    tag = "user-books",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Per-status counts", body = Vec<StatusCount>),
        (status = 401, description = "Not authenticated", body = crate::error::ErrorResponse)
    )
)]
pub async fn status_stats(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
) -> AppResult<Json<Vec<StatusCount>>> {
    let counts = state.services.user_books.stats(claims.user_id).await?;
    Ok(Json(counts))
}

/// Reading status of one book
#[utoipa::path(
    get,
    path = "/user-books/{book_id}",
    tag = "user-books",
    security(("bearer_auth" = [])),
    params(
        ("book_id" = i32, Path, description = "Book ID")
    ),
    responses(
        (status = 200, description = "Reading status", body = UserBook),
        (status = 404, description = "No status for this book", body = crate::error::ErrorResponse)
    )
)]
pub async fn get_status(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    PathParams(book_id): PathParams<i32>,
) -> AppResult<Json<UserBook>> {
    let row = state.services.user_books.get(claims.user_id, book_id).await?;
    Ok(Json(row))
}

/// Set (insert or replace) the reading status of a book
#[utoipa::path(
    put,
    path = "/user-books/{book_id}",
    tag = "user-books",
    security(("bearer_auth" = [])),
    params(
        ("book_id" = i32, Path, description = "Book ID")
    ),
    request_body = SetStatus,
    responses(
        (status = 200, description = "Reading status stored", body = UserBook),
        (status = 400, description = "Unknown status", body = crate::error::ErrorResponse),
        (status = 404, description = "Book not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn set_status(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    PathParams(book_id): PathParams<i32>,
    JsonBody(request): JsonBody<SetStatus>,
) -> AppResult<Json<UserBook>> {
    let row = state
        .services
        .user_books
        .set_status(claims.user_id, book_id, request.status)
        .await?;
    Ok(Json(row))
}

/// Clear the reading status of a book
#[utoipa::path(
    delete,
    path = "/user-books/{book_id}",
    tag = "user-books",
    security(("bearer_auth" = [])),
    params(
        ("book_id" = i32, Path, description = "Book ID")
    ),
    responses(
        (status = 204, description = "Reading status removed"),
        (status = 404, description = "No status for this book", body = crate::error::ErrorResponse)
    )
)]
pub async fn remove_status(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    PathParams(book_id): PathParams<i32>,
) -> AppResult<StatusCode> {
    state.services.user_books.remove(claims.user_id, book_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
