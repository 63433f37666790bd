//! Reading list endpoints

use axum::{
    extract::State,
    http::StatusCode,
    Json,
};
use validator::Validate;

use crate::{
    error::AppResult,
    models::{
        pagination::{Page, PageQuery},
        reading_list::{
            AddListBook, CreateReadingList, ReadingList, ReadingListSummary, ReadingListWithBooks,
            RemoveListBook, UpdateListEntry, UpdateReadingList,
        },
    },
    AppState,
};

use super::{AuthenticatedUser, JsonBody, OptionalUser, PathParams, QueryParams};

/// Reading lists owned by the current user
#[utoipa::path(
    get,
    path = "/reading-lists",
    tag = "reading-lists",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Own reading lists", body = Vec<ReadingListSummary>),
        (status = 401, description = "Not authenticated", body = crate::error::ErrorResponse)
    )
)]
pub async fn my_lists(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
) -> AppResult<Json<Vec<ReadingListSummary>>> {
    let lists = state.services.reading_lists.for_user(claims.user_id).await?;
    Ok(Json(lists))
}

/// Public reading lists of all users
#[utoipa::path(
    get,
    path = "/reading-lists/public",
    tag = "reading-lists",
    params(PageQuery),
    responses(
        (status = 200, description = "Page of public lists", body = Page<ReadingListSummary>)
    )
)]
pub async fn public_lists(
    State(state): State<AppState>,
    QueryParams(query): QueryParams<PageQuery>,
) -> AppResult<Json<Page<ReadingListSummary>>> {
    let pagination = query.pagination(&state.config.pagination);
    let page = state.services.reading_lists.public(pagination).await?;
    Ok(Json(page))
}

/// Create a reading list, optionally with initial books
#[utoipa::path(
    post,
    path = "/reading-lists",
    tag = "reading-lists",
    security(("bearer_auth" = [])),
    request_body = CreateReadingList,
    responses(
        (status = 201, description = "Reading list created", body = ReadingList),
        (status = 400, description = "Invalid input", body = crate::error::ErrorResponse),
        (status = 404, description = "Unknown book in book_ids", body = crate::error::ErrorResponse)
    )
)]
pub async fn create_list(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    JsonBody(list): JsonBody<CreateReadingList>,
) -> AppResult<(StatusCode, Json<ReadingList>)> {
    list.validate()?;

    let created = state.services.reading_lists.create(claims.user_id, &list).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// Get a reading list with its books (public lists, or own private lists)
#[utoipa::path(
    get,
    path = "/reading-lists/{id}",
    tag = "reading-lists",
    params(
        ("id" = i32, Path, description = "Reading list ID")
    ),
    responses(
        (status = 200, description = "Reading list with books", body = ReadingListWithBooks),
        (status = 404, description = "Reading list not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn get_list(
    State(state): State<AppState>,
    viewer: OptionalUser,
    PathParams(id): PathParams<i32>,
) -> AppResult<Json<ReadingListWithBooks>> {
    let list = state.services.reading_lists.get(id, viewer.user_id()).await?;
    Ok(Json(list))
}

/// Update name, description or visibility
#[utoipa::path(
    put,
    path = "/reading-lists/{id}",
    tag = "reading-lists",
    security(("bearer_auth" = [])),
    params(
        ("id" = i32, Path, description = "Reading list ID")
    ),
    request_body = UpdateReadingList,
    responses(
        (status = 200, description = "Reading list updated", body = ReadingList),
        (status = 403, description = "Not the owner", body = crate::error::ErrorResponse),
        (status = 404, description = "Reading list not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn update_list(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    PathParams(id): PathParams<i32>,
    JsonBody(list): JsonBody<UpdateReadingList>,
) -> AppResult<Json<ReadingList>> {
    list.validate()?;

    let updated = state.services.reading_lists.update(id, claims.user_id, &list).await?;
    Ok(Json(updated))
}

/// Delete a reading list
#[utoipa::path(
    delete,
    path = "/reading-lists/{id}",
    tag = "reading-lists",
    security(("bearer_auth" = [])),
    params(
        ("id" = i32, Path, description = "Reading list ID")
    ),
    responses(
        (status = 204, description = "Reading list deleted"),
        (status = 403, description = "Not the owner", body = crate::error::ErrorResponse),
        (status = 404, description = "Reading list not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn delete_list(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    PathParams(id): PathParams<i32>,
) -> AppResult<StatusCode> {
    state.services.reading_lists.delete(id, claims.user_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Add a book to a reading list
#[utoipa::path(
    post,
    path = "/reading-lists/{id}/books",
    tag = "reading-lists",
    security(("bearer_auth" = [])),
    params(
        ("id" = i32, Path, description = "Reading list ID")
    ),
    request_body = AddListBook,
    responses(
        (status = 204, description = "Book added (or already present)"),
        (status = 403, description = "Not the owner", body = crate::error::ErrorResponse),
        (status = 404, description = "Reading list or book not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn add_list_book(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    PathParams(id): PathParams<i32>,
    JsonBody(entry): JsonBody<AddListBook>,
) -> AppResult<StatusCode> {
    entry.validate()?;

    state.services.reading_lists.add_book(id, claims.user_id, &entry).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Remove a book from a reading list
#[utoipa::path(
    delete,
    path = "/reading-lists/{id}/books",
    tag = "reading-lists",
    security(("bearer_auth" = [])),
    params(
        ("id" = i32, Path, description = "Reading list ID")
    ),
    request_body = RemoveListBook,
    responses(
        (status = 204, description = "Book removed"),
        (status = 403, description = "Not the owner", body = crate::error::ErrorResponse),
        (status = 404, description = "Book is not in this reading list", body = crate::error::ErrorResponse)
    )
)]
pub async fn remove_list_book(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    PathParams(id): PathParams<i32>,
    JsonBody(entry): JsonBody<RemoveListBook>,
) -> AppResult<StatusCode> {
    state
        .services
        .reading_lists
        .remove_book(id, claims.user_id, entry.book_id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Change the position or notes of a book in a reading list
#[utoipa::path(
    put,
    path = "/reading-lists/{id}/books/{book_id}",
    tag = "reading-lists",
    security(("bearer_auth" = [])),
    params(
        ("id" = i32, Path, description = "Reading list ID"),
        ("book_id" = i32, Path, description = "Book ID")
    ),
    request_body = UpdateListEntry,
    responses(
        (status = 204, description = "Entry updated"),
        (status = 403, description = "Not the owner", body = crate::error::ErrorResponse),
        (status = 404, description = "Book is not in this reading list", body = crate::error::ErrorResponse)
    )
)]
pub async fn update_list_entry(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    PathParams((id, book_id)): PathParams<(i32, i32)>,
    JsonBody(entry): JsonBody<UpdateListEntry>,
) -> AppResult<StatusCode> {
    entry.validate()?;

    state
        .services
        .reading_lists
        .update_entry(id, claims.user_id, book_id, &entry)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
