//! Book catalog endpoints

use axum::{
    extract::State,
    http::StatusCode,
    Json,
};
use validator::Validate;

use crate::{
    error::AppResult,
    models::{
        book::{AssignGenre, Book, BookDetails, BookQuery, CreateBook, SetBookGenres, UpdateBook},
        genre::Genre,
        pagination::Page,
    },
    AppState,
};

use super::{AuthenticatedUser, JsonBody, PathParams, QueryParams};

/// List books with search, sorting and pagination
#[utoipa::path(
    get,
    path = "/books",
    tag = "books",
    params(BookQuery),
    responses(
        (status = 200, description = "Page of books", body = Page<Book>),
        (status = 400, description = "Invalid query parameters")
    )
)]
pub async fn list_books(
    State(state): State<AppState>,
    QueryParams(query): QueryParams<BookQuery>,
) -> AppResult<Json<Page<Book>>> {
    let pagination = query.pagination(&state.config.pagination);
    let page = state.services.books.list(&query, pagination).await?;
    Ok(Json(page))
}

/// Get book details, including genres
#[utoipa::path(
    get,
    path = "/books/{id}",
    tag = "books",
    params(
        ("id" = i32, Path, description = "Book ID")
    ),
    responses(
        (status = 200, description = "Book details", body = BookDetails),
        (status = 404, description = "Book not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn get_book(
    State(state): State<AppState>,
    PathParams(id): PathParams<i32>,
) -> AppResult<Json<BookDetails>> {
    let book = state.services.books.get_details(id).await?;
    Ok(Json(book))
}

/// Create a new book
#[utoipa::path(
    post,
    path = "/books",
    tag = "books",
    security(("bearer_auth" = [])),
    request_body = CreateBook,
    responses(
        (status = 201, description = "Book created", body = Book),
        (status = 400, description = "Invalid input", body = crate::error::ErrorResponse),
        (status = 401, description = "Not authenticated", body = crate::error::ErrorResponse)
    )
)]
pub async fn create_book(
    State(state): State<AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
    JsonBody(book): JsonBody<CreateBook>,
) -> AppResult<(StatusCode, Json<Book>)> {
    book.validate()?;

    let created = state.services.books.create(&book).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// Update a book (only supplied fields change)
#[utoipa::path(
    put,
    path = "/books/{id}",
    tag = "books",
    security(("bearer_auth" = [])),
    params(
        ("id" = i32, Path, description = "Book ID")
    ),
    request_body = UpdateBook,
    responses(
        (status = 200, description = "Book updated", body = Book),
        (status = 400, description = "Invalid input", body = crate::error::ErrorResponse),
        (status = 404, description = "Book not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn update_book(
    State(state): State<AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
    PathParams(id): PathParams<i32>,
    JsonBody(book): JsonBody<UpdateBook>,
) -> AppResult<Json<Book>> {
    book.validate()?;

    let updated = state.services.books.update(id, &book).await?;
    Ok(Json(updated))
}

/// Delete a book
#[utoipa::path(
    delete,
    path = "/books/{id}",
    tag = "books",
    security(("bearer_auth" = [])),
    params(
        ("id" = i32, Path, description = "Book ID")
    ),
    responses(
        (status = 204, description = "Book deleted"),
        (status = 404, description = "Book not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn delete_book(
    State(state): State<AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
    PathParams(id): PathParams<i32>,
) -> AppResult<StatusCode> {
    state.services.books.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Genres assigned to a book
#[utoipa::path(
    get,
    path = "/books/{id}/genres",
    tag = "books",
    params(
        ("id" = i32, Path, description = "Book ID")
    ),
    responses(
        (status = 200, description = "Genres of the book", body = Vec<Genre>),
        (status = 404, description = "Book not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn get_book_genres(
    State(state): State<AppState>,
    PathParams(id): PathParams<i32>,
) -> AppResult<Json<Vec<Genre>>> {
    let genres = state.services.books.genres(id).await?;
    Ok(Json(genres))
}

/// Replace all genres of a book
#[utoipa::path(
    put,
    path = "/books/{id}/genres",
    tag = "books",
    security(("bearer_auth" = [])),
    params(
        ("id" = i32, Path, description = "Book ID")
    ),
    request_body = SetBookGenres,
    responses(
        (status = 200, description = "New genre set", body = Vec<Genre>),
        (status = 404, description = "Book or genre not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn set_book_genres(
    State(state): State<AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
    PathParams(id): PathParams<i32>,
    JsonBody(request): JsonBody<SetBookGenres>,
) -> AppResult<Json<Vec<Genre>>> {
    let genres = state.services.books.set_genres(id, &request.genre_ids).await?;
    Ok(Json(genres))
}

/// Assign one genre to a book
#[utoipa::path(
    post,
    path = "/books/{id}/genres",
    tag = "books",
    security(("bearer_auth" = [])),
    params(
        ("id" = i32, Path, description = "Book ID")
    ),
    request_body = AssignGenre,
    responses(
        (status = 204, description = "Genre assigned"),
        (status = 404, description = "Book or genre not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn add_book_genre(
    State(state): State<AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
    PathParams(id): PathParams<i32>,
    JsonBody(request): JsonBody<AssignGenre>,
) -> AppResult<StatusCode> {
    state.services.books.add_genre(id, request.genre_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Remove a genre from a book
#[utoipa::path(
    delete,
    path = "/books/{id}/genres/{genre_id}",
    tag = "books",
    security(("bearer_auth" = [])),
    params(
        ("id" = i32, Path, description = "Book ID"),
        ("genre_id" = i32, Path, description = "Genre ID")
    ),
    responses(
        (status = 204, description = "Genre removed"),
        (status = 404, description = "Genre is not assigned to this book", body = crate::error::ErrorResponse)
    )
)]
pub async fn remove_book_genre(
    State(state): State<AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
    PathParams((id, genre_id)): PathParams<(i32, i32)>,
) -> AppResult<StatusCode> {
    state.services.books.remove_genre(id, genre_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
