//! OpenAPI documentation

use axum::Router;
use utoipa::{
    openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    Modify, OpenApi,
};
use utoipa_swagger_ui::SwaggerUi;

use crate::api::{auth, books, genres, health, reading_lists, user_books};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Bookshelf API",
        version = "0.4.0",
        description = "Personal library REST API: books, genres, reading lists and reading status",
        license(name = "AGPL-3.0", url = "https://www.gnu.org/licenses/agpl-3.0.html")
    ),
    servers(
        (url = "/api/v1", description = "API v1")
    ),
    paths(
        // Health
        health::health_check,
        health::readiness_check,
        // Auth
        auth::register,
        auth::login,
        auth::logout,
        auth::me,
        auth::update_profile,
        auth::delete_account,
        // Books
        books::list_books,
        books::get_book,
        books::create_book,
        books::update_book,
        books::delete_book,
        books::get_book_genres,
        books::set_book_genres,
        books::add_book_genre,
        books::remove_book_genre,
        // Genres
        genres::list_genres,
        genres::get_genre,
        genres::create_genre,
        genres::update_genre,
        genres::delete_genre,
        genres::list_genre_books,
        // Reading lists
        reading_lists::my_lists,
        reading_lists::public_lists,
        reading_lists::create_list,
        reading_lists::get_list,
        reading_lists::update_list,
        reading_lists::delete_list,
        reading_lists::add_list_book,
        reading_lists::remove_list_book,
        reading_lists::update_list_entry,
        // Reading status
        user_books::read_books,
        user_books::list_user_books,
        user_books::status_stats,
        user_books::get_status,
        user_books::set_status,
        user_books::remove_status,
    ),
    components(
        schemas(
            // Auth
            auth::AuthResponse,
            crate::models::user::User,
            crate::models::user::RegisterRequest,
            crate::models::user::LoginRequest,
            crate::models::user::UpdateProfile,
            // Books
            crate::models::book::Book,
            crate::models::book::BookDetails,
            crate::models::book::CreateBook,
            crate::models::book::UpdateBook,
            crate::models::book::BookSortField,
            crate::models::book::SetBookGenres,
            crate::models::book::AssignGenre,
            crate::models::pagination::SortOrder,
            // Genres
            crate::models::genre::Genre,
            crate::models::genre::CreateGenre,
            crate::models::genre::UpdateGenre,
            // Reading lists
            crate::models::reading_list::ReadingList,
            crate::models::reading_list::ReadingListSummary,
            crate::models::reading_list::ReadingListEntry,
            crate::models::reading_list::ReadingListWithBooks,
            crate::models::reading_list::CreateReadingList,
            crate::models::reading_list::UpdateReadingList,
            crate::models::reading_list::AddListBook,
            crate::models::reading_list::RemoveListBook,
            crate::models::reading_list::UpdateListEntry,
            // Reading status
            crate::models::user_book::ReadingStatus,
            crate::models::user_book::UserBook,
            crate::models::user_book::UserBookEntry,
            crate::models::user_book::SetStatus,
            crate::models::user_book::StatusCount,
            // Health
            health::HealthResponse,
            // Errors
            crate::error::ErrorResponse,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "auth", description = "Registration, login and profile"),
        (name = "books", description = "Book catalog"),
        (name = "genres", description = "Genres"),
        (name = "reading-lists", description = "Reading lists"),
        (name = "user-books", description = "Per-user reading status")
    )
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

/// Create the OpenAPI documentation router
pub fn create_openapi_router() -> Router {
    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_lists_routes_and_security() {
        let doc = ApiDoc::openapi();
        assert!(doc.paths.paths.contains_key("/books/{id}"));
        assert!(doc.paths.paths.contains_key("/reading-lists/{id}/books/{book_id}"));
        let components = doc.components.expect("components");
        assert!(components.security_schemes.contains_key("bearer_auth"));
    }
}
