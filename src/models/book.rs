//! Book model and related types

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use super::{
    genre::Genre,
    pagination::{Pagination, SortOrder},
    validation::{not_blank, valid_isbn},
};
use crate::config::PaginationConfig;

/// Book record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Book {
    pub id: i32,
    pub title: String,
    pub author: String,
    /// Year of first publication
    pub year: Option<i32>,
    pub description: Option<String>,
    /// Normalized ISBN-10 or ISBN-13 (no separators)
    pub isbn: Option<String>,
    pub page_count: Option<i32>,
    pub language: Option<String>,
    pub publisher: Option<String>,
    pub cover_image_url: Option<String>,
    pub publication_date: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Book with its assigned genres
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct BookDetails {
    #[serde(flatten)]
    pub book: Book,
    pub genres: Vec<Genre>,
}

/// Create book request
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateBook {
    #[validate(custom(function = "not_blank", message = "Title is required"))]
    pub title: String,
    #[validate(custom(function = "not_blank", message = "Author is required"))]
    pub author: String,
    #[validate(range(min = 0, max = 9999, message = "Year must be between 0 and 9999"))]
    pub year: Option<i32>,
    pub description: Option<String>,
    #[validate(custom(function = "valid_isbn"))]
    pub isbn: Option<String>,
    #[validate(range(min = 1, message = "Page count must be positive"))]
    pub page_count: Option<i32>,
    #[validate(length(max = 32, message = "Language must be at most 32 characters"))]
    pub language: Option<String>,
    pub publisher: Option<String>,
    #[validate(url(message = "Cover image URL must be a valid URL"))]
    pub cover_image_url: Option<String>,
    /// Publication date (YYYY-MM-DD)
    pub publication_date: Option<NaiveDate>,
}

/// Update book request, only present fields are written
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateBook {
    #[validate(custom(function = "not_blank", message = "Title must not be blank"))]
    pub title: Option<String>,
    #[validate(custom(function = "not_blank", message = "Author must not be blank"))]
    pub author: Option<String>,
    #[validate(range(min = 0, max = 9999, message = "Year must be between 0 and 9999"))]
    pub year: Option<i32>,
    pub description: Option<String>,
    #[validate(custom(function = "valid_isbn"))]
    pub isbn: Option<String>,
    #[validate(range(min = 1, message = "Page count must be positive"))]
    pub page_count: Option<i32>,
    #[validate(length(max = 32, message = "Language must be at most 32 characters"))]
    pub language: Option<String>,
    pub publisher: Option<String>,
    #[validate(url(message = "Cover image URL must be a valid URL"))]
    pub cover_image_url: Option<String>,
    pub publication_date: Option<NaiveDate>,
}

/// Columns a book listing may be sorted by
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum BookSortField {
    #[default]
    Title,
    Author,
    Year,
    #[serde(alias = "pageCount")]
    PageCount,
    #[serde(alias = "createdAt")]
    CreatedAt,
    #[serde(alias = "publicationDate")]
    PublicationDate,
}

impl BookSortField {
    pub fn column(&self) -> &'static str {
        match self {
            BookSortField::Title => "b.title",
            BookSortField::Author => "b.author",
            BookSortField::Year => "b.year",
            BookSortField::PageCount => "b.page_count",
            BookSortField::CreatedAt => "b.created_at",
            BookSortField::PublicationDate => "b.publication_date",
        }
    }
}

/// Book list query parameters
#[derive(Debug, Default, Deserialize, IntoParams, ToSchema)]
#[into_params(parameter_in = Query)]
pub struct BookQuery {
    /// Page number (1-based)
    pub page: Option<i64>,
    /// Items per page
    pub limit: Option<i64>,
    #[serde(default, alias = "sortBy")]
    pub sort_by: BookSortField,
    #[serde(default, alias = "sortOrder")]
    pub sort_order: SortOrder,
    /// Case-insensitive match against title or author
    pub search: Option<String>,
}

impl BookQuery {
    pub fn pagination(&self, config: &PaginationConfig) -> Pagination {
        Pagination::new(self.page, self.limit, config)
    }

    /// ORDER BY clause built only from allow-listed columns
    pub fn order_clause(&self) -> String {
        format!(
            "{} {} NULLS LAST, b.id ASC",
            self.sort_by.column(),
            self.sort_order.as_sql()
        )
    }
}

/// Replace-all genre assignment request
#[derive(Debug, Deserialize, ToSchema)]
pub struct SetBookGenres {
    pub genre_ids: Vec<i32>,
}

/// Single genre assignment request
#[derive(Debug, Deserialize, ToSchema)]
pub struct AssignGenre {
    pub genre_id: i32,
}
