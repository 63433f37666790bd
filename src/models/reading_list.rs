//! Reading list model and related types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

use super::{book::Book, validation::not_blank};

/// Reading list record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct ReadingList {
    pub id: i32,
    pub name: String,
    pub description: Option<String>,
    pub is_public: bool,
    /// Owner, fixed at creation
    pub user_id: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Reading list with its book count, for listings
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
pub struct ReadingListSummary {
    pub id: i32,
    pub name: String,
    pub description: Option<String>,
    pub is_public: bool,
    pub user_id: i32,
    pub book_count: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// One book inside a reading list
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ReadingListEntry {
    pub position: i32,
    pub notes: Option<String>,
    pub added_at: DateTime<Utc>,
    pub book: Book,
}

/// Reading list with its ordered books
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ReadingListWithBooks {
    #[serde(flatten)]
    pub list: ReadingList,
    pub books: Vec<ReadingListEntry>,
}

/// Create reading list request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateReadingList {
    #[validate(
        custom(function = "not_blank", message = "List name is required"),
        length(max = 200, message = "List name must be at most 200 characters")
    )]
    pub name: String,
    pub description: Option<String>,
    #[serde(default)]
    pub is_public: bool,
    /// Books to add, in order, in the same transaction as the list
    #[serde(default)]
    pub book_ids: Vec<i32>,
}

/// Update reading list request (ownership is not writable)
#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateReadingList {
    #[validate(
        custom(function = "not_blank", message = "List name must not be blank"),
        length(max = 200, message = "List name must be at most 200 characters")
    )]
    pub name: Option<String>,
    pub description: Option<String>,
    pub is_public: Option<bool>,
}

/// Add a book to a list
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct AddListBook {
    pub book_id: i32,
    /// Defaults to the end of the list
    #[validate(range(min = 0, message = "Position must not be negative"))]
    pub position: Option<i32>,
    pub notes: Option<String>,
}

/// Remove a book from a list
#[derive(Debug, Deserialize, ToSchema)]
pub struct RemoveListBook {
    pub book_id: i32,
}

/// Update a list entry's position or notes
#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateListEntry {
    #[validate(range(min = 0, message = "Position must not be negative"))]
    pub position: Option<i32>,
    pub notes: Option<String>,
}
