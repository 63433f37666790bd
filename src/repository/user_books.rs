//! User/book reading status repository

use chrono::{DateTime, Utc};
use sqlx::{FromRow, Pool, Postgres};

use crate::{
    error::AppResult,
    models::{
        book::Book,
        pagination::Pagination,
        user_book::{ReadingStatus, StatusCount, UserBook, UserBookEntry},
    },
};

use super::{books::BOOK_COLUMNS, owner_or_not_found_on_fk};

const OWNER_FK: &str = "user_books_user_id_fkey";

#[derive(FromRow)]
struct EntryRow {
    status: ReadingStatus,
    status_updated_at: DateTime<Utc>,
    #[sqlx(flatten)]
    book: Book,
}

impl From<EntryRow> for UserBookEntry {
    fn from(row: EntryRow) -> Self {
        Self {
            status: row.status,
            updated_at: row.status_updated_at,
            book: row.book,
        }
    }
}

#[derive(Clone)]
pub struct UserBooksRepository {
    pool: Pool<Postgres>,
}

impl UserBooksRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    pub async fn get(&self, user_id: i32, book_id: i32) -> AppResult<Option<UserBook>> {
        let row = sqlx::query_as::<_, UserBook>(
            r#"
            SELECT user_id, book_id, status, created_at, updated_at
            FROM user_books WHERE user_id = $1 AND book_id = $2
            "#,
        )
        .bind(user_id)
        .bind(book_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    /// Insert or replace the status for a (user, book) pair
    pub async fn set_status(
        &self,
        user_id: i32,
        book_id: i32,
        status: ReadingStatus,
    ) -> AppResult<UserBook> {
        let row = sqlx::query_as::<_, UserBook>(
            r#"
            INSERT INTO user_books (user_id, book_id, status, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $4)
            ON CONFLICT (user_id, book_id)
            DO UPDATE SET status = EXCLUDED.status, updated_at = EXCLUDED.updated_at
            RETURNING user_id, book_id, status, created_at, updated_at
            "#,
        )
        .bind(user_id)
        .bind(book_id)
        .bind(status)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await
        .map_err(owner_or_not_found_on_fk(OWNER_FK, "Book not found"))?;

        Ok(row)
    }

    pub async fn remove(&self, user_id: i32, book_id: i32) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM user_books WHERE user_id = $1 AND book_id = $2")
            .bind(user_id)
            .bind(book_id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// A user's books with their status, most recently changed first
    pub async fn books_with_status(
        &self,
        user_id: i32,
        status: Option<ReadingStatus>,
        pagination: Pagination,
    ) -> AppResult<(Vec<UserBookEntry>, i64)> {
        let status_filter = if status.is_some() { "AND ub.status = $2" } else { "" };

        let count_query = format!(
            "SELECT COUNT(*) FROM user_books ub WHERE ub.user_id = $1 {}",
            status_filter
        );
        let mut count_builder = sqlx::query_scalar::<_, i64>(&count_query).bind(user_id);
        if let Some(status) = status {
            count_builder = count_builder.bind(status);
        }
        let total = count_builder.fetch_one(&self.pool).await?;

        let (limit_idx, offset_idx) = if status.is_some() { (3, 4) } else { (2, 3) };
        let select_query = format!(
            r#"
            SELECT ub.status, ub.updated_at AS status_updated_at, {}
            FROM user_books ub
            JOIN books b ON b.id = ub.book_id
            WHERE ub.user_id = $1 {}
            ORDER BY ub.updated_at DESC, b.id
            LIMIT ${} OFFSET ${}
            "#,
            BOOK_COLUMNS, status_filter, limit_idx, offset_idx
        );
        let mut builder = sqlx::query_as::<_, EntryRow>(&select_query).bind(user_id);
        if let Some(status) = status {
            builder = builder.bind(status);
        }
        let rows = builder
            .bind(pagination.limit)
            .bind(pagination.offset())
            .fetch_all(&self.pool)
            .await?;

        Ok((rows.into_iter().map(UserBookEntry::from).collect(), total))
    }

    /// Books the user has marked as read
    pub async fn read_books_with_pagination(
        &self,
        user_id: i32,
        pagination: Pagination,
    ) -> AppResult<(Vec<UserBookEntry>, i64)> {
        self.books_with_status(user_id, Some(ReadingStatus::Read), pagination)
            .await
    }

    /// Number of books per status for a user (statuses with no books are omitted)
    pub async fn status_counts(&self, user_id: i32) -> AppResult<Vec<StatusCount>> {
        let counts = sqlx::query_as::<_, StatusCount>(
            r#"
            SELECT status, COUNT(*) AS count
            FROM user_books WHERE user_id = $1
            GROUP BY status ORDER BY status
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(counts)
    }
}
