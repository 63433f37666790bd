//! Reading lists repository

use chrono::{DateTime, Utc};
use sqlx::{FromRow, Pool, Postgres};

use crate::{
    error::AppResult,
    models::{
        book::Book,
        pagination::Pagination,
        reading_list::{
            CreateReadingList, ReadingList, ReadingListEntry, ReadingListSummary,
            ReadingListWithBooks, UpdateReadingList,
        },
    },
};

use super::{books::BOOK_COLUMNS, not_found_on_fk, owner_or_not_found_on_fk};

const OWNER_FK: &str = "reading_lists_user_id_fkey";

const LIST_COLUMNS: &str = "id, name, description, is_public, user_id, created_at, updated_at";

const SUMMARY_SELECT: &str = r#"
    SELECT rl.id, rl.name, rl.description, rl.is_public, rl.user_id,
           COUNT(rlb.book_id) AS book_count,
           rl.created_at, rl.updated_at
    FROM reading_lists rl
    LEFT JOIN reading_list_books rlb ON rlb.reading_list_id = rl.id
"#;

#[derive(FromRow)]
struct EntryRow {
    position: i32,
    notes: Option<String>,
    added_at: DateTime<Utc>,
    #[sqlx(flatten)]
    book: Book,
}

impl From<EntryRow> for ReadingListEntry {
    fn from(row: EntryRow) -> Self {
        Self {
            position: row.position,
            notes: row.notes,
            added_at: row.added_at,
            book: row.book,
        }
    }
}

#[derive(Clone)]
pub struct ReadingListsRepository {
    pool: Pool<Postgres>,
}

impl ReadingListsRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    // =========================================================================
    // READ
    // =========================================================================

    pub async fn get_by_id(&self, id: i32) -> AppResult<Option<ReadingList>> {
        let list = sqlx::query_as::<_, ReadingList>(&format!(
            "SELECT {} FROM reading_lists WHERE id = $1",
            LIST_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(list)
    }

    /// Lists owned by a user, most recently updated first
    pub async fn get_by_user(&self, user_id: i32) -> AppResult<Vec<ReadingListSummary>> {
        let lists = sqlx::query_as::<_, ReadingListSummary>(&format!(
            "{} WHERE rl.user_id = $1 GROUP BY rl.id ORDER BY rl.updated_at DESC, rl.id DESC",
            SUMMARY_SELECT
        ))
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(lists)
    }

    /// Public lists of every user, paginated
    pub async fn get_public(&self, pagination: Pagination) -> AppResult<(Vec<ReadingListSummary>, i64)> {
        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM reading_lists WHERE is_public")
            .fetch_one(&self.pool)
            .await?;

        let lists = sqlx::query_as::<_, ReadingListSummary>(&format!(
            "{} WHERE rl.is_public GROUP BY rl.id ORDER BY rl.updated_at DESC, rl.id DESC LIMIT $1 OFFSET $2",
            SUMMARY_SELECT
        ))
        .bind(pagination.limit)
        .bind(pagination.offset())
        .fetch_all(&self.pool)
        .await?;

        Ok((lists, total))
    }

    /// Entries of a list ordered by position, then insertion time
    pub async fn get_entries(&self, list_id: i32) -> AppResult<Vec<ReadingListEntry>> {
        let rows = sqlx::query_as::<_, EntryRow>(&format!(
            r#"
            SELECT rlb.position, rlb.notes, rlb.added_at, {}
            FROM reading_list_books rlb
            JOIN books b ON b.id = rlb.book_id
            WHERE rlb.reading_list_id = $1
            ORDER BY rlb.position, rlb.added_at, b.id
            "#,
            BOOK_COLUMNS
        ))
        .bind(list_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(ReadingListEntry::from).collect())
    }

    pub async fn get_with_books(&self, id: i32) -> AppResult<Option<ReadingListWithBooks>> {
        let Some(list) = self.get_by_id(id).await? else {
            return Ok(None);
        };
        let books = self.get_entries(id).await?;
        Ok(Some(ReadingListWithBooks { list, books }))
    }

    /// Owner of a list, `None` if the list does not exist
    pub async fn owner_of(&self, id: i32) -> AppResult<Option<i32>> {
        let owner = sqlx::query_scalar::<_, i32>("SELECT user_id FROM reading_lists WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(owner)
    }

    pub async fn is_owner(&self, id: i32, user_id: i32) -> AppResult<bool> {
        Ok(self.owner_of(id).await? == Some(user_id))
    }

    // =========================================================================
    // WRITE
    // =========================================================================

    /// Create a list and its initial entries atomically
    pub async fn create(&self, user_id: i32, data: &CreateReadingList) -> AppResult<ReadingList> {
        let now = Utc::now();
        let mut tx = self.pool.begin().await?;

        let list = sqlx::query_as::<_, ReadingList>(&format!(
            r#"
            INSERT INTO reading_lists (name, description, is_public, user_id, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $5)
            RETURNING {}
            "#,
            LIST_COLUMNS
        ))
        .bind(data.name.trim())
        .bind(&data.description)
        .bind(data.is_public)
        .bind(user_id)
        .bind(now)
        .fetch_one(&mut *tx)
        .await
        .map_err(owner_or_not_found_on_fk(OWNER_FK, "User not found"))?;

        for (position, book_id) in data.book_ids.iter().enumerate() {
            sqlx::query(
                r#"
                INSERT INTO reading_list_books (reading_list_id, book_id, position, added_at)
                VALUES ($1, $2, $3, $4)
                ON CONFLICT DO NOTHING
                "#,
            )
            .bind(list.id)
            .bind(book_id)
            .bind(i32::try_from(position).unwrap_or(i32::MAX))
            .bind(now)
            .execute(&mut *tx)
            .await
            .map_err(not_found_on_fk("Book not found"))?;
        }

        tx.commit().await?;
        Ok(list)
    }

    /// Update name, description or visibility. Returns `None` if the list does not exist.
    pub async fn update(&self, id: i32, data: &UpdateReadingList) -> AppResult<Option<ReadingList>> {
        let now = Utc::now();
        let mut sets = vec!["updated_at = $1".to_string()];
        let mut idx = 2;

        macro_rules! add_f {
            ($field:expr, $name:expr) => {
                if $field.is_some() { sets.push(format!("{} = ${}", $name, idx)); idx += 1; }
            };
        }

        add_f!(data.name, "name");
        add_f!(data.description, "description");
        add_f!(data.is_public, "is_public");

        let query = format!(
            "UPDATE reading_lists SET {} WHERE id = ${} RETURNING {}",
            sets.join(", "),
            idx,
            LIST_COLUMNS
        );

        let mut builder = sqlx::query_as::<_, ReadingList>(&query).bind(now);
        if let Some(ref name) = data.name {
            builder = builder.bind(name.trim());
        }
        if let Some(ref description) = data.description {
            builder = builder.bind(description);
        }
        if let Some(is_public) = data.is_public {
            builder = builder.bind(is_public);
        }

        let list = builder.bind(id).fetch_optional(&self.pool).await?;
        Ok(list)
    }

    /// Delete a list; its entries cascade
    pub async fn delete(&self, id: i32) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM reading_lists WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    // =========================================================================
    // ENTRIES
    // =========================================================================

    /// Add a book to a list (no-op if already present). Without a position the book goes last.
    /// Returns whether a new entry was inserted.
    pub async fn add_book(
        &self,
        list_id: i32,
        book_id: i32,
        position: Option<i32>,
        notes: Option<&str>,
    ) -> AppResult<bool> {
        let result = sqlx::query(
            r#"
            INSERT INTO reading_list_books (reading_list_id, book_id, position, notes, added_at)
            VALUES (
                $1, $2,
                COALESCE($3, (SELECT MAX(position) + 1 FROM reading_list_books WHERE reading_list_id = $1), 0),
                $4, $5
            )
            ON CONFLICT DO NOTHING
            "#,
        )
        .bind(list_id)
        .bind(book_id)
        .bind(position)
        .bind(notes)
        .bind(Utc::now())
        .execute(&self.pool)
        .await
        .map_err(not_found_on_fk("Book not found"))?;

        Ok(result.rows_affected() > 0)
    }

    pub async fn remove_book(&self, list_id: i32, book_id: i32) -> AppResult<bool> {
        let result = sqlx::query(
            "DELETE FROM reading_list_books WHERE reading_list_id = $1 AND book_id = $2",
        )
        .bind(list_id)
        .bind(book_id)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Change position and/or notes of an entry. Returns false if the entry does not exist.
    pub async fn update_entry(
        &self,
        list_id: i32,
        book_id: i32,
        position: Option<i32>,
        notes: Option<&str>,
    ) -> AppResult<bool> {
        let result = sqlx::query(
            r#"
            UPDATE reading_list_books
            SET position = COALESCE($3, position),
                notes = COALESCE($4, notes)
            WHERE reading_list_id = $1 AND book_id = $2
            "#,
        )
        .bind(list_id)
        .bind(book_id)
        .bind(position)
        .bind(notes)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }
}
