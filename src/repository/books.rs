//! Books repository for database operations

use chrono::Utc;
use sqlx::{Pool, Postgres};

use crate::{
    error::AppResult,
    models::{
        book::{Book, BookQuery, CreateBook, UpdateBook},
        genre::Genre,
        pagination::{like_pattern, Pagination},
        validation::normalize_isbn,
    },
};

use super::not_found_on_fk;

pub(crate) const BOOK_COLUMNS: &str = "b.id, b.title, b.author, b.year, b.description, b.isbn, \
    b.page_count, b.language, b.publisher, b.cover_image_url, b.publication_date, \
    b.created_at, b.updated_at";

#[derive(Clone)]
pub struct BooksRepository {
    pool: Pool<Postgres>,
}

impl BooksRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    // =========================================================================
    // READ
    // =========================================================================

    /// Get book by ID
    pub async fn get_by_id(&self, id: i32) -> AppResult<Option<Book>> {
        let book = sqlx::query_as::<_, Book>(&format!(
            "SELECT {} FROM books b WHERE b.id = $1",
            BOOK_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(book)
    }

    /// Get every book, ordered by title
    pub async fn get_all(&self) -> AppResult<Vec<Book>> {
        let books = sqlx::query_as::<_, Book>(&format!(
            "SELECT {} FROM books b ORDER BY b.title, b.id",
            BOOK_COLUMNS
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(books)
    }

    /// Check that a book exists
    pub async fn exists(&self, id: i32) -> AppResult<bool> {
        let exists: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM books WHERE id = $1)")
            .bind(id)
            .fetch_one(&self.pool)
            .await?;
        Ok(exists)
    }

    // =========================================================================
    // SEARCH
    // =========================================================================

    /// Paginated, sorted, searchable listing
    pub async fn list(&self, query: &BookQuery, pagination: Pagination) -> AppResult<(Vec<Book>, i64)> {
        self.search(None, query, pagination).await
    }

    /// Paginated listing restricted to one genre
    pub async fn list_by_genre(
        &self,
        genre_id: i32,
        query: &BookQuery,
        pagination: Pagination,
    ) -> AppResult<(Vec<Book>, i64)> {
        self.search(Some(genre_id), query, pagination).await
    }

    async fn search(
        &self,
        genre_id: Option<i32>,
        query: &BookQuery,
        pagination: Pagination,
    ) -> AppResult<(Vec<Book>, i64)> {
        let pattern = query.search.as_deref().and_then(like_pattern);

        let mut conditions = Vec::new();
        let mut idx = 1;

        let join = if genre_id.is_some() {
            conditions.push(format!("bg.genre_id = ${}", idx));
            idx += 1;
            "JOIN book_genres bg ON bg.book_id = b.id"
        } else {
            ""
        };

        if pattern.is_some() {
            conditions.push(format!("(b.title ILIKE ${} OR b.author ILIKE ${})", idx, idx));
            idx += 1;
        }

        let where_clause = if conditions.is_empty() {
            String::new()
        } else {
            format!("WHERE {}", conditions.join(" AND "))
        };

        // Count total
        let count_query = format!("SELECT COUNT(*) FROM books b {} {}", join, where_clause);
        let mut count_builder = sqlx::query_scalar::<_, i64>(&count_query);
        if let Some(gid) = genre_id {
            count_builder = count_builder.bind(gid);
        }
        if let Some(ref p) = pattern {
            count_builder = count_builder.bind(p);
        }
        let total = count_builder.fetch_one(&self.pool).await?;

        // Fetch page
        let select_query = format!(
            "SELECT {} FROM books b {} {} ORDER BY {} LIMIT ${} OFFSET ${}",
            BOOK_COLUMNS,
            join,
            where_clause,
            query.order_clause(),
            idx,
            idx + 1
        );
        let mut builder = sqlx::query_as::<_, Book>(&select_query);
        if let Some(gid) = genre_id {
            builder = builder.bind(gid);
        }
        if let Some(ref p) = pattern {
            builder = builder.bind(p);
        }
        let books = builder
            .bind(pagination.limit)
            .bind(pagination.offset())
            .fetch_all(&self.pool)
            .await?;

        Ok((books, total))
    }

    // =========================================================================
    // CREATE / UPDATE / DELETE
    // =========================================================================

    /// Create a new book
    pub async fn create(&self, book: &CreateBook) -> AppResult<Book> {
        let now = Utc::now();

        let created = sqlx::query_as::<_, Book>(
            r#"
            INSERT INTO books (
                title, author, year, description, isbn, page_count, language,
                publisher, cover_image_url, publication_date, created_at, updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $11)
            RETURNING id, title, author, year, description, isbn, page_count, language,
                      publisher, cover_image_url, publication_date, created_at, updated_at
            "#,
        )
        .bind(book.title.trim())
        .bind(book.author.trim())
        .bind(book.year)
        .bind(&book.description)
        .bind(book.isbn.as_deref().map(normalize_isbn))
        .bind(book.page_count)
        .bind(&book.language)
        .bind(&book.publisher)
        .bind(&book.cover_image_url)
        .bind(book.publication_date)
        .bind(now)
        .fetch_one(&self.pool)
        .await?;

        Ok(created)
    }

    /// Update only the supplied fields. Returns `None` if the book does not exist.
    pub async fn update(&self, id: i32, book: &UpdateBook) -> AppResult<Option<Book>> {
        let now = Utc::now();

        let mut sets = vec!["updated_at = $1".to_string()];
        let mut param_idx = 2;

        macro_rules! add_field {
            ($field:expr, $name:expr) => {
                if $field.is_some() {
                    sets.push(format!("{} = ${}", $name, param_idx));
                    param_idx += 1;
                }
            };
        }

        add_field!(book.title, "title");
        add_field!(book.author, "author");
        add_field!(book.year, "year");
        add_field!(book.description, "description");
        add_field!(book.isbn, "isbn");
        add_field!(book.page_count, "page_count");
        add_field!(book.language, "language");
        add_field!(book.publisher, "publisher");
        add_field!(book.cover_image_url, "cover_image_url");
        add_field!(book.publication_date, "publication_date");

        let query = format!(
            r#"
            UPDATE books SET {} WHERE id = ${}
            RETURNING id, title, author, year, description, isbn, page_count, language,
                      publisher, cover_image_url, publication_date, created_at, updated_at
            "#,
            sets.join(", "),
            param_idx
        );

        let mut builder = sqlx::query_as::<_, Book>(&query).bind(now);

        macro_rules! bind_field {
            ($field:expr) => {
                if let Some(ref val) = $field {
                    builder = builder.bind(val);
                }
            };
        }

        let title = book.title.as_deref().map(str::trim);
        let author = book.author.as_deref().map(str::trim);
        let isbn = book.isbn.as_deref().map(normalize_isbn);

        bind_field!(title);
        bind_field!(author);
        bind_field!(book.year);
        bind_field!(book.description);
        bind_field!(isbn);
        bind_field!(book.page_count);
        bind_field!(book.language);
        bind_field!(book.publisher);
        bind_field!(book.cover_image_url);
        bind_field!(book.publication_date);

        let updated = builder.bind(id).fetch_optional(&self.pool).await?;
        Ok(updated)
    }

    /// Delete a book; genre links, list entries and reading statuses cascade
    pub async fn delete(&self, id: i32) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM books WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    // =========================================================================
    // GENRE LINKS
    // =========================================================================

    /// Genres assigned to a book, ordered by name
    pub async fn genres_for_book(&self, book_id: i32) -> AppResult<Vec<Genre>> {
        let genres = sqlx::query_as::<_, Genre>(
            r#"
            SELECT g.id, g.name, g.description, g.created_at, g.updated_at
            FROM book_genres bg
            JOIN genres g ON g.id = bg.genre_id
            WHERE bg.book_id = $1
            ORDER BY g.name
            "#,
        )
        .bind(book_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(genres)
    }

    /// Link a genre to a book (no-op if already linked)
    pub async fn add_genre(&self, book_id: i32, genre_id: i32) -> AppResult<()> {
        sqlx::query(
            "INSERT INTO book_genres (book_id, genre_id) VALUES ($1, $2) ON CONFLICT DO NOTHING",
        )
        .bind(book_id)
        .bind(genre_id)
        .execute(&self.pool)
        .await
        .map_err(not_found_on_fk("Book or genre not found"))?;

        Ok(())
    }

    /// Unlink a genre from a book
    pub async fn remove_genre(&self, book_id: i32, genre_id: i32) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM book_genres WHERE book_id = $1 AND genre_id = $2")
            .bind(book_id)
            .bind(genre_id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Replace all genre links of a book in one transaction
    pub async fn set_genres(&self, book_id: i32, genre_ids: &[i32]) -> AppResult<()> {
        let mut tx = self.pool.begin().await?;

        sqlx::query("DELETE FROM book_genres WHERE book_id = $1")
            .bind(book_id)
            .execute(&mut *tx)
            .await?;

        for genre_id in genre_ids {
            sqlx::query(
                "INSERT INTO book_genres (book_id, genre_id) VALUES ($1, $2) ON CONFLICT DO NOTHING",
            )
            .bind(book_id)
            .bind(genre_id)
            .execute(&mut *tx)
            .await
            .map_err(not_found_on_fk("Book or genre not found"))?;
        }

        tx.commit().await?;
        Ok(())
    }
}
