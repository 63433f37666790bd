//! Book catalog service

use crate::{
    error::{AppError, AppResult},
    models::{
        book::{Book, BookDetails, BookQuery, CreateBook, UpdateBook},
        genre::Genre,
        pagination::{Page, Pagination},
    },
    repository::Repository,
};

#[derive(Clone)]
pub struct BooksService {
    repository: Repository,
}

impl BooksService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    pub async fn list(&self, query: &BookQuery, pagination: Pagination) -> AppResult<Page<Book>> {
        let (books, total) = self.repository.books.list(query, pagination).await?;
        Ok(Page::new(books, total, pagination))
    }

    pub async fn get(&self, id: i32) -> AppResult<Book> {
        self.repository
            .books
            .get_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Book with id {} not found", id)))
    }

    /// Book with its genres
    pub async fn get_details(&self, id: i32) -> AppResult<BookDetails> {
        let book = self.get(id).await?;
        let genres = self.repository.books.genres_for_book(id).await?;
        Ok(BookDetails { book, genres })
    }

    pub async fn create(&self, data: &CreateBook) -> AppResult<Book> {
        let book = self.repository.books.create(data).await?;
        tracing::info!(book_id = book.id, title = %book.title, "Book created");
        Ok(book)
    }

    pub async fn update(&self, id: i32, data: &UpdateBook) -> AppResult<Book> {
        self.repository
            .books
            .update(id, data)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Book with id {} not found", id)))
    }

    pub async fn delete(&self, id: i32) -> AppResult<()> {
        if !self.repository.books.delete(id).await? {
            return Err(AppError::NotFound(format!("Book with id {} not found", id)));
        }
        tracing::info!(book_id = id, "Book deleted");
        Ok(())
    }

    // =========================================================================
    // GENRES
    // =========================================================================

    pub async fn genres(&self, book_id: i32) -> AppResult<Vec<Genre>> {
        self.ensure_exists(book_id).await?;
        self.repository.books.genres_for_book(book_id).await
    }

    pub async fn add_genre(&self, book_id: i32, genre_id: i32) -> AppResult<()> {
        self.repository.books.add_genre(book_id, genre_id).await
    }

    pub async fn remove_genre(&self, book_id: i32, genre_id: i32) -> AppResult<()> {
        if !self.repository.books.remove_genre(book_id, genre_id).await? {
            return Err(AppError::NotFound("Genre is not assigned to this book".to_string()));
        }
        Ok(())
    }

    /// Replace the book's genres and return the new set
    pub async fn set_genres(&self, book_id: i32, genre_ids: &[i32]) -> AppResult<Vec<Genre>> {
        self.ensure_exists(book_id).await?;
        self.repository.books.set_genres(book_id, genre_ids).await?;
        self.repository.books.genres_for_book(book_id).await
    }

    async fn ensure_exists(&self, id: i32) -> AppResult<()> {
        if !self.repository.books.exists(id).await? {
            return Err(AppError::NotFound(format!("Book with id {} not found", id)));
        }
        Ok(())
    }
}
