//! Reading status service

use crate::{
    error::{AppError, AppResult},
    models::{
        pagination::{Page, Pagination},
        user_book::{ReadingStatus, StatusCount, UserBook, UserBookEntry},
    },
    repository::Repository,
};

#[derive(Clone)]
pub struct UserBooksService {
    repository: Repository,
}

impl UserBooksService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    pub async fn get(&self, user_id: i32, book_id: i32) -> AppResult<UserBook> {
        self.repository
            .user_books
            .get(user_id, book_id)
            .await?
            .ok_or_else(|| AppError::NotFound("No reading status for this book".to_string()))
    }

    pub async fn set_status(&self, user_id: i32, book_id: i32, status: ReadingStatus) -> AppResult<UserBook> {
        let row = self.repository.user_books.set_status(user_id, book_id, status).await?;
        tracing::debug!(user_id, book_id, status = %status, "Reading status set");
        Ok(row)
    }

    pub async fn remove(&self, user_id: i32, book_id: i32) -> AppResult<()> {
        if !self.repository.user_books.remove(user_id, book_id).await? {
            return Err(AppError::NotFound("No reading status for this book".to_string()));
        }
        Ok(())
    }

    pub async fn list(
        &self,
        user_id: i32,
        status: Option<ReadingStatus>,
        pagination: Pagination,
    ) -> AppResult<Page<UserBookEntry>> {
        let (entries, total) = self
            .repository
            .user_books
            .books_with_status(user_id, status, pagination)
            .await?;
        Ok(Page::new(entries, total, pagination))
    }

    pub async fn read_books(&self, user_id: i32, pagination: Pagination) -> AppResult<Page<UserBookEntry>> {
        let (entries, total) = self
            .repository
            .user_books
            .read_books_with_pagination(user_id, pagination)
            .await?;
        Ok(Page::new(entries, total, pagination))
    }

    pub async fn stats(&self, user_id: i32) -> AppResult<Vec<StatusCount>> {
        self.repository.user_books.status_counts(user_id).await
    }
}
