//! Genre service

use crate::{
    error::{AppError, AppResult},
    models::{
        book::{Book, BookQuery},
        genre::{CreateGenre, Genre, UpdateGenre},
        pagination::{Page, Pagination},
    },
    repository::Repository,
};

#[derive(Clone)]
pub struct GenresService {
    repository: Repository,
}

impl GenresService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    pub async fn list(&self) -> AppResult<Vec<Genre>> {
        self.repository.genres.get_all().await
    }

    pub async fn get(&self, id: i32) -> AppResult<Genre> {
        self.repository
            .genres
            .get_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Genre with id {} not found", id)))
    }

    pub async fn create(&self, data: &CreateGenre) -> AppResult<Genre> {
        if self.repository.genres.check_duplicate(data.name.trim(), None).await? {
            return Err(AppError::Conflict("Genre name already exists".to_string()));
        }
        let genre = self.repository.genres.create(data).await?;
        tracing::info!(genre_id = genre.id, name = %genre.name, "Genre created");
        Ok(genre)
    }

    pub async fn update(&self, id: i32, data: &UpdateGenre) -> AppResult<Genre> {
        if let Some(ref name) = data.name {
            if self.repository.genres.check_duplicate(name.trim(), Some(id)).await? {
                return Err(AppError::Conflict("Genre name already exists".to_string()));
            }
        }

        self.repository
            .genres
            .update(id, data)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Genre with id {} not found", id)))
    }

    pub async fn delete(&self, id: i32) -> AppResult<()> {
        if !self.repository.genres.delete(id).await? {
            return Err(AppError::NotFound(format!("Genre with id {} not found", id)));
        }
        tracing::info!(genre_id = id, "Genre deleted");
        Ok(())
    }

    /// Books assigned to a genre
    pub async fn books(&self, id: i32, query: &BookQuery, pagination: Pagination) -> AppResult<Page<Book>> {
        self.get(id).await?;
        let (books, total) = self.repository.books.list_by_genre(id, query, pagination).await?;
        Ok(Page::new(books, total, pagination))
    }
}
