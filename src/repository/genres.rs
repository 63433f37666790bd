//! Genres repository

use chrono::Utc;
use sqlx::{Pool, Postgres};

use crate::{
    error::AppResult,
    models::genre::{CreateGenre, Genre, UpdateGenre},
};

use super::conflict_on_unique;

#[derive(Clone)]
pub struct GenresRepository {
    pool: Pool<Postgres>,
}

impl GenresRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// All genres ordered by name
    pub async fn get_all(&self) -> AppResult<Vec<Genre>> {
        let genres = sqlx::query_as::<_, Genre>(
            "SELECT id, name, description, created_at, updated_at FROM genres ORDER BY name",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(genres)
    }

    pub async fn get_by_id(&self, id: i32) -> AppResult<Option<Genre>> {
        let genre = sqlx::query_as::<_, Genre>(
            "SELECT id, name, description, created_at, updated_at FROM genres WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(genre)
    }

    /// Case-sensitive lookup by name
    pub async fn get_by_name(&self, name: &str) -> AppResult<Option<Genre>> {
        let genre = sqlx::query_as::<_, Genre>(
            "SELECT id, name, description, created_at, updated_at FROM genres WHERE name = $1",
        )
        .bind(name)
        .fetch_optional(&self.pool)
        .await?;
        Ok(genre)
    }

    /// Check whether another genre already uses this name
    pub async fn check_duplicate(&self, name: &str, exclude_id: Option<i32>) -> AppResult<bool> {
        let exists: bool = if let Some(id) = exclude_id {
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM genres WHERE name = $1 AND id != $2)")
                .bind(name)
                .bind(id)
                .fetch_one(&self.pool)
                .await?
        } else {
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM genres WHERE name = $1)")
                .bind(name)
                .fetch_one(&self.pool)
                .await?
        };
        Ok(exists)
    }

    pub async fn create(&self, data: &CreateGenre) -> AppResult<Genre> {
        let now = Utc::now();

        let genre = sqlx::query_as::<_, Genre>(
            r#"
            INSERT INTO genres (name, description, created_at, updated_at)
            VALUES ($1, $2, $3, $3)
            RETURNING id, name, description, created_at, updated_at
            "#,
        )
        .bind(data.name.trim())
        .bind(&data.description)
        .bind(now)
        .fetch_one(&self.pool)
        .await
        .map_err(conflict_on_unique("Genre name already exists"))?;

        Ok(genre)
    }

    pub async fn update(&self, id: i32, data: &UpdateGenre) -> AppResult<Option<Genre>> {
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

        let query = format!(
            "UPDATE genres SET {} WHERE id = ${} RETURNING id, name, description, created_at, updated_at",
            sets.join(", "),
            idx
        );

        let mut builder = sqlx::query_as::<_, Genre>(&query).bind(now);
        if let Some(ref name) = data.name {
            builder = builder.bind(name.trim());
        }
        if let Some(ref description) = data.description {
            builder = builder.bind(description);
        }

        let genre = builder
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(conflict_on_unique("Genre name already exists"))?;
        Ok(genre)
    }

    /// Delete a genre; its book links cascade
    pub async fn delete(&self, id: i32) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM genres WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
