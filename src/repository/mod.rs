//! Repository layer for database operations

pub mod books;
pub mod genres;
pub mod reading_lists;
pub mod user_books;
pub mod users;

use sqlx::{Pool, Postgres};

use crate::error::AppError;

/// Main repository struct holding database connection pool
#[derive(Clone)]
pub struct Repository {
    pub pool: Pool<Postgres>,
    pub users: users::UsersRepository,
    pub books: books::BooksRepository,
    pub genres: genres::GenresRepository,
    pub reading_lists: reading_lists::ReadingListsRepository,
    pub user_books: user_books::UserBooksRepository,
}

impl Repository {
    /// Create a new repository with the given database pool
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self {
            users: users::UsersRepository::new(pool.clone()),
            books: books::BooksRepository::new(pool.clone()),
            genres: genres::GenresRepository::new(pool.clone()),
            reading_lists: reading_lists::ReadingListsRepository::new(pool.clone()),
            user_books: user_books::UserBooksRepository::new(pool.clone()),
            pool,
        }
    }

    /// Round-trip a trivial query (readiness probe)
    pub async fn ping(&self) -> Result<(), sqlx::Error> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}

/// Map a unique-constraint violation to a conflict, anything else stays a database error
pub(crate) fn conflict_on_unique(message: &'static str) -> impl FnOnce(sqlx::Error) -> AppError {
    move |e| match &e {
        sqlx::Error::Database(db) if db.is_unique_violation() => {
            AppError::Conflict(message.to_string())
        }
        _ => AppError::Database(e),
    }
}

/// Map a foreign-key violation (unknown referenced row) to not found
pub(crate) fn not_found_on_fk(message: &'static str) -> impl FnOnce(sqlx::Error) -> AppError {
    move |e| match &e {
        sqlx::Error::Database(db) if db.is_foreign_key_violation() => {
            AppError::NotFound(message.to_string())
        }
        _ => AppError::Database(e),
    }
}

/// Like `not_found_on_fk`, except a violation of `owner_fk` means the session outlived its account
pub(crate) fn owner_or_not_found_on_fk(
    owner_fk: &'static str,
    message: &'static str,
) -> impl FnOnce(sqlx::Error) -> AppError {
    move |e| match &e {
        sqlx::Error::Database(db) if db.is_foreign_key_violation() => {
            if db.constraint() == Some(owner_fk) {
                AppError::Authentication("Account no longer exists".to_string())
            } else {
                AppError::NotFound(message.to_string())
            }
        }
        _ => AppError::Database(e),
    }
}

#[cfg(test)]
mod tests {
    use std::{borrow::Cow, error::Error as StdError, fmt};

    use sqlx::error::{DatabaseError, ErrorKind};

    use super::*;

    #[derive(Debug)]
    struct ConstraintError {
        foreign_key: bool,
        constraint: &'static str,
    }

    impl fmt::Display for ConstraintError {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            write!(f, "violates constraint {}", self.constraint)
        }
    }

    impl StdError for ConstraintError {}

    impl DatabaseError for ConstraintError {
        fn message(&self) -> &str {
            "constraint violation"
        }

        fn code(&self) -> Option<Cow<'_, str>> {
            Some(Cow::Borrowed(if self.foreign_key { "23503" } else { "23505" }))
        }

        fn constraint(&self) -> Option<&str> {
            Some(self.constraint)
        }

        fn as_error(&self) -> &(dyn StdError + Send + Sync + 'static) {
            self
        }

        fn as_error_mut(&mut self) -> &mut (dyn StdError + Send + Sync + 'static) {
            self
        }

        fn into_error(self: Box<Self>) -> Box<dyn StdError + Send + Sync + 'static> {
            self
        }

        fn kind(&self) -> ErrorKind {
            if self.foreign_key {
                ErrorKind::ForeignKeyViolation
            } else {
                ErrorKind::UniqueViolation
            }
        }
    }

    fn fk_violation(constraint: &'static str) -> sqlx::Error {
        sqlx::Error::Database(Box::new(ConstraintError { foreign_key: true, constraint }))
    }

    #[test]
    fn test_owner_fk_maps_to_authentication() {
        let map = owner_or_not_found_on_fk("user_books_user_id_fkey", "Book not found");
        assert!(matches!(
            map(fk_violation("user_books_user_id_fkey")),
            AppError::Authentication(_)
        ));
    }

    #[test]
    fn test_other_fk_maps_to_not_found() {
        let map = owner_or_not_found_on_fk("user_books_user_id_fkey", "Book not found");
        match map(fk_violation("user_books_book_id_fkey")) {
            AppError::NotFound(message) => assert_eq!(message, "Book not found"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_unique_violation_is_not_an_fk_error() {
        let unique = sqlx::Error::Database(Box::new(ConstraintError {
            foreign_key: false,
            constraint: "genres_name_key",
        }));
        let map = owner_or_not_found_on_fk("user_books_user_id_fkey", "Book not found");
        assert!(matches!(map(unique), AppError::Database(_)));

        let unique = sqlx::Error::Database(Box::new(ConstraintError {
            foreign_key: false,
            constraint: "genres_name_key",
        }));
        assert!(matches!(
            conflict_on_unique("Genre name already exists")(unique),
            AppError::Conflict(_)
        ));
    }

    #[test]
    fn test_row_not_found_stays_database_error() {
        assert!(matches!(
            not_found_on_fk("Book not found")(sqlx::Error::RowNotFound),
            AppError::Database(_)
        ));
    }
}
