//! Business logic services

pub mod books;
pub mod genres;
pub mod reading_lists;
pub mod user_books;
pub mod users;

use crate::{config::AuthConfig, repository::Repository};

/// Container for all services
#[derive(Clone)]
pub struct Services {
    pub repository: Repository,
    pub users: users::UsersService,
    pub books: books::BooksService,
    pub genres: genres::GenresService,
    pub reading_lists: reading_lists::ReadingListsService,
    pub user_books: user_books::UserBooksService,
}

impl Services {
    /// Create all services with the given repository
    pub fn new(repository: Repository, auth_config: AuthConfig) -> Self {
        Self {
            users: users::UsersService::new(repository.clone(), auth_config),
            books: books::BooksService::new(repository.clone()),
            genres: genres::GenresService::new(repository.clone()),
            reading_lists: reading_lists::ReadingListsService::new(repository.clone()),
            user_books: user_books::UserBooksService::new(repository.clone()),
            repository,
        }
    }
}
