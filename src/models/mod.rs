//! Data models for Bookshelf

pub mod book;
pub mod genre;
pub mod pagination;
pub mod reading_list;
pub mod user;
pub mod user_book;
pub mod validation;

// Re-export commonly used types
pub use book::{Book, BookDetails};
pub use genre::Genre;
pub use pagination::{Page, Pagination};
pub use reading_list::{ReadingList, ReadingListSummary, ReadingListWithBooks};
pub use user::{SessionClaims, User};
pub use user_book::{ReadingStatus, UserBook, UserBookEntry};
