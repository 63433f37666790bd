//! Reading list service: ownership and visibility rules live here

use crate::{
    error::{AppError, AppResult},
    models::{
        pagination::{Page, Pagination},
        reading_list::{
            AddListBook, CreateReadingList, ReadingList, ReadingListSummary, ReadingListWithBooks,
            UpdateListEntry, UpdateReadingList,
        },
    },
    repository::Repository,
};

#[derive(Clone)]
pub struct ReadingListsService {
    repository: Repository,
}

impl ReadingListsService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// Lists owned by the user
    pub async fn for_user(&self, user_id: i32) -> AppResult<Vec<ReadingListSummary>> {
        self.repository.reading_lists.get_by_user(user_id).await
    }

    pub async fn public(&self, pagination: Pagination) -> AppResult<Page<ReadingListSummary>> {
        let (lists, total) = self.repository.reading_lists.get_public(pagination).await?;
        Ok(Page::new(lists, total, pagination))
    }

    /// A list with its books. Private lists are only visible to their owner.
    pub async fn get(&self, id: i32, viewer: Option<i32>) -> AppResult<ReadingListWithBooks> {
        let list = self
            .repository
            .reading_lists
            .get_with_books(id)
            .await?
            .ok_or_else(|| not_found(id))?;

        if !list.list.is_public && viewer != Some(list.list.user_id) {
            tracing::debug!(list_id = id, viewer = ?viewer, "Private reading list hidden");
            return Err(not_found(id));
        }

        Ok(list)
    }

    pub async fn create(&self, user_id: i32, data: &CreateReadingList) -> AppResult<ReadingList> {
        let list = self.repository.reading_lists.create(user_id, data).await?;
        tracing::info!(
            list_id = list.id,
            user_id,
            books = data.book_ids.len(),
            "Reading list created"
        );
        Ok(list)
    }

    pub async fn update(&self, id: i32, user_id: i32, data: &UpdateReadingList) -> AppResult<ReadingList> {
        self.ensure_owner(id, user_id).await?;
        self.repository
            .reading_lists
            .update(id, data)
            .await?
            .ok_or_else(|| not_found(id))
    }

    pub async fn delete(&self, id: i32, user_id: i32) -> AppResult<()> {
        self.ensure_owner(id, user_id).await?;
        if !self.repository.reading_lists.delete(id).await? {
            return Err(not_found(id));
        }
        tracing::info!(list_id = id, user_id, "Reading list deleted");
        Ok(())
    }

    pub async fn add_book(&self, id: i32, user_id: i32, data: &AddListBook) -> AppResult<()> {
        self.ensure_owner(id, user_id).await?;
        let inserted = self
            .repository
            .reading_lists
            .add_book(id, data.book_id, data.position, data.notes.as_deref())
            .await?;
        if !inserted {
            tracing::debug!(list_id = id, book_id = data.book_id, "Book already in reading list");
        }
        Ok(())
    }

    pub async fn remove_book(&self, id: i32, user_id: i32, book_id: i32) -> AppResult<()> {
        self.ensure_owner(id, user_id).await?;
        if !self.repository.reading_lists.remove_book(id, book_id).await? {
            return Err(AppError::NotFound("Book is not in this reading list".to_string()));
        }
        Ok(())
    }

    pub async fn update_entry(
        &self,
        id: i32,
        user_id: i32,
        book_id: i32,
        data: &UpdateListEntry,
    ) -> AppResult<()> {
        self.ensure_owner(id, user_id).await?;
        let updated = self
            .repository
            .reading_lists
            .update_entry(id, book_id, data.position, data.notes.as_deref())
            .await?;
        if !updated {
            return Err(AppError::NotFound("Book is not in this reading list".to_string()));
        }
        Ok(())
    }

    /// 404 if the list does not exist, 403 if someone else owns it
    async fn ensure_owner(&self, id: i32, user_id: i32) -> AppResult<()> {
        match self.repository.reading_lists.owner_of(id).await? {
            None => Err(not_found(id)),
            Some(owner) if owner == user_id => Ok(()),
            Some(_) => {
                tracing::warn!(list_id = id, user_id, "Reading list ownership check failed");
                Err(AppError::Authorization(
                    "You do not own this reading list".to_string(),
                ))
            }
        }
    }
}

fn not_found(id: i32) -> AppError {
    AppError::NotFound(format!("Reading list with id {} not found", id))
}
