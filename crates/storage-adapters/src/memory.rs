//! In-memory implementation of the persistence ports.
//!
//! Counter mutations happen under the per-entry dashmap guard, so the
//! atomicity contract of the ports holds here the same way the single-
//! statement updates hold it in Postgres.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use dashmap::DashMap;
use uuid::Uuid;

use domains::{
    Comment, CommunityList, CommunityRepo, DomainError, ListRepo, RankedList, Result, ScoredItem,
    User, UserRepo,
};

/// One shared store implementing all three repo ports.
#[derive(Default)]
pub struct MemoryStore {
    users: DashMap<Uuid, User>,
    lists: DashMap<Uuid, RankedList>,
    community: DashMap<Uuid, CommunityList>,
}

impl MemoryStore {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }
}

#[async_trait]
impl UserRepo for MemoryStore {
    async fn create_user(&self, user: User) -> Result<User> {
        self.users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>> {
        Ok(self.users.get(&id).map(|u| u.clone()))
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<User>> {
        Ok(self
            .users
            .iter()
            .find(|u| u.username == username)
            .map(|u| u.clone()))
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>> {
        Ok(self
            .users
            .iter()
            .find(|u| u.email.eq_ignore_ascii_case(email))
            .map(|u| u.clone()))
    }
}

#[async_trait]
impl ListRepo for MemoryStore {
    async fn create_list(&self, list: RankedList) -> Result<RankedList> {
        self.lists.insert(list.id, list.clone());
        Ok(list)
    }

    async fn get_list(&self, id: Uuid) -> Result<Option<RankedList>> {
        Ok(self.lists.get(&id).map(|l| l.clone()))
    }

    async fn update_list(&self, list: RankedList) -> Result<Option<RankedList>> {
        match self.lists.get_mut(&list.id) {
            Some(mut entry) => {
                *entry = list.clone();
                Ok(Some(list))
            }
            None => Ok(None),
        }
    }

    async fn delete_list(&self, id: Uuid) -> Result<bool> {
        Ok(self.lists.remove(&id).is_some())
    }

    async fn list_all(&self) -> Result<Vec<RankedList>> {
        let mut all: Vec<RankedList> = self.lists.iter().map(|l| l.clone()).collect();
        all.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));
        Ok(all)
    }

    async fn find_published_by_name(&self, name: &str) -> Result<Vec<RankedList>> {
        let mut matching: Vec<RankedList> = self
            .lists
            .iter()
            .filter(|l| l.published && l.same_name(name))
            .map(|l| l.clone())
            .collect();
        // Creation order keeps the aggregation tie-break deterministic.
        matching.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));
        Ok(matching)
    }

    async fn bump_views(&self, id: Uuid) -> Result<()> {
        let mut entry = self
            .lists
            .get_mut(&id)
            .ok_or_else(|| DomainError::NotFound("Top5List", id.to_string()))?;
        entry.views += 1;
        entry.updated_at = Utc::now();
        Ok(())
    }

    async fn apply_rating(
        &self,
        id: Uuid,
        username: &str,
        rating: i16,
        like_delta: i64,
        dislike_delta: i64,
    ) -> Result<()> {
        let mut entry = self
            .lists
            .get_mut(&id)
            .ok_or_else(|| DomainError::NotFound("Top5List", id.to_string()))?;
        entry.ratings.insert(username.to_string(), rating);
        entry.likes += like_delta;
        entry.dislikes += dislike_delta;
        entry.updated_at = Utc::now();
        Ok(())
    }

    async fn push_comment(&self, id: Uuid, comment: Comment) -> Result<()> {
        let mut entry = self
            .lists
            .get_mut(&id)
            .ok_or_else(|| DomainError::NotFound("Top5List", id.to_string()))?;
        entry.comments.insert(0, comment);
        entry.updated_at = Utc::now();
        Ok(())
    }
}

#[async_trait]
impl CommunityRepo for MemoryStore {
    async fn create_community(&self, list: CommunityList) -> Result<CommunityList> {
        self.community.insert(list.id, list.clone());
        Ok(list)
    }

    async fn get_community(&self, id: Uuid) -> Result<Option<CommunityList>> {
        Ok(self.community.get(&id).map(|l| l.clone()))
    }

    async fn find_by_name(&self, name: &str) -> Result<Option<CommunityList>> {
        Ok(self
            .community
            .iter()
            .find(|l| l.name.eq_ignore_ascii_case(name))
            .map(|l| l.clone()))
    }

    async fn list_all(&self) -> Result<Vec<CommunityList>> {
        let mut all: Vec<CommunityList> = self.community.iter().map(|l| l.clone()).collect();
        all.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));
        Ok(all)
    }

    async fn replace_items(&self, id: Uuid, items: Vec<ScoredItem>) -> Result<()> {
        let mut entry = self
            .community
            .get_mut(&id)
            .ok_or_else(|| DomainError::NotFound("CommunityList", id.to_string()))?;
        entry.items = items;
        entry.updated_at = Utc::now();
        Ok(())
    }

    async fn update_community(&self, list: CommunityList) -> Result<Option<CommunityList>> {
        match self.community.get_mut(&list.id) {
            Some(mut entry) => {
                *entry = list.clone();
                Ok(Some(list))
            }
            None => Ok(None),
        }
    }

    async fn delete_community(&self, id: Uuid) -> Result<bool> {
        Ok(self.community.remove(&id).is_some())
    }

    async fn bump_views(&self, id: Uuid) -> Result<()> {
        let mut entry = self
            .community
            .get_mut(&id)
            .ok_or_else(|| DomainError::NotFound("CommunityList", id.to_string()))?;
        entry.views += 1;
        entry.updated_at = Utc::now();
        Ok(())
    }

    async fn apply_rating(
        &self,
        id: Uuid,
        username: &str,
        rating: i16,
        like_delta: i64,
        dislike_delta: i64,
    ) -> Result<()> {
        let mut entry = self
            .community
            .get_mut(&id)
            .ok_or_else(|| DomainError::NotFound("CommunityList", id.to_string()))?;
        entry.ratings.insert(username.to_string(), rating);
        entry.likes += like_delta;
        entry.dislikes += dislike_delta;
        entry.updated_at = Utc::now();
        Ok(())
    }

    async fn push_comment(&self, id: Uuid, comment: Comment) -> Result<()> {
        let mut entry = self
            .community
            .get_mut(&id)
            .ok_or_else(|| DomainError::NotFound("CommunityList", id.to_string()))?;
        entry.comments.insert(0, comment);
        entry.updated_at = Utc::now();
        Ok(())
    }
}
