//! Community-list operations.
//!
//! The aggregation engine is the only writer of the ranking itself; users
//! reach community lists to read them and to move views, ratings, and
//! comments. The raw CRUD passthroughs mirror the REST surface.

use std::sync::Arc;

use uuid::Uuid;

use domains::{Comment, CommunityList, CommunityRepo, DomainError, Result};

use crate::rating;

pub struct CommunityService {
    community: Arc<dyn CommunityRepo>,
}

impl CommunityService {
    pub fn new(community: Arc<dyn CommunityRepo>) -> Self {
        Self { community }
    }

    pub async fn get(&self, id: Uuid) -> Result<CommunityList> {
        self.community
            .get_community(id)
            .await?
            .ok_or_else(|| DomainError::NotFound("CommunityList", id.to_string()))
    }

    pub async fn list_all(&self) -> Result<Vec<CommunityList>> {
        self.community.list_all().await
    }

    pub async fn create(&self, list: CommunityList) -> Result<CommunityList> {
        if let Some(existing) = self.community.find_by_name(&list.name).await? {
            return Err(DomainError::Conflict(format!(
                "community list {} already exists",
                existing.name
            )));
        }
        self.community.create_community(list).await
    }

    pub async fn update(&self, list: CommunityList) -> Result<CommunityList> {
        let id = list.id;
        self.community
            .update_community(list)
            .await?
            .ok_or_else(|| DomainError::NotFound("CommunityList", id.to_string()))
    }

    pub async fn delete(&self, id: Uuid) -> Result<()> {
        if !self.community.delete_community(id).await? {
            return Err(DomainError::NotFound("CommunityList", id.to_string()));
        }
        Ok(())
    }

    pub async fn rate(&self, caller: &str, id: Uuid, value: i16) -> Result<()> {
        let list = self.get(id).await?;
        let outcome = rating::transition(list.rating_of(caller), value)?;
        if outcome.is_noop() {
            return Ok(());
        }
        self.community
            .apply_rating(id, caller, outcome.rating, outcome.like_delta, outcome.dislike_delta)
            .await
    }

    pub async fn view(&self, id: Uuid) -> Result<()> {
        self.get(id).await?;
        self.community.bump_views(id).await
    }

    pub async fn comment(&self, caller: &str, id: Uuid, text: String) -> Result<()> {
        if text.trim().is_empty() {
            return Err(DomainError::validation("comment must not be empty"));
        }
        self.get(id).await?;
        self.community
            .push_comment(id, Comment { username: caller.to_string(), text })
            .await
    }
}
