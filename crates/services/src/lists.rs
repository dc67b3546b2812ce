//! Ranked-list operations: CRUD with ownership checks, publish rules, and
//! the counter subresources (views, ratings, comments).

use std::sync::Arc;

use chrono::Utc;
use tracing::info;
use uuid::Uuid;

use domains::{Comment, DomainError, ListRepo, RankedList, Result, LIST_LEN};

use crate::aggregation::AggregationEngine;
use crate::rating;

/// Payload for creating a list. The client sends `Untitled<n>` drafts with
/// placeholder items, but any well-formed draft is accepted.
#[derive(Debug, Clone, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListDraft {
    pub name: String,
    pub items: [String; LIST_LEN],
}

/// Payload for updating a list. A `published: false → true` transition is a
/// publish and must pass the eligibility rules.
#[derive(Debug, Clone, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListUpdate {
    pub name: String,
    pub items: [String; LIST_LEN],
    pub published: bool,
}

pub struct ListService {
    lists: Arc<dyn ListRepo>,
    engine: Arc<AggregationEngine>,
}

impl ListService {
    pub fn new(lists: Arc<dyn ListRepo>, engine: Arc<AggregationEngine>) -> Self {
        Self { lists, engine }
    }

    pub async fn create_list(&self, owner: &str, draft: ListDraft) -> Result<RankedList> {
        if draft.name.trim().is_empty() {
            return Err(DomainError::validation("list name must not be empty"));
        }
        let mut list = RankedList::new(draft.name, owner);
        list.items = draft.items;
        let created = self.lists.create_list(list).await?;
        info!(id = %created.id, owner, "created list");
        Ok(created)
    }

    pub async fn get_list(&self, id: Uuid) -> Result<RankedList> {
        self.lists
            .get_list(id)
            .await?
            .ok_or_else(|| DomainError::NotFound("Top5List", id.to_string()))
    }

    pub async fn list_all(&self) -> Result<Vec<RankedList>> {
        self.lists.list_all().await
    }

    /// Owner-only full update. Publishing stamps the publish date and
    /// triggers reconciliation; renaming or unpublishing a published list
    /// reconciles every affected name.
    pub async fn update_list(&self, caller: &str, id: Uuid, update: ListUpdate) -> Result<RankedList> {
        let current = self.get_owned(caller, id).await?;

        let publishing = update.published && !current.published;
        let unpublishing = !update.published && current.published;
        // Eligibility holds for anything that ends up published, whether
        // this update is the publish itself or an edit afterwards.
        if update.published {
            self.check_publishable(caller, id, &update).await?;
        }

        let mut next = current.clone();
        next.name = update.name;
        next.items = update.items;
        next.published = update.published;
        if publishing {
            next.publish_date = Some(Utc::now());
        } else if unpublishing {
            next.publish_date = None;
        }
        next.updated_at = Utc::now();

        let saved = self
            .lists
            .update_list(next)
            .await?
            .ok_or_else(|| DomainError::NotFound("Top5List", id.to_string()))?;

        // Reconcile under each name whose aggregate may have changed,
        // deduplicated case-insensitively.
        let mut names: Vec<String> = Vec::new();
        if current.published {
            names.push(current.name.clone());
        }
        if saved.published
            && !names.iter().any(|n| n.eq_ignore_ascii_case(&saved.name))
        {
            names.push(saved.name.clone());
        }
        for name in names {
            self.engine.reconcile(&name).await?;
        }

        Ok(saved)
    }

    /// Owner-only delete. Deleting a published list re-aggregates its name,
    /// which removes the community list once no contributors remain.
    pub async fn delete_list(&self, caller: &str, id: Uuid) -> Result<()> {
        let current = self.get_owned(caller, id).await?;
        self.lists.delete_list(id).await?;
        info!(%id, caller, "deleted list");
        if current.published {
            self.engine.reconcile(&current.name).await?;
        }
        Ok(())
    }

    /// Applies the caller's rating transition atomically.
    pub async fn rate_list(&self, caller: &str, id: Uuid, value: i16) -> Result<()> {
        let list = self.get_list(id).await?;
        if !list.published {
            return Err(DomainError::validation("only published lists can be rated"));
        }
        let outcome = rating::transition(list.rating_of(caller), value)?;
        if outcome.is_noop() {
            return Ok(());
        }
        self.lists
            .apply_rating(id, caller, outcome.rating, outcome.like_delta, outcome.dislike_delta)
            .await
    }

    pub async fn view_list(&self, id: Uuid) -> Result<()> {
        // Make sure a missing id surfaces as NotFound, not a silent no-op.
        self.get_list(id).await?;
        self.lists.bump_views(id).await
    }

    pub async fn comment_list(&self, caller: &str, id: Uuid, text: String) -> Result<()> {
        if text.trim().is_empty() {
            return Err(DomainError::validation("comment must not be empty"));
        }
        let list = self.get_list(id).await?;
        if !list.published {
            return Err(DomainError::validation("only published lists can be commented on"));
        }
        self.lists
            .push_comment(id, Comment { username: caller.to_string(), text })
            .await
    }

    async fn get_owned(&self, caller: &str, id: Uuid) -> Result<RankedList> {
        let list = self.get_list(id).await?;
        if list.owner_username != caller {
            return Err(DomainError::unauthorized("not the list owner"));
        }
        Ok(list)
    }

    /// Publish eligibility: name and items start alphanumeric, items are
    /// distinct (case-insensitive), and the owner has no other list with
    /// the same case-insensitive name.
    async fn check_publishable(&self, owner: &str, id: Uuid, update: &ListUpdate) -> Result<()> {
        if !starts_alphanumeric(&update.name) {
            return Err(DomainError::validation(
                "list name must start with an alphanumeric character",
            ));
        }
        if update.items.iter().any(|item| !starts_alphanumeric(item)) {
            return Err(DomainError::validation(
                "every item must start with an alphanumeric character",
            ));
        }
        for (i, item) in update.items.iter().enumerate() {
            if update.items[..i]
                .iter()
                .any(|other| other.eq_ignore_ascii_case(item))
            {
                return Err(DomainError::validation("items must be distinct"));
            }
        }

        let taken = self
            .lists
            .list_all()
            .await?
            .into_iter()
            .any(|l| l.owner_username == owner && l.id != id && l.same_name(&update.name));
        if taken {
            return Err(DomainError::validation(
                "you already have a list with that name",
            ));
        }
        Ok(())
    }
}

fn starts_alphanumeric(s: &str) -> bool {
    s.chars().next().is_some_and(|c| c.is_ascii_alphanumeric())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn alphanumeric_start_rule() {
        assert!(starts_alphanumeric("Coffee"));
        assert!(starts_alphanumeric("7up"));
        assert!(!starts_alphanumeric("?"));
        assert!(!starts_alphanumeric(" coffee"));
        assert!(!starts_alphanumeric(""));
    }
}
