//! # Aggregation Engine
//!
//! Merges all published ranked lists sharing a (case-insensitive) name into
//! one community consensus ranking: rank index `j` contributes `5 - j`
//! points to its item's total.

use std::collections::HashMap;
use std::sync::Arc;

use dashmap::DashMap;
use tokio::sync::Mutex;
use tracing::{debug, warn};

use domains::{CommunityList, CommunityRepo, ListRepo, RankedList, Result, ScoredItem, LIST_LEN};

/// What a reconcile pass decided to do with the community list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reconciliation {
    Created,
    Updated,
    Deleted,
    Noop,
}

/// Computes per-item point totals across `lists`.
///
/// Item identity is the case-insensitive string value; the first-seen casing
/// is kept as the canonical display form. The result is sorted descending by
/// points, and because the sort is stable, ties keep first-encountered order.
pub fn score_lists(lists: &[RankedList]) -> Vec<ScoredItem> {
    let mut scored: Vec<ScoredItem> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    for list in lists {
        for (rank, item) in list.items.iter().enumerate() {
            let points = (LIST_LEN - rank) as i64;
            let key = item.to_lowercase();
            match index.get(&key) {
                Some(&slot) => scored[slot].points += points,
                None => {
                    index.insert(key, scored.len());
                    scored.push(ScoredItem {
                        item: item.clone(),
                        points,
                    });
                }
            }
        }
    }

    scored.sort_by(|a, b| b.points.cmp(&a.points));
    scored
}

/// Owns the create/update/delete decision for community lists.
///
/// Invoked after a ranked list is published, unpublished, renamed, or
/// deleted. Concurrent triggers for the same name are serialized through a
/// per-name mutex so two of them can never both decide "no community list
/// exists yet".
pub struct AggregationEngine {
    lists: Arc<dyn ListRepo>,
    community: Arc<dyn CommunityRepo>,
    name_locks: DashMap<String, Arc<Mutex<()>>>,
}

impl AggregationEngine {
    pub fn new(lists: Arc<dyn ListRepo>, community: Arc<dyn CommunityRepo>) -> Self {
        Self {
            lists,
            community,
            name_locks: DashMap::new(),
        }
    }

    fn lock_for(&self, key: &str) -> Arc<Mutex<()>> {
        self.name_locks
            .entry(key.to_string())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone()
    }

    /// Recomputes the community list for `name`.
    ///
    /// A fetch failure on the ranked-list side is logged and treated like an
    /// empty aggregation rather than propagated.
    #[tracing::instrument(skip(self))]
    pub async fn reconcile(&self, name: &str) -> Result<Reconciliation> {
        let key = name.to_lowercase();
        let lock = self.lock_for(&key);
        let guard = lock.lock().await;

        let published = match self.lists.find_published_by_name(name).await {
            Ok(lists) => lists,
            Err(err) => {
                warn!(%err, name, "list fetch failed, aggregating as empty");
                Vec::new()
            }
        };
        let scored = score_lists(&published);

        let existing = self.community.find_by_name(name).await?;
        let outcome = match (existing, scored.is_empty()) {
            (None, false) => {
                // Keep the casing of the first contributing list for display.
                let display_name = published
                    .first()
                    .map(|l| l.name.clone())
                    .unwrap_or_else(|| name.to_string());
                self.community
                    .create_community(CommunityList::new(display_name, scored))
                    .await?;
                Reconciliation::Created
            }
            (Some(current), false) => {
                self.community.replace_items(current.id, scored).await?;
                Reconciliation::Updated
            }
            (Some(current), true) => {
                self.community.delete_community(current.id).await?;
                Reconciliation::Deleted
            }
            (None, true) => Reconciliation::Noop,
        };

        debug!(name, ?outcome, "reconciled community list");

        drop(guard);
        drop(lock);
        // Drop the lock entry once no other task holds a handle to it, so
        // the map stays bounded by the names currently being reconciled.
        self.name_locks
            .remove_if(&key, |_, l| Arc::strong_count(l) == 1);
        Ok(outcome)
    }
}
