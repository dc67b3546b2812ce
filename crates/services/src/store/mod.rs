//! # Client Store State Machine
//!
//! The single-page client keeps one authoritative state value and changes it
//! only through a closed set of named actions. `reduce` is a pure, total
//! function producing a complete new state; fields an action does not
//! address carry over from the prior state.

pub mod browse;

pub use browse::{browse_community, browse_ranked, filter_by_mode, sort_lists, Browsable};

use domains::{CommunityList, RankedList};
use serde::{Deserialize, Serialize};

/// Which list subset the client is browsing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ViewMode {
    Home,
    All,
    User,
    Community,
}

/// Active sort order for the displayed lists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SortOrder {
    PublishNewest,
    PublishOldest,
    Views,
    Likes,
    Dislikes,
}

/// One displayed list; community mode loads a different shape.
#[derive(Debug, Clone)]
pub enum StoreEntry {
    Ranked(RankedList),
    Community(CommunityList),
}

/// The session-local client state. Replaced wholesale on every transition.
#[derive(Debug, Clone)]
pub struct StoreState {
    pub lists: Vec<StoreEntry>,
    pub current_list: Option<RankedList>,
    pub list_marked_for_deletion: Option<RankedList>,
    pub new_list_counter: u32,
    pub edit_active: bool,
    pub mode: ViewMode,
    pub sort: SortOrder,
}

impl Default for StoreState {
    fn default() -> Self {
        Self {
            lists: Vec::new(),
            current_list: None,
            list_marked_for_deletion: None,
            new_list_counter: 0,
            edit_active: false,
            mode: ViewMode::Home,
            sort: SortOrder::PublishNewest,
        }
    }
}

/// The closed action set. Nothing else may change a [`StoreState`].
#[derive(Debug, Clone)]
pub enum StoreAction {
    CloseCurrentList,
    CreateNewList(RankedList),
    LoadLists(Vec<StoreEntry>),
    MarkListForDeletion(RankedList),
    UnmarkListForDeletion,
    SetCurrentList(RankedList),
    ResetStore,
    SetViewMode(ViewMode),
    SetSort(SortOrder),
}

/// Computes the complete next state for one action.
pub fn reduce(state: StoreState, action: StoreAction) -> StoreState {
    match action {
        // Stop editing and return home.
        StoreAction::CloseCurrentList => StoreState {
            current_list: None,
            list_marked_for_deletion: None,
            edit_active: false,
            mode: ViewMode::Home,
            ..state
        },
        // A fresh list goes straight into editing.
        StoreAction::CreateNewList(list) => StoreState {
            current_list: Some(list),
            new_list_counter: state.new_list_counter + 1,
            edit_active: true,
            list_marked_for_deletion: None,
            mode: ViewMode::Home,
            ..state
        },
        StoreAction::LoadLists(lists) => StoreState {
            lists,
            current_list: None,
            edit_active: false,
            list_marked_for_deletion: None,
            ..state
        },
        StoreAction::MarkListForDeletion(list) => StoreState {
            current_list: None,
            edit_active: false,
            list_marked_for_deletion: Some(list),
            ..state
        },
        StoreAction::UnmarkListForDeletion => StoreState {
            current_list: None,
            edit_active: false,
            list_marked_for_deletion: None,
            ..state
        },
        StoreAction::SetCurrentList(list) => StoreState {
            current_list: Some(list),
            edit_active: true,
            list_marked_for_deletion: None,
            ..state
        },
        StoreAction::ResetStore => StoreState::default(),
        // Changing mode clears `lists` to force a reload under the new mode.
        StoreAction::SetViewMode(mode) => StoreState {
            lists: Vec::new(),
            current_list: None,
            edit_active: false,
            list_marked_for_deletion: None,
            mode,
            ..state
        },
        StoreAction::SetSort(sort) => StoreState { sort, ..state },
    }
}

/// State container exposing only the closed action set — no field setters.
#[derive(Debug, Default)]
pub struct Store {
    state: StoreState,
}

impl Store {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &StoreState {
        &self.state
    }

    pub fn dispatch(&mut self, action: StoreAction) {
        let previous = std::mem::take(&mut self.state);
        self.state = reduce(previous, action);
    }
}
