//! Search/list view over the user collection.

use std::borrow::Cow;

use shared::domain::{UserId, UserRecord};

use crate::controller::Intent;

/// Maximum number of name characters shown in the list before truncation.
pub const NAME_DISPLAY_LIMIT: usize = 10;

pub const DELETE_CONFIRMATION_PROMPT: &str = "Are you sure you want to delete this user?";

/// Case-insensitive substring match on email or name. An empty term matches
/// everything.
pub fn matches_search(user: &UserRecord, term: &str) -> bool {
    if term.is_empty() {
        return true;
    }
    contains_lowered(user, &term.to_lowercase())
}

fn contains_lowered(user: &UserRecord, lowered: &str) -> bool {
    user.email.to_lowercase().contains(lowered) || user.name.to_lowercase().contains(lowered)
}

/// Subsequence of `users` matching `term`, in collection order.
pub fn filter_users<'a>(users: &'a [UserRecord], term: &str) -> Vec<&'a UserRecord> {
    filter_indices(users, term)
        .into_iter()
        .map(|idx| &users[idx])
        .collect()
}

fn filter_indices(users: &[UserRecord], term: &str) -> Vec<usize> {
    if term.is_empty() {
        return (0..users.len()).collect();
    }
    let term = term.to_lowercase();
    users
        .iter()
        .enumerate()
        .filter(|(_, user)| contains_lowered(user, &term))
        .map(|(idx, _)| idx)
        .collect()
}

/// Cuts `text` to `max_chars` characters followed by `...` when longer.
pub fn truncate_text(text: &str, max_chars: usize) -> Cow<'_, str> {
    match text.char_indices().nth(max_chars) {
        Some((cut, _)) => Cow::Owned(format!("{}...", &text[..cut])),
        None => Cow::Borrowed(text),
    }
}

pub fn display_name(user: &UserRecord) -> Cow<'_, str> {
    truncate_text(&user.name, NAME_DISPLAY_LIMIT)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EmptyState {
    NoUsers,
    NoMatches { term: String },
}

impl EmptyState {
    pub fn message(&self) -> String {
        match self {
            EmptyState::NoUsers => "No users to show. Add some!".to_string(),
            EmptyState::NoMatches { term } => format!("No users found for \"{term}\"."),
        }
    }
}

#[derive(Debug, Clone)]
struct FilterCache {
    revision: u64,
    term: String,
    indices: Vec<usize>,
}

/// Holds the live search term, the memoized filter result and any delete
/// awaiting confirmation.
#[derive(Debug, Clone, Default)]
pub struct ListView {
    search_term: String,
    cache: Option<FilterCache>,
    pending_delete: Option<UserId>,
}

impl ListView {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn search_term(&self) -> &str {
        &self.search_term
    }

    pub fn set_search_term(&mut self, term: impl Into<String>) {
        self.search_term = term.into();
    }

    /// Filtered view of `users`. `revision` must change whenever `users`
    /// does; the result is only recomputed when it or the term changes.
    pub fn filtered<'a>(&mut self, users: &'a [UserRecord], revision: u64) -> Vec<&'a UserRecord> {
        let stale = match &self.cache {
            Some(cache) => cache.revision != revision || cache.term != self.search_term,
            None => true,
        };
        if stale {
            self.cache = Some(FilterCache {
                revision,
                term: self.search_term.clone(),
                indices: filter_indices(users, &self.search_term),
            });
        }

        self.cache
            .as_ref()
            .map(|cache| {
                cache
                    .indices
                    .iter()
                    .filter_map(|idx| users.get(*idx))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Which empty message to show, if any. An empty collection always wins
    /// over an unmatched search.
    pub fn empty_state(&self, total: usize, visible: usize) -> Option<EmptyState> {
        if visible > 0 {
            return None;
        }
        if total == 0 {
            return Some(EmptyState::NoUsers);
        }
        Some(EmptyState::NoMatches {
            term: self.search_term.clone(),
        })
    }

    pub fn request_edit(&self, user_id: UserId) -> Intent {
        Intent::EditRequested(user_id)
    }

    /// First step of a delete: remembers the id until the operator answers
    /// the confirmation prompt.
    pub fn request_delete(&mut self, user_id: UserId) {
        self.pending_delete = Some(user_id);
    }

    pub fn pending_delete(&self) -> Option<UserId> {
        self.pending_delete
    }

    /// Resolves the pending confirmation. Only a positive answer produces the
    /// delete intent.
    pub fn confirm_delete(&mut self, confirmed: bool) -> Option<Intent> {
        let user_id = self.pending_delete.take()?;
        confirmed.then_some(Intent::DeleteRequested(user_id))
    }
}

#[cfg(test)]
#[path = "tests/list_view_tests.rs"]
mod tests;
