//! The state tree.
//!
//! [`AppState`] is an immutable snapshot made of independently updated
//! slices. Each slice sits behind its own `Arc`, so two snapshots can be
//! compared slice by slice with `Arc::ptr_eq` and an unchanged slice costs
//! nothing to carry into the next snapshot.
//!
//! Slice fields are crate-private: consumers read through
//! [`crate::selectors`].

use std::collections::HashMap;
use std::sync::Arc;

use crate::model::{AuthenticationMode, LinkGuard, Message, MessageId, Routes, Toast, User};

/// Stable topic names, one per slice. Subscribers match on these with
/// `+`/`#` wildcards.
pub mod topic {
    pub const SESSION_FLAGS: &str = "session/flags";
    pub const USER: &str = "session/user";
    pub const AUTHENTICATION: &str = "session/authentication";
    pub const POLITICAL_SUPPORT: &str = "session/political_support";
    pub const BOOKMARKED_EMAILS: &str = "session/bookmarked_emails";
    pub const ROUTES: &str = "session/routes";
    pub const TOASTS: &str = "toasts";
    pub const PAGE_TITLE: &str = "page/title";
    pub const BACK_LINK: &str = "links/back";
    pub const TOP_BAR_RIGHT_LINK: &str = "links/top_bar_right";
    pub const ADMIN_LINK: &str = "links/admin";
    pub const MESSAGES: &str = "messages";
    pub const ACTIVITY: &str = "activity";
}

// ---------------------------------------------------------------------------
// AppState
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default)]
pub struct AppState {
    pub(crate) session: Arc<Session>,
    pub(crate) user: Arc<Option<User>>,
    pub(crate) authentication: Arc<Option<AuthenticationMode>>,
    pub(crate) is_political_support: Arc<bool>,
    pub(crate) bookmarked_emails: Arc<Vec<String>>,
    pub(crate) routes: Arc<Routes>,
    pub(crate) toasts: Arc<Toasts>,
    pub(crate) page_title: Arc<Option<String>>,
    pub(crate) back_link: Arc<Option<LinkGuard>>,
    pub(crate) top_bar_right_link: Arc<Option<LinkGuard>>,
    pub(crate) admin_link: Arc<Option<LinkGuard>>,
    pub(crate) messages: Arc<Messages>,
    pub(crate) activity: Arc<Activity>,
}

impl AppState {
    /// Default state with `routes` already in place, for apps that know part
    /// of their route table before `INIT`.
    pub fn with_routes(routes: Routes) -> Self {
        Self {
            routes: Arc::new(routes),
            ..Self::default()
        }
    }
}

/// Session lifecycle flags.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Session {
    /// Set once the first `SET_SESSION_CONTEXT` has been applied.
    pub is_session_loaded: bool,
    /// Whether `INIT` reported a mounted router.
    pub has_router: bool,
}

/// Active toasts in display order.
///
/// `next_seq` feeds generated toast ids and never goes backwards, so a
/// generated id is not reused after its toast is cleared.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Toasts {
    pub(crate) items: Vec<Arc<Toast>>,
    pub(crate) next_seq: u64,
}

impl Toasts {
    pub fn iter(&self) -> impl Iterator<Item = &Toast> {
        self.items.iter().map(|t| t.as_ref())
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn contains(&self, toast_id: &str) -> bool {
        self.items.iter().any(|t| t.toast_id == toast_id)
    }
}

/// In-flight request flags, one per begin/end action pair.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Activity {
    pub loading_messages: bool,
    pub refreshing_messages: bool,
    pub creating_message: bool,
    pub updating_message: bool,
    pub deleting_message: bool,
    pub reporting_message: bool,
    pub creating_comment: bool,
    pub deleting_comment: bool,
    pub reporting_comment: bool,
}

impl Activity {
    /// A read of the message list is in flight.
    pub fn is_loading(&self) -> bool {
        self.loading_messages || self.refreshing_messages
    }

    /// Any write (message or comment) is in flight.
    pub fn is_updating(&self) -> bool {
        self.creating_message
            || self.updating_message
            || self.deleting_message
            || self.reporting_message
            || self.creating_comment
            || self.deleting_comment
            || self.reporting_comment
    }
}

// ---------------------------------------------------------------------------
// Messages: normalized cache with tombstones
// ---------------------------------------------------------------------------

/// What the cache knows about one message id.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Slot<'a> {
    /// Never seen.
    Absent,
    /// Live entity.
    Present(&'a Arc<Message>),
    /// Deleted; the key stays so a stale copy cannot be merged back in.
    Tombstoned,
}

/// Normalized message cache: id -> entity-or-tombstone, in insertion order.
///
/// Entities are individually `Arc`ed, so rebuilding the map after a change to
/// one message leaves every sibling with its previous identity.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Messages {
    order: Vec<MessageId>,
    entries: HashMap<MessageId, Option<Arc<Message>>>,
}

impl Messages {
    pub fn new() -> Self {
        Self::default()
    }

    /// Map holding at most one message.
    pub fn single(message: Option<Message>) -> Self {
        let mut map = Self::new();
        if let Some(message) = message {
            map.upsert(Arc::new(message));
        }
        map
    }

    /// Number of keys, tombstones included.
    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn slot(&self, id: &MessageId) -> Slot<'_> {
        match self.entries.get(id) {
            None => Slot::Absent,
            Some(None) => Slot::Tombstoned,
            Some(Some(message)) => Slot::Present(message),
        }
    }

    /// True for present and tombstoned ids alike.
    pub fn contains_key(&self, id: &MessageId) -> bool {
        self.entries.contains_key(id)
    }

    pub fn get(&self, id: &MessageId) -> Option<&Arc<Message>> {
        self.entries.get(id).and_then(|slot| slot.as_ref())
    }

    /// Every key in map order, with `None` for tombstones.
    pub fn iter(&self) -> impl Iterator<Item = (&MessageId, Option<&Arc<Message>>)> {
        self.order
            .iter()
            .map(|id| (id, self.entries.get(id).and_then(|slot| slot.as_ref())))
    }

    /// Live entities in map order.
    pub fn present(&self) -> impl Iterator<Item = &Arc<Message>> {
        self.iter().filter_map(|(_, message)| message)
    }

    /// Replace in place when the id is known, append otherwise.
    pub(crate) fn upsert(&mut self, message: Arc<Message>) {
        let id = message.id.clone();
        if self.entries.insert(id.clone(), Some(message)).is_none() {
            self.order.push(id);
        }
    }

    /// Insert at the front of the map. A known id is moved to the front.
    pub(crate) fn prepend(&mut self, message: Arc<Message>) {
        let id = message.id.clone();
        if self.entries.insert(id.clone(), Some(message)).is_some() {
            self.order.retain(|existing| *existing != id);
        }
        self.order.insert(0, id);
    }

    /// Mark `id` deleted, keeping the key.
    pub(crate) fn tombstone(&mut self, id: MessageId) {
        if self.entries.insert(id.clone(), None).is_none() {
            self.order.push(id);
        }
    }
}
