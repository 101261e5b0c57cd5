//! Entities held in the state tree.
//!
//! Everything here is plain data shaped like the JSON the backend and the UI
//! exchange (`camelCase` keys). Reducers clone and rebuild these values; they
//! never mutate a value that is already part of a published snapshot.

use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

// ---------------------------------------------------------------------------
// Identifiers
// ---------------------------------------------------------------------------

/// A backend key: an integer or an opaque string such as a UUID.
///
/// A string holding a canonical integer decodes as that integer, so `"42"`
/// and `42` name the same entity. Serialization writes the value back in its
/// decoded form.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(untagged)]
pub enum EntityId {
    Num(u64),
    Key(String),
}

impl EntityId {
    pub fn as_u64(&self) -> Option<u64> {
        match self {
            EntityId::Num(n) => Some(*n),
            EntityId::Key(_) => None,
        }
    }
}

impl<'de> Deserialize<'de> for EntityId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Num(u64),
            Key(String),
        }

        Ok(match Raw::deserialize(deserializer)? {
            Raw::Num(n) => EntityId::Num(n),
            Raw::Key(key) => EntityId::from(key),
        })
    }
}

impl From<u64> for EntityId {
    fn from(n: u64) -> Self {
        EntityId::Num(n)
    }
}

impl From<String> for EntityId {
    fn from(key: String) -> Self {
        match key.parse::<u64>() {
            Ok(n) if n.to_string() == key => EntityId::Num(n),
            _ => EntityId::Key(key),
        }
    }
}

impl From<&str> for EntityId {
    fn from(key: &str) -> Self {
        EntityId::from(key.to_string())
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntityId::Num(n) => write!(f, "{}", n),
            EntityId::Key(key) => f.write_str(key),
        }
    }
}

macro_rules! entity_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub EntityId);

        impl From<EntityId> for $name {
            fn from(id: EntityId) -> Self {
                $name(id)
            }
        }

        impl From<u64> for $name {
            fn from(n: u64) -> Self {
                $name(EntityId::Num(n))
            }
        }

        impl From<&str> for $name {
            fn from(key: &str) -> Self {
                $name(EntityId::from(key))
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                fmt::Display::fmt(&self.0, f)
            }
        }
    };
}

entity_id! {
    /// Stable backend identifier of a discussion message.
    MessageId
}

entity_id! {
    /// Stable backend identifier of a comment.
    CommentId
}

// ---------------------------------------------------------------------------
// Session
// ---------------------------------------------------------------------------

/// The signed-in user, as delivered by the session endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: EntityId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    #[serde(default)]
    pub is_political_support: bool,
}

impl User {
    pub fn new(id: impl Into<EntityId>) -> Self {
        Self {
            id: id.into(),
            email: None,
            display_name: None,
            is_political_support: false,
        }
    }
}

/// How the current session was authenticated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum AuthenticationMode {
    Password,
    MagicLink,
    Token,
    Oauth,
}

/// Named application routes (`name -> path`).
///
/// Routes only ever grow: every session-bearing action merges into them.
pub type Routes = BTreeMap<String, String>;

// ---------------------------------------------------------------------------
// Navigation
// ---------------------------------------------------------------------------

/// Where a navigation affordance points and how it is labelled.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LinkDescriptor {
    pub to: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
}

/// A link descriptor plus its protection flag.
///
/// A protected link is hidden from anonymous sessions at read time; see
/// [`crate::selectors::get_back_link`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LinkGuard {
    #[serde(flatten)]
    pub link: LinkDescriptor,
    #[serde(default)]
    pub is_protected: bool,
}

impl LinkGuard {
    pub fn open(to: impl Into<String>) -> Self {
        Self {
            link: LinkDescriptor {
                to: to.into(),
                label: None,
                icon: None,
            },
            is_protected: false,
        }
    }

    pub fn protected(to: impl Into<String>) -> Self {
        Self {
            is_protected: true,
            ..Self::open(to)
        }
    }
}

// ---------------------------------------------------------------------------
// Toasts
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ToastKind {
    #[default]
    Info,
    Success,
    Warning,
    Error,
}

/// A toast as submitted by a producer. `toast_id` is optional; the toasts
/// reducer assigns one when it is missing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ToastDescriptor {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub toast_id: Option<String>,
    #[serde(default)]
    pub kind: ToastKind,
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration_ms: Option<u64>,
}

impl ToastDescriptor {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            toast_id: None,
            kind: ToastKind::Info,
            text: text.into(),
            duration_ms: None,
        }
    }

    pub fn with_id(mut self, toast_id: impl Into<String>) -> Self {
        self.toast_id = Some(toast_id.into());
        self
    }
}

/// An active toast. Unique by `toast_id` within the active collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Toast {
    pub toast_id: String,
    pub kind: ToastKind,
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration_ms: Option<u64>,
}

// ---------------------------------------------------------------------------
// Messages and comments
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Author {
    pub id: EntityId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    pub id: CommentId,
    #[serde(default)]
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<Author>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

impl Comment {
    pub fn new(id: impl Into<CommentId>, content: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            content: content.into(),
            author: None,
            created_at: None,
        }
    }
}

/// A discussion message.
///
/// Older backend payloads carry comments under `messageComments` instead of
/// `comments`; readers fall back to it when `comments` is absent.
/// `comment_count` is whatever the backend reported and may lag the real
/// collection length. Keys the store does not model land in `extra` and
/// round-trip untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    pub id: MessageId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<Author>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub event_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub event_title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comments: Option<Vec<Comment>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message_comments: Option<Vec<Comment>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment_count: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_update: Option<DateTime<Utc>>,
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

impl Message {
    pub fn new(id: impl Into<MessageId>) -> Self {
        Self {
            id: id.into(),
            content: None,
            author: None,
            event_id: None,
            event_title: None,
            comments: None,
            message_comments: None,
            comment_count: None,
            last_update: None,
            extra: BTreeMap::new(),
        }
    }

    pub fn with_content(mut self, content: impl Into<String>) -> Self {
        self.content = Some(content.into());
        self
    }

    pub fn with_event(mut self, event_id: impl Into<String>) -> Self {
        self.event_id = Some(event_id.into());
        self
    }

    /// The comment collection a reader should show: `comments`, or the
    /// legacy `messageComments` when `comments` is absent.
    pub fn comment_list(&self) -> Option<&[Comment]> {
        self.comments
            .as_deref()
            .or(self.message_comments.as_deref())
    }
}
