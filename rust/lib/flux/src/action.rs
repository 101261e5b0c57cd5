//! The closed action vocabulary.
//!
//! Every state transition is driven by exactly one [`Action`]. Actions are
//! immutable facts: the network layer emits the `*_ED` results after an HTTP
//! call resolves, the UI emits navigation and title actions directly.
//!
//! On the wire an action is a JSON object tagged by `type`:
//!
//! ```json
//! {"type": "SET_PAGE_TITLE", "title": "Agenda"}
//! {"type": "CREATED_COMMENT", "message": {"id": 4}, "comment": {"id": 9, "content": "+1"}}
//! ```
//!
//! Tags outside the vocabulary decode to [`Action::Unknown`], which every
//! reducer ignores.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::model::{
    AuthenticationMode, Comment, CommentId, LinkGuard, Message, MessageId, Routes,
    ToastDescriptor, User,
};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE", rename_all_fields = "camelCase")]
pub enum Action {
    // --- bootstrap & session ---
    Init(InitPayload),
    SetSessionContext(SessionContext),
    SetIsPoliticalSupport,

    // --- toasts ---
    AddToasts { toasts: Vec<ToastDescriptor> },
    ClearToast { toast_id: String },
    ClearAllToasts,

    // --- page & navigation ---
    SetPageTitle { title: Option<String> },
    SetBackLink { link: Option<LinkGuard> },
    SetTopBarRightLink { link: Option<LinkGuard> },
    SetAdminLink { link: Option<LinkGuard> },

    // --- message cache ---
    SetMessages { messages: Vec<Message> },
    SetMessage { message: Option<Message> },
    ClearMessages,
    LoadingMessages,
    RefreshingMessages,
    RefreshedMessages,

    // --- message writes ---
    CreatingMessage,
    CreatedMessage(MessageResult),
    UpdatingMessage,
    UpdatedMessage(MessageResult),
    DeletingMessage,
    DeletedMessage(MessageResult),
    ReportingMessage,
    ReportedMessage(ReportResult),

    // --- comment writes ---
    CreatingComment,
    CreatedComment(CommentCreated),
    DeletingComment,
    DeletedComment(CommentDeleted),
    ReportingComment,
    ReportedComment(ReportResult),

    #[serde(other)]
    Unknown,
}

impl Action {
    /// Wire tag of this action, for logging.
    pub fn tag(&self) -> &'static str {
        match self {
            Action::Init(_) => "INIT",
            Action::SetSessionContext(_) => "SET_SESSION_CONTEXT",
            Action::SetIsPoliticalSupport => "SET_IS_POLITICAL_SUPPORT",
            Action::AddToasts { .. } => "ADD_TOASTS",
            Action::ClearToast { .. } => "CLEAR_TOAST",
            Action::ClearAllToasts => "CLEAR_ALL_TOASTS",
            Action::SetPageTitle { .. } => "SET_PAGE_TITLE",
            Action::SetBackLink { .. } => "SET_BACK_LINK",
            Action::SetTopBarRightLink { .. } => "SET_TOP_BAR_RIGHT_LINK",
            Action::SetAdminLink { .. } => "SET_ADMIN_LINK",
            Action::SetMessages { .. } => "SET_MESSAGES",
            Action::SetMessage { .. } => "SET_MESSAGE",
            Action::ClearMessages => "CLEAR_MESSAGES",
            Action::LoadingMessages => "LOADING_MESSAGES",
            Action::RefreshingMessages => "REFRESHING_MESSAGES",
            Action::RefreshedMessages => "REFRESHED_MESSAGES",
            Action::CreatingMessage => "CREATING_MESSAGE",
            Action::CreatedMessage(_) => "CREATED_MESSAGE",
            Action::UpdatingMessage => "UPDATING_MESSAGE",
            Action::UpdatedMessage(_) => "UPDATED_MESSAGE",
            Action::DeletingMessage => "DELETING_MESSAGE",
            Action::DeletedMessage(_) => "DELETED_MESSAGE",
            Action::ReportingMessage => "REPORTING_MESSAGE",
            Action::ReportedMessage(_) => "REPORTED_MESSAGE",
            Action::CreatingComment => "CREATING_COMMENT",
            Action::CreatedComment(_) => "CREATED_COMMENT",
            Action::DeletingComment => "DELETING_COMMENT",
            Action::DeletedComment(_) => "DELETED_COMMENT",
            Action::ReportingComment => "REPORTING_COMMENT",
            Action::ReportedComment(_) => "REPORTED_COMMENT",
            Action::Unknown => "UNKNOWN",
        }
    }
}

// ---------------------------------------------------------------------------
// Payloads
// ---------------------------------------------------------------------------

/// App bootstrap: initial routes, link guards and whether a router is mounted.
///
/// Link guards left out of the payload keep their current value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InitPayload {
    #[serde(default)]
    pub routes: Routes,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub back_link: Option<LinkGuard>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub top_bar_right_link: Option<LinkGuard>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub admin_link: Option<LinkGuard>,
    #[serde(default)]
    pub has_router: bool,
}

/// Result of loading the session. May arrive more than once (reconnects).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionContext {
    #[serde(default)]
    pub user: Option<User>,
    #[serde(default)]
    pub authentication: Option<AuthenticationMode>,
    #[serde(default)]
    pub bookmarked_emails: Vec<String>,
    #[serde(default)]
    pub routes: Routes,
}

/// Failure detail carried by a write result.
///
/// Producers send anything from `true` to a string to a structured object.
/// JSON falsy values (`null`, `false`, `0`, `""`) mean success and decode to
/// `None`.
pub type WriteError = serde_json::Value;

fn truthy_error<'de, D>(deserializer: D) -> Result<Option<WriteError>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<WriteError>::deserialize(deserializer)?;
    Ok(value.filter(|v| match v {
        Value::Null | Value::Bool(false) => false,
        Value::String(s) => !s.is_empty(),
        Value::Number(n) => n.as_f64() != Some(0.0),
        _ => true,
    }))
}

/// Outcome of a create/update/delete call on a message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageResult {
    pub message: Message,
    #[serde(default, deserialize_with = "truthy_error", skip_serializing_if = "Option::is_none")]
    pub error: Option<WriteError>,
}

impl MessageResult {
    pub fn ok(message: Message) -> Self {
        Self {
            message,
            error: None,
        }
    }

    pub fn failed(message: Message, error: impl Into<WriteError>) -> Self {
        Self {
            message,
            error: Some(error.into()),
        }
    }

    pub fn is_ok(&self) -> bool {
        self.error.is_none()
    }
}

/// Just enough of a message to address it. Any other keys are ignored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageRef {
    pub id: MessageId,
}

/// Outcome of posting a comment on a message.
///
/// The target is `message.id`; older producers send a bare `messageId`
/// instead, which is used when `message` is absent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentCreated {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<MessageRef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message_id: Option<MessageId>,
    #[serde(default)]
    pub comment: Option<Comment>,
    #[serde(default, deserialize_with = "truthy_error", skip_serializing_if = "Option::is_none")]
    pub error: Option<WriteError>,
}

impl CommentCreated {
    pub fn ok(message_id: impl Into<MessageId>, comment: Comment) -> Self {
        Self {
            message: Some(MessageRef {
                id: message_id.into(),
            }),
            message_id: None,
            comment: Some(comment),
            error: None,
        }
    }

    pub fn target(&self) -> Option<&MessageId> {
        self.message
            .as_ref()
            .map(|m| &m.id)
            .or(self.message_id.as_ref())
    }

    pub fn is_ok(&self) -> bool {
        self.error.is_none()
    }
}

/// Outcome of deleting a comment from a message. Addressed like
/// [`CommentCreated`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentDeleted {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<MessageRef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message_id: Option<MessageId>,
    #[serde(default)]
    pub comment_id: Option<CommentId>,
    #[serde(default, deserialize_with = "truthy_error", skip_serializing_if = "Option::is_none")]
    pub error: Option<WriteError>,
}

impl CommentDeleted {
    pub fn ok(message_id: impl Into<MessageId>, comment_id: impl Into<CommentId>) -> Self {
        Self {
            message: Some(MessageRef {
                id: message_id.into(),
            }),
            message_id: None,
            comment_id: Some(comment_id.into()),
            error: None,
        }
    }

    pub fn target(&self) -> Option<&MessageId> {
        self.message
            .as_ref()
            .map(|m| &m.id)
            .or(self.message_id.as_ref())
    }

    pub fn is_ok(&self) -> bool {
        self.error.is_none()
    }
}

/// Outcome of reporting a message or comment for moderation. Carries no
/// data for the cache; it only closes the matching activity flag.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportResult {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message_id: Option<MessageId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment_id: Option<CommentId>,
    #[serde(default, deserialize_with = "truthy_error", skip_serializing_if = "Option::is_none")]
    pub error: Option<WriteError>,
}

impl ReportResult {
    pub fn is_ok(&self) -> bool {
        self.error.is_none()
    }
}
