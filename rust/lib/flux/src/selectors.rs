//! Read-only projections over an [`AppState`] snapshot.
//!
//! Selectors are the only read surface consumers get. They never mutate and
//! never allocate more than the result they return.

use std::sync::Arc;

use crate::model::{
    AuthenticationMode, Comment, LinkGuard, Message, MessageId, Routes, Toast, User,
};
use crate::state::AppState;

// ========================================================================
// Messages
// ========================================================================

/// Live messages in cache order. Absent and tombstoned ids never appear.
pub fn get_messages(state: &AppState) -> Vec<Arc<Message>> {
    state.messages.present().cloned().collect()
}

/// `None` both for an id never seen and for a deleted one.
pub fn get_message_by_id(state: &AppState, id: &MessageId) -> Option<Arc<Message>> {
    state.messages.get(id).cloned()
}

/// Live messages linked to `event_id`, in cache order.
pub fn get_messages_for_event(state: &AppState, event_id: &str) -> Vec<Arc<Message>> {
    state
        .messages
        .present()
        .filter(|m| m.event_id.as_deref() == Some(event_id))
        .cloned()
        .collect()
}

/// Comments of a live message, falling back to the legacy collection.
pub fn get_comments(state: &AppState, id: &MessageId) -> Vec<Comment> {
    state
        .messages
        .get(id)
        .and_then(|m| m.comment_list())
        .map(<[Comment]>::to_vec)
        .unwrap_or_default()
}

// ========================================================================
// Links
// ========================================================================

pub fn get_back_link(state: &AppState) -> Option<&LinkGuard> {
    guarded(state, &state.back_link)
}

pub fn get_top_bar_right_link(state: &AppState) -> Option<&LinkGuard> {
    guarded(state, &state.top_bar_right_link)
}

/// The stored admin link as is; admin visibility is decided elsewhere.
pub fn get_admin_link(state: &AppState) -> Option<&LinkGuard> {
    (*state.admin_link).as_ref()
}

/// A protected link is hidden once the session is known to be anonymous.
/// While the session is still loading it stays visible.
fn guarded<'a>(state: &'a AppState, link: &'a Option<LinkGuard>) -> Option<&'a LinkGuard> {
    let link = link.as_ref()?;
    if link.is_protected && state.session.is_session_loaded && state.user.is_none() {
        return None;
    }
    Some(link)
}

// ========================================================================
// Session
// ========================================================================

pub fn get_is_connected(state: &AppState) -> bool {
    state.user.is_some()
}

pub fn get_user(state: &AppState) -> Option<&User> {
    (*state.user).as_ref()
}

pub fn get_authentication(state: &AppState) -> Option<AuthenticationMode> {
    *state.authentication
}

pub fn get_is_session_loaded(state: &AppState) -> bool {
    state.session.is_session_loaded
}

pub fn get_has_router(state: &AppState) -> bool {
    state.session.has_router
}

pub fn get_is_political_support(state: &AppState) -> bool {
    *state.is_political_support
}

pub fn get_bookmarked_emails(state: &AppState) -> &[String] {
    &state.bookmarked_emails
}

pub fn get_routes(state: &AppState) -> &Routes {
    &state.routes
}

pub fn get_route<'a>(state: &'a AppState, name: &str) -> Option<&'a str> {
    state.routes.get(name).map(String::as_str)
}

// ========================================================================
// Page, toasts, activity
// ========================================================================

pub fn get_page_title(state: &AppState) -> Option<&str> {
    state.page_title.as_deref()
}

pub fn get_toasts(state: &AppState) -> Vec<&Toast> {
    state.toasts.iter().collect()
}

pub fn get_is_loading(state: &AppState) -> bool {
    state.activity.is_loading()
}

pub fn get_is_updating(state: &AppState) -> bool {
    state.activity.is_updating()
}
