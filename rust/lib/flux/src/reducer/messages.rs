//! Normalized message cache.
//!
//! | action            | effect                                                   |
//! |-------------------|----------------------------------------------------------|
//! | `SET_MESSAGES`    | insert each message whose id is absent; known ids untouched |
//! | `SET_MESSAGE`     | replace the whole map with at most that message          |
//! | `CLEAR_MESSAGES`  | empty the map                                            |
//! | `CREATED_MESSAGE` | prepend                                                  |
//! | `UPDATED_MESSAGE` | replace by id                                            |
//! | `DELETED_MESSAGE` | tombstone by id                                          |
//! | `CREATED_COMMENT` | append comment, bump `last_update`, `comment_count + 1`  |
//! | `DELETED_COMMENT` | drop comment, bump `last_update`, `comment_count - 1`    |
//!
//! Results carrying an `error` leave the map untouched, as do comment events
//! whose target message or ids are missing.

use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::action::{Action, CommentCreated, CommentDeleted};
use crate::model::Message;
use crate::reducer::keep_or_replace;
use crate::state::{Messages, Slot};

pub fn reduce(prev: &Arc<Messages>, action: &Action, now: DateTime<Utc>) -> Arc<Messages> {
    match action {
        Action::SetMessages { messages } => merge_missing(prev, messages),
        Action::SetMessage { message } => keep_or_replace(prev, Messages::single(message.clone())),
        Action::ClearMessages => {
            if prev.is_empty() {
                Arc::clone(prev)
            } else {
                Arc::new(Messages::new())
            }
        }
        Action::CreatedMessage(result) if result.is_ok() => {
            let mut next = (**prev).clone();
            next.prepend(Arc::new(result.message.clone()));
            Arc::new(next)
        }
        Action::UpdatedMessage(result) if result.is_ok() => {
            let mut next = (**prev).clone();
            next.upsert(Arc::new(result.message.clone()));
            Arc::new(next)
        }
        Action::DeletedMessage(result) if result.is_ok() => {
            if prev.slot(&result.message.id) == Slot::Tombstoned {
                return Arc::clone(prev);
            }
            let mut next = (**prev).clone();
            next.tombstone(result.message.id.clone());
            Arc::new(next)
        }
        Action::CreatedComment(result) => add_comment(prev, result, now),
        Action::DeletedComment(result) => remove_comment(prev, result, now),
        _ => Arc::clone(prev),
    }
}

/// Fill-missing-only merge: a cached id, live or tombstoned, is never
/// overwritten by a list load.
fn merge_missing(prev: &Arc<Messages>, incoming: &[Message]) -> Arc<Messages> {
    if incoming.iter().all(|m| prev.contains_key(&m.id)) {
        return Arc::clone(prev);
    }
    let mut next = (**prev).clone();
    for message in incoming {
        if !next.contains_key(&message.id) {
            next.upsert(Arc::new(message.clone()));
        }
    }
    Arc::new(next)
}

fn add_comment(prev: &Arc<Messages>, result: &CommentCreated, now: DateTime<Utc>) -> Arc<Messages> {
    if !result.is_ok() {
        return Arc::clone(prev);
    }
    let (Some(message_id), Some(comment)) = (result.target(), result.comment.as_ref()) else {
        return Arc::clone(prev);
    };
    let Some(current) = prev.get(message_id) else {
        return Arc::clone(prev);
    };

    let mut message = (**current).clone();
    let mut comments = message
        .comments
        .take()
        .or_else(|| message.message_comments.clone())
        .unwrap_or_default();
    comments.push(comment.clone());
    message.comments = Some(comments);
    message.last_update = Some(now);
    message.comment_count = message.comment_count.map(|count| count.saturating_add(1));

    let mut next = (**prev).clone();
    next.upsert(Arc::new(message));
    Arc::new(next)
}

/// Reads only the primary `comments` collection; a message whose comments
/// live under the legacy field ends up with an empty primary collection.
fn remove_comment(
    prev: &Arc<Messages>,
    result: &CommentDeleted,
    now: DateTime<Utc>,
) -> Arc<Messages> {
    if !result.is_ok() {
        return Arc::clone(prev);
    }
    let (Some(message_id), Some(comment_id)) = (result.target(), result.comment_id.as_ref()) else {
        return Arc::clone(prev);
    };
    let Some(current) = prev.get(message_id) else {
        return Arc::clone(prev);
    };

    let mut message = (**current).clone();
    let remaining = message
        .comments
        .take()
        .unwrap_or_default()
        .into_iter()
        .filter(|c| c.id != *comment_id)
        .collect();
    message.comments = Some(remaining);
    message.last_update = Some(now);
    message.comment_count = message.comment_count.map(|count| count.saturating_sub(1));

    let mut next = (**prev).clone();
    next.upsert(Arc::new(message));
    Arc::new(next)
}
