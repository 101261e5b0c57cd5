//! Slice transition functions and the root composer.
//!
//! Each slice has one pure function `(&Arc<Slice>, &Action) -> Arc<Slice>`
//! that hands back the same `Arc` when the action does not concern it. The
//! composer [`reduce`] runs all of them and only builds a new [`AppState`]
//! when at least one slice came back with a new identity.

pub mod activity;
pub mod links;
pub mod messages;
pub mod page;
pub mod session;
pub mod toasts;

use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::action::Action;
use crate::state::{AppState, topic};

/// Inputs a transition may need besides the action itself.
#[derive(Debug, Clone, Copy)]
pub struct ReduceContext<'a> {
    /// Timestamp written into `last_update` on comment mutations.
    pub now: DateTime<Utc>,
    /// Prefix for generated toast ids.
    pub toast_id_prefix: &'a str,
}

/// Result of applying one action to a snapshot.
#[derive(Debug, Clone)]
pub struct Transition {
    pub state: Arc<AppState>,
    /// Topics of the slices whose identity changed, in slice order.
    pub changed: Vec<&'static str>,
}

impl Transition {
    pub fn is_noop(&self) -> bool {
        self.changed.is_empty()
    }
}

/// Apply `action` to `prev`.
///
/// When no slice changes, the returned state is `prev` itself.
pub fn reduce(prev: &Arc<AppState>, action: &Action, ctx: &ReduceContext<'_>) -> Transition {
    let next = AppState {
        session: session::reduce_flags(&prev.session, action),
        user: session::reduce_user(&prev.user, action),
        authentication: session::reduce_authentication(&prev.authentication, action),
        is_political_support: session::reduce_political_support(
            &prev.is_political_support,
            action,
        ),
        bookmarked_emails: session::reduce_bookmarked_emails(&prev.bookmarked_emails, action),
        routes: session::reduce_routes(&prev.routes, action),
        toasts: toasts::reduce(&prev.toasts, action, ctx.toast_id_prefix),
        page_title: page::reduce_title(&prev.page_title, action),
        back_link: links::reduce_back_link(&prev.back_link, action),
        top_bar_right_link: links::reduce_top_bar_right_link(&prev.top_bar_right_link, action),
        admin_link: links::reduce_admin_link(&prev.admin_link, action),
        messages: messages::reduce(&prev.messages, action, ctx.now),
        activity: activity::reduce(&prev.activity, action),
    };

    let mut changed = Vec::new();
    track(&mut changed, topic::SESSION_FLAGS, &prev.session, &next.session);
    track(&mut changed, topic::USER, &prev.user, &next.user);
    track(&mut changed, topic::AUTHENTICATION, &prev.authentication, &next.authentication);
    track(
        &mut changed,
        topic::POLITICAL_SUPPORT,
        &prev.is_political_support,
        &next.is_political_support,
    );
    track(
        &mut changed,
        topic::BOOKMARKED_EMAILS,
        &prev.bookmarked_emails,
        &next.bookmarked_emails,
    );
    track(&mut changed, topic::ROUTES, &prev.routes, &next.routes);
    track(&mut changed, topic::TOASTS, &prev.toasts, &next.toasts);
    track(&mut changed, topic::PAGE_TITLE, &prev.page_title, &next.page_title);
    track(&mut changed, topic::BACK_LINK, &prev.back_link, &next.back_link);
    track(
        &mut changed,
        topic::TOP_BAR_RIGHT_LINK,
        &prev.top_bar_right_link,
        &next.top_bar_right_link,
    );
    track(&mut changed, topic::ADMIN_LINK, &prev.admin_link, &next.admin_link);
    track(&mut changed, topic::MESSAGES, &prev.messages, &next.messages);
    track(&mut changed, topic::ACTIVITY, &prev.activity, &next.activity);

    // `next` only holds clones of unchanged slices; drop it rather than
    // publish a second snapshot equal to `prev`.
    let state = if changed.is_empty() {
        Arc::clone(prev)
    } else {
        Arc::new(next)
    };
    Transition { state, changed }
}

fn track<T>(changed: &mut Vec<&'static str>, topic: &'static str, prev: &Arc<T>, next: &Arc<T>) {
    if !Arc::ptr_eq(prev, next) {
        changed.push(topic);
    }
}

/// Keep `prev` when `next` is equal to it, otherwise wrap `next`.
///
/// Slices holding plain values go through this so that re-submitting the
/// current value does not count as a change.
pub(crate) fn keep_or_replace<T: PartialEq>(prev: &Arc<T>, next: T) -> Arc<T> {
    if **prev == next {
        Arc::clone(prev)
    } else {
        Arc::new(next)
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use chrono::TimeZone;

    use super::*;

    pub fn ctx() -> ReduceContext<'static> {
        ReduceContext {
            now: Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap(),
            toast_id_prefix: "toast",
        }
    }

    pub fn apply(prev: &Arc<AppState>, action: Action) -> Transition {
        reduce(prev, &action, &ctx())
    }
}
