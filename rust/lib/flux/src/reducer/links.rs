//! Navigation link guards.
//!
//! Writes store the guard as given. Whether a protected guard is visible is
//! decided at read time by the selectors, so a guard set before the session
//! resolves does not need to be set again once a user appears.

use std::sync::Arc;

use crate::action::Action;
use crate::model::LinkGuard;
use crate::reducer::keep_or_replace;

type Guard = Arc<Option<LinkGuard>>;

pub fn reduce_back_link(prev: &Guard, action: &Action) -> Guard {
    match action {
        Action::Init(init) if init.back_link.is_some() => {
            keep_or_replace(prev, init.back_link.clone())
        }
        Action::SetBackLink { link } => keep_or_replace(prev, link.clone()),
        _ => Arc::clone(prev),
    }
}

pub fn reduce_top_bar_right_link(prev: &Guard, action: &Action) -> Guard {
    match action {
        Action::Init(init) if init.top_bar_right_link.is_some() => {
            keep_or_replace(prev, init.top_bar_right_link.clone())
        }
        Action::SetTopBarRightLink { link } => keep_or_replace(prev, link.clone()),
        _ => Arc::clone(prev),
    }
}

pub fn reduce_admin_link(prev: &Guard, action: &Action) -> Guard {
    match action {
        Action::Init(init) if init.admin_link.is_some() => {
            keep_or_replace(prev, init.admin_link.clone())
        }
        Action::SetAdminLink { link } => keep_or_replace(prev, link.clone()),
        _ => Arc::clone(prev),
    }
}
