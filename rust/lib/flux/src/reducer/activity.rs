//! In-flight request flags.
//!
//! A begin action raises its flag; the matching result clears it whether or
//! not the result carries an error, so "finished without effect" is still
//! finished.

use std::sync::Arc;

use crate::action::Action;
use crate::reducer::keep_or_replace;
use crate::state::Activity;

pub fn reduce(prev: &Arc<Activity>, action: &Action) -> Arc<Activity> {
    let mut next = **prev;
    match action {
        Action::LoadingMessages => next.loading_messages = true,
        Action::SetMessages { .. } | Action::SetMessage { .. } => next.loading_messages = false,
        Action::RefreshingMessages => next.refreshing_messages = true,
        Action::RefreshedMessages => next.refreshing_messages = false,
        Action::CreatingMessage => next.creating_message = true,
        Action::CreatedMessage(_) => next.creating_message = false,
        Action::UpdatingMessage => next.updating_message = true,
        Action::UpdatedMessage(_) => next.updating_message = false,
        Action::DeletingMessage => next.deleting_message = true,
        Action::DeletedMessage(_) => next.deleting_message = false,
        Action::ReportingMessage => next.reporting_message = true,
        Action::ReportedMessage(_) => next.reporting_message = false,
        Action::CreatingComment => next.creating_comment = true,
        Action::CreatedComment(_) => next.creating_comment = false,
        Action::DeletingComment => next.deleting_comment = true,
        Action::DeletedComment(_) => next.deleting_comment = false,
        Action::ReportingComment => next.reporting_comment = true,
        Action::ReportedComment(_) => next.reporting_comment = false,
        _ => return Arc::clone(prev),
    }
    keep_or_replace(prev, next)
}
