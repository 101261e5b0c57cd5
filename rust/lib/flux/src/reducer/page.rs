use std::sync::Arc;

use crate::action::Action;
use crate::reducer::keep_or_replace;

pub fn reduce_title(prev: &Arc<Option<String>>, action: &Action) -> Arc<Option<String>> {
    match action {
        Action::SetPageTitle { title } => keep_or_replace(prev, title.clone()),
        _ => Arc::clone(prev),
    }
}
