//! Toast notifications.

use std::sync::Arc;

use crate::action::Action;
use crate::model::Toast;
use crate::state::Toasts;

pub fn reduce(prev: &Arc<Toasts>, action: &Action, id_prefix: &str) -> Arc<Toasts> {
    match action {
        Action::AddToasts { toasts } => {
            let mut next = (**prev).clone();
            let mut added = false;
            for desc in toasts {
                let toast_id = match &desc.toast_id {
                    Some(id) => id.clone(),
                    None => next_generated_id(&mut next, id_prefix),
                };
                // Duplicate ids are dropped, including repeats within this batch.
                if next.contains(&toast_id) {
                    continue;
                }
                next.items.push(Arc::new(Toast {
                    toast_id,
                    kind: desc.kind,
                    text: desc.text.clone(),
                    duration_ms: desc.duration_ms,
                }));
                added = true;
            }
            if added { Arc::new(next) } else { Arc::clone(prev) }
        }
        Action::ClearToast { toast_id } => {
            if !prev.contains(toast_id) {
                return Arc::clone(prev);
            }
            Arc::new(Toasts {
                items: prev
                    .items
                    .iter()
                    .filter(|t| &t.toast_id != toast_id)
                    .cloned()
                    .collect(),
                next_seq: prev.next_seq,
            })
        }
        Action::ClearAllToasts => {
            if prev.is_empty() {
                return Arc::clone(prev);
            }
            Arc::new(Toasts {
                items: Vec::new(),
                next_seq: prev.next_seq,
            })
        }
        _ => Arc::clone(prev),
    }
}

/// `{prefix}-{seq}`, skipping any id a producer already used explicitly.
fn next_generated_id(toasts: &mut Toasts, prefix: &str) -> String {
    loop {
        toasts.next_seq += 1;
        let id = format!("{}-{}", prefix, toasts.next_seq);
        if !toasts.contains(&id) {
            return id;
        }
    }
}
