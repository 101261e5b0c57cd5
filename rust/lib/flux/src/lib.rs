//! Agora Flux: client application state container.
//!
//! One immutable [`AppState`] snapshot holds everything the UI renders: the
//! session, toasts, the page title, navigation link guards, a normalized
//! message cache and in-flight request flags. Producers submit [`Action`]s;
//! each slice has a pure transition function, and the root composer rebuilds
//! only the slices that changed, so unchanged parts keep their `Arc`
//! identity and consumers can skip work with `Arc::ptr_eq`.
//!
//! # Surfaces
//!
//! - [`Store::dispatch`] / [`Store::dispatch_json`]: submit an action
//! - [`Store::state`]: read the current snapshot, Arc zero-copy
//! - [`selectors`]: derive views from a snapshot
//! - [`Store::subscribe`]: observe slice topics with MQTT-style wildcards
//!
//! # Topics
//!
//! Every slice publishes under a `/`-separated topic (see [`state::topic`]):
//! - `session/user`, `session/routes`, `session/flags`, ...
//! - `links/back`, `links/top_bar_right`, `links/admin`
//! - `toasts`, `page/title`, `messages`, `activity`
//!
//! `links/+` matches every link slice, `session/#` the whole session and `#`
//! everything.
//!
//! # Example
//!
//! ```
//! use agora_flux::{Action, Store, selectors};
//! use agora_flux::model::LinkGuard;
//!
//! let store = Store::new();
//! store
//!     .subscribe("links/+", |topic, _state| println!("{topic} changed"))
//!     .unwrap();
//!
//! store.dispatch(Action::SetBackLink {
//!     link: Some(LinkGuard::protected("/agenda")),
//! });
//! let state = store
//!     .dispatch_json(r#"{"type":"SET_PAGE_TITLE","title":"Agenda"}"#)
//!     .unwrap();
//!
//! assert_eq!(selectors::get_page_title(&state), Some("Agenda"));
//! assert!(selectors::get_back_link(&state).is_some());
//! ```

pub mod action;
pub mod clock;
pub mod config;
pub mod error;
pub mod model;
pub mod reducer;
pub mod selectors;
pub mod state;
pub mod store;
pub mod trie;

// Re-export primary types at crate root.
pub use action::Action;
pub use clock::{Clock, FixedClock, SystemClock};
pub use config::StoreConfig;
pub use error::FluxError;
pub use reducer::{ReduceContext, Transition, reduce};
pub use state::AppState;
pub use store::{ChangeHandler, Store, SubscriptionId};
