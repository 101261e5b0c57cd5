//! Session-derived slices.
//!
//! `SET_SESSION_CONTEXT` sets user, authentication mode, political-support
//! and bookmarked emails together and marks the session loaded. It can fire
//! again on reconnect; each time it replaces those slices, except `routes`,
//! which only ever merges.

use std::sync::Arc;

use crate::action::Action;
use crate::model::{AuthenticationMode, Routes, User};
use crate::reducer::keep_or_replace;
use crate::state::Session;

pub fn reduce_flags(prev: &Arc<Session>, action: &Action) -> Arc<Session> {
    match action {
        Action::Init(init) => keep_or_replace(
            prev,
            Session {
                has_router: init.has_router,
                ..**prev
            },
        ),
        Action::SetSessionContext(_) => keep_or_replace(
            prev,
            Session {
                is_session_loaded: true,
                ..**prev
            },
        ),
        _ => Arc::clone(prev),
    }
}

pub fn reduce_user(prev: &Arc<Option<User>>, action: &Action) -> Arc<Option<User>> {
    match action {
        Action::SetSessionContext(ctx) => keep_or_replace(prev, ctx.user.clone()),
        _ => Arc::clone(prev),
    }
}

pub fn reduce_authentication(
    prev: &Arc<Option<AuthenticationMode>>,
    action: &Action,
) -> Arc<Option<AuthenticationMode>> {
    match action {
        Action::SetSessionContext(ctx) => keep_or_replace(prev, ctx.authentication),
        _ => Arc::clone(prev),
    }
}

/// Follows the session user's flag, and can be forced on by
/// `SET_IS_POLITICAL_SUPPORT` whatever the user state.
pub fn reduce_political_support(prev: &Arc<bool>, action: &Action) -> Arc<bool> {
    match action {
        Action::SetSessionContext(ctx) => keep_or_replace(
            prev,
            ctx.user.as_ref().is_some_and(|u| u.is_political_support),
        ),
        Action::SetIsPoliticalSupport => keep_or_replace(prev, true),
        _ => Arc::clone(prev),
    }
}

pub fn reduce_bookmarked_emails(prev: &Arc<Vec<String>>, action: &Action) -> Arc<Vec<String>> {
    match action {
        Action::SetSessionContext(ctx) => keep_or_replace(prev, ctx.bookmarked_emails.clone()),
        _ => Arc::clone(prev),
    }
}

/// `{...previous, ...incoming}` on `INIT` and on every session context.
pub fn reduce_routes(prev: &Arc<Routes>, action: &Action) -> Arc<Routes> {
    let incoming = match action {
        Action::Init(init) => &init.routes,
        Action::SetSessionContext(ctx) => &ctx.routes,
        _ => return Arc::clone(prev),
    };
    let adds_something = incoming
        .iter()
        .any(|(name, path)| prev.get(name) != Some(path));
    if !adds_something {
        return Arc::clone(prev);
    }
    let mut merged = (**prev).clone();
    merged.extend(incoming.iter().map(|(k, v)| (k.clone(), v.clone())));
    Arc::new(merged)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::action::{InitPayload, SessionContext};

    fn routes(pairs: &[(&str, &str)]) -> Routes {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    fn session(user: Option<User>) -> Action {
        Action::SetSessionContext(SessionContext {
            user,
            ..Default::default()
        })
    }

    // ========================================================================
    // Flags
    // ========================================================================

    #[test]
    fn session_context_marks_loaded() {
        let prev = Arc::new(Session::default());
        let next = reduce_flags(&prev, &session(None));
        assert!(next.is_session_loaded);
        assert!(!next.has_router);

        let again = reduce_flags(&next, &session(None));
        assert!(Arc::ptr_eq(&next, &again));
    }

    #[test]
    fn init_sets_router_flag() {
        let prev = Arc::new(Session::default());
        let next = reduce_flags(
            &prev,
            &Action::Init(InitPayload {
                has_router: true,
                ..Default::default()
            }),
        );
        assert!(next.has_router);
        assert!(!next.is_session_loaded);
    }

    // ========================================================================
    // User / authentication / bookmarks
    // ========================================================================

    #[test]
    fn user_replaced_on_every_session_context() {
        let prev = Arc::new(None);
        let with_user = reduce_user(&prev, &session(Some(User::new(1))));
        assert_eq!(*with_user, Some(User::new(1)));

        let logged_out = reduce_user(&with_user, &session(None));
        assert_eq!(*logged_out, None);
    }

    #[test]
    fn user_ignores_other_actions() {
        let prev = Arc::new(Some(User::new(1)));
        let next = reduce_user(&prev, &Action::ClearAllToasts);
        assert!(Arc::ptr_eq(&prev, &next));
    }

    #[test]
    fn authentication_and_bookmarks_follow_session() {
        let action = Action::SetSessionContext(SessionContext {
            authentication: Some(AuthenticationMode::MagicLink),
            bookmarked_emails: vec!["a@example.org".into()],
            ..Default::default()
        });
        let auth = reduce_authentication(&Arc::new(None), &action);
        assert_eq!(*auth, Some(AuthenticationMode::MagicLink));

        let emails = reduce_bookmarked_emails(&Arc::new(Vec::new()), &action);
        assert_eq!(*emails, vec!["a@example.org".to_string()]);
    }

    // ========================================================================
    // Political support
    // ========================================================================

    #[test]
    fn political_support_follows_user() {
        let mut user = User::new(1);
        user.is_political_support = true;
        let next = reduce_political_support(&Arc::new(false), &session(Some(user)));
        assert!(*next);

        let cleared = reduce_political_support(&next, &session(None));
        assert!(!*cleared);
    }

    #[test]
    fn political_support_forced_without_user() {
        let prev = Arc::new(false);
        let next = reduce_political_support(&prev, &Action::SetIsPoliticalSupport);
        assert!(*next);

        let again = reduce_political_support(&next, &Action::SetIsPoliticalSupport);
        assert!(Arc::ptr_eq(&next, &again));
    }

    // ========================================================================
    // Routes
    // ========================================================================

    #[test]
    fn routes_merge_across_init_and_session() {
        let prev = Arc::new(Routes::new());
        let after_init = reduce_routes(
            &prev,
            &Action::Init(InitPayload {
                routes: routes(&[("a", "/a")]),
                ..Default::default()
            }),
        );
        let after_session = reduce_routes(
            &after_init,
            &Action::SetSessionContext(SessionContext {
                routes: routes(&[("b", "/b")]),
                ..Default::default()
            }),
        );
        assert_eq!(*after_session, routes(&[("a", "/a"), ("b", "/b")]));
    }

    #[test]
    fn routes_incoming_wins_on_conflict() {
        let prev = Arc::new(routes(&[("a", "/a"), ("home", "/")]));
        let next = reduce_routes(
            &prev,
            &Action::SetSessionContext(SessionContext {
                routes: routes(&[("home", "/dashboard")]),
                ..Default::default()
            }),
        );
        assert_eq!(*next, routes(&[("a", "/a"), ("home", "/dashboard")]));
    }

    #[test]
    fn routes_never_shrink() {
        let prev = Arc::new(routes(&[("a", "/a")]));
        let next = reduce_routes(&prev, &session(None));
        assert!(Arc::ptr_eq(&prev, &next));
        assert_eq!(next.len(), 1);
    }
}
