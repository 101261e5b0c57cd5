//! End-to-end scenarios: JSON actions in through the store, views out through
//! the selectors.

use std::sync::{Arc, Mutex};

use agora_flux::model::{LinkGuard, MessageId};
use agora_flux::state::topic;
use agora_flux::{Action, AppState, Store, selectors};

fn replay(store: &Store, lines: &[&str]) -> Arc<AppState> {
    let mut state = store.state();
    for line in lines {
        state = store.dispatch_json(line).unwrap();
    }
    state
}

fn message_ids(state: &AppState) -> Vec<u64> {
    selectors::get_messages(state)
        .iter()
        .filter_map(|m| m.id.0.as_u64())
        .collect()
}

#[test]
fn test_bootstrap_then_session() {
    let store = Store::new();
    let state = replay(
        &store,
        &[
            r#"{"type":"INIT","routes":{"a":"/a"},"hasRouter":true}"#,
            r#"{"type":"SET_SESSION_CONTEXT","routes":{"b":"/b"},"user":{"id":1}}"#,
        ],
    );

    assert_eq!(selectors::get_route(&state, "a"), Some("/a"));
    assert_eq!(selectors::get_route(&state, "b"), Some("/b"));
    assert_eq!(selectors::get_routes(&state).len(), 2);
    assert!(selectors::get_is_connected(&state));
    assert!(selectors::get_is_session_loaded(&state));
    assert!(selectors::get_has_router(&state));
}

#[test]
fn test_political_support_follows_user() {
    let store = Store::new();
    let state = replay(
        &store,
        &[r#"{"type":"SET_SESSION_CONTEXT","user":{"id":7,"isPoliticalSupport":true},"authentication":"password"}"#],
    );
    assert!(selectors::get_is_political_support(&state));
    assert!(selectors::get_authentication(&state).is_some());
}

#[test]
fn test_toasts_are_idempotent_by_id() {
    let store = Store::new();
    let add = r#"{"type":"ADD_TOASTS","toasts":[{"toastId":"saved","text":"Saved"}]}"#;
    let first = replay(&store, &[add]);
    let second = replay(&store, &[add]);

    assert_eq!(selectors::get_toasts(&second).len(), 1);
    assert!(Arc::ptr_eq(&first, &second));

    let cleared = replay(&store, &[r#"{"type":"CLEAR_TOAST","toastId":"saved"}"#]);
    assert!(selectors::get_toasts(&cleared).is_empty());
}

#[test]
fn test_message_lifecycle() {
    let store = Store::new();
    let state = replay(
        &store,
        &[
            r#"{"type":"LOADING_MESSAGES"}"#,
            r#"{"type":"SET_MESSAGES","messages":[{"id":1,"x":1,"y":2},{"id":5},{"id":6,"eventId":"ev"}]}"#,
        ],
    );
    assert!(!selectors::get_is_loading(&state));
    assert_eq!(message_ids(&state), vec![1, 5, 6]);

    // Fill-missing: the cached copy of 1 keeps `y`.
    let state = replay(
        &store,
        &[r#"{"type":"SET_MESSAGES","messages":[{"id":1,"x":1}]}"#],
    );
    let one = selectors::get_message_by_id(&state, &MessageId::from(1)).unwrap();
    assert_eq!(one.extra.get("y"), Some(&serde_json::json!(2)));

    // Tombstone: 5 disappears and a later list load cannot bring it back.
    let state = replay(
        &store,
        &[
            r#"{"type":"DELETING_MESSAGE"}"#,
            r#"{"type":"DELETED_MESSAGE","message":{"id":5}}"#,
            r#"{"type":"SET_MESSAGES","messages":[{"id":5,"content":"back"}]}"#,
        ],
    );
    assert_eq!(message_ids(&state), vec![1, 6]);
    assert!(selectors::get_message_by_id(&state, &MessageId::from(5)).is_none());
    assert!(selectors::get_message_by_id(&state, &MessageId::from(99)).is_none());
    assert!(!selectors::get_is_updating(&state));

    // Created messages go first.
    let state = replay(
        &store,
        &[r#"{"type":"CREATED_MESSAGE","message":{"id":8,"content":"new"}}"#],
    );
    assert_eq!(message_ids(&state), vec![8, 1, 6]);
    assert_eq!(selectors::get_messages_for_event(&state, "ev").len(), 1);
}

#[test]
fn test_comment_count_guard() {
    let store = Store::new();
    replay(
        &store,
        &[r#"{"type":"SET_MESSAGES","messages":[{"id":1,"commentCount":3},{"id":2}]}"#],
    );

    let state = replay(
        &store,
        &[
            r#"{"type":"CREATED_COMMENT","messageId":1,"comment":{"id":10,"content":"+1"}}"#,
            r#"{"type":"CREATED_COMMENT","messageId":2,"comment":{"id":11,"content":"+1"}}"#,
        ],
    );
    let one = selectors::get_message_by_id(&state, &MessageId::from(1)).unwrap();
    let two = selectors::get_message_by_id(&state, &MessageId::from(2)).unwrap();
    assert_eq!(one.comment_count, Some(4));
    assert_eq!(two.comment_count, None);
    assert_eq!(selectors::get_comments(&state, &MessageId::from(2)).len(), 1);

    let state = replay(
        &store,
        &[r#"{"type":"DELETED_COMMENT","messageId":1,"commentId":10}"#],
    );
    let one = selectors::get_message_by_id(&state, &MessageId::from(1)).unwrap();
    assert_eq!(one.comment_count, Some(3));
    assert!(selectors::get_comments(&state, &MessageId::from(1)).is_empty());
}

#[test]
fn test_failed_write_leaves_cache() {
    let store = Store::new();
    let before = replay(
        &store,
        &[
            r#"{"type":"SET_MESSAGES","messages":[{"id":1,"content":"a"}]}"#,
            r#"{"type":"UPDATING_MESSAGE"}"#,
        ],
    );
    let after = replay(
        &store,
        &[r#"{"type":"UPDATED_MESSAGE","message":{"id":1,"content":"b"},"error":"forbidden"}"#],
    );
    let cached = selectors::get_message_by_id(&before, &MessageId::from(1)).unwrap();
    let one = selectors::get_message_by_id(&after, &MessageId::from(1)).unwrap();
    assert!(Arc::ptr_eq(&cached, &one));
    assert_eq!(one.content.as_deref(), Some("a"));
    assert!(!selectors::get_is_updating(&after));
}

#[test]
fn test_truthy_error_payloads_are_failures() {
    for error in ["true", r#"{"detail":"x"}"#, "403"] {
        let store = Store::new();
        let before = replay(
            &store,
            &[
                r#"{"type":"SET_MESSAGES","messages":[{"id":1}]}"#,
                r#"{"type":"CREATING_MESSAGE"}"#,
            ],
        );
        assert!(selectors::get_is_updating(&before));

        let line = format!(r#"{{"type":"CREATED_MESSAGE","message":{{"id":2}},"error":{error}}}"#);
        let after = store.dispatch_json(&line).unwrap();
        assert!(!selectors::get_is_updating(&after), "error {error}");
        assert_eq!(message_ids(&after), vec![1], "error {error}");
        assert!(selectors::get_message_by_id(&after, &MessageId::from(2)).is_none());
    }

    // Falsy flags are successes.
    let store = Store::new();
    let state = replay(
        &store,
        &[r#"{"type":"CREATED_MESSAGE","message":{"id":2},"error":false}"#],
    );
    assert_eq!(message_ids(&state), vec![2]);
}

#[test]
fn test_comment_targets_embedded_message() {
    let store = Store::new();
    replay(
        &store,
        &[r#"{"type":"SET_MESSAGES","messages":[{"id":4,"commentCount":3}]}"#],
    );

    let state = replay(
        &store,
        &[r#"{"type":"CREATED_COMMENT","message":{"id":4},"comment":{"id":9,"content":"+1"}}"#],
    );
    let four = selectors::get_message_by_id(&state, &MessageId::from(4)).unwrap();
    assert_eq!(four.comment_count, Some(4));
    assert_eq!(selectors::get_comments(&state, &MessageId::from(4)).len(), 1);

    let state = replay(
        &store,
        &[r#"{"type":"DELETED_COMMENT","message":{"id":4},"commentId":9}"#],
    );
    let four = selectors::get_message_by_id(&state, &MessageId::from(4)).unwrap();
    assert_eq!(four.comment_count, Some(3));
    assert!(selectors::get_comments(&state, &MessageId::from(4)).is_empty());
}

#[test]
fn test_string_keyed_messages() {
    let uuid = "7f9c2ba4-e88f-11ee-a0c4-0242ac120002";
    let load = format!(
        r#"{{"type":"SET_MESSAGES","messages":[{{"id":"{uuid}","commentCount":0}},{{"id":"12"}}]}}"#
    );
    let comment = format!(
        r#"{{"type":"CREATED_COMMENT","message":{{"id":"{uuid}"}},"comment":{{"id":"c-1","content":"+1"}}}}"#
    );
    let delete = format!(r#"{{"type":"DELETED_MESSAGE","message":{{"id":"{uuid}"}}}}"#);

    let store = Store::new();
    let state = replay(
        &store,
        &[
            load.as_str(),
            r#"{"type":"SET_SESSION_CONTEXT","user":{"id":"u-17"}}"#,
            comment.as_str(),
        ],
    );
    let key = MessageId::from(uuid);
    let keyed = selectors::get_message_by_id(&state, &key).unwrap();
    assert_eq!(keyed.comment_count, Some(1));
    assert!(selectors::get_is_connected(&state));

    // "12" and 12 are the same message.
    assert!(selectors::get_message_by_id(&state, &MessageId::from(12)).is_some());
    assert_eq!(message_ids(&state), vec![12]);

    let state = replay(&store, &[delete.as_str()]);
    assert!(selectors::get_message_by_id(&state, &key).is_none());
    assert_eq!(selectors::get_messages(&state).len(), 1);
}

#[test]
fn test_referential_stability() {
    let store = Store::new();
    let first = replay(
        &store,
        &[
            r#"{"type":"SET_MESSAGES","messages":[{"id":1}]}"#,
            r#"{"type":"SET_PAGE_TITLE","title":"Agenda"}"#,
        ],
    );
    let same = replay(&store, &[r#"{"type":"SET_PAGE_TITLE","title":"Agenda"}"#]);
    assert!(Arc::ptr_eq(&first, &same));

    // A real title change leaves the message list untouched.
    let renamed = replay(&store, &[r#"{"type":"SET_PAGE_TITLE","title":"Debate"}"#]);
    assert!(!Arc::ptr_eq(&first, &renamed));
    let before = selectors::get_message_by_id(&first, &MessageId::from(1)).unwrap();
    let after = selectors::get_message_by_id(&renamed, &MessageId::from(1)).unwrap();
    assert!(Arc::ptr_eq(&before, &after));
}

#[test]
fn test_link_gating() {
    let store = Store::new();
    let loading = replay(
        &store,
        &[r#"{"type":"SET_BACK_LINK","link":{"to":"/agenda","isProtected":true}}"#],
    );
    assert!(selectors::get_back_link(&loading).is_some());

    let anonymous = replay(&store, &[r#"{"type":"SET_SESSION_CONTEXT"}"#]);
    assert!(selectors::get_back_link(&anonymous).is_none());

    let connected = replay(
        &store,
        &[r#"{"type":"SET_SESSION_CONTEXT","user":{"id":1}}"#],
    );
    assert_eq!(
        selectors::get_back_link(&connected),
        Some(&LinkGuard::protected("/agenda"))
    );
}

#[test]
fn test_unknown_action_and_subscriptions() {
    let store = Store::new();
    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&seen);
    store
        .subscribe("#", move |topic, _| sink.lock().unwrap().push(topic.to_string()))
        .unwrap();

    let before = store.state();
    let after = store.dispatch_json(r#"{"type":"NOT_A_THING"}"#).unwrap();
    assert!(Arc::ptr_eq(&before, &after));
    assert!(seen.lock().unwrap().is_empty());

    store.dispatch(Action::SetAdminLink {
        link: Some(LinkGuard::open("/admin")),
    });
    assert_eq!(*seen.lock().unwrap(), vec![topic::ADMIN_LINK.to_string()]);
}

#[test]
fn test_malformed_payload_is_rejected() {
    let store = Store::new();
    let before = store.state();
    // A known tag with a payload of the wrong shape.
    assert!(store.dispatch_json(r#"{"type":"DELETED_MESSAGE","message":{}}"#).is_err());
    assert!(store.dispatch_json("[]").is_err());
    assert!(Arc::ptr_eq(&before, &store.state()));
}
