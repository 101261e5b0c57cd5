//! Topic patterns for store subscriptions.
//!
//! Topics are `/`-separated slice names (`session/user`, `links/back`,
//! `messages`). Patterns may use MQTT-style wildcards:
//!
//! - `+` matches exactly one level: `links/+` matches every link slice
//! - `#` matches the remaining levels, including none: `session/#`
//!   matches `session/user`; `#` alone matches everything
//!
//! The trie is a plain data structure; the store guards it with its own lock.

use std::collections::BTreeMap;

use crate::error::FluxError;

pub const SINGLE_LEVEL: &str = "+";
pub const MULTI_LEVEL: &str = "#";

pub struct TopicTrie<T> {
    root: Node<T>,
    len: usize,
}

struct Node<T> {
    exact: BTreeMap<String, Node<T>>,
    single: Option<Box<Node<T>>>,
    /// Entries subscribed with `#` at this depth.
    rest: Vec<T>,
    /// Entries whose pattern ends exactly here.
    here: Vec<T>,
}

impl<T> Default for Node<T> {
    fn default() -> Self {
        Self {
            exact: BTreeMap::new(),
            single: None,
            rest: Vec::new(),
            here: Vec::new(),
        }
    }
}

impl<T> Node<T> {
    fn is_empty(&self) -> bool {
        self.here.is_empty() && self.rest.is_empty() && self.single.is_none() && self.exact.is_empty()
    }
}

/// Check that `pattern` is well formed: non-empty levels, wildcards only as
/// whole levels, and `#` only in last position.
pub fn validate_pattern(pattern: &str) -> Result<(), FluxError> {
    let levels: Vec<&str> = pattern.split('/').collect();
    let last = levels.len() - 1;
    for (i, level) in levels.iter().enumerate() {
        if level.is_empty() {
            return Err(FluxError::InvalidPattern(format!("{pattern:?}: empty level")));
        }
        if *level == MULTI_LEVEL && i != last {
            return Err(FluxError::InvalidPattern(format!(
                "{pattern:?}: '#' must be the last level"
            )));
        }
        if level.len() > 1 && (level.contains('+') || level.contains('#')) {
            return Err(FluxError::InvalidPattern(format!(
                "{pattern:?}: wildcard inside level {level:?}"
            )));
        }
    }
    Ok(())
}

impl<T> TopicTrie<T> {
    pub fn new() -> Self {
        Self {
            root: Node::default(),
            len: 0,
        }
    }

    /// Number of stored entries.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn insert(&mut self, pattern: &str, value: T) -> Result<(), FluxError> {
        validate_pattern(pattern)?;
        let mut node = &mut self.root;
        for level in pattern.split('/') {
            match level {
                MULTI_LEVEL => {
                    node.rest.push(value);
                    self.len += 1;
                    return Ok(());
                }
                SINGLE_LEVEL => node = node.single.get_or_insert_with(Box::default),
                name => node = node.exact.entry(name.to_string()).or_default(),
            }
        }
        node.here.push(value);
        self.len += 1;
        Ok(())
    }

    /// Remove the entries under `pattern` for which `pred` holds, pruning
    /// branches left empty. Returns how many were removed.
    pub fn remove<F>(&mut self, pattern: &str, pred: F) -> usize
    where
        F: Fn(&T) -> bool,
    {
        let levels: Vec<&str> = pattern.split('/').collect();
        let removed = remove_at(&mut self.root, &levels, &pred);
        self.len -= removed;
        removed
    }

    /// Entries whose pattern matches the concrete `topic`, exact matches
    /// first, then `+` branches, then `#` entries from the deepest level up.
    pub fn matches(&self, topic: &str) -> Vec<&T> {
        let levels: Vec<&str> = topic.split('/').collect();
        let mut out = Vec::new();
        collect(&self.root, &levels, &mut out);
        out
    }
}

impl<T> Default for TopicTrie<T> {
    fn default() -> Self {
        Self::new()
    }
}

fn collect<'a, T>(node: &'a Node<T>, levels: &[&str], out: &mut Vec<&'a T>) {
    match levels.split_first() {
        None => out.extend(node.here.iter()),
        Some((level, rest)) => {
            if let Some(child) = node.exact.get(*level) {
                collect(child, rest, out);
            }
            if let Some(child) = &node.single {
                collect(child, rest, out);
            }
        }
    }
    out.extend(node.rest.iter());
}

fn remove_at<T, F>(node: &mut Node<T>, levels: &[&str], pred: &F) -> usize
where
    F: Fn(&T) -> bool,
{
    let Some((level, rest)) = levels.split_first() else {
        return drain(&mut node.here, pred);
    };
    match *level {
        MULTI_LEVEL => drain(&mut node.rest, pred),
        SINGLE_LEVEL => {
            let Some(child) = node.single.as_mut() else {
                return 0;
            };
            let removed = remove_at(child, rest, pred);
            if child.is_empty() {
                node.single = None;
            }
            removed
        }
        name => {
            let Some(child) = node.exact.get_mut(name) else {
                return 0;
            };
            let removed = remove_at(child, rest, pred);
            if child.is_empty() {
                node.exact.remove(name);
            }
            removed
        }
    }
}

fn drain<T, F>(entries: &mut Vec<T>, pred: &F) -> usize
where
    F: Fn(&T) -> bool,
{
    let before = entries.len();
    entries.retain(|e| !pred(e));
    before - entries.len()
}
