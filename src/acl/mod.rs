//! Allow/block username lists with mutual exclusion.
//!
//! [`AclState`] holds two ordered username sets. A name is never on both:
//! blocking a name silently drops it from the allow list, while allowing a
//! blocked name is rejected with [`AclError::Conflict`].
//!
//! The external projection is a pair of comma-joined strings (see
//! [`AclState::serialize`] and [`AclState::parse`]).
pub mod editor;

use crate::error::AclError;

/// Separator used by the serialized text fields.
pub const DELIMITER: char = ',';

/// Ordered sequence of usernames with uniqueness enforced on insert.
///
/// Names are compared case-sensitively and kept in insertion order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct UsernameSet {
    names: Vec<String>,
}

impl UsernameSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Split on `,`, trim each token, drop empty tokens, keep the first occurrence of duplicates.
    pub fn parse(text: &str) -> Self {
        text.split(DELIMITER)
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .collect()
    }

    /// Append `name` unless already present. Returns `true` if it was added.
    pub fn insert(&mut self, name: &str) -> bool {
        if self.contains(name) {
            return false;
        }
        self.names.push(name.to_string());
        true
    }

    /// Returns `true` if `name` was present.
    pub fn remove(&mut self, name: &str) -> bool {
        let before = self.names.len();
        self.names.retain(|n| n != name);
        self.names.len() != before
    }

    pub fn contains(&self, name: &str) -> bool {
        self.names.iter().any(|n| n == name)
    }

    pub fn as_slice(&self) -> &[String] {
        &self.names
    }

    pub fn iter(&self) -> std::slice::Iter<'_, String> {
        self.names.iter()
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Join with `,` in insertion order; empty set yields an empty string.
    pub fn serialize(&self) -> String {
        self.names.join(",")
    }
}

impl<S: AsRef<str>> FromIterator<S> for UsernameSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut set = Self::new();
        for name in iter {
            set.insert(name.as_ref());
        }
        set
    }
}

impl<'a> IntoIterator for &'a UsernameSet {
    type Item = &'a String;
    type IntoIter = std::slice::Iter<'a, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.names.iter()
    }
}

/// Which of the two lists an operation targets.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum ListKind {
    Allow,
    Block,
}

impl ListKind {
    pub fn label(self) -> &'static str {
        match self {
            ListKind::Allow => "Allow",
            ListKind::Block => "Block",
        }
    }

    pub fn other(self) -> Self {
        match self {
            ListKind::Allow => ListKind::Block,
            ListKind::Block => ListKind::Allow,
        }
    }
}

/// Trim `raw` and reject names the text fields cannot carry.
pub fn validate_username(raw: &str) -> Result<&str, AclError> {
    let name = raw.trim();
    if name.is_empty() || name.contains(DELIMITER) {
        return Err(AclError::InvalidUsername {
            username: raw.to_string(),
        });
    }
    Ok(name)
}

/// The allow/block pair. `allowed ∩ blocked` is empty after every operation.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AclState {
    allowed: UsernameSet,
    blocked: UsernameSet,
}

impl AclState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build state from the two text fields.
    ///
    /// A name present in both fields stays blocked and is dropped from the
    /// allow side, the same priority [`add_to_block`](Self::add_to_block) applies.
    pub fn parse(allowed_text: &str, blocked_text: &str) -> Self {
        let blocked = UsernameSet::parse(blocked_text);
        let mut allowed = UsernameSet::parse(allowed_text);
        let overlapping: Vec<String> = allowed
            .iter()
            .filter(|n| blocked.contains(n))
            .cloned()
            .collect();
        for name in &overlapping {
            tracing::warn!(username = %name, "name present in both lists; keeping it blocked");
            allowed.remove(name);
        }
        Self { allowed, blocked }
    }

    /// `(allowed, blocked)` joined by `,` in insertion order.
    pub fn serialize(&self) -> (String, String) {
        (self.allowed.serialize(), self.blocked.serialize())
    }

    pub fn allowed(&self) -> &UsernameSet {
        &self.allowed
    }

    pub fn blocked(&self) -> &UsernameSet {
        &self.blocked
    }

    pub fn list(&self, kind: ListKind) -> &UsernameSet {
        match kind {
            ListKind::Allow => &self.allowed,
            ListKind::Block => &self.blocked,
        }
    }

    pub fn side_of(&self, username: &str) -> Option<ListKind> {
        if self.blocked.contains(username) {
            Some(ListKind::Block)
        } else if self.allowed.contains(username) {
            Some(ListKind::Allow)
        } else {
            None
        }
    }

    /// Append `username` to the allow list.
    ///
    /// Fails with [`AclError::Conflict`] without touching state when the name
    /// is blocked. Allowing an already-allowed name is a no-op.
    pub fn add_to_allow(&mut self, username: &str) -> Result<(), AclError> {
        let name = validate_username(username)?;
        if self.blocked.contains(name) {
            return Err(AclError::Conflict {
                username: name.to_string(),
            });
        }
        if self.allowed.insert(name) {
            tracing::debug!(username = %name, "allowed");
        }
        Ok(())
    }

    /// Append `username` to the block list, removing it from the allow list first.
    pub fn add_to_block(&mut self, username: &str) -> Result<(), AclError> {
        let name = validate_username(username)?;
        if self.allowed.remove(name) {
            tracing::debug!(username = %name, "moved from allow list to block list");
        }
        if self.blocked.insert(name) {
            tracing::debug!(username = %name, "blocked");
        }
        Ok(())
    }

    pub fn add_to(&mut self, kind: ListKind, username: &str) -> Result<(), AclError> {
        match kind {
            ListKind::Allow => self.add_to_allow(username),
            ListKind::Block => self.add_to_block(username),
        }
    }

    /// Remove `username` from whichever list holds it. Absent names are a no-op.
    pub fn remove_from_both(&mut self, username: &str) {
        let was_allowed = self.allowed.remove(username);
        let was_blocked = self.blocked.remove(username);
        if was_allowed || was_blocked {
            tracing::debug!(username = %username, "removed from acl");
        }
    }

    /// Whether `viewer` may see an item owned by `owner`.
    ///
    /// The owner always may; otherwise blocking wins over allowing and
    /// anyone on neither list is denied. Anonymous viewers are denied.
    pub fn can_view(&self, viewer: Option<&str>, owner: &str) -> bool {
        let Some(viewer) = viewer else {
            return false;
        };
        if viewer == owner {
            return true;
        }
        if self.blocked.contains(viewer) {
            return false;
        }
        self.allowed.contains(viewer)
    }
}
