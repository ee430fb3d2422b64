//! Form fields: the two comma-joined text fields that carry the ACL to
//! whoever submits it, persisted as a small `key = value` file.
//!
//! The file looks like:
//!
//! ```text
//! # acl-editor form
//! allowed_users = alice,bob
//! blocked_users = carol
//! ```
//!
//! Comments (`#`) and blank lines are ignored, unknown keys are skipped and
//! only the first `=` on a line splits key from value.

use crate::acl::AclState;
use crate::error::{Context, Result};

/// Serialized projection of an [`AclState`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FormFields {
    /// Comma-joined allow list.
    pub allowed_users: String,
    /// Comma-joined block list.
    pub blocked_users: String,
}

impl FormFields {
    pub fn from_state(state: &AclState) -> Self {
        let (allowed_users, blocked_users) = state.serialize();
        Self {
            allowed_users,
            blocked_users,
        }
    }

    /// Load fields from a file, or create an empty form file if it doesn't exist.
    ///
    /// A file that exists but cannot be read is an error; it is never
    /// treated as empty, since the next save would overwrite it.
    pub fn load_or_init(path: &str) -> Result<Self> {
        if std::path::Path::new(path).exists() {
            return Self::from_file(path);
        }
        let fields = Self::default();
        if let Err(e) = fields.write_file(path) {
            tracing::warn!(path, error = %e, "could not create form file");
        }
        Ok(fields)
    }

    /// Like [`load_or_init`](Self::load_or_init) but never creates the file.
    pub fn load(path: &str) -> Result<Self> {
        if std::path::Path::new(path).exists() {
            Self::from_file(path)
        } else {
            Ok(Self::default())
        }
    }

    /// Load fields from a form file.
    pub fn from_file(path: &str) -> Result<Self> {
        let contents = std::fs::read_to_string(path).with_ctx(|| format!("read form {path}"))?;
        Ok(Self::parse_str(&contents))
    }

    fn parse_str(contents: &str) -> Self {
        let mut fields = Self::default();
        for raw in contents.lines() {
            let line = raw.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let mut parts = line.splitn(2, '=');
            let lhs = parts.next().map(|s| s.trim()).unwrap_or("");
            let rhs = parts.next().map(|s| s.trim()).unwrap_or("");
            match lhs {
                "allowed_users" => fields.allowed_users = rhs.to_string(),
                "blocked_users" => fields.blocked_users = rhs.to_string(),
                _ => {}
            }
        }
        fields
    }

    /// Write both fields to `path`, replacing its contents.
    pub fn write_file(&self, path: &str) -> std::io::Result<()> {
        use std::fmt::Write as _;
        let mut buf = String::new();
        buf.push_str("# acl-editor form\n");
        buf.push_str("# Comma-separated usernames. A name is never on both lists.\n");
        let _ = writeln!(&mut buf, "allowed_users = {}", self.allowed_users);
        let _ = writeln!(&mut buf, "blocked_users = {}", self.blocked_users);
        std::fs::write(path, buf)
    }
}
