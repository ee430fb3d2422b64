//! Library crate for acl-editor.
//!
//! This crate exposes the building blocks of the editor:
//! - Allow/block reconciliation and its render/serialization front (`acl`)
//! - Application state and update loop (`app`)
//! - Username lookup sources (`directory`)
//! - Error and result types (`error`)
//! - Form field persistence (`form`)
//! - Search sessions and the background lookup worker (`search`)
//! - UI rendering and widgets (`ui`)
//!
//! It is used by the `acl-editor` binary and by tests.
#![doc = include_str!("../README.md")]
#![deny(rustdoc::broken_intra_doc_links)]
#![cfg_attr(docsrs, feature(doc_cfg))]

pub mod acl;
pub mod app;
pub mod directory;
pub mod error;
pub mod form;
pub mod search;
pub mod ui;

// Re-export commonly used items at the crate root for convenience
/// Convenient error and result types shared across the crate.
pub use acl::{AclState, ListKind, UsernameSet};
pub use error::{AclError, DynError, Result};
