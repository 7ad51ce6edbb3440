// Copyright (c) 2025 - Cowboy AI, Inc.
//! Zone Aggregate Edits
//!
//! Environments and servers are never stored on their own. Every change to
//! them is expressed as a [`TreeEdit`] applied to the owning zone document by
//! a pure handler, and the whole rewritten zone is then written back.
//!
//! ```text
//! Zone (read) ──apply_edit──> Zone (rewritten) ──> store write (same revision)
//! ```

pub mod commands;
pub mod handlers;

pub use commands::TreeEdit;
pub use handlers::{
    add_environment, add_server, apply_edit, remove_environment, remove_server,
    replace_environment, replace_server,
};
