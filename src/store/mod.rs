// Copyright (c) 2025 - Cowboy AI, Inc.
//! Revisioned Document Store
//!
//! The document database itself is an external collaborator reached through
//! the HTTP API. This module provides an in-process store with the same
//! revision semantics for tests and offline use.
//!
//! # Store Requirements
//!
//! 1. **Whole documents**: A zone is read and written as one document
//! 2. **Revisioned**: Every successful write yields a new revision token
//! 3. **Optimistic concurrency**: A write carrying a stale token fails with
//!    `Conflict` and leaves the stored document unchanged
//! 4. **Cascading delete**: Deleting a zone removes everything nested in it

pub mod memory;

pub use memory::{next_revision, zone_document_id, InMemoryZoneStore, StoreOp};
