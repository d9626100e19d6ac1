//! Common types and utilities for the jolt bundler.
//!
//! This crate provides foundational types used across all jolt crates:
//! - Source spans (`Span`, `Spanned`)
//! - Source file handles (`Source`)
//! - WTF-8/UTF-16 codecs and identifier predicates (`utf`)
//! - Diagnostics (`Msg`, `Log`)
//! - Concurrency primitives (`WaitGroup`, `Semaphore`)

// Span - Source location tracking (byte offsets)
pub mod span;
pub use span::{Span, Spanned};

// Source file handles and line/column lookup
pub mod source;
pub use source::Source;

// WTF-8 / UTF-16 codecs and identifier predicates
pub mod utf;

// Diagnostics
pub mod diagnostics;
pub use diagnostics::{Log, Msg, MsgData, MsgKind, MsgLocation};

// Concurrency primitives
pub mod sync;
pub use sync::{Semaphore, WaitGroup};
