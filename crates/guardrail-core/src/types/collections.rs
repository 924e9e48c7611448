//! Collection aliases used throughout the workspace.
//!
//! FxHash is a non-cryptographic hasher; identifiers here are short interned
//! strings, which is its best case.

pub use rustc_hash::{FxHashMap, FxHashSet};
