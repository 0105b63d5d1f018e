//! Onet (workspace facade crate).
//!
//! Keeps a single `onet::{core,types}` public API while the implementation
//! lives in dedicated crates under `crates/`.

pub use onet_core as core;
pub use onet_types as types;
