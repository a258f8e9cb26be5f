//! Browser platform layer
//!
//! DOM access and the share/clipboard plumbing. Only compiled for wasm32;
//! everything it needs to decide lives in the pure `share` and `session` modules.

pub mod dom;
pub mod share;
