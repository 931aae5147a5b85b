//! API request handlers.

/// Model catalogue handlers.
pub mod models;
/// Pattern generation and prompt preview handlers.
pub mod patterns;
/// Transient hand-off storage handlers.
pub mod transient;
