//! Prompt templates: lookup, substitution and rendering.
//!
//! - [`TemplateResolver`] finds the template for a pattern, provider and
//!   technique, plus the pattern's output schema when the provider takes one
//! - [`PromptBuilder`] routes the model, resolves the template and fills in
//!   the request labels and the few-shot block

/// Prompt assembly from requests.
pub mod builder;
/// Template and schema lookup.
pub mod resolver;
/// `$placeholder` substitution.
pub mod template;

pub use builder::{BuiltPrompt, PromptBuilder};
pub use resolver::{FsPromptStore, PromptStore, ResolvedTemplate, TemplateResolver, Technique};
pub use template::safe_substitute;
