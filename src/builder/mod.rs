//! Builder API for machine definitions.
//!
//! This module provides the definition builder, handler registration, the
//! `transitions!` macro and a serde document format for specs loaded from
//! outside Rust.

pub mod definition;
pub mod document;
pub mod error;
pub mod macros;

pub use definition::{Definition, DefinitionBuilder, Subscription};
pub use document::{SpecDocument, StateDecl, TransitionDecl};
pub use error::SpecError;

use crate::core::{Code, Symbol, TransitionSpec};
use std::sync::Arc;

/// Build a definition straight from a spec, validating it.
///
/// # Example
///
/// ```
/// use statekeeper::builder::definition_from;
/// use statekeeper::transitions;
///
/// let definition = definition_from::<i32, &str>(
///     "example",
///     transitions! { 0 => { "go" => 1 } },
/// )
/// .unwrap();
///
/// assert_eq!(definition.name(), "example");
/// ```
pub fn definition_from<C: Code, Y: Symbol>(
    name: impl Into<String>,
    spec: TransitionSpec<C, Y>,
) -> Result<Arc<Definition<C, Y>>, crate::core::ConfigError> {
    Definition::builder(name).transitions(spec).try_build()
}

/// Load a definition from a JSON [`SpecDocument`].
///
/// Configuration errors in the document are reported as
/// [`LoadError::Config`].
pub fn definition_from_json<C, Y>(
    name: impl Into<String>,
    json: &str,
) -> Result<Arc<Definition<C, Y>>, LoadError>
where
    C: Code + serde::de::DeserializeOwned,
    Y: Symbol + serde::de::DeserializeOwned,
{
    let spec = TransitionSpec::from_json(json)?;
    Ok(definition_from(name, spec)?)
}

/// Errors from [`definition_from_json`].
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error(transparent)]
    Spec(#[from] SpecError),

    #[error(transparent)]
    Config(#[from] crate::core::ConfigError),
}
