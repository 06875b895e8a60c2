//! Macro definitions for mcproc.
//!
//! Reads INI-style definition files into `MacroDefinition` records and merges
//! them into a `MacroRegistry`, enforcing the directory-nesting override rule.

pub mod definition;
pub mod error;
pub mod ini;
pub mod registry;

pub use definition::{parse_definitions, parse_definitions_str};
pub use error::DefinitionError;
pub use registry::{MacroRegistry, OverridePolicy, OverrideRule};
