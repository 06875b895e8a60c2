//! Line-oriented macro expander.
//!
//! Rewrites `@M NAME(args)` invocations using templates from a
//! `mc_defs::MacroRegistry`:
//!
//! - Arguments are split on commas, `%` escapes commas and itself
//! - Parameters are replaced as whole words, in order
//! - Each body line is indented by the invocation's indent plus its ladder step
//! - Expanded text is expanded again until no invocations remain, with
//!   cycle detection along the chain
//!
//! Invocations after a comment marker are ignored and unknown macro names are
//! left in place.

pub mod error;
pub mod expand;

pub use error::ExpandError;
pub use expand::{Expander, DEFAULT_MAX_DEPTH};
