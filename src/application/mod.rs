//! Application layer: blueprint loading and use cases
//!
//! This layer builds domain trees from external descriptions and owns the
//! I/O boundary for them.

pub mod blueprint;
pub mod error;
pub mod error_ext;
pub mod inspect;

pub use blueprint::{Blueprint, BlueprintValue, FieldSpec, ParameterSpec, RepeatSpec};
pub use error::{ApplicationError, ApplicationResult};
pub use error_ext::IoResultExt;
pub use inspect::{format_value, ModeLine, ParameterLine};
