//! Domain layer: the module/parameter tree
//!
//! This layer is independent of external concerns (no I/O, no CLI, no config loading).

pub mod dynamic;
pub mod error;
pub mod mode;
pub mod module;
pub mod node;
pub mod parameter;
pub mod registry;
mod render;

pub use dynamic::DynamicModule;
pub use error::{AttrKind, ModuleError, ModuleResult};
pub use mode::Mode;
pub use module::Module;
pub use node::{Attr, AttrRef, Node};
pub use parameter::{ParamValue, Parameter};
pub use registry::Registry;
