//! Domain-level errors (no external dependencies)

use std::fmt;
use thiserror::Error;

/// Category an attribute name is registered under inside a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttrKind {
    Parameter,
    Module,
    Field,
}

impl fmt::Display for AttrKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            AttrKind::Parameter => "parameter",
            AttrKind::Module => "module",
            AttrKind::Field => "field",
        };
        f.write_str(s)
    }
}

/// Errors raised while reading or invoking a module tree.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ModuleError {
    #[error("attribute not found: {0}")]
    AttributeNotFound(String),

    #[error("forward is not implemented for {0}")]
    Unimplemented(String),

    #[error("attribute '{name}' is a {actual}, not a {expected}")]
    WrongKind {
        name: String,
        expected: AttrKind,
        actual: AttrKind,
    },
}

pub type ModuleResult<T> = Result<T, ModuleError>;
