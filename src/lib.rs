//! Composable module trees.
//!
//! A module owns named parameters (leaf values), named child modules and plain
//! fields. Trees are flattened into dotted parameter paths and switched between
//! train and eval mode as a whole.
//!
//! Layers:
//! - [`domain`]: the tree itself (`Module`, `Node`, `Parameter`), no I/O
//! - [`application`]: declarative blueprints and read-only views
//! - [`config`]: layered settings for the command-line front end
//! - [`cli`]: argument parsing and command dispatch

pub mod application;
pub mod cli;
pub mod config;
pub mod domain;
pub mod exitcode;
pub mod util;

pub use domain::{
    Attr, AttrKind, AttrRef, DynamicModule, Mode, Module, ModuleError, ModuleResult, Node,
    ParamValue, Parameter, Registry,
};
