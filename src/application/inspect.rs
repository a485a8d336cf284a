//! Read-only views over a built tree, used by the CLI listings.

use crate::application::BlueprintValue;
use crate::domain::{Mode, Module, ParamValue};

/// One flattened parameter.
#[derive(Debug, Clone, PartialEq)]
pub struct ParameterLine {
    pub path: String,
    pub value: String,
    pub trainable: bool,
}

/// Mode of one node; the root has an empty path.
#[derive(Debug, Clone, PartialEq)]
pub struct ModeLine {
    pub path: String,
    pub kind: String,
    pub mode: Mode,
}

/// Render a blueprint leaf value as TOML text, `none` when absent.
pub fn format_value(value: &BlueprintValue) -> String {
    match value {
        Some(v) => v.to_string(),
        None => "none".to_string(),
    }
}

/// Switch the whole tree to `mode`.
pub fn apply_mode<V: ParamValue>(module: &mut dyn Module<V>, mode: Mode) {
    match mode {
        Mode::Train => module.train(),
        Mode::Eval => module.eval(),
    }
}

pub fn parameter_lines(module: &dyn Module<BlueprintValue>) -> Vec<ParameterLine> {
    module
        .named_parameters()
        .into_iter()
        .map(|(path, parameter)| ParameterLine {
            path,
            value: format_value(parameter.value()),
            trainable: parameter.is_trainable(),
        })
        .collect()
}

pub fn mode_lines<V: ParamValue>(module: &dyn Module<V>) -> Vec<ModeLine> {
    let root = ModeLine {
        path: String::new(),
        kind: module.type_name().into_owned(),
        mode: module.mode(),
    };
    std::iter::once(root)
        .chain(
            module
                .named_modules()
                .into_iter()
                .map(|(path, child)| ModeLine {
                    path,
                    kind: child.type_name().into_owned(),
                    mode: child.mode(),
                }),
        )
        .collect()
}
