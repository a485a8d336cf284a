//! Declarative module trees loaded from TOML.
//!
//! ```toml
//! kind = "Network"
//!
//! [[parameters]]
//! name = "a"
//! value = 40
//!
//! [[repeat]]
//! prefix = "extra_"
//! count = 2
//!
//! [[modules]]
//! name = "layer"
//! kind = "Layer"
//!
//!   [[modules.parameters]]
//!   name = "w"
//!   value = 0.5
//!   trainable = false
//! ```

use std::path::Path;

use serde::Deserialize;
use tracing::{debug, instrument};

use crate::application::{ApplicationError, ApplicationResult, IoResultExt};
use crate::domain::module::join_path;
use crate::domain::{DynamicModule, Module, Parameter};

/// Leaf value of blueprint-built trees; `None` when the blueprint gives no value.
pub type BlueprintValue = Option<toml::Value>;

pub const DEFAULT_KIND: &str = "Module";

const ROOT_LABEL: &str = "<root>";

/// One node of a declarative tree.
///
/// Child nodes use the same schema plus a `name`; the root has none.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Blueprint {
    /// Local name under which a child is registered
    pub name: Option<String>,
    /// Type name shown when printing
    pub kind: String,
    pub parameters: Vec<ParameterSpec>,
    /// Plain data, not collected as parameters
    pub fields: Vec<FieldSpec>,
    /// Generated parameters named `<prefix><index>`
    pub repeat: Vec<RepeatSpec>,
    pub modules: Vec<Blueprint>,
}

impl Default for Blueprint {
    fn default() -> Self {
        Self {
            name: None,
            kind: DEFAULT_KIND.to_string(),
            parameters: Vec::new(),
            fields: Vec::new(),
            repeat: Vec::new(),
            modules: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ParameterSpec {
    pub name: String,
    #[serde(default)]
    pub value: Option<toml::Value>,
    #[serde(default = "default_trainable")]
    pub trainable: bool,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FieldSpec {
    pub name: String,
    pub value: toml::Value,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RepeatSpec {
    pub prefix: String,
    pub count: usize,
    #[serde(default)]
    pub value: Option<toml::Value>,
    #[serde(default = "default_trainable")]
    pub trainable: bool,
}

fn default_trainable() -> bool {
    true
}

impl Blueprint {
    pub fn new(kind: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            ..Self::default()
        }
    }

    /// Parse a blueprint from TOML text.
    pub fn from_toml_str(content: &str) -> ApplicationResult<Self> {
        Self::parse(content, Path::new("<inline>"))
    }

    /// Read and parse a blueprint file.
    #[instrument(level = "debug")]
    pub fn load(path: &Path) -> ApplicationResult<Self> {
        let content = std::fs::read_to_string(path).with_path_context("read blueprint", path)?;
        Self::parse(&content, path)
    }

    /// Instantiate the described tree.
    ///
    /// Per node, parameters are registered first, then fields, generated
    /// parameters and finally child modules; a repeated name replaces the
    /// earlier entry.
    #[instrument(level = "debug", skip(self), fields(kind = %self.kind))]
    pub fn build(&self) -> ApplicationResult<DynamicModule<BlueprintValue>> {
        if let Some(name) = &self.name {
            return Err(ApplicationError::InvalidName {
                module: ROOT_LABEL.to_string(),
                name: name.clone(),
                reason: "the root module takes no name".to_string(),
            });
        }
        self.build_at("")
    }

    fn parse(content: &str, origin: &Path) -> ApplicationResult<Self> {
        toml::from_str(content).map_err(|e| ApplicationError::Blueprint {
            path: origin.to_path_buf(),
            message: e.to_string(),
        })
    }

    fn build_at(&self, path: &str) -> ApplicationResult<DynamicModule<BlueprintValue>> {
        let mut module = DynamicModule::new(self.kind.clone());
        let node = module.node_mut();

        for spec in &self.parameters {
            validate_name(path, &spec.name)?;
            node.register_parameter(
                spec.name.clone(),
                Parameter::with_trainable(spec.value.clone(), spec.trainable),
            );
        }
        for spec in &self.fields {
            validate_name(path, &spec.name)?;
            node.set_field(spec.name.clone(), Some(spec.value.clone()));
        }
        for spec in &self.repeat {
            for i in 0..spec.count {
                let name = format!("{}{}", spec.prefix, i);
                validate_name(path, &name)?;
                node.register_parameter(
                    name,
                    Parameter::with_trainable(spec.value.clone(), spec.trainable),
                );
            }
        }
        for child in &self.modules {
            let name = child.name.as_deref().unwrap_or_default();
            validate_name(path, name)?;
            let built = child.build_at(&join_path(path, name))?;
            node.register_module(name.to_string(), built);
        }

        let label = if path.is_empty() { ROOT_LABEL } else { path };
        debug!(module = label, kind = %self.kind, "built module");
        Ok(module)
    }
}

fn validate_name(module: &str, name: &str) -> ApplicationResult<()> {
    let reason = if name.is_empty() {
        "name must not be empty"
    } else if name.contains('.') {
        "name must not contain '.'"
    } else {
        return Ok(());
    };
    Err(ApplicationError::InvalidName {
        module: if module.is_empty() {
            ROOT_LABEL.to_string()
        } else {
            module.to_string()
        },
        name: name.to_string(),
        reason: reason.to_string(),
    })
}
