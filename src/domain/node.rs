//! Storage embedded by every module: named parameters, child modules and plain fields.

use std::fmt;

use tracing::trace;

use crate::domain::error::{AttrKind, ModuleError, ModuleResult};
use crate::domain::mode::Mode;
use crate::domain::module::Module;
use crate::domain::parameter::{ParamValue, Parameter};
use crate::domain::registry::Registry;

/// A value assigned to a node under a name.
///
/// The variant decides where the node files it: parameters and modules are
/// tracked by the tree machinery, fields are plain data.
pub enum Attr<V: ParamValue> {
    Parameter(Parameter<V>),
    Module(Box<dyn Module<V>>),
    Field(V),
}

impl<V: ParamValue> Attr<V> {
    pub fn module<M: Module<V> + 'static>(module: M) -> Self {
        Attr::Module(Box::new(module))
    }

    pub fn kind(&self) -> AttrKind {
        match self {
            Attr::Parameter(_) => AttrKind::Parameter,
            Attr::Module(_) => AttrKind::Module,
            Attr::Field(_) => AttrKind::Field,
        }
    }
}

impl<V: ParamValue> From<Parameter<V>> for Attr<V> {
    fn from(parameter: Parameter<V>) -> Self {
        Attr::Parameter(parameter)
    }
}

/// Borrowed view of a registered attribute.
pub enum AttrRef<'a, V: ParamValue> {
    Parameter(&'a Parameter<V>),
    Module(&'a dyn Module<V>),
    Field(&'a V),
}

impl<'a, V: ParamValue> AttrRef<'a, V> {
    pub fn kind(&self) -> AttrKind {
        match self {
            AttrRef::Parameter(_) => AttrKind::Parameter,
            AttrRef::Module(_) => AttrKind::Module,
            AttrRef::Field(_) => AttrKind::Field,
        }
    }

    pub fn as_parameter(&self) -> Option<&'a Parameter<V>> {
        match self {
            AttrRef::Parameter(p) => Some(p),
            _ => None,
        }
    }

    pub fn as_module(&self) -> Option<&'a dyn Module<V>> {
        match self {
            AttrRef::Module(m) => Some(*m),
            _ => None,
        }
    }

    pub fn as_field(&self) -> Option<&'a V> {
        match self {
            AttrRef::Field(v) => Some(v),
            _ => None,
        }
    }
}

/// Tree node storage.
///
/// Each name lives in at most one of the three registries; assigning a name
/// evicts it from the other two.
pub struct Node<V: ParamValue> {
    mode: Mode,
    parameters: Registry<Parameter<V>>,
    modules: Registry<Box<dyn Module<V>>>,
    fields: Registry<V>,
}

impl<V: ParamValue> Default for Node<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V: ParamValue> Node<V> {
    pub fn new() -> Self {
        Self {
            mode: Mode::Train,
            parameters: Registry::new(),
            modules: Registry::new(),
            fields: Registry::new(),
        }
    }

    /// Assign `attr` under `name`, replacing whatever was stored there before.
    pub fn set(&mut self, name: impl Into<String>, attr: Attr<V>) {
        match attr {
            Attr::Parameter(p) => {
                self.register_parameter(name, p);
            }
            Attr::Module(m) => {
                self.register_boxed_module(name, m);
            }
            Attr::Field(v) => {
                self.set_field(name, v);
            }
        }
    }

    pub fn register_parameter(
        &mut self,
        name: impl Into<String>,
        parameter: Parameter<V>,
    ) -> &mut Parameter<V> {
        let name = name.into();
        self.evict(&name, AttrKind::Parameter);
        trace!(name = %name, "register parameter");
        self.parameters.upsert(name, parameter)
    }

    pub fn register_module<M: Module<V> + 'static>(
        &mut self,
        name: impl Into<String>,
        module: M,
    ) -> &mut (dyn Module<V> + 'static) {
        self.register_boxed_module(name, Box::new(module))
    }

    pub fn register_boxed_module(
        &mut self,
        name: impl Into<String>,
        module: Box<dyn Module<V>>,
    ) -> &mut (dyn Module<V> + 'static) {
        let name = name.into();
        self.evict(&name, AttrKind::Module);
        trace!(name = %name, kind = %module.type_name(), "register module");
        &mut **self.modules.upsert(name, module)
    }

    pub fn set_field(&mut self, name: impl Into<String>, value: V) -> &mut V {
        let name = name.into();
        self.evict(&name, AttrKind::Field);
        trace!(name = %name, "set field");
        self.fields.upsert(name, value)
    }

    /// Wrap `value` in a trainable parameter and register it under `name`.
    pub fn add_parameter(&mut self, name: impl Into<String>, value: V) -> &mut Parameter<V> {
        self.register_parameter(name, Parameter::new(value))
    }

    /// Look up `name`: parameters first, then modules, then fields.
    pub fn get(&self, name: &str) -> ModuleResult<AttrRef<'_, V>> {
        if let Some(p) = self.parameters.get(name) {
            return Ok(AttrRef::Parameter(p));
        }
        if let Some(m) = self.modules.get(name) {
            return Ok(AttrRef::Module(&**m));
        }
        if let Some(v) = self.fields.get(name) {
            return Ok(AttrRef::Field(v));
        }
        Err(ModuleError::AttributeNotFound(name.to_string()))
    }

    pub fn kind_of(&self, name: &str) -> Option<AttrKind> {
        if self.parameters.contains_key(name) {
            Some(AttrKind::Parameter)
        } else if self.modules.contains_key(name) {
            Some(AttrKind::Module)
        } else if self.fields.contains_key(name) {
            Some(AttrKind::Field)
        } else {
            None
        }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.kind_of(name).is_some()
    }

    pub fn parameter(&self, name: &str) -> ModuleResult<&Parameter<V>> {
        self.parameters
            .get(name)
            .ok_or_else(|| self.lookup_error(name, AttrKind::Parameter))
    }

    pub fn parameter_mut(&mut self, name: &str) -> ModuleResult<&mut Parameter<V>> {
        self.ensure_kind(name, AttrKind::Parameter)?;
        self.parameters
            .get_mut(name)
            .ok_or_else(|| ModuleError::AttributeNotFound(name.to_string()))
    }

    pub fn module(&self, name: &str) -> ModuleResult<&dyn Module<V>> {
        self.modules
            .get(name)
            .map(|m| &**m as &dyn Module<V>)
            .ok_or_else(|| self.lookup_error(name, AttrKind::Module))
    }

    pub fn module_mut(&mut self, name: &str) -> ModuleResult<&mut (dyn Module<V> + 'static)> {
        self.ensure_kind(name, AttrKind::Module)?;
        self.modules
            .get_mut(name)
            .map(|m| &mut **m)
            .ok_or_else(|| ModuleError::AttributeNotFound(name.to_string()))
    }

    pub fn field(&self, name: &str) -> ModuleResult<&V> {
        self.fields
            .get(name)
            .ok_or_else(|| self.lookup_error(name, AttrKind::Field))
    }

    pub fn field_mut(&mut self, name: &str) -> ModuleResult<&mut V> {
        self.ensure_kind(name, AttrKind::Field)?;
        self.fields
            .get_mut(name)
            .ok_or_else(|| ModuleError::AttributeNotFound(name.to_string()))
    }

    /// Remove `name` from whichever registry holds it.
    pub fn remove(&mut self, name: &str) -> ModuleResult<Attr<V>> {
        if let Some(p) = self.parameters.remove(name) {
            return Ok(Attr::Parameter(p));
        }
        if let Some(m) = self.modules.remove(name) {
            return Ok(Attr::Module(m));
        }
        if let Some(v) = self.fields.remove(name) {
            return Ok(Attr::Field(v));
        }
        Err(ModuleError::AttributeNotFound(name.to_string()))
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// Set the mode of this node only; children are untouched.
    pub fn set_mode(&mut self, mode: Mode) {
        self.mode = mode;
    }

    pub fn parameters(&self) -> impl DoubleEndedIterator<Item = (&str, &Parameter<V>)> {
        self.parameters.iter()
    }

    pub fn modules(&self) -> impl DoubleEndedIterator<Item = (&str, &dyn Module<V>)> {
        self.modules
            .iter()
            .map(|(name, m)| (name, &**m as &dyn Module<V>))
    }

    pub fn modules_mut(&mut self) -> impl DoubleEndedIterator<Item = &mut Box<dyn Module<V>>> {
        self.modules.values_mut()
    }

    pub fn fields(&self) -> impl DoubleEndedIterator<Item = (&str, &V)> {
        self.fields.iter()
    }

    /// Disjoint mutable access to parameters and children for recursive walks.
    pub(crate) fn parts_mut(
        &mut self,
    ) -> (
        &mut Registry<Parameter<V>>,
        &mut Registry<Box<dyn Module<V>>>,
    ) {
        (&mut self.parameters, &mut self.modules)
    }

    pub fn is_empty(&self) -> bool {
        self.parameters.is_empty() && self.modules.is_empty() && self.fields.is_empty()
    }

    fn evict(&mut self, name: &str, keep: AttrKind) {
        let evicted = match keep {
            AttrKind::Parameter => {
                self.modules.remove(name).is_some() | self.fields.remove(name).is_some()
            }
            AttrKind::Module => {
                self.parameters.remove(name).is_some() | self.fields.remove(name).is_some()
            }
            AttrKind::Field => {
                self.parameters.remove(name).is_some() | self.modules.remove(name).is_some()
            }
        };
        if evicted {
            trace!(name = %name, now = %keep, "reclassified attribute");
        }
    }

    fn ensure_kind(&self, name: &str, expected: AttrKind) -> ModuleResult<()> {
        match self.kind_of(name) {
            Some(actual) if actual == expected => Ok(()),
            _ => Err(self.lookup_error(name, expected)),
        }
    }

    fn lookup_error(&self, name: &str, expected: AttrKind) -> ModuleError {
        match self.kind_of(name) {
            Some(actual) => ModuleError::WrongKind {
                name: name.to_string(),
                expected,
                actual,
            },
            None => ModuleError::AttributeNotFound(name.to_string()),
        }
    }
}

impl<V: ParamValue> fmt::Debug for Node<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Node")
            .field("mode", &self.mode)
            .field("parameters", &self.parameters)
            .field("modules", &self.modules.keys().collect::<Vec<_>>())
            .field("fields", &self.fields)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Leafless {
        node: Node<i64>,
    }

    impl Module<i64> for Leafless {
        fn node(&self) -> &Node<i64> {
            &self.node
        }

        fn node_mut(&mut self) -> &mut Node<i64> {
            &mut self.node
        }
    }

    #[test]
    fn test_set_classifies_by_variant() {
        let mut node: Node<i64> = Node::new();
        node.set("p", Parameter::new(1).into());
        node.set("m", Attr::module(Leafless::default()));
        node.set("f", Attr::Field(3));

        assert_eq!(node.kind_of("p"), Some(AttrKind::Parameter));
        assert_eq!(node.kind_of("m"), Some(AttrKind::Module));
        assert_eq!(node.kind_of("f"), Some(AttrKind::Field));
        assert_eq!(node.kind_of("x"), None);
    }

    #[test]
    fn test_reassignment_moves_name_between_categories() {
        let mut node: Node<i64> = Node::new();
        node.set_field("x", 1);
        node.add_parameter("x", 2);
        assert!(node.field("x").is_err());
        assert_eq!(*node.parameter("x").unwrap().value(), 2);

        node.register_module("x", Leafless::default());
        assert_eq!(node.parameters().count(), 0);
        assert!(node.module("x").is_ok());
    }

    #[test]
    fn test_get_reports_missing_name() {
        let node: Node<i64> = Node::new();
        assert_eq!(
            node.get("ghost").err(),
            Some(ModuleError::AttributeNotFound("ghost".into()))
        );
    }

    #[test]
    fn test_typed_getter_reports_wrong_kind() {
        let mut node: Node<i64> = Node::new();
        node.set_field("data", 25);
        let err = node.parameter_mut("data").unwrap_err();
        assert_eq!(
            err,
            ModuleError::WrongKind {
                name: "data".into(),
                expected: AttrKind::Parameter,
                actual: AttrKind::Field,
            }
        );
    }

    #[test]
    fn test_remove_returns_stored_attribute() {
        let mut node: Node<i64> = Node::new();
        node.add_parameter("p", 7);
        match node.remove("p") {
            Ok(Attr::Parameter(p)) => assert_eq!(p.into_value(), 7),
            _ => panic!("expected parameter"),
        }
        assert!(node.is_empty());
        assert!(node.remove("p").is_err());
    }
}
