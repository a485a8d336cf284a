use std::borrow::Cow;
use std::fmt;

use crate::domain::module::Module;
use crate::domain::node::Node;
use crate::domain::parameter::ParamValue;

/// Module whose shape is decided at runtime, named by a declared kind.
#[derive(Debug)]
pub struct DynamicModule<V: ParamValue> {
    kind: String,
    node: Node<V>,
}

impl<V: ParamValue> DynamicModule<V> {
    pub fn new(kind: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            node: Node::new(),
        }
    }

    pub fn kind(&self) -> &str {
        &self.kind
    }
}

impl<V: ParamValue> Module<V> for DynamicModule<V> {
    fn node(&self) -> &Node<V> {
        &self.node
    }

    fn node_mut(&mut self) -> &mut Node<V> {
        &mut self.node
    }

    fn type_name(&self) -> Cow<'_, str> {
        Cow::Borrowed(&self.kind)
    }
}

impl<V: ParamValue> fmt::Display for DynamicModule<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.repr())
    }
}
