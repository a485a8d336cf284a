//! The `Module` trait: the extension point collaborators implement.
//!
//! A module is a struct that embeds a [`Node`] and registers its parameters,
//! children and plain fields in its constructor:
//!
//! ```ignore
//! struct Layer {
//!     node: Node<f64>,
//! }
//!
//! impl Layer {
//!     fn new() -> Self {
//!         let mut node = Node::new();
//!         node.register_parameter("weight", Parameter::new(0.5));
//!         node.set_field("width", 3.0);
//!         Self { node }
//!     }
//! }
//!
//! impl Module<f64> for Layer {
//!     fn node(&self) -> &Node<f64> { &self.node }
//!     fn node_mut(&mut self) -> &mut Node<f64> { &mut self.node }
//! }
//! ```
//!
//! Everything else (mode propagation, dotted-name flattening, printing) comes
//! from the provided methods.

use std::borrow::Cow;

use termtree::Tree;
use tracing::{debug, instrument, warn};

use crate::domain::error::{ModuleError, ModuleResult};
use crate::domain::mode::Mode;
use crate::domain::node::Node;
use crate::domain::parameter::{ParamValue, Parameter};
use crate::domain::registry::Registry;
use crate::domain::render;

pub trait Module<V: ParamValue> {
    fn node(&self) -> &Node<V>;

    fn node_mut(&mut self) -> &mut Node<V>;

    /// Name shown when printing the tree; defaults to the short type name.
    fn type_name(&self) -> Cow<'_, str> {
        Cow::Borrowed(short_type_name(std::any::type_name_of_val(self)))
    }

    /// Computation hook. Modules that can be invoked override this.
    fn forward(&self, _input: &[V]) -> ModuleResult<V> {
        Err(ModuleError::Unimplemented(self.type_name().into_owned()))
    }

    /// Invoke the module; forwards to [`Module::forward`].
    fn call(&self, input: &[V]) -> ModuleResult<V> {
        self.forward(input)
    }

    fn mode(&self) -> Mode {
        self.node().mode()
    }

    /// Put this module and every descendant in train mode.
    fn train(&mut self) {
        self.node_mut().set_mode(Mode::Train);
        for child in self.node_mut().modules_mut() {
            child.train();
        }
    }

    /// Put this module and every descendant in eval mode.
    fn eval(&mut self) {
        self.node_mut().set_mode(Mode::Eval);
        for child in self.node_mut().modules_mut() {
            child.eval();
        }
    }

    /// Direct children in registration order.
    fn modules(&self) -> Vec<&dyn Module<V>> {
        self.node().modules().map(|(_, m)| m).collect()
    }

    /// Every descendant module keyed by dotted path, pre-order; `self` is not included.
    fn named_modules(&self) -> Vec<(String, &dyn Module<V>)> {
        let mut out = Vec::new();
        collect_modules(self.node(), "", &mut out);
        out
    }

    /// Every parameter reachable from this module keyed by dotted path.
    ///
    /// Own parameters come first and carry no prefix, then each child's
    /// parameters in registration order, depth first.
    #[instrument(level = "trace", skip(self))]
    fn named_parameters(&self) -> Registry<&Parameter<V>> {
        let mut out = Registry::new();
        collect_parameters(self.node(), "", &mut out);
        debug!(count = out.len(), "collected parameters");
        out
    }

    fn parameters(&self) -> Vec<&Parameter<V>> {
        self.named_parameters().into_values().collect()
    }

    /// Mutable counterpart of [`Module::named_parameters`], for drivers that `update` leaves.
    ///
    /// Colliding dotted paths are all kept.
    fn named_parameters_mut(&mut self) -> Vec<(String, &mut Parameter<V>)> {
        let mut out = Vec::new();
        collect_parameters_mut(self.node_mut(), "", &mut out);
        out
    }

    /// Register `value` as a trainable parameter under `name`.
    ///
    /// Through a trait object, use `node_mut().add_parameter(..)`.
    fn add_parameter(&mut self, name: impl Into<String>, value: V) -> &mut Parameter<V>
    where
        Self: Sized,
    {
        self.node_mut().add_parameter(name, value)
    }

    /// Multi-line structural representation, e.g. `Net(\n  (layer): Layer()\n)`.
    fn repr(&self) -> String {
        render::repr(&self.type_name(), self.node())
    }

    /// Tree rendering including parameters and their values.
    fn to_tree(&self) -> Tree<String> {
        render::tree(self.type_name().into_owned(), self.node())
    }
}

/// Strip the module path and generic arguments from a type name.
pub(crate) fn short_type_name(full: &str) -> &str {
    let base = full.split('<').next().unwrap_or(full);
    base.rsplit("::").next().unwrap_or(base)
}

pub(crate) fn join_path(prefix: &str, name: &str) -> String {
    if prefix.is_empty() {
        name.to_string()
    } else {
        format!("{prefix}.{name}")
    }
}

fn collect_parameters<'a, V: ParamValue>(
    node: &'a Node<V>,
    prefix: &str,
    out: &mut Registry<&'a Parameter<V>>,
) {
    for (name, parameter) in node.parameters() {
        let path = join_path(prefix, name);
        if out.insert(path.clone(), parameter).is_some() {
            warn!(path = %path, "dotted parameter name collision, later entry wins");
        }
    }
    for (name, child) in node.modules() {
        collect_parameters(child.node(), &join_path(prefix, name), out);
    }
}

fn collect_parameters_mut<'a, V: ParamValue>(
    node: &'a mut Node<V>,
    prefix: &str,
    out: &mut Vec<(String, &'a mut Parameter<V>)>,
) {
    let (parameters, modules) = node.parts_mut();
    for (name, parameter) in parameters.iter_mut() {
        out.push((join_path(prefix, name), parameter));
    }
    for (name, child) in modules.iter_mut() {
        let path = join_path(prefix, name);
        collect_parameters_mut(child.node_mut(), &path, out);
    }
}

fn collect_modules<'a, V: ParamValue>(
    node: &'a Node<V>,
    prefix: &str,
    out: &mut Vec<(String, &'a dyn Module<V>)>,
) {
    for (name, child) in node.modules() {
        let path = join_path(prefix, name);
        out.push((path.clone(), child));
        collect_modules(child.node(), &path, out);
    }
}
