use itertools::Itertools;
use termtree::Tree;

use crate::domain::node::Node;
use crate::domain::parameter::ParamValue;

pub(crate) fn repr<V: ParamValue>(type_name: &str, node: &Node<V>) -> String {
    let child_lines: Vec<String> = node
        .modules()
        .map(|(name, child)| format!("({}): {}", name, add_indent(&child.repr(), 2)))
        .collect();

    if child_lines.is_empty() {
        format!("{type_name}()")
    } else {
        format!("{type_name}(\n  {}\n)", child_lines.join("\n  "))
    }
}

pub(crate) fn tree<V: ParamValue>(label: String, node: &Node<V>) -> Tree<String> {
    let mut leaves = Vec::new();
    for (name, parameter) in node.parameters() {
        let marker = if parameter.is_trainable() { "" } else { " [frozen]" };
        leaves.push(Tree::new(format!("{name} = {parameter}{marker}")));
    }
    for (name, child) in node.modules() {
        leaves.push(tree(format!("({name}) {}", child.type_name()), child.node()));
    }
    Tree::new(label).with_leaves(leaves)
}

/// Indent every line but the first by `spaces`.
fn add_indent(s: &str, spaces: usize) -> String {
    let mut lines = s.split('\n');
    let first = lines.next().unwrap_or_default();
    let pad = " ".repeat(spaces);
    std::iter::once(first.to_string())
        .chain(lines.map(|line| format!("{pad}{line}")))
        .join("\n")
}
