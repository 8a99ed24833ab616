//! Source-sequential tree view (C9, §4.9).
//!
//! Independent from the schema AST: the schema AST uses unordered maps for
//! `resources`/`variables`/etc., which is unsuitable for "find the node at
//! this position" queries. The tree view re-derives a strictly ordered
//! tree from it once, after decoding, purely for downstream tooling
//! (hover, signature help, completion, selection ranges).

use crate::base::{Position, Range};
use crate::schema::ast::*;
use crate::value::MappingNode;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TreeNodeKind {
    NonTerminal,
    Leaf,
}

#[derive(Debug, Clone)]
pub struct TreeNode {
    pub label: String,
    pub path: String,
    pub kind: TreeNodeKind,
    pub children: Vec<TreeNode>,
    pub range: Range,
}

impl TreeNode {
    fn leaf(label: impl Into<String>, parent_path: &str, range: Range) -> Self {
        let label = label.into();
        let path = join_path(parent_path, &label);
        Self { label, path, kind: TreeNodeKind::Leaf, children: Vec::new(), range }
    }

    fn branch(label: impl Into<String>, parent_path: &str, range: Range, children: Vec<TreeNode>) -> Self {
        let label = label.into();
        let path = join_path(parent_path, &label);
        Self { label, path, kind: TreeNodeKind::NonTerminal, children, range }
    }
}

fn join_path(parent: &str, label: &str) -> String {
    if parent.is_empty() {
        format!("/{label}")
    } else {
        format!("{parent}/{label}")
    }
}

/// Step 2 + 3 of §4.9: sort `children` by start position (stable), then
/// set each non-last child's range-end to the next child's start, and
/// recurse into the last child's own descendant chain with the same
/// "inherited end" so the chain bottoms out consistently.
fn stitch(children: &mut [TreeNode], inherited_end: Option<Position>) {
    children.sort_by_key(|c| c.range.start);
    let n = children.len();
    for i in 0..n {
        if i + 1 < n {
            let next_start = children[i + 1].range.start;
            children[i].range = children[i].range.with_end(next_start);
        } else if let Some(end) = inherited_end {
            children[i].range = children[i].range.with_end(end);
        }
    }
    for child in children.iter_mut() {
        let end = child.range.end;
        stitch(&mut child.children, end);
    }
}

fn mapping_children(node: &MappingNode, parent_path: &str) -> Vec<TreeNode> {
    match node {
        MappingNode::Fields { entries, .. } => entries
            .iter()
            .map(|(key, value)| mapping_node_to_tree(key, value, parent_path))
            .collect(),
        MappingNode::Items { items, .. } => items
            .iter()
            .enumerate()
            .map(|(i, value)| mapping_node_to_tree(&i.to_string(), value, parent_path))
            .collect(),
        MappingNode::Scalar(_) | MappingNode::Interpolated(_) => Vec::new(),
    }
}

fn mapping_node_to_tree(label: &str, node: &MappingNode, parent_path: &str) -> TreeNode {
    match node {
        MappingNode::Fields { .. } | MappingNode::Items { .. } => {
            let path = join_path(parent_path, label);
            let children = mapping_children(node, &path);
            TreeNode::branch(label, parent_path, node.range(), children)
        }
        MappingNode::Scalar(_) | MappingNode::Interpolated(_) => TreeNode::leaf(label, parent_path, node.range()),
    }
}

fn condition_to_tree(label: &str, cond: &Condition, parent_path: &str) -> TreeNode {
    match cond {
        Condition::StringValue(_, range) => TreeNode::leaf(label, parent_path, *range),
        Condition::Not(inner, range) => {
            let path = join_path(parent_path, label);
            let child = condition_to_tree("not", inner, &path);
            TreeNode::branch(label, parent_path, *range, vec![child])
        }
        Condition::And(items, range) | Condition::Or(items, range) => {
            let path = join_path(parent_path, label);
            let children = items
                .iter()
                .enumerate()
                .map(|(i, c)| condition_to_tree(&i.to_string(), c, &path))
                .collect();
            TreeNode::branch(label, parent_path, *range, children)
        }
    }
}

fn variable_to_tree(name: &str, var: &Variable, parent_path: &str) -> TreeNode {
    let path = join_path(parent_path, name);
    let mut children = vec![TreeNode::leaf("type", &path, var.range)];
    if let Some(d) = &var.description {
        children.push(TreeNode::leaf("description", &path, d.range));
    }
    if let Some(default) = &var.default {
        children.push(mapping_node_to_tree("default", default, &path));
    }
    TreeNode::branch(name, parent_path, var.range, children)
}

fn value_to_tree(name: &str, v: &ValueDecl, parent_path: &str) -> TreeNode {
    let path = join_path(parent_path, name);
    let mut children = vec![mapping_node_to_tree("value", &v.value, &path)];
    if let Some(d) = &v.description {
        children.push(TreeNode::leaf("description", &path, d.range));
    }
    TreeNode::branch(name, parent_path, v.range, children)
}

fn resource_to_tree(name: &str, r: &Resource, parent_path: &str) -> TreeNode {
    let path = join_path(parent_path, name);
    let mut children = vec![
        TreeNode::leaf("type", &path, r.resource_type.range),
        mapping_node_to_tree("spec", &r.spec, &path),
    ];
    if let Some(d) = &r.description {
        children.push(TreeNode::leaf("description", &path, d.range));
    }
    if let Some(m) = &r.metadata {
        children.push(mapping_node_to_tree("metadata", m, &path));
    }
    if let Some(cond) = &r.condition {
        children.push(condition_to_tree("condition", cond, &path));
    }
    if let Some(each) = &r.each {
        children.push(TreeNode::leaf("each", &path, each.range));
    }
    TreeNode::branch(name, parent_path, r.range, children)
}

fn data_source_to_tree(name: &str, ds: &DataSource, parent_path: &str) -> TreeNode {
    let path = join_path(parent_path, name);
    let mut children = vec![
        TreeNode::leaf("type", &path, ds.data_source_type.range),
        mapping_node_to_tree("metadata", &ds.metadata, &path),
    ];
    if let Some(d) = &ds.description {
        children.push(TreeNode::leaf("description", &path, d.range));
    }
    TreeNode::branch(name, parent_path, ds.range, children)
}

fn export_to_tree(name: &str, e: &Export, parent_path: &str) -> TreeNode {
    let path = join_path(parent_path, name);
    let children = vec![TreeNode::leaf("field", &path, e.field.range)];
    TreeNode::branch(name, parent_path, e.range, children)
}

/// Builds the tree view for a decoded [`Blueprint`] (§4.9). The root's
/// range starts at (1,1) with no explicit end; every descendant carries an
/// end position after stitching.
pub fn build(bp: &Blueprint) -> TreeNode {
    let root_path = "";
    let mut children = vec![TreeNode::leaf("version", root_path, bp.version_range)];

    if !bp.variables.is_empty() {
        let path = join_path(root_path, "variables");
        let kids = bp.variables.iter().map(|(k, v)| variable_to_tree(k, v, &path)).collect();
        children.push(TreeNode::branch("variables", root_path, bp.range, kids));
    }
    if !bp.values.is_empty() {
        let path = join_path(root_path, "values");
        let kids = bp.values.iter().map(|(k, v)| value_to_tree(k, v, &path)).collect();
        children.push(TreeNode::branch("values", root_path, bp.range, kids));
    }
    if !bp.resources.is_empty() {
        let path = join_path(root_path, "resources");
        let kids = bp.resources.iter().map(|(k, v)| resource_to_tree(k, v, &path)).collect();
        children.push(TreeNode::branch("resources", root_path, bp.range, kids));
    }
    if !bp.datasources.is_empty() {
        let path = join_path(root_path, "datasources");
        let kids = bp.datasources.iter().map(|(k, v)| data_source_to_tree(k, v, &path)).collect();
        children.push(TreeNode::branch("datasources", root_path, bp.range, kids));
    }
    if !bp.exports.is_empty() {
        let path = join_path(root_path, "exports");
        let kids = bp.exports.iter().map(|(k, v)| export_to_tree(k, v, &path)).collect();
        children.push(TreeNode::branch("exports", root_path, bp.range, kids));
    }
    if let Some(m) = &bp.metadata {
        children.push(mapping_node_to_tree("metadata", m, root_path));
    }

    stitch(&mut children, None);
    TreeNode {
        label: String::new(),
        path: "/".to_string(),
        kind: TreeNodeKind::NonTerminal,
        children,
        range: Range::point(Position::new(1, 1)),
    }
}
