// /////////////////////////////////////////////////////////////////////////////
// CopyTree
// Copyright (c) 2025 CopyTree Contributors
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Directory Tree Renderer
//!
//! Builds the tree text every formatter embeds in its metadata/header
//! section (spec §4.16: "The tree is built from the (sorted) relative
//! paths and drawn with the characters `├── `, `└── `, `│   `, and
//! `    ` under a top-of-tree label derived from the base path").

use std::collections::BTreeMap;

#[derive(Debug, Default)]
struct TreeNode {
    children: BTreeMap<String, TreeNode>,
    is_file: bool,
}

/// Renders a tree listing for `paths` (already sorted by the Sort stage;
/// this function does not re-sort) under `root_label`.
pub fn render_tree(root_label: &str, paths: &[&str]) -> String {
    let mut root = TreeNode::default();
    for path in paths {
        let mut node = &mut root;
        let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
        for (i, segment) in segments.iter().enumerate() {
            node = node.children.entry(segment.to_string()).or_default();
            if i == segments.len() - 1 {
                node.is_file = true;
            }
        }
    }

    let mut out = String::new();
    out.push_str(root_label);
    out.push('\n');
    render_children(&root, "", &mut out);
    out
}

fn render_children(node: &TreeNode, prefix: &str, out: &mut String) {
    let count = node.children.len();
    for (i, (name, child)) in node.children.iter().enumerate() {
        let is_last = i == count - 1;
        let connector = if is_last { "└── " } else { "├── " };
        out.push_str(prefix);
        out.push_str(connector);
        out.push_str(name);
        out.push('\n');

        let child_prefix = format!("{prefix}{}", if is_last { "    " } else { "│   " });
        render_children(child, &child_prefix, out);
    }
}
