//! Rendering helpers for trees.
//!
//! This module provides the ASCII pretty printer and small helpers for
//! building its header.

use tracing::info;

use crate::{
    row::{format_row, Tabular},
    tree::Node,
};

/// Connector in front of a row that has later siblings.
pub const BRANCH: &str = "├───";
/// Connector in front of the last row among its siblings.
pub const LAST_BRANCH: &str = "└───";

const FIRST_COLUMN_WIDTH: usize = 25;
const COLUMN_WIDTH: usize = 14;

/// Renders the subtree rooted at `root` as an indented ASCII tree.
///
/// The root's header, when set, becomes the first line. The root's row
/// formatter, when set, renders every row; otherwise rows come from
/// [`format_row`]. Every line ends with a newline.
///
/// # Arguments
/// * `root` - The node to render, printed without a connector
///
/// # Returns
/// * `String` - The rendered tree
pub fn format_tree<T: Tabular>(root: &Node<T>) -> String {
    let mut out = String::new();

    if let Some(header) = root.header() {
        for (index, title) in header.iter().enumerate() {
            let width = if index == 0 {
                FIRST_COLUMN_WIDTH
            } else {
                COLUMN_WIDTH
            };
            out.push_str(&format!("{:<width$}", title, width = width));
        }
        out.push('\n');
    }

    let formatter = root.row_formatter();
    let render = |node: &Node<T>| match &formatter {
        Some(formatter) => formatter(node),
        None => default_row(node),
    };

    out.push_str(&render(root));
    out.push('\n');

    // Stack holds (node, inherited prefix, is last sibling) triples
    let mut stack = Vec::new();
    push_children(&mut stack, root, "");

    while let Some((node, prefix, last)) = stack.pop() {
        let connector = if last { LAST_BRANCH } else { BRANCH };
        out.push_str(&prefix);
        out.push_str(connector);
        out.push_str(&render(&node));
        out.push('\n');

        let extension = if last { "    " } else { "│   " };
        push_children(&mut stack, &node, &format!("{}{}", prefix, extension));
    }

    out
}

fn push_children<T>(stack: &mut Vec<(Node<T>, String, bool)>, node: &Node<T>, prefix: &str) {
    let children = node.children();
    let count = children.len();
    // Reverse so the first child is rendered next
    for (index, child) in children.into_iter().enumerate().rev() {
        stack.push((child, prefix.to_string(), index + 1 == count));
    }
}

/// First cell with a trailing period, followed by the remaining cells.
fn default_row<T: Tabular>(node: &Node<T>) -> String {
    let cells = format_row(&*node.payload());
    match cells.split_first() {
        Some((first, rest)) => format!("{}.{}", first, rest.concat()),
        None => String::new(),
    }
}

/// Pretty prints a tree through the log, one line per row.
///
/// # Arguments
/// * `root` - The root node of the tree to print
pub fn pretty_print_tree<T: Tabular>(root: &Node<T>) {
    for line in format_tree(root).lines() {
        info!("{}", line);
    }
}

/// Header titles taken from a record's column names.
pub fn columns_header<T: Tabular>() -> Vec<String> {
    T::columns().into_iter().map(str::to_string).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn sample() -> Node<&'static str> {
        let root = Node::container("x", "root").unwrap();
        let a = Node::container("x", "a").unwrap();
        let b = Node::container("x", "b").unwrap();
        root.add_child(&a).unwrap();
        root.add_child(&b).unwrap();
        a.insert_leaf("a1").unwrap();
        a.insert_leaf("a2").unwrap();
        b.insert_leaf("b1").unwrap();
        root
    }

    #[test]
    fn renders_connectors_and_prefixes() {
        let expected = "\
root.
├───a.
│   ├───a1.
│   └───a2.
└───b.
    └───b1.
";
        assert_eq!(format_tree(&sample()), expected);
    }

    #[test]
    fn header_columns_are_padded() {
        let root = Node::leaf("x", "only").unwrap();
        root.set_header(["Name", "Size", "Pulls"]);
        let rendered = format_tree(&root);
        let header = rendered.lines().next().unwrap();
        assert_eq!(header.len(), 25 + 14 + 14);
        assert!(header.starts_with("Name "));
        assert_eq!(&header[25..29], "Size");
        assert_eq!(&header[39..44], "Pulls");
        assert_eq!(rendered.lines().nth(1), Some("only."));
    }

    #[test]
    fn row_formatter_applies_to_every_row() {
        let root = sample();
        root.set_row_formatter(|node| format!("{}@{}", node.payload(), node.depth()));
        let rendered = format_tree(&root);
        assert!(rendered.starts_with("root@0\n├───a@1\n│   ├───a1@2\n"));

        root.clear_row_formatter();
        assert!(format_tree(&root).starts_with("root.\n"));
    }

    #[test]
    fn pretty_print_leaves_tree_untouched() {
        let root = sample();
        let before = format_tree(&root);
        pretty_print_tree(&root);
        assert_eq!(format_tree(&root), before);
    }

    #[test]
    fn columns_header_uses_record_fields() {
        struct Pair {
            left: u8,
            right: u8,
        }
        crate::tabular!(Pair { left, right });
        assert_eq!(columns_header::<Pair>(), vec!["left", "right"]);
        assert_eq!(format_row(&Pair { left: 1, right: 2 }), vec!["1", "2"]);
    }
}
