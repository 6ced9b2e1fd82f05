//! Depth-first projection of a forest into indented rows

use serde::Serialize;

use crate::entity::account::AccountKind;
use crate::tree::Forest;

/// One display row of the chart of accounts
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TreeRow {
    pub id: String,
    pub code: String,
    pub name: String,
    pub kind: AccountKind,
    pub is_leaf: bool,
    pub depth: usize,
    pub has_children: bool,
    /// Left offset, proportional to depth
    pub indent: usize,
}

/// Rows in pre-order, parents before their children
pub fn rows(forest: &Forest<'_>, indent_width: usize) -> Vec<TreeRow> {
    forest
        .walk()
        .map(|(depth, node)| TreeRow {
            id: node.account.id.clone(),
            code: node.account.code.clone(),
            name: node.account.name.clone(),
            kind: node.account.kind,
            is_leaf: node.account.is_leaf,
            depth,
            has_children: !node.children.is_empty(),
            indent: depth * indent_width,
        })
        .collect()
}

/// Plain text rendering, one `code name` line per account
pub fn render_text(forest: &Forest<'_>, indent_width: usize) -> String {
    let mut out = String::new();
    for (depth, node) in forest.walk() {
        out.push_str(&" ".repeat(depth * indent_width));
        out.push_str(&node.account.code);
        out.push(' ');
        out.push_str(&node.account.name);
        out.push('\n');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::account::test_account;
    use crate::tree::organize;

    #[test]
    fn test_rows_depth_and_indent() {
        let mut leaf = test_account("b", "1.1", Some("a"));
        leaf.is_leaf = true;
        let accounts = vec![leaf, test_account("a", "1", None), test_account("c", "2", None)];
        let forest = organize(&accounts);

        let rows = rows(&forest, 20);
        let summary: Vec<(&str, usize, usize, bool)> = rows
            .iter()
            .map(|r| (r.id.as_str(), r.depth, r.indent, r.has_children))
            .collect();
        assert_eq!(
            summary,
            vec![("a", 0, 0, true), ("b", 1, 20, false), ("c", 0, 0, false)]
        );
        assert!(rows[1].is_leaf);
    }

    #[test]
    fn test_render_text() {
        let accounts = vec![
            test_account("a", "1", None),
            test_account("b", "1.1", Some("a")),
            test_account("c", "1.1.01", Some("b")),
        ];
        let text = render_text(&organize(&accounts), 2);
        assert_eq!(text, "1 Conta 1\n  1.1 Conta 1.1\n    1.1.01 Conta 1.1.01\n");
    }

    #[test]
    fn test_rows_json_shape() {
        let accounts = vec![test_account("a", "1", None)];
        let rows = rows(&organize(&accounts), 16);
        let value = serde_json::to_value(&rows).unwrap();
        assert_eq!(value[0]["hasChildren"], false);
        assert_eq!(value[0]["isLeaf"], false);
        assert_eq!(value[0]["kind"], "asset");
    }
}
