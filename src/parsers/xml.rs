//! # XML 辅助函数
//!
//! 基于 `roxmltree` 的只读 DOM 查询，供各 XML 读取器共享。
//!
//! ## 依赖关系
//! - 被 `parsers/autoproc.rs`, `parsers/scaling.rs`, `parsers/screening.rs` 使用

use crate::error::FormatParseError;
use crate::models::CellData;
use roxmltree::{Document, Node};
use std::path::Path;

use super::parse_numeric;

/// 解析 XML 文档
pub fn parse_document<'a>(
    content: &'a str,
    format: &'static str,
    path: &Path,
) -> Result<Document<'a>, FormatParseError> {
    Document::parse(content).map_err(|e| FormatParseError::malformed(format, path, e.to_string()))
}

/// 查找首个同名元素（含自身）
pub fn find_element<'a, 'input>(node: Node<'a, 'input>, name: &str) -> Option<Node<'a, 'input>> {
    node.descendants()
        .find(|n| n.is_element() && n.tag_name().name() == name)
}

/// 查找所有同名后代元素，按文档顺序
pub fn find_all<'a>(node: Node<'a, 'a>, name: &'a str) -> impl Iterator<Item = Node<'a, 'a>> + 'a {
    node.descendants()
        .filter(move |n| n.is_element() && n.tag_name().name() == name)
}

/// 直接子元素的 (元素名, 文本)；无文本时为空串
pub fn leaf_fields<'a>(node: Node<'a, 'a>) -> impl Iterator<Item = (&'a str, &'a str)> + 'a {
    node.children()
        .filter(|n| n.is_element())
        .map(|n| (n.tag_name().name(), n.text().unwrap_or("").trim()))
}

/// 直接子元素文本
pub fn child_text<'a>(node: Node<'a, '_>, name: &str) -> Option<&'a str> {
    node.children()
        .find(|n| n.is_element() && n.tag_name().name() == name)
        .and_then(|n| n.text())
        .map(str::trim)
}

/// 晶胞元素名映射：`refinedCell_alpha` -> `alpha`
pub fn cell_axis(element: &str) -> Option<&str> {
    if !element.contains("Cell") {
        return None;
    }
    element.split_once('_').map(|(_, axis)| axis)
}

/// 若元素为晶胞参数则写入 `cell`，返回是否已处理
pub fn apply_cell_field(cell: &mut CellData, element: &str, text: &str) -> bool {
    match cell_axis(element) {
        Some(axis) => cell.set(axis, parse_numeric(text)),
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cell_axis() {
        assert_eq!(cell_axis("refinedCell_a"), Some("a"));
        assert_eq!(cell_axis("refinedCell_gamma"), Some("gamma"));
        assert_eq!(cell_axis("unitCell_beta"), Some("beta"));
        assert_eq!(cell_axis("spaceGroup"), None);
        assert_eq!(cell_axis("refinedCell"), None);
    }

    #[test]
    fn test_leaf_fields_and_child_text() {
        let doc = Document::parse("<a><b> 1 </b><c/><d>x</d></a>").unwrap();
        let root = doc.root_element();

        let fields: Vec<_> = leaf_fields(root).collect();
        assert_eq!(fields, vec![("b", "1"), ("c", ""), ("d", "x")]);
        assert_eq!(child_text(root, "d"), Some("x"));
        assert_eq!(child_text(root, "e"), None);
    }

    #[test]
    fn test_find_all_in_document_order() {
        let doc = Document::parse("<r><s n='1'/><t><s n='2'/></t></r>").unwrap();
        let ids: Vec<_> = find_all(doc.root(), "s")
            .filter_map(|n| n.attribute("n"))
            .collect();
        assert_eq!(ids, vec!["1", "2"]);
    }
}
