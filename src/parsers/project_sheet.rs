//! # CSV 项目表解析器
//!
//! 解析可选的项目信息表，每行对应一个 (puck, collection)，
//! 提供 `Project` 与 `Staff_Comments` 两列用于补充报告。
//!
//! ## 格式说明
//! ```text
//! Puck,Collection,Project,Staff_Comments
//! P1,c1,Kinase,Good diffraction
//! P1,c3,Protease,
//! ```
//! 表头不区分大小写；缺少必需列时返回 `CsvSchemaError`。
//!
//! ## 依赖关系
//! - 被 `pipeline/merger.rs`, `pipeline/mod.rs` 使用
//! - 使用 `csv` 库

use super::{non_empty, FormatReader};
use crate::error::{CsvSchemaError, FormatParseError};
use std::collections::HashMap;
use std::path::Path;
use tracing::warn;

/// 必需列
pub const REQUIRED_COLUMNS: [&str; 4] = ["Puck", "Collection", "Project", "Staff_Comments"];

/// 项目表中的一行
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectRow {
    pub puck: String,
    pub collection: String,
    pub project: Option<String>,
    pub staff_comments: Option<String>,
}

/// 按 (puck, collection) 索引的项目表
#[derive(Debug, Clone, Default)]
pub struct ProjectSheet {
    rows: Vec<ProjectRow>,
    index: HashMap<(String, String), usize>,
}

impl ProjectSheet {
    /// 插入一行；键已存在时保留先出现的行并返回 false
    pub fn insert(&mut self, row: ProjectRow) -> bool {
        let key = (row.puck.clone(), row.collection.clone());
        if self.index.contains_key(&key) {
            return false;
        }
        self.index.insert(key, self.rows.len());
        self.rows.push(row);
        true
    }

    pub fn get(&self, puck: &str, collection: &str) -> Option<&ProjectRow> {
        self.index
            .get(&(puck.to_string(), collection.to_string()))
            .map(|&i| &self.rows[i])
    }

    /// 按文件顺序遍历
    pub fn rows(&self) -> &[ProjectRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// CSV 项目表读取器
#[derive(Debug, Clone, Copy, Default)]
pub struct ProjectSheetReader;

impl FormatReader for ProjectSheetReader {
    type Output = ProjectSheet;

    const FORMAT: &'static str = "CSV project sheet";

    fn parse(&self, content: &str, path: &Path) -> Result<ProjectSheet, FormatParseError> {
        let csv_error = |e: csv::Error| CsvSchemaError::Csv {
            path: path.display().to_string(),
            source: e,
        };

        // Excel 导出的 UTF-8 BOM
        let content = content.strip_prefix('\u{feff}').unwrap_or(content);

        let mut reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .flexible(true)
            .from_reader(content.as_bytes());

        let headers = reader.headers().map_err(csv_error)?.clone();
        let column = |name: &str| headers.iter().position(|h| h.eq_ignore_ascii_case(name));

        let missing: Vec<String> = REQUIRED_COLUMNS
            .iter()
            .copied()
            .filter(|name| column(*name).is_none())
            .map(String::from)
            .collect();
        if !missing.is_empty() {
            return Err(CsvSchemaError::MissingColumns {
                path: path.display().to_string(),
                missing,
            }
            .into());
        }

        // 上面已校验必需列存在
        let [puck_col, collection_col, project_col, comments_col] =
            REQUIRED_COLUMNS.map(|name| column(name).unwrap_or(usize::MAX));

        let mut sheet = ProjectSheet::default();
        for (line, record) in reader.records().enumerate() {
            let record = record.map_err(csv_error)?;
            let field = |col: usize| record.get(col).and_then(non_empty);

            let (Some(puck), Some(collection)) = (field(puck_col), field(collection_col)) else {
                warn!(
                    path = %path.display(),
                    row = line + 2,
                    "CSV row without puck/collection key ignored"
                );
                continue;
            };

            let row = ProjectRow {
                puck,
                collection,
                project: field(project_col),
                staff_comments: field(comments_col),
            };
            let key = format!("({}, {})", row.puck, row.collection);
            if !sheet.insert(row) {
                warn!(path = %path.display(), row = line + 2, "duplicate CSV key {} ignored", key);
            }
        }

        Ok(sheet)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(content: &str) -> Result<ProjectSheet, FormatParseError> {
        ProjectSheetReader.parse(content, Path::new("projects.csv"))
    }

    #[test]
    fn test_parse_sheet() {
        let sheet = parse(
            "Puck,Collection,Project,Staff_Comments\n\
             P1,c1,Kinase,Good diffraction\n\
             P1,c3, Protease ,\n",
        )
        .unwrap();

        assert_eq!(sheet.len(), 2);
        let row = sheet.get("P1", "c1").unwrap();
        assert_eq!(row.project.as_deref(), Some("Kinase"));
        assert_eq!(row.staff_comments.as_deref(), Some("Good diffraction"));

        let row = sheet.get("P1", "c3").unwrap();
        assert_eq!(row.project.as_deref(), Some("Protease"));
        assert!(row.staff_comments.is_none());
        assert!(sheet.get("P1", "c2").is_none());
    }

    #[test]
    fn test_headers_case_insensitive_and_reordered() {
        let sheet = parse("\u{feff}staff_comments,PROJECT,collection,puck\nnote,X,c1,P9\n").unwrap();
        let row = sheet.get("P9", "c1").unwrap();
        assert_eq!(row.project.as_deref(), Some("X"));
        assert_eq!(row.staff_comments.as_deref(), Some("note"));
    }

    #[test]
    fn test_missing_columns_is_schema_error() {
        let err = parse("Puck,Collection,Project\nP1,c1,X\n").unwrap_err();
        match err {
            FormatParseError::CsvSchema(CsvSchemaError::MissingColumns { missing, .. }) => {
                assert_eq!(missing, vec!["Staff_Comments".to_string()]);
            }
            other => panic!("unexpected error: {}", other),
        }
    }

    #[test]
    fn test_duplicate_and_keyless_rows() {
        let sheet = parse(
            "Puck,Collection,Project,Staff_Comments\n\
             P1,c1,First,\n\
             P1,c1,Second,\n\
             ,c2,Orphan,\n",
        )
        .unwrap();

        assert_eq!(sheet.len(), 1);
        assert_eq!(sheet.get("P1", "c1").unwrap().project.as_deref(), Some("First"));
    }

    #[test]
    fn test_header_only_sheet_is_empty() {
        let sheet = parse("Puck,Collection,Project,Staff_Comments\n").unwrap();
        assert!(sheet.is_empty());
    }
}
