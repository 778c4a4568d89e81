//! # autoPROC XML 解析器
//!
//! 解析 autoPROC 输出的 `autoPROC.xml`，提取 `AutoProc` 段的空间群、波长与晶胞参数。
//!
//! ## 格式说明
//! ```text
//! <AutoProcContainer>
//!   <AutoProc>
//!     <spaceGroup>P 21 21 21</spaceGroup>
//!     <wavelength>0.97934</wavelength>
//!     <refinedCell_a>78.12</refinedCell_a>
//!     ...
//!     <refinedCell_gamma>90.0</refinedCell_gamma>
//!   </AutoProc>
//!   <AutoProcScalingContainer> ... </AutoProcScalingContainer>
//! </AutoProcContainer>
//! ```
//! 缩放统计由 `parsers/scaling.rs` 单独解析。
//!
//! ## 依赖关系
//! - 被 `pipeline/normalizer.rs` 使用
//! - 使用 `parsers/xml.rs`, `models/processing.rs`

use super::xml;
use super::{non_empty, parse_numeric, FormatReader};
use crate::error::FormatParseError;
use crate::models::AutoProcSummary;
use std::path::Path;

/// autoPROC XML 读取器
#[derive(Debug, Clone, Copy, Default)]
pub struct AutoProcReader;

impl FormatReader for AutoProcReader {
    type Output = AutoProcSummary;

    const FORMAT: &'static str = "autoPROC XML";

    fn parse(&self, content: &str, path: &Path) -> Result<AutoProcSummary, FormatParseError> {
        let doc = xml::parse_document(content, Self::FORMAT, path)?;

        let container = xml::find_element(doc.root(), "AutoProcContainer").ok_or_else(|| {
            FormatParseError::malformed(Self::FORMAT, path, "missing AutoProcContainer element")
        })?;
        let auto_proc = xml::find_element(container, "AutoProc").ok_or_else(|| {
            FormatParseError::malformed(Self::FORMAT, path, "missing AutoProc element")
        })?;

        let mut summary = AutoProcSummary::default();
        for (element, text) in xml::leaf_fields(auto_proc) {
            if xml::apply_cell_field(&mut summary.cell_data, element, text) {
                continue;
            }
            match element {
                "spaceGroup" => summary.space_group = non_empty(text),
                "wavelength" => summary.wavelength = parse_numeric(text),
                _ => {}
            }
        }

        Ok(summary)
    }
}
