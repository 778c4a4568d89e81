//! # 筛选 (screening) XML 解析器
//!
//! 解析数据采集前的衍射筛选结果，记录指标化是否成功、镶嵌度、
//! 排名分辨率以及筛选得到的晶格。
//!
//! ## 格式说明
//! ```text
//! <Screening>
//!   <programVersion>EDNA MXv1</programVersion>
//!   <shortComments>...</shortComments>
//!   <ScreeningOutput>
//!     <indexingSuccess>1</indexingSuccess>
//!     <mosaicity>0.21</mosaicity>
//!     <rankingResolution>1.9</rankingResolution>
//!     <numSpotsFound>412</numSpotsFound>
//!     <ScreeningOutputLattice>
//!       <spaceGroup>P222</spaceGroup>
//!       <unitCell_a>78.1</unitCell_a>
//!       ...
//!     </ScreeningOutputLattice>
//!   </ScreeningOutput>
//! </Screening>
//! ```
//! `Screening` 可以是根元素，也可以嵌套在其他容器中。
//!
//! ## 依赖关系
//! - 被 `pipeline/normalizer.rs` 使用
//! - 使用 `parsers/xml.rs`, `models/processing.rs`

use super::xml;
use super::{non_empty, parse_numeric, FormatReader};
use crate::error::FormatParseError;
use crate::models::ScreeningResult;
use std::path::Path;

/// 筛选 XML 读取器
#[derive(Debug, Clone, Copy, Default)]
pub struct ScreeningReader;

impl FormatReader for ScreeningReader {
    type Output = ScreeningResult;

    const FORMAT: &'static str = "screening XML";

    fn parse(&self, content: &str, path: &Path) -> Result<ScreeningResult, FormatParseError> {
        let doc = xml::parse_document(content, Self::FORMAT, path)?;

        let screening = xml::find_element(doc.root(), "Screening").ok_or_else(|| {
            FormatParseError::malformed(Self::FORMAT, path, "missing Screening element")
        })?;

        let mut result = ScreeningResult {
            program: xml::child_text(screening, "programVersion").and_then(non_empty),
            comments: xml::child_text(screening, "comments")
                .and_then(non_empty)
                .or_else(|| xml::child_text(screening, "shortComments").and_then(non_empty)),
            ..Default::default()
        };

        if let Some(output) = xml::find_element(screening, "ScreeningOutput") {
            for (element, text) in xml::leaf_fields(output) {
                match element {
                    "indexingSuccess" => result.indexing_success = parse_flag(text),
                    "mosaicity" => result.mosaicity = parse_numeric(text),
                    "rankingResolution" => result.ranking_resolution = parse_numeric(text),
                    "numSpotsFound" => result.num_spots_found = parse_numeric(text),
                    _ => {}
                }
            }
        }

        if let Some(lattice) = xml::find_element(screening, "ScreeningOutputLattice") {
            for (element, text) in xml::leaf_fields(lattice) {
                if xml::apply_cell_field(&mut result.cell_data, element, text) {
                    continue;
                }
                if element == "spaceGroup" {
                    result.space_group = non_empty(text);
                }
            }
        }

        Ok(result)
    }
}

/// 布尔标志："1"/"true"/"yes" 与 "0"/"false"/"no"
fn parse_flag(text: &str) -> Option<bool> {
    match text.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" => Some(true),
        "0" | "false" | "no" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SCREENING_XML: &str = r#"<?xml version="1.0"?>
<Screening>
  <programVersion>EDNA MXv1</programVersion>
  <shortComments>Strategy computed</shortComments>
  <ScreeningOutput>
    <indexingSuccess>1</indexingSuccess>
    <mosaicity>0.21</mosaicity>
    <rankingResolution>1.9</rankingResolution>
    <numSpotsFound>412</numSpotsFound>
    <ScreeningOutputLattice>
      <spaceGroup>P222</spaceGroup>
      <unitCell_a>78.1</unitCell_a>
      <unitCell_b>n/a</unitCell_b>
      <unitCell_c>37.0</unitCell_c>
      <unitCell_alpha>90</unitCell_alpha>
      <unitCell_beta>90</unitCell_beta>
      <unitCell_gamma>90</unitCell_gamma>
    </ScreeningOutputLattice>
  </ScreeningOutput>
</Screening>
"#;

    fn parse(content: &str) -> Result<ScreeningResult, FormatParseError> {
        ScreeningReader.parse(content, Path::new("screening.xml"))
    }

    #[test]
    fn test_parse_screening() {
        let result = parse(SCREENING_XML).unwrap();

        assert_eq!(result.program.as_deref(), Some("EDNA MXv1"));
        assert_eq!(result.comments.as_deref(), Some("Strategy computed"));
        assert_eq!(result.indexing_success, Some(true));
        assert_eq!(result.mosaicity, Some(0.21));
        assert_eq!(result.num_spots_found, Some(412.0));
        assert_eq!(result.space_group.as_deref(), Some("P222"));
        assert_eq!(result.cell_data.a, Some(78.1));
        assert_eq!(result.cell_data.b, None);
        assert_eq!(result.cell_data.gamma, Some(90.0));
    }

    #[test]
    fn test_nested_minimal_screening() {
        let result = parse("<ScreeningContainer><Screening/></ScreeningContainer>").unwrap();
        assert_eq!(result, ScreeningResult::default());
    }

    #[test]
    fn test_missing_screening_element_is_error() {
        assert!(parse("<AutoProcContainer/>").is_err());
    }

    #[test]
    fn test_parse_flag() {
        assert_eq!(parse_flag("TRUE"), Some(true));
        assert_eq!(parse_flag("0"), Some(false));
        assert_eq!(parse_flag("maybe"), None);
    }
}
