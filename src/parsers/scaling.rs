//! # 缩放统计 XML 解析器
//!
//! 解析 `AutoProcScalingContainer` 中的 `AutoProcScalingStatistics` 元素，
//! 按 `scalingStatisticsType` 分派到 overall / innerShell / outerShell。
//! 既可读取独立的缩放统计文件，也可直接读取内嵌缩放段的 `autoPROC.xml`。
//!
//! ## 格式说明
//! ```text
//! <AutoProcScalingContainer>
//!   <AutoProcScalingStatistics>
//!     <scalingStatisticsType>overall</scalingStatisticsType>
//!     <resolutionLimitLow>48.5</resolutionLimitLow>
//!     <resolutionLimitHigh>1.80</resolutionLimitHigh>
//!     <meanIOverSigI>12.4</meanIOverSigI>
//!     <ccHalf>0.998</ccHalf>
//!     ...
//!   </AutoProcScalingStatistics>
//! </AutoProcScalingContainer>
//! ```
//!
//! ## 依赖关系
//! - 被 `pipeline/normalizer.rs` 使用
//! - 使用 `parsers/xml.rs`, `models/processing.rs`

use super::xml;
use super::{parse_numeric, FormatReader};
use crate::error::FormatParseError;
use crate::models::{ScaleData, Shell, ShellStatistics};
use std::path::Path;
use tracing::debug;

/// 缩放统计 XML 读取器
#[derive(Debug, Clone, Copy, Default)]
pub struct ScalingReader;

impl FormatReader for ScalingReader {
    type Output = ScaleData;

    const FORMAT: &'static str = "scaling statistics XML";

    fn parse(&self, content: &str, path: &Path) -> Result<ScaleData, FormatParseError> {
        let doc = xml::parse_document(content, Self::FORMAT, path)?;

        let container = xml::find_element(doc.root(), "AutoProcScalingContainer").ok_or_else(|| {
            FormatParseError::malformed(
                Self::FORMAT,
                path,
                "missing AutoProcScalingContainer element",
            )
        })?;

        let mut scale = ScaleData::default();
        for stats_node in xml::find_all(container, "AutoProcScalingStatistics") {
            let kind = xml::child_text(stats_node, "scalingStatisticsType").unwrap_or("");
            let Some(shell) = Shell::from_type(kind) else {
                debug!(path = %path.display(), kind, "skipping unknown scaling statistics type");
                continue;
            };

            let mut stats = ShellStatistics::default();
            for (element, text) in xml::leaf_fields(stats_node) {
                stats.set(element, parse_numeric(text));
            }
            *scale.shell_mut(shell) = Some(stats);
        }

        if scale.is_empty() {
            return Err(FormatParseError::malformed(
                Self::FORMAT,
                path,
                "no overall/innerShell/outerShell scaling statistics",
            ));
        }

        Ok(scale)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn shell_xml(kind: &str, high: &str, cc_half: &str) -> String {
        format!(
            "<AutoProcScalingStatistics>\
               <scalingStatisticsType>{kind}</scalingStatisticsType>\
               <resolutionLimitLow>48.50</resolutionLimitLow>\
               <resolutionLimitHigh>{high}</resolutionLimitHigh>\
               <meanIOverSigI>12.4</meanIOverSigI>\
               <ccHalf>{cc_half}</ccHalf>\
               <completeness>99.8</completeness>\
             </AutoProcScalingStatistics>"
        )
    }

    fn parse(content: &str) -> Result<ScaleData, FormatParseError> {
        ScalingReader.parse(content, Path::new("scaling.xml"))
    }

    #[test]
    fn test_parse_three_shells() {
        let content = format!(
            "<AutoProcContainer><AutoProc/><AutoProcScalingContainer>{}{}{}</AutoProcScalingContainer></AutoProcContainer>",
            shell_xml("overall", "1.80", "0.998"),
            shell_xml("innerShell", "9.86", "0.999"),
            shell_xml("outerShell", "1.80", "0.512"),
        );
        let scale = parse(&content).unwrap();

        let overall = scale.shell(Shell::Overall).unwrap();
        assert_eq!(overall.resolution_limit_high, Some(1.80));
        assert_eq!(overall.cc_half, Some(0.998));
        assert_eq!(overall.mean_i_over_sig_i, Some(12.4));
        assert_eq!(scale.shell(Shell::Inner).unwrap().resolution_limit_high, Some(9.86));
        assert_eq!(scale.shell(Shell::Outer).unwrap().cc_half, Some(0.512));
    }

    #[test]
    fn test_standalone_container_with_partial_shells() {
        let content = format!(
            "<AutoProcScalingContainer>{}</AutoProcScalingContainer>",
            shell_xml("Overall", "2.1", "bad")
        );
        let scale = parse(&content).unwrap();

        let overall = scale.overall.as_ref().unwrap();
        assert_eq!(overall.cc_half, None);
        assert_eq!(overall.completeness, Some(99.8));
        assert!(scale.inner_shell.is_none());
        assert!(scale.outer_shell.is_none());
    }

    #[test]
    fn test_missing_container_is_error() {
        let err = parse("<AutoProcContainer><AutoProc/></AutoProcContainer>").unwrap_err();
        assert!(err.to_string().contains("AutoProcScalingContainer"));
    }

    #[test]
    fn test_only_unknown_shells_is_error() {
        let content = format!(
            "<AutoProcScalingContainer>{}</AutoProcScalingContainer>",
            shell_xml("anomalous", "2.0", "0.9")
        );
        assert!(parse(&content).is_err());
    }
}
