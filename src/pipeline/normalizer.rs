//! # Collection 规范化
//!
//! 对单个发现的 collection 调用各格式读取器，组装一条 `CollectionRecord`。
//! 每个字段独立降级：任何读取器失败只会让对应字段为空，不影响其他字段，
//! 也不影响其他 collection。
//!
//! ## 依赖关系
//! - 被 `pipeline/mod.rs` 调用
//! - 使用 `parsers/` 读取器，`batch/collector.rs` 的发现结果

use crate::batch::DiscoveredCollection;
use crate::models::{CollectionRecord, ProcessingResult};
use crate::parsers::{AutoProcReader, FormatReader, ScalingReader, ScreeningReader};

use std::path::Path;
use tracing::debug;

/// 规范化后的 collection 及其所属 puck
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedCollection {
    pub puck: String,
    pub record: CollectionRecord,
    /// 已恢复的解析失败（错误描述）
    pub failures: Vec<String>,
}

/// Collection 规范化器
#[derive(Debug, Clone, Copy, Default)]
pub struct CollectionNormalizer {
    autoproc: AutoProcReader,
    scaling: ScalingReader,
    screening: ScreeningReader,
}

impl CollectionNormalizer {
    pub fn new() -> Self {
        Self::default()
    }

    /// 规范化一个 collection
    pub fn normalize(&self, found: &DiscoveredCollection) -> NormalizedCollection {
        let files = &found.files;
        let mut failures = Vec::new();

        let summary = self.autoproc.read(files.autoproc_xml.as_deref());
        failures.extend(summary.failure().map(|e| e.to_string()));

        let scaling = match files.scaling_xml.as_deref() {
            // 回退到 autoPROC.xml 时，缺少缩放段不算失败
            Some(path) if files.autoproc_xml.as_deref() == Some(path) => {
                self.read_embedded_scaling(path)
            }
            path => {
                let outcome = self.scaling.read(path);
                failures.extend(outcome.failure().map(|e| e.to_string()));
                outcome.into_option()
            }
        };

        let screening = self.screening.read(files.screening_xml.as_deref());
        failures.extend(screening.failure().map(|e| e.to_string()));
        let screening = screening.into_option();

        let record = CollectionRecord {
            collection: found.collection.clone(),
            collection_path: found.path.clone(),
            screen: screening.is_some(),
            screening,
            processing: ProcessingResult::assemble(summary.into_option(), scaling),
            project: None,
            staff_comments: None,
            files: files.clone(),
        };

        debug!(
            puck = %found.puck,
            collection = %found.collection,
            screen = record.screen,
            processing = record.processing.is_some(),
            parse_failures = failures.len(),
            "collection normalized"
        );

        NormalizedCollection {
            puck: found.puck.clone(),
            record,
            failures,
        }
    }

    fn read_embedded_scaling(&self, path: &Path) -> Option<crate::models::ScaleData> {
        match self.scaling.load(path) {
            Ok(scale) => Some(scale),
            Err(e) => {
                debug!(path = %path.display(), "no embedded scaling statistics: {}", e);
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::batch::collector::locate_files;
    use crate::models::Shell;
    use std::fs;
    use tempfile::TempDir;

    const AUTOPROC_XML: &str = r#"<AutoProcContainer>
  <AutoProc>
    <spaceGroup>C 1 2 1</spaceGroup>
    <refinedCell_a>n/a</refinedCell_a>
    <refinedCell_b>65.2</refinedCell_b>
    <refinedCell_c>40.1</refinedCell_c>
    <refinedCell_alpha>90</refinedCell_alpha>
    <refinedCell_beta>101.3</refinedCell_beta>
    <refinedCell_gamma>90</refinedCell_gamma>
  </AutoProc>
  <AutoProcScalingContainer>
    <AutoProcScalingStatistics>
      <scalingStatisticsType>overall</scalingStatisticsType>
      <resolutionLimitHigh>1.65</resolutionLimitHigh>
      <ccHalf>0.997</ccHalf>
    </AutoProcScalingStatistics>
  </AutoProcScalingContainer>
</AutoProcContainer>"#;

    fn discovered(dir: &Path) -> DiscoveredCollection {
        DiscoveredCollection {
            puck: "P1".to_string(),
            collection: "c1".to_string(),
            path: dir.to_path_buf(),
            files: locate_files(dir),
        }
    }

    fn write(path: &Path, content: &str) {
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    #[test]
    fn test_normalize_full_collection() {
        let tmp = TempDir::new().unwrap();
        write(&tmp.path().join("processing/autoPROC.xml"), AUTOPROC_XML);
        write(&tmp.path().join("screen/screening.xml"), "<Screening/>");

        let normalized = CollectionNormalizer::new().normalize(&discovered(tmp.path()));
        let record = &normalized.record;

        assert_eq!(normalized.puck, "P1");
        assert!(normalized.failures.is_empty());
        assert!(record.screen);
        assert_eq!(record.space_group(), Some("C 1 2 1"));
        assert_eq!(record.shell(Shell::Overall).unwrap().cc_half, Some(0.997));

        let cell = record.cell().unwrap();
        assert_eq!(cell.a, None);
        assert_eq!(cell.b, Some(65.2));
        assert_eq!(cell.beta, Some(101.3));
    }

    #[test]
    fn test_normalize_empty_collection() {
        let tmp = TempDir::new().unwrap();
        let normalized = CollectionNormalizer::new().normalize(&discovered(tmp.path()));

        assert!(!normalized.record.screen);
        assert!(normalized.record.processing.is_none());
        assert!(normalized.record.screening.is_none());
        assert!(normalized.failures.is_empty());
    }

    #[test]
    fn test_broken_screening_does_not_affect_processing() {
        let tmp = TempDir::new().unwrap();
        write(&tmp.path().join("processing/autoPROC.xml"), AUTOPROC_XML);
        write(&tmp.path().join("screen/screening.xml"), "<Screening><unclosed>");

        let normalized = CollectionNormalizer::new().normalize(&discovered(tmp.path()));

        assert_eq!(normalized.failures.len(), 1);
        assert!(normalized.failures[0].contains("screening.xml"));
        assert!(!normalized.record.screen);
        assert_eq!(normalized.record.space_group(), Some("C 1 2 1"));
    }

    #[test]
    fn test_autoproc_without_embedded_scaling() {
        let tmp = TempDir::new().unwrap();
        write(
            &tmp.path().join("processing/autoPROC.xml"),
            "<AutoProcContainer><AutoProc><spaceGroup>P 1</spaceGroup></AutoProc></AutoProcContainer>",
        );

        let normalized = CollectionNormalizer::new().normalize(&discovered(tmp.path()));
        let processing = normalized.record.processing.as_ref().unwrap();

        assert!(normalized.failures.is_empty());
        assert!(processing.autoproc_xml.scale_data.is_empty());
    }

    #[test]
    fn test_dedicated_scaling_without_autoproc() {
        let tmp = TempDir::new().unwrap();
        write(
            &tmp.path().join("processing/scaling.xml"),
            "<AutoProcScalingContainer><AutoProcScalingStatistics>\
             <scalingStatisticsType>outerShell</scalingStatisticsType>\
             <meanIOverSigI>1.9</meanIOverSigI>\
             </AutoProcScalingStatistics></AutoProcScalingContainer>",
        );

        let normalized = CollectionNormalizer::new().normalize(&discovered(tmp.path()));
        let record = &normalized.record;

        assert!(record.space_group().is_none());
        assert_eq!(record.shell(Shell::Outer).unwrap().mean_i_over_sig_i, Some(1.9));
    }
}
