//! # Collection 数据模型
//!
//! 一次数据采集 (collection) 的规范化记录，以及目录发现阶段定位到的文件集合。
//!
//! ## 依赖关系
//! - 被 `batch/collector.rs` 填充 `CollectionFiles`
//! - 被 `pipeline/` 创建与合并
//! - 被 `report/` 渲染

use super::processing::{CellData, ProcessingResult, ScreeningResult, Shell, ShellStatistics};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// 图像目录及其中的衍射图像数量
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageSet {
    pub path: PathBuf,
    pub num_images: usize,
}

/// 衍射对中 (diff-center) 目录
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiffCenter {
    /// 目录名 (`diff-center` / `diff-center2`)
    pub name: String,
    pub path: PathBuf,
    pub num_images: usize,
    pub zx_result: Option<PathBuf>,
    pub zy_result: Option<PathBuf>,
}

/// 一个 collection 目录中定位到的文件（不解析）
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollectionFiles {
    pub autoproc_xml: Option<PathBuf>,
    pub scaling_xml: Option<PathBuf>,
    pub screening_xml: Option<PathBuf>,
    pub summary_html: Option<PathBuf>,
    pub camera_files: Vec<PathBuf>,
    pub images: Option<ImageSet>,
    pub screen_images: Option<ImageSet>,
    pub diff_center: Vec<DiffCenter>,
}

/// 一次数据采集的规范化记录
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CollectionRecord {
    pub collection: String,
    pub collection_path: PathBuf,
    pub screen: bool,
    pub screening: Option<ScreeningResult>,
    pub processing: Option<ProcessingResult>,
    #[serde(rename = "Project")]
    pub project: Option<String>,
    #[serde(rename = "Staff_Comments")]
    pub staff_comments: Option<String>,
    pub files: CollectionFiles,
}

impl CollectionRecord {
    /// 附加 CSV 项目信息，返回新记录
    pub fn with_project_metadata(
        self,
        project: Option<String>,
        staff_comments: Option<String>,
    ) -> Self {
        CollectionRecord {
            project,
            staff_comments,
            ..self
        }
    }

    pub fn space_group(&self) -> Option<&str> {
        self.processing
            .as_ref()
            .and_then(|p| p.autoproc_xml.space_group.as_deref())
    }

    pub fn cell(&self) -> Option<&CellData> {
        self.processing
            .as_ref()
            .map(|p| &p.autoproc_xml.cell_data)
            .filter(|c| !c.is_empty())
    }

    pub fn shell(&self, shell: Shell) -> Option<&ShellStatistics> {
        self.processing
            .as_ref()
            .and_then(|p| p.autoproc_xml.scale_data.shell(shell))
    }

    /// 最高分辨率（overall 壳层的高分辨率极限）
    pub fn resolution(&self) -> Option<f64> {
        self.shell(Shell::Overall)
            .and_then(|s| s.resolution_limit_high)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::processing::{AutoProcSummary, ScaleData};

    fn bare_record() -> CollectionRecord {
        CollectionRecord {
            collection: "c1".to_string(),
            collection_path: PathBuf::from("/data/P1/c1"),
            screen: false,
            screening: None,
            processing: None,
            project: None,
            staff_comments: None,
            files: CollectionFiles::default(),
        }
    }

    #[test]
    fn test_accessors_on_missing_processing() {
        let record = bare_record();
        assert!(record.space_group().is_none());
        assert!(record.cell().is_none());
        assert!(record.shell(Shell::Outer).is_none());
        assert!(record.resolution().is_none());
    }

    #[test]
    fn test_accessors_on_partial_processing() {
        let mut record = bare_record();
        let summary = AutoProcSummary {
            space_group: Some("P 21 21 21".to_string()),
            ..Default::default()
        };
        record.processing = ProcessingResult::assemble(Some(summary), Some(ScaleData::default()));

        assert_eq!(record.space_group(), Some("P 21 21 21"));
        // 六个参数全缺失时视为无晶胞
        assert!(record.cell().is_none());
        assert!(record.shell(Shell::Overall).is_none());
    }

    #[test]
    fn test_with_project_metadata_keeps_other_fields() {
        let record = bare_record().with_project_metadata(Some("Kinase".to_string()), None);
        assert_eq!(record.project.as_deref(), Some("Kinase"));
        assert!(record.staff_comments.is_none());
        assert_eq!(record.collection, "c1");
    }

    #[test]
    fn test_record_json_keys() {
        let json = serde_json::to_value(bare_record()).unwrap();
        let obj = json.as_object().unwrap();

        assert!(obj.contains_key("Project"));
        assert!(obj.contains_key("Staff_Comments"));
        assert_eq!(obj["screen"], false);
        assert!(obj["processing"].is_null());
    }
}
