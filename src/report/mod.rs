//! # 报告输出模块
//!
//! 把报告模型写成一个自包含的报告目录：
//!
//! ```text
//! <output>/
//!   ├── data.json
//!   ├── index.html
//!   ├── <puck>_<collection>_details.html
//!   ├── camera/<puck>/<collection>/...
//!   ├── summary/...
//!   └── results/...
//! ```
//!
//! ## 依赖关系
//! - 被 `commands/report.rs`, `commands/render.rs` 调用
//! - 子模块: export, html, placement

pub mod export;
pub mod html;
pub mod placement;

pub use placement::{FileMethod, FilePlacer};

use crate::error::{Result, TripReportError};
use crate::models::{RenderContext, ReportModel};

use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

/// 报告输出选项
#[derive(Debug, Clone)]
pub struct ReportOptions {
    pub output_dir: PathBuf,
    pub file_method: FileMethod,
}

/// 报告生成统计
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReportSummary {
    /// 写出的 HTML 页面数（含索引页）
    pub pages: usize,
    pub placed_files: usize,
    pub placement_failures: usize,
}

fn write_page(path: &Path, content: &str) -> Result<()> {
    fs::write(path, content).map_err(|e| TripReportError::FileWriteError {
        path: path.display().to_string(),
        source: e,
    })
}

/// 生成完整报告目录
pub fn generate(
    model: &ReportModel,
    ctx: &RenderContext,
    options: &ReportOptions,
) -> Result<ReportSummary> {
    let root = &options.output_dir;
    fs::create_dir_all(root).map_err(|e| TripReportError::FileWriteError {
        path: root.display().to_string(),
        source: e,
    })?;

    export::write_json(model, &root.join(export::DATA_FILE))?;
    write_page(&root.join("index.html"), &html::index_page(model, ctx))?;

    let mut placer = FilePlacer::new(root, options.file_method);
    let mut pages = 1;
    for (puck, record) in model.records() {
        let placed = placer.place(puck, record);
        let name = html::details_file_name(puck, &record.collection);
        write_page(&root.join(name), &html::details_page(puck, record, &placed, ctx))?;
        pages += 1;
    }

    let summary = ReportSummary {
        pages,
        placed_files: placer.placed(),
        placement_failures: placer.failures(),
    };
    info!(
        output = %root.display(),
        method = %options.file_method,
        pages = summary.pages,
        placed = summary.placed_files,
        failures = summary.placement_failures,
        "report generated"
    );

    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{CollectionFiles, CollectionRecord, PuckGroup};
    use chrono::NaiveDate;
    use tempfile::TempDir;

    fn record(name: &str, summary: Option<PathBuf>) -> CollectionRecord {
        CollectionRecord {
            collection: name.to_string(),
            collection_path: PathBuf::from(name),
            screen: false,
            screening: None,
            processing: None,
            project: None,
            staff_comments: None,
            files: CollectionFiles {
                summary_html: summary,
                ..Default::default()
            },
        }
    }

    fn ctx() -> RenderContext {
        RenderContext {
            report_title: "Test Trip Report".to_string(),
            csv_loaded: false,
            generated_at: NaiveDate::from_ymd_opt(2024, 3, 1)
                .unwrap()
                .and_hms_opt(0, 0, 0)
                .unwrap(),
        }
    }

    #[test]
    fn test_generate_writes_report_tree() {
        let data = TempDir::new().unwrap();
        let summary = data.path().join("summary.html");
        fs::write(&summary, "<html></html>").unwrap();

        let model = ReportModel {
            pucks: vec![PuckGroup {
                puck: "P1".to_string(),
                collections: vec![
                    record("c1", Some(summary)),
                    record("c2", Some(data.path().join("gone.html"))),
                ],
            }],
            csv_loaded: false,
        };

        let out = TempDir::new().unwrap();
        let options = ReportOptions {
            output_dir: out.path().join("Run_Trip_Report"),
            file_method: FileMethod::Copy,
        };
        let result = generate(&model, &ctx(), &options).unwrap();

        let root = &options.output_dir;
        assert!(root.join("data.json").is_file());
        assert!(root.join("index.html").is_file());
        assert!(root.join("P1_c1_details.html").is_file());
        assert!(root.join("P1_c2_details.html").is_file());
        assert!(root.join("summary/P1_c1_summary.html").is_file());
        assert_eq!(
            result,
            ReportSummary {
                pages: 3,
                placed_files: 1,
                placement_failures: 1,
            }
        );

        let details = fs::read_to_string(root.join("P1_c2_details.html")).unwrap();
        assert!(!details.contains("autoPROC Summary"));
        assert_eq!(export::read_json(&root.join("data.json")).unwrap(), model);
    }
}
