//! # collect 命令实现
//!
//! 只运行数据收集流水线并导出 JSON，不生成 HTML。
//!
//! ## 功能
//! - 扫描数据目录并规范化所有 collection
//! - 可选合并 CSV 项目表
//! - JSON 写入文件或 stdout
//! - 打印每个 puck 的汇总表
//!
//! JSON 写到 stdout 时，状态信息与汇总表改写到 stderr，
//! 保证 stdout 可以直接重定向为 `data.json`。
//!
//! ## 依赖关系
//! - 使用 `cli/collect.rs` 定义的参数
//! - 使用 `pipeline/`, `report/export.rs`
//! - 使用 `utils/output.rs`

use super::print_run_stats;
use crate::cli::collect::CollectArgs;
use crate::error::Result;
use crate::models::ReportModel;
use crate::pipeline::{self, CollectOptions};
use crate::report::export;
use crate::utils::output;

use tabled::{Table, Tabled};

/// puck 汇总行
#[derive(Debug, Clone, Tabled)]
struct PuckRow {
    #[tabled(rename = "Puck")]
    puck: String,
    #[tabled(rename = "Collections")]
    collections: usize,
    #[tabled(rename = "Processed")]
    processed: usize,
    #[tabled(rename = "Screened")]
    screened: usize,
    #[tabled(rename = "Best Res. (Å)")]
    best_resolution: String,
}

fn puck_rows(model: &ReportModel) -> Vec<PuckRow> {
    model
        .pucks
        .iter()
        .map(|group| {
            let best = group
                .collections
                .iter()
                .filter_map(|r| r.resolution())
                .fold(None, |best: Option<f64>, res| {
                    Some(best.map_or(res, |b| b.min(res)))
                });
            PuckRow {
                puck: group.puck.clone(),
                collections: group.collections.len(),
                processed: group
                    .collections
                    .iter()
                    .filter(|r| r.processing.is_some())
                    .count(),
                screened: group.collections.iter().filter(|r| r.screen).count(),
                best_resolution: best.map(|r| format!("{:.2}", r)).unwrap_or_default(),
            }
        })
        .collect()
}

/// 执行 collect 命令
pub fn execute(args: CollectArgs) -> Result<()> {
    let to_stdout = args.output.is_none();
    if !to_stdout {
        output::print_header("Collecting Trip Data");
    }

    let csv_requested = args.csv.is_some();
    let options = CollectOptions {
        layout: args.layout.into(),
        jobs: args.jobs,
        csv: args.csv,
        show_progress: true,
    };
    let outcome = pipeline::collect(&args.base_directory, &options)?;
    let table = Table::new(puck_rows(&outcome.model));

    match &args.output {
        Some(path) => {
            export::write_json(&outcome.model, path)?;
            print_run_stats(&outcome.stats, csv_requested, outcome.model.csv_loaded);
            println!("{}", table);
            output::print_done(&format!("Data written to '{}'", path.display()));
        }
        None => {
            print!("{}", export::to_json_string(&outcome.model, "<stdout>")?);
            eprintln!("{}", table);
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::processing::AutoProcXml;
    use crate::models::{
        CollectionFiles, CollectionRecord, ProcessingResult, PuckGroup, ScaleData, ShellStatistics,
    };
    use std::path::PathBuf;

    fn record(resolution: Option<f64>) -> CollectionRecord {
        CollectionRecord {
            collection: "c".to_string(),
            collection_path: PathBuf::from("c"),
            screen: resolution.is_none(),
            screening: None,
            processing: resolution.map(|r| ProcessingResult {
                autoproc_xml: AutoProcXml {
                    scale_data: ScaleData {
                        overall: Some(ShellStatistics {
                            resolution_limit_high: Some(r),
                            ..Default::default()
                        }),
                        ..Default::default()
                    },
                    ..Default::default()
                },
            }),
            project: None,
            staff_comments: None,
            files: CollectionFiles::default(),
        }
    }

    #[test]
    fn test_puck_rows() {
        let model = ReportModel {
            pucks: vec![
                PuckGroup {
                    puck: "P1".to_string(),
                    collections: vec![record(Some(2.1)), record(Some(1.75)), record(None)],
                },
                PuckGroup {
                    puck: "P2".to_string(),
                    collections: vec![record(None)],
                },
            ],
            csv_loaded: false,
        };

        let rows = puck_rows(&model);

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].collections, 3);
        assert_eq!(rows[0].processed, 2);
        assert_eq!(rows[0].screened, 1);
        assert_eq!(rows[0].best_resolution, "1.75");
        assert_eq!(rows[1].best_resolution, "");
    }
}
