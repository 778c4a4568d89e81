//! # JSON 导出与读回
//!
//! `ReportModel` 以美化 JSON 写出；键顺序由结构体声明与发现顺序决定，
//! 模型中不含时间戳，相同输入多次运行得到逐字节相同的文件。
//!
//! ## 依赖关系
//! - 被 `report/mod.rs`, `commands/` 调用
//! - 使用 `serde_json`

use crate::error::{Result, TripReportError};
use crate::models::ReportModel;

use std::fs;
use std::path::Path;

/// 导出文件名
pub const DATA_FILE: &str = "data.json";

/// 序列化为美化 JSON（末尾带换行）
pub fn to_json_string(model: &ReportModel, target: &str) -> Result<String> {
    serde_json::to_string_pretty(model)
        .map(|mut json| {
            json.push('\n');
            json
        })
        .map_err(|e| TripReportError::JsonError {
            path: target.to_string(),
            source: e,
        })
}

/// 写出 JSON 文件
pub fn write_json(model: &ReportModel, path: &Path) -> Result<()> {
    let json = to_json_string(model, &path.display().to_string())?;
    fs::write(path, json).map_err(|e| TripReportError::FileWriteError {
        path: path.display().to_string(),
        source: e,
    })
}

/// 读回先前导出的 JSON
pub fn read_json(path: &Path) -> Result<ReportModel> {
    let content = fs::read_to_string(path).map_err(|e| TripReportError::FileReadError {
        path: path.display().to_string(),
        source: e,
    })?;
    serde_json::from_str(&content).map_err(|e| TripReportError::JsonError {
        path: path.display().to_string(),
        source: e,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{CollectionFiles, CollectionRecord, PuckGroup};
    use std::path::PathBuf;
    use tempfile::TempDir;

    fn model() -> ReportModel {
        let record = |name: &str| CollectionRecord {
            collection: name.to_string(),
            collection_path: PathBuf::from(name),
            screen: false,
            screening: None,
            processing: None,
            project: None,
            staff_comments: None,
            files: CollectionFiles::default(),
        };
        ReportModel {
            pucks: vec![
                PuckGroup {
                    puck: "Z9".to_string(),
                    collections: vec![record("c2"), record("c1")],
                },
                PuckGroup {
                    puck: "A1".to_string(),
                    collections: vec![record("c1")],
                },
            ],
            csv_loaded: false,
        }
    }

    #[test]
    fn test_write_then_read_back() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join(DATA_FILE);

        write_json(&model(), &path).unwrap();
        let loaded = read_json(&path).unwrap();

        assert_eq!(loaded, model());
        assert_eq!(loaded.puck_keys().collect::<Vec<_>>(), vec!["Z9", "A1"]);
    }

    #[test]
    fn test_absent_values_are_null() {
        let json = to_json_string(&model(), "-").unwrap();

        assert!(json.ends_with("}\n"));
        assert!(json.contains("\"processing\": null"));
        assert!(json.contains("\"Project\": null"));
        assert!(json.find("\"Z9\"").unwrap() < json.find("\"A1\"").unwrap());
    }

    #[test]
    fn test_read_invalid_json() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("broken.json");
        fs::write(&path, "{ not json").unwrap();

        assert!(matches!(
            read_json(&path),
            Err(TripReportError::JsonError { .. })
        ));
    }

    #[test]
    fn test_read_missing_file() {
        assert!(matches!(
            read_json(Path::new("/nonexistent/data.json")),
            Err(TripReportError::FileReadError { .. })
        ));
    }
}
