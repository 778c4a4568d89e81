//! # 统一错误处理模块
//!
//! 定义 trip-report 的所有错误类型，使用 `thiserror` 派生。
//!
//! ## 错误分级
//! - `DiscoveryError`: 根目录缺失或无可识别的 puck 目录，致命
//! - `FormatParseError`: 单个文件解析失败，按字段恢复为缺失
//! - `CsvSchemaError`: CSV 表头不完整，仅关闭 CSV 合并 (`csv_loaded = false`)
//! - `JoinKeyMismatch`: CSV 行未匹配任何 collection，仅记录日志
//!
//! ## 依赖关系
//! - 被所有其他模块使用
//! - 无外部模块依赖

use std::path::Path;
use thiserror::Error;

/// trip-report 顶层错误类型
#[derive(Error, Debug)]
pub enum TripReportError {
    // ─────────────────────────────────────────────────────────────
    // I/O 错误
    // ─────────────────────────────────────────────────────────────
    #[error("Failed to read file: {path}")]
    FileReadError {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write file: {path}")]
    FileWriteError {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to place file {from} -> {to}")]
    FileHandlingError {
        from: String,
        to: String,
        #[source]
        source: std::io::Error,
    },

    // ─────────────────────────────────────────────────────────────
    // 数据收集错误
    // ─────────────────────────────────────────────────────────────
    #[error(transparent)]
    Discovery(#[from] DiscoveryError),

    // ─────────────────────────────────────────────────────────────
    // 序列化错误
    // ─────────────────────────────────────────────────────────────
    #[error("JSON error in {path}: {source}")]
    JsonError {
        path: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Result 类型别名
pub type Result<T> = std::result::Result<T, TripReportError>;

/// 目录发现错误（致命，无法生成报告）
#[derive(Error, Debug)]
pub enum DiscoveryError {
    #[error("Data directory not found: {path}")]
    RootNotFound { path: String },

    #[error("Data path is not a directory: {path}")]
    RootNotDirectory { path: String },

    #[error("No recognizable puck directories under: {path}")]
    NoPucks { path: String },

    #[error("Failed to list directory: {path}")]
    ReadDir {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// 单个文件的解析错误（可恢复）
#[derive(Error, Debug)]
pub enum FormatParseError {
    #[error("Failed to read {format} file: {path}")]
    Read {
        format: &'static str,
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse {format} file: {path}\nReason: {reason}")]
    Malformed {
        format: &'static str,
        path: String,
        reason: String,
    },

    #[error(transparent)]
    CsvSchema(#[from] CsvSchemaError),
}

impl FormatParseError {
    /// 构造格式错误
    pub fn malformed(format: &'static str, path: &Path, reason: impl Into<String>) -> Self {
        FormatParseError::Malformed {
            format,
            path: path.display().to_string(),
            reason: reason.into(),
        }
    }
}

/// CSV 项目表结构错误
#[derive(Error, Debug)]
pub enum CsvSchemaError {
    #[error("CSV sheet {path} is missing required column(s): {}", missing.join(", "))]
    MissingColumns { path: String, missing: Vec<String> },

    #[error("CSV error in {path}: {source}")]
    Csv {
        path: String,
        #[source]
        source: csv::Error,
    },
}

/// CSV 行未匹配到任何 collection（仅提示，不作为错误抛出）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JoinKeyMismatch {
    pub puck: String,
    pub collection: String,
}

impl std::fmt::Display for JoinKeyMismatch {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "CSV row ({}, {}) does not match any discovered collection",
            self.puck, self.collection
        )
    }
}
