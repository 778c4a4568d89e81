//! # 解析器模块
//!
//! 每种数据格式对应一个 `FormatReader` 实现，把单个文件转换为类型化结构。
//! 读取器之间没有跨文件知识；新增格式只需新增一个实现。
//!
//! 解析失败 (`FormatParseError`) 在 `read` 中记录日志后降级为缺失，
//! 不会中断整次运行。
//!
//! ## 依赖关系
//! - 被 `pipeline/normalizer.rs`, `commands/` 使用
//! - 使用 `models/` 数据模型
//! - 子模块: xml, autoproc, scaling, screening, project_sheet

pub mod autoproc;
pub mod project_sheet;
pub mod scaling;
pub mod screening;
mod xml;

pub use autoproc::AutoProcReader;
pub use project_sheet::{ProjectSheet, ProjectSheetReader};
pub use scaling::ScalingReader;
pub use screening::ScreeningReader;

use crate::error::FormatParseError;
use std::fs;
use std::path::Path;
use tracing::{debug, warn};

/// 单次读取的结果
#[derive(Debug)]
pub enum ReadOutcome<T> {
    /// 未提供文件
    Missing,
    /// 解析成功
    Parsed(T),
    /// 读取或解析失败（已记录日志）
    Failed(FormatParseError),
}

impl<T> ReadOutcome<T> {
    pub fn is_failed(&self) -> bool {
        self.failure().is_some()
    }

    /// 失败原因
    pub fn failure(&self) -> Option<&FormatParseError> {
        match self {
            ReadOutcome::Failed(e) => Some(e),
            ReadOutcome::Missing | ReadOutcome::Parsed(_) => None,
        }
    }

    pub fn into_option(self) -> Option<T> {
        match self {
            ReadOutcome::Parsed(value) => Some(value),
            ReadOutcome::Missing | ReadOutcome::Failed(_) => None,
        }
    }
}

/// 单一格式读取器
pub trait FormatReader {
    /// 解析产物
    type Output;

    /// 格式名称（用于日志与错误信息）
    const FORMAT: &'static str;

    /// 从字符串内容解析
    fn parse(&self, content: &str, path: &Path) -> Result<Self::Output, FormatParseError>;

    /// 读取并解析文件
    fn load(&self, path: &Path) -> Result<Self::Output, FormatParseError> {
        let content = read_text(path).map_err(|e| FormatParseError::Read {
            format: Self::FORMAT,
            path: path.display().to_string(),
            source: e,
        })?;

        if content.trim().is_empty() {
            return Err(FormatParseError::malformed(Self::FORMAT, path, "file is empty"));
        }

        self.parse(&content, path)
    }

    /// 读取可选路径；失败时记录警告并返回 `Failed`
    fn read(&self, path: Option<&Path>) -> ReadOutcome<Self::Output> {
        let Some(path) = path else {
            return ReadOutcome::Missing;
        };

        match self.load(path) {
            Ok(value) => {
                debug!(format = Self::FORMAT, path = %path.display(), "parsed");
                ReadOutcome::Parsed(value)
            }
            Err(e) => {
                warn!("{}", e);
                ReadOutcome::Failed(e)
            }
        }
    }
}

/// 读取文本文件，UTF-8 失败时按 Latin-1 解码
pub fn read_text(path: &Path) -> std::io::Result<String> {
    let bytes = fs::read(path)?;
    match String::from_utf8(bytes) {
        Ok(text) => Ok(text),
        Err(e) => {
            debug!(path = %path.display(), "not valid UTF-8, decoding as Latin-1");
            Ok(e.into_bytes().iter().map(|&b| b as char).collect())
        }
    }
}

/// 数值强制转换：有效的有限数值返回 `Some`，其余（含 "n/a"、空串、NaN）返回 `None`
pub fn parse_numeric(text: &str) -> Option<f64> {
    text.trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
}

/// 去除首尾空白，空串返回 `None`
pub fn non_empty(text: &str) -> Option<String> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_parse_numeric() {
        assert_eq!(parse_numeric("78.12"), Some(78.12));
        assert_eq!(parse_numeric("  1e3 "), Some(1000.0));
        assert_eq!(parse_numeric("-0.5"), Some(-0.5));
        assert_eq!(parse_numeric("n/a"), None);
        assert_eq!(parse_numeric(""), None);
        assert_eq!(parse_numeric("NaN"), None);
        assert_eq!(parse_numeric("inf"), None);
    }

    #[test]
    fn test_non_empty() {
        assert_eq!(non_empty("  P 1 "), Some("P 1".to_string()));
        assert_eq!(non_empty("   "), None);
    }

    #[test]
    fn test_read_text_latin1_fallback() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        // "Ångström" in Latin-1
        file.write_all(&[0xC5, b'n', b'g', b's', b't', b'r', 0xF6, b'm'])
            .unwrap();

        let text = read_text(file.path()).unwrap();
        assert_eq!(text, "Ångström");
    }

    #[test]
    fn test_read_missing_path_is_missing() {
        let outcome = AutoProcReader.read(None);
        assert!(matches!(outcome, ReadOutcome::Missing));
    }

    #[test]
    fn test_read_empty_file_is_failed() {
        let file = tempfile::NamedTempFile::new().unwrap();
        let outcome = ScalingReader.read(Some(file.path()));
        assert!(outcome.is_failed());
        assert!(outcome.failure().unwrap().to_string().contains("file is empty"));
        assert!(outcome.into_option().is_none());
    }

    #[test]
    fn test_read_nonexistent_file_is_failed() {
        let outcome = ScreeningReader.read(Some(Path::new("/nonexistent/screen/screening.xml")));
        match outcome {
            ReadOutcome::Failed(FormatParseError::Read { format, .. }) => {
                assert_eq!(format, ScreeningReader::FORMAT);
            }
            other => panic!("unexpected outcome: {:?}", other),
        }
    }
}
