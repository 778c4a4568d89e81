//! # 报告文件放置
//!
//! 把相机图像、autoPROC summary 页面和衍射对中结果页面复制或软链接到
//! 报告目录，返回相对于报告根目录的路径供 HTML 引用。
//!
//! 单个文件放置失败只记录日志并省略该链接，不中断报告生成。
//!
//! ## 目标路径
//! - 相机图像 → `camera/<puck>/<collection>/<文件名>`
//! - summary → `summary/<puck>_<collection>_summary.html`
//! - 对中结果 → `results/<puck>_<collection>_{zx,zy}_result.html`
//!
//! ## 依赖关系
//! - 被 `report/mod.rs` 调用
//! - 使用 `models/collection.rs` 的 `CollectionFiles`

use crate::error::{Result, TripReportError};
use crate::models::CollectionRecord;

use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, error};

/// 文件放置方式
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FileMethod {
    #[default]
    Copy,
    Symlink,
}

impl std::fmt::Display for FileMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FileMethod::Copy => write!(f, "copy"),
            FileMethod::Symlink => write!(f, "symlink"),
        }
    }
}

/// 一条记录已放置的文件（报告内相对路径）
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlacedFiles {
    pub camera: Vec<String>,
    pub summary: Option<String>,
    pub zx_result: Option<String>,
    pub zy_result: Option<String>,
}

/// 文件放置器
#[derive(Debug)]
pub struct FilePlacer {
    report_root: PathBuf,
    method: FileMethod,
    placed: usize,
    failures: usize,
}

impl FilePlacer {
    pub fn new(report_root: impl Into<PathBuf>, method: FileMethod) -> Self {
        FilePlacer {
            report_root: report_root.into(),
            method,
            placed: 0,
            failures: 0,
        }
    }

    /// 已成功放置的文件数
    pub fn placed(&self) -> usize {
        self.placed
    }

    /// 放置失败的文件数
    pub fn failures(&self) -> usize {
        self.failures
    }

    /// 放置一条记录的全部附属文件
    pub fn place(&mut self, puck: &str, record: &CollectionRecord) -> PlacedFiles {
        let files = &record.files;
        let stem = format!("{}_{}", puck, record.collection);

        let camera_dir = Path::new("camera").join(puck).join(&record.collection);
        let camera = files
            .camera_files
            .iter()
            .filter_map(|source| {
                let name = source.file_name()?.to_string_lossy().to_string();
                self.attempt(source, &camera_dir.join(name))
            })
            .collect();

        let summary = files.summary_html.as_deref().and_then(|source| {
            self.attempt(source, &Path::new("summary").join(format!("{}_summary.html", stem)))
        });

        let zx_source = files.diff_center.iter().find_map(|d| d.zx_result.clone());
        let zx_result = zx_source.and_then(|source| {
            self.attempt(&source, &Path::new("results").join(format!("{}_zx_result.html", stem)))
        });
        let zy_source = files.diff_center.iter().find_map(|d| d.zy_result.clone());
        let zy_result = zy_source.and_then(|source| {
            self.attempt(&source, &Path::new("results").join(format!("{}_zy_result.html", stem)))
        });

        PlacedFiles {
            camera,
            summary,
            zx_result,
            zy_result,
        }
    }

    fn attempt(&mut self, source: &Path, relative: &Path) -> Option<String> {
        match place_file(source, &self.report_root.join(relative), self.method) {
            Ok(()) => {
                self.placed += 1;
                debug!(from = %source.display(), to = %relative.display(), "file placed");
                Some(link_path(relative))
            }
            Err(e) => {
                self.failures += 1;
                error!("{}", e);
                None
            }
        }
    }
}

/// 复制或软链接单个文件，已存在的目标会被替换
pub fn place_file(source: &Path, dest: &Path, method: FileMethod) -> Result<()> {
    let handling_error = |source_err: std::io::Error| TripReportError::FileHandlingError {
        from: source.display().to_string(),
        to: dest.display().to_string(),
        source: source_err,
    };

    if !source.is_file() {
        return Err(handling_error(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            "source file not found",
        )));
    }
    if let Some(parent) = dest.parent() {
        fs::create_dir_all(parent).map_err(handling_error)?;
    }
    // symlink_metadata 同样能识别悬空链接
    if fs::symlink_metadata(dest).is_ok() {
        fs::remove_file(dest).map_err(handling_error)?;
    }

    match method {
        FileMethod::Copy => fs::copy(source, dest).map(|_| ()).map_err(handling_error),
        FileMethod::Symlink => {
            let target = fs::canonicalize(source).map_err(handling_error)?;
            symlink(&target, dest).map_err(handling_error)
        }
    }
}

#[cfg(unix)]
fn symlink(target: &Path, link: &Path) -> std::io::Result<()> {
    std::os::unix::fs::symlink(target, link)
}

#[cfg(windows)]
fn symlink(target: &Path, link: &Path) -> std::io::Result<()> {
    std::os::windows::fs::symlink_file(target, link)
}

/// 报告内链接统一使用 `/` 分隔
fn link_path(relative: &Path) -> String {
    relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}
