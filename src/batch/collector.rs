//! # 目录发现器
//!
//! 遍历束线数据根目录，按目录命名约定识别 puck 与 collection，
//! 并定位每个 collection 中的相关文件（仅检查存在性与文件名，不解析内容）。
//!
//! ## 目录布局
//! ```text
//! flat:  root/<puck>/<collection>/
//! site:  root/<site>/<puck>/<position>/<collection>/   (puck 键 = <puck>_<position>)
//! ```
//!
//! ## collection 目录内容（均为可选）
//! ```text
//! processing/autoPROC.xml   processing/scaling.xml   processing/summary.html
//! screen/*.xml              screen/*.h5|*.cbf
//! camera/*.jpg|*.jpeg       images/*.h5|*.cbf
//! diff-center/  diff-center2/   (imcadr-ZX-result.html, imcadr-ZY-result.html)
//! ```
//!
//! ## 依赖关系
//! - 被 `pipeline/mod.rs` 调用
//! - 使用 `walkdir` 遍历目录，`glob` 匹配文件名，`regex` 校验目录名
//! - 产出 `models::CollectionFiles`

use crate::error::DiscoveryError;
use crate::models::{CollectionFiles, DiffCenter, ImageSet};

use glob::{MatchOptions, Pattern};
use regex::Regex;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;
use tracing::{debug, warn};
use walkdir::WalkDir;

/// 可识别的目录名：字母或数字开头，不含空白
const DIR_NAME_PATTERN: &str = r"^[A-Za-z0-9][A-Za-z0-9_.+-]*$";

/// 衍射对中目录
const DIFF_CENTER_DIRS: [&str; 2] = ["diff-center", "diff-center2"];

/// 数据目录布局
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Layout {
    /// root/<puck>/<collection>
    #[default]
    Flat,
    /// root/<site>/<puck>/<position>/<collection>
    Site,
}

impl std::fmt::Display for Layout {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Layout::Flat => write!(f, "flat"),
            Layout::Site => write!(f, "site"),
        }
    }
}

/// 发现的一个 collection
#[derive(Debug, Clone, PartialEq)]
pub struct DiscoveredCollection {
    pub puck: String,
    pub collection: String,
    pub path: PathBuf,
    pub files: CollectionFiles,
}

/// 目录发现器
pub struct PathDiscoverer {
    /// 数据根目录
    root: PathBuf,
    /// 目录布局
    layout: Layout,
}

impl PathDiscoverer {
    /// 创建新的目录发现器
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            layout: Layout::Flat,
        }
    }

    /// 设置目录布局
    pub fn with_layout(mut self, layout: Layout) -> Self {
        self.layout = layout;
        self
    }

    /// 识别 puck 与 collection 目录；文件定位在迭代时进行
    pub fn discover(&self) -> Result<Discovery, DiscoveryError> {
        if !self.root.exists() {
            return Err(DiscoveryError::RootNotFound {
                path: self.root.display().to_string(),
            });
        }
        if !self.root.is_dir() {
            return Err(DiscoveryError::RootNotDirectory {
                path: self.root.display().to_string(),
            });
        }

        let groups = match self.layout {
            Layout::Flat => self.scan_flat()?,
            Layout::Site => self.scan_sites()?,
        };

        if groups.is_empty() {
            return Err(DiscoveryError::NoPucks {
                path: self.root.display().to_string(),
            });
        }

        let pending = groups
            .iter()
            .flat_map(|g| {
                g.collections
                    .iter()
                    .map(move |(name, path)| (g.key.clone(), name.clone(), path.clone()))
            })
            .collect::<Vec<_>>();

        debug!(
            root = %self.root.display(),
            layout = %self.layout,
            pucks = groups.len(),
            collections = pending.len(),
            "discovery finished"
        );

        Ok(Discovery {
            puck_keys: groups.into_iter().map(|g| g.key).collect(),
            pending: pending.into_iter(),
        })
    }

    /// root/<puck>/<collection>
    fn scan_flat(&self) -> Result<Vec<PuckDir>, DiscoveryError> {
        let mut groups = Vec::new();
        for (puck, puck_path) in recognized_subdirs(&self.root, "puck")? {
            let Some(collections) = nested_subdirs(&puck_path, "collection") else {
                continue;
            };
            if collections.is_empty() {
                warn!(path = %puck_path.display(), "no collection directories, puck skipped");
                continue;
            }
            groups.push(PuckDir {
                key: puck,
                collections,
            });
        }
        Ok(groups)
    }

    /// root/<site>/<puck>/<position>/<collection>
    fn scan_sites(&self) -> Result<Vec<PuckDir>, DiscoveryError> {
        let mut groups: Vec<PuckDir> = Vec::new();
        for (_, site_path) in recognized_subdirs(&self.root, "site")? {
            let Some(pucks) = nested_subdirs(&site_path, "puck") else {
                continue;
            };
            for (puck, puck_path) in pucks {
                let Some(positions) = nested_subdirs(&puck_path, "position") else {
                    continue;
                };
                if positions.is_empty() {
                    warn!(path = %puck_path.display(), "no position directories found in puck");
                    continue;
                }

                for (position, position_path) in positions {
                    let Some(collections) = nested_subdirs(&position_path, "collection") else {
                        continue;
                    };
                    if collections.is_empty() {
                        warn!(
                            path = %position_path.display(),
                            "no collection directories, position skipped"
                        );
                        continue;
                    }

                    let key = format!("{}_{}", puck, position);
                    match groups.iter_mut().find(|g| g.key == key) {
                        Some(existing) => existing.absorb(collections),
                        None => groups.push(PuckDir { key, collections }),
                    }
                }
            }
        }
        Ok(groups)
    }
}

/// 一个 puck 键及其 collection 目录
struct PuckDir {
    key: String,
    collections: Vec<(String, PathBuf)>,
}

impl PuckDir {
    /// 合并另一个 site 下同键的 collection；重复的 collection 名被跳过
    fn absorb(&mut self, collections: Vec<(String, PathBuf)>) {
        for (name, path) in collections {
            if self.collections.iter().any(|(n, _)| *n == name) {
                warn!(
                    puck = %self.key,
                    path = %path.display(),
                    "duplicate collection {} skipped",
                    name
                );
                continue;
            }
            self.collections.push((name, path));
        }
    }
}

/// 发现结果：按发现顺序惰性产出 `DiscoveredCollection`
pub struct Discovery {
    puck_keys: Vec<String>,
    pending: std::vec::IntoIter<(String, String, PathBuf)>,
}

impl Discovery {
    /// 按发现顺序的 puck 键
    pub fn puck_keys(&self) -> &[String] {
        &self.puck_keys
    }
}

impl Iterator for Discovery {
    type Item = DiscoveredCollection;

    fn next(&mut self) -> Option<DiscoveredCollection> {
        let (puck, collection, path) = self.pending.next()?;
        let files = locate_files(&path);
        Some(DiscoveredCollection {
            puck,
            collection,
            path,
            files,
        })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.pending.size_hint()
    }
}

impl ExactSizeIterator for Discovery {}

/// 目录名是否符合命名约定
pub fn is_recognized_name(name: &str) -> bool {
    static DIR_NAME: OnceLock<Regex> = OnceLock::new();
    DIR_NAME
        .get_or_init(|| Regex::new(DIR_NAME_PATTERN).expect("directory name pattern is valid"))
        .is_match(name)
}

/// 列出可识别的直接子目录（按文件名排序）
///
/// 只有 `dir` 本身无法列出时返回错误；不可识别或无法访问的条目
/// （悬空链接、无权限、链接循环）记录警告后跳过。
fn recognized_subdirs(dir: &Path, level: &str) -> Result<Vec<(String, PathBuf)>, DiscoveryError> {
    let mut subdirs = Vec::new();

    for entry in WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .follow_links(true)
        .sort_by_file_name()
    {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) if e.depth() == 0 => {
                return Err(DiscoveryError::ReadDir {
                    path: dir.display().to_string(),
                    source: e.into(),
                });
            }
            Err(e) => {
                warn!(path = %dir.display(), "unusable {} entry skipped: {}", level, e);
                continue;
            }
        };
        if !entry.file_type().is_dir() {
            continue;
        }

        match entry.file_name().to_str() {
            Some(name) if is_recognized_name(name) => {
                subdirs.push((name.to_string(), entry.path().to_path_buf()));
            }
            _ => {
                warn!(path = %entry.path().display(), "unrecognized {} directory skipped", level);
            }
        }
    }

    Ok(subdirs)
}

/// 根目录以下的层级：无法列出的目录记录警告后跳过
fn nested_subdirs(dir: &Path, level: &str) -> Option<Vec<(String, PathBuf)>> {
    match recognized_subdirs(dir, level) {
        Ok(subdirs) => Some(subdirs),
        Err(e) => {
            warn!("{}, directory skipped", e);
            None
        }
    }
}

/// 定位 collection 目录中的文件
pub fn locate_files(collection_dir: &Path) -> CollectionFiles {
    let processing = collection_dir.join("processing");
    let screen = collection_dir.join("screen");

    let autoproc_xml = first_file(&[
        processing.join("autoPROC.xml"),
        collection_dir.join("autoPROC.xml"),
    ]);
    // autoPROC.xml 本身内嵌缩放统计
    let scaling_xml = first_file(&[
        processing.join("scaling.xml"),
        collection_dir.join("scaling.xml"),
    ])
    .or_else(|| autoproc_xml.clone());
    let screening_xml = files_matching(&screen, &["*.xml"])
        .into_iter()
        .next()
        .or_else(|| first_file(&[collection_dir.join("screening.xml")]));

    let diff_center = DIFF_CENTER_DIRS
        .iter()
        .map(|name| collection_dir.join(name))
        .filter(|dir| dir.is_dir())
        .map(|dir| DiffCenter {
            name: dir
                .file_name()
                .map(|n| n.to_string_lossy().to_string())
                .unwrap_or_default(),
            num_images: count_images(&dir),
            zx_result: first_file(&[dir.join("imcadr-ZX-result.html")]),
            zy_result: first_file(&[dir.join("imcadr-ZY-result.html")]),
            path: dir,
        })
        .collect();

    CollectionFiles {
        autoproc_xml,
        scaling_xml,
        screening_xml,
        summary_html: first_file(&[processing.join("summary.html")]),
        camera_files: camera_files(&collection_dir.join("camera")),
        images: image_set(&collection_dir.join("images")),
        screen_images: image_set(&screen),
        diff_center,
    }
}

/// 第一个存在的文件
fn first_file(candidates: &[PathBuf]) -> Option<PathBuf> {
    candidates.iter().find(|p| p.is_file()).cloned()
}

/// 目录中匹配任一模式的文件（不区分大小写，按文件名排序）
fn files_matching(dir: &Path, patterns: &[&str]) -> Vec<PathBuf> {
    if !dir.is_dir() {
        return Vec::new();
    }

    let patterns: Vec<Pattern> = patterns
        .iter()
        .filter_map(|p| Pattern::new(p).ok())
        .collect();
    let options = MatchOptions {
        case_sensitive: false,
        ..MatchOptions::new()
    };

    WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .filter(|e| {
            e.file_name()
                .to_str()
                .map(|name| patterns.iter().any(|p| p.matches_with(name, options)))
                .unwrap_or(false)
        })
        .map(|e| e.path().to_path_buf())
        .collect()
}

/// 衍射图像数量：优先 HDF5，没有时统计 CBF
fn count_images(dir: &Path) -> usize {
    let h5 = files_matching(dir, &["*.h5"]).len();
    if h5 > 0 {
        h5
    } else {
        files_matching(dir, &["*.cbf"]).len()
    }
}

fn image_set(dir: &Path) -> Option<ImageSet> {
    dir.is_dir().then(|| ImageSet {
        path: dir.to_path_buf(),
        num_images: count_images(dir),
    })
}

/// 相机图像，"before" 在前、"after" 其次，其余按路径排序
fn camera_files(dir: &Path) -> Vec<PathBuf> {
    let mut files = files_matching(dir, &["*.jpg", "*.jpeg"]);
    files.sort_by_key(|path| {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_lowercase())
            .unwrap_or_default();
        (!name.contains("before"), !name.contains("after"), path.clone())
    });
    files
}
