//! # 批量处理模块
//!
//! 提供数据目录发现与逐 collection 的批量并行处理能力。
//!
//! ## 功能
//! - 识别 puck / collection 目录并定位文件
//! - 并行处理，保持发现顺序
//! - 进度反馈
//!
//! ## 依赖关系
//! - 被 `pipeline/` 使用
//! - 使用 `walkdir` 遍历目录，`rayon` 并行处理，`indicatif` 显示进度

pub mod collector;
pub mod runner;

pub use collector::{DiscoveredCollection, Layout, PathDiscoverer};
pub use runner::BatchRunner;
