//! # 日志初始化
//!
//! 安装 `tracing-subscriber` 的 fmt 订阅者，输出到 stderr，
//! 与 stdout 上的 JSON / 彩色状态行分开。
//!
//! 过滤级别：`--debug` 时为 `debug`；否则优先 `RUST_LOG`，缺省 `info`。
//!
//! ## 依赖关系
//! - 被 `main.rs` 调用
//! - 使用 `tracing-subscriber` crate

use tracing_subscriber::EnvFilter;

/// 由命令行开关得到日志过滤器
pub fn filter(debug: bool) -> EnvFilter {
    if debug {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    }
}

/// 初始化全局日志订阅者
pub fn init(debug: bool) {
    tracing_subscriber::fmt()
        .with_env_filter(filter(debug))
        .with_writer(std::io::stderr)
        .with_target(debug)
        .init();
}
