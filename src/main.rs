//! # trip-report - 同步辐射晶体学行程报告生成工具
//!
//! 扫描光束线数据目录（puck / collection），解析 autoPROC、缩放统计与
//! screening XML，合并可选的 CSV 项目表，生成统一的数据模型、
//! JSON 导出与多页 HTML 报告。
//!
//! ## 子命令
//! - `report`  - 收集数据并生成完整 HTML 报告
//! - `render`  - 从导出的 `data.json` 重新生成报告
//! - `collect` - 仅收集数据并导出 JSON
//!
//! ## 依赖关系
//! ```text
//! main.rs
//!   ├── cli/        (命令行参数定义)
//!   ├── commands/   (命令执行逻辑)
//!   │     ├── pipeline/  (发现 → 规范化 → 合并 → 构建)
//!   │     │     ├── batch/    (目录发现与并行执行)
//!   │     │     └── parsers/  (格式读取器)
//!   │     ├── report/    (JSON 导出、文件放置、HTML)
//!   │     └── models/    (数据模型)
//!   ├── utils/      (日志、输出、进度条)
//!   └── error.rs    (错误处理)
//! ```

mod batch;
mod cli;
mod commands;
mod error;
mod models;
mod parsers;
mod pipeline;
mod report;
mod utils;

use clap::Parser;
use cli::Cli;

fn main() {
    // Initialize colored output for Windows compatibility
    #[cfg(windows)]
    colored::control::set_virtual_terminal(true).ok();

    let cli = Cli::parse();
    utils::logging::init(cli.debug);

    let generated_at = chrono::Local::now().naive_local();

    if let Err(e) = commands::run(cli.command, generated_at) {
        utils::output::print_error(&format!("{}", e));
        std::process::exit(1);
    }
}
