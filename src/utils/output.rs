//! # 美化输出工具
//!
//! 提供统一的终端状态行样式。状态行与日志分开：
//! 日志经 `tracing` 写到 stderr，状态行面向用户。
//!
//! ## 依赖关系
//! - 被 `commands/`, `main.rs` 使用
//! - 使用 `colored` crate

use colored::Colorize;

/// 打印错误消息（stderr）
pub fn print_error(msg: &str) {
    eprintln!("{} {}", "[ERR]".red().bold(), msg);
}

/// 打印警告消息
pub fn print_warning(msg: &str) {
    println!("{} {}", "[WARN]".yellow().bold(), msg);
}

/// 打印信息消息
pub fn print_info(msg: &str) {
    println!("{} {}", "[*]".blue().bold(), msg);
}

/// 打印完成消息
pub fn print_done(msg: &str) {
    println!("{} {}", "[DONE]".green().bold(), msg);
}

/// 打印标题栏
pub fn print_header(title: &str) {
    let line = "─".repeat(60);
    println!("\n{}", line.dimmed());
    println!("  {}", title.bold());
    println!("{}\n", line.dimmed());
}

/// 打印对齐的计数行，计数为 0 时变暗
pub fn print_count(label: &str, count: usize) {
    let value = count.to_string();
    let value = if count == 0 {
        value.dimmed()
    } else {
        value.cyan().bold()
    };
    println!("    {:<24} {}", label, value);
}
