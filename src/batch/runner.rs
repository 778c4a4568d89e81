//! # 批量执行器
//!
//! 并行执行逐 collection 的处理任务。
//!
//! ## 功能
//! - 基于 rayon 的并行迭代
//! - 结果顺序与输入顺序一致（与完成顺序无关）
//! - 进度条显示
//!
//! ## 依赖关系
//! - 被 `pipeline/mod.rs` 调用
//! - 使用 `utils/progress.rs` 创建进度条
//! - 使用 `rayon` 进行并行计算

use crate::utils::progress;

use rayon::prelude::*;
use tracing::warn;

/// 批量执行器
pub struct BatchRunner {
    /// 并行作业数
    jobs: usize,
    /// 是否显示进度条
    show_progress: bool,
}

impl BatchRunner {
    /// 创建新的批量执行器，`jobs == 0` 时使用全部 CPU
    pub fn new(jobs: usize) -> Self {
        let jobs = if jobs == 0 { num_cpus::get() } else { jobs };
        Self {
            jobs,
            show_progress: true,
        }
    }

    /// 设置是否显示进度条
    pub fn with_progress(mut self, show: bool) -> Self {
        self.show_progress = show;
        self
    }

    pub fn jobs(&self) -> usize {
        self.jobs
    }

    /// 并行处理，返回值按输入顺序排列
    pub fn run<I, O, F>(&self, items: Vec<I>, message: &str, processor: F) -> Vec<O>
    where
        I: Sync,
        O: Send,
        F: Fn(&I) -> O + Sync + Send,
    {
        let pb = if self.show_progress {
            progress::create_progress_bar(items.len() as u64, message)
        } else {
            indicatif::ProgressBar::hidden()
        };

        let work = || {
            items
                .par_iter()
                .map(|item| {
                    let output = processor(item);
                    pb.inc(1);
                    output
                })
                .collect::<Vec<O>>()
        };

        // 配置 rayon 线程池
        let results = match rayon::ThreadPoolBuilder::new()
            .num_threads(self.jobs)
            .build()
        {
            Ok(pool) => pool.install(work),
            Err(e) => {
                warn!("failed to build thread pool ({}), using global pool", e);
                work()
            }
        };

        pb.finish_and_clear();
        results
    }
}
