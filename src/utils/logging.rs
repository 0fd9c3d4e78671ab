/// 日志工具模块
///
/// 提供日志格式化和输出的辅助函数
use tracing::info;

use crate::config::Config;
use crate::models::{Registry, UnitId};

/// 记录程序启动信息
pub fn log_startup(config: &Config) {
    info!("{}", "=".repeat(60));
    info!("🚀 程序启动 - 问卷题目随机展示");
    info!(
        "📊 同组最多连续: {} | 默认使用按钮: {} | 算法: {}",
        config.max_run, config.use_buttons_by_default, config.algorithm
    );
    match config.shuffle_seed {
        Some(seed) => info!("🎲 随机种子: {}", seed),
        None => info!("🎲 随机种子: 系统熵"),
    }
    info!("{}", "=".repeat(60));
}

/// 记录问卷开始信息
pub fn log_survey_start(index: usize, total: usize, name: &str) {
    info!("\n{}", "─".repeat(60));
    info!("📋 开始展示第 {}/{} 份问卷: {}", index, total, truncate_text(name, 40));
    info!("{}", "─".repeat(60));
}

/// 记录最终选定的顺序
pub fn log_chosen_order(registry: &Registry, order: &[UnitId]) {
    info!("选定的顺序:");
    for (position, id) in order.iter().enumerate() {
        if let Some(unit) = registry.get(*id) {
            info!(
                "  {:>2}. 单元: {}; 组别: {}",
                position + 1,
                truncate_text(unit.key(), 30),
                unit.group()
            );
        }
    }
}

/// 打印最终统计信息
pub fn print_final_stats(success: usize, failed: usize, total: usize, revealed: usize) {
    info!("\n{}", "=".repeat(60));
    info!("📊 全部处理完成统计");
    info!(
        "完成时间: {}",
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S")
    );
    info!("{}", "=".repeat(60));
    info!("✅ 成功: {}/{}", success, total);
    info!("❌ 失败: {}", failed);
    info!("👀 共显示单元: {}", revealed);
    info!("{}", "=".repeat(60));
}

/// 截断长文本用于日志显示
pub fn truncate_text(text: &str, max_len: usize) -> String {
    if text.chars().count() > max_len {
        text.chars().take(max_len).collect::<String>() + "..."
    } else {
        text.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_text() {
        assert_eq!(truncate_text("abc", 5), "abc");
        assert_eq!(truncate_text("饮食偏好调查问卷", 4), "饮食偏好...");
    }
}
