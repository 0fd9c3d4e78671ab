//! 通过日志展示的宿主，用于命令行演示

use tracing::{error, info};

use crate::models::{QuestionRef, Unit};
use crate::workflow::HostAdapter;

/// 把所有显示操作写到日志里的宿主
#[derive(Debug, Default)]
pub struct ConsoleHost {
    reveals: usize,
}

impl ConsoleHost {
    pub fn new() -> Self {
        Self::default()
    }

    /// 显示过的单元数
    pub fn reveals(&self) -> usize {
        self.reveals
    }
}

impl HostAdapter for ConsoleHost {
    fn hide_next_control(&mut self, _question: &QuestionRef) {}

    fn show_next_control(&mut self, question: &QuestionRef) {
        info!("⏭️ 显示问卷的下一页按钮 (题目 {})", question);
    }

    fn reveal_unit(&mut self, unit: &Unit) {
        self.reveals += 1;
        let members: Vec<&str> = unit.members().iter().map(QuestionRef::as_str).collect();
        info!("👀 显示 {}: {}", unit, members.join(", "));
    }

    fn hide_unit(&mut self, unit: &Unit) {
        info!("🙈 隐藏 {}", unit);
    }

    fn create_advance_control(&mut self, _unit: &Unit) {}

    fn set_advance_control_enabled(&mut self, unit: &Unit, enabled: bool) {
        if enabled {
            info!("🔓 {} 的下一题按钮已启用", unit);
        }
    }

    fn hide_advance_control(&mut self, _unit: &Unit) {}

    fn alert(&mut self, message: &str) {
        error!("🚨 {}", message);
    }
}
