//! 宿主问卷系统接口
//!
//! 核心逻辑通过 [`HostAdapter`] 控制题目的显示与隐藏；
//! 宿主的交互回调以 [`SequencerEvent`](super::SequencerEvent) 消息的形式传入。

use crate::models::{QuestionRef, Unit, UnitId};

/// 宿主问卷系统提供的能力
pub trait HostAdapter {
    /// 隐藏宿主自带的"下一页"按钮
    fn hide_next_control(&mut self, question: &QuestionRef);
    /// 恢复宿主自带的"下一页"按钮
    fn show_next_control(&mut self, question: &QuestionRef);
    /// 显示单元（包括它的按钮）
    fn reveal_unit(&mut self, unit: &Unit);
    /// 隐藏单元（包括它的按钮）
    fn hide_unit(&mut self, unit: &Unit);
    /// 为单元创建"下一题"按钮，初始为禁用状态
    fn create_advance_control(&mut self, unit: &Unit);
    fn set_advance_control_enabled(&mut self, unit: &Unit, enabled: bool);
    fn hide_advance_control(&mut self, unit: &Unit);
    /// 向用户显示致命错误
    fn alert(&mut self, message: &str);
}

/// 记录到的一次宿主调用
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostCall {
    HideNextControl(QuestionRef),
    ShowNextControl(QuestionRef),
    Reveal(UnitId),
    Hide(UnitId),
    CreateControl(UnitId),
    SetControlEnabled(UnitId, bool),
    HideControl(UnitId),
    Alert(String),
}

/// 只记录调用的宿主，用于测试和演示
#[derive(Debug, Default, Clone)]
pub struct RecordingHost {
    calls: Vec<HostCall>,
    visible: Vec<UnitId>,
}

impl RecordingHost {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> &[HostCall] {
        &self.calls
    }

    /// 当前显示中的单元
    pub fn visible_units(&self) -> &[UnitId] {
        &self.visible
    }

    pub fn revealed_order(&self) -> Vec<UnitId> {
        self.calls
            .iter()
            .filter_map(|c| match c {
                HostCall::Reveal(id) => Some(*id),
                _ => None,
            })
            .collect()
    }

    pub fn alerts(&self) -> Vec<&str> {
        self.calls
            .iter()
            .filter_map(|c| match c {
                HostCall::Alert(msg) => Some(msg.as_str()),
                _ => None,
            })
            .collect()
    }

    pub fn contains(&self, call: &HostCall) -> bool {
        self.calls.contains(call)
    }
}

impl HostAdapter for RecordingHost {
    fn hide_next_control(&mut self, question: &QuestionRef) {
        self.calls.push(HostCall::HideNextControl(question.clone()));
    }

    fn show_next_control(&mut self, question: &QuestionRef) {
        self.calls.push(HostCall::ShowNextControl(question.clone()));
    }

    fn reveal_unit(&mut self, unit: &Unit) {
        self.calls.push(HostCall::Reveal(unit.id()));
        if !self.visible.contains(&unit.id()) {
            self.visible.push(unit.id());
        }
    }

    fn hide_unit(&mut self, unit: &Unit) {
        self.calls.push(HostCall::Hide(unit.id()));
        self.visible.retain(|id| *id != unit.id());
    }

    fn create_advance_control(&mut self, unit: &Unit) {
        self.calls.push(HostCall::CreateControl(unit.id()));
    }

    fn set_advance_control_enabled(&mut self, unit: &Unit, enabled: bool) {
        self.calls.push(HostCall::SetControlEnabled(unit.id(), enabled));
    }

    fn hide_advance_control(&mut self, unit: &Unit) {
        self.calls.push(HostCall::HideControl(unit.id()));
    }

    fn alert(&mut self, message: &str) {
        self.calls.push(HostCall::Alert(message.to_string()));
    }
}
