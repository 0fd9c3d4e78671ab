//! 状态机的输入消息与输出结果

use crate::models::UnitId;

/// 用户对一道题的操作
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Interaction {
    /// 选择题的选择
    Selection,
    /// 文本题的当前内容
    Text(String),
}

impl Interaction {
    /// 选择总是算作答；文本不为空才算
    pub fn is_answer(&self) -> bool {
        match self {
            Interaction::Selection => true,
            Interaction::Text(value) => !value.is_empty(),
        }
    }
}

/// 宿主传给状态机的消息
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SequencerEvent {
    /// 开始展示
    Start,
    /// 用户操作了某个单元中的一道题
    MemberInteraction {
        unit: UnitId,
        member: usize,
        interaction: Interaction,
    },
    /// 用户点击了单元的"下一题"按钮
    AdvanceControlActivated { unit: UnitId },
    /// 直接请求前进
    Advance,
}

/// 状态机的状态
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SequencerState {
    /// 尚未开始，没有显示任何单元
    Idle,
    /// 正在展示，且不是最后一个单元
    Active,
    /// 最后一个单元已显示
    Complete,
    /// 打乱失败，不再继续
    Halted,
}

/// 处理一条消息的结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// 当前状态下无效，什么都没做
    Ignored,
    /// 记录了作答，但还不能前进
    Recorded,
    /// 单元所有题目已作答，按钮已启用
    ControlEnabled,
    /// 显示了下一个单元，`cursor` 为已显示的单元数
    Advanced { cursor: usize },
    /// 显示了最后一个单元
    Completed,
    /// 打乱失败
    Halted,
}
