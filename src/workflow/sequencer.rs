//! 展示顺序状态机 - 流程层
//!
//! 状态只向前推进：`Idle → Active → Complete`，打乱失败时进入 `Halted`。
//! 所有非法调用都退化为空操作，返回 [`Transition::Ignored`]。

use tracing::{debug, error, info};

use crate::error::{RegistryError, ShuffleError};
use crate::models::{AdvancePolicy, QuestionRef, Registry, Unit, UnitId, UnitSpec};
use crate::services::{ConstrainedShuffle, RandomSource, ShuffleOptions};
use crate::workflow::host::HostAdapter;
use crate::workflow::message::{Interaction, SequencerEvent, SequencerState, Transition};

/// 展示顺序状态机
///
/// - 持有注册表、打乱后的顺序和游标
/// - 游标 `cursor` 为已显示的单元数，`0 <= cursor <= order.len()`
/// - 每个单元最多触发一次前进
pub struct Sequencer<H, R> {
    registry: Registry,
    order: Vec<UnitId>,
    shuffled: bool,
    cursor: usize,
    state: SequencerState,
    advanced: Vec<bool>,
    control_enabled: Vec<bool>,
    failure: Option<ShuffleError>,
    shuffle: ConstrainedShuffle,
    host: H,
    rng: R,
}

impl<H: HostAdapter, R: RandomSource> Sequencer<H, R> {
    /// 创建状态机，并隐藏已注册题目的宿主"下一页"按钮
    pub fn new(registry: Registry, mut host: H, rng: R, options: ShuffleOptions) -> Self {
        for unit in registry.iter() {
            for member in unit.members() {
                host.hide_next_control(member);
            }
        }

        Self {
            registry,
            order: Vec::new(),
            shuffled: false,
            cursor: 0,
            state: SequencerState::Idle,
            advanced: Vec::new(),
            control_enabled: Vec::new(),
            failure: None,
            shuffle: ConstrainedShuffle::new(options),
            host,
            rng,
        }
    }

    // ========== 设置阶段 ==========

    /// 注册一个单元，开始之后调用会被忽略
    pub fn register(&mut self, spec: UnitSpec) -> Result<Option<UnitId>, RegistryError> {
        let id = self.registry.register(spec)?;
        if let Some(unit) = id.and_then(|id| self.registry.get(id)) {
            for member in unit.members() {
                self.host.hide_next_control(member);
            }
        }
        Ok(id)
    }

    /// 添加一道题，参见 [`Registry::add_question`]
    pub fn add_question(
        &mut self,
        question: QuestionRef,
        group: &str,
        block: Option<&str>,
        use_buttons: Option<bool>,
    ) -> Result<Option<UnitId>, RegistryError> {
        let hidden = question.clone();
        let id = self.registry.add_question(question, group, block, use_buttons)?;
        if id.is_some() {
            self.host.hide_next_control(&hidden);
        }
        Ok(id)
    }

    /// 计算新的展示顺序并整体替换旧顺序，只能在开始前调用
    ///
    /// 失败时通知宿主并进入 `Halted`
    pub fn randomize(&mut self) -> Result<(), ShuffleError> {
        if self.state != SequencerState::Idle {
            debug!("已经开始展示，忽略重新打乱");
            return Ok(());
        }
        self.registry.lock();

        match self.shuffle.shuffle(&self.registry, &mut self.rng) {
            Ok(order) => {
                self.order = order;
                self.shuffled = true;
                Ok(())
            }
            Err(e) => {
                error!("❌ {}", e);
                self.host.alert(&e.to_string());
                self.state = SequencerState::Halted;
                self.failure = Some(e.clone());
                Err(e)
            }
        }
    }

    /// 使用外部给定的顺序，只能在开始前调用
    pub fn use_order(&mut self, order: Vec<UnitId>) -> Result<(), RegistryError> {
        if self.state != SequencerState::Idle {
            debug!("已经开始展示，忽略给定的顺序");
            return Ok(());
        }
        self.registry.lock();

        let expected = self.registry.len();
        let mut seen = vec![false; expected];
        let is_permutation = order.len() == expected
            && order.iter().all(|id| match seen.get_mut(id.index()) {
                Some(flag) if !*flag => {
                    *flag = true;
                    true
                }
                _ => false,
            });
        if !is_permutation {
            return Err(RegistryError::InvalidOrder {
                expected,
                actual: order.len(),
            });
        }

        self.order = order;
        self.shuffled = true;
        Ok(())
    }

    // ========== 运行阶段 ==========

    /// 处理一条宿主消息
    pub fn handle(&mut self, event: SequencerEvent) -> Transition {
        match event {
            SequencerEvent::Start => self.start(),
            SequencerEvent::MemberInteraction {
                unit,
                member,
                interaction,
            } => self.member_interaction(unit, member, &interaction),
            SequencerEvent::AdvanceControlActivated { unit } => self.activate_control(unit),
            SequencerEvent::Advance => self.advance(),
        }
    }

    /// 锁定注册表、创建按钮、打乱（如果还没打乱）并显示第一个单元
    pub fn start(&mut self) -> Transition {
        if self.state != SequencerState::Idle {
            debug!("重复调用 start，忽略");
            return Transition::Ignored;
        }
        self.registry.lock();

        for unit in self.registry.iter() {
            if unit.policy() == AdvancePolicy::Explicit {
                self.host.create_advance_control(unit);
            }
        }

        if !self.shuffled && self.randomize().is_err() {
            return Transition::Halted;
        }

        self.advanced = vec![false; self.registry.len()];
        self.control_enabled = vec![false; self.registry.len()];
        info!("▶️ 开始展示，共 {} 个单元", self.order.len());

        self.step()
    }

    /// 隐藏当前单元并显示下一个
    ///
    /// 只在 `Active` 状态下有效；按钮单元必须所有题目都已作答
    pub fn advance(&mut self) -> Transition {
        if self.state != SequencerState::Active {
            debug!("当前状态 {:?} 不能前进，忽略", self.state);
            return Transition::Ignored;
        }

        let current = self.order[self.cursor - 1];
        if self.advanced[current.index()] {
            debug!("单元 {} 已经触发过前进，忽略", current);
            return Transition::Ignored;
        }
        if let Some(unit) = self.registry.get(current) {
            if unit.policy() == AdvancePolicy::Explicit && !unit.can_progress() {
                debug!(
                    "{} 还有题目未作答 ({}/{})，不能前进",
                    unit,
                    unit.answered_count(),
                    unit.members().len()
                );
                return Transition::Ignored;
            }
        }

        self.advanced[current.index()] = true;
        self.step()
    }

    /// 记录某道题已作答
    ///
    /// - 按钮单元：所有题目都作答后启用按钮
    /// - 无按钮单元：立即前进
    pub fn member_answered(&mut self, unit: UnitId, member: usize) -> Transition {
        if !matches!(self.state, SequencerState::Active | SequencerState::Complete) {
            return Transition::Ignored;
        }
        if self.current() != Some(unit) {
            debug!("单元 {} 当前未显示，忽略作答", unit);
            return Transition::Ignored;
        }
        let Some(current) = self.registry.get_mut(unit) else {
            return Transition::Ignored;
        };
        if member >= current.members().len() {
            return Transition::Ignored;
        }
        current.mark_answered(member);

        if self.state == SequencerState::Complete {
            return Transition::Recorded;
        }

        match current.policy() {
            AdvancePolicy::Explicit => {
                if current.can_progress() && !self.control_enabled[unit.index()] {
                    self.control_enabled[unit.index()] = true;
                    self.host.set_advance_control_enabled(current, true);
                    Transition::ControlEnabled
                } else {
                    Transition::Recorded
                }
            }
            AdvancePolicy::Implicit => self.advance(),
        }
    }

    /// 按题目句柄处理一次操作
    pub fn question_interaction(&mut self, question: &QuestionRef, interaction: &Interaction) -> Transition {
        match self.registry.locate(question) {
            Some((unit, member)) => self.member_interaction(unit, member, interaction),
            None => Transition::Ignored,
        }
    }

    fn member_interaction(&mut self, unit: UnitId, member: usize, interaction: &Interaction) -> Transition {
        if !interaction.is_answer() {
            return Transition::Ignored;
        }
        self.member_answered(unit, member)
    }

    fn activate_control(&mut self, unit: UnitId) -> Transition {
        if self.current() != Some(unit) {
            return Transition::Ignored;
        }
        match self.registry.get(unit) {
            Some(u) if u.policy() == AdvancePolicy::Explicit => self.advance(),
            _ => Transition::Ignored,
        }
    }

    /// 隐藏上一个单元，显示下一个单元并移动游标
    fn step(&mut self) -> Transition {
        if self.cursor > 0 {
            if let Some(previous) = self.registry.get(self.order[self.cursor - 1]) {
                self.host.hide_unit(previous);
            }
        }

        if self.cursor >= self.order.len() {
            self.state = SequencerState::Complete;
            info!("✓ 没有更多单元");
            return Transition::Completed;
        }

        let next = self.order[self.cursor];
        self.cursor += 1;
        let Some(unit) = self.registry.get(next) else {
            return Transition::Ignored;
        };
        info!("➡️ 显示 {} ({}/{})", unit, self.cursor, self.order.len());
        self.host.reveal_unit(unit);

        if self.cursor == self.order.len() {
            // 最后一个单元：恢复宿主的"下一页"按钮，隐藏我们自己的按钮
            self.host.show_next_control(unit.last_member());
            if unit.policy() == AdvancePolicy::Explicit {
                self.host.hide_advance_control(unit);
            }
            self.state = SequencerState::Complete;
            info!("🏁 已到达最后一个单元");
            return Transition::Completed;
        }

        self.state = SequencerState::Active;
        Transition::Advanced {
            cursor: self.cursor,
        }
    }

    // ========== 查询 ==========

    pub fn state(&self) -> SequencerState {
        self.state
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn order(&self) -> &[UnitId] {
        &self.order
    }

    /// 当前显示中的单元
    pub fn current(&self) -> Option<UnitId> {
        self.cursor
            .checked_sub(1)
            .and_then(|i| self.order.get(i).copied())
    }

    pub fn current_unit(&self) -> Option<&Unit> {
        self.current().and_then(|id| self.registry.get(id))
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// 打乱失败的原因
    pub fn failure(&self) -> Option<&ShuffleError> {
        self.failure.as_ref()
    }

    pub fn host(&self) -> &H {
        &self.host
    }
}
