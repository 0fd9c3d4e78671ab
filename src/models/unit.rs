//! 展示单元
//!
//! 一个单元是一道题，或者一组需要同时展示的题目

use std::fmt::{self, Display};

use serde::{Deserialize, Serialize};

/// 宿主问卷系统中一道题的句柄
///
/// 核心逻辑只关心它的身份，不解析内容
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct QuestionRef(String);

impl QuestionRef {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for QuestionRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for QuestionRef {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

/// 注册表中单元的下标，只能由 [`Registry`](super::Registry) 分配
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct UnitId(pub(crate) usize);

impl UnitId {
    pub fn index(self) -> usize {
        self.0
    }
}

impl Display for UnitId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// 单元的前进策略
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AdvancePolicy {
    /// 显示"下一题"按钮，所有题目作答后按钮可用
    Explicit,
    /// 作答即跳转到下一个单元
    Implicit,
}

impl AdvancePolicy {
    pub fn from_use_buttons(use_buttons: bool) -> Self {
        if use_buttons {
            AdvancePolicy::Explicit
        } else {
            AdvancePolicy::Implicit
        }
    }

    pub fn uses_buttons(self) -> bool {
        matches!(self, AdvancePolicy::Explicit)
    }
}

/// 用于注册新单元的描述
#[derive(Debug, Clone)]
pub struct UnitSpec {
    pub key: String,
    pub group: String,
    pub members: Vec<QuestionRef>,
    pub policy: AdvancePolicy,
}

impl UnitSpec {
    pub fn new(
        key: impl Into<String>,
        group: impl Into<String>,
        members: Vec<QuestionRef>,
        policy: AdvancePolicy,
    ) -> Self {
        Self {
            key: key.into(),
            group: group.into(),
            members,
            policy,
        }
    }

    /// 只包含一道题的单元，单元标识与题目标识相同
    pub fn single(question: impl Into<String>, group: impl Into<String>, policy: AdvancePolicy) -> Self {
        let question = question.into();
        Self::new(question.clone(), group, vec![QuestionRef::new(question)], policy)
    }
}

/// 展示单元
#[derive(Debug, Clone)]
pub struct Unit {
    id: UnitId,
    key: String,
    group: String,
    members: Vec<QuestionRef>,
    policy: AdvancePolicy,
    answered: Vec<bool>,
}

impl Unit {
    pub(crate) fn from_spec(id: UnitId, spec: UnitSpec) -> Self {
        let answered = vec![false; spec.members.len()];
        Self {
            id,
            key: spec.key,
            group: spec.group,
            members: spec.members,
            policy: spec.policy,
            answered,
        }
    }

    pub fn id(&self) -> UnitId {
        self.id
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn group(&self) -> &str {
        &self.group
    }

    pub fn members(&self) -> &[QuestionRef] {
        &self.members
    }

    pub fn policy(&self) -> AdvancePolicy {
        self.policy
    }

    /// 最后一道题，按钮和宿主的"下一页"按钮都挂在它上面
    pub fn last_member(&self) -> &QuestionRef {
        // 注册表保证 members 非空
        &self.members[self.members.len() - 1]
    }

    pub fn member_index(&self, question: &QuestionRef) -> Option<usize> {
        self.members.iter().position(|m| m == question)
    }

    pub(crate) fn push_member(&mut self, question: QuestionRef) {
        self.members.push(question);
        self.answered.push(false);
    }

    /// 标记某道题已作答，越界下标直接忽略
    ///
    /// 返回该题之前是否未作答
    pub(crate) fn mark_answered(&mut self, member: usize) -> bool {
        match self.answered.get_mut(member) {
            Some(flag) => !std::mem::replace(flag, true),
            None => false,
        }
    }

    pub fn is_answered(&self, member: usize) -> bool {
        self.answered.get(member).copied().unwrap_or(false)
    }

    pub fn answered_count(&self) -> usize {
        self.answered.iter().filter(|a| **a).count()
    }

    /// 所有题目都已作答
    pub fn can_progress(&self) -> bool {
        self.answered.iter().all(|a| *a)
    }
}

impl Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[单元 {} 组别 {}]", self.key, self.group)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pair() -> Unit {
        Unit::from_spec(
            UnitId(0),
            UnitSpec::new(
                "pair",
                "food",
                vec![QuestionRef::new("Q1"), QuestionRef::new("Q2")],
                AdvancePolicy::Explicit,
            ),
        )
    }

    #[test]
    fn test_can_progress_requires_every_member() {
        let mut unit = pair();
        assert!(!unit.can_progress());

        assert!(unit.mark_answered(0));
        assert!(!unit.can_progress());
        assert_eq!(unit.answered_count(), 1);

        assert!(unit.mark_answered(1));
        assert!(unit.can_progress());
    }

    #[test]
    fn test_mark_answered_twice_and_out_of_range() {
        let mut unit = pair();
        assert!(unit.mark_answered(1));
        assert!(!unit.mark_answered(1));
        assert!(!unit.mark_answered(7));
        assert!(!unit.is_answered(7));
    }

    #[test]
    fn test_last_member_and_lookup() {
        let unit = pair();
        assert_eq!(unit.last_member().as_str(), "Q2");
        assert_eq!(unit.member_index(&QuestionRef::new("Q1")), Some(0));
        assert_eq!(unit.member_index(&QuestionRef::new("Q9")), None);
    }

    #[test]
    fn test_policy_from_use_buttons() {
        assert_eq!(AdvancePolicy::from_use_buttons(true), AdvancePolicy::Explicit);
        assert_eq!(AdvancePolicy::from_use_buttons(false), AdvancePolicy::Implicit);
        assert!(!AdvancePolicy::Implicit.uses_buttons());
    }
}
