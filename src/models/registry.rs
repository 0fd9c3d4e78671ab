//! 单元注册表
//!
//! 设置阶段收集所有单元；开始打乱后锁定，之后的注册全部被忽略

use std::collections::HashMap;

use tracing::debug;

use crate::error::RegistryError;
use crate::models::unit::{AdvancePolicy, QuestionRef, Unit, UnitId, UnitSpec};

/// 单元注册表
///
/// 单元按插入顺序存放在 arena 中，由 [`UnitId`] 下标访问。
/// 字符串标识只在设置阶段用于查找已有单元。
#[derive(Debug, Clone)]
pub struct Registry {
    units: Vec<Unit>,
    keys: HashMap<String, UnitId>,
    default_policy: AdvancePolicy,
    locked: bool,
    next_generated: usize,
}

impl Registry {
    /// 创建空的注册表
    ///
    /// `use_buttons_by_default` 决定未显式指定策略的题目的前进方式
    pub fn new(use_buttons_by_default: bool) -> Self {
        Self {
            units: Vec::new(),
            keys: HashMap::new(),
            default_policy: AdvancePolicy::from_use_buttons(use_buttons_by_default),
            locked: false,
            next_generated: 0,
        }
    }

    pub fn default_policy(&self) -> AdvancePolicy {
        self.default_policy
    }

    /// 注册一个完整的单元
    ///
    /// 已锁定时返回 `Ok(None)`，不视为错误
    pub fn register(&mut self, spec: UnitSpec) -> Result<Option<UnitId>, RegistryError> {
        if self.locked {
            debug!("注册表已锁定，忽略单元 {}", spec.key);
            return Ok(None);
        }
        if spec.members.is_empty() {
            return Err(RegistryError::EmptyUnit { key: spec.key });
        }
        if self.keys.contains_key(&spec.key) {
            return Err(RegistryError::DuplicateUnit { key: spec.key });
        }
        for (i, member) in spec.members.iter().enumerate() {
            if spec.members[..i].contains(member) {
                return Err(RegistryError::DuplicateMember {
                    key: spec.key,
                    question: member.to_string(),
                });
            }
            if let Some((existing, _)) = self.locate(member) {
                return Err(RegistryError::DuplicateQuestion {
                    key: spec.key,
                    question: member.to_string(),
                    existing: self.units[existing.0].key().to_string(),
                });
            }
        }

        let id = UnitId(self.units.len());
        debug!("注册单元 {} (组别: {}, 题目数: {})", spec.key, spec.group, spec.members.len());
        self.keys.insert(spec.key.clone(), id);
        self.units.push(Unit::from_spec(id, spec));
        Ok(Some(id))
    }

    /// 添加一道题
    ///
    /// - `block` 为单元名称，同名的题目会合并到同一个单元中一起展示；
    ///   为 `None` 时自动生成一个唯一名称
    /// - 单元的组别和前进策略由它的第一道题决定
    /// - `use_buttons` 为 `None` 时使用注册表的默认策略
    pub fn add_question(
        &mut self,
        question: QuestionRef,
        group: &str,
        block: Option<&str>,
        use_buttons: Option<bool>,
    ) -> Result<Option<UnitId>, RegistryError> {
        if self.locked {
            debug!("注册表已锁定，忽略题目 {}", question);
            return Ok(None);
        }

        // 一道题只能属于一个单元
        if let Some((existing, _)) = self.locate(&question) {
            let existing = self.units[existing.0].key().to_string();
            return Err(match block {
                Some(name) if name == existing => RegistryError::DuplicateMember {
                    key: existing,
                    question: question.to_string(),
                },
                _ => RegistryError::DuplicateQuestion {
                    key: block.map(str::to_string).unwrap_or_default(),
                    question: question.to_string(),
                    existing,
                },
            });
        }

        let policy = use_buttons
            .map(AdvancePolicy::from_use_buttons)
            .unwrap_or(self.default_policy);

        let key = match block {
            Some(name) => name.to_string(),
            None => self.generate_key(),
        };

        if let Some(&id) = self.keys.get(&key) {
            let unit = &mut self.units[id.0];
            debug!("题目 {} 加入已有单元 {}", question, key);
            unit.push_member(question);
            return Ok(Some(id));
        }

        self.register(UnitSpec::new(key, group, vec![question], policy))
    }

    /// 锁定注册表，可重复调用
    pub fn lock(&mut self) {
        if !self.locked {
            debug!("注册表已锁定，共 {} 个单元", self.units.len());
        }
        self.locked = true;
    }

    pub fn is_locked(&self) -> bool {
        self.locked
    }

    pub fn get(&self, id: UnitId) -> Option<&Unit> {
        self.units.get(id.0)
    }

    pub(crate) fn get_mut(&mut self, id: UnitId) -> Option<&mut Unit> {
        self.units.get_mut(id.0)
    }

    /// 按名称查找单元
    pub fn find(&self, key: &str) -> Option<UnitId> {
        self.keys.get(key).copied()
    }

    /// 查找某道题所在的单元以及它在单元内的下标
    pub fn locate(&self, question: &QuestionRef) -> Option<(UnitId, usize)> {
        self.units
            .iter()
            .find_map(|u| u.member_index(question).map(|i| (u.id(), i)))
    }

    pub fn len(&self) -> usize {
        self.units.len()
    }

    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }

    /// 按插入顺序遍历
    pub fn iter(&self) -> impl Iterator<Item = &Unit> {
        self.units.iter()
    }

    pub fn ids(&self) -> impl Iterator<Item = UnitId> + '_ {
        self.units.iter().map(Unit::id)
    }

    /// 按插入顺序排列的组别
    pub fn groups(&self) -> Vec<&str> {
        self.units.iter().map(Unit::group).collect()
    }

    fn generate_key(&mut self) -> String {
        loop {
            let key = format!("unit-{}", self.next_generated);
            self.next_generated += 1;
            if !self.keys.contains_key(&key) {
                return key;
            }
        }
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::new(true)
    }
}
