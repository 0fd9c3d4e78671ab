//! 单份问卷的展示流程 - 编排层
//!
//! 用模拟的答题者驱动状态机：
//! 无按钮单元回答第一道题即前进，按钮单元回答所有题目后点击按钮。

use tracing::{info, warn};

use crate::config::Config;
use crate::error::AppResult;
use crate::models::{AdvancePolicy, SurveyFile};
use crate::orchestrator::console_host::ConsoleHost;
use crate::services::ChaChaSource;
use crate::utils::logging::log_chosen_order;
use crate::workflow::{HostAdapter, Interaction, Sequencer, SequencerEvent, SequencerState};

/// 单份问卷的统计
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct SessionStats {
    pub units: usize,
    pub questions: usize,
    /// 显示过的单元数
    pub revealed: usize,
}

/// 使用控制台宿主展示一份问卷
///
/// 题目注册失败或无法生成合法顺序时返回错误
pub fn run_session(survey: &SurveyFile, config: &Config) -> AppResult<SessionStats> {
    let registry = survey.build_registry(config.use_buttons_by_default)?;

    let sequencer = Sequencer::new(
        registry,
        ConsoleHost::new(),
        ChaChaSource::from_optional_seed(config.shuffle_seed),
        config.shuffle_options(),
    );

    let sequencer = drive(sequencer);
    if let Some(failure) = sequencer.failure() {
        return Err(failure.clone().into());
    }

    log_chosen_order(sequencer.registry(), sequencer.order());

    Ok(SessionStats {
        units: sequencer.registry().len(),
        questions: survey.questions.len(),
        revealed: sequencer.host().reveals(),
    })
}

/// 启动状态机，并模拟答题直到最后一个单元
pub fn drive<H: HostAdapter, R: crate::services::RandomSource>(
    mut sequencer: Sequencer<H, R>,
) -> Sequencer<H, R> {
    sequencer.handle(SequencerEvent::Start);

    // 每轮至少前进一个单元
    let mut remaining = sequencer.order().len() + 1;
    while remaining > 0 {
        remaining -= 1;
        let Some(unit) = sequencer.current_unit() else {
            break;
        };
        let id = unit.id();
        let policy = unit.policy();
        let members = unit.members().len();

        match policy {
            AdvancePolicy::Implicit => {
                sequencer.handle(SequencerEvent::MemberInteraction {
                    unit: id,
                    member: 0,
                    interaction: Interaction::Selection,
                });
            }
            AdvancePolicy::Explicit => {
                for member in 0..members {
                    sequencer.handle(SequencerEvent::MemberInteraction {
                        unit: id,
                        member,
                        interaction: Interaction::Selection,
                    });
                }
                sequencer.handle(SequencerEvent::AdvanceControlActivated { unit: id });
            }
        }

        if sequencer.state() != SequencerState::Active {
            break;
        }
    }

    match sequencer.state() {
        SequencerState::Complete => info!("✅ 已展示全部 {} 个单元", sequencer.cursor()),
        state => warn!("⚠️ 展示未完成，当前状态: {:?}", state),
    }

    sequencer
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{AppError, RegistryError, ShuffleError};
    use crate::models::QuestionEntry;

    fn entry(id: &str, group: &str, block: Option<&str>) -> QuestionEntry {
        QuestionEntry {
            id: id.to_string(),
            group: group.to_string(),
            block: block.map(str::to_string),
            use_buttons: None,
        }
    }

    #[test]
    fn test_run_session_reveals_every_unit() {
        let survey = SurveyFile {
            name: Some("demo".to_string()),
            questions: vec![
                entry("Q1", "a", Some("pair")),
                entry("Q2", "a", Some("pair")),
                entry("Q3", "b", None),
                entry("Q4", "a", None),
                entry("Q5", "b", None),
            ],
            file_path: None,
        };
        let config = Config {
            shuffle_seed: Some(5),
            ..Config::default()
        };

        let stats = run_session(&survey, &config).unwrap();
        assert_eq!(
            stats,
            SessionStats {
                units: 4,
                questions: 5,
                revealed: 4,
            }
        );
    }

    #[test]
    fn test_run_session_reports_impossible_order() {
        let survey = SurveyFile {
            name: None,
            questions: (0..4).map(|i| entry(&format!("Q{i}"), "same", None)).collect(),
            file_path: None,
        };
        let config = Config {
            max_run: 1,
            shuffle_seed: Some(1),
            ..Config::default()
        };

        let err = run_session(&survey, &config).unwrap_err();
        assert!(matches!(
            err,
            AppError::Shuffle(ShuffleError::Exhausted { max_run: 1, .. })
        ));
    }

    #[test]
    fn test_run_session_rejects_duplicate_question() {
        let survey = SurveyFile {
            name: None,
            questions: vec![entry("Q1", "a", Some("x")), entry("Q1", "a", Some("x"))],
            file_path: None,
        };
        let err = run_session(&survey, &Config::default()).unwrap_err();
        assert!(matches!(
            err,
            AppError::Registry(RegistryError::DuplicateMember { .. })
        ));
    }
}
