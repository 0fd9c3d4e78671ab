use std::path::Path;

use tracing::{error, info, warn};

use crate::config::{Algorithm, Config};
use crate::error::AppResult;
use crate::models::{load_all_surveys, load_survey, SurveyFile};
use crate::orchestrator::session_runner::run_session;
use crate::utils::logging::{log_startup, log_survey_start, print_final_stats};

/// 应用主结构
pub struct App {
    config: Config,
}

impl App {
    /// 初始化应用，配置不合法时返回错误
    pub async fn initialize(config: Config) -> AppResult<Self> {
        config.validate()?;
        log_startup(&config);

        match config.algorithm {
            Algorithm::General => info!("🔀 使用 general 随机算法（同组最多连续 {} 个）", config.max_run),
        }

        Ok(Self { config })
    }

    /// 运行应用主逻辑
    pub async fn run(&self) -> AppResult<()> {
        let surveys = load_surveys(&self.config).await?;

        if surveys.is_empty() {
            warn!("⚠️ 没有找到问卷文件，程序结束");
            return Ok(());
        }

        let mut stats = ProcessingStats {
            total: surveys.len(),
            ..Default::default()
        };

        for (index, survey) in surveys.iter().enumerate() {
            log_survey_start(index + 1, surveys.len(), &survey.display_name());

            match run_session(survey, &self.config) {
                Ok(session) => {
                    stats.success += 1;
                    stats.revealed += session.revealed;
                }
                Err(e) => {
                    error!("[问卷 {}] ❌ 处理失败: {}", index + 1, e);
                    stats.failed += 1;
                }
            }
        }

        print_final_stats(stats.success, stats.failed, stats.total, stats.revealed);

        Ok(())
    }
}

/// 处理统计
#[derive(Debug, Default)]
struct ProcessingStats {
    success: usize,
    failed: usize,
    total: usize,
    revealed: usize,
}

/// 加载问卷：路径可以是单个文件，也可以是文件夹
async fn load_surveys(config: &Config) -> AppResult<Vec<SurveyFile>> {
    info!("\n📁 正在加载问卷: {}", config.survey_path);
    let path = Path::new(&config.survey_path);
    if path.is_dir() {
        load_all_surveys(&config.survey_path).await
    } else {
        Ok(vec![load_survey(path).await?])
    }
}
