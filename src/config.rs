use std::fmt;
use std::str::FromStr;

use crate::error::ConfigError;
use crate::services::shuffle::ShuffleOptions;

/// 随机排序算法
///
/// 目前只支持 `general`（带连续组数限制的随机打乱）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Algorithm {
    #[default]
    General,
}

impl FromStr for Algorithm {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "general" => Ok(Algorithm::General),
            _ => Err(ConfigError::UnknownAlgorithm {
                name: s.to_string(),
            }),
        }
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Algorithm::General => write!(f, "general"),
        }
    }
}

/// 程序配置
#[derive(Clone, Debug)]
pub struct Config {
    /// 同一组最多连续出现的单元数
    pub max_run: usize,
    /// 默认是否给单元添加"下一题"按钮（否则作答即跳转）
    pub use_buttons_by_default: bool,
    /// 随机排序算法
    pub algorithm: Algorithm,
    /// 是否输出调试日志（每次抽取/拒绝以及最终顺序）
    pub debug_logging: bool,
    // --- 随机排序重试参数 ---
    /// 整体重新打乱的最大次数
    pub max_restarts: usize,
    /// 连续拒绝次数达到 `reject_streak_factor × 单元总数` 时重新打乱
    pub reject_streak_factor: usize,
    // --- 运行参数 ---
    /// 问卷文件（或文件夹）路径
    pub survey_path: String,
    /// 随机种子，不设置则使用系统熵
    pub shuffle_seed: Option<u64>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            max_run: 2,
            use_buttons_by_default: true,
            algorithm: Algorithm::General,
            debug_logging: false,
            max_restarts: 10,
            reject_streak_factor: 2,
            survey_path: "surveys/demo.toml".to_string(),
            shuffle_seed: None,
        }
    }
}

impl Config {
    /// 从环境变量读取配置，任何一项解析失败都返回错误
    pub fn try_from_env() -> Result<Self, ConfigError> {
        Self::try_from_lookup(|name| std::env::var(name).ok())
    }

    /// 使用自定义的变量查找函数构建配置
    pub fn try_from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let default = Self::default();
        Ok(Self {
            max_run: parse_var(&lookup, "MAX_RUN", "usize")?.unwrap_or(default.max_run),
            use_buttons_by_default: parse_var(&lookup, "USE_BUTTONS_BY_DEFAULT", "bool")?
                .unwrap_or(default.use_buttons_by_default),
            algorithm: match lookup("RANDOMIZE_ALGORITHM") {
                Some(v) => v.parse()?,
                None => default.algorithm,
            },
            debug_logging: parse_var(&lookup, "DEBUG_LOGGING", "bool")?
                .unwrap_or(default.debug_logging),
            max_restarts: parse_var(&lookup, "MAX_RESTARTS", "usize")?
                .unwrap_or(default.max_restarts),
            reject_streak_factor: parse_var(&lookup, "REJECT_STREAK_FACTOR", "usize")?
                .unwrap_or(default.reject_streak_factor),
            survey_path: lookup("SURVEY_PATH").unwrap_or(default.survey_path),
            shuffle_seed: parse_var(&lookup, "SHUFFLE_SEED", "u64")?,
        })
    }

    /// 检查取值范围
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_run == 0 {
            return Err(ConfigError::InvalidValue {
                var_name: "MAX_RUN".to_string(),
                reason: "必须大于等于 1".to_string(),
            });
        }
        Ok(())
    }

    /// 随机排序参数
    pub fn shuffle_options(&self) -> ShuffleOptions {
        ShuffleOptions {
            max_run: self.max_run,
            max_restarts: self.max_restarts,
            reject_streak_factor: self.reject_streak_factor,
            debug_logging: self.debug_logging,
        }
    }
}

fn parse_var<F, T>(lookup: &F, var_name: &str, expected_type: &str) -> Result<Option<T>, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match lookup(var_name) {
        None => Ok(None),
        Some(value) => value
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| ConfigError::EnvVarParseFailed {
                var_name: var_name.to_string(),
                value,
                expected_type: expected_type.to_string(),
            }),
    }
}
