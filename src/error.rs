use thiserror::Error;

/// 应用程序错误类型
#[derive(Debug, Error)]
pub enum AppError {
    /// 随机排序错误
    #[error("随机排序错误: {0}")]
    Shuffle(#[from] ShuffleError),
    /// 题目注册错误
    #[error("注册错误: {0}")]
    Registry(#[from] RegistryError),
    /// 配置错误
    #[error("配置错误: {0}")]
    Config(#[from] ConfigError),
    /// 文件操作错误
    #[error("文件错误: {0}")]
    File(#[from] FileError),
}

/// 随机排序错误
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ShuffleError {
    /// 重试次数耗尽，当前 max_run 下大概率不存在合法顺序
    #[error(
        "无法打乱题目顺序！已尝试 {attempts} 次，很可能在 max_run = {max_run} 的限制下不存在合法顺序"
    )]
    Exhausted { attempts: usize, max_run: usize },
    /// max_run 必须 >= 1
    #[error("max_run 必须大于等于 1，当前值: {max_run}")]
    InvalidMaxRun { max_run: usize },
}

/// 题目注册错误
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    /// 单元标识重复
    #[error("单元标识重复: {key}")]
    DuplicateUnit { key: String },
    /// 同一个单元中题目重复
    #[error("题目 {question} 已存在于单元 {key} 中")]
    DuplicateMember { key: String, question: String },
    /// 题目已属于另一个单元
    #[error("题目 {question} 已属于单元 {existing}，不能再加入单元 {key}")]
    DuplicateQuestion {
        key: String,
        question: String,
        existing: String,
    },
    /// 单元中没有题目
    #[error("单元 {key} 中没有任何题目")]
    EmptyUnit { key: String },
    /// 给定的顺序不是注册表的一个排列
    #[error("给定的顺序无效: 期望 {expected} 个单元的排列，实际收到 {actual} 个")]
    InvalidOrder { expected: usize, actual: usize },
}

/// 配置错误
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// 环境变量解析失败
    #[error("环境变量 {var_name} 解析失败: 值 '{value}' 无法转换为 {expected_type}")]
    EnvVarParseFailed {
        var_name: String,
        value: String,
        expected_type: String,
    },
    /// 取值超出允许范围
    #[error("配置项 {var_name} 取值无效: {reason}")]
    InvalidValue { var_name: String, reason: String },
    /// 不支持的随机算法
    #[error("不支持的随机算法: {name}（目前只支持 general）")]
    UnknownAlgorithm { name: String },
}

/// 文件操作错误
#[derive(Debug, Error)]
pub enum FileError {
    /// 文件不存在
    #[error("文件不存在: {path}")]
    NotFound { path: String },
    /// 读取文件失败
    #[error("读取文件失败 ({path}): {source}")]
    ReadFailed {
        path: String,
        #[source]
        source: std::io::Error,
    },
    /// 问卷文件解析失败
    #[error("问卷文件解析失败 ({path}): {message}")]
    ParseFailed { path: String, message: String },
    /// 目录不存在
    #[error("目录不存在: {path}")]
    DirectoryNotFound { path: String },
    /// 不支持的文件格式
    #[error("不支持的问卷文件格式: {path}")]
    UnsupportedFormat { path: String },
}

// ========== Result 类型别名 ==========

/// 应用程序结果类型
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shuffle_error_converts_into_app_error() {
        let err: AppError = ShuffleError::Exhausted {
            attempts: 11,
            max_run: 1,
        }
        .into();

        assert!(matches!(err, AppError::Shuffle(ShuffleError::Exhausted { .. })));
        assert!(err.to_string().contains("max_run = 1"));
    }

    #[test]
    fn test_read_failure_keeps_path_and_source() {
        let err: AppError = FileError::ReadFailed {
            path: "surveys/demo.toml".to_string(),
            source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        }
        .into();

        assert!(err.to_string().contains("surveys/demo.toml"));
        assert!(std::error::Error::source(&err).is_some());
    }
}
