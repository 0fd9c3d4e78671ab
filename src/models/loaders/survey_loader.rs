use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tokio::fs;

use crate::error::{AppError, AppResult, FileError, RegistryError};
use crate::models::registry::Registry;
use crate::models::unit::QuestionRef;

/// 问卷文件中的一道题
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuestionEntry {
    pub id: String,
    pub group: String,
    /// 单元名称，同名的题目一起展示
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub block: Option<String>,
    /// 覆盖默认的按钮设置
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub use_buttons: Option<bool>,
}

/// 问卷定义文件
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SurveyFile {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub questions: Vec<QuestionEntry>,
    #[serde(skip_serializing, skip_deserializing)]
    pub file_path: Option<String>,
}

impl SurveyFile {
    /// 问卷名称，没有则使用文件名
    pub fn display_name(&self) -> String {
        self.name
            .clone()
            .or_else(|| self.file_path.clone())
            .unwrap_or_else(|| "未命名问卷".to_string())
    }

    /// 按文件中的顺序把所有题目注册到新的注册表中
    pub fn build_registry(&self, use_buttons_by_default: bool) -> Result<Registry, RegistryError> {
        let mut registry = Registry::new(use_buttons_by_default);
        for entry in &self.questions {
            registry.add_question(
                QuestionRef::new(entry.id.as_str()),
                &entry.group,
                entry.block.as_deref(),
                entry.use_buttons,
            )?;
        }
        Ok(registry)
    }
}

/// 按扩展名解析问卷内容
pub fn parse_survey(content: &str, path: &Path) -> Result<SurveyFile, FileError> {
    let display = path.display().to_string();
    let mut survey: SurveyFile = match path.extension().and_then(|s| s.to_str()) {
        Some("toml") => toml::from_str(content).map_err(|e| FileError::ParseFailed {
            path: display.clone(),
            message: e.to_string(),
        })?,
        Some("json") => serde_json::from_str(content).map_err(|e| FileError::ParseFailed {
            path: display.clone(),
            message: e.to_string(),
        })?,
        _ => return Err(FileError::UnsupportedFormat { path: display }),
    };
    survey.file_path = Some(display);
    Ok(survey)
}

/// 从 TOML / JSON 文件加载问卷
pub async fn load_survey(path: &Path) -> AppResult<SurveyFile> {
    let display = path.display().to_string();
    if !fs::try_exists(path).await.unwrap_or(false) {
        return Err(FileError::NotFound { path: display }.into());
    }

    let content = fs::read_to_string(path)
        .await
        .map_err(|source| FileError::ReadFailed {
            path: display,
            source,
        })?;

    Ok(parse_survey(&content, path)?)
}

/// 加载文件夹中所有问卷文件，无法解析的文件跳过
pub async fn load_all_surveys(folder_path: &str) -> AppResult<Vec<SurveyFile>> {
    let folder = PathBuf::from(folder_path);

    if !folder.exists() {
        return Err(FileError::DirectoryNotFound {
            path: folder_path.to_string(),
        }
        .into());
    }

    let read_failed = |source| FileError::ReadFailed {
        path: folder_path.to_string(),
        source,
    };

    let mut paths = Vec::new();
    let mut entries = fs::read_dir(&folder).await.map_err(read_failed)?;

    while let Some(entry) = entries.next_entry().await.map_err(read_failed)? {
        let path = entry.path();
        if matches!(
            path.extension().and_then(|s| s.to_str()),
            Some("toml") | Some("json")
        ) {
            paths.push(path);
        }
    }
    // read_dir 的顺序不固定
    paths.sort();

    let mut surveys = Vec::new();
    for path in paths {
        tracing::info!(
            "正在加载: {}",
            path.file_name().unwrap_or_default().to_string_lossy()
        );

        match load_survey(&path).await {
            Ok(survey) => {
                tracing::info!("成功加载 {} 个题目", survey.questions.len());
                surveys.push(survey);
            }
            Err(e) => {
                tracing::warn!("加载文件失败 {}: {}", path.display(), e);
            }
        }
    }

    Ok(surveys)
}
