//! 配置命令
//! 学习命令与导入命令共用同一份配置，修改后写回配置文件

use crate::config::StudyConfig;
use crate::utils::get_config_path;
use log::{info, warn};
use std::path::PathBuf;
use tokio::sync::{Mutex, MutexGuard};

/// 配置状态
#[derive(Debug, Default)]
pub struct ConfigState {
    config: Mutex<StudyConfig>,
    /// 为 `None` 时配置只保存在内存中
    path: Option<PathBuf>,
}

impl ConfigState {
    pub fn new(config: StudyConfig, path: Option<PathBuf>) -> Self {
        Self {
            config: Mutex::new(config),
            path,
        }
    }

    /// 从配置文件加载，读取失败时使用默认配置
    pub fn load(path: PathBuf) -> Self {
        let config = StudyConfig::load_or_default(&path).unwrap_or_else(|e| {
            warn!("读取学习配置失败，使用默认配置: {}", e);
            StudyConfig::default()
        });
        Self::new(config, Some(path))
    }

    /// 从默认配置文件加载
    pub fn load_default() -> Self {
        Self::load(get_config_path())
    }

    pub(crate) async fn lock(&self) -> MutexGuard<'_, StudyConfig> {
        self.config.lock().await
    }

    pub(crate) async fn persist(&self, config: &StudyConfig) -> Result<(), String> {
        if let Some(path) = &self.path {
            config.save(path).await.map_err(|e| e.to_string())?;
            info!("学习配置已保存: {}", path.display());
        }
        Ok(())
    }
}

/// 获取学习配置
pub async fn get_study_config(state: &ConfigState) -> Result<StudyConfig, String> {
    Ok(state.lock().await.clone())
}

/// 更新学习配置
pub async fn update_study_config(config: StudyConfig, state: &ConfigState) -> Result<(), String> {
    let mut guard = state.lock().await;
    *guard = config;
    state.persist(&guard).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ExtractorConfig;

    #[tokio::test]
    async fn test_update_writes_through() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        let state = ConfigState::load(path.clone());

        let config = StudyConfig {
            default_session_size: 7,
            extractor: ExtractorConfig { min_question_chars: 2 },
            ..StudyConfig::default()
        };
        update_study_config(config.clone(), &state).await.unwrap();

        assert_eq!(get_study_config(&state).await.unwrap(), config);
        assert_eq!(StudyConfig::load_or_default(&path).unwrap(), config);
        assert_eq!(get_study_config(&ConfigState::load(path)).await.unwrap(), config);
    }

    #[tokio::test]
    async fn test_in_memory_state_skips_file() {
        let state = ConfigState::default();
        update_study_config(StudyConfig::default(), &state).await.unwrap();
        assert_eq!(get_study_config(&state).await.unwrap(), StudyConfig::default());
    }
}
