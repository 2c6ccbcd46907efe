use crate::error::{AuctionError, Result};
use car_auction_common::{CatalogSources, ScoreWeights};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const SOURCES_DIR_ENV: &str = "CAR_AUCTION_SOURCES_DIR";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// None 이면 번들 카탈로그
    pub catalog_path: Option<PathBuf>,
    pub manufacturer_aliases_path: Option<PathBuf>,
    pub model_variations_path: Option<PathBuf>,
    /// auction_data_YYMMDD.csv 가 놓이는 폴더
    pub sources_dir: PathBuf,
    pub score_weights: ScoreWeights,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            catalog_path: None,
            manufacturer_aliases_path: None,
            model_variations_path: None,
            sources_dir: PathBuf::from("sources"),
            score_weights: ScoreWeights::default(),
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let content = std::fs::read_to_string(path)?;
            let config: Config = serde_json::from_str(&content)?;
            Ok(config)
        } else {
            Ok(Self::default())
        }
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    pub fn config_path() -> Result<PathBuf> {
        let home = dirs::home_dir()
            .ok_or_else(|| AuctionError::Config("홈 디렉터리를 찾을 수 없습니다".into()))?;
        Ok(home.join(".config").join("car-auction").join("config.json"))
    }

    /// 소스 폴더 (환경 변수 우선)
    pub fn sources_dir(&self) -> PathBuf {
        match std::env::var(SOURCES_DIR_ENV) {
            Ok(dir) if !dir.trim().is_empty() => PathBuf::from(dir),
            _ => self.sources_dir.clone(),
        }
    }

    pub fn set_sources_dir(&mut self, dir: PathBuf) -> Result<()> {
        self.sources_dir = dir;
        self.save()
    }

    pub fn catalog_sources(&self) -> CatalogSources {
        CatalogSources {
            catalog: self.catalog_path.clone(),
            manufacturer_aliases: self.manufacturer_aliases_path.clone(),
            model_variations: self.model_variations_path.clone(),
        }
    }
}
