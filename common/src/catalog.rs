//! 차량 카탈로그 모듈
//!
//! 제조사 → 모델 → 트림 계층 마스터를 JSON에서 읽어 들이고,
//! 제조사명 인덱스와 모델명 인덱스를 함께 구축한다.

use crate::error::{Error, Result};
use crate::types::{Catalog, Manufacturer, Model};
use std::cmp::Reverse;
use std::collections::{HashMap, HashSet};
use std::path::Path;

/// 기본 카탈로그 (번들)
pub const BUNDLED_CATALOG: &str = include_str!("../data/car_models.json");

/// 모델명 → (제조사 위치, 모델 위치) 목록
pub type ModelPositions = HashMap<String, Vec<(usize, usize)>>;

impl Catalog {
    /// JSON 파일에서 읽기
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    /// JSON 문자열에서 읽기
    pub fn from_json(json: &str) -> Result<Self> {
        let catalog: Self = serde_json::from_str(json)?;
        Ok(catalog)
    }

    /// 번들된 기본 카탈로그
    pub fn bundled() -> Self {
        match Self::from_json(BUNDLED_CATALOG) {
            Ok(catalog) => catalog,
            Err(e) => {
                tracing::warn!(error = %e, "번들 카탈로그를 읽지 못했습니다");
                Self::default()
            }
        }
    }

    /// 제조사 id・라벨과 모델 id 의 중복 검사
    pub fn validate(&self) -> Result<()> {
        let mut manufacturer_ids = HashSet::new();
        let mut labels = HashSet::new();
        for mfr in self.manufacturers() {
            if !manufacturer_ids.insert(mfr.id.as_str()) {
                return Err(Error::Catalog(format!("제조사 id 중복: {}", mfr.id)));
            }
            if !labels.insert(mfr.label.as_str()) {
                return Err(Error::Catalog(format!("제조사 라벨 중복: {}", mfr.label)));
            }
            let mut model_ids = HashSet::new();
            for model in &mfr.models {
                if !model_ids.insert(model.id.as_str()) {
                    return Err(Error::Catalog(format!("{} 의 모델 id 중복: {}", mfr.label, model.id)));
                }
            }
        }
        Ok(())
    }

    /// 파일이 없거나 깨져 있으면 빈 카탈로그를 돌려준다
    pub fn load_or_empty(path: &Path) -> Self {
        match Self::from_file(path) {
            Ok(catalog) => catalog,
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "카탈로그를 읽지 못해 빈 카탈로그를 사용합니다");
                Self::default()
            }
        }
    }
}

/// 제조사 라벨 → 제조사 위치 인덱스
pub fn build_manufacturer_index(manufacturers: &[Manufacturer]) -> HashMap<String, usize> {
    let mut index = HashMap::new();
    for (pos, mfr) in manufacturers.iter().enumerate() {
        // 같은 라벨이 중복되면 먼저 나온 쪽을 유지
        index.entry(mfr.label.clone()).or_insert(pos);
    }
    index
}

/// 모델명 → [(제조사 위치, 모델 위치)] 인덱스. 같은 모델명이 여러 제조사에 있을 수 있다.
pub fn build_model_index(manufacturers: &[Manufacturer]) -> ModelPositions {
    let mut index: ModelPositions = HashMap::new();
    for (mfr_pos, mfr) in manufacturers.iter().enumerate() {
        for (model_pos, model) in mfr.models.iter().enumerate() {
            index
                .entry(model.model.clone())
                .or_default()
                .push((mfr_pos, model_pos));
        }
    }
    index
}

/// 긴 키가 먼저 오도록 정렬 (같은 길이는 사전순)
pub fn sort_longest_first(keys: &mut [String]) {
    keys.sort_by(|a, b| {
        (Reverse(a.chars().count()), a.as_str()).cmp(&(Reverse(b.chars().count()), b.as_str()))
    });
}

/// 카탈로그 안의 (제조사, 모델) 한 쌍
#[derive(Debug, Clone, Copy)]
pub struct ModelRef<'a> {
    pub manufacturer: &'a Manufacturer,
    pub model: &'a Model,
}

/// 카탈로그와 두 인덱스를 한 덩어리로 보관한다.
/// 인덱스는 항상 같은 카탈로그에서 함께 만들어진다.
#[derive(Debug, Clone, Default)]
pub struct CatalogIndex {
    manufacturers: Vec<Manufacturer>,
    by_label: HashMap<String, usize>,
    by_model: ModelPositions,
    /// 모델명 전체 (긴 것부터)
    model_names: Vec<String>,
    /// 제조사별 모델 위치 (모델명이 긴 것부터)
    models_by_length: Vec<Vec<usize>>,
}

impl CatalogIndex {
    pub fn new(catalog: Catalog) -> Self {
        let manufacturers: Vec<Manufacturer> = catalog
            .domestic
            .into_iter()
            .chain(catalog.imported)
            .collect();

        let by_label = build_manufacturer_index(&manufacturers);
        let by_model = build_model_index(&manufacturers);

        let mut model_names: Vec<String> = by_model.keys().cloned().collect();
        sort_longest_first(&mut model_names);

        let models_by_length = manufacturers
            .iter()
            .map(|mfr| {
                let mut positions: Vec<usize> = (0..mfr.models.len()).collect();
                // 안정 정렬: 같은 길이는 카탈로그 순서 유지
                positions.sort_by_key(|&pos| Reverse(mfr.models[pos].model.chars().count()));
                positions
            })
            .collect();

        Self {
            manufacturers,
            by_label,
            by_model,
            model_names,
            models_by_length,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.manufacturers.is_empty()
    }

    /// 전체 제조사 (국산 → 수입 순)
    pub fn manufacturers(&self) -> &[Manufacturer] {
        &self.manufacturers
    }

    /// 라벨로 제조사 조회
    pub fn manufacturer(&self, label: &str) -> Option<&Manufacturer> {
        self.by_label.get(label).map(|&pos| &self.manufacturers[pos])
    }

    /// 모델명으로 (제조사, 모델) 목록 조회
    pub fn models_named(&self, name: &str) -> Vec<ModelRef<'_>> {
        self.by_model
            .get(name)
            .map(|positions| positions.iter().map(|&(m, n)| self.model_ref(m, n)).collect())
            .unwrap_or_default()
    }

    /// 특정 제조사 안에서 모델명 조회
    pub fn model_of(&self, label: &str, name: &str) -> Option<ModelRef<'_>> {
        let mfr_pos = *self.by_label.get(label)?;
        self.by_model
            .get(name)?
            .iter()
            .find(|(m, _)| *m == mfr_pos)
            .map(|&(m, n)| self.model_ref(m, n))
    }

    /// 모델명으로 첫 번째 (제조사, 모델) 조회
    pub fn first_model_named(&self, name: &str) -> Option<ModelRef<'_>> {
        self.by_model
            .get(name)?
            .first()
            .map(|&(m, n)| self.model_ref(m, n))
    }

    /// 모델명 전체 (긴 것부터)
    pub fn model_names_longest_first(&self) -> &[String] {
        &self.model_names
    }

    /// 제조사의 모델을 모델명이 긴 순서로
    pub fn models_longest_first(&self, label: &str) -> Vec<&Model> {
        let Some(&mfr_pos) = self.by_label.get(label) else {
            return Vec::new();
        };
        let mfr = &self.manufacturers[mfr_pos];
        self.models_by_length[mfr_pos]
            .iter()
            .map(|&pos| &mfr.models[pos])
            .collect()
    }

    /// 모델 수 합계
    pub fn model_count(&self) -> usize {
        self.manufacturers.iter().map(|m| m.models.len()).sum()
    }

    /// 트림 수 합계
    pub fn trim_count(&self) -> usize {
        self.manufacturers
            .iter()
            .flat_map(|m| m.models.iter())
            .map(|model| model.trims.len())
            .sum()
    }

    fn model_ref(&self, mfr_pos: usize, model_pos: usize) -> ModelRef<'_> {
        let manufacturer = &self.manufacturers[mfr_pos];
        ModelRef {
            manufacturer,
            model: &manufacturer.models[model_pos],
        }
    }
}
