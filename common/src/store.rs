//! 카탈로그 스토어
//!
//! 카탈로그 인덱스와 별칭 테이블을 하나의 스냅샷으로 묶어 보관한다.
//! 리로드는 새 스냅샷을 옆에서 다 만든 뒤 한 번의 쓰기로 교체하므로,
//! 파싱 도중의 읽기 쪽은 항상 같은 세대의 인덱스 두 개를 본다.

use crate::alias::{AliasTables, BUNDLED_MANUFACTURER_ALIASES, BUNDLED_MODEL_VARIATIONS};
use crate::catalog::{CatalogIndex, BUNDLED_CATALOG};
use crate::title_parser::TitleParser;
use crate::trim::ScoreWeights;
use crate::types::{Catalog, MatchResult, ParsedRecord};
use parking_lot::{Mutex, RwLock};
use sha2::{Digest, Sha256};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// 카탈로그・별칭 원본 위치. None 은 번들 데이터.
#[derive(Debug, Clone, Default)]
pub struct CatalogSources {
    pub catalog: Option<PathBuf>,
    /// 번들 제조사 별칭 위에 덮어쓸 파일
    pub manufacturer_aliases: Option<PathBuf>,
    /// 번들 모델 변형 위에 덮어쓸 파일
    pub model_variations: Option<PathBuf>,
}

/// 한 세대의 카탈로그 상태
#[derive(Debug)]
pub struct CatalogSnapshot {
    pub index: CatalogIndex,
    pub aliases: AliasTables,
    /// 1 부터 시작, 교체될 때마다 증가
    pub generation: u64,
    /// 원본 내용의 SHA-256
    pub fingerprint: String,
}

impl CatalogSnapshot {
    pub fn parser<'a>(&'a self, weights: &'a ScoreWeights) -> TitleParser<'a> {
        TitleParser::new(&self.index, &self.aliases, weights)
    }
}

/// 원본을 읽어 들인 결과 (아직 인덱스 전)
struct LoadedSources {
    catalog: Catalog,
    aliases: AliasTables,
    fingerprint: String,
}

impl CatalogSources {
    fn load(&self) -> LoadedSources {
        let mut hasher = Sha256::new();

        let catalog = match &self.catalog {
            None => {
                hasher.update(BUNDLED_CATALOG.as_bytes());
                Catalog::bundled()
            }
            Some(path) => match read_source(path) {
                Some(content) => {
                    hasher.update(content.as_bytes());
                    Catalog::from_json(&content).unwrap_or_else(|e| {
                        tracing::warn!(path = %path.display(), error = %e, "카탈로그가 깨져 있어 빈 카탈로그를 사용합니다");
                        Catalog::default()
                    })
                }
                None => Catalog::default(),
            },
        };
        hasher.update([0u8]);

        hasher.update(BUNDLED_MANUFACTURER_ALIASES.as_bytes());
        hasher.update(BUNDLED_MODEL_VARIATIONS.as_bytes());
        let mut aliases = AliasTables::bundled();
        let mut overrides = (HashMap::new(), HashMap::new());
        if let Some(path) = &self.manufacturer_aliases {
            hasher.update([0u8]);
            if let Some(content) = read_source(path) {
                hasher.update(content.as_bytes());
                overrides.0 = parse_override(path, &content);
            }
        }
        if let Some(path) = &self.model_variations {
            hasher.update([1u8]);
            if let Some(content) = read_source(path) {
                hasher.update(content.as_bytes());
                overrides.1 = parse_override(path, &content);
            }
        }
        aliases.merge(&AliasTables::new(overrides.0, overrides.1));

        LoadedSources {
            catalog,
            aliases,
            fingerprint: hex::encode(hasher.finalize()),
        }
    }
}

fn read_source(path: &Path) -> Option<String> {
    match std::fs::read_to_string(path) {
        Ok(content) => Some(content),
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "원본 파일을 읽지 못했습니다");
            None
        }
    }
}

/// 평면 key→value JSON. 깨져 있으면 빈 맵.
fn parse_override(path: &Path, content: &str) -> HashMap<String, String> {
    serde_json::from_str(content).unwrap_or_else(|e| {
        tracing::warn!(path = %path.display(), error = %e, "별칭 파일이 깨져 있어 무시합니다");
        HashMap::new()
    })
}

fn catalog_fingerprint(catalog: &Catalog) -> String {
    let mut hasher = Sha256::new();
    // 직렬화 실패는 빈 입력으로 취급
    hasher.update(serde_json::to_vec(catalog).unwrap_or_default());
    hex::encode(hasher.finalize())
}

/// 리로드할 때 다시 읽을 원본
#[derive(Debug)]
enum Origin {
    Files(CatalogSources),
    /// `from_parts` 또는 그 뒤 `replace` 로 받은 카탈로그
    Parts(Mutex<(Catalog, AliasTables)>),
}

impl Origin {
    fn load(&self) -> LoadedSources {
        match self {
            Origin::Files(sources) => sources.load(),
            Origin::Parts(parts) => {
                let (catalog, aliases) = parts.lock().clone();
                LoadedSources {
                    fingerprint: catalog_fingerprint(&catalog),
                    catalog,
                    aliases,
                }
            }
        }
    }
}

/// 카탈로그 스냅샷 보관소
#[derive(Debug)]
pub struct CatalogStore {
    current: RwLock<Arc<CatalogSnapshot>>,
    origin: Origin,
    weights: ScoreWeights,
}

impl CatalogStore {
    /// 원본 위치에서 읽어 첫 세대를 만든다
    pub fn new(sources: CatalogSources) -> Self {
        let loaded = sources.load();
        let snapshot = CatalogSnapshot {
            index: CatalogIndex::new(loaded.catalog),
            aliases: loaded.aliases,
            generation: 1,
            fingerprint: loaded.fingerprint,
        };
        tracing::info!(
            models = snapshot.index.model_count(),
            trims = snapshot.index.trim_count(),
            "카탈로그 로드 완료"
        );
        Self {
            current: RwLock::new(Arc::new(snapshot)),
            origin: Origin::Files(sources),
            weights: ScoreWeights::default(),
        }
    }

    /// 번들 데이터만 사용
    pub fn bundled() -> Self {
        Self::new(CatalogSources::default())
    }

    /// 메모리상의 카탈로그로 직접 구성. 리로드는 이 카탈로그로 다시 만든다.
    pub fn from_parts(catalog: Catalog, aliases: AliasTables) -> Self {
        let fingerprint = catalog_fingerprint(&catalog);
        let snapshot = CatalogSnapshot {
            index: CatalogIndex::new(catalog.clone()),
            aliases: aliases.clone(),
            generation: 1,
            fingerprint,
        };
        Self {
            current: RwLock::new(Arc::new(snapshot)),
            origin: Origin::Parts(Mutex::new((catalog, aliases))),
            weights: ScoreWeights::default(),
        }
    }

    pub fn with_weights(mut self, weights: ScoreWeights) -> Self {
        self.weights = weights;
        self
    }

    pub fn weights(&self) -> &ScoreWeights {
        &self.weights
    }

    /// 파일 원본 위치. `from_parts` 로 만든 스토어는 None.
    pub fn sources(&self) -> Option<&CatalogSources> {
        match &self.origin {
            Origin::Files(sources) => Some(sources),
            Origin::Parts(_) => None,
        }
    }

    /// 현재 세대의 스냅샷
    pub fn snapshot(&self) -> Arc<CatalogSnapshot> {
        Arc::clone(&self.current.read())
    }

    pub fn generation(&self) -> u64 {
        self.current.read().generation
    }

    /// 원본을 다시 읽어 교체. 새 세대 번호를 돌려준다.
    ///
    /// 파일 원본이면 파일을, `from_parts` 로 만든 스토어면 마지막으로 받은 카탈로그를 다시 쓴다.
    pub fn reload(&self) -> u64 {
        let loaded = self.origin.load();
        self.publish(loaded.catalog, loaded.aliases, loaded.fingerprint)
    }

    /// 원본 내용이 바뀐 경우에만 교체
    pub fn reload_if_changed(&self) -> Option<u64> {
        let loaded = self.origin.load();
        if self.current.read().fingerprint == loaded.fingerprint {
            tracing::debug!("카탈로그 원본 변경 없음");
            return None;
        }
        Some(self.publish(loaded.catalog, loaded.aliases, loaded.fingerprint))
    }

    /// 주어진 카탈로그로 교체.
    /// 파일 원본 스토어는 다음 `reload` 때 다시 파일 내용으로 돌아간다.
    pub fn replace(&self, catalog: Catalog, aliases: AliasTables) -> u64 {
        let fingerprint = catalog_fingerprint(&catalog);
        if let Origin::Parts(parts) = &self.origin {
            *parts.lock() = (catalog.clone(), aliases.clone());
        }
        self.publish(catalog, aliases, fingerprint)
    }

    fn publish(&self, catalog: Catalog, aliases: AliasTables, fingerprint: String) -> u64 {
        // 인덱스 구축은 락 밖에서
        let index = CatalogIndex::new(catalog);

        let mut current = self.current.write();
        let generation = current.generation + 1;
        *current = Arc::new(CatalogSnapshot {
            index,
            aliases,
            generation,
            fingerprint,
        });
        drop(current);

        tracing::info!(generation, "카탈로그 리로드");
        generation
    }

    /// 현재 세대로 제목 파싱
    pub fn parse_title(&self, title: Option<&str>) -> ParsedRecord {
        let snapshot = self.snapshot();
        snapshot.parser(&self.weights).parse(title)
    }

    /// 현재 세대로 카탈로그 ID 매칭
    pub fn match_car_model(&self, title: &str) -> MatchResult {
        let snapshot = self.snapshot();
        snapshot.parser(&self.weights).match_car_model(title)
    }
}

impl Default for CatalogStore {
    fn default() -> Self {
        Self::bundled()
    }
}
