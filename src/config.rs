use crate::editor::ViewportBounds;
use crate::store::{LocalStore, MemoryStore, SharedStore};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// 시나리오 저장 매체 선택지이다.
///
/// 플래그 하나로 교체되며 에디터 로직은 어느 쪽인지 알지 못한다.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(tag = "backend", rename_all = "snake_case")]
pub enum StoreBackend {
    /// 프로세스 내 메모리 저장.
    #[default]
    Memory,
    /// 로컬 디렉터리의 JSON 파일 저장.
    Local {
        /// 레코드 파일을 둘 디렉터리.
        dir: PathBuf,
    },
}

/// 에디터 전역 설정이다.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EditorConfig {
    /// 자동 저장 사용 여부.
    #[serde(default = "default_true")]
    pub autosave_enabled: bool,
    /// 자동 저장 디바운스 대기 시간(밀리초).
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,
    /// 삭제 후 즉시 저장까지의 정착 지연(밀리초).
    #[serde(default = "default_settle_ms")]
    pub settle_ms: u64,
    /// 시나리오당 버전 스냅샷 상한.
    #[serde(default = "default_snapshot_cap")]
    pub snapshot_cap: usize,
    /// 저장 매체 선택.
    #[serde(default)]
    pub store: StoreBackend,
    /// 진입 노드 배치에 쓰는 편집 영역 크기.
    #[serde(default)]
    pub viewport: ViewportBounds,
}

fn default_true() -> bool {
    true
}

fn default_debounce_ms() -> u64 {
    2000
}

fn default_settle_ms() -> u64 {
    100
}

fn default_snapshot_cap() -> usize {
    crate::scenario::SNAPSHOT_CAP
}

impl Default for EditorConfig {
    /// 메모리 저장을 사용하는 기본 설정을 반환한다.
    fn default() -> Self {
        Self {
            autosave_enabled: true,
            debounce_ms: default_debounce_ms(),
            settle_ms: default_settle_ms(),
            snapshot_cap: default_snapshot_cap(),
            store: StoreBackend::Memory,
            viewport: ViewportBounds::default(),
        }
    }
}

impl EditorConfig {
    /// 설정에 맞는 저장 게이트웨이 구현을 생성한다.
    pub fn build_store(&self) -> SharedStore {
        match &self.store {
            StoreBackend::Memory => Arc::new(MemoryStore::new(self.snapshot_cap)),
            StoreBackend::Local { dir } => Arc::new(LocalStore::new(dir, self.snapshot_cap)),
        }
    }
}

/// YAML 파일을 읽어 설정으로 역직렬화한다.
pub fn load_config_from_file(path: &Path) -> anyhow::Result<EditorConfig> {
    let mut file = File::open(path)?;
    load_config_from_reader(&mut file)
}

/// Reader에서 YAML을 읽어 설정 구조체로 파싱한다.
pub fn load_config_from_reader<R: Read>(reader: &mut R) -> anyhow::Result<EditorConfig> {
    let mut buf = String::new();
    reader.read_to_string(&mut buf)?;
    let config: EditorConfig = serde_yaml::from_str(&buf)?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    /// 일부 키만 있는 YAML이 기본값으로 채워지는지 확인한다.
    #[test]
    fn partial_yaml_fills_defaults() {
        let yaml = "autosave_enabled: false\ndebounce_ms: 500\n";
        let config =
            load_config_from_reader(&mut yaml.as_bytes()).expect("설정 파싱이 실패하면 안 됩니다.");
        assert!(!config.autosave_enabled);
        assert_eq!(config.debounce_ms, 500);
        assert_eq!(config.settle_ms, 100);
        assert_eq!(config.store, StoreBackend::Memory);
    }

    /// 로컬 저장 매체 선택이 YAML 태그로 표현되는지 확인한다.
    #[test]
    fn local_backend_parses_from_tagged_yaml() {
        let yaml = "store:\n  backend: local\n  dir: /tmp/scenarios\n";
        let config =
            load_config_from_reader(&mut yaml.as_bytes()).expect("설정 파싱이 실패하면 안 됩니다.");
        assert_eq!(
            config.store,
            StoreBackend::Local {
                dir: PathBuf::from("/tmp/scenarios")
            }
        );
    }
}
