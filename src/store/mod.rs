mod local;
mod memory;

pub use local::LocalStore;
pub use memory::MemoryStore;

use crate::scenario::{ScenarioRecord, VersionSnapshot};
use async_trait::async_trait;
use std::sync::Arc;

/// ScenarioStore는 시나리오 레코드 영속화를 위한 추상 계층을 정의한다.
///
/// 로컬 장치 저장과 원격 서비스 저장이 같은 계약을 구현하며, 에디터는
/// 설정 플래그로 고른 구현 하나를 불투명하게 사용한다. 재시도 정책이
/// 필요하다면 구현 쪽의 책임이다.
#[async_trait]
pub trait ScenarioStore: Send + Sync {
    /// ID로 레코드를 조회한다. 없으면 None을 반환한다.
    async fn get(&self, id: &str) -> anyhow::Result<Option<ScenarioRecord>>;

    /// 레코드를 upsert한다. ID가 비어 있으면 새로 부여하고
    /// updated_at을 갱신한 결과를 돌려준다.
    async fn save(&self, record: ScenarioRecord) -> anyhow::Result<ScenarioRecord>;

    /// 레코드를 삭제한다.
    async fn remove(&self, id: &str) -> anyhow::Result<()>;

    /// 저장된 전체 레코드 목록을 반환한다.
    async fn list(&self) -> anyhow::Result<Vec<ScenarioRecord>>;

    /// 지정 시나리오의 버전 스냅샷 목록을 오래된 순으로 반환한다.
    async fn snapshots(&self, scenario_id: &str) -> anyhow::Result<Vec<VersionSnapshot>>;

    /// 버전 스냅샷을 덧붙인다. 상한을 넘으면 오래된 것부터 밀어낸다.
    async fn save_snapshot(
        &self,
        scenario_id: &str,
        snapshot: VersionSnapshot,
    ) -> anyhow::Result<()>;

    /// 버전 스냅샷 하나를 삭제한다.
    async fn delete_snapshot(&self, scenario_id: &str, snapshot_id: &str) -> anyhow::Result<()>;
}

/// ScenarioStore를 공유하기 위한 Arc 타입 별칭이다.
pub type SharedStore = Arc<dyn ScenarioStore>;
