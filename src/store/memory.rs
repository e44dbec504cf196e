use super::ScenarioStore;
use crate::scenario::{ScenarioRecord, VersionSnapshot};
use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use tokio::sync::RwLock;

/// 실제 저장 매체 없이 프로세스 메모리에만 보관하는 기본 구현이다.
///
/// 새 시나리오의 기본 저장소이자 테스트 대역으로 쓰인다.
#[derive(Debug)]
pub struct MemoryStore {
    records: RwLock<HashMap<String, ScenarioRecord>>,
    snapshots: RwLock<HashMap<String, Vec<VersionSnapshot>>>,
    snapshot_cap: usize,
}

impl MemoryStore {
    /// 지정한 스냅샷 상한으로 빈 저장소를 생성한다.
    pub fn new(snapshot_cap: usize) -> Self {
        Self {
            records: RwLock::new(HashMap::new()),
            snapshots: RwLock::new(HashMap::new()),
            snapshot_cap,
        }
    }

    /// 사용 중이지 않은 시나리오 ID를 만든다.
    fn generate_id(existing: &HashMap<String, ScenarioRecord>) -> String {
        let mut idx = 1;
        loop {
            let candidate = format!("scn_{idx}");
            if !existing.contains_key(&candidate) {
                return candidate;
            }
            idx += 1;
        }
    }
}

#[async_trait]
impl ScenarioStore for MemoryStore {
    /// ID로 레코드를 조회한다.
    async fn get(&self, id: &str) -> anyhow::Result<Option<ScenarioRecord>> {
        let guard = self.records.read().await;
        Ok(guard.get(id).cloned())
    }

    /// 레코드를 upsert하고 ID 부여/시각 갱신 결과를 돌려준다.
    async fn save(&self, mut record: ScenarioRecord) -> anyhow::Result<ScenarioRecord> {
        let mut guard = self.records.write().await;
        if record.id.is_empty() {
            record.id = Self::generate_id(&guard);
        }
        record.updated_at = Utc::now();
        guard.insert(record.id.clone(), record.clone());
        Ok(record)
    }

    /// 레코드와 그 스냅샷을 함께 삭제한다.
    async fn remove(&self, id: &str) -> anyhow::Result<()> {
        self.records.write().await.remove(id);
        self.snapshots.write().await.remove(id);
        Ok(())
    }

    /// 전체 레코드 목록을 반환한다.
    async fn list(&self) -> anyhow::Result<Vec<ScenarioRecord>> {
        let guard = self.records.read().await;
        let mut records: Vec<ScenarioRecord> = guard.values().cloned().collect();
        records.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(records)
    }

    /// 지정 시나리오의 스냅샷 목록을 반환한다.
    async fn snapshots(&self, scenario_id: &str) -> anyhow::Result<Vec<VersionSnapshot>> {
        let guard = self.snapshots.read().await;
        Ok(guard.get(scenario_id).cloned().unwrap_or_default())
    }

    /// 스냅샷을 덧붙이고 상한 초과분을 앞에서 밀어낸다.
    async fn save_snapshot(
        &self,
        scenario_id: &str,
        snapshot: VersionSnapshot,
    ) -> anyhow::Result<()> {
        let mut guard = self.snapshots.write().await;
        let entry = guard.entry(scenario_id.to_string()).or_default();
        entry.push(snapshot);
        if entry.len() > self.snapshot_cap {
            let overflow = entry.len() - self.snapshot_cap;
            entry.drain(0..overflow);
        }
        Ok(())
    }

    /// 스냅샷 하나를 삭제한다.
    async fn delete_snapshot(&self, scenario_id: &str, snapshot_id: &str) -> anyhow::Result<()> {
        let mut guard = self.snapshots.write().await;
        if let Some(entry) = guard.get_mut(scenario_id) {
            entry.retain(|snapshot| snapshot.id != snapshot_id);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scenario::{GraphDoc, ScenarioStatus};
    use std::collections::BTreeMap;

    fn sample_record(title: &str) -> ScenarioRecord {
        ScenarioRecord {
            id: String::new(),
            title: title.into(),
            meta: BTreeMap::new(),
            status: ScenarioStatus::Draft,
            owner: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
            graph: GraphDoc::default(),
            schedule_enabled: false,
            interval: 15,
        }
    }

    /// 빈 ID 저장 시 새 ID가 부여되고 재저장은 같은 ID를 유지하는지 확인한다.
    #[tokio::test]
    async fn save_assigns_id_once() {
        let store = MemoryStore::new(20);
        let saved = store
            .save(sample_record("첫 시나리오"))
            .await
            .expect("저장 실패");
        assert!(!saved.id.is_empty());
        let mut updated = saved.clone();
        updated.title = "이름 변경".into();
        let resaved = store.save(updated).await.expect("재저장 실패");
        assert_eq!(resaved.id, saved.id);
        assert_eq!(store.list().await.expect("목록 실패").len(), 1);
    }

    /// 스냅샷 상한 초과 시 오래된 것이 밀려나는지 확인한다.
    #[tokio::test]
    async fn snapshot_cap_evicts_oldest() {
        let store = MemoryStore::new(3);
        for idx in 0..5 {
            let snapshot = VersionSnapshot {
                id: format!("snap_{idx}"),
                name: format!("버전 {idx}"),
                ts: Utc::now(),
                data: GraphDoc::default(),
            };
            store
                .save_snapshot("scn_1", snapshot)
                .await
                .expect("스냅샷 저장 실패");
        }
        let snapshots = store.snapshots("scn_1").await.expect("목록 실패");
        let ids: Vec<&str> = snapshots.iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids, vec!["snap_2", "snap_3", "snap_4"]);
    }

    /// 레코드 삭제가 스냅샷까지 정리하는지 확인한다.
    #[tokio::test]
    async fn remove_clears_snapshots_too() {
        let store = MemoryStore::new(20);
        let saved = store.save(sample_record("삭제 대상")).await.expect("저장 실패");
        let snapshot = VersionSnapshot {
            id: "snap_1".into(),
            name: "백업".into(),
            ts: Utc::now(),
            data: GraphDoc::default(),
        };
        store
            .save_snapshot(&saved.id, snapshot)
            .await
            .expect("스냅샷 저장 실패");
        store.remove(&saved.id).await.expect("삭제 실패");
        assert!(store.get(&saved.id).await.expect("조회 실패").is_none());
        assert!(store.snapshots(&saved.id).await.expect("목록 실패").is_empty());
    }
}
