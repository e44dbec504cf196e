use super::ScenarioStore;
use crate::scenario::{ScenarioRecord, VersionSnapshot};
use anyhow::Context;
use async_trait::async_trait;
use chrono::Utc;
use std::path::{Path, PathBuf};

/// 로컬 디렉터리에 시나리오당 JSON 문서 하나로 보관하는 구현이다.
///
/// 레코드는 `<id>.json`, 버전 스냅샷 목록은 `<id>.snapshots.json`에
/// 따로 저장되어 라이브 레코드와 독립적으로 관리된다.
#[derive(Debug)]
pub struct LocalStore {
    dir: PathBuf,
    snapshot_cap: usize,
}

impl LocalStore {
    /// 지정 디렉터리를 사용하는 저장소를 생성한다.
    pub fn new(dir: &Path, snapshot_cap: usize) -> Self {
        Self {
            dir: dir.to_path_buf(),
            snapshot_cap,
        }
    }

    /// 레코드 파일 경로를 만든다.
    fn record_path(&self, id: &str) -> PathBuf {
        self.dir.join(format!("{id}.json"))
    }

    /// 스냅샷 파일 경로를 만든다.
    fn snapshot_path(&self, id: &str) -> PathBuf {
        self.dir.join(format!("{id}.snapshots.json"))
    }

    /// 사용 중이지 않은 시나리오 ID를 만든다.
    fn generate_id(&self) -> String {
        let mut idx = 1;
        loop {
            let candidate = format!("scn_{idx}");
            if !self.record_path(&candidate).exists() {
                return candidate;
            }
            idx += 1;
        }
    }

    /// 스냅샷 파일을 읽는다. 없으면 빈 목록을 돌려준다.
    async fn read_snapshots(&self, scenario_id: &str) -> anyhow::Result<Vec<VersionSnapshot>> {
        let path = self.snapshot_path(scenario_id);
        if !path.exists() {
            return Ok(Vec::new());
        }
        let raw = tokio::fs::read_to_string(&path)
            .await
            .with_context(|| format!("스냅샷 파일 읽기 실패: {}", path.display()))?;
        let snapshots: Vec<VersionSnapshot> =
            serde_json::from_str(&raw).context("스냅샷 파일 해석 실패")?;
        Ok(snapshots)
    }

    /// 스냅샷 목록을 파일에 기록한다.
    async fn write_snapshots(
        &self,
        scenario_id: &str,
        snapshots: &[VersionSnapshot],
    ) -> anyhow::Result<()> {
        tokio::fs::create_dir_all(&self.dir)
            .await
            .with_context(|| format!("저장 디렉터리 생성 실패: {}", self.dir.display()))?;
        let path = self.snapshot_path(scenario_id);
        let raw = serde_json::to_string_pretty(snapshots).context("스냅샷 직렬화 실패")?;
        tokio::fs::write(&path, raw)
            .await
            .with_context(|| format!("스냅샷 파일 쓰기 실패: {}", path.display()))?;
        Ok(())
    }
}

#[async_trait]
impl ScenarioStore for LocalStore {
    /// ID로 레코드 파일을 읽는다.
    async fn get(&self, id: &str) -> anyhow::Result<Option<ScenarioRecord>> {
        let path = self.record_path(id);
        if !path.exists() {
            return Ok(None);
        }
        let raw = tokio::fs::read_to_string(&path)
            .await
            .with_context(|| format!("레코드 파일 읽기 실패: {}", path.display()))?;
        let record: ScenarioRecord = serde_json::from_str(&raw).context("레코드 해석 실패")?;
        Ok(Some(record))
    }

    /// 레코드를 파일로 upsert한다.
    async fn save(&self, mut record: ScenarioRecord) -> anyhow::Result<ScenarioRecord> {
        tokio::fs::create_dir_all(&self.dir)
            .await
            .with_context(|| format!("저장 디렉터리 생성 실패: {}", self.dir.display()))?;
        if record.id.is_empty() {
            record.id = self.generate_id();
        }
        record.updated_at = Utc::now();
        let path = self.record_path(&record.id);
        let raw = serde_json::to_string_pretty(&record).context("레코드 직렬화 실패")?;
        tokio::fs::write(&path, raw)
            .await
            .with_context(|| format!("레코드 파일 쓰기 실패: {}", path.display()))?;
        Ok(record)
    }

    /// 레코드 파일과 스냅샷 파일을 함께 삭제한다.
    async fn remove(&self, id: &str) -> anyhow::Result<()> {
        let record = self.record_path(id);
        if record.exists() {
            tokio::fs::remove_file(&record)
                .await
                .with_context(|| format!("레코드 파일 삭제 실패: {}", record.display()))?;
        }
        let snapshots = self.snapshot_path(id);
        if snapshots.exists() {
            tokio::fs::remove_file(&snapshots)
                .await
                .with_context(|| format!("스냅샷 파일 삭제 실패: {}", snapshots.display()))?;
        }
        Ok(())
    }

    /// 디렉터리의 모든 레코드 파일을 읽는다.
    async fn list(&self) -> anyhow::Result<Vec<ScenarioRecord>> {
        if !self.dir.exists() {
            return Ok(Vec::new());
        }
        let mut records = Vec::new();
        let mut entries = tokio::fs::read_dir(&self.dir)
            .await
            .with_context(|| format!("저장 디렉터리 열기 실패: {}", self.dir.display()))?;
        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            let name = entry.file_name().to_string_lossy().to_string();
            if !name.ends_with(".json") || name.ends_with(".snapshots.json") {
                continue;
            }
            let raw = tokio::fs::read_to_string(&path)
                .await
                .with_context(|| format!("레코드 파일 읽기 실패: {}", path.display()))?;
            let record: ScenarioRecord = serde_json::from_str(&raw).context("레코드 해석 실패")?;
            records.push(record);
        }
        records.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(records)
    }

    /// 스냅샷 목록을 읽는다.
    async fn snapshots(&self, scenario_id: &str) -> anyhow::Result<Vec<VersionSnapshot>> {
        self.read_snapshots(scenario_id).await
    }

    /// 스냅샷을 덧붙이고 상한 초과분을 앞에서 밀어낸다.
    async fn save_snapshot(
        &self,
        scenario_id: &str,
        snapshot: VersionSnapshot,
    ) -> anyhow::Result<()> {
        let mut snapshots = self.read_snapshots(scenario_id).await?;
        snapshots.push(snapshot);
        if snapshots.len() > self.snapshot_cap {
            let overflow = snapshots.len() - self.snapshot_cap;
            snapshots.drain(0..overflow);
        }
        self.write_snapshots(scenario_id, &snapshots).await
    }

    /// 스냅샷 하나를 삭제한다.
    async fn delete_snapshot(&self, scenario_id: &str, snapshot_id: &str) -> anyhow::Result<()> {
        let mut snapshots = self.read_snapshots(scenario_id).await?;
        snapshots.retain(|snapshot| snapshot.id != snapshot_id);
        self.write_snapshots(scenario_id, &snapshots).await
    }
}
