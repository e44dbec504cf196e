use crate::config::EditorConfig;
use crate::scenario::ScenarioRecord;
use crate::store::SharedStore;
use chrono::{DateTime, Utc};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio_util::sync::CancellationToken;

/// 자동 저장 진행 상황을 외부에서 조회하기 위한 공유 상태이다.
#[derive(Debug, Clone, Default)]
pub struct AutosaveStatus {
    /// 지금 저장 호출이 진행 중인지 여부.
    pub is_saving: bool,
    /// 마지막으로 저장이 끝난 시각.
    pub last_saved: Option<DateTime<Utc>>,
}

/// 그래프 변경을 관찰해 디바운스 후 저장 게이트웨이를 호출하는 스케줄러이다.
///
/// 디바운스 창 안에서는 마지막 상태만 저장된다. 이미 떠난 저장 호출은
/// 취소하지 않으며, 대기 중인 타이머만 취소 대상이다.
pub struct AutosaveScheduler {
    store: SharedStore,
    debounce: Duration,
    enabled: bool,
    last_fingerprint: Option<String>,
    pending: Option<CancellationToken>,
    status: Arc<Mutex<AutosaveStatus>>,
}

impl AutosaveScheduler {
    /// 설정과 저장 게이트웨이로 스케줄러를 생성한다.
    pub fn new(store: SharedStore, config: &EditorConfig) -> Self {
        Self {
            store,
            debounce: Duration::from_millis(config.debounce_ms),
            enabled: config.autosave_enabled,
            last_fingerprint: None,
            pending: None,
            status: Arc::new(Mutex::new(AutosaveStatus::default())),
        }
    }

    /// 저장 없이 현재 상태를 기준점으로 기록한다.
    ///
    /// 기존 시나리오를 막 열었을 때 첫 관찰이 저장으로 이어지지 않도록
    /// 한다.
    pub fn prime(&mut self, record: &ScenarioRecord) {
        self.last_fingerprint = Some(Self::fingerprint(record));
    }

    /// 새 상태를 관찰한다.
    ///
    /// ID가 아직 없는 시나리오와 자동 저장이 꺼진 세션에서는 아무 일도
    /// 하지 않는다. 상태가 직전 관찰과 같으면 타이머를 건드리지 않고,
    /// 달라졌으면 대기 중인 타이머를 취소하고 새로 시작한다.
    pub fn observe(&mut self, record: &ScenarioRecord) {
        if !self.enabled || record.id.is_empty() {
            return;
        }
        let fingerprint = Self::fingerprint(record);
        if self.last_fingerprint.as_deref() == Some(fingerprint.as_str()) {
            return;
        }
        self.last_fingerprint = Some(fingerprint);
        self.cancel_pending();
        let token = CancellationToken::new();
        self.pending = Some(token.clone());
        let store = self.store.clone();
        let status = self.status.clone();
        let debounce = self.debounce;
        let record = record.clone();
        tokio::spawn(async move {
            tokio::select! {
                _ = token.cancelled() => {}
                _ = tokio::time::sleep(debounce) => {
                    if let Ok(mut guard) = status.lock() {
                        guard.is_saving = true;
                    }
                    if let Err(err) = store.save(record).await {
                        tracing::warn!("자동 저장 실패: {err:#}");
                    }
                    if let Ok(mut guard) = status.lock() {
                        guard.is_saving = false;
                        guard.last_saved = Some(Utc::now());
                    }
                }
            }
        });
    }

    /// 대기 중인 저장 타이머를 취소한다. 에디터 종료 시 호출된다.
    pub fn shutdown(&mut self) {
        self.cancel_pending();
    }

    /// 진행 상황 스냅샷을 반환한다.
    pub fn status(&self) -> AutosaveStatus {
        self.status
            .lock()
            .map(|guard| guard.clone())
            .unwrap_or_default()
    }

    fn cancel_pending(&mut self) {
        if let Some(token) = self.pending.take() {
            token.cancel();
        }
    }

    /// 변경 감지에 사용하는 직렬화 지문을 만든다.
    fn fingerprint(record: &ScenarioRecord) -> String {
        serde_json::to_string(&record.graph).expect("그래프 직렬화는 실패할 수 없습니다.")
    }
}
