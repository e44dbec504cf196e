use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::{json, Value};
use tokio::sync::broadcast;

/// 버스가 보관할 수 있는 미소비 이벤트 수이다.
const BUS_CAPACITY: usize = 256;

/// 편집 동작 하나를 외부 관찰자에게 전달하는 구조화 레코드이다.
///
/// payload에는 무엇이 바뀌었는지 나타내는 diff와 바뀐 뒤의 전체 상태
/// full_state가 함께 실리므로 구독자는 이력 재생 없이 상태를 복원할 수
/// 있다.
#[derive(Debug, Clone, Serialize)]
pub struct EditorEvent {
    /// 동작 이름. (예: add_node)
    pub action: String,
    /// diff와 full_state를 담은 본문.
    pub payload: Value,
    /// 발생 시각.
    pub ts: DateTime<Utc>,
}

/// 프로세스 전역 발행/구독 채널이다.
///
/// 발행은 완료를 기다리지 않으며 구독자가 없어도 오류로 보지 않는다.
#[derive(Debug, Clone)]
pub struct EventBus {
    sender: broadcast::Sender<EditorEvent>,
}

impl EventBus {
    /// 기본 용량의 버스를 생성한다.
    pub fn new() -> Self {
        let (sender, _receiver) = broadcast::channel(BUS_CAPACITY);
        Self { sender }
    }

    /// 새 구독자를 붙인다.
    pub fn subscribe(&self) -> broadcast::Receiver<EditorEvent> {
        self.sender.subscribe()
    }

    /// 동작 하나를 발행한다.
    pub fn publish(&self, action: &str, diff: Value, full_state: Value) {
        let event = EditorEvent {
            action: action.to_string(),
            payload: json!({
                "diff": diff,
                "full_state": full_state,
            }),
            ts: Utc::now(),
        };
        let _ = self.sender.send(event);
    }
}

impl Default for EventBus {
    /// 기본 버스를 생성한다.
    fn default() -> Self {
        Self::new()
    }
}
