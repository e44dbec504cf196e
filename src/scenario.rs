use crate::editor::{EditorEdge, EditorError, EditorNode};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// 저장/복원 단위가 되는 그래프 문서이다.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct GraphDoc {
    /// 노드 목록.
    #[serde(default)]
    pub nodes: Vec<EditorNode>,
    /// 엣지 목록.
    #[serde(default)]
    pub edges: Vec<EditorEdge>,
    /// 시나리오 이름.
    #[serde(default)]
    pub name: String,
    /// 시나리오 메모.
    #[serde(default)]
    pub notes: String,
}

/// 시나리오 게시 상태를 표현한다.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ScenarioStatus {
    /// 작성 중.
    #[default]
    Draft,
    /// 활성화됨.
    Active,
    /// 일시 중지됨.
    Paused,
}

/// 저장 게이트웨이가 소유하는 시나리오 레코드이다.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenarioRecord {
    /// 불투명 고유 ID. 저장 전에는 빈 문자열이다.
    #[serde(default)]
    pub id: String,
    /// 목록 화면에 표시되는 제목.
    pub title: String,
    /// 부가 메타데이터 맵.
    #[serde(default)]
    pub meta: BTreeMap<String, Value>,
    /// 게시 상태.
    #[serde(default)]
    pub status: ScenarioStatus,
    /// 소유자 식별자.
    #[serde(default)]
    pub owner: Option<String>,
    /// 생성 시각.
    pub created_at: DateTime<Utc>,
    /// 마지막 저장 시각.
    pub updated_at: DateTime<Utc>,
    /// 그래프 문서 본문.
    pub graph: GraphDoc,
    /// 주기 실행 사용 여부.
    #[serde(default)]
    pub schedule_enabled: bool,
    /// 주기 실행 간격(분).
    #[serde(default = "default_interval")]
    pub interval: u64,
}

fn default_interval() -> u64 {
    15
}

/// 버전 스냅샷 목록의 최대 길이이다. 초과분은 오래된 것부터 밀려난다.
pub const SNAPSHOT_CAP: usize = 20;

/// 라이브 레코드와 별도로 보관되는 버전 스냅샷이다.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VersionSnapshot {
    /// 스냅샷 고유 ID.
    pub id: String,
    /// 사용자 지정 이름.
    pub name: String,
    /// 생성 시각.
    pub ts: DateTime<Utc>,
    /// 스냅샷 본문.
    pub data: GraphDoc,
}

/// 시나리오 전체를 단일 JSON 문서로 내보내고 들여오는 교환 형식이다.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Blueprint {
    /// 시나리오 이름.
    #[serde(default)]
    pub name: String,
    /// 시나리오 메모.
    #[serde(default)]
    pub notes: String,
    /// 노드 목록.
    pub nodes: Vec<EditorNode>,
    /// 엣지 목록.
    pub edges: Vec<EditorEdge>,
    /// 주기 실행 사용 여부.
    #[serde(default)]
    pub schedule_enabled: bool,
    /// 주기 실행 간격(분).
    #[serde(default = "default_interval")]
    pub interval: u64,
}

impl Blueprint {
    /// 블루프린트를 보기 좋은 JSON 문자열로 직렬화한다.
    pub fn export(&self) -> String {
        serde_json::to_string_pretty(self).expect("블루프린트 직렬화는 실패할 수 없습니다.")
    }

    /// JSON 문자열에서 블루프린트를 읽는다.
    ///
    /// nodes/edges 배열의 존재만 확인하며 스키마 버전 검사는 하지
    /// 않는다. 해석에 실패하면 아무것도 적용하지 않고 거부한다.
    pub fn import(json: &str) -> Result<Self, EditorError> {
        let value: Value = serde_json::from_str(json)
            .map_err(|err| EditorError::InvalidBlueprint(err.to_string()))?;
        let has_arrays = value.get("nodes").is_some_and(Value::is_array)
            && value.get("edges").is_some_and(Value::is_array);
        if !has_arrays {
            return Err(EditorError::IncompleteBlueprint);
        }
        serde_json::from_value(value).map_err(|err| EditorError::InvalidBlueprint(err.to_string()))
    }
}
