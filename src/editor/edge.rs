use serde::{Deserialize, Serialize};

/// 노드 사이의 방향 연결이다.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EditorEdge {
    /// 엣지 고유 ID.
    pub id: String,
    /// 출발 노드 ID.
    pub source: String,
    /// 도착 노드 ID.
    pub target: String,
    /// 도착 지점 마커 표기.
    #[serde(default = "default_marker")]
    pub marker_end: String,
    /// 강조 애니메이션 여부.
    #[serde(default)]
    pub animated: bool,
}

fn default_marker() -> String {
    "arrowclosed".into()
}

impl EditorEdge {
    /// 기본 마커를 사용하는 엣지를 생성한다.
    pub fn new(id: String, source: &str, target: &str) -> Self {
        Self {
            id,
            source: source.to_string(),
            target: target.to_string(),
            marker_end: default_marker(),
            animated: false,
        }
    }

    /// 주어진 노드에 닿아 있는지 여부를 반환한다.
    pub fn touches(&self, node_id: &str) -> bool {
        self.source == node_id || self.target == node_id
    }
}
