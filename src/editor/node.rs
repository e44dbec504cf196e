use crate::catalog::StepSpec;
use crate::wizard::WizardState;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// 캔버스 좌표를 표현한다.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Position {
    /// 가로 좌표.
    pub x: f32,
    /// 세로 좌표.
    pub y: f32,
}

impl Position {
    /// 좌표를 생성한다.
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// 노드 유형을 정의한다.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeKind {
    /// 시나리오당 정확히 하나 존재하는 진입 노드.
    Initial,
    /// 카탈로그 Step이 지정된 앱 노드.
    App,
}

/// 노드에 부착되는 도메인 데이터이다.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeData {
    /// 사용자에게 표시되는 라벨.
    pub label: String,
    /// 앱 노드가 참조하는 카탈로그 키.
    #[serde(default)]
    pub app_key: Option<String>,
    /// 구성 필드 값 맵.
    #[serde(default)]
    pub values: BTreeMap<String, Value>,
    /// 노드별 마법사 진행 상태.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wizard: Option<WizardState>,
}

/// 플로우 그래프를 구성하는 단일 노드이다.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EditorNode {
    /// 노드 고유 ID.
    pub id: String,
    /// 노드 유형.
    pub kind: NodeKind,
    /// 배치 좌표.
    pub position: Position,
    /// 도메인 데이터.
    pub data: NodeData,
}

impl EditorNode {
    /// 진입 노드를 생성한다.
    pub fn initial(id: String, position: Position) -> Self {
        Self {
            id,
            kind: NodeKind::Initial,
            position,
            data: NodeData {
                label: "시작".into(),
                app_key: None,
                values: BTreeMap::new(),
                wizard: None,
            },
        }
    }

    /// 카탈로그 정의를 기반으로 앱 노드를 생성한다.
    pub fn app(id: String, position: Position, spec: &StepSpec) -> Self {
        Self {
            id,
            kind: NodeKind::App,
            position,
            data: NodeData {
                label: spec.name.clone(),
                app_key: Some(spec.key.clone()),
                values: BTreeMap::new(),
                wizard: None,
            },
        }
    }

    /// 진입 노드 여부를 반환한다.
    pub fn is_initial(&self) -> bool {
        self.kind == NodeKind::Initial
    }
}
