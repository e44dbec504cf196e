use super::edge::EditorEdge;
use super::node::{EditorNode, NodeKind, Position};
use crate::catalog::catalog;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::{BTreeMap, HashSet};

/// 새 노드를 출발 노드 기준으로 배치할 때의 가로 간격이다.
pub const CHILD_OFFSET_X: f32 = 220.0;

/// 출발 노드 없이 추가되는 노드의 기본 좌표이다.
pub const DEFAULT_ANCHOR: Position = Position { x: 80.0, y: 80.0 };

/// 진입 노드 배치에 사용하는 화면 영역이다.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ViewportBounds {
    /// 영역 너비.
    pub width: f32,
    /// 영역 높이.
    pub height: f32,
}

impl ViewportBounds {
    /// 영역 중앙 좌표를 반환한다.
    pub fn center(&self) -> Position {
        Position::new(self.width / 2.0, self.height / 2.0)
    }
}

impl Default for ViewportBounds {
    /// 기본 편집 영역 크기를 반환한다.
    fn default() -> Self {
        Self {
            width: 1200.0,
            height: 780.0,
        }
    }
}

/// 시나리오 플로우 그래프의 전체 상태를 저장한다.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct EditorGraph {
    /// 노드 목록.
    pub nodes: Vec<EditorNode>,
    /// 엣지 목록.
    pub edges: Vec<EditorEdge>,
}

impl EditorGraph {
    /// 진입 노드 하나가 중앙에 배치된 새 그래프를 생성한다.
    pub fn with_initial(viewport: ViewportBounds) -> Self {
        let mut graph = Self::default();
        let id = graph.generate_node_id("step");
        graph
            .nodes
            .push(EditorNode::initial(id, viewport.center()));
        graph
    }

    /// 고유한 노드 ID를 생성한다.
    pub fn generate_node_id(&self, prefix: &str) -> String {
        let mut idx = 1;
        let ids: HashSet<&str> = self.nodes.iter().map(|n| n.id.as_str()).collect();
        loop {
            let candidate = format!("{prefix}_{idx}");
            if !ids.contains(candidate.as_str()) {
                return candidate;
            }
            idx += 1;
        }
    }

    /// 고유한 엣지 ID를 생성한다.
    fn generate_edge_id(&self) -> String {
        let mut idx = 1;
        let ids: HashSet<&str> = self.edges.iter().map(|e| e.id.as_str()).collect();
        loop {
            let candidate = format!("edge_{idx}");
            if !ids.contains(candidate.as_str()) {
                return candidate;
            }
            idx += 1;
        }
    }

    /// ID로 노드를 조회한다.
    pub fn node(&self, id: &str) -> Option<&EditorNode> {
        self.nodes.iter().find(|node| node.id == id)
    }

    /// ID로 노드를 조회한다.
    pub fn node_mut(&mut self, id: &str) -> Option<&mut EditorNode> {
        self.nodes.iter_mut().find(|node| node.id == id)
    }

    /// 진입 노드를 조회한다.
    pub fn initial_node(&self) -> Option<&EditorNode> {
        self.nodes.iter().find(|node| node.is_initial())
    }

    /// 흐름 분석의 출발점이 되는 노드를 고른다.
    ///
    /// 진입 노드가 제자리 변환으로 앱 노드가 된 뒤에는 들어오는 엣지가
    /// 없는 첫 노드를, 그마저 없으면 첫 노드를 출발점으로 삼는다.
    pub fn entry_node(&self) -> Option<&EditorNode> {
        if let Some(initial) = self.initial_node() {
            return Some(initial);
        }
        let has_incoming: HashSet<&str> =
            self.edges.iter().map(|edge| edge.target.as_str()).collect();
        self.nodes
            .iter()
            .find(|node| !has_incoming.contains(node.id.as_str()))
            .or_else(|| self.nodes.first())
    }

    /// 지정 노드에서 출발하는 엣지 목록을 반환한다.
    pub fn outgoing(&self, node_id: &str) -> Vec<&EditorEdge> {
        self.edges
            .iter()
            .filter(|edge| edge.source == node_id)
            .collect()
    }

    /// 새 앱 노드를 추가하고 그 ID를 반환한다.
    ///
    /// 출발 노드가 지정되면 오른쪽으로 일정 간격 떨어진 위치에 놓고
    /// 출발 노드에서 새 노드로 향하는 엣지를 함께 추가한다. 미등록
    /// Step 키는 카탈로그 구성 오류로 즉시 패닉한다.
    pub fn add_node(&mut self, step_key: &str, source_id: Option<&str>) -> String {
        let spec = catalog().get(step_key);
        let id = self.generate_node_id("step");
        let source = source_id.and_then(|sid| self.node(sid));
        let position = match source {
            Some(source) => Position::new(source.position.x + CHILD_OFFSET_X, source.position.y),
            None => DEFAULT_ANCHOR,
        };
        let source_exists = source.is_some();
        self.nodes.push(EditorNode::app(id.clone(), position, spec));
        if source_exists {
            if let Some(sid) = source_id {
                self.connect(sid, &id);
            }
        }
        id
    }

    /// 기존 노드를 지정 Step의 앱 노드로 제자리 변환한다.
    ///
    /// 진입 노드를 클릭해 첫 Step을 붙이는 경로에서 사용되며 노드 ID와
    /// 좌표는 그대로 유지된다. 없는 노드면 아무 일도 하지 않는다.
    pub fn replace_node(&mut self, node_id: &str, step_key: &str) {
        let spec = catalog().get(step_key);
        if let Some(node) = self.node_mut(node_id) {
            let replacement = EditorNode::app(node.id.clone(), node.position, spec);
            *node = replacement;
        }
    }

    /// 노드와 그 노드에 닿은 모든 엣지를 제거한다.
    ///
    /// 마지막 노드가 지워지면 영역 중앙에 새 진입 노드를 만들어
    /// 그래프가 비는 일이 없도록 한다.
    pub fn delete_node(&mut self, node_id: &str, viewport: ViewportBounds) {
        if self.node(node_id).is_none() {
            return;
        }
        self.nodes.retain(|node| node.id != node_id);
        self.edges.retain(|edge| !edge.touches(node_id));
        if self.nodes.is_empty() {
            let id = self.generate_node_id("step");
            self.nodes
                .push(EditorNode::initial(id, viewport.center()));
        }
    }

    /// 두 노드 사이에 방향 엣지를 추가하고 그 ID를 반환한다.
    ///
    /// 자기 자신으로의 연결과 동일 쌍의 중복 연결은 추가하지 않으며,
    /// 존재하지 않는 노드를 가리키는 연결도 만들지 않는다.
    pub fn connect(&mut self, source: &str, target: &str) -> Option<String> {
        if source == target {
            return None;
        }
        if self.node(source).is_none() || self.node(target).is_none() {
            return None;
        }
        let duplicate = self
            .edges
            .iter()
            .any(|edge| edge.source == source && edge.target == target);
        if duplicate {
            return None;
        }
        let id = self.generate_edge_id();
        self.edges.push(EditorEdge::new(id.clone(), source, target));
        Some(id)
    }

    /// 노드 데이터에 패치를 얕은 병합한다.
    ///
    /// `label` 키는 라벨 필드를 갱신하고 나머지 키는 값 맵에 들어간다.
    pub fn update_node_data(&mut self, node_id: &str, patch: BTreeMap<String, Value>) {
        if let Some(node) = self.node_mut(node_id) {
            for (key, value) in patch {
                if key == "label" {
                    if let Value::String(label) = &value {
                        node.data.label = label.clone();
                        continue;
                    }
                }
                node.data.values.insert(key, value);
            }
        }
    }

    /// 모든 엣지 양끝이 실제 노드를 가리키는지 검사한다.
    pub fn has_dangling_edges(&self) -> bool {
        let ids: HashSet<&str> = self.nodes.iter().map(|n| n.id.as_str()).collect();
        self.edges
            .iter()
            .any(|edge| !ids.contains(edge.source.as_str()) || !ids.contains(edge.target.as_str()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    /// 새 그래프가 중앙에 진입 노드 하나로 시작하는지 확인한다.
    #[test]
    fn new_graph_has_one_centered_initial_node() {
        let viewport = ViewportBounds::default();
        let graph = EditorGraph::with_initial(viewport);
        assert_eq!(graph.nodes.len(), 1);
        let node = &graph.nodes[0];
        assert!(node.is_initial());
        assert_eq!(node.position, viewport.center());
    }

    /// 출발 노드 기준 가로 간격 배치와 자동 엣지 연결을 확인한다.
    #[test]
    fn add_node_offsets_from_source_and_connects() {
        let mut graph = EditorGraph::with_initial(ViewportBounds::default());
        let start = graph.nodes[0].id.clone();
        let added = graph.add_node("sendMessage", Some(&start));
        let node = graph.node(&added).expect("추가된 노드가 없습니다.");
        let origin = graph.node(&start).expect("진입 노드가 없습니다.");
        assert_eq!(node.position.x, origin.position.x + CHILD_OFFSET_X);
        assert_eq!(node.position.y, origin.position.y);
        assert_eq!(graph.edges.len(), 1);
        assert_eq!(graph.edges[0].source, start);
        assert_eq!(graph.edges[0].target, added);
    }

    /// 진입 노드 제자리 변환이 ID와 좌표를 보존하는지 확인한다.
    #[test]
    fn replace_node_preserves_id_and_position() {
        let mut graph = EditorGraph::with_initial(ViewportBounds::default());
        let id = graph.nodes[0].id.clone();
        let position = graph.nodes[0].position;
        graph.replace_node(&id, "sendMessage");
        assert_eq!(graph.nodes.len(), 1);
        let node = graph.node(&id).expect("변환된 노드가 없습니다.");
        assert_eq!(node.kind, NodeKind::App);
        assert_eq!(node.position, position);
        assert_eq!(node.data.app_key.as_deref(), Some("sendMessage"));
    }

    /// 노드 삭제가 닿은 엣지를 함께 지우고 댕글링을 남기지 않는지 확인한다.
    #[test]
    fn delete_node_cascades_touching_edges() {
        let mut graph = EditorGraph::with_initial(ViewportBounds::default());
        let start = graph.nodes[0].id.clone();
        let middle = graph.add_node("sendMessage", Some(&start));
        let tail = graph.add_node("delay", Some(&middle));
        assert_eq!(graph.edges.len(), 2);
        graph.delete_node(&middle, ViewportBounds::default());
        assert!(graph.node(&middle).is_none());
        assert!(graph.edges.is_empty());
        assert!(!graph.has_dangling_edges());
        assert!(graph.node(&tail).is_some());
    }

    /// 마지막 노드 삭제 후 진입 노드가 자동 생성되는지 확인한다.
    #[test]
    fn deleting_last_node_recreates_initial() {
        let viewport = ViewportBounds::default();
        let mut graph = EditorGraph::with_initial(viewport);
        let only = graph.nodes[0].id.clone();
        graph.delete_node(&only, viewport);
        assert_eq!(graph.nodes.len(), 1);
        assert!(graph.nodes[0].is_initial());
        assert_eq!(graph.nodes[0].position, viewport.center());
    }

    /// 자기 연결과 중복 연결이 거부되는지 확인한다.
    #[test]
    fn connect_rejects_self_loop_and_duplicates() {
        let mut graph = EditorGraph::with_initial(ViewportBounds::default());
        let start = graph.nodes[0].id.clone();
        let other = graph.add_node("sendMessage", None);
        assert!(graph.connect(&start, &start).is_none());
        assert!(graph.connect(&start, &other).is_some());
        assert!(graph.connect(&start, &other).is_none());
        assert!(graph.connect(&start, "ghost").is_none());
        assert_eq!(graph.edges.len(), 1);
    }

    /// 데이터 패치가 라벨과 값 맵에 나눠 반영되는지 확인한다.
    #[test]
    fn update_node_data_merges_shallowly() {
        let mut graph = EditorGraph::with_initial(ViewportBounds::default());
        let id = graph.nodes[0].id.clone();
        graph.replace_node(&id, "sendMessage");
        let mut patch = BTreeMap::new();
        patch.insert("label".to_string(), json!("알림 전송"));
        patch.insert("chat_id".to_string(), json!("general"));
        graph.update_node_data(&id, patch);
        let node = graph.node(&id).expect("노드가 없습니다.");
        assert_eq!(node.data.label, "알림 전송");
        assert_eq!(node.data.values.get("chat_id"), Some(&json!("general")));
        let mut second = BTreeMap::new();
        second.insert("message".to_string(), json!("배포 완료"));
        graph.update_node_data(&id, second);
        let node = graph.node(&id).expect("노드가 없습니다.");
        assert_eq!(node.data.values.get("chat_id"), Some(&json!("general")));
        assert_eq!(node.data.values.get("message"), Some(&json!("배포 완료")));
    }

    /// 없는 노드에 대한 조작이 전부 무시되는지 확인한다.
    #[test]
    fn operations_on_missing_nodes_are_noops() {
        let mut graph = EditorGraph::with_initial(ViewportBounds::default());
        let before = graph.clone();
        graph.replace_node("ghost", "sendMessage");
        graph.delete_node("ghost", ViewportBounds::default());
        graph.update_node_data("ghost", BTreeMap::new());
        assert_eq!(graph, before);
    }

    /// 미등록 Step 키가 즉시 패닉하는지 확인한다.
    #[test]
    #[should_panic(expected = "카탈로그에 등록되지 않은 Step 키")]
    fn add_node_with_unknown_key_panics() {
        let mut graph = EditorGraph::with_initial(ViewportBounds::default());
        graph.add_node("doesNotExist", None);
    }
}
