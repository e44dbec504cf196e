use super::graph::{EditorGraph, ViewportBounds};
use super::node::Position;
use std::collections::{HashMap, VecDeque};

/// 레벨 간 가로 간격이다.
const SPACING_X: f32 = 260.0;
/// 같은 레벨 형제 간 세로 간격이다.
const SPACING_Y: f32 = 200.0;
/// 첫 레벨의 가로 시작 좌표이다.
const ORIGIN_X: f32 = 80.0;

/// 진입 노드 기준 BFS 깊이로 레벨을 매겨 왼쪽에서 오른쪽으로 정렬한다.
///
/// 같은 레벨의 형제들은 영역 세로 중앙을 기준으로 고르게 배치한다.
/// 진입 노드에서 도달할 수 없는 노드는 건드리지 않는다. 같은 그래프에
/// 연속으로 적용해도 결과 좌표는 달라지지 않는다.
pub fn auto_align(graph: &mut EditorGraph, viewport: ViewportBounds) {
    let Some(start) = graph.entry_node() else {
        return;
    };
    let start_id = start.id.clone();
    let levels = assign_levels(graph, &start_id);
    let mut per_level: HashMap<usize, Vec<String>> = HashMap::new();
    for node in &graph.nodes {
        if let Some(level) = levels.get(&node.id) {
            per_level.entry(*level).or_default().push(node.id.clone());
        }
    }
    let center_y = viewport.center().y;
    let mut level_keys: Vec<usize> = per_level.keys().copied().collect();
    level_keys.sort_unstable();
    for level in level_keys {
        let Some(ids) = per_level.get(&level) else {
            continue;
        };
        let x = ORIGIN_X + level as f32 * SPACING_X;
        let top = center_y - (ids.len() as f32 - 1.0) * SPACING_Y / 2.0;
        for (idx, node_id) in ids.iter().enumerate() {
            if let Some(node) = graph.node_mut(node_id) {
                node.position = Position::new(x, top + idx as f32 * SPACING_Y);
            }
        }
    }
}

/// BFS로 각 도달 가능 노드의 레벨을 계산한다.
fn assign_levels(graph: &EditorGraph, start: &str) -> HashMap<String, usize> {
    let mut levels: HashMap<String, usize> = HashMap::new();
    let mut queue: VecDeque<String> = VecDeque::new();
    levels.insert(start.to_string(), 0);
    queue.push_back(start.to_string());
    while let Some(current) = queue.pop_front() {
        let level = levels[&current];
        for edge in graph.outgoing(&current) {
            if !levels.contains_key(&edge.target) {
                levels.insert(edge.target.clone(), level + 1);
                queue.push_back(edge.target.clone());
            }
        }
    }
    levels
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::editor::graph::ViewportBounds;

    /// 레벨이 왼쪽에서 오른쪽으로 늘어나며 배치되는지 확인한다.
    #[test]
    fn levels_advance_left_to_right() {
        let viewport = ViewportBounds::default();
        let mut graph = EditorGraph::with_initial(viewport);
        let start = graph.nodes[0].id.clone();
        let first = graph.add_node("sendMessage", Some(&start));
        let second = graph.add_node("delay", Some(&first));
        auto_align(&mut graph, viewport);
        let x0 = graph.node(&start).expect("노드 없음").position.x;
        let x1 = graph.node(&first).expect("노드 없음").position.x;
        let x2 = graph.node(&second).expect("노드 없음").position.x;
        assert_eq!(x1 - x0, SPACING_X);
        assert_eq!(x2 - x1, SPACING_X);
    }

    /// 같은 레벨 형제들이 세로 중앙 기준으로 고르게 나뉘는지 확인한다.
    #[test]
    fn siblings_center_vertically() {
        let viewport = ViewportBounds::default();
        let mut graph = EditorGraph::with_initial(viewport);
        let start = graph.nodes[0].id.clone();
        let upper = graph.add_node("sendMessage", Some(&start));
        let lower = graph.add_node("mailSend", Some(&start));
        auto_align(&mut graph, viewport);
        let y_upper = graph.node(&upper).expect("노드 없음").position.y;
        let y_lower = graph.node(&lower).expect("노드 없음").position.y;
        assert_eq!(y_lower - y_upper, SPACING_Y);
        assert_eq!((y_upper + y_lower) / 2.0, viewport.center().y);
    }

    /// 같은 그래프에 두 번 적용해도 좌표가 변하지 않는지 확인한다.
    #[test]
    fn auto_align_is_idempotent() {
        let viewport = ViewportBounds::default();
        let mut graph = EditorGraph::with_initial(viewport);
        let start = graph.nodes[0].id.clone();
        let first = graph.add_node("sendMessage", Some(&start));
        graph.add_node("delay", Some(&first));
        graph.add_node("mailSend", Some(&start));
        auto_align(&mut graph, viewport);
        let once = graph.clone();
        auto_align(&mut graph, viewport);
        assert_eq!(graph, once);
    }

    /// 진입 노드에서 도달할 수 없는 노드는 제자리에 남는지 확인한다.
    #[test]
    fn unreachable_nodes_keep_positions() {
        let viewport = ViewportBounds::default();
        let mut graph = EditorGraph::with_initial(viewport);
        let orphan = graph.add_node("delay", None);
        let before = graph.node(&orphan).expect("노드 없음").position;
        auto_align(&mut graph, viewport);
        assert_eq!(graph.node(&orphan).expect("노드 없음").position, before);
    }
}
