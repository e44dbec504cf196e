use super::graph::EditorGraph;
use std::collections::HashSet;

/// 진입 노드부터 깊이 우선으로 흐름을 따라가며 설명 문장을 만든다.
///
/// 엣지를 하나 지날 때마다 한 문장을 만들고, 더 갈 곳이 없는 노드는
/// 종료 문장으로 표시한다. 이미 설명한 노드로 다시 합류하는 경로는
/// 방문 집합으로 중복 서술을 막되, 합류 사실 자체는 별도 문장으로
/// 남겨 경로가 조용히 사라지지 않게 한다.
pub fn explain_flow(graph: &EditorGraph) -> Vec<String> {
    let Some(start) = graph.entry_node() else {
        return Vec::new();
    };
    let mut lines = Vec::new();
    lines.push(format!("'{}'에서 시나리오가 시작된다.", start.data.label));
    let mut visited: HashSet<String> = HashSet::new();
    visited.insert(start.id.clone());
    walk(graph, &start.id, &mut visited, &mut lines);
    lines
}

/// 한 노드의 나가는 엣지들을 순서대로 서술한다.
fn walk(graph: &EditorGraph, node_id: &str, visited: &mut HashSet<String>, lines: &mut Vec<String>) {
    let outgoing = graph.outgoing(node_id);
    if outgoing.is_empty() {
        let label = graph
            .node(node_id)
            .map(|node| node.data.label.clone())
            .unwrap_or_else(|| node_id.to_string());
        lines.push(format!("'{label}' 이후 흐름이 종료된다."));
        return;
    }
    let targets: Vec<String> = outgoing.iter().map(|edge| edge.target.clone()).collect();
    for target in targets {
        let label = graph
            .node(&target)
            .map(|node| node.data.label.clone())
            .unwrap_or_else(|| target.clone());
        if visited.contains(&target) {
            lines.push(format!("그다음 이미 설명한 '{label}' 단계로 합류한다."));
            continue;
        }
        visited.insert(target.clone());
        lines.push(format!("그다음 '{label}' 단계를 실행한다."));
        walk(graph, &target, visited, lines);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::editor::graph::ViewportBounds;

    /// 직선 흐름이 시작/실행/종료 문장으로 서술되는지 확인한다.
    #[test]
    fn linear_flow_reads_start_then_end() {
        let mut graph = EditorGraph::with_initial(ViewportBounds::default());
        let start = graph.nodes[0].id.clone();
        graph.replace_node(&start, "sendMessage");
        let next = graph.add_node("delay", Some(&start));
        let lines = explain_flow(&graph);
        assert_eq!(lines.len(), 3);
        assert!(lines[0].contains("시작된다"));
        assert!(lines[1].contains("지연"));
        assert!(lines[2].contains("종료된다"));
        let _ = next;
    }

    /// 분기된 두 가지가 모두 서술되는지 확인한다.
    #[test]
    fn branches_are_each_described() {
        let mut graph = EditorGraph::with_initial(ViewportBounds::default());
        let start = graph.nodes[0].id.clone();
        graph.add_node("sendMessage", Some(&start));
        graph.add_node("mailSend", Some(&start));
        let lines = explain_flow(&graph);
        let text = lines.join(" ");
        assert!(text.contains("메시지 전송"));
        assert!(text.contains("메일 발송"));
        assert_eq!(
            lines.iter().filter(|l| l.contains("종료된다")).count(),
            2
        );
    }

    /// 재합류 경로가 누락되지 않고 합류 문장으로 남는지 확인한다.
    #[test]
    fn reconvergence_is_reported_not_dropped() {
        let mut graph = EditorGraph::with_initial(ViewportBounds::default());
        let start = graph.nodes[0].id.clone();
        let left = graph.add_node("sendMessage", Some(&start));
        let right = graph.add_node("mailSend", Some(&start));
        let join = graph.add_node("delay", Some(&left));
        graph.connect(&right, &join);
        let lines = explain_flow(&graph);
        assert_eq!(
            lines.iter().filter(|l| l.contains("합류한다")).count(),
            1
        );
        assert_eq!(
            lines.iter().filter(|l| l.contains("'지연' 단계를 실행한다")).count(),
            1
        );
    }
}
