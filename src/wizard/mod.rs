mod connection;
mod error;
mod field;
mod probe;
mod state;
pub mod token;

pub use connection::{ConnectFlow, ConnectionVault, SavedConnection};
pub use error::WizardError;
pub use field::{is_empty_value, validate_configure, validate_field};
pub use probe::{SharedProbe, StepProbe, StubProbe};
pub use state::WizardState;

use crate::catalog::{catalog, StepSpec, StepTab};
use crate::editor::EditorGraph;
use chrono::Utc;
use serde_json::Value;
use std::collections::BTreeMap;

/// 선택된 노드 하나를 구성하는 단계 머신이다.
///
/// 진행 상태는 매 변화마다 노드 데이터에 다시 기록되어, 드로어를 닫고
/// 노드를 다시 선택해도 이어서 진행할 수 있다. 필드 값 역시 입력
/// 즉시 노드에 기록되므로 별도의 적용 단계가 없다.
pub struct NodeWizard {
    node_id: String,
    spec: &'static StepSpec,
    steps: Vec<StepTab>,
    state: WizardState,
    flow: ConnectFlow,
    last_sample: Option<Value>,
    closed: bool,
}

impl NodeWizard {
    /// 지정 노드에 대한 마법사를 연다.
    ///
    /// 노드에 저장된 진행 상태가 있으면 복원하고, 없으면 Step 정의의
    /// 마법사 구성(또는 기본 3단계)으로 새로 시작한다. 연결 단계가
    /// 없는 Step은 처음부터 연결 완료로 간주한다.
    pub fn open(graph: &mut EditorGraph, node_id: &str) -> Result<Self, WizardError> {
        let node = graph
            .node(node_id)
            .ok_or_else(|| WizardError::MissingNode(node_id.to_string()))?;
        let app_key = node
            .data
            .app_key
            .clone()
            .ok_or_else(|| WizardError::NotAppNode(node_id.to_string()))?;
        let spec = catalog().get(&app_key);
        let steps = spec.wizard_steps();
        let state = match &node.data.wizard {
            Some(stored) => stored.clone(),
            None => {
                let mut state = WizardState::new(spec.default_tab());
                if !steps.contains(&StepTab::Connect) {
                    state.connected = true;
                }
                state
            }
        };
        let flow = if state.connected {
            ConnectFlow::Connected {
                connection_id: None,
            }
        } else {
            ConnectFlow::Idle
        };
        let wizard = Self {
            node_id: node_id.to_string(),
            spec,
            steps,
            state,
            flow,
            last_sample: None,
            closed: false,
        };
        wizard.persist(graph);
        Ok(wizard)
    }

    /// 대상 노드 ID를 반환한다.
    pub fn node_id(&self) -> &str {
        &self.node_id
    }

    /// 마법사가 따르는 Step 정의를 반환한다.
    pub fn spec(&self) -> &'static StepSpec {
        self.spec
    }

    /// 진행 탭 목록을 반환한다.
    pub fn steps(&self) -> &[StepTab] {
        &self.steps
    }

    /// 현재 진행 상태를 반환한다.
    pub fn state(&self) -> &WizardState {
        &self.state
    }

    /// 연결 단계 진행 상태를 반환한다.
    pub fn flow(&self) -> &ConnectFlow {
        &self.flow
    }

    /// 마지막 테스트의 견본 출력을 반환한다.
    pub fn sample_output(&self) -> Option<&Value> {
        self.last_sample.as_ref()
    }

    /// 인스펙터가 닫혔는지 여부를 반환한다.
    pub fn is_closed(&self) -> bool {
        self.closed
    }

    /// 필드 값 하나를 노드 데이터에 즉시 기록한다.
    pub fn set_value(&self, graph: &mut EditorGraph, key: &str, value: Value) {
        let mut patch = BTreeMap::new();
        patch.insert(key.to_string(), value);
        graph.update_node_data(&self.node_id, patch);
    }

    /// 캐럿 위치에 변수 토큰을 끼워 넣은 값을 다시 기록한다.
    pub fn insert_token(
        &self,
        graph: &mut EditorGraph,
        field_key: &str,
        caret: usize,
        source_node: &str,
        output_key: &str,
    ) {
        let current = graph
            .node(&self.node_id)
            .and_then(|node| node.data.values.get(field_key))
            .and_then(|value| value.as_str())
            .unwrap_or_default()
            .to_string();
        let spliced = token::insert_token_at(&current, caret, source_node, output_key);
        self.set_value(graph, field_key, Value::String(spliced));
    }

    /// 외부 승인 창을 여는 단계를 시작하고 상태 토큰을 반환한다.
    pub fn begin_authorization(&mut self) -> String {
        let state = format!("auth_{}", Utc::now().timestamp_nanos_opt().unwrap_or_default());
        self.flow = ConnectFlow::AuthorizationPending {
            state: state.clone(),
        };
        state
    }

    /// 승인 콜백을 검증하고 연결을 완료한다.
    pub fn complete_authorization(
        &mut self,
        graph: &mut EditorGraph,
        state: &str,
    ) -> Result<(), WizardError> {
        match &self.flow {
            ConnectFlow::AuthorizationPending { state: expected } => {
                if expected != state {
                    return Err(WizardError::AuthorizationMismatch);
                }
            }
            _ => return Err(WizardError::NoPendingAuthorization),
        }
        self.mark_connected(graph, None);
        Ok(())
    }

    /// 새 토큰으로 연결하고 보관함에 저장한다.
    pub fn connect_with_token(
        &mut self,
        graph: &mut EditorGraph,
        vault: &mut ConnectionVault,
        name: &str,
        token: &str,
    ) -> String {
        let connection_id = vault.save(&self.spec.key, name, token);
        self.mark_connected(graph, Some(connection_id.clone()));
        connection_id
    }

    /// 보관함에서 기존 연결을 골라 연결을 완료한다.
    pub fn connect_with_saved(
        &mut self,
        graph: &mut EditorGraph,
        vault: &ConnectionVault,
        connection_id: &str,
    ) -> Result<(), WizardError> {
        if vault.find(connection_id).is_none() {
            return Err(WizardError::MissingConnection(connection_id.to_string()));
        }
        self.mark_connected(graph, Some(connection_id.to_string()));
        Ok(())
    }

    /// 다음 단계로 전진한다.
    ///
    /// 연결 단계에서는 연결 완료가, 구성 단계에서는 필드 검증 통과가
    /// 선행 조건이며 첫 실패가 전진을 막는다.
    pub fn advance(&mut self, graph: &mut EditorGraph) -> Result<(), WizardError> {
        match self.current_tab() {
            StepTab::Connect => {
                if !self.state.connected {
                    return Err(WizardError::NotConnected);
                }
            }
            StepTab::Configure => {
                let values = self.values(graph)?;
                validate_configure(self.spec, &values)?;
                self.state.configured = true;
            }
            StepTab::Test => return Ok(()),
        }
        if (self.state.current_step as usize) < self.steps.len() {
            self.state.current_step += 1;
            self.state.active_tab = self.current_tab();
        }
        self.persist(graph);
        Ok(())
    }

    /// 이전 단계로 돌아간다. 완료 플래그는 초기화하지 않는다.
    pub fn back(&mut self, graph: &mut EditorGraph) {
        if self.state.current_step > 1 {
            self.state.current_step -= 1;
            self.state.active_tab = self.current_tab();
            self.persist(graph);
        }
    }

    /// 기능 점검을 실행하고 견본 출력을 돌려준다. 반복 실행할 수 있다.
    pub async fn run_test(
        &mut self,
        probe: &SharedProbe,
        graph: &mut EditorGraph,
    ) -> Result<Value, WizardError> {
        let values = self.values(graph)?;
        let sample = probe
            .probe(self.spec, &values)
            .await
            .map_err(|err| WizardError::ProbeFailed(err.to_string()))?;
        self.state.tested = true;
        self.last_sample = Some(sample.clone());
        self.persist(graph);
        Ok(sample)
    }

    /// 마법사를 종료한다. 진행 상태는 노드에 남아 재개에 쓰인다.
    pub fn finish(&mut self, graph: &mut EditorGraph) {
        self.closed = true;
        self.persist(graph);
    }

    /// 연결 완료를 기록하고, 연결 탭에 있었다면 다음 단계로 넘긴다.
    fn mark_connected(&mut self, graph: &mut EditorGraph, connection_id: Option<String>) {
        self.state.connected = true;
        self.flow = ConnectFlow::Connected { connection_id };
        if self.current_tab() == StepTab::Connect
            && (self.state.current_step as usize) < self.steps.len()
        {
            self.state.current_step += 1;
            self.state.active_tab = self.current_tab();
        }
        self.persist(graph);
    }

    /// 현재 단계 번호에 해당하는 탭을 계산한다.
    fn current_tab(&self) -> StepTab {
        let idx = (self.state.current_step as usize).saturating_sub(1);
        self.steps.get(idx).copied().unwrap_or(StepTab::Test)
    }

    /// 노드의 현재 구성 값을 읽는다.
    fn values(&self, graph: &EditorGraph) -> Result<BTreeMap<String, Value>, WizardError> {
        graph
            .node(&self.node_id)
            .map(|node| node.data.values.clone())
            .ok_or_else(|| WizardError::MissingNode(self.node_id.clone()))
    }

    /// 진행 상태를 노드 데이터에 다시 기록한다.
    fn persist(&self, graph: &mut EditorGraph) {
        if let Some(node) = graph.node_mut(&self.node_id) {
            node.data.wizard = Some(self.state.clone());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::editor::{EditorGraph, ViewportBounds};
    use serde_json::json;
    use std::sync::Arc;

    /// 앱 노드 하나가 있는 그래프를 만든다.
    fn graph_with_app(step_key: &str) -> (EditorGraph, String) {
        let mut graph = EditorGraph::with_initial(ViewportBounds::default());
        let id = graph.nodes[0].id.clone();
        graph.replace_node(&id, step_key);
        (graph, id)
    }

    /// 연결-구성-테스트 전체 경로가 순서대로 진행되는지 확인한다.
    #[tokio::test]
    async fn full_connect_configure_test_path() {
        let (mut graph, id) = graph_with_app("httpRequest");
        let mut vault = ConnectionVault::new();
        let mut wizard = NodeWizard::open(&mut graph, &id).expect("마법사 열기 실패");
        assert_eq!(wizard.state().active_tab, StepTab::Connect);
        assert!(matches!(
            wizard.advance(&mut graph),
            Err(WizardError::NotConnected)
        ));

        wizard.connect_with_token(&mut graph, &mut vault, "운영 API", "tok-1");
        assert!(wizard.state().connected);
        assert_eq!(wizard.state().active_tab, StepTab::Configure);

        wizard.set_value(&mut graph, "url", json!("https://example.com/hook"));
        wizard.set_value(&mut graph, "method", json!("메서드를 선택하세요..."));
        let err = wizard
            .advance(&mut graph)
            .expect_err("placeholder 선택은 전진을 막아야 합니다.");
        assert!(matches!(err, WizardError::RequiredField { .. }));

        wizard.set_value(&mut graph, "method", json!("POST"));
        wizard.advance(&mut graph).expect("구성 검증 통과 실패");
        assert!(wizard.state().configured);
        assert_eq!(wizard.state().active_tab, StepTab::Test);

        let probe: SharedProbe = Arc::new(StubProbe);
        let sample = wizard
            .run_test(&probe, &mut graph)
            .await
            .expect("테스트 실행 실패");
        assert!(wizard.state().tested);
        assert_eq!(sample["status"], json!(0));

        wizard.finish(&mut graph);
        assert!(wizard.is_closed());
    }

    /// 뒤로 이동이 완료 플래그를 초기화하지 않는지 확인한다.
    #[tokio::test]
    async fn back_navigation_keeps_completion_flags() {
        let (mut graph, id) = graph_with_app("httpRequest");
        let mut vault = ConnectionVault::new();
        let mut wizard = NodeWizard::open(&mut graph, &id).expect("마법사 열기 실패");
        wizard.connect_with_token(&mut graph, &mut vault, "운영 API", "tok-1");
        wizard.set_value(&mut graph, "url", json!("https://example.com"));
        wizard.set_value(&mut graph, "method", json!("GET"));
        wizard.advance(&mut graph).expect("구성 통과 실패");
        wizard.back(&mut graph);
        wizard.back(&mut graph);
        assert_eq!(wizard.state().current_step, 1);
        assert!(wizard.state().connected);
        assert!(wizard.state().configured);
    }

    /// 닫았다 다시 열면 저장된 진행 상태가 복원되는지 확인한다.
    #[tokio::test]
    async fn reopening_resumes_stored_progress() {
        let (mut graph, id) = graph_with_app("httpRequest");
        let mut vault = ConnectionVault::new();
        {
            let mut wizard = NodeWizard::open(&mut graph, &id).expect("마법사 열기 실패");
            wizard.connect_with_token(&mut graph, &mut vault, "운영 API", "tok-1");
            wizard.finish(&mut graph);
        }
        let resumed = NodeWizard::open(&mut graph, &id).expect("재개 실패");
        assert!(resumed.state().connected);
        assert_eq!(resumed.state().active_tab, StepTab::Configure);
    }

    /// 연결 단계가 없는 Step이 구성 탭에서 연결 완료 상태로 시작하는지 확인한다.
    #[tokio::test]
    async fn connectionless_step_starts_configured_tab() {
        let (mut graph, id) = graph_with_app("branch");
        let wizard = NodeWizard::open(&mut graph, &id).expect("마법사 열기 실패");
        assert_eq!(wizard.state().active_tab, StepTab::Configure);
        assert!(wizard.state().connected);
        assert_eq!(wizard.steps().len(), 2);
    }

    /// 승인 핸드오프가 상태 토큰 검증을 거쳐 연결을 완료하는지 확인한다.
    #[tokio::test]
    async fn authorization_handoff_validates_state_token() {
        let (mut graph, id) = graph_with_app("sendMessage");
        let mut wizard = NodeWizard::open(&mut graph, &id).expect("마법사 열기 실패");
        let err = wizard
            .complete_authorization(&mut graph, "auth_1")
            .expect_err("대기 없는 콜백은 거부되어야 합니다.");
        assert!(matches!(err, WizardError::NoPendingAuthorization));
        let state = wizard.begin_authorization();
        let err = wizard
            .complete_authorization(&mut graph, "다른 토큰")
            .expect_err("토큰 불일치는 거부되어야 합니다.");
        assert!(matches!(err, WizardError::AuthorizationMismatch));
        wizard
            .complete_authorization(&mut graph, &state)
            .expect("정상 콜백은 성공해야 합니다.");
        assert!(wizard.state().connected);
        assert_eq!(wizard.state().active_tab, StepTab::Configure);
    }

    /// 저장된 연결 선택이 연결 완료로 이어지는지 확인한다.
    #[tokio::test]
    async fn picking_saved_connection_marks_connected() {
        let (mut graph, id) = graph_with_app("httpRequest");
        let mut vault = ConnectionVault::new();
        let connection_id = vault.save("httpRequest", "기존 연결", "tok-9");
        let mut wizard = NodeWizard::open(&mut graph, &id).expect("마법사 열기 실패");
        assert!(matches!(
            wizard.connect_with_saved(&mut graph, &vault, "conn_404"),
            Err(WizardError::MissingConnection(_))
        ));
        wizard
            .connect_with_saved(&mut graph, &vault, &connection_id)
            .expect("저장된 연결 선택 실패");
        assert!(wizard.state().connected);
        assert_eq!(
            wizard.flow(),
            &ConnectFlow::Connected {
                connection_id: Some(connection_id)
            }
        );
    }

    /// 토큰 삽입이 저장 값에 원문 토큰 문자열로 반영되는지 확인한다.
    #[tokio::test]
    async fn insert_token_splices_into_stored_value() {
        let (mut graph, id) = graph_with_app("httpRequest");
        let wizard = NodeWizard::open(&mut graph, &id).expect("마법사 열기 실패");
        wizard.set_value(&mut graph, "body", json!("코드: "));
        wizard.insert_token(&mut graph, "body", 8, "step_2", "status");
        let stored = graph
            .node(&id)
            .and_then(|node| node.data.values.get("body"))
            .and_then(|value| value.as_str())
            .expect("저장 값이 없습니다.");
        assert_eq!(stored, "코드: {{step_2.status}}");
    }
}
