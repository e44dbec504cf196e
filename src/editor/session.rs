use super::error::EditorError;
use super::explain::explain_flow;
use super::graph::EditorGraph;
use super::history::EditHistory;
use super::layout::auto_align;
use crate::autosave::{AutosaveScheduler, AutosaveStatus};
use crate::config::EditorConfig;
use crate::events::EventBus;
use crate::scenario::{Blueprint, GraphDoc, ScenarioRecord, ScenarioStatus, VersionSnapshot};
use crate::store::SharedStore;
use crate::wizard::{ConnectionVault, NodeWizard, SharedProbe, StubProbe, WizardError};
use chrono::{DateTime, Utc};
use serde_json::{json, Value};
use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

/// 시나리오 한 편을 편집하는 동안의 작업 사본 전체를 소유하는 세션이다.
///
/// 그래프를 바꾸는 모든 동작은 실행 취소 스냅샷 적재, 그래프 변이,
/// 이벤트 발행, 자동 저장 관찰의 순서를 따른다. 저장되지 않은
/// 시나리오는 첫 수동 저장 때 ID를 부여받는다.
pub struct EditorSession {
    config: EditorConfig,
    graph: EditorGraph,
    name: String,
    notes: String,
    schedule_enabled: bool,
    interval: u64,
    scenario_id: Option<String>,
    meta: BTreeMap<String, Value>,
    status: ScenarioStatus,
    owner: Option<String>,
    created_at: DateTime<Utc>,
    history: EditHistory,
    bus: EventBus,
    store: SharedStore,
    autosave: AutosaveScheduler,
    vault: ConnectionVault,
    probe: SharedProbe,
    wizard: Option<NodeWizard>,
    selected_node: Option<String>,
}

impl EditorSession {
    /// 진입 노드 하나로 시작하는 새 시나리오 세션을 연다.
    pub fn new(config: EditorConfig, store: SharedStore, bus: EventBus) -> Self {
        let autosave = AutosaveScheduler::new(store.clone(), &config);
        let graph = EditorGraph::with_initial(config.viewport);
        Self {
            graph,
            name: String::new(),
            notes: String::new(),
            schedule_enabled: false,
            interval: 15,
            scenario_id: None,
            meta: BTreeMap::new(),
            status: ScenarioStatus::Draft,
            owner: None,
            created_at: Utc::now(),
            history: EditHistory::new(),
            bus,
            store,
            autosave,
            vault: ConnectionVault::new(),
            probe: Arc::new(StubProbe),
            wizard: None,
            selected_node: None,
            config,
        }
    }

    /// 저장된 시나리오를 불러와 세션을 연다.
    pub async fn open_existing(
        config: EditorConfig,
        store: SharedStore,
        bus: EventBus,
        id: &str,
    ) -> Result<Self, EditorError> {
        let record = store
            .get(id)
            .await?
            .ok_or_else(|| EditorError::ScenarioNotFound(id.to_string()))?;
        let mut autosave = AutosaveScheduler::new(store.clone(), &config);
        autosave.prime(&record);
        Ok(Self {
            graph: EditorGraph {
                nodes: record.graph.nodes,
                edges: record.graph.edges,
            },
            name: record.graph.name,
            notes: record.graph.notes,
            schedule_enabled: record.schedule_enabled,
            interval: record.interval,
            scenario_id: Some(record.id),
            meta: record.meta,
            status: record.status,
            owner: record.owner,
            created_at: record.created_at,
            history: EditHistory::new(),
            bus,
            store,
            autosave,
            vault: ConnectionVault::new(),
            probe: Arc::new(StubProbe),
            wizard: None,
            selected_node: None,
            config,
        })
    }

    /// 테스트 점검기를 교체한다.
    pub fn set_probe(&mut self, probe: SharedProbe) {
        self.probe = probe;
    }

    /// 현재 그래프를 반환한다.
    pub fn graph(&self) -> &EditorGraph {
        &self.graph
    }

    /// 시나리오 이름을 반환한다.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// 시나리오 메모를 반환한다.
    pub fn notes(&self) -> &str {
        &self.notes
    }

    /// 부여된 시나리오 ID를 반환한다. 저장 전에는 None이다.
    pub fn scenario_id(&self) -> Option<&str> {
        self.scenario_id.as_deref()
    }

    /// 자동 저장 진행 상황을 반환한다.
    pub fn autosave_status(&self) -> AutosaveStatus {
        self.autosave.status()
    }

    /// 선택된 노드 ID를 반환한다.
    pub fn selected_node(&self) -> Option<&str> {
        self.selected_node.as_deref()
    }

    /// 열려 있는 마법사를 반환한다.
    pub fn wizard(&self) -> Option<&NodeWizard> {
        self.wizard.as_ref()
    }

    /// 저장된 연결 보관함을 반환한다.
    pub fn vault(&self) -> &ConnectionVault {
        &self.vault
    }

    /// 새 앱 노드를 추가한다.
    pub fn add_node(&mut self, step_key: &str, source_id: Option<&str>) -> String {
        self.history.record(&self.graph);
        let node_id = self.graph.add_node(step_key, source_id);
        self.after_mutation(
            "add_node",
            json!({
                "node_id": node_id,
                "step_key": step_key,
                "source_id": source_id,
            }),
        );
        node_id
    }

    /// 노드를 지정 Step의 앱 노드로 제자리 변환한다.
    pub fn replace_node(&mut self, node_id: &str, step_key: &str) {
        self.history.record(&self.graph);
        self.graph.replace_node(node_id, step_key);
        self.after_mutation(
            "replace_node",
            json!({
                "node_id": node_id,
                "step_key": step_key,
            }),
        );
    }

    /// 노드를 삭제한다.
    ///
    /// 자동 저장과 별개로, 짧은 정착 지연 뒤 즉시 저장을 한 번
    /// 예약한다. 아직 ID가 없는 시나리오는 예약하지 않는다.
    pub fn delete_node(&mut self, node_id: &str) {
        self.history.record(&self.graph);
        self.graph.delete_node(node_id, self.config.viewport);
        if self.selected_node.as_deref() == Some(node_id) {
            self.selected_node = None;
            self.wizard = None;
        }
        self.after_mutation("delete_node", json!({ "node_id": node_id }));
        if self.scenario_id.is_some() {
            let store = self.store.clone();
            let record = self.current_record();
            let settle = Duration::from_millis(self.config.settle_ms);
            tokio::spawn(async move {
                tokio::time::sleep(settle).await;
                if let Err(err) = store.save(record).await {
                    tracing::warn!("삭제 후 즉시 저장 실패: {err:#}");
                }
            });
        }
    }

    /// 두 노드를 연결한다.
    pub fn connect(&mut self, source: &str, target: &str) -> Option<String> {
        self.history.record(&self.graph);
        let edge_id = self.graph.connect(source, target);
        self.after_mutation(
            "connect",
            json!({
                "edge_id": edge_id,
                "source": source,
                "target": target,
            }),
        );
        edge_id
    }

    /// 노드 데이터에 패치를 병합한다.
    pub fn update_node_data(&mut self, node_id: &str, patch: BTreeMap<String, Value>) {
        self.history.record(&self.graph);
        let diff = json!({
            "node_id": node_id,
            "patch": patch.clone(),
        });
        self.graph.update_node_data(node_id, patch);
        self.after_mutation("update_node_data", diff);
    }

    /// 시나리오 이름을 바꾼다. 그래프 스냅샷 대상은 아니다.
    pub fn set_name(&mut self, name: &str) {
        self.name = name.to_string();
        self.after_mutation("set_name", json!({ "name": name }));
    }

    /// 시나리오 메모를 바꾼다.
    pub fn set_notes(&mut self, notes: &str) {
        self.notes = notes.to_string();
        self.after_mutation("set_notes", json!({ "notes": notes }));
    }

    /// 주기 실행 설정을 바꾼다.
    pub fn set_schedule(&mut self, enabled: bool, interval: u64) {
        self.schedule_enabled = enabled;
        self.interval = interval;
        self.after_mutation(
            "set_schedule",
            json!({ "schedule_enabled": enabled, "interval": interval }),
        );
    }

    /// 마지막 편집을 되돌린다.
    pub fn undo(&mut self) -> bool {
        let changed = self.history.undo(&mut self.graph);
        if changed {
            self.after_mutation("undo", json!({}));
        }
        changed
    }

    /// 되돌린 편집을 다시 적용한다.
    pub fn redo(&mut self) -> bool {
        let changed = self.history.redo(&mut self.graph);
        if changed {
            self.after_mutation("redo", json!({}));
        }
        changed
    }

    /// 플랫폼 수정키와 함께 눌린 단축키를 처리한다.
    ///
    /// 수정키+Z는 실행 취소, 수정키+Y는 재실행이다. 처리 여부를
    /// 반환한다.
    pub fn handle_shortcut(&mut self, modifier: bool, key: char) -> bool {
        if !modifier {
            return false;
        }
        match key.to_ascii_lowercase() {
            'z' => {
                self.undo();
                true
            }
            'y' => {
                self.redo();
                true
            }
            _ => false,
        }
    }

    /// 진입 노드 기준으로 그래프를 자동 정렬한다.
    pub fn auto_align(&mut self) {
        self.history.record(&self.graph);
        auto_align(&mut self.graph, self.config.viewport);
        self.after_mutation("auto_align", json!({}));
    }

    /// 흐름 설명 문장 목록을 만든다.
    pub fn explain(&self) -> Vec<String> {
        explain_flow(&self.graph)
    }

    /// 수동 저장을 수행한다. 자동 저장이 꺼져 있어도 항상 가능하다.
    ///
    /// 처음 저장하는 시나리오는 이 호출에서 ID를 부여받는다.
    pub async fn save(&mut self) -> Result<ScenarioRecord, EditorError> {
        let record = self.current_record();
        let saved = self.store.save(record).await?;
        self.scenario_id = Some(saved.id.clone());
        self.created_at = saved.created_at;
        self.autosave.prime(&saved);
        self.bus.publish(
            "save",
            json!({ "id": saved.id }),
            serde_json::to_value(&saved).unwrap_or_default(),
        );
        Ok(saved)
    }

    /// 현재 상태의 버전 스냅샷을 만든다. ID가 없으면 먼저 저장한다.
    pub async fn save_version_snapshot(
        &mut self,
        name: &str,
    ) -> Result<VersionSnapshot, EditorError> {
        if self.scenario_id.is_none() {
            self.save().await?;
        }
        let scenario_id = self
            .scenario_id
            .clone()
            .expect("직전 저장으로 ID가 부여되어야 합니다.");
        let existing = self.store.snapshots(&scenario_id).await?;
        let mut idx = existing.len() + 1;
        let id = loop {
            let candidate = format!("snap_{idx}");
            if !existing.iter().any(|snapshot| snapshot.id == candidate) {
                break candidate;
            }
            idx += 1;
        };
        let snapshot = VersionSnapshot {
            id,
            name: name.to_string(),
            ts: Utc::now(),
            data: self.graph_doc(),
        };
        self.store.save_snapshot(&scenario_id, snapshot.clone()).await?;
        self.bus.publish(
            "save_snapshot",
            json!({ "snapshot_id": snapshot.id, "name": name }),
            serde_json::to_value(&self.current_record()).unwrap_or_default(),
        );
        Ok(snapshot)
    }

    /// 저장된 버전 스냅샷 목록을 반환한다.
    pub async fn list_snapshots(&self) -> Result<Vec<VersionSnapshot>, EditorError> {
        let Some(scenario_id) = &self.scenario_id else {
            return Ok(Vec::new());
        };
        Ok(self.store.snapshots(scenario_id).await?)
    }

    /// 버전 스냅샷으로 작업 사본을 되돌린다.
    pub async fn restore_snapshot(&mut self, snapshot_id: &str) -> Result<(), EditorError> {
        let scenario_id = self
            .scenario_id
            .clone()
            .ok_or_else(|| EditorError::SnapshotNotFound(snapshot_id.to_string()))?;
        let snapshots = self.store.snapshots(&scenario_id).await?;
        let snapshot = snapshots
            .into_iter()
            .find(|snapshot| snapshot.id == snapshot_id)
            .ok_or_else(|| EditorError::SnapshotNotFound(snapshot_id.to_string()))?;
        self.history.record(&self.graph);
        self.graph = EditorGraph {
            nodes: snapshot.data.nodes,
            edges: snapshot.data.edges,
        };
        self.name = snapshot.data.name;
        self.notes = snapshot.data.notes;
        self.after_mutation("restore_snapshot", json!({ "snapshot_id": snapshot_id }));
        Ok(())
    }

    /// 버전 스냅샷 하나를 삭제한다.
    pub async fn delete_snapshot(&mut self, snapshot_id: &str) -> Result<(), EditorError> {
        let Some(scenario_id) = &self.scenario_id else {
            return Ok(());
        };
        self.store.delete_snapshot(scenario_id, snapshot_id).await?;
        Ok(())
    }

    /// 시나리오 전체를 블루프린트 JSON으로 내보낸다.
    pub fn export_blueprint(&self) -> String {
        Blueprint {
            name: self.name.clone(),
            notes: self.notes.clone(),
            nodes: self.graph.nodes.clone(),
            edges: self.graph.edges.clone(),
            schedule_enabled: self.schedule_enabled,
            interval: self.interval,
        }
        .export()
    }

    /// 블루프린트 JSON을 작업 사본에 적용한다.
    ///
    /// 해석에 실패하면 기존 상태를 조금도 바꾸지 않는다.
    pub fn import_blueprint(&mut self, raw: &str) -> Result<(), EditorError> {
        let blueprint = Blueprint::import(raw)?;
        self.history.record(&self.graph);
        self.graph = EditorGraph {
            nodes: blueprint.nodes,
            edges: blueprint.edges,
        };
        self.name = blueprint.name;
        self.notes = blueprint.notes;
        self.schedule_enabled = blueprint.schedule_enabled;
        self.interval = blueprint.interval;
        self.after_mutation("import_blueprint", json!({ "name": self.name }));
        Ok(())
    }

    /// 노드를 선택하고 그 노드의 마법사를 연다. 동시에 하나만 열린다.
    pub fn open_wizard(&mut self, node_id: &str) -> Result<(), WizardError> {
        let wizard = NodeWizard::open(&mut self.graph, node_id)?;
        self.selected_node = Some(node_id.to_string());
        self.wizard = Some(wizard);
        Ok(())
    }

    /// 마법사 필드 값을 입력 즉시 기록한다.
    pub fn wizard_set_value(&mut self, key: &str, value: Value) {
        if let Some(wizard) = &self.wizard {
            wizard.set_value(&mut self.graph, key, value.clone());
            let node_id = wizard.node_id().to_string();
            self.after_mutation(
                "wizard_set_value",
                json!({ "node_id": node_id, "key": key, "value": value }),
            );
        }
    }

    /// 마법사 필드의 캐럿 위치에 변수 토큰을 끼워 넣는다.
    pub fn wizard_insert_token(
        &mut self,
        field_key: &str,
        caret: usize,
        source_node: &str,
        output_key: &str,
    ) {
        if let Some(wizard) = &self.wizard {
            wizard.insert_token(&mut self.graph, field_key, caret, source_node, output_key);
            let node_id = wizard.node_id().to_string();
            self.after_mutation(
                "wizard_insert_token",
                json!({
                    "node_id": node_id,
                    "field_key": field_key,
                    "token": crate::wizard::token::token_text(source_node, output_key),
                }),
            );
        }
    }

    /// 마법사를 다음 단계로 전진시킨다.
    pub fn wizard_advance(&mut self) -> Result<(), WizardError> {
        if let Some(wizard) = self.wizard.as_mut() {
            wizard.advance(&mut self.graph)?;
            self.after_mutation("wizard_advance", json!({}));
        }
        Ok(())
    }

    /// 마법사를 이전 단계로 되돌린다.
    pub fn wizard_back(&mut self) {
        if let Some(wizard) = self.wizard.as_mut() {
            wizard.back(&mut self.graph);
        }
    }

    /// 새 토큰으로 연결을 완료한다.
    pub fn wizard_connect_token(&mut self, name: &str, token: &str) -> Option<String> {
        if let Some(wizard) = self.wizard.as_mut() {
            let id = wizard.connect_with_token(&mut self.graph, &mut self.vault, name, token);
            self.after_mutation("wizard_connect", json!({ "connection_id": id }));
            return Some(id);
        }
        None
    }

    /// 저장된 연결을 골라 연결을 완료한다.
    pub fn wizard_connect_saved(&mut self, connection_id: &str) -> Result<(), WizardError> {
        if let Some(wizard) = self.wizard.as_mut() {
            wizard.connect_with_saved(&mut self.graph, &self.vault, connection_id)?;
            self.after_mutation("wizard_connect", json!({ "connection_id": connection_id }));
        }
        Ok(())
    }

    /// 외부 승인 핸드오프를 시작하고 상태 토큰을 반환한다.
    pub fn wizard_begin_authorization(&mut self) -> Option<String> {
        self.wizard.as_mut().map(NodeWizard::begin_authorization)
    }

    /// 승인 콜백을 검증해 연결을 완료한다.
    pub fn wizard_complete_authorization(&mut self, state: &str) -> Result<(), WizardError> {
        if let Some(wizard) = self.wizard.as_mut() {
            wizard.complete_authorization(&mut self.graph, state)?;
            self.after_mutation("wizard_connect", json!({ "authorization": true }));
        }
        Ok(())
    }

    /// 마법사 테스트 단계를 실행하고 견본 출력을 돌려준다.
    pub async fn wizard_run_test(&mut self) -> Result<Value, WizardError> {
        let probe = self.probe.clone();
        if let Some(wizard) = self.wizard.as_mut() {
            let sample = wizard.run_test(&probe, &mut self.graph).await?;
            self.after_mutation("wizard_test", json!({ "ok": true }));
            return Ok(sample);
        }
        Err(WizardError::MissingNode("선택된 노드 없음".into()))
    }

    /// 마법사를 종료하고 인스펙터를 닫는다.
    pub fn wizard_finish(&mut self) {
        if let Some(wizard) = self.wizard.as_mut() {
            wizard.finish(&mut self.graph);
        }
        self.wizard = None;
        self.selected_node = None;
    }

    /// 세션을 닫는다. 대기 중인 자동 저장 타이머를 취소한다.
    pub fn close(&mut self) {
        self.autosave.shutdown();
        self.wizard = None;
        self.selected_node = None;
    }

    /// 작업 사본을 그래프 문서로 묶는다.
    fn graph_doc(&self) -> GraphDoc {
        GraphDoc {
            nodes: self.graph.nodes.clone(),
            edges: self.graph.edges.clone(),
            name: self.name.clone(),
            notes: self.notes.clone(),
        }
    }

    /// 작업 사본을 저장용 레코드로 묶는다.
    fn current_record(&self) -> ScenarioRecord {
        ScenarioRecord {
            id: self.scenario_id.clone().unwrap_or_default(),
            title: if self.name.is_empty() {
                "제목 없는 시나리오".into()
            } else {
                self.name.clone()
            },
            meta: self.meta.clone(),
            status: self.status,
            owner: self.owner.clone(),
            created_at: self.created_at,
            updated_at: Utc::now(),
            graph: self.graph_doc(),
            schedule_enabled: self.schedule_enabled,
            interval: self.interval,
        }
    }

    /// 변이 공통 후처리로 이벤트를 발행하고 자동 저장에 알린다.
    fn after_mutation(&mut self, action: &str, diff: Value) {
        let record = self.current_record();
        let full_state = serde_json::to_value(&record).unwrap_or_default();
        self.bus.publish(action, diff, full_state);
        self.autosave.observe(&record);
    }
}
