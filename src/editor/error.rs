/// 에디터 작업 중 발생 가능한 오류를 표현한다.
#[derive(Debug, thiserror::Error)]
pub enum EditorError {
    /// 존재하지 않는 노드를 참조한 경우이다.
    #[error("존재하지 않는 노드입니다: {0}")]
    MissingNode(String),
    /// 저장된 시나리오를 찾지 못한 경우이다.
    #[error("저장된 시나리오를 찾을 수 없습니다: {0}")]
    ScenarioNotFound(String),
    /// 버전 스냅샷을 찾지 못한 경우이다.
    #[error("버전 스냅샷을 찾을 수 없습니다: {0}")]
    SnapshotNotFound(String),
    /// 블루프린트 JSON 해석에 실패한 경우이다.
    #[error("블루프린트 JSON을 해석할 수 없습니다: {0}")]
    InvalidBlueprint(String),
    /// 블루프린트에 nodes/edges 배열이 없는 경우이다.
    #[error("블루프린트에 nodes/edges 배열이 필요합니다.")]
    IncompleteBlueprint,
    /// 저장 게이트웨이 호출이 실패한 경우이다.
    #[error("저장소 호출에 실패했습니다: {0}")]
    Store(#[from] anyhow::Error),
}
