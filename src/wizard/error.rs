/// 마법사 진행 중 발생 가능한 오류를 표현한다.
#[derive(Debug, thiserror::Error)]
pub enum WizardError {
    /// 필수 필드가 비어 있는 경우이다.
    #[error("필수 항목입니다: {label}")]
    RequiredField { label: String },
    /// 선언된 검증 규칙에 걸린 경우이다.
    #[error("{message}")]
    Validation { field: String, message: String },
    /// 연결이 완료되지 않은 상태에서 전진을 시도한 경우이다.
    #[error("아직 연결이 완료되지 않았습니다.")]
    NotConnected,
    /// 승인 대기 상태가 아닌데 콜백이 도착한 경우이다.
    #[error("진행 중인 승인 요청이 없습니다.")]
    NoPendingAuthorization,
    /// 승인 콜백의 상태 토큰이 일치하지 않는 경우이다.
    #[error("승인 상태 토큰이 일치하지 않습니다.")]
    AuthorizationMismatch,
    /// 저장된 연결을 찾지 못한 경우이다.
    #[error("저장된 연결을 찾을 수 없습니다: {0}")]
    MissingConnection(String),
    /// 기능 점검 호출이 실패한 경우이다.
    #[error("테스트 실행에 실패했습니다: {0}")]
    ProbeFailed(String),
    /// 마법사가 열려 있지 않은 노드를 조작한 경우이다.
    #[error("마법사 대상 노드를 찾을 수 없습니다: {0}")]
    MissingNode(String),
    /// 앱이 지정되지 않은 노드에 마법사를 연 경우이다.
    #[error("앱 Step이 아닌 노드에는 마법사를 열 수 없습니다: {0}")]
    NotAppNode(String),
}
