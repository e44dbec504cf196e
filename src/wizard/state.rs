use crate::catalog::StepTab;
use serde::{Deserialize, Serialize};

/// 노드별 마법사 진행 상태이다.
///
/// 노드를 다시 선택했을 때 진행 위치를 복원할 수 있도록 노드 데이터에
/// 함께 저장된다.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WizardState {
    /// 1부터 시작하는 현재 단계 번호.
    pub current_step: u8,
    /// 현재 표시 중인 탭.
    pub active_tab: StepTab,
    /// 연결 단계 완료 여부.
    #[serde(default)]
    pub connected: bool,
    /// 구성 단계 완료 여부.
    #[serde(default)]
    pub configured: bool,
    /// 테스트 단계 완료 여부.
    #[serde(default)]
    pub tested: bool,
}

impl WizardState {
    /// 지정 탭에서 시작하는 초기 상태를 생성한다.
    pub fn new(first_tab: StepTab) -> Self {
        Self {
            current_step: 1,
            active_tab: first_tab,
            connected: false,
            configured: false,
            tested: false,
        }
    }
}
