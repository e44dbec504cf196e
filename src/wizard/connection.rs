use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// 한 번 저장해 두고 재사용하는 연결 정보이다.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavedConnection {
    /// 연결 고유 ID.
    pub id: String,
    /// 연결이 속한 앱 키.
    pub app_key: String,
    /// 사용자 지정 이름.
    pub name: String,
    /// 인증 토큰 값.
    pub token: String,
    /// 저장 시각.
    pub created_at: DateTime<Utc>,
}

/// 세션 동안 저장된 연결을 보관하는 레지스트리이다.
#[derive(Debug, Default)]
pub struct ConnectionVault {
    items: Vec<SavedConnection>,
}

impl ConnectionVault {
    /// 빈 보관함을 생성한다.
    pub fn new() -> Self {
        Self::default()
    }

    /// 새 연결을 저장하고 부여된 ID를 반환한다.
    pub fn save(&mut self, app_key: &str, name: &str, token: &str) -> String {
        let mut idx = 1;
        let id = loop {
            let candidate = format!("conn_{idx}");
            if !self.items.iter().any(|item| item.id == candidate) {
                break candidate;
            }
            idx += 1;
        };
        self.items.push(SavedConnection {
            id: id.clone(),
            app_key: app_key.to_string(),
            name: name.to_string(),
            token: token.to_string(),
            created_at: Utc::now(),
        });
        id
    }

    /// 지정 앱에서 선택 가능한 연결 목록을 반환한다.
    pub fn list_for(&self, app_key: &str) -> Vec<&SavedConnection> {
        self.items
            .iter()
            .filter(|item| item.app_key == app_key)
            .collect()
    }

    /// ID로 저장된 연결을 조회한다.
    pub fn find(&self, id: &str) -> Option<&SavedConnection> {
        self.items.iter().find(|item| item.id == id)
    }
}

/// 연결 단계의 진행 상태이다.
#[derive(Debug, Clone, PartialEq)]
pub enum ConnectFlow {
    /// 아직 시작하지 않았다.
    Idle,
    /// 외부 승인 창이 열려 콜백을 기다리는 중이다.
    AuthorizationPending {
        /// 콜백 검증에 사용하는 상태 토큰.
        state: String,
    },
    /// 연결이 완료되었다.
    Connected {
        /// 저장된 연결을 사용했다면 그 ID.
        connection_id: Option<String>,
    },
}
