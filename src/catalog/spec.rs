use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// 카탈로그 분류 카테고리를 정의한다.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StepCategory {
    /// 외부 앱 연동 Step.
    Apps,
    /// AI 기반 Step.
    Ai,
    /// 흐름 제어 Step.
    Flow,
    /// 범용 유틸리티 Step.
    Utilities,
    /// 자사 제품 연동 Step.
    Products,
    /// 사용자 정의 Step.
    Custom,
}

impl StepCategory {
    /// 피커에 노출되는 전체 카테고리 목록을 반환한다.
    pub fn all() -> [StepCategory; 6] {
        [
            StepCategory::Apps,
            StepCategory::Ai,
            StepCategory::Flow,
            StepCategory::Utilities,
            StepCategory::Products,
            StepCategory::Custom,
        ]
    }
}

/// 마법사 탭 식별자이다.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StepTab {
    /// 연결 단계.
    Connect,
    /// 구성 단계.
    Configure,
    /// 테스트 단계.
    Test,
}

/// 필드 입력 위젯 형태를 정의한다.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FieldKind {
    /// 고정 선택지 목록.
    Select {
        /// 선택 가능한 항목 목록.
        options: Vec<String>,
        /// 빈 값으로 취급되는 안내 문구.
        placeholder: Option<String>,
    },
    /// 한 줄 텍스트.
    Text,
    /// 숫자 입력.
    Number,
    /// 여러 줄 텍스트.
    Textarea,
}

/// 필드 값 검증 규칙을 선언한다.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "rule", rename_all = "snake_case")]
pub enum FieldValidator {
    /// 최소 문자 길이를 강제한다.
    MinLength { min: usize },
    /// 정규식 패턴 일치를 강제한다.
    Pattern { pattern: String, message: String },
}

/// Step 구성 화면에 표시되는 단일 필드 정의이다.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldSpec {
    /// 값 맵에서 사용하는 키.
    pub key: String,
    /// 사용자에게 표시되는 라벨.
    pub label: String,
    /// 입력 위젯 형태.
    pub kind: FieldKind,
    /// 필수 입력 여부.
    #[serde(default)]
    pub required: bool,
    /// 연결 단계 전용 필드 여부.
    #[serde(default)]
    pub connection_only: bool,
    /// 전진 시 순서대로 실행되는 검증 규칙 목록.
    #[serde(default)]
    pub validators: Vec<FieldValidator>,
}

impl FieldSpec {
    /// 한 줄 텍스트 필드를 생성한다.
    pub fn text(key: &str, label: &str) -> Self {
        Self::new(key, label, FieldKind::Text)
    }

    /// 여러 줄 텍스트 필드를 생성한다.
    pub fn textarea(key: &str, label: &str) -> Self {
        Self::new(key, label, FieldKind::Textarea)
    }

    /// 숫자 필드를 생성한다.
    pub fn number(key: &str, label: &str) -> Self {
        Self::new(key, label, FieldKind::Number)
    }

    /// 선택 필드를 생성한다.
    pub fn select(key: &str, label: &str, placeholder: &str, options: &[&str]) -> Self {
        Self::new(
            key,
            label,
            FieldKind::Select {
                options: options.iter().map(|s| s.to_string()).collect(),
                placeholder: Some(placeholder.to_string()),
            },
        )
    }

    /// 필수 입력으로 표시한다.
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// 연결 단계 전용으로 표시한다.
    pub fn connection_only(mut self) -> Self {
        self.connection_only = true;
        self
    }

    /// 검증 규칙을 추가한다.
    pub fn validate(mut self, validator: FieldValidator) -> Self {
        self.validators.push(validator);
        self
    }

    fn new(key: &str, label: &str, kind: FieldKind) -> Self {
        Self {
            key: key.to_string(),
            label: label.to_string(),
            kind,
            required: false,
            connection_only: false,
            validators: Vec::new(),
        }
    }

    /// Select 필드의 placeholder 문구를 반환한다.
    pub fn placeholder(&self) -> Option<&str> {
        match &self.kind {
            FieldKind::Select { placeholder, .. } => placeholder.as_deref(),
            _ => None,
        }
    }
}

/// Step이 소비하는/생산하는 데이터 포트 정의이다.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataPort {
    /// 포트 키.
    pub key: String,
    /// 사용자에게 표시되는 라벨.
    pub label: String,
    /// 포트 값 타입 표기. (text/number/json)
    pub kind: String,
}

impl DataPort {
    /// 포트 정의를 생성한다.
    pub fn new(key: &str, label: &str, kind: &str) -> Self {
        Self {
            key: key.to_string(),
            label: label.to_string(),
            kind: kind.to_string(),
        }
    }
}

/// 구성 단계 전체에 적용되는 교차 필드 규칙이다.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "rule", rename_all = "snake_case")]
pub enum InspectorRule {
    /// 나열된 키 중 최소 하나는 값이 있어야 한다.
    RequireAny { keys: Vec<String>, message: String },
}

/// Step별 마법사 구성을 재정의한다.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InspectorSpec {
    /// 진행 순서대로 나열된 탭 목록.
    pub steps: Vec<StepTab>,
    /// 마법사를 열 때 표시할 탭.
    pub default_tab: StepTab,
    /// 구성 단계에 추가로 적용되는 규칙.
    #[serde(default)]
    pub validation: Option<InspectorRule>,
}

/// 연결 단계에서 사용하는 인증 방식이다.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConnectKind {
    /// 외부 승인 핸드오프 방식.
    Authorization,
    /// 토큰 입력 폼 방식.
    Token,
    /// 연결이 필요 없는 Step.
    None,
}

/// 카탈로그에 등록되는 Step 한 종류의 정의이다.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StepSpec {
    /// 전역 고유 키.
    pub key: String,
    /// 표시 이름.
    pub name: String,
    /// 노드 색상. (hex)
    pub color: String,
    /// 아이콘 식별자.
    pub icon: String,
    /// 소속 카테고리.
    pub category: StepCategory,
    /// 동일 앱의 버전 번호.
    #[serde(default)]
    pub version: Option<u8>,
    /// 연결 단계 방식.
    pub connect: ConnectKind,
    /// 구성 가능한 필드 목록.
    #[serde(default)]
    pub fields: Vec<FieldSpec>,
    /// 입력 데이터 포트 목록.
    #[serde(default)]
    pub data_inputs: Vec<DataPort>,
    /// 출력 데이터 포트 목록.
    #[serde(default)]
    pub data_outputs: Vec<DataPort>,
    /// 마법사 구성 재정의.
    #[serde(default)]
    pub inspector: Option<InspectorSpec>,
    /// 검색에 사용되는 태그 목록.
    #[serde(default)]
    pub tags: Vec<String>,
}

/// 키 끝의 버전 접미사를 식별하는 패턴이다.
static VERSION_SUFFIX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"V\d+$").expect("버전 접미사 패턴이 잘못되었습니다."));

impl StepSpec {
    /// 버전 접미사를 제거한 그룹핑용 기본 키를 반환한다.
    pub fn base_key(&self) -> String {
        VERSION_SUFFIX.replace(&self.key, "").into_owned()
    }

    /// 버전 배지 문구를 반환한다.
    pub fn version_badge(&self) -> String {
        match self.version {
            Some(v) => format!("V{v}"),
            None => "V1".to_string(),
        }
    }

    /// 마법사 진행 탭 목록을 반환한다. inspector가 없으면 기본 3단계를 따른다.
    pub fn wizard_steps(&self) -> Vec<StepTab> {
        match &self.inspector {
            Some(inspector) => inspector.steps.clone(),
            None => vec![StepTab::Connect, StepTab::Configure, StepTab::Test],
        }
    }

    /// 마법사를 열 때 표시할 첫 탭을 반환한다.
    pub fn default_tab(&self) -> StepTab {
        match &self.inspector {
            Some(inspector) => inspector.default_tab,
            None => StepTab::Connect,
        }
    }

    /// 구성 단계에 노출되는 필드 목록을 반환한다.
    /// 공용 label 필드와 연결 전용 필드는 제외된다.
    pub fn configure_fields(&self) -> Vec<&FieldSpec> {
        self.fields
            .iter()
            .filter(|field| field.key != "label" && !field.connection_only)
            .collect()
    }
}
