use super::spec::{
    ConnectKind, DataPort, FieldSpec, FieldValidator, InspectorRule, InspectorSpec, StepCategory,
    StepSpec, StepTab,
};

/// 기동 시점에 카탈로그에 적재되는 내장 Step 정의 목록을 생성한다.
pub(super) fn builtin_specs() -> Vec<StepSpec> {
    vec![
        send_message_v1(),
        send_message_v2(),
        http_request(),
        mail_send(),
        ai_summarize(),
        branch(),
        delay(),
        format_text(),
        product_lookup(),
        custom_script(),
    ]
}

/// 메신저로 단일 메시지를 전송하는 V1 Step이다.
fn send_message_v1() -> StepSpec {
    StepSpec {
        key: "sendMessage".into(),
        name: "메시지 전송".into(),
        color: "#4E8EF7".into(),
        icon: "send".into(),
        category: StepCategory::Apps,
        version: Some(1),
        connect: ConnectKind::Authorization,
        fields: vec![
            FieldSpec::text("label", "Step 이름"),
            FieldSpec::select(
                "chat_id",
                "대상 채팅",
                "채팅을 선택하세요...",
                &["general", "alerts", "ops"],
            )
            .required(),
            FieldSpec::textarea("message", "메시지 본문").required(),
        ],
        data_inputs: vec![DataPort::new("message", "본문", "text")],
        data_outputs: vec![
            DataPort::new("message_id", "메시지 ID", "text"),
            DataPort::new("sent_at", "전송 시각", "text"),
        ],
        inspector: None,
        tags: vec!["message".into(), "chat".into()],
    }
}

/// 스레드/서식 옵션이 추가된 메시지 전송 V2 Step이다.
fn send_message_v2() -> StepSpec {
    StepSpec {
        key: "sendMessageV2".into(),
        name: "메시지 전송".into(),
        color: "#4E8EF7".into(),
        icon: "send".into(),
        category: StepCategory::Apps,
        version: Some(2),
        connect: ConnectKind::Authorization,
        fields: vec![
            FieldSpec::text("label", "Step 이름"),
            FieldSpec::select(
                "chat_id",
                "대상 채팅",
                "채팅을 선택하세요...",
                &["general", "alerts", "ops"],
            )
            .required(),
            FieldSpec::text("thread_id", "스레드 ID"),
            FieldSpec::select("format", "서식", "서식을 선택하세요...", &["plain", "markdown"]),
            FieldSpec::textarea("message", "메시지 본문").required(),
        ],
        data_inputs: vec![DataPort::new("message", "본문", "text")],
        data_outputs: vec![
            DataPort::new("message_id", "메시지 ID", "text"),
            DataPort::new("thread_id", "스레드 ID", "text"),
            DataPort::new("sent_at", "전송 시각", "text"),
        ],
        inspector: None,
        tags: vec!["message".into(), "chat".into(), "thread".into()],
    }
}

/// 임의 HTTP 요청을 보내는 Step이다.
fn http_request() -> StepSpec {
    StepSpec {
        key: "httpRequest".into(),
        name: "HTTP 요청".into(),
        color: "#2BA47A".into(),
        icon: "globe".into(),
        category: StepCategory::Apps,
        version: None,
        connect: ConnectKind::Token,
        fields: vec![
            FieldSpec::text("label", "Step 이름"),
            FieldSpec::text("api_token", "인증 토큰").connection_only(),
            FieldSpec::text("url", "요청 URL")
                .required()
                .validate(FieldValidator::Pattern {
                    pattern: "^https?://".into(),
                    message: "URL은 http:// 또는 https:// 로 시작해야 합니다.".into(),
                }),
            FieldSpec::select(
                "method",
                "HTTP 메서드",
                "메서드를 선택하세요...",
                &["GET", "POST", "PUT", "DELETE"],
            )
            .required(),
            FieldSpec::textarea("body", "요청 본문"),
        ],
        data_inputs: vec![DataPort::new("body", "요청 본문", "json")],
        data_outputs: vec![
            DataPort::new("status", "응답 코드", "number"),
            DataPort::new("body", "응답 본문", "json"),
        ],
        inspector: None,
        tags: vec!["http".into(), "api".into(), "webhook".into()],
    }
}

/// 메일을 발송하는 Step이다.
fn mail_send() -> StepSpec {
    StepSpec {
        key: "mailSend".into(),
        name: "메일 발송".into(),
        color: "#D8613C".into(),
        icon: "mail".into(),
        category: StepCategory::Apps,
        version: None,
        connect: ConnectKind::Authorization,
        fields: vec![
            FieldSpec::text("label", "Step 이름"),
            FieldSpec::text("to", "받는 사람")
                .required()
                .validate(FieldValidator::Pattern {
                    pattern: "@".into(),
                    message: "받는 사람은 메일 주소 형식이어야 합니다.".into(),
                }),
            FieldSpec::text("subject", "제목").required(),
            FieldSpec::textarea("body", "본문").required(),
        ],
        data_inputs: vec![DataPort::new("body", "본문", "text")],
        data_outputs: vec![DataPort::new("mail_id", "발송 ID", "text")],
        inspector: None,
        tags: vec!["mail".into(), "smtp".into()],
    }
}

/// 입력 텍스트를 요약하는 AI Step이다.
fn ai_summarize() -> StepSpec {
    StepSpec {
        key: "aiSummarize".into(),
        name: "AI 요약".into(),
        color: "#8C5BD6".into(),
        icon: "sparkles".into(),
        category: StepCategory::Ai,
        version: None,
        connect: ConnectKind::Token,
        fields: vec![
            FieldSpec::text("label", "Step 이름"),
            FieldSpec::text("api_token", "API 키").connection_only(),
            FieldSpec::select(
                "model",
                "모델",
                "모델을 선택하세요...",
                &["compact", "standard", "advanced"],
            )
            .required(),
            FieldSpec::textarea("source", "요약 대상 텍스트").required(),
            FieldSpec::number("max_length", "최대 길이"),
        ],
        data_inputs: vec![DataPort::new("source", "원문", "text")],
        data_outputs: vec![DataPort::new("summary", "요약문", "text")],
        inspector: None,
        tags: vec!["ai".into(), "summary".into()],
    }
}

/// 조건에 따라 흐름을 분기하는 Step이다. 연결 단계가 없다.
fn branch() -> StepSpec {
    StepSpec {
        key: "branch".into(),
        name: "조건 분기".into(),
        color: "#C9A227".into(),
        icon: "fork".into(),
        category: StepCategory::Flow,
        version: None,
        connect: ConnectKind::None,
        fields: vec![
            FieldSpec::text("label", "Step 이름"),
            FieldSpec::text("condition", "분기 조건식").required(),
        ],
        data_inputs: vec![DataPort::new("value", "비교 값", "json")],
        data_outputs: vec![DataPort::new("matched", "조건 충족 여부", "number")],
        inspector: Some(InspectorSpec {
            steps: vec![StepTab::Configure, StepTab::Test],
            default_tab: StepTab::Configure,
            validation: None,
        }),
        tags: vec!["flow".into(), "condition".into()],
    }
}

/// 지정한 시간만큼 흐름을 지연시키는 Step이다.
fn delay() -> StepSpec {
    StepSpec {
        key: "delay".into(),
        name: "지연".into(),
        color: "#6B7280".into(),
        icon: "clock".into(),
        category: StepCategory::Utilities,
        version: None,
        connect: ConnectKind::None,
        fields: vec![
            FieldSpec::text("label", "Step 이름"),
            FieldSpec::number("seconds", "지연 시간(초)").required(),
        ],
        data_inputs: Vec::new(),
        data_outputs: Vec::new(),
        inspector: Some(InspectorSpec {
            steps: vec![StepTab::Configure, StepTab::Test],
            default_tab: StepTab::Configure,
            validation: None,
        }),
        tags: vec!["wait".into(), "timer".into()],
    }
}

/// 템플릿으로 텍스트를 조립하는 Step이다.
fn format_text() -> StepSpec {
    StepSpec {
        key: "formatText".into(),
        name: "텍스트 조립".into(),
        color: "#6B7280".into(),
        icon: "text".into(),
        category: StepCategory::Utilities,
        version: None,
        connect: ConnectKind::None,
        fields: vec![
            FieldSpec::text("label", "Step 이름"),
            FieldSpec::textarea("template", "템플릿").required(),
        ],
        data_inputs: vec![DataPort::new("values", "치환 값", "json")],
        data_outputs: vec![DataPort::new("text", "조립 결과", "text")],
        inspector: Some(InspectorSpec {
            steps: vec![StepTab::Configure, StepTab::Test],
            default_tab: StepTab::Configure,
            validation: None,
        }),
        tags: vec!["template".into(), "format".into()],
    }
}

/// 제품 데이터베이스에서 항목을 조회하는 Step이다.
fn product_lookup() -> StepSpec {
    StepSpec {
        key: "productLookup".into(),
        name: "제품 조회".into(),
        color: "#2F6F8F".into(),
        icon: "box".into(),
        category: StepCategory::Products,
        version: None,
        connect: ConnectKind::Token,
        fields: vec![
            FieldSpec::text("label", "Step 이름"),
            FieldSpec::text("api_token", "서비스 토큰").connection_only(),
            FieldSpec::text("product_id", "제품 ID"),
            FieldSpec::text("product_code", "제품 코드"),
        ],
        data_inputs: Vec::new(),
        data_outputs: vec![DataPort::new("product", "제품 정보", "json")],
        inspector: Some(InspectorSpec {
            steps: vec![StepTab::Connect, StepTab::Configure, StepTab::Test],
            default_tab: StepTab::Connect,
            validation: Some(InspectorRule::RequireAny {
                keys: vec!["product_id".into(), "product_code".into()],
                message: "제품 ID 또는 제품 코드 중 하나는 입력해야 합니다.".into(),
            }),
        }),
        tags: vec!["product".into(), "lookup".into()],
    }
}

/// 사용자 정의 스크립트를 실행하는 Step이다.
fn custom_script() -> StepSpec {
    StepSpec {
        key: "customScript".into(),
        name: "사용자 스크립트".into(),
        color: "#374151".into(),
        icon: "code".into(),
        category: StepCategory::Custom,
        version: None,
        connect: ConnectKind::None,
        fields: vec![
            FieldSpec::text("label", "Step 이름"),
            FieldSpec::textarea("source", "스크립트 본문")
                .required()
                .validate(FieldValidator::MinLength { min: 10 }),
        ],
        data_inputs: vec![DataPort::new("input", "입력", "json")],
        data_outputs: vec![DataPort::new("output", "출력", "json")],
        inspector: Some(InspectorSpec {
            steps: vec![StepTab::Configure, StepTab::Test],
            default_tab: StepTab::Configure,
            validation: None,
        }),
        tags: vec!["script".into(), "custom".into()],
    }
}
