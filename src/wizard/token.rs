use once_cell::sync::Lazy;
use regex::Regex;

/// `{{노드ID.출력키}}` 형태의 변수 토큰을 식별하는 패턴이다.
static TOKEN_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\{\{([A-Za-z0-9_\-]+)\.([A-Za-z0-9_\-]+)\}\}")
        .expect("변수 토큰 패턴이 잘못되었습니다.")
});

/// 필드 값 문자열을 구성하는 표시 구간이다.
///
/// 저장 값은 항상 토큰 문자열을 포함한 원문이며, 배지 표현은 매번
/// 원문에서 다시 계산된다.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValueSegment {
    /// 일반 텍스트 구간.
    Text(String),
    /// 원자적으로 취급되는 변수 토큰 구간.
    Token {
        /// 참조 대상 노드 ID.
        node_id: String,
        /// 참조 대상 출력 키.
        output_key: String,
    },
}

/// 변수 토큰 문자열을 조립한다.
pub fn token_text(node_id: &str, output_key: &str) -> String {
    format!("{{{{{node_id}.{output_key}}}}}")
}

/// 저장 문자열을 표시용 구간 목록으로 분해한다.
pub fn parse_segments(value: &str) -> Vec<ValueSegment> {
    let mut segments = Vec::new();
    let mut cursor = 0;
    for captures in TOKEN_PATTERN.captures_iter(value) {
        let whole = captures.get(0).expect("전체 매치는 항상 존재합니다.");
        if whole.start() > cursor {
            segments.push(ValueSegment::Text(value[cursor..whole.start()].to_string()));
        }
        segments.push(ValueSegment::Token {
            node_id: captures[1].to_string(),
            output_key: captures[2].to_string(),
        });
        cursor = whole.end();
    }
    if cursor < value.len() {
        segments.push(ValueSegment::Text(value[cursor..].to_string()));
    }
    segments
}

/// 캐럿 바이트 위치에 토큰 문자열을 끼워 넣은 새 저장 값을 만든다.
///
/// 위치가 문자 경계를 벗어나면 문자열 끝에 덧붙인다.
pub fn insert_token_at(value: &str, caret: usize, node_id: &str, output_key: &str) -> String {
    let token = token_text(node_id, output_key);
    if caret >= value.len() {
        return format!("{value}{token}");
    }
    let mut boundary = caret;
    while !value.is_char_boundary(boundary) {
        boundary += 1;
    }
    let mut result = String::with_capacity(value.len() + token.len());
    result.push_str(&value[..boundary]);
    result.push_str(&token);
    result.push_str(&value[boundary..]);
    result
}
