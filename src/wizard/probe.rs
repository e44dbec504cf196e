use crate::catalog::StepSpec;
use async_trait::async_trait;
use serde_json::{json, Value};
use std::collections::BTreeMap;
use std::sync::Arc;

/// 테스트 단계에서 Step 기능 점검을 수행하는 실행기 추상화이다.
#[async_trait]
pub trait StepProbe: Send + Sync {
    /// 구성 값을 사용해 기능 점검을 수행하고 견본 출력을 돌려준다.
    async fn probe(
        &self,
        spec: &StepSpec,
        values: &BTreeMap<String, Value>,
    ) -> anyhow::Result<Value>;
}

/// 여러 소유자가 공유하는 점검기 핸들이다.
pub type SharedProbe = Arc<dyn StepProbe>;

/// 실제 외부 호출 없이 출력 포트 정의로부터 견본을 조립하는 기본 점검기이다.
#[derive(Debug, Default)]
pub struct StubProbe;

#[async_trait]
impl StepProbe for StubProbe {
    /// 출력 포트마다 타입에 맞는 견본 값을 채워 돌려준다.
    async fn probe(
        &self,
        spec: &StepSpec,
        _values: &BTreeMap<String, Value>,
    ) -> anyhow::Result<Value> {
        let mut sample = serde_json::Map::new();
        for port in &spec.data_outputs {
            let value = match port.kind.as_str() {
                "number" => json!(0),
                "json" => json!({}),
                _ => json!(format!("{} 견본", port.label)),
            };
            sample.insert(port.key.clone(), value);
        }
        Ok(Value::Object(sample))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::catalog;

    /// 기본 점검기가 출력 포트 정의를 따라 견본을 만드는지 확인한다.
    #[tokio::test]
    async fn stub_probe_builds_sample_from_output_ports() {
        let spec = catalog().get("httpRequest");
        let sample = StubProbe
            .probe(spec, &BTreeMap::new())
            .await
            .expect("기본 점검기는 실패하지 않아야 합니다.");
        assert_eq!(sample["status"], json!(0));
        assert_eq!(sample["body"], json!({}));
    }
}
