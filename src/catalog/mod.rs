mod builtin;
mod picker;
mod spec;

pub use picker::{PickerGroup, StepPicker, VersionCard};
pub use spec::{
    ConnectKind, DataPort, FieldKind, FieldSpec, FieldValidator, InspectorRule, InspectorSpec,
    StepCategory, StepSpec, StepTab,
};

use once_cell::sync::Lazy;
use std::collections::HashMap;

/// 프로세스 전역에서 공유되는 내장 카탈로그이다.
static CATALOG: Lazy<StepCatalog> = Lazy::new(|| StepCatalog::new(builtin::builtin_specs()));

/// 전역 카탈로그 참조를 반환한다.
pub fn catalog() -> &'static StepCatalog {
    &CATALOG
}

/// 키 기반 O(1) 조회가 가능한 Step 정의 레지스트리이다.
#[derive(Debug)]
pub struct StepCatalog {
    specs: Vec<StepSpec>,
    index: HashMap<String, usize>,
}

impl StepCatalog {
    /// 정의 목록으로 레지스트리를 구성한다. 중복 키는 허용하지 않는다.
    pub fn new(specs: Vec<StepSpec>) -> Self {
        let mut index = HashMap::with_capacity(specs.len());
        for (pos, spec) in specs.iter().enumerate() {
            let previous = index.insert(spec.key.clone(), pos);
            if previous.is_some() {
                panic!("카탈로그에 중복된 Step 키가 있습니다: {}", spec.key);
            }
        }
        Self { specs, index }
    }

    /// 키로 Step 정의를 조회한다.
    ///
    /// 등록되지 않은 키는 카탈로그 구성 오류이므로 즉시 패닉한다.
    /// 사용자 입력 경로에서는 [`StepCatalog::find`]를 사용한다.
    pub fn get(&self, key: &str) -> &StepSpec {
        match self.find(key) {
            Some(spec) => spec,
            None => panic!("카탈로그에 등록되지 않은 Step 키입니다: {key}"),
        }
    }

    /// 키로 Step 정의를 조회한다. 없으면 None을 반환한다.
    pub fn find(&self, key: &str) -> Option<&StepSpec> {
        self.index.get(key).map(|pos| &self.specs[*pos])
    }

    /// 등록된 전체 정의 목록을 반환한다.
    pub fn all(&self) -> &[StepSpec] {
        &self.specs
    }

    /// 지정 카테고리에 속한 정의 목록을 반환한다.
    pub fn by_category(&self, category: StepCategory) -> Vec<&StepSpec> {
        self.specs
            .iter()
            .filter(|spec| spec.category == category)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// 전역 카탈로그가 키 조회와 전체 열람을 모두 지원하는지 확인한다.
    #[test]
    fn global_catalog_resolves_known_keys() {
        let spec = catalog().get("sendMessageV2");
        assert_eq!(spec.name, "메시지 전송");
        assert_eq!(spec.version, Some(2));
        assert!(catalog().all().len() >= 10);
    }

    /// 미등록 키 조회가 즉시 패닉하는지 확인한다.
    #[test]
    #[should_panic(expected = "카탈로그에 등록되지 않은 Step 키")]
    fn unknown_key_panics() {
        catalog().get("doesNotExist");
    }

    /// find는 미등록 키에 대해 None을 돌려주는지 확인한다.
    #[test]
    fn find_returns_none_for_unknown_key() {
        assert!(catalog().find("doesNotExist").is_none());
        assert!(catalog().find("branch").is_some());
    }

    /// 중복 키로 레지스트리를 만들면 패닉하는지 확인한다.
    #[test]
    #[should_panic(expected = "중복된 Step 키")]
    fn duplicate_keys_are_rejected() {
        let one = catalog().get("delay").clone();
        let two = one.clone();
        StepCatalog::new(vec![one, two]);
    }
}
