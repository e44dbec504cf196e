use super::spec::{StepCategory, StepSpec};
use super::StepCatalog;

/// 피커에 표시되는 개별 버전 카드이다.
#[derive(Debug, Clone, PartialEq)]
pub struct VersionCard {
    /// 선택 시 사용할 Step 키.
    pub key: String,
    /// 표시 이름.
    pub name: String,
    /// 버전 배지 문구.
    pub badge: String,
}

/// 동일 앱의 버전들을 하나로 묶은 그룹 행이다.
#[derive(Debug, Clone, PartialEq)]
pub struct PickerGroup {
    /// 버전 접미사를 제거한 그룹 키.
    pub base_key: String,
    /// 그룹 대표 이름.
    pub name: String,
    /// 그룹 대표 색상.
    pub color: String,
    /// 그룹 대표 아이콘.
    pub icon: String,
    /// 그룹에 속한 버전 카드 목록.
    pub versions: Vec<VersionCard>,
}

/// 카테고리/그룹/검색을 제공하는 Step 탐색기이다.
pub struct StepPicker<'a> {
    catalog: &'a StepCatalog,
    /// 현재 선택된 카테고리.
    pub category: StepCategory,
    /// 현재 검색어.
    pub query: String,
}

impl<'a> StepPicker<'a> {
    /// 앱 카테고리를 기본으로 하는 탐색기를 생성한다.
    pub fn new(catalog: &'a StepCatalog) -> Self {
        Self {
            catalog,
            category: StepCategory::Apps,
            query: String::new(),
        }
    }

    /// 표시 카테고리를 변경한다.
    pub fn set_category(&mut self, category: StepCategory) {
        self.category = category;
    }

    /// 검색어를 변경한다.
    pub fn set_query(&mut self, query: &str) {
        self.query = query.trim().to_string();
    }

    /// 현재 카테고리와 검색어를 반영한 그룹 목록을 계산한다.
    ///
    /// 같은 기본 키를 가진 버전들은 하나의 그룹으로 접힌다. 그룹 내
    /// 버전 카드는 버전 번호 순으로 정렬되고 그룹 행 자체는 해당
    /// 카테고리 정의 순서를 따른다.
    pub fn groups(&self) -> Vec<PickerGroup> {
        let mut groups: Vec<PickerGroup> = Vec::new();
        for spec in self.catalog.by_category(self.category) {
            if !self.matches(spec) {
                continue;
            }
            let base_key = spec.base_key();
            let card = VersionCard {
                key: spec.key.clone(),
                name: spec.name.clone(),
                badge: spec.version_badge(),
            };
            match groups.iter_mut().find(|group| group.base_key == base_key) {
                Some(group) => group.versions.push(card),
                None => groups.push(PickerGroup {
                    base_key,
                    name: spec.name.clone(),
                    color: spec.color.clone(),
                    icon: spec.icon.clone(),
                    versions: vec![card],
                }),
            }
        }
        for group in &mut groups {
            group.versions.sort_by(|a, b| a.badge.cmp(&b.badge));
        }
        groups
    }

    /// 검색어가 이름/키/태그 중 하나와 일치하는지 판별한다.
    fn matches(&self, spec: &StepSpec) -> bool {
        if self.query.is_empty() {
            return true;
        }
        let needle = self.query.to_lowercase();
        spec.name.to_lowercase().contains(&needle)
            || spec.key.to_lowercase().contains(&needle)
            || spec
                .tags
                .iter()
                .any(|tag| tag.to_lowercase().contains(&needle))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::catalog;

    /// 같은 앱의 두 버전이 하나의 그룹으로 접히는지 확인한다.
    #[test]
    fn versions_collapse_into_a_single_group() {
        let picker = StepPicker::new(catalog());
        let groups = picker.groups();
        let send = groups
            .iter()
            .find(|g| g.base_key == "sendMessage")
            .expect("sendMessage 그룹이 없습니다.");
        assert_eq!(send.versions.len(), 2);
        assert_eq!(send.versions[0].badge, "V1");
        assert_eq!(send.versions[1].badge, "V2");
    }

    /// 카테고리 전환이 그룹 목록을 올바르게 바꾸는지 확인한다.
    #[test]
    fn category_filter_limits_groups() {
        let mut picker = StepPicker::new(catalog());
        picker.set_category(StepCategory::Flow);
        let groups = picker.groups();
        assert!(groups.iter().all(|g| g.base_key == "branch"));
        assert_eq!(groups.len(), 1);
    }

    /// 검색어가 이름, 키, 태그 전부에 대해 동작하는지 확인한다.
    #[test]
    fn search_matches_name_key_and_tags() {
        let mut picker = StepPicker::new(catalog());
        picker.set_query("메시지");
        assert_eq!(picker.groups().len(), 1);
        picker.set_query("httpRequest");
        assert_eq!(picker.groups().len(), 1);
        picker.set_query("webhook");
        assert_eq!(picker.groups().len(), 1);
        picker.set_query("존재하지않음");
        assert!(picker.groups().is_empty());
    }
}
