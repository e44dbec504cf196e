//! 시나리오 자동화를 방향 그래프로 조립하는 에디터 코어이다.
//!
//! 그래프 모델과 변이 프로토콜, 실행 취소/재실행, 디바운스 자동 저장,
//! 노드 구성 마법사, Step 카탈로그/피커, 흐름 분석, 관찰 이벤트 버스를
//! 제공한다. 화면 렌더링과 시나리오 실제 실행은 바깥 제품의 몫이다.

pub mod autosave;
pub mod catalog;
pub mod config;
pub mod editor;
pub mod events;
pub mod scenario;
pub mod store;
pub mod wizard;

pub use autosave::{AutosaveScheduler, AutosaveStatus};
pub use config::{EditorConfig, StoreBackend};
pub use editor::{EditorGraph, EditorSession, ViewportBounds};
pub use events::{EditorEvent, EventBus};
pub use scenario::{Blueprint, GraphDoc, ScenarioRecord, VersionSnapshot};
pub use store::{LocalStore, MemoryStore, ScenarioStore, SharedStore};
pub use wizard::{NodeWizard, WizardState};
