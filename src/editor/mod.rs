mod edge;
mod error;
mod explain;
mod graph;
mod history;
mod layout;
mod node;
mod session;

pub use edge::EditorEdge;
pub use error::EditorError;
pub use explain::explain_flow;
pub use graph::{CHILD_OFFSET_X, DEFAULT_ANCHOR, EditorGraph, ViewportBounds};
pub use history::{EditHistory, GraphFrame};
pub use layout::auto_align;
pub use node::{EditorNode, NodeData, NodeKind, Position};
pub use session::EditorSession;
