//! Gradeboard Snapshot - Editor document model and graph extraction
//!
//! The whiteboard editor persists its document as a flat keyed record store.
//! This crate owns:
//! - The typed record model and the closed catalog of system-design shapes
//! - The logical graph the grading pipeline operates on
//! - The snapshot-to-graph extractor, which strips visual noise and resolves
//!   arrow bindings into directed edges
//!
//! Extraction is pure and total: a malformed or empty snapshot degrades to an
//! empty graph, never an error.

pub mod extract;
pub mod graph;
pub mod record;
pub mod shape;

pub use extract::{extract, VISUAL_PROPS};
pub use graph::{GraphEdge, GraphNode, LogicalGraph};
pub use record::{DocumentSnapshot, StoreRecord, Terminal};
pub use shape::{ClientPlatform, DatabaseEngine, ShapeKind};
