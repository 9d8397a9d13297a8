//! Lowers a VidPipe expression tree into a concrete dataflow graph of
//! stage nodes connected by bounded queues (spec §4.3).

mod builder;
mod error;
mod node;

pub use builder::build_graph;
pub use error::GraphError;
pub use node::{ExecutionNode, Graph, NodeId};
