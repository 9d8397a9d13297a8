use std::sync::Arc;

use vidpipe_common::{FrameQueue, StageFactory};

/// Identifies a node within a built [`crate::Graph`] by its position in
/// `Graph::nodes` (spec §3, "Execution node").
pub type NodeId = usize;

/// `(stage_ref, input_queue_opt, output_queues[], ...)` per spec §3. The
/// worker handle and running flag described there belong to the runtime,
/// which wraps each of these in a [`crate::ExecutionNode`]-owning task once
/// the graph is handed off.
pub struct ExecutionNode {
    pub name: String,
    pub factory: Arc<dyn StageFactory>,
    pub input_queue: Option<Arc<FrameQueue>>,
    pub output_queues: Vec<Arc<FrameQueue>>,
    pub is_source: bool,
    pub is_sink: bool,
}

impl ExecutionNode {
    pub fn new(name: String, factory: Arc<dyn StageFactory>, input_queue: Option<Arc<FrameQueue>>) -> Self {
        let is_source = factory.is_source();
        let is_sink = factory.is_sink();
        Self {
            name,
            factory,
            input_queue,
            output_queues: Vec::new(),
            is_source,
            is_sink,
        }
    }
}

/// A flat list of execution nodes wired together by shared queues (spec
/// §4.3). Acyclic by construction: every output queue is created strictly
/// before the node that owns it is referenced as a downstream target.
pub struct Graph {
    pub nodes: Vec<ExecutionNode>,
}

impl std::fmt::Debug for Graph {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Graph")
            .field("nodes", &self.nodes.iter().map(|n| &n.name).collect::<Vec<_>>())
            .finish()
    }
}

impl Graph {
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}
