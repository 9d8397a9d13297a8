use std::sync::Arc;

use vidpipe_common::{FrameQueue, StageRegistry};
use vidpipe_parser::Expr;

use crate::error::GraphError;
use crate::node::{ExecutionNode, Graph, NodeId};

/// Lowers an expression tree to a flat node-and-queue graph in a single
/// post-order traversal, per spec §4.3.
///
/// Each recursive step returns the subexpression's **entry set** (nodes
/// whose input queue is the subexpression's input) and **exit set** (nodes
/// whose output feeds the subexpression's output). `inbound_capacity` is
/// the capacity the *enclosing* edge assigned to this subexpression's
/// entries; it threads down from the nearest [`Expr::Pipeline`] ancestor
/// and defaults to 1 at the tree root, where nothing feeds in.
struct Builder<'a> {
    registry: &'a StageRegistry,
    nodes: Vec<ExecutionNode>,
}

impl<'a> Builder<'a> {
    fn build(&mut self, expr: &Expr, inbound_capacity: usize) -> Result<(Vec<NodeId>, Vec<NodeId>), GraphError> {
        match expr {
            Expr::Function(name) => self.build_function(name, inbound_capacity),
            Expr::Pipeline(left, right, _connection, capacity) => {
                self.build_pipeline(left, right, *capacity, inbound_capacity)
            }
            Expr::Parallel(branches) => self.build_parallel(branches, inbound_capacity),
            Expr::Merge(left, right) => self.build_merge(left, right, inbound_capacity),
            Expr::Loop(body) => self.build(body, inbound_capacity),
            Expr::Choice(_) => Err(GraphError::UnimplementedChoice),
        }
    }

    fn build_function(&mut self, name: &str, inbound_capacity: usize) -> Result<(Vec<NodeId>, Vec<NodeId>), GraphError> {
        let factory = self
            .registry
            .get(name)
            .ok_or_else(|| GraphError::UnknownStage { name: name.to_string() })?;

        let input_queue = if factory.is_source() {
            None
        } else {
            Some(Arc::new(FrameQueue::new(inbound_capacity.max(1))))
        };

        let id = self.nodes.len();
        self.nodes.push(ExecutionNode::new(name.to_string(), factory, input_queue));
        Ok((vec![id], vec![id]))
    }

    fn build_pipeline(
        &mut self,
        left: &Expr,
        right: &Expr,
        capacity: u32,
        inbound_capacity: usize,
    ) -> Result<(Vec<NodeId>, Vec<NodeId>), GraphError> {
        let (left_entries, left_exits) = self.build(left, inbound_capacity)?;
        let edge_capacity = if capacity == 0 { 1 } else { capacity as usize };
        let (right_entries, right_exits) = self.build(right, edge_capacity)?;

        for &exit in &left_exits {
            if self.nodes[exit].is_sink {
                return Err(GraphError::SinkFeedsDownstream {
                    name: self.nodes[exit].name.clone(),
                });
            }
        }
        for &entry in &right_entries {
            if self.nodes[entry].is_source {
                return Err(GraphError::SourceReceivesInput {
                    name: self.nodes[entry].name.clone(),
                });
            }
        }

        for &exit in &left_exits {
            for &entry in &right_entries {
                let queue = self.nodes[entry]
                    .input_queue
                    .clone()
                    .expect("validated non-source above");
                self.nodes[exit].output_queues.push(queue);
            }
        }

        Ok((left_entries, right_exits))
    }

    fn build_parallel(&mut self, branches: &[Expr], inbound_capacity: usize) -> Result<(Vec<NodeId>, Vec<NodeId>), GraphError> {
        let mut entries = Vec::new();
        let mut exits = Vec::new();
        for branch in branches {
            let (branch_entries, branch_exits) = self.build(branch, inbound_capacity)?;
            entries.extend(branch_entries);
            exits.extend(branch_exits);
        }
        Ok((entries, exits))
    }

    /// Fan-in falls out of [`Self::build_pipeline`]'s wiring rule for free:
    /// when an enclosing pipeline connects a merge's combined exit set to a
    /// downstream entry, every exit in that set pushes to the *same*
    /// `input_queue`, because a downstream [`Expr::Function`] allocates
    /// exactly one queue regardless of how many upstream nodes target it.
    /// No separate merge-queue allocation is needed.
    fn build_merge(&mut self, left: &Expr, right: &Expr, inbound_capacity: usize) -> Result<(Vec<NodeId>, Vec<NodeId>), GraphError> {
        let (left_entries, left_exits) = self.build(left, inbound_capacity)?;
        let (right_entries, right_exits) = self.build(right, inbound_capacity)?;

        let mut entries = left_entries;
        entries.extend(right_entries);
        let mut exits = left_exits;
        exits.extend(right_exits);
        Ok((entries, exits))
    }
}

/// Builds a dataflow graph from an expression tree (spec §6:
/// `build_graph(tree, registry)`).
pub fn build_graph(expr: &Expr, registry: &StageRegistry) -> Result<Graph, GraphError> {
    let span = tracing::debug_span!("build_graph");
    let _guard = span.enter();

    let mut builder = Builder {
        registry,
        nodes: Vec::new(),
    };
    builder.build(expr, 1)?;

    tracing::debug!(nodes = builder.nodes.len(), "graph build complete");
    Ok(Graph { nodes: builder.nodes })
}
