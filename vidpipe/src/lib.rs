//! VidPipe: a DSL and execution runtime for composing real-time streaming
//! pipelines out of named processing stages (spec §1).
//!
//! This crate is the external-facing surface described in spec §6: it
//! re-exports the compiler–runtime pair (lexer, parser, graph builder,
//! runtime) and adds [`compile_and_run`] to thread them together in the
//! order a caller always wants: `lex -> parse -> build_graph -> execute`.

mod error;

pub use error::VidpipeError;

pub use vidpipe_common::{
    Checkpoint, Frame, FrameQueue, Position, QueueClosed, RuntimeConfig, Stage, StageFactory,
    StageRegistry,
};
pub use vidpipe_graph::{build_graph, ExecutionNode, Graph, GraphError, NodeId};
pub use vidpipe_lexer::{lex, Lexer, Token, TokenKind};
pub use vidpipe_parser::{parse, Connection, Expr, ParseError};
pub use vidpipe_runtime::{Runtime, RuntimeError};

/// Compiles `source` against `registry` and starts it running (spec §6's
/// full process surface in one call).
///
/// Equivalent to calling `lex`, `parse`, `build_graph`, and
/// `Runtime::execute` in sequence; use the individual functions directly
/// when a caller needs to inspect the token stream, tree, or graph along
/// the way (e.g. to report a parse error with its own diagnostics).
pub fn compile_and_run(
    source: &str,
    registry: &StageRegistry,
    config: RuntimeConfig,
) -> Result<Runtime, VidpipeError> {
    let span = tracing::info_span!("compile_and_run");
    let _guard = span.enter();

    let tokens = lex(source);
    let tree = parse(tokens)?;
    let graph = build_graph(&tree, registry)?;
    Ok(Runtime::execute(graph, config))
}
