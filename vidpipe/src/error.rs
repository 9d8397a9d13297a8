use vidpipe_graph::GraphError;
use vidpipe_parser::ParseError;
use vidpipe_runtime::RuntimeError;

/// The facade's aggregate error type: every failure a caller driving
/// `lex -> parse -> build_graph -> execute` can hit, collapsed into one
/// enum so `?` works across crate boundaries (spec §7).
#[derive(Debug, thiserror::Error)]
pub enum VidpipeError {
    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    Graph(#[from] GraphError),

    #[error(transparent)]
    Runtime(#[from] RuntimeError),
}
