/// Graph-build failures surfaced to the caller (spec §7, "Graph-build
/// error"). Partial graphs are never returned: [`crate::build_graph`]
/// yields either a complete [`crate::Graph`] or one of these.
#[derive(Debug, Clone, thiserror::Error, PartialEq, Eq)]
pub enum GraphError {
    #[error("unknown stage {name:?}")]
    UnknownStage { name: String },

    #[error("stage {name:?} is a sink and cannot feed another stage")]
    SinkFeedsDownstream { name: String },

    #[error("stage {name:?} is a source and cannot receive input")]
    SourceReceivesInput { name: String },

    #[error("the choice operator has no dispatch semantics and is rejected at build time")]
    UnimplementedChoice,
}
