/// How two subexpressions of a [`Expr::Pipeline`] are connected (spec §3).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Connection {
    Sync,
    Async,
    Buffered,
}

/// The VidPipe expression tree (spec §3, "Expression tree").
///
/// Every non-leaf owns its children exclusively; the tree produced by
/// [`crate::parse`] is always acyclic.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// Reference to a registered stage.
    Function(String),
    /// `left` feeds `right`. `buffer_size` is 0 unless the edge was written
    /// `[n]`; the graph builder falls back to a capacity of 1 when it sees
    /// 0.
    Pipeline(Box<Expr>, Box<Expr>, Connection, u32),
    /// Fan-out: the same input is duplicated to every branch.
    Parallel(Vec<Expr>),
    /// Fan-in: both sides feed a shared successor.
    Merge(Box<Expr>, Box<Expr>),
    /// Alternation; parsed but rejected at graph-build time (spec §9).
    Choice(Vec<Expr>),
    /// A nested, continuously-driven scheduling unit.
    Loop(Box<Expr>),
}

impl Expr {
    pub fn function(name: impl Into<String>) -> Self {
        Expr::Function(name.into())
    }
}
