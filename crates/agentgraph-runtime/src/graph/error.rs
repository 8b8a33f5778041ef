// Graph definition errors
//
// All of these are compile-time failures: a process must not start serving
// with an invalid graph, so `GraphBuilder::compile` rejects the definition
// before any execution happens.

use thiserror::Error;

/// Errors raised while compiling a graph definition
#[derive(Debug, Error, PartialEq, Eq)]
pub enum GraphDefinitionError {
    /// No entry node was declared
    #[error("no entry node declared")]
    MissingEntry,

    /// The entry node is not among the declared nodes
    #[error("entry node '{0}' is not declared")]
    UnknownEntry(String),

    /// Two nodes were added under the same id
    #[error("duplicate node id '{0}'")]
    DuplicateNode(String),

    /// An edge references a node that was never declared
    #[error("edge from '{from}' references undeclared node '{to}'")]
    UnknownEdgeTarget { from: String, to: String },

    /// An edge starts at a node that was never declared
    #[error("edge declared for undeclared node '{0}'")]
    UnknownEdgeSource(String),

    /// A conditional edge's candidate set names an undeclared node
    #[error("conditional edge from '{from}' lists undeclared candidate '{candidate}'")]
    UnknownCandidate { from: String, candidate: String },

    /// A node has no outgoing edge, so execution could never leave it
    #[error("node '{0}' has no outgoing edge")]
    MissingRoute(String),

    /// No path exists from the entry node to the terminal marker
    #[error("no path from entry '{0}' to the terminal marker")]
    EndUnreachable(String),
}
