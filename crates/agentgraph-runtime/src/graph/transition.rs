// Routing outcomes
//
// Transitions form a closed, tagged set so that router decisions stay
// statically analyzable: a conditional edge declares its candidate
// transitions at compile time and its predicate picks one of them.

use std::fmt;

/// The outcome of a routing decision
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Transition {
    /// Continue with the named node
    Node(String),
    /// Terminate the run and return the current state
    End,
}

impl Transition {
    /// Create a transition to the named node
    pub fn node(id: impl Into<String>) -> Self {
        Transition::Node(id.into())
    }

    /// Check if this is the terminal outcome
    pub fn is_end(&self) -> bool {
        matches!(self, Transition::End)
    }
}

impl fmt::Display for Transition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Transition::Node(id) => write!(f, "{id}"),
            Transition::End => write!(f, "__end__"),
        }
    }
}
