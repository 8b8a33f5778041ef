// Graph structure: builder, compile-time validation, compiled form

mod builder;
mod compiled;
mod error;
mod transition;

pub use builder::GraphBuilder;
pub use compiled::Graph;
pub use error::GraphDefinitionError;
pub use transition::Transition;
