pub mod ir_writer;
pub mod layout;
pub mod node;
pub mod op;
pub mod types;
pub mod visitor;

mod error;

pub use error::MalformedNode;
pub use layout::{ceil32, TypeLayout, WordLayout};
pub use node::{IrNode, Location, NodeBuilder, SourcePos};
pub use op::{Label, OpKind};
pub use primitive_types::U256;
pub use types::{BaseType, Type};

/// Size in bytes of a machine word.
pub const WORD_SIZE: usize = 32;
