pub mod area;
pub mod auto;
pub mod catcher;
pub mod object;
pub mod processor;
pub mod stack;

pub use area::*;
pub use auto::*;
pub use catcher::*;
pub use object::*;
pub use processor::*;
pub use stack::*;
