pub mod basicblock;
pub mod cfg;
pub mod dominator;
pub mod func;
pub mod loops;
pub mod parser;
pub mod program;

mod impls;

pub use basicblock::{BasicBlock, Node};
pub use cfg::CFG;
