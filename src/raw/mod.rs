mod arena;
mod handle;
mod node;
mod raw_rbtree;

pub use arena::{NodeArena, SlabArena};
pub use handle::NodeHandle;
pub use node::Node;
pub(crate) use node::Side;
pub(crate) use raw_rbtree::RawRbTree;
