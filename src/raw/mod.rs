mod arena;
mod handle;
mod node;
mod raw_osavl_tree;

pub use handle::Handle;
pub(crate) use node::Node;
pub(crate) use raw_osavl_tree::RawOSAvlTree;
