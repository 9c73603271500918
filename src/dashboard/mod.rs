pub mod hierarchy;
pub mod render;

pub use hierarchy::{Hierarchy, build_hierarchy};
