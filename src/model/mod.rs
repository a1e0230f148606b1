//! The block tree as the converter sees it: a closed set of kinds plus an
//! explicit catch-all for tags this crate has no rule for.

mod block;
pub mod blocks;
pub mod common;

pub use block::Block;
pub use blocks::*;
pub use common::*;
