use crate::types::BlockId;
use serde::{Deserialize, Serialize};

/// Fields every block carries regardless of kind.
///
/// Children are not stored on the block: the walker asks the document
/// source for them only when `has_children` is set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlockCommon {
    pub id: BlockId,
    pub has_children: bool,
    pub archived: bool,
}

impl BlockCommon {
    pub fn new(id: BlockId) -> Self {
        Self {
            id,
            has_children: false,
            archived: false,
        }
    }

    pub fn with_children(mut self) -> Self {
        self.has_children = true;
        self
    }
}
