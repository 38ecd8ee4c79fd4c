mod block_type;
mod builders;
mod state_block;

pub use block_type::BlockType;
pub use builders::{BlockBuilder, StateBlockBuilder};
pub use state_block::{StateBlock, StateHashables};
