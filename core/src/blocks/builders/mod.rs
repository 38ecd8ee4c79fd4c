mod state_block_builder;

pub use state_block_builder::StateBlockBuilder;

pub struct BlockBuilder {}

impl BlockBuilder {
    pub fn state() -> StateBlockBuilder {
        StateBlockBuilder::new()
    }
}
