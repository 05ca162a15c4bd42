pub mod pass_staking_instructions;
pub mod rpc;
pub mod utils;
