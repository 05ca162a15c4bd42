pub mod initialize;
pub use initialize::*;

pub mod update_config;
pub use update_config::*;

pub mod update_allowed_sources;
pub use update_allowed_sources::*;

pub mod stake;
pub use stake::*;

pub mod stake_bulk;
pub use stake_bulk::*;

pub mod unstake;
pub use unstake::*;

pub mod unstake_bulk;
pub use unstake_bulk::*;

pub mod receive_payout;
pub use receive_payout::*;

pub mod distribute_payout;
pub use distribute_payout::*;

pub mod claim_payout;
pub use claim_payout::*;

pub mod withdraw_residual;
pub use withdraw_residual::*;

pub mod views;
pub use views::*;
