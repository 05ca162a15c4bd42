pub mod events;
pub use events::*;

pub mod global_config;
pub use global_config::*;

pub mod stake_record;
pub use stake_record::*;

pub mod staker_info;
pub use staker_info::*;

pub mod staker_directory;
pub use staker_directory::*;

pub mod payout_ledger;
pub use payout_ledger::*;

pub mod allow_list;
pub use allow_list::*;
