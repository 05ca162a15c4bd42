use anchor_lang::prelude::*;

//
// ──────────────────────────────────────────────────────────────────────────────
// Events: Emitted for off-chain indexers/clients to track staking and payouts
// ──────────────────────────────────────────────────────────────────────────────
//

/// Emitted once when the program state is initialized.
#[event]
#[cfg_attr(feature = "client", derive(Debug))]
pub struct ConfigInitialized {
    pub admin: Pubkey,
    /// Verified collection every pass must belong to.
    pub pass_collection: Pubkey,
    /// System-owned PDA that holds payout lamports.
    pub payout_vault: Pubkey,
    pub lock_period: i64,
}

/// Emitted whenever `update_config` changes a parameter.
#[event]
#[cfg_attr(feature = "client", derive(Debug))]
pub struct ConfigUpdated {
    /// Admin after the update (may be newly set).
    pub admin: Pubkey,
    pub paused: bool,
    pub lock_period: i64,
}

/// One per entry of an `update_allowed_sources` batch.
#[event]
#[cfg_attr(feature = "client", derive(Debug))]
pub struct AllowedSourceUpdated {
    pub admin: Pubkey,
    pub source: Pubkey,
    pub allowed: bool,
}

#[event]
#[cfg_attr(feature = "client", derive(Debug))]
pub struct Staked {
    pub staker: Pubkey,
    pub mint: Pubkey,
}

/// Emitted after the per-pass `Staked` events of a bulk stake.
#[event]
#[cfg_attr(feature = "client", derive(Debug))]
pub struct StakedBulk {
    pub staker: Pubkey,
    pub mints: Vec<Pubkey>,
}

#[event]
#[cfg_attr(feature = "client", derive(Debug))]
pub struct Unstaked {
    pub staker: Pubkey,
    pub mint: Pubkey,
}

#[event]
#[cfg_attr(feature = "client", derive(Debug))]
pub struct UnstakedBulk {
    pub staker: Pubkey,
    pub mints: Vec<Pubkey>,
}

/// A revenue source pushed lamports into the pending payout balance.
#[event]
#[cfg_attr(feature = "client", derive(Debug))]
pub struct PayoutReceived {
    pub source: Pubkey,
    pub amount: u64,
}

/// Emitted when a distribution cycle has credited every staker.
///
/// `amount` is the pending balance consumed by the cycle; the part not
/// covered by `rate_per_token * total_staked_token` went to residual.
#[event]
#[cfg_attr(feature = "client", derive(Debug))]
pub struct PayoutDistributed {
    pub operator: Pubkey,
    pub amount: u64,
    pub staker_count: u64,
    pub total_staked_token: u64,
    pub rate_per_token: u64,
}

#[event]
#[cfg_attr(feature = "client", derive(Debug))]
pub struct PayoutClaimed {
    pub staker: Pubkey,
    pub amount: u64,
}

#[event]
#[cfg_attr(feature = "client", derive(Debug))]
pub struct ResidualWithdrawn {
    pub admin: Pubkey,
    pub amount: u64,
}
