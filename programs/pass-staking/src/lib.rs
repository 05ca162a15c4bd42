use anchor_lang::prelude::*;

#[cfg(not(feature = "no-entrypoint"))]
solana_security_txt::security_txt! {
    name: "pass-staking",
    project_url: "https://github.com/pass-staking/pass-staking",
    contacts: "email:security@pass-staking.io",
    policy: "https://github.com/pass-staking/pass-staking/blob/main/SECURITY.md",
    source_code: "https://github.com/pass-staking/pass-staking"
}

declare_id!("3gQky7xPa7ckjVrjtek88FeeuuYBMRLzmp6KidCCGHYd");

pub mod admin {
    use anchor_lang::prelude::declare_id;
    declare_id!("26JEAJ6VV4LPHDkpL3DiKoKinsgkvN5iCQhDHGv2VpfS");
}

pub const AUTH_SEED: &str = "pass_custody_auth";
pub const PASS_VAULT_SEED: &str = "pass_vault";
pub const PAYOUT_VAULT_SEED: &str = "payout_vault";

/// Default minimum holding period for a staked pass (31 days).
pub const DEFAULT_LOCK_PERIOD: i64 = 60 * 60 * 24 * 31;

/// Upper bound on passes handled by a single bulk instruction.
/// Each pass brings its own accounts, so this is bounded by the
/// transaction account limit rather than compute.
pub const MAX_BULK_PASSES: usize = 8;

pub mod error;
pub mod instructions;
pub mod states;
pub mod utils;

use instructions::*;

#[program]
pub mod pass_staking {

    use super::*;

    pub fn initialize(
        ctx: Context<Initialize>,
        admin: Pubkey,
        pass_collection: Pubkey,
        lock_period: i64,
    ) -> Result<()> {
        instructions::initialize(ctx, admin, pass_collection, lock_period)
    }

    pub fn update_config(ctx: Context<UpdateConfig>, param: u8, value: u64) -> Result<()> {
        instructions::update_config(ctx, param, value)
    }

    pub fn update_allowed_sources(
        ctx: Context<UpdateAllowedSources>,
        sources: Vec<Pubkey>,
        flags: Vec<bool>,
    ) -> Result<()> {
        instructions::update_allowed_sources(ctx, sources, flags)
    }

    pub fn stake(ctx: Context<Stake>) -> Result<()> {
        instructions::stake(ctx)
    }

    pub fn stake_bulk<'info>(
        ctx: Context<'_, '_, 'info, 'info, StakeBulk<'info>>,
        pass_mints: Vec<Pubkey>,
    ) -> Result<()> {
        instructions::stake_bulk(ctx, pass_mints)
    }

    pub fn unstake(ctx: Context<Unstake>) -> Result<()> {
        instructions::unstake(ctx)
    }

    pub fn unstake_bulk<'info>(
        ctx: Context<'_, '_, 'info, 'info, UnstakeBulk<'info>>,
        pass_mints: Vec<Pubkey>,
    ) -> Result<()> {
        instructions::unstake_bulk(ctx, pass_mints)
    }

    pub fn receive_payout(ctx: Context<ReceivePayout>, amount: u64) -> Result<()> {
        instructions::receive_payout(ctx, amount)
    }

    pub fn distribute_payout<'info>(
        ctx: Context<'_, '_, 'info, 'info, DistributePayout<'info>>,
    ) -> Result<()> {
        instructions::distribute_payout(ctx)
    }

    pub fn claim_payout(ctx: Context<ClaimPayout>) -> Result<()> {
        instructions::claim_payout(ctx)
    }

    pub fn withdraw_residual(ctx: Context<WithdrawResidual>) -> Result<()> {
        instructions::withdraw_residual(ctx)
    }

    pub fn can_stake<'info>(
        ctx: Context<'_, '_, 'info, 'info, CanStake<'info>>,
        pass_mints: Vec<Pubkey>,
    ) -> Result<Vec<Pubkey>> {
        instructions::can_stake(ctx, pass_mints)
    }

    pub fn can_unstake<'info>(
        ctx: Context<'_, '_, 'info, 'info, CanUnstake<'info>>,
        pass_mints: Vec<Pubkey>,
    ) -> Result<Vec<Pubkey>> {
        instructions::can_unstake(ctx, pass_mints)
    }

    pub fn stakers_count(ctx: Context<StakersCount>) -> Result<u64> {
        instructions::stakers_count(ctx)
    }

    pub fn is_staker(ctx: Context<IsStaker>, staker: Pubkey) -> Result<bool> {
        instructions::is_staker(ctx, staker)
    }

    pub fn next_payout_balance(ctx: Context<NextPayoutBalance>) -> Result<u64> {
        instructions::next_payout_balance(ctx)
    }

    pub fn claimable_balance(ctx: Context<ClaimableBalance>, staker: Pubkey) -> Result<u64> {
        instructions::claimable_balance(ctx, staker)
    }
}
