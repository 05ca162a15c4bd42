use crate::error::ErrorCode;
use crate::instructions::check_registry_open;
use crate::states::*;
use crate::utils::{close_pass_vault, load_stake_record, store_program_account, transfer_pass};
use crate::PASS_VAULT_SEED;
use anchor_lang::prelude::*;
use anchor_spl::associated_token::AssociatedToken;
use anchor_spl::token_interface::{Mint, TokenAccount, TokenInterface};

/// Accounts required to take a single pass back out of custody.
///
/// Flow summary:
/// 1) Reject while paused or while a distribution cycle is running.
/// 2) Caller must be the recorded staker and the lock must have expired.
/// 3) Release the record (post-unstake lock starts), update counters.
/// 4) Return the pass to the caller's ATA and close the vault.
#[derive(Accounts)]
pub struct Unstake<'info> {
    #[account(mut)]
    pub owner: Signer<'info>,

    #[account(
        seeds = [GLOBAL_CONFIG_SEED.as_bytes()],
        bump = global_config.bump,
    )]
    pub global_config: Box<Account<'info, GlobalConfig>>,

    /// CHECK: PDA derivation enforced by seeds; used only as a signer.
    #[account(
        seeds = [crate::AUTH_SEED.as_bytes()],
        bump,
    )]
    pub authority: UncheckedAccount<'info>,

    #[account(mint::token_program = token_program)]
    pub pass_mint: Box<InterfaceAccount<'info, Mint>>,

    /// Caller's ATA for the pass; created on demand.
    #[account(
        init_if_needed,
        payer = owner,
        associated_token::mint = pass_mint,
        associated_token::authority = owner,
        associated_token::token_program = token_program,
    )]
    pub owner_pass_token: Box<InterfaceAccount<'info, TokenAccount>>,

    /// Custody vault; only exists while the pass is staked.
    ///
    /// CHECK: PDA derivation enforced by seeds; the token program validates
    /// it during transfer and close.
    #[account(
        mut,
        seeds = [PASS_VAULT_SEED.as_bytes(), pass_mint.key().as_ref()],
        bump,
    )]
    pub pass_vault: UncheckedAccount<'info>,

    /// CHECK: address, owner and discriminator checked by `load_stake_record`.
    #[account(mut)]
    pub stake_record: UncheckedAccount<'info>,

    #[account(
        init_if_needed,
        seeds = [STAKER_INFO_SEED.as_bytes(), owner.key().as_ref()],
        bump,
        payer = owner,
        space = StakerInfo::LEN
    )]
    pub staker_info: Box<Account<'info, StakerInfo>>,

    #[account(
        mut,
        seeds = [STAKER_DIRECTORY_SEED.as_bytes()],
        bump = staker_directory.bump,
    )]
    pub staker_directory: Box<Account<'info, StakerDirectory>>,

    #[account(
        seeds = [PAYOUT_LEDGER_SEED.as_bytes()],
        bump = payout_ledger.bump,
    )]
    pub payout_ledger: Box<Account<'info, PayoutLedger>>,

    pub token_program: Interface<'info, TokenInterface>,

    pub associated_token_program: Program<'info, AssociatedToken>,

    pub system_program: Program<'info, System>,
}

/// Checks that `staker` may unstake the pass behind `record` now. A pass
/// that was never staked fails like a pass staked by someone else.
pub(crate) fn check_unstake_record(
    record: Option<StakeRecord>,
    staker: &Pubkey,
    now: i64,
) -> Result<StakeRecord> {
    let record = record.ok_or(ErrorCode::NotTokenOwner)?;
    record.check_unstake(staker, now)?;
    Ok(record)
}

/// Loads the record of `mint` and runs `check_unstake_record` on it.
pub(crate) fn check_unstake_eligibility(
    record_info: &AccountInfo,
    mint: &Pubkey,
    staker: &Pubkey,
    now: i64,
) -> Result<StakeRecord> {
    check_unstake_record(load_stake_record(record_info, mint)?, staker, now)
}

/// State side of an unstake: starts the post-unstake lock and drops one
/// pass from the staker's and the directory's counts.
pub(crate) fn release_pass(
    record: &mut StakeRecord,
    lock_expiry: i64,
    staker: &Pubkey,
    staker_info: &mut StakerInfo,
    directory: &mut StakerDirectory,
) -> Result<()> {
    record.release(lock_expiry);
    let became_inactive = staker_info.remove_stake()?;
    directory.record_unstake(staker, became_inactive)
}

pub fn unstake(ctx: Context<Unstake>) -> Result<()> {
    let staker = ctx.accounts.owner.key();
    let mint = ctx.accounts.pass_mint.key();
    let now = Clock::get()?.unix_timestamp;

    // --- 1) Registry gates ---
    check_registry_open(&ctx.accounts.global_config, &ctx.accounts.payout_ledger)?;

    // --- 2) Ownership and lock ---
    let stake_record_info = ctx.accounts.stake_record.to_account_info();
    let mut record = check_unstake_eligibility(&stake_record_info, &mint, &staker, now)?;

    // --- 3) Effects ---
    let lock_expiry = ctx.accounts.global_config.lock_expiry_from(now)?;
    release_pass(
        &mut record,
        lock_expiry,
        &staker,
        &mut ctx.accounts.staker_info,
        &mut ctx.accounts.staker_directory,
    )?;
    store_program_account(&stake_record_info, &record)?;

    // --- 4) Return pass and close vault ---
    let signer_seeds: &[&[&[u8]]] = &[&[crate::AUTH_SEED.as_bytes(), &[ctx.bumps.authority]]];
    transfer_pass(
        ctx.accounts.authority.to_account_info(),
        ctx.accounts.pass_vault.to_account_info(),
        ctx.accounts.owner_pass_token.to_account_info(),
        ctx.accounts.pass_mint.to_account_info(),
        ctx.accounts.token_program.to_account_info(),
        signer_seeds,
    )?;
    close_pass_vault(
        ctx.accounts.authority.to_account_info(),
        ctx.accounts.pass_vault.to_account_info(),
        ctx.accounts.owner.to_account_info(),
        ctx.accounts.token_program.to_account_info(),
        signer_seeds,
    )?;

    #[cfg(feature = "enable-log")]
    msg!("unstaked pass {} for {}, relock until {}", mint, staker, lock_expiry);

    emit!(Unstaked { staker, mint });
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::DEFAULT_LOCK_PERIOD as LOCK;

    #[test]
    fn release_updates_all_counters() {
        let staker = Pubkey::new_unique();
        let mut record = StakeRecord::default();
        record.open(Pubkey::new_unique(), 255, staker, LOCK);

        let mut info = StakerInfo::default();
        let mut directory = StakerDirectory::default();
        let became_active = info.add_stake().unwrap();
        directory.record_stake(staker, became_active).unwrap();

        release_pass(&mut record, 2 * LOCK, &staker, &mut info, &mut directory).unwrap();

        assert!(!record.in_custody);
        assert_eq!(record.owner, staker);
        assert_eq!(record.lock_expiry, 2 * LOCK);
        assert_eq!(info.staked_count, 0);
        assert_eq!(directory.stakers_count(), 0);
        assert_eq!(directory.total_staked_token, 0);
    }

    #[test]
    fn never_staked_pass_is_not_owned() {
        assert_eq!(
            check_unstake_record(None, &Pubkey::new_unique(), LOCK).unwrap_err(),
            anchor_lang::error::Error::from(ErrorCode::NotTokenOwner)
        );
    }
}
