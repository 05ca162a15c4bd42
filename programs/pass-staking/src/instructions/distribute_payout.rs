use crate::error::ErrorCode;
use crate::states::*;
use anchor_lang::prelude::*;

/// Accounts for running (or continuing) a distribution cycle.
///
/// The `StakerInfo` accounts to credit travel in `remaining_accounts`
/// (writable), in directory order starting at the ledger cursor. A staker
/// set too large for one transaction is split over several calls; the
/// cycle closes on the call that credits the last staker.
#[derive(Accounts)]
pub struct DistributePayout<'info> {
    #[account(
        constraint = global_config.is_admin(&operator.key()) @ ErrorCode::InvalidOwner
    )]
    pub operator: Signer<'info>,

    #[account(
        seeds = [GLOBAL_CONFIG_SEED.as_bytes()],
        bump = global_config.bump,
    )]
    pub global_config: Box<Account<'info, GlobalConfig>>,

    #[account(
        seeds = [STAKER_DIRECTORY_SEED.as_bytes()],
        bump = staker_directory.bump,
    )]
    pub staker_directory: Box<Account<'info, StakerDirectory>>,

    #[account(
        mut,
        seeds = [PAYOUT_LEDGER_SEED.as_bytes()],
        bump = payout_ledger.bump,
    )]
    pub payout_ledger: Box<Account<'info, PayoutLedger>>,
}

/// Steps:
/// 1) Open a cycle if none is running: freeze `pending / total_staked_token`
///    as the per-pass rate, remainder to residual.
/// 2) Credit each supplied staker at the cursor.
/// 3) Close the cycle once every staker in the snapshot is credited.
pub fn distribute_payout<'info>(
    ctx: Context<'_, '_, 'info, 'info, DistributePayout<'info>>,
) -> Result<()> {
    let directory = &ctx.accounts.staker_directory;
    let ledger = &mut ctx.accounts.payout_ledger;

    // --- 1) Open ---
    if !ledger.is_distributing() {
        ledger.open_cycle(
            ctx.accounts.operator.key(),
            directory.total_staked_token,
            directory.stakers_count(),
        )?;
        msg!(
            "distribution opened: amount {}, rate {} per pass",
            ledger.cycle.amount,
            ledger.cycle.rate_per_token
        );
    }

    // --- 2) Credit page ---
    for info in ctx.remaining_accounts.iter() {
        let expected = *directory
            .stakers
            .get(ledger.cursor())
            .ok_or(ErrorCode::DirectoryMismatch)?;
        require!(info.is_writable, ErrorCode::DirectoryMismatch);

        let mut staker_info = Account::<StakerInfo>::try_from(info)?;
        require_keys_eq!(staker_info.owner, expected, ErrorCode::DirectoryMismatch);

        ledger.credit_next(&mut staker_info)?;
        staker_info.exit(&crate::id())?;
    }

    // --- 3) Close ---
    if ledger.is_cycle_complete() {
        let cycle = ledger.close_cycle()?;
        msg!("distribution {} closed", ledger.cycle_count);
        emit!(PayoutDistributed {
            operator: cycle.operator,
            amount: cycle.amount,
            staker_count: cycle.staker_count as u64,
            total_staked_token: cycle.total_staked_token,
            rate_per_token: cycle.rate_per_token,
        });
    } else {
        msg!(
            "distribution progress: {}/{}",
            ledger.cycle.cursor,
            ledger.cycle.staker_count
        );
    }
    Ok(())
}
