use crate::states::*;
use crate::utils::withdraw_lamports;
use crate::PAYOUT_VAULT_SEED;
use anchor_lang::prelude::*;

/// Accounts for a staker pulling their credited payouts.
#[derive(Accounts)]
pub struct ClaimPayout<'info> {
    #[account(mut)]
    pub owner: Signer<'info>,

    #[account(
        mut,
        seeds = [STAKER_INFO_SEED.as_bytes(), owner.key().as_ref()],
        bump = staker_info.bump,
    )]
    pub staker_info: Box<Account<'info, StakerInfo>>,

    #[account(
        mut,
        seeds = [PAYOUT_LEDGER_SEED.as_bytes()],
        bump = payout_ledger.bump,
    )]
    pub payout_ledger: Box<Account<'info, PayoutLedger>>,

    #[account(
        mut,
        seeds = [PAYOUT_VAULT_SEED.as_bytes()],
        bump,
    )]
    pub payout_vault: SystemAccount<'info>,

    pub system_program: Program<'info, System>,
}

/// Pays out the whole claimable balance. The balance is zeroed before the
/// lamports move.
pub fn claim_payout(ctx: Context<ClaimPayout>) -> Result<()> {
    let amount = ctx.accounts.staker_info.take_claimable()?;
    ctx.accounts.payout_ledger.record_claim(amount)?;

    withdraw_lamports(
        ctx.accounts.payout_vault.to_account_info(),
        ctx.accounts.owner.to_account_info(),
        ctx.accounts.system_program.to_account_info(),
        amount,
        &[&[PAYOUT_VAULT_SEED.as_bytes(), &[ctx.bumps.payout_vault]]],
    )?;

    emit!(PayoutClaimed {
        staker: ctx.accounts.owner.key(),
        amount,
    });
    Ok(())
}
