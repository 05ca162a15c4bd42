use crate::error::ErrorCode;
use crate::states::*;
use crate::utils::withdraw_lamports;
use crate::PAYOUT_VAULT_SEED;
use anchor_lang::prelude::*;

/// Accounts for the admin sweeping distribution remainders.
#[derive(Accounts)]
pub struct WithdrawResidual<'info> {
    #[account(
        mut,
        constraint = global_config.is_admin(&owner.key()) @ ErrorCode::InvalidOwner
    )]
    pub owner: Signer<'info>,

    #[account(
        seeds = [GLOBAL_CONFIG_SEED.as_bytes()],
        bump = global_config.bump,
    )]
    pub global_config: Box<Account<'info, GlobalConfig>>,

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

pub fn withdraw_residual(ctx: Context<WithdrawResidual>) -> Result<()> {
    let amount = ctx.accounts.payout_ledger.take_residual()?;

    withdraw_lamports(
        ctx.accounts.payout_vault.to_account_info(),
        ctx.accounts.owner.to_account_info(),
        ctx.accounts.system_program.to_account_info(),
        amount,
        &[&[PAYOUT_VAULT_SEED.as_bytes(), &[ctx.bumps.payout_vault]]],
    )?;

    emit!(ResidualWithdrawn {
        admin: ctx.accounts.owner.key(),
        amount,
    });
    Ok(())
}
