use crate::error::ErrorCode;
use crate::states::*;
use crate::utils::deposit_lamports;
use crate::PAYOUT_VAULT_SEED;
use anchor_lang::prelude::*;

/// Accounts for an allow-listed revenue source pushing lamports into the
/// pending payout balance.
#[derive(Accounts)]
pub struct ReceivePayout<'info> {
    #[account(
        mut,
        constraint = allow_list.is_allowed(&source.key()) @ ErrorCode::PayoutFail
    )]
    pub source: Signer<'info>,

    #[account(
        seeds = [ALLOW_LIST_SEED.as_bytes()],
        bump = allow_list.bump,
    )]
    pub allow_list: Box<Account<'info, AllowList>>,

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

pub fn receive_payout(ctx: Context<ReceivePayout>, amount: u64) -> Result<()> {
    ctx.accounts.payout_ledger.receive(amount)?;

    deposit_lamports(
        ctx.accounts.source.to_account_info(),
        ctx.accounts.payout_vault.to_account_info(),
        ctx.accounts.system_program.to_account_info(),
        amount,
    )?;

    emit!(PayoutReceived {
        source: ctx.accounts.source.key(),
        amount,
    });
    Ok(())
}
