use crate::error::ErrorCode;
use crate::states::*;
use crate::utils::deposit_lamports;
use crate::PAYOUT_VAULT_SEED;
use anchor_lang::prelude::*;
use std::ops::DerefMut;

/// Accounts context for `initialize`.
///
/// This handler:
/// - Creates the global configuration, staker directory, payout ledger and
///   revenue-source allow-list.
/// - Funds the system-owned payout vault PDA up to its rent-exempt minimum
///   so later payouts can drain it to exactly that floor.
#[derive(Accounts)]
pub struct Initialize<'info> {
    /// Deployer signer (must match the program-level admin id).
    #[account(
        mut,
        address = crate::admin::id() @ ErrorCode::InvalidOwner
    )]
    pub owner: Signer<'info>,

    #[account(
        init,
        seeds = [GLOBAL_CONFIG_SEED.as_bytes()],
        bump,
        payer = owner,
        space = GlobalConfig::LEN
    )]
    pub global_config: Account<'info, GlobalConfig>,

    #[account(
        init,
        seeds = [STAKER_DIRECTORY_SEED.as_bytes()],
        bump,
        payer = owner,
        space = StakerDirectory::LEN
    )]
    pub staker_directory: Box<Account<'info, StakerDirectory>>,

    #[account(
        init,
        seeds = [PAYOUT_LEDGER_SEED.as_bytes()],
        bump,
        payer = owner,
        space = PayoutLedger::LEN
    )]
    pub payout_ledger: Box<Account<'info, PayoutLedger>>,

    #[account(
        init,
        seeds = [ALLOW_LIST_SEED.as_bytes()],
        bump,
        payer = owner,
        space = AllowList::LEN
    )]
    pub allow_list: Box<Account<'info, AllowList>>,

    /// System-owned PDA that holds payout lamports.
    #[account(
        mut,
        seeds = [PAYOUT_VAULT_SEED.as_bytes()],
        bump,
    )]
    pub payout_vault: SystemAccount<'info>,

    pub system_program: Program<'info, System>,
}

/// Writes initial protocol state.
///
/// Steps:
/// 1. Validate parameters.
/// 2. Write `global_config` and the bumps of the aggregate accounts.
/// 3. Fund the payout vault to its rent-exempt floor.
pub fn initialize(
    ctx: Context<Initialize>,
    admin: Pubkey,
    pass_collection: Pubkey,
    lock_period: i64,
) -> Result<()> {
    // --- 1) Parameters ---
    require_keys_neq!(admin, Pubkey::default(), ErrorCode::InvalidParam);
    require_keys_neq!(pass_collection, Pubkey::default(), ErrorCode::InvalidParam);
    require!(lock_period > 0, ErrorCode::InvalidParam);

    // --- 2) State ---
    let global_config = ctx.accounts.global_config.deref_mut();
    global_config.bump = ctx.bumps.global_config;
    global_config.admin = admin;
    global_config.pass_collection = pass_collection;
    global_config.payout_vault = ctx.accounts.payout_vault.key();
    global_config.lock_period = lock_period;
    global_config.paused = false;

    ctx.accounts.staker_directory.bump = ctx.bumps.staker_directory;
    ctx.accounts.payout_ledger.bump = ctx.bumps.payout_ledger;
    ctx.accounts.allow_list.bump = ctx.bumps.allow_list;
    msg!("Global Config initialized");

    // --- 3) Payout vault rent ---
    let rent_floor = Rent::get()?.minimum_balance(0);
    let missing = rent_floor.saturating_sub(ctx.accounts.payout_vault.lamports());
    if missing > 0 {
        deposit_lamports(
            ctx.accounts.owner.to_account_info(),
            ctx.accounts.payout_vault.to_account_info(),
            ctx.accounts.system_program.to_account_info(),
            missing,
        )?;
    }

    emit!(ConfigInitialized {
        admin,
        pass_collection,
        payout_vault: ctx.accounts.payout_vault.key(),
        lock_period,
    });
    Ok(())
}
