use crate::error::ErrorCode;
use crate::states::{ConfigUpdated, GlobalConfig, GLOBAL_CONFIG_SEED};
use anchor_lang::prelude::*;

/// Accounts context for the `update_config` instruction.
///
/// Only the current `admin` stored in `global_config` or the program-level
/// admin (`crate::admin::id()`) may update parameters.
#[derive(Accounts)]
pub struct UpdateConfig<'info> {
    #[account(
        constraint = global_config.is_admin(&owner.key()) @ ErrorCode::InvalidOwner
    )]
    pub owner: Signer<'info>,

    #[account(
        mut,
        seeds = [GLOBAL_CONFIG_SEED.as_bytes()],
        bump = global_config.bump,
    )]
    pub global_config: Account<'info, GlobalConfig>,
}

/// Updates one field of the global configuration.
///
/// # Param Mapping
/// - `0`: **Admin change** → new admin Pubkey passed via `remaining_accounts[0]`.
/// - `1`: **paused** → nonzero pauses stake and unstake.
/// - `2`: **lock_period** → seconds, must be positive. Applies to locks
///   started after the update.
///
/// Any other `param` value returns `ErrorCode::InvalidParam`.
pub fn update_config(ctx: Context<UpdateConfig>, param: u8, value: u64) -> Result<()> {
    let global_config = &mut ctx.accounts.global_config;
    match param {
        0 => {
            let new_admin = *ctx
                .remaining_accounts
                .iter()
                .next()
                .ok_or(error!(ErrorCode::MissingRemainingAccount))?
                .key;
            require_keys_neq!(new_admin, Pubkey::default(), ErrorCode::InvalidParam);
            global_config.admin = new_admin;
        }
        1 => {
            global_config.paused = value != 0;
        }
        2 => {
            let lock_period = i64::try_from(value).map_err(|_| error!(ErrorCode::InvalidParam))?;
            require!(lock_period > 0, ErrorCode::InvalidParam);
            global_config.lock_period = lock_period;
        }
        _ => return Err(error!(ErrorCode::InvalidParam)),
    }

    emit!(ConfigUpdated {
        admin: global_config.admin,
        paused: global_config.paused,
        lock_period: global_config.lock_period,
    });
    Ok(())
}
