use crate::error::ErrorCode;
use crate::states::*;
use anchor_lang::prelude::*;

/// Accounts context for `update_allowed_sources`.
#[derive(Accounts)]
pub struct UpdateAllowedSources<'info> {
    #[account(
        constraint = global_config.is_admin(&owner.key()) @ ErrorCode::InvalidOwner
    )]
    pub owner: Signer<'info>,

    #[account(
        seeds = [GLOBAL_CONFIG_SEED.as_bytes()],
        bump = global_config.bump,
    )]
    pub global_config: Account<'info, GlobalConfig>,

    #[account(
        mut,
        seeds = [ALLOW_LIST_SEED.as_bytes()],
        bump = allow_list.bump,
    )]
    pub allow_list: Box<Account<'info, AllowList>>,
}

/// Grants (`true`) or revokes (`false`) the right to push payouts for each
/// source, pairwise with `flags`. The batch is all-or-nothing.
pub fn update_allowed_sources(
    ctx: Context<UpdateAllowedSources>,
    sources: Vec<Pubkey>,
    flags: Vec<bool>,
) -> Result<()> {
    ctx.accounts.allow_list.apply(&sources, &flags)?;

    let admin = ctx.accounts.owner.key();
    for (source, allowed) in sources.into_iter().zip(flags) {
        emit!(AllowedSourceUpdated {
            admin,
            source,
            allowed,
        });
    }
    Ok(())
}
