use crate::error::ErrorCode;
use crate::states::*;
use crate::utils::{holds_pass, in_verified_collection, is_approved, is_pass_mint, transfer_pass};
use crate::PASS_VAULT_SEED;
use anchor_lang::prelude::*;
use anchor_spl::metadata::{Metadata, MetadataAccount};
use anchor_spl::token_interface::spl_token_2022::state::Account as SplTokenAccount;
use anchor_spl::token_interface::{Mint, TokenAccount, TokenInterface};

/// Accounts required to stake a single pass.
///
/// Flow summary:
/// 1) Reject while paused or while a distribution cycle is running.
/// 2) Check collection membership, holding, lock and delegate approval.
/// 3) Record custody, bump the staker's count and the directory.
/// 4) Pull the pass into its vault using the authority PDA as delegate.
#[derive(Accounts)]
pub struct Stake<'info> {
    /// Staker; pays for any account created on first use.
    #[account(mut)]
    pub owner: Signer<'info>,

    #[account(
        seeds = [GLOBAL_CONFIG_SEED.as_bytes()],
        bump = global_config.bump,
    )]
    pub global_config: Box<Account<'info, GlobalConfig>>,

    /// Program authority PDA: delegate on the staker's token account and
    /// owner of every pass vault.
    ///
    /// CHECK: PDA derivation enforced by seeds; used only as a signer.
    #[account(
        seeds = [crate::AUTH_SEED.as_bytes()],
        bump,
    )]
    pub authority: UncheckedAccount<'info>,

    #[account(
        mint::token_program = token_program,
        constraint = is_pass_mint(pass_mint.decimals, pass_mint.supply) @ ErrorCode::InvalidPassMint,
    )]
    pub pass_mint: Box<InterfaceAccount<'info, Mint>>,

    /// Metaplex metadata PDA of `pass_mint`.
    #[account(
        seeds = [
            b"metadata",
            metadata_program.key().as_ref(),
            pass_mint.key().as_ref(),
        ],
        seeds::program = metadata_program.key(),
        bump,
    )]
    pub pass_metadata: Box<Account<'info, MetadataAccount>>,

    /// Staker's token account currently holding the pass.
    #[account(mut)]
    pub owner_pass_token: Box<InterfaceAccount<'info, TokenAccount>>,

    /// Custody vault for this pass, recreated on every stake.
    #[account(
        init_if_needed,
        seeds = [PASS_VAULT_SEED.as_bytes(), pass_mint.key().as_ref()],
        bump,
        payer = owner,
        token::mint = pass_mint,
        token::authority = authority,
        token::token_program = token_program,
    )]
    pub pass_vault: Box<InterfaceAccount<'info, TokenAccount>>,

    #[account(
        init_if_needed,
        seeds = [STAKE_RECORD_SEED.as_bytes(), pass_mint.key().as_ref()],
        bump,
        payer = owner,
        space = StakeRecord::LEN
    )]
    pub stake_record: Box<Account<'info, StakeRecord>>,

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

    pub metadata_program: Program<'info, Metadata>,

    pub token_program: Interface<'info, TokenInterface>,

    pub system_program: Program<'info, System>,
}

/// `metadata` is the metadata of `mint` and places it in the configured
/// verified collection.
pub(crate) fn in_pass_collection(
    config: &GlobalConfig,
    mint: &Pubkey,
    metadata: &MetadataAccount,
) -> bool {
    metadata.mint == *mint
        && in_verified_collection(metadata.collection.as_ref(), &config.pass_collection)
}

/// Collection, holding and lock checks shared by every stake path and by
/// `can_stake`. Delegate approval is checked separately.
pub(crate) fn check_stake_eligibility(
    staker: &Pubkey,
    mint: &Pubkey,
    in_collection: bool,
    token: &SplTokenAccount,
    record: &StakeRecord,
    now: i64,
) -> Result<()> {
    require!(in_collection, ErrorCode::InvalidPassCollection);
    record.check_stake(staker, holds_pass(token, staker, mint), now)
}

/// Loads the mint account supplied for `mint` and checks that it is a pass.
pub(crate) fn check_pass_mint_account<'info>(
    mint_info: &'info AccountInfo<'info>,
    mint: &Pubkey,
) -> Result<InterfaceAccount<'info, Mint>> {
    require_keys_eq!(*mint_info.key, *mint, ErrorCode::InvalidPassMint);
    let pass_mint = InterfaceAccount::<Mint>::try_from(mint_info)?;
    require!(
        is_pass_mint(pass_mint.decimals, pass_mint.supply),
        ErrorCode::InvalidPassMint
    );
    Ok(pass_mint)
}

/// Pool-wide gates applied before any per-pass work.
pub(crate) fn check_registry_open(config: &GlobalConfig, ledger: &PayoutLedger) -> Result<()> {
    require!(!config.paused, ErrorCode::Paused);
    ledger.require_idle()
}

pub fn stake(ctx: Context<Stake>) -> Result<()> {
    let staker = ctx.accounts.owner.key();
    let mint = ctx.accounts.pass_mint.key();
    let now = Clock::get()?.unix_timestamp;

    // --- 1) Registry gates ---
    check_registry_open(&ctx.accounts.global_config, &ctx.accounts.payout_ledger)?;

    // --- 2) Pass checks ---
    check_stake_eligibility(
        &staker,
        &mint,
        in_pass_collection(
            &ctx.accounts.global_config,
            &mint,
            &ctx.accounts.pass_metadata,
        ),
        &ctx.accounts.owner_pass_token,
        &ctx.accounts.stake_record,
        now,
    )?;
    require!(
        is_approved(&ctx.accounts.owner_pass_token, &ctx.accounts.authority.key()),
        ErrorCode::NotApproved
    );
    require!(
        ctx.accounts.pass_vault.amount == 0,
        ErrorCode::OnlyFromDirectStake
    );

    // --- 3) Effects ---
    let lock_expiry = ctx.accounts.global_config.lock_expiry_from(now)?;
    ctx.accounts
        .stake_record
        .open(mint, ctx.bumps.stake_record, staker, lock_expiry);

    let staker_info = &mut ctx.accounts.staker_info;
    staker_info.init_if_empty(staker, ctx.bumps.staker_info);
    let became_active = staker_info.add_stake()?;
    ctx.accounts
        .staker_directory
        .record_stake(staker, became_active)?;

    // --- 4) Custody transfer ---
    transfer_pass(
        ctx.accounts.authority.to_account_info(),
        ctx.accounts.owner_pass_token.to_account_info(),
        ctx.accounts.pass_vault.to_account_info(),
        ctx.accounts.pass_mint.to_account_info(),
        ctx.accounts.token_program.to_account_info(),
        &[&[crate::AUTH_SEED.as_bytes(), &[ctx.bumps.authority]]],
    )?;

    #[cfg(feature = "enable-log")]
    msg!("staked pass {} for {} until {}", mint, staker, lock_expiry);

    emit!(Staked { staker, mint });
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use anchor_lang::solana_program::program_pack::Pack;
    use anchor_spl::token_interface::spl_token_2022;

    fn packed_mint(decimals: u8, supply: u64) -> Vec<u8> {
        let mint = spl_token_2022::state::Mint {
            decimals,
            supply,
            is_initialized: true,
            ..Default::default()
        };
        let mut data = vec![0u8; spl_token_2022::state::Mint::LEN];
        spl_token_2022::state::Mint::pack(mint, &mut data).unwrap();
        data
    }

    #[test]
    fn mint_account_must_be_a_single_unit_nft() {
        let key = Pubkey::new_unique();
        let owner = spl_token_2022::ID;

        let mut lamports = 1_000_000;
        let mut data = packed_mint(0, 1);
        let info = AccountInfo::new(&key, false, false, &mut lamports, &mut data, &owner, false, 0);
        assert!(check_pass_mint_account(&info, &key).is_ok());
        assert_eq!(
            check_pass_mint_account(&info, &Pubkey::new_unique()).unwrap_err(),
            anchor_lang::error::Error::from(ErrorCode::InvalidPassMint)
        );

        let mut lamports = 1_000_000;
        let mut data = packed_mint(6, 1_000);
        let fungible = AccountInfo::new(&key, false, false, &mut lamports, &mut data, &owner, false, 0);
        assert_eq!(
            check_pass_mint_account(&fungible, &key).unwrap_err(),
            anchor_lang::error::Error::from(ErrorCode::InvalidPassMint)
        );
    }

    #[test]
    fn collection_is_checked_before_holding() {
        let staker = Pubkey::new_unique();
        let mint = Pubkey::new_unique();
        let token = SplTokenAccount {
            mint,
            owner: Pubkey::new_unique(),
            amount: 1,
            ..Default::default()
        };
        let record = StakeRecord::default();

        assert_eq!(
            check_stake_eligibility(&staker, &mint, false, &token, &record, 0).unwrap_err(),
            anchor_lang::error::Error::from(ErrorCode::InvalidPassCollection)
        );
        assert_eq!(
            check_stake_eligibility(&staker, &mint, true, &token, &record, 0).unwrap_err(),
            anchor_lang::error::Error::from(ErrorCode::TokenNotOwned)
        );
    }
}
