use crate::error::ErrorCode;
use crate::instructions::{
    check_pass_mint_account, check_registry_open, check_stake_eligibility, in_pass_collection,
};
use crate::states::*;
use crate::utils::*;
use crate::{MAX_BULK_PASSES, PASS_VAULT_SEED};
use anchor_lang::prelude::*;
use anchor_spl::metadata::MetadataAccount;
use anchor_spl::token_interface::spl_token_2022::state::Account as SplTokenAccount;
use anchor_spl::token_interface::{TokenAccount, TokenInterface};

/// Remaining accounts supplied for each pass, in this order:
/// `pass_mint`, `pass_metadata`, `owner_pass_token` (mut), `pass_vault`
/// (mut), `stake_record` (mut).
pub const STAKE_BULK_ACCOUNTS_PER_PASS: usize = 5;

/// Accounts required to stake several passes at once.
///
/// Per-pass accounts travel in `remaining_accounts`; see
/// `STAKE_BULK_ACCOUNTS_PER_PASS`.
#[derive(Accounts)]
pub struct StakeBulk<'info> {
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

    pub system_program: Program<'info, System>,
}

/// Per-pass accounts kept for the write and transfer steps.
struct PassAccounts<'info> {
    mint_info: &'info AccountInfo<'info>,
    token_info: &'info AccountInfo<'info>,
    vault_info: &'info AccountInfo<'info>,
    vault_bump: u8,
    record_info: &'info AccountInfo<'info>,
    record_exists: bool,
}

/// Decoded state of one pass in a bulk stake.
pub(crate) struct StakeCandidate {
    pub mint: Pubkey,
    pub in_collection: bool,
    pub token: SplTokenAccount,
    pub vault_amount: u64,
    pub record_bump: u8,
    pub record: StakeRecord,
}

/// Checks every candidate, then opens their records and counts them for
/// `staker`. Nothing is modified unless every candidate passes.
pub(crate) fn stake_passes(
    config: &GlobalConfig,
    staker: Pubkey,
    authority: &Pubkey,
    now: i64,
    candidates: &mut [StakeCandidate],
    staker_info: &mut StakerInfo,
    directory: &mut StakerDirectory,
) -> Result<()> {
    for candidate in candidates.iter() {
        check_stake_eligibility(
            &staker,
            &candidate.mint,
            candidate.in_collection,
            &candidate.token,
            &candidate.record,
            now,
        )?;
        require!(
            is_approved(&candidate.token, authority),
            ErrorCode::NotApproved
        );
        require!(candidate.vault_amount == 0, ErrorCode::OnlyFromDirectStake);
    }

    let lock_expiry = config.lock_expiry_from(now)?;
    for candidate in candidates.iter_mut() {
        candidate
            .record
            .open(candidate.mint, candidate.record_bump, staker, lock_expiry);
        let became_active = staker_info.add_stake()?;
        directory.record_stake(staker, became_active)?;
    }
    Ok(())
}

/// Rejects empty, oversized and duplicated batches and checks that the
/// right number of per-pass accounts came along.
pub(crate) fn check_batch(
    pass_mints: &[Pubkey],
    remaining: usize,
    accounts_per_pass: usize,
) -> Result<()> {
    require!(!pass_mints.is_empty(), ErrorCode::InvalidParam);
    require!(pass_mints.len() <= MAX_BULK_PASSES, ErrorCode::TooManyPasses);
    for (i, mint) in pass_mints.iter().enumerate() {
        require!(!pass_mints[..i].contains(mint), ErrorCode::DuplicatePass);
    }
    require!(
        remaining >= pass_mints.len() * accounts_per_pass,
        ErrorCode::MissingRemainingAccount
    );
    Ok(())
}

/// Stakes every pass in `pass_mints`, or none of them.
///
/// Steps:
/// 1) Batch shape and registry gates.
/// 2) Decode every pass's accounts.
/// 3) Check every pass (collection, holding, lock, approval, vault), then
///    open records and update the staker and directory counters.
/// 4) Create missing records and vaults and write the records.
/// 5) Pull all passes into custody.
pub fn stake_bulk<'info>(
    ctx: Context<'_, '_, 'info, 'info, StakeBulk<'info>>,
    pass_mints: Vec<Pubkey>,
) -> Result<()> {
    let staker = ctx.accounts.owner.key();
    let authority = ctx.accounts.authority.key();
    let token_program = ctx.accounts.token_program.key();
    let now = Clock::get()?.unix_timestamp;

    // --- 1) Batch and registry gates ---
    check_batch(
        &pass_mints,
        ctx.remaining_accounts.len(),
        STAKE_BULK_ACCOUNTS_PER_PASS,
    )?;
    check_registry_open(&ctx.accounts.global_config, &ctx.accounts.payout_ledger)?;

    // --- 2) Decode ---
    let mut passes: Vec<PassAccounts<'info>> = Vec::with_capacity(pass_mints.len());
    let mut candidates: Vec<StakeCandidate> = Vec::with_capacity(pass_mints.len());
    for (mint, accounts) in pass_mints
        .iter()
        .zip(ctx.remaining_accounts.chunks(STAKE_BULK_ACCOUNTS_PER_PASS))
    {
        let [mint_info, metadata_info, token_info, vault_info, record_info] = accounts else {
            return err!(ErrorCode::MissingRemainingAccount);
        };

        require_keys_eq!(*mint_info.owner, token_program, ErrorCode::InvalidPassMint);
        check_pass_mint_account(mint_info, mint)?;

        let metadata = Account::<MetadataAccount>::try_from(metadata_info)?;
        let token = InterfaceAccount::<TokenAccount>::try_from(token_info)?;
        let record = load_stake_record(record_info, mint)?;
        let (_, record_bump) = stake_record_address(mint);

        let (vault_address, vault_bump) = pass_vault_address(mint);
        require_keys_eq!(*vault_info.key, vault_address, ErrorCode::InvalidPassAccount);
        let vault_amount = if vault_info.data_is_empty() {
            0
        } else {
            InterfaceAccount::<TokenAccount>::try_from(vault_info)?.amount
        };

        passes.push(PassAccounts {
            mint_info,
            token_info,
            vault_info,
            vault_bump,
            record_info,
            record_exists: record.is_some(),
        });
        candidates.push(StakeCandidate {
            mint: *mint,
            in_collection: in_pass_collection(&ctx.accounts.global_config, mint, &metadata),
            token: SplTokenAccount::clone(&token),
            vault_amount,
            record_bump,
            record: record.unwrap_or_default(),
        });
    }

    // --- 3) Checks, then state ---
    stake_passes(
        &ctx.accounts.global_config,
        staker,
        &authority,
        now,
        &mut candidates,
        &mut ctx.accounts.staker_info,
        &mut ctx.accounts.staker_directory,
    )?;
    ctx.accounts
        .staker_info
        .init_if_empty(staker, ctx.bumps.staker_info);

    // --- 4) Accounts ---
    let payer = ctx.accounts.owner.to_account_info();
    let system_program = ctx.accounts.system_program.to_account_info();
    for (pass, candidate) in passes.iter().zip(candidates.iter()) {
        if !pass.record_exists {
            create_pda_account(
                &payer,
                pass.record_info,
                &system_program,
                StakeRecord::LEN,
                &crate::id(),
                &[
                    STAKE_RECORD_SEED.as_bytes(),
                    candidate.mint.as_ref(),
                    &[candidate.record_bump],
                ],
            )?;
        }
        store_program_account(pass.record_info, &candidate.record)?;

        if pass.vault_info.data_is_empty() {
            create_pda_account(
                &payer,
                pass.vault_info,
                &system_program,
                pass_vault_space(pass.mint_info)?,
                &token_program,
                &[
                    PASS_VAULT_SEED.as_bytes(),
                    candidate.mint.as_ref(),
                    &[pass.vault_bump],
                ],
            )?;
            initialize_pass_vault(
                pass.vault_info.clone(),
                pass.mint_info.clone(),
                ctx.accounts.authority.to_account_info(),
                ctx.accounts.token_program.to_account_info(),
            )?;
        }
    }

    // --- 5) Custody transfers ---
    for (pass, candidate) in passes.iter().zip(candidates.iter()) {
        transfer_pass(
            ctx.accounts.authority.to_account_info(),
            pass.token_info.clone(),
            pass.vault_info.clone(),
            pass.mint_info.clone(),
            ctx.accounts.token_program.to_account_info(),
            &[&[crate::AUTH_SEED.as_bytes(), &[ctx.bumps.authority]]],
        )?;
        emit!(Staked {
            staker,
            mint: candidate.mint,
        });
    }

    msg!("staked {} passes for {}", pass_mints.len(), staker);
    emit!(StakedBulk {
        staker,
        mints: pass_mints,
    });
    Ok(())
}
