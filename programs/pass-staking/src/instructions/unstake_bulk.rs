use crate::error::ErrorCode;
use crate::instructions::{check_batch, check_registry_open, check_unstake_record, release_pass};
use crate::states::*;
use crate::utils::*;
use anchor_lang::prelude::*;
use anchor_spl::token_interface::{TokenAccount, TokenInterface};

/// Remaining accounts supplied for each pass, in this order:
/// `pass_mint`, `owner_pass_token` (mut, must already exist),
/// `pass_vault` (mut), `stake_record` (mut).
pub const UNSTAKE_BULK_ACCOUNTS_PER_PASS: usize = 4;

#[derive(Accounts)]
pub struct UnstakeBulk<'info> {
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

    /// Created on demand so that a wallet with nothing staked gets
    /// `NotTokenOwner` from the per-pass checks.
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
    mint: Pubkey,
    mint_info: &'info AccountInfo<'info>,
    token_info: &'info AccountInfo<'info>,
    vault_info: &'info AccountInfo<'info>,
    record_info: &'info AccountInfo<'info>,
}

/// Checks every record, then releases them and drops them from `staker`'s
/// and the directory's counts. Nothing is modified unless every record
/// passes.
pub(crate) fn unstake_passes(
    staker: &Pubkey,
    now: i64,
    lock_expiry: i64,
    records: Vec<Option<StakeRecord>>,
    staker_info: &mut StakerInfo,
    directory: &mut StakerDirectory,
) -> Result<Vec<StakeRecord>> {
    let mut released = records
        .into_iter()
        .map(|record| check_unstake_record(record, staker, now))
        .collect::<Result<Vec<_>>>()?;
    for record in released.iter_mut() {
        release_pass(record, lock_expiry, staker, staker_info, directory)?;
    }
    Ok(released)
}

/// Unstakes every pass in `pass_mints`, or none of them.
///
/// Every record is checked before any is released; returns and vault
/// closes run last.
pub fn unstake_bulk<'info>(
    ctx: Context<'_, '_, 'info, 'info, UnstakeBulk<'info>>,
    pass_mints: Vec<Pubkey>,
) -> Result<()> {
    let staker = ctx.accounts.owner.key();
    let token_program = ctx.accounts.token_program.key();
    let now = Clock::get()?.unix_timestamp;

    // --- 1) Batch and registry gates ---
    check_batch(
        &pass_mints,
        ctx.remaining_accounts.len(),
        UNSTAKE_BULK_ACCOUNTS_PER_PASS,
    )?;
    check_registry_open(&ctx.accounts.global_config, &ctx.accounts.payout_ledger)?;

    // --- 2) Decode ---
    let mut passes: Vec<PassAccounts<'info>> = Vec::with_capacity(pass_mints.len());
    let mut records = Vec::with_capacity(pass_mints.len());
    for (mint, accounts) in pass_mints
        .iter()
        .zip(ctx.remaining_accounts.chunks(UNSTAKE_BULK_ACCOUNTS_PER_PASS))
    {
        let [mint_info, token_info, vault_info, record_info] = accounts else {
            return err!(ErrorCode::MissingRemainingAccount);
        };

        require_keys_eq!(*mint_info.key, *mint, ErrorCode::InvalidPassMint);
        require_keys_eq!(*mint_info.owner, token_program, ErrorCode::InvalidPassMint);
        records.push(load_stake_record(record_info, mint)?);

        let token = InterfaceAccount::<TokenAccount>::try_from(token_info)?;
        require!(
            token.owner == staker && token.mint == *mint,
            ErrorCode::InvalidPassAccount
        );
        let (vault_address, _) = pass_vault_address(mint);
        require_keys_eq!(*vault_info.key, vault_address, ErrorCode::InvalidPassAccount);

        passes.push(PassAccounts {
            mint: *mint,
            mint_info,
            token_info,
            vault_info,
            record_info,
        });
    }

    // --- 3) Checks, then state ---
    let lock_expiry = ctx.accounts.global_config.lock_expiry_from(now)?;
    let released = unstake_passes(
        &staker,
        now,
        lock_expiry,
        records,
        &mut ctx.accounts.staker_info,
        &mut ctx.accounts.staker_directory,
    )?;
    for (pass, record) in passes.iter().zip(released.iter()) {
        store_program_account(pass.record_info, record)?;
    }

    // --- 4) Return passes and close vaults ---
    let signer_seeds: &[&[&[u8]]] = &[&[crate::AUTH_SEED.as_bytes(), &[ctx.bumps.authority]]];
    for pass in passes.iter() {
        transfer_pass(
            ctx.accounts.authority.to_account_info(),
            pass.vault_info.clone(),
            pass.token_info.clone(),
            pass.mint_info.clone(),
            ctx.accounts.token_program.to_account_info(),
            signer_seeds,
        )?;
        close_pass_vault(
            ctx.accounts.authority.to_account_info(),
            pass.vault_info.clone(),
            ctx.accounts.owner.to_account_info(),
            ctx.accounts.token_program.to_account_info(),
            signer_seeds,
        )?;
        emit!(Unstaked {
            staker,
            mint: pass.mint,
        });
    }

    msg!("unstaked {} passes for {}", pass_mints.len(), staker);
    emit!(UnstakedBulk {
        staker,
        mints: pass_mints,
    });
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::DEFAULT_LOCK_PERIOD as LOCK;

    /// `staker` holding one staked pass per entry of `staked_at`.
    fn staked(
        staker: Pubkey,
        staked_at: &[i64],
    ) -> (Vec<Option<StakeRecord>>, StakerInfo, StakerDirectory) {
        let mut info = StakerInfo::default();
        let mut directory = StakerDirectory::default();
        let records = staked_at
            .iter()
            .map(|at| {
                let mut record = StakeRecord::default();
                record.open(Pubkey::new_unique(), 255, staker, at + LOCK);
                let became_active = info.add_stake().unwrap();
                directory.record_stake(staker, became_active).unwrap();
                Some(record)
            })
            .collect();
        (records, info, directory)
    }

    #[test]
    fn expired_batch_is_released() {
        let staker = Pubkey::new_unique();
        let (records, mut info, mut directory) = staked(staker, &[0, 0, 0]);

        let released =
            unstake_passes(&staker, LOCK, 2 * LOCK, records, &mut info, &mut directory).unwrap();

        assert!(released.iter().all(|r| !r.in_custody && r.lock_expiry == 2 * LOCK));
        assert_eq!(info.staked_count, 0);
        assert_eq!(directory.stakers_count(), 0);
        assert_eq!(directory.total_staked_token, 0);
    }

    #[test]
    fn one_locked_pass_leaves_the_batch_untouched() {
        let staker = Pubkey::new_unique();
        let (records, mut info, mut directory) = staked(staker, &[0, 0, 0, LOCK / 2]);
        let (info_before, directory_before) = (info.clone(), directory.clone());

        assert_eq!(
            unstake_passes(&staker, LOCK, 2 * LOCK, records, &mut info, &mut directory)
                .unwrap_err(),
            anchor_lang::error::Error::from(ErrorCode::TokenLocked)
        );
        assert_eq!(info, info_before);
        assert_eq!(directory, directory_before);
    }

    #[test]
    fn wallet_without_stakes_is_not_the_owner() {
        let staker = Pubkey::new_unique();
        let (records, _, _) = staked(Pubkey::new_unique(), &[0, 0]);
        let mut info = StakerInfo::default();
        let mut directory = StakerDirectory::default();

        assert_eq!(
            unstake_passes(&staker, LOCK, 2 * LOCK, records, &mut info, &mut directory)
                .unwrap_err(),
            anchor_lang::error::Error::from(ErrorCode::NotTokenOwner)
        );
        assert_eq!(
            unstake_passes(&staker, LOCK, 2 * LOCK, vec![None], &mut info, &mut directory)
                .unwrap_err(),
            anchor_lang::error::Error::from(ErrorCode::NotTokenOwner)
        );
    }
}
