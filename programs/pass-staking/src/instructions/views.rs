use crate::instructions::{
    check_pass_mint_account, check_stake_eligibility, check_unstake_eligibility,
    in_pass_collection,
};
use crate::states::*;
use crate::utils::{load_program_account, load_stake_record};
use anchor_lang::prelude::*;
use anchor_spl::metadata::MetadataAccount;
use anchor_spl::token_interface::TokenAccount;

//
// Read-only instructions. Clients call them through transaction simulation
// and decode the returned value from the return data.
//

/// Remaining accounts per pass for `can_stake`: `pass_mint`,
/// `owner_pass_token`, `pass_metadata`, `stake_record`.
pub const CAN_STAKE_ACCOUNTS_PER_PASS: usize = 4;

/// Remaining accounts per pass for `can_unstake`: `stake_record`.
pub const CAN_UNSTAKE_ACCOUNTS_PER_PASS: usize = 1;

#[derive(Accounts)]
pub struct CanStake<'info> {
    /// CHECK: only the key is read.
    pub staker: UncheckedAccount<'info>,

    #[account(
        seeds = [GLOBAL_CONFIG_SEED.as_bytes()],
        bump = global_config.bump,
    )]
    pub global_config: Box<Account<'info, GlobalConfig>>,
}

#[derive(Accounts)]
pub struct CanUnstake<'info> {
    /// CHECK: only the key is read.
    pub staker: UncheckedAccount<'info>,
}

#[derive(Accounts)]
pub struct StakersCount<'info> {
    #[account(
        seeds = [STAKER_DIRECTORY_SEED.as_bytes()],
        bump = staker_directory.bump,
    )]
    pub staker_directory: Box<Account<'info, StakerDirectory>>,
}

#[derive(Accounts)]
#[instruction(staker: Pubkey)]
pub struct IsStaker<'info> {
    /// May not exist yet.
    ///
    /// CHECK: PDA derivation enforced by seeds; read by `load_staker_info`.
    #[account(
        seeds = [STAKER_INFO_SEED.as_bytes(), staker.as_ref()],
        bump,
    )]
    pub staker_info: UncheckedAccount<'info>,
}

#[derive(Accounts)]
pub struct NextPayoutBalance<'info> {
    #[account(
        seeds = [PAYOUT_LEDGER_SEED.as_bytes()],
        bump = payout_ledger.bump,
    )]
    pub payout_ledger: Box<Account<'info, PayoutLedger>>,
}

#[derive(Accounts)]
#[instruction(staker: Pubkey)]
pub struct ClaimableBalance<'info> {
    /// CHECK: PDA derivation enforced by seeds; read by `load_staker_info`.
    #[account(
        seeds = [STAKER_INFO_SEED.as_bytes(), staker.as_ref()],
        bump,
    )]
    pub staker_info: UncheckedAccount<'info>,
}

fn load_staker_info(info: &AccountInfo) -> Result<Option<StakerInfo>> {
    if info.data_is_empty() {
        return Ok(None);
    }
    load_program_account(info).map(Some)
}

/// Collapses a per-pass eligibility result into the mint or the sentinel.
fn mint_or_sentinel(mint: Pubkey, eligible: Result<()>) -> Pubkey {
    match eligible {
        Ok(()) => mint,
        Err(_) => Pubkey::default(),
    }
}

/// `accounts` are the remaining accounts of one pass, in
/// `CAN_STAKE_ACCOUNTS_PER_PASS` order.
fn stake_verdict<'info>(
    config: &GlobalConfig,
    staker: &Pubkey,
    mint: &Pubkey,
    accounts: Option<&'info [AccountInfo<'info>]>,
    now: i64,
) -> Result<()> {
    let Some([mint_info, token_info, metadata_info, record_info]) = accounts else {
        return err!(crate::error::ErrorCode::MissingRemainingAccount);
    };
    check_pass_mint_account(mint_info, mint)?;
    let token = InterfaceAccount::<TokenAccount>::try_from(token_info)?;
    let metadata = Account::<MetadataAccount>::try_from(metadata_info)?;
    let record = load_stake_record(record_info, mint)?.unwrap_or_default();
    check_stake_eligibility(
        staker,
        mint,
        in_pass_collection(config, mint, &metadata),
        &token,
        &record,
        now,
    )
}

/// For each pass: the mint when `staker` could stake it now, otherwise
/// `Pubkey::default()`. The mint must be a pass; approval is not checked.
/// Missing or malformed per-pass accounts count as ineligible.
pub fn can_stake<'info>(
    ctx: Context<'_, '_, 'info, 'info, CanStake<'info>>,
    pass_mints: Vec<Pubkey>,
) -> Result<Vec<Pubkey>> {
    let staker = ctx.accounts.staker.key();
    let config = &ctx.accounts.global_config;
    let now = Clock::get()?.unix_timestamp;

    let verdicts = pass_mints
        .iter()
        .enumerate()
        .map(|(i, mint)| {
            let start = i * CAN_STAKE_ACCOUNTS_PER_PASS;
            let accounts = ctx
                .remaining_accounts
                .get(start..start + CAN_STAKE_ACCOUNTS_PER_PASS);
            let eligible = stake_verdict(config, &staker, mint, accounts, now);
            mint_or_sentinel(*mint, eligible)
        })
        .collect();
    Ok(verdicts)
}

/// For each pass: the mint when `staker` could unstake it now, otherwise
/// `Pubkey::default()`.
pub fn can_unstake<'info>(
    ctx: Context<'_, '_, 'info, 'info, CanUnstake<'info>>,
    pass_mints: Vec<Pubkey>,
) -> Result<Vec<Pubkey>> {
    let staker = ctx.accounts.staker.key();
    let now = Clock::get()?.unix_timestamp;

    let verdicts = pass_mints
        .iter()
        .enumerate()
        .map(|(i, mint)| {
            let eligible = match ctx.remaining_accounts.get(i * CAN_UNSTAKE_ACCOUNTS_PER_PASS) {
                Some(record_info) => {
                    check_unstake_eligibility(record_info, mint, &staker, now).map(|_| ())
                }
                None => Err(error!(crate::error::ErrorCode::MissingRemainingAccount)),
            };
            mint_or_sentinel(*mint, eligible)
        })
        .collect();
    Ok(verdicts)
}

pub fn stakers_count(ctx: Context<StakersCount>) -> Result<u64> {
    Ok(ctx.accounts.staker_directory.stakers_count())
}

pub fn is_staker(ctx: Context<IsStaker>, _staker: Pubkey) -> Result<bool> {
    let info = load_staker_info(&ctx.accounts.staker_info)?;
    Ok(info.is_some_and(|info| info.is_active()))
}

pub fn next_payout_balance(ctx: Context<NextPayoutBalance>) -> Result<u64> {
    Ok(ctx.accounts.payout_ledger.pending_payout_balance)
}

pub fn claimable_balance(ctx: Context<ClaimableBalance>, _staker: Pubkey) -> Result<u64> {
    let info = load_staker_info(&ctx.accounts.staker_info)?;
    Ok(info.map_or(0, |info| info.claimable_balance))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;

    #[test]
    fn failures_map_to_the_default_key() {
        let mint = Pubkey::new_unique();
        assert_eq!(mint_or_sentinel(mint, Ok(())), mint);
        assert_eq!(
            mint_or_sentinel(mint, Err(error!(ErrorCode::TokenLocked))),
            Pubkey::default()
        );
    }

    #[test]
    fn stake_then_unstake_eligibility_flip() {
        let staker = Pubkey::new_unique();
        let mut record = StakeRecord::default();
        let lock = crate::DEFAULT_LOCK_PERIOD;

        assert!(record.check_stake(&staker, true, 0).is_ok());
        record.open(Pubkey::new_unique(), 255, staker, lock);

        let mint = record.mint;
        assert_eq!(
            mint_or_sentinel(mint, record.check_unstake(&staker, lock - 1)),
            Pubkey::default()
        );
        assert_eq!(mint_or_sentinel(mint, record.check_unstake(&staker, lock)), mint);
        assert_eq!(
            mint_or_sentinel(mint, record.check_stake(&staker, false, lock)),
            Pubkey::default()
        );
    }

    #[test]
    fn non_pass_mint_is_never_stakeable() {
        use anchor_lang::solana_program::program_pack::Pack;
        use anchor_spl::token_interface::spl_token_2022::{self, state::Mint as SplMint};

        let key = Pubkey::new_unique();
        let token_owner = spl_token_2022::ID;
        let system = Pubkey::default();
        let mut mint_data = vec![0u8; SplMint::LEN];
        let fungible = SplMint {
            decimals: 6,
            supply: 1_000,
            is_initialized: true,
            ..Default::default()
        };
        SplMint::pack(fungible, &mut mint_data).unwrap();

        let mut lamports = [1_000_000u64; 4];
        let [l0, l1, l2, l3] = &mut lamports;
        let mut empty = [[0u8; 0]; 3];
        let [d1, d2, d3] = &mut empty;
        let accounts = vec![
            AccountInfo::new(&key, false, false, l0, &mut mint_data, &token_owner, false, 0),
            AccountInfo::new(&key, false, false, l1, d1, &system, false, 0),
            AccountInfo::new(&key, false, false, l2, d2, &system, false, 0),
            AccountInfo::new(&key, false, false, l3, d3, &system, false, 0),
        ];

        let config = GlobalConfig::default();
        let staker = Pubkey::new_unique();
        assert_eq!(
            stake_verdict(&config, &staker, &key, Some(accounts.as_slice()), 0).unwrap_err(),
            anchor_lang::error::Error::from(ErrorCode::InvalidPassMint)
        );
        assert_eq!(
            stake_verdict(&config, &staker, &key, None, 0).unwrap_err(),
            anchor_lang::error::Error::from(ErrorCode::MissingRemainingAccount)
        );
    }
}
