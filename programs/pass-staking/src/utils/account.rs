use crate::error::ErrorCode;
use crate::states::{StakeRecord, STAKE_RECORD_SEED};
use crate::PASS_VAULT_SEED;
use anchor_lang::prelude::*;
use anchor_lang::solana_program::program::{invoke, invoke_signed};
use anchor_lang::solana_program::system_instruction;
use anchor_lang::system_program;

/// Creates a PDA account owned by `owner` with `space` bytes, funded by
/// `payer` to the rent-exempt minimum.
///
/// A PDA that already holds lamports (someone pre-funded the address) is
/// topped up, allocated and assigned instead of created.
pub fn create_pda_account<'info>(
    payer: &AccountInfo<'info>,
    target: &AccountInfo<'info>,
    system_program: &AccountInfo<'info>,
    space: usize,
    owner: &Pubkey,
    seeds: &[&[u8]],
) -> Result<()> {
    let required = Rent::get()?.minimum_balance(space);
    let current = target.lamports();

    if current == 0 {
        let ix = system_instruction::create_account(
            payer.key,
            target.key,
            required,
            space as u64,
            owner,
        );
        invoke_signed(
            &ix,
            &[payer.clone(), target.clone(), system_program.clone()],
            &[seeds],
        )?;
        return Ok(());
    }

    let top_up = required.saturating_sub(current);
    if top_up > 0 {
        let ix = system_instruction::transfer(payer.key, target.key, top_up);
        invoke(
            &ix,
            &[payer.clone(), target.clone(), system_program.clone()],
        )?;
    }
    let ix = system_instruction::allocate(target.key, space as u64);
    invoke_signed(&ix, &[target.clone(), system_program.clone()], &[seeds])?;
    let ix = system_instruction::assign(target.key, owner);
    invoke_signed(&ix, &[target.clone(), system_program.clone()], &[seeds])?;
    Ok(())
}

/// Deserializes a program-owned account, checking owner and discriminator.
pub fn load_program_account<T: AccountDeserialize>(info: &AccountInfo) -> Result<T> {
    require_keys_eq!(
        *info.owner,
        crate::id(),
        anchor_lang::error::ErrorCode::AccountOwnedByWrongProgram
    );
    let data = info.try_borrow_data()?;
    T::try_deserialize(&mut &data[..])
}

/// Writes `account` (discriminator included) into `info`'s data.
pub fn store_program_account<T: AccountSerialize>(info: &AccountInfo, account: &T) -> Result<()> {
    let mut data = info.try_borrow_mut_data()?;
    let mut writer: &mut [u8] = &mut data;
    account.try_serialize(&mut writer)
}

pub fn stake_record_address(mint: &Pubkey) -> (Pubkey, u8) {
    Pubkey::find_program_address(&[STAKE_RECORD_SEED.as_bytes(), mint.as_ref()], &crate::id())
}

pub fn pass_vault_address(mint: &Pubkey) -> (Pubkey, u8) {
    Pubkey::find_program_address(&[PASS_VAULT_SEED.as_bytes(), mint.as_ref()], &crate::id())
}

/// Reads the stake record of `mint` from an unchecked account.
///
/// Returns `None` when the record has never been created. The address must
/// be the record PDA of `mint` either way.
pub fn load_stake_record(info: &AccountInfo, mint: &Pubkey) -> Result<Option<StakeRecord>> {
    let (address, _) = stake_record_address(mint);
    require_keys_eq!(*info.key, address, ErrorCode::InvalidStakeRecord);
    if info.data_is_empty() {
        return Ok(None);
    }
    let record: StakeRecord = load_program_account(info)?;
    require_keys_eq!(record.mint, *mint, ErrorCode::InvalidStakeRecord);
    Ok(Some(record))
}

/// Lamports from a signer into a system-owned vault.
pub fn deposit_lamports<'info>(
    from: AccountInfo<'info>,
    vault: AccountInfo<'info>,
    system_program: AccountInfo<'info>,
    amount: u64,
) -> Result<()> {
    system_program::transfer(
        CpiContext::new(
            system_program,
            system_program::Transfer { from, to: vault },
        ),
        amount,
    )
}

/// Lamports out of the system-owned payout vault, signed by its PDA seeds.
pub fn withdraw_lamports<'info>(
    vault: AccountInfo<'info>,
    to: AccountInfo<'info>,
    system_program: AccountInfo<'info>,
    amount: u64,
    signer_seeds: &[&[&[u8]]],
) -> Result<()> {
    system_program::transfer(
        CpiContext::new_with_signer(
            system_program,
            system_program::Transfer { from: vault, to },
            signer_seeds,
        ),
        amount,
    )
}
