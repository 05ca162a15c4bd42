use anchor_lang::prelude::*;
use anchor_spl::token_interface;
use anchor_spl::token_interface::spl_token_2022::{
    self,
    extension::{BaseStateWithExtensions, ExtensionType, StateWithExtensions},
    state::{Account as SplTokenAccount, Mint as SplMint},
};

/// Moves one pass between token accounts.
///
/// `authority` is either the staker's delegate (the program authority PDA,
/// signing with `signer_seeds`) or the vault owner on the way out.
pub fn transfer_pass<'a>(
    authority: AccountInfo<'a>,
    from: AccountInfo<'a>,
    to: AccountInfo<'a>,
    mint: AccountInfo<'a>,
    token_program: AccountInfo<'a>,
    signer_seeds: &[&[&[u8]]],
) -> Result<()> {
    token_interface::transfer_checked(
        CpiContext::new_with_signer(
            token_program,
            token_interface::TransferChecked {
                from,
                to,
                authority,
                mint,
            },
            signer_seeds,
        ),
        1,
        0,
    )
}

/// Closes an emptied pass vault and refunds its rent to `destination`.
pub fn close_pass_vault<'a>(
    authority: AccountInfo<'a>,
    vault: AccountInfo<'a>,
    destination: AccountInfo<'a>,
    token_program: AccountInfo<'a>,
    signer_seeds: &[&[&[u8]]],
) -> Result<()> {
    token_interface::close_account(CpiContext::new_with_signer(
        token_program,
        token_interface::CloseAccount {
            account: vault,
            destination,
            authority,
        },
        signer_seeds,
    ))
}

/// Initializes a freshly allocated token account as a pass vault owned by
/// the program authority.
pub fn initialize_pass_vault<'a>(
    vault: AccountInfo<'a>,
    mint: AccountInfo<'a>,
    authority: AccountInfo<'a>,
    token_program: AccountInfo<'a>,
) -> Result<()> {
    token_interface::initialize_account3(CpiContext::new(
        token_program,
        token_interface::InitializeAccount3 {
            account: vault,
            mint,
            authority,
        },
    ))
}

/// Space a pass vault needs for `mint`, including the account extensions a
/// Token-2022 mint requires of its token accounts.
pub fn pass_vault_space(mint: &AccountInfo) -> Result<usize> {
    if *mint.owner != spl_token_2022::ID {
        return vault_space_for(&[]);
    }
    let data = mint.try_borrow_data()?;
    let state = StateWithExtensions::<SplMint>::unpack(&data)?;
    vault_space_for(&state.get_extension_types()?)
}

fn vault_space_for(mint_extensions: &[ExtensionType]) -> Result<usize> {
    let required = ExtensionType::get_required_init_account_extensions(mint_extensions);
    Ok(ExtensionType::try_calculate_account_len::<SplTokenAccount>(
        &required,
    )?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use anchor_lang::solana_program::program_pack::Pack;

    #[test]
    fn plain_mint_needs_a_base_account() {
        assert_eq!(vault_space_for(&[]).unwrap(), SplTokenAccount::LEN);
    }

    #[test]
    fn transfer_fee_mint_needs_a_larger_vault() {
        let space = vault_space_for(&[ExtensionType::TransferFeeConfig]).unwrap();
        assert!(space > SplTokenAccount::LEN);
        assert_eq!(
            space,
            ExtensionType::try_calculate_account_len::<SplTokenAccount>(&[
                ExtensionType::TransferFeeAmount
            ])
            .unwrap()
        );
    }

    #[test]
    fn classic_token_mint_uses_the_base_size() {
        let key = Pubkey::new_unique();
        let owner = anchor_spl::token::ID;
        let mut lamports = 1_000_000;
        let mut data = vec![0u8; SplMint::LEN];
        let mint = AccountInfo::new(&key, false, false, &mut lamports, &mut data, &owner, false, 0);
        assert_eq!(pass_vault_space(&mint).unwrap(), SplTokenAccount::LEN);
    }
}
