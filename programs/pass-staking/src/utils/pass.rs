use anchor_lang::prelude::*;
use anchor_lang::solana_program::program_option::COption;
use anchor_spl::metadata::mpl_token_metadata::types::Collection;
use anchor_spl::token_interface::spl_token_2022::state::Account as SplTokenAccount;

/// A pass belongs to the staking program's collection only when the
/// collection is set on its metadata and verified by the collection
/// authority.
pub fn in_verified_collection(collection: Option<&Collection>, expected: &Pubkey) -> bool {
    matches!(collection, Some(c) if c.verified && c.key == *expected)
}

/// `token` is `owner`'s account for `mint` and currently holds the pass.
pub fn holds_pass(token: &SplTokenAccount, owner: &Pubkey, mint: &Pubkey) -> bool {
    token.owner == *owner && token.mint == *mint && token.amount == 1
}

/// The owner delegated the pass to the program authority.
pub fn is_approved(token: &SplTokenAccount, authority: &Pubkey) -> bool {
    token.delegate == COption::Some(*authority) && token.delegated_amount >= 1
}

/// Non-fungible mints only: zero decimals, single unit supply.
pub fn is_pass_mint(decimals: u8, supply: u64) -> bool {
    decimals == 0 && supply == 1
}

#[cfg(test)]
mod tests {
    use super::*;

    fn held_by(owner: Pubkey, mint: Pubkey) -> SplTokenAccount {
        SplTokenAccount {
            mint,
            owner,
            amount: 1,
            ..Default::default()
        }
    }

    #[test]
    fn unverified_or_foreign_collection_is_rejected() {
        let expected = Pubkey::new_unique();
        let verified = Collection {
            verified: true,
            key: expected,
        };
        let unverified = Collection {
            verified: false,
            key: expected,
        };
        let foreign = Collection {
            verified: true,
            key: Pubkey::new_unique(),
        };

        assert!(in_verified_collection(Some(&verified), &expected));
        assert!(!in_verified_collection(Some(&unverified), &expected));
        assert!(!in_verified_collection(Some(&foreign), &expected));
        assert!(!in_verified_collection(None, &expected));
    }

    #[test]
    fn holding_requires_owner_mint_and_balance() {
        let (owner, mint) = (Pubkey::new_unique(), Pubkey::new_unique());
        let token = held_by(owner, mint);
        assert!(holds_pass(&token, &owner, &mint));
        assert!(!holds_pass(&token, &Pubkey::new_unique(), &mint));
        assert!(!holds_pass(&token, &owner, &Pubkey::new_unique()));

        let emptied = SplTokenAccount { amount: 0, ..token };
        assert!(!holds_pass(&emptied, &owner, &mint));
    }

    #[test]
    fn approval_needs_delegate_and_amount() {
        let authority = Pubkey::new_unique();
        let mut token = held_by(Pubkey::new_unique(), Pubkey::new_unique());
        assert!(!is_approved(&token, &authority));

        token.delegate = COption::Some(authority);
        assert!(!is_approved(&token, &authority));

        token.delegated_amount = 1;
        assert!(is_approved(&token, &authority));
        assert!(!is_approved(&token, &Pubkey::new_unique()));
    }

    #[test]
    fn fungible_mints_are_not_passes() {
        assert!(is_pass_mint(0, 1));
        assert!(!is_pass_mint(6, 1));
        assert!(!is_pass_mint(0, 1_000));
    }
}
