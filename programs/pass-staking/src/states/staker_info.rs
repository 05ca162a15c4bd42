use crate::error::ErrorCode;
use anchor_lang::prelude::*;

//
// ──────────────────────────────────────────────────────────────────────────────
// StakerInfo Account
// ──────────────────────────────────────────────────────────────────────────────
//

/// PDA seed string used to derive each staker's info account.
pub const STAKER_INFO_SEED: &str = "staker_info";

/// Per-staker counters, derived from `STAKER_INFO_SEED + staker_pubkey`.
///
/// Created lazily on the first stake and never closed, so a staker's
/// claimable balance survives leaving and re-entering the directory.
#[account]
#[derive(Default, Debug, PartialEq)]
pub struct StakerInfo {
    /// PDA bump for this account.
    pub bump: u8,

    /// Staker to whom this record belongs.
    pub owner: Pubkey,

    /// Number of passes currently in custody for this staker.
    pub staked_count: u64,

    /// Lamports credited by distributions and not yet claimed.
    pub claimable_balance: u64,

    /// Lamports claimed over the lifetime of the account.
    pub total_claimed: u64,
}

impl StakerInfo {
    /// Fixed serialized size of the account.
    ///
    /// Breakdown:
    /// - 8: account discriminator
    /// - 1: bump
    /// - 32: owner pubkey
    /// - 8 * 3: three `u64` fields
    pub const LEN: usize = 8 + 1 + 32 + 8 * 3;

    pub fn is_active(&self) -> bool {
        self.staked_count > 0
    }

    /// Fills in identity fields the first time the account is used.
    pub fn init_if_empty(&mut self, owner: Pubkey, bump: u8) {
        if self.owner == Pubkey::default() {
            self.owner = owner;
            self.bump = bump;
        }
    }

    /// Returns `true` when this stake turned the owner into an active staker.
    pub fn add_stake(&mut self) -> Result<bool> {
        self.staked_count = self
            .staked_count
            .checked_add(1)
            .ok_or(ErrorCode::MathOverflow)?;
        Ok(self.staked_count == 1)
    }

    /// Returns `true` when the owner no longer has any pass staked.
    pub fn remove_stake(&mut self) -> Result<bool> {
        self.staked_count = self
            .staked_count
            .checked_sub(1)
            .ok_or(ErrorCode::MathOverflow)?;
        Ok(self.staked_count == 0)
    }

    pub fn credit(&mut self, amount: u64) -> Result<()> {
        self.claimable_balance = self
            .claimable_balance
            .checked_add(amount)
            .ok_or(ErrorCode::MathOverflow)?;
        Ok(())
    }

    /// Zeroes the claimable balance and returns what was owed.
    pub fn take_claimable(&mut self) -> Result<u64> {
        let amount = self.claimable_balance;
        require!(amount > 0, ErrorCode::NoPayoutBalance);
        self.claimable_balance = 0;
        self.total_claimed = self
            .total_claimed
            .checked_add(amount)
            .ok_or(ErrorCode::MathOverflow)?;
        Ok(amount)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn activity_follows_the_zero_boundary() {
        let mut info = StakerInfo::default();
        assert!(info.add_stake().unwrap());
        assert!(!info.add_stake().unwrap());
        assert!(!info.remove_stake().unwrap());
        assert!(info.remove_stake().unwrap());
        assert!(!info.is_active());
        assert!(info.remove_stake().is_err());
    }

    #[test]
    fn second_claim_fails_with_no_balance() {
        let mut info = StakerInfo::default();
        info.credit(800_000_000).unwrap();

        assert_eq!(info.take_claimable().unwrap(), 800_000_000);
        assert_eq!(info.claimable_balance, 0);
        assert_eq!(info.total_claimed, 800_000_000);
        assert_eq!(
            info.take_claimable().unwrap_err(),
            anchor_lang::error::Error::from(ErrorCode::NoPayoutBalance)
        );
    }

    #[test]
    fn identity_is_written_once() {
        let first = Pubkey::new_unique();
        let mut info = StakerInfo::default();
        info.init_if_empty(first, 254);
        info.init_if_empty(Pubkey::new_unique(), 1);
        assert_eq!(info.owner, first);
        assert_eq!(info.bump, 254);
    }
}
