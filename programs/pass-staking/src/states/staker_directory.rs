use crate::error::ErrorCode;
use anchor_lang::prelude::*;

//
// ──────────────────────────────────────────────────────────────────────────────
// StakerDirectory Account
// ──────────────────────────────────────────────────────────────────────────────
//

/// PDA seed string used to derive the staker directory.
pub const STAKER_DIRECTORY_SEED: &str = "staker_directory";

/// Maximum number of distinct active stakers. Keeps the account under the
/// 10 KiB limit for accounts created through `init`.
///
/// Removal is a `swap_remove` after a linear lookup, so it costs at most
/// `MAX_STAKERS` key comparisons. Keeping a position per `StakerInfo` would
/// make the lookup O(1) but force every unstake to also carry the account of
/// whichever staker gets moved into the gap.
pub const MAX_STAKERS: usize = 256;

/// Dense set of active stakers plus the staked-token total.
///
/// Membership itself is decided by `StakerInfo::staked_count > 0`; the
/// vector only exists so distribution can walk every active staker.
#[account]
#[derive(Default, Debug, PartialEq)]
pub struct StakerDirectory {
    pub bump: u8,

    /// Sum of `staked_count` over all stakers.
    pub total_staked_token: u64,

    /// Active stakers. Order carries no meaning.
    pub stakers: Vec<Pubkey>,
}

impl StakerDirectory {
    /// Breakdown:
    /// - 8: account discriminator
    /// - 1: bump
    /// - 8: total staked token
    /// - 4 + 32 * MAX_STAKERS: vector length prefix and entries
    pub const LEN: usize = 8 + 1 + 8 + 4 + 32 * MAX_STAKERS;

    pub fn stakers_count(&self) -> u64 {
        self.stakers.len() as u64
    }

    pub fn position(&self, staker: &Pubkey) -> Option<usize> {
        self.stakers.iter().position(|s| s == staker)
    }

    fn insert(&mut self, staker: Pubkey) -> Result<()> {
        require!(self.stakers.len() < MAX_STAKERS, ErrorCode::DirectoryFull);
        self.stakers.push(staker);
        Ok(())
    }

    fn remove(&mut self, staker: &Pubkey) {
        if let Some(index) = self.position(staker) {
            self.stakers.swap_remove(index);
        }
    }

    /// Accounts for one more staked pass. `became_active` is the result of
    /// `StakerInfo::add_stake`.
    pub fn record_stake(&mut self, staker: Pubkey, became_active: bool) -> Result<()> {
        if became_active {
            self.insert(staker)?;
        }
        self.total_staked_token = self
            .total_staked_token
            .checked_add(1)
            .ok_or(ErrorCode::MathOverflow)?;
        Ok(())
    }

    /// Accounts for one less staked pass. `became_inactive` is the result of
    /// `StakerInfo::remove_stake`.
    pub fn record_unstake(&mut self, staker: &Pubkey, became_inactive: bool) -> Result<()> {
        if became_inactive {
            self.remove(staker);
        }
        self.total_staked_token = self
            .total_staked_token
            .checked_sub(1)
            .ok_or(ErrorCode::MathOverflow)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::states::StakerInfo;
    use proptest::prelude::*;
    use quickcheck::quickcheck;
    use std::collections::HashMap;

    /// Minimal model of the stake path: per-staker info plus the directory.
    #[derive(Default)]
    struct Registry {
        infos: HashMap<Pubkey, StakerInfo>,
        directory: StakerDirectory,
    }

    impl Registry {
        fn stake(&mut self, staker: Pubkey) -> Result<()> {
            let info = self.infos.entry(staker).or_default();
            let became_active = info.add_stake()?;
            self.directory.record_stake(staker, became_active)
        }

        fn unstake(&mut self, staker: Pubkey) -> Result<()> {
            let info = self.infos.entry(staker).or_default();
            if !info.is_active() {
                return Ok(());
            }
            let became_inactive = info.remove_stake()?;
            self.directory.record_unstake(&staker, became_inactive)
        }

        fn check_invariants(&self) {
            let total: u64 = self.infos.values().map(|i| i.staked_count).sum();
            assert_eq!(self.directory.total_staked_token, total);

            let active = self.infos.values().filter(|i| i.is_active()).count();
            assert_eq!(self.directory.stakers.len(), active);
            for staker in &self.directory.stakers {
                assert!(self.infos[staker].is_active());
            }
        }
    }

    #[test]
    fn double_stake_keeps_a_single_entry() {
        let mut registry = Registry::default();
        let staker = Pubkey::new_unique();
        registry.stake(staker).unwrap();
        registry.stake(staker).unwrap();

        assert_eq!(registry.directory.stakers_count(), 1);
        assert_eq!(registry.directory.total_staked_token, 2);

        registry.unstake(staker).unwrap();
        assert_eq!(registry.directory.stakers_count(), 1);
        registry.unstake(staker).unwrap();
        assert_eq!(registry.directory.stakers_count(), 0);
        assert_eq!(registry.directory.total_staked_token, 0);
    }

    #[test]
    fn full_directory_rejects_new_stakers_only() {
        let mut directory = StakerDirectory::default();
        for _ in 0..MAX_STAKERS {
            directory.record_stake(Pubkey::new_unique(), true).unwrap();
        }
        let existing = directory.stakers[0];
        assert!(directory.record_stake(existing, false).is_ok());
        assert_eq!(
            directory
                .record_stake(Pubkey::new_unique(), true)
                .unwrap_err(),
            anchor_lang::error::Error::from(ErrorCode::DirectoryFull)
        );
    }

    #[test]
    fn removal_keeps_remaining_members() {
        let mut directory = StakerDirectory::default();
        let stakers: Vec<Pubkey> = (0..5).map(|_| Pubkey::new_unique()).collect();
        for staker in &stakers {
            directory.record_stake(*staker, true).unwrap();
        }
        directory.record_unstake(&stakers[1], true).unwrap();

        assert_eq!(directory.stakers_count(), 4);
        assert!(directory.position(&stakers[1]).is_none());
        for staker in stakers.iter().filter(|s| **s != stakers[1]) {
            assert!(directory.position(staker).is_some());
        }
    }

    #[test]
    fn removal_moves_last_entry_into_the_gap() {
        let mut directory = StakerDirectory::default();
        let stakers: Vec<Pubkey> = (0..MAX_STAKERS).map(|_| Pubkey::new_unique()).collect();
        for staker in &stakers {
            directory.record_stake(*staker, true).unwrap();
        }

        directory.record_unstake(&stakers[0], true).unwrap();
        assert_eq!(directory.stakers[0], stakers[MAX_STAKERS - 1]);
        assert_eq!(directory.stakers.len(), MAX_STAKERS - 1);

        directory.record_unstake(&stakers[MAX_STAKERS - 2], true).unwrap();
        assert_eq!(directory.stakers.len(), MAX_STAKERS - 2);
        assert_eq!(directory.position(&stakers[MAX_STAKERS - 1]), Some(0));

        // Freed slots are reusable.
        directory.record_stake(Pubkey::new_unique(), true).unwrap();
        directory.record_stake(Pubkey::new_unique(), true).unwrap();
        assert_eq!(directory.stakers.len(), MAX_STAKERS);
    }

    quickcheck! {
        fn random_sequences_keep_totals(ops: Vec<(u8, bool)>) -> bool {
            let stakers: Vec<Pubkey> = (0..6).map(|_| Pubkey::new_unique()).collect();
            let mut registry = Registry::default();
            for (who, is_stake) in ops {
                let staker = stakers[who as usize % stakers.len()];
                let result = if is_stake {
                    registry.stake(staker)
                } else {
                    registry.unstake(staker)
                };
                if result.is_err() {
                    return false;
                }
            }
            let total: u64 = registry.infos.values().map(|i| i.staked_count).sum();
            registry.directory.total_staked_token == total
        }
    }

    proptest! {
        #[test]
        fn membership_matches_active_stakers(
            ops in prop::collection::vec((0usize..12, any::<bool>()), 0..200)
        ) {
            let stakers: Vec<Pubkey> = (0..12).map(|_| Pubkey::new_unique()).collect();
            let mut registry = Registry::default();
            for (who, is_stake) in ops {
                if is_stake {
                    registry.stake(stakers[who]).unwrap();
                } else {
                    registry.unstake(stakers[who]).unwrap();
                }
                registry.check_invariants();
            }
        }
    }
}
