use crate::error::ErrorCode;
use anchor_lang::prelude::*;

//
// ──────────────────────────────────────────────────────────────────────────────
// AllowList Account
// ──────────────────────────────────────────────────────────────────────────────
//

/// PDA seed string used to derive the revenue-source allow-list.
pub const ALLOW_LIST_SEED: &str = "allow_list";

pub const MAX_REVENUE_SOURCES: usize = 32;

/// Signers allowed to push lamports through `receive_payout`.
#[account]
#[derive(Default, Debug)]
pub struct AllowList {
    pub bump: u8,
    pub sources: Vec<Pubkey>,
}

impl AllowList {
    /// Breakdown:
    /// - 8: account discriminator
    /// - 1: bump
    /// - 4 + 32 * MAX_REVENUE_SOURCES: vector length prefix and entries
    pub const LEN: usize = 8 + 1 + 4 + 32 * MAX_REVENUE_SOURCES;

    pub fn is_allowed(&self, source: &Pubkey) -> bool {
        self.sources.contains(source)
    }

    pub fn set(&mut self, source: Pubkey, allowed: bool) -> Result<()> {
        require_keys_neq!(source, Pubkey::default(), ErrorCode::InvalidRevenueSource);
        match (allowed, self.sources.iter().position(|s| *s == source)) {
            (true, None) => {
                require!(
                    self.sources.len() < MAX_REVENUE_SOURCES,
                    ErrorCode::AllowListFull
                );
                self.sources.push(source);
            }
            (false, Some(index)) => {
                self.sources.swap_remove(index);
            }
            _ => {}
        }
        Ok(())
    }

    /// Applies a batch of updates in order. Later entries win over earlier
    /// ones for the same source.
    pub fn apply(&mut self, sources: &[Pubkey], flags: &[bool]) -> Result<()> {
        require_eq!(sources.len(), flags.len(), ErrorCode::LengthsMismatch);
        for (source, allowed) in sources.iter().zip(flags) {
            self.set(*source, *allowed)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_is_idempotent() {
        let source = Pubkey::new_unique();
        let mut list = AllowList::default();
        list.set(source, true).unwrap();
        list.set(source, true).unwrap();
        assert_eq!(list.sources.len(), 1);
        assert!(list.is_allowed(&source));

        list.set(source, false).unwrap();
        list.set(source, false).unwrap();
        assert!(!list.is_allowed(&source));
    }

    #[test]
    fn batch_rejects_mismatched_lengths() {
        let mut list = AllowList::default();
        let err = list
            .apply(&[Pubkey::new_unique(), Pubkey::new_unique()], &[true])
            .unwrap_err();
        assert_eq!(err, anchor_lang::error::Error::from(ErrorCode::LengthsMismatch));
        assert!(list.sources.is_empty());
    }

    #[test]
    fn default_key_is_not_a_source() {
        let mut list = AllowList::default();
        assert_eq!(
            list.set(Pubkey::default(), true).unwrap_err(),
            anchor_lang::error::Error::from(ErrorCode::InvalidRevenueSource)
        );
    }

    #[test]
    fn capacity_is_enforced() {
        let mut list = AllowList::default();
        let sources: Vec<Pubkey> = (0..MAX_REVENUE_SOURCES)
            .map(|_| Pubkey::new_unique())
            .collect();
        list.apply(&sources, &vec![true; sources.len()]).unwrap();
        assert_eq!(
            list.set(Pubkey::new_unique(), true).unwrap_err(),
            anchor_lang::error::Error::from(ErrorCode::AllowListFull)
        );
        list.set(sources[3], false).unwrap();
        assert!(list.set(Pubkey::new_unique(), true).is_ok());
    }
}
