use crate::error::ErrorCode;
use anchor_lang::prelude::*;

//
// ──────────────────────────────────────────────────────────────────────────────
// StakeRecord Account
// ──────────────────────────────────────────────────────────────────────────────
//

/// PDA seed string used to derive the per-pass stake record.
pub const STAKE_RECORD_SEED: &str = "stake_record";

/// Custody and lock state of a single pass, derived from
/// `STAKE_RECORD_SEED + pass_mint`.
///
/// The record is created on the first stake of a pass and is never closed.
/// Once the pass leaves custody, `owner` and `lock_expiry` stay behind as a
/// lock marker: the same owner cannot stake the pass again before
/// `lock_expiry`, while any other owner can.
#[account]
#[derive(Default, Debug, PartialEq)]
pub struct StakeRecord {
    /// PDA bump for this account.
    pub bump: u8,

    /// Pass mint this record tracks.
    pub mint: Pubkey,

    /// Last staker of the pass.
    pub owner: Pubkey,

    /// UNIX timestamp (seconds) until which `owner` is locked.
    pub lock_expiry: i64,

    /// `true` while the program vault holds the pass.
    pub in_custody: bool,
}

impl StakeRecord {
    /// Fixed serialized size of the account.
    ///
    /// Breakdown:
    /// - 8: account discriminator
    /// - 1: bump
    /// - 32 * 2: mint and owner
    /// - 8: lock expiry
    /// - 1: custody flag
    pub const LEN: usize = 8 + 1 + 32 * 2 + 8 + 1;

    pub fn is_locked_for(&self, staker: &Pubkey, now: i64) -> bool {
        self.owner == *staker && now < self.lock_expiry
    }

    /// Eligibility of `staker` to stake this pass.
    ///
    /// `holds_pass` is whether the staker's token account currently holds
    /// the pass. A pass already in custody is not held by anyone outside
    /// the program, so it fails the same way.
    pub fn check_stake(&self, staker: &Pubkey, holds_pass: bool, now: i64) -> Result<()> {
        require!(holds_pass && !self.in_custody, ErrorCode::TokenNotOwned);
        require!(!self.is_locked_for(staker, now), ErrorCode::TokenLocked);
        Ok(())
    }

    /// Eligibility of `staker` to take the pass back out of custody.
    pub fn check_unstake(&self, staker: &Pubkey, now: i64) -> Result<()> {
        require!(
            self.in_custody && self.owner == *staker,
            ErrorCode::NotTokenOwner
        );
        require!(now >= self.lock_expiry, ErrorCode::TokenLocked);
        Ok(())
    }

    /// Records a fresh stake. Any previous owner is overwritten.
    pub fn open(&mut self, mint: Pubkey, bump: u8, staker: Pubkey, lock_expiry: i64) {
        self.bump = bump;
        self.mint = mint;
        self.owner = staker;
        self.lock_expiry = lock_expiry;
        self.in_custody = true;
    }

    /// Marks the pass as returned and starts the post-unstake lock for the
    /// same owner.
    pub fn release(&mut self, lock_expiry: i64) {
        self.lock_expiry = lock_expiry;
        self.in_custody = false;
    }
}
