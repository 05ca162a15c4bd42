use crate::error::ErrorCode;
use anchor_lang::prelude::*;

//
// ──────────────────────────────────────────────────────────────────────────────
// Global Configuration Account
// ──────────────────────────────────────────────────────────────────────────────
//

/// PDA seed string used to derive the global configuration account.
pub const GLOBAL_CONFIG_SEED: &str = "global_config";

/// Protocol-wide parameters and fixed addresses.
///
/// Created once by `initialize` and read by nearly every instruction.
#[account]
#[derive(Default, Debug)]
pub struct GlobalConfig {
    /// PDA bump for this account.
    pub bump: u8,

    /// Current admin (distribution, allow-list, pause, residual withdrawal).
    pub admin: Pubkey,

    /// Verified Metaplex collection every staked pass must belong to.
    pub pass_collection: Pubkey,

    /// System-owned PDA holding payout lamports.
    pub payout_vault: Pubkey,

    /// Seconds a pass stays locked after stake, and after unstake for the
    /// same owner.
    pub lock_period: i64,

    /// Global switch: while `true`, stake and unstake are rejected.
    pub paused: bool,
}

impl GlobalConfig {
    /// Fixed serialized size of the account.
    ///
    /// Breakdown:
    /// - 8: account discriminator
    /// - 1: bump
    /// - 32 * 3: three Pubkeys
    /// - 8: lock period
    /// - 1: paused flag
    pub const LEN: usize = 8 + 1 + 32 * 3 + 8 + 1;

    /// Either the stored admin or the hard-coded program admin.
    pub fn is_admin(&self, key: &Pubkey) -> bool {
        *key == self.admin || *key == crate::admin::id()
    }

    pub fn lock_expiry_from(&self, now: i64) -> Result<i64> {
        now.checked_add(self.lock_period)
            .ok_or(error!(ErrorCode::MathOverflow))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn program_admin_is_always_admin() {
        let config = GlobalConfig {
            admin: Pubkey::new_unique(),
            ..Default::default()
        };
        assert!(config.is_admin(&config.admin));
        assert!(config.is_admin(&crate::admin::id()));
        assert!(!config.is_admin(&Pubkey::new_unique()));
    }

    #[test]
    fn lock_expiry_overflow_is_rejected() {
        let config = GlobalConfig {
            lock_period: crate::DEFAULT_LOCK_PERIOD,
            ..Default::default()
        };
        assert_eq!(
            config.lock_expiry_from(1_000).unwrap(),
            1_000 + crate::DEFAULT_LOCK_PERIOD
        );
        assert!(config.lock_expiry_from(i64::MAX).is_err());
    }
}
