use crate::error::ErrorCode;
use crate::states::StakerInfo;
use anchor_lang::prelude::*;

//
// ──────────────────────────────────────────────────────────────────────────────
// PayoutLedger Account
// ──────────────────────────────────────────────────────────────────────────────
//

/// PDA seed string used to derive the payout ledger.
pub const PAYOUT_LEDGER_SEED: &str = "payout_ledger";

/// Snapshot of one distribution run. A cycle may span several transactions;
/// `cursor` is the index of the next directory entry to credit.
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, Default, Debug, PartialEq, Eq)]
pub struct DistributionCycle {
    pub active: bool,
    /// Admin that opened the cycle.
    pub operator: Pubkey,
    /// Pending balance consumed by this cycle, remainder included.
    pub amount: u64,
    /// Lamports credited per staked pass.
    pub rate_per_token: u64,
    pub staker_count: u32,
    pub total_staked_token: u64,
    pub cursor: u32,
}

impl DistributionCycle {
    pub const LEN: usize = 1 + 32 + 8 + 8 + 4 + 8 + 4;
}

/// Lamport accounting for the payout vault.
///
/// Everything held by the vault above its rent-exempt floor is either
/// pending, credited to some `StakerInfo`, residual, or (mid-cycle) owed to
/// stakers the cursor has not reached yet.
#[account]
#[derive(Default, Debug)]
pub struct PayoutLedger {
    pub bump: u8,

    /// Received and not yet split among stakers.
    pub pending_payout_balance: u64,

    /// Division remainders left over by distributions.
    pub residual_balance: u64,

    pub total_received: u64,
    pub total_distributed: u64,
    pub total_claimed: u64,
    pub total_residual_withdrawn: u64,

    /// Completed distribution cycles.
    pub cycle_count: u64,

    pub cycle: DistributionCycle,
}

impl PayoutLedger {
    /// Breakdown:
    /// - 8: account discriminator
    /// - 1: bump
    /// - 8 * 7: balances, totals and cycle counter
    /// - DistributionCycle::LEN: in-flight cycle
    pub const LEN: usize = 8 + 1 + 8 * 7 + DistributionCycle::LEN;

    pub fn is_distributing(&self) -> bool {
        self.cycle.active
    }

    /// Stake and unstake must not move the directory under a running cycle.
    pub fn require_idle(&self) -> Result<()> {
        require!(!self.cycle.active, ErrorCode::DistributionInProgress);
        Ok(())
    }

    pub fn receive(&mut self, amount: u64) -> Result<()> {
        require!(amount > 0, ErrorCode::InvalidAmount);
        self.pending_payout_balance = self
            .pending_payout_balance
            .checked_add(amount)
            .ok_or(ErrorCode::MathOverflow)?;
        self.total_received = self
            .total_received
            .checked_add(amount)
            .ok_or(ErrorCode::MathOverflow)?;
        Ok(())
    }

    /// Freezes the pending balance into a new cycle.
    ///
    /// The per-pass rate is `pending / total_staked_token`; the remainder is
    /// moved to `residual_balance` right away.
    pub fn open_cycle(
        &mut self,
        operator: Pubkey,
        total_staked_token: u64,
        staker_count: u64,
    ) -> Result<()> {
        self.require_idle()?;
        require!(total_staked_token > 0, ErrorCode::NoTokenStaked);
        require!(self.pending_payout_balance > 0, ErrorCode::NoPayoutBalance);

        let amount = self.pending_payout_balance;
        let rate_per_token = amount
            .checked_div(total_staked_token)
            .ok_or(ErrorCode::MathOverflow)?;
        let remainder = amount
            .checked_rem(total_staked_token)
            .ok_or(ErrorCode::MathOverflow)?;

        self.residual_balance = self
            .residual_balance
            .checked_add(remainder)
            .ok_or(ErrorCode::MathOverflow)?;
        self.pending_payout_balance = 0;

        self.cycle = DistributionCycle {
            active: true,
            operator,
            amount,
            rate_per_token,
            staker_count: u32::try_from(staker_count).map_err(|_| ErrorCode::MathOverflow)?,
            total_staked_token,
            cursor: 0,
        };
        Ok(())
    }

    /// Index in the directory of the next staker to credit.
    pub fn cursor(&self) -> usize {
        self.cycle.cursor as usize
    }

    /// Credits the staker at the cursor and advances it.
    pub fn credit_next(&mut self, staker: &mut StakerInfo) -> Result<u64> {
        require!(
            self.cycle.active && self.cycle.cursor < self.cycle.staker_count,
            ErrorCode::DirectoryMismatch
        );
        let share = self
            .cycle
            .rate_per_token
            .checked_mul(staker.staked_count)
            .ok_or(ErrorCode::MathOverflow)?;
        staker.credit(share)?;

        self.total_distributed = self
            .total_distributed
            .checked_add(share)
            .ok_or(ErrorCode::MathOverflow)?;
        self.cycle.cursor += 1;
        Ok(share)
    }

    pub fn is_cycle_complete(&self) -> bool {
        self.cycle.active && self.cycle.cursor >= self.cycle.staker_count
    }

    /// Ends the cycle and returns its snapshot for reporting.
    pub fn close_cycle(&mut self) -> Result<DistributionCycle> {
        require!(self.is_cycle_complete(), ErrorCode::DistributionInProgress);
        let finished = self.cycle;
        self.cycle = DistributionCycle::default();
        self.cycle_count = self
            .cycle_count
            .checked_add(1)
            .ok_or(ErrorCode::MathOverflow)?;
        Ok(finished)
    }

    pub fn record_claim(&mut self, amount: u64) -> Result<()> {
        self.total_claimed = self
            .total_claimed
            .checked_add(amount)
            .ok_or(ErrorCode::MathOverflow)?;
        Ok(())
    }

    pub fn take_residual(&mut self) -> Result<u64> {
        let amount = self.residual_balance;
        require!(amount > 0, ErrorCode::NoResidualBalance);
        self.residual_balance = 0;
        self.total_residual_withdrawn = self
            .total_residual_withdrawn
            .checked_add(amount)
            .ok_or(ErrorCode::MathOverflow)?;
        Ok(amount)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::states::StakerDirectory;
    use proptest::prelude::*;
    use rand::Rng;
    use std::collections::HashMap;

    const SOL: u64 = 1_000_000_000;

    #[derive(Default)]
    struct Pool {
        ledger: PayoutLedger,
        directory: StakerDirectory,
        infos: HashMap<Pubkey, StakerInfo>,
        /// Lamports above the vault's rent-exempt floor.
        vault: u64,
    }

    impl Pool {
        fn stake(&mut self, staker: Pubkey) {
            self.ledger.require_idle().unwrap();
            let info = self.infos.entry(staker).or_default();
            let became_active = info.add_stake().unwrap();
            self.directory.record_stake(staker, became_active).unwrap();
        }

        fn unstake(&mut self, staker: Pubkey) {
            self.ledger.require_idle().unwrap();
            let info = self.infos.get_mut(&staker).unwrap();
            let became_inactive = info.remove_stake().unwrap();
            self.directory
                .record_unstake(&staker, became_inactive)
                .unwrap();
        }

        fn receive(&mut self, amount: u64) {
            self.ledger.receive(amount).unwrap();
            self.vault += amount;
        }

        /// Runs a full cycle, `batch` stakers per call.
        fn distribute(&mut self, batch: usize) -> Result<DistributionCycle> {
            self.ledger.open_cycle(
                Pubkey::new_unique(),
                self.directory.total_staked_token,
                self.directory.stakers_count(),
            )?;
            while !self.ledger.is_cycle_complete() {
                let start = self.ledger.cursor();
                let end = (start + batch).min(self.directory.stakers.len());
                for index in start..end {
                    let staker = self.directory.stakers[index];
                    let info = self.infos.get_mut(&staker).unwrap();
                    self.ledger.credit_next(info)?;
                }
            }
            self.ledger.close_cycle()
        }

        fn claim(&mut self, staker: Pubkey) -> Result<u64> {
            let info = self.infos.get_mut(&staker).unwrap();
            let amount = info.take_claimable()?;
            self.ledger.record_claim(amount)?;
            self.vault -= amount;
            Ok(amount)
        }

        fn claimable(&self, staker: &Pubkey) -> u64 {
            self.infos.get(staker).map_or(0, |i| i.claimable_balance)
        }

        fn assert_conserved(&self) {
            let credited: u64 = self.infos.values().map(|i| i.claimable_balance).sum();
            assert_eq!(
                self.vault,
                self.ledger.pending_payout_balance + credited + self.ledger.residual_balance
            );
        }
    }

    #[test]
    fn proportional_split_across_seven_stakers() {
        let mut pool = Pool::default();
        let stakers: Vec<Pubkey> = (0..9).map(|_| Pubkey::new_unique()).collect();
        let (double, partial, leaver, late) = (stakers[0], stakers[6], stakers[7], stakers[8]);

        pool.stake(leaver);
        for staker in &stakers[..7] {
            pool.stake(*staker);
        }
        pool.stake(double);
        pool.stake(partial);
        pool.unstake(leaver);
        pool.unstake(partial);

        assert_eq!(pool.directory.stakers_count(), 7);
        assert_eq!(pool.directory.total_staked_token, 8);

        pool.receive(8 * SOL / 10);
        let cycle = pool.distribute(3).unwrap();
        pool.stake(late);

        assert_eq!(cycle.rate_per_token, SOL / 10);
        assert_eq!(cycle.staker_count, 7);
        assert_eq!(pool.claimable(&double), 2 * SOL / 10);
        for staker in &stakers[1..7] {
            assert_eq!(pool.claimable(staker), SOL / 10);
        }
        assert_eq!(pool.claimable(&partial), SOL / 10);
        assert_eq!(pool.claimable(&leaver), 0);
        assert_eq!(pool.claimable(&late), 0);
        assert_eq!(pool.ledger.residual_balance, 0);
        pool.assert_conserved();
    }

    #[test]
    fn second_distribution_without_payout_fails() {
        let mut pool = Pool::default();
        pool.stake(Pubkey::new_unique());
        pool.receive(SOL);
        pool.distribute(16).unwrap();

        assert_eq!(
            pool.distribute(16).unwrap_err(),
            anchor_lang::error::Error::from(ErrorCode::NoPayoutBalance)
        );
        assert_eq!(pool.ledger.cycle_count, 1);
    }

    #[test]
    fn distribution_requires_staked_tokens() {
        let mut pool = Pool::default();
        pool.receive(SOL);
        assert_eq!(
            pool.distribute(16).unwrap_err(),
            anchor_lang::error::Error::from(ErrorCode::NoTokenStaked)
        );
        assert_eq!(pool.ledger.pending_payout_balance, SOL);
    }

    #[test]
    fn remainder_goes_to_residual() {
        let mut pool = Pool::default();
        for _ in 0..3 {
            pool.stake(Pubkey::new_unique());
        }
        pool.receive(10);
        let cycle = pool.distribute(1).unwrap();

        assert_eq!(cycle.rate_per_token, 3);
        assert_eq!(pool.ledger.residual_balance, 1);
        pool.assert_conserved();

        assert_eq!(pool.ledger.take_residual().unwrap(), 1);
        pool.vault -= 1;
        assert_eq!(
            pool.ledger.take_residual().unwrap_err(),
            anchor_lang::error::Error::from(ErrorCode::NoResidualBalance)
        );
        pool.assert_conserved();
    }

    #[test]
    fn stake_is_frozen_mid_cycle() {
        let mut pool = Pool::default();
        let first = Pubkey::new_unique();
        pool.stake(first);
        pool.stake(Pubkey::new_unique());
        pool.receive(SOL);
        pool.ledger.open_cycle(first, 2, 2).unwrap();

        assert_eq!(
            pool.ledger.require_idle().unwrap_err(),
            anchor_lang::error::Error::from(ErrorCode::DistributionInProgress)
        );
        assert_eq!(
            pool.ledger.open_cycle(first, 2, 2).unwrap_err(),
            anchor_lang::error::Error::from(ErrorCode::DistributionInProgress)
        );
        assert!(pool.ledger.close_cycle().is_err());
    }

    #[test]
    fn double_claim_fails() {
        let mut pool = Pool::default();
        let staker = Pubkey::new_unique();
        pool.stake(staker);
        pool.receive(SOL);
        pool.distribute(1).unwrap();

        assert_eq!(pool.claim(staker).unwrap(), SOL);
        assert_eq!(pool.claimable(&staker), 0);
        assert_eq!(
            pool.claim(staker).unwrap_err(),
            anchor_lang::error::Error::from(ErrorCode::NoPayoutBalance)
        );
        assert_eq!(pool.ledger.total_claimed, SOL);
    }

    #[test]
    fn zero_payout_is_rejected() {
        let mut ledger = PayoutLedger::default();
        assert_eq!(
            ledger.receive(0).unwrap_err(),
            anchor_lang::error::Error::from(ErrorCode::InvalidAmount)
        );
    }

    #[test]
    fn randomized_rounds_conserve_lamports() {
        let mut rng = rand::rng();
        let mut pool = Pool::default();
        let stakers: Vec<Pubkey> = (0..20).map(|_| Pubkey::new_unique()).collect();

        for _ in 0..50 {
            let staker = stakers[rng.random_range(0..stakers.len())];
            if rng.random_bool(0.7) || pool.claimable(&staker) == 0 {
                pool.stake(staker);
            } else {
                pool.claim(staker).unwrap();
            }
            pool.receive(rng.random_range(1..5 * SOL));
            pool.distribute(rng.random_range(1..8)).unwrap();
            pool.assert_conserved();
        }
    }

    proptest! {
        #[test]
        fn credited_plus_residual_equals_payout(
            holdings in prop::collection::vec(1u64..5, 1..40),
            amount in 1u64..u64::MAX / 2,
            batch in 1usize..10,
        ) {
            let mut pool = Pool::default();
            for count in &holdings {
                let staker = Pubkey::new_unique();
                for _ in 0..*count {
                    pool.stake(staker);
                }
            }
            pool.receive(amount);
            let cycle = pool.distribute(batch).unwrap();

            let total: u64 = holdings.iter().sum();
            prop_assert_eq!(cycle.rate_per_token, amount / total);
            prop_assert_eq!(pool.ledger.residual_balance, amount % total);
            prop_assert_eq!(pool.ledger.total_distributed, amount - amount % total);
            pool.assert_conserved();
        }
    }
}
