use anchor_lang::prelude::*;

#[error_code]
pub enum ErrorCode {
    #[msg("Signer is not the protocol admin")]
    InvalidOwner,

    #[msg("Staking is paused")]
    Paused,

    #[msg("Caller does not hold this pass")]
    TokenNotOwned,

    #[msg("Pass is still inside its lock period")]
    TokenLocked,

    #[msg("Caller is not the recorded staker of this pass")]
    NotTokenOwner,

    #[msg("Pass has not been delegated to the custody authority")]
    NotApproved,

    #[msg("Mint is not a verified member of the pass collection")]
    InvalidPassCollection,

    #[msg("Pass mint must be a non-fungible mint")]
    InvalidPassMint,

    #[msg("Pass custody can only enter through stake")]
    OnlyFromDirectStake,

    #[msg("Pass token account does not match the staker or mint")]
    InvalidPassAccount,

    #[msg("Stake record does not match the pass mint")]
    InvalidStakeRecord,

    #[msg("Revenue source is not allowed to push payouts")]
    PayoutFail,

    #[msg("No pass is currently staked")]
    NoTokenStaked,

    #[msg("No payout balance available")]
    NoPayoutBalance,

    #[msg("No residual balance available")]
    NoResidualBalance,

    #[msg("A payout distribution is still in progress")]
    DistributionInProgress,

    #[msg("Staker account does not follow the directory order")]
    DirectoryMismatch,

    #[msg("Staker directory is full")]
    DirectoryFull,

    #[msg("Sources and flags lengths differ")]
    LengthsMismatch,

    #[msg("Revenue source address is invalid")]
    InvalidRevenueSource,

    #[msg("Revenue source allow-list is full")]
    AllowListFull,

    #[msg("Too many passes for a single instruction")]
    TooManyPasses,

    #[msg("Pass listed more than once")]
    DuplicatePass,

    #[msg("Missing remaining account")]
    MissingRemainingAccount,

    #[msg("Amount must be greater than zero")]
    InvalidAmount,

    #[msg("Invalid parameter provided")]
    InvalidParam,

    #[msg("Math operation overflowed or underflowed")]
    MathOverflow,
}
