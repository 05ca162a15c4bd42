use anyhow::{format_err, Result};
use clap::Parser;
use configparser::ini::Ini;
use pass_staking::states::{GlobalConfig, PayoutLedger, StakerDirectory};
use solana_client::rpc_client::RpcClient;
use solana_sdk::{
    instruction::Instruction,
    pubkey::Pubkey,
    signature::{Keypair, Signer},
    transaction::Transaction,
};
use std::str::FromStr;

mod instructions;
use instructions::pass_staking_instructions::*;
use instructions::rpc::*;
use instructions::utils::*;

#[derive(Clone, Debug, PartialEq)]
pub struct ClientConfig {
    http_url: String,
    ws_url: String,
    payer_path: String,
    admin_path: String,
    pass_staking_program: Pubkey,
}

fn load_cfg(client_config: &str) -> Result<ClientConfig> {
    let mut config = Ini::new();
    config
        .load(client_config)
        .map_err(|e| format_err!("failed to load {}: {}", client_config, e))?;
    let get = |key: &str| -> Result<String> {
        match config.get("Global", key) {
            Some(value) if !value.is_empty() => Ok(value),
            _ => Err(format_err!("{} must not be empty", key)),
        }
    };

    let pass_staking_program = Pubkey::from_str(&get("pass_staking_program")?)?;
    Ok(ClientConfig {
        http_url: get("http_url")?,
        ws_url: get("ws_url")?,
        payer_path: get("payer_path")?,
        admin_path: get("admin_path")?,
        pass_staking_program,
    })
}

fn read_keypair_file(s: &str) -> Result<Keypair> {
    solana_sdk::signature::read_keypair_file(s)
        .map_err(|_| format_err!("failed to read keypair from {}", s))
}

#[derive(Debug, Parser)]
pub struct Opts {
    #[clap(subcommand)]
    pub command: PassStakingCommands,
}

#[derive(Debug, Parser)]
pub enum PassStakingCommands {
    Initialize {
        #[arg(long)]
        admin: Pubkey,
        #[arg(long)]
        pass_collection: Pubkey,
        #[arg(long, default_value_t = pass_staking::DEFAULT_LOCK_PERIOD)]
        lock_period: i64,
    },
    UpdateConfig {
        #[arg(long)]
        param: u8,
        #[arg(long)]
        value: u64,
        #[arg(long)]
        admin: Option<Pubkey>,
    },
    UpdateAllowedSources {
        #[arg(long, value_delimiter = ',')]
        sources: Vec<Pubkey>,
        #[arg(long, value_delimiter = ',')]
        flags: Vec<bool>,
    },
    Stake {
        #[arg(long)]
        mint: Pubkey,
    },
    StakeBulk {
        #[arg(long, value_delimiter = ',')]
        mints: Vec<Pubkey>,
    },
    Unstake {
        #[arg(long)]
        mint: Pubkey,
    },
    UnstakeBulk {
        #[arg(long, value_delimiter = ',')]
        mints: Vec<Pubkey>,
    },
    ReceivePayout {
        /// Lamports.
        #[arg(long)]
        amount: u64,
    },
    /// Runs a full distribution cycle, `batch` stakers per transaction.
    Distribute {
        #[arg(long, default_value_t = 20)]
        batch: usize,
    },
    Claim {},
    WithdrawResidual {},
    CanStake {
        #[arg(long)]
        staker: Option<Pubkey>,
        #[arg(long, value_delimiter = ',')]
        mints: Vec<Pubkey>,
    },
    CanUnstake {
        #[arg(long)]
        staker: Option<Pubkey>,
        #[arg(long, value_delimiter = ',')]
        mints: Vec<Pubkey>,
    },
    StakersCount {},
    IsStaker {
        #[arg(long)]
        staker: Pubkey,
    },
    NextPayoutBalance {},
    ClaimableBalance {
        #[arg(long)]
        staker: Pubkey,
    },
    /// Prints config, directory and ledger state.
    Status {},
}

fn send(rpc_client: &RpcClient, instructions: &[Instruction], signer: &Keypair) -> Result<()> {
    let recent_hash = rpc_client.get_latest_blockhash()?;
    let txn = Transaction::new_signed_with_payer(
        instructions,
        Some(&signer.pubkey()),
        &[signer],
        recent_hash,
    );
    let signature = send_txn(rpc_client, &txn, true)?;
    println!("{}", signature);
    Ok(())
}

fn simulate(
    rpc_client: &RpcClient,
    instructions: &[Instruction],
    signer: &Keypair,
) -> Result<Vec<u8>> {
    let recent_hash = rpc_client.get_latest_blockhash()?;
    let txn = Transaction::new_signed_with_payer(
        instructions,
        Some(&signer.pubkey()),
        &[signer],
        recent_hash,
    );
    simulate_return_data(rpc_client, &txn)
}

fn token_program_of(rpc_client: &RpcClient, mints: &[Pubkey]) -> Result<Pubkey> {
    let first = mints
        .first()
        .ok_or_else(|| format_err!("at least one mint is required"))?;
    get_token_program(rpc_client, first)
}

fn print_verdicts(mints: &[Pubkey], verdicts: &[Pubkey]) {
    for (mint, verdict) in mints.iter().zip(verdicts) {
        let eligible = *verdict != Pubkey::default();
        println!("{} {}", mint, if eligible { "yes" } else { "no" });
    }
}

fn distribute(
    rpc_client: &RpcClient,
    config: &ClientConfig,
    admin: &Keypair,
    batch: usize,
) -> Result<()> {
    let program_id = config.pass_staking_program;
    let ledger_address = get_payout_ledger_address(&program_id);
    let directory_address = get_staker_directory_address(&program_id);

    loop {
        let ledger: PayoutLedger = fetch_anchor_account(rpc_client, &ledger_address)?;
        let directory: StakerDirectory = fetch_anchor_account(rpc_client, &directory_address)?;
        let cursor = if ledger.cycle.active {
            ledger.cycle.cursor as usize
        } else {
            0
        };
        let page: Vec<Pubkey> = directory
            .stakers
            .iter()
            .skip(cursor)
            .take(batch.max(1))
            .copied()
            .collect();
        if ledger.cycle.active && page.is_empty() {
            return Err(format_err!("cycle active but no staker left at cursor {}", cursor));
        }

        send(rpc_client, &distribute_payout_instr(config, &page)?, admin)?;

        let ledger: PayoutLedger = fetch_anchor_account(rpc_client, &ledger_address)?;
        if !ledger.cycle.active {
            println!("distribution {} complete", ledger.cycle_count);
            return Ok(());
        }
        println!(
            "credited {}/{}",
            ledger.cycle.cursor, ledger.cycle.staker_count
        );
    }
}

fn main() -> Result<()> {
    let client_config = "client_config.ini";
    let config = load_cfg(client_config)?;
    let payer = read_keypair_file(&config.payer_path)?;
    let rpc_client = RpcClient::new(config.http_url.to_string());

    let opts = Opts::parse();
    match opts.command {
        PassStakingCommands::Initialize {
            admin,
            pass_collection,
            lock_period,
        } => {
            let signer = read_keypair_file(&config.admin_path)?;
            let ixs = initialize_instr(&config, admin, pass_collection, lock_period)?;
            send(&rpc_client, &ixs, &signer)?;
        }
        PassStakingCommands::UpdateConfig {
            param,
            value,
            admin,
        } => {
            let signer = read_keypair_file(&config.admin_path)?;
            let ixs = update_config_instr(&config, param, value, admin)?;
            send(&rpc_client, &ixs, &signer)?;
        }
        PassStakingCommands::UpdateAllowedSources { sources, flags } => {
            let signer = read_keypair_file(&config.admin_path)?;
            let ixs = update_allowed_sources_instr(&config, sources, flags)?;
            send(&rpc_client, &ixs, &signer)?;
        }
        PassStakingCommands::Stake { mint } => {
            let token_program = get_token_program(&rpc_client, &mint)?;
            let ixs = stake_instr(&config, mint, token_program)?;
            send(&rpc_client, &ixs, &payer)?;
        }
        PassStakingCommands::StakeBulk { mints } => {
            let token_program = token_program_of(&rpc_client, &mints)?;
            let ixs = stake_bulk_instr(&config, mints, token_program)?;
            send(&rpc_client, &ixs, &payer)?;
        }
        PassStakingCommands::Unstake { mint } => {
            let token_program = get_token_program(&rpc_client, &mint)?;
            let ixs = unstake_instr(&config, mint, token_program)?;
            send(&rpc_client, &ixs, &payer)?;
        }
        PassStakingCommands::UnstakeBulk { mints } => {
            let token_program = token_program_of(&rpc_client, &mints)?;
            let ixs = unstake_bulk_instr(&config, mints, token_program)?;
            send(&rpc_client, &ixs, &payer)?;
        }
        PassStakingCommands::ReceivePayout { amount } => {
            let ixs = receive_payout_instr(&config, amount)?;
            send(&rpc_client, &ixs, &payer)?;
        }
        PassStakingCommands::Distribute { batch } => {
            let admin = read_keypair_file(&config.admin_path)?;
            distribute(&rpc_client, &config, &admin, batch)?;
        }
        PassStakingCommands::Claim {} => {
            let ixs = claim_payout_instr(&config)?;
            send(&rpc_client, &ixs, &payer)?;
        }
        PassStakingCommands::WithdrawResidual {} => {
            let signer = read_keypair_file(&config.admin_path)?;
            let ixs = withdraw_residual_instr(&config)?;
            send(&rpc_client, &ixs, &signer)?;
        }
        PassStakingCommands::CanStake { staker, mints } => {
            let staker = staker.unwrap_or_else(|| payer.pubkey());
            let token_program = token_program_of(&rpc_client, &mints)?;
            let ixs = can_stake_instr(&config, staker, mints.clone(), token_program)?;
            let data = simulate(&rpc_client, &ixs, &payer)?;
            let verdicts: Vec<Pubkey> = decode_return(data, 4 + 32 * mints.len())?;
            print_verdicts(&mints, &verdicts);
        }
        PassStakingCommands::CanUnstake { staker, mints } => {
            let staker = staker.unwrap_or_else(|| payer.pubkey());
            let ixs = can_unstake_instr(&config, staker, mints.clone())?;
            let data = simulate(&rpc_client, &ixs, &payer)?;
            let verdicts: Vec<Pubkey> = decode_return(data, 4 + 32 * mints.len())?;
            print_verdicts(&mints, &verdicts);
        }
        PassStakingCommands::StakersCount {} => {
            let data = simulate(&rpc_client, &stakers_count_instr(&config)?, &payer)?;
            let count: u64 = decode_return(data, 8)?;
            println!("{}", count);
        }
        PassStakingCommands::IsStaker { staker } => {
            let data = simulate(&rpc_client, &is_staker_instr(&config, staker)?, &payer)?;
            let is_staker: bool = decode_return(data, 1)?;
            println!("{}", is_staker);
        }
        PassStakingCommands::NextPayoutBalance {} => {
            let data = simulate(&rpc_client, &next_payout_balance_instr(&config)?, &payer)?;
            let balance: u64 = decode_return(data, 8)?;
            println!("{}", balance);
        }
        PassStakingCommands::ClaimableBalance { staker } => {
            let ixs = claimable_balance_instr(&config, staker)?;
            let data = simulate(&rpc_client, &ixs, &payer)?;
            let balance: u64 = decode_return(data, 8)?;
            println!("{}", balance);
        }
        PassStakingCommands::Status {} => {
            let program_id = config.pass_staking_program;
            let global_config: GlobalConfig =
                fetch_anchor_account(&rpc_client, &get_global_config_address(&program_id))?;
            let directory: StakerDirectory =
                fetch_anchor_account(&rpc_client, &get_staker_directory_address(&program_id))?;
            let ledger: PayoutLedger =
                fetch_anchor_account(&rpc_client, &get_payout_ledger_address(&program_id))?;
            println!("{:#?}", global_config);
            println!(
                "stakers: {}, staked passes: {}",
                directory.stakers_count(),
                directory.total_staked_token
            );
            println!("{:#?}", ledger);
        }
    }
    Ok(())
}
