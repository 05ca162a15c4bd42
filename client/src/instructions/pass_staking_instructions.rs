use anchor_client::{Client, Cluster, Program};
use anchor_lang::prelude::AccountMeta;
use anyhow::Result;
use pass_staking::accounts as pass_accounts;
use pass_staking::instruction as pass_instructions;
use solana_sdk::{instruction::Instruction, pubkey::Pubkey, signature::Keypair, system_program};
use spl_associated_token_account::{
    get_associated_token_address_with_program_id,
    instruction::create_associated_token_account_idempotent,
};
use std::rc::Rc;

use crate::instructions::utils::*;

use super::super::{read_keypair_file, ClientConfig};

/// Anchor program handle whose payer is the keypair at `keypair_path`.
fn program_for(config: &ClientConfig, keypair_path: &str) -> Result<Program<Rc<Keypair>>> {
    let signer = read_keypair_file(keypair_path)?;
    let url = Cluster::Custom(config.http_url.clone(), config.ws_url.clone());
    let client = Client::new(url, Rc::new(signer));
    Ok(client.program(config.pass_staking_program)?)
}

/// Delegates one unit of the pass to the program authority, which is what
/// stake transfers with.
fn approve_instr(
    token_program: &Pubkey,
    owner_pass_token: &Pubkey,
    authority: &Pubkey,
    owner: &Pubkey,
) -> Result<Instruction> {
    Ok(spl_token_2022::instruction::approve(
        token_program,
        owner_pass_token,
        authority,
        owner,
        &[],
        1,
    )?)
}

pub fn initialize_instr(
    config: &ClientConfig,
    admin: Pubkey,
    pass_collection: Pubkey,
    lock_period: i64,
) -> Result<Vec<Instruction>> {
    let program = program_for(config, &config.admin_path)?;
    let program_id = program.id();

    let instructions = program
        .request()
        .accounts(pass_accounts::Initialize {
            owner: program.payer(),
            global_config: get_global_config_address(&program_id),
            staker_directory: get_staker_directory_address(&program_id),
            payout_ledger: get_payout_ledger_address(&program_id),
            allow_list: get_allow_list_address(&program_id),
            payout_vault: get_payout_vault_address(&program_id),
            system_program: system_program::id(),
        })
        .args(pass_instructions::Initialize {
            admin,
            pass_collection,
            lock_period,
        })
        .instructions()?;
    Ok(instructions)
}

pub fn update_config_instr(
    config: &ClientConfig,
    param: u8,
    value: u64,
    new_admin: Option<Pubkey>,
) -> Result<Vec<Instruction>> {
    let program = program_for(config, &config.admin_path)?;

    let mut ixs = program
        .request()
        .accounts(pass_accounts::UpdateConfig {
            owner: program.payer(),
            global_config: get_global_config_address(&program.id()),
        })
        .args(pass_instructions::UpdateConfig { param, value })
        .instructions()?;

    if let Some(admin) = new_admin {
        ixs[0]
            .accounts
            .push(AccountMeta::new_readonly(admin, false));
    }
    Ok(ixs)
}

pub fn update_allowed_sources_instr(
    config: &ClientConfig,
    sources: Vec<Pubkey>,
    flags: Vec<bool>,
) -> Result<Vec<Instruction>> {
    let program = program_for(config, &config.admin_path)?;
    let program_id = program.id();

    let instructions = program
        .request()
        .accounts(pass_accounts::UpdateAllowedSources {
            owner: program.payer(),
            global_config: get_global_config_address(&program_id),
            allow_list: get_allow_list_address(&program_id),
        })
        .args(pass_instructions::UpdateAllowedSources { sources, flags })
        .instructions()?;
    Ok(instructions)
}

/// Approve + stake for a single pass held in the payer's ATA.
pub fn stake_instr(
    config: &ClientConfig,
    pass_mint: Pubkey,
    token_program: Pubkey,
) -> Result<Vec<Instruction>> {
    let program = program_for(config, &config.payer_path)?;
    let program_id = program.id();
    let owner = program.payer();
    let authority = get_authority_address(&program_id);
    let owner_pass_token =
        get_associated_token_address_with_program_id(&owner, &pass_mint, &token_program);

    let mut instructions = vec![approve_instr(
        &token_program,
        &owner_pass_token,
        &authority,
        &owner,
    )?];
    instructions.extend(
        program
            .request()
            .accounts(pass_accounts::Stake {
                owner,
                global_config: get_global_config_address(&program_id),
                authority,
                pass_mint,
                pass_metadata: get_metadata_address(&pass_mint),
                owner_pass_token,
                pass_vault: get_pass_vault_address(&program_id, &pass_mint),
                stake_record: get_stake_record_address(&program_id, &pass_mint),
                staker_info: get_staker_info_address(&program_id, &owner),
                staker_directory: get_staker_directory_address(&program_id),
                payout_ledger: get_payout_ledger_address(&program_id),
                metadata_program: anchor_spl::metadata::mpl_token_metadata::ID,
                token_program,
                system_program: system_program::id(),
            })
            .args(pass_instructions::Stake {})
            .instructions()?,
    );
    Ok(instructions)
}

/// Approvals for every pass followed by one `stake_bulk`.
pub fn stake_bulk_instr(
    config: &ClientConfig,
    pass_mints: Vec<Pubkey>,
    token_program: Pubkey,
) -> Result<Vec<Instruction>> {
    let program = program_for(config, &config.payer_path)?;
    let program_id = program.id();
    let owner = program.payer();
    let authority = get_authority_address(&program_id);

    let mut instructions = Vec::new();
    let mut remaining = Vec::new();
    for mint in &pass_mints {
        let owner_pass_token =
            get_associated_token_address_with_program_id(&owner, mint, &token_program);
        instructions.push(approve_instr(
            &token_program,
            &owner_pass_token,
            &authority,
            &owner,
        )?);
        remaining.extend([
            AccountMeta::new_readonly(*mint, false),
            AccountMeta::new_readonly(get_metadata_address(mint), false),
            AccountMeta::new(owner_pass_token, false),
            AccountMeta::new(get_pass_vault_address(&program_id, mint), false),
            AccountMeta::new(get_stake_record_address(&program_id, mint), false),
        ]);
    }

    let mut ixs = program
        .request()
        .accounts(pass_accounts::StakeBulk {
            owner,
            global_config: get_global_config_address(&program_id),
            authority,
            staker_info: get_staker_info_address(&program_id, &owner),
            staker_directory: get_staker_directory_address(&program_id),
            payout_ledger: get_payout_ledger_address(&program_id),
            token_program,
            system_program: system_program::id(),
        })
        .args(pass_instructions::StakeBulk { pass_mints })
        .instructions()?;
    ixs[0].accounts.extend(remaining);
    instructions.extend(ixs);
    Ok(instructions)
}

pub fn unstake_instr(
    config: &ClientConfig,
    pass_mint: Pubkey,
    token_program: Pubkey,
) -> Result<Vec<Instruction>> {
    let program = program_for(config, &config.payer_path)?;
    let program_id = program.id();
    let owner = program.payer();

    let instructions = program
        .request()
        .accounts(pass_accounts::Unstake {
            owner,
            global_config: get_global_config_address(&program_id),
            authority: get_authority_address(&program_id),
            pass_mint,
            owner_pass_token: get_associated_token_address_with_program_id(
                &owner,
                &pass_mint,
                &token_program,
            ),
            pass_vault: get_pass_vault_address(&program_id, &pass_mint),
            stake_record: get_stake_record_address(&program_id, &pass_mint),
            staker_info: get_staker_info_address(&program_id, &owner),
            staker_directory: get_staker_directory_address(&program_id),
            payout_ledger: get_payout_ledger_address(&program_id),
            token_program,
            associated_token_program: spl_associated_token_account::id(),
            system_program: system_program::id(),
        })
        .args(pass_instructions::Unstake {})
        .instructions()?;
    Ok(instructions)
}

/// Idempotent ATA creation for every pass followed by one `unstake_bulk`.
pub fn unstake_bulk_instr(
    config: &ClientConfig,
    pass_mints: Vec<Pubkey>,
    token_program: Pubkey,
) -> Result<Vec<Instruction>> {
    let program = program_for(config, &config.payer_path)?;
    let program_id = program.id();
    let owner = program.payer();

    let mut instructions = Vec::new();
    let mut remaining = Vec::new();
    for mint in &pass_mints {
        instructions.push(create_associated_token_account_idempotent(
            &owner,
            &owner,
            mint,
            &token_program,
        ));
        remaining.extend([
            AccountMeta::new_readonly(*mint, false),
            AccountMeta::new(
                get_associated_token_address_with_program_id(&owner, mint, &token_program),
                false,
            ),
            AccountMeta::new(get_pass_vault_address(&program_id, mint), false),
            AccountMeta::new(get_stake_record_address(&program_id, mint), false),
        ]);
    }

    let mut ixs = program
        .request()
        .accounts(pass_accounts::UnstakeBulk {
            owner,
            global_config: get_global_config_address(&program_id),
            authority: get_authority_address(&program_id),
            staker_info: get_staker_info_address(&program_id, &owner),
            staker_directory: get_staker_directory_address(&program_id),
            payout_ledger: get_payout_ledger_address(&program_id),
            token_program,
            system_program: system_program::id(),
        })
        .args(pass_instructions::UnstakeBulk { pass_mints })
        .instructions()?;
    ixs[0].accounts.extend(remaining);
    instructions.extend(ixs);
    Ok(instructions)
}

pub fn receive_payout_instr(config: &ClientConfig, amount: u64) -> Result<Vec<Instruction>> {
    let program = program_for(config, &config.payer_path)?;
    let program_id = program.id();

    let instructions = program
        .request()
        .accounts(pass_accounts::ReceivePayout {
            source: program.payer(),
            allow_list: get_allow_list_address(&program_id),
            payout_ledger: get_payout_ledger_address(&program_id),
            payout_vault: get_payout_vault_address(&program_id),
            system_program: system_program::id(),
        })
        .args(pass_instructions::ReceivePayout { amount })
        .instructions()?;
    Ok(instructions)
}

/// One distribution step crediting `stakers`, which must continue the
/// directory from the ledger cursor.
pub fn distribute_payout_instr(
    config: &ClientConfig,
    stakers: &[Pubkey],
) -> Result<Vec<Instruction>> {
    let program = program_for(config, &config.admin_path)?;
    let program_id = program.id();

    let mut ixs = program
        .request()
        .accounts(pass_accounts::DistributePayout {
            operator: program.payer(),
            global_config: get_global_config_address(&program_id),
            staker_directory: get_staker_directory_address(&program_id),
            payout_ledger: get_payout_ledger_address(&program_id),
        })
        .args(pass_instructions::DistributePayout {})
        .instructions()?;
    ixs[0].accounts.extend(
        stakers
            .iter()
            .map(|staker| AccountMeta::new(get_staker_info_address(&program_id, staker), false)),
    );
    Ok(ixs)
}

pub fn claim_payout_instr(config: &ClientConfig) -> Result<Vec<Instruction>> {
    let program = program_for(config, &config.payer_path)?;
    let program_id = program.id();
    let owner = program.payer();

    let instructions = program
        .request()
        .accounts(pass_accounts::ClaimPayout {
            owner,
            staker_info: get_staker_info_address(&program_id, &owner),
            payout_ledger: get_payout_ledger_address(&program_id),
            payout_vault: get_payout_vault_address(&program_id),
            system_program: system_program::id(),
        })
        .args(pass_instructions::ClaimPayout {})
        .instructions()?;
    Ok(instructions)
}

pub fn withdraw_residual_instr(config: &ClientConfig) -> Result<Vec<Instruction>> {
    let program = program_for(config, &config.admin_path)?;
    let program_id = program.id();

    let instructions = program
        .request()
        .accounts(pass_accounts::WithdrawResidual {
            owner: program.payer(),
            global_config: get_global_config_address(&program_id),
            payout_ledger: get_payout_ledger_address(&program_id),
            payout_vault: get_payout_vault_address(&program_id),
            system_program: system_program::id(),
        })
        .args(pass_instructions::WithdrawResidual {})
        .instructions()?;
    Ok(instructions)
}

pub fn can_stake_instr(
    config: &ClientConfig,
    staker: Pubkey,
    pass_mints: Vec<Pubkey>,
    token_program: Pubkey,
) -> Result<Vec<Instruction>> {
    let program = program_for(config, &config.payer_path)?;
    let program_id = program.id();

    let remaining: Vec<AccountMeta> = pass_mints
        .iter()
        .flat_map(|mint| {
            [
                AccountMeta::new_readonly(*mint, false),
                AccountMeta::new_readonly(
                    get_associated_token_address_with_program_id(&staker, mint, &token_program),
                    false,
                ),
                AccountMeta::new_readonly(get_metadata_address(mint), false),
                AccountMeta::new_readonly(get_stake_record_address(&program_id, mint), false),
            ]
        })
        .collect();

    let mut ixs = program
        .request()
        .accounts(pass_accounts::CanStake {
            staker,
            global_config: get_global_config_address(&program_id),
        })
        .args(pass_instructions::CanStake { pass_mints })
        .instructions()?;
    ixs[0].accounts.extend(remaining);
    Ok(ixs)
}

pub fn can_unstake_instr(
    config: &ClientConfig,
    staker: Pubkey,
    pass_mints: Vec<Pubkey>,
) -> Result<Vec<Instruction>> {
    let program = program_for(config, &config.payer_path)?;
    let program_id = program.id();

    let remaining: Vec<AccountMeta> = pass_mints
        .iter()
        .map(|mint| AccountMeta::new_readonly(get_stake_record_address(&program_id, mint), false))
        .collect();

    let mut ixs = program
        .request()
        .accounts(pass_accounts::CanUnstake { staker })
        .args(pass_instructions::CanUnstake { pass_mints })
        .instructions()?;
    ixs[0].accounts.extend(remaining);
    Ok(ixs)
}

pub fn stakers_count_instr(config: &ClientConfig) -> Result<Vec<Instruction>> {
    let program = program_for(config, &config.payer_path)?;

    let instructions = program
        .request()
        .accounts(pass_accounts::StakersCount {
            staker_directory: get_staker_directory_address(&program.id()),
        })
        .args(pass_instructions::StakersCount {})
        .instructions()?;
    Ok(instructions)
}

pub fn is_staker_instr(config: &ClientConfig, staker: Pubkey) -> Result<Vec<Instruction>> {
    let program = program_for(config, &config.payer_path)?;

    let instructions = program
        .request()
        .accounts(pass_accounts::IsStaker {
            staker_info: get_staker_info_address(&program.id(), &staker),
        })
        .args(pass_instructions::IsStaker { staker })
        .instructions()?;
    Ok(instructions)
}

pub fn next_payout_balance_instr(config: &ClientConfig) -> Result<Vec<Instruction>> {
    let program = program_for(config, &config.payer_path)?;

    let instructions = program
        .request()
        .accounts(pass_accounts::NextPayoutBalance {
            payout_ledger: get_payout_ledger_address(&program.id()),
        })
        .args(pass_instructions::NextPayoutBalance {})
        .instructions()?;
    Ok(instructions)
}

pub fn claimable_balance_instr(config: &ClientConfig, staker: Pubkey) -> Result<Vec<Instruction>> {
    let program = program_for(config, &config.payer_path)?;

    let instructions = program
        .request()
        .accounts(pass_accounts::ClaimableBalance {
            staker_info: get_staker_info_address(&program.id(), &staker),
        })
        .args(pass_instructions::ClaimableBalance { staker })
        .instructions()?;
    Ok(instructions)
}
