use anchor_lang::{AccountDeserialize, AnchorDeserialize};
use anchor_spl::metadata::mpl_token_metadata;
use anyhow::{format_err, Result};
use pass_staking::states::{
    ALLOW_LIST_SEED, GLOBAL_CONFIG_SEED, PAYOUT_LEDGER_SEED, STAKER_DIRECTORY_SEED,
    STAKER_INFO_SEED, STAKE_RECORD_SEED,
};
use pass_staking::{AUTH_SEED, PASS_VAULT_SEED, PAYOUT_VAULT_SEED};
use solana_client::rpc_client::RpcClient;
use solana_sdk::{account::Account, pubkey::Pubkey};

pub fn deserialize_anchor_account<T: AccountDeserialize>(account: &Account) -> Result<T> {
    let mut data: &[u8] = &account.data;
    T::try_deserialize(&mut data).map_err(Into::into)
}

/// Fetches and decodes a program account.
pub fn fetch_anchor_account<T: AccountDeserialize>(
    rpc_client: &RpcClient,
    address: &Pubkey,
) -> Result<T> {
    let account = rpc_client.get_account(address)?;
    deserialize_anchor_account(&account)
}

/// Decodes a view's return data.
///
/// The runtime strips trailing zero bytes from return data, so the buffer
/// is padded back to `encoded_len` before decoding.
pub fn decode_return<T: AnchorDeserialize>(mut data: Vec<u8>, encoded_len: usize) -> Result<T> {
    if data.len() < encoded_len {
        data.resize(encoded_len, 0);
    }
    T::try_from_slice(&data).map_err(|e| format_err!("failed to decode return data: {}", e))
}

/// Token program owning `mint` (classic SPL Token or Token-2022).
pub fn get_token_program(rpc_client: &RpcClient, mint: &Pubkey) -> Result<Pubkey> {
    Ok(rpc_client.get_account(mint)?.owner)
}

pub fn get_authority_address(program_id: &Pubkey) -> Pubkey {
    Pubkey::find_program_address(&[AUTH_SEED.as_bytes()], program_id).0
}

pub fn get_global_config_address(program_id: &Pubkey) -> Pubkey {
    Pubkey::find_program_address(&[GLOBAL_CONFIG_SEED.as_bytes()], program_id).0
}

pub fn get_staker_directory_address(program_id: &Pubkey) -> Pubkey {
    Pubkey::find_program_address(&[STAKER_DIRECTORY_SEED.as_bytes()], program_id).0
}

pub fn get_payout_ledger_address(program_id: &Pubkey) -> Pubkey {
    Pubkey::find_program_address(&[PAYOUT_LEDGER_SEED.as_bytes()], program_id).0
}

pub fn get_allow_list_address(program_id: &Pubkey) -> Pubkey {
    Pubkey::find_program_address(&[ALLOW_LIST_SEED.as_bytes()], program_id).0
}

pub fn get_payout_vault_address(program_id: &Pubkey) -> Pubkey {
    Pubkey::find_program_address(&[PAYOUT_VAULT_SEED.as_bytes()], program_id).0
}

pub fn get_staker_info_address(program_id: &Pubkey, staker: &Pubkey) -> Pubkey {
    Pubkey::find_program_address(&[STAKER_INFO_SEED.as_bytes(), staker.as_ref()], program_id).0
}

pub fn get_stake_record_address(program_id: &Pubkey, mint: &Pubkey) -> Pubkey {
    Pubkey::find_program_address(&[STAKE_RECORD_SEED.as_bytes(), mint.as_ref()], program_id).0
}

pub fn get_pass_vault_address(program_id: &Pubkey, mint: &Pubkey) -> Pubkey {
    Pubkey::find_program_address(&[PASS_VAULT_SEED.as_bytes(), mint.as_ref()], program_id).0
}

pub fn get_metadata_address(mint: &Pubkey) -> Pubkey {
    let metadata_program = mpl_token_metadata::ID;
    Pubkey::find_program_address(
        &[b"metadata", metadata_program.as_ref(), mint.as_ref()],
        &metadata_program,
    )
    .0
}
