use anyhow::{format_err, Result};
use base64::{engine::general_purpose::STANDARD, Engine};
use solana_client::rpc_client::RpcClient;
use solana_client::rpc_config::RpcSendTransactionConfig;
use solana_sdk::{
    commitment_config::CommitmentConfig, signature::Signature, transaction::Transaction,
};

pub fn send_txn(client: &RpcClient, txn: &Transaction, wait_confirm: bool) -> Result<Signature> {
    let signature = if wait_confirm {
        client.send_and_confirm_transaction_with_spinner_and_config(
            txn,
            CommitmentConfig::confirmed(),
            RpcSendTransactionConfig {
                skip_preflight: false,
                ..RpcSendTransactionConfig::default()
            },
        )?
    } else {
        client.send_transaction(txn)?
    };
    Ok(signature)
}

/// Simulates `txn` and returns the raw return data of its last instruction.
///
/// Used for the program's read-only instructions.
pub fn simulate_return_data(client: &RpcClient, txn: &Transaction) -> Result<Vec<u8>> {
    let result = client.simulate_transaction(txn)?.value;
    if let Some(err) = result.err {
        let logs = result.logs.unwrap_or_default().join("\n");
        return Err(format_err!("simulation failed: {}\n{}", err, logs));
    }
    match result.return_data {
        Some(return_data) => Ok(STANDARD.decode(return_data.data.0)?),
        None => Ok(Vec::new()),
    }
}
