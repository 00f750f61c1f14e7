//! Shaping signing inputs into device requests

use crate::error::{SignerError, SignerResult};
use crate::proto::messages_ethereum::{
    EthereumAccessList, EthereumGetAddress, EthereumSignMessage, EthereumSignTx,
    EthereumSignTxEip1559, EthereumSignTypedData, EthereumSignTypedHash, EthereumTxAck,
};
use crate::proto::MessageType;
use crate::request::{DynamicFeeTransaction, StaticFeeTransaction, TypedData};
use crate::transport::{Continuation, DeviceRequest};
use ethereum_types::{Address, H256, U256};
use prost::Message;

/// Largest data slice the device accepts per message
pub const DATA_CHUNK_SIZE: usize = 1024;

/// Minimal big-endian encoding; zero encodes as no bytes
pub fn be_trimmed(value: U256) -> Vec<u8> {
    let mut buf = [0u8; 32];
    value.to_big_endian(&mut buf);
    let start = buf.iter().position(|b| *b != 0).unwrap_or(buf.len());
    buf[start..].to_vec()
}

/// Initial chunk plus encoded `EthereumTxAck` bodies for the rest
fn split_data(data: &[u8]) -> (Vec<u8>, Vec<Vec<u8>>) {
    let initial_len = data.len().min(DATA_CHUNK_SIZE);
    let (initial, rest) = data.split_at(initial_len);
    let acks = rest
        .chunks(DATA_CHUNK_SIZE)
        .map(|chunk| {
            EthereumTxAck {
                data_chunk: chunk.to_vec(),
            }
            .encode_to_vec()
        })
        .collect();
    (initial.to_vec(), acks)
}

fn data_continuation(acks: Vec<Vec<u8>>) -> Continuation {
    if acks.is_empty() {
        Continuation::None
    } else {
        Continuation::DataChunks(acks)
    }
}

fn recipient(to: Option<Address>) -> String {
    to.map(|address| format_address(&address)).unwrap_or_default()
}

pub(crate) fn format_address(address: &Address) -> String {
    format!("0x{}", hex::encode(address.as_bytes()))
}

/// Total payload length as the device's 32-bit field
fn data_length(len: usize) -> SignerResult<u32> {
    u32::try_from(len).map_err(|_| {
        SignerError::UnsupportedTransactionType(format!(
            "transaction data of {} bytes exceeds the device limit of {} bytes",
            len,
            u32::MAX
        ))
    })
}

pub(crate) fn get_address(address_n: &[u32]) -> DeviceRequest {
    DeviceRequest::new(
        MessageType::EthereumGetAddress,
        &EthereumGetAddress {
            address_n: address_n.to_vec(),
            show_display: Some(false),
        },
    )
}

pub(crate) fn personal_message(address_n: &[u32], message: &[u8]) -> DeviceRequest {
    DeviceRequest::new(
        MessageType::EthereumSignMessage,
        &EthereumSignMessage {
            address_n: address_n.to_vec(),
            message: message.to_vec(),
        },
    )
}

pub(crate) fn typed_data_hash(
    address_n: &[u32],
    domain_hash: &H256,
    message_hash: &H256,
) -> DeviceRequest {
    DeviceRequest::new(
        MessageType::EthereumSignTypedHash,
        &EthereumSignTypedHash {
            address_n: address_n.to_vec(),
            domain_separator_hash: domain_hash.as_bytes().to_vec(),
            message_hash: Some(message_hash.as_bytes().to_vec()),
        },
    )
}

pub(crate) fn typed_data_full(address_n: &[u32], data: &TypedData) -> DeviceRequest {
    DeviceRequest::new(
        MessageType::EthereumSignTypedData,
        &EthereumSignTypedData {
            address_n: address_n.to_vec(),
            primary_type: data.primary_type.clone(),
            metamask_v4_compat: Some(true),
        },
    )
    .with_continuation(Continuation::TypedData(data.clone()))
}

pub(crate) fn static_fee(
    address_n: &[u32],
    tx: &StaticFeeTransaction,
) -> SignerResult<DeviceRequest> {
    let data_length = data_length(tx.data.len())?;
    let (initial, acks) = split_data(&tx.data);
    Ok(DeviceRequest::new(
        MessageType::EthereumSignTx,
        &EthereumSignTx {
            address_n: address_n.to_vec(),
            nonce: Some(be_trimmed(tx.nonce)),
            gas_price: be_trimmed(tx.gas_price),
            gas_limit: be_trimmed(tx.gas_limit),
            to: Some(recipient(tx.to)),
            value: Some(be_trimmed(tx.value)),
            data_initial_chunk: Some(initial),
            data_length: Some(data_length),
            chain_id: tx.chain_id,
            tx_type: None,
        },
    )
    .with_continuation(data_continuation(acks)))
}

pub(crate) fn dynamic_fee(
    address_n: &[u32],
    tx: &DynamicFeeTransaction,
) -> SignerResult<DeviceRequest> {
    let data_length = data_length(tx.data.len())?;
    let (initial, acks) = split_data(&tx.data);
    let access_list = tx
        .access_list
        .iter()
        .map(|item| EthereumAccessList {
            address: format_address(&item.address),
            storage_keys: item
                .storage_keys
                .iter()
                .map(|key| key.as_bytes().to_vec())
                .collect(),
        })
        .collect();

    Ok(DeviceRequest::new(
        MessageType::EthereumSignTxEip1559,
        &EthereumSignTxEip1559 {
            address_n: address_n.to_vec(),
            nonce: be_trimmed(tx.nonce),
            max_gas_fee: be_trimmed(tx.max_fee_per_gas),
            max_priority_fee: be_trimmed(tx.max_priority_fee_per_gas),
            gas_limit: be_trimmed(tx.gas_limit),
            to: Some(recipient(tx.to)),
            value: be_trimmed(tx.value),
            data_initial_chunk: Some(initial),
            data_length,
            chain_id: tx.chain_id,
            access_list,
        },
    )
    .with_continuation(data_continuation(acks)))
}
