//! Transaction signing requests for both fee models

use crate::error::{SignerError, SignerResult};
use ethereum_types::{Address, H256, U256};
use serde::{Deserialize, Deserializer, Serialize};

/// Legacy transaction paying a single gas price
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct StaticFeeTransaction {
    pub nonce: U256,
    pub gas_price: U256,
    pub gas_limit: U256,
    /// `None` for contract creation
    pub to: Option<Address>,
    pub value: U256,
    pub data: Vec<u8>,
    pub chain_id: u64,
}

/// EIP-1559 transaction with a fee cap and a priority tip
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DynamicFeeTransaction {
    pub nonce: U256,
    pub max_fee_per_gas: U256,
    pub max_priority_fee_per_gas: U256,
    pub gas_limit: U256,
    /// `None` for contract creation
    pub to: Option<Address>,
    pub value: U256,
    pub data: Vec<u8>,
    pub chain_id: u64,
    pub access_list: Vec<AccessListItem>,
}

/// One EIP-2930 access list entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccessListItem {
    pub address: Address,
    pub storage_keys: Vec<H256>,
}

/// A transaction whose fee model has already been chosen
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransactionRequest {
    StaticFee(StaticFeeTransaction),
    DynamicFee(DynamicFeeTransaction),
}

impl TransactionRequest {
    /// Chain the transaction is bound to
    pub fn chain_id(&self) -> u64 {
        match self {
            TransactionRequest::StaticFee(tx) => tx.chain_id,
            TransactionRequest::DynamicFee(tx) => tx.chain_id,
        }
    }
}

impl From<StaticFeeTransaction> for TransactionRequest {
    fn from(tx: StaticFeeTransaction) -> Self {
        TransactionRequest::StaticFee(tx)
    }
}

impl From<DynamicFeeTransaction> for TransactionRequest {
    fn from(tx: DynamicFeeTransaction) -> Self {
        TransactionRequest::DynamicFee(tx)
    }
}

/// Transaction as it arrives from JSON-RPC style callers.
///
/// Quantities accept JSON numbers, `0x`-hex strings or decimal strings.
/// [`RawTransaction::into_request`] picks the fee model.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawTransaction {
    #[serde(rename = "type", default, deserialize_with = "quantity::opt_u64")]
    pub tx_type: Option<u64>,
    #[serde(default, deserialize_with = "quantity::opt_u256")]
    pub nonce: Option<U256>,
    #[serde(default, deserialize_with = "quantity::opt_u256")]
    pub gas: Option<U256>,
    #[serde(default, deserialize_with = "quantity::opt_u256")]
    pub gas_price: Option<U256>,
    #[serde(default, deserialize_with = "quantity::opt_u256")]
    pub max_fee_per_gas: Option<U256>,
    #[serde(default, deserialize_with = "quantity::opt_u256")]
    pub max_priority_fee_per_gas: Option<U256>,
    #[serde(default, deserialize_with = "quantity::opt_address")]
    pub to: Option<Address>,
    #[serde(default, deserialize_with = "quantity::opt_u256")]
    pub value: Option<U256>,
    #[serde(default, deserialize_with = "quantity::opt_bytes")]
    pub data: Option<Vec<u8>>,
    #[serde(default, deserialize_with = "quantity::opt_u64")]
    pub chain_id: Option<u64>,
    #[serde(default)]
    pub access_list: Vec<AccessListItem>,
}

impl RawTransaction {
    /// Parse from a JSON object
    pub fn from_json(json: &str) -> SignerResult<Self> {
        serde_json::from_str(json)
            .map_err(|err| SignerError::UnsupportedTransactionType(err.to_string()))
    }

    /// Resolve the fee model and required fields.
    ///
    /// An explicit `type` wins. Without one, `gasPrice` alone selects the static
    /// model and the max-fee pair alone selects the dynamic one; anything else is
    /// ambiguous and rejected.
    pub fn into_request(self, default_chain_id: Option<u64>) -> SignerResult<TransactionRequest> {
        let chain_id = self.chain_id.or(default_chain_id).ok_or_else(|| {
            SignerError::UnsupportedTransactionType("transaction has no chain id".to_string())
        })?;
        if chain_id == 0 {
            return Err(SignerError::UnsupportedTransactionType(
                "chain id must be non-zero".to_string(),
            ));
        }

        let has_static = self.gas_price.is_some();
        let has_dynamic =
            self.max_fee_per_gas.is_some() || self.max_priority_fee_per_gas.is_some();
        let dynamic = match self.tx_type {
            Some(0) => false,
            Some(2) => true,
            Some(other) => {
                return Err(SignerError::UnsupportedTransactionType(format!(
                    "transaction type {} is not supported",
                    other
                )))
            }
            None if has_static && !has_dynamic => false,
            None if has_dynamic && !has_static => true,
            None => {
                return Err(SignerError::UnsupportedTransactionType(
                    "cannot tell static from dynamic fees: set either gasPrice or maxFeePerGas"
                        .to_string(),
                ))
            }
        };

        let gas_limit = required(self.gas, "gas")?;
        let nonce = self.nonce.unwrap_or_default();
        let value = self.value.unwrap_or_default();
        let data = self.data.unwrap_or_default();

        if dynamic {
            Ok(TransactionRequest::DynamicFee(DynamicFeeTransaction {
                nonce,
                max_fee_per_gas: required(self.max_fee_per_gas, "maxFeePerGas")?,
                max_priority_fee_per_gas: required(
                    self.max_priority_fee_per_gas,
                    "maxPriorityFeePerGas",
                )?,
                gas_limit,
                to: self.to,
                value,
                data,
                chain_id,
                access_list: self.access_list,
            }))
        } else {
            Ok(TransactionRequest::StaticFee(StaticFeeTransaction {
                nonce,
                gas_price: required(self.gas_price, "gasPrice")?,
                gas_limit,
                to: self.to,
                value,
                data,
                chain_id,
            }))
        }
    }
}

fn required<T>(field: Option<T>, name: &str) -> SignerResult<T> {
    field.ok_or_else(|| SignerError::UnsupportedTransactionType(format!("missing field '{}'", name)))
}

mod quantity {
    use super::*;
    use serde::de::Error;
    use serde_json::Value;

    fn parse_u256<E: Error>(quantity: Value) -> Result<Option<U256>, E> {
        match quantity {
            Value::Null => Ok(None),
            Value::Number(n) => U256::from_dec_str(&n.to_string())
                .map(Some)
                .map_err(|err| E::custom(format!("quantity {}: {:?}", n, err))),
            Value::String(text) => match text.strip_prefix("0x") {
                Some("") => Ok(Some(U256::zero())),
                Some(hex) => U256::from_str_radix(hex, 16).map(Some).map_err(E::custom),
                None => U256::from_dec_str(&text)
                    .map(Some)
                    .map_err(|err| E::custom(format!("quantity '{}': {:?}", text, err))),
            },
            other => Err(E::custom(format!("expected a quantity, got {}", other))),
        }
    }

    pub fn opt_u256<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<U256>, D::Error> {
        parse_u256(Value::deserialize(deserializer)?)
    }

    pub fn opt_u64<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<u64>, D::Error> {
        match opt_u256(deserializer)? {
            Some(value) if value > U256::from(u64::MAX) => {
                Err(D::Error::custom("quantity does not fit in 64 bits"))
            }
            Some(value) => Ok(Some(value.low_u64())),
            None => Ok(None),
        }
    }

    pub fn opt_bytes<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<Vec<u8>>, D::Error> {
        Option::<String>::deserialize(deserializer)?
            .map(|text| hex::decode(text.trim_start_matches("0x")).map_err(D::Error::custom))
            .transpose()
    }

    /// `null`, `""` and `"0x"` mean contract creation
    pub fn opt_address<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<Address>, D::Error> {
        let text = match Option::<String>::deserialize(deserializer)? {
            Some(text) => text,
            None => return Ok(None),
        };
        let digits = text.strip_prefix("0x").unwrap_or(&text);
        if digits.is_empty() {
            return Ok(None);
        }
        let bytes = hex::decode(digits).map_err(D::Error::custom)?;
        if bytes.len() != Address::len_bytes() {
            return Err(D::Error::custom(format!(
                "recipient '{}' is not a 20-byte address",
                text
            )));
        }
        Ok(Some(Address::from_slice(&bytes)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(json: &str) -> RawTransaction {
        RawTransaction::from_json(json).unwrap()
    }

    #[test]
    fn gas_price_without_type_is_static() {
        let request = raw(r#"{"nonce": 6, "gas": 21000, "gasPrice": 1, "value": "100000000000", "chainId": 4}"#)
            .into_request(None)
            .unwrap();
        match request {
            TransactionRequest::StaticFee(tx) => {
                assert_eq!(tx.nonce, U256::from(6));
                assert_eq!(tx.gas_price, U256::one());
                assert_eq!(tx.value, U256::from(100_000_000_000u64));
                assert_eq!(tx.chain_id, 4);
                assert!(tx.data.is_empty());
            }
            other => panic!("unexpected request: {other:?}"),
        }
    }

    #[test]
    fn type_two_is_dynamic() {
        let request = raw(
            r#"{"type": "0x2", "gas": "0x5208", "maxFeePerGas": 1500000008,
                "maxPriorityFeePerGas": 1500000000, "chainId": 4, "data": "0x"}"#,
        )
        .into_request(None)
        .unwrap();
        match request {
            TransactionRequest::DynamicFee(tx) => {
                assert_eq!(tx.gas_limit, U256::from(21000));
                assert_eq!(tx.max_fee_per_gas, U256::from(1_500_000_008u64));
                assert!(tx.access_list.is_empty());
            }
            other => panic!("unexpected request: {other:?}"),
        }
    }

    #[test]
    fn explicit_type_zero_overrides_inference() {
        let request = raw(r#"{"type": 0, "gas": 1, "gasPrice": 1, "chainId": 1}"#)
            .into_request(None)
            .unwrap();
        assert!(matches!(request, TransactionRequest::StaticFee(_)));
    }

    #[test]
    fn ambiguous_fee_fields_are_rejected() {
        let both = raw(r#"{"gas": 1, "gasPrice": 1, "maxFeePerGas": 2, "chainId": 1}"#);
        assert!(matches!(
            both.into_request(None),
            Err(SignerError::UnsupportedTransactionType(_))
        ));
        let neither = raw(r#"{"gas": 1, "chainId": 1}"#);
        assert!(matches!(
            neither.into_request(None),
            Err(SignerError::UnsupportedTransactionType(_))
        ));
    }

    #[test]
    fn unknown_type_is_rejected() {
        let tx = raw(r#"{"type": 1, "gas": 1, "gasPrice": 1, "chainId": 1}"#);
        assert!(matches!(
            tx.into_request(None),
            Err(SignerError::UnsupportedTransactionType(_))
        ));
    }

    #[test]
    fn incomplete_dynamic_fields_are_rejected() {
        let tx = raw(r#"{"type": 2, "gas": 1, "maxFeePerGas": 2, "chainId": 1}"#);
        let err = tx.into_request(None).unwrap_err();
        assert!(err.to_string().contains("maxPriorityFeePerGas"));
    }

    #[test]
    fn chain_id_falls_back_to_default_and_rejects_zero() {
        let tx = raw(r#"{"gas": 1, "gasPrice": 1}"#);
        assert_eq!(tx.clone().into_request(Some(5)).unwrap().chain_id(), 5);
        assert!(tx.clone().into_request(None).is_err());
        assert!(tx.into_request(Some(0)).is_err());
    }

    #[test]
    fn quantities_beyond_64_bits_parse_from_numbers_and_strings() {
        let tx = raw(
            r#"{"gas": 21000, "gasPrice": 1, "chainId": 1,
                "value": 20000000000000000000, "nonce": "20000000000000000000"}"#,
        );
        let expected = U256::from_dec_str("20000000000000000000").unwrap();
        assert_eq!(tx.value, Some(expected));
        assert_eq!(tx.nonce, Some(expected));
    }

    #[test]
    fn empty_recipient_means_contract_creation() {
        for to in [r#""""#, r#""0x""#, "null"] {
            let json = format!(r#"{{"gas": 1, "gasPrice": 1, "chainId": 1, "to": {}}}"#, to);
            assert_eq!(raw(&json).to, None, "{to}");
        }
        let tx = raw(r#"{"to": "0xE3747e6341E0d3430e6Ea9e2346cdDCc2F8a4b5b"}"#);
        assert_eq!(tx.to.map(|a| a.as_bytes()[0]), Some(0xe3));
        assert!(RawTransaction::from_json(r#"{"to": "0x1234"}"#).is_err());
    }

    #[test]
    fn access_list_parses_camel_case_keys() {
        let tx = raw(
            r#"{"type": 2, "gas": 1, "maxFeePerGas": 2, "maxPriorityFeePerGas": 1, "chainId": 1,
                "accessList": [{"address": "0xe3747e6341e0d3430e6ea9e2346cddcc2f8a4b5b",
                                "storageKeys": ["0x0000000000000000000000000000000000000000000000000000000000000001"]}]}"#,
        );
        match tx.into_request(None).unwrap() {
            TransactionRequest::DynamicFee(tx) => {
                assert_eq!(tx.access_list.len(), 1);
                assert_eq!(tx.access_list[0].storage_keys[0], H256::from_low_u64_be(1));
            }
            other => panic!("unexpected request: {other:?}"),
        }
    }
}
