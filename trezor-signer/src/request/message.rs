//! Message and typed-data signing requests

use super::transaction::{DynamicFeeTransaction, StaticFeeTransaction, TransactionRequest};
use crate::error::{SignerError, SignerResult};
use ethereum_types::H256;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// EIP-191 version byte for `personal_sign` messages (`E`)
pub const VERSION_PERSONAL_MESSAGE: u8 = 0x45;
/// EIP-191 version byte for EIP-712 structured data
pub const VERSION_STRUCTURED_DATA: u8 = 0x01;

/// Name of the mandatory domain struct in an EIP-712 document
const DOMAIN_TYPE: &str = "EIP712Domain";

/// EIP-191 signable message envelope
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignableMessage {
    pub version: u8,
    pub header: Vec<u8>,
    pub body: Vec<u8>,
}

impl SignableMessage {
    /// `personal_sign` message; the device adds the length prefix
    pub fn personal(body: impl Into<Vec<u8>>) -> Self {
        Self {
            version: VERSION_PERSONAL_MESSAGE,
            header: Vec::new(),
            body: body.into(),
        }
    }

    /// Pre-hashed EIP-712 message: header is the domain separator hash
    pub fn typed_data_hash(domain_hash: H256, message_hash: H256) -> Self {
        Self {
            version: VERSION_STRUCTURED_DATA,
            header: domain_hash.as_bytes().to_vec(),
            body: message_hash.as_bytes().to_vec(),
        }
    }

    /// Version byte as shown in errors: the character when printable, hex otherwise
    pub fn version_label(&self) -> String {
        if self.version.is_ascii_graphic() {
            (self.version as char).to_string()
        } else {
            format!("0x{:02x}", self.version)
        }
    }
}

/// One member of an EIP-712 struct type
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypedDataField {
    pub name: String,
    #[serde(rename = "type")]
    pub field_type: String,
}

/// Full EIP-712 document as accepted by `eth_signTypedData_v4`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TypedData {
    pub types: BTreeMap<String, Vec<TypedDataField>>,
    pub primary_type: String,
    pub domain: Value,
    #[serde(default)]
    pub message: Value,
}

impl TypedData {
    /// Parse and validate a JSON document
    pub fn from_json(json: &str) -> SignerResult<Self> {
        let data: TypedData =
            serde_json::from_str(json).map_err(|err| SignerError::InvalidTypedData(err.to_string()))?;
        data.validate()?;
        Ok(data)
    }

    /// Structural checks the device would otherwise fail on halfway through
    pub fn validate(&self) -> SignerResult<()> {
        if !self.types.contains_key(DOMAIN_TYPE) {
            return Err(SignerError::InvalidTypedData(format!(
                "missing '{}' type definition",
                DOMAIN_TYPE
            )));
        }
        if !self.types.contains_key(&self.primary_type) {
            return Err(SignerError::InvalidTypedData(format!(
                "primary type '{}' is not defined",
                self.primary_type
            )));
        }
        if !self.domain.is_object() {
            return Err(SignerError::InvalidTypedData(
                "domain must be an object".to_string(),
            ));
        }
        if self.primary_type != DOMAIN_TYPE && !self.message.is_object() {
            return Err(SignerError::InvalidTypedData(
                "message must be an object".to_string(),
            ));
        }
        Ok(())
    }
}

/// Everything a [`SigningClient`](crate::SigningClient) can sign
#[derive(Debug, Clone, PartialEq)]
pub enum SigningRequest {
    /// Raw `personal_sign` payload
    PersonalMessage(Vec<u8>),
    /// EIP-712 hashes only
    TypedDataHash { domain_hash: H256, message_hash: H256 },
    /// EIP-712 document streamed to the device
    TypedDataFull(TypedData),
    StaticFee(StaticFeeTransaction),
    DynamicFee(DynamicFeeTransaction),
}

impl From<TransactionRequest> for SigningRequest {
    fn from(tx: TransactionRequest) -> Self {
        match tx {
            TransactionRequest::StaticFee(tx) => SigningRequest::StaticFee(tx),
            TransactionRequest::DynamicFee(tx) => SigningRequest::DynamicFee(tx),
        }
    }
}

impl From<TypedData> for SigningRequest {
    fn from(data: TypedData) -> Self {
        SigningRequest::TypedDataFull(data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MAIL: &str = r#"{
        "types": {
            "EIP712Domain": [
                {"name": "name", "type": "string"},
                {"name": "chainId", "type": "uint256"}
            ],
            "Mail": [
                {"name": "contents", "type": "string"}
            ]
        },
        "primaryType": "Mail",
        "domain": {"name": "Ether Mail", "chainId": 4},
        "message": {"contents": "Hello, Bob!"}
    }"#;

    #[test]
    fn parses_eip712_document() {
        let data = TypedData::from_json(MAIL).unwrap();
        assert_eq!(data.primary_type, "Mail");
        assert_eq!(data.types["Mail"][0].field_type, "string");
        assert_eq!(data.message["contents"], "Hello, Bob!");
    }

    #[test]
    fn rejects_document_without_domain_type() {
        let json = MAIL.replace("EIP712Domain", "Domain");
        assert!(matches!(
            TypedData::from_json(&json),
            Err(SignerError::InvalidTypedData(_))
        ));
    }

    #[test]
    fn rejects_undefined_primary_type() {
        let json = MAIL.replace("\"primaryType\": \"Mail\"", "\"primaryType\": \"Letter\"");
        let err = TypedData::from_json(&json).unwrap_err();
        assert!(err.to_string().contains("Letter"));
    }

    #[test]
    fn version_label_prefers_printable_character() {
        assert_eq!(SignableMessage::personal(b"hi".to_vec()).version_label(), "E");
        let typed = SignableMessage::typed_data_hash(H256::zero(), H256::zero());
        assert_eq!(typed.version_label(), "0x01");
        assert_eq!(typed.header.len(), 32);
    }
}
