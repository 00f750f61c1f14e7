//! Signing client bound to one device account

mod safety;
mod wire;

pub use wire::{be_trimmed, DATA_CHUNK_SIZE};

pub(crate) use wire::{format_address, get_address};

use crate::account::AccountReference;
use crate::codec::{decode_vrs, Signature, SignatureLayout};
use crate::error::{SignerError, SignerResult};
use crate::request::{
    DynamicFeeTransaction, SignableMessage, SigningRequest, StaticFeeTransaction,
    TransactionRequest, TypedData, VERSION_PERSONAL_MESSAGE, VERSION_STRUCTURED_DATA,
};
use crate::transport::{DeviceRequest, DeviceSession, DeviceTransport};
use ethereum_types::{Address, H256, U256};
use safety::SafetyCheckGuard;
use tracing::{debug, error};
use trezor_hdpath::HdPath;

/// Signs messages and transactions with the key at one HD path.
///
/// Each call locks the device session for its whole duration. For accounts
/// under `m/44'/60'/0'` the device is switched to `PromptTemporarily` before
/// the request and back to `Strict` afterwards, whatever the outcome.
#[derive(Debug, Clone)]
pub struct SigningClient<T> {
    session: DeviceSession<T>,
    hd_path: HdPath,
    layout: SignatureLayout,
    address: Option<Address>,
}

impl<T: DeviceTransport> SigningClient<T> {
    /// Create a client for `hd_path`; `layout` names how the device lays out signatures
    pub fn new(session: DeviceSession<T>, hd_path: HdPath, layout: SignatureLayout) -> Self {
        Self {
            session,
            hd_path,
            layout,
            address: None,
        }
    }

    /// Create a client for a stored account
    pub fn for_account(
        session: DeviceSession<T>,
        account: &AccountReference,
        layout: SignatureLayout,
    ) -> Self {
        Self::new(session, account.hd_path.clone(), layout).with_address(account.address)
    }

    /// Remember the address this path is expected to control
    pub fn with_address(mut self, address: Address) -> Self {
        self.address = Some(address);
        self
    }

    pub fn address(&self) -> Option<Address> {
        self.address
    }

    pub fn hd_path(&self) -> &HdPath {
        &self.hd_path
    }

    pub fn layout(&self) -> SignatureLayout {
        self.layout
    }

    /// Sign a `personal_sign` payload. The device applies the EIP-191 prefix.
    pub async fn sign_personal_message(&self, message: &[u8]) -> SignerResult<Signature> {
        let request = wire::personal_message(self.hd_path.address_n(), message);
        self.execute(request).await
    }

    /// Sign EIP-712 data given only its domain separator and message hashes
    pub async fn sign_typed_data(
        &self,
        domain_hash: H256,
        message_hash: H256,
    ) -> SignerResult<Signature> {
        let request = wire::typed_data_hash(self.hd_path.address_n(), &domain_hash, &message_hash);
        self.execute(request).await
    }

    /// Sign an EIP-712 document the device parses and displays itself
    pub async fn sign_typed_data_full(&self, data: &TypedData) -> SignerResult<Signature> {
        data.validate()?;
        let request = wire::typed_data_full(self.hd_path.address_n(), data);
        self.execute(request).await
    }

    /// Sign a legacy transaction
    pub async fn sign_static_fee_transaction(
        &self,
        tx: &StaticFeeTransaction,
    ) -> SignerResult<Signature> {
        check_common_fields(tx.chain_id, tx.gas_limit)?;
        if tx.gas_price.is_zero() {
            return Err(SignerError::UnsupportedTransactionType(
                "static fee transaction needs a non-zero gasPrice".to_string(),
            ));
        }
        let request = wire::static_fee(self.hd_path.address_n(), tx)?;
        self.execute(request).await
    }

    /// Sign an EIP-1559 transaction
    pub async fn sign_dynamic_fee_transaction(
        &self,
        tx: &DynamicFeeTransaction,
    ) -> SignerResult<Signature> {
        check_common_fields(tx.chain_id, tx.gas_limit)?;
        if tx.max_fee_per_gas.is_zero() {
            return Err(SignerError::UnsupportedTransactionType(
                "dynamic fee transaction needs a non-zero maxFeePerGas".to_string(),
            ));
        }
        let request = wire::dynamic_fee(self.hd_path.address_n(), tx)?;
        self.execute(request).await
    }

    pub async fn sign_transaction(&self, tx: &TransactionRequest) -> SignerResult<Signature> {
        match tx {
            TransactionRequest::StaticFee(tx) => self.sign_static_fee_transaction(tx).await,
            TransactionRequest::DynamicFee(tx) => self.sign_dynamic_fee_transaction(tx).await,
        }
    }

    /// Sign whichever request the caller selected
    pub async fn sign(&self, request: &SigningRequest) -> SignerResult<Signature> {
        match request {
            SigningRequest::PersonalMessage(message) => self.sign_personal_message(message).await,
            SigningRequest::TypedDataHash {
                domain_hash,
                message_hash,
            } => self.sign_typed_data(*domain_hash, *message_hash).await,
            SigningRequest::TypedDataFull(data) => self.sign_typed_data_full(data).await,
            SigningRequest::StaticFee(tx) => self.sign_static_fee_transaction(tx).await,
            SigningRequest::DynamicFee(tx) => self.sign_dynamic_fee_transaction(tx).await,
        }
    }

    /// Sign an EIP-191 envelope, routed on its version byte
    pub async fn sign_message(&self, message: &SignableMessage) -> SignerResult<Signature> {
        match message.version {
            VERSION_PERSONAL_MESSAGE => self.sign_personal_message(&message.body).await,
            VERSION_STRUCTURED_DATA => {
                let domain_hash = hash_field(&message.header, "domain separator")?;
                let message_hash = hash_field(&message.body, "message")?;
                self.sign_typed_data(domain_hash, message_hash).await
            }
            _ => Err(SignerError::UnsupportedMessageVersion(message.version_label())),
        }
    }

    async fn execute(&self, request: DeviceRequest) -> SignerResult<Signature> {
        debug!(
            target: "trezor::signer",
            path = %self.hd_path,
            message_type = ?request.message_type,
            "sending signing request"
        );

        let mut guard = SafetyCheckGuard::new(self.session.lock().await);
        let reply = match guard.relax_for(&self.hd_path).await {
            Ok(()) => guard.call(self.hd_path.address_n(), request).await,
            Err(err) => Err(err),
        };
        let restored = guard.restore().await;

        match (reply, restored) {
            (Ok(raw), Ok(())) => decode_vrs(&raw, self.layout),
            (Ok(_), Err(restore_err)) => {
                error!(
                    target: "trezor::signer",
                    path = %self.hd_path,
                    error = %restore_err,
                    "failed to restore strict safety checks"
                );
                Err(SignerError::SafetyRestoreFailed(restore_err.to_string()))
            }
            (Err(err), Ok(())) => Err(SignerError::from_device(err, &self.hd_path)),
            (Err(err), Err(restore_err)) => {
                error!(
                    target: "trezor::signer",
                    path = %self.hd_path,
                    error = %restore_err,
                    "failed to restore strict safety checks after a failed request"
                );
                Err(SignerError::from_device(err, &self.hd_path))
            }
        }
    }
}

fn check_common_fields(chain_id: u64, gas_limit: U256) -> SignerResult<()> {
    if chain_id == 0 {
        return Err(SignerError::UnsupportedTransactionType(
            "chain id must be non-zero".to_string(),
        ));
    }
    if gas_limit.is_zero() {
        return Err(SignerError::UnsupportedTransactionType(
            "gas limit must be non-zero".to_string(),
        ));
    }
    Ok(())
}

fn hash_field(bytes: &[u8], name: &str) -> SignerResult<H256> {
    if bytes.len() != H256::len_bytes() {
        return Err(SignerError::InvalidTypedData(format!(
            "{} hash must be 32 bytes, got {}",
            name,
            bytes.len()
        )));
    }
    Ok(H256::from_slice(bytes))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::proto::messages_ethereum::{EthereumSignMessage, EthereumSignTx};
    use crate::proto::{FailureType, MessageType, SafetyCheckLevel};
    use crate::transport::{DeviceFailure, MockDeviceTransport};
    use mockall::predicate::eq;
    use mockall::Sequence;

    fn blob() -> Vec<u8> {
        let mut raw = vec![0x11; 32];
        raw.extend_from_slice(&[0x22; 32]);
        raw.push(27);
        raw
    }

    fn client(mock: MockDeviceTransport, path: &str) -> SigningClient<MockDeviceTransport> {
        SigningClient::new(
            DeviceSession::new(mock),
            HdPath::parse(path).unwrap(),
            SignatureLayout::VLast,
        )
    }

    fn static_tx() -> StaticFeeTransaction {
        StaticFeeTransaction {
            nonce: U256::from(6),
            gas_price: U256::one(),
            gas_limit: U256::from(21000),
            to: None,
            value: U256::zero(),
            data: Vec::new(),
            chain_id: 4,
        }
    }

    #[tokio::test]
    async fn default_path_relaxes_then_signs_then_restores() {
        let mut seq = Sequence::new();
        let mut mock = MockDeviceTransport::new();
        mock.expect_apply_safety_mode()
            .with(eq(SafetyCheckLevel::PromptTemporarily))
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok(()));
        mock.expect_call()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|address_n, request| {
                assert_eq!(address_n.len(), 5);
                assert_eq!(request.message_type, MessageType::EthereumSignMessage);
                let body: EthereumSignMessage = request.decode().unwrap();
                assert_eq!(body.message, b"hello".to_vec());
                Ok(blob())
            });
        mock.expect_apply_safety_mode()
            .with(eq(SafetyCheckLevel::Strict))
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok(()));

        let sig = client(mock, "m/44'/60'/0'/0/0")
            .sign_personal_message(b"hello")
            .await
            .unwrap();
        assert_eq!(sig.v, 27);
        assert_eq!(sig.r, H256::repeat_byte(0x11));
        assert_eq!(sig.s, H256::repeat_byte(0x22));
    }

    #[tokio::test]
    async fn strict_mode_is_restored_once_when_device_rejects() {
        let mut seq = Sequence::new();
        let mut mock = MockDeviceTransport::new();
        mock.expect_apply_safety_mode()
            .with(eq(SafetyCheckLevel::PromptTemporarily))
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok(()));
        mock.expect_call()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_, _| Err(DeviceFailure::device(FailureType::ActionCancelled, "Cancelled")));
        mock.expect_apply_safety_mode()
            .with(eq(SafetyCheckLevel::Strict))
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok(()));

        let err = client(mock, "m/44'/60'/0'/0/3")
            .sign_static_fee_transaction(&static_tx())
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            SignerError::DeviceSigning {
                status: Some(4),
                ..
            }
        ));
    }

    #[tokio::test]
    async fn non_default_path_never_touches_safety_mode() {
        let mut mock = MockDeviceTransport::new();
        mock.expect_apply_safety_mode().times(0);
        mock.expect_call().times(1).returning(|_, request| {
            let body: EthereumSignTx = request.decode().unwrap();
            assert_eq!(body.chain_id, 4);
            Ok(blob())
        });

        let sig = client(mock, "m/44'/1'/0'/0/0")
            .sign_static_fee_transaction(&static_tx())
            .await
            .unwrap();
        assert_eq!(sig.v, 27);
    }

    #[tokio::test]
    async fn failed_relax_skips_request_but_still_restores() {
        let mut seq = Sequence::new();
        let mut mock = MockDeviceTransport::new();
        mock.expect_apply_safety_mode()
            .with(eq(SafetyCheckLevel::PromptTemporarily))
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Err(DeviceFailure::Transport("unplugged".into())));
        mock.expect_call().times(0);
        mock.expect_apply_safety_mode()
            .with(eq(SafetyCheckLevel::Strict))
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Err(DeviceFailure::Transport("unplugged".into())));

        let err = client(mock, "m/44'/60'/0'/0/0")
            .sign_personal_message(b"x")
            .await
            .unwrap_err();
        assert!(matches!(err, SignerError::DeviceConnection(_)));
    }

    #[tokio::test]
    async fn restore_failure_after_success_is_reported() {
        let mut mock = MockDeviceTransport::new();
        mock.expect_apply_safety_mode()
            .with(eq(SafetyCheckLevel::PromptTemporarily))
            .returning(|_| Ok(()));
        mock.expect_call().returning(|_, _| Ok(blob()));
        mock.expect_apply_safety_mode()
            .with(eq(SafetyCheckLevel::Strict))
            .returning(|_| Err(DeviceFailure::Transport("usb reset".into())));

        let err = client(mock, "m/44'/60'/0'/0/0")
            .sign_personal_message(b"x")
            .await
            .unwrap_err();
        assert!(matches!(err, SignerError::SafetyRestoreFailed(_)));
        assert!(err.is_environment_actionable());
    }

    #[tokio::test]
    async fn forbidden_path_reply_names_the_path() {
        let mut mock = MockDeviceTransport::new();
        mock.expect_call().returning(|_, _| {
            Err(DeviceFailure::device(FailureType::DataError, "Forbidden key path"))
        });

        let err = client(mock, "m/44'/1'/5'/0/0")
            .sign_personal_message(b"x")
            .await
            .unwrap_err();
        match err {
            SignerError::ForbiddenPath { path } => assert_eq!(path, "m/44'/1'/5'/0/0"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn short_reply_is_malformed_signature() {
        let mut mock = MockDeviceTransport::new();
        mock.expect_call().returning(|_, _| Ok(vec![0u8; 64]));

        let err = client(mock, "m/44'/1'/0'/0/0")
            .sign_personal_message(b"x")
            .await
            .unwrap_err();
        assert!(matches!(err, SignerError::MalformedSignature { len: 64 }));
    }

    #[tokio::test]
    async fn invalid_inputs_fail_before_any_device_call() {
        let mut mock = MockDeviceTransport::new();
        mock.expect_call().times(0);
        mock.expect_apply_safety_mode().times(0);
        let client = client(mock, "m/44'/60'/0'/0/0");

        let mut tx = static_tx();
        tx.chain_id = 0;
        assert!(matches!(
            client.sign_static_fee_transaction(&tx).await,
            Err(SignerError::UnsupportedTransactionType(_))
        ));

        let mut free = static_tx();
        free.gas_price = U256::zero();
        let err = client.sign_static_fee_transaction(&free).await.unwrap_err();
        assert!(err.to_string().contains("gasPrice"));

        let unknown = SignableMessage {
            version: b'X',
            header: Vec::new(),
            body: Vec::new(),
        };
        let err = client.sign_message(&unknown).await.unwrap_err();
        assert_eq!(err.to_string(), "Unable to sign version 'X'.");

        let short = SignableMessage {
            version: VERSION_STRUCTURED_DATA,
            header: vec![0; 31],
            body: vec![0; 32],
        };
        assert!(matches!(
            client.sign_message(&short).await,
            Err(SignerError::InvalidTypedData(_))
        ));
    }
}
