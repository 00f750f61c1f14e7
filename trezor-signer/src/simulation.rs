//! Simulated Trezor device for testing without hardware

use crate::client::format_address;
use crate::codec::{Signature, SignatureLayout};
use crate::proto::{ApplySettings, FailureType, MessageType, SafetyCheckLevel};
use crate::transport::{DeviceConnector, DeviceFailure, DeviceRequest, DeviceTransport};
use async_trait::async_trait;
use ethereum_types::{Address, H256};
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::sync::Arc;
use trezor_hdpath::HdPath;

/// A request as seen by the simulated device
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedCall {
    pub address_n: Vec<u32>,
    pub request: DeviceRequest,
}

#[derive(Debug)]
struct SimulationState {
    connected: bool,
    layout: SignatureLayout,
    signature: Signature,
    safety_level: SafetyCheckLevel,
    calls: Vec<RecordedCall>,
    safety_changes: Vec<SafetyCheckLevel>,
    replies: VecDeque<Result<Vec<u8>, DeviceFailure>>,
    safety_failures: VecDeque<DeviceFailure>,
    forbidden: Vec<Vec<u32>>,
}

/// In-memory device that answers every request deterministically.
///
/// Clones share state, so a test can keep one handle for inspection while a
/// [`DeviceSession`](crate::DeviceSession) owns another.
#[derive(Debug, Clone)]
pub struct SimulatedDevice {
    state: Arc<Mutex<SimulationState>>,
}

impl SimulatedDevice {
    /// Device whose signing replies use `layout`
    pub fn new(layout: SignatureLayout) -> Self {
        Self {
            state: Arc::new(Mutex::new(SimulationState {
                connected: true,
                layout,
                signature: Signature::new(27, H256::repeat_byte(0x01), H256::repeat_byte(0x02)),
                safety_level: SafetyCheckLevel::Strict,
                calls: Vec::new(),
                safety_changes: Vec::new(),
                replies: VecDeque::new(),
                safety_failures: VecDeque::new(),
                forbidden: Vec::new(),
            })),
        }
    }

    /// Signature returned for every signing request
    pub fn with_signature(self, signature: Signature) -> Self {
        self.state.lock().signature = signature;
        self
    }

    /// Answer the next request with `reply` instead of the default
    pub fn push_reply(&self, reply: Vec<u8>) {
        self.state.lock().replies.push_back(Ok(reply));
    }

    /// Fail the next request with `failure`
    pub fn push_failure(&self, failure: DeviceFailure) {
        self.state.lock().replies.push_back(Err(failure));
    }

    /// Fail the next safety-level change with `failure`
    pub fn push_safety_failure(&self, failure: DeviceFailure) {
        self.state.lock().safety_failures.push_back(failure);
    }

    /// Reject every path under `prefix` the way firmware rejects foreign keys
    pub fn forbid_prefix(&self, prefix: &HdPath) {
        self.state.lock().forbidden.push(prefix.address_n().to_vec());
    }

    pub fn disconnect(&self) {
        self.state.lock().connected = false;
    }

    pub fn reconnect(&self) {
        self.state.lock().connected = true;
    }

    /// All requests received so far
    pub fn calls(&self) -> Vec<RecordedCall> {
        self.state.lock().calls.clone()
    }

    /// Every safety level applied so far, in order
    pub fn safety_changes(&self) -> Vec<SafetyCheckLevel> {
        self.state.lock().safety_changes.clone()
    }

    /// Current safety level
    pub fn safety_level(&self) -> SafetyCheckLevel {
        self.state.lock().safety_level
    }

    /// Address the simulated seed yields for `address_n`
    pub fn address_for(address_n: &[u32]) -> Address {
        let mut bytes = [0xd0u8; 20];
        for (i, index) in address_n.iter().enumerate() {
            for (j, byte) in index.to_be_bytes().iter().enumerate() {
                bytes[(i * 4 + j) % 16] ^= byte.rotate_left(i as u32);
            }
        }
        if let Some(last) = address_n.last() {
            bytes[16..].copy_from_slice(&last.to_be_bytes());
        }
        Address::from(bytes)
    }

    fn check_connected(state: &SimulationState) -> Result<(), DeviceFailure> {
        if state.connected {
            Ok(())
        } else {
            Err(DeviceFailure::Transport("simulated device disconnected".to_string()))
        }
    }
}

#[async_trait]
impl DeviceTransport for SimulatedDevice {
    async fn call(
        &mut self,
        address_n: &[u32],
        request: DeviceRequest,
    ) -> Result<Vec<u8>, DeviceFailure> {
        let mut state = self.state.lock();
        Self::check_connected(&state)?;

        let message_type = request.message_type;
        state.calls.push(RecordedCall {
            address_n: address_n.to_vec(),
            request: request.clone(),
        });

        if state.forbidden.iter().any(|prefix| address_n.starts_with(prefix)) {
            return Err(DeviceFailure::device(FailureType::DataError, "Forbidden key path"));
        }
        if let Some(reply) = state.replies.pop_front() {
            return reply;
        }

        match message_type {
            MessageType::EthereumGetAddress => {
                Ok(format_address(&Self::address_for(address_n)).into_bytes())
            }
            MessageType::EthereumSignMessage
            | MessageType::EthereumSignTypedHash
            | MessageType::EthereumSignTypedData
            | MessageType::EthereumSignTx
            | MessageType::EthereumSignTxEip1559 => {
                Ok(state.signature.to_bytes(state.layout).to_vec())
            }
            MessageType::ApplySettings => {
                let settings: ApplySettings = request.decode().map_err(|err| {
                    DeviceFailure::device(FailureType::DataError, err.to_string())
                })?;
                state.safety_level = settings.safety_checks();
                Ok(Vec::new())
            }
            other => Err(DeviceFailure::device(
                FailureType::UnexpectedMessage,
                format!("unexpected message {:?}", other),
            )),
        }
    }

    async fn apply_safety_mode(&mut self, level: SafetyCheckLevel) -> Result<(), DeviceFailure> {
        let mut state = self.state.lock();
        Self::check_connected(&state)?;

        state.safety_changes.push(level);
        if let Some(failure) = state.safety_failures.pop_front() {
            return Err(failure);
        }
        state.safety_level = level;
        Ok(())
    }
}

#[async_trait]
impl DeviceConnector for SimulatedDevice {
    type Transport = SimulatedDevice;

    async fn open(&self) -> Result<Self::Transport, DeviceFailure> {
        Self::check_connected(&self.state.lock())?;
        Ok(self.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn addresses_differ_per_index() {
        let base = HdPath::default_ethereum();
        let a = SimulatedDevice::address_for(&[base.address_n(), &[0]].concat());
        let b = SimulatedDevice::address_for(&[base.address_n(), &[1]].concat());
        assert_ne!(a, b);
        assert_eq!(a, SimulatedDevice::address_for(&[base.address_n(), &[0]].concat()));
    }

    #[tokio::test]
    async fn apply_settings_request_changes_level() {
        let mut device = SimulatedDevice::new(SignatureLayout::VLast);
        let request = DeviceRequest::apply_settings(SafetyCheckLevel::PromptAlways);
        device.call(&[], request).await.unwrap();
        assert_eq!(device.safety_level(), SafetyCheckLevel::PromptAlways);
    }

    #[tokio::test]
    async fn disconnected_device_cannot_open() {
        let device = SimulatedDevice::new(SignatureLayout::VLast);
        device.disconnect();
        assert!(matches!(
            device.open().await,
            Err(DeviceFailure::Transport(_))
        ));
        device.reconnect();
        assert!(device.open().await.is_ok());
    }
}
