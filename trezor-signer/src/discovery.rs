//! Address discovery across account indices

use crate::client::get_address;
use crate::error::{SignerError, SignerResult};
use crate::transport::{DeviceSession, DeviceTransport};
use ethereum_types::Address;
use serde::{Deserialize, Serialize};
use tracing::debug;
use trezor_hdpath::{HdBasePath, HdPath};

/// Accounts shown per page when picking a device account
pub const DEFAULT_WINDOW_SIZE: u32 = 10;

/// One resolved account in a discovery window
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiscoveredAccount {
    pub index: u32,
    pub path: HdPath,
    pub address: Address,
}

/// Resolves device addresses under a base path.
///
/// Nothing is cached: a passphrase change on the device yields a different
/// wallet, so every window goes back to the device. Safety-check levels are
/// never touched.
#[derive(Debug, Clone)]
pub struct DiscoveryClient<T> {
    session: DeviceSession<T>,
}

impl<T: DeviceTransport> DiscoveryClient<T> {
    pub fn new(session: DeviceSession<T>) -> Self {
        Self { session }
    }

    /// Address of the account at `index` under `base`
    pub async fn get_account_address(
        &self,
        base: &HdBasePath,
        index: u32,
    ) -> SignerResult<Address> {
        let path = base.derive_account(index)?;
        let mut transport = self.session.lock().await;
        self.lookup(&mut *transport, &path).await
    }

    /// Addresses of accounts `start_index..start_index + count`, ascending
    pub async fn resolve_window(
        &self,
        base: &HdBasePath,
        start_index: u32,
        count: u32,
    ) -> SignerResult<Vec<DiscoveredAccount>> {
        let end_index = start_index.checked_add(count).ok_or_else(|| {
            SignerError::InvalidPathFormat(trezor_hdpath::HdPathError::InvalidPathFormat {
                path: format!("{}/{}", base, u64::from(start_index) + u64::from(count)),
                reason: "account window runs past the index range".to_string(),
            })
        })?;

        let paths = (start_index..end_index)
            .map(|index| base.derive_account(index).map(|path| (index, path)))
            .collect::<Result<Vec<_>, _>>()?;

        debug!(
            target: "trezor::discovery",
            base = %base,
            start_index,
            count,
            "resolving account window"
        );

        let mut transport = self.session.lock().await;
        let mut accounts = Vec::with_capacity(paths.len());
        for (index, path) in paths {
            let address = self.lookup(&mut *transport, &path).await?;
            accounts.push(DiscoveredAccount {
                index,
                path,
                address,
            });
        }
        Ok(accounts)
    }

    async fn lookup(&self, transport: &mut T, path: &HdPath) -> SignerResult<Address> {
        let reply = transport
            .call(path.address_n(), get_address(path.address_n()))
            .await
            .map_err(|err| SignerError::from_device(err, path))?;
        parse_address_reply(&reply)
    }
}

/// Accepts either the 20 raw address bytes or a `0x`-prefixed hex string
pub fn parse_address_reply(reply: &[u8]) -> SignerResult<Address> {
    if reply.len() == Address::len_bytes() {
        return Ok(Address::from_slice(reply));
    }

    let text = std::str::from_utf8(reply)
        .map_err(|_| SignerError::UnexpectedReply("address reply is not valid UTF-8".to_string()))?
        .trim();
    let digits = text
        .strip_prefix("0x")
        .or_else(|| text.strip_prefix("0X"))
        .unwrap_or(text);
    let bytes = hex::decode(digits)
        .map_err(|err| SignerError::UnexpectedReply(format!("address reply '{}': {}", text, err)))?;
    if bytes.len() != Address::len_bytes() {
        return Err(SignerError::UnexpectedReply(format!(
            "address reply has {} bytes, expected 20",
            bytes.len()
        )));
    }
    Ok(Address::from_slice(&bytes))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::proto::messages_ethereum::EthereumGetAddress;
    use crate::proto::MessageType;
    use crate::transport::{DeviceFailure, MockDeviceTransport};

    #[test]
    fn parses_raw_and_hex_replies() {
        let raw = [0xabu8; 20];
        assert_eq!(parse_address_reply(&raw).unwrap(), Address::repeat_byte(0xab));

        let text = b"0xE3747e6341E0d3430e6Ea9e2346cdDCc2F8a4b5b";
        let address = parse_address_reply(text).unwrap();
        assert_eq!(address.as_bytes()[0], 0xe3);
    }

    #[test]
    fn rejects_wrong_sized_replies() {
        assert!(matches!(
            parse_address_reply(b"0x1234"),
            Err(SignerError::UnexpectedReply(_))
        ));
        assert!(parse_address_reply(&[0u8; 21]).is_err());
    }

    #[tokio::test]
    async fn window_never_changes_safety_mode() {
        let mut mock = MockDeviceTransport::new();
        mock.expect_apply_safety_mode().times(0);
        mock.expect_call().times(3).returning(|address_n, request| {
            assert_eq!(request.message_type, MessageType::EthereumGetAddress);
            let body: EthereumGetAddress = request.decode().unwrap();
            assert_eq!(body.address_n, address_n.to_vec());
            let index = *address_n.last().unwrap() as u8;
            Ok(vec![index; 20])
        });

        let discovery = DiscoveryClient::new(DeviceSession::new(mock));
        let accounts = discovery
            .resolve_window(&HdBasePath::default(), 4, 3)
            .await
            .unwrap();
        let indices: Vec<u32> = accounts.iter().map(|a| a.index).collect();
        assert_eq!(indices, vec![4, 5, 6]);
        assert_eq!(accounts[1].address, Address::repeat_byte(5));
        assert_eq!(accounts[2].path.to_string(), "m/44'/60'/0'/0/6");
    }

    #[tokio::test]
    async fn transport_failure_is_connection_error() {
        let mut mock = MockDeviceTransport::new();
        mock.expect_call()
            .returning(|_, _| Err(DeviceFailure::Transport("no device".into())));

        let discovery = DiscoveryClient::new(DeviceSession::new(mock));
        let err = discovery
            .get_account_address(&HdBasePath::default(), 0)
            .await
            .unwrap_err();
        assert!(matches!(err, SignerError::DeviceConnection(_)));
    }

    #[tokio::test]
    async fn window_past_index_range_is_rejected_up_front() {
        let mut mock = MockDeviceTransport::new();
        mock.expect_call().times(0);

        let discovery = DiscoveryClient::new(DeviceSession::new(mock));
        let err = discovery
            .resolve_window(&HdBasePath::default(), 0x7fff_fffe, 5)
            .await
            .unwrap_err();
        assert!(matches!(err, SignerError::InvalidPathFormat(_)));
    }
}
