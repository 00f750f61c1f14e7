//! Shared handle to one device transport

use super::{DeviceConnector, DeviceTransport};
use crate::error::{SignerError, SignerResult};
use std::sync::Arc;
use tokio::sync::{Mutex, OwnedMutexGuard};
use tracing::info;

/// Cloneable session over a single device
///
/// Every clone points at the same transport. [`DeviceSession::lock`] hands out
/// exclusive access, so at most one request is in flight per device.
pub struct DeviceSession<T> {
    transport: Arc<Mutex<T>>,
}

impl<T: DeviceTransport> DeviceSession<T> {
    /// Wrap an already connected transport
    pub fn new(transport: T) -> Self {
        Self {
            transport: Arc::new(Mutex::new(transport)),
        }
    }

    /// Connect through `connector`
    pub async fn open<C>(connector: &C) -> SignerResult<Self>
    where
        C: DeviceConnector<Transport = T>,
    {
        let transport = connector
            .open()
            .await
            .map_err(|err| SignerError::DeviceConnection(err.to_string()))?;
        info!(target: "trezor::signer", "device session opened");
        Ok(Self::new(transport))
    }

    /// Wait for exclusive access to the transport
    pub async fn lock(&self) -> OwnedMutexGuard<T> {
        Arc::clone(&self.transport).lock_owned().await
    }
}

impl<T> Clone for DeviceSession<T> {
    fn clone(&self) -> Self {
        Self {
            transport: Arc::clone(&self.transport),
        }
    }
}

impl<T> std::fmt::Debug for DeviceSession<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DeviceSession")
            .field("handles", &Arc::strong_count(&self.transport))
            .finish()
    }
}
