//! Scoped relaxation of the device safety-check level

use crate::proto::SafetyCheckLevel;
use crate::transport::{DeviceFailure, DeviceRequest, DeviceTransport};
use tokio::runtime::Handle;
use tokio::sync::OwnedMutexGuard;
use tracing::{error, warn};
use trezor_hdpath::{HdPath, HARDENED_BIT};

/// `m/44'/60'/0'`: accounts under this prefix are signed with relaxed checks
const RELAXED_PREFIX: [u32; 3] = [44 | HARDENED_BIT, 60 | HARDENED_BIT, HARDENED_BIT];

/// Whether signing for `path` needs the device in `PromptTemporarily`
pub(crate) fn requires_relaxed_checks(path: &HdPath) -> bool {
    path.address_n().starts_with(&RELAXED_PREFIX)
}

/// Holds the locked transport for one signing call.
///
/// Once [`relax_for`](Self::relax_for) has touched the device the guard is armed
/// and `Strict` must be written back: [`restore`](Self::restore) does it inline,
/// and dropping an armed guard (e.g. a cancelled future) spawns the restore on
/// the current runtime.
pub(crate) struct SafetyCheckGuard<T: DeviceTransport> {
    transport: Option<OwnedMutexGuard<T>>,
    armed: bool,
}

impl<T: DeviceTransport> SafetyCheckGuard<T> {
    pub(crate) fn new(transport: OwnedMutexGuard<T>) -> Self {
        Self {
            transport: Some(transport),
            armed: false,
        }
    }

    fn transport(&mut self) -> Result<&mut T, DeviceFailure> {
        self.transport
            .as_deref_mut()
            .ok_or_else(|| DeviceFailure::Transport("device session already released".to_string()))
    }

    /// Switch to `PromptTemporarily` when `path` sits under the relaxed prefix
    pub(crate) async fn relax_for(&mut self, path: &HdPath) -> Result<(), DeviceFailure> {
        if !requires_relaxed_checks(path) {
            return Ok(());
        }

        warn!(
            target: "trezor::signer",
            path = %path,
            "relaxing device safety checks to PromptTemporarily for signing"
        );
        self.armed = true;
        self.transport()?
            .apply_safety_mode(SafetyCheckLevel::PromptTemporarily)
            .await
    }

    pub(crate) async fn call(
        &mut self,
        address_n: &[u32],
        request: DeviceRequest,
    ) -> Result<Vec<u8>, DeviceFailure> {
        self.transport()?.call(address_n, request).await
    }

    /// Put the device back into `Strict` if this guard relaxed it
    pub(crate) async fn restore(mut self) -> Result<(), DeviceFailure> {
        if !self.armed {
            return Ok(());
        }
        let result = self
            .transport()?
            .apply_safety_mode(SafetyCheckLevel::Strict)
            .await;
        self.armed = false;
        result
    }
}

impl<T: DeviceTransport> Drop for SafetyCheckGuard<T> {
    fn drop(&mut self) {
        if !self.armed {
            return;
        }
        let Some(mut transport) = self.transport.take() else {
            return;
        };

        match Handle::try_current() {
            Ok(handle) => {
                warn!(
                    target: "trezor::signer",
                    "signing interrupted, restoring strict safety checks in the background"
                );
                handle.spawn(async move {
                    if let Err(err) = transport.apply_safety_mode(SafetyCheckLevel::Strict).await {
                        error!(
                            target: "trezor::signer",
                            error = %err,
                            "failed to restore strict safety checks after interrupted signing"
                        );
                    }
                });
            }
            Err(_) => error!(
                target: "trezor::signer",
                "signing interrupted outside a tokio runtime, device safety checks left relaxed"
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_accounts_need_relaxed_checks() {
        for text in ["m/44'/60'/0'/0/0", "m/44h/60h/0h/0/7", "m/44'/60'/0'"] {
            assert!(requires_relaxed_checks(&HdPath::parse(text).unwrap()), "{text}");
        }
    }

    #[test]
    fn other_paths_keep_strict_checks() {
        for text in ["m/44'/1'/0'/0/0", "m/44'/60'/1'/0/0", "m/44'/60'", "m/44/60/0/0/0"] {
            assert!(!requires_relaxed_checks(&HdPath::parse(text).unwrap()), "{text}");
        }
    }
}
