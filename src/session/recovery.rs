// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Teardown and reboot after a fatal engine fault.

use crate::errors::{FaultClass, RecoveryStep, SessionError, SessionResult};
use crate::observability::messages::session::{
    EnvironmentReloadRequested, FaultReported, RecoveryCompleted, RecoveryStarted,
    TeardownFailed, WalletConnectFailed,
};
use crate::observability::messages::StructuredLog;
use crate::session::manager::SessionManager;

/// How a [`SessionManager::reinit`] call ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecoveryOutcome {
    /// A fresh public session is up. `wallet_restored` reports whether the
    /// previously connected wallet was reconnected.
    Recovered { wallet_restored: bool },
    /// Recovery failed and the environment fallback took over.
    EnvironmentReloaded,
}

impl SessionManager {
    /// Rebuilds the session on a fresh engine instance.
    ///
    /// Steps, in order:
    /// 1. remember the wallet signer, if a wallet is connected
    /// 2. tear the session down; teardown errors are logged and ignored
    /// 3. every reference to the old engine is gone once teardown returns
    /// 4. load and initialize a new engine
    /// 5. boot the public session again
    /// 6. reconnect the remembered signer
    ///
    /// Failure in step 4 or 5 invokes the configured
    /// [`EnvironmentReload`](crate::traits::EnvironmentReload); if that fails
    /// too the error is returned. Failure in step 6 leaves the public session
    /// up and is reported through `state().error` and a notification only.
    pub async fn reinit(&self) -> SessionResult<RecoveryOutcome> {
        let _guard = self.lock_transitions().await;

        let signer = self.wallet_signer();
        RecoveryStarted {
            restore_wallet: signer.is_some(),
        }
        .log();

        if let Err(error) = self.teardown_locked().await {
            TeardownFailed { error: &error }.log();
        }

        if let Err(error) = self.boot_engine().await {
            return self.fall_back(RecoveryStep::EngineReload, error).await;
        }

        if let Err(error) = self.initialize_locked().await {
            return self.fall_back(RecoveryStep::PublicSession, error).await;
        }

        let wallet_restored = match signer {
            None => false,
            Some(signer) => match self.connect_locked(signer).await {
                Ok(()) => true,
                Err(error) => {
                    WalletConnectFailed {
                        address: "(previous wallet)",
                        error: &error,
                    }
                    .log();
                    self.record_failure(&error);
                    false
                }
            },
        };

        RecoveryCompleted { wallet_restored }.log();
        Ok(RecoveryOutcome::Recovered { wallet_restored })
    }

    async fn fall_back(
        &self,
        step: RecoveryStep,
        error: SessionError,
    ) -> SessionResult<RecoveryOutcome> {
        EnvironmentReloadRequested {
            step: &step.to_string(),
            error: &error,
        }
        .log();

        match self.reload.reload(&error).await {
            Ok(()) => Ok(RecoveryOutcome::EnvironmentReloaded),
            Err(reload_error) => Err(SessionError::Recovery {
                step,
                message: format!("{}; environment reload failed: {:#}", error, reload_error),
            }),
        }
    }

    /// Classifies `error` and reports it.
    ///
    /// Fatal faults are attached to the state and notified; non-recoverable
    /// ones carry guidance. Returns the class so the caller can decide on
    /// [`reinit`](Self::reinit). Nothing is retried here.
    pub fn handle_fault(&self, error: &SessionError) -> FaultClass {
        let class = error.fault_class();
        if class.is_fatal() {
            let label = match class {
                FaultClass::NonRecoverable => "non_recoverable",
                _ => "recoverable",
            };
            FaultReported {
                fault_class: label,
                error,
            }
            .log();
            self.record_failure(error);
        }
        class
    }
}
