// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use async_trait::async_trait;

use crate::errors::SessionError;

/// Last-resort fallback when recovery cannot bring the engine back.
///
/// Browser-hosted embedders reload the page here. Hosts without a
/// reloadable environment keep the default, which reports failure.
#[async_trait]
pub trait EnvironmentReload: Send + Sync {
    async fn reload(&self, reason: &SessionError) -> anyhow::Result<()>;
}

/// Fallback for hosts that cannot reload their environment.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoEnvironmentReload;

#[async_trait]
impl EnvironmentReload for NoEnvironmentReload {
    async fn reload(&self, reason: &SessionError) -> anyhow::Result<()> {
        anyhow::bail!("no reloadable environment available (cause: {})", reason)
    }
}
