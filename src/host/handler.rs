use super::messages::{ActionMessage, InfoMessage, SettingValues};
use async_trait::async_trait;

/// Callbacks invoked by the host session, in the order events arrive.
///
/// Implementations must return promptly; long-running work belongs in a
/// spawned task.
#[async_trait]
pub trait HostHandler: Send + Sync {
    /// Pairing finished and the host sent its info block
    async fn on_connect(&self, info: &InfoMessage);

    /// The user changed plugin settings
    async fn on_setting_update(&self, values: &SettingValues);

    /// The user triggered an action
    async fn on_action(&self, action: ActionMessage);

    /// The host asked the plugin to close
    async fn on_shutdown(&self);

    /// The session failed
    async fn on_error(&self, error: &anyhow::Error);
}
