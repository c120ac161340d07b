//! Routes host events to the dispatcher and mirrors settings back as states

use crate::command::{CommandDispatcher, Dispatched};
use crate::host::{ActionEvent, ActionMessage, HostHandler, InfoMessage, Outbound, SettingValues};
use crate::settings::LightSettings;
use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::{mpsc, RwLock, Semaphore};
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

/// Bridge between the host session and the lights.
///
/// Actions run on spawned tasks; at most `workers` light commands are in
/// flight at once, the rest wait for a permit.
pub struct ActionRouter {
    dispatcher: CommandDispatcher,
    settings: Arc<RwLock<LightSettings>>,
    workers: Arc<Semaphore>,
    outbound: mpsc::Sender<Outbound>,
}

impl ActionRouter {
    pub fn new(dispatcher: CommandDispatcher, workers: usize, outbound: mpsc::Sender<Outbound>) -> Self {
        Self {
            dispatcher,
            settings: Arc::new(RwLock::new(LightSettings::default())),
            workers: Arc::new(Semaphore::new(workers.max(1))),
            outbound,
        }
    }

    /// Queue an action for execution on the worker pool
    pub async fn submit(&self, event: ActionEvent) -> JoinHandle<Dispatched> {
        let default_address = self.settings.read().await.default_address().to_string();
        let dispatcher = self.dispatcher.clone();
        let workers = self.workers.clone();

        tokio::spawn(async move {
            // The semaphore is never closed, so a permit always arrives
            let _permit = workers.acquire_owned().await.ok();

            let result = dispatcher
                .handle(&event.action_id, &event.params, &default_address)
                .await;

            if result.outcome.is_success() {
                info!("Action {} completed", result.action_id);
            } else {
                warn!("Action {} failed: {}", result.action_id, result.outcome);
            }
            result
        })
    }

    async fn apply_settings(&self, values: &SettingValues) {
        let updated = self.settings.write().await.apply(values);

        for (slot, address) in updated {
            debug!("{} = {:?}", slot.setting_name(), address);

            let update = Outbound::StateUpdate {
                id: slot.state_id().to_string(),
                value: address,
            };
            if let Err(e) = self.outbound.send(update).await {
                error!("Failed to send state update: {}", e);
            }
        }
    }
}

#[async_trait]
impl HostHandler for ActionRouter {
    async fn on_connect(&self, info: &InfoMessage) {
        info!(
            "Connected to TP v{}, plugin v{}",
            info.tp_version_string.as_deref().unwrap_or("?"),
            info.plugin_version
                .map(|v| v.to_string())
                .unwrap_or_else(|| "?".into())
        );
        self.apply_settings(&info.settings).await;
    }

    async fn on_setting_update(&self, values: &SettingValues) {
        self.apply_settings(values).await;
    }

    async fn on_action(&self, action: ActionMessage) {
        match action.into_event() {
            Some(event) => {
                debug!("Action received: {}", event.action_id);
                // Completion is logged by the task itself
                drop(self.submit(event).await);
            }
            None => debug!("Ignoring action without id or data"),
        }
    }

    async fn on_shutdown(&self) {
        info!("Received shutdown message, shutting down");
    }

    async fn on_error(&self, error: &anyhow::Error) {
        error!("Host session error: {:#}", error);
    }
}
