//! Command dispatcher - validates and routes inbound actions

use super::action::ActionKind;
use super::params::{self, ParamError};
use crate::light::DeviceClient;
use std::collections::HashMap;
use std::net::Ipv4Addr;
use tracing::{debug, warn};
use wiz_bridge_shared::{Command, Outcome};

/// Result of one dispatch, tagged with the action it came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dispatched {
    pub action_id: String,
    pub outcome: Outcome,
}

/// Turns host actions into light commands
#[derive(Clone)]
pub struct CommandDispatcher {
    client: DeviceClient,
}

impl CommandDispatcher {
    pub fn new(client: DeviceClient) -> Self {
        Self { client }
    }

    /// Handle an action, using `default_address` when the action leaves the
    /// light address blank
    pub async fn handle(
        &self,
        action_id: &str,
        params: &HashMap<String, String>,
        default_address: &str,
    ) -> Dispatched {
        let outcome = match ActionKind::from_id(action_id) {
            Some(kind) => match build_command(kind, params, default_address) {
                Ok((address, command)) => {
                    debug!(action = %kind, %address, %command, "dispatching");
                    self.client.execute(address, command).await
                }
                Err(e) => {
                    warn!(action = %kind, error = %e, "rejected action parameters");
                    Outcome::InvalidParameter
                }
            },
            None => {
                warn!("Got unknown action ID: {}", action_id);
                Outcome::UnknownAction
            }
        };

        Dispatched {
            action_id: action_id.to_string(),
            outcome,
        }
    }
}

/// Validate parameters and build the command for an action
pub fn build_command(
    kind: ActionKind,
    params: &HashMap<String, String>,
    default_address: &str,
) -> Result<(Ipv4Addr, Command), ParamError> {
    let address = params::parse_address(
        params.get(kind.address_param()).map(String::as_str),
        default_address,
    )?;

    let command = match kind {
        ActionKind::TurnOn => Command::TurnOn,
        ActionKind::TurnOff => Command::TurnOff,
        ActionKind::SetBrightness => {
            let raw = kind
                .brightness_param()
                .and_then(|id| params.get(id))
                .map(String::as_str);
            Command::SetBrightness(params::parse_percent(raw)?)
        }
    };

    Ok((address, command))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::light::fake::RecordingDriver;
    use std::sync::Arc;
    use std::time::Duration;
    use wiz_bridge_shared::BrightnessLevel;

    const LIGHT: Ipv4Addr = Ipv4Addr::new(10, 0, 0, 5);

    fn dispatcher() -> (CommandDispatcher, Arc<RecordingDriver>) {
        let driver = Arc::new(RecordingDriver::new());
        let client = DeviceClient::new(driver.clone(), Duration::from_millis(500));
        (CommandDispatcher::new(client), driver)
    }

    fn params(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[tokio::test]
    async fn test_turn_on_dispatch() {
        let (dispatcher, driver) = dispatcher();
        let kind = ActionKind::TurnOn;

        let result = dispatcher
            .handle(kind.id(), &params(&[(kind.address_param(), "10.0.0.5")]), "")
            .await;

        assert_eq!(result.outcome, Outcome::Success);
        assert_eq!(result.action_id, kind.id());
        assert_eq!(driver.sent(), vec![(LIGHT, Command::TurnOn)]);
    }

    #[tokio::test]
    async fn test_turn_off_dispatch() {
        let (dispatcher, driver) = dispatcher();
        let kind = ActionKind::TurnOff;

        let result = dispatcher
            .handle(kind.id(), &params(&[(kind.address_param(), "10.0.0.5")]), "")
            .await;

        assert_eq!(result.outcome, Outcome::Success);
        assert_eq!(driver.sent(), vec![(LIGHT, Command::TurnOff)]);
    }

    #[tokio::test]
    async fn test_brightness_dispatch_rounds_half_up() {
        let (dispatcher, driver) = dispatcher();
        let kind = ActionKind::SetBrightness;
        let percent_param = kind.brightness_param().unwrap();

        let result = dispatcher
            .handle(
                kind.id(),
                &params(&[(kind.address_param(), "10.0.0.5"), (percent_param, "50")]),
                "",
            )
            .await;

        assert_eq!(result.outcome, Outcome::Success);
        let expected = BrightnessLevel::new(128).unwrap();
        assert_eq!(driver.sent(), vec![(LIGHT, Command::SetBrightness(expected))]);
    }

    #[tokio::test]
    async fn test_bad_percent_makes_no_network_call() {
        let (dispatcher, driver) = dispatcher();
        let kind = ActionKind::SetBrightness;
        let percent_param = kind.brightness_param().unwrap();

        for raw in ["101", "-5", "abc", "", "12.5"] {
            let result = dispatcher
                .handle(
                    kind.id(),
                    &params(&[(kind.address_param(), "10.0.0.5"), (percent_param, raw)]),
                    "",
                )
                .await;
            assert_eq!(result.outcome, Outcome::InvalidParameter, "percent {raw:?}");
        }

        assert!(driver.sent().is_empty());
    }

    #[tokio::test]
    async fn test_bad_address_makes_no_network_call() {
        let (dispatcher, driver) = dispatcher();
        let kind = ActionKind::TurnOff;

        for raw in ["", "kitchen", "10.0.0.300"] {
            let result = dispatcher
                .handle(kind.id(), &params(&[(kind.address_param(), raw)]), "")
                .await;
            assert_eq!(result.outcome, Outcome::InvalidParameter, "address {raw:?}");
        }

        assert!(driver.sent().is_empty());
    }

    #[tokio::test]
    async fn test_blank_address_uses_default() {
        let (dispatcher, driver) = dispatcher();
        let kind = ActionKind::TurnOn;

        let result = dispatcher
            .handle(kind.id(), &params(&[(kind.address_param(), "")]), "10.0.0.5")
            .await;

        assert_eq!(result.outcome, Outcome::Success);
        assert_eq!(driver.sent(), vec![(LIGHT, Command::TurnOn)]);
    }

    #[tokio::test]
    async fn test_unknown_action_has_no_side_effect() {
        let (dispatcher, driver) = dispatcher();

        let result = dispatcher
            .handle(
                "tp.plugin.wiz.act.party_mode",
                &params(&[("x", "10.0.0.5")]),
                "192.168.1.102",
            )
            .await;

        assert_eq!(result.outcome, Outcome::UnknownAction);
        assert_eq!(result.action_id, "tp.plugin.wiz.act.party_mode");
        assert!(driver.sent().is_empty());
    }

    #[tokio::test]
    async fn test_unreachable_light_reported() {
        let driver = Arc::new(RecordingDriver::failing());
        let client = DeviceClient::new(driver, Duration::from_millis(500));
        let dispatcher = CommandDispatcher::new(client);
        let kind = ActionKind::TurnOff;

        let result = dispatcher
            .handle(kind.id(), &params(&[(kind.address_param(), "10.0.0.5")]), "")
            .await;

        assert_eq!(result.outcome, Outcome::DeviceUnreachable);
    }
}
