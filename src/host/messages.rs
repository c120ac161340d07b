//! Messages exchanged with the host application

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Settings payload: a list of single-entry `{name: value}` maps
pub type SettingValues = Vec<HashMap<String, String>>;

/// Messages received from the host
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Inbound {
    /// Sent once after pairing
    Info(InfoMessage),
    /// User triggered one of our actions
    Action(ActionMessage),
    /// User changed plugin settings
    Settings(SettingsMessage),
    /// Host asks the plugin to exit
    ClosePlugin(ClosePluginMessage),
    /// Broadcasts, list changes, connector events and anything newer
    #[serde(other)]
    Other,
}

impl Inbound {
    /// Plugin the message is addressed to, when the host says
    pub fn plugin_id(&self) -> Option<&str> {
        match self {
            Inbound::Action(m) => m.plugin_id.as_deref(),
            Inbound::ClosePlugin(m) => m.plugin_id.as_deref(),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InfoMessage {
    #[serde(default)]
    pub tp_version_string: Option<String>,
    #[serde(default)]
    pub plugin_version: Option<u32>,
    #[serde(default)]
    pub settings: SettingValues,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionMessage {
    #[serde(default)]
    pub plugin_id: Option<String>,
    #[serde(default)]
    pub action_id: Option<String>,
    #[serde(default)]
    pub data: Vec<ActionData>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ActionData {
    pub id: String,
    #[serde(default)]
    pub value: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SettingsMessage {
    #[serde(default)]
    pub values: SettingValues,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClosePluginMessage {
    #[serde(default)]
    pub plugin_id: Option<String>,
}

/// A triggered action, flattened for dispatch
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionEvent {
    pub action_id: String,
    pub params: HashMap<String, String>,
}

impl ActionMessage {
    /// Flatten into an event; `None` when the action id or data is missing
    pub fn into_event(self) -> Option<ActionEvent> {
        let action_id = self.action_id.filter(|id| !id.is_empty())?;
        if self.data.is_empty() {
            return None;
        }

        let params = self
            .data
            .into_iter()
            .map(|d| (d.id, d.value))
            .collect();

        Some(ActionEvent { action_id, params })
    }
}

/// Messages sent to the host
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Outbound {
    Pair { id: String },
    StateUpdate { id: String, value: String },
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn parse(value: serde_json::Value) -> Inbound {
        serde_json::from_value(value).expect("should decode")
    }

    #[test]
    fn test_info_message() {
        let msg = parse(json!({
            "type": "info",
            "sdkVersion": 3,
            "tpVersionString": "3.1.13.0",
            "tpVersionCode": 301013,
            "pluginVersion": 100,
            "settings": [{"IP Light #1": "10.0.0.5"}, {"IP Light #2": ""}]
        }));

        match msg {
            Inbound::Info(info) => {
                assert_eq!(info.tp_version_string.as_deref(), Some("3.1.13.0"));
                assert_eq!(info.plugin_version, Some(100));
                assert_eq!(info.settings.len(), 2);
            }
            other => panic!("expected info, got {:?}", other),
        }
    }

    #[test]
    fn test_action_message_into_event() {
        let msg = parse(json!({
            "type": "action",
            "pluginId": "tp.plugin.wiz",
            "actionId": "tp.plugin.wiz.act.brightness",
            "data": [
                {"id": "tp.plugin.wiz.act.brightness.data.light", "value": "10.0.0.5"},
                {"id": "tp.plugin.wiz.act.brightness.data.brightness", "value": "50"}
            ]
        }));

        assert_eq!(msg.plugin_id(), Some("tp.plugin.wiz"));
        let Inbound::Action(action) = msg else {
            panic!("expected action");
        };

        let event = action.into_event().expect("complete action");
        assert_eq!(event.action_id, "tp.plugin.wiz.act.brightness");
        assert_eq!(
            event.params.get("tp.plugin.wiz.act.brightness.data.brightness").map(String::as_str),
            Some("50")
        );
    }

    #[test]
    fn test_action_without_data_or_id_is_dropped() {
        let no_data = ActionMessage {
            action_id: Some("tp.plugin.wiz.act.turn_on_light".into()),
            ..Default::default()
        };
        assert!(no_data.into_event().is_none());

        let no_id = ActionMessage {
            data: vec![ActionData {
                id: "x".into(),
                value: "y".into(),
            }],
            ..Default::default()
        };
        assert!(no_id.into_event().is_none());
    }

    #[test]
    fn test_settings_and_close() {
        let settings = parse(json!({"type": "settings", "values": [{"IP Light #4": "10.0.0.9"}]}));
        assert!(matches!(settings, Inbound::Settings(ref s) if s.values.len() == 1));

        let close = parse(json!({"type": "closePlugin", "pluginId": "tp.plugin.wiz"}));
        assert!(matches!(close, Inbound::ClosePlugin(_)));
    }

    #[test]
    fn test_unknown_type_is_other() {
        let msg = parse(json!({"type": "broadcast", "event": "pageChange", "pageName": "main"}));
        assert!(matches!(msg, Inbound::Other));
        assert_eq!(msg.plugin_id(), None);
    }

    #[test]
    fn test_outbound_encoding() {
        let pair = serde_json::to_value(Outbound::Pair {
            id: "tp.plugin.wiz".into(),
        })
        .unwrap();
        assert_eq!(pair, json!({"type": "pair", "id": "tp.plugin.wiz"}));

        let state = serde_json::to_value(Outbound::StateUpdate {
            id: "tp.plugin.wiz.state.light1".into(),
            value: "10.0.0.5".into(),
        })
        .unwrap();
        assert_eq!(
            state,
            json!({"type": "stateUpdate", "id": "tp.plugin.wiz.state.light1", "value": "10.0.0.5"})
        );
    }
}
