//! Light address slots managed by the host
//!
//! The host owns persistence; the bridge only mirrors the latest values it was
//! sent and uses the first slot as the fallback light for blank actions.

use std::collections::HashMap;

/// One of the four address slots
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LightSlot {
    Light1,
    Light2,
    Light3,
    Light4,
}

impl LightSlot {
    pub const ALL: [LightSlot; 4] = [
        LightSlot::Light1,
        LightSlot::Light2,
        LightSlot::Light3,
        LightSlot::Light4,
    ];

    fn index(self) -> usize {
        match self {
            LightSlot::Light1 => 0,
            LightSlot::Light2 => 1,
            LightSlot::Light3 => 2,
            LightSlot::Light4 => 3,
        }
    }

    /// Setting name shown in the host's settings dialog
    pub fn setting_name(self) -> &'static str {
        match self {
            LightSlot::Light1 => "IP Light #1",
            LightSlot::Light2 => "IP Light #2",
            LightSlot::Light3 => "IP Light #3",
            LightSlot::Light4 => "IP Light #4",
        }
    }

    /// State id mirrored back to the host
    pub fn state_id(self) -> &'static str {
        match self {
            LightSlot::Light1 => "tp.plugin.wiz.state.light1",
            LightSlot::Light2 => "tp.plugin.wiz.state.light2",
            LightSlot::Light3 => "tp.plugin.wiz.state.light3",
            LightSlot::Light4 => "tp.plugin.wiz.state.light4",
        }
    }

    pub fn default_address(self) -> &'static str {
        match self {
            LightSlot::Light1 => "192.168.1.102",
            _ => "",
        }
    }

    pub fn from_setting_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|slot| slot.setting_name() == name)
    }
}

/// Current address for every slot
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LightSettings {
    addresses: [String; 4],
}

impl Default for LightSettings {
    fn default() -> Self {
        Self {
            addresses: LightSlot::ALL.map(|slot| slot.default_address().to_string()),
        }
    }
}

impl LightSettings {
    pub fn address(&self, slot: LightSlot) -> &str {
        &self.addresses[slot.index()]
    }

    /// Address used when an action leaves the light blank
    pub fn default_address(&self) -> &str {
        self.address(LightSlot::Light1)
    }

    /// Apply a settings payload from the host.
    ///
    /// The host sends a list of single-entry maps (`[{"IP Light #1": "..."}]`).
    /// Values are kept exactly as sent; addresses are trimmed when an action
    /// uses them. Unknown names are ignored. Returns every slot the payload
    /// mentioned, in slot order, so the caller can mirror them as host states.
    pub fn apply(&mut self, values: &[HashMap<String, String>]) -> Vec<(LightSlot, String)> {
        let mut touched = [false; 4];

        for (name, value) in values.iter().flatten() {
            if let Some(slot) = LightSlot::from_setting_name(name) {
                self.addresses[slot.index()] = value.clone();
                touched[slot.index()] = true;
            }
        }

        LightSlot::ALL
            .into_iter()
            .filter(|slot| touched[slot.index()])
            .map(|slot| (slot, self.address(slot).to_string()))
            .collect()
    }
}
