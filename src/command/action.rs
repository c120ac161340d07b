//! Action catalog registered with the host

/// Actions the host can trigger
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ActionKind {
    TurnOn,
    TurnOff,
    SetBrightness,
}

impl ActionKind {
    pub const ALL: [ActionKind; 3] = [
        ActionKind::TurnOn,
        ActionKind::TurnOff,
        ActionKind::SetBrightness,
    ];

    /// Action identifier as sent by the host
    pub fn id(&self) -> &'static str {
        match self {
            ActionKind::TurnOn => "tp.plugin.wiz.act.turn_on_light",
            ActionKind::TurnOff => "tp.plugin.wiz.act.turn_off_light",
            ActionKind::SetBrightness => "tp.plugin.wiz.act.brightness",
        }
    }

    /// Look up an action by its host identifier
    pub fn from_id(id: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.id() == id)
    }

    /// Parameter id carrying the light address
    pub fn address_param(&self) -> &'static str {
        match self {
            ActionKind::TurnOn => "tp.plugin.wiz.act.turn_on_light.data.light",
            ActionKind::TurnOff => "tp.plugin.wiz.act.turn_off_light.data.light",
            ActionKind::SetBrightness => "tp.plugin.wiz.act.brightness.data.light",
        }
    }

    /// Parameter id carrying the brightness percent, if the action takes one
    pub fn brightness_param(&self) -> Option<&'static str> {
        match self {
            ActionKind::SetBrightness => Some("tp.plugin.wiz.act.brightness.data.brightness"),
            _ => None,
        }
    }
}

impl std::fmt::Display for ActionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ActionKind::TurnOn => write!(f, "turn-on"),
            ActionKind::TurnOff => write!(f, "turn-off"),
            ActionKind::SetBrightness => write!(f, "set-brightness"),
        }
    }
}
