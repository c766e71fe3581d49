use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Everything the control pad can ask the rover to do.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Intent {
    Auto,
    Up,
    Down,
    Left,
    Right,
    Stop,
    SprayOn,
    SprayOff,
    SeedOn,
    SeedOff,
}

impl Intent {
    pub const ALL: [Intent; 10] = [
        Intent::Auto,
        Intent::Up,
        Intent::Down,
        Intent::Left,
        Intent::Right,
        Intent::Stop,
        Intent::SprayOn,
        Intent::SprayOff,
        Intent::SeedOn,
        Intent::SeedOff,
    ];

    /// The tag used on the control pad and on the command line.
    pub fn tag(self) -> &'static str {
        match self {
            Intent::Auto => "auto",
            Intent::Up => "up",
            Intent::Down => "down",
            Intent::Left => "left",
            Intent::Right => "right",
            Intent::Stop => "stop",
            Intent::SprayOn => "sprayon",
            Intent::SprayOff => "sprayoff",
            Intent::SeedOn => "seedon",
            Intent::SeedOff => "seedoff",
        }
    }

    /// Actuator channel and action this intent drives.
    pub fn command(self) -> (Channel, Action) {
        match self {
            Intent::Auto => (Channel::Drive, Action::Auto),
            Intent::Up => (Channel::Drive, Action::Forward),
            Intent::Down => (Channel::Drive, Action::Reverse),
            Intent::Left => (Channel::Drive, Action::TurnLeft),
            Intent::Right => (Channel::Drive, Action::TurnRight),
            Intent::Stop => (Channel::Drive, Action::Stop),
            Intent::SprayOn => (Channel::Spray, Action::On),
            Intent::SprayOff => (Channel::Spray, Action::Off),
            Intent::SeedOn => (Channel::Seed, Action::On),
            Intent::SeedOff => (Channel::Seed, Action::Off),
        }
    }
}

impl fmt::Display for Intent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownIntent(pub String);

impl fmt::Display for UnknownIntent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown intent: {:?}", self.0)
    }
}

impl std::error::Error for UnknownIntent {}

impl FromStr for Intent {
    type Err = UnknownIntent;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Intent::ALL
            .into_iter()
            .find(|intent| intent.tag() == s)
            .ok_or_else(|| UnknownIntent(s.to_string()))
    }
}

/// Fixed actuator channels of the rover controller.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Channel {
    Drive = 0,
    Seed = 1,
    Spray = 2,
}

impl Channel {
    /// Channel id as it appears in the command payload.
    pub fn key(self) -> String {
        (self as u8).to_string()
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Action {
    Auto,
    Forward,
    Reverse,
    TurnLeft,
    TurnRight,
    Stop,
    On,
    Off,
}

impl Action {
    pub fn token(self) -> &'static str {
        match self {
            Action::Auto => "auto",
            Action::Forward => "forward",
            Action::Reverse => "reverse",
            Action::TurnLeft => "turn_left",
            Action::TurnRight => "turn_right",
            Action::Stop => "stop",
            Action::On => "ON",
            Action::Off => "OFF",
        }
    }
}

/// Channel id to action token, e.g. `{"0": "forward"}`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(transparent)]
pub struct CommandPayload(pub BTreeMap<String, String>);

impl CommandPayload {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, channel: Channel) -> Option<&str> {
        self.0.get(&channel.key()).map(String::as_str)
    }
}

impl From<Intent> for CommandPayload {
    fn from(intent: Intent) -> Self {
        let (channel, action) = intent.command();
        CommandPayload(BTreeMap::from([(channel.key(), action.token().to_string())]))
    }
}

/// Body posted to the command endpoint.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CommandRequest {
    pub cmd: CommandPayload,
}

impl From<Intent> for CommandRequest {
    fn from(intent: Intent) -> Self {
        CommandRequest { cmd: intent.into() }
    }
}

/// Translate a control pad tag into its command payload.
///
/// Unknown tags yield an empty payload instead of an error; callers wanting a
/// hard failure parse the tag with [`Intent::from_str`] first.
pub fn translate(tag: &str) -> CommandPayload {
    match tag.parse::<Intent>() {
        Ok(intent) => intent.into(),
        Err(e) => {
            log::warn!("{e}, sending empty payload");
            CommandPayload::default()
        }
    }
}
