use agribot_core::{Event, Intent};
use anyhow::{Result, anyhow};

pub const HELP: &str = "\
movement: up down left right stop
actions:  spray seed weed (toggle) | auto (raw auto-mode command)
camera:   refresh | snapshot
other:    ok (dismiss alert) | status | help | quit";

/// A line typed on the terminal control pad.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Input {
    Core(Event),
    AcknowledgeAlert,
    Snapshot,
    Status,
    Help,
    Quit,
}

impl Input {
    pub fn parse(line: &str) -> Result<Self> {
        let word = line.trim().to_ascii_lowercase();

        let input = match word.as_str() {
            "spray" => Input::Core(Event::ToggleSpray),
            "seed" => Input::Core(Event::ToggleSeed),
            "weed" => Input::Core(Event::ToggleAutoMode),
            "refresh" | "retry" => Input::Core(Event::FetchImage),
            "ok" => Input::AcknowledgeAlert,
            "snapshot" => Input::Snapshot,
            "status" => Input::Status,
            "help" | "?" => Input::Help,
            "quit" | "exit" => Input::Quit,
            tag => {
                let intent = tag
                    .parse::<Intent>()
                    .map_err(|e| anyhow!("{e} (type 'help' for commands)"))?;
                Input::Core(Event::Send(intent))
            }
        };

        Ok(input)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn movement_words_send_intents() {
        assert_eq!(
            Input::parse("up").unwrap(),
            Input::Core(Event::Send(Intent::Up))
        );
        assert_eq!(
            Input::parse("  Stop \n").unwrap(),
            Input::Core(Event::Send(Intent::Stop))
        );
        assert_eq!(
            Input::parse("sprayoff").unwrap(),
            Input::Core(Event::Send(Intent::SprayOff))
        );
    }

    #[test]
    fn action_words_toggle() {
        assert_eq!(
            Input::parse("weed").unwrap(),
            Input::Core(Event::ToggleAutoMode)
        );
        assert_eq!(Input::parse("retry").unwrap(), Input::Core(Event::FetchImage));
    }

    #[test]
    fn unknown_words_are_rejected() {
        let err = Input::parse("jump").unwrap_err();
        assert!(err.to_string().contains("unknown intent"));
        assert!(Input::parse("").is_err());
    }
}
