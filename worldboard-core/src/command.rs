//! The slash-command palette.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::overlay::Dataset;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "command", content = "dataset", rename_all = "snake_case")]
pub enum Command {
    Overlay(Dataset),
    Satellite,
    SatelliteOff,
    Flat,
    Globe,
    Projects,
}

/// Every command, in palette order.
pub const COMMANDS: [(&str, Command); 13] = [
    ("/ports", Command::Overlay(Dataset::Ports)),
    ("/nuclear", Command::Overlay(Dataset::Nuclear)),
    ("/oil", Command::Overlay(Dataset::OilFields)),
    ("/pipelines", Command::Overlay(Dataset::Pipelines)),
    ("/powerlines", Command::Overlay(Dataset::Powerlines)),
    ("/refineries", Command::Overlay(Dataset::Refineries)),
    ("/industrial", Command::Overlay(Dataset::IndustrialZones)),
    ("/trade", Command::Overlay(Dataset::TradeZones)),
    ("/satellite", Command::Satellite),
    ("/satellite-off", Command::SatelliteOff),
    ("/flat", Command::Flat),
    ("/globe", Command::Globe),
    ("/projects", Command::Projects),
];

fn normalize(input: &str) -> String {
    input.trim().to_lowercase()
}

/// Commands starting with the typed text. Empty input suggests nothing.
pub fn suggest(input: &str) -> Vec<&'static str> {
    let input = normalize(input);
    if input.is_empty() {
        return Vec::new();
    }
    COMMANDS
        .iter()
        .map(|(token, _)| *token)
        .filter(|token| token.starts_with(&input))
        .collect()
}

/// The command for an entered line. Anything unrecognised is `None`.
pub fn parse(input: &str) -> Option<Command> {
    let input = normalize(input);
    COMMANDS
        .iter()
        .find(|(token, _)| *token == input)
        .map(|(_, command)| *command)
}

impl Command {
    pub fn token(self) -> &'static str {
        COMMANDS
            .iter()
            .find(|(_, command)| *command == self)
            .map(|(token, _)| *token)
            .unwrap_or_default()
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prefix_suggestions() {
        assert_eq!(suggest("/sat"), vec!["/satellite", "/satellite-off"]);
        assert_eq!(suggest("  /P"), vec!["/ports", "/pipelines", "/powerlines", "/projects"]);
        assert!(suggest("").is_empty());
        assert!(suggest("   ").is_empty());
        assert!(suggest("ports").is_empty());
        assert_eq!(suggest("/").len(), COMMANDS.len());
    }

    #[test]
    fn parsing_is_exact_after_trimming() {
        assert_eq!(parse(" /OIL "), Some(Command::Overlay(Dataset::OilFields)));
        assert_eq!(parse("/flat"), Some(Command::Flat));
        assert_eq!(parse("/fla"), None);
        assert_eq!(parse("hello"), None);
    }

    #[test]
    fn tokens_round_trip() {
        for (token, command) in COMMANDS {
            assert_eq!(command.token(), token);
            assert_eq!(parse(token), Some(command));
        }
    }
}
