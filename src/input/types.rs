//! Types for input handling

/// What a person asked the timer to do
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputCommand {
    StartStop,
    Reset,
}

/// Where a command came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandSource {
    Button,
    Touch,
    Web,
}

/// Sampled level of an input line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    High,
    Low,
}

impl From<bool> for Level {
    fn from(high: bool) -> Self {
        if high {
            Level::High
        } else {
            Level::Low
        }
    }
}

/// A command tagged with its source
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Command {
    pub source: CommandSource,
    pub command: InputCommand,
}

impl std::fmt::Display for InputCommand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            InputCommand::StartStop => write!(f, "Start/Stop"),
            InputCommand::Reset => write!(f, "Reset"),
        }
    }
}

impl std::fmt::Display for CommandSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CommandSource::Button => write!(f, "button"),
            CommandSource::Touch => write!(f, "touch"),
            CommandSource::Web => write!(f, "web"),
        }
    }
}

impl std::fmt::Display for Command {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} from {}", self.command, self.source)
    }
}
