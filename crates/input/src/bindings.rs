use std::collections::BTreeMap;

use crate::command::Command;

/// Errors from key-script parsing.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BindingError {
    #[error("unknown key '{0}'")]
    UnknownKey(String),
}

/// Key name to command table. Key names are matched case-insensitively.
#[derive(Debug, Clone)]
pub struct KeyBindings {
    map: BTreeMap<String, Command>,
}

impl Default for KeyBindings {
    fn default() -> Self {
        let mut bindings = Self::empty();
        for (key, command) in [
            ("w", Command::MoveForward),
            ("up", Command::MoveForward),
            ("s", Command::MoveBack),
            ("down", Command::MoveBack),
            ("a", Command::MoveLeft),
            ("left", Command::MoveLeft),
            ("d", Command::MoveRight),
            ("right", Command::MoveRight),
            ("q", Command::TurnLeft),
            ("e", Command::TurnRight),
            ("space", Command::Interact),
        ] {
            bindings.bind(key, command);
        }
        bindings
    }
}

impl KeyBindings {
    pub fn empty() -> Self {
        Self {
            map: BTreeMap::new(),
        }
    }

    /// Bind `key` to `command`, replacing any previous binding.
    pub fn bind(&mut self, key: &str, command: Command) {
        self.map.insert(key.to_ascii_lowercase(), command);
    }

    pub fn command_for(&self, key: &str) -> Option<Command> {
        self.map.get(&key.to_ascii_lowercase()).copied()
    }

    /// Parse a whitespace- or comma-separated list of key names.
    pub fn parse_script(&self, script: &str) -> Result<Vec<Command>, BindingError> {
        script
            .split(|c: char| c.is_whitespace() || c == ',')
            .filter(|k| !k.is_empty())
            .map(|k| {
                self.command_for(k)
                    .ok_or_else(|| BindingError::UnknownKey(k.to_string()))
            })
            .collect()
    }
}
