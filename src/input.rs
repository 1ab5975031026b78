//! Line-oriented input surface
//!
//! Stands in for the keyboard and file picker when running headless:
//!
//! | Line | Action |
//! |---|---|
//! | `h` | Toggle UI visibility |
//! | `a <path>` | Add a memory image |
//! | `r <w> <h>` | Resize the viewport |
//! | `q` | Quit |

use crate::command::SceneHandle;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputCommand {
    ToggleUi,
    AddMemory(String),
    Resize { width: u32, height: u32 },
    Quit,
}

impl InputCommand {
    /// Parse one input line; `None` for blank or unrecognized lines.
    pub fn parse(line: &str) -> Option<Self> {
        let line = line.trim();
        let (head, rest) = match line.split_once(char::is_whitespace) {
            Some((head, rest)) => (head, rest.trim()),
            None => (line, ""),
        };

        match head {
            "h" | "H" => Some(Self::ToggleUi),
            "q" | "Q" | "quit" => Some(Self::Quit),
            "a" | "add" if !rest.is_empty() => Some(Self::AddMemory(rest.to_string())),
            "r" | "resize" => {
                let mut dims = rest.split_whitespace().map(str::parse::<u32>);
                match (dims.next(), dims.next(), dims.next()) {
                    (Some(Ok(width)), Some(Ok(height)), None) if width > 0 && height > 0 => {
                        Some(Self::Resize { width, height })
                    }
                    _ => None,
                }
            }
            _ => None,
        }
    }

    /// Forward to the scene. Returns `false` for `Quit`, which the caller
    /// handles.
    pub fn dispatch(self, handle: &SceneHandle) -> bool {
        match self {
            Self::ToggleUi => handle.toggle_ui(),
            Self::AddMemory(url) => handle.add_memory(url),
            Self::Resize { width, height } => handle.resize(width, height),
            Self::Quit => return false,
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_commands() {
        assert_eq!(InputCommand::parse("h"), Some(InputCommand::ToggleUi));
        assert_eq!(InputCommand::parse("  q  "), Some(InputCommand::Quit));
        assert_eq!(
            InputCommand::parse("a photos/my tree.png"),
            Some(InputCommand::AddMemory("photos/my tree.png".to_string()))
        );
        assert_eq!(
            InputCommand::parse("r 800 600"),
            Some(InputCommand::Resize {
                width: 800,
                height: 600
            })
        );
    }

    #[test]
    fn test_parse_rejects_malformed() {
        assert_eq!(InputCommand::parse(""), None);
        assert_eq!(InputCommand::parse("a"), None);
        assert_eq!(InputCommand::parse("r 800"), None);
        assert_eq!(InputCommand::parse("r 0 600"), None);
        assert_eq!(InputCommand::parse("r 8 6 4"), None);
        assert_eq!(InputCommand::parse("x"), None);
    }
}
