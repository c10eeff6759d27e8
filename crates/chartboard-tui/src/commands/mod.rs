// ---------------------------------------------------------------------------
// Command
// ---------------------------------------------------------------------------

use std::path::PathBuf;

use chartboard_core::ChartKind;

use crate::{app::AppState, theme::Theme};

/// A parsed, validated command ready to be executed by the app shell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    // Close the help popup if open, otherwise quit
    Quit,
    // Quit unconditionally
    Exit,
    Help,
    Chart(ChartKind),
    // Replace the dataset with a local .json / .csv file
    Load(PathBuf),
    // Re-fetch from the configured endpoint
    Fetch,
    // Publish the canonical records to the configured endpoint
    Push,
    // Reload a file whenever it changes on disk
    Watch(PathBuf),
    Unwatch,
    Theme(String),
}

/// Work a command needs the app shell to do outside [`AppState`]: anything
/// that touches the filesystem or the network.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    Load(PathBuf),
    Fetch,
    Push,
    Watch(PathBuf),
    Unwatch,
}

impl Command {
    /// Parse a raw command string (the text after the `:` prefix).
    ///
    /// Returns `Ok(cmd)` on success, `Err(message)` on failure. An empty
    /// string returns `Err("")` as a sentinel meaning "close without acting".
    pub fn parse(input: &str) -> Result<Command, String> {
        let input = input.trim();
        if input.is_empty() {
            return Err(String::new());
        }

        let (word, rest) = input
            .split_once(char::is_whitespace)
            .map(|(w, r)| (w, r.trim()))
            .unwrap_or((input, ""));

        match word {
            "q" | "quit" => Ok(Command::Quit),
            "q!" | "quit!" => Ok(Command::Exit),
            "help" => Ok(Command::Help),
            "fetch" => Ok(Command::Fetch),
            "push" => Ok(Command::Push),
            "unwatch" => Ok(Command::Unwatch),
            "chart" => rest
                .parse::<ChartKind>()
                .map(Command::Chart)
                .map_err(|_| "usage: chart <bar|line|pie>".to_string()),
            "load" => path_arg(rest, "usage: load <path>").map(Command::Load),
            "watch" => path_arg(rest, "usage: watch <path>").map(Command::Watch),
            "theme" => {
                if rest.is_empty() {
                    Err("usage: theme <default|gruvbox>".to_string())
                } else {
                    Ok(Command::Theme(rest.to_string()))
                }
            }
            other => Err(format!("unknown command: {other}")),
        }
    }
}

fn path_arg(rest: &str, usage: &str) -> Result<PathBuf, String> {
    if rest.is_empty() {
        Err(usage.to_string())
    } else {
        Ok(PathBuf::from(rest))
    }
}

/// Execute a parsed [`Command`] against the application state.
///
/// Commands that only change what is on screen are applied directly; the
/// rest come back as an [`Action`] for the shell to run.
pub fn execute_command(s: &mut AppState, cmd: Command) -> Option<Action> {
    match cmd {
        Command::Quit => {
            if s.show_help {
                s.show_help = false;
            } else {
                s.quit = true;
            }
            None
        }
        Command::Exit => {
            s.quit = true;
            None
        }
        Command::Help => {
            s.show_help = !s.show_help;
            None
        }
        Command::Chart(kind) => {
            s.chart = kind;
            None
        }
        Command::Theme(name) => {
            s.theme = Theme::by_name(&name);
            None
        }
        Command::Load(path) => Some(Action::Load(path)),
        Command::Fetch => Some(Action::Fetch),
        Command::Push => Some(Action::Push),
        Command::Watch(path) => Some(Action::Watch(path)),
        Command::Unwatch => Some(Action::Unwatch),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use chartboard_core::config::Config;

    fn state() -> AppState {
        AppState::new(Config::defaults(), Theme::load_default())
    }

    #[test]
    fn parse_quit() {
        assert_eq!(Command::parse("q"), Ok(Command::Quit));
        assert_eq!(Command::parse("  quit  "), Ok(Command::Quit));
        assert_eq!(Command::parse("q!"), Ok(Command::Exit));
    }

    #[test]
    fn parse_chart() {
        assert_eq!(Command::parse("chart pie"), Ok(Command::Chart(ChartKind::Pie)));
        assert_eq!(Command::parse("chart LINE"), Ok(Command::Chart(ChartKind::Line)));
        assert!(Command::parse("chart donut").is_err());
        assert!(Command::parse("chart").is_err());
    }

    #[test]
    fn parse_paths_keep_spaces() {
        assert_eq!(
            Command::parse("load  my data/sales.csv"),
            Ok(Command::Load(PathBuf::from("my data/sales.csv")))
        );
        assert_eq!(
            Command::parse("watch feed.json"),
            Ok(Command::Watch(PathBuf::from("feed.json")))
        );
        assert!(Command::parse("load").is_err());
    }

    #[test]
    fn parse_theme() {
        assert_eq!(
            Command::parse("theme gruvbox"),
            Ok(Command::Theme("gruvbox".to_string()))
        );
        assert!(Command::parse("theme").is_err());
    }

    #[test]
    fn parse_empty_returns_sentinel_err() {
        assert_eq!(Command::parse(""), Err(String::new()));
        assert_eq!(Command::parse("  "), Err(String::new()));
    }

    #[test]
    fn parse_unknown() {
        let err = Command::parse("frobnicate").unwrap_err();
        assert!(err.contains("frobnicate"));
    }

    #[test]
    fn quit_closes_help_first() {
        let mut s = state();
        s.show_help = true;
        assert_eq!(execute_command(&mut s, Command::Quit), None);
        assert!(!s.show_help);
        assert!(!s.quit);
        execute_command(&mut s, Command::Quit);
        assert!(s.quit);
    }

    #[test]
    fn chart_switches_in_place() {
        let mut s = state();
        assert_eq!(execute_command(&mut s, Command::Chart(ChartKind::Line)), None);
        assert_eq!(s.chart, ChartKind::Line);
    }

    #[test]
    fn io_commands_become_actions() {
        let mut s = state();
        assert_eq!(execute_command(&mut s, Command::Fetch), Some(Action::Fetch));
        assert_eq!(execute_command(&mut s, Command::Push), Some(Action::Push));
        assert_eq!(
            execute_command(&mut s, Command::Load(PathBuf::from("a.csv"))),
            Some(Action::Load(PathBuf::from("a.csv")))
        );
        assert_eq!(execute_command(&mut s, Command::Unwatch), Some(Action::Unwatch));
    }
}
