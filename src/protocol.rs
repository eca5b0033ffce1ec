//! Line-oriented text protocol for driving a game from a front end.
//!
//! The format follows GTP conventions: each command is one line with an
//! optional numeric id, and each response is `=[id] message` on success or
//! `?[id] message` on failure, followed by a blank line.
//!
//! ## Supported Commands
//!
//! - `name`, `version`, `protocol_version`
//! - `list_commands`, `known_command <cmd>`
//! - `quit`
//! - `clear_board [computer]` - New game; the player moves first unless `computer` is given
//! - `play <k> <i> <j>` - Player move in sub-board `k`, column `i`, row `j`
//! - `genmove` - Search, commit and print the computer's move
//! - `showboard` - Print the position
//! - `active` - Active sub-board, or `any`
//! - `turn` - Side to move
//! - `winner` - Winner, or `none`
//! - `depth [n]` - Get or set the search depth
//!
//! ## Example
//!
//! ```ignore
//! use uttt_engine::protocol::ProtocolEngine;
//! let mut engine = ProtocolEngine::new(EngineConfig::default());
//! engine.run()?;
//! ```

use std::io::{self, BufRead, Write};

use crate::board::Color;
use crate::config::EngineConfig;
use crate::constants::MAX_DEPTH;
use crate::game::{Game, Phase};

/// The list of known commands.
const KNOWN_COMMANDS: &[&str] = &[
    "active",
    "clear_board",
    "depth",
    "genmove",
    "known_command",
    "list_commands",
    "name",
    "play",
    "protocol_version",
    "quit",
    "showboard",
    "turn",
    "version",
    "winner",
];

/// Protocol engine state.
pub struct ProtocolEngine {
    game: Game,
    config: EngineConfig,
}

impl ProtocolEngine {
    pub fn new(config: EngineConfig) -> Self {
        Self {
            game: Game::new(&config),
            config,
        }
    }

    /// Run the command loop, reading from stdin and writing to stdout.
    pub fn run(&mut self) -> io::Result<()> {
        let stdin = io::stdin();
        let stdout = io::stdout();
        self.serve(stdin.lock(), stdout.lock())
    }

    /// Run the command loop over arbitrary input and output.
    pub fn serve<R: BufRead, W: Write>(&mut self, input: R, mut output: W) -> io::Result<()> {
        for line in input.lines() {
            let line = line?;

            // Skip empty lines and comments
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            let (id, command_line) = Self::parse_id(line);

            let parts: Vec<&str> = command_line.split_whitespace().collect();
            if parts.is_empty() {
                continue;
            }

            let command = parts[0].to_lowercase();
            let args = &parts[1..];

            let (success, message) = self.execute(&command, args);
            let prefix = if success { '=' } else { '?' };
            let id_str = id.map(|i| i.to_string()).unwrap_or_default();

            write!(output, "{prefix}{id_str} {message}\n\n")?;
            output.flush()?;

            if command == "quit" {
                break;
            }
        }
        Ok(())
    }

    /// Parse an optional numeric command ID from the beginning of the line.
    fn parse_id(line: &str) -> (Option<u32>, &str) {
        let trimmed = line.trim();
        let end = trimmed
            .find(|c: char| !c.is_ascii_digit())
            .unwrap_or(trimmed.len());
        if end > 0 {
            if let Ok(id) = trimmed[..end].parse::<u32>() {
                return (Some(id), trimmed[end..].trim());
            }
        }
        (None, trimmed)
    }

    fn parse_index(arg: &str) -> Result<usize, String> {
        arg.parse::<usize>().map_err(|_| format!("invalid number: {arg}"))
    }

    /// Execute a command and return (success, response).
    fn execute(&mut self, command: &str, args: &[&str]) -> (bool, String) {
        match command {
            "name" => (true, env!("CARGO_PKG_NAME").to_string()),

            "version" => (true, env!("CARGO_PKG_VERSION").to_string()),

            "protocol_version" => (true, "1".to_string()),

            "list_commands" => (true, KNOWN_COMMANDS.join("\n")),

            "known_command" => {
                if args.is_empty() {
                    return (false, "missing argument".to_string());
                }
                let known = KNOWN_COMMANDS.contains(&args[0].to_lowercase().as_str());
                (true, if known { "true" } else { "false" }.to_string())
            }

            "quit" => (true, String::new()),

            "clear_board" => {
                let first = match args.first().map(|a| a.to_lowercase()) {
                    None => Color::Player,
                    Some(a) if a == "player" => Color::Player,
                    Some(a) if a == "computer" => Color::Computer,
                    Some(a) => return (false, format!("unknown side: {a}")),
                };
                self.game.reset(first);
                (true, String::new())
            }

            "play" => {
                if args.len() < 3 {
                    return (false, "missing arguments".to_string());
                }
                let coords: Result<Vec<usize>, String> =
                    args[..3].iter().map(|a| Self::parse_index(a)).collect();
                let coords = match coords {
                    Ok(c) => c,
                    Err(e) => return (false, e),
                };
                if self.game.attempt_move(coords[0], coords[1], coords[2]) {
                    (true, String::new())
                } else {
                    (false, "illegal move".to_string())
                }
            }

            "genmove" => {
                if self.game.phase() != Phase::ComputerSearching {
                    return (false, "not the computer's turn".to_string());
                }
                let depth = self.config.search_depth;
                if !self.game.request_computer_move(&self.config.scoring, depth) {
                    return (false, "search already running".to_string());
                }
                match self.game.wait_computer_move() {
                    Some(mv) => (true, mv.to_string()),
                    None => (false, "no move found".to_string()),
                }
            }

            "showboard" => (true, format!("\n{}", self.game.position())),

            "active" => match self.game.current_active_sub_board() {
                Some(k) => (true, k.to_string()),
                None => (true, "any".to_string()),
            },

            "turn" => (true, self.game.turn_owner().to_string()),

            "winner" => match self.game.winner() {
                Some(c) => (true, c.to_string()),
                None => (true, "none".to_string()),
            },

            "depth" => {
                let Some(arg) = args.first() else {
                    return (true, self.config.search_depth.to_string());
                };
                match arg.parse::<i32>() {
                    Ok(d) if (1..=MAX_DEPTH).contains(&d) => {
                        self.config.search_depth = d;
                        (true, String::new())
                    }
                    Ok(d) => (false, format!("depth must be in [1, {MAX_DEPTH}] (got {d})")),
                    Err(_) => (false, "invalid depth".to_string()),
                }
            }

            _ => (false, format!("unknown command: {command}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn engine() -> ProtocolEngine {
        ProtocolEngine::new(EngineConfig {
            search_depth: 2,
            pacing_ms: 0,
            seed: Some(1),
            ..EngineConfig::default()
        })
    }

    #[test]
    fn test_parse_id_with_id() {
        let (id, cmd) = ProtocolEngine::parse_id("123 name");
        assert_eq!(id, Some(123));
        assert_eq!(cmd, "name");
    }

    #[test]
    fn test_parse_id_without_id() {
        let (id, cmd) = ProtocolEngine::parse_id("name");
        assert_eq!(id, None);
        assert_eq!(cmd, "name");
    }

    #[test]
    fn test_name_command() {
        let mut engine = engine();
        let (success, response) = engine.execute("name", &[]);
        assert!(success);
        assert_eq!(response, "uttt-engine");
    }

    #[test]
    fn test_known_command() {
        let mut engine = engine();

        let (success, response) = engine.execute("known_command", &["genmove"]);
        assert!(success);
        assert_eq!(response, "true");

        let (success, response) = engine.execute("known_command", &["komi"]);
        assert!(success);
        assert_eq!(response, "false");
    }

    #[test]
    fn test_play_and_genmove() {
        let mut engine = engine();

        let (success, _) = engine.execute("genmove", &[]);
        assert!(!success, "player moves first");

        let (success, _) = engine.execute("play", &["4", "1", "1"]);
        assert!(success);
        assert_eq!(engine.execute("active", &[]), (true, "4".to_string()));
        assert_eq!(engine.execute("turn", &[]), (true, "computer".to_string()));

        let (success, _) = engine.execute("play", &["4", "0", "0"]);
        assert!(!success, "input ignored on the computer's turn");

        let (success, response) = engine.execute("genmove", &[]);
        assert!(success);
        assert!(response.starts_with("4 "), "got {response}");
        assert_eq!(engine.execute("turn", &[]), (true, "player".to_string()));
        assert_eq!(engine.execute("winner", &[]), (true, "none".to_string()));
    }

    #[test]
    fn test_play_bad_arguments() {
        let mut engine = engine();
        assert!(!engine.execute("play", &["4", "1"]).0);
        assert!(!engine.execute("play", &["4", "x", "1"]).0);
        assert!(!engine.execute("play", &["4", "1", "7"]).0);
    }

    #[test]
    fn test_depth() {
        let mut engine = engine();
        assert_eq!(engine.execute("depth", &[]), (true, "2".to_string()));
        assert!(engine.execute("depth", &["3"]).0);
        assert_eq!(engine.execute("depth", &[]), (true, "3".to_string()));
        assert!(!engine.execute("depth", &["0"]).0);
        assert!(!engine.execute("depth", &["99"]).0);
    }

    #[test]
    fn test_clear_board_computer_first() {
        let mut engine = engine();
        engine.execute("play", &["0", "0", "0"]);
        assert!(engine.execute("clear_board", &["computer"]).0);
        assert_eq!(engine.execute("turn", &[]), (true, "computer".to_string()));
        assert!(engine.execute("genmove", &[]).0);
        assert!(!engine.execute("clear_board", &["nobody"]).0);
    }

    #[test]
    fn test_serve_formats_responses() {
        let mut engine = engine();
        let input = b"1 name\n# comment\n\nplay 9 9 9\n2 active\nquit\nname\n";
        let mut output = Vec::new();
        engine.serve(&input[..], &mut output).unwrap();
        let text = String::from_utf8(output).unwrap();
        assert_eq!(text, "=1 uttt-engine\n\n? illegal move\n\n=2 any\n\n= \n\n");
    }
}
