//! Line-oriented console for driving an engine by hand or from a script.
//!
//! The framing follows GTP: an optional numeric id, a command, and
//! whitespace-separated arguments. Responses start with `=` on success or `?`
//! on failure, echo the id, and end with a blank line. Structured results
//! are printed as JSON.
//!
//! ## Supported Commands
//!
//! - `name`, `version`, `list_commands`, `known_command <cmd>`, `quit`
//! - `place <color> <x> <y> [owner]` - Buffer a stone for the next tick
//! - `process` - Commit the tick and print its report
//! - `retrieve <x0> <y0> <x1> <y1>` - Print committed stones in a rectangle
//! - `liberties <x> <y>` - Print the liberties of the group at a point
//! - `score` - Print board statistics and capture counts
//! - `pending` - Number of stones waiting for the next tick
//! - `verify` - Cross-check group records against the board
//!
//! ## Example
//!
//! ```ignore
//! use infinite_goban::console::Console;
//! let mut console = Console::new(engine);
//! console.run(std::io::stdin().lock(), std::io::stdout())?;
//! ```

use std::io::{self, BufRead, Write};

use serde::Serialize;

use crate::board::{Color, Point, Rect, Stone};
use crate::constants::{CONSOLE_OWNER, MAX_RETRIEVE_SPAN};
use crate::engine::GobanEngine;
use crate::store::Store;

/// The list of known console commands.
const KNOWN_COMMANDS: &[&str] = &[
    "known_command",
    "liberties",
    "list_commands",
    "name",
    "pending",
    "place",
    "process",
    "quit",
    "retrieve",
    "score",
    "verify",
    "version",
];

pub struct Console<S> {
    engine: GobanEngine<S>,
}

impl<S: Store> Console<S> {
    pub fn new(engine: GobanEngine<S>) -> Self {
        Self { engine }
    }

    pub fn engine(&self) -> &GobanEngine<S> {
        &self.engine
    }

    /// Read commands from `input` until `quit` or end of input.
    pub fn run<R: BufRead, W: Write>(&mut self, input: R, mut output: W) -> io::Result<()> {
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
            let (success, message) = self.execute(&command, &parts[1..]);

            let prefix = if success { '=' } else { '?' };
            let id_str = id.map(|i| i.to_string()).unwrap_or_default();
            writeln!(output, "{prefix}{id_str} {message}\n")?;
            output.flush()?;

            if command == "quit" {
                break;
            }
        }
        Ok(())
    }

    /// Parse an optional numeric command id from the beginning of the line.
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

    fn parse_coords<const N: usize>(args: &[&str]) -> Result<[i64; N], String> {
        if args.len() < N {
            return Err("missing arguments".to_string());
        }
        let mut out = [0i64; N];
        for (slot, arg) in out.iter_mut().zip(args) {
            *slot = arg
                .parse()
                .map_err(|_| format!("invalid coordinate: {arg}"))?;
        }
        Ok(out)
    }

    fn json<T: Serialize>(value: &T) -> (bool, String) {
        match serde_json::to_string(value) {
            Ok(s) => (true, s),
            Err(e) => (false, e.to_string()),
        }
    }

    /// Execute a command and return (success, response).
    fn execute(&mut self, command: &str, args: &[&str]) -> (bool, String) {
        match command {
            "name" => (true, "infinite-goban".to_string()),

            "version" => (true, env!("CARGO_PKG_VERSION").to_string()),

            "list_commands" => (true, KNOWN_COMMANDS.join("\n")),

            "known_command" => {
                if args.is_empty() {
                    return (false, "missing argument".to_string());
                }
                let known = KNOWN_COMMANDS.contains(&args[0].to_lowercase().as_str());
                (true, if known { "true" } else { "false" }.to_string())
            }

            "quit" => (true, String::new()),

            "place" => {
                let Some(color) = args.first().and_then(|c| Color::parse(c)) else {
                    return (false, "expected color black or white".to_string());
                };
                let [x, y] = match Self::parse_coords::<2>(&args[1..]) {
                    Ok(xy) => xy,
                    Err(e) => return (false, e),
                };
                let owner = args.get(3).copied().unwrap_or(CONSOLE_OWNER);
                match self.engine.place(Stone::new(x, y, color, owner)) {
                    Ok(()) => (true, String::new()),
                    Err(e) => (false, e.to_string()),
                }
            }

            "process" => match self.engine.process() {
                Ok(report) => Self::json(&report),
                Err(e) => (false, e.to_string()),
            },

            "retrieve" => {
                let [x0, y0, x1, y1] = match Self::parse_coords::<4>(args) {
                    Ok(r) => r,
                    Err(e) => return (false, e),
                };
                let rect = Rect::new(x0, y0, x1, y1).normalized();
                if rect.x1.abs_diff(rect.x0) > MAX_RETRIEVE_SPAN || rect.y1.abs_diff(rect.y0) > MAX_RETRIEVE_SPAN {
                    return (false, format!("rectangle wider than {MAX_RETRIEVE_SPAN}"));
                }
                match self.engine.retrieve(rect) {
                    Ok(stones) => Self::json(&stones),
                    Err(e) => (false, e.to_string()),
                }
            }

            "liberties" => {
                let [x, y] = match Self::parse_coords::<2>(args) {
                    Ok(xy) => xy,
                    Err(e) => return (false, e),
                };
                match self.engine.liberties(Point::new(x, y)) {
                    Ok(Some(libs)) => Self::json(&libs),
                    Ok(None) => (false, "no stone there".to_string()),
                    Err(e) => (false, e.to_string()),
                }
            }

            "score" => match self.engine.stats() {
                Ok(stats) => Self::json(&stats),
                Err(e) => (false, e.to_string()),
            },

            "pending" => match self.engine.pending() {
                Ok(n) => (true, n.to_string()),
                Err(e) => (false, e.to_string()),
            },

            "verify" => match self.engine.verify() {
                Ok(()) => (true, String::new()),
                Err(e) => (false, e.to_string()),
            },

            _ => (false, format!("unknown command: {command}")),
        }
    }
}
