//! Command parsing for the interactive shell.
//!
//! Commands are case-insensitive and most have a one-letter alias. Titles may
//! contain spaces: everything after the fixed arguments is the title.

use anyhow::{Result, anyhow};

#[derive(Debug, PartialEq)]
pub enum ConsoleCommand {
    Spin,
    Status,
    Awards,
    Add { count: u32, title: Option<String> },
    Set { id: String, count: u32, title: Option<String> },
    Remove { id: String },
    Import { path: String },
    Export { dir: Option<String> },
    Reset { confirmed: bool },
    Help,
    Exit,
}

pub const HELP: &[&str] = &[
    "Commands (case-insensitive):",
    "  SPIN                      (alias: s)  -- draw one winner for the current award",
    "  STATUS                    (alias: t)  -- roster, awards and winners",
    "  AWARDS                    (alias: a)  -- list awards with their ids",
    "  ADD <count> [title]                   -- append an award",
    "  SET <id> <count> [title]              -- change quota (and title before any draw)",
    "  REMOVE <id>               (alias: rm) -- remove an award without winners",
    "  IMPORT <path>             (alias: i)  -- replace the roster from a spreadsheet",
    "  EXPORT [dir]              (alias: x)  -- write the results workbook",
    "  RESET YES                             -- wipe everything and log out",
    "  HELP                      (alias: h)  -- show this message",
    "  EXIT                      (alias: e)  -- leave the shell",
];

fn parse_count(raw: &str) -> Result<u32> {
    raw.parse()
        .map_err(|_| anyhow!("'{raw}' is not a valid quota"))
}

fn rest(parts: &[&str], from: usize) -> Option<String> {
    let joined = parts.get(from..).map(|tail| tail.join(" ")).unwrap_or_default();
    (!joined.is_empty()).then_some(joined)
}

impl ConsoleCommand {
    pub fn parse(line: &str) -> Result<Self> {
        let parts: Vec<&str> = line.split_whitespace().collect();
        let Some(first) = parts.first() else {
            return Err(anyhow!("empty command"));
        };

        let cmd = first.to_uppercase();
        let normalized = match cmd.as_str() {
            "S" => "SPIN",
            "T" => "STATUS",
            "A" => "AWARDS",
            "RM" => "REMOVE",
            "I" => "IMPORT",
            "X" => "EXPORT",
            "H" => "HELP",
            "E" | "QUIT" => "EXIT",
            other => other,
        };

        match (normalized, parts.len()) {
            ("SPIN", 1) => Ok(ConsoleCommand::Spin),
            ("STATUS", 1) => Ok(ConsoleCommand::Status),
            ("AWARDS", 1) => Ok(ConsoleCommand::Awards),
            ("HELP", 1) => Ok(ConsoleCommand::Help),
            ("EXIT", 1) => Ok(ConsoleCommand::Exit),
            ("ADD", n) if n >= 2 => Ok(ConsoleCommand::Add {
                count: parse_count(parts[1])?,
                title: rest(&parts, 2),
            }),
            ("SET", n) if n >= 3 => Ok(ConsoleCommand::Set {
                id: parts[1].to_string(),
                count: parse_count(parts[2])?,
                title: rest(&parts, 3),
            }),
            ("REMOVE", 2) => Ok(ConsoleCommand::Remove {
                id: parts[1].to_string(),
            }),
            ("IMPORT", n) if n >= 2 => Ok(ConsoleCommand::Import {
                path: parts[1..].join(" "),
            }),
            ("EXPORT", 1) => Ok(ConsoleCommand::Export { dir: None }),
            ("EXPORT", _) => Ok(ConsoleCommand::Export {
                dir: rest(&parts, 1),
            }),
            ("RESET", 1) => Ok(ConsoleCommand::Reset { confirmed: false }),
            ("RESET", 2) => Ok(ConsoleCommand::Reset {
                confirmed: parts[1].eq_ignore_ascii_case("yes"),
            }),
            ("ADD", _) => Err(anyhow!("ADD requires a quota: ADD <count> [title]")),
            ("SET", _) => Err(anyhow!("SET requires an id and a quota: SET <id> <count> [title]")),
            ("REMOVE", _) => Err(anyhow!("REMOVE requires exactly one id: REMOVE <id>")),
            ("IMPORT", _) => Err(anyhow!("IMPORT requires a path: IMPORT <path>")),
            _ => Err(anyhow!("invalid command. Try HELP/h for the list")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn aliases_and_case() {
        assert_eq!(ConsoleCommand::parse("s").unwrap(), ConsoleCommand::Spin);
        assert_eq!(ConsoleCommand::parse("SpIn").unwrap(), ConsoleCommand::Spin);
        assert_eq!(ConsoleCommand::parse("t").unwrap(), ConsoleCommand::Status);
        assert_eq!(ConsoleCommand::parse("quit").unwrap(), ConsoleCommand::Exit);
        assert_eq!(
            ConsoleCommand::parse("rm abc").unwrap(),
            ConsoleCommand::Remove { id: "abc".into() }
        );
    }

    #[test]
    fn titles_keep_spaces() {
        assert_eq!(
            ConsoleCommand::parse("add 3 Giải   Nhất").unwrap(),
            ConsoleCommand::Add {
                count: 3,
                title: Some("Giải Nhất".into())
            }
        );
        assert_eq!(
            ConsoleCommand::parse("ADD 1").unwrap(),
            ConsoleCommand::Add {
                count: 1,
                title: None
            }
        );
        assert_eq!(
            ConsoleCommand::parse("set id9 5 Big prize").unwrap(),
            ConsoleCommand::Set {
                id: "id9".into(),
                count: 5,
                title: Some("Big prize".into())
            }
        );
    }

    #[test]
    fn reset_needs_explicit_yes() {
        assert_eq!(
            ConsoleCommand::parse("reset").unwrap(),
            ConsoleCommand::Reset { confirmed: false }
        );
        assert_eq!(
            ConsoleCommand::parse("RESET yes").unwrap(),
            ConsoleCommand::Reset { confirmed: true }
        );
        assert_eq!(
            ConsoleCommand::parse("reset maybe").unwrap(),
            ConsoleCommand::Reset { confirmed: false }
        );
    }

    #[test]
    fn invalid_input() {
        assert!(ConsoleCommand::parse("").is_err());
        assert!(ConsoleCommand::parse("   ").is_err());
        assert!(ConsoleCommand::parse("dance").is_err());
        assert!(ConsoleCommand::parse("add").is_err());
        assert!(ConsoleCommand::parse("add many").is_err());
        assert!(ConsoleCommand::parse("set id").is_err());
        assert!(ConsoleCommand::parse("spin now").is_err());
    }
}
