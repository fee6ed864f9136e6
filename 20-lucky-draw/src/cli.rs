use std::path::PathBuf;
use std::time::Duration;

use clap::{Args, Parser, Subcommand};

use crate::auth::{Credentials, DEFAULT_PASSWORD, DEFAULT_USERNAME};
use crate::config::{Config, DEFAULT_CUE_MS, DEFAULT_DATA_DIR, DEFAULT_FRAME_MS, SpinTiming};

#[derive(Parser, Debug)]
#[command(author, version, about = "Prize draw over an imported staff roster", long_about = None)]
pub struct Cli {
    #[command(flatten)]
    pub settings: SettingsArgs,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Args, Debug, Clone)]
pub struct SettingsArgs {
    /// Directory holding the saved session and login flag.
    #[arg(long, global = true, env = "LUCKY_DRAW_DATA_DIR", default_value = DEFAULT_DATA_DIR)]
    pub data_dir: PathBuf,

    /// Length of the spin cue in milliseconds, shared across an award's quota.
    #[arg(long, global = true, env = "LUCKY_DRAW_CUE_MS", default_value_t = DEFAULT_CUE_MS)]
    pub cue_ms: u64,

    /// Interval between reel frames in milliseconds.
    #[arg(long, global = true, env = "LUCKY_DRAW_FRAME_MS", default_value_t = DEFAULT_FRAME_MS)]
    pub frame_ms: u64,

    /// Operator username accepted by `login`.
    #[arg(long, global = true, env = "LUCKY_DRAW_ADMIN_USER", default_value = DEFAULT_USERNAME)]
    pub admin_user: String,

    /// Operator password accepted by `login`. Not a secret: see `auth`.
    #[arg(
        long,
        global = true,
        env = "LUCKY_DRAW_ADMIN_PASSWORD",
        default_value = DEFAULT_PASSWORD,
        hide_default_value = true
    )]
    pub admin_password: String,
}

impl SettingsArgs {
    pub fn config(&self) -> Config {
        Config {
            data_dir: self.data_dir.clone(),
            timing: SpinTiming {
                cue: Duration::from_millis(self.cue_ms),
                frame: Duration::from_millis(self.frame_ms),
            },
            credentials: Credentials {
                username: self.admin_user.clone(),
                password: self.admin_password.clone(),
            },
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Unlock the operator commands.
    Login { username: String, password: String },
    /// Replace the roster with the first sheet of a spreadsheet.
    Import { path: PathBuf },
    /// List the configured awards.
    Awards,
    /// Append an award with the given quota.
    AddAward { count: u32, title: Vec<String> },
    /// Change an award's quota or title.
    SetAward {
        id: String,
        #[arg(long)]
        count: Option<u32>,
        #[arg(long)]
        title: Option<String>,
    },
    /// Remove an award that has no winners yet.
    RemoveAward { id: String },
    /// Draw one winner for the current award.
    Spin,
    /// Show roster, awards and winners.
    Status,
    /// Write the results workbook.
    Export {
        #[arg(long, default_value = ".")]
        out_dir: PathBuf,
    },
    /// Delete the session, the results and the login flag.
    Reset {
        #[arg(long)]
        yes: bool,
    },
    /// Interactive prompt reading commands from stdin.
    Shell,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_build_config() {
        let cli = Cli::try_parse_from(["lucky_draw", "status"]).expect("parse");
        let config = cli.settings.config();
        assert_eq!(config.timing, SpinTiming::default());
        assert_eq!(config.credentials, Credentials::default());
        assert!(matches!(cli.command, Command::Status));
    }

    #[test]
    fn add_award_joins_title_words() {
        let cli =
            Cli::try_parse_from(["lucky_draw", "add-award", "3", "Giải", "Nhất"]).expect("parse");
        match cli.command {
            Command::AddAward { count, title } => {
                assert_eq!(count, 3);
                assert_eq!(title.join(" "), "Giải Nhất");
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn global_flags_follow_subcommand() {
        let cli = Cli::try_parse_from([
            "lucky_draw",
            "spin",
            "--cue-ms",
            "200",
            "--data-dir",
            "/tmp/x",
        ])
        .expect("parse");
        let config = cli.settings.config();
        assert_eq!(config.timing.cue, Duration::from_millis(200));
        assert_eq!(config.data_dir, PathBuf::from("/tmp/x"));
    }
}
