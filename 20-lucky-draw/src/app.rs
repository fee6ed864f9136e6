//! Operator-facing actions shared by the one-shot subcommands and the shell.
//!
//! Each action locks the controller, does its work and returns the lines to
//! show the operator. Guard conditions of a spin come back as a message, not
//! an error.

use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};
use tokio::sync::Mutex;
use tracing::warn;

use crate::auth;
use crate::config::Config;
use crate::export::export_results;
use crate::ledger::{configs_of, edit_config, new_award_config, remove_config};
use crate::model::{Award, Participant};
use crate::persistence::Persistence;
use crate::roster::import_file;
use crate::session::Controller;
use crate::spin::{SpinFrame, spin};

pub const SETUP_HINT: &str = "setup required: import a roster and add at least one award";

pub struct App {
    config: Config,
    controller: Mutex<Controller>,
}

impl App {
    pub fn open(config: Config) -> Result<Self> {
        let persistence = config.persistence();
        Self::with_persistence(config, persistence)
    }

    pub fn with_persistence(config: Config, persistence: Persistence) -> Result<Self> {
        let controller = Controller::open(persistence).context("failed to open session")?;
        Ok(Self {
            config,
            controller: Mutex::new(controller),
        })
    }

    pub async fn is_authed(&self) -> Result<bool> {
        Ok(self.controller.lock().await.persistence().is_authed()?)
    }

    pub async fn needs_setup(&self) -> bool {
        self.controller.lock().await.needs_setup()
    }

    pub async fn login(&self, username: &str, password: &str) -> Result<String> {
        let controller = self.controller.lock().await;
        auth::login(
            controller.persistence(),
            &self.config.credentials,
            username,
            password,
        )?;
        Ok("logged in".to_string())
    }

    pub async fn import(&self, path: &Path) -> Result<String> {
        let participants = import_file(path)
            .with_context(|| format!("failed to import {}", path.display()))?;
        let imported = self.controller.lock().await.import_roster(participants)?;
        Ok(format!("imported {imported} participants"))
    }

    pub async fn add_award(&self, count: u32, title: Option<String>) -> Result<String> {
        let mut controller = self.controller.lock().await;
        let config = new_award_config(title, count);
        let line = format!("added [{}] {} x{}", config.id, config.title, config.count);
        let mut configs = configs_of(&controller.state().awards);
        configs.push(config);
        controller.configure(configs)?;
        Ok(line)
    }

    pub async fn set_award(
        &self,
        id: &str,
        count: Option<u32>,
        title: Option<String>,
    ) -> Result<String> {
        let mut controller = self.controller.lock().await;
        let configs = edit_config(configs_of(&controller.state().awards), id, count, title)?;
        controller.configure(configs)?;
        Ok(format!("updated [{id}]"))
    }

    pub async fn remove_award(&self, id: &str) -> Result<String> {
        let mut controller = self.controller.lock().await;
        let configs = remove_config(configs_of(&controller.state().awards), id)?;
        controller.configure(configs)?;
        Ok(format!("removed [{id}]"))
    }

    pub async fn awards(&self) -> Vec<String> {
        let controller = self.controller.lock().await;
        let state = controller.state();
        if state.awards.is_empty() {
            return vec!["no awards configured".to_string()];
        }
        state
            .awards
            .iter()
            .enumerate()
            .map(|(index, award)| award_line(award, index == state.current_award_index))
            .collect()
    }

    /// Spins the current award, drawing the reel on stderr.
    pub async fn spin(&self) -> Result<String> {
        let mut stderr = std::io::stderr();
        let outcome = spin(&self.controller, &self.config.timing, |frame| {
            let line = match frame {
                SpinFrame::Candidate(p) => format!("\r  {:<48}", p.name),
                SpinFrame::Winner(p) => format!("\r* {:<48}\n", p.name),
            };
            if let Err(err) = stderr.write_all(line.as_bytes()).and_then(|()| stderr.flush()) {
                warn!(error = ?err, "failed to draw reel frame");
            }
        })
        .await;

        match outcome {
            Ok(winner) => Ok(self.winner_line(&winner).await),
            Err(err) if err.is_guard() => Ok(format!("spin skipped: {err}")),
            Err(err) => Err(err.into()),
        }
    }

    async fn winner_line(&self, winner: &Participant) -> String {
        let controller = self.controller.lock().await;
        let award = controller
            .state()
            .awards
            .iter()
            .find(|award| award.winners.iter().any(|w| w.id == winner.id));
        match award {
            Some(award) => format!(
                "winner: {} {} ({} {}/{})",
                winner.id,
                winner.name,
                award.title,
                award.winners.len(),
                award.count
            ),
            None => format!("winner: {} {}", winner.id, winner.name),
        }
    }

    pub async fn status(&self) -> Vec<String> {
        let controller = self.controller.lock().await;
        let state = controller.state();
        let mut lines = vec![format!(
            "roster: {} participants, {} eligible",
            state.participants.len(),
            controller.pool().len()
        )];
        if controller.needs_setup() {
            lines.push(SETUP_HINT.to_string());
        }
        match controller.current_award() {
            Some(award) if !award.is_complete() => lines.push(format!(
                "current award: {} ({}/{}, {} left)",
                award.title,
                award.winners.len(),
                award.count,
                award.remaining()
            )),
            Some(_) => lines.push("all awards complete".to_string()),
            None => {}
        }
        for (index, award) in state.awards.iter().enumerate() {
            lines.push(award_line(award, index == state.current_award_index));
            lines.extend(
                award
                    .winners
                    .iter()
                    .map(|w| format!("    {} {}", w.id, w.name)),
            );
        }
        lines
    }

    pub async fn export(&self, out_dir: &Path) -> Result<String> {
        let controller = self.controller.lock().await;
        let written = export_results(&controller.state().awards, out_dir)
            .with_context(|| format!("failed to export into {}", out_dir.display()))?;
        Ok(match written {
            Some(path) => format!("exported {}", path.display()),
            None => "nothing to export yet".to_string(),
        })
    }

    pub async fn reset(&self) -> Result<String> {
        self.controller.lock().await.reset()?;
        Ok("session cleared; log in again".to_string())
    }
}

fn award_line(award: &Award, current: bool) -> String {
    let marker = if current && !award.is_complete() {
        "  <- current"
    } else {
        ""
    };
    format!(
        "[{}] {} {}/{}{}",
        award.id,
        award.title,
        award.winners.len(),
        award.count,
        marker
    )
}
