//! Award ledger configuration.
//!
//! The configuration surface always submits the full list of tiers. [`configure`]
//! merges it over the current ledger by id: an existing award keeps its winners,
//! a new id starts with none, and an id missing from the submission is dropped.
//! Tiers that already have winners are locked: they cannot be removed, renamed
//! or have their quota lowered below the number of winners.

use std::collections::{HashMap, HashSet};

use nanoid::nanoid;

use crate::error::ConfigError;
use crate::model::{Award, AwardConfig};

pub const DEFAULT_AWARD_TITLE: &str = "Giải mới";

// Alphanumeric only, so an id never reads as a command-line flag.
const ID_ALPHABET: [char; 62] = [
    '0', '1', '2', '3', '4', '5', '6', '7', '8', '9', 'a', 'b', 'c', 'd', 'e', 'f', 'g', 'h', 'i',
    'j', 'k', 'l', 'm', 'n', 'o', 'p', 'q', 'r', 's', 't', 'u', 'v', 'w', 'x', 'y', 'z', 'A', 'B',
    'C', 'D', 'E', 'F', 'G', 'H', 'I', 'J', 'K', 'L', 'M', 'N', 'O', 'P', 'Q', 'R', 'S', 'T', 'U',
    'V', 'W', 'X', 'Y', 'Z',
];

/// Merges `configs` over `current`, returning the new ledger in submission order.
///
/// On error `current` is left as it was; callers keep using it.
pub fn configure(current: &[Award], configs: Vec<AwardConfig>) -> Result<Vec<Award>, ConfigError> {
    validate(current, &configs)?;

    let mut existing: HashMap<&str, &Award> = current
        .iter()
        .map(|award| (award.id.as_str(), award))
        .collect();

    let merged = configs
        .into_iter()
        .map(|config| {
            let winners = existing
                .remove(config.id.as_str())
                .map(|old| old.winners.clone())
                .unwrap_or_default();
            Award {
                id: config.id,
                title: config.title,
                count: config.count,
                winners,
            }
        })
        .collect();

    Ok(merged)
}

fn validate(current: &[Award], configs: &[AwardConfig]) -> Result<(), ConfigError> {
    let mut seen = HashSet::new();
    for config in configs {
        if !seen.insert(config.id.as_str()) {
            return Err(ConfigError::DuplicateId {
                id: config.id.clone(),
            });
        }
        if config.count == 0 {
            return Err(ConfigError::ZeroQuota {
                title: config.title.clone(),
            });
        }
    }

    let incoming: HashMap<&str, &AwardConfig> = configs
        .iter()
        .map(|config| (config.id.as_str(), config))
        .collect();

    for award in current.iter().filter(|award| !award.winners.is_empty()) {
        let Some(config) = incoming.get(award.id.as_str()) else {
            return Err(ConfigError::RemovesDrawnAward {
                title: award.title.clone(),
            });
        };
        if (config.count as usize) < award.winners.len() {
            return Err(ConfigError::QuotaBelowWinners {
                title: award.title.clone(),
                winners: award.winners.len(),
                requested: config.count,
            });
        }
        if config.title != award.title {
            return Err(ConfigError::TitleLocked {
                title: award.title.clone(),
            });
        }
    }

    Ok(())
}

/// A fresh tier with a generated id.
pub fn new_award_config(title: Option<String>, count: u32) -> AwardConfig {
    AwardConfig {
        id: nanoid!(12, &ID_ALPHABET),
        title: title.unwrap_or_else(|| DEFAULT_AWARD_TITLE.to_string()),
        count,
    }
}

/// The current ledger as an editable config list.
pub fn configs_of(awards: &[Award]) -> Vec<AwardConfig> {
    awards.iter().map(Award::config).collect()
}

/// Applies a single-tier edit to a config list. `None` leaves the field as is.
pub fn edit_config(
    mut configs: Vec<AwardConfig>,
    id: &str,
    count: Option<u32>,
    title: Option<String>,
) -> Result<Vec<AwardConfig>, ConfigError> {
    let config = configs
        .iter_mut()
        .find(|config| config.id == id)
        .ok_or_else(|| ConfigError::UnknownAward { id: id.to_string() })?;
    if let Some(count) = count {
        config.count = count;
    }
    if let Some(title) = title {
        config.title = title;
    }
    Ok(configs)
}

/// Removes one tier from a config list.
pub fn remove_config(
    mut configs: Vec<AwardConfig>,
    id: &str,
) -> Result<Vec<AwardConfig>, ConfigError> {
    let before = configs.len();
    configs.retain(|config| config.id != id);
    if configs.len() == before {
        return Err(ConfigError::UnknownAward { id: id.to_string() });
    }
    Ok(configs)
}
