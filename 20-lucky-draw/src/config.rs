//! Runtime settings, assembled from command-line flags and their
//! environment fallbacks in [`crate::cli`].

use std::path::PathBuf;
use std::time::Duration;

use crate::auth::Credentials;
use crate::persistence::{FileStore, Persistence};

pub const DEFAULT_DATA_DIR: &str = ".lucky-draw";
pub const DEFAULT_CUE_MS: u64 = 5_000;
pub const DEFAULT_FRAME_MS: u64 = 80;

/// How long a spin's cue lasts and how often the reel changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpinTiming {
    pub cue: Duration,
    pub frame: Duration,
}

impl Default for SpinTiming {
    fn default() -> Self {
        Self {
            cue: Duration::from_millis(DEFAULT_CUE_MS),
            frame: Duration::from_millis(DEFAULT_FRAME_MS),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub data_dir: PathBuf,
    pub timing: SpinTiming,
    pub credentials: Credentials,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from(DEFAULT_DATA_DIR),
            timing: SpinTiming::default(),
            credentials: Credentials::default(),
        }
    }
}

impl Config {
    pub fn persistence(&self) -> Persistence {
        Persistence::new(FileStore::new(&self.data_dir))
    }
}
