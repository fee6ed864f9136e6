//! Prize draw over an imported staff roster.
//!
//! An operator imports a roster from a spreadsheet, configures a list of
//! awards (each with a winner quota) and spins them one winner at a time
//! until every quota is filled. Results export back to a workbook. The whole
//! session is saved after every change, so a restart picks up where it left
//! off.
//!
//! - [`model`] defines participants, awards and the saved session layout.
//! - [`roster`] parses spreadsheets into a roster.
//! - [`ledger`] merges award configuration and locks tiers that have winners.
//! - [`pool`] derives who can still win; [`sequencer`] picks the current award.
//! - [`engine`] makes the uniform pick and feeds the cosmetic candidate reel.
//! - [`session`] owns the state and guards draws and resets.
//! - [`spin`] paces a spin on the Tokio clock.
//! - [`persistence`] stores the session and login flag as key-value text.
//! - [`auth`] is the static login gate (not a security boundary).
//! - [`export`] writes the results workbook.
//! - [`app`], [`cli`], [`console`] and [`config`] make up the terminal front end.

pub mod app;
pub mod auth;
pub mod cli;
pub mod config;
pub mod console;
pub mod engine;
pub mod error;
pub mod export;
pub mod ledger;
pub mod model;
pub mod persistence;
pub mod pool;
pub mod roster;
pub mod sequencer;
pub mod session;
pub mod spin;
