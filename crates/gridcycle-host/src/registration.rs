//! Startup roster registration. A restarting host asks its registrar
//! which players were already joined and replays them into the session.

use std::env;
use std::fmt;

use gridcycle_core::PlayerId;

/// Environment variable `EnvRegistrar` reads by default.
pub const PLAYERS_VAR: &str = "GRIDCYCLE_PLAYERS";

/// A source for the starting roster.
pub trait Registrar {
    fn register(&self) -> Result<Vec<PlayerId>, RegistrationError>;
}

/// Reads a comma-separated player id list from an environment variable.
/// An absent variable is an empty roster, not an error.
#[derive(Debug)]
pub struct EnvRegistrar {
    var: &'static str,
}

impl Default for EnvRegistrar {
    fn default() -> Self {
        Self { var: PLAYERS_VAR }
    }
}

impl EnvRegistrar {
    pub fn from_var(var: &'static str) -> Self {
        Self { var }
    }
}

impl Registrar for EnvRegistrar {
    fn register(&self) -> Result<Vec<PlayerId>, RegistrationError> {
        match env::var(self.var) {
            Ok(raw) => parse_roster(&raw),
            Err(env::VarError::NotPresent) => Ok(Vec::new()),
            Err(source) => Err(RegistrationError::Unreadable {
                var: self.var,
                source,
            }),
        }
    }
}

/// Parse a roster list like `"3,7,12"`. Blank entries are skipped, so
/// trailing commas stay harmless.
pub fn parse_roster(raw: &str) -> Result<Vec<PlayerId>, RegistrationError> {
    let mut roster = Vec::new();
    for entry in raw.split(',') {
        let entry = entry.trim();
        if entry.is_empty() {
            continue;
        }
        let id = entry
            .parse::<PlayerId>()
            .map_err(|_| RegistrationError::BadId {
                entry: entry.to_string(),
            })?;
        roster.push(id);
    }
    Ok(roster)
}

#[derive(Debug)]
pub enum RegistrationError {
    /// A roster entry did not parse as a player id.
    BadId { entry: String },
    /// The roster variable exists but could not be read.
    Unreadable {
        var: &'static str,
        source: env::VarError,
    },
}

impl fmt::Display for RegistrationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RegistrationError::BadId { entry } => {
                write!(f, "roster entry `{entry}` is not a player id")
            },
            RegistrationError::Unreadable { var, source } => {
                write!(f, "could not read `{var}`: {source}")
            },
        }
    }
}

impl std::error::Error for RegistrationError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            RegistrationError::BadId { .. } => None,
            RegistrationError::Unreadable { source, .. } => Some(source),
        }
    }
}
