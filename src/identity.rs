//! Opaque node identities.
//!
//! Every node receives a 128-bit identity drawn from the operating system's
//! random source when it is created. All 128 bits are random; no UUID version
//! or variant bits are stamped in. Identities compare by value and print in
//! the hyphenated UUID form.

use std::{fmt, str::FromStr};

use rand::{rngs::OsRng, TryRngCore};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{Result, TreeError};

/// Unique identifier assigned to a node at creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Identity(Uuid);

impl Identity {
    /// Draws a fresh identity from the OS random source.
    ///
    /// # Returns
    /// * `Result<Identity>` - The new identity, or `RandomnessUnavailable` if the
    ///   random source could not be read
    pub fn new() -> Result<Self> {
        let mut bytes = [0u8; 16];
        OsRng
            .try_fill_bytes(&mut bytes)
            .map_err(|e| TreeError::RandomnessUnavailable(e.to_string()))?;
        Ok(Self(Uuid::from_bytes(bytes)))
    }

    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl From<Uuid> for Identity {
    fn from(id: Uuid) -> Self {
        Self(id)
    }
}

impl fmt::Display for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0.hyphenated(), f)
    }
}

impl FromStr for Identity {
    type Err = uuid::Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Uuid::parse_str(s).map(Self)
    }
}
