//! Known show-control addresses.
//!
//! [`Address`] is the typed form of every route the controller sends or
//! accepts. Parsing is strict: trailing slashes, extra segments or an
//! out-of-range challenge number are rejected.

use escaperoom_core::constants::{CHALLENGE_PREFIX, VAULT_LOCK_ADDRESS, VAULT_UNLOCK_ADDRESS};
use escaperoom_core::{ChallengeId, Error, Result};
use std::fmt;
use std::str::FromStr;

/// Typed show-control address.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Address {
    /// `/escaperoom/challenge/<n>/reset` (inbound)
    Reset(ChallengeId),
    /// `/escaperoom/challenge/<n>/success` (outbound)
    Success(ChallengeId),
    /// `/escaperoom/challenge/<n>/failure` (outbound)
    Failure(ChallengeId),
    /// `/escaperoom/challenge/<n>/keypad/incorrect` (outbound)
    KeypadIncorrect(ChallengeId),
    /// `/escaperoom/vaultdoor/unlock` (inbound)
    VaultUnlock,
    /// `/escaperoom/vaultdoor/lock` (inbound)
    VaultLock,
}

impl Address {
    /// Whether the controller accepts this address from the network.
    pub fn is_inbound(&self) -> bool {
        matches!(
            self,
            Address::Reset(_) | Address::VaultUnlock | Address::VaultLock
        )
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Address::Reset(c) => write!(f, "{CHALLENGE_PREFIX}{c}/reset"),
            Address::Success(c) => write!(f, "{CHALLENGE_PREFIX}{c}/success"),
            Address::Failure(c) => write!(f, "{CHALLENGE_PREFIX}{c}/failure"),
            Address::KeypadIncorrect(c) => write!(f, "{CHALLENGE_PREFIX}{c}/keypad/incorrect"),
            Address::VaultUnlock => f.write_str(VAULT_UNLOCK_ADDRESS),
            Address::VaultLock => f.write_str(VAULT_LOCK_ADDRESS),
        }
    }
}

impl FromStr for Address {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            VAULT_UNLOCK_ADDRESS => return Ok(Address::VaultUnlock),
            VAULT_LOCK_ADDRESS => return Ok(Address::VaultLock),
            _ => {}
        }

        let rest = s
            .strip_prefix(CHALLENGE_PREFIX)
            .ok_or_else(|| Error::InvalidAddress(s.to_string()))?;

        let (number, action) = rest
            .split_once('/')
            .ok_or_else(|| Error::InvalidAddress(s.to_string()))?;
        let challenge: ChallengeId = number.parse()?;

        match action {
            "reset" => Ok(Address::Reset(challenge)),
            "success" => Ok(Address::Success(challenge)),
            "failure" => Ok(Address::Failure(challenge)),
            "keypad/incorrect" => Ok(Address::KeypadIncorrect(challenge)),
            _ => Err(Error::InvalidAddress(s.to_string())),
        }
    }
}
