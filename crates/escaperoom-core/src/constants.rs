//! Shared constants for the escape-room controller.
//!
//! Addresses follow the show-control convention:
//!
//! ```text
//! /escaperoom/challenge/<n>/reset              (in)
//! /escaperoom/challenge/<n>/success            (out, int 1)
//! /escaperoom/challenge/<n>/failure            (out, int 1)
//! /escaperoom/challenge/<n>/keypad/incorrect   (out, int 1)
//! /escaperoom/vaultdoor/unlock                 (in)
//! /escaperoom/vaultdoor/lock                   (in)
//! ```

use std::time::Duration;

// ============================================================================
// Addressing
// ============================================================================

/// Root segment shared by every address.
pub const ADDRESS_ROOT: &str = "/escaperoom";

/// Prefix of per-challenge addresses.
pub const CHALLENGE_PREFIX: &str = "/escaperoom/challenge/";

/// Inbound door unlock address.
pub const VAULT_UNLOCK_ADDRESS: &str = "/escaperoom/vaultdoor/unlock";

/// Inbound door lock address.
pub const VAULT_LOCK_ADDRESS: &str = "/escaperoom/vaultdoor/lock";

/// Payload carried by every outbound notification.
pub const NOTIFY_VALUE: i32 = 1;

/// Lowest challenge number.
pub const MIN_CHALLENGE_ID: u8 = 1;

/// Highest challenge number.
pub const MAX_CHALLENGE_ID: u8 = 99;

// ============================================================================
// Hardware
// ============================================================================

/// Highest BCM line on the 40-pin header.
pub const MAX_BCM_PIN: u8 = 27;

/// Upstream debounce window for input edges.
///
/// Edges inside this window are conflated by the input backend.
pub const DEBOUNCE_WINDOW: Duration = Duration::from_millis(200);

/// How long `stop_flashing` waits for a flash task before abandoning it.
pub const FLASH_STOP_TIMEOUT: Duration = Duration::from_secs(1);

/// Default flash interval for progress indicators.
pub const DEFAULT_FLASH_INTERVAL: Duration = Duration::from_millis(200);

// ============================================================================
// Network
// ============================================================================

/// Default receive bind address.
pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:10001";

/// Default transmit target (subnet broadcast).
pub const DEFAULT_TARGET_ADDR: &str = "10.100.20.255:10000";

/// Largest datagram the receive loop accepts.
pub const MAX_PACKET_SIZE: usize = 8 * 1024;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_addresses_share_root() {
        assert!(CHALLENGE_PREFIX.starts_with(ADDRESS_ROOT));
        assert!(VAULT_UNLOCK_ADDRESS.starts_with(ADDRESS_ROOT));
        assert!(VAULT_LOCK_ADDRESS.starts_with(ADDRESS_ROOT));
    }

    #[test]
    fn test_default_addrs_parse() {
        assert!(DEFAULT_BIND_ADDR.parse::<std::net::SocketAddr>().is_ok());
        assert!(DEFAULT_TARGET_ADDR.parse::<std::net::SocketAddr>().is_ok());
    }
}
