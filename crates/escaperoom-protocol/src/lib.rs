//! Addressed-message protocol for show control.
//!
//! Messages are OSC 1.0 packets carried in single UDP datagrams. Only the
//! subset the show-control system uses is supported: plain messages (no
//! bundles) with `i`, `f` and `s` arguments.
//!
//! ```
//! use escaperoom_core::ChallengeId;
//! use escaperoom_protocol::{Address, OscArg, OscMessage};
//!
//! let challenge = ChallengeId::new(1).unwrap();
//! let msg = OscMessage::notify(Address::Success(challenge));
//! assert_eq!(msg.address, "/escaperoom/challenge/1/success");
//! assert_eq!(msg.args, vec![OscArg::Int(1)]);
//! ```

pub mod address;
pub mod codec;
pub mod message;

pub use address::Address;
pub use codec::OscCodec;
pub use message::{OscArg, OscMessage};
