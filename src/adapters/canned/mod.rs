//! In-memory adapters with scripted behavior.
//!
//! Used by tests and by anything that needs deterministic, offline stand-ins
//! for the network and the clock.

pub mod clock;
pub mod transport;

pub use clock::FixedClock;
pub use transport::CannedTransport;
