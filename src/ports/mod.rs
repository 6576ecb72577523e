//! Port traits defining external boundaries.
//!
//! Each trait represents a boundary between the triage core and something
//! outside it (a classification backend, the network, time).
//! Implementations live in `src/adapters/`.

pub mod clock;
pub mod transport;
pub mod triager;

pub use clock::Clock;
pub use transport::{ChatTransport, HttpReply, HttpRequest, TransportFailure, TransportFuture};
pub use triager::{TriageFuture, Triager};
