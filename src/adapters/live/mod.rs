//! Live adapters for real external interactions.

pub mod clock;
pub mod http;

pub use clock::LiveClock;
pub use http::LiveHttpTransport;
