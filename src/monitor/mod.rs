//! Mailbox-scanning engine: connection lifecycle, unseen-message search,
//! decoding, and filtering. Strictly blocking; the caller owns cadence.

pub mod connection;
pub mod decode;
pub mod error;
pub mod filter;
pub mod scanner;
pub mod session;

pub use connection::{ConnectionManager, Credentials};
pub use error::MonitorError;
pub use scanner::{scan, ScanCriteria};
pub use session::MailSession;
