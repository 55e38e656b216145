//! A byte-stream transport abstraction for embedded systems
//!
//! The session layer drives the MQTT exchange through these traits and never
//! touches sockets directly. Implement them for your platform's TCP stack
//! (lwIP, smoltcp, `std::net`, a TLS wrapper) and hand the connection to
//! [`Session::connect`](crate::session::Session::connect).
//!
//! All operations are synchronous and blocking: `read` and `write` park the
//! calling thread of control until data moves or the transport fails. A
//! transport with a configured read timeout should surface expiry as
//! [`Error::Timeout`]; the session treats that as retryable.

#![allow(missing_docs)]
#![deny(unsafe_code)]

/// Common error types for network operations
pub mod error;

use error::Error;

/// Re-exports of the transport traits
pub mod prelude {
    pub use super::{Close, Connect, Connection, Read, Write};
}

pub trait Read {
    /// Associated error type
    type Error: core::fmt::Debug + Into<Error>;
    /// Read data from the connection.
    ///
    /// A return of `Ok(0)` signals that the peer closed the stream.
    fn read(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error>;
}

pub trait Write {
    /// Associated error type
    type Error: core::fmt::Debug + Into<Error>;
    /// Write data to the connection
    fn write(&mut self, buf: &[u8]) -> Result<usize, Self::Error>;
    /// Flush the write buffer
    fn flush(&mut self) -> Result<(), Self::Error>;
}

pub trait Close {
    /// Associated error type
    type Error: core::fmt::Debug + Into<Error>;
    /// Close the connection, releasing the underlying handle
    fn close(self) -> Result<(), Self::Error>;
}

/// A synchronous, reliable byte-stream connection
pub trait Connection: Read + Write + Close {}

/// A synchronous connector (client side)
pub trait Connect {
    /// Associated connection type
    type Connection: Connection;
    /// Associated error type
    type Error: core::fmt::Debug + Into<Error>;
    /// Open a connection to `host:port`
    fn connect(&mut self, host: &str, port: u16) -> Result<Self::Connection, Self::Error>;
}
