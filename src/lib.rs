//! # mqttlite - minimal MQTT 3.1.1 client
//!
//! A small, allocation-free MQTT 3.1.1 client for embedded devices. The crate
//! hand-builds the binary control packets (CONNECT, PUBLISH, SUBSCRIBE,
//! UNSUBSCRIBE, DISCONNECT) and decodes the broker's acknowledgements
//! (CONNACK, SUBACK, UNSUBACK) and inbound PUBLISH frames, over any reliable
//! byte-stream transport the application provides. It is designed for
//! `no_std` environments and works on anything from ARM Cortex-M parts to
//! Linux-class devices.
//!
//! ## Scope
//!
//! - QoS 0 ("at most once") delivery only
//! - Clean sessions only; no will message, no authentication payloads
//! - No keep-alive PINGREQ/PINGRESP exchange; bounded waits are the
//!   transport's responsibility (give it a read timeout)
//!
//! ## Architecture
//!
//! Two pieces compose linearly:
//!
//! - [`codec`] - pure, side-effect-free translation between packet values and
//!   exact byte sequences. Usable on its own.
//! - [`session`] - the stateful sequence over a transport: connect handshake,
//!   publish, subscribe/unsubscribe with acknowledgement validation, inbound
//!   message reception, disconnect.
//!
//! The transport itself is a collaborator: implement the small trait set in
//! [`network`] (open, read, write, close) for your socket type and hand it to
//! the session.
//!
//! ## Example
//!
//! ```rust,no_run
//! use mqttlite::codec::QoS;
//! use mqttlite::session::{Options, Session};
//! # use mqttlite::network::error::Error;
//! # use mqttlite::network::{Close, Connect, Connection, Read, Write};
//! # struct Socket;
//! # impl Read for Socket {
//! #     type Error = Error;
//! #     fn read(&mut self, _buf: &mut [u8]) -> Result<usize, Self::Error> { Ok(0) }
//! # }
//! # impl Write for Socket {
//! #     type Error = Error;
//! #     fn write(&mut self, buf: &[u8]) -> Result<usize, Self::Error> { Ok(buf.len()) }
//! #     fn flush(&mut self) -> Result<(), Self::Error> { Ok(()) }
//! # }
//! # impl Close for Socket {
//! #     type Error = Error;
//! #     fn close(self) -> Result<(), Self::Error> { Ok(()) }
//! # }
//! # impl Connection for Socket {}
//! # struct Network;
//! # impl Connect for Network {
//! #     type Connection = Socket;
//! #     type Error = Error;
//! #     fn connect(&mut self, _host: &str, _port: u16) -> Result<Socket, Error> { Ok(Socket) }
//! # }
//!
//! # fn run() -> Result<(), Error> {
//! let mut network = Network;
//! let options = Options {
//!     client_id: "sensor-01",
//!     keep_alive_seconds: 60,
//!     clean_session: true,
//! };
//!
//! let mut session: Session<Socket> =
//!     Session::connect(&mut network, "broker.local", 1883, options)?;
//! session.publish("sensors/temperature", b"23.5")?;
//! session.subscribe("commands/sensor-01", QoS::AtMostOnce)?;
//! let message = session.receive()?;
//! session.disconnect();
//! # let _ = message;
//! # Ok(())
//! # }
//! ```
//!
//! ## Optional features
//!
//! - `std`: link the standard library (host-side tools and tests)
//! - `defmt`: structured logging of session lifecycle events for embedded
//!   debugging

#![cfg_attr(not(feature = "std"), no_std)]
#![deny(missing_docs)]
#![warn(missing_debug_implementations)]

/// Byte-stream transport abstraction the session runs over.
///
/// The crate never opens sockets itself; applications implement these traits
/// for their platform's TCP (or TLS) stack and pass the result in.
pub mod network;

/// Pure encode/decode of the MQTT 3.1.1 control packet subset.
pub mod codec;

/// Stateful protocol sequencing: one session per transport connection.
pub mod session;
