//! Common error types for network and protocol operations

use crate::codec::ConnectReturnCode;

/// The crate-wide error type.
///
/// One flat enum covers the transport boundary, the packet codec and the
/// session state machine, so every fallible operation in the crate reports a
/// distinguishable cause. It is `Copy` and payload-light by design, to stay
/// portable for `no_std` environments.
///
/// Decode-time errors draw one distinction that callers must respect:
/// [`Error::IncompleteFrame`] means "fewer bytes than the packet declares -
/// read more and retry", while [`Error::MalformedHeader`] and
/// [`Error::MalformedPacket`] mean the byte stream can no longer be trusted
/// and the connection has to go.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum Error {
    /// An operation was attempted on a session that is not connected.
    NotConnected,
    /// The operation is not valid in the session's current state.
    InvalidState,
    /// The transport could not be opened.
    ConnectionFailed,
    /// An error occurred during a write operation.
    WriteError,
    /// An error occurred during a read operation.
    ReadError,
    /// A timeout occurred; the exchange may be retried.
    Timeout,
    /// The peer closed the connection.
    ConnectionClosed,
    /// An operation was attempted on a transport that is not open.
    NotOpen,
    /// An invalid address was provided.
    InvalidAddress,
    /// The broker refused the CONNECT request with the given return code.
    ConnectRefused(ConnectReturnCode),
    /// The fixed header carries an unknown packet type, invalid flags for the
    /// type, or an over-long/non-minimal Remaining Length encoding.
    MalformedHeader,
    /// The variable header or payload is structurally invalid.
    MalformedPacket,
    /// Fewer bytes were supplied than the declared Remaining Length.
    IncompleteFrame,
    /// An acknowledgement echoed a different packet identifier than the
    /// request carried.
    PacketIdMismatch,
    /// The broker reported the subscription request as failed (0x80).
    SubscriptionRefused,
    /// A structurally valid packet arrived that is not expected at this point
    /// of the exchange (e.g. a PINGRESP while waiting for a PUBLISH).
    UnexpectedPacketType,
    /// A field exceeds what the wire format can carry (two-byte length
    /// prefix, or the four-byte Remaining Length ceiling).
    PacketTooLarge,
    /// Data does not fit the local fixed-capacity buffer.
    BufferOverflow,
    /// A topic or string field is not valid UTF-8.
    InvalidUtf8,
}

impl Error {
    /// Whether the session can keep using its transport after this error.
    ///
    /// Transport failures and structural decode violations desynchronize the
    /// byte stream; the session tears the connection down on them. Protocol
    /// soft failures (identifier mismatch, refused subscription, unexpected
    /// packet type) and timeouts leave the connection usable.
    pub fn is_fatal(self) -> bool {
        matches!(
            self,
            Error::ConnectionFailed
                | Error::WriteError
                | Error::ReadError
                | Error::ConnectionClosed
                | Error::NotOpen
                | Error::MalformedHeader
                | Error::MalformedPacket
                | Error::BufferOverflow
                | Error::InvalidUtf8
        )
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for Error {
    fn format(&self, f: defmt::Formatter) {
        match self {
            Error::NotConnected => defmt::write!(f, "NotConnected"),
            Error::InvalidState => defmt::write!(f, "InvalidState"),
            Error::ConnectionFailed => defmt::write!(f, "ConnectionFailed"),
            Error::WriteError => defmt::write!(f, "WriteError"),
            Error::ReadError => defmt::write!(f, "ReadError"),
            Error::Timeout => defmt::write!(f, "Timeout"),
            Error::ConnectionClosed => defmt::write!(f, "ConnectionClosed"),
            Error::NotOpen => defmt::write!(f, "NotOpen"),
            Error::InvalidAddress => defmt::write!(f, "InvalidAddress"),
            Error::ConnectRefused(code) => defmt::write!(f, "ConnectRefused({})", code),
            Error::MalformedHeader => defmt::write!(f, "MalformedHeader"),
            Error::MalformedPacket => defmt::write!(f, "MalformedPacket"),
            Error::IncompleteFrame => defmt::write!(f, "IncompleteFrame"),
            Error::PacketIdMismatch => defmt::write!(f, "PacketIdMismatch"),
            Error::SubscriptionRefused => defmt::write!(f, "SubscriptionRefused"),
            Error::UnexpectedPacketType => defmt::write!(f, "UnexpectedPacketType"),
            Error::PacketTooLarge => defmt::write!(f, "PacketTooLarge"),
            Error::BufferOverflow => defmt::write!(f, "BufferOverflow"),
            Error::InvalidUtf8 => defmt::write!(f, "InvalidUtf8"),
        }
    }
}
