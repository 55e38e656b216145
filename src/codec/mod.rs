//! Pure encode/decode of MQTT 3.1.1 control packets.
//!
//! Everything here is side-effect-free: encoders append exact byte sequences
//! to a caller-supplied buffer, decoders borrow from a slice holding one
//! packet starting at its fixed header. The session layer composes these over
//! a transport; nothing in this module performs I/O.

pub mod decode;
pub mod encode;

#[cfg(test)]
mod tests;

use crate::network::error::Error;

pub(crate) const PROTOCOL_NAME: &[u8] = b"MQTT";
pub(crate) const PROTOCOL_LEVEL: u8 = 4; // MQTT 3.1.1
pub(crate) const CLEAN_SESSION_FLAG: u8 = 0x02;

/// Largest value the four-byte Remaining Length encoding can carry.
pub const MAX_REMAINING_LENGTH: usize = 268_435_455;

/// Ceiling of every length-prefixed field (two-byte big-endian prefix).
pub(crate) const MAX_FIELD_LEN: usize = u16::MAX as usize;

/// MQTT control packet types.
///
/// All fourteen 3.1.1 type codes are recognized so that a structurally valid
/// but contextually unexpected frame (a PINGRESP, say) can be reported as
/// [`Error::UnexpectedPacketType`] instead of being conflated with garbage.
/// The client itself only ever builds Connect, Publish, Subscribe,
/// Unsubscribe and Disconnect, and consumes Connack, Suback, Unsuback and
/// inbound Publish.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PacketType {
    /// Client request to connect to a broker.
    Connect = 1,
    /// Broker acknowledgement of a CONNECT.
    Connack = 2,
    /// Application message, either direction.
    Publish = 3,
    /// QoS 1 publish acknowledgement.
    Puback = 4,
    /// QoS 2 publish received (part 1).
    Pubrec = 5,
    /// QoS 2 publish released (part 2).
    Pubrel = 6,
    /// QoS 2 publish complete (part 3).
    Pubcomp = 7,
    /// Client subscription request.
    Subscribe = 8,
    /// Broker acknowledgement of a SUBSCRIBE.
    Suback = 9,
    /// Client unsubscribe request.
    Unsubscribe = 10,
    /// Broker acknowledgement of an UNSUBSCRIBE.
    Unsuback = 11,
    /// Keep-alive ping request.
    Pingreq = 12,
    /// Keep-alive ping response.
    Pingresp = 13,
    /// Client is disconnecting cleanly.
    Disconnect = 14,
}

impl PacketType {
    /// Whether `flags` is a legal fixed-header flags nibble for this type.
    ///
    /// SUBSCRIBE, UNSUBSCRIBE and PUBREL require `0b0010`; PUBLISH carries
    /// DUP/QoS/RETAIN and accepts anything; every other type requires zero.
    pub(crate) fn validate_flags(self, flags: u8) -> bool {
        match self {
            Self::Publish => true,
            Self::Pubrel | Self::Subscribe | Self::Unsubscribe => flags == 0b0010,
            _ => flags == 0,
        }
    }
}

impl TryFrom<u8> for PacketType {
    type Error = Error;

    fn try_from(value: u8) -> Result<Self, Error> {
        let packet_type = match value {
            1 => Self::Connect,
            2 => Self::Connack,
            3 => Self::Publish,
            4 => Self::Puback,
            5 => Self::Pubrec,
            6 => Self::Pubrel,
            7 => Self::Pubcomp,
            8 => Self::Subscribe,
            9 => Self::Suback,
            10 => Self::Unsubscribe,
            11 => Self::Unsuback,
            12 => Self::Pingreq,
            13 => Self::Pingresp,
            14 => Self::Disconnect,
            _ => return Err(Error::MalformedHeader),
        };
        Ok(packet_type)
    }
}

/// The decoded first 1-5 bytes of a control packet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct FixedHeader {
    /// Control packet type from the high nibble of the first byte.
    pub packet_type: PacketType,
    /// Type-specific flags from the low nibble of the first byte.
    pub flags: u8,
    /// Byte count of everything after the fixed header.
    pub remaining_length: usize,
    /// Size of the fixed header itself: 1 + the Remaining Length byte count.
    pub header_len: usize,
}

/// Quality of Service levels for MQTT messages.
///
/// Only [`QoS::AtMostOnce`] is exercised by the session; the codec still
/// carries the requested and granted levels so SUBSCRIBE framing stays
/// general.
#[repr(u8)]
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum QoS {
    /// At most once delivery ("fire and forget").
    AtMostOnce = 0,
    /// At least once delivery; duplicates can occur.
    AtLeastOnce = 1,
    /// Exactly once delivery.
    ExactlyOnce = 2,
}

impl TryFrom<u8> for QoS {
    type Error = Error;

    fn try_from(value: u8) -> Result<Self, Error> {
        match value {
            0 => Ok(Self::AtMostOnce),
            1 => Ok(Self::AtLeastOnce),
            2 => Ok(Self::ExactlyOnce),
            _ => Err(Error::MalformedPacket),
        }
    }
}

/// Broker verdict carried in the CONNACK variable header.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConnectReturnCode {
    /// Connection accepted.
    Accepted,
    /// The broker does not support this protocol level.
    UnacceptableProtocol,
    /// The client identifier is well-formed but not allowed.
    IdentifierRejected,
    /// The service is unavailable.
    ServerUnavailable,
    /// Bad user name or password.
    BadCredentials,
    /// The client is not authorized to connect.
    NotAuthorized,
    /// A return code outside the values 3.1.1 defines.
    Unknown(u8),
}

impl ConnectReturnCode {
    /// True for [`ConnectReturnCode::Accepted`].
    pub fn is_accepted(self) -> bool {
        self == Self::Accepted
    }
}

impl From<u8> for ConnectReturnCode {
    fn from(code: u8) -> Self {
        match code {
            0 => Self::Accepted,
            1 => Self::UnacceptableProtocol,
            2 => Self::IdentifierRejected,
            3 => Self::ServerUnavailable,
            4 => Self::BadCredentials,
            5 => Self::NotAuthorized,
            other => Self::Unknown(other),
        }
    }
}

/// One entry of a SUBSCRIBE payload: a topic filter and a requested QoS.
#[derive(Debug, Clone, Copy)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Subscription<'a> {
    /// Topic filter to subscribe to (wildcards permitted by the broker).
    pub topic_filter: &'a str,
    /// Maximum QoS the client wants for matching messages.
    pub qos: QoS,
}
