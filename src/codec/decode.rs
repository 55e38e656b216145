//! Decoders for broker responses and inbound frames.
//!
//! Each decoder takes a slice holding one packet starting at the fixed
//! header. Inputs shorter than the declared Remaining Length fail with
//! [`Error::IncompleteFrame`] so a caller can read more and retry; structural
//! violations fail with [`Error::MalformedHeader`] or
//! [`Error::MalformedPacket`], after which the byte stream is not to be
//! trusted.

use super::{ConnectReturnCode, FixedHeader, PacketType, QoS};
use crate::network::error::Error;

/// An inbound PUBLISH frame, borrowed from the decode buffer.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub struct Publish<'a> {
    /// The topic the message was published on.
    pub topic: &'a str,
    /// The raw application payload: everything after the topic field.
    pub payload: &'a [u8],
}

/// Decode the fixed header: packet type, flags nibble and Remaining Length.
///
/// Rejects unknown type codes, flags illegal for the type, varints longer
/// than four bytes and non-minimal varint encodings. An input that ends
/// mid-header is [`Error::IncompleteFrame`].
pub fn fixed_header(bytes: &[u8]) -> Result<FixedHeader, Error> {
    let first = *bytes.first().ok_or(Error::IncompleteFrame)?;
    let packet_type = PacketType::try_from(first >> 4)?;
    let flags = first & 0x0F;
    if !packet_type.validate_flags(flags) {
        return Err(Error::MalformedHeader);
    }

    let mut remaining_length: usize = 0;
    let mut multiplier: usize = 1;
    for count in 0..4 {
        let byte = *bytes.get(1 + count).ok_or(Error::IncompleteFrame)?;
        remaining_length += (byte as usize & 0x7F) * multiplier;
        multiplier *= 128;
        if byte & 0x80 == 0 {
            // A trailing zero byte means the value fit in fewer bytes.
            if count > 0 && byte == 0 {
                return Err(Error::MalformedHeader);
            }
            return Ok(FixedHeader {
                packet_type,
                flags,
                remaining_length,
                header_len: 2 + count,
            });
        }
    }
    Err(Error::MalformedHeader)
}

/// Decode a CONNACK and report the broker's return code.
///
/// The decoder maps the code byte faithfully, [`ConnectReturnCode::Unknown`]
/// included; refusing a non-accepted code is the session's job.
pub fn connack(bytes: &[u8]) -> Result<ConnectReturnCode, Error> {
    let (header, body) = checked_body(bytes, PacketType::Connack)?;
    if header.remaining_length != 2 {
        return Err(Error::MalformedPacket);
    }
    // Byte 0 is the acknowledge-flags byte; only session-present may be set.
    if body[0] & !0x01 != 0 {
        return Err(Error::MalformedPacket);
    }
    Ok(ConnectReturnCode::from(body[1]))
}

/// Decode a SUBACK for a single-entry subscription and return the granted
/// QoS.
///
/// Fails with [`Error::PacketIdMismatch`] when the echoed identifier differs
/// from `expected_packet_id`, and with [`Error::SubscriptionRefused`] when
/// the broker reports the failure code `0x80`.
pub fn suback(bytes: &[u8], expected_packet_id: u16) -> Result<QoS, Error> {
    let (header, body) = checked_body(bytes, PacketType::Suback)?;
    if header.remaining_length < 3 {
        return Err(Error::MalformedPacket);
    }
    let packet_id = u16::from_be_bytes([body[0], body[1]]);
    if packet_id != expected_packet_id {
        return Err(Error::PacketIdMismatch);
    }
    match body[2] {
        0x80 => Err(Error::SubscriptionRefused),
        granted => QoS::try_from(granted),
    }
}

/// Decode an UNSUBACK, verifying the echoed packet identifier.
pub fn unsuback(bytes: &[u8], expected_packet_id: u16) -> Result<(), Error> {
    let (header, body) = checked_body(bytes, PacketType::Unsuback)?;
    if header.remaining_length != 2 {
        return Err(Error::MalformedPacket);
    }
    let packet_id = u16::from_be_bytes([body[0], body[1]]);
    if packet_id != expected_packet_id {
        return Err(Error::PacketIdMismatch);
    }
    Ok(())
}

/// Decode a broker-initiated PUBLISH frame into topic and payload.
///
/// The payload is everything after the topic field, with no length prefix of
/// its own. Should the flags carry QoS > 0 - legal on the wire even though
/// this client never requests it - the packet identifier is skipped so the
/// frame still decodes structurally.
pub fn publish(bytes: &[u8]) -> Result<Publish<'_>, Error> {
    let (header, body) = checked_body(bytes, PacketType::Publish)?;

    let qos = (header.flags >> 1) & 0x03;
    if qos == 3 {
        return Err(Error::MalformedHeader);
    }

    if body.len() < 2 {
        return Err(Error::MalformedPacket);
    }
    let topic_len = u16::from_be_bytes([body[0], body[1]]) as usize;
    let after_topic = 2 + topic_len;
    if body.len() < after_topic {
        return Err(Error::MalformedPacket);
    }
    let topic = core::str::from_utf8(&body[2..after_topic]).map_err(|_| Error::InvalidUtf8)?;
    if topic.is_empty() {
        return Err(Error::MalformedPacket);
    }

    let mut payload_start = after_topic;
    if qos > 0 {
        payload_start += 2;
        if body.len() < payload_start {
            return Err(Error::MalformedPacket);
        }
    }

    Ok(Publish {
        topic,
        payload: &body[payload_start..],
    })
}

/// Split one packet into its fixed header and complete body, verifying the
/// expected type.
fn checked_body(bytes: &[u8], expected: PacketType) -> Result<(FixedHeader, &[u8]), Error> {
    let header = fixed_header(bytes)?;
    let end = header.header_len + header.remaining_length;
    if bytes.len() < end {
        return Err(Error::IncompleteFrame);
    }
    if header.packet_type != expected {
        return Err(Error::UnexpectedPacketType);
    }
    Ok((header, &bytes[header.header_len..end]))
}
