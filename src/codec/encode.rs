//! Encoders for the outbound packet subset.
//!
//! Each encoder appends one complete control packet (fixed header included)
//! to a caller-supplied [`heapless::Vec`]. Every insertion is bounds-checked:
//! capacity exhaustion surfaces as [`Error::BufferOverflow`] and wire-format
//! ceilings as [`Error::PacketTooLarge`]; nothing is ever truncated. On
//! error, the buffer contents are unspecified and should be discarded.

use heapless::Vec;

use super::{
    CLEAN_SESSION_FLAG, MAX_FIELD_LEN, MAX_REMAINING_LENGTH, PROTOCOL_LEVEL, PROTOCOL_NAME,
    PacketType, Subscription,
};
use crate::network::error::Error;

/// Build a CONNECT packet: protocol name "MQTT", level 4, connect flags,
/// keep-alive, then the length-prefixed client identifier.
///
/// No will, user name or password is offered; `clean_session` maps to the
/// clean-session connect flag bit.
pub fn connect<const N: usize>(
    buf: &mut Vec<u8, N>,
    client_id: &str,
    keep_alive_seconds: u16,
    clean_session: bool,
) -> Result<(), Error> {
    let id = client_id.as_bytes();
    if id.len() > MAX_FIELD_LEN {
        return Err(Error::PacketTooLarge);
    }

    // Variable header (10 bytes) + length-prefixed client id
    let remaining = 10 + 2 + id.len();

    push(buf, (PacketType::Connect as u8) << 4)?;
    remaining_length(buf, remaining)?;

    extend(buf, &(PROTOCOL_NAME.len() as u16).to_be_bytes())?;
    extend(buf, PROTOCOL_NAME)?;
    push(buf, PROTOCOL_LEVEL)?;

    let mut connect_flags = 0;
    if clean_session {
        connect_flags |= CLEAN_SESSION_FLAG;
    }
    push(buf, connect_flags)?;
    extend(buf, &keep_alive_seconds.to_be_bytes())?;

    utf8_string(buf, client_id)
}

/// Build a QoS 0 PUBLISH packet (DUP 0, RETAIN 0, header byte `0x30`).
///
/// The variable header is the length-prefixed topic alone - QoS 0 carries no
/// packet identifier - and the payload follows raw, its length implied by the
/// Remaining Length.
pub fn publish<const N: usize>(
    buf: &mut Vec<u8, N>,
    topic: &str,
    payload: &[u8],
) -> Result<(), Error> {
    check_topic(topic)?;

    let remaining = 2 + topic.len() + payload.len();
    if remaining > MAX_REMAINING_LENGTH {
        return Err(Error::PacketTooLarge);
    }

    push(buf, (PacketType::Publish as u8) << 4)?;
    remaining_length(buf, remaining)?;
    utf8_string(buf, topic)?;
    extend(buf, payload)
}

/// Build a SUBSCRIBE packet: packet identifier, then one length-prefixed
/// topic filter plus requested-QoS byte per entry.
///
/// The session sends a single entry at a time, but the payload loop accepts
/// any number. `packet_id` must be non-zero and `subscriptions` non-empty.
pub fn subscribe<const N: usize>(
    buf: &mut Vec<u8, N>,
    packet_id: u16,
    subscriptions: &[Subscription<'_>],
) -> Result<(), Error> {
    if packet_id == 0 || subscriptions.is_empty() {
        return Err(Error::MalformedPacket);
    }

    let mut remaining = 2usize;
    for subscription in subscriptions {
        check_topic(subscription.topic_filter)?;
        remaining += 2 + subscription.topic_filter.len() + 1;
    }

    push(buf, ((PacketType::Subscribe as u8) << 4) | 0b0010)?;
    remaining_length(buf, remaining)?;
    extend(buf, &packet_id.to_be_bytes())?;
    for subscription in subscriptions {
        utf8_string(buf, subscription.topic_filter)?;
        push(buf, subscription.qos as u8)?;
    }
    Ok(())
}

/// Build an UNSUBSCRIBE packet. Same framing as SUBSCRIBE, minus the QoS
/// byte per entry.
pub fn unsubscribe<const N: usize>(
    buf: &mut Vec<u8, N>,
    packet_id: u16,
    topic_filters: &[&str],
) -> Result<(), Error> {
    if packet_id == 0 || topic_filters.is_empty() {
        return Err(Error::MalformedPacket);
    }

    let mut remaining = 2usize;
    for topic in topic_filters {
        check_topic(topic)?;
        remaining += 2 + topic.len();
    }

    push(buf, ((PacketType::Unsubscribe as u8) << 4) | 0b0010)?;
    remaining_length(buf, remaining)?;
    extend(buf, &packet_id.to_be_bytes())?;
    for topic in topic_filters {
        utf8_string(buf, topic)?;
    }
    Ok(())
}

/// Build a DISCONNECT packet: exactly `[0xE0, 0x00]`.
pub fn disconnect<const N: usize>(buf: &mut Vec<u8, N>) -> Result<(), Error> {
    push(buf, (PacketType::Disconnect as u8) << 4)?;
    push(buf, 0x00)
}

/// Append the Remaining Length varint: 7 bits of value per byte, high bit as
/// continuation marker, minimal encoding.
pub(crate) fn remaining_length<const N: usize>(
    buf: &mut Vec<u8, N>,
    mut len: usize,
) -> Result<(), Error> {
    if len > MAX_REMAINING_LENGTH {
        return Err(Error::PacketTooLarge);
    }
    loop {
        let mut byte = (len % 128) as u8;
        len /= 128;
        if len > 0 {
            byte |= 0x80;
        }
        push(buf, byte)?;
        if len == 0 {
            return Ok(());
        }
    }
}

fn check_topic(topic: &str) -> Result<(), Error> {
    if topic.is_empty() {
        return Err(Error::MalformedPacket);
    }
    if topic.len() > MAX_FIELD_LEN {
        return Err(Error::PacketTooLarge);
    }
    Ok(())
}

fn utf8_string<const N: usize>(buf: &mut Vec<u8, N>, value: &str) -> Result<(), Error> {
    let bytes = value.as_bytes();
    if bytes.len() > MAX_FIELD_LEN {
        return Err(Error::PacketTooLarge);
    }
    extend(buf, &(bytes.len() as u16).to_be_bytes())?;
    extend(buf, bytes)
}

fn push<const N: usize>(buf: &mut Vec<u8, N>, byte: u8) -> Result<(), Error> {
    buf.push(byte).map_err(|_| Error::BufferOverflow)
}

fn extend<const N: usize>(buf: &mut Vec<u8, N>, bytes: &[u8]) -> Result<(), Error> {
    buf.extend_from_slice(bytes).map_err(|_| Error::BufferOverflow)
}
