use heapless::Vec;

use super::{ConnectReturnCode, PacketType, QoS, Subscription, decode, encode};
use crate::network::error::Error;

fn encoded_remaining_length(value: usize) -> Vec<u8, 8> {
    let mut buf: Vec<u8, 8> = Vec::new();
    encode::remaining_length(&mut buf, value).unwrap();
    buf
}

#[test]
fn remaining_length_boundary_vectors() {
    assert_eq!(encoded_remaining_length(0)[..], [0x00]);
    assert_eq!(encoded_remaining_length(127)[..], [0x7F]);
    assert_eq!(encoded_remaining_length(128)[..], [0x80, 0x01]);
    assert_eq!(encoded_remaining_length(16_383)[..], [0xFF, 0x7F]);
    assert_eq!(encoded_remaining_length(16_384)[..], [0x80, 0x80, 0x01]);
    assert_eq!(encoded_remaining_length(2_097_151)[..], [0xFF, 0xFF, 0x7F]);
    assert_eq!(
        encoded_remaining_length(268_435_455)[..],
        [0xFF, 0xFF, 0xFF, 0x7F]
    );
}

#[test]
fn remaining_length_rejects_values_over_the_ceiling() {
    let mut buf: Vec<u8, 8> = Vec::new();
    assert_eq!(
        encode::remaining_length(&mut buf, 268_435_456),
        Err(Error::PacketTooLarge)
    );
}

#[test]
fn remaining_length_round_trips_through_the_fixed_header() {
    for value in [0usize, 1, 127, 128, 16_383, 16_384, 2_097_151, 268_435_455] {
        let mut packet: Vec<u8, 8> = Vec::new();
        packet.push(0xE0).unwrap();
        encode::remaining_length(&mut packet, value).unwrap();
        let header = decode::fixed_header(&packet).unwrap();
        assert_eq!(header.remaining_length, value);
        assert_eq!(header.header_len, packet.len());
    }
}

#[test]
fn connect_packet_exact_bytes() {
    let mut buf: Vec<u8, 32> = Vec::new();
    encode::connect(&mut buf, "PQRST", 60, true).unwrap();
    assert_eq!(
        buf[..],
        [
            0x10, // CONNECT, flags 0
            0x11, // remaining length 17
            0x00, 0x04, b'M', b'Q', b'T', b'T', // protocol name
            0x04, // protocol level 3.1.1
            0x02, // connect flags: clean session
            0x00, 0x3C, // keep alive 60s
            0x00, 0x05, b'P', b'Q', b'R', b'S', b'T', // client id
        ]
    );
    assert_eq!(buf.len(), 21);
}

#[test]
fn connect_rejects_oversized_client_id() {
    static BIG: [u8; 65_536] = [b'a'; 65_536];
    let client_id = core::str::from_utf8(&BIG).unwrap();
    let mut buf: Vec<u8, 16> = Vec::new();
    assert_eq!(
        encode::connect(&mut buf, client_id, 60, true),
        Err(Error::PacketTooLarge)
    );
}

#[test]
fn publish_packet_exact_bytes() {
    let mut buf: Vec<u8, 32> = Vec::new();
    encode::publish(&mut buf, "TEMP", b"23.5").unwrap();
    assert_eq!(
        buf[..],
        [0x30, 0x0A, 0x00, 0x04, b'T', b'E', b'M', b'P', b'2', b'3', b'.', b'5']
    );
}

#[test]
fn publish_round_trips() {
    let payload = [0xABu8; 200];
    let mut buf: Vec<u8, 256> = Vec::new();
    encode::publish(&mut buf, "sensors/temperature", &payload).unwrap();

    // 200 + topic pushes the remaining length into its two-byte form.
    let header = decode::fixed_header(&buf).unwrap();
    assert_eq!(header.header_len, 3);

    let publish = decode::publish(&buf).unwrap();
    assert_eq!(publish.topic, "sensors/temperature");
    assert_eq!(publish.payload, payload);
}

#[test]
fn publish_with_empty_payload_round_trips() {
    let mut buf: Vec<u8, 32> = Vec::new();
    encode::publish(&mut buf, "heartbeat", b"").unwrap();
    let publish = decode::publish(&buf).unwrap();
    assert_eq!(publish.topic, "heartbeat");
    assert!(publish.payload.is_empty());
}

#[test]
fn publish_rejects_empty_topic() {
    let mut buf: Vec<u8, 32> = Vec::new();
    assert_eq!(
        encode::publish(&mut buf, "", b"data"),
        Err(Error::MalformedPacket)
    );
}

#[test]
fn publish_rejects_buffers_too_small_for_the_packet() {
    let mut buf: Vec<u8, 8> = Vec::new();
    assert_eq!(
        encode::publish(&mut buf, "TEMP", b"23.5"),
        Err(Error::BufferOverflow)
    );
}

#[test]
fn inbound_qos1_publish_still_decodes() {
    // Flags 0b0010 (QoS 1) put a packet identifier between topic and payload.
    let frame = [
        0x32, 0x0A, 0x00, 0x04, b'T', b'E', b'M', b'P', 0x12, 0x34, b'h', b'i',
    ];
    let publish = decode::publish(&frame).unwrap();
    assert_eq!(publish.topic, "TEMP");
    assert_eq!(publish.payload, b"hi");
}

#[test]
fn subscribe_packet_exact_bytes() {
    let mut buf: Vec<u8, 32> = Vec::new();
    encode::subscribe(
        &mut buf,
        1,
        &[Subscription {
            topic_filter: "ESPTEST",
            qos: QoS::AtMostOnce,
        }],
    )
    .unwrap();
    assert_eq!(
        buf[..],
        [
            0x82, 0x0C, // SUBSCRIBE, remaining length 12
            0x00, 0x01, // packet identifier
            0x00, 0x07, b'E', b'S', b'P', b'T', b'E', b'S', b'T', // topic filter
            0x00, // requested QoS
        ]
    );
}

#[test]
fn subscribe_supports_multiple_entries() {
    let mut buf: Vec<u8, 64> = Vec::new();
    encode::subscribe(
        &mut buf,
        7,
        &[
            Subscription {
                topic_filter: "a/b",
                qos: QoS::AtMostOnce,
            },
            Subscription {
                topic_filter: "c/d",
                qos: QoS::AtLeastOnce,
            },
        ],
    )
    .unwrap();
    // packet id + two (2-byte prefix + 3-byte filter + qos) entries
    assert_eq!(buf[1], 2 + 6 + 6);
    assert_eq!(buf[buf.len() - 1], 1);
}

#[test]
fn subscribe_rejects_packet_id_zero() {
    let mut buf: Vec<u8, 32> = Vec::new();
    let entry = [Subscription {
        topic_filter: "t",
        qos: QoS::AtMostOnce,
    }];
    assert_eq!(
        encode::subscribe(&mut buf, 0, &entry),
        Err(Error::MalformedPacket)
    );
}

#[test]
fn unsubscribe_packet_exact_bytes() {
    let mut buf: Vec<u8, 32> = Vec::new();
    encode::unsubscribe(&mut buf, 2, &["ESPTEST"]).unwrap();
    assert_eq!(
        buf[..],
        [
            0xA2, 0x0B, // UNSUBSCRIBE, remaining length 11
            0x00, 0x02, // packet identifier
            0x00, 0x07, b'E', b'S', b'P', b'T', b'E', b'S', b'T', // topic filter
        ]
    );
}

#[test]
fn disconnect_packet_exact_bytes() {
    let mut buf: Vec<u8, 4> = Vec::new();
    encode::disconnect(&mut buf).unwrap();
    assert_eq!(buf[..], [0xE0, 0x00]);
}

#[test]
fn fixed_header_rejects_unknown_type_nibble() {
    assert_eq!(
        decode::fixed_header(&[0x00, 0x00]),
        Err(Error::MalformedHeader)
    );
    assert_eq!(
        decode::fixed_header(&[0xF0, 0x00]),
        Err(Error::MalformedHeader)
    );
}

#[test]
fn fixed_header_rejects_bad_flags_for_type() {
    // CONNACK with a non-zero flags nibble
    assert_eq!(
        decode::fixed_header(&[0x21, 0x02]),
        Err(Error::MalformedHeader)
    );
    // SUBSCRIBE without the mandatory 0b0010
    assert_eq!(
        decode::fixed_header(&[0x80, 0x00]),
        Err(Error::MalformedHeader)
    );
}

#[test]
fn fixed_header_rejects_overlong_varint() {
    assert_eq!(
        decode::fixed_header(&[0x30, 0x80, 0x80, 0x80, 0x80, 0x01]),
        Err(Error::MalformedHeader)
    );
}

#[test]
fn fixed_header_rejects_non_minimal_varint() {
    // 0 encoded in two bytes
    assert_eq!(
        decode::fixed_header(&[0x30, 0x80, 0x00]),
        Err(Error::MalformedHeader)
    );
}

#[test]
fn truncated_input_is_incomplete_not_malformed() {
    // Nothing at all
    assert_eq!(decode::fixed_header(&[]), Err(Error::IncompleteFrame));
    // Header byte without a remaining length
    assert_eq!(decode::fixed_header(&[0x30]), Err(Error::IncompleteFrame));
    // Varint with its continuation bit cut off
    assert_eq!(
        decode::fixed_header(&[0x30, 0x80]),
        Err(Error::IncompleteFrame)
    );
    // Declared body longer than the supplied bytes
    assert_eq!(
        decode::publish(&[0x30, 0x0A, 0x00, 0x04, b'T']),
        Err(Error::IncompleteFrame)
    );
}

#[test]
fn connack_return_codes() {
    assert_eq!(
        decode::connack(&[0x20, 0x02, 0x00, 0x00]),
        Ok(ConnectReturnCode::Accepted)
    );
    assert_eq!(
        decode::connack(&[0x20, 0x02, 0x00, 0x05]),
        Ok(ConnectReturnCode::NotAuthorized)
    );
    assert_eq!(
        decode::connack(&[0x20, 0x02, 0x01, 0x03]),
        Ok(ConnectReturnCode::ServerUnavailable)
    );
    assert_eq!(
        decode::connack(&[0x20, 0x02, 0x00, 0x09]),
        Ok(ConnectReturnCode::Unknown(9))
    );
}

#[test]
fn connack_rejects_bad_shapes() {
    // Wrong remaining length
    assert_eq!(
        decode::connack(&[0x20, 0x03, 0x00, 0x00, 0x00]),
        Err(Error::MalformedPacket)
    );
    // Reserved acknowledge-flags bits set
    assert_eq!(
        decode::connack(&[0x20, 0x02, 0x04, 0x00]),
        Err(Error::MalformedPacket)
    );
    // Not a CONNACK at all
    assert_eq!(
        decode::connack(&[0xD0, 0x00]),
        Err(Error::UnexpectedPacketType)
    );
}

#[test]
fn suback_reports_granted_qos() {
    assert_eq!(
        decode::suback(&[0x90, 0x03, 0x00, 0x2A, 0x00], 42),
        Ok(QoS::AtMostOnce)
    );
    assert_eq!(
        decode::suback(&[0x90, 0x03, 0x00, 0x2A, 0x01], 42),
        Ok(QoS::AtLeastOnce)
    );
}

#[test]
fn suback_packet_id_must_match() {
    assert_eq!(
        decode::suback(&[0x90, 0x03, 0x00, 0x02, 0x00], 1),
        Err(Error::PacketIdMismatch)
    );
}

#[test]
fn suback_failure_code_is_refusal_not_success() {
    assert_eq!(
        decode::suback(&[0x90, 0x03, 0x00, 0x01, 0x80], 1),
        Err(Error::SubscriptionRefused)
    );
}

#[test]
fn suback_rejects_reserved_granted_values() {
    assert_eq!(
        decode::suback(&[0x90, 0x03, 0x00, 0x01, 0x03], 1),
        Err(Error::MalformedPacket)
    );
}

#[test]
fn unsuback_verifies_the_packet_id() {
    assert_eq!(decode::unsuback(&[0xB0, 0x02, 0x00, 0x07], 7), Ok(()));
    assert_eq!(
        decode::unsuback(&[0xB0, 0x02, 0x00, 0x08], 7),
        Err(Error::PacketIdMismatch)
    );
}

#[test]
fn publish_decode_rejects_wrong_type() {
    assert_eq!(
        decode::publish(&[0x90, 0x03, 0x00, 0x01, 0x00]),
        Err(Error::UnexpectedPacketType)
    );
}

#[test]
fn publish_decode_rejects_topic_overrunning_the_body() {
    // Topic length prefix claims 100 bytes; the body has 4.
    assert_eq!(
        decode::publish(&[0x30, 0x06, 0x00, 0x64, b'T', b'E', b'M', b'P']),
        Err(Error::MalformedPacket)
    );
}

#[test]
fn publish_decode_rejects_invalid_utf8_topic() {
    assert_eq!(
        decode::publish(&[0x30, 0x04, 0x00, 0x02, 0xFF, 0xFE]),
        Err(Error::InvalidUtf8)
    );
}

#[test]
fn packet_type_round_trips_through_its_code() {
    for code in 1u8..=14 {
        let packet_type = PacketType::try_from(code).unwrap();
        assert_eq!(packet_type as u8, code);
    }
    assert!(PacketType::try_from(0).is_err());
    assert!(PacketType::try_from(15).is_err());
}
