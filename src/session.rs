//! Session lifecycle and protocol sequencing.
//!
//! A [`Session`] owns exactly one transport connection and walks the linear
//! state machine `Disconnected -> Connected -> Subscribed -> Disconnected`.
//! One request/response exchange is outstanding at a time: CONNECT waits for
//! CONNACK before anything else is permitted, SUBSCRIBE and UNSUBSCRIBE each
//! wait for their acknowledgement. Callers wanting a concurrent publish loop
//! and receive loop run two independent sessions; packet identifiers are not
//! multiplexed on one transport.
//!
//! Errors are never swallowed and nothing is retried internally. Transport
//! failures and structural decode violations tear the session down (the
//! connection handle is closed exactly once); soft protocol failures such as
//! [`Error::PacketIdMismatch`] leave the session usable.

use heapless::{String, Vec};

use crate::codec::{PacketType, QoS, Subscription, decode, encode};
use crate::network::error::Error;
use crate::network::{Connect, Connection};

/// Configuration options for the connect handshake.
#[derive(Debug, Clone)]
pub struct Options<'a> {
    /// The client identifier, unique within the broker.
    pub client_id: &'a str,
    /// Keep-alive interval in seconds, carried in the CONNECT variable
    /// header. This client never sends PINGREQ, so pick an interval large
    /// enough for the broker not to drop an idle connection, or 0 to
    /// disable the mechanism.
    pub keep_alive_seconds: u16,
    /// Whether the broker should discard previous session state.
    pub clean_session: bool,
}

/// An inbound application message delivered while subscribed.
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct Message<const N: usize = 1024> {
    /// The topic the message was published on.
    pub topic: String<256>,
    /// The message payload.
    pub payload: Vec<u8, N>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Disconnected,
    Connected,
    Subscribed,
}

/// An MQTT 3.1.1 client session over a byte-stream transport.
///
/// `BUF` bounds both outbound packets and inbound frames; a frame that does
/// not fit fails with [`Error::BufferOverflow`] instead of being truncated.
/// The default of 1024 bytes suits telemetry-sized messages.
pub struct Session<C: Connection, const BUF: usize = 1024> {
    connection: Option<C>,
    state: State,
    next_packet_id: u16,
}

impl<C: Connection, const BUF: usize> Session<C, BUF> {
    /// Open the transport and perform the MQTT connect handshake.
    ///
    /// Sends CONNECT and blocks for the CONNACK. On a non-accepted return
    /// code the transport is closed and the specific code is reported as
    /// [`Error::ConnectRefused`]; on transport failure the specific cause is
    /// propagated. Either way no half-connected session is left behind.
    pub fn connect<D>(
        dialer: &mut D,
        host: &str,
        port: u16,
        options: Options<'_>,
    ) -> Result<Self, Error>
    where
        D: Connect<Connection = C>,
    {
        let mut connection = dialer.connect(host, port).map_err(Into::into)?;

        let mut packet: Vec<u8, BUF> = Vec::new();
        if let Err(e) = encode::connect(
            &mut packet,
            options.client_id,
            options.keep_alive_seconds,
            options.clean_session,
        ) {
            let _ = connection.close();
            return Err(e);
        }

        let handshake = write_all(&mut connection, &packet).and_then(|()| {
            let mut frame: Vec<u8, BUF> = Vec::new();
            read_frame(&mut connection, &mut frame)?;
            decode::connack(&frame)
        });

        match handshake {
            Ok(code) if code.is_accepted() => {
                #[cfg(feature = "defmt")]
                defmt::debug!("session established with {=str}:{=u16}", host, port);
                Ok(Self {
                    connection: Some(connection),
                    state: State::Connected,
                    next_packet_id: 1,
                })
            }
            Ok(code) => {
                let _ = connection.close();
                Err(Error::ConnectRefused(code))
            }
            Err(e) => {
                let _ = connection.close();
                Err(e)
            }
        }
    }

    /// Publish `payload` to `topic` at QoS 0.
    ///
    /// Fire and forget: no acknowledgement exists at this QoS level, so a
    /// successful return means the packet was handed to the transport.
    pub fn publish(&mut self, topic: &str, payload: &[u8]) -> Result<(), Error> {
        if self.state == State::Disconnected {
            return Err(Error::NotConnected);
        }
        let mut packet: Vec<u8, BUF> = Vec::new();
        encode::publish(&mut packet, topic, payload)?;
        let result = write_all(self.connection_mut()?, &packet);
        result.map_err(|e| self.fail(e))
    }

    /// Subscribe to a topic filter and block for the SUBACK.
    ///
    /// Allocates the next packet identifier, verifies the broker echoes it
    /// back, and returns the granted QoS. A mismatched identifier or a
    /// refused subscription is reported without closing the connection.
    pub fn subscribe(&mut self, topic: &str, qos: QoS) -> Result<QoS, Error> {
        match self.state {
            State::Disconnected => return Err(Error::NotConnected),
            State::Subscribed => return Err(Error::InvalidState),
            State::Connected => {}
        }

        let packet_id = self.allocate_packet_id();
        let mut packet: Vec<u8, BUF> = Vec::new();
        encode::subscribe(
            &mut packet,
            packet_id,
            &[Subscription {
                topic_filter: topic,
                qos,
            }],
        )?;

        let mut frame: Vec<u8, BUF> = Vec::new();
        let result = self.exchange(&packet, &mut frame);
        result.map_err(|e| self.fail(e))?;

        let granted = decode::suback(&frame, packet_id).map_err(|e| self.fail(e))?;
        self.state = State::Subscribed;
        Ok(granted)
    }

    /// Unsubscribe from a topic filter and block for the UNSUBACK.
    ///
    /// Valid only while subscribed; on success the session returns to the
    /// connected state.
    pub fn unsubscribe(&mut self, topic: &str) -> Result<(), Error> {
        match self.state {
            State::Disconnected => return Err(Error::NotConnected),
            State::Connected => return Err(Error::InvalidState),
            State::Subscribed => {}
        }

        let packet_id = self.allocate_packet_id();
        let mut packet: Vec<u8, BUF> = Vec::new();
        encode::unsubscribe(&mut packet, packet_id, &[topic])?;

        let mut frame: Vec<u8, BUF> = Vec::new();
        let result = self.exchange(&packet, &mut frame);
        result.map_err(|e| self.fail(e))?;

        decode::unsuback(&frame, packet_id).map_err(|e| self.fail(e))?;
        self.state = State::Connected;
        Ok(())
    }

    /// Block for one inbound frame and decode it as a PUBLISH.
    ///
    /// Valid only while subscribed. A structurally valid frame of any other
    /// type (a PINGRESP, say) is surfaced as
    /// [`Error::UnexpectedPacketType`] and the connection stays usable. The
    /// call blocks until the transport produces a frame or fails; bounded
    /// waiting is the transport's capability - a read timeout surfaces as
    /// the non-fatal [`Error::Timeout`].
    pub fn receive(&mut self) -> Result<Message<BUF>, Error> {
        match self.state {
            State::Disconnected => return Err(Error::NotConnected),
            State::Connected => return Err(Error::InvalidState),
            State::Subscribed => {}
        }

        let mut frame: Vec<u8, BUF> = Vec::new();
        let result = read_frame(self.connection_mut()?, &mut frame);
        result.map_err(|e| self.fail(e))?;

        let header = decode::fixed_header(&frame).map_err(|e| self.fail(e))?;
        if header.packet_type != PacketType::Publish {
            return Err(Error::UnexpectedPacketType);
        }
        let publish = decode::publish(&frame).map_err(|e| self.fail(e))?;

        // Inbound fields larger than the message capacities are rejected,
        // never cut short. The stream stays in sync: the frame was consumed.
        let topic = String::try_from(publish.topic).map_err(|_| Error::BufferOverflow)?;
        let payload = Vec::from_slice(publish.payload).map_err(|_| Error::BufferOverflow)?;
        Ok(Message { topic, payload })
    }

    /// Send DISCONNECT best-effort and release the transport.
    ///
    /// A send failure is logged (under the `defmt` feature) rather than
    /// propagated - the transport is being torn down regardless. Idempotent:
    /// calling this on an already disconnected session is a no-op.
    pub fn disconnect(&mut self) {
        if self.state == State::Disconnected {
            return;
        }
        let mut packet: Vec<u8, 4> = Vec::new();
        if encode::disconnect(&mut packet).is_ok() {
            if let Some(connection) = self.connection.as_mut() {
                if write_all(connection, &packet).is_err() {
                    #[cfg(feature = "defmt")]
                    defmt::warn!("DISCONNECT send failed; closing transport anyway");
                }
            }
        }
        self.teardown();
    }

    /// Whether the session currently holds a usable connection.
    pub fn is_connected(&self) -> bool {
        self.state != State::Disconnected
    }

    /// Whether the session has an active subscription.
    pub fn is_subscribed(&self) -> bool {
        self.state == State::Subscribed
    }

    /// Write one packet, then read one complete response frame.
    fn exchange(&mut self, packet: &[u8], frame: &mut Vec<u8, BUF>) -> Result<(), Error> {
        let connection = self.connection.as_mut().ok_or(Error::NotConnected)?;
        write_all(connection, packet)?;
        read_frame(connection, frame)
    }

    fn connection_mut(&mut self) -> Result<&mut C, Error> {
        self.connection.as_mut().ok_or(Error::NotConnected)
    }

    /// Identifiers start at 1 and wrap past 65535 back to 1; zero is
    /// reserved by the protocol and never produced.
    fn allocate_packet_id(&mut self) -> u16 {
        let id = self.next_packet_id;
        self.next_packet_id = match id {
            u16::MAX => 1,
            n => n + 1,
        };
        id
    }

    /// Tear the session down when `error` means the stream is unusable.
    fn fail(&mut self, error: Error) -> Error {
        if error.is_fatal() {
            #[cfg(feature = "defmt")]
            defmt::warn!("session torn down: {}", error);
            self.teardown();
        }
        error
    }

    /// Release the transport exactly once and mark the session disconnected.
    fn teardown(&mut self) {
        if let Some(connection) = self.connection.take() {
            let _ = connection.close();
        }
        self.state = State::Disconnected;
    }
}

impl<C: Connection, const BUF: usize> core::fmt::Debug for Session<C, BUF> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Session")
            .field("state", &self.state)
            .field("next_packet_id", &self.next_packet_id)
            .finish_non_exhaustive()
    }
}

/// Write the whole buffer, treating a zero-length write as a closed peer.
fn write_all<C: Connection>(connection: &mut C, mut bytes: &[u8]) -> Result<(), Error> {
    while !bytes.is_empty() {
        match connection.write(bytes) {
            Ok(0) => return Err(Error::ConnectionClosed),
            Ok(n) => bytes = &bytes[n..],
            Err(e) => return Err(e.into()),
        }
    }
    connection.flush().map_err(Into::into)
}

/// Fill the whole buffer, treating a zero-length read as a closed peer.
fn read_exact<C: Connection>(connection: &mut C, buf: &mut [u8]) -> Result<(), Error> {
    let mut filled = 0;
    while filled < buf.len() {
        match connection.read(&mut buf[filled..]) {
            Ok(0) => return Err(Error::ConnectionClosed),
            Ok(n) => filled += n,
            Err(e) => return Err(e.into()),
        }
    }
    Ok(())
}

/// Read one complete control packet off the wire into `frame`: the header
/// byte, the Remaining Length one byte at a time, then the declared body.
fn read_frame<C: Connection, const N: usize>(
    connection: &mut C,
    frame: &mut Vec<u8, N>,
) -> Result<(), Error> {
    frame.clear();

    let mut byte = [0u8; 1];
    read_exact(connection, &mut byte)?;
    frame.push(byte[0]).map_err(|_| Error::BufferOverflow)?;

    let mut remaining: usize = 0;
    let mut multiplier: usize = 1;
    let mut count = 0;
    loop {
        if count == 4 {
            return Err(Error::MalformedHeader);
        }
        read_exact(connection, &mut byte)?;
        frame.push(byte[0]).map_err(|_| Error::BufferOverflow)?;
        remaining += (byte[0] as usize & 0x7F) * multiplier;
        multiplier *= 128;
        count += 1;
        if byte[0] & 0x80 == 0 {
            break;
        }
    }

    let start = frame.len();
    if remaining > frame.capacity() - start {
        return Err(Error::BufferOverflow);
    }
    frame
        .resize(start + remaining, 0)
        .map_err(|_| Error::BufferOverflow)?;
    read_exact(connection, &mut frame[start..])?;
    Ok(())
}
