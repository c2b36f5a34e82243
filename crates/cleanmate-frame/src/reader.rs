use bytes::Bytes;
use cleanmate_transport::Transport;
use serde_json::Value;
use tracing::debug;

use crate::codec::{parse_header, FrameConfig, Packet, HEADER_SIZE};
use crate::decoder::{ResponseDecoder, ValueParser};
use crate::error::{FrameError, Result};

/// Read one complete packet (blocking).
///
/// The header's size field is authoritative: exactly that many bytes are
/// read, never relying on the peer closing the stream.
pub fn read_packet<T: Transport + ?Sized>(transport: &mut T, config: &FrameConfig) -> Result<Packet> {
    let raw = transport.receive_exact(HEADER_SIZE)?;
    let payload_len = parse_header(&raw)?;

    if payload_len > config.max_payload_size {
        return Err(FrameError::PayloadTooLarge {
            size: payload_len,
            max: config.max_payload_size,
        });
    }

    let mut header = [0u8; HEADER_SIZE];
    header.copy_from_slice(&raw);
    let payload = Bytes::from(transport.receive_exact(payload_len)?);
    debug!(size = HEADER_SIZE + payload_len, "received packet");

    Ok(Packet { header, payload })
}

/// Read one packet and decode its payload into a value.
pub fn read_response<T, P>(
    transport: &mut T,
    config: &FrameConfig,
    decoder: &ResponseDecoder<P>,
) -> Result<Value>
where
    T: Transport + ?Sized,
    P: ValueParser,
{
    let packet = read_packet(transport, config)?;
    decoder.decode_packet(&packet)
}

#[cfg(test)]
mod tests {
    use bytes::{BufMut, BytesMut};
    use cleanmate_transport::TransportError;
    use serde_json::json;

    use super::*;
    use crate::codec::{build_packet, HEADER_TAIL};
    use crate::writer::tests::MemoryTransport;

    fn wire(payload: &[u8]) -> Vec<u8> {
        let mut buf = BytesMut::new();
        build_packet(payload, &mut buf).unwrap();
        buf.to_vec()
    }

    #[test]
    fn reads_single_packet() {
        let mut transport = MemoryTransport::connected_with(&wire(b"hello"));
        let packet = read_packet(&mut transport, &FrameConfig::default()).unwrap();
        assert_eq!(packet.payload.as_ref(), b"hello");
        assert_eq!(packet.size_field(), 25);
        assert!(transport.inbound.is_empty());
    }

    #[test]
    fn reads_back_to_back_packets_without_overreading() {
        let mut inbound = wire(b"one");
        inbound.extend(wire(b"two"));
        let mut transport = MemoryTransport::connected_with(&inbound);

        let p1 = read_packet(&mut transport, &FrameConfig::default()).unwrap();
        let p2 = read_packet(&mut transport, &FrameConfig::default()).unwrap();
        assert_eq!(p1.payload.as_ref(), b"one");
        assert_eq!(p2.payload.as_ref(), b"two");
    }

    #[test]
    fn size_field_with_zero_bytes_is_read_correctly() {
        // 256 + 20 = 0x114 -> wire bytes 14 01 00 00
        let payload = vec![b'a'; 256];
        let mut transport = MemoryTransport::connected_with(&wire(&payload));
        let packet = read_packet(&mut transport, &FrameConfig::default()).unwrap();
        assert_eq!(packet.payload.len(), 256);
    }

    #[test]
    fn peer_closing_mid_payload_is_an_error() {
        let mut inbound = wire(b"0123456789");
        inbound.truncate(HEADER_SIZE + 4);
        let mut transport = MemoryTransport::connected_with(&inbound);

        let err = read_packet(&mut transport, &FrameConfig::default()).unwrap_err();
        assert!(matches!(
            err,
            FrameError::Transport(TransportError::ConnectionClosed {
                expected: 10,
                transferred: 4
            })
        ));
    }

    #[test]
    fn oversized_payload_is_rejected_before_reading() {
        let mut inbound = BytesMut::new();
        inbound.put_u32_le(1024 + HEADER_SIZE as u32);
        inbound.put_slice(&HEADER_TAIL);
        let mut transport = MemoryTransport::connected_with(&inbound);

        let cfg = FrameConfig {
            max_payload_size: 16,
        };
        let err = read_packet(&mut transport, &cfg).unwrap_err();
        assert!(matches!(err, FrameError::PayloadTooLarge { .. }));
    }

    #[test]
    fn malformed_header_is_rejected() {
        let mut inbound = vec![0u8; HEADER_SIZE];
        inbound[0] = 3;
        let mut transport = MemoryTransport::connected_with(&inbound);

        let err = read_packet(&mut transport, &FrameConfig::default()).unwrap_err();
        assert!(matches!(err, FrameError::MalformedHeader { .. }));
    }

    #[test]
    fn read_response_decodes_json() {
        let mut transport =
            MemoryTransport::connected_with(&wire(br#"{"value":{"workState":"2"}}"#));
        let value = read_response(
            &mut transport,
            &FrameConfig::default(),
            &ResponseDecoder::new(),
        )
        .unwrap();
        assert_eq!(value, json!({"value": {"workState": "2"}}));
    }

    #[test]
    fn read_response_over_tcp_with_fragmented_delivery() {
        use std::io::Write;
        use std::net::TcpListener;

        use cleanmate_transport::{ConnectionConfig, TcpConnection};

        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let port = listener.local_addr().unwrap().port();
        let packet = wire(br#"{"value":{"battery":"97","version":"1.2.3"}}"#);

        let server = std::thread::spawn(move || {
            let (mut stream, _) = listener.accept().unwrap();
            stream.set_nodelay(true).unwrap();
            for piece in packet.chunks(7) {
                stream.write_all(piece).unwrap();
                stream.flush().unwrap();
            }
        });

        let config = ConnectionConfig {
            port,
            ..ConnectionConfig::default()
        };
        let mut conn = TcpConnection::with_config("127.0.0.1", config);
        conn.connect().unwrap();

        let value = read_response(&mut conn, &FrameConfig::default(), &ResponseDecoder::new())
            .unwrap();
        assert_eq!(value["value"]["battery"], json!("97"));

        server.join().unwrap();
    }
}
