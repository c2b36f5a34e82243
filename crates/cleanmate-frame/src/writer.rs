use bytes::BytesMut;
use cleanmate_transport::Transport;
use serde::Serialize;
use tracing::debug;

use crate::codec::{build_packet, HEADER_SIZE};
use crate::envelope::build;
use crate::error::Result;

/// Frame `payload` and send it as one packet.
pub fn write_packet<T: Transport + ?Sized>(transport: &mut T, payload: &[u8]) -> Result<()> {
    let mut buf = BytesMut::with_capacity(HEADER_SIZE + payload.len());
    build_packet(payload, &mut buf)?;
    transport.send_all(&buf)?;
    debug!(size = buf.len(), "sent packet");
    Ok(())
}

/// Wrap `value` in a request envelope and send it.
pub fn send_request<T, V>(transport: &mut T, value: &V, auth_code: &str) -> Result<()>
where
    T: Transport + ?Sized,
    V: Serialize + ?Sized,
{
    let payload = build(value, auth_code)?;
    write_packet(transport, &payload)
}
