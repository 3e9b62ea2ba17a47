//! Outbound frame encoder
//!
//! Serializes a message into the scratch buffer, then emits the frame through
//! the port: sync pair, topic id, payload length, payload, checksum trailer.
//! The core is single threaded, so a frame is never interleaved with another.
//!
//! There is no retry path. A payload longer than the scratch buffer is
//! rejected before anything reaches the wire, and a port write error abandons
//! the rest of the frame.

use seros_core::TopicId;
use seros_driver::port::{Port, PortError};
use seros_encoding::{Serialize, WriteCursor};

use crate::format::{FRAME_OVERHEAD, FrameChecksum, SYNC_BYTE};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PublishError {
    /// Serialized payload does not fit the output buffer
    PayloadTooLong,
    /// The port rejected a write; the frame was abandoned mid-emission
    Port,
}

impl From<PortError> for PublishError {
    fn from(_: PortError) -> Self {
        PublishError::Port
    }
}

/// Publish capability handed to receivers.
///
/// Service servers use it to emit their response on their own id while the
/// inbound request is still being dispatched.
pub trait Tx {
    /// Frames and emits one message, returning the bytes put on the wire
    fn publish(&mut self, topic: TopicId, message: &dyn Serialize) -> Result<usize, PublishError>;
}

/// The encoder: scratch buffer plus the negotiated-connection flag
pub(crate) struct Output<const OUT: usize> {
    scratch: [u8; OUT],
    configured: bool,
}

impl<const OUT: usize> Output<OUT> {
    pub fn new() -> Self {
        Self {
            scratch: [0; OUT],
            configured: false,
        }
    }

    pub fn configured(&self) -> bool {
        self.configured
    }

    pub fn set_configured(&mut self, configured: bool) {
        self.configured = configured;
    }

    pub fn publish<P: Port>(
        &mut self,
        port: &mut P,
        topic: TopicId,
        message: &dyn Serialize,
    ) -> Result<usize, PublishError> {
        let length = message.size_bytes();
        if length > OUT {
            warn!("outbound payload of {} bytes exceeds the output buffer", length);
            return Err(PublishError::PayloadTooLong);
        }

        let mut cursor = WriteCursor::new(&mut self.scratch[..length]);
        message.serialize(&mut cursor);

        let id = topic.into_u16();
        let header = [
            id as u8,
            (id >> 8) as u8,
            length as u8,
            (length >> 8) as u8,
        ];
        let mut checksum = FrameChecksum::default();
        checksum.add_bytes(&header);
        checksum.add_bytes(&self.scratch[..length]);

        port.write(&[SYNC_BYTE, SYNC_BYTE])?;
        port.write(&header)?;
        port.write(&self.scratch[..length])?;
        port.write(&[checksum.trailer()])?;
        Ok(length + FRAME_OVERHEAD)
    }
}

/// [`Tx`] over the node's port and encoder
pub(crate) struct LinkTx<'a, P: Port, const OUT: usize> {
    pub port: &'a mut P,
    pub output: &'a mut Output<OUT>,
}

impl<P: Port, const OUT: usize> Tx for LinkTx<'_, P, OUT> {
    fn publish(&mut self, topic: TopicId, message: &dyn Serialize) -> Result<usize, PublishError> {
        self.output.publish(self.port, topic, message)
    }
}
