//! Inbound frame reassembly
//!
//! A bytewise state machine that walks the frame layout one input byte per
//! step. The caller owns the drain loop; the parser never reads the port
//! itself and therefore never blocks.
//!
//! A frame that stalls mid-flight is abandoned: the deadline armed on the
//! first sync byte is checked at the top of every poll, and an expired frame
//! resets the machine to hunt for the next sync pair.

use seros_core::TopicId;
use seros_driver::time::{Duration, Instant};

use crate::format::{FrameChecksum, SYNC_BYTE};

/// Time allowed for a started frame to finish arriving
pub const MSG_TIMEOUT: Duration = Duration::from_millis(20);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Sync1,
    Sync2,
    TopicLow,
    TopicHigh,
    LengthLow,
    LengthHigh,
    Payload,
    Checksum,
}

pub(crate) struct Parser<const IN: usize> {
    state: State,
    topic: u16,
    remaining: usize,
    index: usize,
    checksum: FrameChecksum,
    deadline: Instant,
    buffer: [u8; IN],
}

impl<const IN: usize> Parser<IN> {
    pub fn new() -> Self {
        Self {
            state: State::Sync1,
            topic: 0,
            remaining: 0,
            index: 0,
            checksum: FrameChecksum::default(),
            deadline: Instant::from_millis(0),
            buffer: [0; IN],
        }
    }

    /// Drops any in-progress frame and hunts for the next sync pair
    pub fn reset(&mut self) {
        self.state = State::Sync1;
        self.topic = 0;
        self.remaining = 0;
        self.index = 0;
        self.checksum = FrameChecksum::default();
    }

    /// True when a frame is in progress past its arrival deadline
    pub fn timed_out(&self, now: Instant) -> bool {
        self.state != State::Sync1 && now.is_after(self.deadline)
    }

    /// Feeds one byte.
    ///
    /// Returns the topic and payload length of a completed, checksum-valid
    /// frame; the payload stays in the parser's buffer until the next byte of
    /// the next frame arrives (see [`Self::payload`]).
    pub fn consume(&mut self, byte: u8, now: Instant) -> Option<(TopicId, usize)> {
        match self.state {
            State::Sync1 => {
                if byte == SYNC_BYTE {
                    self.state = State::Sync2;
                    self.deadline = now + MSG_TIMEOUT;
                }
            }
            State::Sync2 => {
                self.state = if byte == SYNC_BYTE {
                    State::TopicLow
                } else {
                    State::Sync1
                };
            }
            State::TopicLow => {
                self.topic = u16::from(byte);
                self.checksum = FrameChecksum::default();
                self.checksum.add(byte);
                self.state = State::TopicHigh;
            }
            State::TopicHigh => {
                self.topic |= u16::from(byte) << 8;
                self.checksum.add(byte);
                self.state = State::LengthLow;
            }
            State::LengthLow => {
                self.remaining = usize::from(byte);
                self.index = 0;
                self.checksum.add(byte);
                self.state = State::LengthHigh;
            }
            State::LengthHigh => {
                self.remaining |= usize::from(byte) << 8;
                self.checksum.add(byte);
                if self.remaining > IN {
                    warn!("inbound frame longer than input buffer, dropped");
                    self.state = State::Sync1;
                } else if self.remaining == 0 {
                    self.state = State::Checksum;
                } else {
                    self.state = State::Payload;
                }
            }
            State::Payload => {
                self.buffer[self.index] = byte;
                self.index += 1;
                self.checksum.add(byte);
                self.remaining -= 1;
                if self.remaining == 0 {
                    self.state = State::Checksum;
                }
            }
            State::Checksum => {
                self.checksum.add(byte);
                let valid = self.checksum.is_valid();
                self.state = State::Sync1;
                if valid {
                    return Some((TopicId::new(self.topic), self.index));
                }
                trace!("inbound frame dropped: bad checksum");
            }
        }
        None
    }

    /// Payload of the frame most recently reported by [`Self::consume`]
    pub fn payload(&self, length: usize) -> &[u8] {
        &self.buffer[..length]
    }
}
