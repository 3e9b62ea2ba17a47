//! Seros protocol core data types
//!
//! This crate provides basic data type definitions used by other Seros crates.
//! Seros users should not depend on this crate directly. Use the `seros::core` reexport instead.
#![no_std]

/// Wire identifier of a topic
///
/// Encoded as an unsigned 16-bit little-endian field in every frame header.
/// Values below [`TopicId::USER_BASE`] address the control channels shared
/// with the host bridge; their numeric values are fixed by the host protocol.
/// User endpoints are assigned ids from the ranges above `USER_BASE` at
/// registration time.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TopicId(u16);

impl TopicId {
    /// Publisher announcements. A zero-length inbound frame on this channel
    /// is the host's request to (re)negotiate topics.
    pub const PUBLISHER: TopicId = TopicId(0);
    /// Subscriber announcements
    pub const SUBSCRIBER: TopicId = TopicId(1);
    /// Service server announcements
    pub const SERVICE_SERVER: TopicId = TopicId(2);
    /// Service client announcements
    pub const SERVICE_CLIENT: TopicId = TopicId(4);
    /// Parameter request and response channel
    pub const PARAMETER_REQUEST: TopicId = TopicId(6);
    /// Device-to-host log records
    pub const LOG: TopicId = TopicId(7);
    /// Clock synchronization channel
    pub const TIME: TopicId = TopicId(10);

    /// First id available to user endpoints. Receivers are assigned
    /// `USER_BASE + slot`; publishers follow after the receiver range.
    pub const USER_BASE: u16 = 100;

    pub const fn new(value: u16) -> Self {
        Self(value)
    }

    pub const fn into_u16(self) -> u16 {
        self.0
    }

    pub const fn is_reserved(self) -> bool {
        self.0 < Self::USER_BASE
    }

    /// Offset of a user id above [`Self::USER_BASE`], `None` for control channels.
    ///
    /// The receiver table is indexed directly by this offset.
    pub const fn user_index(self) -> Option<usize> {
        if self.0 >= Self::USER_BASE {
            Some((self.0 - Self::USER_BASE) as usize)
        } else {
            None
        }
    }
}

impl From<TopicId> for u16 {
    fn from(value: TopicId) -> Self {
        value.into_u16()
    }
}

impl From<TopicId> for usize {
    fn from(value: TopicId) -> Self {
        u16::from(value).into()
    }
}

impl From<u16> for TopicId {
    fn from(value: u16) -> Self {
        Self::new(value)
    }
}
