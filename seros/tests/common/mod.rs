//! Test doubles and wire helpers shared by the integration tests
#![allow(dead_code)]

use std::collections::VecDeque;

use seros::port::{Port, PortError};
use seros::time::Instant;
use seros_encoding as enc;

/// Scripted in-memory port.
///
/// Reads come from a preloaded queue, writes are recorded, and the clock is
/// advanced manually — or one millisecond per `time()` call for tests that
/// need deadlines to expire on their own.
pub struct ScriptedPort {
    rx: VecDeque<u8>,
    pub tx: Vec<u8>,
    now: u32,
    tick: u32,
}

impl ScriptedPort {
    pub fn new() -> Self {
        Self {
            rx: VecDeque::new(),
            tx: Vec::new(),
            now: 0,
            tick: 0,
        }
    }

    pub fn ticking() -> Self {
        Self { tick: 1, ..Self::new() }
    }

    pub fn advance(&mut self, millis: u32) {
        self.now += millis;
    }

    pub fn now_millis(&self) -> u32 {
        self.now
    }

    pub fn feed(&mut self, bytes: &[u8]) {
        self.rx.extend(bytes);
    }

    pub fn feed_frame(&mut self, topic: u16, payload: &[u8]) {
        let bytes = frame(topic, payload);
        self.rx.extend(bytes);
    }
}

impl Port for ScriptedPort {
    fn init(&mut self) -> Result<(), PortError> {
        Ok(())
    }

    fn read(&mut self) -> Option<u8> {
        self.rx.pop_front()
    }

    fn write(&mut self, bytes: &[u8]) -> Result<(), PortError> {
        self.tx.extend_from_slice(bytes);
        Ok(())
    }

    fn time(&mut self) -> Instant {
        let now = self.now;
        self.now += self.tick;
        Instant::from_millis(now)
    }
}

/// Builds one complete frame around `payload`
pub fn frame(topic: u16, payload: &[u8]) -> Vec<u8> {
    let header = [
        topic as u8,
        (topic >> 8) as u8,
        payload.len() as u8,
        (payload.len() >> 8) as u8,
    ];
    let mut bytes = vec![0xff, 0xff];
    bytes.extend_from_slice(&header);
    bytes.extend_from_slice(payload);
    let sum: u32 = header.iter().chain(payload).map(|&b| u32::from(b)).sum();
    bytes.push((255 - sum % 256) as u8);
    bytes
}

/// Splits a recorded byte stream back into `(topic, payload)` frames,
/// checking every frame's checksum on the way
pub fn split_frames(mut bytes: &[u8]) -> Vec<(u16, Vec<u8>)> {
    let mut frames = Vec::new();
    while !bytes.is_empty() {
        assert_eq!(&bytes[..2], &[0xff, 0xff], "stream does not start on a frame");
        let topic = u16::from_le_bytes([bytes[2], bytes[3]]);
        let length = usize::from(u16::from_le_bytes([bytes[4], bytes[5]]));
        let payload = bytes[6..6 + length].to_vec();
        let sum: u32 = bytes[2..7 + length].iter().map(|&b| u32::from(b)).sum();
        assert_eq!(sum % 256, 255, "corrupt frame in recorded stream");
        frames.push((topic, payload));
        bytes = &bytes[7 + length..];
    }
    frames
}

/// Decodes a recorded topic announcement payload
pub fn read_topic_info(payload: &[u8]) -> (u16, String, String) {
    let mut cursor = enc::ReadCursor::new(payload);
    let topic_id = cursor.read_u16().unwrap();
    let topic_name = cursor.read_str().unwrap().to_string();
    let message_type = cursor.read_str().unwrap().to_string();
    assert_eq!(cursor.remaining(), 0);
    (topic_id, topic_name, message_type)
}

/// Encodes a parameter response carrying only ints
pub fn param_response_ints(values: &[i32]) -> Vec<u8> {
    let mut bytes = Vec::new();
    bytes.extend_from_slice(&(values.len() as u32).to_le_bytes());
    for value in values {
        bytes.extend_from_slice(&value.to_le_bytes());
    }
    bytes.extend_from_slice(&0u32.to_le_bytes());
    bytes.extend_from_slice(&0u32.to_le_bytes());
    bytes
}

/// Encodes a parameter response carrying only strings
pub fn param_response_strings(values: &[&str]) -> Vec<u8> {
    let mut bytes = Vec::new();
    bytes.extend_from_slice(&0u32.to_le_bytes());
    bytes.extend_from_slice(&0u32.to_le_bytes());
    bytes.extend_from_slice(&(values.len() as u32).to_le_bytes());
    for value in values {
        bytes.extend_from_slice(&(value.len() as u32).to_le_bytes());
        bytes.extend_from_slice(value.as_bytes());
    }
    bytes
}

/// 32-bit integer topic message
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Num {
    pub data: i32,
}

impl enc::DataType for Num {
    const NAME: &'static str = "std_msgs/Int32";
}

impl enc::Message for Num {}

impl enc::Serialize for Num {
    fn size_bytes(&self) -> usize {
        4
    }

    fn serialize(&self, cursor: &mut enc::WriteCursor<'_>) {
        cursor.write_i32(self.data);
    }
}

impl enc::Deserialize for Num {
    fn deserialize(cursor: &mut enc::ReadCursor<'_>) -> Result<Self, enc::DeserializeError> {
        Ok(Num {
            data: cursor.read_i32()?,
        })
    }
}

/// Opaque blob message that carries its payload bytes verbatim
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Blob {
    pub bytes: heapless::Vec<u8, 32>,
}

impl Blob {
    pub fn from_slice(bytes: &[u8]) -> Self {
        Self {
            bytes: heapless::Vec::from_slice(bytes).unwrap(),
        }
    }
}

impl enc::DataType for Blob {
    const NAME: &'static str = "test_msgs/Blob";
}

impl enc::Message for Blob {}

impl enc::Serialize for Blob {
    fn size_bytes(&self) -> usize {
        self.bytes.len()
    }

    fn serialize(&self, cursor: &mut enc::WriteCursor<'_>) {
        cursor.write_bytes(&self.bytes);
    }
}

impl enc::Deserialize for Blob {
    fn deserialize(cursor: &mut enc::ReadCursor<'_>) -> Result<Self, enc::DeserializeError> {
        let bytes = cursor.read_bytes(cursor.remaining())?;
        Ok(Blob {
            bytes: heapless::Vec::from_slice(bytes)
                .map_err(|_| enc::DeserializeError::Capacity)?,
        })
    }
}
