use seros_encoding as enc;

/// Severity of a device-to-host log record
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum LogLevel {
    Debug = 0,
    Info = 1,
    Warn = 2,
    Error = 3,
    Fatal = 4,
}

impl LogLevel {
    pub const fn into_u8(self) -> u8 {
        self as u8
    }
}

/// Log record published on the log channel. Outbound only.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Log<'a> {
    pub level: LogLevel,
    pub text: &'a str,
}

impl enc::Serialize for Log<'_> {
    fn size_bytes(&self) -> usize {
        1 + 4 + self.text.len()
    }

    fn serialize(&self, cursor: &mut enc::WriteCursor<'_>) {
        cursor.write_u8(self.level.into_u8());
        cursor.write_str(self.text);
    }
}
