use seros_encoding as enc;

/// `std_msgs/Time`
///
/// Fixed size 8 bytes. Carried on the clock synchronization channel in both
/// directions: an empty (zeroed) stamp as the device's request, the host's
/// wall clock in the reply.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Time {
    pub sec: u32,
    pub nsec: u32,
}

impl Time {
    pub const NSEC_PER_SEC: u32 = 1_000_000_000;

    /// Carries whole seconds out of the nanosecond field
    pub fn normalized(self) -> Self {
        Self {
            sec: self.sec.wrapping_add(self.nsec / Self::NSEC_PER_SEC),
            nsec: self.nsec % Self::NSEC_PER_SEC,
        }
    }
}

impl enc::DataType for Time {
    const NAME: &'static str = "std_msgs/Time";
}

impl enc::Message for Time {}

impl enc::Serialize for Time {
    fn size_bytes(&self) -> usize {
        8
    }

    fn serialize(&self, cursor: &mut enc::WriteCursor<'_>) {
        cursor.write_u32(self.sec);
        cursor.write_u32(self.nsec);
    }
}

impl enc::Deserialize for Time {
    fn deserialize(cursor: &mut enc::ReadCursor<'_>) -> Result<Self, enc::DeserializeError> {
        Ok(Time {
            sec: cursor.read_u32()?,
            nsec: cursor.read_u32()?,
        })
    }
}
