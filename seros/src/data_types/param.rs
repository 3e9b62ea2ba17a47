use heapless::{String, Vec};
use seros_encoding as enc;

/// Capacity of each value array in a parameter response
pub const PARAM_VALUE_COUNT: usize = 8;
/// Capacity of one string parameter value
pub const PARAM_STRING_LENGTH: usize = 32;

pub type ParamString = String<PARAM_STRING_LENGTH>;

/// Parameter lookup by name. Outbound only.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct RequestParamRequest<'a> {
    pub name: &'a str,
}

impl enc::Serialize for RequestParamRequest<'_> {
    fn size_bytes(&self) -> usize {
        4 + self.name.len()
    }

    fn serialize(&self, cursor: &mut enc::WriteCursor<'_>) {
        cursor.write_str(self.name);
    }
}

/// The host's parameter response. Inbound only.
///
/// Exactly one of the three arrays is populated, matching the parameter's
/// type on the host side. A response larger than the fixed capacities is a
/// decode error and the lookup fails.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RequestParamResponse {
    pub ints: Vec<i32, PARAM_VALUE_COUNT>,
    pub floats: Vec<f32, PARAM_VALUE_COUNT>,
    pub strings: Vec<ParamString, PARAM_VALUE_COUNT>,
}

impl enc::Deserialize for RequestParamResponse {
    fn deserialize(cursor: &mut enc::ReadCursor<'_>) -> Result<Self, enc::DeserializeError> {
        let mut response = Self::default();

        let count = cursor.read_u32()? as usize;
        for _ in 0..count {
            let value = cursor.read_i32()?;
            response
                .ints
                .push(value)
                .map_err(|_| enc::DeserializeError::Capacity)?;
        }

        let count = cursor.read_u32()? as usize;
        for _ in 0..count {
            let value = cursor.read_f32()?;
            response
                .floats
                .push(value)
                .map_err(|_| enc::DeserializeError::Capacity)?;
        }

        let count = cursor.read_u32()? as usize;
        for _ in 0..count {
            let text = cursor.read_str()?;
            let value = ParamString::try_from(text).map_err(|_| enc::DeserializeError::Capacity)?;
            response
                .strings
                .push(value)
                .map_err(|_| enc::DeserializeError::Capacity)?;
        }

        Ok(response)
    }
}
