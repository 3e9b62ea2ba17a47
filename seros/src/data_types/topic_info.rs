use seros_encoding as enc;

/// Topic announcement published during negotiation
///
/// One record per registered endpoint, on the publishers or subscribers
/// announcement channel. Outbound only; the device never decodes one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TopicInfo<'a> {
    pub topic_id: u16,
    pub topic_name: &'a str,
    pub message_type: &'a str,
}

impl enc::Serialize for TopicInfo<'_> {
    fn size_bytes(&self) -> usize {
        2 + 4 + self.topic_name.len() + 4 + self.message_type.len()
    }

    fn serialize(&self, cursor: &mut enc::WriteCursor<'_>) {
        cursor.write_u16(self.topic_id);
        cursor.write_str(self.topic_name);
        cursor.write_str(self.message_type);
    }
}
