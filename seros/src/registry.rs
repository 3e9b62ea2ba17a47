//! Slotted endpoint tables
//!
//! Two fixed-capacity tables, filled front to back with no holes. A slot's
//! index determines its wire id: receivers start at [`TopicId::USER_BASE`],
//! publishers directly after the receiver range. Ids are assigned once and
//! stay stable for the node's lifetime; there is no unregistration.

use seros_core::TopicId;

use crate::endpoint::Receive;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RegistrationError {
    /// Every slot of the relevant table is taken
    NoSlotLeft,
}

pub(crate) struct PublisherEntry {
    pub topic: &'static str,
    pub msg_type: &'static str,
    pub id: TopicId,
}

pub(crate) struct Registry<'a, const MS: usize, const MP: usize> {
    publishers: [Option<PublisherEntry>; MP],
    receivers: [Option<&'a mut dyn Receive>; MS],
}

impl<'a, const MS: usize, const MP: usize> Registry<'a, MS, MP> {
    pub fn new() -> Self {
        Self {
            publishers: [const { None }; MP],
            receivers: [const { None }; MS],
        }
    }

    /// Fills the first empty publisher slot and returns its assigned id
    pub fn advertise(
        &mut self,
        topic: &'static str,
        msg_type: &'static str,
    ) -> Result<TopicId, RegistrationError> {
        let index = self
            .publishers
            .iter()
            .position(Option::is_none)
            .ok_or(RegistrationError::NoSlotLeft)?;
        let id = TopicId::new(TopicId::USER_BASE + MS as u16 + index as u16);
        self.publishers[index] = Some(PublisherEntry {
            topic,
            msg_type,
            id,
        });
        Ok(id)
    }

    /// Fills the first empty receiver slot and assigns its id to the receiver
    pub fn subscribe(&mut self, receiver: &'a mut dyn Receive) -> Result<TopicId, RegistrationError> {
        let index = self
            .receivers
            .iter()
            .position(Option::is_none)
            .ok_or(RegistrationError::NoSlotLeft)?;
        let id = TopicId::new(TopicId::USER_BASE + index as u16);
        receiver.set_id(id);
        self.receivers[index] = Some(receiver);
        Ok(id)
    }

    /// Receiver registered at `index`, which is the id's offset above `USER_BASE`
    pub fn receiver_mut(&mut self, index: usize) -> Option<&mut (dyn Receive + 'a)> {
        self.receivers.get_mut(index)?.as_deref_mut()
    }

    /// Populated publisher slots, front to back
    pub fn publishers(&self) -> impl Iterator<Item = &PublisherEntry> {
        self.publishers.iter().map_while(Option::as_ref)
    }

    /// Populated receiver slots, front to back
    pub fn receivers(&self) -> impl Iterator<Item = &dyn Receive> {
        self.receivers.iter().map_while(|slot| slot.as_deref())
    }
}
