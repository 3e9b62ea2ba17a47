//! User-facing endpoints
//!
//! A [`Publisher`] is a typed handle returned by `advertise`; messages flow
//! out through the node that issued it. [`Subscriber`] and [`ServiceServer`]
//! are owned by the application and lent to the node for its lifetime; the
//! node invokes them from its poll loop when a frame addressed to their
//! assigned id arrives.

use core::marker::PhantomData;

use seros_core::TopicId;
use seros_encoding::Message;

use crate::output::Tx;

/// Receiving side of a registry slot.
///
/// Object safe; the registry stores receivers as trait objects so
/// differently-typed subscribers and service servers share one table.
pub trait Receive {
    fn topic_name(&self) -> &'static str;

    /// Message type name announced to the host during negotiation
    fn msg_type(&self) -> &'static str;

    fn id(&self) -> TopicId;

    /// Called once at registration with the slot's assigned id
    fn set_id(&mut self, id: TopicId);

    /// Handles one inbound payload addressed to this endpoint
    fn receive(&mut self, payload: &[u8], tx: &mut dyn Tx);
}

/// Handle for publishing on an advertised topic
pub struct Publisher<M: Message> {
    id: TopicId,
    _message: PhantomData<M>,
}

impl<M: Message> Publisher<M> {
    pub(crate) fn new(id: TopicId) -> Self {
        Self {
            id,
            _message: PhantomData,
        }
    }

    /// Wire id assigned at registration
    pub fn id(&self) -> TopicId {
        self.id
    }
}

/// Delivers decoded messages on one topic to a callback
pub struct Subscriber<M, F>
where
    M: Message,
    F: FnMut(&M),
{
    topic: &'static str,
    id: TopicId,
    callback: F,
    _message: PhantomData<M>,
}

impl<M, F> Subscriber<M, F>
where
    M: Message,
    F: FnMut(&M),
{
    pub fn new(topic: &'static str, callback: F) -> Self {
        Self {
            topic,
            id: TopicId::new(0),
            callback,
            _message: PhantomData,
        }
    }
}

impl<M, F> Receive for Subscriber<M, F>
where
    M: Message,
    F: FnMut(&M),
{
    fn topic_name(&self) -> &'static str {
        self.topic
    }

    fn msg_type(&self) -> &'static str {
        M::NAME
    }

    fn id(&self) -> TopicId {
        self.id
    }

    fn set_id(&mut self, id: TopicId) {
        self.id = id;
    }

    fn receive(&mut self, payload: &[u8], _tx: &mut dyn Tx) {
        match M::deserialize_from_bytes(payload) {
            Ok(message) => (self.callback)(&message),
            Err(_) => warn!("message on {} dropped: malformed payload", self.topic),
        }
    }
}

/// Answers requests on one topic, emitting the response on the same id
pub struct ServiceServer<Req, Resp, F>
where
    Req: Message,
    Resp: Message + Default,
    F: FnMut(&Req, &mut Resp),
{
    topic: &'static str,
    id: TopicId,
    handler: F,
    _request: PhantomData<Req>,
    _response: PhantomData<Resp>,
}

impl<Req, Resp, F> ServiceServer<Req, Resp, F>
where
    Req: Message,
    Resp: Message + Default,
    F: FnMut(&Req, &mut Resp),
{
    pub fn new(topic: &'static str, handler: F) -> Self {
        Self {
            topic,
            id: TopicId::new(0),
            handler,
            _request: PhantomData,
            _response: PhantomData,
        }
    }
}

impl<Req, Resp, F> Receive for ServiceServer<Req, Resp, F>
where
    Req: Message,
    Resp: Message + Default,
    F: FnMut(&Req, &mut Resp),
{
    fn topic_name(&self) -> &'static str {
        self.topic
    }

    fn msg_type(&self) -> &'static str {
        Req::NAME
    }

    fn id(&self) -> TopicId {
        self.id
    }

    fn set_id(&mut self, id: TopicId) {
        self.id = id;
    }

    fn receive(&mut self, payload: &[u8], tx: &mut dyn Tx) {
        let request = match Req::deserialize_from_bytes(payload) {
            Ok(request) => request,
            Err(_) => {
                warn!("request on {} dropped: malformed payload", self.topic);
                return;
            }
        };

        let mut response = Resp::default();
        (self.handler)(&request, &mut response);
        if tx.publish(self.id, &response).is_err() {
            warn!("response on {} dropped", self.topic);
        }
    }
}
