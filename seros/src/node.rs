//! Node orchestrator and poll loop
//!
//! [`NodeHandle`] owns the port, the frame parser, the output encoder, the
//! endpoint registry, and the synchronized clock. Everything runs on
//! whichever thread calls [`NodeHandle::spin_once`]; there are no internal
//! threads, interrupts, or timers, and no allocation after construction.
//!
//! A poll performs bounded work: it abandons a stale in-progress frame,
//! drains whatever bytes the port has ready through the parser and
//! dispatcher, runs the sync schedule, and returns as soon as the port
//! read would block.
//!
//! The host drives the handshake. A zero-length frame on the negotiation
//! channel makes the node announce every registered endpoint and request a
//! clock sync; from then on the node keeps its clock fresh and marks itself
//! disconnected when the host goes quiet.

use seros_core::TopicId;
use seros_driver::port::{Port, PortError};
use seros_driver::time::{Duration, Instant};
use seros_encoding::{Deserialize, Message};

use crate::data_types::{
    Log, LogLevel, ParamString, RequestParamRequest, RequestParamResponse, Time, TopicInfo,
};
use crate::endpoint::{Publisher, Receive};
use crate::output::{LinkTx, Output, PublishError};
use crate::parser::Parser;
use crate::registry::{Registry, RegistrationError};
use crate::time_sync::{SyncAction, SyncedClock};

/// Deadline applied to a parameter lookup unless the caller picks its own
pub const DEFAULT_PARAM_TIMEOUT: Duration = Duration::from_millis(1000);

/// Failure modes of a parameter lookup
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ParamError {
    /// The request frame could not be published
    Publish(PublishError),
    /// No response arrived before the deadline
    Timeout,
    /// The response's value count does not match the caller's buffer
    CountMismatch,
}

impl From<PublishError> for ParamError {
    fn from(error: PublishError) -> Self {
        ParamError::Publish(error)
    }
}

/// The device-side node.
///
/// Table and buffer capacities are fixed at compile time through the const
/// parameters; the defaults match the host bridge's expectations. Endpoints
/// lent to the node must outlive it (`'a`).
///
/// The handle must not be shared between execution contexts.
pub struct NodeHandle<
    'a,
    P,
    const MAX_SUBSCRIBERS: usize = 25,
    const MAX_PUBLISHERS: usize = 25,
    const INPUT_SIZE: usize = 512,
    const OUTPUT_SIZE: usize = 512,
> where
    P: Port,
{
    port: P,
    output: Output<OUTPUT_SIZE>,
    parser: Parser<INPUT_SIZE>,
    registry: Registry<'a, MAX_SUBSCRIBERS, MAX_PUBLISHERS>,
    clock: SyncedClock,
    param_received: bool,
    param_response: RequestParamResponse,
}

impl<'a, P, const MS: usize, const MP: usize, const IN: usize, const OUT: usize>
    NodeHandle<'a, P, MS, MP, IN, OUT>
where
    P: Port,
{
    pub fn new(port: P) -> Self {
        Self {
            port,
            output: Output::new(),
            parser: Parser::new(),
            registry: Registry::new(),
            clock: SyncedClock::new(),
            param_received: false,
            param_response: RequestParamResponse::default(),
        }
    }

    /// Brings the port up and resets the frame parser
    pub fn init(&mut self) -> Result<(), PortError> {
        self.port.init()?;
        self.parser.reset();
        Ok(())
    }

    /// Direct access to the underlying port
    pub fn port(&mut self) -> &mut P {
        &mut self.port
    }

    /// True between a completed negotiation and the next liveness timeout
    pub fn connected(&self) -> bool {
        self.output.configured()
    }

    /// Registers a publisher for `topic` and returns its typed handle
    pub fn advertise<M: Message>(
        &mut self,
        topic: &'static str,
    ) -> Result<Publisher<M>, RegistrationError> {
        self.registry.advertise(topic, M::NAME).map(Publisher::new)
    }

    /// Lends a subscriber to the node and assigns its wire id
    pub fn subscribe<R: Receive>(&mut self, receiver: &'a mut R) -> Result<(), RegistrationError> {
        self.registry.subscribe(receiver).map(|_| ())
    }

    /// Lends a service server to the node; servers share the receiver table
    pub fn advertise_service<R: Receive>(
        &mut self,
        server: &'a mut R,
    ) -> Result<(), RegistrationError> {
        self.registry.subscribe(server).map(|_| ())
    }

    /// Frames and emits one message on the publisher's topic
    pub fn publish<M: Message>(
        &mut self,
        publisher: &Publisher<M>,
        message: &M,
    ) -> Result<usize, PublishError> {
        self.output.publish(&mut self.port, publisher.id(), message)
    }

    /// One bounded unit of work; call from the application's main loop.
    pub fn spin_once(&mut self) {
        let now = self.port.time();

        if self.parser.timed_out(now) {
            trace!("in-progress frame abandoned after stall");
            self.parser.reset();
        }

        while let Some(byte) = self.port.read() {
            if let Some((topic, length)) = self.parser.consume(byte, now) {
                self.dispatch(topic, length, now);
            }
        }

        match self.clock.poll_schedule(now, self.output.configured()) {
            SyncAction::MarkDisconnected => self.output.set_configured(false),
            SyncAction::RequestSync => self.request_sync_time(),
            SyncAction::None => {}
        }
    }

    /// Synchronized wall clock
    pub fn now(&mut self) -> Time {
        let now = self.port.time();
        self.clock.now(now)
    }

    /// Repins the synchronized clock to `time`
    pub fn set_now(&mut self, time: Time) {
        let now = self.port.time();
        self.clock.set_now(now, time);
    }

    pub fn log_debug(&mut self, text: &str) {
        self.log(LogLevel::Debug, text);
    }

    pub fn log_info(&mut self, text: &str) {
        self.log(LogLevel::Info, text);
    }

    pub fn log_warn(&mut self, text: &str) {
        self.log(LogLevel::Warn, text);
    }

    pub fn log_error(&mut self, text: &str) {
        self.log(LogLevel::Error, text);
    }

    pub fn log_fatal(&mut self, text: &str) {
        self.log(LogLevel::Fatal, text);
    }

    /// Looks up an integer array parameter by name.
    ///
    /// Succeeds only when the response carries exactly `values.len()` ints.
    /// Re-enters the poll loop until the response or the deadline; must not
    /// be called from a receiver callback.
    pub fn get_param_int(
        &mut self,
        name: &str,
        values: &mut [i32],
        timeout: Duration,
    ) -> Result<(), ParamError> {
        self.request_param(name, timeout)?;
        if self.param_response.ints.len() != values.len() {
            return Err(ParamError::CountMismatch);
        }
        values.copy_from_slice(&self.param_response.ints);
        Ok(())
    }

    /// Looks up a float array parameter by name. See [`Self::get_param_int`].
    pub fn get_param_float(
        &mut self,
        name: &str,
        values: &mut [f32],
        timeout: Duration,
    ) -> Result<(), ParamError> {
        self.request_param(name, timeout)?;
        if self.param_response.floats.len() != values.len() {
            return Err(ParamError::CountMismatch);
        }
        values.copy_from_slice(&self.param_response.floats);
        Ok(())
    }

    /// Looks up a string array parameter by name. See [`Self::get_param_int`].
    pub fn get_param_string(
        &mut self,
        name: &str,
        values: &mut [ParamString],
        timeout: Duration,
    ) -> Result<(), ParamError> {
        self.request_param(name, timeout)?;
        if self.param_response.strings.len() != values.len() {
            return Err(ParamError::CountMismatch);
        }
        for (slot, value) in values.iter_mut().zip(&self.param_response.strings) {
            slot.clone_from(value);
        }
        Ok(())
    }

    /// Routes one checksum-valid frame
    fn dispatch(&mut self, topic: TopicId, length: usize, now: Instant) {
        match topic {
            TopicId::PUBLISHER => {
                debug!("negotiation requested by host");
                self.negotiate_topics();
                self.request_sync_time();
                self.clock.mark_negotiated(now);
            }
            TopicId::TIME => match Time::deserialize_from_bytes(self.parser.payload(length)) {
                Ok(stamp) => self.clock.apply_reply(now, stamp),
                Err(_) => warn!("sync reply dropped: malformed stamp"),
            },
            TopicId::PARAMETER_REQUEST => {
                match RequestParamResponse::deserialize_from_bytes(self.parser.payload(length)) {
                    Ok(response) => {
                        self.param_response = response;
                        self.param_received = true;
                    }
                    Err(_) => warn!("parameter response dropped: malformed record"),
                }
            }
            user => {
                let Some(index) = user.user_index() else {
                    trace!("frame on unhandled control channel dropped");
                    return;
                };
                let Self {
                    port,
                    output,
                    parser,
                    registry,
                    ..
                } = self;
                match registry.receiver_mut(index) {
                    Some(receiver) => {
                        let mut tx = LinkTx { port, output };
                        receiver.receive(parser.payload(length), &mut tx);
                    }
                    None => trace!("frame for unregistered receiver dropped"),
                }
            }
        }
    }

    /// Announces every registered endpoint to the host
    fn negotiate_topics(&mut self) {
        self.output.set_configured(true);

        let Self {
            port,
            output,
            registry,
            ..
        } = self;
        for entry in registry.publishers() {
            let info = TopicInfo {
                topic_id: entry.id.into_u16(),
                topic_name: entry.topic,
                message_type: entry.msg_type,
            };
            if output.publish(port, TopicId::PUBLISHER, &info).is_err() {
                warn!("publisher announcement for {} dropped", entry.topic);
            }
        }
        for receiver in registry.receivers() {
            let info = TopicInfo {
                topic_id: receiver.id().into_u16(),
                topic_name: receiver.topic_name(),
                message_type: receiver.msg_type(),
            };
            if output.publish(port, TopicId::SUBSCRIBER, &info).is_err() {
                warn!("subscriber announcement for {} dropped", receiver.topic_name());
            }
        }
    }

    /// Publishes an empty stamp and remembers when it was asked
    fn request_sync_time(&mut self) {
        if self
            .output
            .publish(&mut self.port, TopicId::TIME, &Time::default())
            .is_err()
        {
            warn!("sync request dropped");
        }
        let now = self.port.time();
        self.clock.mark_request(now);
    }

    fn log(&mut self, level: LogLevel, text: &str) {
        let record = Log { level, text };
        if self
            .output
            .publish(&mut self.port, TopicId::LOG, &record)
            .is_err()
        {
            warn!("log record dropped");
        }
    }

    /// Publishes the request, then re-enters the poll until the one-shot
    /// response signal fires or the deadline passes
    fn request_param(&mut self, name: &str, timeout: Duration) -> Result<(), ParamError> {
        self.param_received = false;
        self.output.publish(
            &mut self.port,
            TopicId::PARAMETER_REQUEST,
            &RequestParamRequest { name },
        )?;

        let start = self.port.time();
        loop {
            self.spin_once();
            if self.param_received {
                return Ok(());
            }
            if self.port.time().duration_since(start) >= timeout {
                return Err(ParamError::Timeout);
            }
        }
    }
}
