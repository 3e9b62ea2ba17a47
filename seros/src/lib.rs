//! # Seros
//!
//! This library lets a resource-constrained device participate as a node in
//! a publish/subscribe robotics middleware by speaking a framed byte
//! protocol over a point-to-point serial link to a host-side bridge. It
//! requires no allocator: every buffer and table is sized at compile time.
//!
//! The device publishes typed messages on named topics, dispatches inbound
//! messages to subscriber callbacks, answers service requests, keeps a wall
//! clock synchronized with the host, and fetches named parameters from it.
//!
//! ## Architecture
//!
//! ```text
//!             ┌──────────────┐
//!             │  NodeHandle  │ spin_once / advertise / subscribe /
//!             └──────┬───────┘ publish / log / get_param
//!                    │
//!    ┌─────────┬─────┴─────┬────────────┐
//!    ▼         ▼           ▼            ▼
//! ┌──────┐ ┌────────┐ ┌──────────┐ ┌─────────────┐
//! │Parser│ │ Output │ │ Registry │ │ SyncedClock │
//! └──┬───┘ └───┬────┘ └────┬─────┘ └─────────────┘
//!    │         │           │  ┌────────────────────┐
//!    │         │           ├─►│ Subscriber callback │
//!    │         │           │  └────────────────────┘
//!    │         │           │  ┌────────────────────┐
//!    │         │           └─►│ ServiceServer      │──► Output
//!    │         │              └────────────────────┘
//!    ▼         ▼
//! ┌────────────────┐
//! │      Port      │ non-blocking read/write + millisecond clock
//! └────────────────┘
//! ```
//!
//! Inbound bytes flow port → parser → dispatcher → control handler or user
//! receiver. Outbound messages flow endpoint → output encoder → port.
//!
//! ## Concurrency model
//!
//! Single threaded and cooperative. The application calls
//! [`node::NodeHandle::spin_once`] from its main loop; each poll does a
//! bounded amount of work and returns once the port read would block.
//! Nothing is pushed into the core from interrupts. The only call that spins
//! internally is the parameter lookup, which re-enters the poll until its
//! response arrives or its deadline passes.
//!
//! ## Wire format
//!
//! `FF FF id_lo id_hi len_lo len_hi <payload> ck`, with a one-byte additive
//! checksum over everything after the sync pair. Reserved low topic ids
//! carry negotiation, time sync, parameters, and logging; user endpoints are
//! assigned ids from 100 upward at registration time.
#![no_std]

pub use seros_core as core;
pub use seros_driver::{port, time};

// This mod MUST go first, so that the others see its macros.
pub(crate) mod fmt;

pub mod data_types;
pub mod endpoint;
mod format;
pub mod node;
mod output;
mod parser;
mod registry;
mod time_sync;

pub use endpoint::{Publisher, Receive, ServiceServer, Subscriber};
pub use node::{DEFAULT_PARAM_TIMEOUT, NodeHandle, ParamError};
pub use output::{PublishError, Tx};
pub use parser::MSG_TIMEOUT;
pub use registry::RegistrationError;
pub use time_sync::SYNC_SECONDS;
