//! (De)serializable representations of the built-in control messages
//!
//! This module includes only the types the node core exchanges with the host
//! bridge on the reserved channels. Application topic types come from the
//! user (generated or hand written against `seros_encoding`).

mod log;
mod param;
mod time;
mod topic_info;

pub use log::{Log, LogLevel};
pub use param::{
    PARAM_STRING_LENGTH, PARAM_VALUE_COUNT, ParamString, RequestParamRequest,
    RequestParamResponse,
};
pub use time::Time;
pub use topic_info::TopicInfo;
