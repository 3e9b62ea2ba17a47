mod common;

use common::{ScriptedPort, param_response_ints, param_response_strings, split_frames};
use seros::data_types::ParamString;
use seros::time::Duration;
use seros::{NodeHandle, ParamError};

#[test]
fn test_get_param_int() {
    let mut node: NodeHandle<ScriptedPort> = NodeHandle::new(ScriptedPort::ticking());

    // The host's response is already queued when the lookup polls.
    let response = param_response_ints(&[42, 7]);
    node.port().feed_frame(6, &response);

    let mut values = [0i32; 2];
    node.get_param_int("wheel_radius", &mut values, Duration::from_millis(100))
        .unwrap();
    assert_eq!(values, [42, 7]);

    // The request itself went out on the parameter channel.
    let frames = split_frames(&node.port().tx);
    assert_eq!(frames[0].0, 6);
    assert_eq!(&frames[0].1[4..], b"wheel_radius");
}

#[test]
fn test_get_param_string() {
    let mut node: NodeHandle<ScriptedPort> = NodeHandle::new(ScriptedPort::ticking());
    node.port()
        .feed_frame(6, &param_response_strings(&["base_link"]));

    let mut values = [ParamString::new()];
    node.get_param_string("frame_id", &mut values, Duration::from_millis(100))
        .unwrap();
    assert_eq!(values[0], "base_link");
}

#[test]
fn test_get_param_timeout() {
    let mut node: NodeHandle<ScriptedPort> = NodeHandle::new(ScriptedPort::ticking());

    let mut values = [0i32; 1];
    let result = node.get_param_int("missing", &mut values, Duration::from_millis(30));
    assert_eq!(result, Err(ParamError::Timeout));

    // The lookup gave up close to its deadline, not long after.
    let elapsed = node.port().now_millis();
    assert!((30..=45).contains(&elapsed), "gave up after {} ms", elapsed);
}

#[test]
fn test_get_param_count_mismatch() {
    let mut node: NodeHandle<ScriptedPort> = NodeHandle::new(ScriptedPort::ticking());
    node.port().feed_frame(6, &param_response_ints(&[1]));

    let mut values = [0i32; 2];
    let result = node.get_param_int("wheels", &mut values, Duration::from_millis(100));
    assert_eq!(result, Err(ParamError::CountMismatch));
    assert_eq!(values, [0, 0]);
}
