//! Unsupported operation specs
//!
//! Verify the deliberately unimplemented slots fail on every call.

use crate::prelude::*;
use similar_asserts::assert_eq;

#[test]
fn send_to_sites_fails_for_any_input() {
    let bus = recorder();

    let empty = bus.send_to_sites(Vec::<&str>::new(), Vec::<MsgA>::new());
    let full = bus.send_to_sites(["east", "west"], [MsgA { id: 1 }]);

    assert!(empty.unwrap_err().is_not_implemented());
    assert!(full.unwrap_err().is_not_implemented());
    assert!(bus.sent().is_empty());
}

#[test]
fn return_fails_for_any_code() {
    let bus = recorder();

    assert!(bus.return_code(0).unwrap_err().is_not_implemented());
    assert!(bus.return_code("").unwrap_err().is_not_implemented());
}

#[test]
fn current_message_operations_fail() {
    let bus = recorder();

    for result in [
        bus.handle_current_message_later(),
        bus.forward_current_message_to("audit"),
        bus.do_not_continue_dispatching_current_message_to_handlers(),
    ] {
        assert!(matches!(result, Err(BusError::NotImplemented { .. })));
    }
    assert_eq!(bus.calls().len(), 3);
}
