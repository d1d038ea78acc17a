//! Recording specs
//!
//! Verify each operation lands in its own log, in call order.

use crate::prelude::*;
use similar_asserts::assert_eq;

#[test]
fn end_to_end_scenario() {
    let bus = recorder();

    bus.publish(MsgA { id: 1 }).unwrap();
    bus.subscribe::<TypeB>().unwrap();
    bus.send_to("queue1", MsgC { body: "hi".into() }).unwrap();
    bus.defer(Duration::from_secs(5 * 60), MsgD::default())
        .unwrap();

    assert_eq!(bus.published(), vec![Envelope::new(MsgA { id: 1 })]);
    assert_eq!(bus.subscribed(), vec![MessageType::of::<TypeB>()]);
    assert_eq!(
        bus.sent(),
        vec![SentMessage::new(
            Some(address("queue1")),
            None,
            MsgC { body: "hi".into() }
        )]
    );
    assert_eq!(
        bus.deferred(),
        vec![DeferredMessage::new(
            now() + TimeDelta::minutes(5),
            MsgD::default()
        )]
    );
    assert!(bus.unsubscribed().is_empty());
    assert!(bus.sent_local().is_empty());
    assert!(bus.replies().is_empty());
}

#[test]
fn logs_only_grow() {
    let bus = recorder();

    bus.publish(MsgA { id: 1 }).unwrap();
    let first = bus.published();
    bus.publish(MsgA { id: 2 }).unwrap();
    let second = bus.published();

    assert_eq!(second.len(), 2);
    assert_eq!(&second[..1], &first[..]);
}

#[test]
fn deferring_twice_with_same_delay_at_different_times() {
    let bus = recorder();
    let delay = Duration::from_secs(30);

    bus.defer(delay, MsgD::default()).unwrap();
    bus.clock().advance(Duration::from_secs(1));
    bus.defer(delay, MsgD::default()).unwrap();

    let deferred = bus.deferred();
    assert_eq!(deferred.len(), 2);
    assert!(deferred[1].deliver_at > deferred[0].deliver_at);
}

#[test]
fn string_and_address_destinations_match() {
    let bus = recorder();

    bus.send_to("queue1@ops", MsgC::default()).unwrap();
    bus.send_to(address("queue1@ops"), MsgC::default()).unwrap();

    let sent = bus.sent();
    assert_eq!(sent[0], sent[1]);
}

#[test]
fn conditional_subscribe_leaves_unsubscriptions_alone() {
    let bus = recorder();

    bus.subscribe_if(|a: &MsgA| a.id == 1).unwrap();
    bus.subscribe_if(|a: &MsgA| a.id == 0).unwrap();

    assert_eq!(bus.subscribed(), vec![MessageType::of::<MsgA>()]);
    assert!(bus.unsubscribed().is_empty());
}

#[test]
fn traced_recorder_records_the_same() {
    let bus = recorder();
    let traced = TracedBus::new(bus.clone());

    traced.publish(MsgA { id: 9 }).unwrap();
    traced.send(MsgC::default()).unwrap();

    assert_eq!(bus.published_of::<MsgA>(), vec![MsgA { id: 9 }]);
    assert_eq!(bus.sent(), vec![SentMessage::new(None, None, MsgC::default())]);
}
