//! Application-shaped specs
//!
//! A small service written against `Bus`, the way production code would be,
//! exercised with the recorder standing in for the transport.

use crate::prelude::*;
use similar_asserts::assert_eq;

#[derive(Debug, Default, Clone, PartialEq)]
pub struct PlaceOrder {
    pub order_id: u32,
    pub express: bool,
}

#[derive(Debug, Default, Clone, PartialEq)]
pub struct OrderAccepted {
    pub order_id: u32,
}

#[derive(Debug, Default, Clone, PartialEq)]
pub struct ShipOrder {
    pub order_id: u32,
    pub express: bool,
}

#[derive(Debug, Default, Clone, PartialEq)]
pub struct ExpireOrder {
    pub order_id: u32,
}

struct OrderService<B> {
    bus: B,
}

impl<B: Bus> OrderService<B> {
    fn handle(&self, command: &PlaceOrder) -> Result<(), BusError> {
        self.bus.reply_with(|m: &mut OrderAccepted| m.order_id = command.order_id)?;
        self.bus.publish(OrderAccepted {
            order_id: command.order_id,
        })?;
        self.bus.send_correlated(
            "shipping",
            format!("order-{}", command.order_id),
            ShipOrder {
                order_id: command.order_id,
                express: command.express,
            },
        )?;
        self.bus.defer(
            Duration::from_secs(24 * 60 * 60),
            ExpireOrder {
                order_id: command.order_id,
            },
        )
    }
}

#[test]
fn placing_an_order_replies_publishes_ships_and_schedules_expiry() {
    let bus = recorder();
    let service = OrderService { bus: bus.clone() };

    service
        .handle(&PlaceOrder {
            order_id: 12,
            express: true,
        })
        .unwrap();

    assert_eq!(bus.replies_of::<OrderAccepted>(), vec![OrderAccepted { order_id: 12 }]);
    assert_eq!(bus.published_of::<OrderAccepted>(), vec![OrderAccepted { order_id: 12 }]);
    assert_eq!(
        bus.sent(),
        vec![SentMessage::new(
            Some(address("shipping")),
            Some("order-12".to_string()),
            ShipOrder {
                order_id: 12,
                express: true
            }
        )]
    );
    assert_eq!(
        bus.deferred(),
        vec![DeferredMessage::new(
            now() + TimeDelta::days(1),
            ExpireOrder { order_id: 12 }
        )]
    );
}

#[test]
fn call_log_reflects_handler_order() {
    let bus = recorder();
    let service = OrderService { bus: bus.clone() };

    service.handle(&PlaceOrder::default()).unwrap();

    let kinds: Vec<&str> = bus
        .calls()
        .iter()
        .map(|call| match call {
            BusCall::Reply { .. } => "reply",
            BusCall::Publish { .. } => "publish",
            BusCall::Send { .. } => "send",
            BusCall::Defer { .. } => "defer",
            other => panic!("unexpected call: {:?}", other),
        })
        .collect();
    assert_eq!(kinds, vec!["reply", "publish", "send", "defer"]);
}
