// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! No-op bus for code paths that need a bus but nothing observable.

use super::{Bus, BusError};
use chrono::{DateTime, Utc};
use fb_core::{Address, Envelope, InstanceFactory, Message, MessageType};
use std::collections::BTreeMap;
use std::fmt;
use std::time::Duration;

/// Bus that accepts every message and drops it.
///
/// Messages are still built from types, so construction failures surface.
/// Operations the fake rejects are rejected here too.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoOpBus;

impl NoOpBus {
    pub fn new() -> Self {
        Self
    }
}

impl Bus for NoOpBus {
    fn create_instance<T: Message + Default>(&self) -> Result<T, BusError> {
        Ok(InstanceFactory::new().create::<T>()?)
    }

    fn create_instance_of(&self, message_type: &MessageType) -> Result<Envelope, BusError> {
        Ok(InstanceFactory::new().create_of(message_type)?)
    }

    fn publish_all<I>(&self, _messages: I) -> Result<(), BusError>
    where
        I: IntoIterator,
        I::Item: Message,
    {
        Ok(())
    }

    fn subscribe_type(&self, _message_type: MessageType) -> Result<(), BusError> {
        Ok(())
    }

    fn unsubscribe_type(&self, _message_type: MessageType) -> Result<(), BusError> {
        Ok(())
    }

    fn send_local_all<I>(&self, _messages: I) -> Result<(), BusError>
    where
        I: IntoIterator,
        I::Item: Message,
    {
        Ok(())
    }

    fn send_routed<I>(
        &self,
        _destination: Option<Address>,
        _correlation_id: Option<String>,
        _messages: I,
    ) -> Result<(), BusError>
    where
        I: IntoIterator,
        I::Item: Message,
    {
        Ok(())
    }

    fn send_to_sites<S, I>(&self, _site_keys: S, _messages: I) -> Result<(), BusError>
    where
        S: IntoIterator,
        S::Item: AsRef<str>,
        I: IntoIterator,
        I::Item: Message,
    {
        Err(BusError::not_implemented("send_to_sites"))
    }

    fn defer_all_until<I>(&self, _deliver_at: DateTime<Utc>, _messages: I) -> Result<(), BusError>
    where
        I: IntoIterator,
        I::Item: Message,
    {
        Ok(())
    }

    fn defer_all<I>(&self, _delay: Duration, _messages: I) -> Result<(), BusError>
    where
        I: IntoIterator,
        I::Item: Message,
    {
        Ok(())
    }

    fn reply_all<I>(&self, _messages: I) -> Result<(), BusError>
    where
        I: IntoIterator,
        I::Item: Message,
    {
        Ok(())
    }

    fn return_code<C: fmt::Debug>(&self, _code: C) -> Result<(), BusError> {
        Err(BusError::not_implemented("return"))
    }

    fn handle_current_message_later(&self) -> Result<(), BusError> {
        Err(BusError::not_implemented("handle_current_message_later"))
    }

    fn forward_current_message_to(&self, _destination: &str) -> Result<(), BusError> {
        Err(BusError::not_implemented("forward_current_message_to"))
    }

    fn do_not_continue_dispatching_current_message_to_handlers(&self) -> Result<(), BusError> {
        Err(BusError::not_implemented(
            "do_not_continue_dispatching_current_message_to_handlers",
        ))
    }

    fn outgoing_headers(&self) -> BTreeMap<String, String> {
        BTreeMap::new()
    }

    fn set_outgoing_header(&self, _key: &str, _value: &str) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Default, PartialEq)]
    struct Ping;

    #[derive(Debug, PartialEq)]
    struct Opaque(u8);

    #[test]
    fn noop_accepts_recordable_operations() {
        let bus = NoOpBus::new();

        assert!(bus.publish(Ping).is_ok());
        assert!(bus.subscribe::<Ping>().is_ok());
        assert!(bus.send_to("queue1", Ping).is_ok());
        assert!(bus.defer(Duration::from_secs(60), Ping).is_ok());
        assert!(bus.reply_with(|_: &mut Ping| {}).is_ok());
        assert!(bus.outgoing_headers().is_empty());
    }

    #[test]
    fn noop_still_rejects_unsupported_operations() {
        let bus = NoOpBus::new();

        assert!(bus.return_code(1).unwrap_err().is_not_implemented());
        assert!(bus
            .send_to_sites(["site-a"], [Ping])
            .unwrap_err()
            .is_not_implemented());
    }

    #[test]
    fn noop_surfaces_construction_failures() {
        let bus = NoOpBus::new();
        let err = bus
            .publish_type(&MessageType::opaque::<Opaque>())
            .unwrap_err();
        assert!(matches!(err, BusError::Instantiation(_)));
    }

    #[test]
    fn noop_surfaces_bad_destinations() {
        let bus = NoOpBus::new();
        assert!(matches!(
            bus.send_to("", Ping).unwrap_err(),
            BusError::Address(_)
        ));
    }
}
