// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Message bus capability
//!
//! `Bus` is the surface application code talks to. Each log-bearing
//! operation has one canonical method that implementations provide; every
//! other call shape is a provided method that forwards to it.

mod noop;

pub use noop::NoOpBus;

// Test support - only compiled for tests or when explicitly requested
#[cfg(any(test, feature = "test-support"))]
mod fake;
#[cfg(any(test, feature = "test-support"))]
pub use fake::{BusCall, DeferredMessage, FakeBus, SentMessage};

use chrono::{DateTime, Utc};
use fb_core::{
    Address, AddressError, Envelope, InstantiationError, IntoAddress, Message, MessageType,
};
use std::collections::BTreeMap;
use std::fmt;
use std::time::Duration;
use thiserror::Error;

/// Errors from bus operations
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BusError {
    #[error("{operation} is not supported by this bus")]
    NotImplemented { operation: &'static str },
    #[error(transparent)]
    Instantiation(#[from] InstantiationError),
    #[error("invalid destination: {0}")]
    Address(#[from] AddressError),
    #[error("delay out of range: {0:?}")]
    DelayOutOfRange(Duration),
}

impl BusError {
    pub(crate) fn not_implemented(operation: &'static str) -> Self {
        Self::NotImplemented { operation }
    }

    pub fn is_not_implemented(&self) -> bool {
        matches!(self, Self::NotImplemented { .. })
    }
}

/// Adapter for publishing and sending messages
pub trait Bus: Clone + Send + Sync + 'static {
    /// Build a fresh `T` the way this bus builds messages
    fn create_instance<T: Message + Default>(&self) -> Result<T, BusError>;

    /// Build an instance of the type a descriptor names
    fn create_instance_of(&self, message_type: &MessageType) -> Result<Envelope, BusError>;

    /// Publish each message in order
    fn publish_all<I>(&self, messages: I) -> Result<(), BusError>
    where
        I: IntoIterator,
        I::Item: Message;

    fn subscribe_type(&self, message_type: MessageType) -> Result<(), BusError>;

    fn unsubscribe_type(&self, message_type: MessageType) -> Result<(), BusError>;

    /// Send each message to this endpoint's own queue
    fn send_local_all<I>(&self, messages: I) -> Result<(), BusError>
    where
        I: IntoIterator,
        I::Item: Message;

    /// Send each message point-to-point.
    ///
    /// `None` leaves the destination or correlation id unset.
    fn send_routed<I>(
        &self,
        destination: Option<Address>,
        correlation_id: Option<String>,
        messages: I,
    ) -> Result<(), BusError>
    where
        I: IntoIterator,
        I::Item: Message;

    fn send_to_sites<S, I>(&self, site_keys: S, messages: I) -> Result<(), BusError>
    where
        S: IntoIterator,
        S::Item: AsRef<str>,
        I: IntoIterator,
        I::Item: Message;

    /// Defer each message for delivery at `deliver_at`
    fn defer_all_until<I>(&self, deliver_at: DateTime<Utc>, messages: I) -> Result<(), BusError>
    where
        I: IntoIterator,
        I::Item: Message;

    /// Defer each message by `delay`, resolved against the bus clock at call time
    fn defer_all<I>(&self, delay: Duration, messages: I) -> Result<(), BusError>
    where
        I: IntoIterator,
        I::Item: Message;

    fn reply_all<I>(&self, messages: I) -> Result<(), BusError>
    where
        I: IntoIterator,
        I::Item: Message;

    /// Return a status code to the sender of the current message
    fn return_code<C: fmt::Debug>(&self, code: C) -> Result<(), BusError>;

    fn handle_current_message_later(&self) -> Result<(), BusError>;

    fn forward_current_message_to(&self, destination: &str) -> Result<(), BusError>;

    fn do_not_continue_dispatching_current_message_to_handlers(&self) -> Result<(), BusError>;

    /// Headers attached to every outgoing message
    fn outgoing_headers(&self) -> BTreeMap<String, String>;

    fn set_outgoing_header(&self, key: &str, value: &str);

    // Provided call shapes forward to the methods above

    /// Build a fresh `T` and run `init` on it
    fn create_instance_with<T, F>(&self, init: F) -> Result<T, BusError>
    where
        T: Message + Default,
        F: FnOnce(&mut T),
    {
        let mut instance = self.create_instance::<T>()?;
        init(&mut instance);
        Ok(instance)
    }

    fn publish<M: Message>(&self, message: M) -> Result<(), BusError> {
        self.publish_all([message])
    }

    fn publish_with<T, F>(&self, init: F) -> Result<(), BusError>
    where
        T: Message + Default,
        F: FnOnce(&mut T),
    {
        let message = self.create_instance_with(init)?;
        self.publish(message)
    }

    /// Publish a default instance of the described type
    fn publish_type(&self, message_type: &MessageType) -> Result<(), BusError> {
        let message = self.create_instance_of(message_type)?;
        self.publish(message)
    }

    /// Subscribe to `T`.
    ///
    /// Types without `Default` go through [`subscribe_type`](Self::subscribe_type)
    /// with [`MessageType::opaque`].
    fn subscribe<T: Message + Default>(&self) -> Result<(), BusError> {
        self.subscribe_type(MessageType::of::<T>())
    }

    /// Subscribe only if `condition` accepts a freshly built probe instance.
    ///
    /// The probe is dropped afterwards.
    fn subscribe_if<T, F>(&self, condition: F) -> Result<(), BusError>
    where
        T: Message + Default,
        F: FnOnce(&T) -> bool,
    {
        let probe = self.create_instance::<T>()?;
        if condition(&probe) {
            self.subscribe_type(MessageType::of::<T>())
        } else {
            Ok(())
        }
    }

    fn subscribe_type_if<F>(&self, message_type: MessageType, condition: F) -> Result<(), BusError>
    where
        F: FnOnce(&Envelope) -> bool,
    {
        let probe = self.create_instance_of(&message_type)?;
        if condition(&probe) {
            self.subscribe_type(message_type)
        } else {
            Ok(())
        }
    }

    fn unsubscribe<T: Message + Default>(&self) -> Result<(), BusError> {
        self.unsubscribe_type(MessageType::of::<T>())
    }

    fn send_local<M: Message>(&self, message: M) -> Result<(), BusError> {
        self.send_local_all([message])
    }

    fn send_local_with<T, F>(&self, init: F) -> Result<(), BusError>
    where
        T: Message + Default,
        F: FnOnce(&mut T),
    {
        let message = self.create_instance_with(init)?;
        self.send_local(message)
    }

    fn send<M: Message>(&self, message: M) -> Result<(), BusError> {
        self.send_routed(None, None, [message])
    }

    fn send_all<I>(&self, messages: I) -> Result<(), BusError>
    where
        I: IntoIterator,
        I::Item: Message,
    {
        self.send_routed(None, None, messages)
    }

    fn send_with<T, F>(&self, init: F) -> Result<(), BusError>
    where
        T: Message + Default,
        F: FnOnce(&mut T),
    {
        let message = self.create_instance_with(init)?;
        self.send(message)
    }

    fn send_to<A, M>(&self, destination: A, message: M) -> Result<(), BusError>
    where
        A: IntoAddress,
        M: Message,
    {
        self.send_all_to(destination, [message])
    }

    fn send_all_to<A, I>(&self, destination: A, messages: I) -> Result<(), BusError>
    where
        A: IntoAddress,
        I: IntoIterator,
        I::Item: Message,
    {
        self.send_routed(Some(destination.into_address()?), None, messages)
    }

    fn send_with_to<A, T, F>(&self, destination: A, init: F) -> Result<(), BusError>
    where
        A: IntoAddress,
        T: Message + Default,
        F: FnOnce(&mut T),
    {
        let destination = destination.into_address()?;
        let message = self.create_instance_with(init)?;
        self.send_all_to(destination, [message])
    }

    fn send_correlated<A, M>(
        &self,
        destination: A,
        correlation_id: impl Into<String>,
        message: M,
    ) -> Result<(), BusError>
    where
        A: IntoAddress,
        M: Message,
    {
        self.send_all_correlated(destination, correlation_id, [message])
    }

    fn send_all_correlated<A, I>(
        &self,
        destination: A,
        correlation_id: impl Into<String>,
        messages: I,
    ) -> Result<(), BusError>
    where
        A: IntoAddress,
        I: IntoIterator,
        I::Item: Message,
    {
        self.send_routed(
            Some(destination.into_address()?),
            Some(correlation_id.into()),
            messages,
        )
    }

    fn send_with_correlated<A, T, F>(
        &self,
        destination: A,
        correlation_id: impl Into<String>,
        init: F,
    ) -> Result<(), BusError>
    where
        A: IntoAddress,
        T: Message + Default,
        F: FnOnce(&mut T),
    {
        let destination = destination.into_address()?;
        let message = self.create_instance_with(init)?;
        self.send_all_correlated(destination, correlation_id, [message])
    }

    fn defer<M: Message>(&self, delay: Duration, message: M) -> Result<(), BusError> {
        self.defer_all(delay, [message])
    }

    fn defer_until<M>(&self, deliver_at: DateTime<Utc>, message: M) -> Result<(), BusError>
    where
        M: Message,
    {
        self.defer_all_until(deliver_at, [message])
    }

    fn reply<M: Message>(&self, message: M) -> Result<(), BusError> {
        self.reply_all([message])
    }

    fn reply_with<T, F>(&self, init: F) -> Result<(), BusError>
    where
        T: Message + Default,
        F: FnOnce(&mut T),
    {
        let message = self.create_instance_with(init)?;
        self.reply(message)
    }
}
