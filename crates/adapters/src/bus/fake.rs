// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Recording bus for testing
//!
//! Every operation appends to an in-memory log instead of touching a
//! transport. Logs only grow; tests read them back through the accessors.
#![cfg_attr(coverage_nightly, coverage(off))]

use super::{Bus, BusError};
use chrono::{DateTime, TimeDelta, Utc};
use fb_core::{
    Address, BusConfig, Clock, Envelope, InstanceFactory, Message, MessageType, SystemClock,
};
use std::collections::BTreeMap;
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

/// Recorded point-to-point send
#[derive(Debug, Clone, PartialEq)]
pub struct SentMessage {
    pub destination: Option<Address>,
    pub correlation_id: Option<String>,
    pub message: Envelope,
}

impl SentMessage {
    pub fn new(
        destination: Option<Address>,
        correlation_id: Option<String>,
        message: impl Message,
    ) -> Self {
        Self {
            destination,
            correlation_id,
            message: Envelope::new(message),
        }
    }
}

/// Recorded deferred message
#[derive(Debug, Clone, PartialEq)]
pub struct DeferredMessage {
    pub deliver_at: DateTime<Utc>,
    pub message: Envelope,
}

impl DeferredMessage {
    pub fn new(deliver_at: DateTime<Utc>, message: impl Message) -> Self {
        Self {
            deliver_at,
            message: Envelope::new(message),
        }
    }
}

/// Recorded bus call, in invocation order
#[derive(Debug, Clone, PartialEq)]
pub enum BusCall {
    Publish {
        count: usize,
    },
    Subscribe {
        message_type: MessageType,
    },
    Unsubscribe {
        message_type: MessageType,
    },
    SendLocal {
        count: usize,
    },
    Send {
        destination: Option<Address>,
        correlation_id: Option<String>,
        count: usize,
    },
    SendToSites {
        site_keys: Vec<String>,
    },
    Defer {
        deliver_at: DateTime<Utc>,
        count: usize,
    },
    Reply {
        count: usize,
    },
    Return {
        code: String,
    },
    HandleCurrentMessageLater,
    ForwardCurrentMessageTo {
        destination: String,
    },
    DoNotContinueDispatching,
    SetOutgoingHeader {
        key: String,
        value: String,
    },
}

#[derive(Default)]
struct Logs {
    published: Vec<Envelope>,
    subscribed: Vec<MessageType>,
    unsubscribed: Vec<MessageType>,
    sent_local: Vec<Envelope>,
    sent: Vec<SentMessage>,
    deferred: Vec<DeferredMessage>,
    replies: Vec<Envelope>,
    headers: BTreeMap<String, String>,
    calls: Vec<BusCall>,
}

/// Fake bus that records every call.
///
/// Clones share the same logs, so a clone handed to the code under test
/// can be inspected through the original.
#[derive(Clone)]
pub struct FakeBus<C = SystemClock> {
    clock: C,
    factory: Arc<InstanceFactory>,
    logs: Arc<Mutex<Logs>>,
}

impl FakeBus<SystemClock> {
    pub fn new() -> Self {
        Self::with_clock(SystemClock)
    }
}

impl Default for FakeBus<SystemClock> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: Clock> FakeBus<C> {
    /// Fake bus reading deferred delivery times from `clock`
    pub fn with_clock(clock: C) -> Self {
        Self {
            clock,
            factory: Arc::new(InstanceFactory::new()),
            logs: Arc::new(Mutex::new(Logs::default())),
        }
    }

    /// Use `factory` for every message built from a type
    pub fn with_factory(mut self, factory: InstanceFactory) -> Self {
        self.factory = Arc::new(factory);
        self
    }

    /// Seed the bus from configuration
    pub fn with_config(self, config: BusConfig) -> Self {
        self.lock().headers.extend(config.outgoing_headers);
        self
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    /// Get all published messages
    pub fn published(&self) -> Vec<Envelope> {
        self.lock().published.clone()
    }

    pub fn subscribed(&self) -> Vec<MessageType> {
        self.lock().subscribed.clone()
    }

    pub fn unsubscribed(&self) -> Vec<MessageType> {
        self.lock().unsubscribed.clone()
    }

    pub fn sent_local(&self) -> Vec<Envelope> {
        self.lock().sent_local.clone()
    }

    /// Get all point-to-point sends
    pub fn sent(&self) -> Vec<SentMessage> {
        self.lock().sent.clone()
    }

    pub fn deferred(&self) -> Vec<DeferredMessage> {
        self.lock().deferred.clone()
    }

    pub fn replies(&self) -> Vec<Envelope> {
        self.lock().replies.clone()
    }

    /// Get all recorded calls, including ones that failed
    pub fn calls(&self) -> Vec<BusCall> {
        self.lock().calls.clone()
    }

    /// Published messages of type `T`, in publish order
    pub fn published_of<T: Message + Clone>(&self) -> Vec<T> {
        of_type(&self.lock().published)
    }

    pub fn sent_local_of<T: Message + Clone>(&self) -> Vec<T> {
        of_type(&self.lock().sent_local)
    }

    pub fn replies_of<T: Message + Clone>(&self) -> Vec<T> {
        of_type(&self.lock().replies)
    }

    pub fn is_subscribed<T: Message>(&self) -> bool {
        self.lock().subscribed.iter().any(MessageType::is::<T>)
    }

    fn lock(&self) -> MutexGuard<'_, Logs> {
        self.logs.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn unsupported(&self, call: BusCall, operation: &'static str) -> Result<(), BusError> {
        self.lock().calls.push(call);
        Err(BusError::not_implemented(operation))
    }
}

fn of_type<T: Message + Clone>(log: &[Envelope]) -> Vec<T> {
    log.iter()
        .filter_map(|e| e.downcast_ref::<T>())
        .cloned()
        .collect()
}

fn wrap<I>(messages: I) -> Vec<Envelope>
where
    I: IntoIterator,
    I::Item: Message,
{
    messages.into_iter().map(Envelope::new).collect()
}

impl<C: Clock> Bus for FakeBus<C> {
    fn create_instance<T: Message + Default>(&self) -> Result<T, BusError> {
        Ok(self.factory.create::<T>()?)
    }

    fn create_instance_of(&self, message_type: &MessageType) -> Result<Envelope, BusError> {
        Ok(self.factory.create_of(message_type)?)
    }

    fn publish_all<I>(&self, messages: I) -> Result<(), BusError>
    where
        I: IntoIterator,
        I::Item: Message,
    {
        let messages = wrap(messages);
        let mut logs = self.lock();
        logs.calls.push(BusCall::Publish {
            count: messages.len(),
        });
        logs.published.extend(messages);
        Ok(())
    }

    fn subscribe_type(&self, message_type: MessageType) -> Result<(), BusError> {
        let mut logs = self.lock();
        logs.calls.push(BusCall::Subscribe { message_type });
        logs.subscribed.push(message_type);
        Ok(())
    }

    fn unsubscribe_type(&self, message_type: MessageType) -> Result<(), BusError> {
        let mut logs = self.lock();
        logs.calls.push(BusCall::Unsubscribe { message_type });
        logs.unsubscribed.push(message_type);
        Ok(())
    }

    fn send_local_all<I>(&self, messages: I) -> Result<(), BusError>
    where
        I: IntoIterator,
        I::Item: Message,
    {
        let messages = wrap(messages);
        let mut logs = self.lock();
        logs.calls.push(BusCall::SendLocal {
            count: messages.len(),
        });
        logs.sent_local.extend(messages);
        Ok(())
    }

    fn send_routed<I>(
        &self,
        destination: Option<Address>,
        correlation_id: Option<String>,
        messages: I,
    ) -> Result<(), BusError>
    where
        I: IntoIterator,
        I::Item: Message,
    {
        let messages = wrap(messages);
        let mut logs = self.lock();
        logs.calls.push(BusCall::Send {
            destination: destination.clone(),
            correlation_id: correlation_id.clone(),
            count: messages.len(),
        });
        logs.sent.extend(messages.into_iter().map(|message| SentMessage {
            destination: destination.clone(),
            correlation_id: correlation_id.clone(),
            message,
        }));
        Ok(())
    }

    fn send_to_sites<S, I>(&self, site_keys: S, _messages: I) -> Result<(), BusError>
    where
        S: IntoIterator,
        S::Item: AsRef<str>,
        I: IntoIterator,
        I::Item: Message,
    {
        let site_keys = site_keys
            .into_iter()
            .map(|key| key.as_ref().to_string())
            .collect();
        self.unsupported(BusCall::SendToSites { site_keys }, "send_to_sites")
    }

    fn defer_all_until<I>(&self, deliver_at: DateTime<Utc>, messages: I) -> Result<(), BusError>
    where
        I: IntoIterator,
        I::Item: Message,
    {
        let messages = wrap(messages);
        let mut logs = self.lock();
        logs.calls.push(BusCall::Defer {
            deliver_at,
            count: messages.len(),
        });
        logs.deferred.extend(
            messages
                .into_iter()
                .map(|message| DeferredMessage { deliver_at, message }),
        );
        Ok(())
    }

    fn defer_all<I>(&self, delay: Duration, messages: I) -> Result<(), BusError>
    where
        I: IntoIterator,
        I::Item: Message,
    {
        // Delivery time is fixed here, not when the log is read
        let deliver_at = TimeDelta::from_std(delay)
            .ok()
            .and_then(|delta| self.clock.now().checked_add_signed(delta))
            .ok_or(BusError::DelayOutOfRange(delay))?;
        self.defer_all_until(deliver_at, messages)
    }

    fn reply_all<I>(&self, messages: I) -> Result<(), BusError>
    where
        I: IntoIterator,
        I::Item: Message,
    {
        let messages = wrap(messages);
        let mut logs = self.lock();
        logs.calls.push(BusCall::Reply {
            count: messages.len(),
        });
        logs.replies.extend(messages);
        Ok(())
    }

    fn return_code<T: fmt::Debug>(&self, code: T) -> Result<(), BusError> {
        let code = format!("{:?}", code);
        self.unsupported(BusCall::Return { code }, "return")
    }

    fn handle_current_message_later(&self) -> Result<(), BusError> {
        self.unsupported(
            BusCall::HandleCurrentMessageLater,
            "handle_current_message_later",
        )
    }

    fn forward_current_message_to(&self, destination: &str) -> Result<(), BusError> {
        self.unsupported(
            BusCall::ForwardCurrentMessageTo {
                destination: destination.to_string(),
            },
            "forward_current_message_to",
        )
    }

    fn do_not_continue_dispatching_current_message_to_handlers(&self) -> Result<(), BusError> {
        self.unsupported(
            BusCall::DoNotContinueDispatching,
            "do_not_continue_dispatching_current_message_to_handlers",
        )
    }

    fn outgoing_headers(&self) -> BTreeMap<String, String> {
        self.lock().headers.clone()
    }

    fn set_outgoing_header(&self, key: &str, value: &str) {
        let mut logs = self.lock();
        logs.calls.push(BusCall::SetOutgoingHeader {
            key: key.to_string(),
            value: value.to_string(),
        });
        logs.headers.insert(key.to_string(), value.to_string());
    }
}

#[cfg(test)]
#[path = "fake_tests.rs"]
mod tests;
