// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Traced bus wrapper for consistent observability

use crate::bus::{Bus, BusError};
use chrono::{DateTime, Utc};
use fb_core::{Address, Envelope, Message, MessageType};
use std::collections::BTreeMap;
use std::fmt;
use std::time::Duration;

/// Wrapper that adds tracing to any Bus
#[derive(Clone)]
pub struct TracedBus<B> {
    inner: B,
}

impl<B> TracedBus<B> {
    pub fn new(inner: B) -> Self {
        Self { inner }
    }

    pub fn inner(&self) -> &B {
        &self.inner
    }
}

fn collect<I>(messages: I) -> Vec<Envelope>
where
    I: IntoIterator,
    I::Item: Message,
{
    messages.into_iter().map(Envelope::new).collect()
}

fn report(result: &Result<(), BusError>, done: &str) {
    match result {
        Ok(()) => tracing::debug!("{}", done),
        Err(e) => tracing::error!(error = %e, "failed"),
    }
}

fn report_unsupported(result: &Result<(), BusError>) {
    if let Err(e) = result {
        tracing::warn!(error = %e, "unsupported operation invoked");
    }
}

impl<B: Bus> Bus for TracedBus<B> {
    fn create_instance<T: Message + Default>(&self) -> Result<T, BusError> {
        let result = self.inner.create_instance::<T>();
        if let Err(e) = &result {
            tracing::error!(
                message_type = std::any::type_name::<T>(),
                error = %e,
                "instantiation failed"
            );
        }
        result
    }

    fn create_instance_of(&self, message_type: &MessageType) -> Result<Envelope, BusError> {
        let result = self.inner.create_instance_of(message_type);
        match &result {
            Ok(_) => tracing::trace!(%message_type, "instantiated"),
            Err(e) => tracing::error!(%message_type, error = %e, "instantiation failed"),
        }
        result
    }

    fn publish_all<I>(&self, messages: I) -> Result<(), BusError>
    where
        I: IntoIterator,
        I::Item: Message,
    {
        let messages = collect(messages);
        let span = tracing::info_span!("bus.publish", count = messages.len());
        let _guard = span.enter();

        let result = self.inner.publish_all(messages);
        report(&result, "published");
        result
    }

    fn subscribe_type(&self, message_type: MessageType) -> Result<(), BusError> {
        let span = tracing::info_span!("bus.subscribe", %message_type);
        let _guard = span.enter();

        let result = self.inner.subscribe_type(message_type);
        report(&result, "subscribed");
        result
    }

    fn unsubscribe_type(&self, message_type: MessageType) -> Result<(), BusError> {
        let span = tracing::info_span!("bus.unsubscribe", %message_type);
        let _guard = span.enter();

        let result = self.inner.unsubscribe_type(message_type);
        report(&result, "unsubscribed");
        result
    }

    fn send_local_all<I>(&self, messages: I) -> Result<(), BusError>
    where
        I: IntoIterator,
        I::Item: Message,
    {
        let messages = collect(messages);
        let span = tracing::info_span!("bus.send_local", count = messages.len());
        let _guard = span.enter();

        let result = self.inner.send_local_all(messages);
        report(&result, "sent locally");
        result
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
        let messages = collect(messages);
        let span = tracing::info_span!(
            "bus.send",
            destination = destination.as_ref().map(|d| d.to_string()).as_deref(),
            correlation_id = correlation_id.as_deref(),
            count = messages.len()
        );
        let _guard = span.enter();

        let result = self.inner.send_routed(destination, correlation_id, messages);
        report(&result, "sent");
        result
    }

    fn send_to_sites<S, I>(&self, site_keys: S, messages: I) -> Result<(), BusError>
    where
        S: IntoIterator,
        S::Item: AsRef<str>,
        I: IntoIterator,
        I::Item: Message,
    {
        let site_keys: Vec<String> = site_keys
            .into_iter()
            .map(|key| key.as_ref().to_string())
            .collect();
        let span = tracing::info_span!("bus.send_to_sites", sites = ?site_keys);
        let _guard = span.enter();

        let result = self.inner.send_to_sites(site_keys, messages);
        report_unsupported(&result);
        result
    }

    fn defer_all_until<I>(&self, deliver_at: DateTime<Utc>, messages: I) -> Result<(), BusError>
    where
        I: IntoIterator,
        I::Item: Message,
    {
        let messages = collect(messages);
        let span = tracing::info_span!("bus.defer", %deliver_at, count = messages.len());
        let _guard = span.enter();

        let result = self.inner.defer_all_until(deliver_at, messages);
        report(&result, "deferred");
        result
    }

    fn defer_all<I>(&self, delay: Duration, messages: I) -> Result<(), BusError>
    where
        I: IntoIterator,
        I::Item: Message,
    {
        let messages = collect(messages);
        let span = tracing::info_span!(
            "bus.defer",
            delay_ms = delay.as_millis() as u64,
            count = messages.len()
        );
        let _guard = span.enter();

        let result = self.inner.defer_all(delay, messages);
        report(&result, "deferred");
        result
    }

    fn reply_all<I>(&self, messages: I) -> Result<(), BusError>
    where
        I: IntoIterator,
        I::Item: Message,
    {
        let messages = collect(messages);
        let span = tracing::info_span!("bus.reply", count = messages.len());
        let _guard = span.enter();

        let result = self.inner.reply_all(messages);
        report(&result, "replied");
        result
    }

    fn return_code<C: fmt::Debug>(&self, code: C) -> Result<(), BusError> {
        let span = tracing::info_span!("bus.return", code = ?code);
        let _guard = span.enter();

        let result = self.inner.return_code(code);
        report_unsupported(&result);
        result
    }

    fn handle_current_message_later(&self) -> Result<(), BusError> {
        let span = tracing::info_span!("bus.handle_current_message_later");
        let _guard = span.enter();

        let result = self.inner.handle_current_message_later();
        report_unsupported(&result);
        result
    }

    fn forward_current_message_to(&self, destination: &str) -> Result<(), BusError> {
        let span = tracing::info_span!("bus.forward_current_message_to", destination);
        let _guard = span.enter();

        let result = self.inner.forward_current_message_to(destination);
        report_unsupported(&result);
        result
    }

    fn do_not_continue_dispatching_current_message_to_handlers(&self) -> Result<(), BusError> {
        let span = tracing::info_span!("bus.do_not_continue_dispatching");
        let _guard = span.enter();

        let result = self
            .inner
            .do_not_continue_dispatching_current_message_to_handlers();
        report_unsupported(&result);
        result
    }

    fn outgoing_headers(&self) -> BTreeMap<String, String> {
        self.inner.outgoing_headers()
    }

    fn set_outgoing_header(&self, key: &str, value: &str) {
        tracing::debug!(key, value, "outgoing header set");
        self.inner.set_outgoing_header(key, value);
    }
}

#[cfg(test)]
#[path = "traced_tests.rs"]
mod tests;
