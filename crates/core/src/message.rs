// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Message model
//!
//! This module provides:
//! - `Message` - Any value that can travel on the bus
//! - `Envelope` - Shared handle to a recorded message
//! - `MessageType` - Type descriptor used for subscriptions and type-token construction

use std::any::{Any, TypeId};
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

/// A value that can be published, sent, deferred or replied.
///
/// Implemented for every `'static` type that is `Debug + PartialEq + Send + Sync`,
/// so application messages need no extra derive.
pub trait Message: Any + fmt::Debug + Send + Sync {
    fn as_any(&self) -> &dyn Any;

    fn into_any(self: Box<Self>) -> Box<dyn Any + Send + Sync>;

    /// Compare against another message of possibly different concrete type
    fn eq_message(&self, other: &dyn Message) -> bool;

    fn type_name(&self) -> &'static str;
}

impl<T> Message for T
where
    T: Any + fmt::Debug + PartialEq + Send + Sync,
{
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn into_any(self: Box<Self>) -> Box<dyn Any + Send + Sync> {
        self
    }

    fn eq_message(&self, other: &dyn Message) -> bool {
        other
            .as_any()
            .downcast_ref::<T>()
            .is_some_and(|other| self == other)
    }

    fn type_name(&self) -> &'static str {
        std::any::type_name::<T>()
    }
}

/// Shared, immutable handle to one message held in a log.
///
/// Cloning an envelope clones the handle, never the message.
#[derive(Clone)]
pub struct Envelope {
    inner: Arc<dyn Message>,
}

impl Envelope {
    pub fn new<M: Message>(message: M) -> Self {
        // Already-wrapped messages keep their handle so mixed batches stay flat
        if let Some(envelope) = (&message as &dyn Any).downcast_ref::<Envelope>() {
            return envelope.clone();
        }
        Self {
            inner: Arc::new(message),
        }
    }

    pub(crate) fn from_boxed(message: Box<dyn Message>) -> Self {
        Self {
            inner: Arc::from(message),
        }
    }

    /// True if the wrapped message is a `T`
    pub fn is<T: Message>(&self) -> bool {
        self.inner.as_any().is::<T>()
    }

    pub fn downcast_ref<T: Message>(&self) -> Option<&T> {
        self.inner.as_any().downcast_ref::<T>()
    }

    pub fn message(&self) -> &dyn Message {
        self.inner.as_ref()
    }

    pub fn type_name(&self) -> &'static str {
        self.inner.type_name()
    }

    /// Type identity of the wrapped message
    pub fn message_type_id(&self) -> TypeId {
        Any::type_id(self.inner.as_any())
    }
}

impl PartialEq for Envelope {
    fn eq(&self, other: &Self) -> bool {
        self.inner.eq_message(other.inner.as_ref())
    }
}

impl fmt::Debug for Envelope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&*self.inner, f)
    }
}

pub(crate) type DefaultCtor = fn() -> Box<dyn Message>;

fn construct_default<T: Message + Default>() -> Box<dyn Message> {
    Box::new(T::default())
}

/// Identifies a message type at runtime.
///
/// Equality and hashing consider only the type identity; the optional
/// default constructor travels along so the factory can build probe
/// instances from a bare descriptor.
#[derive(Clone, Copy)]
pub struct MessageType {
    id: TypeId,
    name: &'static str,
    default_ctor: Option<DefaultCtor>,
}

impl MessageType {
    /// Descriptor for a type with a natural default state
    pub fn of<T: Message + Default>() -> Self {
        Self {
            id: TypeId::of::<T>(),
            name: std::any::type_name::<T>(),
            default_ctor: Some(construct_default::<T>),
        }
    }

    /// Descriptor for a type without `Default`.
    ///
    /// Constructing one requires a constructor registered on the factory.
    pub fn opaque<T: Message>() -> Self {
        Self {
            id: TypeId::of::<T>(),
            name: std::any::type_name::<T>(),
            default_ctor: None,
        }
    }

    pub fn id(&self) -> TypeId {
        self.id
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn is<T: Message>(&self) -> bool {
        self.id == TypeId::of::<T>()
    }

    pub(crate) fn default_ctor(&self) -> Option<DefaultCtor> {
        self.default_ctor
    }
}

impl PartialEq for MessageType {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for MessageType {}

impl Hash for MessageType {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Debug for MessageType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("MessageType").field(&self.name).finish()
    }
}

impl fmt::Display for MessageType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

#[cfg(test)]
#[path = "message_tests.rs"]
mod tests;
