// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Message instantiation from types and type descriptors
//!
//! Generic call sites build messages through `Default`. Type descriptors
//! build through the registry first, then the descriptor's own default
//! constructor. Types without a natural default state get an explicit
//! constructor via [`InstanceFactory::register`].

use crate::message::{Envelope, Message, MessageType};
use std::any::TypeId;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use thiserror::Error;

/// Errors from constructing a message instance
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InstantiationError {
    #[error("no constructor available for message type {type_name}")]
    NoConstructor { type_name: &'static str },
    #[error("constructor registered for {expected} produced a different type")]
    TypeMismatch { expected: &'static str },
}

type Constructor = Arc<dyn Fn() -> Box<dyn Message> + Send + Sync>;

/// Builds message instances on request.
///
/// Clones copy the registry; the constructors themselves are shared.
#[derive(Clone, Default)]
pub struct InstanceFactory {
    constructors: HashMap<TypeId, Constructor>,
}

impl InstanceFactory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an explicit constructor for `T`, replacing any earlier one.
    ///
    /// Takes precedence over `Default` for every construction path.
    pub fn register<T, F>(&mut self, constructor: F)
    where
        T: Message,
        F: Fn() -> T + Send + Sync + 'static,
    {
        self.constructors.insert(
            TypeId::of::<T>(),
            Arc::new(move || Box::new(constructor()) as Box<dyn Message>),
        );
    }

    /// Builder form of [`register`](Self::register)
    pub fn with<T, F>(mut self, constructor: F) -> Self
    where
        T: Message,
        F: Fn() -> T + Send + Sync + 'static,
    {
        self.register(constructor);
        self
    }

    pub fn is_registered<T: Message>(&self) -> bool {
        self.constructors.contains_key(&TypeId::of::<T>())
    }

    /// True if [`create_of`](Self::create_of) would succeed for this descriptor
    pub fn is_constructible(&self, message_type: &MessageType) -> bool {
        self.constructors.contains_key(&message_type.id()) || message_type.default_ctor().is_some()
    }

    /// Build a fresh `T`
    pub fn create<T: Message + Default>(&self) -> Result<T, InstantiationError> {
        let Some(constructor) = self.constructors.get(&TypeId::of::<T>()) else {
            return Ok(T::default());
        };
        constructor()
            .into_any()
            .downcast::<T>()
            .map(|instance| *instance)
            .map_err(|_| InstantiationError::TypeMismatch {
                expected: std::any::type_name::<T>(),
            })
    }

    /// Build a fresh `T` and run `init` on it before handing it back
    pub fn create_with<T, F>(&self, init: F) -> Result<T, InstantiationError>
    where
        T: Message + Default,
        F: FnOnce(&mut T),
    {
        let mut instance = self.create::<T>()?;
        init(&mut instance);
        Ok(instance)
    }

    /// Build an instance of the type a descriptor names
    pub fn create_of(&self, message_type: &MessageType) -> Result<Envelope, InstantiationError> {
        if let Some(constructor) = self.constructors.get(&message_type.id()) {
            return Ok(Envelope::from_boxed(constructor()));
        }
        match message_type.default_ctor() {
            Some(ctor) => Ok(Envelope::from_boxed(ctor())),
            None => Err(InstantiationError::NoConstructor {
                type_name: message_type.name(),
            }),
        }
    }
}

impl fmt::Debug for InstanceFactory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InstanceFactory")
            .field("registered", &self.constructors.len())
            .finish()
    }
}

#[cfg(test)]
#[path = "factory_tests.rs"]
mod tests;
