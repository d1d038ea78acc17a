// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! fb-core: Message model for the fakebus test double
//!
//! This crate provides:
//! - The `Message` abstraction and the `Envelope` handle logs store
//! - Type descriptors and the `InstanceFactory` that builds messages from them
//! - Endpoint addresses
//! - Clock abstraction for deferred delivery times
//! - Bus configuration

pub mod address;
pub mod clock;
pub mod config;
pub mod factory;
pub mod message;

pub use address::{Address, AddressError, IntoAddress};
pub use clock::{Clock, FakeClock, SystemClock};
pub use config::{BusConfig, ConfigError};
pub use factory::{InstanceFactory, InstantiationError};
pub use message::{Envelope, Message, MessageType};
