// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]
// Enable coverage(off) attribute for excluding test infrastructure
#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

//! Bus adapters: the capability application code depends on, and the
//! stand-ins tests swap in for it

pub mod bus;
pub mod traced;

pub use bus::{Bus, BusError, NoOpBus};
pub use traced::TracedBus;

// Test support - only compiled for tests or when explicitly requested
#[cfg(any(test, feature = "test-support"))]
pub use bus::{BusCall, DeferredMessage, FakeBus, SentMessage};
