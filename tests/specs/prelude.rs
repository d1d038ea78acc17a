//! Test prelude for behavioral specifications
//!
//! Message types shared across specs, and a recorder pinned to a fixed clock.

#![allow(dead_code)]

pub use chrono::{DateTime, TimeDelta, TimeZone, Utc};
pub use fb_adapters::{Bus, BusCall, BusError, DeferredMessage, FakeBus, SentMessage, TracedBus};
pub use fb_core::{Address, Envelope, FakeClock, MessageType};
pub use std::time::Duration;

#[derive(Debug, Default, Clone, PartialEq)]
pub struct MsgA {
    pub id: u32,
}

#[derive(Debug, Default, Clone, PartialEq)]
pub struct TypeB;

#[derive(Debug, Default, Clone, PartialEq)]
pub struct MsgC {
    pub body: String,
}

#[derive(Debug, Default, Clone, PartialEq)]
pub struct MsgD {
    pub reminder: String,
}

/// Fixed instant every spec clock starts at
pub fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 10, 18, 9, 0, 0).unwrap()
}

/// A fresh recorder on a frozen clock
pub fn recorder() -> FakeBus<FakeClock> {
    FakeBus::with_clock(FakeClock::at(now()))
}

pub fn address(raw: &str) -> Address {
    Address::parse(raw).unwrap()
}
