// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Endpoint addresses
//!
//! An address names a destination queue, optionally qualified by machine:
//! `orders` or `orders@billing-host`.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;
use thiserror::Error;

/// Errors from parsing an address
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AddressError {
    #[error("address is empty")]
    Empty,
    #[error("address has no queue name: {0}")]
    MissingQueue(String),
    #[error("address has no machine after '@': {0}")]
    MissingMachine(String),
}

/// A destination on the bus.
///
/// Comparison ignores ASCII case, matching how queue names resolve on the
/// transports this stands in for. `Display` keeps the original casing.
#[derive(Debug, Clone)]
pub struct Address {
    queue: String,
    machine: Option<String>,
}

impl Address {
    /// Parse `queue` or `queue@machine`
    pub fn parse(input: &str) -> Result<Self, AddressError> {
        let input = input.trim();
        if input.is_empty() {
            return Err(AddressError::Empty);
        }

        let (queue, machine) = match input.split_once('@') {
            Some((queue, machine)) => (queue.trim(), Some(machine.trim())),
            None => (input, None),
        };

        if queue.is_empty() {
            return Err(AddressError::MissingQueue(input.to_string()));
        }
        if machine.is_some_and(str::is_empty) {
            return Err(AddressError::MissingMachine(input.to_string()));
        }

        Ok(Self {
            queue: queue.to_string(),
            machine: machine.map(str::to_string),
        })
    }

    pub fn queue(&self) -> &str {
        &self.queue
    }

    pub fn machine(&self) -> Option<&str> {
        self.machine.as_deref()
    }

    /// Same queue on a specific machine
    pub fn on_machine(&self, machine: impl Into<String>) -> Self {
        Self {
            queue: self.queue.clone(),
            machine: Some(machine.into()),
        }
    }
}

impl PartialEq for Address {
    fn eq(&self, other: &Self) -> bool {
        self.queue.eq_ignore_ascii_case(&other.queue)
            && match (&self.machine, &other.machine) {
                (Some(a), Some(b)) => a.eq_ignore_ascii_case(b),
                (None, None) => true,
                _ => false,
            }
    }
}

impl Eq for Address {}

impl Hash for Address {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.queue.to_ascii_lowercase().hash(state);
        self.machine
            .as_ref()
            .map(|m| m.to_ascii_lowercase())
            .hash(state);
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.machine {
            Some(machine) => write!(f, "{}@{}", self.queue, machine),
            None => f.write_str(&self.queue),
        }
    }
}

impl FromStr for Address {
    type Err = AddressError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl Serialize for Address {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Address {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Self::parse(&raw).map_err(serde::de::Error::custom)
    }
}

/// Anything a destination can be given as.
///
/// Strings go through [`Address::parse`], so a string destination and the
/// address parsed from it are interchangeable.
pub trait IntoAddress {
    fn into_address(self) -> Result<Address, AddressError>;
}

impl IntoAddress for Address {
    fn into_address(self) -> Result<Address, AddressError> {
        Ok(self)
    }
}

impl IntoAddress for &Address {
    fn into_address(self) -> Result<Address, AddressError> {
        Ok(self.clone())
    }
}

impl IntoAddress for &str {
    fn into_address(self) -> Result<Address, AddressError> {
        Address::parse(self)
    }
}

impl IntoAddress for String {
    fn into_address(self) -> Result<Address, AddressError> {
        Address::parse(&self)
    }
}

impl IntoAddress for &String {
    fn into_address(self) -> Result<Address, AddressError> {
        Address::parse(self)
    }
}

#[cfg(test)]
#[path = "address_tests.rs"]
mod tests;
