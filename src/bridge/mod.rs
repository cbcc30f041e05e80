//! The bridge between the two object spaces: conversion, proxies, iteration,
//! scope capture, and the embedding entry points.
//!
//! Values crossing the boundary are either converted by value (shared
//! primitives) or wrapped in the narrowest proxy for their shape; failures
//! crossing the boundary are translated here, carrying the foreign runtime's
//! rendered message unchanged.

use crate::guest::error::GuestError;
use crate::host::error::HostError;

pub mod convert;
pub mod embed;
pub mod guest_proxies;
pub mod host_proxies;
pub mod iterate;
pub mod scope;

#[cfg(test)]
mod scope_test;

/// Translates a guest failure raised during a bridged operation into the
/// host's generic foreign-failure condition.
pub fn guest_err_to_host(err: GuestError) -> HostError {
    HostError::Foreign(err.to_string())
}

/// Translates a host failure raised during a bridged operation into the
/// guest's generic foreign-failure condition.
pub fn host_err_to_guest(err: HostError) -> GuestError {
    GuestError::Foreign(err.to_string())
}
