// SPDX-FileCopyrightText: 2026 Pawtap Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Messaging client for the pawtap agent.
//!
//! MTProto itself lives in a gateway sidecar process (one per host, many
//! sessions). [`GatewayMessenger`] speaks JSON-RPC 2.0 to it over HTTP and
//! implements [`pawtap_core::MessengerClient`].

pub mod client;
pub mod rpc;

pub use client::GatewayMessenger;
