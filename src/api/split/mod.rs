// Copyright (c) 2025 Careloom
// SPDX-License-Identifier: BUSL-1.1
//! Sheet splitting API endpoint module
//!
//! Provides POST /split for cutting a care label sheet into named
//! block images delivered as a zip archive.

pub mod handler;

pub use handler::{split_handler, REQUEST_BUDGET};
