// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Data models for the application.

pub mod activity;
pub mod preferences;
pub mod user;

pub use activity::{Activity, NativeEffort};
pub use preferences::{default_distance_targets, DistanceTarget, Preferences};
pub use user::{User, UserTokens};
