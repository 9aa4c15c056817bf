// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Runstory: shareable year-in-review stories from Strava runs
//!
//! This crate provides the backend API for syncing a year of Strava
//! activities and computing the story statistics (totals, configurable
//! best efforts, monthly heatmap, longest run) the frontend renders.

pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod time_utils;

use config::Config;
use db::FirestoreDb;
use services::StravaService;

/// Shared application state.
pub struct AppState {
    pub config: Config,
    pub db: FirestoreDb,
    pub strava_service: StravaService,
}
