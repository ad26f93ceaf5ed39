//! School website backend: public content, admissions intake with interview
//! scoring, and a careers board, served as a JSON HTTP API over an in-process
//! store.

pub mod config;
pub mod error;
pub mod telemetry;

pub mod api;
pub mod store;

pub mod academics;
pub mod accounts;
pub mod admissions;
pub mod content;
pub mod events;
pub mod gallery;
pub mod jobs;
pub mod news;
pub mod utils;

pub mod app;
