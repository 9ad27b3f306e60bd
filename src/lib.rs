//! Light status events from a queue to a time-series metrics collector

pub mod app;
pub mod core;
pub mod event;
pub mod pipeline;
pub mod queue;
pub mod sink;
