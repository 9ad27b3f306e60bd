//! Test modules for the metrics sinks
