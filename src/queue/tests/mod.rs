//! Test modules for the queue backends
