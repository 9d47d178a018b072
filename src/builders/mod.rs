//! Builders to construct scheduler components from configuration.

pub mod event_loop_builder;

pub use event_loop_builder::build_event_loop;
