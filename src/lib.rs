//! Tick-multiplexed cooperative control loops.
//!
//! One recurring hardware timer drives a [`scheduler::TaskMultiplexer`]
//! that raises per-task flags; button interrupts raise [`events::EventLatch`]
//! bits; a single main loop per application consumes both and runs one of
//! three policies (thermostat, Morse blinker, serial command echo).
//!
//! The domain layer ([`app`], [`scheduler`], [`events`]) is pure logic.
//! ESP-IDF code is behind the `espidf` feature; without it the
//! [`adapters::Board`] is a host simulation.

#![deny(unused_must_use)]

pub mod adapters;
pub mod app;
pub mod config;
pub mod drivers;
pub mod error;
pub mod events;
pub mod pins;
pub mod runtime;
pub mod scheduler;
pub mod sensors;
