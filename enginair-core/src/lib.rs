//! Board-agnostic core logic for the Enginair air quality monitor
//!
//! This crate contains all application logic that does not depend on
//! specific hardware implementations:
//!
//! - Hardware abstraction traits (sensors, frame surface)
//! - Latest-reading store with staleness semantics
//! - Per-tick sensor acquisition scheduling
//! - Time-multiplexed view selection and rendering
//! - Diagnostic classification and reporting
//! - Bitmap icon assets for the unit glyphs

#![no_std]
#![deny(unsafe_code)]
#![allow(async_fn_in_trait)]

#[cfg(test)]
extern crate std;

pub mod icons;
pub mod monitor;
pub mod reading;
pub mod report;
pub mod scheduler;
pub mod traits;
pub mod view;

#[cfg(test)]
pub(crate) mod testutil;
