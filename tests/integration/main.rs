//! Integration test driver for `tests/integration/` submodule.
//!
//! Each `mod` below maps to a file that exercises a slice of the firmware
//! against the simulation adapters. All tests run on the host (x86_64)
//! with no real hardware required; timers are fired by hand through the
//! fake timer port, so whole days of device life run in microseconds.

mod control_tests;
mod cycle_tests;
mod provisioning_flow_tests;
mod rig;
