//! Integration test driver for `tests/integration/` submodule.
//!
//! Each `mod` below maps to a file that exercises the monitoring service
//! against mock adapters.  Everything runs in-process; no sensor store,
//! device controller or notification channel is required.

mod mock_adapters;
mod monitor_service_tests;
