//! End-to-end tests for modplan-lib: project loading, resolution and emission.

mod grip_tests;
mod resolve_tests;
