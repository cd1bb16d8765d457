//! Test utilities for integration testing.
//!
//! This module provides:
//! - Test data factories for creating valid test fixtures
//! - In-memory repository and sink implementations for mocking persistence
//! - A builder for an `AppState` wired to those mocks

mod factories;
mod sink_mocks;
mod subscription_mocks;

pub use app_state_builder::*;
pub use factories::*;
pub use sink_mocks::*;
pub use subscription_mocks::*;
