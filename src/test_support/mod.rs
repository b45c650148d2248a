//! Test utilities for composition unit tests.
//!
//! Provides shorthand constructors for descriptors and on-disk catalog
//! fixtures, so tests can focus on the behavior under test.
//!
//! # Example
//!
//! ```rust,ignore
//! use composition::test_support::{import_of, sample_part, CatalogFixture};
//!
//! #[test]
//! fn test_example() {
//!     let store = import_of("app::Store", Cardinality::ExactlyOne);
//!     let part = sample_part("app::Api", &[("store", store)]);
//!     let fixture = CatalogFixture::logging();
//!     let dir = fixture.write_to_temp();
//!     // Load and inspect...
//! }
//! ```

pub mod fixtures;

// Re-export fixtures for convenience
pub use fixtures::*;
