//! Integration test suite for the mock editing context.
//!
//! Models are loaded from `tests/models/`:
//! 1. Saved-object identity
//! 2. In-memory fetching
//! 3. Saving and change tracking
//! 4. Fixture lifecycle
//! 5. Model loading

pub mod fetch_tests;
pub mod lifecycle_tests;
pub mod model_loading_tests;
pub mod save_tests;
