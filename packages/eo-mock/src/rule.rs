//! Per-test setup and teardown.

use std::panic::{self, AssertUnwindSafe};

use eo_core::EoError;

use crate::fixture::TestTarget;

/// Setup and teardown wrapped around a single test.
pub trait TestRule {
    /// Prepares a clean state and populates the target's fixture fields.
    ///
    /// # Errors
    /// Any fixture failure aborts setup; the test body must not run.
    fn before(&mut self, target: &mut dyn TestTarget) -> Result<(), EoError>;

    /// Discards every piece of state created for the test.
    fn after(&mut self, target: &mut dyn TestTarget);

    /// Runs `body` between [`Self::before`] and [`Self::after`].
    ///
    /// `after` runs even when setup fails or the body panics; a panic is
    /// resumed once teardown is done.
    fn run<T, R, F>(&mut self, target: &mut T, body: F) -> Result<R, EoError>
    where
        Self: Sized,
        T: TestTarget,
        F: FnOnce(&mut Self, &mut T) -> R,
    {
        if let Err(err) = self.before(target) {
            self.after(target);
            return Err(err);
        }

        let outcome = panic::catch_unwind(AssertUnwindSafe(|| body(&mut *self, &mut *target)));
        self.after(target);

        match outcome {
            Ok(value) => Ok(value),
            Err(payload) => panic::resume_unwind(payload),
        }
    }
}
