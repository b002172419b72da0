//! In-memory editing context for unit testing enterprise objects.
//!
//! [`MockEditingContext`] loads real models but never talks to a database.
//! Objects can be created as if already saved, fetches are evaluated against
//! the objects registered in memory, and saves hand out fabricated permanent
//! global ids. As a [`TestRule`] it populates a test's fixture fields before
//! the body runs and discards everything afterwards.
//!
//! ```ignore
//! let mut ec = MockEditingContext::new(&["Shop"])?;
//! let widget = ec.create_saved_object("Widget")?;
//! let widgets = ec.objects_with_fetch_specification(&FetchSpecification::new("Widget"))?;
//! assert_eq!(widgets, vec![widget]);
//! ```

pub mod coordinator;
pub mod factory;
pub mod fixture;
pub mod mock_context;
pub mod rule;

pub use coordinator::MockObjectStoreCoordinator;
pub use factory::{DummyFactory, EnterpriseObjectFactory, InsertedObjectFactory};
pub use fixture::{EoClass, EoType, FixtureField, FixtureMarker, FixtureSlot, TestTarget};
pub use mock_context::MockEditingContext;
pub use rule::TestRule;
