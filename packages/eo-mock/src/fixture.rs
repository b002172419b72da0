//! Fixture fields: test fields populated with enterprise objects before the
//! test body runs.

use eo_core::ObjectId;

/// Typed wrapper around an object handle, one per entity class.
///
/// ```ignore
/// struct Widget(ObjectId);
///
/// impl EoClass for Widget {
///     fn from_object(object: ObjectId) -> Self { Widget(object) }
///     fn object(&self) -> ObjectId { self.0 }
/// }
/// ```
pub trait EoClass: Sized {
    /// Entity name used when no entity is named after the type itself.
    const ENTITY_NAME: Option<&'static str> = None;

    /// Unqualified type name, matched against entity names first.
    fn simple_name() -> &'static str {
        simple_type_name::<Self>()
    }

    fn from_object(object: ObjectId) -> Self;

    fn object(&self) -> ObjectId;
}

/// Unqualified name of a type, without module path or generic arguments.
pub fn simple_type_name<T: ?Sized>() -> &'static str {
    let full = std::any::type_name::<T>();
    let base = full.split('<').next().unwrap_or(full);
    base.rsplit("::").next().unwrap_or(base)
}

/// Runtime descriptor of an [`EoClass`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EoType {
    simple_name: &'static str,
    entity_name: Option<&'static str>,
}

impl EoType {
    pub const fn new(simple_name: &'static str, entity_name: Option<&'static str>) -> Self {
        Self {
            simple_name,
            entity_name,
        }
    }

    pub fn of<T: EoClass>() -> Self {
        Self::new(T::simple_name(), T::ENTITY_NAME)
    }

    pub fn simple_name(&self) -> &'static str {
        self.simple_name
    }

    pub fn entity_name(&self) -> Option<&'static str> {
        self.entity_name
    }
}

/// How a fixture field is populated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FixtureMarker {
    /// Collaborator object, created already saved
    Dummy,
    /// Object under test, created as a fresh insertion
    UnderTest,
}

/// Storage for one fixture object.
pub trait FixtureSlot {
    fn declared_type(&self) -> EoType;

    fn fill(&mut self, object: ObjectId);

    fn clear(&mut self);
}

impl<T: EoClass> FixtureSlot for Option<T> {
    fn declared_type(&self) -> EoType {
        EoType::of::<T>()
    }

    fn fill(&mut self, object: ObjectId) {
        *self = Some(T::from_object(object));
    }

    fn clear(&mut self) {
        *self = None;
    }
}

/// A named, marked fixture slot of a test target.
pub struct FixtureField<'a> {
    name: &'static str,
    marker: FixtureMarker,
    slot: &'a mut dyn FixtureSlot,
}

impl<'a> FixtureField<'a> {
    pub fn new(name: &'static str, marker: FixtureMarker, slot: &'a mut dyn FixtureSlot) -> Self {
        Self { name, marker, slot }
    }

    pub fn dummy(name: &'static str, slot: &'a mut dyn FixtureSlot) -> Self {
        Self::new(name, FixtureMarker::Dummy, slot)
    }

    pub fn under_test(name: &'static str, slot: &'a mut dyn FixtureSlot) -> Self {
        Self::new(name, FixtureMarker::UnderTest, slot)
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn marker(&self) -> FixtureMarker {
        self.marker
    }

    pub fn declared_type(&self) -> EoType {
        self.slot.declared_type()
    }

    pub fn fill(&mut self, object: ObjectId) {
        self.slot.fill(object);
    }

    pub fn clear(&mut self) {
        self.slot.clear();
    }
}

/// A test whose fields may request automatically created objects.
pub trait TestTarget {
    fn fixture_fields(&mut self) -> Vec<FixtureField<'_>>;
}

impl TestTarget for () {
    fn fixture_fields(&mut self) -> Vec<FixtureField<'_>> {
        Vec::new()
    }
}
