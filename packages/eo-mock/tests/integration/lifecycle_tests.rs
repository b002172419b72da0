//! Fixture population and teardown around a test body.

use std::panic::{self, AssertUnwindSafe};

use eo_core::{EoError, FetchSpecification, GlobalId, ObjectContext, ObjectEditor, ObjectId, Value};
use eo_mock::{
    EnterpriseObjectFactory, EoClass, EoType, FixtureField, FixtureMarker, MockEditingContext,
    TestRule, TestTarget,
};
use ntest::timeout;

use super::helpers::{get, mock, set, Order, PaperBook, Widget};

#[derive(Default)]
struct OrderTest {
    widget: Option<Widget>,
    book: Option<PaperBook>,
    order: Option<Order>,
}

impl TestTarget for OrderTest {
    fn fixture_fields(&mut self) -> Vec<FixtureField<'_>> {
        vec![
            FixtureField::dummy("widget", &mut self.widget),
            FixtureField::dummy("book", &mut self.book),
            FixtureField::under_test("order", &mut self.order),
        ]
    }
}

impl OrderTest {
    fn widget(&self) -> ObjectId {
        self.widget.as_ref().map(Widget::object).unwrap()
    }

    fn order(&self) -> ObjectId {
        self.order.as_ref().map(Order::object).unwrap()
    }
}

#[test]
#[timeout(5000)]
fn test_fixtures_are_ready_in_body() {
    let mut ec = mock(&["Shop", "Catalog"]);
    let mut target = OrderTest::default();

    ec.run(&mut target, |ec, test| {
        let widget = test.widget();
        assert_eq!(get(ec, widget, "count"), Value::Integer(0));
        assert!(!ec.global_id_for_object(widget).unwrap().is_temporary());
        assert!(test.book.is_some());

        let order = test.order();
        assert!(ec.global_id_for_object(order).unwrap().is_temporary());
        assert_eq!(ec.editing_context().inserted_objects(), vec![order]);

        set(ec, widget, "count", 4);
        set(ec, order, "reference", "PO-1");
        assert_eq!(ec.editing_context().updated_objects(), Vec::<ObjectId>::new());

        ec.save_changes().unwrap();
        assert!(!ec.global_id_for_object(order).unwrap().is_temporary());
    })
    .unwrap();

    assert!(target.widget.is_none());
    assert!(target.book.is_none());
    assert!(target.order.is_none());
    assert!(ec.editing_context().registered_objects().is_empty());
}

#[test]
#[timeout(5000)]
fn test_suppression_ends_with_the_test() {
    let mut ec = mock(&["Shop", "Catalog"]);
    let mut target = OrderTest::default();

    let widget = ec
        .run(&mut target, |ec, test| {
            let widget = test.widget();
            set(ec, widget, "count", 1);
            assert!(!ec.has_changes());
            assert!(ec.is_ignored(widget));
            widget
        })
        .unwrap();

    assert!(!ec.is_ignored(widget));

    // the next test starts from a clean context
    ec.run(&mut target, |ec, test| {
        assert!(ec.is_ignored(test.widget()));
        assert_eq!(ec.editing_context().registered_objects().len(), 3);
        let widgets = ec
            .objects_with_fetch_specification(&FetchSpecification::new("Widget"))
            .unwrap();
        assert_eq!(widgets, vec![test.widget()]);
    })
    .unwrap();
}

#[test]
#[timeout(5000)]
fn test_after_runs_when_body_panics() {
    let mut ec = mock(&["Shop", "Catalog"]);
    let mut target = OrderTest::default();

    let result = panic::catch_unwind(AssertUnwindSafe(|| {
        ec.run(&mut target, |_, _| panic!("assertion failed in test body"))
    }));

    assert!(result.is_err());
    assert!(target.widget.is_none());
    assert!(ec.editing_context().registered_objects().is_empty());
    assert!(!ec.has_changes());
}

#[test]
#[timeout(5000)]
fn test_fixture_failure_aborts_before_body() {
    let mut ec = mock(&["Shop"]);
    let mut target = OrderTest::default();
    let mut ran = false;

    let err = ec.run(&mut target, |_, _| ran = true).unwrap_err();

    assert!(!ran);
    match err {
        EoError::FixtureFailed { ref field, ref source } => {
            assert_eq!(field, "book");
            assert!(matches!(**source, EoError::ClassDescriptionNotFound { ref entity } if entity == "Book"));
        }
        ref other => panic!("unexpected error: {}", other),
    }
    assert!(target.widget.is_none());
    assert!(ec.editing_context().registered_objects().is_empty());
}

/// Factory that builds widgets with a recognizable count.
#[derive(Debug)]
struct StockedWidgetFactory;

impl EnterpriseObjectFactory for StockedWidgetFactory {
    fn create(&self, context: &mut MockEditingContext, object_type: &EoType) -> Result<ObjectId, EoError> {
        let object = context.create_saved_object_of(Some(object_type))?;
        context.take_value_for_key(object, "count", Value::from(99))?;
        Ok(object)
    }
}

#[derive(Default)]
struct StockTest {
    widget: Option<Widget>,
}

impl TestTarget for StockTest {
    fn fixture_fields(&mut self) -> Vec<FixtureField<'_>> {
        vec![FixtureField::new("widget", FixtureMarker::Dummy, &mut self.widget)]
    }
}

#[test]
#[timeout(5000)]
fn test_custom_dummy_factory() {
    let mut ec = mock(&["Shop"]).with_factory(FixtureMarker::Dummy, StockedWidgetFactory);
    let mut target = StockTest::default();

    let count = ec
        .run(&mut target, |ec, test| {
            let widget = test.widget.as_ref().map(Widget::object).unwrap();
            assert_eq!(
                ec.global_id_for_object(widget),
                Some(&GlobalId::permanent("Widget", 1))
            );
            get(ec, widget, "count")
        })
        .unwrap();

    assert_eq!(count, Value::Integer(99));
}

#[test]
#[timeout(5000)]
fn test_before_and_after_without_run() {
    let mut ec = mock(&["Shop", "Catalog"]);
    let mut target = OrderTest::default();

    ec.before(&mut target).unwrap();
    let widget = target.widget();
    assert_eq!(ec.editing_context().registered_objects().len(), 3);

    ec.after(&mut target);
    assert!(target.order.is_none());
    assert!(ec.object(widget).is_none());
}
