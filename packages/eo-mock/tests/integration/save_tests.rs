//! Saving and change tracking.

use eo_core::{EoError, FetchSpecification, GlobalId, ObjectContext, ObjectEditor, Value};

use super::helpers::{get, mock, set};

#[test]
fn test_save_gives_inserted_objects_new_permanent_ids() {
    let mut ec = mock(&["Shop"]);
    ec.create_saved_object("Widget").unwrap();
    let first = ec.create_and_insert_instance("Widget").unwrap();
    let second = ec.create_and_insert_instance("Widget").unwrap();
    let before: Vec<GlobalId> = [first, second]
        .iter()
        .map(|&object| ec.global_id_for_object(object).cloned().unwrap())
        .collect();
    assert!(before.iter().all(GlobalId::is_temporary));

    ec.save_changes().unwrap();

    assert_eq!(
        ec.global_id_for_object(first),
        Some(&GlobalId::permanent("Widget", 2))
    );
    assert_eq!(
        ec.global_id_for_object(second),
        Some(&GlobalId::permanent("Widget", 3))
    );
    for old in &before {
        assert_eq!(ec.object_for_global_id(old), None);
    }
    assert!(!ec.has_changes());

    let fetched = ec
        .objects_with_fetch_specification(&FetchSpecification::new("Widget"))
        .unwrap();
    assert_eq!(fetched.len(), 3);
    assert!(fetched.contains(&first) && fetched.contains(&second));
}

#[test]
fn test_mid_test_insertions_are_tracked() {
    let mut ec = mock(&["Shop"]);
    let saved = ec.create_saved_object("Order").unwrap();
    let fresh = ec.create_and_insert_instance("Order").unwrap();

    assert_eq!(ec.editing_context().inserted_objects(), vec![fresh]);
    assert!(ec.is_ignored(saved));
    assert!(!ec.is_ignored(fresh));
    assert_eq!(get(&ec, fresh, "total"), Value::Decimal(0.0));
}

#[test]
fn test_validation_runs_for_inserted_objects_only() {
    let mut ec = mock(&["Shop"]);
    // a saved order with no reference is never validated
    ec.create_saved_object("Order").unwrap();
    let fresh = ec.create_and_insert_instance("Order").unwrap();

    let err = ec.save_changes().unwrap_err();
    assert!(matches!(err, EoError::ValidationFailed { ref key, .. } if key == "reference"));
    assert!(ec.global_id_for_object(fresh).unwrap().is_temporary());

    set(&mut ec, fresh, "reference", "PO-17");
    ec.save_changes().unwrap();
    assert_eq!(
        ec.global_id_for_object(fresh),
        Some(&GlobalId::permanent("Order", 2))
    );
}

#[test]
fn test_saved_insertions_become_tracked_objects() {
    let mut ec = mock(&["Shop"]);
    let widget = ec.create_and_insert_instance("Widget").unwrap();
    ec.save_changes().unwrap();

    ec.take_value_for_key(widget, "name", Value::from("renamed")).unwrap();

    assert_eq!(ec.editing_context().updated_objects(), vec![widget]);
    ec.save_changes().unwrap();
    assert!(!ec.has_changes());
    // updates keep the identity they already had
    assert_eq!(
        ec.global_id_for_object(widget),
        Some(&GlobalId::permanent("Widget", 1))
    );
}

#[test]
fn test_deleting_saved_object() {
    let mut ec = mock(&["Shop"]);
    let widget = ec.create_saved_object("Widget").unwrap();

    ec.delete_object(widget).unwrap();
    assert!(ec.has_changes());
    ec.save_changes().unwrap();

    assert_eq!(ec.global_id_for_object(widget), None);
    assert!(ec
        .objects_with_fetch_specification(&FetchSpecification::new("Widget"))
        .unwrap()
        .is_empty());
}

#[test]
fn test_domain_code_runs_against_mock() {
    /// Marks every empty widget as restocked and saves.
    fn restock<C: ObjectContext>(ec: &mut C) -> Result<usize, EoError> {
        let spec = FetchSpecification::new("Widget").with_qualifier(eo_core::Qualifier::is("count", 0));
        let empty = ec.objects_with_fetch_specification(&spec)?;
        for &widget in &empty {
            ec.take_value_for_key(widget, "count", Value::from(10))?;
        }
        let log = ec.create_and_insert_instance("Order")?;
        ec.take_value_for_key(log, "reference", Value::from(format!("restock {}", empty.len())))?;
        ec.save_changes()?;
        Ok(empty.len())
    }

    let mut ec = mock(&["Shop"]);
    let empty = ec.create_saved_object("Widget").unwrap();
    let full = ec.create_saved_object("Widget").unwrap();
    set(&mut ec, full, "count", 3);

    assert_eq!(restock(&mut ec).unwrap(), 1);
    assert_eq!(get(&ec, empty, "count"), Value::Integer(10));
    assert_eq!(get(&ec, full, "count"), Value::Integer(3));

    let orders = ec
        .objects_with_fetch_specification(&FetchSpecification::new("Order"))
        .unwrap();
    assert_eq!(orders.len(), 1);
    assert_eq!(get(&ec, orders[0], "reference"), Value::from("restock 1"));
    assert!(!ec.global_id_for_object(orders[0]).unwrap().is_temporary());
}
