//! Fetches answered from the registered objects.

use eo_core::{EoError, FetchSpecification, ObjectContext, ObjectId, Qualifier, SortOrdering, Value};
use eo_mock::MockEditingContext;

use super::helpers::{get, mock, set};

fn fetch(ec: &mut MockEditingContext, spec: &FetchSpecification) -> Vec<ObjectId> {
    ec.objects_with_fetch_specification(spec).unwrap()
}

fn widget(ec: &mut MockEditingContext, count: i64, name: &str) -> ObjectId {
    let widget = ec.create_saved_object("Widget").unwrap();
    set(ec, widget, "count", count);
    set(ec, widget, "name", name);
    widget
}

fn catalog_item(ec: &mut MockEditingContext, entity: &str, title: &str, price: f64) -> ObjectId {
    let item = ec.create_saved_object(entity).unwrap();
    set(ec, item, "title", title);
    set(ec, item, "price", price);
    item
}

#[test]
fn test_sorted_fetch_with_limit_one() {
    let mut ec = mock(&["Shop"]);
    widget(&mut ec, 5, "big");
    let small = widget(&mut ec, 2, "small");

    let spec = FetchSpecification::new("Widget")
        .with_sort_orderings(vec![SortOrdering::asc("count")])
        .with_fetch_limit(1);

    assert_eq!(fetch(&mut ec, &spec), vec![small]);
}

#[test]
fn test_limit_returns_sorted_prefix() {
    let mut ec = mock(&["Shop"]);
    let widgets: Vec<ObjectId> = [3, 1, 4, 1, 5]
        .iter()
        .enumerate()
        .map(|(i, &count)| widget(&mut ec, count, &format!("w{}", i)))
        .collect();

    let sorted = FetchSpecification::new("Widget")
        .with_sort_orderings(vec![SortOrdering::asc("count"), SortOrdering::desc("name")]);
    let all = fetch(&mut ec, &sorted);
    assert_eq!(all, vec![widgets[3], widgets[1], widgets[0], widgets[2], widgets[4]]);

    assert_eq!(fetch(&mut ec, &sorted.clone().with_fetch_limit(3)), all[..3].to_vec());
    assert_eq!(fetch(&mut ec, &sorted.clone().with_fetch_limit(0)), all);
    assert_eq!(fetch(&mut ec, &sorted.with_fetch_limit(50)), all);
}

#[test]
fn test_unsorted_fetch_keeps_registration_order() {
    let mut ec = mock(&["Shop"]);
    let first = widget(&mut ec, 9, "a");
    let second = widget(&mut ec, 1, "b");

    assert_eq!(fetch(&mut ec, &FetchSpecification::new("Widget")), vec![first, second]);
}

#[test]
fn test_qualified_fetch() {
    let mut ec = mock(&["Shop"]);
    widget(&mut ec, 0, "bolt");
    let nut = widget(&mut ec, 7, "nut");
    let gear = widget(&mut ec, 3, "Gear");

    let spec = FetchSpecification::new("Widget").with_qualifier(
        Qualifier::greater_than("count", 0).and(Qualifier::like_insensitive("name", "*N*").or(
            Qualifier::is("name", "Gear"),
        )),
    );

    assert_eq!(fetch(&mut ec, &spec), vec![nut, gear]);
}

#[test]
fn test_deep_fetch_includes_sub_entities() {
    let mut ec = mock(&["Catalog"]);
    let book = catalog_item(&mut ec, "Book", "Dune", 9.5);
    let ebook = catalog_item(&mut ec, "EBook", "Ubik", 4.0);
    let toy = catalog_item(&mut ec, "Toy", "Kite", 15.0);

    // EBook is a grandchild of Item, so only Book and Toy are included
    assert_eq!(fetch(&mut ec, &FetchSpecification::new("Item")), vec![book, toy]);
    assert_eq!(fetch(&mut ec, &FetchSpecification::new("Book")), vec![book, ebook]);
    assert_eq!(
        fetch(&mut ec, &FetchSpecification::new("Book").with_deep(false)),
        vec![book]
    );
    assert!(fetch(&mut ec, &FetchSpecification::new("Item").with_deep(false)).is_empty());
}

#[test]
fn test_fetch_across_models() {
    let mut ec = mock(&["Shop", "Catalog"]);
    let widget = widget(&mut ec, 1, "cog");
    let toy = catalog_item(&mut ec, "Toy", "Yo-yo", 3.0);

    assert_eq!(fetch(&mut ec, &FetchSpecification::new("Widget")), vec![widget]);
    assert_eq!(fetch(&mut ec, &FetchSpecification::new("Toy")), vec![toy]);
}

#[test]
fn test_deep_fetch_of_unknown_entity_fails() {
    let mut ec = mock(&["Shop"]);

    let err = ec
        .objects_with_fetch_specification(&FetchSpecification::new("Spaceship"))
        .unwrap_err();

    assert!(matches!(err, EoError::EntityNotFound { .. }));
}

#[test]
fn test_deleted_objects_are_not_fetched() {
    let mut ec = mock(&["Shop"]);
    let kept = widget(&mut ec, 1, "kept");
    let gone = widget(&mut ec, 2, "gone");
    let fresh = ec.create_and_insert_instance("Widget").unwrap();

    ec.delete_object(gone).unwrap();
    ec.delete_object(fresh).unwrap();

    assert_eq!(fetch(&mut ec, &FetchSpecification::new("Widget")), vec![kept]);
}

#[test]
fn test_named_fetch_specifications() {
    let mut ec = mock(&["Shop", "Catalog"]);
    let empty = widget(&mut ec, 0, "empty");
    let few = widget(&mut ec, 2, "few");
    let many = widget(&mut ec, 8, "many");
    let dune = catalog_item(&mut ec, "Book", "Dune", 9.5);
    catalog_item(&mut ec, "Toy", "Kite", 15.0);
    let abc = catalog_item(&mut ec, "EBook", "ABC", 1.0);
    let top = catalog_item(&mut ec, "Toy", "Top", 2.0);

    let in_stock = ec
        .model_group()
        .fetch_specification_named("inStock", "Widget")
        .unwrap();
    assert_eq!(fetch(&mut ec, &in_stock), vec![many, few]);
    assert!(!fetch(&mut ec, &in_stock).contains(&empty));

    let bargains = ec
        .model_group()
        .fetch_specification_named("bargains", "Item")
        .unwrap();
    assert_eq!(bargains.fetch_limit(), 2);
    assert_eq!(fetch(&mut ec, &bargains), vec![dune, top]);
    assert_eq!(get(&ec, abc, "format"), Value::from("epub"));

    assert!(ec
        .model_group()
        .fetch_specification_named("bargains", "Widget")
        .is_none());
}

#[test]
fn test_fetch_sees_in_memory_values() {
    let mut ec = mock(&["Shop"]);
    let widget = widget(&mut ec, 1, "cog");
    let spec = FetchSpecification::new("Widget").with_qualifier(Qualifier::is("count", 10));

    assert!(fetch(&mut ec, &spec).is_empty());
    set(&mut ec, widget, "count", 10);
    assert_eq!(fetch(&mut ec, &spec), vec![widget]);
}

#[test]
fn test_sort_by_price_with_nan() {
    let mut ec = mock(&["Catalog"]);
    let toys: Vec<ObjectId> = (0..64i32)
        .map(|i| catalog_item(&mut ec, "Toy", &format!("t{}", i), f64::from((i * 37) % 64)))
        .collect();
    set(&mut ec, toys[10], "price", f64::NAN);

    let spec = FetchSpecification::new("Toy").with_sort_orderings(vec![SortOrdering::asc("price")]);
    let sorted = fetch(&mut ec, &spec);

    assert_eq!(sorted.len(), 64);
    assert_eq!(sorted[63], toys[10]);
    let prices: Vec<f64> = sorted[..63]
        .iter()
        .map(|&toy| get(&ec, toy, "price").as_f64().unwrap())
        .collect();
    assert!(prices.windows(2).all(|pair| pair[0] <= pair[1]));

    let descending = FetchSpecification::new("Toy").with_sort_orderings(vec![SortOrdering::desc("price")]);
    assert_eq!(fetch(&mut ec, &descending)[0], toys[10]);
}
