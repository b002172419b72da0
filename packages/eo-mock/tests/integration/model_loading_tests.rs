//! Model loading at construction.

use std::fs;

use eo_core::{EoConfig, EoError, FetchSpecification, ObjectContext};
use eo_mock::MockEditingContext;
use tempfile::tempdir;

use super::helpers::{models_dir, test_config};

fn construct(models: &[&str]) -> Result<MockEditingContext, EoError> {
    MockEditingContext::with_config(test_config(), models)
}

#[test]
fn test_missing_model() {
    let err = construct(&["Shop", "Warehouse"]).unwrap_err();

    match err {
        EoError::ModelNotFound { ref model, ref searched } => {
            assert_eq!(model, "Warehouse");
            assert_eq!(searched, &vec![models_dir()]);
        }
        ref other => panic!("unexpected error: {}", other),
    }
}

#[test]
fn test_malformed_model() {
    let err = construct(&["Broken"]).unwrap_err();
    assert!(matches!(err, EoError::ModelParse { ref model, .. } if model == "Broken"));
}

#[test]
fn test_duplicate_entity_across_models() {
    let err = construct(&["Shop", "Rival"]).unwrap_err();
    assert!(matches!(
        err,
        EoError::DuplicateEntity { ref entity, ref model, ref existing }
            if entity == "Widget" && model == "Rival" && existing == "Shop"
    ));
}

#[test]
fn test_inheritance_cycle() {
    let err = construct(&["Cyclic"]).unwrap_err();
    assert!(matches!(err, EoError::InvalidModel { ref model, .. } if model == "Cyclic"));
}

#[test]
fn test_repeated_model_name_loads_once() {
    let ec = construct(&["Shop", "Shop"]).unwrap();
    assert_eq!(ec.model_group().models().len(), 1);
}

#[test]
fn test_model_from_extra_search_path() {
    let dir = tempdir().unwrap();
    fs::write(
        dir.path().join("Garden.json"),
        r#"{
            "version": 1,
            "entities": [
                { "name": "Plant", "attributes": [{ "name": "height", "type": "decimal", "default": 0.5 }] },
                { "name": "Tree", "parent": "Plant" }
            ]
        }"#,
    )
    .unwrap();

    let config = test_config().with_search_path(dir.path());
    let mut ec = MockEditingContext::with_config(config, &["Garden", "Shop"]).unwrap();

    let tree = ec.create_saved_object("Tree").unwrap();
    let plants = ec
        .objects_with_fetch_specification(&FetchSpecification::new("Plant"))
        .unwrap();
    assert_eq!(plants, vec![tree]);
}

#[test]
fn test_unsupported_model_version() {
    let dir = tempdir().unwrap();
    fs::write(
        dir.path().join("Future.json"),
        r#"{ "version": 2, "entities": [] }"#,
    )
    .unwrap();

    let config = EoConfig {
        model_search_paths: vec![dir.path().to_path_buf()],
        ..Default::default()
    };
    let err = MockEditingContext::with_config(config, &["Future"]).unwrap_err();

    assert!(matches!(err, EoError::ModelParse { ref message, .. } if message.contains("version")));
}
