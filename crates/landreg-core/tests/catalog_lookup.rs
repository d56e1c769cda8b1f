use landreg_core::{
    ApplicationCategory, ApplicationField, CatalogError, TypeCatalog,
};
use serde_json::{Value, json};

fn embedded() -> TypeCatalog {
    TypeCatalog::embedded().expect("embedded catalog")
}

fn minimal_document(types: Value) -> String {
    json!({
        "catalog_version": "0.1",
        "base_schema": {
            "property_address": {"synthesizer": "uk.address", "required": true},
            "applicants": {"synthesizer": "applicant.names", "required": true},
            "submission_date": {
                "synthesizer": "date.window",
                "required": true,
                "params": {"anchor": "today", "min_days": -30, "max_days": 0}
            },
            "expected_completion_date": {
                "synthesizer": "date.window",
                "required": true,
                "params": {"anchor": "submission_date", "min_days": 5, "max_days": 20}
            },
            "status": {"synthesizer": "status.weighted", "required": true},
            "priority": {"synthesizer": "int.range", "required": true}
        },
        "types": types
    })
    .to_string()
}

#[test]
fn lookups_resolve_names_ids_and_slugs() {
    let catalog = embedded();

    let charges = catalog
        .lookup_by_name("Charges/Mortgages")
        .expect("charges type");
    assert_eq!(charges.category, ApplicationCategory::Core);
    assert_eq!(
        charges.forms,
        vec![
            "CH1 (Application to Register a Charge)".to_string(),
            "DS1 (Application to Cancel a Charge)".to_string(),
        ]
    );

    let by_id = catalog.lookup_by_id(charges.id).expect("lookup by id");
    assert_eq!(by_id.name, "Charges/Mortgages");

    let by_slug = catalog
        .lookup_by_slug("first-registrations")
        .expect("lookup by slug");
    assert_eq!(by_slug.name, "First Registrations");
}

#[test]
fn unknown_types_are_reported() {
    let catalog = embedded();
    assert!(matches!(
        catalog.lookup_by_name("Boundary Disputes"),
        Err(CatalogError::UnknownType(name)) if name == "Boundary Disputes"
    ));
    assert!(matches!(
        catalog.lookup_by_id(999),
        Err(CatalogError::UnknownType(_))
    ));
    assert!(matches!(
        catalog.lookup_by_slug("boundary-disputes"),
        Err(CatalogError::UnknownType(_))
    ));
}

#[test]
fn type_specific_fields_only_where_applicable() {
    let catalog = embedded();

    let charges = catalog.lookup_by_name("Charges/Mortgages").expect("type");
    let schema = catalog.effective_schema(charges).expect("schema");
    assert!(schema.contains_key(&ApplicationField::Lender));
    assert!(schema.contains_key(&ApplicationField::LoanAmount));
    assert!(!schema.contains_key(&ApplicationField::ReasonForCorrection));

    let first = catalog.lookup_by_name("First Registrations").expect("type");
    let schema = catalog.effective_schema(first).expect("schema");
    assert!(!schema.contains_key(&ApplicationField::Lender));
    assert!(!schema.contains_key(&ApplicationField::LoanAmount));
    assert!(schema.contains_key(&ApplicationField::ExpectedCompletionDate));

    let corrections = catalog.lookup_by_name("Title Corrections").expect("type");
    let schema = catalog.effective_schema(corrections).expect("schema");
    assert!(schema.contains_key(&ApplicationField::ReasonForCorrection));
}

#[test]
fn every_type_has_forms_and_unique_identity() {
    let catalog = embedded();
    let mut ids = std::collections::BTreeSet::new();
    let mut names = std::collections::BTreeSet::new();
    for definition in catalog.all() {
        assert!(!definition.forms.is_empty(), "{} has no forms", definition.name);
        assert!(ids.insert(definition.id));
        assert!(names.insert(definition.name.clone()));
    }
}

#[test]
fn rejects_duplicate_names() {
    let contents = minimal_document(json!([
        {"id": 1, "category": "core", "name": "Assents", "description": "a", "forms": ["AS1"]},
        {"id": 2, "category": "additional", "name": "Assents", "description": "b", "forms": ["AS2"]}
    ]));
    let err = TypeCatalog::from_json_str(&contents).expect_err("duplicate name");
    assert!(matches!(err, CatalogError::InvalidCatalog(message) if message.contains("duplicate")));
}

#[test]
fn rejects_duplicate_ids() {
    let contents = minimal_document(json!([
        {"id": 7, "category": "core", "name": "Assents", "description": "a", "forms": ["AS1"]},
        {"id": 7, "category": "core", "name": "Leases", "description": "b", "forms": ["LR1"]}
    ]));
    assert!(matches!(
        TypeCatalog::from_json_str(&contents),
        Err(CatalogError::InvalidCatalog(_))
    ));
}

#[test]
fn rejects_empty_forms() {
    let contents = minimal_document(json!([
        {"id": 1, "category": "core", "name": "Assents", "description": "a", "forms": []}
    ]));
    assert!(matches!(
        TypeCatalog::from_json_str(&contents),
        Err(CatalogError::InvalidCatalog(_))
    ));
}

#[test]
fn rejects_unknown_field_names() {
    let contents = minimal_document(json!([
        {
            "id": 1,
            "category": "core",
            "name": "Assents",
            "description": "a",
            "forms": ["AS1"],
            "field_schema": {"valuation": {"synthesizer": "money.range", "required": false}}
        }
    ]));
    assert!(matches!(
        TypeCatalog::from_json_str(&contents),
        Err(CatalogError::SchemaViolation(message)) if message.contains("valuation")
    ));
}

#[test]
fn rejects_optional_base_fields() {
    let contents = minimal_document(json!([
        {
            "id": 1,
            "category": "core",
            "name": "Assents",
            "description": "a",
            "forms": ["AS1"],
            "field_schema": {"status": {"synthesizer": "status.weighted", "required": false}}
        }
    ]));
    assert!(matches!(
        TypeCatalog::from_json_str(&contents),
        Err(CatalogError::SchemaViolation(_))
    ));
}

#[test]
fn document_round_trips_through_snapshot() {
    let catalog = embedded();
    let document = catalog.to_document();
    let encoded = serde_json::to_string(&document).expect("encode");
    let reloaded = TypeCatalog::from_json_str(&encoded).expect("reload");
    assert_eq!(reloaded.len(), catalog.len());
    assert_eq!(reloaded.version(), catalog.version());
}

#[test]
fn embedded_catalog_carries_current_version() {
    let catalog = TypeCatalog::embedded().expect("catalog");
    assert_eq!(catalog.version(), landreg_core::CATALOG_VERSION);
}
