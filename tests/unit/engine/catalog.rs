use super::*;

#[test]
fn builtin_catalog_is_valid_and_searchable() {
    let catalog = OverlayCatalog::builtin();
    catalog.validate().unwrap();
    assert_eq!(catalog.categories.len(), 3);
    assert_eq!(catalog.entries().count(), 15);

    let crown = catalog.find("hat3").unwrap();
    assert_eq!(crown.name, "Crown");
    assert_eq!(crown.image_source, "assets/overlays/hats/crown.png");
    assert_eq!(catalog.category("glasses").unwrap().entries.len(), 4);
    assert!(catalog.find("nope").is_none());
}

#[test]
fn json_round_trip_through_builtin() {
    let catalog = OverlayCatalog::builtin();
    let json = serde_json::to_string(&catalog).unwrap();
    assert_eq!(OverlayCatalog::from_json_str(&json).unwrap(), catalog);
}

#[test]
fn duplicate_ids_are_rejected() {
    let json = r#"{"categories":[
        {"name":"a","entries":[{"id":"x","name":"X","imageSource":"x.png"}]},
        {"name":"b","entries":[{"id":"x","name":"Y","imgSrc":"y.png"}]}
    ]}"#;
    let err = OverlayCatalog::from_json_str(json).unwrap_err();
    assert!(err.to_string().contains("duplicate"), "{err}");
}

#[test]
fn blank_ids_and_bad_json_are_rejected() {
    let json = r#"{"categories":[{"name":"a","entries":[{"id":" ","name":"X","imageSource":"x.png"}]}]}"#;
    assert!(OverlayCatalog::from_json_str(json).is_err());
    assert!(OverlayCatalog::from_json_str("{").is_err());
}
