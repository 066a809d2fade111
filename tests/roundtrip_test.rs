use pharos::{IndexWriter, Page, Posting, Result, SearchIndexRecord};

fn build_record() -> Result<SearchIndexRecord> {
    let mut writer = IndexWriter::default();
    writer.add_page(
        Page::new("hydrophone", "Hydrophone Data")
            .with_body("Stream hydrophone recordings from the archive."),
    )?;
    writer.add_page(
        Page::new("request", "Requesting Data")
            .with_body("Request hydrophone records over a time window."),
    )?;
    let (record, _) = writer.build()?;
    Ok(record)
}

#[test]
fn test_json_round_trip_is_identity() -> Result<()> {
    let record = build_record()?;

    let json = record.to_json()?;
    let parsed = SearchIndexRecord::from_json(&json)?;
    assert_eq!(parsed, record);

    // A second cycle through the container format changes nothing.
    let json_again = parsed.to_json()?;
    assert_eq!(json_again, json);
    Ok(())
}

#[test]
fn test_singleton_posting_serializes_as_scalar() -> Result<()> {
    let record = build_record()?;
    assert_eq!(record.terms["stream"], Posting::One(0));

    let json = record.to_json()?;
    assert!(json.contains("\"stream\":0"), "json was: {json}");

    let shared = &record.terms["hydrophone"];
    assert_eq!(*shared, Posting::Many(vec![0, 1]));
    assert!(json.contains("\"hydrophone\":[0,1]"), "json was: {json}");
    Ok(())
}

#[test]
fn test_record_has_canonical_keys() -> Result<()> {
    let record = build_record()?;
    let value: serde_json::Value = serde_json::from_str(&record.to_json()?).unwrap();
    let object = value.as_object().unwrap();

    let mut keys: Vec<&str> = object.keys().map(String::as_str).collect();
    keys.sort_unstable();
    assert_eq!(
        keys,
        vec![
            "docnames",
            "envversion",
            "filenames",
            "objects",
            "objnames",
            "objtypes",
            "terms",
            "titles",
            "titleterms",
        ]
    );
    Ok(())
}

#[test]
fn test_unknown_key_rejected() -> Result<()> {
    let record = build_record()?;
    let mut value: serde_json::Value = serde_json::from_str(&record.to_json()?).unwrap();
    value
        .as_object_mut()
        .unwrap()
        .insert("alltitles".to_string(), serde_json::json!({}));

    let json = serde_json::to_string(&value).unwrap();
    assert!(SearchIndexRecord::from_json(&json).is_err());
    Ok(())
}

#[test]
fn test_missing_key_rejected() -> Result<()> {
    let record = build_record()?;
    let mut value: serde_json::Value = serde_json::from_str(&record.to_json()?).unwrap();
    value.as_object_mut().unwrap().remove("titles");

    let json = serde_json::to_string(&value).unwrap();
    assert!(SearchIndexRecord::from_json(&json).is_err());
    Ok(())
}

#[test]
fn test_parse_does_not_validate_structure() -> Result<()> {
    // Parsing accepts a structurally inconsistent record; validate is the
    // boundary that rejects it.
    let json = r#"{
        "docnames": ["only"],
        "envversion": {"pharos": 1},
        "filenames": ["only.md"],
        "objects": {},
        "objnames": [],
        "objtypes": [],
        "terms": {"stray": 7},
        "titles": ["Only"],
        "titleterms": {}
    }"#;

    let record = SearchIndexRecord::from_json(json)?;
    assert!(record.validate().is_err());
    Ok(())
}
