use polars::prelude::*;
use tempfile::tempdir;
use parquet_viewer::ViewerError;
use parquet_viewer::schema::{SchemaDocument, SchemaEntry, TypeTag};

#[test]
fn schema_from_frame_follows_column_order() -> anyhow::Result<()> {
    let df = df!(
        "id" => &[1i64, 2],
        "ratio" => &[0.5f64, 1.5],
        "label" => &["a", "b"],
        "flag" => &[true, false]
    )?;
    let doc = SchemaDocument::from_frame(&df, Some("input.parquet"));
    let types: Vec<(&str, &TypeTag)> = doc
        .entries()
        .iter()
        .map(|e| (e.name.as_str(), &e.type_tag))
        .collect();
    assert_eq!(
        types,
        vec![
            ("id", &TypeTag::Integer),
            ("ratio", &TypeTag::Double),
            ("label", &TypeTag::String),
            ("flag", &TypeTag::Boolean),
        ]
    );
    assert!(doc.entries().iter().all(|e| e.source.as_deref() == Some("input.parquet")));
    assert!(doc.entries().iter().all(|e| e.native_type.is_some()));
    Ok(())
}

#[test]
fn json_round_trip_preserves_entries() -> anyhow::Result<()> {
    let dir = tempdir()?;
    let path = dir.path().join("schema.json");
    let doc = SchemaDocument::new(vec![
        SchemaEntry::new("id", TypeTag::Integer),
        SchemaEntry::new("name", "varchar"),
    ])?;
    doc.write_json(&path)?;

    let text = std::fs::read_to_string(&path)?;
    assert!(text.trim_start().starts_with('['));
    assert!(text.contains("\"type\": \"integer\""));

    let back = SchemaDocument::read_json(&path)?;
    assert_eq!(back, doc);
    assert_eq!(back.get("name").map(|e| &e.type_tag), Some(&TypeTag::Other("varchar".into())));
    Ok(())
}

#[test]
fn legacy_envelope_is_accepted() -> anyhow::Result<()> {
    let text = r#"{
        "data_file": "sales.parquet",
        "schema": [
            {"column_name": "id", "spark_type": "long", "pandas_type": "int64"},
            {"column_name": "region", "spark_type": "string"}
        ]
    }"#;
    let doc = SchemaDocument::from_json_str(text)?;
    assert_eq!(doc.len(), 2);
    let id = doc.get("id").ok_or_else(|| anyhow::anyhow!("missing id"))?;
    assert_eq!(id.type_tag, TypeTag::Integer);
    assert_eq!(id.native_type.as_deref(), Some("int64"));
    assert_eq!(id.source.as_deref(), Some("sales.parquet"));
    assert_eq!(doc.entries()[1].name, "region");
    Ok(())
}

#[test]
fn missing_schema_file_is_an_io_error() {
    let dir = tempdir().unwrap();
    let err = SchemaDocument::read_json(&dir.path().join("absent.json")).unwrap_err();
    assert!(matches!(err, ViewerError::Io { .. }));
}

#[test]
fn excel_export_writes_a_workbook() -> anyhow::Result<()> {
    let dir = tempdir()?;
    let path = dir.path().join("schema.xlsx");
    let df = df!("a" => &[1i32], "b" => &["x"])?;
    SchemaDocument::from_frame(&df, None).write_excel(&path)?;
    let bytes = std::fs::read(&path)?;
    // xlsx files are zip archives.
    assert!(bytes.starts_with(b"PK"));
    Ok(())
}
