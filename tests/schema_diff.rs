use parquet_viewer::ViewerError;
use parquet_viewer::diff::{self, TypeMismatch};
use parquet_viewer::schema::{SchemaDocument, SchemaEntry, TypeTag};

fn doc(cols: &[(&str, &str)]) -> SchemaDocument {
    SchemaDocument::new(cols.iter().map(|(n, t)| SchemaEntry::new(*n, *t)).collect()).unwrap()
}

#[test]
fn reports_added_column_and_type_change() {
    let a = doc(&[("id", "int"), ("name", "string")]);
    let b = doc(&[("id", "int"), ("name", "text"), ("age", "int")]);
    let report = diff::diff(&a, &b);

    assert!(report.only_in_left.is_empty());
    assert_eq!(report.only_in_right, vec![SchemaEntry::new("age", "int")]);
    assert_eq!(
        report.type_mismatches,
        vec![TypeMismatch {
            name: "name".into(),
            left: TypeTag::String,
            right: TypeTag::Other("text".into()),
        }]
    );
    assert!(report.order_mismatches.is_empty());
    assert_eq!(report.total_differences(), 2);
}

#[test]
fn identical_documents_have_no_differences() {
    let a = doc(&[("id", "integer"), ("ts", "timestamp"), ("flag", "boolean")]);
    let report = diff::diff(&a, &a);
    assert!(report.is_empty());
    assert!(report.to_string().contains("identical"));
}

#[test]
fn swapping_sides_inverts_the_report() {
    let a = doc(&[("id", "integer"), ("x", "double"), ("y", "string"), ("gone", "date")]);
    let b = doc(&[("y", "string"), ("new", "boolean"), ("id", "string"), ("x", "double")]);
    let ab = diff::diff(&a, &b);
    let ba = diff::diff(&b, &a);

    assert_eq!(ab.only_in_left, ba.only_in_right);
    assert_eq!(ab.only_in_right, ba.only_in_left);

    assert_eq!(ab.type_mismatches.len(), 1);
    assert_eq!(ba.type_mismatches.len(), 1);
    assert_eq!(ab.type_mismatches[0].left, ba.type_mismatches[0].right);
    assert_eq!(ab.type_mismatches[0].right, ba.type_mismatches[0].left);

    let mut forward: Vec<(String, usize, usize)> = ab
        .order_mismatches
        .iter()
        .map(|m| (m.name.clone(), m.left_position, m.right_position))
        .collect();
    let mut backward: Vec<(String, usize, usize)> = ba
        .order_mismatches
        .iter()
        .map(|m| (m.name.clone(), m.right_position, m.left_position))
        .collect();
    forward.sort();
    backward.sort();
    assert_eq!(forward, backward);
}

#[test]
fn outputs_follow_document_order() {
    let a = doc(&[("c", "integer"), ("a", "integer"), ("b", "integer")]);
    let b = doc(&[("z", "integer"), ("y", "integer")]);
    let report = diff::diff(&a, &b);
    let left: Vec<&str> = report.only_in_left.iter().map(|e| e.name.as_str()).collect();
    let right: Vec<&str> = report.only_in_right.iter().map(|e| e.name.as_str()).collect();
    assert_eq!(left, vec!["c", "a", "b"]);
    assert_eq!(right, vec!["z", "y"]);
}

#[test]
fn order_is_compared_among_shared_columns() {
    // `extra` shifts raw positions but not the order of shared columns.
    let a = doc(&[("id", "integer"), ("name", "string")]);
    let b = doc(&[("extra", "integer"), ("id", "integer"), ("name", "string")]);
    assert!(diff::diff(&a, &b).order_mismatches.is_empty());

    let c = doc(&[("name", "string"), ("id", "integer")]);
    let report = diff::diff(&a, &c);
    assert_eq!(report.order_mismatches.len(), 2);
    assert_eq!(report.order_mismatches[0].name, "id");
    assert_eq!(report.order_mismatches[0].left_position, 1);
    assert_eq!(report.order_mismatches[0].right_position, 2);
    let text = report.to_string();
    assert!(text.contains("--- Order mismatches (2) ---"));
    assert!(text.contains("id: position 1 in file 1 vs position 2 in file 2"));
}

#[test]
fn malformed_documents_fail_to_parse() {
    let good = r#"[{"name": "id", "type": "integer"}]"#;
    let duplicate = r#"[{"name": "id", "type": "integer"}, {"name": "id", "type": "string"}]"#;
    let missing_type = r#"[{"name": "id"}]"#;
    for bad in [duplicate, missing_type, "not json", "42"] {
        assert!(matches!(
            diff::diff_json(good, bad),
            Err(ViewerError::SchemaParse(_))
        ));
        assert!(matches!(
            diff::diff_json(bad, good),
            Err(ViewerError::SchemaParse(_))
        ));
    }
    assert!(diff::diff_json(good, good).unwrap().is_empty());
}
