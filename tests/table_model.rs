use polars::prelude::*;
use std::cell::RefCell;
use std::rc::Rc;
use parquet_viewer::ViewerError;
use parquet_viewer::table_model::{Refresh, TableModel};

fn sample() -> DataFrame {
    df!(
        "id" => &[1i64, 2, 3, 4],
        "name" => &["Alice", "bob", "Carol", "dave"],
        "score" => &[Some(1.5f64), None, Some(3.0), Some(42.0)],
        "active" => &[true, false, true, false]
    )
    .unwrap()
}

#[test]
fn exposes_counts_and_cells() -> anyhow::Result<()> {
    let model = TableModel::new(sample());
    assert_eq!(model.row_count(), 4);
    assert_eq!(model.column_count(), 4);
    assert_eq!(model.column_names(), vec!["id", "name", "score", "active"]);
    assert_eq!(model.header(1).as_deref(), Some("name"));
    assert_eq!(model.cell_value(0, 0)?, "1");
    assert_eq!(model.cell_value(1, 1)?, "bob");
    assert_eq!(model.cell_value(1, 2)?, "");
    assert_eq!(model.cell_value(2, 2)?, "3.0");
    assert_eq!(model.cell_value(3, 3)?, "false");
    Ok(())
}

#[test]
fn out_of_range_access_is_an_index_error() {
    let model = TableModel::new(sample());
    match model.cell_value(4, 0) {
        Err(ViewerError::Index { row, rows, .. }) => {
            assert_eq!(row, 4);
            assert_eq!(rows, 4);
        }
        other => panic!("unexpected {other:?}"),
    }
    assert!(matches!(
        model.cell_value(0, 4),
        Err(ViewerError::Index { column: 4, columns: 4, .. })
    ));
}

#[test]
fn filter_is_case_insensitive_over_every_column() -> anyhow::Result<()> {
    let mut model = TableModel::new(sample());

    model.set_filter("ALICE");
    assert_eq!(model.row_count(), 1);
    assert_eq!(model.cell_value(0, 1)?, "Alice");

    // Numbers and booleans are matched by their rendering.
    model.set_filter("42");
    assert_eq!(model.row_count(), 1);
    assert_eq!(model.row_label(0), Some(4));

    model.set_filter("TRUE");
    assert_eq!(model.row_count(), 2);
    assert_eq!(model.cell_value(1, 1)?, "Carol");
    assert!(model.cell_value(2, 0).is_err());
    Ok(())
}

#[test]
fn filter_matching_nothing_leaves_no_rows() {
    let mut model = TableModel::new(sample());
    model.set_filter("no such value");
    assert_eq!(model.row_count(), 0);
    assert!(model.is_filtered());
    assert!(model.rows(0..10).is_empty());
}

#[test]
fn clearing_the_filter_restores_all_rows() {
    let mut model = TableModel::new(sample());
    model.set_filter("bob");
    assert_eq!(model.row_count(), 1);
    model.set_filter("zzz");
    assert_eq!(model.row_count(), 0);
    model.set_filter("");
    assert_eq!(model.row_count(), 4);
    assert!(!model.is_filtered());
    assert_eq!(model.filter_term(), "");
}

#[test]
fn visible_frame_keeps_filtered_rows_in_order() -> anyhow::Result<()> {
    let mut model = TableModel::new(sample());
    model.set_filter("o");
    let visible = model.visible_frame()?;
    let names: Vec<Option<&str>> = visible.column("name")?.str()?.into_iter().collect();
    assert_eq!(names, vec![Some("bob"), Some("Carol")]);
    Ok(())
}

#[test]
fn refresh_hook_fires_on_filter_and_replace() {
    let events = Rc::new(RefCell::new(Vec::new()));
    let seen = Rc::clone(&events);
    let mut model = TableModel::new(sample());
    model.set_refresh_hook(move |reason| seen.borrow_mut().push(reason));

    model.set_filter("bob");
    model.replace(sample());
    assert_eq!(model.row_count(), 4);
    assert_eq!(model.filter_term(), "");
    model.clear();
    assert_eq!(model.row_count(), 0);

    assert_eq!(
        *events.borrow(),
        vec![Refresh::Filtered, Refresh::Reset, Refresh::Reset]
    );
}

#[test]
fn rows_renders_a_clipped_page() {
    let model = TableModel::new(sample());
    let page = model.rows(2..10);
    assert_eq!(page.len(), 2);
    assert_eq!(page[0], vec!["3", "Carol", "3.0", "true"]);
}

#[test]
fn zoned_timestamps_filter_on_local_time() -> anyhow::Result<()> {
    let tz = TimeZone::opt_try_new(Some("America/New_York"))?;
    let ts = Int64Chunked::new("ts".into(), &[0i64])
        .into_datetime(TimeUnit::Milliseconds, tz)
        .into_series();
    let mut model = TableModel::new(DataFrame::new(vec![ts.into_column()])?);
    assert_eq!(model.cell_value(0, 0)?, "1969-12-31 19:00:00 EST");

    model.set_filter("1969-12-31");
    assert_eq!(model.row_count(), 1);
    model.set_filter("1970-01-01");
    assert_eq!(model.row_count(), 0);
    Ok(())
}
