use parquet_viewer::pagination::Pagination;

#[test]
fn paginate_multiple_pages() {
    let mut pages = Pagination::new(50);
    assert_eq!(pages.page_count(120), 3);
    assert_eq!(pages.range(120), 0..50);
    assert_eq!(pages.summary(120), "Showing 1 to 50 of 120 entries");

    assert!(pages.next_page(120));
    assert!(pages.next_page(120));
    assert!(!pages.next_page(120));
    assert_eq!(pages.range(120), 100..120);
    assert_eq!(pages.showing_from(120), 101);
    assert_eq!(pages.showing_to(120), 120);

    assert!(pages.previous_page());
    assert_eq!(pages.page(), 1);
    pages.first_page();
    assert!(!pages.previous_page());
}

#[test]
fn empty_and_clamped_pages() {
    let mut pages = Pagination::default();
    assert_eq!(pages.page_count(0), 0);
    assert_eq!(pages.showing_from(0), 0);
    assert_eq!(pages.showing_to(0), 0);
    assert_eq!(pages.summary(0), "");
    assert_eq!(pages.range(0), 0..0);

    pages.go_to_page(99, 120);
    assert_eq!(pages.page(), 2);

    pages.set_page_size(0);
    assert_eq!(pages.page_size(), 1);
    assert_eq!(pages.page(), 0);
}
