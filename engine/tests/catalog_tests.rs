use engine::catalog::{load_catalog, save_catalog, CatalogPaths};
use engine::JobPosting;
use std::fs;
use tempfile::tempdir;

#[test]
fn load_merges_files_and_skips_malformed_entries() {
    let dir = tempdir().unwrap();
    let paths = CatalogPaths::new(dir.path());

    save_catalog(
        &paths,
        &[JobPosting {
            id: "a".to_string(),
            title: "Python Developer".to_string(),
            description: "Python".to_string(),
            ..Default::default()
        }],
    )
    .unwrap();

    // A hand-placed batch file: one good entry, one with the wrong shape.
    fs::write(
        dir.path().join("batch_extra.json"),
        r#"[
            {"id": "b", "title": "SQL Analyst", "description": "SQL"},
            {"id": 42, "title": "broken"}
        ]"#,
    )
    .unwrap();

    let postings = load_catalog(&paths).unwrap();
    let mut ids: Vec<&str> = postings.iter().map(|p| p.id.as_str()).collect();
    ids.sort();
    assert_eq!(ids, vec!["a", "b"]);
}

#[test]
fn unreadable_file_is_an_error_not_a_skip() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("bad.json"), "not json at all").unwrap();
    assert!(load_catalog(&CatalogPaths::new(dir.path())).is_err());
}

#[test]
fn missing_directory_is_an_error() {
    let dir = tempdir().unwrap();
    let gone = dir.path().join("nope");
    assert!(load_catalog(&CatalogPaths::new(&gone)).is_err());
}
