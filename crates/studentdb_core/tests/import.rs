use studentdb_core::{StudentRepository, StudentStore};

#[test]
fn import_assigns_fresh_ids_and_persists_once() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("students.csv");
    std::fs::write(&path, "3,\"Existing\",20,\"CS\",8\n").unwrap();
    let source = dir.path().join("batch.csv");
    std::fs::write(
        &source,
        "100,\"Ann\",19,\"ME\",7.5\n\n1,\"Ben, Jr\",21,\"EE\",6.25\n",
    )
    .unwrap();

    let mut store = StudentStore::open_file(&path).unwrap();
    assert!(store.import(&source).unwrap());

    let imported: Vec<(u32, String)> = store
        .list()
        .into_iter()
        .map(|student| (student.id, student.name))
        .collect();
    assert_eq!(
        imported,
        vec![
            (3, "Existing".to_string()),
            (4, "Ann".to_string()),
            (5, "Ben, Jr".to_string()),
        ]
    );
    assert_eq!(
        std::fs::read_to_string(&path).unwrap(),
        "3,\"Existing\",20,\"CS\",8\n4,\"Ann\",19,\"ME\",7.5\n5,\"Ben, Jr\",21,\"EE\",6.25\n"
    );
}

#[test]
fn import_of_unreadable_source_reports_failure_without_changes() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("students.csv");
    let mut store = StudentStore::open_file(&path).unwrap();

    assert!(!store.import(&dir.path().join("nope.csv")).unwrap());
    assert!(store.is_empty());
    assert_eq!(store.next_id(), 1);
}

#[test]
fn import_admits_undecodable_rows_as_zeroed_records() {
    let dir = tempfile::tempdir().unwrap();
    let source = dir.path().join("batch.csv");
    std::fs::write(&source, "not,a,record\n-2,\"Neg\",30,\"CE\",5\n").unwrap();

    let mut store = StudentStore::open_file(dir.path().join("students.csv")).unwrap();
    assert!(store.import(&source).unwrap());

    let rows = store.list();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].id, 1);
    assert_eq!(rows[0].name, "");
    assert_eq!(rows[0].age, 0);
    assert_eq!(rows[1].id, 2);
    assert_eq!(rows[1].name, "Neg");
}
