mod common;

#[test]
fn test_migrations_apply_and_db_files_are_removed() {
    let base = "test_catalog_db_files.db";

    {
        let test_db = common::TestDb::new(base);
        let conn = test_db.pool().get();
        assert!(conn.is_ok());
    }

    let db_path = std::path::Path::new(base);
    assert!(!db_path.exists());
    assert!(!std::path::Path::new(&format!("{base}-shm")).exists());
    assert!(!std::path::Path::new(&format!("{base}-wal")).exists());
}
