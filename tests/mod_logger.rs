use tempfile::tempdir;

#[test]
fn init_in_creates_the_log_directory_and_file() {
    let dir = tempdir().unwrap();
    tourbase::logger::init_in(dir.path(), "tourbase").unwrap();
    log::info!("logger smoke test");

    let log_dir = dir.path().join("tourbase_logs");
    assert!(log_dir.is_dir());
    let log_file = log_dir.join("tourbase.log");
    assert!(log_file.is_file());
    let contents = std::fs::read_to_string(&log_file).unwrap();
    assert!(contents.contains("logger smoke test"));
}
