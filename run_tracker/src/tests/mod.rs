mod test_frontend;

/// Creates an empty folder under the system temp dir for one test.
fn get_test_folder(name: &str) -> std::path::PathBuf {
    let folder = std::env::temp_dir().join("run-tracker-cli").join(name);
    if let Ok(true) = std::fs::exists(&folder) {
        std::fs::remove_dir_all(&folder)
            .unwrap_or_else(|_| panic!("Failed to cleanup test dir {}", folder.display()));
    }
    std::fs::create_dir_all(&folder)
        .unwrap_or_else(|e| panic!("Failed to create test dir {}. Error: {e}", folder.display()));
    folder
}
