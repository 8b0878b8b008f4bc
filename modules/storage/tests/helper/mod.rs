// SPDX-FileCopyrightText: 2025 All contributors
//
// SPDX-License-Identifier: GPL-2.0-or-later

use module_core::{EventBus, Module};
use std::path::PathBuf;
use storage::FlatFileStorage;
use tokio::task::JoinHandle;

pub fn get_path(folder_name: &str) -> PathBuf {
    std::env::temp_dir()
        .join("run-tracker-storage")
        .join(folder_name)
}

pub fn get_data_file(folder_name: &str) -> PathBuf {
    get_path(folder_name).join("runs.txt")
}

pub fn setup_empty_test_folder(folder_name: &str) {
    let path = get_path(folder_name);
    if let Ok(true) = std::fs::exists(&path) {
        std::fs::remove_dir_all(&path)
            .unwrap_or_else(|_| panic!("Failed to cleanup test dir {}", path.display()));
    }
    std::fs::create_dir_all(&path).unwrap_or_else(|err| {
        panic!(
            "Failed to create test dir for {}. Reason: {err}",
            path.display()
        )
    });
}

pub fn create_storage_module(folder: &str, event_bus: &EventBus) -> JoinHandle<Result<(), ()>> {
    let storage = FlatFileStorage::new(&get_data_file(folder), event_bus.context());
    tokio::spawn(async move {
        let mut storage = storage;
        storage.run().await
    })
}
