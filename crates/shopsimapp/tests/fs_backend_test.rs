use shopsimapp::store::backend::StorageBackend;
use shopsimapp::store::fs_backend::FsBackend;
use std::fs;
use tempfile::TempDir;

fn setup() -> (TempDir, FsBackend) {
    (TempDir::new().unwrap(), FsBackend::new())
}

#[test]
fn test_fs_backend_basic_io() {
    let (temp, backend) = setup();
    let dir = temp.path();

    // 1. Write
    backend.write(dir, "Client.txt", "[]").unwrap();

    // 2. Read
    let content = backend.read(dir, "Client.txt").unwrap();
    assert_eq!(content, Some("[]".to_string()));

    // 3. Delete
    backend.delete(dir, "Client.txt").unwrap();
    assert_eq!(backend.read(dir, "Client.txt").unwrap(), None);
}

#[test]
fn test_fs_backend_atomic_write_artifacts() {
    let (temp, backend) = setup();
    let dir = temp.path();

    backend.write(dir, "Product.txt", "first").unwrap();
    backend.write(dir, "Product.txt", "second").unwrap();

    // No temp files left behind
    let names: Vec<String> = fs::read_dir(dir)
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    assert_eq!(names, vec!["Product.txt"]);
    assert_eq!(
        fs::read_to_string(dir.join("Product.txt")).unwrap(),
        "second"
    );
}

#[test]
fn test_fs_backend_creates_missing_dirs() {
    let (temp, backend) = setup();
    let dir = temp.path().join("receipts").join("2025");

    backend.write(&dir, "Receipt_1.txt", "{}").unwrap();
    assert!(dir.join("Receipt_1.txt").is_file());
}

#[test]
fn test_fs_backend_missing_paths_are_empty() {
    let (temp, backend) = setup();
    let dir = temp.path().join("nope");

    assert_eq!(backend.read(&dir, "Client.txt").unwrap(), None);
    assert!(backend.list(&dir, "Receipt_", ".txt").unwrap().is_empty());
    backend.delete(&dir, "Client.txt").unwrap();
}

#[test]
fn test_fs_backend_list_filters_and_sorts() {
    let (temp, backend) = setup();
    let dir = temp.path();
    for name in ["Receipt_2.txt", "Receipt_1.txt", "Receipt_3.json", "Client.txt"] {
        backend.write(dir, name, "{}").unwrap();
    }
    fs::create_dir(dir.join("Receipt_9.txt")).unwrap();

    let names = backend.list(dir, "Receipt_", ".txt").unwrap();
    assert_eq!(names, vec!["Receipt_1.txt", "Receipt_2.txt"]);
}

#[test]
fn test_fs_backend_path_of() {
    let (temp, backend) = setup();
    assert_eq!(
        backend.path_of(temp.path(), "Receipt_4.txt"),
        temp.path().join("Receipt_4.txt")
    );
}
