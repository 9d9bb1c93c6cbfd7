use leadsync_fs::{NormalizedPath, io};
use std::fs;
use tempfile::TempDir;

#[test]
fn test_write_atomic_creates_file_and_parents() {
    let temp = TempDir::new().unwrap();
    let path = NormalizedPath::new(temp.path().join("state/nested/mapping.json"));

    io::write_atomic(&path, b"{}").unwrap();

    let content = fs::read_to_string(path.to_native()).unwrap();
    assert_eq!(content, "{}");
}

#[test]
fn test_write_atomic_overwrites_existing() {
    let temp = TempDir::new().unwrap();
    let file_path = temp.path().join("mapping.json");
    fs::write(&file_path, "original").unwrap();

    let path = NormalizedPath::new(&file_path);
    io::write_atomic(&path, b"updated").unwrap();

    assert_eq!(fs::read_to_string(&file_path).unwrap(), "updated");
}

#[test]
fn test_write_atomic_leaves_no_temp_files() {
    let temp = TempDir::new().unwrap();
    let path = NormalizedPath::new(temp.path().join("mapping.json"));

    io::write_atomic(&path, b"one").unwrap();
    io::write_atomic(&path, b"two").unwrap();

    let mut entries: Vec<_> = fs::read_dir(temp.path())
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().to_string())
        .collect();
    entries.sort();
    assert_eq!(
        entries,
        vec![".mapping.json.lock".to_string(), "mapping.json".to_string()]
    );
}

#[test]
fn test_writer_waits_for_reader_lock() {
    use fs2::FileExt;
    use std::sync::mpsc;
    use std::thread;
    use std::time::Duration;

    let temp = TempDir::new().unwrap();
    let path = NormalizedPath::new(temp.path().join("mapping.json"));
    io::write_atomic(&path, b"one").unwrap();

    // Hold the shared lock the way a reader does.
    let sidecar = fs::File::open(temp.path().join(".mapping.json.lock")).unwrap();
    FileExt::lock_shared(&sidecar).unwrap();

    let (tx, rx) = mpsc::channel();
    let writer_path = path.clone();
    let writer = thread::spawn(move || {
        io::write_atomic(&writer_path, b"two").unwrap();
        tx.send(()).unwrap();
    });

    assert!(rx.recv_timeout(Duration::from_millis(200)).is_err());
    assert_eq!(io::read_text(&path).unwrap(), "one");

    FileExt::unlock(&sidecar).unwrap();
    rx.recv_timeout(Duration::from_secs(5)).unwrap();
    writer.join().unwrap();
    assert_eq!(io::read_text(&path).unwrap(), "two");
}

#[test]
fn test_locked_read_of_missing_file_creates_no_sidecar() {
    let temp = TempDir::new().unwrap();
    let path = NormalizedPath::new(temp.path().join("mapping.json"));

    assert!(io::read_text_locked(&path).unwrap_err().is_not_found());
    assert_eq!(fs::read_dir(temp.path()).unwrap().count(), 0);
}

#[test]
fn test_read_text_locked_reads_content() {
    let temp = TempDir::new().unwrap();
    let file_path = temp.path().join("mapping.json");
    fs::write(&file_path, "hello").unwrap();

    let content = io::read_text_locked(&NormalizedPath::new(&file_path)).unwrap();
    assert_eq!(content, "hello");
}

#[test]
fn test_read_missing_file_reports_not_found() {
    let temp = TempDir::new().unwrap();
    let path = NormalizedPath::new(temp.path().join("absent.json"));

    let err = io::read_text(&path).unwrap_err();
    assert!(err.is_not_found());
    let err = io::read_text_locked(&path).unwrap_err();
    assert!(err.is_not_found());
}
