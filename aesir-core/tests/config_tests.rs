// tests/config_tests.rs

use std::fs;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tempfile::TempDir;

use aesir_core::config::{new_config_handle, ConfigLoader};
use aesir_core::models::ConfigSnapshot;

#[test]
fn test_missing_file_is_created_with_defaults() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("nested").join("config.yml");
    let loader = ConfigLoader::new(&path);

    let cfg = loader.load();
    assert!(path.exists(), "default file written");
    assert_eq!(cfg, ConfigSnapshot::documented_defaults());

    let written = fs::read_to_string(&path).unwrap();
    assert!(written.contains("Broadcast:"));
    assert!(written.contains("YouTubeCheckInterval: 60"));
}

#[test]
fn test_broken_yaml_falls_back() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("config.yml");
    fs::write(&path, "Broadcast: [unterminated\n  : :").unwrap();

    let cfg = ConfigLoader::new(&path).load();
    assert_eq!(cfg, ConfigSnapshot::fallback());
    assert!(ConfigLoader::new(&path).try_load().is_err());
}

#[test]
fn test_unreadable_path_falls_back() {
    let dir = TempDir::new().unwrap();
    // a directory where the file should be
    let path = dir.path().join("config.yml");
    fs::create_dir(&path).unwrap();

    let cfg = ConfigLoader::new(&path).load();
    assert_eq!(cfg, ConfigSnapshot::fallback());
}

#[test]
fn test_reload_is_atomic_for_readers() {
    let old = ConfigSnapshot {
        broadcast_messages: vec!["old".into()],
        broadcast_interval_secs: 100,
        ..ConfigSnapshot::default()
    };
    let new = ConfigSnapshot {
        broadcast_messages: vec!["new".into()],
        broadcast_interval_secs: 200,
        ..ConfigSnapshot::default()
    };
    let handle = new_config_handle(old.clone());
    let done = Arc::new(AtomicBool::new(false));

    let reader = {
        let handle = handle.clone();
        let done = done.clone();
        std::thread::spawn(move || {
            let mut reads = 0u64;
            while !done.load(Ordering::SeqCst) || reads == 0 {
                let snap = handle.load_full();
                let consistent = (snap.broadcast_messages[0] == "old" && snap.broadcast_interval_secs == 100)
                    || (snap.broadcast_messages[0] == "new" && snap.broadcast_interval_secs == 200);
                assert!(consistent, "observed a mixed snapshot");
                reads += 1;
            }
            reads
        })
    };

    for i in 0..2_000 {
        let next = if i % 2 == 0 { new.clone() } else { old.clone() };
        handle.store(Arc::new(next));
    }
    done.store(true, Ordering::SeqCst);
    assert!(reader.join().unwrap() > 0);
}

#[test]
fn test_reload_reads_new_file_contents() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("config.yml");
    let loader = ConfigLoader::new(&path);
    let handle = new_config_handle(loader.load());

    fs::write(&path, "TitleMessage: \"changed\"\nYouTubeCheckInterval: 10\n").unwrap();
    let outcome = loader.reload(&handle);
    assert!(!outcome.fell_back());
    let snap = outcome.snapshot();

    assert_eq!(snap.title_message, "changed");
    assert_eq!(handle.load().youtube_check_interval_secs, 10);
    assert_eq!(handle.load().broadcast_messages.len(), 1);
}

#[test]
fn test_reload_of_broken_file_stores_fallback() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("config.yml");
    let loader = ConfigLoader::new(&path);
    let handle = new_config_handle(loader.load());
    assert_eq!(handle.load().broadcast_messages.len(), 2);

    fs::write(&path, "Broadcast: [unterminated\n  : :").unwrap();
    let outcome = loader.reload(&handle);

    assert!(outcome.fell_back());
    assert_eq!(**outcome.snapshot(), ConfigSnapshot::fallback());
    assert_eq!(*handle.load_full(), ConfigSnapshot::fallback());
}
