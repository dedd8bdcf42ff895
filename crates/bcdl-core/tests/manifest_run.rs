//! End-to-end run over an on-disk manifest.

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use bcdl_core::config::EngineConfig;
use bcdl_core::driver::{Manifest, ManifestDriver, ManifestEntry};
use bcdl_core::format::FileType;
use bcdl_core::history::HistoryStore;
use bcdl_core::options::{history_path_for, DownloadOptions, User};
use bcdl_core::scheduler::{NoopEvents, Orchestrator};
use tempfile::tempdir;

fn write_collection(dir: &Path) -> std::path::PathBuf {
    std::fs::create_dir_all(dir.join("files")).unwrap();
    std::fs::write(dir.join("files/fogweaver-flac.zip"), b"fog flac").unwrap();
    std::fs::write(dir.join("files/fogweaver-v0.zip"), b"fog v0").unwrap();
    std::fs::write(dir.join("files/salt tides: live.zip"), b"salt flac").unwrap();
    let manifest = r#"{
      "entries": [
        { "title": "Fogweaver",
          "formats": { "flac": "files/fogweaver-flac.zip", "mp3-v0": "files/fogweaver-v0.zip" } },
        { "title": "Salt Tides: Live",
          "formats": { "flac": "files/salt tides: live.zip" } },
        { "title": "Vinyl Only",
          "formats": { "mp3-320": "files/fogweaver-v0.zip" } }
      ]
    }"#;
    let path = dir.join("collection.json");
    std::fs::write(&path, manifest).unwrap();
    path
}

#[tokio::test]
async fn manifest_collection_downloads_offered_formats() {
    let src = tempdir().unwrap();
    let out = tempdir().unwrap();
    let manifest = Manifest::load(&write_collection(src.path())).unwrap();
    let driver = Arc::new(ManifestDriver::new(manifest, 2));
    let opts = DownloadOptions::new(User::new("jbeard", "cookie"), out.path(), FileType::Flac);
    let orch = Orchestrator::new(driver, opts, EngineConfig::default());

    let summary = orch.run(&NoopEvents).await.unwrap();

    assert_eq!(summary.total_count, 3);
    assert_eq!(summary.steps, 2);
    assert_eq!(summary.downloaded, 2);
    // No FLAC offered: structural failure, not retried.
    assert_eq!(summary.failed, 1);
    // Saved under the album title, not the source file name.
    assert_eq!(
        std::fs::read(out.path().join("Fogweaver.zip")).unwrap(),
        b"fog flac"
    );
    assert!(out.path().join("Salt Tides: Live.zip").exists());

    let history = HistoryStore::open(history_path_for(out.path())).unwrap();
    assert!(history.contains("Fogweaver", FileType::Flac));
    assert!(!history.contains("Vinyl Only", FileType::Flac));
}

fn entry(title: &str, source: std::path::PathBuf) -> ManifestEntry {
    ManifestEntry {
        title: title.to_string(),
        formats: HashMap::from([(FileType::Flac, source)]),
        prepare_ms: 0,
    }
}

#[tokio::test]
async fn albums_sharing_a_source_name_keep_their_own_files() {
    let src = tempdir().unwrap();
    let out = tempdir().unwrap();
    for (dir, body) in [("a", "AAA"), ("b", "BBB")] {
        std::fs::create_dir_all(src.path().join(dir)).unwrap();
        std::fs::write(src.path().join(dir).join("album.zip"), body).unwrap();
    }
    let manifest = Manifest {
        entries: vec![
            entry("First", src.path().join("a/album.zip")),
            entry("Second", src.path().join("b/album.zip")),
        ],
    };
    let opts = DownloadOptions::new(User::new("jbeard", "cookie"), out.path(), FileType::Flac);
    let config = EngineConfig {
        workers: 1,
        ..EngineConfig::default()
    };
    let orch = Orchestrator::new(Arc::new(ManifestDriver::new(manifest, 20)), opts, config);

    let summary = orch.run(&NoopEvents).await.unwrap();

    assert_eq!(summary.downloaded, 2);
    assert_eq!(std::fs::read(out.path().join("First.zip")).unwrap(), b"AAA");
    assert_eq!(std::fs::read(out.path().join("Second.zip")).unwrap(), b"BBB");
    let history = HistoryStore::open(history_path_for(out.path())).unwrap();
    assert!(history.contains("First", FileType::Flac));
    assert!(history.contains("Second", FileType::Flac));
}

#[tokio::test]
async fn colliding_album_fails_and_stays_out_of_history() {
    let src = tempdir().unwrap();
    let out = tempdir().unwrap();
    std::fs::write(src.path().join("one.zip"), "ONE").unwrap();
    std::fs::write(src.path().join("two.zip"), "TWO").unwrap();
    // Both titles sanitize to "AC_DC".
    let manifest = Manifest {
        entries: vec![
            entry("AC/DC", src.path().join("one.zip")),
            entry("AC\\DC", src.path().join("two.zip")),
        ],
    };
    let opts = DownloadOptions::new(User::new("jbeard", "cookie"), out.path(), FileType::Flac);
    let config = EngineConfig {
        workers: 1,
        ..EngineConfig::default()
    };
    let orch = Orchestrator::new(Arc::new(ManifestDriver::new(manifest, 20)), opts, config);

    let summary = orch.run(&NoopEvents).await.unwrap();

    assert_eq!(summary.downloaded, 1);
    assert_eq!(summary.failed, 1);
    assert_eq!(std::fs::read(out.path().join("AC_DC.zip")).unwrap(), b"ONE");
    let history = HistoryStore::open(history_path_for(out.path())).unwrap();
    assert!(history.contains("AC/DC", FileType::Flac));
    assert!(!history.contains("AC\\DC", FileType::Flac));
}
