use std::path::{Path, PathBuf};

use inventoree_core::{KeyValueStore, kv::keys};

use super::*;

#[test]
fn missing_file_falls_back_to_defaults() {
  let dir = tempfile::tempdir().unwrap();
  let cfg = ServerConfig::load(&dir.path().join("absent.toml")).unwrap();
  assert_eq!(cfg.port, 3000);
  assert_eq!(cfg.address(), format!("{}:3000", cfg.host));
}

#[test]
fn file_values_are_read() {
  let dir  = tempfile::tempdir().unwrap();
  let path = dir.path().join("config.toml");
  std::fs::write(&path, "host = \"0.0.0.0\"\nport = 8080\nstore_path = \":memory:\"\n").unwrap();

  let cfg = ServerConfig::load(&path).unwrap();
  assert_eq!(cfg.address(), "0.0.0.0:8080");
  assert_eq!(cfg.store_path, PathBuf::from(IN_MEMORY));
}

#[test]
fn tilde_only_expands_as_a_prefix() {
  let plain = Path::new("/var/lib/inventoree.db");
  assert_eq!(expand_tilde(plain), plain);
  assert_eq!(expand_tilde(Path::new("a~/b")), Path::new("a~/b"));
  if let Ok(home) = std::env::var("HOME") {
    assert_eq!(expand_tilde(Path::new("~/x.db")), PathBuf::from(home).join("x.db"));
  }
}

#[tokio::test]
async fn open_kv_creates_parent_directories() {
  let dir  = tempfile::tempdir().unwrap();
  let path = dir.path().join("nested/data/inventoree.db");

  let kv = open_kv(&path).await.unwrap();
  kv.set_item(keys::PRODUCTS, "[]".into()).await.unwrap();
  assert!(path.exists());
}

#[tokio::test]
async fn in_memory_path_builds_an_app() {
  let kv = open_kv(Path::new(IN_MEMORY)).await.unwrap();
  assert!(kv.get_item(keys::PRODUCTS).await.unwrap().is_none());
  let _app = build_app(kv).await;
}
