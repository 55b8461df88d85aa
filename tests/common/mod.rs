#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

pub fn data_file_path(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("tests").join("data").join(name)
}

/// A fresh directory under the system temp dir, removed on drop.
/// Set SKIP_TEMP_DIR_CLEANUP_ON_FAIL to keep it around when a test fails.
pub struct TestDir {
    pub path: PathBuf,
}

impl TestDir {
    pub fn new() -> TestDir {
        let tmpdir = std::env::temp_dir();
        for val in 1..1000000 {
            let path = tmpdir.join(format!("spcfx-test-{}-{}", std::process::id(), val));
            if fs::create_dir(&path).is_ok() {
                return TestDir { path };
            }
        }
        panic!("Could not create a temp directory");
    }

    pub fn touch(&self, name: &str, contents: &str) -> PathBuf {
        let p = self.path.join(name);
        fs::write(&p, contents).unwrap();
        p
    }
}

impl Drop for TestDir {
    fn drop(&mut self) {
        let skip = std::env::var("SKIP_TEMP_DIR_CLEANUP_ON_FAIL")
            .map(|v| !v.is_empty())
            .unwrap_or(false);
        if std::thread::panicking() && skip {
            println!("TestDir: panicking. Skipping remove of {}", self.path.display());
        } else {
            let _ = fs::remove_dir_all(&self.path);
        }
    }
}
