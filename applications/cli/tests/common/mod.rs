//! Common test utilities and fixtures
#![allow(dead_code)]

use songbox::SongboxConfig;
use std::path::Path;
use std::sync::Once;

static INIT: Once = Once::new();

pub fn init_tracing() {
    INIT.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_test_writer()
            .with_max_level(tracing::Level::DEBUG)
            .try_init();
    });
}

/// Configuration keeping every file under `root`
pub fn config_in(root: &Path) -> SongboxConfig {
    let mut config = SongboxConfig::default();
    config.library.songlist_path = root.join("songlist.txt");
    config.library.download_dir = root.join("downloads");
    config
}

/// Feed `script` to the shell and return everything it printed
pub async fn run_script(config: &SongboxConfig, script: &str) -> String {
    let (library, events) = songbox::open_library(config).await.unwrap();
    let mut output = Vec::new();
    songbox::run_shell(&library, events, script.as_bytes(), &mut output)
        .await
        .unwrap();
    String::from_utf8(output).unwrap()
}
