#[cfg(test)]
pub const CONTENT_MD: &str = "---
title: \"Hi\"
tags:
  - travel
  - \" food \"
---

A short trip.

![a cat](pic/cat.png)

---

After the break.
";

#[cfg(test)]
pub const CONTENT_MD_NO_FRONT_MATTER: &str = "# Just a title

![x](http://example.com/x.png)
";

#[cfg(test)]
pub const CONTENT_MD_BAD_YAML: &str = "---
title: [unclosed
  nested: x
---

Body
";

/// Bytes that a text mode copy would mangle.
#[cfg(test)]
pub const PNG_BYTES: [u8; 12] = [0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A, 0x00, 0xFF, 0x0D, 0x80];

/// Writes `<posts_root>/<folder>/content.md` and returns its path.
#[cfg(test)]
pub fn write_post(posts_root: &std::path::Path, folder: &str, content: &str) -> std::path::PathBuf {
    let dir = posts_root.join(folder);
    std::fs::create_dir_all(&dir).unwrap();
    let path = dir.join("content.md");
    std::fs::write(&path, content).unwrap();
    path
}

/// Writes `<posts_root>/<folder>/pic/<name>` and returns its path.
#[cfg(test)]
pub fn write_asset(posts_root: &std::path::Path, folder: &str, name: &str, bytes: &[u8]) -> std::path::PathBuf {
    let dir = posts_root.join(folder).join("pic");
    std::fs::create_dir_all(&dir).unwrap();
    let path = dir.join(name);
    std::fs::write(&path, bytes).unwrap();
    path
}

#[cfg(test)]
lazy_static::lazy_static! {
    static ref TEST_LOG_SINK: std::sync::Arc<spdlog::sink::WriteSink<Vec<u8>>> = std::sync::Arc::new(
        spdlog::sink::WriteSink::builder().target(Vec::new()).build().unwrap()
    );
}

/// Routes the default logger into an in-memory sink, every level included.
/// Tests share it, so assertions look for lines naming their own paths.
#[cfg(test)]
pub fn install_test_logger() {
    static INSTALL: std::sync::Once = std::sync::Once::new();
    INSTALL.call_once(|| {
        let sink: std::sync::Arc<dyn spdlog::sink::Sink> = std::sync::Arc::<spdlog::sink::WriteSink<Vec<u8>>>::clone(&TEST_LOG_SINK);
        let logger = spdlog::Logger::builder()
            .sink(sink)
            .level_filter(spdlog::LevelFilter::All)
            .build()
            .unwrap();
        spdlog::set_default_logger(std::sync::Arc::new(logger));
    });
}

/// Captured log lines that contain `marker`.
#[cfg(test)]
pub fn log_lines(marker: &str) -> Vec<String> {
    let bytes = TEST_LOG_SINK.clone_target();
    String::from_utf8_lossy(&bytes)
        .lines()
        .filter(|line| line.contains(marker))
        .map(|line| line.to_string())
        .collect()
}
