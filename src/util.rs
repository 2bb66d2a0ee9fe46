use std::fs::File;
use std::io;
use std::path::Path;
use std::thread::sleep;
use std::time::Duration;

static INIT_ONCE: std::sync::Once = std::sync::Once::new();

/// Install the fmt subscriber once (stderr, `RUST_LOG`, default `info`).
pub fn init_tracing_once() {
    INIT_ONCE.call_once(|| {
        let env_filter = std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());
        let _ = tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_writer(io::stderr)
            .try_init();
    });
}

/// Return true for transient I/O errors seen on Windows when AV/backup filter
/// drivers or sharing violations briefly hold the output file.
fn is_retriable_io_error(e: &io::Error) -> bool {
    // 5 = access denied, 32 = sharing violation, 33 = lock violation
    matches!(e.raw_os_error(), Some(5) | Some(32) | Some(33))
}

/// Create a file, retrying transient failures with linear backoff.
pub fn create_with_backoff(path: &Path, tries: usize, delay_ms: u64) -> io::Result<File> {
    let mut last_err: Option<io::Error> = None;
    for i in 0..tries.max(1) {
        match File::create(path) {
            Ok(f) => return Ok(f),
            Err(e) if is_retriable_io_error(&e) => {
                tracing::debug!(path = %path.display(), error = %e, attempt = i + 1, "retrying create");
                last_err = Some(e);
                sleep(Duration::from_millis(delay_ms.saturating_mul((i + 1) as u64)));
            }
            Err(e) => return Err(e),
        }
    }
    Err(last_err.unwrap_or_else(|| io::Error::new(io::ErrorKind::Other, "create failed")))
}
