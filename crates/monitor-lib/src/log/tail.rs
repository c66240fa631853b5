//! Tail reading for append-only text logs
//!
//! The file is read backwards in fixed-size blocks until enough line
//! breaks have been seen, so memory use follows the tail rather than the
//! size of the log.

use std::io::{ErrorKind, SeekFrom};
use std::path::Path;

use tokio::fs::File;
use tokio::io::{AsyncReadExt, AsyncSeekExt};

use crate::error::MonitorError;

/// Block size used when scanning backwards
const BLOCK_SIZE: u64 = 8 * 1024;

/// Shown in place of a tail when the log does not exist
pub const FILE_NOT_FOUND: &str = "Log file not found";

/// Shown in place of a tail when the log exists but is empty
pub const NO_DATA_YET: &str = "No data yet";

/// Read the last `n` lines of a file, oldest first
///
/// A missing file yields an empty vector. A trailing line without a
/// newline (the producer is mid-write) is returned as the newest line.
pub async fn read_tail(path: &Path, n: usize) -> Result<Vec<String>, MonitorError> {
    let mut file = match File::open(path).await {
        Ok(file) => file,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
        Err(e) => return Err(io_error(path, e)),
    };

    if n == 0 {
        return Ok(Vec::new());
    }

    let len = file
        .metadata()
        .await
        .map_err(|e| io_error(path, e))?
        .len();

    let mut pos = len;
    let mut buf: Vec<u8> = Vec::new();

    // n complete lines need n terminators plus the one ending the line before them
    while pos > 0 && count_newlines(&buf) <= n {
        let read_len = BLOCK_SIZE.min(pos);
        pos -= read_len;

        file.seek(SeekFrom::Start(pos))
            .await
            .map_err(|e| io_error(path, e))?;

        let mut block = vec![0u8; read_len as usize];
        file.read_exact(&mut block)
            .await
            .map_err(|e| io_error(path, e))?;

        block.extend_from_slice(&buf);
        buf = block;
    }

    let text = String::from_utf8_lossy(&buf);
    let mut lines: Vec<&str> = text.lines().collect();

    // The first segment may start mid-line unless the scan reached the start
    if pos > 0 && !lines.is_empty() {
        lines.remove(0);
    }

    let skip = lines.len().saturating_sub(n);
    Ok(lines.into_iter().skip(skip).map(str::to_string).collect())
}

/// Already-read tail joined for display
///
/// With no lines, the file's existence picks the sentinel; the log itself
/// is not read again.
pub async fn display_tail(path: &Path, lines: &[String]) -> String {
    if !lines.is_empty() {
        return lines.join("\n");
    }

    match tokio::fs::try_exists(path).await {
        Ok(false) => FILE_NOT_FOUND.to_string(),
        _ => NO_DATA_YET.to_string(),
    }
}

fn count_newlines(buf: &[u8]) -> usize {
    buf.iter().filter(|&&b| b == b'\n').count()
}

fn io_error(path: &Path, source: std::io::Error) -> MonitorError {
    MonitorError::Io {
        path: path.to_path_buf(),
        source,
    }
}
