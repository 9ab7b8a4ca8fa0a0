//! External tools the API shells out to
//!
//! - `structure_search`: the chemical structure-search binary (CML output)
//! - `qsar`: the QSAR dataset-building script (JSON on stdout)

pub mod qsar;
pub mod structure_search;

pub use qsar::QsarDatasetBuilder;
pub use structure_search::{Molecule, StructureSearch};

use std::process::Stdio;
use thiserror::Error;
use tokio::io::AsyncReadExt;

/// Errors raised while running an external tool
#[derive(Debug, Error)]
pub enum ToolError {
    /// The request itself cannot be passed to the tool
    #[error("{0}")]
    InvalidInput(String),

    #[error("failed to start {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{program} exited with {status}: {stderr}")]
    Failed {
        program: String,
        status: String,
        stderr: String,
    },

    /// The tool ran but its output could not be understood
    #[error("unreadable output from {program}: {reason}")]
    Output { program: String, reason: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Bytes of stderr kept for error reports; the rest is drained and dropped
const MAX_STDERR_BYTES: usize = 64 * 1024;

/// Run a tool to completion and return its stdout.
///
/// Stdout is read through a cap of `max_output_bytes`: a tool that writes
/// more is killed and reported as [`ToolError::Output`] without the excess
/// ever being buffered.
pub(crate) async fn run_capped(
    program: &str,
    args: &[String],
    max_output_bytes: usize,
) -> Result<String, ToolError> {
    let mut child = tokio::process::Command::new(program)
        .args(args)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true)
        .spawn()
        .map_err(|source| ToolError::Spawn {
            program: program.to_string(),
            source,
        })?;

    let (Some(stdout), Some(mut stderr)) = (child.stdout.take(), child.stderr.take()) else {
        return Err(ToolError::Output {
            program: program.to_string(),
            reason: "output pipes were not captured".to_string(),
        });
    };

    let limit = (max_output_bytes as u64).saturating_add(1);
    let read_stdout = async {
        let mut buf = Vec::new();
        stdout.take(limit).read_to_end(&mut buf).await?;
        if buf.len() > max_output_bytes {
            if let Err(e) = child.start_kill() {
                tracing::debug!(program, "Could not stop tool after oversized output: {}", e);
            }
        }
        Ok::<_, std::io::Error>(buf)
    };
    let read_stderr = async {
        let mut kept = Vec::new();
        let mut chunk = [0u8; 8192];
        loop {
            let n = stderr.read(&mut chunk).await?;
            if n == 0 {
                break;
            }
            let room = MAX_STDERR_BYTES.saturating_sub(kept.len());
            kept.extend_from_slice(&chunk[..n.min(room)]);
        }
        Ok::<_, std::io::Error>(kept)
    };

    let (stdout, stderr) = tokio::try_join!(read_stdout, read_stderr)?;
    let status = child.wait().await?;

    if stdout.len() > max_output_bytes {
        tracing::warn!(program, limit = max_output_bytes, "External tool output too large");
        return Err(ToolError::Output {
            program: program.to_string(),
            reason: format!("output exceeds the {} byte limit", max_output_bytes),
        });
    }
    if !status.success() {
        let stderr = String::from_utf8_lossy(&stderr).trim().to_string();
        tracing::warn!(program, status = %status, stderr = %stderr, "External tool failed");
        return Err(ToolError::Failed {
            program: program.to_string(),
            status: status.to_string(),
            stderr,
        });
    }
    String::from_utf8(stdout).map_err(|e| ToolError::Output {
        program: program.to_string(),
        reason: e.to_string(),
    })
}
