//! `--dry-run` support: buffer output into a temp file and diff it against
//! the original instead of writing in place. Grounded on `main.c`'s
//! `setup_dry_run`/`finish_dry_run`; the scoped cleanup falls out of
//! `tempfile::NamedTempFile`'s own `Drop` impl rather than needing a
//! bespoke guard type.

use std::io::Write;
use std::process::Command;

use anyhow::{Context, Result};
use tempfile::NamedTempFile;

pub struct DryRunGuard {
    name: String,
    color: bool,
    original: NamedTempFile,
}

impl DryRunGuard {
    pub fn new(name: &str, original: &str, color: bool) -> Result<Self> {
        let mut original_file =
            NamedTempFile::new().context("creating temp file for dry-run diff")?;
        original_file
            .write_all(original.as_bytes())
            .context("writing original content to temp file")?;
        Ok(Self {
            name: name.to_string(),
            color,
            original: original_file,
        })
    }

    /// Writes `updated` to a second temp file and shells out to `diff -u`.
    /// Returns the process exit code this command should use: `0` if diff
    /// found no differences or some differences, `1` if diff itself errored.
    pub fn finish(self, updated: &str) -> Result<i32> {
        let mut updated_file =
            NamedTempFile::new().context("creating temp file for dry-run diff")?;
        updated_file
            .write_all(updated.as_bytes())
            .context("writing updated content to temp file")?;

        let mut cmd = Command::new("diff");
        cmd.arg("-u");
        if self.color {
            cmd.arg("--color");
        }
        cmd.arg(format!("--label=a/{}", self.name));
        cmd.arg(format!("--label=b/{}", self.name));
        cmd.arg(self.original.path());
        cmd.arg(updated_file.path());

        let status = cmd.status().context("running diff for --dry-run")?;
        let diff_status = status.code().unwrap_or(2);
        Ok(if diff_status >= 2 { 1 } else { 0 })
    }
}
