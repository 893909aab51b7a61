// SPDX-FileCopyrightText: 2025 Jason Pena <jasonpena@awkless.com>
// SPDX-License-Identifier: MIT

//! Idempotent configuration line writer.
//!
//! Shell startup files and kernel parameter files are mutated by appending
//! lines. A plain append duplicates configuration on every re-run, so all
//! appends go through [`ensure_line`], which guarantees a given line exists
//! in the target file exactly once.

use std::{
    fs::{self, OpenOptions},
    io::{self, Write},
    path::Path,
};
use tracing::debug;

/// Ensure `line` exists in the file at `path` exactly once.
///
/// Appends the line only when no existing line matches it exactly. Creates
/// the file, and any missing parent directories, when the file does not
/// exist yet. Returns `true` when an append occurred.
///
/// # Errors
///
/// - Return [`io::Error`] if the file cannot be read, created, or written.
pub fn ensure_line(path: impl AsRef<Path>, line: impl AsRef<str>) -> io::Result<bool> {
    let path = path.as_ref();
    let line = line.as_ref();

    let contents = match fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(error) if error.kind() == io::ErrorKind::NotFound => String::new(),
        Err(error) => return Err(error),
    };

    if contents.lines().any(|existing| existing == line) {
        debug!("{:?} already contains {:?}", path.display(), line);
        return Ok(false);
    }

    if let Some(parent) = path.parent() {
        mkdirp::mkdirp(parent)?;
    }

    let mut file = OpenOptions::new().create(true).append(true).open(path)?;

    // INVARIANT: Never glue the new line onto a partial trailing line.
    if !contents.is_empty() && !contents.ends_with('\n') {
        file.write_all(b"\n")?;
    }
    file.write_all(line.as_bytes())?;
    file.write_all(b"\n")?;

    debug!("appended {:?} to {:?}", line, path.display());

    Ok(true)
}

/// Ensure every line of `block` exists in the file at `path`.
///
/// Each line is handled independently through [`ensure_line`], so a block
/// that was partially written by an interrupted run gets completed rather
/// than duplicated. Returns `true` when at least one append occurred.
///
/// # Errors
///
/// - Return [`io::Error`] if the file cannot be read, created, or written.
pub fn ensure_block(
    path: impl AsRef<Path>,
    block: impl IntoIterator<Item = impl AsRef<str>>,
) -> io::Result<bool> {
    let mut changed = false;
    for line in block {
        changed |= ensure_line(path.as_ref(), line)?;
    }

    Ok(changed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use sealed_test::prelude::*;

    #[sealed_test]
    fn appends_missing_line_with_parent_dirs() -> anyhow::Result<()> {
        let appended = ensure_line("etc/rc/bashrc", "alias docker=podman")?;

        assert_eq!(appended, true);
        assert_eq!(
            fs::read_to_string("etc/rc/bashrc")?,
            "alias docker=podman\n"
        );

        Ok(())
    }

    #[sealed_test]
    fn repeated_calls_append_exactly_once() -> anyhow::Result<()> {
        ensure_line("bashrc", "alias docker=podman")?;
        let appended = ensure_line("bashrc", "alias docker=podman")?;

        assert_eq!(appended, false);
        assert_eq!(fs::read_to_string("bashrc")?, "alias docker=podman\n");

        Ok(())
    }

    #[sealed_test]
    fn preserves_existing_contents() -> anyhow::Result<()> {
        fs::write("bashrc", "export EDITOR=vim")?;
        ensure_line("bashrc", "alias docker=podman")?;

        assert_eq!(
            fs::read_to_string("bashrc")?,
            "export EDITOR=vim\nalias docker=podman\n"
        );

        Ok(())
    }

    #[sealed_test]
    fn block_completes_partial_writes() -> anyhow::Result<()> {
        fs::write("zshrc", "export NVM_DIR=\"$HOME/.nvm\"\n")?;
        let changed = ensure_block(
            "zshrc",
            [
                "export NVM_DIR=\"$HOME/.nvm\"",
                "[ -s \"$NVM_DIR/nvm.sh\" ] && \\. \"$NVM_DIR/nvm.sh\"",
            ],
        )?;

        assert_eq!(changed, true);
        assert_eq!(
            fs::read_to_string("zshrc")?,
            "export NVM_DIR=\"$HOME/.nvm\"\n[ -s \"$NVM_DIR/nvm.sh\" ] && \\. \"$NVM_DIR/nvm.sh\"\n"
        );

        Ok(())
    }
}
