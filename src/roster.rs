use std::{
    collections::HashSet,
    fs,
    io::{BufWriter, Write},
    path::{Path, PathBuf},
};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum RosterError {
    #[error("failed to read roster file '{path}': {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to write roster file '{path}': {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Flat-file store for the pending-identity list and the used set.
///
/// Both files are newline-delimited identity handles. Every mutation is a
/// full overwrite through a temp file + rename, synced before it returns, so
/// a crash never loses an identity's used marking.
#[derive(Debug, Clone)]
pub struct Roster {
    pending_path: PathBuf,
    used_path: PathBuf,
}

impl Roster {
    pub fn new(pending_path: PathBuf, used_path: PathBuf) -> Self {
        Self {
            pending_path,
            used_path,
        }
    }

    pub fn pending_path(&self) -> &Path {
        &self.pending_path
    }

    pub fn used_path(&self) -> &Path {
        &self.used_path
    }

    /// Ordered pending identities. A missing file reads as an empty list.
    pub fn load_pending(&self) -> Result<Vec<String>, RosterError> {
        read_list(&self.pending_path)
    }

    /// Identities confirmed claimed on earlier runs, in file order.
    pub fn load_used(&self) -> Result<Vec<String>, RosterError> {
        read_list(&self.used_path)
    }

    /// Adds `identity` to the used set. Returns `false` without touching the
    /// file when the identity is already present; existing entries keep
    /// their order across rewrites.
    pub fn mark_used(&self, identity: &str) -> Result<bool, RosterError> {
        let entries = read_list(&self.used_path)?;
        let mut seen: HashSet<&str> = HashSet::with_capacity(entries.len());
        let mut deduped: Vec<&str> = Vec::with_capacity(entries.len() + 1);
        for entry in &entries {
            if seen.insert(entry.as_str()) {
                deduped.push(entry.as_str());
            }
        }
        if seen.contains(identity) {
            return Ok(false);
        }
        deduped.push(identity);
        write_list(&self.used_path, &deduped)?;
        Ok(true)
    }

    /// Drops `identity` from the pending list and persists the remainder.
    pub fn remove_pending(&self, identity: &str) -> Result<(), RosterError> {
        let entries = read_list(&self.pending_path)?;
        let remaining: Vec<&str> = entries
            .iter()
            .map(String::as_str)
            .filter(|entry| *entry != identity)
            .collect();
        write_list(&self.pending_path, &remaining)
    }
}

fn read_list(path: &Path) -> Result<Vec<String>, RosterError> {
    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
        Err(err) => {
            return Err(RosterError::Read {
                path: path.to_path_buf(),
                source: err,
            });
        }
    };

    Ok(content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect())
}

fn write_list(path: &Path, entries: &[&str]) -> Result<(), RosterError> {
    let write_err = |source: std::io::Error| RosterError::Write {
        path: path.to_path_buf(),
        source,
    };

    let parent = path.parent().filter(|parent| !parent.as_os_str().is_empty());
    if let Some(parent) = parent {
        fs::create_dir_all(parent).map_err(write_err)?;
    }

    let tmp_path = path.with_extension("tmp");
    let file = fs::File::create(&tmp_path).map_err(write_err)?;
    {
        let mut writer = BufWriter::new(file);
        for entry in entries {
            writer.write_all(entry.as_bytes()).map_err(write_err)?;
            writer.write_all(b"\n").map_err(write_err)?;
        }
        writer.flush().map_err(write_err)?;
    }

    let tmp_file = fs::OpenOptions::new()
        .read(true)
        .open(&tmp_path)
        .map_err(write_err)?;
    tmp_file.sync_all().map_err(write_err)?;

    fs::rename(&tmp_path, path).map_err(write_err)?;

    if let Some(parent) = parent
        && let Ok(parent_file) = fs::File::open(parent)
    {
        let _ = parent_file.sync_all();
    }

    Ok(())
}
