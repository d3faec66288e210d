//! Sound library maintenance: verify local files against the published
//! manifest and download whatever is missing or outdated.

mod manifest;

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::thread;
use std::time::Duration;

use md5::{Digest, Md5};
use reqwest::blocking::Client;
use tracing::{debug, warn};

use crate::config::FetchSettings;
use crate::error::{Error, Result};

pub use manifest::{ManifestEntry, load_manifest, parse_manifest};

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum EntryStatus {
    Valid,
    Outdated,
    /// Present locally but the manifest has no hash to compare against.
    Unverifiable,
    Missing,
}

impl EntryStatus {
    /// Progress marker printed while verifying.
    pub fn marker(self) -> char {
        match self {
            Self::Valid => '.',
            Self::Outdated => '-',
            Self::Unverifiable => '~',
            Self::Missing => 'M',
        }
    }
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Verification {
    pub missing: Vec<String>,
    pub needs_update: Vec<String>,
    pub cannot_validate: Vec<String>,
}

/// Result of one HTTP GET.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Download {
    pub status: u16,
    /// Empty unless the request succeeded.
    pub body: Vec<u8>,
}

impl Download {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Source of library files.
pub trait Remote {
    fn get(&self, url: &str) -> Result<Download>;
}

impl Remote for Client {
    fn get(&self, url: &str) -> Result<Download> {
        let response = Client::get(self, url).send()?;
        let status = response.status();
        let body = if status.is_success() {
            response.bytes()?.to_vec()
        } else {
            Vec::new()
        };
        Ok(Download {
            status: status.as_u16(),
            body,
        })
    }
}

/// Hex MD5 digest of a file's contents.
pub fn hash_file(path: &Path) -> io::Result<String> {
    let bytes = fs::read(path)?;
    Ok(hex::encode(Md5::digest(&bytes)))
}

pub struct Library {
    dir: PathBuf,
    base_url: String,
    manifest_path: PathBuf,
    manifest_url: String,
    request_delay: Duration,
    timeout: Duration,
}

impl Library {
    pub fn new(settings: &FetchSettings) -> Self {
        Self {
            dir: settings.library_dir(),
            base_url: settings.base_url.trim_end_matches('/').to_string(),
            manifest_path: settings.manifest_path(),
            manifest_url: settings.manifest_url(),
            request_delay: Duration::from_millis(settings.request_delay_ms),
            timeout: Duration::from_secs(settings.timeout_secs),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Read the local manifest, downloading it first when there is none yet.
    pub fn manifest<R: Remote>(&self, remote: &R) -> Result<Vec<ManifestEntry>> {
        if !self.manifest_path.is_file() {
            debug!(url = %self.manifest_url, "no local manifest, downloading");
            let download = remote.get(&self.manifest_url)?;
            if !download.is_success() {
                return Err(Error::Manifest(format!(
                    "cannot download {}: HTTP {}",
                    self.manifest_url, download.status
                )));
            }
            // Only a manifest that parses gets saved.
            let text = String::from_utf8(download.body)
                .map_err(|e| Error::Manifest(format!("{}: {e}", self.manifest_url)))?;
            let entries = parse_manifest(&text)?;
            if let Some(parent) = self.manifest_path.parent() {
                fs::create_dir_all(parent)?;
            }
            fs::write(&self.manifest_path, text)?;
            return Ok(entries);
        }
        load_manifest(&self.manifest_path)
    }

    pub fn url_for(&self, filename: &str) -> String {
        format!("{}/{}", self.base_url, filename.trim_start_matches('/'))
    }

    /// Check one manifest entry against the local copy. Entries without a
    /// usable filename are skipped (`None`).
    pub fn verify_entry(&self, entry: &ManifestEntry) -> Result<Option<EntryStatus>> {
        let Some(rel) = entry.relative_path() else {
            if entry.filename.is_some() {
                warn!("ignoring manifest entry {:?}", entry.filename);
            }
            return Ok(None);
        };

        let local = self.dir.join(rel);
        if !local.is_file() {
            return Ok(Some(EntryStatus::Missing));
        }
        let status = match entry.hash.as_deref().map(str::trim) {
            Some(expected) if !expected.is_empty() => {
                if hash_file(&local)?.eq_ignore_ascii_case(expected) {
                    EntryStatus::Valid
                } else {
                    EntryStatus::Outdated
                }
            }
            _ => EntryStatus::Unverifiable,
        };
        Ok(Some(status))
    }

    pub fn verify<F>(&self, entries: &[ManifestEntry], mut progress: F) -> Result<Verification>
    where
        F: FnMut(EntryStatus),
    {
        let mut report = Verification::default();
        for entry in entries {
            let Some(status) = self.verify_entry(entry)? else {
                continue;
            };
            progress(status);
            let name = entry.filename.clone().unwrap_or_default();
            match status {
                EntryStatus::Valid => {}
                EntryStatus::Outdated => report.needs_update.push(name),
                EntryStatus::Unverifiable => report.cannot_validate.push(name),
                EntryStatus::Missing => report.missing.push(name),
            }
        }
        Ok(report)
    }

    /// Download `files` into the library, pausing between requests.
    /// Returns how many were written.
    pub fn fetch_files<R: Remote, W: Write>(
        &self,
        remote: &R,
        files: &[String],
        label: &str,
        out: &mut W,
    ) -> Result<usize> {
        if files.is_empty() {
            return Ok(0);
        }

        writeln!(out, "Fetching {} {} file(s).", files.len(), label)?;
        let mut written = 0;
        for filename in files {
            let url = self.url_for(filename);
            write!(out, " >> {filename} ")?;
            out.flush()?;

            let download = remote.get(&url)?;
            write!(out, "{}", download.status)?;

            if download.is_success() {
                let target = self.dir.join(filename);
                if let Some(parent) = target.parent() {
                    fs::create_dir_all(parent)?;
                }
                fs::write(&target, &download.body)?;
                write!(out, " -> {}", target.display())?;
                written += 1;
            } else {
                debug!(%url, status = download.status, "download failed");
            }
            writeln!(out)?;
            out.flush()?;

            thread::sleep(self.request_delay);
        }
        Ok(written)
    }
}

/// `--fetch-library`: verify the local library and download what is needed.
pub fn run(settings: &FetchSettings) -> Result<()> {
    let library = Library::new(settings);
    let client = Client::builder().timeout(library.timeout).build()?;
    let stdout = io::stdout();
    run_with(&library, &client, &mut stdout.lock())
}

pub fn run_with<R: Remote, W: Write>(library: &Library, remote: &R, out: &mut W) -> Result<()> {
    fs::create_dir_all(library.dir())?;
    let entries = library.manifest(remote)?;

    write!(out, "Verifying sound library ")?;
    out.flush()?;
    let report = library.verify(&entries, |status| {
        let _ = write!(out, "{}", status.marker());
        let _ = out.flush();
    })?;
    writeln!(out)?;

    if !report.missing.is_empty() {
        writeln!(out, "Missing {} file(s).", report.missing.len())?;
    }
    if !report.needs_update.is_empty() {
        writeln!(out, "Files needing updates: {}", report.needs_update.len())?;
    }
    if report.missing.is_empty() && report.needs_update.is_empty() {
        writeln!(out, "Sound library is up to date.")?;
        return Ok(());
    }

    library.fetch_files(remote, &report.missing, "missing", out)?;
    library.fetch_files(remote, &report.needs_update, "needing update", out)?;
    Ok(())
}
