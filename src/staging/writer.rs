use std::fs;
use std::path::{Path, PathBuf};

use sha2::{Digest, Sha256};
use tracing::warn;

use crate::app::{Result, TrickleError};
use crate::domain::Entry;
use crate::staging::staging_dir;
use crate::store::atomic::write_atomic;

/// Longest slug kept in a record name, in bytes.
const MAX_SLUG_BYTES: usize = 96;

/// Hex digits of the content hash appended to each record name.
const HASH_CHARS: usize = 8;

/// Writes fetched entries into staging directories.
#[derive(Debug, Clone)]
pub struct EntryWriter {
    base_dir: PathBuf,
}

impl EntryWriter {
    pub fn new<P: AsRef<Path>>(base_dir: P) -> Self {
        Self {
            base_dir: base_dir.as_ref().to_path_buf(),
        }
    }

    pub fn staging_dir(&self, feed_name: &str) -> PathBuf {
        staging_dir(&self.base_dir, feed_name)
    }

    /// Stage one entry, returning the path of the record.
    ///
    /// An existing record with the same name is replaced.
    pub fn write(&self, entry: &Entry, dir: &Path) -> Result<PathBuf> {
        fs::create_dir_all(dir).map_err(|source| TrickleError::Write {
            path: dir.to_path_buf(),
            source,
        })?;

        let record = serde_json::to_string_pretty(&entry.to_record())?;
        let path = dir.join(derive_key(entry, record.as_bytes()));

        write_atomic(&path, record.as_bytes()).map_err(|source| TrickleError::Write {
            path: path.clone(),
            source,
        })?;

        Ok(path)
    }

    /// Stage every entry of a feed in order. Failures are logged and skipped;
    /// the number of records written is returned.
    pub fn write_all(&self, feed_name: &str, entries: &[Entry]) -> usize {
        let dir = self.staging_dir(feed_name);
        let mut written = 0;

        for entry in entries {
            match self.write(entry, &dir) {
                Ok(_) => written += 1,
                Err(e) => {
                    warn!(
                        feed = feed_name,
                        title = %entry.title,
                        error = %e,
                        "failed to stage entry"
                    );
                }
            }
        }

        written
    }
}

/// Record file name: `YYYY-MM-DD-HH-mm-ss-<slug>-<hash>.json`.
///
/// The hash covers the serialized record, so distinct entries that share a
/// date and title get distinct names while an identical entry maps onto the
/// same file again.
pub fn derive_key(entry: &Entry, record: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(record);
    let digest = hex::encode(hasher.finalize());

    format!(
        "{}-{}-{}.json",
        entry.date.format("%Y-%m-%d-%H-%M-%S"),
        slugify(&entry.title),
        &digest[..HASH_CHARS]
    )
}

/// Lower-case the title and collapse every run of non-alphanumeric
/// characters into a single `-`.
pub fn slugify(title: &str) -> String {
    let mut slug = String::new();
    let mut pending_dash = false;

    for c in title.chars().flat_map(char::to_lowercase) {
        if c.is_alphanumeric() {
            if pending_dash && !slug.is_empty() {
                if slug.len() + 1 + c.len_utf8() > MAX_SLUG_BYTES {
                    break;
                }
                slug.push('-');
            }
            if slug.len() + c.len_utf8() > MAX_SLUG_BYTES {
                break;
            }
            slug.push(c);
            pending_dash = false;
        } else {
            pending_dash = true;
        }
    }

    if slug.is_empty() {
        slug.push_str("untitled");
    }
    slug
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;
    use crate::domain::StagedRecord;

    fn entry(title: &str, summary: &str) -> Entry {
        let mut entry = Entry::new(Some(title.to_string()));
        entry.summary = Some(summary.to_string());
        entry.date = NaiveDate::from_ymd_opt(2024, 3, 9)
            .unwrap()
            .and_hms_opt(7, 5, 0)
            .unwrap();
        entry
    }

    fn staged_files(dir: &Path) -> Vec<String> {
        let mut names: Vec<_> = fs::read_dir(dir)
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();
        names
    }

    #[test]
    fn test_slugify() {
        assert_eq!(slugify("Hello World"), "hello-world");
        assert_eq!(slugify("A/B testing: why?"), "a-b-testing-why");
        assert_eq!(slugify("  --Rust 1.80--  "), "rust-1-80");
        assert_eq!(slugify("Ünïcode Tïtle"), "ünïcode-tïtle");
        assert_eq!(slugify("!!!"), "untitled");
    }

    #[test]
    fn test_slug_is_bounded() {
        let long = "word ".repeat(100);
        let slug = slugify(&long);
        assert!(slug.len() <= MAX_SLUG_BYTES);
        assert!(!slug.ends_with('-'));
    }

    #[test]
    fn test_derive_key_format() {
        let e = entry("Hello World", "body");
        let key = derive_key(&e, b"record");
        assert!(key.starts_with("2024-03-09-07-05-00-hello-world-"), "{key}");
        assert!(key.ends_with(".json"));

        let hash = key
            .trim_start_matches("2024-03-09-07-05-00-hello-world-")
            .trim_end_matches(".json");
        assert_eq!(hash.len(), HASH_CHARS);
        assert!(hash.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_write_creates_directory_and_record() {
        let tmp = tempfile::tempdir().unwrap();
        let writer = EntryWriter::new(tmp.path());
        let dir = writer.staging_dir("tech");

        let mut e = entry("Hello World", "body");
        e.link = Some("https://example.com/hello".into());
        e.published = Some("2024-03-09T07:05:00+00:00".into());
        let path = writer.write(&e, &dir).unwrap();

        assert_eq!(path.parent().unwrap(), tmp.path().join("tech").join("new"));
        let record: StagedRecord =
            serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(record, e.to_record());

        // A second write into the now-existing directory is fine too.
        writer.write(&entry("Other", "x"), &dir).unwrap();
        assert_eq!(staged_files(&dir).len(), 2);
    }

    #[test]
    fn test_identical_entries_overwrite() {
        let tmp = tempfile::tempdir().unwrap();
        let writer = EntryWriter::new(tmp.path());

        let e = entry("Same", "same body");
        let written = writer.write_all("tech", &[e.clone(), e]);

        assert_eq!(written, 2);
        assert_eq!(staged_files(&writer.staging_dir("tech")).len(), 1);
    }

    #[test]
    fn test_same_title_and_date_different_content_kept_apart() {
        let tmp = tempfile::tempdir().unwrap();
        let writer = EntryWriter::new(tmp.path());

        writer.write_all("tech", &[entry("Same", "first"), entry("Same", "second")]);

        let files = staged_files(&writer.staging_dir("tech"));
        assert_eq!(files.len(), 2);
        assert!(files
            .iter()
            .all(|f| f.starts_with("2024-03-09-07-05-00-same-")));
    }

    #[test]
    fn test_write_failure_does_not_stop_siblings() {
        let tmp = tempfile::tempdir().unwrap();
        let writer = EntryWriter::new(tmp.path());

        // A plain file where the feed directory should be makes every write fail.
        fs::write(tmp.path().join("broken"), b"").unwrap();
        let written = writer.write_all("broken", &[entry("One", "1"), entry("Two", "2")]);
        assert_eq!(written, 0);

        let err = writer
            .write(&entry("One", "1"), &writer.staging_dir("broken"))
            .unwrap_err();
        assert!(matches!(err, TrickleError::Write { .. }));
    }
}
