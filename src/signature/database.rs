// Wed Jan 14 2026 - Alex

use crate::signature::parser::{format_signatures, parse_signatures, ParsedRecord};
use crate::signature::{RelocKind, Signature, SignatureError, SignatureRecord};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::{DirEntry, WalkDir};

/// Extensions picked up when a signature directory is walked.
const SIGNATURE_EXTENSIONS: [&str; 3] = ["sig", "txt", "json"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignatureFormat {
    /// Plain-text `sig_v1`.
    Text,
    /// JSON array of [`SignatureRecord`].
    Json,
}

impl SignatureFormat {
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => SignatureFormat::Json,
            _ => SignatureFormat::Text,
        }
    }

    pub fn is_signature_file(path: &Path) -> bool {
        path.extension()
            .and_then(|e| e.to_str())
            .map(|ext| SIGNATURE_EXTENSIONS.iter().any(|known| ext.eq_ignore_ascii_case(known)))
            .unwrap_or(false)
    }
}

fn is_hidden(entry: &DirEntry) -> bool {
    entry.depth() > 0 && entry.file_name().to_str().map(|s| s.starts_with('.')).unwrap_or(false)
}

/// Files to load for `path`. A file is returned as is whatever its
/// extension; a directory is walked recursively for signature files in name
/// order, skipping hidden entries.
pub fn signature_files(path: &Path) -> Result<Vec<PathBuf>, SignatureError> {
    if !path.is_dir() {
        return Ok(vec![path.to_path_buf()]);
    }

    let mut files = Vec::new();
    for entry in WalkDir::new(path).sort_by_file_name().into_iter().filter_entry(|e| !is_hidden(e)) {
        let entry = entry?;
        if entry.file_type().is_file() && SignatureFormat::is_signature_file(entry.path()) {
            files.push(entry.into_path());
        }
    }
    log::debug!("{} signature files under {}", files.len(), path.display());
    Ok(files)
}

/// A record that failed validation and was left out of the database.
#[derive(Debug)]
pub struct RejectedRecord {
    pub name: String,
    pub source: Option<PathBuf>,
    pub line: Option<usize>,
    pub error: SignatureError,
}

/// Outcome of loading one or more signature sources.
#[derive(Debug, Default)]
pub struct LoadReport {
    pub loaded: usize,
    pub rejected: Vec<RejectedRecord>,
}

impl LoadReport {
    pub fn is_complete(&self) -> bool {
        self.rejected.is_empty()
    }

    fn merge(&mut self, other: LoadReport) {
        self.loaded += other.loaded;
        self.rejected.extend(other.rejected);
    }
}

/// In-memory signature repository, kept in load order.
#[derive(Debug, Clone, Default)]
pub struct SignatureDatabase {
    signatures: Vec<Signature>,
    by_name: HashMap<String, usize>,
}

impl SignatureDatabase {
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate records, keeping the good ones and reporting the rest.
    pub fn from_records<I>(records: I) -> (Self, LoadReport)
    where
        I: IntoIterator<Item = SignatureRecord>,
    {
        let mut db = Self::new();
        let report = db.extend_records(records.into_iter().map(|record| (None, record)), None);
        (db, report)
    }

    pub fn from_text(source: &str) -> Result<(Self, LoadReport), SignatureError> {
        let mut db = Self::new();
        let report = db.add_source(source, SignatureFormat::Text, None)?;
        Ok((db, report))
    }

    pub fn from_json(source: &str) -> Result<(Self, LoadReport), SignatureError> {
        let mut db = Self::new();
        let report = db.add_source(source, SignatureFormat::Json, None)?;
        Ok((db, report))
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<(Self, LoadReport), SignatureError> {
        let mut db = Self::new();
        let report = db.add_file(path)?;
        Ok((db, report))
    }

    /// Load several files or directories into one repository. A syntax
    /// error in any file aborts the load; malformed records are only
    /// reported.
    pub fn load_all<P: AsRef<Path>>(paths: &[P]) -> Result<(Self, LoadReport), SignatureError> {
        let mut db = Self::new();
        let mut report = LoadReport::default();
        for path in paths {
            for file in signature_files(path.as_ref())? {
                report.merge(db.add_file(&file)?);
            }
        }
        Ok((db, report))
    }

    pub fn add_file<P: AsRef<Path>>(&mut self, path: P) -> Result<LoadReport, SignatureError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)?;
        let format = SignatureFormat::from_path(path);
        let report = self.add_source(&content, format, Some(path))?;
        log::info!(
            "Loaded {} signatures from {} ({} rejected)",
            report.loaded,
            path.display(),
            report.rejected.len()
        );
        Ok(report)
    }

    pub fn add_source(
        &mut self,
        source: &str,
        format: SignatureFormat,
        origin: Option<&Path>,
    ) -> Result<LoadReport, SignatureError> {
        let records: Vec<(Option<usize>, SignatureRecord)> = match format {
            SignatureFormat::Text => parse_signatures(source)?
                .into_iter()
                .map(|ParsedRecord { line, record }| (Some(line), record))
                .collect(),
            SignatureFormat::Json => serde_json::from_str::<Vec<SignatureRecord>>(source)?
                .into_iter()
                .map(|record| (None, record))
                .collect(),
        };
        Ok(self.extend_records(records, origin))
    }

    fn extend_records<I>(&mut self, records: I, origin: Option<&Path>) -> LoadReport
    where
        I: IntoIterator<Item = (Option<usize>, SignatureRecord)>,
    {
        let mut report = LoadReport::default();
        for (line, record) in records {
            let name = record.name.clone();
            match record.into_signature() {
                Ok(signature) => {
                    self.add_signature(signature);
                    report.loaded += 1;
                }
                Err(error) => {
                    log::warn!("Rejected signature '{}': {}", name, error);
                    report.rejected.push(RejectedRecord {
                        name,
                        source: origin.map(Path::to_path_buf),
                        line,
                        error,
                    });
                }
            }
        }
        report
    }

    /// Later signatures with a name already present are kept too; lookup by
    /// name returns the first one.
    pub fn add_signature(&mut self, signature: Signature) {
        self.by_name
            .entry(signature.name().to_string())
            .or_insert(self.signatures.len());
        self.signatures.push(signature);
    }

    pub fn get(&self, name: &str) -> Option<&Signature> {
        self.by_name.get(name).map(|&index| &self.signatures[index])
    }

    pub fn len(&self) -> usize {
        self.signatures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.signatures.is_empty()
    }

    pub fn as_slice(&self) -> &[Signature] {
        &self.signatures
    }

    pub fn iter(&self) -> impl Iterator<Item = &Signature> {
        self.signatures.iter()
    }

    pub fn relocation_count(&self, kind: RelocKind) -> usize {
        self.signatures.iter().map(|s| s.count_relocations(kind)).sum()
    }

    pub fn total_bytes(&self) -> u64 {
        self.signatures.iter().map(|s| s.size() as u64).sum()
    }

    /// The whole repository as `sig_v1` text.
    pub fn to_sig_v1(&self) -> String {
        let records: Vec<SignatureRecord> = self.signatures.iter().map(Signature::to_record).collect();
        format_signatures(&records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const TEXT: &str = "# sig_v1\n\
        good 0x10 0x11111111 0x22222222\n\
        \x20.targ26 callee 0x4\n\
        odd 0x0E 0 0\n\
        outside 0x08 0 0\n\
        \x20.hi16 g 0x8\n\
        also_good 0x4 0 0\n";

    #[test]
    fn test_malformed_records_are_reported_not_dropped() {
        let (db, report) = SignatureDatabase::from_text(TEXT).unwrap();
        assert_eq!(db.len(), 2);
        assert_eq!(report.loaded, 2);
        assert!(!report.is_complete());

        let rejected: Vec<(&str, Option<usize>)> =
            report.rejected.iter().map(|r| (r.name.as_str(), r.line)).collect();
        assert_eq!(rejected, vec![("odd", Some(4)), ("outside", Some(5))]);
        assert!(report.rejected.iter().all(|r| r.error.is_malformed_record()));

        assert!(db.get("good").is_some());
        assert!(db.get("odd").is_none());
        assert_eq!(db.as_slice()[1].name(), "also_good");
    }

    #[test]
    fn test_syntax_error_fails_whole_source() {
        let result = SignatureDatabase::from_text("good 4 0 0\n.bogus x 0\n");
        assert!(matches!(result, Err(SignatureError::Parse { line: 2, .. })));
    }

    #[test]
    fn test_json_source() {
        let json = r#"[
            { "name": "a", "size": 8, "crc_a": 1, "crc_b": 2 },
            { "name": "b", "size": 16, "crc_a": 3, "crc_b": 4,
              "relocations": [
                { "kind": "hi16", "name": "gVar", "offsets": [0] },
                { "kind": "lo16", "name": "gVar", "offsets": [8, 4] }
              ] }
        ]"#;
        let (db, report) = SignatureDatabase::from_json(json).unwrap();
        assert!(report.is_complete());
        assert_eq!(db.len(), 2);
        assert_eq!(db.relocation_count(RelocKind::Lo16), 2);
        assert_eq!(db.total_bytes(), 24);
        let offsets: Vec<u32> = db.get("b").unwrap().relocations().iter().map(|r| r.offset).collect();
        assert_eq!(offsets, vec![0, 4, 8]);
    }

    #[test]
    fn test_load_all_merges_files_by_extension() {
        let dir = tempfile::tempdir().unwrap();
        let text_path = dir.path().join("libultra.sig");
        let json_path = dir.path().join("extra.json");

        fs::File::create(&text_path)
            .unwrap()
            .write_all(b"first 4 0 0\nbroken 3 0 0\n")
            .unwrap();
        fs::write(&json_path, r#"[{ "name": "second", "size": 4, "crc_a": 0, "crc_b": 0 }]"#).unwrap();

        let (db, report) = SignatureDatabase::load_all(&[&text_path, &json_path]).unwrap();
        assert_eq!(db.len(), 2);
        assert_eq!(report.loaded, 2);
        assert_eq!(report.rejected.len(), 1);
        assert_eq!(report.rejected[0].source.as_deref(), Some(text_path.as_path()));
    }

    #[test]
    fn test_load_all_walks_directories() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("libultra").join("os");
        let hidden = dir.path().join(".cache");
        fs::create_dir_all(&nested).unwrap();
        fs::create_dir_all(&hidden).unwrap();

        fs::write(dir.path().join("a.sig"), "top 4 0 0\n").unwrap();
        fs::write(dir.path().join("README.md"), "not signatures\n").unwrap();
        fs::write(dir.path().join("libultra").join("b.json"), r#"[{ "name": "middle", "size": 4, "crc_a": 0, "crc_b": 0 }]"#).unwrap();
        fs::write(nested.join("c.sig"), "deep 8 0 0\n").unwrap();
        fs::write(hidden.join("d.sig"), "skipped 4 0 0\n").unwrap();

        let files = signature_files(dir.path()).unwrap();
        let names: Vec<&str> = files.iter().filter_map(|f| f.file_name()?.to_str()).collect();
        assert_eq!(names, vec!["a.sig", "b.json", "c.sig"]);

        let extra = dir.path().join("extra.dat");
        fs::write(&extra, "named 4 0 0\n").unwrap();
        let (db, report) = SignatureDatabase::load_all(&[dir.path().to_path_buf(), extra]).unwrap();
        assert!(report.is_complete());
        let loaded: Vec<&str> = db.iter().map(|s| s.name()).collect();
        assert_eq!(loaded, vec!["top", "middle", "deep", "named"]);
    }

    #[test]
    fn test_empty_directory_loads_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let (db, report) = SignatureDatabase::load_all(&[dir.path()]).unwrap();
        assert!(db.is_empty());
        assert_eq!(report.loaded, 0);
    }

    #[test]
    fn test_sig_v1_export_reloads_identically() {
        let (db, _) = SignatureDatabase::from_json(
            r#"[{ "name": "osCreateThread", "size": 16, "crc_a": 1, "crc_b": 2,
                  "relocations": [
                    { "kind": "hi16", "name": "gQueue", "offsets": [0] },
                    { "kind": "targ26", "name": "__osDisableInt", "offsets": [8] },
                    { "kind": "lo16", "name": "gQueue", "offsets": [4, 12] }
                  ] }]"#,
        )
        .unwrap();
        let text = db.to_sig_v1();
        assert!(text.starts_with("# sig_v1"));

        let (reloaded, report) = SignatureDatabase::from_text(&text).unwrap();
        assert!(report.is_complete());
        assert_eq!(reloaded.as_slice(), db.as_slice());
    }

    #[test]
    fn test_missing_file() {
        let result = SignatureDatabase::load("/definitely/not/here.sig");
        assert!(matches!(result, Err(SignatureError::Io(_))));
    }

    #[test]
    fn test_first_name_wins_lookup() {
        let mut db = SignatureDatabase::new();
        db.add_signature(Signature::new("dup", 4, 1, 1, vec![]).unwrap());
        db.add_signature(Signature::new("dup", 8, 2, 2, vec![]).unwrap());
        assert_eq!(db.len(), 2);
        assert_eq!(db.get("dup").unwrap().size(), 4);
    }
}
