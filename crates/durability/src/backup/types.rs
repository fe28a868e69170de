//! Backup archive types

use std::path::PathBuf;

/// File extension for backup archives
pub const BACKUP_EXTENSION: &str = "zip";

/// Entry names within the archive
pub mod paths {
    /// Config document at the archive root
    pub const CONFIG: &str = "config.yaml";
    /// Directory entry for lexicon documents
    pub const LEXICONS_DIR: &str = "lexicons/";
}

/// Result of writing an archive
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveExportInfo {
    /// Final path of the archive
    pub path: PathBuf,
    /// Number of lexicon documents written
    pub lexicon_count: usize,
    /// Archive size on disk
    pub archive_size_bytes: u64,
}

/// What a valid archive holds
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveContents {
    /// Entries under `lexicons/` (the directory entry itself excluded)
    pub lexicon_entries: Vec<String>,
    /// Total number of entries
    pub entry_count: usize,
}

/// Result of inspecting an archive without touching the store
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveInspectInfo {
    /// Number of lexicon documents in the archive
    pub lexicon_count: usize,
    /// Schema version recorded in the archived config (1 when absent)
    pub config_version: u32,
    /// Schema version of the running engine
    pub expected_version: u32,
}

impl ArchiveInspectInfo {
    /// Whether the archived config matches the running engine
    pub fn version_matches(&self) -> bool {
        self.config_version == self.expected_version
    }
}

/// Result of restoring an archive into a data directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RestoreInfo {
    /// Files extracted
    pub files_restored: usize,
    /// Lexicon documents among them
    pub lexicon_count: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_matches() {
        let info = ArchiveInspectInfo {
            lexicon_count: 1,
            config_version: 1,
            expected_version: 2,
        };
        assert!(!info.version_matches());

        let info = ArchiveInspectInfo {
            config_version: 2,
            ..info
        };
        assert!(info.version_matches());
    }
}
