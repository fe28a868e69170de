//! Backup archives
//!
//! A backup is a plain zip file holding the live store:
//!
//! ```text
//! lexi-backup.zip
//! ├── config.yaml
//! └── lexicons/
//!     ├── <id>.yaml
//!     └── ...
//! ```
//!
//! Entries are stored uncompressed. The `lexicons/` directory entry is
//! always written, so a store with no lexicons still produces an archive
//! that passes [`BackupReader::proof_of_content`].
//!
//! Export a store:
//! ```ignore
//! let info = BackupWriter::new().write(&paths.config_file(), &files, Path::new("lexi.zip"))?;
//! ```
//!
//! Check and restore:
//! ```ignore
//! let inspect = BackupReader::inspect(Path::new("lexi.zip"), CONFIG_VERSION)?;
//! let restored = BackupReader::restore(Path::new("lexi.zip"), &paths)?;
//! ```

pub mod error;
pub mod reader;
pub mod types;
pub mod writer;

pub use error::{BackupError, BackupResult};
pub use reader::BackupReader;
pub use types::{
    paths, ArchiveContents, ArchiveExportInfo, ArchiveInspectInfo, RestoreInfo, BACKUP_EXTENSION,
};
pub use writer::BackupWriter;
