//! How a new shared memory region is backed

use std::path::{Path, PathBuf};

use crate::error::{BotError, Result};

/// Storage behind a region created by this process.
///
/// The game server creates the real region as a file; bots attach to it
/// with [`SharedMemoryRegion::open`](super::SharedMemoryRegion::open). Created
/// regions stand in for the server in tests and tools.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackingType {
    /// A file at this path, created or resized to the region size
    File(PathBuf),
    /// An anonymous memory file descriptor
    #[cfg(target_os = "linux")]
    MemFd,
}

impl BackingType {
    pub fn name(&self) -> &'static str {
        match self {
            BackingType::File(_) => "file",
            #[cfg(target_os = "linux")]
            BackingType::MemFd => "memfd",
        }
    }
}

/// A region to create: its label, length and backing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegionConfig {
    /// Label used in logs and as the memfd name
    pub name: String,
    pub size: usize,
    pub backing: BackingType,
}

impl RegionConfig {
    /// A file-backed region at `path`, labelled with the file name
    pub fn file(path: impl AsRef<Path>, size: usize) -> Self {
        let path = path.as_ref();
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        Self {
            name,
            size,
            backing: BackingType::File(path.to_path_buf()),
        }
    }

    /// An anonymous region that lives as long as its mappings
    #[cfg(target_os = "linux")]
    pub fn memfd(name: impl Into<String>, size: usize) -> Self {
        Self {
            name: name.into(),
            size,
            backing: BackingType::MemFd,
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.size == 0 {
            return Err(BotError::invalid_parameter("size", "Region size must be greater than 0"));
        }

        match &self.backing {
            BackingType::File(path) if path.as_os_str().is_empty() => {
                Err(BotError::invalid_parameter("path", "Region file path cannot be empty"))
            }
            #[cfg(target_os = "linux")]
            BackingType::MemFd if self.name.is_empty() || self.name.contains('\0') => {
                Err(BotError::invalid_parameter("name", "memfd name must be non-empty without NUL"))
            }
            _ => Ok(()),
        }
    }

    /// Path of the backing file, if any
    pub fn path(&self) -> Option<&Path> {
        match &self.backing {
            BackingType::File(path) => Some(path),
            #[cfg(target_os = "linux")]
            BackingType::MemFd => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_config_takes_name_from_path() {
        let config = RegionConfig::file("/spnshm/shm", 4096);
        assert_eq!(config.name, "shm");
        assert_eq!(config.path(), Some(Path::new("/spnshm/shm")));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_rejects_empty_region() {
        assert!(matches!(
            RegionConfig::file("/tmp/region", 0).validate(),
            Err(BotError::InvalidParameter { .. })
        ));
        assert!(RegionConfig::file("", 16).validate().is_err());
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn test_memfd_name_checked() {
        assert!(RegionConfig::memfd("arena", 16).validate().is_ok());
        assert!(RegionConfig::memfd("", 16).validate().is_err());
        assert!(RegionConfig::memfd("a\0b", 16).validate().is_err());
        assert_eq!(RegionConfig::memfd("arena", 16).path(), None);
    }
}
