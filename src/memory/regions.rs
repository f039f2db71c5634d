//! Shared memory region implementation
//!
//! The game server owns the region and rewrites most of it every frame. No
//! lock guards it: every read copies the requested window out immediately,
//! and a window read while the server is mid-update may be torn. This race
//! is part of the upstream protocol and is accepted here.

use std::{
    fs::{File, OpenOptions},
    path::{Path, PathBuf},
    ptr,
};

#[cfg(target_os = "linux")]
use std::ffi::CString;

use memmap2::{MmapOptions, MmapRaw};
#[cfg(target_os = "linux")]
use nix::{
    sys::memfd::{memfd_create, MemFdCreateFlag},
    unistd::ftruncate,
};

use crate::error::{BotError, Result};

use super::config::{BackingType, RegionConfig};

/// A shared memory region mapped read-write into this process.
///
/// The mapping outlives the descriptor it was made from, so only the
/// mapping is kept.
#[derive(Debug)]
pub struct SharedMemoryRegion {
    /// Mapped length in bytes
    size: usize,
    /// Backing file, `None` for memfd regions
    path: Option<PathBuf>,
    /// Raw shared mapping; written through shared references
    mmap: MmapRaw,
}

impl SharedMemoryRegion {
    /// Create a region of `config.size` bytes
    pub fn new(config: RegionConfig) -> Result<Self> {
        config.validate()?;

        let mmap = match &config.backing {
            BackingType::File(path) => Self::map_new_file(path, config.size)?,
            #[cfg(target_os = "linux")]
            BackingType::MemFd => Self::map_memfd(&config.name, config.size)?,
        };

        log::debug!(
            "created region '{}' ({} bytes, {})",
            config.name,
            config.size,
            config.backing.name()
        );

        Ok(Self {
            size: config.size,
            path: config.path().map(Path::to_path_buf),
            mmap,
        })
    }

    /// Attach to an existing region file, mapping its full length
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file = OpenOptions::new().read(true).write(true).open(path).map_err(|e| {
            BotError::from_io(e, &format!("Could not open shared memory file {}", path.display()))
        })?;

        let size = file
            .metadata()
            .map_err(|e| BotError::from_io(e, "Failed to stat shared memory file"))?
            .len() as usize;
        if size == 0 {
            return Err(BotError::region_too_small(1, 0));
        }

        let mmap = Self::map(&file, size)?;
        log::info!("attached to shared memory {} ({} bytes)", path.display(), size);

        Ok(Self {
            size,
            path: Some(path.to_path_buf()),
            mmap,
        })
    }

    fn map_new_file(path: &Path, size: usize) -> Result<MmapRaw> {
        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(path)
            .map_err(|e| BotError::from_io(e, &format!("Failed to create {}", path.display())))?;
        file.set_len(size as u64)
            .map_err(|e| BotError::from_io(e, "Failed to set file size"))?;
        Self::map(&file, size)
    }

    #[cfg(target_os = "linux")]
    fn map_memfd(name: &str, size: usize) -> Result<MmapRaw> {
        let name = CString::new(name)
            .map_err(|_| BotError::invalid_parameter("name", "Name contains null bytes"))?;
        let fd = memfd_create(&name, MemFdCreateFlag::MFD_CLOEXEC)
            .map_err(|e| BotError::platform(format!("Failed to create memfd: {}", e)))?;
        ftruncate(&fd, size as i64)
            .map_err(|e| BotError::platform(format!("Failed to set memfd size: {}", e)))?;
        Self::map(&File::from(fd), size)
    }

    fn map(file: &File, size: usize) -> Result<MmapRaw> {
        MmapOptions::new()
            .len(size)
            .map_raw(file)
            .map_err(|e| BotError::from_io(e, "Failed to create memory mapping"))
    }

    fn check_window(&self, offset: usize, length: usize) -> Result<()> {
        match offset.checked_add(length) {
            Some(end) if end <= self.size => Ok(()),
            _ => Err(BotError::out_of_bounds(offset, length, self.size)),
        }
    }

    /// Copy `buf.len()` bytes starting at `offset` out of the region
    pub fn read_into(&self, offset: usize, buf: &mut [u8]) -> Result<()> {
        self.check_window(offset, buf.len())?;
        // SAFETY: the window was bounds-checked against the mapping length and
        // `buf` is a distinct, caller-owned allocation.
        unsafe {
            ptr::copy_nonoverlapping(self.mmap.as_ptr().add(offset), buf.as_mut_ptr(), buf.len());
        }
        Ok(())
    }

    /// Copy `data` into the region starting at `offset`
    pub fn write_from(&self, offset: usize, data: &[u8]) -> Result<()> {
        self.check_window(offset, data.len())?;
        // SAFETY: bounds-checked as above; `MmapRaw` hands out a mutable
        // pointer without requiring exclusive access to the mapping.
        unsafe {
            ptr::copy_nonoverlapping(data.as_ptr(), self.mmap.as_mut_ptr().add(offset), data.len());
        }
        Ok(())
    }

    /// Fixed-size read at a layout offset.
    ///
    /// Layout offsets are validated once when an accessor is built, so a
    /// failing window here is a contract violation and panics.
    pub(crate) fn load<const N: usize>(&self, offset: usize) -> [u8; N] {
        let mut out = [0u8; N];
        if let Err(err) = self.read_into(offset, &mut out) {
            panic!("layout read outside the mapped region: {err}");
        }
        out
    }

    /// Fixed-offset write counterpart of [`load`](Self::load)
    pub(crate) fn store(&self, offset: usize, data: &[u8]) {
        if let Err(err) = self.write_from(offset, data) {
            panic!("layout write outside the mapped region: {err}");
        }
    }

    pub fn size(&self) -> usize {
        self.size
    }

    /// Path of the backing file; `None` for memfd regions
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn temp_region(dir: &TempDir, size: usize) -> SharedMemoryRegion {
        SharedMemoryRegion::new(RegionConfig::file(dir.path().join("shm"), size)).unwrap()
    }

    #[test]
    fn test_read_write_window() {
        let dir = TempDir::new().unwrap();
        let region = temp_region(&dir, 64);

        region.write_from(60, &[1, 2, 3, 4]).unwrap();
        let mut buf = [0u8; 4];
        region.read_into(60, &mut buf).unwrap();
        assert_eq!(buf, [1, 2, 3, 4]);
        assert_eq!(region.load::<2>(62), [3, 4]);
    }

    #[test]
    fn test_window_past_end_rejected() {
        let dir = TempDir::new().unwrap();
        let region = temp_region(&dir, 64);

        let mut buf = [0u8; 8];
        assert!(matches!(
            region.read_into(60, &mut buf),
            Err(BotError::OutOfBounds { offset: 60, length: 8, capacity: 64 })
        ));
        assert!(region.write_from(usize::MAX, &[0]).is_err());
    }

    #[test]
    fn test_open_maps_whole_file() {
        let dir = TempDir::new().unwrap();
        let created = temp_region(&dir, 128);
        created.store(100, &[0xAB]);

        let attached = SharedMemoryRegion::open(dir.path().join("shm")).unwrap();
        assert_eq!(attached.size(), 128);
        assert_eq!(attached.load::<1>(100), [0xAB]);
        assert_eq!(attached.path(), Some(dir.path().join("shm").as_path()));
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn test_memfd_region_has_no_path() {
        let region = SharedMemoryRegion::new(RegionConfig::memfd("unit", 32)).unwrap();
        region.write_from(28, &[9; 4]).unwrap();
        assert_eq!(region.load::<4>(28), [9; 4]);
        assert_eq!(region.path(), None);
    }

    #[test]
    fn test_open_empty_file_fails() {
        let dir = TempDir::new().unwrap();
        std::fs::File::create(dir.path().join("empty")).unwrap();
        assert!(matches!(
            SharedMemoryRegion::open(dir.path().join("empty")),
            Err(BotError::RegionTooSmall { .. })
        ));
    }

    #[test]
    fn test_open_missing_file_fails() {
        let dir = TempDir::new().unwrap();
        assert!(matches!(
            SharedMemoryRegion::open(dir.path().join("missing")),
            Err(BotError::Io { .. })
        ));
    }
}
