//! DiskSource: filesystem free-space statistics.
//!
//! Reads `statvfs` for the root filesystem. Free block and inode counts move
//! with every write on the machine, not only this process's.

use crate::source::{EntropySource, SourceCategory, SourceId, SourceInfo};

/// Filesystem queried for statistics.
const ROOT_PATH: &str = "/";

static DISK_INFO: SourceInfo = SourceInfo {
    id: SourceId::Disk,
    description: "Root filesystem free/total blocks and inodes",
    physics: "Free-space counters change with log writes, temp files, page cache \
              writeback and journal commits from every process on the machine.",
    category: SourceCategory::IO,
    slow: false,
};

/// Entropy source sampling root filesystem statistics.
pub struct DiskSource;

#[cfg(unix)]
fn statvfs_bytes(path: &str) -> Option<Vec<u8>> {
    let c_path = std::ffi::CString::new(path).ok()?;
    // SAFETY: statvfs is plain old data; all-zero is a valid bit pattern.
    let mut st: libc::statvfs = unsafe { std::mem::zeroed() };
    // SAFETY: c_path is NUL-terminated and `st` is a valid, writable struct.
    if unsafe { libc::statvfs(c_path.as_ptr(), &mut st) } != 0 {
        return None;
    }
    let fields = [
        st.f_bsize as u64,
        st.f_blocks as u64,
        st.f_bfree as u64,
        st.f_bavail as u64,
        st.f_files as u64,
        st.f_ffree as u64,
        st.f_favail as u64,
    ];
    let mut out = Vec::with_capacity(fields.len() * 8);
    for f in fields {
        out.extend_from_slice(&f.to_le_bytes());
    }
    Some(out)
}

#[cfg(not(unix))]
fn statvfs_bytes(_path: &str) -> Option<Vec<u8>> {
    None
}

impl EntropySource for DiskSource {
    fn info(&self) -> &SourceInfo {
        &DISK_INFO
    }

    fn is_available(&self) -> bool {
        cfg!(unix)
    }

    fn produce(&self) -> Option<Vec<u8>> {
        statvfs_bytes(ROOT_PATH)
    }
}
