//! Copy primitives: atomic file copy, symlink recreation, recursive folders

use crate::types::{EntryKind, RekonError};
use filetime::FileTime;
use std::fs::{self, File};
use std::io::{Read, Write};
use std::path::Path;
use tempfile::NamedTempFile;

/// Uniquely named temporary sibling of `dest`, created exclusively
///
/// Removed again when dropped without being persisted.
fn part_file(dest: &Path) -> Result<NamedTempFile, RekonError> {
    let dir = match dest.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let file = tempfile::Builder::new()
        .prefix(".")
        .suffix(".rekon-part")
        .tempfile_in(dir)?;
    Ok(file)
}

fn preserve_mtime(src_metadata: &fs::Metadata, dest: &Path) -> Result<(), RekonError> {
    let mtime = FileTime::from_last_modification_time(src_metadata);
    filetime::set_file_mtime(dest, mtime)?;
    Ok(())
}

/// Copy a file atomically using the write-then-rename strategy
///
/// 1. Write to a fresh hidden `.rekon-part` sibling (never an existing name)
/// 2. Flush and sync to disk
/// 3. Preserve permissions and mtime
/// 4. Rename over the final destination
///
/// On any failure the part file is removed and `dest` is left as it was.
///
/// # Returns
/// * `Ok(u64)` - Number of bytes copied
/// * `Err(RekonError)` - IO error or other failure
///
/// # Example
/// ```no_run
/// use rekon::executor::copy_file_atomic;
/// use std::path::Path;
///
/// let bytes = copy_file_atomic(Path::new("source.txt"), Path::new("dest.txt"))?;
/// # Ok::<(), rekon::types::RekonError>(())
/// ```
pub fn copy_file_atomic(src: &Path, dest: &Path) -> Result<u64, RekonError> {
    let mut src_file = File::open(src)?;
    let mut part = part_file(dest)?;

    let mut buffer = vec![0u8; 128 * 1024];
    let mut total_bytes = 0u64;

    loop {
        let bytes_read = src_file.read(&mut buffer)?;
        if bytes_read == 0 {
            break;
        }
        part.write_all(&buffer[..bytes_read])?;
        total_bytes += bytes_read as u64;
    }

    part.as_file().sync_all()?;

    let src_metadata = fs::metadata(src)?;
    fs::set_permissions(part.path(), src_metadata.permissions())?;
    preserve_mtime(&src_metadata, part.path())?;

    part.persist(dest).map_err(|e| RekonError::Io(e.error))?;

    Ok(total_bytes)
}

/// Give the link at `dest` the access and modification times of the link at `src`
fn preserve_link_times(src: &Path, dest: &Path) -> Result<(), RekonError> {
    let metadata = fs::symlink_metadata(src)?;
    filetime::set_symlink_file_times(
        dest,
        FileTime::from_last_access_time(&metadata),
        FileTime::from_last_modification_time(&metadata),
    )?;
    Ok(())
}

/// Recreate the symlink at `src` as `dest`, pointing at the same target
pub fn copy_symlink(src: &Path, dest: &Path) -> Result<u64, RekonError> {
    let target = fs::read_link(src)?;
    create_symlink(&target, dest)?;
    preserve_link_times(src, dest)?;
    Ok(0)
}

/// Copy a folder and everything below it; `dest` must not exist
///
/// Folder mtimes are restored after their content is written.
pub fn copy_tree(src: &Path, dest: &Path) -> Result<u64, RekonError> {
    fs::create_dir(dest)?;
    let mut total = 0u64;

    for child in fs::read_dir(src)? {
        let child = child?;
        let child_src = child.path();
        let child_dest = dest.join(child.file_name());
        let metadata = fs::symlink_metadata(&child_src)?;

        total += match EntryKind::from_metadata(&child_src, &metadata)? {
            EntryKind::Folder => copy_tree(&child_src, &child_dest)?,
            EntryKind::Symlink => copy_symlink(&child_src, &child_dest)?,
            EntryKind::File => copy_file_atomic(&child_src, &child_dest)?,
        };
    }

    let src_metadata = fs::metadata(src)?;
    fs::set_permissions(dest, src_metadata.permissions())?;
    preserve_mtime(&src_metadata, dest)?;

    Ok(total)
}

/// Overwrite the symlink at `dest` with a copy of the one at `src`
pub fn replace_symlink(src: &Path, dest: &Path) -> Result<u64, RekonError> {
    let target = fs::read_link(src)?;
    fs::remove_file(dest)?;
    create_symlink(&target, dest)?;
    preserve_link_times(src, dest)?;
    Ok(0)
}

#[cfg(unix)]
fn create_symlink(target: &Path, link_path: &Path) -> Result<(), RekonError> {
    std::os::unix::fs::symlink(target, link_path).map_err(RekonError::Io)
}

#[cfg(windows)]
fn create_symlink(target: &Path, link_path: &Path) -> Result<(), RekonError> {
    use std::os::windows::fs::{symlink_dir, symlink_file};

    match symlink_file(target, link_path) {
        Ok(()) => Ok(()),
        Err(file_err) => match symlink_dir(target, link_path) {
            Ok(()) => Ok(()),
            Err(_) => Err(RekonError::Io(file_err)),
        },
    }
}
