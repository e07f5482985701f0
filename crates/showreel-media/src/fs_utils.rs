//! Filesystem utilities: scratch paths, derived outputs, moves and cleanup.

use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{debug, warn};

use crate::error::{MediaError, MediaResult};

/// Collision-free path in the scratch directory: `<prefix>_<uuid>.<extension>`.
pub fn scratch_path(scratch_dir: &Path, prefix: &str, extension: &str) -> PathBuf {
    scratch_dir.join(format!("{}_{}.{}", prefix, uuid::Uuid::new_v4().simple(), extension))
}

/// Sibling path with `_<suffix>` inserted before the extension.
///
/// `/videos/car.mp4` + `tiktok` becomes `/videos/car_tiktok.mp4`.
pub fn suffixed_path(path: &Path, suffix: &str) -> PathBuf {
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_default();
    let file_name = match path.extension() {
        Some(ext) => format!("{}_{}.{}", stem, suffix, ext.to_string_lossy()),
        None => format!("{}_{}", stem, suffix),
    };
    path.with_file_name(file_name)
}

/// Create the parent directory of `path` if it is missing.
pub async fn ensure_parent_dir(path: &Path) -> MediaResult<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            fs::create_dir_all(parent).await?;
        }
    }
    Ok(())
}

/// Move a file from `src` to `dst`, handling cross-device moves.
///
/// Tries a rename first. On EXDEV it copies to a temporary sibling of `dst`,
/// renames that into place and removes the source.
pub async fn move_file(src: impl AsRef<Path>, dst: impl AsRef<Path>) -> MediaResult<()> {
    let src = src.as_ref();
    let dst = dst.as_ref();

    ensure_parent_dir(dst).await?;

    match fs::rename(src, dst).await {
        Ok(()) => Ok(()),
        Err(e) if is_cross_device_error(&e) => {
            debug!(
                "Cross-device rename detected, falling back to copy+delete: {} -> {}",
                src.display(),
                dst.display()
            );
            copy_and_delete(src, dst).await
        }
        Err(e) => Err(MediaError::from(e)),
    }
}

/// Check if an IO error is EXDEV (cross-device link).
fn is_cross_device_error(e: &std::io::Error) -> bool {
    e.raw_os_error() == Some(18)
}

/// Hidden uuid-named sibling of `dst`, on the same filesystem as `dst`.
fn temp_sibling(dst: &Path) -> PathBuf {
    let name = format!(".{}.partial", uuid::Uuid::new_v4().simple());
    dst.with_file_name(name)
}

async fn copy_and_delete(src: &Path, dst: &Path) -> MediaResult<()> {
    let tmp_dst = temp_sibling(dst);

    fs::copy(src, &tmp_dst).await?;

    if let Err(e) = fs::rename(&tmp_dst, dst).await {
        let _ = fs::remove_file(&tmp_dst).await;
        return Err(MediaError::from(e));
    }

    if let Err(e) = fs::remove_file(src).await {
        warn!(
            "Failed to remove source file after cross-device move: {}: {}",
            src.display(),
            e
        );
    }

    Ok(())
}

/// Delete files, best effort.
///
/// A file that cannot be removed is logged and skipped. Returns how many
/// files were actually deleted.
pub async fn cleanup<P: AsRef<Path>>(paths: &[P]) -> usize {
    let mut removed = 0;

    for path in paths {
        let path = path.as_ref();
        match fs::remove_file(path).await {
            Ok(()) => {
                debug!(path = %path.display(), "Removed file");
                removed += 1;
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = %path.display(), "Cleanup skipped missing file");
            }
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Failed to remove file");
            }
        }
    }

    removed
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_suffixed_path() {
        assert_eq!(
            suffixed_path(Path::new("/videos/car.mp4"), "tiktok"),
            PathBuf::from("/videos/car_tiktok.mp4")
        );
        assert_eq!(
            suffixed_path(Path::new("reel.final.mov"), "watermarked"),
            PathBuf::from("reel.final_watermarked.mov")
        );
        assert_eq!(
            suffixed_path(Path::new("/videos/raw"), "youtube"),
            PathBuf::from("/videos/raw_youtube")
        );
    }

    #[test]
    fn test_scratch_paths_are_unique() {
        let dir = Path::new("/tmp/showreel");
        let a = scratch_path(dir, "thumb", "jpg");
        let b = scratch_path(dir, "thumb", "jpg");
        assert_ne!(a, b);
        assert!(a.starts_with(dir));
        assert_eq!(a.extension().unwrap(), "jpg");
    }

    #[tokio::test]
    async fn test_move_file_to_subdirectory() {
        let dir = TempDir::new().unwrap();
        let src = dir.path().join("source.mp4");
        let dst = dir.path().join("out").join("final.mp4");

        fs::write(&src, b"video").await.unwrap();
        move_file(&src, &dst).await.unwrap();

        assert!(!src.exists());
        assert_eq!(fs::read(&dst).await.unwrap(), b"video");
    }

    #[tokio::test]
    async fn test_cleanup_continues_past_failures() {
        let dir = TempDir::new().unwrap();
        let a = dir.path().join("a.mp4");
        let b = dir.path().join("b.jpg");
        let missing = dir.path().join("missing.mp4");
        // A non-empty directory cannot be removed with remove_file.
        let subdir = dir.path().join("nested");
        fs::create_dir(&subdir).await.unwrap();
        fs::write(subdir.join("keep.txt"), b"x").await.unwrap();

        fs::write(&a, b"a").await.unwrap();
        fs::write(&b, b"b").await.unwrap();

        let removed = cleanup(&[a.clone(), subdir.clone(), missing, b.clone()]).await;

        assert_eq!(removed, 2);
        assert!(!a.exists());
        assert!(!b.exists());
        assert!(subdir.exists());
    }

    #[test]
    fn test_is_cross_device_error() {
        assert!(is_cross_device_error(&std::io::Error::from_raw_os_error(18)));
        assert!(!is_cross_device_error(&std::io::Error::from_raw_os_error(2)));
    }

    #[tokio::test]
    async fn test_copy_fallback_keeps_unrelated_siblings() {
        let dir = TempDir::new().unwrap();
        let src = dir.path().join("staged.mp4");
        let dst = dir.path().join("out").join("reel.mp4");
        let neighbour = dir.path().join("out").join("reel.tmp");

        fs::create_dir(dir.path().join("out")).await.unwrap();
        fs::write(&src, b"video").await.unwrap();
        fs::write(&neighbour, b"keep me").await.unwrap();

        copy_and_delete(&src, &dst).await.unwrap();

        assert!(!src.exists());
        assert_eq!(fs::read(&dst).await.unwrap(), b"video");
        assert_eq!(fs::read(&neighbour).await.unwrap(), b"keep me");

        let mut entries = fs::read_dir(dir.path().join("out")).await.unwrap();
        let mut names = Vec::new();
        while let Some(entry) = entries.next_entry().await.unwrap() {
            names.push(entry.file_name().to_string_lossy().to_string());
        }
        names.sort();
        assert_eq!(names, vec!["reel.mp4", "reel.tmp"]);
    }

    #[test]
    fn test_temp_sibling_stays_in_destination_dir() {
        let dst = Path::new("/videos/out/reel.mp4");
        let tmp = temp_sibling(dst);
        assert_eq!(tmp.parent(), dst.parent());
        assert_ne!(tmp, dst.with_extension("tmp"));
        assert_ne!(temp_sibling(dst), tmp);
    }
}
