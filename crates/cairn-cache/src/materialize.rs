use std::fs;
use std::io;
use std::path::Path;

use crate::index::CacheIndex;

impl CacheIndex {
    /// Unpack a downloaded `.tar.gz` into the cache entry for `cache_key`,
    /// then remove the archive. Archives that wrap their content in a
    /// single top-level directory are flattened so the entry root is the
    /// package root.
    pub fn extract_archive(&self, archive: &Path, cache_key: &str) -> io::Result<()> {
        let staging = tempfile::tempdir()?;
        let file = fs::File::open(archive)?;
        let tar = flate2::read::GzDecoder::new(file);
        tar::Archive::new(tar).unpack(staging.path())?;

        let entries: Vec<_> = fs::read_dir(staging.path())?.collect::<Result<Vec<_>, _>>()?;
        let unpacked_root = if entries.len() == 1 && entries[0].file_type()?.is_dir() {
            entries[0].path()
        } else {
            staging.path().to_path_buf()
        };

        let dest = self.cache_path(cache_key);
        fs::create_dir_all(&dest)?;
        copy_dir_contents(&unpacked_root, &dest)?;

        fs::remove_file(archive)?;
        Ok(())
    }

    /// Copy a populated cache entry into the project's `deps` directory.
    pub fn copy_to_installed(&self, cache_key: &str, current_key: &str) -> io::Result<()> {
        let from = self.cache_path(cache_key);
        let to = self.installed_path(current_key);
        fs::create_dir_all(&to)?;
        copy_dir_contents(&from, &to)
    }
}

fn copy_dir_contents(from: &Path, to: &Path) -> io::Result<()> {
    fs_extra::dir::copy(
        from,
        to,
        &fs_extra::dir::CopyOptions::new()
            .overwrite(true)
            .content_only(true),
    )
    .map(|_| ())
    .map_err(io::Error::other)
}
