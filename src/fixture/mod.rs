//! One-time bootstrap of the labeled test image set.

mod download;

pub use download::{GoogleDrive, RemoteFetch};

use crate::common::FIXTURE_IMAGES_DIR;

use color_eyre::{Result, eyre::WrapErr};
use log::info;
use std::{
    fs::File,
    path::{Path, PathBuf},
};
use zip::ZipArchive;

/// A fixture directory populated from a remote zip archive on first use.
#[derive(Clone, Debug)]
pub struct Fixture {
    root: PathBuf,
    file_id: String,
}

impl Fixture {
    pub fn new(root: impl Into<PathBuf>, file_id: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            file_id: file_id.into(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Directory holding the samples once the archive is extracted.
    pub fn images_dir(&self) -> PathBuf {
        self.root.join(FIXTURE_IMAGES_DIR)
    }

    /// Sibling archive path, `<root>.zip`.
    pub fn archive_path(&self) -> PathBuf {
        let mut path = self.root.clone().into_os_string();
        path.push(".zip");
        path.into()
    }

    /// Downloads and extracts the archive unless the fixture root already exists.
    ///
    /// Returns [`Fixture::images_dir`]. Failures are not retried and leave whatever
    /// was written on disk.
    pub fn ensure<F: RemoteFetch + ?Sized>(&self, fetcher: &F) -> Result<PathBuf> {
        if self.root.is_dir() {
            info!("Test images are already downloaded");
            return Ok(self.images_dir());
        }

        let archive_path = self.archive_path();
        info!("Download test images");
        fetcher
            .fetch(&self.file_id, &archive_path)
            .wrap_err_with(|| format!("Failed to download fixture {}", self.file_id))?;

        info!("Extract test images");
        extract_archive(&archive_path, &self.root)?;
        std::fs::remove_file(&archive_path)
            .wrap_err_with(|| format!("Failed to remove archive {archive_path:?}"))?;

        Ok(self.images_dir())
    }
}

/// Extracts every entry of a zip archive into `dest`, keeping entry names.
pub fn extract_archive(archive_path: &Path, dest: &Path) -> Result<()> {
    let file =
        File::open(archive_path).wrap_err_with(|| format!("Failed to open {archive_path:?}"))?;
    let mut archive =
        ZipArchive::new(file).wrap_err_with(|| format!("Corrupt archive {archive_path:?}"))?;
    std::fs::create_dir_all(dest).wrap_err_with(|| format!("Failed to create {dest:?}"))?;
    archive
        .extract(dest)
        .wrap_err_with(|| format!("Failed to extract {archive_path:?} into {dest:?}"))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::{cell::Cell, io::Write};
    use zip::{ZipWriter, write::SimpleFileOptions};

    struct ZipFetch {
        entries: Vec<(&'static str, &'static str)>,
        calls: Cell<usize>,
    }

    impl ZipFetch {
        fn new(entries: Vec<(&'static str, &'static str)>) -> Self {
            Self {
                entries,
                calls: Cell::new(0),
            }
        }
    }

    impl RemoteFetch for ZipFetch {
        fn fetch(&self, _file_id: &str, dest: &Path) -> Result<()> {
            self.calls.set(self.calls.get() + 1);
            let mut writer = ZipWriter::new(File::create(dest)?);
            for (name, contents) in &self.entries {
                writer.start_file(*name, SimpleFileOptions::default())?;
                writer.write_all(contents.as_bytes())?;
            }
            writer.finish()?;
            Ok(())
        }
    }

    struct CorruptFetch;

    impl RemoteFetch for CorruptFetch {
        fn fetch(&self, _file_id: &str, dest: &Path) -> Result<()> {
            std::fs::write(dest, b"definitely not a zip")?;
            Ok(())
        }
    }

    fn listing(dir: &Path) -> Vec<String> {
        let mut names: Vec<String> = std::fs::read_dir(dir)
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();
        names
    }

    #[test]
    fn downloads_extracts_and_removes_archive() {
        let tmp = tempfile::tempdir().unwrap();
        let fixture = Fixture::new(tmp.path().join("test_images"), "file-id");
        let fetch = ZipFetch::new(vec![
            ("test_images/1_a.jpg", "a"),
            ("test_images/2_b.jpg", "b"),
        ]);

        let images = fixture.ensure(&fetch).unwrap();

        assert_eq!(images, tmp.path().join("test_images").join("test_images"));
        assert_eq!(listing(&images), vec!["1_a.jpg", "2_b.jpg"]);
        assert!(!fixture.archive_path().exists());
        assert_eq!(fetch.calls.get(), 1);
    }

    #[test]
    fn second_run_is_a_no_op() {
        let tmp = tempfile::tempdir().unwrap();
        let fixture = Fixture::new(tmp.path().join("test_images"), "file-id");
        let fetch = ZipFetch::new(vec![("test_images/3_c.jpg", "c")]);

        let first = fixture.ensure(&fetch).unwrap();
        let before = listing(&first);
        let second = fixture.ensure(&fetch).unwrap();

        assert_eq!(first, second);
        assert_eq!(listing(&second), before);
        assert_eq!(listing(fixture.root()), vec!["test_images"]);
        assert_eq!(fetch.calls.get(), 1);
    }

    #[test]
    fn existing_directory_skips_download() {
        let tmp = tempfile::tempdir().unwrap();
        let root = tmp.path().join("test_images");
        std::fs::create_dir(&root).unwrap();
        let fetch = ZipFetch::new(vec![]);

        Fixture::new(&root, "file-id").ensure(&fetch).unwrap();

        assert_eq!(fetch.calls.get(), 0);
    }

    #[test]
    fn corrupt_archive_is_fatal() {
        let tmp = tempfile::tempdir().unwrap();
        let fixture = Fixture::new(tmp.path().join("test_images"), "file-id");

        let err = fixture.ensure(&CorruptFetch).unwrap_err();

        assert!(format!("{err:?}").contains("Corrupt archive"));
    }
}
