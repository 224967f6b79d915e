//! Downloading version files.

use std::path::{Path, PathBuf};

use sha1::{Digest, Sha1};
use tracing::{info, instrument, warn};

use crate::{
    client::Modrinth,
    error::{Error, Result},
    models::{
        project::Project,
        version::{File, Version, VersionId},
    },
    query::VersionFilters,
};

/// A file held in memory after a download.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadedFile {
    pub name: String,
    pub url: String,
    pub version_id: VersionId,
    pub bytes: Vec<u8>,
}

impl DownloadedFile {
    /// Writes the file into `dir`, creating it when needed. Returns the path
    /// written to.
    pub async fn write_to(&self, dir: impl AsRef<Path>) -> Result<PathBuf> {
        let dir = dir.as_ref();

        // Only the last component of the name is trusted.
        let name = Path::new(&self.name)
            .file_name()
            .ok_or_else(|| Error::InvalidParam(format!("`{}` is not a file name", self.name)))?;
        let path = dir.join(name);

        tokio::fs::create_dir_all(dir)
            .await
            .map_err(|e| Error::io(dir, e))?;
        tokio::fs::write(&path, &self.bytes)
            .await
            .map_err(|e| Error::io(&path, e))?;

        info!("Saved {}", path.to_string_lossy());

        Ok(path)
    }
}

fn verify_sha1(file: &File, bytes: &[u8]) -> Result<()> {
    let Some(expected) = file.sha1() else {
        return Ok(());
    };

    let actual = base16ct::lower::encode_string(&Sha1::digest(bytes));
    if actual.eq_ignore_ascii_case(expected) {
        Ok(())
    } else {
        Err(Error::HashMismatch {
            file: file.name.clone(),
            expected: expected.to_owned(),
            actual,
        })
    }
}

async fn download_primary_files(
    client: &Modrinth,
    version: &Version,
) -> Result<Vec<DownloadedFile>> {
    let mut downloaded = Vec::new();

    for file in version.primary_files() {
        let bytes = client.download_file(&file.url).await?;
        verify_sha1(file, &bytes)?;

        info!("Downloaded {} ({} bytes)", file.name, bytes.len());

        downloaded.push(DownloadedFile {
            name: file.name.clone(),
            url: file.url.clone(),
            version_id: version.id.clone(),
            bytes,
        });
    }

    Ok(downloaded)
}

impl Version {
    /// Downloads the primary files of this version.
    ///
    /// With `recursive`, the primary files of every dependency's resolved
    /// version follow, one level deep. Incompatible dependencies are skipped.
    /// The first failure aborts the whole download.
    #[instrument(skip_all, fields(version = %self.id, recursive = recursive))]
    pub async fn download(
        &self,
        client: &Modrinth,
        recursive: bool,
    ) -> Result<Vec<DownloadedFile>> {
        let mut downloaded = download_primary_files(client, self).await?;

        if !recursive {
            return Ok(downloaded);
        }

        for dependency in self.dependencies.iter().filter(|d| !d.is_incompatible()) {
            match dependency.version(client).await? {
                Some(version) => downloaded.extend(download_primary_files(client, &version).await?),
                None if dependency.is_required() => {
                    return Err(Error::NotFound(format!(
                        "required dependency {:?} of version {} has no version",
                        dependency.target, self.id
                    )))
                }
                None => warn!(
                    "Skipping dependency {:?} of version {}: no version to download",
                    dependency.target, self.id
                ),
            }
        }

        Ok(downloaded)
    }
}

impl Project {
    /// Downloads the latest version. A project without versions yields
    /// nothing.
    pub async fn download(
        &self,
        client: &Modrinth,
        recursive: bool,
    ) -> Result<Vec<DownloadedFile>> {
        match self.latest_version(client, &VersionFilters::default()).await? {
            Some(version) => version.download(client, recursive).await,
            None => {
                warn!("Project {} has no version to download", self.id);
                Ok(Vec::new())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::*;

    fn file(sha1: Option<&str>) -> File {
        File {
            hashes: sha1
                .map(|h| BTreeMap::from([("sha1".to_owned(), h.to_owned())]))
                .unwrap_or_default(),
            url: "https://cdn.modrinth.com/a.jar".to_owned(),
            name: "a.jar".to_owned(),
            primary: true,
            size: 5,
            file_type: None,
        }
    }

    #[test]
    fn sha1_verification() {
        // sha1("hello")
        let digest = "aaf4c61ddcc5e8a2dabede0f3b482cd9aea9434d";

        assert!(verify_sha1(&file(Some(digest)), b"hello").is_ok());
        assert!(verify_sha1(&file(Some(&digest.to_uppercase())), b"hello").is_ok());
        assert!(verify_sha1(&file(None), b"anything").is_ok());

        match verify_sha1(&file(Some(digest)), b"hellO") {
            Err(Error::HashMismatch { file, expected, .. }) => {
                assert_eq!("a.jar", file);
                assert_eq!(digest, expected);
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[tokio::test]
    async fn write_to_creates_the_directory() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("mods");

        let downloaded = DownloadedFile {
            name: "../escape.jar".to_owned(),
            url: "https://cdn.modrinth.com/escape.jar".to_owned(),
            version_id: VersionId::from("v1"),
            bytes: b"jar".to_vec(),
        };

        let path = downloaded.write_to(&target).await.unwrap();
        assert_eq!(target.join("escape.jar"), path);
        assert_eq!(b"jar".to_vec(), tokio::fs::read(&path).await.unwrap());
    }
}
