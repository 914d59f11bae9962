//! Archive detection and extraction.
//!
//! Formats are detected from the file contents first, so archives saved
//! under random temporary names still unpack. The file extension is only
//! consulted when the magic bytes are inconclusive (old v7 tarballs carry
//! no `ustar` marker).

use crate::error::{Error, Result};
use flate2::read::GzDecoder;
use std::fs::{self, File};
use std::io::Read;
use std::path::Path;

const GZIP_MAGIC: &[u8] = &[0x1f, 0x8b];
const ZIP_MAGIC: &[u8] = b"PK\x03\x04";
const ZIP_EMPTY_MAGIC: &[u8] = b"PK\x05\x06";
const TAR_MAGIC: &[u8] = b"ustar";
const TAR_MAGIC_OFFSET: usize = 257;

/// Supported archive formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArchiveFormat {
    /// Gzip-compressed tarball (`.tar.gz`, `.tgz`)
    TarGz,
    /// Plain tarball (`.tar`)
    Tar,
    /// Zip archive (`.zip`)
    Zip,
}

impl ArchiveFormat {
    /// Detect the format from the leading bytes of a file.
    pub fn sniff(header: &[u8]) -> Option<Self> {
        if header.starts_with(GZIP_MAGIC) {
            Some(Self::TarGz)
        } else if header.starts_with(ZIP_MAGIC) || header.starts_with(ZIP_EMPTY_MAGIC) {
            Some(Self::Zip)
        } else if header
            .get(TAR_MAGIC_OFFSET..TAR_MAGIC_OFFSET + TAR_MAGIC.len())
            .is_some_and(|m| m == TAR_MAGIC)
        {
            Some(Self::Tar)
        } else {
            None
        }
    }

    /// Guess the format from a file name.
    pub fn from_extension(path: &Path) -> Option<Self> {
        let name = path.file_name()?.to_string_lossy().to_lowercase();
        if name.ends_with(".tar.gz") || name.ends_with(".tgz") {
            Some(Self::TarGz)
        } else if name.ends_with(".tar") {
            Some(Self::Tar)
        } else if name.ends_with(".zip") {
            Some(Self::Zip)
        } else {
            None
        }
    }

    /// Detect the format of an archive on disk.
    pub fn detect(path: &Path) -> Result<Self> {
        let mut header = Vec::with_capacity(512);
        File::open(path)
            .and_then(|f| f.take(512).read_to_end(&mut header))
            .map_err(|e| Error::io(path, e))?;

        Self::sniff(&header)
            .or_else(|| Self::from_extension(path))
            .ok_or_else(|| Error::UnsupportedArchive {
                path: path.to_path_buf(),
            })
    }
}

/// Unpack an archive into a directory, creating it if needed.
///
/// Returns the detected format.
pub fn unpack(archive: &Path, dest: &Path) -> Result<ArchiveFormat> {
    let format = ArchiveFormat::detect(archive)?;
    fs::create_dir_all(dest).map_err(|e| Error::io(dest, e))?;

    log::debug!(
        "Unpacking {} ({:?}) into {}",
        archive.display(),
        format,
        dest.display()
    );

    let file = File::open(archive).map_err(|e| Error::io(archive, e))?;
    let extract_err = |message: String| Error::Extract {
        path: archive.to_path_buf(),
        message,
    };

    match format {
        ArchiveFormat::TarGz => tar::Archive::new(GzDecoder::new(file))
            .unpack(dest)
            .map_err(|e| extract_err(e.to_string()))?,
        ArchiveFormat::Tar => tar::Archive::new(file)
            .unpack(dest)
            .map_err(|e| extract_err(e.to_string()))?,
        ArchiveFormat::Zip => zip::ZipArchive::new(file)
            .and_then(|mut zip| zip.extract(dest))
            .map_err(|e| extract_err(e.to_string()))?,
    }

    Ok(format)
}
