//! # fetchkit
//!
//! Blocking download and unpack primitives for task steps.
//!
//! This crate provides functionality for:
//! - Downloading a URL to a file or into a directory
//! - Detecting archive formats from content (gzip, zip, tar)
//! - Extracting tar, tar.gz and zip archives
//!
//! ## Example
//!
//! ```no_run
//! use fetchkit::{Downloader, unpack};
//! use std::path::Path;
//!
//! let archive = Path::new("/tmp/tool.tar.gz");
//! Downloader::new()
//!     .download_to_file("https://example.com/tool.tar.gz", archive)
//!     .expect("download failed");
//!
//! let format = unpack(archive, Path::new("/opt/tool")).expect("unpack failed");
//! println!("unpacked a {:?} archive", format);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod archive;
pub mod download;
pub mod error;

pub use archive::{ArchiveFormat, unpack};
pub use download::{Downloader, MAX_DOWNLOAD_SIZE, file_name_from_url};
pub use error::{Error, ErrorCategory, Result};
