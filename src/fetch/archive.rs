//! Toolchain archives: name mapping and extraction

use super::FetchError;
use bzip2::read::BzDecoder;
use flate2::read::GzDecoder;
use std::fmt;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;
use tracing::info;
use xz2::read::XzDecoder;
use zip::ZipArchive;

/// Archive formats bob can unpack
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArchiveFormat {
    TarGz,
    TarXz,
    TarBz2,
    Tar,
    Zip,
}

impl ArchiveFormat {
    /// Recognised suffixes, in matching order
    pub const SUFFIXES: &'static [(&'static str, ArchiveFormat)] = &[
        (".tar.gz", ArchiveFormat::TarGz),
        (".tgz", ArchiveFormat::TarGz),
        (".tar.xz", ArchiveFormat::TarXz),
        (".txz", ArchiveFormat::TarXz),
        (".tar.bz2", ArchiveFormat::TarBz2),
        (".tbz2", ArchiveFormat::TarBz2),
        (".tar", ArchiveFormat::Tar),
        (".zip", ArchiveFormat::Zip),
    ];

    /// Detects the format from an archive file name
    pub fn detect(name: &str) -> Option<(ArchiveFormat, &'static str)> {
        Self::SUFFIXES
            .iter()
            .find(|(suffix, _)| name.len() > suffix.len() && name.ends_with(suffix))
            .map(|(suffix, format)| (*format, *suffix))
    }
}

/// Name of the directory an archive is expected to unpack into
///
/// `arm-gnu-toolchain-12.2.tar.xz` maps to `arm-gnu-toolchain-12.2`.
pub fn strip_archive_suffix(name: &str) -> Result<&str, FetchError> {
    let (_, suffix) = ArchiveFormat::detect(name).ok_or_else(|| FetchError::UnsupportedArchive {
        name: name.to_string(),
    })?;
    Ok(&name[..name.len() - suffix.len()])
}

/// Unpacks `archive` into `output_path`
pub fn extract(archive: &Path, output_path: &Path) -> Result<(), FetchError> {
    let name = archive
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let (format, _) = ArchiveFormat::detect(&name)
        .ok_or_else(|| FetchError::UnsupportedArchive { name: name.clone() })?;

    info!("Extracting: {} to {}", archive.display(), output_path.display());

    let file = File::open(archive).map_err(|e| extract_error(archive, e))?;
    let reader = BufReader::new(file);

    let tarball: Box<dyn Read> = match format {
        ArchiveFormat::TarGz => Box::new(GzDecoder::new(reader)),
        ArchiveFormat::TarXz => Box::new(XzDecoder::new(reader)),
        ArchiveFormat::TarBz2 => Box::new(BzDecoder::new(reader)),
        ArchiveFormat::Tar => Box::new(reader),
        ArchiveFormat::Zip => {
            return ZipArchive::new(reader)
                .and_then(|mut zip| zip.extract(output_path))
                .map_err(|e| extract_error(archive, e));
        }
    };

    tar::Archive::new(tarball)
        .unpack(output_path)
        .map_err(|e| extract_error(archive, e))
}

fn extract_error(archive: &Path, reason: impl fmt::Display) -> FetchError {
    FetchError::Extract {
        archive: archive.to_path_buf(),
        reason: reason.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use flate2::write::GzEncoder;
    use flate2::Compression;
    use std::fs;
    use std::io::Write;
    use tempfile::TempDir;
    use xz2::write::XzEncoder;

    const GCC: &[u8] = b"#!/bin/sh\necho gcc\n";

    fn append_gcc<W: Write>(builder: &mut tar::Builder<W>, top_dir: &str) {
        let mut header = tar::Header::new_gnu();
        header.set_size(GCC.len() as u64);
        header.set_mode(0o755);
        header.set_cksum();
        builder
            .append_data(&mut header, format!("{}/bin/gcc", top_dir), GCC)
            .unwrap();
    }

    fn write_tar_gz(path: &Path, top_dir: &str) {
        let file = File::create(path).unwrap();
        let mut builder = tar::Builder::new(GzEncoder::new(file, Compression::default()));
        append_gcc(&mut builder, top_dir);
        builder.into_inner().unwrap().finish().unwrap();
    }

    fn write_tar_xz(path: &Path, top_dir: &str) {
        let file = File::create(path).unwrap();
        let mut builder = tar::Builder::new(XzEncoder::new(file, 6));
        append_gcc(&mut builder, top_dir);
        builder.into_inner().unwrap().finish().unwrap();
    }

    fn write_tar_bz2(path: &Path, top_dir: &str) {
        let file = File::create(path).unwrap();
        let encoder = bzip2::write::BzEncoder::new(file, bzip2::Compression::default());
        let mut builder = tar::Builder::new(encoder);
        append_gcc(&mut builder, top_dir);
        builder.into_inner().unwrap().finish().unwrap();
    }

    fn write_zip(path: &Path, top_dir: &str) {
        let file = File::create(path).unwrap();
        let mut zip = zip::ZipWriter::new(file);
        zip.start_file(
            format!("{}/bin/gcc", top_dir),
            zip::write::FileOptions::default(),
        )
        .unwrap();
        zip.write_all(GCC).unwrap();
        zip.finish().unwrap();
    }

    fn extract_into_toolchains(temp_dir: &TempDir, archive: &Path) -> std::path::PathBuf {
        let output = temp_dir.path().join("toolchains");
        fs::create_dir_all(&output).unwrap();
        extract(archive, &output).unwrap();
        output
    }

    #[test]
    fn test_strip_archive_suffix() {
        assert_eq!(strip_archive_suffix("gcc-12.2.tar.gz").unwrap(), "gcc-12.2");
        assert_eq!(strip_archive_suffix("gcc-12.2.tgz").unwrap(), "gcc-12.2");
        assert_eq!(strip_archive_suffix("gcc.tar").unwrap(), "gcc");
        assert_eq!(
            strip_archive_suffix("arm-gnu-toolchain-12.2.tar.xz").unwrap(),
            "arm-gnu-toolchain-12.2"
        );
        assert_eq!(strip_archive_suffix("gcc.txz").unwrap(), "gcc");
        assert_eq!(strip_archive_suffix("gcc.tar.bz2").unwrap(), "gcc");
        assert_eq!(strip_archive_suffix("gcc.tbz2").unwrap(), "gcc");
        assert_eq!(strip_archive_suffix("gcc-win32.zip").unwrap(), "gcc-win32");
    }

    #[test]
    fn test_strip_only_the_suffix() {
        assert_eq!(strip_archive_suffix("tar.gz.tools.tar.gz").unwrap(), "tar.gz.tools");
    }

    #[test]
    fn test_unsupported_suffix() {
        for name in ["gcc.rar", "gcc.7z", "gcc.tar.zst", "gcc", ".tar.gz", ".zip"] {
            assert_eq!(
                strip_archive_suffix(name),
                Err(FetchError::UnsupportedArchive {
                    name: name.to_string()
                })
            );
        }
    }

    #[test]
    fn test_extract_tar_gz() {
        let temp_dir = TempDir::new().unwrap();
        let archive = temp_dir.path().join("gcc-12.2.tar.gz");
        write_tar_gz(&archive, "gcc-12.2");

        let output = extract_into_toolchains(&temp_dir, &archive);
        assert!(output.join("gcc-12.2/bin/gcc").is_file());
    }

    #[test]
    fn test_extract_tar_xz() {
        let temp_dir = TempDir::new().unwrap();
        let archive = temp_dir.path().join("arm-gnu-toolchain-12.2.tar.xz");
        write_tar_xz(&archive, "arm-gnu-toolchain-12.2");

        let output = extract_into_toolchains(&temp_dir, &archive);
        let gcc = output.join("arm-gnu-toolchain-12.2/bin/gcc");
        assert_eq!(fs::read(gcc).unwrap(), GCC);
    }

    #[test]
    fn test_extract_tar_bz2() {
        let temp_dir = TempDir::new().unwrap();
        let archive = temp_dir.path().join("gcc-12.2.tar.bz2");
        write_tar_bz2(&archive, "gcc-12.2");

        let output = extract_into_toolchains(&temp_dir, &archive);
        assert!(output.join("gcc-12.2/bin/gcc").is_file());
    }

    #[test]
    fn test_extract_zip() {
        let temp_dir = TempDir::new().unwrap();
        let archive = temp_dir.path().join("gcc-win32.zip");
        write_zip(&archive, "gcc-win32");

        let output = extract_into_toolchains(&temp_dir, &archive);
        let gcc = output.join("gcc-win32/bin/gcc");
        assert_eq!(fs::read(gcc).unwrap(), GCC);
    }

    #[test]
    fn test_extract_corrupt_zip() {
        let temp_dir = TempDir::new().unwrap();
        let archive = temp_dir.path().join("broken.zip");
        fs::write(&archive, b"PK but not really").unwrap();

        let result = extract(&archive, temp_dir.path());
        assert!(matches!(result, Err(FetchError::Extract { .. })));
    }

    #[test]
    fn test_extract_corrupt_archive() {
        let temp_dir = TempDir::new().unwrap();
        let archive = temp_dir.path().join("broken.tar.gz");
        fs::write(&archive, b"definitely not gzip").unwrap();

        let result = extract(&archive, temp_dir.path());
        assert!(matches!(result, Err(FetchError::Extract { .. })));
    }
}
