//! On-disk cache of field tables.
//!
//! A table file is a four-byte magic, a bincode header and the serialized
//! kernel. The header pins the format version and the field, so a stale or
//! misplaced file is reported instead of silently producing wrong
//! arithmetic.
//!
//! Files are written to a temporary name and renamed into place, so a
//! concurrent reader never sees a partial file.

use std::fs::{self, File};
use std::io::{self, BufReader, BufWriter, Read, Write};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::TableError;
use crate::field::{Field, Kernel, Variant};
use crate::kernel::FieldKernel;

/// Format version of table files. Bump on any layout change.
pub const TABLE_VERSION: u32 = 1;

const MAGIC: [u8; 4] = *b"GFTB";

#[derive(Debug, Serialize, Deserialize)]
struct Header {
    version: u32,
    order: u32,
    variant: Variant,
}

/// Location of the table file for GF(q) in `dir`.
#[must_use]
pub fn table_path(dir: &Path, q: u32, variant: Variant) -> PathBuf {
    dir.join(format!("gf{q}.{}.tbl", variant.resolve(q).name()))
}

/// Loads the tables of GF(q) from `path`.
///
/// Returns `Ok(None)` if the file does not exist.
///
/// # Errors
///
/// Returns an error if the file cannot be read, is not a table file, has a
/// different format version, or holds tables of another field.
pub fn load(path: &Path, q: u32, variant: Variant) -> Result<Option<Field>, TableError> {
    let file = match File::open(path) {
        Ok(file) => file,
        Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(None),
        Err(source) => return Err(io_error(path, source)),
    };
    let mut reader = BufReader::new(file);
    let variant = variant.resolve(q);

    let mut magic = [0u8; 4];
    match reader.read_exact(&mut magic) {
        Ok(()) if magic == MAGIC => {}
        Ok(()) => return Err(bad_magic(path)),
        Err(err) if err.kind() == io::ErrorKind::UnexpectedEof => return Err(bad_magic(path)),
        Err(source) => return Err(io_error(path, source)),
    }
    let header: Header =
        bincode::deserialize_from(&mut reader).map_err(|source| codec_error(path, source))?;
    if header.version != TABLE_VERSION {
        return Err(TableError::Version {
            path: path.to_path_buf(),
            found: header.version,
            expected: TABLE_VERSION,
        });
    }
    if header.order != q {
        return Err(wrong_field(path, header.order, q));
    }
    if header.variant != variant {
        return Err(TableError::WrongVariant {
            path: path.to_path_buf(),
            found: header.variant,
            expected: variant,
        });
    }

    let kernel: Kernel =
        bincode::deserialize_from(&mut reader).map_err(|source| codec_error(path, source))?;
    let field = Field::from_kernel(kernel);
    if field.order() != q || field.variant() != variant {
        return Err(wrong_field(path, field.order(), q));
    }
    Ok(Some(field))
}

/// Writes the tables of `field` to `path`, creating parent directories.
///
/// # Errors
///
/// Returns an error if the file cannot be written.
pub fn store(path: &Path, field: &Field) -> Result<(), TableError> {
    if let Some(dir) = path.parent() {
        fs::create_dir_all(dir).map_err(|source| io_error(dir, source))?;
    }
    let tmp = path.with_extension(format!("tbl.{}.tmp", std::process::id()));
    let header = Header {
        version: TABLE_VERSION,
        order: field.order(),
        variant: field.variant(),
    };

    let write = || -> Result<(), TableError> {
        let file = File::create(&tmp).map_err(|source| io_error(&tmp, source))?;
        let mut writer = BufWriter::new(file);
        writer
            .write_all(&MAGIC)
            .map_err(|source| io_error(&tmp, source))?;
        bincode::serialize_into(&mut writer, &header)
            .map_err(|source| codec_error(&tmp, source))?;
        bincode::serialize_into(&mut writer, field.kernel())
            .map_err(|source| codec_error(&tmp, source))?;
        writer.flush().map_err(|source| io_error(&tmp, source))
    };

    if let Err(err) = write() {
        let _ = fs::remove_file(&tmp);
        return Err(err);
    }
    fs::rename(&tmp, path).map_err(|source| io_error(path, source))
}

fn io_error(path: &Path, source: io::Error) -> TableError {
    TableError::Io {
        path: path.to_path_buf(),
        source,
    }
}

fn bad_magic(path: &Path) -> TableError {
    TableError::BadMagic {
        path: path.to_path_buf(),
    }
}

fn codec_error(path: &Path, source: bincode::Error) -> TableError {
    TableError::Codec {
        path: path.to_path_buf(),
        source,
    }
}

fn wrong_field(path: &Path, found: u32, expected: u32) -> TableError {
    TableError::WrongField {
        path: path.to_path_buf(),
        found,
        expected,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_path_names_variant() {
        let dir = Path::new("/tmp/tables");
        assert_eq!(
            table_path(dir, 16, Variant::Auto),
            dir.join("gf16.packed.tbl")
        );
        assert_eq!(table_path(dir, 16, Variant::Log), dir.join("gf16.log.tbl"));
        assert_eq!(table_path(dir, 1024, Variant::Auto), dir.join("gf1024.log.tbl"));
    }

    #[test]
    fn test_store_then_load() {
        let dir = tempfile::tempdir().unwrap();
        for (q, variant) in [(25, Variant::Packed), (25, Variant::Log), (4096, Variant::Auto)] {
            let built = Field::build(q, variant);
            let path = table_path(dir.path(), q, variant);
            store(&path, &built).unwrap();

            let loaded = load(&path, q, variant).unwrap().unwrap();
            assert_eq!(loaded.params(), built.params());
            for a in 0..q.min(200) {
                for b in 0..q.min(200) {
                    let (x, y) = (built.from_int(a), built.from_int(b));
                    let (u, v) = (loaded.from_int(a), loaded.from_int(b));
                    assert_eq!(built.to_int(built.add(x, y)), loaded.to_int(loaded.add(u, v)));
                    assert_eq!(built.to_int(built.mul(x, y)), loaded.to_int(loaded.mul(u, v)));
                }
            }
        }
    }

    #[test]
    fn test_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = table_path(dir.path(), 7, Variant::Auto);
        assert!(load(&path, 7, Variant::Auto).unwrap().is_none());
    }

    #[test]
    fn test_bad_magic() {
        let dir = tempfile::tempdir().unwrap();
        let path = table_path(dir.path(), 7, Variant::Auto);
        fs::write(&path, b"not a table file at all").unwrap();
        assert!(matches!(
            load(&path, 7, Variant::Auto),
            Err(TableError::BadMagic { .. })
        ));
    }

    #[test]
    fn test_wrong_field() {
        let dir = tempfile::tempdir().unwrap();
        let path = table_path(dir.path(), 7, Variant::Auto);
        store(&path, &Field::build(5, Variant::Auto)).unwrap();
        let err = load(&path, 7, Variant::Auto).unwrap_err();
        assert!(matches!(
            err,
            TableError::WrongField {
                found: 5,
                expected: 7,
                ..
            }
        ));
        assert!(err.to_string().contains("GF(5)"));
    }

    #[test]
    fn test_version_mismatch_names_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = table_path(dir.path(), 7, Variant::Auto);
        let mut bytes = MAGIC.to_vec();
        let header = Header {
            version: TABLE_VERSION + 1,
            order: 7,
            variant: Variant::Packed,
        };
        bincode::serialize_into(&mut bytes, &header).unwrap();
        fs::write(&path, bytes).unwrap();

        let err = load(&path, 7, Variant::Auto).unwrap_err();
        assert!(matches!(
            err,
            TableError::Version { found, expected: TABLE_VERSION, .. } if found == TABLE_VERSION + 1
        ));
        assert!(err.to_string().contains("gf7.packed.tbl"));
    }

    #[test]
    fn test_wrong_variant() {
        let dir = tempfile::tempdir().unwrap();
        let path = table_path(dir.path(), 7, Variant::Packed);
        store(&path, &Field::build(7, Variant::Log)).unwrap();
        let err = load(&path, 7, Variant::Packed).unwrap_err();
        assert!(matches!(
            err,
            TableError::WrongVariant {
                found: Variant::Log,
                expected: Variant::Packed,
                ..
            }
        ));
        assert!(err.to_string().contains("log tables, expected packed"));
    }

    #[test]
    fn test_truncated_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = table_path(dir.path(), 3, Variant::Auto);
        store(&path, &Field::build(3, Variant::Auto)).unwrap();
        let bytes = fs::read(&path).unwrap();
        fs::write(&path, &bytes[..bytes.len() / 2]).unwrap();
        assert!(matches!(
            load(&path, 3, Variant::Auto),
            Err(TableError::Codec { .. })
        ));
    }
}
