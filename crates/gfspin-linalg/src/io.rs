//! Binary object files.
//!
//! Every object starts with a 12-byte little-endian header
//! `(tag: i32, nor: u32, noc: u32)`:
//!
//! | object         | tag | nor    | noc     | body                          |
//! |----------------|-----|--------|---------|-------------------------------|
//! | matrix         | q   | rows   | columns | packed rows, in-memory layout |
//! | permutation    | -1  | degree | 1       | one `u32` image per point     |
//! | integer matrix | -8  | rows   | columns | `i32` entries, row-major      |
//!
//! Matrix rows are written in the layout of the default kernel for q, so a
//! file never depends on which variant produced it. Permutation images are
//! 0-based; files using 1-based images are recognized and converted.

use std::borrow::Cow;
use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;

use gfspin_field::params::prime_power;
use gfspin_field::{Field, FieldKernel, MAX_ORDER};
use tracing::debug;

use crate::error::ObjectError;
use crate::int_matrix::IntMatrix;
use crate::matrix::Matrix;
use crate::permutation::Permutation;

/// Header tag of permutation files.
pub const PERMUTATION_TAG: i32 = -1;

/// Header tag of integer matrix files.
pub const INT_MATRIX_TAG: i32 = -8;

/// The common object header.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Header {
    /// Field order, or a negative object type tag.
    pub tag: i32,
    /// Number of rows.
    pub nor: u32,
    /// Number of columns.
    pub noc: u32,
}

impl Header {
    /// Reads a header.
    ///
    /// # Errors
    ///
    /// Returns an error if the reader fails or ends early.
    pub fn read<R: Read>(r: &mut R) -> Result<Self, ObjectError> {
        let mut buf = [0u8; 12];
        r.read_exact(&mut buf)?;
        let word = |k: usize| [buf[4 * k], buf[4 * k + 1], buf[4 * k + 2], buf[4 * k + 3]];
        Ok(Self {
            tag: i32::from_le_bytes(word(0)),
            nor: u32::from_le_bytes(word(1)),
            noc: u32::from_le_bytes(word(2)),
        })
    }

    /// Writes the header.
    ///
    /// # Errors
    ///
    /// Returns an error if the writer fails.
    pub fn write<W: Write>(&self, w: &mut W) -> Result<(), ObjectError> {
        let mut buf = [0u8; 12];
        buf[0..4].copy_from_slice(&self.tag.to_le_bytes());
        buf[4..8].copy_from_slice(&self.nor.to_le_bytes());
        buf[8..12].copy_from_slice(&self.noc.to_le_bytes());
        w.write_all(&buf)?;
        Ok(())
    }

    fn new(tag: i32, nor: usize, noc: usize) -> Result<Self, ObjectError> {
        let dim = |n: usize| {
            u32::try_from(n).map_err(|_| ObjectError::BadHeader(format!("dimension {n} too large")))
        };
        Ok(Self {
            tag,
            nor: dim(nor)?,
            noc: dim(noc)?,
        })
    }
}

fn read_u32<R: Read>(r: &mut R) -> Result<u32, ObjectError> {
    let mut buf = [0u8; 4];
    r.read_exact(&mut buf)?;
    Ok(u32::from_le_bytes(buf))
}

/// Writes a matrix.
///
/// # Errors
///
/// Returns an error if the writer fails.
pub fn write_matrix<W: Write>(w: &mut W, m: &Matrix) -> Result<(), ObjectError> {
    let q = m.field().order();
    let default = Field::new(q);
    let m = if *m.field() == default {
        Cow::Borrowed(m)
    } else {
        Cow::Owned(m.convert(&default))
    };
    let tag = i32::try_from(q).map_err(|_| ObjectError::BadField(-1))?;
    Header::new(tag, m.nor(), m.noc())?.write(w)?;
    w.write_all(m.as_bytes())?;
    Ok(())
}

/// Reads a matrix over the field named in its header.
///
/// # Errors
///
/// Returns an error if the reader fails or ends early, or if the header
/// does not describe a matrix over a supported field.
pub fn read_matrix<R: Read>(r: &mut R) -> Result<Matrix, ObjectError> {
    let header = Header::read(r)?;
    if header.tag < 0 {
        return Err(ObjectError::UnexpectedTag {
            expected: "matrix",
            tag: header.tag,
        });
    }
    let q = header.tag.unsigned_abs();
    if q > MAX_ORDER || prime_power(q).is_none() {
        return Err(ObjectError::BadField(header.tag));
    }
    let field = Field::new(q);
    let (nor, noc) = (header.nor as usize, header.noc as usize);
    let stride = field.row_bytes(noc);

    let mut data = Vec::new();
    let mut row = vec![0u8; stride];
    for _ in 0..nor {
        r.read_exact(&mut row)?;
        data.extend_from_slice(&row);
    }
    debug!(q, nor, noc, "read matrix");
    Ok(Matrix::from_raw_parts(&field, nor, noc, data))
}

/// Writes a permutation with 0-based images.
///
/// # Errors
///
/// Returns an error if the writer fails.
pub fn write_permutation<W: Write>(w: &mut W, p: &Permutation) -> Result<(), ObjectError> {
    Header::new(PERMUTATION_TAG, p.degree(), 1)?.write(w)?;
    for &i in p.images() {
        let image = u32::try_from(i).map_err(|_| ObjectError::BadPermutation(p.degree()))?;
        w.write_all(&image.to_le_bytes())?;
    }
    Ok(())
}

/// Reads a permutation, converting 1-based images if necessary.
///
/// # Errors
///
/// Returns an error if the reader fails or ends early, if the header does
/// not describe a permutation, or if the images are not a permutation.
pub fn read_permutation<R: Read>(r: &mut R) -> Result<Permutation, ObjectError> {
    let header = Header::read(r)?;
    if header.tag != PERMUTATION_TAG {
        return Err(ObjectError::UnexpectedTag {
            expected: "permutation",
            tag: header.tag,
        });
    }
    if header.noc != 1 {
        return Err(ObjectError::BadHeader(format!(
            "permutation with {} columns",
            header.noc
        )));
    }
    let degree = header.nor as usize;
    let mut images = Vec::new();
    for _ in 0..degree {
        images.push(read_u32(r)? as usize);
    }

    // 1-based files never contain 0 and do contain the degree itself.
    let legacy = degree > 0 && !images.contains(&0) && images.iter().max() == Some(&degree);
    if legacy {
        debug!(degree, "converting 1-based permutation");
        for i in &mut images {
            *i -= 1;
        }
    }
    Permutation::try_from_images(images).ok_or(ObjectError::BadPermutation(degree))
}

/// Writes an integer matrix.
///
/// # Errors
///
/// Returns an error if the writer fails.
pub fn write_int_matrix<W: Write>(w: &mut W, m: &IntMatrix) -> Result<(), ObjectError> {
    Header::new(INT_MATRIX_TAG, m.nor(), m.noc())?.write(w)?;
    for &v in m.as_slice() {
        w.write_all(&v.to_le_bytes())?;
    }
    Ok(())
}

/// Reads an integer matrix.
///
/// # Errors
///
/// Returns an error if the reader fails or ends early, or if the header
/// does not describe an integer matrix.
pub fn read_int_matrix<R: Read>(r: &mut R) -> Result<IntMatrix, ObjectError> {
    let header = Header::read(r)?;
    if header.tag != INT_MATRIX_TAG {
        return Err(ObjectError::UnexpectedTag {
            expected: "integer matrix",
            tag: header.tag,
        });
    }
    let (nor, noc) = (header.nor as usize, header.noc as usize);
    let mut data = Vec::new();
    let mut buf = [0u8; 4];
    for _ in 0..nor {
        for _ in 0..noc {
            r.read_exact(&mut buf)?;
            data.push(i32::from_le_bytes(buf));
        }
    }
    Ok(IntMatrix::from_data(nor, noc, data))
}

fn save<T: ?Sized>(
    path: &Path,
    value: &T,
    write: impl FnOnce(&mut BufWriter<File>, &T) -> Result<(), ObjectError>,
) -> Result<(), ObjectError> {
    let run = || -> Result<(), ObjectError> {
        let mut w = BufWriter::new(File::create(path)?);
        write(&mut w, value)?;
        w.flush()?;
        Ok(())
    };
    run().map_err(|e| e.in_file(path))
}

fn load<T>(
    path: &Path,
    read: impl FnOnce(&mut BufReader<File>) -> Result<T, ObjectError>,
) -> Result<T, ObjectError> {
    let run = || -> Result<T, ObjectError> { read(&mut BufReader::new(File::open(path)?)) };
    run().map_err(|e| e.in_file(path))
}

/// Writes a matrix file.
///
/// # Errors
///
/// Returns an error naming `path` if the file cannot be written.
pub fn save_matrix(path: impl AsRef<Path>, m: &Matrix) -> Result<(), ObjectError> {
    save(path.as_ref(), m, write_matrix)
}

/// Reads a matrix file.
///
/// # Errors
///
/// Returns an error naming `path` if the file cannot be read or is not a
/// matrix.
pub fn load_matrix(path: impl AsRef<Path>) -> Result<Matrix, ObjectError> {
    load(path.as_ref(), read_matrix)
}

/// Writes a permutation file.
///
/// # Errors
///
/// Returns an error naming `path` if the file cannot be written.
pub fn save_permutation(path: impl AsRef<Path>, p: &Permutation) -> Result<(), ObjectError> {
    save(path.as_ref(), p, write_permutation)
}

/// Reads a permutation file.
///
/// # Errors
///
/// Returns an error naming `path` if the file cannot be read or is not a
/// permutation.
pub fn load_permutation(path: impl AsRef<Path>) -> Result<Permutation, ObjectError> {
    load(path.as_ref(), read_permutation)
}

/// Writes an integer matrix file.
///
/// # Errors
///
/// Returns an error naming `path` if the file cannot be written.
pub fn save_int_matrix(path: impl AsRef<Path>, m: &IntMatrix) -> Result<(), ObjectError> {
    save(path.as_ref(), m, write_int_matrix)
}

/// Reads an integer matrix file.
///
/// # Errors
///
/// Returns an error naming `path` if the file cannot be read or is not an
/// integer matrix.
pub fn load_int_matrix(path: impl AsRef<Path>) -> Result<IntMatrix, ObjectError> {
    load(path.as_ref(), read_int_matrix)
}
