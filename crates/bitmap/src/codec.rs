// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Conversion between BMP bytes and `Matrix<u8>`.

use crate::header::{BmpHeader, FILE_HEADER_LEN};
use crate::BitmapError;
use std::path::Path;
use tensor_core::{Allocator, Matrix, TensorError};

/// Decodes an uncompressed 8, 24 or 32-bit BMP.
///
/// The matrix has one row per image row, top row first, and one channel
/// per stored byte: 1 for grayscale, 3 (B, G, R) or 4 (B, G, R, A).
/// 8-bit images must carry a grayscale palette.
pub fn decode(bytes: &[u8]) -> Result<Matrix<'static, u8>, BitmapError> {
    let header = BmpHeader::parse(bytes)?;
    let (rows, columns, dimension) = (header.rows(), header.columns(), header.dimension());
    if dimension == 1 {
        check_grayscale_palette(bytes, &header)?;
    }

    let stride = header.row_stride();
    let start = header.data_offset as usize;
    let end = stride
        .checked_mul(rows)
        .and_then(|n| n.checked_add(start))
        .filter(|&end| end <= bytes.len())
        .ok_or_else(|| {
            BitmapError::InvalidHeader(format!(
                "pixel data for {rows}x{columns} needs {} bytes from offset {start}, file has {}",
                stride.saturating_mul(rows),
                bytes.len()
            ))
        })?;
    let pixels = &bytes[start..end];

    let mut image: Matrix<u8> = Matrix::with_shape(rows, columns, dimension)?;
    let row_len = columns * dimension;
    for (stored, chunk) in pixels.chunks_exact(stride).enumerate() {
        let row = if header.is_top_down() { stored } else { rows - 1 - stored };
        image.row_slice_mut(row)?.copy_from_slice(&chunk[..row_len]);
    }

    tracing::debug!(rows, columns, dimension, top_down = header.is_top_down(), "decoded bitmap");
    Ok(image)
}

fn check_grayscale_palette(bytes: &[u8], header: &BmpHeader) -> Result<(), BitmapError> {
    let entries = match header.colors_used {
        0 => 256,
        n => n as usize,
    };
    let start = FILE_HEADER_LEN + header.info_size as usize;
    let palette = bytes
        .get(start..start + entries * 4)
        .ok_or_else(|| BitmapError::InvalidHeader("palette is truncated".into()))?;
    let gray = palette
        .chunks_exact(4)
        .enumerate()
        .all(|(i, bgra)| bgra[..3].iter().all(|&c| usize::from(c) == i));
    if !gray {
        return Err(BitmapError::Unsupported("8-bit image with a colour palette".into()));
    }
    Ok(())
}

/// Encodes a matrix of dimension 1, 3 or 4 as an uncompressed,
/// bottom-up BMP.
pub fn encode<A: Allocator>(image: &Matrix<'_, u8, A>) -> Result<Vec<u8>, BitmapError> {
    if image.is_empty() {
        return Err(TensorError::NotInitialized { op: "bitmap::encode" }.into());
    }
    let dimension = image.dimension();
    if !matches!(dimension, 1 | 3 | 4) {
        return Err(BitmapError::Unsupported(format!(
            "{dimension} channels (expected 1, 3 or 4)"
        )));
    }

    let header = BmpHeader::for_image(image.rows(), image.columns(), dimension)?;
    let mut out = Vec::with_capacity(header.file_size as usize);
    header.write(&mut out);
    if dimension == 1 {
        for level in 0..=255u8 {
            out.extend_from_slice(&[level, level, level, 0]);
        }
    }

    let padding = header.row_stride() - image.row_size();
    for row in image.rows_iter().rev() {
        out.extend_from_slice(row);
        out.extend(std::iter::repeat(0u8).take(padding));
    }

    debug_assert_eq!(out.len(), header.file_size as usize);
    Ok(out)
}

/// Reads and decodes a BMP file.
pub fn read_bmp(path: impl AsRef<Path>) -> Result<Matrix<'static, u8>, BitmapError> {
    let path = path.as_ref();
    tracing::debug!(path = %path.display(), "reading bitmap");
    decode(&std::fs::read(path)?)
}

/// Encodes `image` and writes it to `path`.
pub fn write_bmp<A: Allocator>(path: impl AsRef<Path>, image: &Matrix<'_, u8, A>) -> Result<(), BitmapError> {
    let path = path.as_ref();
    let bytes = encode(image)?;
    std::fs::write(path, &bytes)?;
    tracing::debug!(path = %path.display(), bytes = bytes.len(), "wrote bitmap");
    Ok(())
}
