// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! File round trips through the filesystem.

use bitmap::{read_bmp, write_bmp, BitmapError, BmpHeader};
use proptest::prelude::*;
use tensor_core::Matrix;

#[test]
fn test_write_then_read() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("gray.bmp");
    let data: Vec<u8> = (0..=255u8).cycle().take(31 * 17).collect();
    let image: Matrix<u8> = Matrix::from_slice(31, 17, 1, &data).unwrap();

    write_bmp(&path, &image).unwrap();
    let bytes = std::fs::read(&path).unwrap();
    let header = BmpHeader::parse(&bytes).unwrap();
    assert_eq!(header.file_size as usize, bytes.len());
    assert_eq!((header.rows(), header.columns()), (31, 17));

    assert_eq!(read_bmp(&path).unwrap(), image);
}

#[test]
fn test_missing_file() {
    let dir = tempfile::tempdir().unwrap();
    assert!(matches!(
        read_bmp(dir.path().join("absent.bmp")),
        Err(BitmapError::Io(_))
    ));
}

proptest! {
    #[test]
    fn prop_encode_decode_preserves_pixels(
        rows in 1usize..12,
        columns in 1usize..12,
        dimension in prop::sample::select(vec![1usize, 3, 4]),
        seed in any::<u8>(),
    ) {
        let data: Vec<u8> = (0..rows * columns * dimension)
            .map(|i| (i as u8).wrapping_mul(31).wrapping_add(seed))
            .collect();
        let image: Matrix<u8> = Matrix::from_slice(rows, columns, dimension, &data).unwrap();
        let bytes = bitmap::encode(&image).unwrap();
        let stride = (columns * dimension).div_ceil(4) * 4;
        let palette = if dimension == 1 { 1024 } else { 0 };
        prop_assert_eq!(bytes.len(), 54 + palette + stride * rows);
        prop_assert_eq!(bitmap::decode(&bytes).unwrap(), image);
    }
}
