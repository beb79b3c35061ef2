// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! The 14-byte file header and 40-byte info header.
//!
//! ```text
//! offset  size  field
//!      0     2  "BM"
//!      2     4  file size
//!     10     4  pixel data offset
//!     14     4  info header size (>= 40)
//!     18     4  width  (i32)
//!     22     4  height (i32, negative = top-down)
//!     26     2  planes (1)
//!     28     2  bits per pixel
//!     30     4  compression (0 = uncompressed)
//!     34     4  image size
//!     38     8  resolution (pixels per metre)
//!     46     4  palette entries used (0 = all)
//!     50     4  important colours
//! ```
//!
//! All fields are little-endian.

use crate::BitmapError;

pub const FILE_HEADER_LEN: usize = 14;
pub const INFO_HEADER_LEN: usize = 40;
pub const SIGNATURE: [u8; 2] = *b"BM";

const COMPRESSION_NONE: u32 = 0;
/// 72 DPI.
const PIXELS_PER_METRE: i32 = 2835;

/// The fields of both headers this codec reads or writes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BmpHeader {
    pub file_size: u32,
    pub data_offset: u32,
    pub info_size: u32,
    pub width: i32,
    pub height: i32,
    pub bits_per_pixel: u16,
    pub compression: u32,
    pub image_size: u32,
    pub colors_used: u32,
}

fn u16_at(bytes: &[u8], offset: usize) -> u16 {
    u16::from_le_bytes([bytes[offset], bytes[offset + 1]])
}

fn u32_at(bytes: &[u8], offset: usize) -> u32 {
    u32::from_le_bytes([bytes[offset], bytes[offset + 1], bytes[offset + 2], bytes[offset + 3]])
}

fn i32_at(bytes: &[u8], offset: usize) -> i32 {
    u32_at(bytes, offset) as i32
}

impl BmpHeader {
    /// Parses and sanity-checks both headers at the start of `bytes`.
    pub fn parse(bytes: &[u8]) -> Result<Self, BitmapError> {
        if bytes.len() < FILE_HEADER_LEN + INFO_HEADER_LEN {
            return Err(BitmapError::InvalidHeader(format!(
                "{} bytes is shorter than the two headers",
                bytes.len()
            )));
        }
        if bytes[..2] != SIGNATURE {
            return Err(BitmapError::InvalidHeader(format!(
                "bad signature {:#04x} {:#04x}",
                bytes[0], bytes[1]
            )));
        }

        let header = Self {
            file_size: u32_at(bytes, 2),
            data_offset: u32_at(bytes, 10),
            info_size: u32_at(bytes, 14),
            width: i32_at(bytes, 18),
            height: i32_at(bytes, 22),
            bits_per_pixel: u16_at(bytes, 28),
            compression: u32_at(bytes, 30),
            image_size: u32_at(bytes, 34),
            colors_used: u32_at(bytes, 46),
        };

        if (header.info_size as usize) < INFO_HEADER_LEN {
            return Err(BitmapError::Unsupported(format!(
                "info header of {} bytes (core headers are not supported)",
                header.info_size
            )));
        }
        let planes = u16_at(bytes, 26);
        if planes != 1 {
            return Err(BitmapError::InvalidHeader(format!("{planes} colour planes")));
        }
        if header.width <= 0 || header.height == 0 || header.height == i32::MIN {
            return Err(BitmapError::InvalidHeader(format!(
                "invalid dimensions {}x{}",
                header.width, header.height
            )));
        }
        if header.compression != COMPRESSION_NONE {
            return Err(BitmapError::Unsupported(format!(
                "compression method {}",
                header.compression
            )));
        }
        if !matches!(header.bits_per_pixel, 8 | 24 | 32) {
            return Err(BitmapError::Unsupported(format!(
                "{} bits per pixel",
                header.bits_per_pixel
            )));
        }
        Ok(header)
    }

    /// Header for an uncompressed, bottom-up image.
    pub(crate) fn for_image(rows: usize, columns: usize, dimension: usize) -> Result<Self, BitmapError> {
        let too_large = || BitmapError::Unsupported(format!("{rows}x{columns} image is too large"));
        let width = i32::try_from(columns).map_err(|_| too_large())?;
        let height = i32::try_from(rows).map_err(|_| too_large())?;
        let bits_per_pixel = (dimension * 8) as u16;
        let palette = if dimension == 1 { 256 * 4 } else { 0 };
        let stride = row_stride(columns, dimension);
        let image_size = stride
            .checked_mul(rows)
            .and_then(|n| u32::try_from(n).ok())
            .ok_or_else(too_large)?;
        let data_offset = (FILE_HEADER_LEN + INFO_HEADER_LEN + palette) as u32;
        let file_size = data_offset.checked_add(image_size).ok_or_else(too_large)?;

        Ok(Self {
            file_size,
            data_offset,
            info_size: INFO_HEADER_LEN as u32,
            width,
            height,
            bits_per_pixel,
            compression: COMPRESSION_NONE,
            image_size,
            colors_used: if dimension == 1 { 256 } else { 0 },
        })
    }

    /// Appends both headers to `out`.
    pub fn write(&self, out: &mut Vec<u8>) {
        out.extend_from_slice(&SIGNATURE);
        out.extend_from_slice(&self.file_size.to_le_bytes());
        out.extend_from_slice(&[0; 4]);
        out.extend_from_slice(&self.data_offset.to_le_bytes());

        out.extend_from_slice(&self.info_size.to_le_bytes());
        out.extend_from_slice(&self.width.to_le_bytes());
        out.extend_from_slice(&self.height.to_le_bytes());
        out.extend_from_slice(&1u16.to_le_bytes());
        out.extend_from_slice(&self.bits_per_pixel.to_le_bytes());
        out.extend_from_slice(&self.compression.to_le_bytes());
        out.extend_from_slice(&self.image_size.to_le_bytes());
        out.extend_from_slice(&PIXELS_PER_METRE.to_le_bytes());
        out.extend_from_slice(&PIXELS_PER_METRE.to_le_bytes());
        out.extend_from_slice(&self.colors_used.to_le_bytes());
        out.extend_from_slice(&0u32.to_le_bytes());
    }

    pub fn rows(&self) -> usize {
        self.height.unsigned_abs() as usize
    }

    pub fn columns(&self) -> usize {
        self.width as usize
    }

    /// Bytes per pixel, which becomes the matrix dimension.
    pub fn dimension(&self) -> usize {
        usize::from(self.bits_per_pixel / 8)
    }

    /// Rows are stored first row first when the height is negative.
    pub fn is_top_down(&self) -> bool {
        self.height < 0
    }

    /// Bytes per stored row, padding included.
    pub fn row_stride(&self) -> usize {
        row_stride(self.columns(), self.dimension())
    }
}

/// Row length rounded up to a multiple of 4 bytes.
pub fn row_stride(columns: usize, dimension: usize) -> usize {
    (columns * dimension + 3) & !3
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_write_then_parse() {
        let header = BmpHeader::for_image(3, 5, 3).unwrap();
        let mut bytes = Vec::new();
        header.write(&mut bytes);
        assert_eq!(bytes.len(), FILE_HEADER_LEN + INFO_HEADER_LEN);
        assert_eq!(BmpHeader::parse(&bytes).unwrap(), header);
        assert_eq!(header.row_stride(), 16);
        assert_eq!(header.image_size, 48);
        assert_eq!(header.data_offset, 54);
    }

    #[test]
    fn test_grayscale_has_palette() {
        let header = BmpHeader::for_image(2, 2, 1).unwrap();
        assert_eq!(header.data_offset, 54 + 1024);
        assert_eq!(header.colors_used, 256);
        assert_eq!(header.row_stride(), 4);
    }

    #[test]
    fn test_row_stride_padding() {
        assert_eq!(row_stride(1, 1), 4);
        assert_eq!(row_stride(4, 1), 4);
        assert_eq!(row_stride(5, 3), 16);
        assert_eq!(row_stride(3, 4), 12);
    }

    #[test]
    fn test_rejections() {
        assert!(matches!(BmpHeader::parse(b"BM"), Err(BitmapError::InvalidHeader(_))));

        let mut bytes = Vec::new();
        BmpHeader::for_image(2, 2, 3).unwrap().write(&mut bytes);
        let mut bad = bytes.clone();
        bad[0] = b'X';
        assert!(matches!(BmpHeader::parse(&bad), Err(BitmapError::InvalidHeader(_))));

        let mut rle = bytes.clone();
        rle[30] = 1;
        assert!(matches!(BmpHeader::parse(&rle), Err(BitmapError::Unsupported(_))));

        let mut sixteen = bytes.clone();
        sixteen[28] = 16;
        assert!(matches!(BmpHeader::parse(&sixteen), Err(BitmapError::Unsupported(_))));

        let mut empty = bytes;
        empty[18..22].copy_from_slice(&0i32.to_le_bytes());
        assert!(matches!(BmpHeader::parse(&empty), Err(BitmapError::InvalidHeader(_))));
    }

    #[test]
    fn test_top_down_height() {
        let mut bytes = Vec::new();
        BmpHeader::for_image(7, 2, 4).unwrap().write(&mut bytes);
        bytes[22..26].copy_from_slice(&(-7i32).to_le_bytes());
        let header = BmpHeader::parse(&bytes).unwrap();
        assert!(header.is_top_down());
        assert_eq!(header.rows(), 7);
        assert_eq!(header.dimension(), 4);
    }
}
