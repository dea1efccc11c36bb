// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 itsakeyfut
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! TGA texture loading
//!
//! Textures are read from uncompressed 32-bit Truevision TGA files and
//! converted into top-down RGBA8, ready for a `R8G8B8A8_UNORM` upload.
//!
//! # Header Layout
//!
//! ```text
//! 0x00:      ID length
//! 0x01:      Color map type
//! 0x02:      Image type (2 = uncompressed true-color)
//! 0x03-0x04: Color map first entry
//! 0x05-0x06: Color map length
//! 0x07:      Color map entry size (bits)
//! 0x0C-0x0D: Width
//! 0x0E-0x0F: Height
//! 0x10:      Pixel depth (bits)
//! 0x11:      Image descriptor (bit 5 = top-left origin)
//! ```
//!
//! TGA pixels are stored BGRA and, unless the descriptor says otherwise,
//! bottom row first.

#[cfg(test)]
mod tests;

use super::error::TextureError;
use std::fs;
use std::path::Path;

/// Size of the fixed TGA header
pub const TGA_HEADER_SIZE: usize = 18;

/// Uncompressed true-color image type
pub const TGA_TRUE_COLOR: u8 = 2;

/// Bytes per RGBA8 pixel
pub const BYTES_PER_PIXEL: usize = 4;

const DESCRIPTOR_TOP_LEFT: u8 = 0x20;

/// Parsed TGA header
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TargaHeader {
    pub id_length: u8,
    pub color_map_type: u8,
    pub image_type: u8,
    pub color_map_length: u16,
    pub color_map_entry_bits: u8,
    pub width: u16,
    pub height: u16,
    pub bpp: u8,
    pub descriptor: u8,
}

impl TargaHeader {
    pub fn parse(bytes: &[u8]) -> Result<Self, TextureError> {
        if bytes.len() < TGA_HEADER_SIZE {
            return Err(TextureError::HeaderTooShort(bytes.len()));
        }

        Ok(Self {
            id_length: bytes[0],
            color_map_type: bytes[1],
            image_type: bytes[2],
            color_map_length: u16::from_le_bytes([bytes[5], bytes[6]]),
            color_map_entry_bits: bytes[7],
            width: u16::from_le_bytes([bytes[12], bytes[13]]),
            height: u16::from_le_bytes([bytes[14], bytes[15]]),
            bpp: bytes[16],
            descriptor: bytes[17],
        })
    }

    /// Rows are stored top row first
    pub fn top_left_origin(&self) -> bool {
        self.descriptor & DESCRIPTOR_TOP_LEFT != 0
    }

    /// Offset of the first pixel byte, past the image ID and any color map
    pub fn pixel_offset(&self) -> usize {
        let color_map = if self.color_map_type != 0 {
            self.color_map_length as usize * (self.color_map_entry_bits as usize).div_ceil(8)
        } else {
            0
        };
        TGA_HEADER_SIZE + self.id_length as usize + color_map
    }
}

/// One level of a mip chain
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MipLevel {
    pub width: u32,
    pub height: u32,
    pub data: Vec<u8>,
}

/// RGBA8 texture, rows top-down
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Texture {
    width: u32,
    height: u32,
    data: Vec<u8>,
}

impl Texture {
    /// Wrap existing RGBA8 data
    ///
    /// Returns `None` if `data` does not hold exactly `width * height` pixels.
    pub fn from_rgba(width: u32, height: u32, data: Vec<u8>) -> Option<Self> {
        let expected = (width as usize)
            .checked_mul(height as usize)?
            .checked_mul(BYTES_PER_PIXEL)?;
        (data.len() == expected).then_some(Self {
            width,
            height,
            data,
        })
    }

    /// Decode a 32-bit uncompressed TGA image
    pub fn from_targa(bytes: &[u8]) -> Result<Self, TextureError> {
        let header = TargaHeader::parse(bytes)?;

        if header.image_type != TGA_TRUE_COLOR {
            return Err(TextureError::UnsupportedImageType(header.image_type));
        }
        if header.bpp != 32 {
            return Err(TextureError::UnsupportedDepth(header.bpp));
        }
        if header.width == 0 || header.height == 0 {
            return Err(TextureError::EmptyImage {
                width: header.width,
                height: header.height,
            });
        }

        let width = header.width as usize;
        let height = header.height as usize;
        let row_bytes = width * BYTES_PER_PIXEL;
        let expected = row_bytes * height;

        let pixels = bytes.get(header.pixel_offset()..).unwrap_or(&[]);
        if pixels.len() < expected {
            return Err(TextureError::Truncated {
                expected,
                got: pixels.len(),
            });
        }

        let mut data = vec![0u8; expected];
        for (y, dst_row) in data.chunks_exact_mut(row_bytes).enumerate() {
            let src_y = if header.top_left_origin() {
                y
            } else {
                height - 1 - y
            };
            let src_row = &pixels[src_y * row_bytes..(src_y + 1) * row_bytes];

            for (dst, src) in dst_row.chunks_exact_mut(4).zip(src_row.chunks_exact(4)) {
                dst[0] = src[2]; // red
                dst[1] = src[1]; // green
                dst[2] = src[0]; // blue
                dst[3] = src[3]; // alpha
            }
        }

        let origin = if header.top_left_origin() {
            "top-left"
        } else {
            "bottom-left"
        };
        log::debug!("Decoded {}x{} TGA ({} origin)", width, height, origin);

        Ok(Self {
            width: header.width as u32,
            height: header.height as u32,
            data,
        })
    }

    /// Load a TGA file from disk
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, TextureError> {
        let path = path.as_ref();
        let bytes = fs::read(path).map_err(|source| TextureError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let texture = Self::from_targa(&bytes)?;
        log::info!(
            "Targa loaded from '{}' ({}x{})",
            path.display(),
            texture.width,
            texture.height
        );
        Ok(texture)
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// RGBA8 pixel data, rows top-down
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Bytes per row
    pub fn row_pitch(&self) -> u32 {
        self.width * BYTES_PER_PIXEL as u32
    }

    /// RGBA value at (x, y), with y = 0 the top row
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let offset = (y as usize * self.width as usize + x as usize) * BYTES_PER_PIXEL;
        let p = &self.data[offset..offset + BYTES_PER_PIXEL];
        Some([p[0], p[1], p[2], p[3]])
    }

    /// Number of levels in a full mip chain down to 1x1
    pub fn mip_level_count(&self) -> u32 {
        32 - self.width.max(self.height).leading_zeros()
    }

    /// Build the full mip chain with a 2x2 box filter
    ///
    /// Level 0 is the texture itself. Each following level halves both
    /// dimensions (never below 1). Odd edges reuse the last row or column.
    pub fn generate_mips(&self) -> Vec<MipLevel> {
        let mut levels = Vec::with_capacity(self.mip_level_count() as usize);
        levels.push(MipLevel {
            width: self.width,
            height: self.height,
            data: self.data.clone(),
        });

        while let Some(prev) = levels.last() {
            if prev.width == 1 && prev.height == 1 {
                break;
            }
            let next = downsample(prev);
            levels.push(next);
        }

        levels
    }
}

fn downsample(src: &MipLevel) -> MipLevel {
    let width = (src.width / 2).max(1);
    let height = (src.height / 2).max(1);
    let src_w = src.width as usize;
    let src_h = src.height as usize;

    let texel = |x: usize, y: usize, channel: usize| -> u32 {
        let x = x.min(src_w - 1);
        let y = y.min(src_h - 1);
        src.data[(y * src_w + x) * BYTES_PER_PIXEL + channel] as u32
    };

    let mut data = Vec::with_capacity(width as usize * height as usize * BYTES_PER_PIXEL);
    for y in 0..height as usize {
        for x in 0..width as usize {
            for channel in 0..BYTES_PER_PIXEL {
                let sum = texel(2 * x, 2 * y, channel)
                    + texel(2 * x + 1, 2 * y, channel)
                    + texel(2 * x, 2 * y + 1, channel)
                    + texel(2 * x + 1, 2 * y + 1, channel);
                data.push(((sum + 2) / 4) as u8);
            }
        }
    }

    MipLevel {
        width,
        height,
        data,
    }
}
