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

//! TGA decoding tests

use super::*;

/// Build a 32-bit TGA from BGRA rows given bottom row first
fn targa(width: u16, height: u16, descriptor: u8, pixels: &[[u8; 4]]) -> Vec<u8> {
    let mut bytes = vec![0u8; TGA_HEADER_SIZE];
    bytes[2] = TGA_TRUE_COLOR;
    bytes[12..14].copy_from_slice(&width.to_le_bytes());
    bytes[14..16].copy_from_slice(&height.to_le_bytes());
    bytes[16] = 32;
    bytes[17] = descriptor;
    for p in pixels {
        bytes.extend_from_slice(p);
    }
    bytes
}

#[test]
fn test_header_parse() {
    let bytes = targa(640, 480, 0x08, &[]);
    let header = TargaHeader::parse(&bytes).unwrap();
    assert_eq!(header.width, 640);
    assert_eq!(header.height, 480);
    assert_eq!(header.bpp, 32);
    assert!(!header.top_left_origin());
    assert_eq!(header.pixel_offset(), TGA_HEADER_SIZE);
}

#[test]
fn test_header_too_short() {
    assert!(matches!(
        TargaHeader::parse(&[0u8; 10]),
        Err(TextureError::HeaderTooShort(10))
    ));
}

#[test]
fn test_bottom_up_rows_are_flipped() {
    // 1x2 image: stored bottom row (blue) first, then top row (red)
    let bytes = targa(1, 2, 0, &[[255, 0, 0, 255], [0, 0, 255, 128]]);
    let texture = Texture::from_targa(&bytes).unwrap();

    assert_eq!(texture.width(), 1);
    assert_eq!(texture.height(), 2);
    // Top row is red, with its own alpha
    assert_eq!(texture.pixel(0, 0), Some([255, 0, 0, 128]));
    // Bottom row is blue
    assert_eq!(texture.pixel(0, 1), Some([0, 0, 255, 255]));
}

#[test]
fn test_top_left_origin_keeps_row_order() {
    let bytes = targa(
        1,
        2,
        DESCRIPTOR_TOP_LEFT,
        &[[255, 0, 0, 255], [0, 0, 255, 128]],
    );
    let texture = Texture::from_targa(&bytes).unwrap();
    assert_eq!(texture.pixel(0, 0), Some([0, 0, 255, 255]));
    assert_eq!(texture.pixel(0, 1), Some([255, 0, 0, 128]));
}

#[test]
fn test_bgra_to_rgba_swizzle_across_row() {
    let bytes = targa(2, 1, 0, &[[1, 2, 3, 4], [5, 6, 7, 8]]);
    let texture = Texture::from_targa(&bytes).unwrap();
    assert_eq!(texture.data(), &[3, 2, 1, 4, 7, 6, 5, 8]);
    assert_eq!(texture.row_pitch(), 8);
}

#[test]
fn test_image_id_is_skipped() {
    let mut bytes = targa(1, 1, 0, &[]);
    bytes[0] = 3;
    bytes.extend_from_slice(b"abc");
    bytes.extend_from_slice(&[10, 20, 30, 40]);

    let texture = Texture::from_targa(&bytes).unwrap();
    assert_eq!(texture.pixel(0, 0), Some([30, 20, 10, 40]));
}

#[test]
fn test_rejects_non_32_bit() {
    let mut bytes = targa(1, 1, 0, &[[0, 0, 0, 0]]);
    bytes[16] = 24;
    assert!(matches!(
        Texture::from_targa(&bytes),
        Err(TextureError::UnsupportedDepth(24))
    ));
}

#[test]
fn test_rejects_compressed() {
    let mut bytes = targa(1, 1, 0, &[[0, 0, 0, 0]]);
    bytes[2] = 10;
    assert!(matches!(
        Texture::from_targa(&bytes),
        Err(TextureError::UnsupportedImageType(10))
    ));
}

#[test]
fn test_rejects_truncated_pixels() {
    let bytes = targa(2, 2, 0, &[[0, 0, 0, 0], [0, 0, 0, 0]]);
    assert!(matches!(
        Texture::from_targa(&bytes),
        Err(TextureError::Truncated {
            expected: 16,
            got: 8
        })
    ));
}

#[test]
fn test_rejects_empty_image() {
    let bytes = targa(0, 4, 0, &[]);
    assert!(matches!(
        Texture::from_targa(&bytes),
        Err(TextureError::EmptyImage { .. })
    ));
}

#[test]
fn test_pixel_out_of_bounds() {
    let texture = Texture::from_rgba(1, 1, vec![0; 4]).unwrap();
    assert_eq!(texture.pixel(1, 0), None);
    assert_eq!(texture.pixel(0, 1), None);
    assert!(Texture::from_rgba(2, 2, vec![0; 4]).is_none());
}

#[test]
fn test_mip_chain_dimensions() {
    let texture = Texture::from_rgba(8, 2, vec![0; 8 * 2 * 4]).unwrap();
    assert_eq!(texture.mip_level_count(), 4);

    let mips = texture.generate_mips();
    let dims: Vec<(u32, u32)> = mips.iter().map(|m| (m.width, m.height)).collect();
    assert_eq!(dims, vec![(8, 2), (4, 1), (2, 1), (1, 1)]);
    for mip in &mips {
        assert_eq!(mip.data.len(), (mip.width * mip.height * 4) as usize);
    }
}

#[test]
fn test_mip_box_filter_averages() {
    #[rustfmt::skip]
    let data = vec![
        0, 0, 0, 255,     100, 0, 0, 255,
        200, 0, 0, 255,   100, 0, 0, 255,
    ];
    let texture = Texture::from_rgba(2, 2, data).unwrap();
    let mips = texture.generate_mips();

    assert_eq!(mips.len(), 2);
    assert_eq!(mips[1].data, vec![100, 0, 0, 255]);
}

#[test]
fn test_mip_single_pixel() {
    let texture = Texture::from_rgba(1, 1, vec![9, 8, 7, 6]).unwrap();
    let mips = texture.generate_mips();
    assert_eq!(mips.len(), 1);
    assert_eq!(texture.mip_level_count(), 1);
}

#[test]
fn test_load_missing_file() {
    assert!(matches!(
        Texture::load("missing.tga"),
        Err(TextureError::Io { .. })
    ));
}
