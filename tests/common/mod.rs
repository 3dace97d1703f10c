//! Builders for small FreeSurfer files used by the integration tests.
#![allow(dead_code)]

use byteordered::ByteOrdered;
use flate2::write::GzEncoder;
use flate2::Compression;

use std::fs;
use std::io::Write;
use std::path::Path;

/// Encode per-vertex values as a new format curv file.
pub fn curv_bytes(values: &[f32]) -> Vec<u8> {
    let mut buf: Vec<u8> = Vec::new();
    {
        let mut w = ByteOrdered::be(&mut buf);
        w.write_all(&[255, 255, 255]).unwrap();
        w.write_i32(values.len() as i32).unwrap();
        w.write_i32(0).unwrap();
        w.write_i32(1).unwrap();
        for v in values {
            w.write_f32(*v).unwrap();
        }
    }
    buf
}

/// Encode a version 2 annot file. `regions` holds (name, r, g, b); `vertex_regions` the region index per vertex, `None` for no region.
pub fn annot_bytes(regions: &[(&str, i32, i32, i32)], vertex_regions: &[Option<usize>]) -> Vec<u8> {
    let mut buf: Vec<u8> = Vec::new();
    {
        let mut w = ByteOrdered::be(&mut buf);
        w.write_i32(vertex_regions.len() as i32).unwrap();
        for (idx, region) in vertex_regions.iter().enumerate() {
            let label = match region {
                Some(r) => {
                    let (_, red, green, blue) = regions[*r];
                    red + green * 256 + blue * 65536
                }
                None => 0,
            };
            w.write_i32(idx as i32).unwrap();
            w.write_i32(label).unwrap();
        }
        w.write_i32(1).unwrap();
        w.write_i32(-2).unwrap();
        w.write_i32(regions.len() as i32).unwrap();
        w.write_i32(0).unwrap();
        w.write_i32(regions.len() as i32).unwrap();
        for (idx, (name, r, g, b)) in regions.iter().enumerate() {
            w.write_i32(idx as i32).unwrap();
            w.write_i32(name.len() as i32).unwrap();
            w.write_all(name.as_bytes()).unwrap();
            for c in [r, g, b, &0] {
                w.write_i32(*c).unwrap();
            }
        }
    }
    buf
}

pub fn write_file(path: &Path, bytes: &[u8]) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, bytes).unwrap();
}

pub fn write_gz_file(path: &Path, bytes: &[u8]) {
    let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(bytes).unwrap();
    write_file(path, &encoder.finish().unwrap());
}
