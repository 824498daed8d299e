#![allow(dead_code)]

use std::path::PathBuf;

use pms5003::framing::{checksum, MAGIC};

pub fn fixture_path(name: &str) -> PathBuf {
    let mut path =
        PathBuf::from(std::env::var("CARGO_MANIFEST_DIR").expect("CARGO_MANIFEST_DIR not set"));
    path.push("tests/fixtures");
    path.push(name);
    path
}

/// Encode a complete frame with the given length field and bin counts.
pub fn encode_frame(length: u16, counts: [u16; 6]) -> Vec<u8> {
    let mut dat = MAGIC.to_vec();
    dat.extend_from_slice(&length.to_be_bytes());
    let mut words = vec![5u16, 9, 11, 4, 7, 10];
    words.extend_from_slice(&counts);
    words.push(0x9700);
    for w in words {
        dat.extend_from_slice(&w.to_be_bytes());
    }
    let sum = checksum(&dat);
    dat.extend_from_slice(&sum.to_be_bytes());
    dat
}

pub fn valid_frame(counts: [u16; 6]) -> Vec<u8> {
    encode_frame(28, counts)
}
