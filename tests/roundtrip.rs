//! End-to-end scenarios from spec.md §8: PGM in, QTC out, QTC in, PGM out.

use std::fs::File;
use std::io::{BufReader, BufWriter};

use quadtree_raster_codec::codec::{decode, encode};
use quadtree_raster_codec::tree::{builder, lossy};
use quadtree_raster_codec::{pgm, raster, PixelBuffer};

fn pseudo_random_image(side: usize, seed: u32) -> PixelBuffer {
    let mut state = seed.wrapping_add(1);
    let data = (0..side * side)
        .map(|_| {
            state = state.wrapping_mul(1103515245).wrapping_add(12345);
            ((state >> 16) & 0xFF) as u8
        })
        .collect();
    PixelBuffer::new(side, data).unwrap()
}

#[test]
fn lossless_round_trip_through_full_qtc_pipeline() {
    let original = pseudo_random_image(8, 7);
    let tree = builder::build(&original).unwrap();

    let mut qtc_bytes = Vec::new();
    encode(&tree, &mut qtc_bytes).unwrap();

    let decoded_tree = decode(&mut &qtc_bytes[..]).unwrap();
    let reconstructed = raster::reconstruct(&decoded_tree).unwrap();

    assert_eq!(reconstructed.data(), original.data());
}

#[test]
fn lossless_round_trip_via_pgm_boundary() {
    let original = pseudo_random_image(16, 99);
    let mut pgm_bytes = Vec::new();
    pgm::write(&original, &mut pgm_bytes).unwrap();

    let parsed = pgm::read(&mut &pgm_bytes[..]).unwrap();
    assert_eq!(parsed.data(), original.data());

    let tree = builder::build(&parsed).unwrap();
    let mut qtc_bytes = Vec::new();
    encode(&tree, &mut qtc_bytes).unwrap();
    let decoded_tree = decode(&mut &qtc_bytes[..]).unwrap();
    let reconstructed = raster::reconstruct(&decoded_tree).unwrap();

    let mut out_pgm = Vec::new();
    pgm::write(&reconstructed, &mut out_pgm).unwrap();
    let reread = pgm::read(&mut &out_pgm[..]).unwrap();

    assert_eq!(reread.data(), original.data());
}

#[test]
fn single_pixel_image_round_trips() {
    let original = PixelBuffer::new(1, vec![200]).unwrap();
    let tree = builder::build(&original).unwrap();
    let mut qtc_bytes = Vec::new();
    encode(&tree, &mut qtc_bytes).unwrap();
    let decoded_tree = decode(&mut &qtc_bytes[..]).unwrap();
    let reconstructed = raster::reconstruct(&decoded_tree).unwrap();
    assert_eq!(reconstructed.data(), original.data());
}

#[test]
fn uniform_image_compresses_to_the_minimal_header_plus_payload() {
    let original = PixelBuffer::new(32, vec![64; 32 * 32]).unwrap();
    let tree = builder::build(&original).unwrap();
    assert!(tree.root.u);

    let mut qtc_bytes = Vec::new();
    encode(&tree, &mut qtc_bytes).unwrap();

    let decoded_tree = decode(&mut &qtc_bytes[..]).unwrap();
    assert!(decoded_tree.root.u);
    let reconstructed = raster::reconstruct(&decoded_tree).unwrap();
    assert_eq!(reconstructed.data(), original.data());
}

#[test]
fn lossy_pass_never_increases_node_count_and_still_decodes() {
    let original = pseudo_random_image(16, 3);
    let mut tree = builder::build(&original).unwrap();
    let before = tree.node_count();
    lossy::apply(&mut tree, 2.0).unwrap();
    assert!(tree.node_count() <= before);

    let mut qtc_bytes = Vec::new();
    encode(&tree, &mut qtc_bytes).unwrap();
    let decoded_tree = decode(&mut &qtc_bytes[..]).unwrap();
    // Lossy decoding must still produce a structurally valid raster, even
    // though it is not expected to equal the original pixel-for-pixel.
    let reconstructed = raster::reconstruct(&decoded_tree).unwrap();
    assert_eq!(reconstructed.side(), original.side());
}

#[test]
fn rejects_truncated_qtc_stream() {
    let original = pseudo_random_image(8, 42);
    let tree = builder::build(&original).unwrap();
    let mut qtc_bytes = Vec::new();
    encode(&tree, &mut qtc_bytes).unwrap();

    qtc_bytes.truncate(qtc_bytes.len() - 1);
    assert!(decode(&mut &qtc_bytes[..]).is_err());
}

#[test]
fn round_trips_through_real_files_on_disk() {
    let original = pseudo_random_image(8, 21);
    let dir = tempfile::tempdir().unwrap();

    let pgm_path = dir.path().join("input.pgm");
    let mut pgm_file = BufWriter::new(File::create(&pgm_path).unwrap());
    pgm::write(&original, &mut pgm_file).unwrap();
    drop(pgm_file);

    let parsed = pgm::read(&mut BufReader::new(File::open(&pgm_path).unwrap())).unwrap();
    let tree = builder::build(&parsed).unwrap();

    let qtc_path = dir.path().join("output.qtc");
    let mut qtc_file = BufWriter::new(File::create(&qtc_path).unwrap());
    encode(&tree, &mut qtc_file).unwrap();
    drop(qtc_file);

    let decoded_tree = decode(&mut BufReader::new(File::open(&qtc_path).unwrap())).unwrap();
    let reconstructed = raster::reconstruct(&decoded_tree).unwrap();
    assert_eq!(reconstructed.data(), original.data());
}

#[test]
fn rejects_corrupt_magic() {
    let bytes = b"XX\n# t\n# r\n\x03garbage".to_vec();
    assert!(decode(&mut &bytes[..]).is_err());
}
