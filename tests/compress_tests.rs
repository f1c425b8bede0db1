use hasten_core::{compress, decompress, negotiate, Encoding};

const SAMPLE: &[u8] =
    b"A payload with enough repetition repetition repetition to compress well well well.";

#[test]
fn every_supported_encoding_round_trips() {
    for encoding in Encoding::SUPPORTED {
        let packed = compress(SAMPLE, encoding, None).unwrap();
        let unpacked = decompress(&packed, encoding).unwrap();
        assert_eq!(unpacked, SAMPLE, "round trip failed for {encoding}");
    }
}

#[test]
fn explicit_levels_are_accepted() {
    for encoding in [Encoding::Gzip, Encoding::Deflate] {
        for level in [0, 1, 9, 99] {
            // Out-of-range levels clamp rather than fail.
            let packed = compress(SAMPLE, encoding, Some(level)).unwrap();
            assert_eq!(decompress(&packed, encoding).unwrap(), SAMPLE);
        }
    }
    let packed = compress(SAMPLE, Encoding::Brotli, Some(11)).unwrap();
    assert_eq!(decompress(&packed, Encoding::Brotli).unwrap(), SAMPLE);
    let packed = compress(SAMPLE, Encoding::Zstd, Some(19)).unwrap();
    assert_eq!(decompress(&packed, Encoding::Zstd).unwrap(), SAMPLE);
}

#[test]
fn identity_is_a_pass_through() {
    assert_eq!(
        compress(SAMPLE, Encoding::Identity, None).unwrap(),
        SAMPLE
    );
    assert_eq!(
        decompress(SAMPLE, Encoding::Identity).unwrap(),
        SAMPLE
    );
}

#[test]
fn corrupt_streams_fail_cleanly() {
    for encoding in Encoding::SUPPORTED {
        let err = decompress(b"definitely not a compressed stream", encoding).unwrap_err();
        assert_eq!(err.encoding, encoding);
    }
}

#[test]
fn negotiation_picks_the_highest_q() {
    assert_eq!(
        negotiate("br;q=0.5, gzip;q=0.8", &Encoding::SUPPORTED),
        Encoding::Gzip
    );
    assert_eq!(
        negotiate("gzip;q=0.3, zstd;q=0.9", &Encoding::SUPPORTED),
        Encoding::Zstd
    );
}

#[test]
fn negotiation_breaks_ties_in_server_preference_order() {
    // Equal weights: the server's own ranking (zstd first) decides.
    assert_eq!(
        negotiate("gzip, br, zstd", &Encoding::SUPPORTED),
        Encoding::Zstd
    );
    assert_eq!(
        negotiate("deflate, gzip", &Encoding::SUPPORTED),
        Encoding::Gzip
    );
}

#[test]
fn wildcard_covers_unlisted_encodings() {
    assert_eq!(negotiate("*", &Encoding::SUPPORTED), Encoding::Zstd);
    // An explicit zero excludes an encoding even under a wildcard.
    assert_eq!(
        negotiate("*;q=1, zstd;q=0", &Encoding::SUPPORTED),
        Encoding::Brotli
    );
}

#[test]
fn no_acceptable_encoding_falls_back_to_identity() {
    assert_eq!(negotiate("", &Encoding::SUPPORTED), Encoding::Identity);
    assert_eq!(
        negotiate("compress;q=1", &Encoding::SUPPORTED),
        Encoding::Identity
    );
    assert_eq!(
        negotiate("gzip;q=0, br;q=0", &Encoding::SUPPORTED),
        Encoding::Identity
    );
}

#[test]
fn header_parsing_is_forgiving() {
    // Uppercase names, stray spaces, the x-gzip alias, and malformed
    // weights all degrade gracefully.
    assert_eq!(
        negotiate("GZIP ; q=0.9", &Encoding::SUPPORTED),
        Encoding::Gzip
    );
    assert_eq!(negotiate("x-gzip", &Encoding::SUPPORTED), Encoding::Gzip);
    assert_eq!(
        negotiate("br;q=banana", &Encoding::SUPPORTED),
        Encoding::Brotli
    );
}
