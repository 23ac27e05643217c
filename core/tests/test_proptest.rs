#[cfg(test)]
mod tests {
    use proptest::prelude::*;
    use zstream_core::modes::Mode;
    use zstream_core::oneshot::*;
    use zstream_core::options::ZlibOptions;
    use zstream_core::transform::ZlibTransform;

    fn chunked(mode: Mode, data: &[u8], chunk: usize) -> Vec<u8> {
        let mut t = ZlibTransform::new(mode, &ZlibOptions::default()).unwrap();
        let mut out = Vec::new();
        for c in data.chunks(chunk) {
            out.extend_from_slice(&t.transform(c).unwrap());
        }
        out.extend_from_slice(&t.finish().unwrap());
        out
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(48))]

        #[test]
        fn prop_roundtrip_all_pairs(data in proptest::collection::vec(any::<u8>(), 0..4096)) {
            for mode in [Mode::Deflate, Mode::Gzip, Mode::DeflateRaw, Mode::BrotliCompress] {
                let inverse = mode.inverse().unwrap();
                let packed = process_sync(mode, data.as_slice(), None).unwrap();
                let unpacked = process_sync(inverse, packed, None).unwrap();
                prop_assert_eq!(unpacked.to_vec(), data.clone());
            }
        }

        #[test]
        fn prop_streaming_equivalence(
            data in proptest::collection::vec(0u8..8, 0..6000),
            chunk in 1usize..700,
        ) {
            for mode in [Mode::Deflate, Mode::Gzip, Mode::DeflateRaw, Mode::BrotliCompress] {
                let one_shot = process_sync(mode, data.as_slice(), None).unwrap();
                prop_assert_eq!(chunked(mode, &data, chunk), one_shot.to_vec());
            }
        }

        #[test]
        fn prop_streaming_decompression(
            data in proptest::collection::vec(any::<u8>(), 0..3000),
            chunk in 1usize..300,
        ) {
            let gz = gzip_sync(data.as_slice(), None).unwrap();
            prop_assert_eq!(chunked(Mode::Gunzip, &gz, chunk), data.clone());
            let br = brotli_compress_sync(data.as_slice(), None).unwrap();
            prop_assert_eq!(chunked(Mode::BrotliDecompress, &br, chunk), data.clone());
            let z = deflate_sync(data.as_slice(), None).unwrap();
            prop_assert_eq!(chunked(Mode::Unzip, &z, chunk), data);
        }

        #[test]
        fn prop_crc32_chains(a in proptest::collection::vec(any::<u8>(), 0..512),
                             b in proptest::collection::vec(any::<u8>(), 0..512)) {
            let mut ab = a.clone();
            ab.extend_from_slice(&b);
            let chained = crc32(b.as_slice(), crc32(a.as_slice(), 0).unwrap()).unwrap();
            prop_assert_eq!(crc32(ab, 0).unwrap(), chained);
        }
    }
}
