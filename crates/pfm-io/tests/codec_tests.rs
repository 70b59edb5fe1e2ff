use pfm_io::pfm::{self, PfmWriter, PfmWriterOptions};
use pfm_io::{Endianness, ImageData, ImageReader, ImageWriter, IoError, PixelData};

fn gradient(width: u32, height: u32, channels: u32) -> ImageData {
    let data = (0..width * height * channels)
        .map(|i| i as f32 * 0.125 - 3.0)
        .collect();
    ImageData::from_f32(width, height, channels, data)
}

fn writer(scale: f64, byte_order: Endianness) -> PfmWriter {
    PfmWriter::with_options(PfmWriterOptions { scale, byte_order })
}

fn to_bits(image: &ImageData) -> Vec<u32> {
    image
        .as_f32()
        .expect("f32 samples")
        .iter()
        .map(|v| v.to_bits())
        .collect()
}

#[test]
fn roundtrip_is_bit_exact_for_both_byte_orders() {
    let specials = vec![0.0f32, -0.0, f32::MIN_POSITIVE, f32::MAX, f32::INFINITY, 1.0e-42];

    for byte_order in [Endianness::Little, Endianness::Big] {
        for channels in [1, 3] {
            let image = gradient(7, 4, channels);
            let bytes = writer(2.5, byte_order).write_to_memory(&image).expect("encode");
            let decoded = pfm::decode(&bytes).expect("decode");

            assert_eq!(to_bits(&decoded.image), to_bits(&image));
            assert_eq!(decoded.image.width, 7);
            assert_eq!(decoded.image.height, 4);
            assert_eq!(decoded.image.channels, channels);
            assert_eq!(decoded.scale, 2.5);
            assert_eq!(decoded.byte_order, byte_order);
        }

        let image = ImageData::from_f32(6, 1, 1, specials.clone());
        let bytes = writer(1.0, byte_order).write_to_memory(&image).expect("encode");
        let decoded = pfm::decode(&bytes).expect("decode");
        assert_eq!(to_bits(&decoded.image), to_bits(&image));
    }
}

#[test]
fn zero_sized_grids_roundtrip() {
    for byte_order in [Endianness::Little, Endianness::Big] {
        for (width, height, channels) in [(0, 5, 1), (5, 0, 1), (0, 4, 3), (4, 0, 3)] {
            let image = ImageData::from_f32(width, height, channels, Vec::new());
            let bytes = writer(1.0, byte_order).write_to_memory(&image).expect("encode");
            let decoded = pfm::decode(&bytes).expect("decode");

            assert_eq!(decoded.image, image);
            assert_eq!(decoded.byte_order, byte_order);
            assert_eq!(decoded.is_color(), channels == 3);
        }
    }
}

#[test]
fn zero_width_header_with_empty_body() {
    let decoded = pfm::decode(b"Pf\n0 5\n1.0\n").expect("decode");
    assert_eq!(decoded.image.width, 0);
    assert_eq!(decoded.image.height, 5);
    assert!(decoded.image.as_f32().expect("f32").is_empty());
    assert_eq!(decoded.byte_order, Endianness::Big);

    let decoded = pfm::decode(b"PF\n3 0\n-1.0\n").expect("decode");
    assert!(decoded.image.data.is_empty());
    assert_eq!(decoded.byte_order, Endianness::Little);
}

#[test]
fn nan_samples_survive_bitwise() {
    let nan = f32::from_bits(0x7fc0_1234);
    let image = ImageData::from_f32(1, 1, 1, vec![nan]);
    let bytes = pfm::encode(&image, 1.0).expect("encode");
    let decoded = pfm::decode(&bytes).expect("decode");
    assert_eq!(to_bits(&decoded.image), vec![0x7fc0_1234]);
}

#[test]
fn header_rejection() {
    assert!(matches!(pfm::decode(b"XY\n1 1\n1.0\n\0\0\0\0"), Err(IoError::Format(_))));
    assert!(matches!(pfm::decode(b"Pf\n4x4\n1.0\n"), Err(IoError::Format(_))));
}

#[test]
fn scale_sign_controls_body_byte_order() {
    let values = [1.0f32, -0.5, 1234.5678];

    let mut little = b"Pf\n3 1\n-1.0\n".to_vec();
    let mut big = b"Pf\n3 1\n1.0\n".to_vec();
    for v in values {
        little.extend_from_slice(&v.to_le_bytes());
        big.extend_from_slice(&v.to_be_bytes());
    }

    let decoded = pfm::decode(&little).expect("decode little");
    assert_eq!(decoded.scale, 1.0);
    assert_eq!(decoded.image.as_f32(), Some(&values[..]));

    let decoded = pfm::decode(&big).expect("decode big");
    assert_eq!(decoded.scale, 1.0);
    assert_eq!(decoded.image.as_f32(), Some(&values[..]));
}

#[test]
fn grayscale_and_color_headers() {
    let gray = pfm::encode(&gradient(5, 10, 1), 1.0).expect("encode gray");
    assert_eq!(&gray[..8], b"Pf\n5 10\n");

    let color = pfm::encode(&gradient(5, 10, 3), 1.0).expect("encode color");
    assert_eq!(&color[..8], b"PF\n5 10\n");
}

#[test]
fn native_order_scale_sign_matches_host() {
    let bytes = pfm::encode(&gradient(1, 1, 1), 1.0).expect("encode");
    let scale_line = std::str::from_utf8(&bytes[7..11]).expect("ascii");
    if cfg!(target_endian = "little") {
        assert_eq!(scale_line, "-1.0");
    } else {
        assert_eq!(&scale_line[..3], "1.0");
    }
}

#[test]
fn body_is_stored_bottom_row_first() {
    // 1 wide, 2 tall: top row 10.0, bottom row 20.0.
    let image = ImageData::from_f32(1, 2, 1, vec![10.0, 20.0]);
    let bytes = writer(1.0, Endianness::Big).write_to_memory(&image).expect("encode");
    let body = &bytes[bytes.len() - 8..];
    assert_eq!(&body[..4], &20.0f32.to_be_bytes());
    assert_eq!(&body[4..], &10.0f32.to_be_bytes());
}

#[test]
fn flip_cancels_on_roundtrip() {
    let image = gradient(4, 3, 3);
    let decoded = pfm::decode(&pfm::encode(&image, 1.0).expect("encode")).expect("decode");

    let row = 4 * 3;
    let original = image.as_f32().expect("f32");
    let restored = decoded.image.as_f32().expect("f32");
    assert_eq!(&restored[..row], &original[..row]);
}

#[test]
fn unsupported_shape_and_type() {
    let two_channel = ImageData::from_f32(4, 4, 2, vec![0.0; 32]);
    match pfm::encode(&two_channel, 1.0) {
        Err(IoError::Shape(msg)) => {
            assert_eq!(msg, "image must have H x W x 3, H x W x 1, or H x W dimensions")
        }
        other => panic!("expected shape error, got {:?}", other),
    }

    let ints = ImageData::from_data(4, 4, 1, PixelData::I32(vec![0; 16]));
    match pfm::encode(&ints, 1.0) {
        Err(e @ IoError::Type(_)) => assert!(e.to_string().contains("float32")),
        other => panic!("expected type error, got {:?}", other),
    }
}

#[test]
fn write_and_read_files() {
    let dir = tempfile::tempdir().expect("tempdir");
    let image = gradient(3, 3, 1);

    let path = dir.path().join("big.pfm");
    writer(0.25, Endianness::Big).write(&path, &image).expect("write");
    let decoded = pfm::PfmReader::new().read(&path).expect("read");
    assert_eq!(decoded.image, image);
    assert_eq!(decoded.scale, 0.25);
    assert_eq!(decoded.byte_order, Endianness::Big);

    let raw = std::fs::read(&path).expect("read bytes");
    assert!(raw.starts_with(b"Pf\n3 3\n0.25\n"));
}
