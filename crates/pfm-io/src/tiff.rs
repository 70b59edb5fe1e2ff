//! TIFF reader glue.
//!
//! Decodes TIFF files with the `tiff` crate and hands back samples "as is":
//! the element type stays whatever the file stores and values are not
//! normalized. Use [`ImageData::to_f32`] to get float samples for PFM.
//!
//! # Example
//!
//! ```rust,ignore
//! use pfm_io::{pfm, tiff};
//!
//! let image = tiff::read("scan.tiff")?.into_f32();
//! pfm::write("scan.pfm", &image, 1.0)?;
//! ```

use crate::{ImageData, ImageReader, IoError, IoResult, PixelData};
use std::fs::File;
use std::io::{BufReader, Cursor, Read, Seek};
use std::path::Path;
use tiff::decoder::{Decoder, DecodingResult};
use tiff::ColorType;
use tracing::{debug, trace};

/// TIFF format reader.
#[derive(Debug, Clone, Copy, Default)]
pub struct TiffReader;

impl TiffReader {
    /// Creates a new TIFF reader.
    pub fn new() -> Self {
        Self
    }

    /// Internal read implementation from any Read+Seek source.
    ///
    /// `origin` is only used to label errors.
    fn read_from<R: Read + Seek>(&self, reader: R, origin: &Path) -> IoResult<ImageData> {
        let load = |e: tiff::TiffError| IoError::load(origin, e);

        let mut decoder = Decoder::new(reader).map_err(load)?;
        let (width, height) = decoder.dimensions().map_err(load)?;
        let color_type = decoder.colortype().map_err(load)?;

        let channels = match color_type {
            ColorType::Gray(_) => 1,
            ColorType::GrayA(_) => 2,
            ColorType::RGB(_) => 3,
            ColorType::RGBA(_) => 4,
            other => {
                return Err(IoError::load(
                    origin,
                    format!("unsupported TIFF color type: {:?}", other),
                ));
            }
        };

        let data = match decoder.read_image().map_err(load)? {
            DecodingResult::U8(buf) => PixelData::U8(buf),
            DecodingResult::U16(buf) => PixelData::U16(buf),
            DecodingResult::U32(buf) => PixelData::U32(buf),
            DecodingResult::I8(buf) => PixelData::I8(buf),
            DecodingResult::I16(buf) => PixelData::I16(buf),
            DecodingResult::I32(buf) => PixelData::I32(buf),
            DecodingResult::F32(buf) => PixelData::F32(buf),
            DecodingResult::F64(buf) => PixelData::F64(buf),
            _ => {
                return Err(IoError::load(origin, "unsupported TIFF sample type"));
            }
        };

        let image = ImageData::from_data(width, height, channels, data);
        if image.sample_count() != Some(image.data.len()) {
            return Err(IoError::load(
                origin,
                format!(
                    "decoded {} samples, which does not match {}x{}x{}",
                    image.data.len(),
                    width,
                    height,
                    channels
                ),
            ));
        }

        debug!(
            width,
            height,
            channels,
            sample_type = %image.format(),
            "TIFF decoded"
        );
        Ok(image)
    }
}

impl ImageReader for TiffReader {
    type Output = ImageData;

    fn read<P: AsRef<Path>>(&self, path: P) -> IoResult<ImageData> {
        let path = path.as_ref();
        trace!(path = %path.display(), "tiff::read");
        let file = File::open(path).map_err(|e| IoError::load(path, e))?;
        self.read_from(BufReader::new(file), path)
    }

    fn read_from_memory(&self, data: &[u8]) -> IoResult<ImageData> {
        self.read_from(Cursor::new(data), Path::new("<memory>"))
    }
}

/// Reads a TIFF file from the given path.
pub fn read<P: AsRef<Path>>(path: P) -> IoResult<ImageData> {
    TiffReader::new().read(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::PixelFormat;
    use tiff::encoder::{colortype, TiffEncoder};

    fn encode_rgb8(width: u32, height: u32, data: &[u8]) -> Vec<u8> {
        let mut buffer = Cursor::new(Vec::new());
        TiffEncoder::new(&mut buffer)
            .expect("encoder")
            .write_image::<colortype::RGB8>(width, height, data)
            .expect("write rgb8");
        buffer.into_inner()
    }

    #[test]
    fn read_rgb8_as_is() {
        let data: Vec<u8> = (0..4 * 2 * 3).map(|i| (i * 10) as u8).collect();
        let bytes = encode_rgb8(4, 2, &data);

        let image = TiffReader::new().read_from_memory(&bytes).expect("read failed");
        assert_eq!(image.width, 4);
        assert_eq!(image.height, 2);
        assert_eq!(image.channels, 3);
        assert_eq!(image.data, PixelData::U8(data.clone()));

        let floats = image.to_f32();
        assert_eq!(floats[5], 50.0);
    }

    #[test]
    fn read_gray_float_file() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("depth.tif");
        let data: Vec<f32> = (0..6).map(|i| i as f32 * 0.25).collect();
        {
            let file = File::create(&path).expect("create");
            TiffEncoder::new(file)
                .expect("encoder")
                .write_image::<colortype::Gray32Float>(3, 2, &data)
                .expect("write gray32f");
        }

        let image = read(&path).expect("read failed");
        assert_eq!(image.channels, 1);
        assert_eq!(image.format(), PixelFormat::F32);
        assert_eq!(image.as_f32(), Some(&data[..]));
    }

    #[test]
    fn read_gray16_keeps_element_type() {
        let mut buffer = Cursor::new(Vec::new());
        TiffEncoder::new(&mut buffer)
            .expect("encoder")
            .write_image::<colortype::Gray16>(2, 1, &[1u16, 65535])
            .expect("write gray16");

        let image = TiffReader::new()
            .read_from_memory(&buffer.into_inner())
            .expect("read failed");
        assert_eq!(image.data, PixelData::U16(vec![1, 65535]));
    }

    #[test]
    fn garbage_is_a_load_error() {
        let result = TiffReader::new().read_from_memory(b"definitely not a tiff");
        assert!(matches!(result, Err(IoError::Load { .. })));
    }

    #[test]
    fn missing_file_is_a_load_error() {
        let dir = tempfile::tempdir().expect("tempdir");
        let result = read(dir.path().join("missing.tiff"));
        match result {
            Err(IoError::Load { path, .. }) => assert!(path.ends_with("missing.tiff")),
            other => panic!("expected load error, got {:?}", other),
        }
    }
}
