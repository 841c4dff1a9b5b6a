use std::path::Path;

use image::{ColorType, DynamicImage, GenericImageView, ImageFormat, RgbImage};
use lopdf::{dictionary, Stream};

use crate::error::RenderError;

/// A raster image ready to be embedded as a PDF image XObject.
#[derive(Debug, Clone)]
pub struct PdfImage {
    pub width_px: u32,
    pub height_px: u32,
    color_space: &'static str,
    data: Vec<u8>,
    dct_encoded: bool,
}

impl PdfImage {
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, RenderError> {
        if bytes.is_empty() {
            return Err(RenderError::Decode("image data is empty".to_string()));
        }

        let img = image::load_from_memory(bytes)
            .map_err(|e| RenderError::Decode(format!("Failed to load image: {}", e)))?;

        let (width_px, height_px) = img.dimensions();
        if width_px == 0 || height_px == 0 {
            return Err(RenderError::Decode("image has no pixels".to_string()));
        }

        // Baseline JPEGs can be embedded untouched
        if matches!(image::guess_format(bytes), Ok(ImageFormat::Jpeg)) {
            if let Some(color_space) = passthrough_color_space(jpeg_components(bytes), img.color()) {
                return Ok(Self {
                    width_px,
                    height_px,
                    color_space,
                    data: bytes.to_vec(),
                    dct_encoded: true,
                });
            }
        }

        Ok(Self {
            width_px,
            height_px,
            color_space: "DeviceRGB",
            data: flatten_on_white(&img).into_raw(),
            dct_encoded: false,
        })
    }

    pub fn from_path(path: &Path) -> Result<Self, RenderError> {
        if !path.is_file() {
            return Err(RenderError::MissingAsset(path.to_path_buf()));
        }
        let bytes = std::fs::read(path).map_err(|e| RenderError::ReadAsset {
            path: path.to_path_buf(),
            source: e,
        })?;
        Self::from_bytes(&bytes)
    }

    pub fn is_passthrough_jpeg(&self) -> bool {
        self.dct_encoded
    }

    pub fn into_stream(self) -> Stream {
        let mut dict = dictionary! {
            "Type" => "XObject",
            "Subtype" => "Image",
            "Width" => self.width_px as i64,
            "Height" => self.height_px as i64,
            "ColorSpace" => self.color_space,
            "BitsPerComponent" => 8,
        };

        if self.dct_encoded {
            dict.set("Filter", "DCTDecode");
            return Stream::new(dict, self.data);
        }

        let mut stream = Stream::new(dict, self.data);
        if let Err(e) = stream.compress() {
            log::warn!("Storing image uncompressed: {}", e);
        }
        stream
    }
}

/// Colour space for embedding a JPEG as-is. The decoder converts CMYK and
/// YCCK to RGB, so the component count in the frame header decides.
fn passthrough_color_space(components: Option<u8>, decoded: ColorType) -> Option<&'static str> {
    match (components, decoded) {
        (Some(3), ColorType::Rgb8) => Some("DeviceRGB"),
        (Some(1), ColorType::L8) => Some("DeviceGray"),
        _ => None,
    }
}

/// Number of colour components in the first SOF segment of a JPEG.
fn jpeg_components(bytes: &[u8]) -> Option<u8> {
    if !bytes.starts_with(&[0xFF, 0xD8]) {
        return None;
    }

    let mut pos = 2;
    while pos + 4 <= bytes.len() {
        if bytes[pos] != 0xFF {
            return None;
        }
        let marker = bytes[pos + 1];
        match marker {
            // fill byte before a marker
            0xFF => {
                pos += 1;
                continue;
            }
            0x01 | 0xD0..=0xD7 => {
                pos += 2;
                continue;
            }
            0xD9 | 0xDA => return None,
            _ => {}
        }

        let length = usize::from(u16::from_be_bytes([bytes[pos + 2], bytes[pos + 3]]));
        let is_frame = matches!(marker, 0xC0..=0xCF) && !matches!(marker, 0xC4 | 0xC8 | 0xCC);
        if is_frame {
            // length(2) precision(1) height(2) width(2) components(1)
            return bytes.get(pos + 2 + 7).copied();
        }
        if length < 2 {
            return None;
        }
        pos += 2 + length;
    }

    None
}

/// Drops the alpha channel by blending every pixel onto white paper.
fn flatten_on_white(img: &DynamicImage) -> RgbImage {
    if !img.color().has_alpha() {
        return img.to_rgb8();
    }

    let rgba = img.to_rgba8();
    let (width, height) = rgba.dimensions();
    let mut rgb = RgbImage::new(width, height);

    for (x, y, pixel) in rgba.enumerate_pixels() {
        let alpha = u16::from(pixel[3]);
        let blend = |c: u8| ((u16::from(c) * alpha + 255 * (255 - alpha)) / 255) as u8;
        rgb.put_pixel(
            x,
            y,
            image::Rgb([blend(pixel[0]), blend(pixel[1]), blend(pixel[2])]),
        );
    }

    rgb
}
