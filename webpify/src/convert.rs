use crate::color::{ColorMode, flatten_onto_white};

use anyhow::Context;
use image::DynamicImage;
use std::fs;
use std::path::{Path, PathBuf};

pub const WEBP_QUALITY: f32 = 85.0;

/// libwebp effort level, 0 (fast) to 6 (slowest, smallest output).
const WEBP_METHOD: i32 = 6;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Conversion {
    pub source_path: PathBuf,
    pub output_path: PathBuf,
    pub original_size: u64,
    pub new_size: u64,
}

impl Conversion {
    pub fn bytes_saved(&self) -> i64 {
        self.original_size as i64 - self.new_size as i64
    }

    pub fn percent_saved(&self) -> f64 {
        self.bytes_saved() as f64 / self.original_size as f64 * 100.0
    }
}

/// Sibling path with the final extension swapped for `.webp`. A name without an extension gets `.webp` appended.
pub fn webp_path_for(source_path: &Path) -> PathBuf {
    source_path.with_extension("webp")
}

pub fn is_webp_path(path: &Path) -> bool {
    path.extension().is_some_and(|extension| extension == "webp")
}

/// Decodes the file, flattens transparency onto white and writes the WebP sibling, overwriting any existing one.
pub fn convert_image(source_path: &Path) -> anyhow::Result<Conversion> {
    let encoded = fs::read(source_path).context("Failed to read image file")?;
    let original_size = encoded.len() as u64;

    let format = image::guess_format(&encoded).context("Failed to recognize image format")?;
    let image = image::load_from_memory_with_format(&encoded, format).context("Failed to decode image")?;

    let color_mode = ColorMode::detect(format, &encoded, &image);
    log::debug!(
        "Decoded {} as {:?} ({}x{}, {} color mode)",
        source_path.display(),
        format,
        image.width(),
        image.height(),
        color_mode
    );

    if color_mode.is_transparency_capable() {
        log::debug!("Flattening {} onto a white background", source_path.display());
    }
    let image = flatten_onto_white(image, color_mode);

    let output_path = webp_path_for(source_path);
    let webp_bytes = encode_webp(image)?;
    fs::write(&output_path, &webp_bytes).with_context(|| format!("Failed to write {}", output_path.display()))?;

    let new_size = fs::metadata(&output_path)
        .with_context(|| format!("Failed to read size of {}", output_path.display()))?
        .len();

    log::debug!("Wrote {}", output_path.display());

    Ok(Conversion {
        source_path: source_path.to_path_buf(),
        output_path,
        original_size,
        new_size,
    })
}

pub fn encode_webp(image: DynamicImage) -> anyhow::Result<Vec<u8>> {
    let rgb = image.into_rgb8();
    let (width, height) = rgb.dimensions();

    let mut config = webp::WebPConfig::new().map_err(|_| anyhow::anyhow!("Failed to initialize the WebP encoder configuration"))?;
    config.quality = WEBP_QUALITY;
    config.method = WEBP_METHOD;

    let webp_memory = webp::Encoder::from_rgb(rgb.as_raw(), width, height)
        .encode_advanced(&config)
        .map_err(|error| anyhow::anyhow!("WebP encoding failed: {:?}", error))?;

    Ok(webp_memory.to_vec())
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageFormat, Rgb, RgbImage, Rgba, RgbaImage};
    use std::ops::Not;

    fn gradient(width: u32, height: u32) -> RgbImage {
        RgbImage::from_fn(width, height, |x, y| Rgb([(x * 255 / width) as u8, (y * 255 / height) as u8, 128]))
    }

    #[test]
    fn webp_path_replaces_only_the_final_extension() {
        assert_eq!(webp_path_for(Path::new("assets/images/a.png")), PathBuf::from("assets/images/a.webp"));
        assert_eq!(webp_path_for(Path::new("assets/images/b.jpg")), PathBuf::from("assets/images/b.webp"));
        assert_eq!(webp_path_for(Path::new("photo.final.jpeg")), PathBuf::from("photo.final.webp"));
        assert_eq!(webp_path_for(Path::new("v1.2/README")), PathBuf::from("v1.2/README.webp"));
    }

    #[test]
    fn webp_paths_are_recognized_case_sensitively() {
        assert!(is_webp_path(Path::new("a/b.webp")));
        assert!(is_webp_path(Path::new("a/b.png")).not());
        assert!(is_webp_path(Path::new("a/b.WEBP")).not());
        assert!(is_webp_path(Path::new("webp")).not());
    }

    #[test]
    fn savings_can_be_negative() {
        let conversion = Conversion {
            source_path: PathBuf::from("a.jpg"),
            output_path: PathBuf::from("a.webp"),
            original_size: 200,
            new_size: 250,
        };

        assert_eq!(conversion.bytes_saved(), -50);
        assert!((conversion.percent_saved() + 25.0).abs() < f64::EPSILON);
    }

    #[test]
    fn encode_webp_produces_a_riff_webp_container() {
        let webp_bytes = encode_webp(DynamicImage::ImageRgb8(gradient(32, 16))).unwrap();

        assert_eq!(&webp_bytes[0..4], b"RIFF");
        assert_eq!(&webp_bytes[8..12], b"WEBP");
    }

    #[test]
    fn convert_image_writes_sibling_and_keeps_the_original() {
        let directory = tempfile::tempdir().unwrap();
        let source_path = directory.path().join("photo.png");
        gradient(64, 48).save_with_format(&source_path, ImageFormat::Png).unwrap();
        let original_bytes = fs::read(&source_path).unwrap();

        let conversion = convert_image(&source_path).unwrap();

        assert_eq!(conversion.output_path, directory.path().join("photo.webp"));
        assert_eq!(conversion.original_size, original_bytes.len() as u64);
        assert_eq!(conversion.new_size, fs::metadata(&conversion.output_path).unwrap().len());
        assert_eq!(fs::read(&source_path).unwrap(), original_bytes);

        let webp_bytes = fs::read(&conversion.output_path).unwrap();
        let decoded = webp::Decoder::new(&webp_bytes).decode().unwrap();
        assert_eq!((decoded.width(), decoded.height()), (64, 48));
    }

    #[test]
    fn convert_image_flattens_transparency_to_white() {
        let directory = tempfile::tempdir().unwrap();
        let source_path = directory.path().join("logo.png");
        RgbaImage::from_pixel(16, 16, Rgba([0, 0, 0, 0])).save_with_format(&source_path, ImageFormat::Png).unwrap();

        let conversion = convert_image(&source_path).unwrap();

        let webp_bytes = fs::read(&conversion.output_path).unwrap();
        let decoded = webp::Decoder::new(&webp_bytes).decode().unwrap();
        assert!(decoded.is_alpha().not());
        assert!(decoded.iter().all(|&channel| channel >= 250));
    }

    #[test]
    fn convert_image_reports_corrupt_files() {
        let directory = tempfile::tempdir().unwrap();
        let source_path = directory.path().join("broken.png");
        fs::write(&source_path, b"definitely not a png").unwrap();

        let error = convert_image(&source_path).unwrap_err();

        assert!(format!("{:#}", error).starts_with("Failed to recognize image format"));
        assert!(directory.path().join("broken.webp").exists().not());
    }

    #[test]
    fn convert_image_reports_missing_files() {
        let directory = tempfile::tempdir().unwrap();

        let error = convert_image(&directory.path().join("gone.jpg")).unwrap_err();

        assert!(format!("{:#}", error).starts_with("Failed to read image file"));
    }
}
