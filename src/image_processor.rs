//! # Image Processing Module
//!
//! Questo modulo gestisce la conversione di ogni immagine supportata nel formato
//! di destinazione utilizzando esclusivamente la libreria `image`.
//!
//! ## Pipeline di Conversione
//!
//! 1. **Decode**: Apre il file sorgente, rileva il formato dal contenuto (con fallback
//!    sull'estensione) e decodifica in memoria
//! 2. **Encode**: Scrive il formato di destinazione in un file temporaneo nella stessa
//!    directory del target, con la qualità configurata
//! 3. **Persist**: Rinomina atomicamente il file temporaneo sul path di destinazione,
//!    sovrascrivendo un eventuale file esistente
//!
//! Un encode fallito non lascia mai un target troncato: il file temporaneo viene
//! rimosso automaticamente quando esce dallo scope.
//!
//! ## Formati di Destinazione
//!
//! | Formato | Estensione | Encoder | Qualità |
//! |---------|------------|---------|---------|
//! | WebP    | `.webp`    | libwebp (`webp-encoder`) | lossy, `quality` |
//! | JPEG    | `.jpg`     | `JpegEncoder` | `quality` (min 1) |
//! | PNG     | `.png`     | `PngEncoder` best compression | ignorata (lossless) |
//!
//! ## Color Mode
//!
//! Nessuna conversione di color mode per JPEG e PNG: se l'encoder non accetta il
//! layout dei pixel, l'errore dell'encoder viene propagato come `Encode`.
//! L'encoder WebP accetta solo pixel a 8 bit, quindi immagini a 16 bit o float
//! vengono portate a RGB8/RGBA8 mantenendo il canale alpha.
//!
//! ## Concorrenza
//!
//! Decode ed encode sono CPU-bound: `convert()` li esegue su `spawn_blocking`
//! e attende il risultato prima di ritornare, quindi i file restano processati
//! uno alla volta.

use crate::config::Config;
use crate::error::OptimizeError;
use image::codecs::jpeg::JpegEncoder;
use image::codecs::png::{CompressionType, FilterType, PngEncoder};
use image::codecs::webp::{WebPEncoder, WebPQuality};
use image::io::Reader as ImageReader;
use image::{DynamicImage, ImageEncoder, ImageError, ImageResult};
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::fs;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Output encoding every eligible image is converted to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum TargetFormat {
    #[value(name = "webp")]
    WebP,
    #[value(name = "jpeg", alias = "jpg")]
    Jpeg,
    #[value(name = "png")]
    Png,
}

impl TargetFormat {
    /// File extension written for this format (without the dot)
    pub fn extension(&self) -> &'static str {
        match self {
            Self::WebP => "webp",
            Self::Jpeg => "jpg",
            Self::Png => "png",
        }
    }

    /// Format identifier used in banners and reports
    pub fn name(&self) -> &'static str {
        match self {
            Self::WebP => "webp",
            Self::Jpeg => "jpeg",
            Self::Png => "png",
        }
    }
}

/// Converts single images to the configured target format.
///
/// The processor never deletes anything: removing the original after a
/// successful conversion is the caller's decision.
#[derive(Debug, Clone)]
pub struct ImageProcessor {
    /// Configuration settings (target format, quality)
    config: Config,
}

impl ImageProcessor {
    /// Creates a new ImageProcessor instance with the provided configuration.
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    /// Decodes `source` and writes it to `target` in the configured format.
    ///
    /// An existing file at `target` is replaced. `source` and `target` may be
    /// the same path: the image is fully decoded before anything is written.
    ///
    /// # Errors
    /// - [`OptimizeError::Decode`] when `source` cannot be opened or parsed
    /// - [`OptimizeError::Encode`] when the encoder rejects the image or the
    ///   target cannot be written
    pub async fn convert(&self, source: &Path, target: &Path) -> Result<(), OptimizeError> {
        let processor = self.clone();
        let source = source.to_path_buf();
        let target = target.to_path_buf();

        let handle = tokio::task::spawn_blocking(move || processor.convert_blocking(&source, &target));

        match handle.await {
            Ok(result) => result,
            Err(join_error) => std::panic::resume_unwind(join_error.into_panic()),
        }
    }

    /// Synchronous body of [`convert`](Self::convert).
    pub fn convert_blocking(&self, source: &Path, target: &Path) -> Result<(), OptimizeError> {
        let image = Self::decode(source).map_err(|source_err| OptimizeError::Decode {
            path: source.to_path_buf(),
            source: source_err,
        })?;

        debug!(
            "Decoded {} ({}x{}, {:?})",
            source.display(),
            image.width(),
            image.height(),
            image.color()
        );

        self.write_target(&image, source, target)
            .map_err(|source_err| OptimizeError::Encode {
                path: target.to_path_buf(),
                source: source_err,
            })
    }

    /// Decode with content sniffing, falling back on the extension
    fn decode(path: &Path) -> ImageResult<DynamicImage> {
        ImageReader::open(path)?.with_guessed_format()?.decode()
    }

    /// Encode into a temp file next to the target, then persist it over the target
    fn write_target(&self, image: &DynamicImage, source: &Path, target: &Path) -> ImageResult<()> {
        let dir = target
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."));

        let mut temp = tempfile::Builder::new()
            .prefix(".convert-")
            .suffix(".tmp")
            .tempfile_in(&dir)?;

        {
            let mut writer = BufWriter::new(temp.as_file_mut());
            self.encode(image, &mut writer)?;
            writer.flush()?;
        }

        // Il file temporaneo nasce 0600: il target eredita i permessi dell'originale
        match fs::metadata(source) {
            Ok(metadata) => {
                if let Err(e) = temp.as_file().set_permissions(metadata.permissions()) {
                    warn!("Could not copy permissions of {}: {}", source.display(), e);
                }
            }
            Err(e) => warn!("Could not read permissions of {}: {}", source.display(), e),
        }

        temp.persist(target).map_err(|e| ImageError::IoError(e.error))?;
        Ok(())
    }

    /// Encode `image` to `writer` in the target format
    fn encode<W: Write>(&self, image: &DynamicImage, writer: W) -> ImageResult<()> {
        let quality = self.config.quality;

        match self.config.target_format {
            TargetFormat::WebP => {
                let image = Self::webp_compatible(image);
                WebPEncoder::new_with_quality(writer, WebPQuality::lossy(quality)).write_image(
                    image.as_bytes(),
                    image.width(),
                    image.height(),
                    image.color(),
                )
            }
            TargetFormat::Jpeg => JpegEncoder::new_with_quality(writer, quality.max(1)).write_image(
                image.as_bytes(),
                image.width(),
                image.height(),
                image.color(),
            ),
            TargetFormat::Png => {
                PngEncoder::new_with_quality(writer, CompressionType::Best, FilterType::Adaptive)
                    .write_image(image.as_bytes(), image.width(), image.height(), image.color())
            }
        }
    }

    /// libwebp only takes 8-bit RGB or RGBA buffers
    fn webp_compatible(image: &DynamicImage) -> Cow<'_, DynamicImage> {
        match image {
            DynamicImage::ImageRgb8(_) | DynamicImage::ImageRgba8(_) => Cow::Borrowed(image),
            other if other.color().has_alpha() => {
                Cow::Owned(DynamicImage::ImageRgba8(other.to_rgba8()))
            }
            other => Cow::Owned(DynamicImage::ImageRgb8(other.to_rgb8())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageBuffer, Luma, Rgb, RgbImage};
    use tempfile::TempDir;

    fn gradient(width: u32, height: u32) -> RgbImage {
        ImageBuffer::from_fn(width, height, |x, y| Rgb([(x * 3) as u8, (y * 5) as u8, 128]))
    }

    fn processor(target_format: TargetFormat) -> ImageProcessor {
        ImageProcessor::new(Config {
            target_format,
            ..Default::default()
        })
    }

    #[test]
    fn test_target_format_extension() {
        assert_eq!(TargetFormat::WebP.extension(), "webp");
        assert_eq!(TargetFormat::Jpeg.extension(), "jpg");
        assert_eq!(TargetFormat::Png.extension(), "png");
        assert_eq!(TargetFormat::WebP.name().to_uppercase(), "WEBP");
    }

    #[tokio::test]
    async fn test_convert_jpeg_to_webp() {
        let temp_dir = TempDir::new().unwrap();
        let source = temp_dir.path().join("photo.jpg");
        let target = temp_dir.path().join("photo.webp");
        gradient(64, 48).save(&source).unwrap();

        processor(TargetFormat::WebP).convert(&source, &target).await.unwrap();

        assert!(source.exists(), "the processor must not delete the source");
        assert!(target.exists());
        assert_eq!(image::image_dimensions(&target).unwrap(), (64, 48));
        assert_eq!(
            ImageReader::open(&target).unwrap().with_guessed_format().unwrap().format(),
            Some(image::ImageFormat::WebP)
        );
    }

    #[tokio::test]
    async fn test_convert_overwrites_existing_target() {
        let temp_dir = TempDir::new().unwrap();
        let source = temp_dir.path().join("photo.png");
        let target = temp_dir.path().join("photo.webp");
        gradient(32, 32).save(&source).unwrap();
        fs::write(&target, b"stale content").unwrap();

        processor(TargetFormat::WebP).convert(&source, &target).await.unwrap();

        assert_ne!(fs::read(&target).unwrap(), b"stale content");
        assert_eq!(image::image_dimensions(&target).unwrap(), (32, 32));
    }

    #[tokio::test]
    async fn test_convert_sixteen_bit_to_webp() {
        let temp_dir = TempDir::new().unwrap();
        let source = temp_dir.path().join("deep.png");
        let target = temp_dir.path().join("deep.webp");
        let deep: ImageBuffer<Luma<u16>, Vec<u16>> =
            ImageBuffer::from_fn(20, 10, |x, _| Luma([(x * 3000) as u16]));
        deep.save(&source).unwrap();

        processor(TargetFormat::WebP).convert(&source, &target).await.unwrap();

        assert_eq!(image::image_dimensions(&target).unwrap(), (20, 10));
    }

    #[tokio::test]
    async fn test_convert_bmp_to_png() {
        let temp_dir = TempDir::new().unwrap();
        let source = temp_dir.path().join("icon.bmp");
        let target = temp_dir.path().join("icon.png");
        gradient(16, 16).save(&source).unwrap();

        processor(TargetFormat::Png).convert(&source, &target).await.unwrap();

        let decoded = image::open(&target).unwrap();
        assert_eq!((decoded.width(), decoded.height()), (16, 16));
    }

    #[tokio::test]
    async fn test_convert_corrupt_source_is_decode_error() {
        let temp_dir = TempDir::new().unwrap();
        let source = temp_dir.path().join("broken.jpg");
        let target = temp_dir.path().join("broken.webp");
        fs::write(&source, b"definitely not a jpeg").unwrap();

        let err = processor(TargetFormat::WebP)
            .convert(&source, &target)
            .await
            .unwrap_err();

        assert!(matches!(err, OptimizeError::Decode { .. }), "got {:?}", err);
        assert!(!target.exists());
        assert_eq!(fs::read(&source).unwrap(), b"definitely not a jpeg");
    }

    #[tokio::test]
    async fn test_convert_missing_source_is_decode_error() {
        let temp_dir = TempDir::new().unwrap();
        let err = processor(TargetFormat::WebP)
            .convert(&temp_dir.path().join("gone.png"), &temp_dir.path().join("gone.webp"))
            .await
            .unwrap_err();

        assert_eq!(err.kind(), "decode");
    }

    #[tokio::test]
    async fn test_failed_encode_leaves_no_temp_files() {
        let temp_dir = TempDir::new().unwrap();
        let source = temp_dir.path().join("photo.png");
        gradient(8, 8).save(&source).unwrap();
        // Il target è una directory: il persist deve fallire
        let target = temp_dir.path().join("photo.webp");
        fs::create_dir(&target).unwrap();

        let err = processor(TargetFormat::WebP)
            .convert(&source, &target)
            .await
            .unwrap_err();

        assert_eq!(err.kind(), "encode");
        let leftovers: Vec<_> = fs::read_dir(temp_dir.path())
            .unwrap()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_name().to_string_lossy().ends_with(".tmp"))
            .collect();
        assert!(leftovers.is_empty());
    }
}
