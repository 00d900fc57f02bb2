use std::io::Cursor;
use std::path::{Path, PathBuf};

use image::codecs::jpeg::JpegDecoder;
use image::{DynamicImage, ExtendedColorType, ImageDecoder};

use crate::error::Error;
use crate::model::{AssetKind, EmbeddedImage, ImageFormat};

pub const LOGO_FILE: &str = "tru_herb_logo.png";
pub const FOOTER_FILE: &str = "footer.png";

/// Where the two static images of the certificate live.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AssetPaths {
    pub logo: PathBuf,
    pub footer: PathBuf,
}

impl AssetPaths {
    pub fn in_dir(dir: impl AsRef<Path>) -> Self {
        let dir = dir.as_ref();
        Self {
            logo: dir.join(LOGO_FILE),
            footer: dir.join(FOOTER_FILE),
        }
    }

    /// `COA_ASSETS` when set, otherwise `./images`.
    pub fn from_env() -> Self {
        match std::env::var("COA_ASSETS") {
            Ok(val) if !val.trim().is_empty() => Self::in_dir(val.trim()),
            _ => Self::in_dir("images"),
        }
    }

    pub fn path(&self, kind: AssetKind) -> &Path {
        match kind {
            AssetKind::Logo => &self.logo,
            AssetKind::Footer => &self.footer,
        }
    }

    /// Fails on the first asset that is not on disk, logo first.
    pub fn ensure_present(&self) -> Result<(), Error> {
        for kind in [AssetKind::Logo, AssetKind::Footer] {
            let path = self.path(kind);
            if !path.is_file() {
                return Err(Error::MissingAsset {
                    asset: kind,
                    path: path.to_path_buf(),
                });
            }
        }
        Ok(())
    }
}

pub(crate) fn load_image(
    paths: &AssetPaths,
    kind: AssetKind,
    display_width: f32,
    display_height: f32,
) -> Result<EmbeddedImage, Error> {
    let path = paths.path(kind);
    let data = std::fs::read(path).map_err(|e| match e.kind() {
        std::io::ErrorKind::NotFound => Error::MissingAsset {
            asset: kind,
            path: path.to_path_buf(),
        },
        _ => Error::Io(std::io::Error::new(
            e.kind(),
            format!("{}: {}", e, path.display()),
        )),
    })?;
    let invalid = |msg: String| Error::InvalidAsset(format!("{kind} {}: {msg}", path.display()));

    // Decode fully here so a broken file never reaches the renderer.
    let (format, decoded) = match image::guess_format(&data) {
        Ok(image::ImageFormat::Png) => {
            let decoded = image::load_from_memory_with_format(&data, image::ImageFormat::Png)
                .map_err(|e| invalid(e.to_string()))?;
            (ImageFormat::Png, decoded)
        }
        Ok(image::ImageFormat::Jpeg) => {
            let decoder =
                JpegDecoder::new(Cursor::new(&data)).map_err(|e| invalid(e.to_string()))?;
            // The DCT stream is embedded as is; only gray and RGB map onto a
            // device colour space without conversion.
            if matches!(decoder.original_color_type(), ExtendedColorType::Cmyk8) {
                return Err(invalid("CMYK JPEG is not supported".to_string()));
            }
            let decoded = DynamicImage::from_decoder(decoder).map_err(|e| invalid(e.to_string()))?;
            (ImageFormat::Jpeg, decoded)
        }
        Ok(other) => return Err(invalid(format!("{other:?} is neither PNG nor JPEG"))),
        Err(_) => return Err(invalid("not an image".to_string())),
    };

    let color = decoded.color();
    let color_components = color.channel_count() - u8::from(color.has_alpha());
    let (pixel_width, pixel_height) = (decoded.width(), decoded.height());
    log::debug!(
        "loaded {kind} {}: {pixel_width}x{pixel_height} {format:?} ({color:?}), {} bytes",
        path.display(),
        data.len()
    );
    Ok(EmbeddedImage {
        kind,
        data,
        format,
        pixel_width,
        pixel_height,
        color_components,
        display_width,
        display_height,
    })
}
