//! The two emblem bitmaps: the halo drawn behind the right word and the
//! cross drawn on top of everything.

use crate::error::{LogoError, LogoResult};
use balogo_canvas2d::CanvasImage;
use std::path::Path;

#[derive(Debug, Clone, Default)]
pub struct LogoAssets {
    halo: Option<CanvasImage>,
    cross: Option<CanvasImage>,
}

impl LogoAssets {
    /// Decode both assets from image files (PNG).
    pub fn load(halo: &Path, cross: &Path) -> LogoResult<Self> {
        Ok(Self {
            halo: Some(load_image("halo", halo)?),
            cross: Some(load_image("cross", cross)?),
        })
    }

    pub fn new(halo: CanvasImage, cross: CanvasImage) -> Self {
        Self {
            halo: Some(halo),
            cross: Some(cross),
        }
    }

    pub fn with_halo(mut self, halo: CanvasImage) -> Self {
        self.halo = Some(halo);
        self
    }

    pub fn with_cross(mut self, cross: CanvasImage) -> Self {
        self.cross = Some(cross);
        self
    }

    /// Both images, or `AssetMissing` naming the first one not provided.
    pub fn require(&self) -> LogoResult<(&CanvasImage, &CanvasImage)> {
        let halo = self
            .halo
            .as_ref()
            .ok_or_else(|| LogoError::AssetMissing("halo".to_string()))?;
        let cross = self
            .cross
            .as_ref()
            .ok_or_else(|| LogoError::AssetMissing("cross".to_string()))?;
        Ok((halo, cross))
    }
}

fn load_image(name: &str, path: &Path) -> LogoResult<CanvasImage> {
    if !path.is_file() {
        return Err(LogoError::AssetMissing(format!(
            "{} ({})",
            name,
            path.display()
        )));
    }
    let decoded = image::open(path).map_err(|err| LogoError::AssetDecode {
        name: name.to_string(),
        reason: err.to_string(),
    })?;
    let rgba = decoded.to_rgba8();
    let image = CanvasImage::from_rgba(rgba.as_raw(), rgba.width(), rgba.height())?;
    log::debug!(
        "Loaded {} asset {}x{} from {}",
        name,
        image.width(),
        image.height(),
        path.display()
    );
    Ok(image)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_png(path: &Path, color: [u8; 4]) {
        image::RgbaImage::from_pixel(4, 4, image::Rgba(color))
            .save(path)
            .unwrap();
    }

    #[test]
    fn loads_png_assets() {
        let dir = tempfile::tempdir().unwrap();
        let halo = dir.path().join("halo.png");
        let cross = dir.path().join("cross.png");
        write_png(&halo, [18, 138, 250, 255]);
        write_png(&cross, [255, 255, 255, 0]);

        let assets = LogoAssets::load(&halo, &cross).unwrap();
        let (h, c) = assets.require().unwrap();
        assert_eq!((h.width(), h.height()), (4, 4));
        assert_eq!(c.width(), 4);
    }

    #[test]
    fn missing_file_names_the_asset() {
        let dir = tempfile::tempdir().unwrap();
        let halo = dir.path().join("halo.png");
        write_png(&halo, [0, 0, 0, 255]);
        let err = LogoAssets::load(&halo, &dir.path().join("cross.png")).unwrap_err();
        match err {
            LogoError::AssetMissing(msg) => assert!(msg.starts_with("cross")),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn undecodable_file_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let halo = dir.path().join("halo.png");
        std::fs::write(&halo, b"not a png").unwrap();
        assert!(matches!(
            LogoAssets::load(&halo, &halo),
            Err(LogoError::AssetDecode { .. })
        ));
    }

    #[test]
    fn require_reports_first_missing() {
        let pixel = CanvasImage::from_rgba(&[0, 0, 0, 255], 1, 1).unwrap();
        assert!(matches!(
            LogoAssets::default().require(),
            Err(LogoError::AssetMissing(name)) if name == "halo"
        ));
        assert!(matches!(
            LogoAssets::default().with_halo(pixel.clone()).require(),
            Err(LogoError::AssetMissing(name)) if name == "cross"
        ));
        assert!(LogoAssets::new(pixel.clone(), pixel).require().is_ok());
    }
}
