use flowsankey_core::{DiagramRenderer, FlowSankeyView};

/// Upscale factor of diagram snapshots.
pub const SNAPSHOT_SCALE: f32 = 2.0;
pub const SNAPSHOT_BACKGROUND: tiny_skia::Color = tiny_skia::Color::WHITE;
pub const PNG_FILENAME: &str = "sankey-diagram.png";

#[derive(Debug, thiserror::Error)]
pub enum RasterError {
    #[error(transparent)]
    View(#[from] flowsankey_core::Error),
    #[error("failed to parse SVG")]
    SvgParse,
    #[error("failed to allocate pixmap for raster rendering")]
    PixmapAlloc,
    #[error("failed to encode PNG")]
    PngEncode,
}

pub type Result<T> = std::result::Result<T, RasterError>;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RasterOptions {
    pub scale: f32,
    pub background: Option<tiny_skia::Color>,
}

impl Default for RasterOptions {
    fn default() -> Self {
        Self {
            scale: 1.0,
            background: None,
        }
    }
}

impl RasterOptions {
    /// Fixed settings for diagram snapshots: twice the on-screen size on white.
    pub fn snapshot() -> Self {
        Self {
            scale: SNAPSHOT_SCALE,
            background: Some(SNAPSHOT_BACKGROUND),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PngExport {
    pub filename: &'static str,
    pub bytes: Vec<u8>,
}

/// Rasterizes what the view's renderer currently shows.
pub fn export_png<R: DiagramRenderer>(view: &FlowSankeyView<R>) -> Result<PngExport> {
    let svg = view.svg_snapshot()?;
    Ok(PngExport {
        filename: PNG_FILENAME,
        bytes: svg_to_png(&svg, &RasterOptions::snapshot())?,
    })
}

pub fn svg_to_png(svg: &str, options: &RasterOptions) -> Result<Vec<u8>> {
    let pixmap = svg_to_pixmap(svg, options)?;
    pixmap.encode_png().map_err(|_| RasterError::PngEncode)
}

fn svg_to_pixmap(svg: &str, options: &RasterOptions) -> Result<tiny_skia::Pixmap> {
    let mut opt = usvg::Options::default();
    opt.fontdb_mut().load_system_fonts();
    opt.font_family = "Arial".to_string();

    let tree = usvg::Tree::from_str(svg, &opt).map_err(|_| RasterError::SvgParse)?;

    // The tree size already accounts for width/height attributes and the root viewBox.
    let size = tree.size();
    let width_px = (size.width() * options.scale).ceil().max(1.0) as u32;
    let height_px = (size.height() * options.scale).ceil().max(1.0) as u32;
    let mut pixmap =
        tiny_skia::Pixmap::new(width_px, height_px).ok_or(RasterError::PixmapAlloc)?;

    if let Some(color) = options.background {
        pixmap.fill(color);
    }

    resvg::render(
        &tree,
        tiny_skia::Transform::from_scale(options.scale, options.scale),
        &mut pixmap.as_mut(),
    );
    Ok(pixmap)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SVG: &str = r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 10 20"><rect x="2" y="2" width="2" height="2" fill="black"/></svg>"#;

    fn rgba(pixmap: &tiny_skia::Pixmap, x: u32, y: u32) -> (u8, u8, u8, u8) {
        let p = pixmap.pixel(x, y).unwrap();
        (p.red(), p.green(), p.blue(), p.alpha())
    }

    #[test]
    fn svg_to_png_produces_png_signature() {
        let bytes = svg_to_png(SVG, &RasterOptions::default()).unwrap();
        assert!(bytes.starts_with(b"\x89PNG\r\n\x1a\n"));
    }

    #[test]
    fn snapshot_is_upscaled_on_white() {
        let pixmap = svg_to_pixmap(SVG, &RasterOptions::snapshot()).unwrap();
        assert_eq!((pixmap.width(), pixmap.height()), (20, 40));
        assert_eq!(rgba(&pixmap, 0, 0), (255, 255, 255, 255));
        assert_eq!(rgba(&pixmap, 5, 5), (0, 0, 0, 255));
    }

    #[test]
    fn explicit_size_wins_over_view_box() {
        let svg = r#"<svg xmlns="http://www.w3.org/2000/svg" width="600" height="200" viewBox="0 0 300 100"><rect x="290" y="90" width="10" height="10" fill="red"/></svg>"#;
        let pixmap = svg_to_pixmap(svg, &RasterOptions::snapshot()).unwrap();
        assert_eq!((pixmap.width(), pixmap.height()), (1200, 400));
        assert_eq!(rgba(&pixmap, 1190, 390), (255, 0, 0, 255));
        assert_eq!(rgba(&pixmap, 1100, 300), (255, 255, 255, 255));
    }

    #[test]
    fn without_background_the_canvas_stays_transparent() {
        let pixmap = svg_to_pixmap(SVG, &RasterOptions::default()).unwrap();
        assert_eq!(rgba(&pixmap, 0, 0).3, 0);
    }

    #[test]
    fn malformed_svg_is_reported() {
        assert!(matches!(
            svg_to_png("<svg", &RasterOptions::default()),
            Err(RasterError::SvgParse)
        ));
    }
}
