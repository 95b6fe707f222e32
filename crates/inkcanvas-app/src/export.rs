//! PNG export of the flattened canvas.

use crate::error::{SessionError, SessionResult};
use crate::session::Session;
use inkcanvas_core::RasterBuffer;
use std::path::Path;

/// Encode straight-alpha RGBA pixels as PNG bytes.
pub fn encode_png(pixels: &RasterBuffer) -> SessionResult<Vec<u8>> {
    if pixels.is_empty() {
        return Err(SessionError::Export("canvas has no area".to_string()));
    }
    let mut png_data = Vec::new();
    {
        let mut encoder = png::Encoder::new(&mut png_data, pixels.width(), pixels.height());
        encoder.set_color(png::ColorType::Rgba);
        encoder.set_depth(png::BitDepth::Eight);

        let mut writer = encoder.write_header().map_err(|e| {
            log::error!("Failed to write PNG header: {:?}", e);
            SessionError::Export(e.to_string())
        })?;
        writer.write_image_data(pixels.data()).map_err(|e| {
            log::error!("Failed to write PNG data: {:?}", e);
            SessionError::Export(e.to_string())
        })?;
    }
    Ok(png_data)
}

/// Render the full scene and encode it. Selection highlight and shape
/// previews are not part of the image.
pub fn export_png(session: &Session) -> SessionResult<Vec<u8>> {
    let pixels = session.composite_for_export().to_raster();
    let data = encode_png(&pixels)?;
    log::info!(
        "Exported {}x{} PNG ({} bytes)",
        pixels.width(),
        pixels.height(),
        data.len()
    );
    Ok(data)
}

/// Export the session to a PNG file.
pub fn write_png(session: &Session, path: &Path) -> SessionResult<()> {
    let data = export_png(session)?;
    std::fs::write(path, data)
        .map_err(|e| SessionError::Export(format!("{}: {e}", path.display())))
}
