//! PNG export of rendered pain maps.

use crate::compositor::{draw_snapshot, new_pixmap};
use crate::error::RenderResult;
use kurbo::{Affine, Size};
use painmap_core::drawing::DrawingData;
use painmap_core::playback::PlaybackProjector;
use peniko::Color;
use std::io;
use tiny_skia::Pixmap;

/// Straight-alpha RGBA bytes of a pixmap.
fn demultiplied_rgba(pixmap: &Pixmap) -> Vec<u8> {
    let mut out = Vec::with_capacity(pixmap.data().len());
    for pixel in pixmap.pixels() {
        let color = pixel.demultiply();
        out.extend_from_slice(&[color.red(), color.green(), color.blue(), color.alpha()]);
    }
    out
}

/// Write a pixmap as an 8-bit RGBA PNG.
pub fn write_png<W: io::Write>(w: W, pixmap: &Pixmap) -> RenderResult<()> {
    let mut encoder = png::Encoder::new(w, pixmap.width(), pixmap.height());
    encoder.set_color(png::ColorType::Rgba);
    encoder.set_depth(png::BitDepth::Eight);
    let mut writer = encoder.write_header()?;
    writer.write_image_data(&demultiplied_rgba(pixmap))?;
    Ok(())
}

/// Encode a pixmap as PNG bytes.
pub fn encode_png(pixmap: &Pixmap) -> RenderResult<Vec<u8>> {
    let mut bytes = Vec::new();
    write_png(&mut bytes, pixmap)?;
    Ok(bytes)
}

/// Render drawing data at identity view and encode it as PNG.
pub fn render_snapshot_png(data: &DrawingData, size: Size, background: Option<Color>) -> RenderResult<Vec<u8>> {
    let mut pixmap = new_pixmap(size)?;
    if let Some(color) = background {
        let rgba = color.to_rgba8();
        pixmap.fill(tiny_skia::Color::from_rgba8(rgba.r, rgba.g, rgba.b, rgba.a));
    }
    draw_snapshot(&mut pixmap, data, Affine::IDENTITY);
    let bytes = encode_png(&pixmap)?;
    log::debug!(
        "Exported {}x{} PNG ({} bytes)",
        pixmap.width(),
        pixmap.height(),
        bytes.len()
    );
    Ok(bytes)
}

/// Render the drawing of a stored snapshot as PNG.
pub fn render_playback_png(projector: &PlaybackProjector<'_>, size: Size) -> RenderResult<Vec<u8>> {
    render_snapshot_png(projector.drawing(), size, None)
}

#[cfg(test)]
mod tests {
    use super::*;
    use kurbo::Point;
    use painmap_core::drawing::{BrushSettings, DrawingPath};
    use painmap_core::model::PainMapModel;
    use painmap_core::playback::ViewerDefaults;
    use std::io::Cursor;

    fn decode(bytes: &[u8]) -> (png::OutputInfo, Vec<u8>) {
        let decoder = png::Decoder::new(Cursor::new(bytes));
        let mut reader = decoder.read_info().unwrap();
        let mut buf = vec![0; reader.output_buffer_size()];
        let info = reader.next_frame(&mut buf).unwrap();
        buf.truncate(info.buffer_size());
        (info, buf)
    }

    fn sample_drawing() -> DrawingData {
        let style = BrushSettings::draw("burning").with_opacity(0.5).stroke_style();
        let mut data = DrawingData::new();
        data.paths.push(DrawingPath::from_points(
            &[Point::new(0.0, 5.0), Point::new(20.0, 5.0)],
            &style,
        ));
        data
    }

    #[test]
    fn test_png_has_surface_size() {
        let bytes = render_snapshot_png(&sample_drawing(), Size::new(20.0, 10.0), None).unwrap();
        let (info, _) = decode(&bytes);
        assert_eq!((info.width, info.height), (20, 10));
        assert_eq!(info.color_type, png::ColorType::Rgba);
    }

    #[test]
    fn test_png_stores_straight_alpha() {
        let bytes = render_snapshot_png(&sample_drawing(), Size::new(20.0, 10.0), None).unwrap();
        let (info, buf) = decode(&bytes);
        let offset = ((5 * info.width + 10) * 4) as usize;
        let pixel = &buf[offset..offset + 4];
        // Premultiplied storage would have halved the color channels.
        assert!(pixel[0] >= 0xee, "red {}", pixel[0]);
        assert!((126..=129).contains(&pixel[3]), "alpha {}", pixel[3]);
    }

    #[test]
    fn test_background_fills_untouched_pixels() {
        let white = Color::from_rgba8(255, 255, 255, 255);
        let bytes = render_snapshot_png(&DrawingData::new(), Size::new(4.0, 4.0), Some(white)).unwrap();
        let (_, buf) = decode(&bytes);
        assert!(buf.iter().all(|b| *b == 255));
    }

    #[test]
    fn test_playback_png_renders_snapshot_drawing() {
        let model = PainMapModel::default().with_drawing(sample_drawing());
        let defaults = ViewerDefaults::default();
        let projector = PlaybackProjector::new(&model, &defaults);
        let bytes = render_playback_png(&projector, Size::new(20.0, 10.0)).unwrap();
        let (_, buf) = decode(&bytes);
        assert!(buf.chunks(4).any(|pixel| pixel[3] > 0));
    }

    #[test]
    fn test_persisted_drawing_data_exports() {
        let json = r##"{
            "paths": [
                {"pathData": "M 2 2 L 18 8", "color": "#a855f7", "opacity": 1, "brushSize": 5},
                {"pathData": "M 2 2 L 18 8", "color": "#ffffff", "opacity": 1, "brushSize": 5, "tool": "erase"}
            ],
            "annotations": [{"type": "symbol", "x": 10, "y": 5, "symbolType": "cross", "color": "#000000"}]
        }"##;
        let data: DrawingData = serde_json::from_str(json).unwrap();
        let bytes = render_snapshot_png(&data, Size::new(20.0, 10.0), None).unwrap();
        let (info, buf) = decode(&bytes);
        let offset = ((5 * info.width + 10) * 4) as usize;
        // Stroke erased, cross drawn on top.
        assert_eq!(&buf[offset..offset + 4], &[0, 0, 0, 255]);
    }

    #[test]
    fn test_unallocatable_size_is_an_error() {
        assert!(render_snapshot_png(&DrawingData::new(), Size::new(0.0, 10.0), None).is_err());
    }
}
