use std::fs::File;
use std::io::BufWriter;
use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, anyhow};
use png::{BitDepth, ColorType, Encoder};
use tracing::{debug, warn};

/// Rasterize an SVG document with the fonts installed on this machine.
pub fn render_svg(svg: &str, width: u32, height: u32) -> anyhow::Result<tiny_skia::Pixmap> {
    let mut opt = usvg::Options::default();
    let mut fontdb = usvg::fontdb::Database::new();
    fontdb.load_system_fonts();
    if fontdb.is_empty() {
        warn!("no system fonts found; labels will be missing from the PNG");
    }
    // Map generic 'sans-serif' to the first available family
    let family_name = fontdb
        .faces()
        .next()
        .and_then(|face| face.families.first().map(|(n, _)| n.clone()));
    if let Some(name) = family_name {
        debug!(family = %name, "sans-serif font");
        fontdb.set_sans_serif_family(name);
    }
    opt.fontdb = Arc::new(fontdb);

    let tree = usvg::Tree::from_str(svg, &opt).map_err(|e| anyhow!("SVG parse error: {e:?}"))?;
    let mut pixmap = tiny_skia::Pixmap::new(width.max(1), height.max(1))
        .ok_or_else(|| anyhow!("pixmap alloc failed for {width}x{height}"))?;
    let mut pm = pixmap.as_mut();
    resvg::render(&tree, tiny_skia::Transform::identity(), &mut pm);
    Ok(pixmap)
}

pub fn write_png(pixmap: &tiny_skia::Pixmap, path: &Path) -> anyhow::Result<()> {
    let file = File::create(path).with_context(|| format!("creating {}", path.display()))?;
    let mut enc = Encoder::new(BufWriter::new(file), pixmap.width(), pixmap.height());
    enc.set_color(ColorType::Rgba);
    enc.set_depth(BitDepth::Eight);
    let mut writer = enc.write_header()?;
    writer.write_image_data(pixmap.data())?;
    writer.finish()?;
    Ok(())
}
