//! Snapshot encoding
//!
//! PNG for the raster, JSON for the palette.

use crate::error::{Error, Result};
use crate::palette::Palette;
use crate::raster::Raster;

/// Encode `raster` as an 8-bit indexed PNG using `palette` for PLTE/tRNS
pub fn encode_png(raster: &Raster, palette: &Palette) -> Result<Vec<u8>> {
    let plte: Vec<u8> = palette
        .colors()
        .iter()
        .flat_map(|c| [c.r, c.g, c.b])
        .collect();

    let mut out = Vec::new();
    {
        let mut encoder = png::Encoder::new(&mut out, raster.width(), raster.height());
        encoder.set_color(png::ColorType::Indexed);
        encoder.set_depth(png::BitDepth::Eight);
        encoder.set_palette(plte);
        if palette.has_transparency() {
            let trns: Vec<u8> = palette.colors().iter().map(|c| c.a).collect();
            encoder.set_trns(trns);
        }

        let mut writer = encoder.write_header()?;
        writer.write_image_data(raster.pixels())?;
        writer.finish()?;
    }
    Ok(out)
}

/// Serialize the palette as `[{"R":..,"G":..,"B":..,"A":..}, ...]`
pub fn palette_json(palette: &Palette) -> Result<Vec<u8>> {
    serde_json::to_vec(palette.colors()).map_err(|e| Error::PaletteEncoding(e.to_string()))
}
