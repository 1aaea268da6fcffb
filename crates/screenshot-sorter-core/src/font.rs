use ab_glyph::{point, Font, FontVec, PxScale, ScaleFont};
use image::{Rgb, RgbImage};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Font used to draw the status bar text.
pub enum StatusFont {
    TrueType { font: FontVec, scale: PxScale },
    /// 5x7 bitmap glyphs, scaled up to roughly the requested size.
    Builtin { scale: u32 },
}

impl std::fmt::Debug for StatusFont {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StatusFont::TrueType { scale, .. } => {
                write!(f, "TrueType({}px)", scale.y)
            }
            StatusFont::Builtin { scale } => write!(f, "Builtin(x{})", scale),
        }
    }
}

impl StatusFont {
    /// Load `name` at `size` px per em, falling back to the built-in font when the file
    /// cannot be found or parsed.
    pub fn load(name: &str, size: f32) -> Self {
        match load_truetype(name, size) {
            Some(font) => font,
            None => {
                warn!("Font '{}' unavailable, using built-in font", name);
                Self::builtin(size)
            }
        }
    }

    pub fn builtin(size: f32) -> Self {
        let scale = (size / GLYPH_HEIGHT as f32).round().max(1.0) as u32;
        StatusFont::Builtin { scale }
    }

    pub fn is_builtin(&self) -> bool {
        matches!(self, StatusFont::Builtin { .. })
    }

    /// Draw `text` with its top-left corner at (`x`, `y`). Pixels outside the image are
    /// clipped.
    pub fn draw_text(&self, image: &mut RgbImage, x: i32, y: i32, text: &str, color: Rgb<u8>) {
        match self {
            StatusFont::TrueType { font, scale } => {
                draw_truetype(image, font, *scale, x, y, text, color)
            }
            StatusFont::Builtin { scale } => draw_builtin(image, *scale, x, y, text, color),
        }
    }
}

fn load_truetype(name: &str, size: f32) -> Option<StatusFont> {
    let path = font_candidates(name).into_iter().find(|p| p.is_file())?;
    let bytes = match fs::read(&path) {
        Ok(bytes) => bytes,
        Err(err) => {
            warn!("Error reading font {}: {}", path.display(), err);
            return None;
        }
    };
    let font = match FontVec::try_from_vec(bytes) {
        Ok(font) => font,
        Err(err) => {
            warn!("Error parsing font {}: {}", path.display(), err);
            return None;
        }
    };

    // `size` is an em size; ab_glyph scales by ascent-to-descent height.
    let scale = match font.units_per_em() {
        Some(units_per_em) => PxScale::from(size * font.height_unscaled() / units_per_em),
        None => PxScale::from(size),
    };
    debug!("Loaded font {}", path.display());
    Some(StatusFont::TrueType { font, scale })
}

fn font_candidates(name: &str) -> Vec<PathBuf> {
    let mut candidates = vec![PathBuf::from(name)];
    if Path::new(name).is_absolute() {
        return candidates;
    }
    let mut dirs: Vec<PathBuf> = vec![
        PathBuf::from("/usr/share/fonts/truetype/msttcorefonts"),
        PathBuf::from("/usr/share/fonts/TTF"),
        PathBuf::from("/usr/share/fonts/truetype"),
        PathBuf::from("/usr/share/fonts"),
        PathBuf::from("/Library/Fonts"),
        PathBuf::from("/System/Library/Fonts/Supplemental"),
    ];
    if let Some(windir) = std::env::var_os("WINDIR") {
        dirs.push(PathBuf::from(windir).join("Fonts"));
    }
    candidates.extend(dirs.into_iter().map(|dir| dir.join(name)));
    candidates
}

fn put_pixel_clipped(image: &mut RgbImage, x: i32, y: i32, color: Rgb<u8>, coverage: f32) {
    if x < 0 || y < 0 || x as u32 >= image.width() || y as u32 >= image.height() {
        return;
    }
    let coverage = coverage.clamp(0.0, 1.0);
    let pixel = image.get_pixel_mut(x as u32, y as u32);
    for (channel, target) in pixel.0.iter_mut().zip(color.0) {
        let blended = *channel as f32 * (1.0 - coverage) + target as f32 * coverage;
        *channel = blended.round() as u8;
    }
}

fn draw_truetype(
    image: &mut RgbImage,
    font: &FontVec,
    scale: PxScale,
    x: i32,
    y: i32,
    text: &str,
    color: Rgb<u8>,
) {
    let scaled = font.as_scaled(scale);
    let mut caret = point(x as f32, y as f32 + scaled.ascent());

    for c in text.chars() {
        let mut glyph = scaled.scaled_glyph(c);
        glyph.position = caret;
        caret.x += scaled.h_advance(glyph.id);

        if let Some(outlined) = font.outline_glyph(glyph) {
            let bounds = outlined.px_bounds();
            outlined.draw(|gx, gy, coverage| {
                put_pixel_clipped(
                    image,
                    bounds.min.x as i32 + gx as i32,
                    bounds.min.y as i32 + gy as i32,
                    color,
                    coverage,
                );
            });
        }
    }
}

const GLYPH_WIDTH: u32 = 5;
const GLYPH_HEIGHT: u32 = 7;
const GLYPH_ADVANCE: u32 = GLYPH_WIDTH + 1;

fn draw_builtin(image: &mut RgbImage, scale: u32, x: i32, y: i32, text: &str, color: Rgb<u8>) {
    let mut cursor_x = x;
    for c in text.chars() {
        let columns = glyph_columns(c);
        for (col, bits) in columns.iter().enumerate() {
            for row in 0..GLYPH_HEIGHT {
                if bits & (1 << row) == 0 {
                    continue;
                }
                for dx in 0..scale {
                    for dy in 0..scale {
                        put_pixel_clipped(
                            image,
                            cursor_x + (col as u32 * scale + dx) as i32,
                            y + (row * scale + dy) as i32,
                            color,
                            1.0,
                        );
                    }
                }
            }
        }
        cursor_x += (GLYPH_ADVANCE * scale) as i32;
    }
}

/// Column bitmaps (bit 0 = top row) for printable ASCII; anything else renders as `?`.
fn glyph_columns(c: char) -> &'static [u8; 5] {
    let index = match c {
        ' '..='~' => c as usize - ' ' as usize,
        _ => '?' as usize - ' ' as usize,
    };
    &BUILTIN_GLYPHS[index]
}

#[rustfmt::skip]
static BUILTIN_GLYPHS: [[u8; 5]; 95] = [
    [0x00, 0x00, 0x00, 0x00, 0x00], // ' '
    [0x00, 0x00, 0x5F, 0x00, 0x00], // !
    [0x00, 0x07, 0x00, 0x07, 0x00], // "
    [0x14, 0x7F, 0x14, 0x7F, 0x14], // #
    [0x24, 0x2A, 0x7F, 0x2A, 0x12], // $
    [0x23, 0x13, 0x08, 0x64, 0x62], // %
    [0x36, 0x49, 0x55, 0x22, 0x50], // &
    [0x00, 0x05, 0x03, 0x00, 0x00], // '
    [0x00, 0x1C, 0x22, 0x41, 0x00], // (
    [0x00, 0x41, 0x22, 0x1C, 0x00], // )
    [0x08, 0x2A, 0x1C, 0x2A, 0x08], // *
    [0x08, 0x08, 0x3E, 0x08, 0x08], // +
    [0x00, 0x50, 0x30, 0x00, 0x00], // ,
    [0x08, 0x08, 0x08, 0x08, 0x08], // -
    [0x00, 0x60, 0x60, 0x00, 0x00], // .
    [0x20, 0x10, 0x08, 0x04, 0x02], // /
    [0x3E, 0x51, 0x49, 0x45, 0x3E], // 0
    [0x00, 0x42, 0x7F, 0x40, 0x00], // 1
    [0x42, 0x61, 0x51, 0x49, 0x46], // 2
    [0x21, 0x41, 0x45, 0x4B, 0x31], // 3
    [0x18, 0x14, 0x12, 0x7F, 0x10], // 4
    [0x27, 0x45, 0x45, 0x45, 0x39], // 5
    [0x3C, 0x4A, 0x49, 0x49, 0x30], // 6
    [0x01, 0x71, 0x09, 0x05, 0x03], // 7
    [0x36, 0x49, 0x49, 0x49, 0x36], // 8
    [0x06, 0x49, 0x49, 0x29, 0x1E], // 9
    [0x00, 0x36, 0x36, 0x00, 0x00], // :
    [0x00, 0x56, 0x36, 0x00, 0x00], // ;
    [0x00, 0x08, 0x14, 0x22, 0x41], // <
    [0x14, 0x14, 0x14, 0x14, 0x14], // =
    [0x41, 0x22, 0x14, 0x08, 0x00], // >
    [0x02, 0x01, 0x51, 0x09, 0x06], // ?
    [0x32, 0x49, 0x79, 0x41, 0x3E], // @
    [0x7E, 0x11, 0x11, 0x11, 0x7E], // A
    [0x7F, 0x49, 0x49, 0x49, 0x36], // B
    [0x3E, 0x41, 0x41, 0x41, 0x22], // C
    [0x7F, 0x41, 0x41, 0x22, 0x1C], // D
    [0x7F, 0x49, 0x49, 0x49, 0x41], // E
    [0x7F, 0x09, 0x09, 0x01, 0x01], // F
    [0x3E, 0x41, 0x41, 0x51, 0x32], // G
    [0x7F, 0x08, 0x08, 0x08, 0x7F], // H
    [0x00, 0x41, 0x7F, 0x41, 0x00], // I
    [0x20, 0x40, 0x41, 0x3F, 0x01], // J
    [0x7F, 0x08, 0x14, 0x22, 0x41], // K
    [0x7F, 0x40, 0x40, 0x40, 0x40], // L
    [0x7F, 0x02, 0x04, 0x02, 0x7F], // M
    [0x7F, 0x04, 0x08, 0x10, 0x7F], // N
    [0x3E, 0x41, 0x41, 0x41, 0x3E], // O
    [0x7F, 0x09, 0x09, 0x09, 0x06], // P
    [0x3E, 0x41, 0x51, 0x21, 0x5E], // Q
    [0x7F, 0x09, 0x19, 0x29, 0x46], // R
    [0x46, 0x49, 0x49, 0x49, 0x31], // S
    [0x01, 0x01, 0x7F, 0x01, 0x01], // T
    [0x3F, 0x40, 0x40, 0x40, 0x3F], // U
    [0x1F, 0x20, 0x40, 0x20, 0x1F], // V
    [0x7F, 0x20, 0x18, 0x20, 0x7F], // W
    [0x63, 0x14, 0x08, 0x14, 0x63], // X
    [0x03, 0x04, 0x78, 0x04, 0x03], // Y
    [0x61, 0x51, 0x49, 0x45, 0x43], // Z
    [0x00, 0x00, 0x7F, 0x41, 0x41], // [
    [0x02, 0x04, 0x08, 0x10, 0x20], // \
    [0x41, 0x41, 0x7F, 0x00, 0x00], // ]
    [0x04, 0x02, 0x01, 0x02, 0x04], // ^
    [0x40, 0x40, 0x40, 0x40, 0x40], // _
    [0x00, 0x01, 0x02, 0x04, 0x00], // `
    [0x20, 0x54, 0x54, 0x54, 0x78], // a
    [0x7F, 0x48, 0x44, 0x44, 0x38], // b
    [0x38, 0x44, 0x44, 0x44, 0x20], // c
    [0x38, 0x44, 0x44, 0x48, 0x7F], // d
    [0x38, 0x54, 0x54, 0x54, 0x18], // e
    [0x08, 0x7E, 0x09, 0x01, 0x02], // f
    [0x08, 0x14, 0x54, 0x54, 0x3C], // g
    [0x7F, 0x08, 0x04, 0x04, 0x78], // h
    [0x00, 0x44, 0x7D, 0x40, 0x00], // i
    [0x20, 0x40, 0x44, 0x3D, 0x00], // j
    [0x00, 0x7F, 0x10, 0x28, 0x44], // k
    [0x00, 0x41, 0x7F, 0x40, 0x00], // l
    [0x7C, 0x04, 0x18, 0x04, 0x78], // m
    [0x7C, 0x08, 0x04, 0x04, 0x78], // n
    [0x38, 0x44, 0x44, 0x44, 0x38], // o
    [0x7C, 0x14, 0x14, 0x14, 0x08], // p
    [0x08, 0x14, 0x14, 0x18, 0x7C], // q
    [0x7C, 0x08, 0x04, 0x04, 0x08], // r
    [0x48, 0x54, 0x54, 0x54, 0x20], // s
    [0x04, 0x3F, 0x44, 0x40, 0x20], // t
    [0x3C, 0x40, 0x40, 0x20, 0x7C], // u
    [0x1C, 0x20, 0x40, 0x20, 0x1C], // v
    [0x3C, 0x40, 0x30, 0x40, 0x3C], // w
    [0x44, 0x28, 0x10, 0x28, 0x44], // x
    [0x0C, 0x50, 0x50, 0x50, 0x3C], // y
    [0x44, 0x64, 0x54, 0x4C, 0x44], // z
    [0x00, 0x08, 0x36, 0x41, 0x00], // {
    [0x00, 0x00, 0x7F, 0x00, 0x00], // |
    [0x00, 0x41, 0x36, 0x08, 0x00], // }
    [0x08, 0x08, 0x2A, 0x1C, 0x08], // ~
];

#[cfg(test)]
mod tests {
    use super::*;

    const WHITE: Rgb<u8> = Rgb([255, 255, 255]);

    fn lit_pixels(image: &RgbImage) -> usize {
        image.pixels().filter(|p| p.0 != [0, 0, 0]).count()
    }

    #[test]
    fn test_missing_font_falls_back_to_builtin() {
        let font = StatusFont::load("definitely-not-a-font-file.ttf", 16.0);
        assert!(font.is_builtin());
    }

    #[test]
    fn test_unparseable_font_falls_back_to_builtin() {
        let tmp = tempfile::tempdir().unwrap();
        let bogus = tmp.path().join("bogus.ttf");
        fs::write(&bogus, b"not a font").unwrap();
        let font = StatusFont::load(bogus.to_str().unwrap(), 16.0);
        assert!(font.is_builtin());
    }

    #[test]
    fn test_builtin_scale_follows_size() {
        assert!(matches!(StatusFont::builtin(16.0), StatusFont::Builtin { scale: 2 }));
        assert!(matches!(StatusFont::builtin(2.0), StatusFont::Builtin { scale: 1 }));
    }

    #[test]
    fn test_builtin_draws_inside_bounds() {
        let mut image = RgbImage::new(200, 30);
        StatusFont::builtin(16.0).draw_text(&mut image, 10, 10, "09:30", WHITE);
        assert!(lit_pixels(&image) > 0);
        // 5 glyphs * 6 columns * scale 2 starting at x = 10
        for (x, y, pixel) in image.enumerate_pixels() {
            if pixel.0 != [0, 0, 0] {
                assert!((10..70).contains(&x), "x = {x}");
                assert!((10..24).contains(&y), "y = {y}");
            }
        }
    }

    #[test]
    fn test_text_outside_image_is_clipped() {
        let mut image = RgbImage::new(20, 20);
        StatusFont::builtin(16.0).draw_text(&mut image, -100, -100, "2023-05-14", WHITE);
        assert_eq!(lit_pixels(&image), 0);

        StatusFont::builtin(16.0).draw_text(&mut image, -5, 2, "WW", WHITE);
        assert!(lit_pixels(&image) > 0);
    }

    #[test]
    fn test_space_draws_nothing() {
        let mut image = RgbImage::new(50, 20);
        StatusFont::builtin(16.0).draw_text(&mut image, 0, 0, "   ", WHITE);
        assert_eq!(lit_pixels(&image), 0);
    }
}
