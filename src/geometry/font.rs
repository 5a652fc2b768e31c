//! Block-font text meshing
//!
//! Converts a string into one solid mesh: each lit cell of a 5x7 glyph is
//! extruded into a box, with horizontal runs merged. Glyphs lie in the local
//! XY plane and are extruded symmetrically along Z, so the text reads from +Z.

use glam::Vec3;

use crate::math::Aabb;

use super::mesh::MeshData;

const GLYPH_COLS: u32 = 5;
const GLYPH_ROWS: u32 = 7;
/// Horizontal advance per character, in cells.
const ADVANCE: u32 = GLYPH_COLS + 1;
/// Cell edge as a fraction of the font size (cap height = 0.7 x size).
const CELL_PER_SIZE: f32 = 0.1;

/// Vertical anchor of the text block relative to the local origin.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum VerticalAlign {
    #[default]
    Center,
    Bottom,
}

/// Text to be meshed. Always horizontally centered on the local origin.
#[derive(Clone, Debug, PartialEq)]
pub struct TextSpec {
    pub body: String,
    pub size: f32,
    /// Half-depth of the extrusion along local Z.
    pub extrusion: f32,
    pub align_y: VerticalAlign,
}

impl TextSpec {
    pub fn new(body: impl Into<String>, size: f32, extrusion: f32, align_y: VerticalAlign) -> Self {
        Self {
            body: body.into(),
            size,
            extrusion,
            align_y,
        }
    }
}

/// Row bitmaps, top row first, bit 4 = leftmost column.
fn glyph(c: char) -> [u8; 7] {
    match c.to_ascii_uppercase() {
        'A' => [0x0E, 0x11, 0x11, 0x1F, 0x11, 0x11, 0x11],
        'B' => [0x1E, 0x11, 0x11, 0x1E, 0x11, 0x11, 0x1E],
        'C' => [0x0E, 0x11, 0x10, 0x10, 0x10, 0x11, 0x0E],
        'D' => [0x1E, 0x11, 0x11, 0x11, 0x11, 0x11, 0x1E],
        'E' => [0x1F, 0x10, 0x10, 0x1E, 0x10, 0x10, 0x1F],
        'F' => [0x1F, 0x10, 0x10, 0x1E, 0x10, 0x10, 0x10],
        'G' => [0x0E, 0x11, 0x10, 0x17, 0x11, 0x11, 0x0F],
        'H' => [0x11, 0x11, 0x11, 0x1F, 0x11, 0x11, 0x11],
        'I' => [0x0E, 0x04, 0x04, 0x04, 0x04, 0x04, 0x0E],
        'J' => [0x07, 0x02, 0x02, 0x02, 0x02, 0x12, 0x0C],
        'K' => [0x11, 0x12, 0x14, 0x18, 0x14, 0x12, 0x11],
        'L' => [0x10, 0x10, 0x10, 0x10, 0x10, 0x10, 0x1F],
        'M' => [0x11, 0x1B, 0x15, 0x15, 0x11, 0x11, 0x11],
        'N' => [0x11, 0x11, 0x19, 0x15, 0x13, 0x11, 0x11],
        'O' => [0x0E, 0x11, 0x11, 0x11, 0x11, 0x11, 0x0E],
        'P' => [0x1E, 0x11, 0x11, 0x1E, 0x10, 0x10, 0x10],
        'Q' => [0x0E, 0x11, 0x11, 0x11, 0x15, 0x12, 0x0D],
        'R' => [0x1E, 0x11, 0x11, 0x1E, 0x14, 0x12, 0x11],
        'S' => [0x0F, 0x10, 0x10, 0x0E, 0x01, 0x01, 0x1E],
        'T' => [0x1F, 0x04, 0x04, 0x04, 0x04, 0x04, 0x04],
        'U' => [0x11, 0x11, 0x11, 0x11, 0x11, 0x11, 0x0E],
        'V' => [0x11, 0x11, 0x11, 0x11, 0x11, 0x0A, 0x04],
        'W' => [0x11, 0x11, 0x11, 0x15, 0x15, 0x15, 0x0A],
        'X' => [0x11, 0x11, 0x0A, 0x04, 0x0A, 0x11, 0x11],
        'Y' => [0x11, 0x11, 0x0A, 0x04, 0x04, 0x04, 0x04],
        'Z' => [0x1F, 0x01, 0x02, 0x04, 0x08, 0x10, 0x1F],
        '0' => [0x0E, 0x11, 0x13, 0x15, 0x19, 0x11, 0x0E],
        '1' => [0x04, 0x0C, 0x04, 0x04, 0x04, 0x04, 0x0E],
        '2' => [0x0E, 0x11, 0x01, 0x02, 0x04, 0x08, 0x1F],
        '3' => [0x1F, 0x02, 0x04, 0x02, 0x01, 0x11, 0x0E],
        '4' => [0x02, 0x06, 0x0A, 0x12, 0x1F, 0x02, 0x02],
        '5' => [0x1F, 0x10, 0x1E, 0x01, 0x01, 0x11, 0x0E],
        '6' => [0x06, 0x08, 0x10, 0x1E, 0x11, 0x11, 0x0E],
        '7' => [0x1F, 0x01, 0x02, 0x04, 0x08, 0x08, 0x08],
        '8' => [0x0E, 0x11, 0x11, 0x0E, 0x11, 0x11, 0x0E],
        '9' => [0x0E, 0x11, 0x11, 0x0F, 0x01, 0x02, 0x0C],
        ' ' => [0x00; 7],
        '-' => [0x00, 0x00, 0x00, 0x1F, 0x00, 0x00, 0x00],
        '.' => [0x00, 0x00, 0x00, 0x00, 0x00, 0x0C, 0x0C],
        ',' => [0x00, 0x00, 0x00, 0x00, 0x0C, 0x04, 0x08],
        ':' => [0x00, 0x0C, 0x0C, 0x00, 0x0C, 0x0C, 0x00],
        '!' => [0x04, 0x04, 0x04, 0x04, 0x04, 0x00, 0x04],
        '\'' => [0x04, 0x04, 0x08, 0x00, 0x00, 0x00, 0x00],
        '/' => [0x01, 0x02, 0x02, 0x04, 0x08, 0x08, 0x10],
        '&' => [0x0C, 0x12, 0x14, 0x08, 0x15, 0x12, 0x0D],
        _ => [0x1F; 7],
    }
}

/// Horizontal runs `(start_col, len)` of lit cells in one glyph row.
fn row_runs(bits: u8) -> impl Iterator<Item = (u32, u32)> {
    let mut runs = Vec::new();
    let mut col = 0;
    while col < GLYPH_COLS {
        let lit = |c: u32| bits & (1 << (GLYPH_COLS - 1 - c)) != 0;
        if lit(col) {
            let start = col;
            while col < GLYPH_COLS && lit(col) {
                col += 1;
            }
            runs.push((start, col - start));
        } else {
            col += 1;
        }
    }
    runs.into_iter()
}

/// Width of the laid-out text block in local units.
pub fn text_width(spec: &TextSpec) -> f32 {
    let chars = spec.body.chars().count() as u32;
    if chars == 0 {
        return 0.0;
    }
    (chars * ADVANCE - 1) as f32 * spec.size * CELL_PER_SIZE
}

/// Build the extruded mesh for `spec`.
pub fn text_mesh(spec: &TextSpec) -> MeshData {
    let cell = spec.size * CELL_PER_SIZE;
    let x0 = -text_width(spec) * 0.5;
    let y0 = match spec.align_y {
        VerticalAlign::Center => -(GLYPH_ROWS as f32) * cell * 0.5,
        VerticalAlign::Bottom => 0.0,
    };

    let mut mesh = MeshData::new();
    for (i, c) in spec.body.chars().enumerate() {
        let gx = x0 + (i as u32 * ADVANCE) as f32 * cell;
        for (row, bits) in glyph(c).iter().enumerate() {
            let y = y0 + (GLYPH_ROWS - 1 - row as u32) as f32 * cell;
            for (start, len) in row_runs(*bits) {
                let x = gx + start as f32 * cell;
                mesh.push_box(
                    Vec3::new(x, y, -spec.extrusion),
                    Vec3::new(x + len as f32 * cell, y + cell, spec.extrusion),
                );
            }
        }
    }
    mesh
}

/// Local bounds of the meshed text (empty for blank strings).
pub fn text_bounds(spec: &TextSpec) -> Aabb {
    text_mesh(spec).bounds()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_row_runs_merge_adjacent_cells() {
        let runs: Vec<_> = row_runs(0x1B).collect(); // 11011
        assert_eq!(runs, vec![(0, 2), (3, 2)]);
        assert_eq!(row_runs(0x00).count(), 0);
        assert_eq!(row_runs(0x1F).collect::<Vec<_>>(), vec![(0, 5)]);
    }

    #[test]
    fn test_center_alignment_is_symmetric() {
        let spec = TextSpec::new("TEST", 0.8, 0.05, VerticalAlign::Center);
        let b = text_bounds(&spec);
        assert!((b.min.x + b.max.x).abs() < 1e-5);
        assert!((b.min.y + b.max.y).abs() < 1e-5);
        assert!((b.min.z + 0.05).abs() < 1e-6);
        assert!((b.max.z - 0.05).abs() < 1e-6);
        assert!((b.size().y - 0.8 * 0.7).abs() < 1e-5);
    }

    #[test]
    fn test_bottom_alignment_sits_on_origin() {
        let spec = TextSpec::new("SHOP", 1.2, 0.08, VerticalAlign::Bottom);
        let b = text_bounds(&spec);
        assert!(b.min.y.abs() < 1e-6);
        assert!((b.max.y - 1.2 * 0.7).abs() < 1e-5);
    }

    #[test]
    fn test_width_grows_with_length() {
        let short = TextSpec::new("AB", 1.0, 0.05, VerticalAlign::Center);
        let long = TextSpec::new("ABCD", 1.0, 0.05, VerticalAlign::Center);
        assert!(text_width(&long) > text_width(&short));
        assert!((text_width(&short) - 1.1).abs() < 1e-5);
    }

    #[test]
    fn test_lowercase_folds_to_uppercase() {
        let lower = text_mesh(&TextSpec::new("cafe", 1.0, 0.05, VerticalAlign::Center));
        let upper = text_mesh(&TextSpec::new("CAFE", 1.0, 0.05, VerticalAlign::Center));
        assert_eq!(lower, upper);
    }

    #[test]
    fn test_blank_text_has_no_geometry() {
        let mesh = text_mesh(&TextSpec::new("   ", 1.0, 0.05, VerticalAlign::Center));
        assert!(mesh.is_empty());
        assert!(text_bounds(&TextSpec::new("", 1.0, 0.05, VerticalAlign::Center)).is_empty());
    }
}
