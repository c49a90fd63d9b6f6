//! Shape generation for 2D primitives
//!
//! Everything is emitted as a triangle list in board coordinates.

use glam::Vec2;
use std::f32::consts::PI;

use super::vertex::Vertex;

/// Push two triangles covering the quad `a b c d` (in winding order)
fn push_quad(vertices: &mut Vec<Vertex>, corners: [Vec2; 4], colors: [[f32; 4]; 4]) {
    let [a, b, c, d] = corners;
    vertices.push(Vertex::new(a.x, a.y, colors[0]));
    vertices.push(Vertex::new(b.x, b.y, colors[1]));
    vertices.push(Vertex::new(c.x, c.y, colors[2]));

    vertices.push(Vertex::new(c.x, c.y, colors[2]));
    vertices.push(Vertex::new(d.x, d.y, colors[3]));
    vertices.push(Vertex::new(a.x, a.y, colors[0]));
}

/// Generate vertices for a filled circle
pub fn circle(center: Vec2, radius: f32, color: [f32; 4], segments: u32) -> Vec<Vertex> {
    let mut vertices = Vec::with_capacity((segments * 3) as usize);

    for i in 0..segments {
        let theta1 = (i as f32 / segments as f32) * 2.0 * PI;
        let theta2 = ((i + 1) as f32 / segments as f32) * 2.0 * PI;

        // Triangle from center to edge
        vertices.push(Vertex::new(center.x, center.y, color));
        vertices.push(Vertex::new(
            center.x + radius * theta1.cos(),
            center.y + radius * theta1.sin(),
            color,
        ));
        vertices.push(Vertex::new(
            center.x + radius * theta2.cos(),
            center.y + radius * theta2.sin(),
            color,
        ));
    }

    vertices
}

/// Generate vertices for a ring (hollow circle)
pub fn ring(
    center: Vec2,
    inner_radius: f32,
    outer_radius: f32,
    color: [f32; 4],
    segments: u32,
) -> Vec<Vertex> {
    let mut vertices = Vec::with_capacity((segments * 6) as usize);

    for i in 0..segments {
        let theta1 = (i as f32 / segments as f32) * 2.0 * PI;
        let theta2 = ((i + 1) as f32 / segments as f32) * 2.0 * PI;
        let dir1 = Vec2::new(theta1.cos(), theta1.sin());
        let dir2 = Vec2::new(theta2.cos(), theta2.sin());

        push_quad(
            &mut vertices,
            [
                center + dir1 * inner_radius,
                center + dir1 * outer_radius,
                center + dir2 * outer_radius,
                center + dir2 * inner_radius,
            ],
            [color; 4],
        );
    }

    vertices
}

/// Axis-aligned filled rectangle
pub fn rect(min: Vec2, size: Vec2, color: [f32; 4]) -> Vec<Vertex> {
    vertical_gradient(min, size, color, color)
}

/// Axis-aligned rectangle blending from `top` to `bottom`
pub fn vertical_gradient(min: Vec2, size: Vec2, top: [f32; 4], bottom: [f32; 4]) -> Vec<Vertex> {
    let mut vertices = Vec::with_capacity(6);
    let max = min + size;
    push_quad(
        &mut vertices,
        [
            min,
            Vec2::new(max.x, min.y),
            max,
            Vec2::new(min.x, max.y),
        ],
        [top, top, bottom, bottom],
    );
    vertices
}

/// Rectangle of `half_extents` centred on `center`, rotated by `rotation` radians
pub fn rotated_rect(center: Vec2, half_extents: Vec2, rotation: f32, color: [f32; 4]) -> Vec<Vertex> {
    let rot = Vec2::from_angle(rotation);
    let corner = |x: f32, y: f32| center + rot.rotate(Vec2::new(x, y));
    let (hx, hy) = (half_extents.x, half_extents.y);

    let mut vertices = Vec::with_capacity(6);
    push_quad(
        &mut vertices,
        [corner(-hx, -hy), corner(hx, -hy), corner(hx, hy), corner(-hx, hy)],
        [color; 4],
    );
    vertices
}

/// Straight line of the given width between two points
pub fn line(from: Vec2, to: Vec2, width: f32, color: [f32; 4]) -> Vec<Vertex> {
    let dir = (to - from).normalize_or_zero();
    if dir == Vec2::ZERO {
        return Vec::new();
    }
    let perp = dir.perp() * (width * 0.5);

    let mut vertices = Vec::with_capacity(6);
    push_quad(
        &mut vertices,
        [from + perp, to + perp, to - perp, from - perp],
        [color; 4],
    );
    vertices
}

/// Dashed line: `dash` px on, `gap` px off, starting with a dash
pub fn dashed_line(
    from: Vec2,
    to: Vec2,
    dash: f32,
    gap: f32,
    width: f32,
    color: [f32; 4],
) -> Vec<Vertex> {
    let length = from.distance(to);
    if length <= 0.0 || dash <= 0.0 {
        return Vec::new();
    }
    let dir = (to - from) / length;

    let mut vertices = Vec::new();
    let mut t = 0.0;
    while t < length {
        let end = (t + dash).min(length);
        vertices.extend(line(from + dir * t, from + dir * end, width, color));
        t += dash + gap.max(0.0);
    }
    vertices
}

/// Seven-segment masks for `0..=9`; bit 0 is the top bar, then clockwise,
/// bit 6 is the middle bar
const DIGIT_SEGMENTS: [u8; 10] = [
    0b011_1111, 0b000_0110, 0b101_1011, 0b100_1111, 0b110_0110,
    0b110_1101, 0b111_1101, 0b000_0111, 0b111_1111, 0b110_1111,
];

/// Width of one glyph cell relative to text height
const GLYPH_ASPECT: f32 = 0.6;
/// Gap between glyph cells relative to text height
const GLYPH_SPACING: f32 = 0.2;

/// Width of `text` when drawn `height` px tall
pub fn text_width(text: &str, height: f32) -> f32 {
    let n = text.chars().count() as f32;
    if n == 0.0 {
        return 0.0;
    }
    n * height * GLYPH_ASPECT + (n - 1.0) * height * GLYPH_SPACING
}

/// Digits and `+`/`-` as seven-segment glyphs, centred on `center`
///
/// Other characters leave a blank cell.
pub fn segment_text(text: &str, center: Vec2, height: f32, color: [f32; 4]) -> Vec<Vertex> {
    let w = height * GLYPH_ASPECT;
    let h = height;
    let t = (height * 0.12).max(1.0);
    let half = h * 0.5;

    let mut vertices = Vec::new();
    let mut x = center.x - text_width(text, height) * 0.5;
    let y = center.y - half;

    for ch in text.chars() {
        let bars = match ch {
            '+' => vec![(0.0, half - t * 0.5, w, t), (w * 0.5 - t * 0.5, h * 0.2, t, h * 0.6)],
            '-' => vec![(0.0, half - t * 0.5, w, t)],
            _ => Vec::new(),
        };
        for (bx, by, bw, bh) in bars {
            vertices.extend(rect(Vec2::new(x + bx, y + by), Vec2::new(bw, bh), color));
        }

        if let Some(mask) = ch.to_digit(10).map(|d| DIGIT_SEGMENTS[d as usize]) {
            let segments = [
                (0.0, 0.0, w, t),
                (w - t, 0.0, t, half),
                (w - t, half, t, half),
                (0.0, h - t, w, t),
                (0.0, half, t, half),
                (0.0, 0.0, t, half),
                (0.0, half - t * 0.5, w, t),
            ];
            for (bit, &(bx, by, bw, bh)) in segments.iter().enumerate() {
                if mask & (1 << bit) != 0 {
                    vertices.extend(rect(Vec2::new(x + bx, y + by), Vec2::new(bw, bh), color));
                }
            }
        }

        x += w + height * GLYPH_SPACING;
    }

    vertices
}

#[cfg(test)]
mod tests {
    use super::*;

    const WHITE: [f32; 4] = [1.0; 4];

    #[test]
    fn test_circle_vertex_count() {
        assert_eq!(circle(Vec2::ZERO, 10.0, WHITE, 24).len(), 72);
        assert_eq!(ring(Vec2::ZERO, 8.0, 10.0, WHITE, 12).len(), 72);
    }

    #[test]
    fn test_circle_stays_within_radius() {
        let center = Vec2::new(50.0, 60.0);
        for v in circle(center, 10.0, WHITE, 16) {
            let p = Vec2::from(v.position);
            assert!(p.distance(center) <= 10.0 + 1e-3);
        }
    }

    #[test]
    fn test_gradient_colors_top_and_bottom() {
        let top = [1.0, 0.0, 0.0, 1.0];
        let bottom = [0.0, 0.0, 1.0, 1.0];
        let verts = vertical_gradient(Vec2::ZERO, Vec2::new(10.0, 20.0), top, bottom);
        assert_eq!(verts.len(), 6);
        for v in verts {
            let expected = if v.position[1] == 0.0 { top } else { bottom };
            assert_eq!(v.color, expected);
        }
    }

    #[test]
    fn test_rotated_rect_quarter_turn() {
        let verts = rotated_rect(Vec2::ZERO, Vec2::new(4.0, 1.0), PI / 2.0, WHITE);
        // Long axis now runs vertically
        for v in verts {
            assert!(v.position[0].abs() <= 1.0 + 1e-4);
            assert!(v.position[1].abs() <= 4.0 + 1e-4);
        }
    }

    #[test]
    fn test_degenerate_line_is_empty() {
        assert!(line(Vec2::ONE, Vec2::ONE, 2.0, WHITE).is_empty());
        assert!(dashed_line(Vec2::ONE, Vec2::ONE, 5.0, 5.0, 2.0, WHITE).is_empty());
    }

    #[test]
    fn test_dashed_line_dash_count() {
        // 400 px at 10 on / 10 off => 20 dashes
        let verts = dashed_line(Vec2::ZERO, Vec2::new(400.0, 0.0), 10.0, 10.0, 2.0, WHITE);
        assert_eq!(verts.len(), 20 * 6);
    }

    #[test]
    fn test_segment_text() {
        // "8" lights all seven bars, "1" two
        assert_eq!(segment_text("8", Vec2::ZERO, 20.0, WHITE).len(), 7 * 6);
        assert_eq!(segment_text("1", Vec2::ZERO, 20.0, WHITE).len(), 2 * 6);
        assert_eq!(segment_text("+1", Vec2::ZERO, 20.0, WHITE).len(), 4 * 6);
        assert!(segment_text("", Vec2::ZERO, 20.0, WHITE).is_empty());
    }

    #[test]
    fn test_segment_text_is_centred() {
        let center = Vec2::new(100.0, 100.0);
        let verts = segment_text("+55", center, 20.0, WHITE);
        let min_x = verts.iter().map(|v| v.position[0]).fold(f32::MAX, f32::min);
        let max_x = verts.iter().map(|v| v.position[0]).fold(f32::MIN, f32::max);
        assert!(((min_x + max_x) * 0.5 - center.x).abs() < 1e-3);
        assert!((max_x - min_x - text_width("+55", 20.0)).abs() < 1e-3);
    }
}
