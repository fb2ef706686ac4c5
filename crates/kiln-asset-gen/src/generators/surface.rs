//! Surface treatments shared by the drawn generators

use crate::spec::SurfaceStyle;
use kiln_core::Color;
use kiln_procgen::{Canvas, GradientStop, Paint, Shape};

/// Paint `shape` in `color` with the given surface treatment.
///
/// `top` and `bottom` bound the shape vertically so gradients and highlights
/// span the body rather than the whole canvas.
pub fn paint(
    canvas: &mut Canvas,
    shape: &Shape,
    top: f32,
    bottom: f32,
    color: Color,
    style: SurfaceStyle,
) {
    let height = (bottom - top).max(1.0);
    match style {
        SurfaceStyle::Flat => {
            canvas.fill(shape, &Paint::Solid(color));
            border(canvas, shape, 1.0, color.darken(0.3));
        }
        SurfaceStyle::Glossy => {
            canvas.fill(
                shape,
                &Paint::vertical(top, bottom, color.lighten(0.25), color.darken(0.2)),
            );
            highlight(canvas, &shape.inset(2.0), top, top + height * 0.5, 110);
            border(canvas, shape, 1.0, color.darken(0.45));
        }
        SurfaceStyle::Glass => {
            canvas.fill(
                shape,
                &Paint::vertical(top, bottom, color.with_alpha(170), color.with_alpha(120)),
            );
            highlight(canvas, &shape.inset(1.5), top, top + height * 0.4, 90);
            border(canvas, shape, 1.0, Color::WHITE.with_alpha(200));
        }
        SurfaceStyle::Outline => {
            border(canvas, shape, 2.0, color);
        }
        SurfaceStyle::Pixel => {
            canvas.fill(shape, &Paint::Solid(color));
            // Hard bevel: light top band, dark bottom band
            let band = (height * 0.15).clamp(1.0, 3.0).round();
            let inner = shape.inset(2.0);
            canvas.fill(
                &inner,
                &Paint::Linear {
                    from: (0.0, top),
                    to: (0.0, bottom),
                    stops: vec![
                        GradientStop::new(0.0, color.lighten(0.3)),
                        GradientStop::new(band / height, color.lighten(0.3)),
                        GradientStop::new(band / height, Color::TRANSPARENT),
                        GradientStop::new(1.0 - band / height, Color::TRANSPARENT),
                        GradientStop::new(1.0 - band / height, color.darken(0.25)),
                        GradientStop::new(1.0, color.darken(0.25)),
                    ],
                },
            );
            border(canvas, shape, 2.0, color.darken(0.5));
        }
    }
}

/// Stroke the inside edge of `shape` with a band `width` pixels wide
pub fn border(canvas: &mut Canvas, shape: &Shape, width: f32, color: Color) {
    canvas.fill_between(shape, &shape.inset(width), &Paint::Solid(color));
}

/// White sheen fading out between `y0` and `y1`
fn highlight(canvas: &mut Canvas, shape: &Shape, y0: f32, y1: f32, alpha: u8) {
    canvas.fill(
        shape,
        &Paint::Linear {
            from: (0.0, y0),
            to: (0.0, y1),
            stops: vec![
                GradientStop::new(0.0, Color::WHITE.with_alpha(alpha)),
                GradientStop::new(1.0, Color::WHITE.with_alpha(0)),
            ],
        },
    );
}

/// Black or white, whichever reads better on `background`
pub fn contrast_ink(background: Color) -> Color {
    let luma = 0.299 * background.r as f32 + 0.587 * background.g as f32
        + 0.114 * background.b as f32;
    if luma > 150.0 {
        Color::rgb(0x1E, 0x1E, 0x24)
    } else {
        Color::WHITE
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn painted(style: SurfaceStyle) -> image::RgbaImage {
        let mut canvas = Canvas::new(40, 20);
        let shape = Shape::rounded(0.0, 0.0, 40.0, 20.0, 4.0);
        paint(&mut canvas, &shape, 0.0, 20.0, Color::BLUE, style);
        canvas.into_image()
    }

    #[test]
    fn test_outline_leaves_interior_clear() {
        let img = painted(SurfaceStyle::Outline);
        assert_eq!(img.get_pixel(20, 10).0[3], 0);
        assert_eq!(img.get_pixel(20, 0).0, Color::BLUE.to_array());
    }

    #[test]
    fn test_glass_is_translucent() {
        let img = painted(SurfaceStyle::Glass);
        let alpha = img.get_pixel(20, 15).0[3];
        assert!(alpha > 0 && alpha < 255, "alpha {}", alpha);
    }

    #[test]
    fn test_glossy_is_lighter_on_top() {
        let img = painted(SurfaceStyle::Glossy);
        let top = img.get_pixel(20, 4).0;
        let bottom = img.get_pixel(20, 16).0;
        assert!(top[2] > bottom[2]);
    }

    #[test]
    fn test_styles_differ() {
        let flat = painted(SurfaceStyle::Flat);
        let pixel = painted(SurfaceStyle::Pixel);
        assert_ne!(flat.as_raw(), pixel.as_raw());
    }

    #[test]
    fn test_contrast_ink() {
        assert_eq!(contrast_ink(Color::rgb(0x22, 0x22, 0x26)), Color::WHITE);
        assert_ne!(contrast_ink(Color::WHITE), Color::WHITE);
    }
}
