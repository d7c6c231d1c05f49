// src/rendering/primitives.rs

use crate::config::RenderStyle;
use cairo::{Context, RadialGradient};
use std::f64::consts::PI;

/// Draws one shaded sphere as a radial-gradient disc.
pub fn draw_sphere(
    cr: &Context,
    x: f64,
    y: f64,
    radius: f64,
    color: [f64; 4],
    style: &RenderStyle,
) -> Result<(), cairo::Error> {
    let [red, green, blue, alpha] = color;

    let spec_r = 1.0 + (red - 1.0) * style.metallic;
    let spec_g = 1.0 + (green - 1.0) * style.metallic;
    let spec_b = 1.0 + (blue - 1.0) * style.metallic;

    let highlight_size = 0.05 + style.roughness * 0.35;
    let light_offset = 0.3;

    // Highlight offset to the top-left, shadow centered
    let gradient = RadialGradient::new(
        x - radius * light_offset,
        y - radius * light_offset,
        radius * highlight_size,
        x,
        y,
        radius,
    );

    let shine_alpha = (1.0 - style.roughness * 0.5) * alpha;
    gradient.add_color_stop_rgba(0.0, spec_r, spec_g, spec_b, shine_alpha);
    gradient.add_color_stop_rgba(0.1 + style.roughness * 0.2, red, green, blue, alpha);

    let ambient = 0.6 - style.metallic * 0.3;
    gradient.add_color_stop_rgba(1.0, red * ambient, green * ambient, blue * ambient, alpha);

    cr.set_source(&gradient)?;
    cr.arc(x, y, radius, 0.0, 2.0 * PI);
    cr.fill()?;

    // Thin outline for crispness in vector output
    cr.set_source_rgba(0.0, 0.0, 0.0, 0.3 * alpha);
    cr.set_line_width((radius * 0.05).max(0.5));
    cr.arc(x, y, radius, 0.0, 2.0 * PI);
    cr.stroke()
}
