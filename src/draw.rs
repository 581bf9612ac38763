//! Rasterization primitives on top of an embedded-graphics [`DrawTarget`].

use embedded_graphics_core::draw_target::DrawTarget;
use embedded_graphics_core::pixelcolor::Rgb565;
use embedded_graphics_core::prelude::Point;
use embedded_graphics_core::Pixel;

/// Draw a one pixel wide line with Bresenham's algorithm.
#[inline]
pub fn draw_line<D>(fb: &mut D, p1: Point, p2: Point, color: Rgb565) -> Result<(), D::Error>
where
    D: DrawTarget<Color = Rgb565>,
{
    fb.draw_iter(
        line_drawing::Bresenham::new((p1.x, p1.y), (p2.x, p2.y))
            .map(|(x, y)| Pixel(Point::new(x, y), color)),
    )
}

/// Outline a triangle.
pub fn draw_triangle<D>(fb: &mut D, points: [Point; 3], color: Rgb565) -> Result<(), D::Error>
where
    D: DrawTarget<Color = Rgb565>,
{
    let [a, b, c] = points;
    draw_line(fb, a, b, color)?;
    draw_line(fb, b, c, color)?;
    draw_line(fb, c, a, color)
}

/// Fill a triangle by splitting it into a flat-bottom and a flat-top half.
pub fn fill_triangle<D>(fb: &mut D, mut points: [Point; 3], color: Rgb565) -> Result<(), D::Error>
where
    D: DrawTarget<Color = Rgb565>,
{
    // sort by y (three elements, so a fixed swap sequence)
    if points[0].y > points[1].y {
        points.swap(0, 1);
    }
    if points[0].y > points[2].y {
        points.swap(0, 2);
    }
    if points[1].y > points[2].y {
        points.swap(1, 2);
    }
    let [p1, p2, p3] = points;

    if p1.y == p3.y {
        // Degenerate: every corner on one scanline
        let start = p1.x.min(p2.x).min(p3.x);
        let end = p1.x.max(p2.x).max(p3.x);
        return draw_span(fb, start, end, p1.y, color);
    }

    if p2.y == p3.y {
        fill_bottom_flat_triangle(fb, p1, p2, p3, color)
    } else if p1.y == p2.y {
        fill_top_flat_triangle(fb, p1, p2, p3, color)
    } else {
        let p4 = Point::new(
            (p1.x as f32 + ((p2.y - p1.y) as f32 / (p3.y - p1.y) as f32) * (p3.x - p1.x) as f32)
                as i32,
            p2.y,
        );

        fill_bottom_flat_triangle(fb, p1, p2, p4, color)?;
        fill_top_flat_triangle(fb, p2, p4, p3, color)
    }
}

fn fill_bottom_flat_triangle<D>(
    fb: &mut D,
    p1: Point,
    p2: Point,
    p3: Point,
    color: Rgb565,
) -> Result<(), D::Error>
where
    D: DrawTarget<Color = Rgb565>,
{
    let invslope1 = (p2.x - p1.x) as f32 / (p2.y - p1.y) as f32;
    let invslope2 = (p3.x - p1.x) as f32 / (p3.y - p1.y) as f32;

    let mut curx1 = p1.x as f32;
    let mut curx2 = p1.x as f32;

    for scanline_y in p1.y..=p2.y {
        draw_span(fb, curx1 as i32, curx2 as i32, scanline_y, color)?;
        curx1 += invslope1;
        curx2 += invslope2;
    }
    Ok(())
}

fn fill_top_flat_triangle<D>(
    fb: &mut D,
    p1: Point,
    p2: Point,
    p3: Point,
    color: Rgb565,
) -> Result<(), D::Error>
where
    D: DrawTarget<Color = Rgb565>,
{
    let invslope1 = (p3.x - p1.x) as f32 / (p3.y - p1.y) as f32;
    let invslope2 = (p3.x - p2.x) as f32 / (p3.y - p2.y) as f32;

    let mut curx1 = p3.x as f32;
    let mut curx2 = p3.x as f32;

    for scanline_y in (p1.y..=p3.y).rev() {
        draw_span(fb, curx1 as i32, curx2 as i32, scanline_y, color)?;
        curx1 -= invslope1;
        curx2 -= invslope2;
    }
    Ok(())
}

fn draw_span<D>(fb: &mut D, x1: i32, x2: i32, y: i32, color: Rgb565) -> Result<(), D::Error>
where
    D: DrawTarget<Color = Rgb565>,
{
    let start = x1.min(x2);
    let end = x1.max(x2);
    fb.draw_iter((start..=end).map(|x| Pixel(Point::new(x, y), color)))
}
