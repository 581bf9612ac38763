//! Face-colored rendering of bodies into a [`DrawTarget`].

use embedded_graphics_core::draw_target::DrawTarget;
use embedded_graphics_core::pixelcolor::{Rgb565, RgbColor};
use embedded_graphics_core::prelude::Point;
use nalgebra::Vector3;

use crate::body::Body;
use crate::camera::Camera;
use crate::draw::{draw_triangle, fill_triangle};
use crate::sim::Renderer;

pub const BACKGROUND_COLOR: Rgb565 = Rgb565::BLACK;
/// Mid grey.
pub const FLOOR_COLOR: Rgb565 = Rgb565::new(16, 32, 16);

/// Draws every face of a body in its current color, after a floor quad at
/// `y = -bound` that is clipped by the target.
///
/// Faces are drawn in mesh order without depth sorting. A face with any
/// vertex that does not project onto the screen is skipped.
pub struct FaceRenderer<D> {
    target: D,
    pub camera: Camera,
    floor: Option<[Vector3<f32>; 4]>,
}

impl<D> FaceRenderer<D>
where
    D: DrawTarget<Color = Rgb565>,
{
    /// Create a renderer whose camera fills `target`, with the floor at
    /// `y = -bound`.
    pub fn new(target: D, bound: f32) -> Self {
        let size = target.bounding_box().size;
        let camera = Camera::new(size.width, size.height);
        Self {
            target,
            camera,
            floor: Some(floor_quad(bound)),
        }
    }

    pub fn without_floor(mut self) -> Self {
        self.floor = None;
        self
    }

    pub fn target(&self) -> &D {
        &self.target
    }

    pub fn target_mut(&mut self) -> &mut D {
        &mut self.target
    }

    pub fn into_target(self) -> D {
        self.target
    }

    fn project_face(&self, corners: &[Vector3<f32>; 3]) -> Option<[Point; 3]> {
        Some([
            self.camera.project(&corners[0])?,
            self.camera.project(&corners[1])?,
            self.camera.project(&corners[2])?,
        ])
    }

    fn draw_floor(&mut self) -> Result<(), D::Error> {
        let Some([a, b, c, d]) = self.floor else {
            return Ok(());
        };
        let camera = &self.camera;
        let corners = [a, b, c, d].map(|v| camera.to_screen(&v));
        let [Some(a), Some(b), Some(c), Some(d)] = corners else {
            return Ok(());
        };
        fill_triangle(&mut self.target, [a, b, c], FLOOR_COLOR)?;
        fill_triangle(&mut self.target, [a, c, d], FLOOR_COLOR)
    }
}

impl<D> Renderer for FaceRenderer<D>
where
    D: DrawTarget<Color = Rgb565>,
{
    type Error = D::Error;

    fn begin_frame(&mut self) -> Result<(), Self::Error> {
        self.target.clear(BACKGROUND_COLOR)?;
        self.draw_floor()
    }

    fn draw_body(&mut self, body: &Body<'_>, wireframe: bool) -> Result<(), Self::Error> {
        for (i, &color) in body.face_colors().iter().enumerate() {
            let corners = body.face_world_vertices(i);
            let Some(points) = self.project_face(&corners) else {
                continue;
            };
            if wireframe {
                draw_triangle(&mut self.target, points, color)?;
            } else {
                fill_triangle(&mut self.target, points, color)?;
            }
        }
        Ok(())
    }

    fn end_frame(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }
}

/// Floor quad spanning the simulation box at its bottom face.
fn floor_quad(bound: f32) -> [Vector3<f32>; 4] {
    let y = -bound;
    [
        Vector3::new(-bound, y, bound),
        Vector3::new(bound, y, bound),
        Vector3::new(bound, y, -bound),
        Vector3::new(-bound, y, -bound),
    ]
}
