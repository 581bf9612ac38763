use core::f32::consts;

use embedded_graphics_core::geometry::Point;
use nalgebra::{Isometry3, Matrix4, Perspective3, Point3, Vector3, Vector4};

/// Perspective camera that maps world points to screen pixels.
///
/// Defaults match the demo scene: 45° vertical field of view, clip planes at
/// 0.1 and 50, positioned at `(0, 0, 15)` looking at the origin.
#[derive(Debug, Clone)]
pub struct Camera {
    pub position: Point3<f32>,
    fov: f32,
    pub near: f32,
    pub far: f32,
    target: Point3<f32>,
    width: u32,
    height: u32,
    view_matrix: Matrix4<f32>,
    projection_matrix: Matrix4<f32>,
    pub vp_matrix: Matrix4<f32>,
}

impl Camera {
    pub fn new(width: u32, height: u32) -> Camera {
        let mut ret = Camera {
            position: Point3::new(0.0, 0.0, 15.0),
            fov: consts::FRAC_PI_4,
            near: 0.1,
            far: 50.0,
            target: Point3::origin(),
            width: width.max(1),
            height: height.max(1),
            view_matrix: Matrix4::identity(),
            projection_matrix: Matrix4::identity(),
            vp_matrix: Matrix4::identity(),
        };

        ret.update_view();
        ret.update_projection();

        ret
    }

    pub fn set_position(&mut self, pos: Point3<f32>) {
        self.position = pos;
        self.update_view();
    }

    pub fn set_target(&mut self, target: Point3<f32>) {
        self.target = target;
        self.update_view();
    }

    pub fn set_fovy(&mut self, fovy: f32) {
        self.fov = fovy;
        self.update_projection();
    }

    pub fn set_near_far(&mut self, near: f32, far: f32) {
        self.near = near;
        self.far = far;
        self.update_projection();
    }

    pub fn aspect_ratio(&self) -> f32 {
        self.width as f32 / self.height as f32
    }

    pub fn viewport(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Project a world-space point to pixel coordinates.
    ///
    /// Returns `None` for points behind the camera, outside the clip planes
    /// or off-screen.
    pub fn project(&self, point: &Vector3<f32>) -> Option<Point> {
        let p = self.to_screen(point)?;
        if p.x < 0 || p.x >= self.width as i32 || p.y < 0 || p.y >= self.height as i32 {
            return None;
        }
        Some(p)
    }

    /// Like [`Camera::project`] but keeps points that land off-screen, for
    /// shapes the draw target is expected to clip.
    pub fn to_screen(&self, point: &Vector3<f32>) -> Option<Point> {
        let clip = self.vp_matrix * Vector4::new(point.x, point.y, point.z, 1.0);

        if clip.w <= 0.0 {
            return None;
        }
        // For a right-handed perspective, w is the distance along the view axis
        if clip.w < self.near || clip.w > self.far {
            return None;
        }

        let ndc = Point3::from_homogeneous(clip)?;

        let x = ((1.0 + ndc.x) * 0.5 * self.width as f32) as i32;
        let y = ((1.0 - ndc.y) * 0.5 * self.height as f32) as i32;
        Some(Point::new(x, y))
    }

    fn update_view(&mut self) {
        let view = Isometry3::look_at_rh(&self.position, &self.target, &Vector3::y());
        self.view_matrix = view.to_homogeneous();
        self.vp_matrix = self.projection_matrix * self.view_matrix;
    }

    fn update_projection(&mut self) {
        let projection = Perspective3::new(self.aspect_ratio(), self.fov, self.near, self.far);
        self.projection_matrix = projection.to_homogeneous();
        self.vp_matrix = self.projection_matrix * self.view_matrix;
    }
}
