use foundation::math::{Vec2, Vec3};

use crate::picking::Ray;

/// Render surface size in pixels.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

impl Viewport {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    pub fn aspect(&self) -> f64 {
        self.width.max(1) as f64 / self.height.max(1) as f64
    }

    /// Pointer position to normalized device coordinates, clamped to `[-1, 1]`
    /// so drags that leave the element still resolve to its edge.
    pub fn ndc(&self, x_px: f64, y_px: f64) -> Vec2 {
        let w = self.width.max(1) as f64;
        let h = self.height.max(1) as f64;
        let x = (2.0 * x_px / w - 1.0).clamp(-1.0, 1.0);
        let y = (1.0 - 2.0 * y_px / h).clamp(-1.0, 1.0);
        Vec2::new(x, y)
    }
}

/// Perspective camera looking at `target`.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Camera {
    pub position: Vec3,
    pub target: Vec3,
    pub up: Vec3,
    pub fov_y_rad: f64,
    pub aspect: f64,
}

impl Camera {
    pub fn new(position: Vec3, aspect: f64) -> Self {
        Self {
            position,
            target: Vec3::ZERO,
            up: Vec3::Y,
            fov_y_rad: 45f64.to_radians(),
            aspect,
        }
    }

    pub fn distance(&self) -> f64 {
        self.position.distance(self.target)
    }

    /// World-space ray from the eye through `ndc`.
    pub fn ray_through_ndc(&self, ndc: Vec2) -> Option<Ray> {
        let forward = (self.target - self.position).normalized()?;
        let right = forward.cross(self.up).normalized()?;
        let up = right.cross(forward);

        let tan = (0.5 * self.fov_y_rad).tan();
        let px = ndc.x * self.aspect * tan;
        let py = ndc.y * tan;
        let dir = (forward + right * px + up * py).normalized()?;
        Some(Ray::new(self.position, dir))
    }

    /// Column-major view-projection matrix for the renderer.
    pub fn view_proj(&self) -> [[f32; 4]; 4] {
        let distance = self.distance();
        let near = (distance * 0.01).max(1e-3);
        let far = (distance * 4.0).max(near + 1.0);
        let proj = mat4_perspective_rh_z0(self.fov_y_rad, self.aspect, near, far);
        let view = mat4_look_at_rh(self.position, self.target, self.up);
        mat4_mul(proj, view)
    }
}

fn mat4_mul(a: [[f32; 4]; 4], b: [[f32; 4]; 4]) -> [[f32; 4]; 4] {
    let mut c = [[0.0f32; 4]; 4];
    for col in 0..4 {
        for row in 0..4 {
            c[col][row] = a[0][row] * b[col][0]
                + a[1][row] * b[col][1]
                + a[2][row] * b[col][2]
                + a[3][row] * b[col][3];
        }
    }
    c
}

fn mat4_perspective_rh_z0(fov_y_rad: f64, aspect: f64, near: f64, far: f64) -> [[f32; 4]; 4] {
    let f = 1.0 / (0.5 * fov_y_rad).tan();
    let m00 = (f / aspect) as f32;
    let m11 = f as f32;
    let m22 = (far / (near - far)) as f32;
    let m23 = ((near * far) / (near - far)) as f32;

    [
        [m00, 0.0, 0.0, 0.0],
        [0.0, m11, 0.0, 0.0],
        [0.0, 0.0, m22, -1.0],
        [0.0, 0.0, m23, 0.0],
    ]
}

fn mat4_look_at_rh(eye: Vec3, target: Vec3, up: Vec3) -> [[f32; 4]; 4] {
    let f = (target - eye).normalized().unwrap_or(Vec3::new(0.0, 0.0, -1.0));
    let s = f.cross(up).normalized().unwrap_or(Vec3::new(1.0, 0.0, 0.0));
    let u = s.cross(f);

    [
        [s.x as f32, u.x as f32, -f.x as f32, 0.0],
        [s.y as f32, u.y as f32, -f.y as f32, 0.0],
        [s.z as f32, u.z as f32, -f.z as f32, 0.0],
        [
            -s.dot(eye) as f32,
            -u.dot(eye) as f32,
            f.dot(eye) as f32,
            1.0,
        ],
    ]
}
