use glam::{Vec2, Vec3};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    pub origin: Vec3,
    /// Unit length.
    pub direction: Vec3,
}

impl Ray {
    pub fn at(&self, t: f32) -> Vec3 {
        self.origin + self.direction * t
    }
}

/// Perspective camera described by position, yaw and pitch.
#[derive(Debug, Clone, Copy)]
pub struct Camera {
    pub position: Vec3,
    pub yaw: f32,
    pub pitch: f32,
    pub fov_y_deg: f32,
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
}

impl Camera {
    pub fn new(position: Vec3, yaw: f32, pitch: f32) -> Self {
        Self {
            position,
            yaw,
            pitch,
            fov_y_deg: 70.0,
            aspect: 1.0,
            near: 0.01,
            far: 10.0,
        }
    }

    pub fn look_at(position: Vec3, target: Vec3) -> Self {
        let (yaw, pitch) = forward_to_yaw_pitch(target - position);
        Self::new(position, yaw, pitch)
    }

    pub fn with_projection(mut self, fov_y_deg: f32, near: f32, far: f32) -> Self {
        self.fov_y_deg = fov_y_deg;
        self.near = near;
        self.far = far;
        self
    }

    pub fn set_viewport(&mut self, width: u32, height: u32) {
        self.aspect = width.max(1) as f32 / height.max(1) as f32;
    }

    pub fn basis(&self) -> (Vec3, Vec3, Vec3) {
        camera_basis(self.yaw, self.pitch)
    }

    /// Ray through a pointer position in normalized device coordinates
    /// (`x` right, `y` up, both in `[-1, 1]`).
    pub fn ray_from_ndc(&self, ndc: Vec2) -> Ray {
        let (forward, right, up) = self.basis();
        let tan_half = (self.fov_y_deg.to_radians() * 0.5).tan();
        let direction =
            forward + right * (ndc.x * tan_half * self.aspect) + up * (ndc.y * tan_half);
        Ray {
            origin: self.position,
            direction: direction.normalize_or_zero(),
        }
    }
}

fn forward_to_yaw_pitch(forward: Vec3) -> (f32, f32) {
    let n = forward / forward.length().max(1e-6);
    let yaw = n.z.atan2(n.x);
    let pitch = n.y.clamp(-1.0, 1.0).asin();
    (yaw, pitch)
}

fn camera_basis(yaw: f32, pitch: f32) -> (Vec3, Vec3, Vec3) {
    let cos_pitch = pitch.cos();
    let forward = Vec3::new(yaw.cos() * cos_pitch, pitch.sin(), yaw.sin() * cos_pitch);
    let right = Vec3::new(-yaw.sin(), 0.0, yaw.cos());
    let up = right.cross(forward).normalize_or_zero();
    (forward, right, up)
}
