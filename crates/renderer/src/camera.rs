use glam::{Mat4, Vec3};

use crate::types::Viewport;

/// How the camera reacts to user input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlMode {
    /// Fixed placement.
    Static,
    /// Orbit-style controls; interaction wiring is reserved for later.
    Orbit,
}

/// Construction parameters for the projection camera.
#[derive(Debug, Clone, Copy)]
pub struct CameraSettings {
    pub controls: ControlMode,
    pub fov_y_degrees: f32,
    pub near: f32,
    pub far: f32,
    pub position: Vec3,
    pub target: Vec3,
}

impl Default for CameraSettings {
    fn default() -> Self {
        Self {
            controls: ControlMode::Orbit,
            fov_y_degrees: 35.0,
            near: 0.1,
            far: 100.0,
            position: Vec3::new(0.0, 0.0, 8.0),
            target: Vec3::ZERO,
        }
    }
}

/// Perspective projection camera for the scene pass.
#[derive(Debug)]
pub struct Camera {
    settings: CameraSettings,
    aspect: f32,
    projection: Mat4,
    view: Mat4,
}

impl Camera {
    pub fn new(settings: CameraSettings, viewport: &Viewport) -> Self {
        let mut camera = Self {
            settings,
            aspect: 1.0,
            projection: Mat4::IDENTITY,
            view: Mat4::look_at_rh(settings.position, settings.target, Vec3::Y),
        };
        camera.resize(viewport);
        camera
    }

    /// Recomputes the projection from the current viewport aspect ratio.
    pub fn resize(&mut self, viewport: &Viewport) {
        self.aspect = viewport.aspect();
        self.projection = Mat4::perspective_rh(
            self.settings.fov_y_degrees.to_radians(),
            self.aspect,
            self.settings.near,
            self.settings.far,
        );
    }

    /// Per-tick hook reserved for interactive controls.
    pub fn update(&mut self) {
        match self.settings.controls {
            ControlMode::Orbit | ControlMode::Static => {}
        }
    }

    pub fn aspect(&self) -> f32 {
        self.aspect
    }

    pub fn view_projection(&self) -> Mat4 {
        self.projection * self.view
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resize_recomputes_the_aspect_ratio() {
        let mut camera = Camera::new(CameraSettings::default(), &Viewport::new(800, 600, 1.0));
        assert!((camera.aspect() - 800.0 / 600.0).abs() < f32::EPSILON);

        camera.resize(&Viewport::new(1920, 1080, 1.0));
        assert!((camera.aspect() - 1920.0 / 1080.0).abs() < f32::EPSILON);
    }

    #[test]
    fn update_leaves_the_matrices_untouched() {
        let mut camera = Camera::new(CameraSettings::default(), &Viewport::new(640, 480, 1.0));
        let before = camera.view_projection();
        camera.update();
        assert_eq!(before, camera.view_projection());
    }
}
