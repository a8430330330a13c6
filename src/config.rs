//! Configuration constants and settings for the hero backdrop
//!
//! This module contains all tunable parameters: the default viewport, the
//! frame rate of the render loop, scene dimensions, animation speeds and
//! encoding settings.

/// Viewport width used until the host reports its real size
pub const DEFAULT_VIEWPORT_WIDTH: u32 = 800;

/// Viewport height used until the host reports its real size
pub const DEFAULT_VIEWPORT_HEIGHT: u32 = 600;

/// Target frames per second for the Bevy render loop (display refresh)
pub const TARGET_FPS: f64 = 60.0;

/// Camera settings
pub mod camera {
    /// Vertical field of view in degrees
    pub const FOV_DEGREES: f32 = 75.0;

    /// Near clipping plane
    pub const NEAR: f32 = 0.1;

    /// Far clipping plane
    pub const FAR: f32 = 1000.0;

    /// Resting distance from the origin along +z
    pub const DISTANCE: f32 = 5.0;

    /// Pointer-to-target scale: target = pointer * FOLLOW_RANGE
    pub const FOLLOW_RANGE: f32 = 0.5;

    /// Fraction of the remaining distance covered per frame
    pub const FOLLOW_EASING: f32 = 0.05;
}

/// Decorative object settings
pub mod scene {
    /// Accent colour shared by every decorative object (#5378f6)
    pub const ACCENT_RGB: [u8; 3] = [0x53, 0x78, 0xf6];

    /// Circumradius of the wireframe dodecahedron
    pub const POLYHEDRON_RADIUS: f32 = 1.5;

    /// Opacity of the wireframe dodecahedron
    pub const POLYHEDRON_OPACITY: f32 = 0.6;

    /// Number of points in the particle field
    pub const PARTICLE_COUNT: usize = 3000;

    /// Edge length of the cube the particles are scattered in
    pub const PARTICLE_SPREAD: f32 = 25.0;

    /// Rendered size of a single particle
    pub const PARTICLE_SIZE: f32 = 0.04;

    /// Opacity of the particle field
    pub const PARTICLE_OPACITY: f32 = 0.7;

    /// Edge length of the square line grid
    pub const GRID_SIZE: f32 = 10.0;

    /// Subdivisions per grid axis
    pub const GRID_SEGMENTS: u32 = 20;

    /// Opacity of the line grid
    pub const GRID_OPACITY: f32 = 0.3;

    /// Grid offset along z (behind the polyhedron)
    pub const GRID_DEPTH: f32 = -5.0;

    /// Ambient light colour (#222222)
    pub const AMBIENT_RGB: [u8; 3] = [0x22, 0x22, 0x22];

    /// Ambient light brightness
    pub const AMBIENT_BRIGHTNESS: f32 = 80.0;

    /// Directional light colour (#404040)
    pub const DIRECTIONAL_RGB: [u8; 3] = [0x40, 0x40, 0x40];

    /// Directional light illuminance (weak)
    pub const DIRECTIONAL_ILLUMINANCE: f32 = 500.0;
}

/// Per-frame animation increments
///
/// These are fixed per-frame deltas, so the animation speed follows the
/// frame rate rather than elapsed time.
pub mod animation {
    /// Polyhedron rotation about x and y per frame (radians)
    pub const POLYHEDRON_SPIN: f32 = 0.001;

    /// Particle field rotation about y per frame (radians)
    pub const PARTICLE_SPIN: f32 = 0.0001;

    /// Line grid rotation about y per frame (radians)
    pub const GRID_SPIN: f32 = 0.00005;

    /// Ripple clock scale applied to elapsed milliseconds
    pub const RIPPLE_TIME_SCALE: f64 = 0.0001;

    /// Spatial frequency of the ripple
    pub const RIPPLE_FREQUENCY: f32 = 0.5;

    /// Amplitude of each ripple term
    pub const RIPPLE_AMPLITUDE: f32 = 0.2;
}

/// Statistics and logging settings
pub mod performance {
    /// Interval for logging frame statistics (seconds)
    pub const STATS_LOG_INTERVAL: f64 = 2.0;
}

/// Image compression settings
pub mod compression {
    /// JPEG quality level (0-100, higher = better quality but larger size)
    pub const JPEG_QUALITY: u8 = 85;
}
