use glam::Vec2;

/// Axis-aligned walls around the origin.
///
/// The walls sit half a particle diameter inside the domain edge so a drawn
/// particle never overlaps the border.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Boundary {
    half_extent: Vec2,
    reflection_efficiency: f32,
}

impl Boundary {
    pub fn new(width: f32, height: f32, particle_diameter: f32, reflection_efficiency: f32) -> Self {
        Self {
            half_extent: (Vec2::new(width, height) - Vec2::splat(particle_diameter)) * 0.5,
            reflection_efficiency,
        }
    }

    /// Largest absolute coordinate a particle may hold on each axis.
    pub fn half_extent(&self) -> Vec2 {
        self.half_extent
    }

    pub fn reflection_efficiency(&self) -> f32 {
        self.reflection_efficiency
    }

    /// Clamp `position` onto the walls and reflect `velocity` on each axis
    /// that overshot. Returns true if either axis collided.
    pub fn resolve(&self, position: &mut Vec2, velocity: &mut Vec2) -> bool {
        let hit_x = resolve_axis(
            &mut position.x,
            &mut velocity.x,
            self.half_extent.x,
            self.reflection_efficiency,
        );
        let hit_y = resolve_axis(
            &mut position.y,
            &mut velocity.y,
            self.half_extent.y,
            self.reflection_efficiency,
        );
        hit_x || hit_y
    }
}

#[inline]
fn resolve_axis(pos: &mut f32, vel: &mut f32, bound: f32, efficiency: f32) -> bool {
    if pos.abs() <= bound {
        return false;
    }
    *pos = bound.copysign(*pos);
    *vel = -*vel * efficiency;
    true
}
