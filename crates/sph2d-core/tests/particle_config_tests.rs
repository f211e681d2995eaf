use glam::Vec2;
use sph2d_core::grid::MAX_CELLS;
use sph2d_core::particle::ParticleSet;
use sph2d_core::{ConfigError, FluidConfig, SimulationSpace, Solver};

#[test]
fn test_config_default_values() {
    let config = FluidConfig::default();

    assert_eq!(config.boundary_width, 900.0);
    assert_eq!(config.boundary_height, 900.0);
    assert_eq!(config.cells_per_axis, 10);
    assert_eq!(config.smoothing_radius, 90.0);
    assert_eq!(config.reflection_efficiency, 0.2);
    assert_eq!(config.particle_diameter, 4.0);
    assert_eq!(config.target_density, 1000.0);
    assert_eq!(config.pressure_multiplier, 10000.0);
    assert_eq!(config.friction, 1.0);
    assert_eq!(config.gravity, 1000.0);
    assert_eq!(config.speed, 1.0);
    assert_eq!(config.particle_capacity, 700);
    assert_eq!(config.seed, 0);
    assert_eq!(config.cell_size(), 90.0);
    assert_eq!(config.validate(), Ok(()));
}

#[test]
fn test_smoothing_radius_must_fit_cell() {
    let config = FluidConfig {
        smoothing_radius: 90.5,
        ..FluidConfig::default()
    };
    assert_eq!(
        config.validate(),
        Err(ConfigError::SmoothingRadius {
            radius: 90.5,
            cell_size: 90.0
        })
    );

    // Finer grid shrinks the cell below the default radius
    let config = FluidConfig {
        cells_per_axis: 20,
        ..FluidConfig::default()
    };
    assert!(matches!(
        config.validate(),
        Err(ConfigError::SmoothingRadius { .. })
    ));

    let config = FluidConfig {
        smoothing_radius: 0.0,
        ..FluidConfig::default()
    };
    assert!(matches!(
        config.validate(),
        Err(ConfigError::SmoothingRadius { .. })
    ));
}

#[test]
fn test_invalid_configs_are_rejected() {
    let base = FluidConfig::default();

    let no_cells = FluidConfig {
        cells_per_axis: 0,
        ..base.clone()
    };
    assert_eq!(no_cells.validate(), Err(ConfigError::NoCells));

    let flat = FluidConfig {
        boundary_height: 0.0,
        ..base.clone()
    };
    assert!(matches!(flat.validate(), Err(ConfigError::InvalidDomain { .. })));

    let huge_particle = FluidConfig {
        particle_diameter: 900.0,
        ..base.clone()
    };
    assert!(matches!(
        huge_particle.validate(),
        Err(ConfigError::ParticleTooLarge { .. })
    ));

    let bouncy = FluidConfig {
        reflection_efficiency: 1.5,
        ..base.clone()
    };
    assert_eq!(bouncy.validate(), Err(ConfigError::ReflectionEfficiency(1.5)));

    let nan_gravity = FluidConfig {
        gravity: f32::NAN,
        ..base.clone()
    };
    assert!(matches!(
        nan_gravity.validate(),
        Err(ConfigError::NonFinite { name: "gravity", .. })
    ));

    assert!(Solver::new(no_cells).is_err());
    assert!(SimulationSpace::new(&bouncy).is_err());
}

#[test]
fn test_oversized_grid_is_rejected() {
    let fine = FluidConfig {
        cells_per_axis: 70_000,
        smoothing_radius: 0.01,
        ..FluidConfig::default()
    };
    assert!(matches!(
        fine.validate(),
        Err(ConfigError::TooManyCells { columns: 70_000, max: MAX_CELLS, .. })
    ));
    assert!(Solver::new(fine).is_err());

    // A tall, narrow domain needs many rows even with one column
    let tall = FluidConfig {
        boundary_width: 10.0,
        boundary_height: 1.0e9,
        cells_per_axis: 1,
        smoothing_radius: 5.0,
        ..FluidConfig::default()
    };
    assert!(matches!(
        tall.validate(),
        Err(ConfigError::TooManyCells { columns: 1, .. })
    ));

    let at_limit = FluidConfig {
        cells_per_axis: 2048,
        smoothing_radius: 0.4,
        ..FluidConfig::default()
    };
    assert_eq!(2048 * 2048, MAX_CELLS);
    assert_eq!(at_limit.validate(), Ok(()));
}

#[test]
fn test_config_error_messages() {
    let err = ConfigError::SmoothingRadius {
        radius: 100.0,
        cell_size: 90.0,
    };
    assert_eq!(
        err.to_string(),
        "smoothing radius 100 must be in (0, 90] (the cell size)"
    );
}

#[test]
fn test_particle_set_starts_empty() {
    let particles = ParticleSet::with_capacity(16);
    assert_eq!(particles.len(), 0);
    assert!(particles.is_empty());
    assert_eq!(particles.slot_count(), 0);
    assert_eq!(particles.live_slots().count(), 0);
}

#[test]
fn test_spawned_particle_initial_state() {
    let mut solver = Solver::new(FluidConfig::default()).unwrap();
    let id = solver
        .spawn_particle(Vec2::new(3.0, -4.0), Vec2::new(1.0, 2.0), 1.5)
        .unwrap();
    let p = solver.particle(id).unwrap();

    assert_eq!(p.position, Vec2::new(3.0, -4.0));
    assert_eq!(p.predicted, p.position, "prediction starts at the position");
    assert_eq!(p.velocity, Vec2::new(1.0, 2.0));
    assert_eq!(p.mass, 1.5);
    assert_eq!(p.density, 0.0);
}
