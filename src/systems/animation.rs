//! Animation system
//!
//! Runs once per frame:
//! - Delta time calculation
//! - Spin animation stepping
//! - Galaxy transform synchronization with the view rig

use std::time::Instant;
use earthsim_core::{Animation, GalaxyView, NodeKey, SceneGraph};
use crate::config::AnimationConfig;

/// Result of an animation update
pub struct AnimationResult {
    /// Seconds of animation time applied
    pub dt: f32,
    /// Number of spinning nodes turned
    pub spun: usize,
    /// Whether the galaxy transform was rewritten from the view
    pub view_synced: bool,
}

/// Manages the per-frame animation step
pub struct AnimationSystem {
    last_frame: Instant,
    time_scale: f32,
    max_frame_time: f32,
}

impl AnimationSystem {
    /// Create a new animation system
    ///
    /// A negative or non-finite frame time cap falls back to the default,
    /// as does a non-finite time scale.
    pub fn new(config: &AnimationConfig) -> Self {
        let defaults = AnimationConfig::default();
        let max_frame_time = if config.max_frame_time.is_finite() && config.max_frame_time >= 0.0 {
            config.max_frame_time
        } else {
            log::warn!(
                "Invalid animation.max_frame_time {}, using {}",
                config.max_frame_time,
                defaults.max_frame_time
            );
            defaults.max_frame_time
        };
        let time_scale = if config.time_scale.is_finite() {
            config.time_scale
        } else {
            log::warn!("Invalid animation.time_scale {}, using {}", config.time_scale, defaults.time_scale);
            defaults.time_scale
        };

        Self {
            last_frame: Instant::now(),
            time_scale,
            max_frame_time,
        }
    }

    /// Run one frame using the wall clock
    pub fn update(
        &mut self,
        graph: &mut SceneGraph,
        animation: &Animation,
        view: &mut GalaxyView,
        galaxy: NodeKey,
    ) -> AnimationResult {
        let now = Instant::now();
        let raw_dt = (now - self.last_frame).as_secs_f32();
        self.last_frame = now;
        self.step(graph, animation, view, galaxy, raw_dt)
    }

    /// Run one frame with an explicit elapsed time
    ///
    /// The elapsed time is capped so a stall (first frame, window drag)
    /// does not jump the bodies, then scaled.
    pub fn step(
        &mut self,
        graph: &mut SceneGraph,
        animation: &Animation,
        view: &mut GalaxyView,
        galaxy: NodeKey,
        raw_dt: f32,
    ) -> AnimationResult {
        let dt = raw_dt.max(0.0).min(self.max_frame_time) * self.time_scale;
        let spun = animation.update(graph, dt);

        let view_synced = view.take_changed();
        if view_synced {
            graph.set_transform(galaxy, view.transform());
        }

        AnimationResult { dt, spun, view_synced }
    }

    /// Forget the time spent paused or minimized
    pub fn reset_clock(&mut self) {
        self.last_frame = Instant::now();
    }
}

impl Default for AnimationSystem {
    fn default() -> Self {
        Self::new(&AnimationConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::SceneBuilder;
    use earthsim_core::Scene;
    use earthsim_input::ViewControl;

    fn scene() -> crate::scene::BuiltScene {
        SceneBuilder::from_scene(&Scene::earth_moon(), GalaxyView::default()).build()
    }

    #[test]
    fn test_delta_time_capped() {
        let mut s = scene();
        let mut system = AnimationSystem::default();
        let result = system.step(&mut s.graph, &s.animation, &mut s.view, s.galaxy, 3.0);
        assert_eq!(result.dt, 0.25);
        assert_eq!(result.spun, 2);
    }

    #[test]
    fn test_invalid_frame_cap_uses_default() {
        let mut s = scene();
        for cap in [-0.1, f32::NAN, f32::INFINITY] {
            let config = AnimationConfig { max_frame_time: cap, ..AnimationConfig::default() };
            let mut system = AnimationSystem::new(&config);
            let result = system.step(&mut s.graph, &s.animation, &mut s.view, s.galaxy, 0.016);
            assert!((result.dt - 0.016).abs() < 1e-6, "cap {} gave dt {}", cap, result.dt);

            let result = system.step(&mut s.graph, &s.animation, &mut s.view, s.galaxy, 5.0);
            assert_eq!(result.dt, 0.25);
        }
    }

    #[test]
    fn test_negative_elapsed_time_is_ignored() {
        let mut s = scene();
        let mut system = AnimationSystem::default();
        let result = system.step(&mut s.graph, &s.animation, &mut s.view, s.galaxy, -1.0);
        assert_eq!(result.dt, 0.0);
        assert_eq!(result.spun, 0);
    }

    #[test]
    fn test_time_scale() {
        let mut s = scene();
        let config = AnimationConfig { time_scale: 2.0, ..AnimationConfig::default() };
        let mut system = AnimationSystem::new(&config);
        let result = system.step(&mut s.graph, &s.animation, &mut s.view, s.galaxy, 0.1);
        assert!((result.dt - 0.2).abs() < 1e-6);

        let (earth, _) = s.graph.find_by_name("earth").unwrap();
        let spin = s.graph.get(earth).unwrap().transform.spin_deg;
        assert!((spin - 1.2 * 0.2).abs() < 1e-5);
    }

    #[test]
    fn test_view_synced_once() {
        let mut s = scene();
        let mut system = AnimationSystem::default();
        // The builder already applied the initial view
        s.view.take_changed();

        s.view.set_depth(300.0);
        let first = system.step(&mut s.graph, &s.animation, &mut s.view, s.galaxy, 0.0);
        assert!(first.view_synced);
        assert_eq!(s.graph.world_position(s.galaxy).unwrap().z, 300.0);

        let second = system.step(&mut s.graph, &s.animation, &mut s.view, s.galaxy, 0.0);
        assert!(!second.view_synced);
    }

    #[test]
    fn test_paused_does_not_spin() {
        let mut s = SceneBuilder::from_scene(&Scene::earth_moon(), GalaxyView::default())
            .with_animation_paused(true)
            .build();
        let mut system = AnimationSystem::default();
        let result = system.step(&mut s.graph, &s.animation, &mut s.view, s.galaxy, 0.1);
        assert_eq!(result.spun, 0);
    }
}
