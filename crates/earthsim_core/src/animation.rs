//! Per-frame spin animation
//!
//! Each track turns one node's spin angle at a constant rate. Rates are in
//! degrees per second so the motion is independent of frame rate.

use crate::{NodeKey, SceneGraph};

/// A constant-rate spin applied to one node
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SpinTrack {
    pub node: NodeKey,
    pub degrees_per_second: f32,
}

/// The set of running spin tracks
#[derive(Clone, Debug, Default)]
pub struct Animation {
    tracks: Vec<SpinTrack>,
    paused: bool,
}

impl Animation {
    /// Create an empty, running animation
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a spin track
    pub fn add_track(&mut self, node: NodeKey, degrees_per_second: f32) {
        self.tracks.push(SpinTrack { node, degrees_per_second });
    }

    /// Builder: start paused or running
    pub fn with_paused(mut self, paused: bool) -> Self {
        self.paused = paused;
        self
    }

    /// All tracks
    pub fn tracks(&self) -> &[SpinTrack] {
        &self.tracks
    }

    /// Advance every track by `dt` seconds
    ///
    /// Tracks whose node no longer exists are skipped. Returns the number of
    /// nodes that were turned.
    pub fn update(&self, graph: &mut SceneGraph, dt: f32) -> usize {
        if self.paused || dt <= 0.0 {
            return 0;
        }

        let mut turned = 0;
        for track in &self.tracks {
            let delta = track.degrees_per_second * dt;
            if graph.update_transform(track.node, |t| t.spin_by(delta)) {
                turned += 1;
            } else {
                log::debug!("Skipping spin track for missing node {:?}", track.node);
            }
        }
        turned
    }

    /// Toggle pause, returning the new paused state
    pub fn toggle_pause(&mut self) -> bool {
        self.paused = !self.paused;
        self.paused
    }

    /// Check if the animation is paused
    pub fn is_paused(&self) -> bool {
        self.paused
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{DirtyFlags, Material, Node};

    fn setup() -> (SceneGraph, NodeKey, NodeKey) {
        let mut graph = SceneGraph::new();
        let earth = graph.add_root(Node::sphere(200.0, 16, Material::default()));
        let moon = graph.add_root(Node::sphere(30.0, 16, Material::default()));
        graph.clear_all_dirty();
        (graph, earth, moon)
    }

    fn spin(graph: &SceneGraph, key: NodeKey) -> f32 {
        graph.get(key).unwrap().transform.spin_deg
    }

    #[test]
    fn test_update_spins_at_rate() {
        let (mut graph, earth, moon) = setup();
        let mut anim = Animation::new();
        anim.add_track(earth, 1.2);
        anim.add_track(moon, 6.0);

        assert_eq!(anim.update(&mut graph, 0.5), 2);
        assert!((spin(&graph, earth) - 0.6).abs() < 1e-5);
        assert!((spin(&graph, moon) - 3.0).abs() < 1e-5);
        assert!(graph.get(earth).unwrap().dirty_flags().contains(DirtyFlags::TRANSFORM));
    }

    #[test]
    fn test_sixty_frames_match_one_second() {
        let (mut graph, earth, _) = setup();
        let mut anim = Animation::new();
        anim.add_track(earth, 6.0);

        for _ in 0..60 {
            anim.update(&mut graph, 1.0 / 60.0);
        }
        assert!((spin(&graph, earth) - 6.0).abs() < 1e-3);
    }

    #[test]
    fn test_paused_does_nothing() {
        let (mut graph, earth, _) = setup();
        let mut anim = Animation::new().with_paused(true);
        anim.add_track(earth, 10.0);

        assert_eq!(anim.update(&mut graph, 1.0), 0);
        assert_eq!(spin(&graph, earth), 0.0);
        assert!(!graph.has_dirty_nodes());

        assert!(!anim.toggle_pause());
        assert_eq!(anim.update(&mut graph, 1.0), 1);
        assert_eq!(spin(&graph, earth), 10.0);
    }

    #[test]
    fn test_missing_nodes_skipped() {
        let (mut graph, earth, moon) = setup();
        let mut anim = Animation::new();
        anim.add_track(earth, 1.0);
        anim.add_track(moon, 1.0);
        graph.remove(moon);

        assert_eq!(anim.update(&mut graph, 1.0), 1);
        assert!((spin(&graph, earth) - 1.0).abs() < 1e-5);
        assert_eq!(anim.tracks().len(), 2);
    }

    #[test]
    fn test_non_positive_dt_ignored() {
        let (mut graph, earth, _) = setup();
        let mut anim = Animation::new();
        anim.add_track(earth, 1.0);

        assert_eq!(anim.update(&mut graph, 0.0), 0);
        assert_eq!(anim.update(&mut graph, -1.0), 0);
        assert_eq!(spin(&graph, earth), 0.0);
    }
}
