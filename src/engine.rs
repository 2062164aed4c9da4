use crate::config::ViewportConfig;
use crate::drag::DragGesture;
use crate::scene::Scene;
use crate::viewport::PanGesture;

enum Interaction {
    Idle,
    Panning(PanGesture),
    Dragging(DragGesture),
}

/// Single owner of a scene and its interaction state. Drives the whole
/// event loop: pointer events, wheel, zoom buttons, fit, resize. All
/// handlers run to completion; a position write always lands before the
/// connector refresh that reads it.
pub struct Controller {
    scene: Scene,
    viewport_config: ViewportConfig,
    view_width: f32,
    view_height: f32,
    interaction: Interaction,
}

impl Controller {
    /// Takes ownership of the scene and immediately fits it to the view.
    pub fn new(scene: Scene, viewport_config: ViewportConfig, view_width: f32, view_height: f32) -> Self {
        let mut controller = Self {
            scene,
            viewport_config,
            view_width,
            view_height,
            interaction: Interaction::Idle,
        };
        controller.fit();
        controller
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn into_scene(self) -> Scene {
        self.scene
    }

    /// Screen-space pointer down. A non-root node starts a drag, the
    /// background starts a pan, the root does nothing.
    pub fn pointer_down(&mut self, x: f32, y: f32) {
        let (canvas_x, canvas_y) = self.scene.viewport.to_canvas(x, y);
        self.interaction = match self.scene.hit_test(canvas_x, canvas_y) {
            Some(id) => {
                match DragGesture::begin(
                    id,
                    &self.scene.root_id,
                    &self.scene.positions,
                    &self.scene.viewport,
                    x,
                    y,
                ) {
                    Some(gesture) => Interaction::Dragging(gesture),
                    None => Interaction::Idle,
                }
            }
            None => Interaction::Panning(PanGesture::begin(&self.scene.viewport, x, y)),
        };
    }

    pub fn pointer_move(&mut self, x: f32, y: f32) {
        match &self.interaction {
            Interaction::Idle => {}
            Interaction::Panning(gesture) => {
                gesture.update(&mut self.scene.viewport, x, y);
            }
            Interaction::Dragging(gesture) => {
                gesture.update(
                    x,
                    y,
                    &self.scene.viewport,
                    &self.scene.adjacency,
                    &mut self.scene.positions,
                    &self.scene.sizes,
                    &mut self.scene.connectors,
                );
            }
        }
    }

    /// Ends whatever gesture is active; the last state is final.
    pub fn pointer_up(&mut self) {
        self.interaction = Interaction::Idle;
    }

    pub fn wheel(&mut self, delta_y: f32) {
        self.scene.viewport.wheel(delta_y, &self.viewport_config);
    }

    pub fn zoom_in(&mut self) {
        self.scene.viewport.zoom_in(&self.viewport_config);
    }

    pub fn zoom_out(&mut self) {
        self.scene.viewport.zoom_out(&self.viewport_config);
    }

    pub fn fit(&mut self) {
        let bounds = self.scene.bounds();
        self.scene.viewport.fit_to_screen(
            bounds,
            self.view_width,
            self.view_height,
            &self.viewport_config,
        );
    }

    pub fn resize(&mut self, view_width: f32, view_height: f32) {
        self.view_width = view_width;
        self.view_height = view_height;
        self.fit();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::tree::{MapNode, MapTree};

    fn controller() -> Controller {
        let mut a = MapNode::new("a", "First branch");
        a.children.push(MapNode::new("a1", "Leaf"));
        let mut root = MapNode::new("root", "Topic");
        root.children.push(a);
        root.children.push(MapNode::new("b", "Second branch"));
        let tree = MapTree {
            title: "Topic".to_string(),
            root,
        };
        let config = Config::default();
        let scene = Scene::build(&tree, &config);
        Controller::new(scene, config.viewport, 1200.0, 800.0)
    }

    fn screen_point_on(controller: &Controller, id: &str) -> (f32, f32) {
        let scene = controller.scene();
        let pos = scene.positions[id];
        let size = scene.sizes[id];
        scene
            .viewport
            .to_screen(pos.x + size.width / 2.0, pos.y + size.height / 2.0)
    }

    #[test]
    fn construction_fits_the_map_into_view() {
        let controller = controller();
        let scene = controller.scene();
        let bounds = scene.bounds().unwrap();
        for (x, y) in [
            (bounds.min_x, bounds.min_y),
            (bounds.max_x, bounds.max_y),
        ] {
            let (sx, sy) = scene.viewport.to_screen(x, y);
            assert!((0.0..=1200.0).contains(&sx));
            assert!((0.0..=800.0).contains(&sy));
        }
    }

    #[test]
    fn background_press_pans_one_to_one() {
        let mut controller = controller();
        let before = controller.scene().viewport;
        controller.pointer_down(5.0, 5.0);
        controller.pointer_move(45.0, 30.0);
        let after = controller.scene().viewport;
        assert_eq!(after.pan_x - before.pan_x, 40.0);
        assert_eq!(after.pan_y - before.pan_y, 25.0);
        assert_eq!(after.scale, before.scale);
        controller.pointer_up();
        controller.pointer_move(500.0, 500.0);
        assert_eq!(controller.scene().viewport, after, "released gesture is dead");
    }

    #[test]
    fn node_press_drags_without_panning() {
        let mut controller = controller();
        let (sx, sy) = screen_point_on(&controller, "b");
        let pan_before = (
            controller.scene().viewport.pan_x,
            controller.scene().viewport.pan_y,
        );
        let pos_before = controller.scene().positions["b"];
        controller.pointer_down(sx, sy);
        controller.pointer_move(sx + 60.0, sy - 40.0);
        controller.pointer_up();
        let scene = controller.scene();
        assert_ne!(scene.positions["b"], pos_before);
        assert_eq!((scene.viewport.pan_x, scene.viewport.pan_y), pan_before);
    }

    #[test]
    fn root_press_is_inert() {
        let mut controller = controller();
        let (sx, sy) = screen_point_on(&controller, "root");
        let scene_before = (
            controller.scene().positions.clone(),
            controller.scene().viewport,
        );
        controller.pointer_down(sx, sy);
        controller.pointer_move(sx + 100.0, sy + 100.0);
        controller.pointer_up();
        assert_eq!(controller.scene().positions, scene_before.0);
        assert_eq!(controller.scene().viewport, scene_before.1);
    }

    #[test]
    fn zoom_controls_respect_the_clamp() {
        let mut controller = controller();
        for _ in 0..50 {
            controller.zoom_in();
        }
        assert_eq!(controller.scene().viewport.scale, 3.0);
        for _ in 0..100 {
            controller.wheel(120.0);
        }
        assert_eq!(controller.scene().viewport.scale, 0.1);
    }

    #[test]
    fn resize_refits_to_the_new_view() {
        let mut controller = controller();
        let before = controller.scene().viewport;
        controller.resize(600.0, 400.0);
        let after = controller.scene().viewport;
        assert_ne!(before, after);
        let bounds = controller.scene().bounds().unwrap();
        let (sx, sy) = after.to_screen(bounds.max_x, bounds.max_y);
        assert!(sx <= 600.0 && sy <= 400.0);
    }

    #[test]
    fn drag_survives_a_mid_gesture_zoom() {
        let mut controller = controller();
        let (sx, sy) = screen_point_on(&controller, "a");
        controller.pointer_down(sx, sy);
        controller.pointer_move(sx + 10.0, sy);
        controller.zoom_in();
        controller.pointer_move(sx + 20.0, sy);
        controller.pointer_up();
        // No panic and the node still has a finite position.
        let pos = controller.scene().positions["a"];
        assert!(pos.x.is_finite() && pos.y.is_finite());
    }
}
