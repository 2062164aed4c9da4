#[cfg(feature = "cli")]
pub mod cli;
pub mod config;
pub mod connector;
pub mod drag;
pub mod engine;
pub mod hierarchy;
pub mod layout;
pub mod measure;
pub mod render;
pub mod scene;
pub mod scene_dump;
pub mod service;
pub mod text_metrics;
pub mod theme;
pub mod tree;
pub mod viewport;

#[cfg(feature = "cli")]
pub use cli::run;
pub use config::Config;
pub use engine::Controller;
pub use scene::Scene;

use anyhow::Result;

/// Turns a raw text payload into the finished interactive document: build
/// the tree, lay out and connect the scene, fit it to the configured view,
/// render. The document embeds the fitted geometry, so it is complete
/// before any script runs in the browser.
pub fn generate(payload: &str, config: &Config) -> Result<String> {
    let tree = hierarchy::build_tree(payload)?;
    let scene = Scene::build(&tree, config);
    let controller = Controller::new(
        scene,
        config.viewport.clone(),
        config.render.width,
        config.render.height,
    );
    render::render_document(controller.scene(), config)
}
