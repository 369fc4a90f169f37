use anyhow::Context;

use dragboard_engine::logging::{init_logging, LoggingConfig};
use dragboard_scene::{Application, Circle, Color, Rectangle, SceneConfig, Shape};

fn main() -> anyhow::Result<()> {
    // wgpu is chatty at info; RUST_LOG still overrides everything.
    let logging = std::env::var("RUST_LOG")
        .map(LoggingConfig::with_filter)
        .unwrap_or_else(|_| LoggingConfig::with_filter("info,wgpu_core=warn,wgpu_hal=warn"));
    init_logging(logging);

    let config = SceneConfig::default().with_background("#1f1f1f")?;

    Application::new()
        .title("Dragboard")
        .size(900.0, 760.0)
        .font(load_font())
        .scene_config(config)
        .run(|scene| {
            scene.add_shape(Shape::new(
                Color::parse("red")?,
                Rectangle::new((40.0, 40.0), (200.0, 200.0)).with_text("Red Rectangle"),
            ));

            let green = scene.add_shape(Shape::new(
                Color::parse("green ")?,
                Rectangle::new((200.0, 140.0), (400.0, 300.0)),
            ));
            scene
                .shape_mut(green)
                .and_then(Shape::as_rectangle_mut)
                .context("green rectangle missing after add")?
                .set_text("Now I can set text!");

            scene.add_shape(Shape::new(Color::parse("blue")?, Circle::new((100.0, 300.0), 80.0)));

            log::info!("press Escape to quit");
            Ok(())
        })
}

fn load_font() -> Vec<u8> {
    let bytes = [
        "/usr/share/fonts/TTF/DejaVuSans.ttf",
        "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
        "/usr/share/fonts/dejavu/DejaVuSans.ttf",
        "/usr/share/fonts/noto/NotoSans-Regular.ttf",
        "/usr/share/fonts/truetype/noto/NotoSans-Regular.ttf",
    ]
    .iter()
    .find_map(|p| std::fs::read(p).ok())
    .unwrap_or_default();

    if bytes.is_empty() {
        log::warn!("no system font found; rectangle labels will not be drawn");
    }
    bytes
}
