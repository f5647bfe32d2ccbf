//! Replays a JSON gesture script through an annotator and saves the frame
//!
//! Usage: `chartmarks <script.json> [out.png]`

use std::cell::RefCell;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use anyhow::{Context, Result, bail};
use chrono::{DateTime, Utc};
use image::RgbaImage;
use serde::Deserialize;

use chartmarks::{
    Annotator, AnnotatorConfig, AnnotatorEvent, ChartHost, DrawingObject, FixedSurface,
    LinearChart, PALETTE, RenderPass, SurfaceSize, Tool,
};

#[derive(Debug, Deserialize)]
struct PriceScale {
    top: f64,
    bottom: f64,
}

#[derive(Debug, Deserialize)]
struct TimeScale {
    /// RFC 3339 timestamp at x = 0
    start: String,
    seconds_per_pixel: f64,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "op", rename_all = "camelCase")]
enum Step {
    Tool { tool: Tool },
    Color { index: usize },
    LineWidth { width: f32 },
    Down { x: f32, y: f32 },
    Move { x: f32, y: f32 },
    Up { x: f32, y: f32 },
    Leave,
    Clear,
}

#[derive(Debug, Deserialize)]
struct Script {
    width: f32,
    height: f32,
    #[serde(default)]
    price_scale: Option<PriceScale>,
    #[serde(default)]
    time_scale: Option<TimeScale>,
    /// Overrides the user's saved configuration
    #[serde(default)]
    config: Option<AnnotatorConfig>,
    steps: Vec<Step>,
}

impl Script {
    fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read script {}", path.display()))?;
        serde_json::from_str(&text)
            .with_context(|| format!("Failed to parse script {}", path.display()))
    }

    fn host(&self) -> Result<Box<dyn ChartHost>> {
        let size = SurfaceSize::new(self.width, self.height);
        match (&self.price_scale, &self.time_scale) {
            (None, None) => Ok(Box::new(FixedSurface(size))),
            (Some(price), Some(time)) => {
                let time_start = DateTime::parse_from_rfc3339(&time.start)
                    .with_context(|| format!("Invalid time_scale.start {:?}", time.start))?
                    .with_timezone(&Utc);
                Ok(Box::new(LinearChart {
                    size,
                    price_top: price.top,
                    price_bottom: price.bottom,
                    time_start,
                    seconds_per_pixel: time.seconds_per_pixel,
                }))
            }
            _ => bail!("price_scale and time_scale must be given together"),
        }
    }
}

/// Outcome of replaying a script
struct Replay {
    completed: Vec<DrawingObject>,
    labels: Vec<String>,
    frame: RgbaImage,
}

fn replay(script: &Script, config: AnnotatorConfig) -> Result<Replay> {
    let host = script.host()?;

    let completed = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&completed);
    let mut annotator = Annotator::new(config).with_listener(move |event| match event {
        AnnotatorEvent::DrawingCompleted(drawing) => {
            log::info!(
                "Completed {} {} at {:?}",
                drawing.shape,
                drawing.id,
                drawing.points
            );
            sink.borrow_mut().push(drawing.clone());
        }
        AnnotatorEvent::Cleared => log::info!("Cleared all drawings"),
    });

    for step in &script.steps {
        match *step {
            Step::Tool { tool } => annotator.set_active_tool(tool),
            Step::Color { index } => annotator.set_color(PALETTE[index % PALETTE.len()]),
            Step::LineWidth { width } => annotator.set_line_width(width),
            Step::Down { x, y } => annotator.pointer_down(x, y),
            Step::Move { x, y } => annotator.pointer_move(x, y),
            Step::Up { x, y } => annotator.pointer_up(x, y),
            Step::Leave => annotator.pointer_leave(),
            Step::Clear => annotator.clear_all(),
        }
    }

    let scene = RenderPass::scene(&annotator, host.as_ref());
    let labels = scene.labels().map(|(_, text)| text.to_string()).collect();

    let mut pass = RenderPass::default();
    let frame = pass
        .render(&annotator, host.as_ref())
        .cloned()
        .context("Script surface is empty")?;

    let completed = completed.borrow().clone();
    Ok(Replay {
        completed,
        labels,
        frame,
    })
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let mut args = std::env::args_os().skip(1);
    let Some(script_path) = args.next().map(PathBuf::from) else {
        bail!("usage: chartmarks <script.json> [out.png]");
    };
    let out = args
        .next()
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("out.png"));

    let script = Script::load(&script_path)?;
    let config = script.config.clone().unwrap_or_else(AnnotatorConfig::load);
    let result = replay(&script, config)?;

    for text in &result.labels {
        log::info!("Label: {text}");
    }
    result
        .frame
        .save(&out)
        .with_context(|| format!("Failed to write {}", out.display()))?;
    log::info!(
        "Replayed {} drawings into {}",
        result.completed.len(),
        out.display()
    );
    Ok(())
}
