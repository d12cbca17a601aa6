//! Renders one frame of a synthetic scene into the recording context and
//! prints the resulting GL command trace.

use std::cell::RefCell;
use std::path::PathBuf;
use std::rc::Rc;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use glam::{Mat4, Vec3};
use rand::rngs::StdRng;
use rand::SeedableRng;

use povi_engine::colormap::{CategoricalColorMap, GradientColorMap};
use povi_engine::core::Scene;
use povi_engine::device::{GlCall, RecordingContext};
use povi_engine::geometry::GeometryCollection;
use povi_engine::logging::{init_logging, LoggingConfig};
use povi_engine::names::AttributeName;
use povi_engine::render::{CrosshairPainter, FrameMatrices, Painter, PainterConfig};
use povi_engine::shader::{DirectoryLoader, MemoryLoader, ShaderSourceLoader};

#[derive(Debug, Copy, Clone, ValueEnum)]
enum GeometryArg {
    Points,
    Triangles,
    LineStrings,
    LinearRings,
}

#[derive(Debug, Copy, Clone, ValueEnum)]
enum ColorMapArg {
    None,
    Gradient,
    Categorical,
}

#[derive(Debug, Parser)]
#[command(name = "povi-trace", about = "Print the GL calls issued for one povi frame")]
struct TraceArgs {
    /// Directory with basic.vert, basic.frag, crosshair.vert and crosshair.frag.
    /// The bundled shaders are used when omitted.
    #[arg(long)]
    shaders: Option<PathBuf>,

    #[arg(long, value_enum, default_value_t = GeometryArg::LineStrings)]
    geometry: GeometryArg,

    /// Number of geometry elements to generate.
    #[arg(long, default_value_t = 3)]
    count: usize,

    #[arg(long, value_enum, default_value_t = ColorMapArg::Gradient)]
    colormap: ColorMapArg,

    /// Also draw the screen-centre crosshair.
    #[arg(long)]
    hud: bool,

    /// Log filter (env_logger syntax); falls back to RUST_LOG.
    #[arg(long)]
    log: Option<String>,
}

fn build_geometry(kind: GeometryArg, count: usize) -> GeometryCollection {
    let helix = |i: usize| {
        let t = i as f32 * 0.5;
        [t.cos(), t.sin(), t * 0.1]
    };
    match kind {
        GeometryArg::Points => GeometryCollection::Points((0..count).map(helix).collect()),
        GeometryArg::Triangles => GeometryCollection::Triangles(
            (0..count)
                .map(|i| [[0.0, 0.0, 0.0], helix(i), helix(i + 1)])
                .collect(),
        ),
        GeometryArg::LineStrings => GeometryCollection::LineStrings(
            (0..count)
                .map(|i| (0..i + 2).map(|j| helix(i * 10 + j)).collect())
                .collect(),
        ),
        GeometryArg::LinearRings => GeometryCollection::LinearRings(
            (0..count)
                .map(|i| {
                    let s = 1.0 + i as f32;
                    vec![[-s, -s, 0.0], [s, -s, 0.0], [s, s, 0.0], [-s, s, 0.0]]
                })
                .collect(),
        ),
    }
}

/// Fixed seed keeps traces comparable between runs.
fn rand_seeded() -> StdRng {
    StdRng::seed_from_u64(0x5eed)
}

/// Per-vertex z coordinate, used as the scalar value stream.
fn vertex_values(geometry: &GeometryCollection) -> Vec<f32> {
    use povi_engine::geometry::GeometryLayout;
    match geometry.layout() {
        GeometryLayout::Fixed(v) => v.iter().map(|p| p[2]).collect(),
        GeometryLayout::Variable(elements) => elements.iter().flatten().map(|p| p[2]).collect(),
    }
}

fn frame_summary(setup: usize, frame: usize, draws: usize, rendered: usize) -> String {
    format!("{setup} setup calls, {frame} frame calls, {draws} draws from {rendered} drawables")
}

fn main() -> Result<()> {
    let args = TraceArgs::parse();
    init_logging(LoggingConfig {
        env_filter: args.log.clone(),
        ..LoggingConfig::default()
    });

    let loader: Rc<dyn ShaderSourceLoader> = match &args.shaders {
        Some(dir) => {
            anyhow::ensure!(dir.is_dir(), "shader directory {} does not exist", dir.display());
            Rc::new(DirectoryLoader::new(dir))
        }
        None => Rc::new(MemoryLoader::builtin()),
    };

    let mut ctx = RecordingContext::new();
    let geometry = build_geometry(args.geometry, args.count);
    let values = vertex_values(&geometry);

    let painter = Rc::new(RefCell::new(Painter::from_config(
        Rc::clone(&loader),
        &PainterConfig::default(),
    )));
    {
        let mut p = painter.borrow_mut();
        p.set_geometry(&mut ctx, &geometry)
            .context("uploading geometry")?;
        p.set_attribute(&mut ctx, AttributeName::Value, &values, values.len(), 1)
            .context("uploading values")?;
    }

    // Producers must outlive the frame; painters only observe them.
    let mut gradient = GradientColorMap::new();
    let mut categorical = CategoricalColorMap::new();
    match args.colormap {
        ColorMapArg::None => {}
        ColorMapArg::Gradient => {
            gradient.set_values(&values);
            gradient.sync(&mut ctx).context("uploading gradient")?;
            painter
                .borrow_mut()
                .apply_colormap(&mut ctx, &gradient.colormap(), None)?;
        }
        ColorMapArg::Categorical => {
            let ids: Vec<i32> = (0..values.len()).map(|i| (i % 4) as i32).collect();
            categorical.count_values(&ids);
            categorical.randomize_colors(&mut rand_seeded());
            categorical.sync(&mut ctx).context("uploading categories")?;
            painter
                .borrow_mut()
                .apply_colormap(&mut ctx, &categorical.colormap(), Some(&ids))?;
        }
    }

    let mut scene = Scene::new();
    scene.add("geometry", &painter);
    let hud = Rc::new(RefCell::new(CrosshairPainter::new(Rc::clone(&loader))));
    if args.hud {
        scene.add("crosshair", &hud);
    }

    let center = painter.borrow().center().unwrap_or(Vec3::ZERO);
    let frame = FrameMatrices::new(
        Mat4::IDENTITY,
        Mat4::look_at_rh(center + Vec3::new(0.0, 0.0, 5.0), center, Vec3::Y),
        Mat4::perspective_rh_gl(45f32.to_radians(), 4.0 / 3.0, 0.1, 100.0),
    );

    let setup = ctx.take_calls().len();
    let rendered = scene.render(&mut ctx, &frame);

    for (i, call) in ctx.calls().iter().enumerate() {
        println!("{i:>4}  {call:?}");
    }

    let summary = painter.borrow().summary();
    let draws = ctx
        .calls()
        .iter()
        .filter(|c| matches!(c, GlCall::DrawArrays { .. }))
        .count();
    let line = frame_summary(setup, ctx.calls().len(), draws, rendered);
    log::info!("{line}");
    println!();
    println!("{line}");
    println!(
        "{:?} x {} vertices, centre {:?}",
        summary.draw_mode, summary.vertex_count, summary.center
    );

    let missing: Vec<String> = painter
        .borrow()
        .shader()
        .borrow()
        .missing_bindings()
        .map(str::to_string)
        .collect();
    if !missing.is_empty() {
        log::warn!("unbound names: {}", missing.join(", "));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn summary_counts_calls_and_draws() {
        assert_eq!(
            frame_summary(12, 30, 4, 2),
            "12 setup calls, 30 frame calls, 4 draws from 2 drawables"
        );
    }

    #[test]
    fn values_come_from_z() {
        let geometry = build_geometry(GeometryArg::Points, 2);
        let values = vertex_values(&geometry);
        assert_eq!(values.len(), geometry.vertex_count());
    }
}
