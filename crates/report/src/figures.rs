//! Figure generation using plotters (SVG output, no system font deps).

use agent::{model, PlaceCellParams};
use anyhow::Result;
use plotters::prelude::*;
use std::fs;
use std::path::Path;

fn prepare(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    Ok(())
}

/// Per-episode reward (top) and latency (bottom) over training.
pub fn learning_curve(path: &Path, rewards: &[f32], latencies: &[usize]) -> Result<()> {
    prepare(path)?;
    let root = SVGBackend::new(path, (800, 600)).into_drawing_area();
    root.fill(&WHITE)?;
    if rewards.is_empty() {
        root.present()?;
        return Ok(());
    }

    let (top, bottom) = root.split_vertically(300);
    let n = rewards.len();
    let max_reward = rewards.iter().cloned().fold(1.0f32, f32::max);

    let mut chart = ChartBuilder::on(&top)
        .caption("Reward per episode", ("sans-serif", 20))
        .margin(10)
        .x_label_area_size(30)
        .y_label_area_size(40)
        .build_cartesian_2d(0f32..n as f32, 0f32..max_reward * 1.1)?;
    chart
        .configure_mesh()
        .x_desc("Episode")
        .y_desc("Total reward")
        .draw()?;
    chart.draw_series(LineSeries::new(
        rewards.iter().enumerate().map(|(i, &r)| (i as f32, r)),
        &BLUE,
    ))?;

    let max_latency = latencies.iter().copied().max().unwrap_or(1).max(1);
    let mut chart = ChartBuilder::on(&bottom)
        .caption("Latency to first reward", ("sans-serif", 20))
        .margin(10)
        .x_label_area_size(30)
        .y_label_area_size(40)
        .build_cartesian_2d(0f32..n as f32, 0f32..max_latency as f32 * 1.1)?;
    chart
        .configure_mesh()
        .x_desc("Episode")
        .y_desc("Steps")
        .draw()?;
    chart.draw_series(LineSeries::new(
        latencies.iter().enumerate().map(|(i, &l)| (i as f32, l as f32)),
        &RED,
    ))?;

    root.present()?;
    Ok(())
}

/// Position over time for a single episode, with the goal region marked.
pub fn trajectory(
    path: &Path,
    positions: &[f32],
    goal: f32,
    goal_radius: f32,
    size: f32,
) -> Result<()> {
    prepare(path)?;
    let root = SVGBackend::new(path, (800, 400)).into_drawing_area();
    root.fill(&WHITE)?;
    if positions.is_empty() {
        root.present()?;
        return Ok(());
    }

    let n = positions.len();
    let mut chart = ChartBuilder::on(&root)
        .caption("Trajectory", ("sans-serif", 20))
        .margin(10)
        .x_label_area_size(30)
        .y_label_area_size(40)
        .build_cartesian_2d(0f32..n as f32, -size..size)?;
    chart
        .configure_mesh()
        .x_desc("Step")
        .y_desc("Position")
        .draw()?;

    for y in [goal - goal_radius, goal + goal_radius] {
        chart.draw_series(LineSeries::new(
            [(0.0, y), (n as f32, y)],
            &GREEN.mix(0.8),
        ))?;
    }
    chart.draw_series(LineSeries::new(
        positions.iter().enumerate().map(|(i, &p)| (i as f32, p)),
        &BLUE,
    ))?;

    root.present()?;
    Ok(())
}

/// Tuning curves of every place cell over the track, with start and goal
/// region markers.
pub fn place_fields(
    path: &Path,
    params: &PlaceCellParams,
    start: f32,
    goal: f32,
    goal_radius: f32,
    size: f32,
    title: &str,
) -> Result<()> {
    prepare(path)?;
    let root = SVGBackend::new(path, (800, 500)).into_drawing_area();
    root.fill(&WHITE)?;

    let samples = 201;
    let xs: Vec<f32> = (0..samples)
        .map(|i| -size + 2.0 * size * i as f32 / (samples - 1) as f32)
        .collect();
    let fields: Vec<Vec<f32>> = xs.iter().map(|&x| model::activations(params, x)).collect();
    let peak = fields
        .iter()
        .flatten()
        .cloned()
        .fold(1e-6f32, f32::max);

    let mut chart = ChartBuilder::on(&root)
        .caption(title, ("sans-serif", 20))
        .margin(20)
        .x_label_area_size(40)
        .y_label_area_size(50)
        .build_cartesian_2d(-size..size, 0f32..peak * 1.1)?;
    chart
        .configure_mesh()
        .x_desc("Position")
        .y_desc("Activation")
        .draw()?;

    for cell in 0..params.n_cells() {
        let color = Palette99::pick(cell).mix(0.6);
        chart.draw_series(LineSeries::new(
            xs.iter().enumerate().map(|(i, &x)| (x, fields[i][cell])),
            &color,
        ))?;
    }

    // start marker and goal region bounds
    for (x, color) in [
        (start, BLACK.to_rgba()),
        (goal - goal_radius, GREEN.to_rgba()),
        (goal + goal_radius, GREEN.to_rgba()),
    ] {
        chart.draw_series(LineSeries::new(
            [(x, 0.0), (x, peak * 1.1)],
            &color,
        ))?;
    }

    root.present()?;
    Ok(())
}
