//! Text charts and exports of per-episode scores.
use std::fs::File;
use std::io::Write;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Aggregate statistics of a run's scores.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoreSummary {
    pub episodes: usize,
    pub mean: f32,
    pub best: f32,
    pub worst: f32,
    /// Mean of the last 100 episodes, or of all of them in shorter runs.
    pub last_100_mean: f32,
}

impl ScoreSummary {
    /// Returns `None` for an empty score list.
    pub fn from_scores(scores: &[f32]) -> Option<Self> {
        if scores.is_empty() {
            return None;
        }
        let mean = |values: &[f32]| values.iter().sum::<f32>() / values.len() as f32;
        let tail = &scores[scores.len().saturating_sub(100)..];

        Some(ScoreSummary {
            episodes: scores.len(),
            mean: mean(scores),
            best: scores.iter().copied().fold(f32::NEG_INFINITY, f32::max),
            worst: scores.iter().copied().fold(f32::INFINITY, f32::min),
            last_100_mean: mean(tail),
        })
    }
}

#[derive(Serialize)]
struct ScoreReport<'a> {
    summary: Option<ScoreSummary>,
    scores: &'a [f32],
}

/// Plot episode scores as ASCII art
pub fn plot_scores(scores: &[f32], width: usize, height: usize) -> String {
    let title = "Episode Scores";
    if scores.is_empty() {
        return "No score data available".to_string();
    }
    if width < 10 || height < 5 {
        return format!("{}: Invalid dimensions", title);
    }

    let min_val = scores.iter().copied().fold(f32::INFINITY, f32::min);
    let max_val = scores.iter().copied().fold(f32::NEG_INFINITY, f32::max);

    if (max_val - min_val).abs() < f32::EPSILON {
        return format!("{}: All values are {:.4}", title, min_val);
    }

    let mut plot = vec![vec![' '; width]; height];

    // Axes
    for row in plot.iter_mut() {
        row[0] = '|';
    }
    for cell in plot[height - 1].iter_mut() {
        *cell = '-';
    }
    plot[height - 1][0] = '+';

    // At least two distinct values remain here.
    let x_scale = (width - 3) as f32 / (scores.len() - 1) as f32;
    let y_scale = (height - 3) as f32 / (max_val - min_val);

    for (i, &score) in scores.iter().enumerate() {
        let x = ((i as f32 * x_scale) as usize + 2).min(width - 1);
        let offset = ((score - min_val) * y_scale) as usize;
        let y = (height - 3).saturating_sub(offset).min(height - 2);
        plot[y][x] = '*';
    }

    let mut output = format!("{}\n", title);
    output.push_str(&format!("Max: {:.4}\n", max_val));
    for row in plot.iter() {
        output.push_str(&row.iter().collect::<String>());
        output.push('\n');
    }
    output.push_str(&format!("Min: {:.4}\n", min_val));
    output.push_str(&format!("Points: {}\n", scores.len()));

    output
}

/// Export scores and their summary as JSON
pub fn export_scores_json(path: impl AsRef<Path>, scores: &[f32]) -> Result<()> {
    let report = ScoreReport {
        summary: ScoreSummary::from_scores(scores),
        scores,
    };
    let file = File::create(path)?;
    serde_json::to_writer_pretty(file, &report)?;
    Ok(())
}

/// Export scores to CSV format
pub fn export_scores_csv(path: impl AsRef<Path>, scores: &[f32]) -> Result<()> {
    let mut file = File::create(path)?;
    writeln!(file, "episode,score")?;
    for (episode, score) in scores.iter().enumerate() {
        writeln!(file, "{},{}", episode, score)?;
    }
    Ok(())
}
