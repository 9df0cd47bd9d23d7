use std::path::Path;

use serde::{Deserialize, Serialize};

/// Outcome of one scene run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunReport {
    pub scene_name: String,
    pub ticks: u32,
    pub activations: usize,
    pub evictions: usize,
    pub light_updates: usize,
    pub meshes_rebuilt: usize,
    pub edits: usize,
    /// Active chunks at the end of the run.
    pub active_chunks: usize,
    pub live_meshes: usize,
    pub vertices: usize,
    pub elapsed_ms: f64,
    pub mean_tick_ms: f64,
    pub max_tick_ms: f64,
    pub final_position: [f32; 3],
    pub grounded: bool,
}

impl RunReport {
    pub fn new(scene_name: &str, ticks: u32) -> Self {
        Self {
            scene_name: scene_name.to_string(),
            ticks,
            activations: 0,
            evictions: 0,
            light_updates: 0,
            meshes_rebuilt: 0,
            edits: 0,
            active_chunks: 0,
            live_meshes: 0,
            vertices: 0,
            elapsed_ms: 0.0,
            mean_tick_ms: 0.0,
            max_tick_ms: 0.0,
            final_position: [0.0; 3],
            grounded: false,
        }
    }

    /// Fill the mean and max from per-tick world update times.
    pub fn set_tick_times(&mut self, times_ms: &[f64]) {
        if times_ms.is_empty() {
            return;
        }
        self.mean_tick_ms = times_ms.iter().sum::<f64>() / times_ms.len() as f64;
        self.max_tick_ms = times_ms.iter().copied().fold(0.0, f64::max);
    }
}

/// All runs of one sandbox invocation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SandboxReport {
    pub label: String,
    pub runs: Vec<RunReport>,
}

/// Load a report from a JSON file. Returns None if it is missing or malformed.
pub fn load_report(path: &Path) -> Option<SandboxReport> {
    let contents = std::fs::read_to_string(path).ok()?;
    serde_json::from_str(&contents).ok()
}

/// Save a report as pretty JSON, creating parent directories as needed.
pub fn save_report(path: &Path, report: &SandboxReport) -> std::io::Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let json = serde_json::to_string_pretty(report).map_err(std::io::Error::other)?;
    std::fs::write(path, json)
}

/// Scenes whose mean tick time grew by more than `threshold_pct` percent over
/// the baseline, with the percent change. Scenes missing from the baseline or
/// with a zero baseline mean are skipped.
pub fn compare(
    current: &[RunReport],
    baseline: &SandboxReport,
    threshold_pct: f64,
) -> Vec<(String, f64)> {
    let mut regressions = Vec::new();
    for run in current {
        let Some(base) = baseline
            .runs
            .iter()
            .find(|b| b.scene_name == run.scene_name)
        else {
            continue;
        };
        if base.mean_tick_ms <= 0.0 {
            continue;
        }
        let pct_change = (run.mean_tick_ms - base.mean_tick_ms) / base.mean_tick_ms * 100.0;
        if pct_change > threshold_pct {
            regressions.push((run.scene_name.clone(), pct_change));
        }
    }
    regressions
}

/// Format the outcome of [`compare`].
pub fn format_comparison(regressions: &[(String, f64)], threshold_pct: f64) -> String {
    if regressions.is_empty() {
        return format!(
            "All scenes within {:.0}% of baseline tick time.\n",
            threshold_pct
        );
    }
    let mut out = format!("REGRESSIONS DETECTED (>{:.0}% threshold):\n", threshold_pct);
    for (scene, pct) in regressions {
        out.push_str(&format!("  - {}: +{:.1}%\n", scene, pct));
    }
    out
}

/// Format runs as a markdown summary table.
pub fn format_markdown(runs: &[RunReport]) -> String {
    let mut out = String::new();
    out.push_str("| Scene | Ticks | Chunks | Loads | Evictions | Light | Meshes | Vertices | Mean (ms) | Max (ms) | Grounded |\n");
    out.push_str("|-------|-------|--------|-------|-----------|-------|--------|----------|-----------|----------|----------|\n");

    for r in runs {
        out.push_str(&format!(
            "| {} | {} | {} | {} | {} | {} | {} | {} | {:.3} | {:.3} | {} |\n",
            r.scene_name,
            r.ticks,
            r.active_chunks,
            r.activations,
            r.evictions,
            r.light_updates,
            r.live_meshes,
            r.vertices,
            r.mean_tick_ms,
            r.max_tick_ms,
            if r.grounded { "yes" } else { "no" },
        ));
    }

    out
}
