use std::path::PathBuf;
use std::process;

use terrane_core::BlockTable;
use terrane_sandbox::report;
use terrane_sandbox::runner::SandboxRunner;
use terrane_sandbox::scenes;
use terrane_world::WorldConfig;

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args: Vec<String> = std::env::args().collect();

    let mut config_path: Option<PathBuf> = None;
    let mut blocks_path: Option<PathBuf> = None;
    let mut save_dir: Option<PathBuf> = None;
    let mut output_path: Option<PathBuf> = None;
    let mut baseline_path: Option<PathBuf> = None;
    let mut regression_threshold = 10.0f64;
    let mut scene_name: Option<String> = None;
    let mut tick_count = 300u32;

    let mut i = 1;
    while i < args.len() {
        let flag = args[i].as_str();
        if matches!(flag, "--help" | "-h") {
            print_usage();
            process::exit(0);
        }
        i += 1;
        let Some(value) = args.get(i) else {
            fail(&format!("missing value for {flag}"));
        };
        match flag {
            "--config" => config_path = Some(PathBuf::from(value)),
            "--blocks" => blocks_path = Some(PathBuf::from(value)),
            "--save-dir" => save_dir = Some(PathBuf::from(value)),
            "--output" => output_path = Some(PathBuf::from(value)),
            "--baseline" => baseline_path = Some(PathBuf::from(value)),
            "--regression-threshold" => {
                regression_threshold = value.parse().unwrap_or_else(|_| {
                    fail(&format!("invalid --regression-threshold value: {value}"))
                });
            }
            "--scene" => scene_name = Some(value.clone()),
            "--ticks" => {
                tick_count = value
                    .parse()
                    .unwrap_or_else(|_| fail(&format!("invalid --ticks value: {value}")));
            }
            other => fail(&format!("Unknown argument: {other}")),
        }
        i += 1;
    }

    let mut config = match &config_path {
        Some(path) => WorldConfig::load(path)
            .unwrap_or_else(|e| fail(&format!("failed to load {}: {e}", path.display()))),
        None => WorldConfig::default(),
    };
    if let Some(dir) = save_dir {
        config.save_dir = dir;
    }

    let blocks = match &blocks_path {
        Some(path) => std::fs::read_to_string(path)
            .map_err(|e| e.to_string())
            .and_then(|text| BlockTable::from_ron(&text).map_err(|e| e.to_string()))
            .unwrap_or_else(|e| fail(&format!("failed to load {}: {e}", path.display()))),
        None => BlockTable::builtin(),
    };

    let scene_configs = match scene_name {
        Some(name) => match scenes::find_scene(&name) {
            Some(scene) => vec![scene],
            None => fail(&format!("unknown scene: {name}")),
        },
        None => scenes::standard_scenes(),
    };

    log::info!(
        "Sandbox: seed {}, {} block types, saves under {}",
        config.seed,
        blocks.len(),
        config.save_dir.display()
    );
    let runner = SandboxRunner::new(config, blocks, tick_count);

    let mut runs = Vec::new();
    for scene in &scene_configs {
        match runner.run_scene(scene) {
            Ok(run) => runs.push(run),
            Err(e) => fail(&format!("scene '{}' failed: {e}", scene.name)),
        }
    }

    println!("\n## Sandbox Results\n");
    println!("{}", report::format_markdown(&runs));

    let regressions = match &baseline_path {
        Some(path) => match report::load_report(path) {
            Some(baseline) => {
                let regressions = report::compare(&runs, &baseline, regression_threshold);
                println!(
                    "{}",
                    report::format_comparison(&regressions, regression_threshold)
                );
                regressions
            }
            None => {
                log::warn!("Baseline file not found or unreadable: {}", path.display());
                Vec::new()
            }
        },
        None => Vec::new(),
    };

    if let Some(ref path) = output_path {
        let sandbox_report = report::SandboxReport {
            label: format!("sandbox-{}", process::id()),
            runs,
        };
        if let Err(e) = report::save_report(path, &sandbox_report) {
            fail(&format!("failed to save report: {e}"));
        }
        log::info!("Saved report to {}", path.display());
    }

    if !regressions.is_empty() {
        fail(&format!(
            "ERROR: {} regressions detected, exiting with code 1",
            regressions.len()
        ));
    }

    log::info!("Sandbox complete.");
}

fn print_usage() {
    eprintln!("Usage: terrane-sandbox [OPTIONS]");
    eprintln!("  --config <path>     World config (RON)");
    eprintln!("  --blocks <path>     Block table (RON)");
    eprintln!("  --save-dir <path>   Override the config's save directory");
    eprintln!("  --scene <name>      Run one scene: stationary, walk or teleport");
    eprintln!("  --ticks <n>         Ticks per scene (default: 300)");
    eprintln!("  --output <path>     Write the results as JSON");
    eprintln!("  --baseline <path>   Compare tick times against a saved JSON report");
    eprintln!("  --regression-threshold <pct>   Allowed tick time growth (default: 10)");
}

fn fail(message: &str) -> ! {
    eprintln!("{message}");
    process::exit(1);
}
