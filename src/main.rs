//! Hutara - cross-modulated four-oscillator CV voice

use anyhow::{anyhow, Result};
use clap::Parser;
use hutara::config;
use hutara::engine::{default_device_name, Engine, Player, Recorder};
use hutara::synth::{OutputFrame, OutputLine};
use std::sync::atomic::Ordering;
use std::time::Duration;
use tracing::Level;

mod cli;

use cli::{Cli, Commands};

fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = match cli.verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Render {
            config: config_path,
            output,
            duration,
            lines,
        } => {
            let patch = config::load_config(&config_path)?;
            let lines = lines
                .iter()
                .map(|name| {
                    OutputLine::from_name(name.trim())
                        .ok_or_else(|| anyhow!("unknown output line '{}'", name))
                })
                .collect::<Result<Vec<_>>>()?;

            let names: Vec<&str> = lines.iter().map(|line| line.name()).collect();
            println!("Rendering {}s of {} to {:?}...", duration, names.join(", "), output);

            let sample_rate = patch.audio.sample_rate;
            let total_frames = (sample_rate as f64 * duration.max(0.0)) as u64;

            let mut engine = Engine::new(&patch);
            let mut recorder = Recorder::new(&output, sample_rate, &lines, patch.audio.gain)?;

            for i in 0..total_frames {
                let frame = engine.process();
                recorder.write_frame(&frame)?;

                // Progress update every second
                if i > 0 && i % sample_rate as u64 == 0 {
                    tracing::info!("Rendered {}s / {}s", i / sample_rate as u64, duration);
                }
            }

            let faults = engine.fault_count();
            recorder.finalize()?;
            println!("Rendered {} frames to {:?}", total_frames, output);
            if faults > 0 {
                println!("  {} samples faulted and held the previous output", faults);
            }
        }

        Commands::Play { config: config_path } => {
            let patch = config::load_config(&config_path)?;

            println!("Playing {} variant (Ctrl-C to stop)...", patch.variant.name());
            if let Some(name) = default_device_name() {
                println!("  Device: {}", name);
            }

            let mut player = Player::new();
            player.start(&patch)?;
            println!("  Sample rate: {} Hz", player.sample_rate());

            let running = player.stop_handle();
            ctrlc::set_handler(move || {
                running.store(false, Ordering::SeqCst);
            })?;

            let mut reported = 0;
            while player.is_playing() {
                std::thread::sleep(Duration::from_millis(100));

                let faults = player.fault_count();
                if faults > reported {
                    tracing::warn!(
                        "{} samples faulted and held the previous output",
                        faults - reported
                    );
                    reported = faults;
                }
            }

            let seconds = player.frames_played() as f64 / player.sample_rate() as f64;
            player.stop();
            println!("\nStopped after {:.1}s", seconds);
        }

        Commands::Probe {
            config: config_path,
            samples,
            json,
        } => {
            let patch = config::load_config(&config_path)?;
            let mut engine = Engine::new(&patch);
            let mut frames = vec![OutputFrame::default(); samples];
            engine.fill_buffer(&mut frames);

            if json {
                for frame in &frames {
                    println!("{}", serde_json::to_string(frame)?);
                }
            } else {
                println!(
                    "{:>6} {:>10} {:>10} {:>10} {:>10} {:>10}",
                    "n", "sine", "saw", "triangle", "square", "mix"
                );
                for (i, frame) in frames.iter().enumerate() {
                    println!(
                        "{:>6} {:>10.5} {:>10.5} {:>10.5} {:>10.5} {:>10.5}",
                        i,
                        frame.lines.sine,
                        frame.lines.saw,
                        frame.lines.triangle,
                        frame.lines.square,
                        frame.mix
                    );
                }
            }

            if engine.fault_count() > 0 {
                tracing::warn!("{} of {} samples faulted", engine.fault_count(), samples);
            }
        }

        Commands::Check { config: config_path } => {
            println!("Checking patch at {:?}...", config_path);

            match config::load_config(&config_path) {
                Ok(patch) => {
                    println!("Patch is valid!");
                    println!("  Sample rate: {} Hz", patch.audio.sample_rate);
                    println!("  Gain: {}", patch.audio.gain);
                    println!("  Variant: {}", patch.variant.name());
                    let patched = patch.inputs.patched();
                    println!("  Patched inputs: {}", patched.len());
                    for name in patched {
                        println!("    - {}", name);
                    }
                }
                Err(e) => {
                    println!("Patch is invalid: {:#}", e);
                    std::process::exit(1);
                }
            }
        }

        Commands::Init => {
            let example_config = include_str!("../hutara.example.yaml");

            let path = "hutara.yaml";
            if std::path::Path::new(path).exists() {
                println!("hutara.yaml already exists. Not overwriting.");
            } else {
                std::fs::write(path, example_config)?;
                println!("Created hutara.yaml with example patch.");
            }
        }
    }

    Ok(())
}
