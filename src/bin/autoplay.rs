use anyhow::Context;
use replay_synth::*;

use std::env;

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let args: Vec<_> = env::args().collect();
    let path = args
        .get(1)
        .context("usage: autoplay <beatmap.json> [--json] [--config <config.json>]")?;
    let print_json = args.iter().any(|arg| arg == "--json");

    let config = match args.iter().position(|arg| arg == "--config") {
        Some(index) => {
            let config_path = args.get(index + 1).context("--config needs a path")?;
            let data = std::fs::read_to_string(config_path)
                .with_context(|| format!("reading {config_path}"))?;
            serde_json::from_str(&data).with_context(|| format!("parsing {config_path}"))?
        }
        None => AutoGeneratorConfig::default(),
    };

    let data = std::fs::read_to_string(path).with_context(|| format!("reading {path}"))?;
    let beatmap: Beatmap =
        serde_json::from_str(&data).with_context(|| format!("parsing {path}"))?;

    let replay = AutoGenerator::new(&beatmap, config)
        .generate()
        .with_context(|| format!("generating replay for {path}"))?;

    if print_json {
        println!("{}", replay.as_json()?);
        return Ok(());
    }

    let presses = replay
        .frames
        .windows(2)
        .filter(|pair| !pair[1].buttons.difference(pair[0].buttons).is_empty())
        .count();
    println!("Frames: {}", replay.frame_count());
    println!("Duration: {:.0} ms", replay.duration());
    println!("Button presses: {presses}");
    for frame in replay.frames.iter().take(10) {
        println!(
            "{:>10.2} ({:>7.2}, {:>7.2}) {:?}",
            frame.time, frame.x, frame.y, frame.buttons
        );
    }
    Ok(())
}
