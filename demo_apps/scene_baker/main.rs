//! Scene Baker
//!
//! Runs one generator against the in-memory recording host and writes the
//! host command journal as JSON. A host-side script can replay the journal
//! to build and export the real scene.
//!
//! ```text
//! scene_baker <generator> [--seed N] [--config settings.json] [--out file.fbx] [--journal file.json]
//! scene_baker --list
//! ```
//!
//! Settings start from the generator's defaults; a config file overrides the
//! keys it contains and the flags override both.

use std::path::PathBuf;

use anyhow::{Context, Result, anyhow, bail};
use forge::assets::RecordingHost;
use forge::generators;
use forge::pass::run_pass;

#[derive(Debug, Default)]
struct Args {
    generator: Option<String>,
    seed: Option<u64>,
    config: Option<PathBuf>,
    output: Option<PathBuf>,
    journal: Option<PathBuf>,
    list: bool,
}

fn parse_args() -> Result<Args> {
    let mut args = Args::default();
    let mut iter = std::env::args().skip(1);

    while let Some(arg) = iter.next() {
        let mut value = |flag: &str| iter.next().ok_or_else(|| anyhow!("{flag} needs a value"));
        match arg.as_str() {
            "--seed" => {
                let raw = value("--seed")?;
                args.seed = Some(raw.parse().with_context(|| format!("invalid seed `{raw}`"))?);
            }
            "--config" => args.config = Some(value("--config")?.into()),
            "--out" => args.output = Some(value("--out")?.into()),
            "--journal" => args.journal = Some(value("--journal")?.into()),
            "--list" => args.list = true,
            flag if flag.starts_with("--") => bail!("unknown flag `{flag}`"),
            name => {
                if args.generator.replace(name.to_string()).is_some() {
                    bail!("only one generator can be run at a time");
                }
            }
        }
    }
    Ok(args)
}

fn main() -> Result<()> {
    env_logger::init();
    let args = parse_args()?;

    if args.list {
        for name in generators::NAMES {
            println!("{name}");
        }
        return Ok(());
    }

    let name = args
        .generator
        .ok_or_else(|| anyhow!("usage: scene_baker <generator> [--seed N] [--config FILE] [--out FILE]"))?;
    let generator = generators::by_name(&name).ok_or_else(|| {
        anyhow!(
            "unknown generator `{name}`; available: {}",
            generators::NAMES.join(", ")
        )
    })?;

    let mut settings = generator.default_settings();
    if let Some(path) = &args.config {
        let json = std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
        settings = settings
            .overlay_json(&json)
            .with_context(|| format!("applying {}", path.display()))?;
    }
    if let Some(seed) = args.seed {
        settings.seed = Some(seed);
    }
    if let Some(output) = args.output {
        settings.output = output;
    }

    let journal = args
        .journal
        .unwrap_or_else(|| settings.output.with_extension("journal.json"));

    let mut host = RecordingHost::new();
    let report = run_pass(generator.as_ref(), settings, &mut host)?;
    host.write_journal(&journal)?;

    println!(
        "{}: {} nodes, {} bones, {} materials, {} actions, {} keyframes",
        report.generator, report.nodes, report.bones, report.materials, report.actions, report.keyframes
    );
    println!("journal: {}", journal.display());
    println!("export target: {}", report.destination.display());
    Ok(())
}
