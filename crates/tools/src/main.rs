//! worldmap: command-line companion for atlas packages.
//!
//! Three subcommands cover the offline workflows around the interactive
//! viewer: `inspect` summarizes what a package contains, `render`
//! produces one SVG snapshot after a scripted set of selections and
//! clicks, and `replay` runs a whole event script and writes numbered
//! frames, which is the easiest way to eyeball a zoom transition
//! without a browser.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail, ensure};
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

use formats::atlas_loader::load_atlas_from_package;
use formats::package::AtlasPackage;
use interact::{InputEvent, MapController, MapOptions};
use render::{FrameSnapshot, MapTheme, render_svg};

#[derive(Parser)]
#[command(
    name = "worldmap",
    version,
    about = "Inspect, render and replay interactive atlas packages"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Summarize the datasets of an atlas package
    Inspect {
        /// Package directory holding atlas.manifest.json
        package: PathBuf,
    },
    /// Render one SVG snapshot after applying selections and clicks
    Render {
        /// Package directory holding atlas.manifest.json
        package: PathBuf,
        /// Output SVG path
        out: PathBuf,
        /// Select a country by display name before the clicks run;
        /// repeatable
        #[arg(long, value_name = "NAME")]
        select: Vec<String>,
        /// Click at a screen position, e.g. --click 487.5,305;
        /// repeatable
        #[arg(long, value_name = "X,Y")]
        click: Vec<String>,
        /// Viewport size as WxH, e.g. 975x610
        #[arg(long, value_name = "WxH")]
        size: Option<String>,
        /// Maximum zoom scale
        #[arg(long, value_name = "K")]
        max_scale: Option<f64>,
    },
    /// Replay an event script and write numbered SVG frames
    Replay {
        /// Package directory holding atlas.manifest.json
        package: PathBuf,
        /// Script file: one `click X Y`, `dblclick`, `drag DX DY`,
        /// `wheel DELTA X Y`, `tick MS` or `frame NAME` per line
        script: PathBuf,
        /// Output directory for the rendered frames
        out_dir: PathBuf,
    },
}

/// One parsed script line: either an event fed to the controller or an
/// instruction to write the current frame.
#[derive(Debug, PartialEq)]
enum ScriptCommand {
    Event(InputEvent),
    Frame(String),
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Inspect { package } => cmd_inspect(&package),
        Commands::Render {
            package,
            out,
            select,
            click,
            size,
            max_scale,
        } => cmd_render(&package, &out, &select, &click, size.as_deref(), max_scale),
        Commands::Replay {
            package,
            script,
            out_dir,
        } => cmd_replay(&package, &script, &out_dir),
    }
}

fn cmd_inspect(package: &Path) -> Result<()> {
    let atlas = AtlasPackage::load(package)
        .with_context(|| format!("open package {}", package.display()))?;
    let manifest = atlas.manifest();
    let data = load_atlas_from_package(&atlas)
        .with_context(|| format!("load package {}", package.display()))?;

    println!("package: {}", manifest.package_id);
    if let Some(name) = &manifest.name {
        println!("name: {name}");
    }
    println!("datasets: {}", manifest.datasets.len());
    println!("countries: {}", data.countries.len());

    let segments: usize = data
        .borders
        .iter()
        .map(|line| line.len().saturating_sub(1))
        .sum();
    println!("border lines: {} ({segments} segments)", data.borders.len());

    match &data.trade {
        Some(trade) => println!("trade rows: {}", trade.len()),
        None => println!("trade rows: none"),
    }
    match &data.energy {
        Some(energy) => println!("energy countries: {}", energy.len()),
        None => println!("energy countries: none"),
    }
    Ok(())
}

fn cmd_render(
    package: &Path,
    out: &Path,
    selects: &[String],
    clicks: &[String],
    size: Option<&str>,
    max_scale: Option<f64>,
) -> Result<()> {
    let mut options = MapOptions::default();
    if let Some(raw) = size {
        let (width, height) = parse_size(raw)?;
        options.width = width;
        options.height = height;
    }
    if let Some(k) = max_scale {
        options.max_scale = k;
    }

    let mut controller = load_controller(package, options)?;

    // Selections run before clicks; each settles its transition so the
    // next event sees the frame a user would.
    for name in selects {
        if !controller.select_by_name(name) {
            bail!("no country named {name:?} in the package");
        }
        controller.settle();
    }
    for spec in clicks {
        let (x, y) = parse_click(spec)?;
        controller.click(x, y);
        controller.settle();
    }

    let svg = render_svg(&FrameSnapshot::capture(&controller), &MapTheme::default());
    fs::write(out, svg).with_context(|| format!("write {}", out.display()))?;
    eprintln!("wrote {}", out.display());
    Ok(())
}

fn cmd_replay(package: &Path, script: &Path, out_dir: &Path) -> Result<()> {
    let text = fs::read_to_string(script)
        .with_context(|| format!("read script {}", script.display()))?;
    fs::create_dir_all(out_dir)
        .with_context(|| format!("create output directory {}", out_dir.display()))?;

    let mut controller = load_controller(package, MapOptions::default())?;
    let theme = MapTheme::default();
    let mut frames = 0usize;

    for (line_ix, raw) in text.lines().enumerate() {
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let command = parse_script_line(line)
            .with_context(|| format!("{}:{}", script.display(), line_ix + 1))?;
        match command {
            ScriptCommand::Event(event) => controller.apply(event),
            ScriptCommand::Frame(name) => {
                frames += 1;
                let path = out_dir.join(format!("{frames:04}_{name}.svg"));
                let svg = render_svg(&FrameSnapshot::capture(&controller), &theme);
                fs::write(&path, svg).with_context(|| format!("write {}", path.display()))?;
            }
        }
    }

    eprintln!(
        "replayed {} into {frames} frame(s) under {}",
        script.display(),
        out_dir.display()
    );
    Ok(())
}

fn load_controller(package: &Path, options: MapOptions) -> Result<MapController> {
    let atlas = AtlasPackage::load(package)
        .with_context(|| format!("open package {}", package.display()))?;
    let data = load_atlas_from_package(&atlas)
        .with_context(|| format!("load package {}", package.display()))?;
    info!(
        "loaded {} countries from {}",
        data.countries.len(),
        package.display()
    );
    Ok(MapController::new(data, options))
}

fn parse_script_line(line: &str) -> Result<ScriptCommand> {
    let mut parts = line.split_whitespace();
    let verb = parts.next().unwrap_or_default();
    let rest: Vec<&str> = parts.collect();

    let command = match verb {
        "click" => {
            let n = numbers(&rest, 2, "click X Y")?;
            ScriptCommand::Event(InputEvent::Click { x: n[0], y: n[1] })
        }
        "dblclick" => {
            ensure!(rest.is_empty(), "dblclick takes no arguments");
            ScriptCommand::Event(InputEvent::DoubleClick)
        }
        "drag" => {
            let n = numbers(&rest, 2, "drag DX DY")?;
            ScriptCommand::Event(InputEvent::Drag { dx: n[0], dy: n[1] })
        }
        "wheel" => {
            let n = numbers(&rest, 3, "wheel DELTA X Y")?;
            ScriptCommand::Event(InputEvent::Wheel {
                delta: n[0],
                x: n[1],
                y: n[2],
            })
        }
        "tick" => {
            let n = numbers(&rest, 1, "tick MS")?;
            ScriptCommand::Event(InputEvent::Tick { ms: n[0] })
        }
        "frame" => {
            ensure!(rest.len() == 1, "expected `frame NAME`");
            let name = rest[0];
            ensure!(
                name.chars()
                    .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-'),
                "frame name {name:?} may only use letters, digits, '_' and '-'"
            );
            ScriptCommand::Frame(name.to_string())
        }
        other => bail!("unknown script command {other:?}"),
    };
    Ok(command)
}

fn numbers(rest: &[&str], expected: usize, usage: &str) -> Result<Vec<f64>> {
    if rest.len() != expected {
        bail!("expected `{usage}`, got {} argument(s)", rest.len());
    }
    rest.iter()
        .map(|raw| {
            raw.parse::<f64>()
                .with_context(|| format!("invalid number {raw:?} in `{usage}`"))
        })
        .collect()
}

fn parse_click(spec: &str) -> Result<(f64, f64)> {
    let (x, y) = spec
        .split_once(',')
        .with_context(|| format!("click position {spec:?} must be X,Y"))?;
    Ok((
        x.trim()
            .parse()
            .with_context(|| format!("invalid click x in {spec:?}"))?,
        y.trim()
            .parse()
            .with_context(|| format!("invalid click y in {spec:?}"))?,
    ))
}

fn parse_size(spec: &str) -> Result<(f64, f64)> {
    let (w, h) = spec
        .split_once(['x', 'X'])
        .with_context(|| format!("size {spec:?} must be WxH"))?;
    let width: f64 = w
        .trim()
        .parse()
        .with_context(|| format!("invalid width in {spec:?}"))?;
    let height: f64 = h
        .trim()
        .parse()
        .with_context(|| format!("invalid height in {spec:?}"))?;
    ensure!(
        width > 0.0 && height > 0.0,
        "size {spec:?} must be positive"
    );
    Ok((width, height))
}

#[cfg(test)]
mod tests {
    use super::{ScriptCommand, parse_click, parse_script_line, parse_size};
    use interact::InputEvent;

    #[test]
    fn parses_every_script_command() {
        assert_eq!(
            parse_script_line("click 487.5 305").expect("click"),
            ScriptCommand::Event(InputEvent::Click { x: 487.5, y: 305.0 })
        );
        assert_eq!(
            parse_script_line("dblclick").expect("dblclick"),
            ScriptCommand::Event(InputEvent::DoubleClick)
        );
        assert_eq!(
            parse_script_line("drag 12 -8").expect("drag"),
            ScriptCommand::Event(InputEvent::Drag { dx: 12.0, dy: -8.0 })
        );
        assert_eq!(
            parse_script_line("wheel -120 400 250").expect("wheel"),
            ScriptCommand::Event(InputEvent::Wheel {
                delta: -120.0,
                x: 400.0,
                y: 250.0,
            })
        );
        assert_eq!(
            parse_script_line("tick 750").expect("tick"),
            ScriptCommand::Event(InputEvent::Tick { ms: 750.0 })
        );
        assert_eq!(
            parse_script_line("frame settled-view").expect("frame"),
            ScriptCommand::Frame("settled-view".to_string())
        );
    }

    #[test]
    fn rejects_unknown_commands_and_bad_arity() {
        assert!(parse_script_line("hover 1 2").is_err());
        assert!(parse_script_line("click 1").is_err());
        assert!(parse_script_line("wheel 1 2").is_err());
        assert!(parse_script_line("dblclick now").is_err());
        assert!(parse_script_line("frame ../escape").is_err());
    }

    #[test]
    fn click_positions_split_on_the_comma() {
        assert_eq!(parse_click("487.5,305").expect("parse"), (487.5, 305.0));
        assert_eq!(parse_click(" 10 , -4 ").expect("parse"), (10.0, -4.0));
        assert!(parse_click("487.5").is_err());
        assert!(parse_click("a,b").is_err());
    }

    #[test]
    fn sizes_split_on_the_x() {
        assert_eq!(parse_size("975x610").expect("parse"), (975.0, 610.0));
        assert_eq!(parse_size("800X600").expect("parse"), (800.0, 600.0));
        assert!(parse_size("975").is_err());
        assert!(parse_size("0x610").is_err());
    }
}
