//! Headless trajectory player.
//!
//! Reads `<dir>/run<N>_<process>.json`, plays it on an in-memory scene with
//! simulated time and logs every committed frame. Run with `RUST_LOG=info`
//! to see the transport readout, `RUST_LOG=trace` for every scene write.

use std::path::PathBuf;
use std::process::ExitCode;

use vipr_player::error::PlayerError;
use vipr_player::options::Options;
use vipr_player::playback::{LogTransport, Scheduler};
use vipr_player::scene::MemoryScene;
use vipr_player::style::VisualStyle;
use vipr_player::trajectory::{
    DirectorySource, ProcessKind, SimulationSelection, TrajectoryStore,
};
use web_time::{Duration, Instant};

const USAGE: &str =
    "Usage: vipr-player <dir> [--run N] [--process P] [--options FILE]";

struct Args {
    dir: PathBuf,
    selection: SimulationSelection,
    options: Option<PathBuf>,
}

fn parse_args() -> Result<Args, String> {
    let mut args = std::env::args().skip(1);
    let mut dir = None;
    let mut selection = SimulationSelection::default();
    let mut options = None;

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--run" => {
                let value = args.next().ok_or("--run needs a value")?;
                selection.run_index = value
                    .parse()
                    .map_err(|e| format!("invalid --run {value}: {e}"))?;
            }
            "--process" => {
                let value = args.next().ok_or("--process needs a value")?;
                selection.process = ProcessKind::from(value);
            }
            "--options" => {
                let value = args.next().ok_or("--options needs a file")?;
                options = Some(PathBuf::from(value));
            }
            _ if dir.is_none() => dir = Some(PathBuf::from(arg)),
            _ => return Err(format!("unexpected argument: {arg}")),
        }
    }

    Ok(Args {
        dir: dir.ok_or("missing trajectory directory")?,
        selection,
        options,
    })
}

fn run(args: &Args) -> Result<(), PlayerError> {
    let options = match &args.options {
        Some(path) => Options::load(path)?,
        None => Options::default(),
    };
    let step = options
        .playback
        .timing()
        .duration
        .max(Duration::from_millis(1));

    let mut store = TrajectoryStore::new(
        DirectorySource::new(&args.dir),
        options.display.compound_kinds.clone(),
    );
    let trajectory = store.load(&args.selection)?;
    let mut now = Instant::now();
    let scene = MemoryScene::from_trajectory(&trajectory, now);

    let mut scheduler = Scheduler::new(
        scene,
        LogTransport::default(),
        store,
        &args.selection,
        options,
    )?;
    scheduler.play();

    while scheduler.is_playing() {
        now += step;
        for ticket in scheduler.scene_mut().update(now) {
            let _ = scheduler.on_transition_complete(ticket);
        }
        for event in scheduler.scene_mut().take_journal() {
            log::trace!("{event:?}");
        }
    }

    for track in scheduler.trajectory().record().tracks() {
        match scheduler.scene().style(&track.id) {
            Some(VisualStyle::Edge { color, width }) => {
                log::info!("{}: {color} width {width}", track.id);
            }
            Some(VisualStyle::Node { pie_fraction }) => {
                log::info!("{}: pie {pie_fraction}", track.id);
            }
            None => {}
        }
    }
    Ok(())
}

fn main() -> ExitCode {
    env_logger::init();

    let args = match parse_args() {
        Ok(args) => args,
        Err(msg) => {
            log::error!("{msg}");
            log::error!("{USAGE}");
            return ExitCode::FAILURE;
        }
    };

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{e}");
            ExitCode::FAILURE
        }
    }
}
