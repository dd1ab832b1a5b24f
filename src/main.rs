//! hoverkit - headless hover session runner
//!
//! Usage:
//!   hoverkit [--config <config.json>] [<scene.json>]
//!                                  replay a scene description (default: the
//!                                  built-in three-cube scene), optionally
//!                                  overriding its interaction settings
//!   hoverkit --dump-demo <path>    write the built-in scene as JSON and exit
//!   hoverkit --dump-config <path>  write the default interaction config and exit
//!
//! Selection changes are logged as they happen; the final session summary is
//! printed to stdout as JSON.

use hoverkit::app::{App, AppError};
use hoverkit::interaction::{ConfigError, InteractionConfig};
use hoverkit::scene::serialization::{
    load_description_from_file, save_description_to_file, SceneDescription, SerializationError,
};
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Debug, thiserror::Error)]
enum RunError {
    #[error(
        "usage: hoverkit [--config <config.json>] [<scene.json>] | --dump-demo <path> | --dump-config <path>"
    )]
    Usage,
    #[error("scene file {path}: {source}")]
    Scene {
        path: String,
        #[source]
        source: SerializationError,
    },
    #[error("config file {path}: {source}")]
    Config {
        path: String,
        #[source]
        source: ConfigError,
    },
    #[error(transparent)]
    App(#[from] AppError),
    #[error("failed to encode summary: {0}")]
    Summary(#[from] serde_json::Error),
}

enum Command {
    DumpDemo(PathBuf),
    DumpConfig(PathBuf),
    Replay {
        scene: Option<PathBuf>,
        config: Option<PathBuf>,
    },
}

fn parse_args(args: &[String]) -> Result<Command, RunError> {
    match args {
        [flag, path] if flag == "--dump-demo" => return Ok(Command::DumpDemo(path.into())),
        [flag, path] if flag == "--dump-config" => return Ok(Command::DumpConfig(path.into())),
        _ => {}
    }

    let mut scene = None;
    let mut config = None;
    let mut rest = args.iter();
    while let Some(arg) = rest.next() {
        if arg == "--config" {
            let path = rest.next().ok_or(RunError::Usage)?;
            if config.replace(PathBuf::from(path)).is_some() {
                return Err(RunError::Usage);
            }
        } else if !arg.starts_with("--") && scene.is_none() {
            scene = Some(PathBuf::from(arg));
        } else {
            return Err(RunError::Usage);
        }
    }
    Ok(Command::Replay { scene, config })
}

fn run(args: &[String]) -> Result<(), RunError> {
    let (scene, config) = match parse_args(args)? {
        Command::DumpDemo(path) => {
            save_description_to_file(&SceneDescription::demo(), &path).map_err(|source| {
                RunError::Scene {
                    path: path.display().to_string(),
                    source,
                }
            })?;
            log::info!("Demo scene written to {}", path.display());
            return Ok(());
        }
        Command::DumpConfig(path) => {
            InteractionConfig::default()
                .save_to_file(&path)
                .map_err(|source| RunError::Config {
                    path: path.display().to_string(),
                    source,
                })?;
            log::info!("Default interaction config written to {}", path.display());
            return Ok(());
        }
        Command::Replay { scene, config } => (scene, config),
    };

    let mut description = match scene {
        Some(path) => load_description_from_file(&path).map_err(|source| RunError::Scene {
            path: path.display().to_string(),
            source,
        })?,
        None => {
            log::info!("No scene given; using the built-in demo scene");
            SceneDescription::demo()
        }
    };

    if let Some(path) = config {
        description.interaction =
            InteractionConfig::load_from_file(&path).map_err(|source| RunError::Config {
                path: path.display().to_string(),
                source,
            })?;
        log::info!("Interaction settings loaded from {}", path.display());
    }

    let mut app = App::from_description(description)?;
    let summary = app.run();
    println!("{}", serde_json::to_string_pretty(&summary)?);
    Ok(())
}

fn main() -> ExitCode {
    // Initialize logging
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_millis()
        .init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            log::error!("{}", err);
            ExitCode::FAILURE
        }
    }
}
