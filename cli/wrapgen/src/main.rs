//! wrapgen: generate exception-raising C++ wrappers and RAII holders from the
//! public header of a prefix-namespaced C library.

mod commands;
mod manifest;

use std::path::{Path, PathBuf};
use std::process;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use commands::InputOverrides;
use manifest::WrapgenManifest;

#[derive(Parser)]
#[command(name = "wrapgen", version, about = "C header to C++ safety-wrapper generator")]
struct Cli {
    /// Use this manifest instead of searching for wrapgen.toml
    #[arg(long, global = true)]
    manifest: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Args, Debug, Default)]
struct InputArgs {
    /// Header to parse (overrides [input] header)
    #[arg(long)]
    header: Option<String>,
    /// Include directory or search-path flag; repeatable (replaces [input] include_dirs)
    #[arg(short = 'I', long = "include", value_name = "DIR")]
    include: Vec<String>,
    /// Front-end program (overrides [input] clang)
    #[arg(long)]
    clang: Option<String>,
}

impl From<InputArgs> for InputOverrides {
    fn from(args: InputArgs) -> Self {
        Self {
            header: args.header,
            include_dirs: args.include,
            clang: args.clang,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Generate the wrapper source file
    Generate {
        #[command(flatten)]
        input: InputArgs,
        /// Output file, or `-` for stdout (overrides [output] path)
        #[arg(short, long)]
        output: Option<String>,
    },
    /// Show classification, ownership or struct views without emitting code
    Inspect {
        #[command(flatten)]
        input: InputArgs,
        /// View (functions, ownership, structs)
        #[arg(long, default_value = "functions")]
        view: String,
        /// Output format (text, json)
        #[arg(long, default_value = "text")]
        format: String,
    },
    /// Write a starter wrapgen.toml in the current directory
    Init {
        /// Overwrite an existing wrapgen.toml
        #[arg(long)]
        force: bool,
    },
}

fn main() {
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr).with_target(false))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();

    let result = run(cli);
    if let Err(e) = result {
        eprintln!("error: {e:#}");
        process::exit(1);
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let cwd = std::env::current_dir()?;

    match cli.command {
        Commands::Init { force } => commands::init::run(&cwd, force),

        Commands::Generate { input, output } => {
            let (manifest, project_dir) = load_manifest(&cwd, cli.manifest.as_deref())?;
            commands::generate::run(
                &project_dir,
                manifest.as_ref(),
                &input.into(),
                output.as_deref(),
            )
        }

        Commands::Inspect {
            input,
            view,
            format,
        } => {
            let (manifest, project_dir) = load_manifest(&cwd, cli.manifest.as_deref())?;
            commands::inspect::run(&project_dir, manifest.as_ref(), &input.into(), &view, &format)
        }
    }
}

/// Load the explicit manifest, or search upward from `cwd`.
///
/// Returns the directory manifest-relative paths are resolved against: the
/// manifest's directory, or `cwd` when there is no manifest.
fn load_manifest(
    cwd: &Path,
    explicit: Option<&Path>,
) -> anyhow::Result<(Option<WrapgenManifest>, PathBuf)> {
    if let Some(path) = explicit {
        let manifest = WrapgenManifest::load(path)
            .with_context(|| format!("loading manifest {}", path.display()))?;
        let dir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => cwd.join(parent),
            _ => cwd.to_path_buf(),
        };
        return Ok((Some(manifest), dir));
    }
    match WrapgenManifest::find_and_load(cwd)? {
        Some((manifest, dir)) => Ok((Some(manifest), dir)),
        None => Ok((None, cwd.to_path_buf())),
    }
}

#[cfg(test)]
mod integration_tests {
    use std::fs;

    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parse_generate_arguments() {
        let cli = Cli::parse_from([
            "wrapgen",
            "generate",
            "--header",
            "SDL.h",
            "-I",
            "include",
            "--include=-isystem/opt/include",
            "-o",
            "-",
        ]);
        match cli.command {
            Commands::Generate { input, output } => {
                assert_eq!(input.header.as_deref(), Some("SDL.h"));
                assert_eq!(input.include, ["include", "-isystem/opt/include"]);
                assert_eq!(output.as_deref(), Some("-"));
            }
            _ => panic!("expected generate"),
        }
    }

    #[test]
    fn parse_inspect_defaults() {
        let cli = Cli::parse_from(["wrapgen", "inspect", "--manifest", "w.toml"]);
        assert_eq!(cli.manifest.as_deref(), Some(Path::new("w.toml")));
        match cli.command {
            Commands::Inspect { view, format, .. } => {
                assert_eq!(view, "functions");
                assert_eq!(format, "text");
            }
            _ => panic!("expected inspect"),
        }
    }

    #[test]
    fn explicit_manifest_anchors_relative_paths() {
        let dir = tempfile::tempdir().unwrap();
        let conf = dir.path().join("conf");
        fs::create_dir_all(&conf).unwrap();
        fs::write(conf.join("lib.toml"), "[input]\nheader = \"lib.h\"\n").unwrap();

        let (manifest, project_dir) =
            load_manifest(dir.path(), Some(Path::new("conf/lib.toml"))).unwrap();
        assert!(manifest.is_some());
        assert_eq!(project_dir, conf);
    }

    #[test]
    fn missing_explicit_manifest_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_manifest(dir.path(), Some(&dir.path().join("nope.toml"))).unwrap_err();
        assert!(format!("{err:#}").contains("nope.toml"));
    }

    /// Init, then a generate run whose front end cannot start: the run fails
    /// and leaves no output file behind.
    #[test]
    fn failed_generation_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        commands::init::run(dir.path(), false).unwrap();
        fs::write(dir.path().join("lib.h"), "int SDL_Init(void);\n").unwrap();

        let (manifest, project_dir) = load_manifest(dir.path(), None).unwrap();
        let overrides = InputOverrides {
            header: Some(dir.path().join("lib.h").display().to_string()),
            clang: Some("wrapgen-no-such-clang".to_string()),
            ..InputOverrides::default()
        };
        let err = commands::generate::run(&project_dir, manifest.as_ref(), &overrides, None)
            .unwrap_err();

        assert!(format!("{err:#}").contains("wrapgen-no-such-clang"));
        assert!(!dir.path().join("SDL.hpp").exists());
    }

    #[test]
    fn missing_header_fails_before_front_end() {
        let dir = tempfile::tempdir().unwrap();
        let overrides = InputOverrides {
            header: Some(dir.path().join("absent.h").display().to_string()),
            ..InputOverrides::default()
        };
        let out = dir.path().join("out.hpp");
        let err = commands::generate::run(
            dir.path(),
            None,
            &overrides,
            Some(out.to_str().unwrap()),
        )
        .unwrap_err();

        assert!(format!("{err:#}").contains("header not found"));
        assert!(!out.exists());
    }
}
