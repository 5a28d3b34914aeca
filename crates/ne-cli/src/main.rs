//! Normal editor command-line driver
//!
//! Batch operations on mesh normals without a viewport.
//!
//! # Usage
//!
//! ```bash
//! # Recompute smooth normals and store them as a normal set
//! normal-editor recompute model.obj -o model.normals.ron
//!
//! # Check whether a mesh can be mirrored left/right
//! normal-editor mirror-check model.obj --mode right-to-left
//!
//! # Bake a tangent-space normal map
//! normal-editor bake model.obj --width 1024 --height 1024 --tangent-space -o model_n.png
//!
//! # Read normals back from a normal map
//! normal-editor sample model.obj model_n.png --tangent-space -o model.normals.ron
//! ```

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, Subcommand, ValueEnum};
use ne_core::mesh::{LoadedMesh, MeshError, load_obj};
use ne_core::mirror::build_relation;
use ne_core::{EditError, EditSession, EditorSettings, MirrorMode, NormalEncoding, NormalSet};

/// Normal editor
#[derive(Parser, Debug)]
#[command(name = "normal-editor")]
#[command(author, version, about = "Per-vertex normal editing tools", long_about = None)]
struct Cli {
    /// Editor settings file (RON)
    #[arg(short, long, global = true)]
    settings: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Recompute normals from the mesh topology
    Recompute {
        /// Input mesh (OBJ)
        mesh: PathBuf,

        /// Output normal set
        #[arg(short, long)]
        output: PathBuf,
    },

    /// Report how many vertices pair up across a mirror plane
    MirrorCheck {
        /// Input mesh (OBJ)
        mesh: PathBuf,

        /// Mirror direction
        #[arg(short, long, value_enum, default_value = "right-to-left")]
        mode: ModeArg,

        /// Position tolerance (defaults to the settings value)
        #[arg(short, long)]
        epsilon: Option<f32>,
    },

    /// Bake normals into a texture (.png is 8-bit, anything else float)
    Bake {
        /// Input mesh (OBJ, must have texture coordinates)
        mesh: PathBuf,

        /// Normal set to bake instead of the mesh normals
        #[arg(short, long)]
        normals: Option<PathBuf>,

        /// Texture width
        #[arg(long, default_value = "1024")]
        width: u32,

        /// Texture height
        #[arg(long, default_value = "1024")]
        height: u32,

        /// Store normals relative to the mesh tangent frame
        #[arg(long)]
        tangent_space: bool,

        /// Output image
        #[arg(short, long)]
        output: PathBuf,
    },

    /// Sample normals from a normal map at the vertex UVs
    Sample {
        /// Input mesh (OBJ, must have texture coordinates)
        mesh: PathBuf,

        /// Normal map image
        map: PathBuf,

        /// Map uses two-channel (alpha/green) packing
        #[arg(long)]
        packed: bool,

        /// Map is in tangent space
        #[arg(long)]
        tangent_space: bool,

        /// Output normal set
        #[arg(short, long)]
        output: PathBuf,
    },
}

/// Mirror directions accepted on the command line
#[derive(ValueEnum, Debug, Clone, Copy)]
enum ModeArg {
    RightToLeft,
    LeftToRight,
    ForwardToBack,
    BackToForward,
    UpToDown,
    DownToUp,
}

impl From<ModeArg> for MirrorMode {
    fn from(mode: ModeArg) -> Self {
        match mode {
            ModeArg::RightToLeft => MirrorMode::RightToLeft,
            ModeArg::LeftToRight => MirrorMode::LeftToRight,
            ModeArg::ForwardToBack => MirrorMode::ForwardToBack,
            ModeArg::BackToForward => MirrorMode::BackToForward,
            ModeArg::UpToDown => MirrorMode::UpToDown,
            ModeArg::DownToUp => MirrorMode::DownToUp,
        }
    }
}

/// Command failures
#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error(transparent)]
    Mesh(#[from] MeshError),
    #[error(transparent)]
    Edit(#[from] EditError),
}

fn main() -> ExitCode {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "ne_core=info,ne_cli=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<(), CliError> {
    let settings = match &cli.settings {
        Some(path) => EditorSettings::load(path)?,
        None => EditorSettings::default(),
    };

    match cli.command {
        Commands::Recompute { mesh, output } => recompute(&mesh, &output),
        Commands::MirrorCheck {
            mesh,
            mode,
            epsilon,
        } => mirror_check(&mesh, mode.into(), epsilon.unwrap_or(settings.mirror_epsilon)),
        Commands::Bake {
            mesh,
            normals,
            width,
            height,
            tangent_space,
            output,
        } => bake(
            &mesh,
            normals.as_deref(),
            settings,
            (width, height),
            tangent_space,
            &output,
        ),
        Commands::Sample {
            mesh,
            map,
            packed,
            tangent_space,
            output,
        } => {
            let encoding = if packed {
                NormalEncoding::Packed
            } else {
                NormalEncoding::Rgb
            };
            sample(&mesh, &map, settings, encoding, tangent_space, &output)
        }
    }
}

fn recompute(mesh_path: &Path, output: &Path) -> Result<(), CliError> {
    let LoadedMesh {
        name,
        mesh,
        mut normals,
    } = load_obj(mesh_path)?;
    let session = EditSession::new(mesh);
    session.reset_normals(&mut normals)?;
    NormalSet::new(name, normals).save(output)?;
    Ok(())
}

fn mirror_check(mesh_path: &Path, mode: MirrorMode, epsilon: f32) -> Result<(), CliError> {
    let loaded = load_obj(mesh_path)?;
    let Some(plane_normal) = mode.plane_normal() else {
        return Ok(());
    };

    let relation = build_relation(loaded.mesh.positions(), &loaded.normals, plane_normal, epsilon)?;
    let unpaired = (0..relation.len())
        .filter(|&i| {
            let side = loaded.mesh.positions()[i].dot(plane_normal);
            side < -epsilon && relation.counterpart(i).is_none()
        })
        .count();

    tracing::info!(
        "{}: {} pairs for '{}', {} source vertices without a counterpart",
        loaded.name,
        relation.pair_count(),
        mode.name(),
        unpaired
    );
    Ok(())
}

fn bake(
    mesh_path: &Path,
    normals_path: Option<&Path>,
    settings: EditorSettings,
    (width, height): (u32, u32),
    tangent_space: bool,
    output: &Path,
) -> Result<(), CliError> {
    let LoadedMesh {
        mesh, mut normals, ..
    } = load_obj(mesh_path)?;
    let mut session = EditSession::with_settings(mesh, settings).with_base_normals(normals.clone())?;
    if let Some(path) = normals_path {
        NormalSet::load(path)?.apply_to(&mut normals)?;
    }

    session.apply_mirroring(&mut normals)?;
    session.bake_to_texture(&normals, width, height, tangent_space, output)?;
    Ok(())
}

fn sample(
    mesh_path: &Path,
    map_path: &Path,
    settings: EditorSettings,
    encoding: NormalEncoding,
    tangent_space: bool,
    output: &Path,
) -> Result<(), CliError> {
    let LoadedMesh {
        name,
        mesh,
        mut normals,
    } = load_obj(mesh_path)?;

    let mut session = EditSession::with_settings(mesh, settings).with_base_normals(normals.clone())?;
    session.bake_from_texture(map_path, encoding, tangent_space, &mut normals)?;
    session.apply_mirroring(&mut normals)?;
    NormalSet::new(name, normals).save(output)?;
    Ok(())
}
