use clap::{Parser, Subcommand, ValueEnum};
use edge_viewer::tools::{load_nv21, luma_stats, repeat_count, save_luma};
use edge_viewer::utils::packing::checkerboard;
use edge_viewer::{PipelineConfig, ViewerContext, ViewerMode, identity_rows, native_hello};
use std::io::IsTerminal;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::Instant;

#[derive(Parser)]
#[command(name = "edgeviewer", version, about = "EdgeViewer frame pipeline tools")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Clone, Copy, ValueEnum)]
enum ModeArg {
    Edges,
    Gray,
}

impl From<ModeArg> for ViewerMode {
    fn from(mode: ModeArg) -> Self {
        match mode {
            ModeArg::Edges => ViewerMode::EdgeDetect,
            ModeArg::Gray => ViewerMode::Grayscale,
        }
    }
}

#[derive(Subcommand)]
enum Command {
    /// Encode an image as NV21, run it through the pipeline, save the result
    Process {
        #[arg(long)]
        image: PathBuf,
        #[arg(long)]
        out: PathBuf,
        #[arg(long, value_enum, default_value = "edges")]
        mode: ModeArg,
        /// Run the frame this many times (defaults to EDGE_VIEWER_REPEAT or 1)
        #[arg(long)]
        repeat: Option<usize>,
    },
    /// Write the synthetic test pattern used when no camera frame is available
    Checkerboard {
        #[arg(long, default_value_t = 640)]
        width: usize,
        #[arg(long, default_value_t = 480)]
        height: usize,
        #[arg(long)]
        out: PathBuf,
    },
    /// Print the bridge readiness string and a linked-stack smoke check
    Hello,
}

fn main() -> ExitCode {
    init_tracing();
    let cli = Cli::parse();

    let result = match cli.command {
        Command::Process {
            image,
            out,
            mode,
            repeat,
        } => process_cmd(&image, &out, mode.into(), repeat_count(repeat)),
        Command::Checkerboard { width, height, out } => checkerboard_cmd(width, height, &out),
        Command::Hello => {
            println!("{}", native_hello());
            println!("identity rows: {}", identity_rows());
            Ok(())
        }
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{err}");
            ExitCode::FAILURE
        }
    }
}

fn init_tracing() {
    let ansi_enabled = std::env::var_os("NO_COLOR").is_none() && std::io::stderr().is_terminal();
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .with_ansi(ansi_enabled)
        .init();
}

fn process_cmd(image: &Path, out: &Path, mode: ViewerMode, repeat: usize) -> Result<(), String> {
    let (nv21, width, height) = load_nv21(image)
        .map_err(|err| format!("Failed to load image {}: {}", image.display(), err))?;
    println!("Image: {} ({}x{})", image.display(), width, height);

    let ctx = ViewerContext::with_config(PipelineConfig::from_env());
    ctx.set_mode(mode);
    let mut output = vec![0u8; width * height];

    let start = Instant::now();
    let mut last = None;
    for _ in 0..repeat {
        let report = ctx
            .process_frame(&nv21, width, height, &mut output)
            .map_err(|err| format!("processFrame failed: {err}"))?;
        last = Some(report);
    }
    let elapsed = start.elapsed();

    if let Some(report) = last {
        let stats = luma_stats(&output);
        println!(
            "Mode: {} source={:?} transform_non_zero={:.2}%",
            report.mode, report.source, report.non_zero_percent
        );
        println!(
            "Output range: {}-{}, non-zero: {:.2}%",
            stats.min,
            stats.max,
            stats.non_zero_percent()
        );
        println!(
            "Frames: {} total={:.2?} avg={:.2?}",
            repeat,
            elapsed,
            elapsed / repeat as u32
        );
    }

    save_luma(out, &output, width, height)
        .map_err(|err| format!("Failed to save {}: {}", out.display(), err))
}

fn checkerboard_cmd(width: usize, height: usize, out: &Path) -> Result<(), String> {
    let pattern = checkerboard(width, height);
    save_luma(out, &pattern, width, height)
        .map_err(|err| format!("Failed to save {}: {}", out.display(), err))?;
    println!("Wrote {}x{} checkerboard to {}", width, height, out.display());
    Ok(())
}
