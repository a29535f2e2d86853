use crate::config::{load_config, Config};
use crate::export::{export_download, ExportOptions, SvgSurface};
use crate::ir::DiagramRecord;
use crate::layout::compute_layout;
use crate::layout_dump::write_layout_dump;
use crate::parser::parse_dashboard;
use crate::render::{render_svg, write_output_svg};
use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(
    name = "ddr",
    version,
    about = "Render analysis diagrams (fishbone, pareto, SWOT, radar, timeline, ...) from JSON"
)]
pub struct Args {
    /// Input JSON file (record or dashboard) or '-' for stdin
    #[arg(short = 'i', long = "input")]
    pub input: Option<PathBuf>,

    /// Output file, or a directory for multi-diagram input. SVG defaults to stdout.
    #[arg(short = 'o', long = "output")]
    pub output: Option<PathBuf>,

    /// Output format
    #[arg(short = 'e', long = "outputFormat", value_enum, default_value = "svg")]
    pub output_format: OutputFormat,

    /// Config JSON file (layout constants, themeVariables, export scales)
    #[arg(short = 'c', long = "configFile")]
    pub config: Option<PathBuf>,

    /// Use the dark palette
    #[arg(long = "dark")]
    pub dark: bool,

    /// PNG scale factor. Defaults to the configured download scale.
    #[arg(long = "scale")]
    pub scale: Option<f32>,

    /// Copy the first diagram to the system clipboard as an image
    #[arg(long = "clipboard")]
    pub clipboard: bool,

    /// Write the computed layout as JSON next to each output
    #[arg(long = "dumpLayout")]
    pub dump_layout: Option<PathBuf>,
}

#[derive(ValueEnum, Debug, Clone, Copy)]
pub enum OutputFormat {
    Svg,
    Png,
}

impl OutputFormat {
    fn extension(self) -> &'static str {
        match self {
            OutputFormat::Svg => "svg",
            OutputFormat::Png => "png",
        }
    }
}

pub fn run() -> Result<()> {
    let args = Args::parse();
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .try_init();

    let mut config = load_config(args.config.as_deref())?;
    if args.dark {
        config.dark_mode = true;
    }

    let input = read_input(args.input.as_deref())?;
    let dashboard = parse_dashboard(&input)?;
    if dashboard.diagrams.is_empty() {
        return Err(anyhow::anyhow!("No renderable diagrams found in input"));
    }
    if !dashboard.title.is_empty() {
        tracing::info!(title = %dashboard.title, diagrams = dashboard.diagrams.len(), "rendering dashboard");
    }

    let runtime = tokio::runtime::Builder::new_current_thread()
        .build()
        .context("failed to start export runtime")?;

    if args.clipboard {
        let svg = render_record(&dashboard.diagrams[0], &config, None, 0)?;
        let options = ExportOptions::clipboard(config.dark_mode, &config.export);
        let options = match args.scale {
            Some(scale) => ExportOptions { scale, ..options },
            None => options,
        };
        let surface = surface_for(&dashboard.diagrams[0], svg);
        runtime.block_on(copy_to_clipboard(surface, &options))?;
        if args.output.is_none() {
            return Ok(());
        }
    }

    let outputs = if dashboard.diagrams.len() == 1 {
        vec![args.output.clone()]
    } else {
        resolve_multi_outputs(args.output.as_deref(), args.output_format, &dashboard.diagrams)?
            .into_iter()
            .map(Some)
            .collect()
    };

    for (idx, (record, output)) in dashboard.diagrams.iter().zip(outputs).enumerate() {
        let svg = render_record(record, &config, args.dump_layout.as_deref(), idx)?;
        match args.output_format {
            OutputFormat::Svg => write_output_svg(&svg, output.as_deref())?,
            OutputFormat::Png => {
                let output = ensure_output(output, "png")?;
                let mut options = ExportOptions::download(config.dark_mode, &config.export);
                if let Some(scale) = args.scale {
                    options.scale = scale;
                }
                let surface = surface_for(record, svg);
                let download = runtime.block_on(export_download(&surface, record.kind(), &options))?;
                let path = if output.is_dir() {
                    download.save_to(&output)?
                } else {
                    std::fs::write(&output, &download.png)?;
                    output
                };
                tracing::info!(path = %path.display(), "wrote png");
            }
        }
    }

    Ok(())
}

#[cfg(feature = "clipboard")]
async fn copy_to_clipboard(surface: SvgSurface, options: &ExportOptions) -> Result<()> {
    let mut sink = crate::export::SystemClipboard::new()?;
    crate::export::export_to_clipboard(&surface, options, &mut sink).await?;
    Ok(())
}

#[cfg(not(feature = "clipboard"))]
async fn copy_to_clipboard(_surface: SvgSurface, _options: &ExportOptions) -> Result<()> {
    Err(crate::error::ExportError::ClipboardUnavailable(
        "built without the `clipboard` feature".to_string(),
    )
    .into())
}

fn surface_for(record: &DiagramRecord, svg: String) -> SvgSurface {
    SvgSurface::new(svg).with_kind(record.kind())
}

fn render_record(
    record: &DiagramRecord,
    config: &Config,
    dump: Option<&Path>,
    idx: usize,
) -> Result<String> {
    let theme = config.theme();
    let layout = compute_layout(record, &theme, &config.layout);
    if let Some(dump) = dump {
        let path = if idx == 0 {
            dump.to_path_buf()
        } else {
            numbered(dump, idx, "json")
        };
        write_layout_dump(&path, &layout)?;
    }
    Ok(render_svg(&layout, &theme))
}

fn read_input(path: Option<&Path>) -> Result<String> {
    if let Some(path) = path
        && path != Path::new("-")
    {
        return std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()));
    }
    let mut buf = String::new();
    io::stdin().read_to_string(&mut buf)?;
    Ok(buf)
}

fn ensure_output(output: Option<PathBuf>, ext: &str) -> Result<PathBuf> {
    output.ok_or_else(|| anyhow::anyhow!("Output path required for {} output", ext))
}

fn numbered(base: &Path, idx: usize, ext: &str) -> PathBuf {
    let stem = base.file_stem().and_then(|s| s.to_str()).unwrap_or("diagram");
    let parent = base.parent().unwrap_or_else(|| Path::new("."));
    parent.join(format!("{}-{}.{}", stem, idx + 1, ext))
}

fn resolve_multi_outputs(
    output: Option<&Path>,
    format: OutputFormat,
    diagrams: &[DiagramRecord],
) -> Result<Vec<PathBuf>> {
    let ext = format.extension();
    let base = output.ok_or_else(|| anyhow::anyhow!("Output path required for dashboard input"))?;
    if base.is_dir() {
        return Ok(diagrams
            .iter()
            .enumerate()
            .map(|(idx, record)| {
                base.join(format!("{}-{}.{}", idx + 1, record.kind().file_stem(), ext))
            })
            .collect());
    }
    Ok((0..diagrams.len())
        .map(|idx| numbered(base, idx, ext))
        .collect())
}
