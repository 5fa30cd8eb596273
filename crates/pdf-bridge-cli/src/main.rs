mod logger;

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand, ValueEnum};
use logger::StderrLogger;
use pdf_bridge_host::{AlertSink, HostShell, Platform, Presentation, ShellState, ViewerOptions};
use pdf_bridge_payload::{
    DEFAULT_MEDIA_TYPE, DefaultTransport, FetchedBody, Handoff, SourceDescriptor, encode_data_url,
};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "pdfb", about = "PDF bridge CLI", version)]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Resolve a PDF source the way the host shell would
    Resolve {
        /// URI handed straight to the viewer (http, https, file, content)
        #[arg(long, conflicts_with_all = ["base64", "pdf"])]
        uri: Option<String>,

        /// Inline `data:` payload
        #[arg(long, conflicts_with = "pdf")]
        base64: Option<String>,

        /// Local PDF file, sent as an inline payload
        #[arg(long)]
        pdf: Option<PathBuf>,

        /// Transport header as NAME=VALUE (repeatable)
        #[arg(long = "header", value_parser = parse_header)]
        headers: Vec<(String, String)>,

        /// Viewer options JSON file
        #[arg(long)]
        config: Option<PathBuf>,

        /// Target platform, overriding the config
        #[arg(long, value_enum)]
        platform: Option<PlatformArg>,

        /// Viewport width in pixels, overriding the config
        #[arg(long)]
        width: Option<u32>,

        /// Renderer bundle script, overriding the config
        #[arg(long)]
        bundle: Option<PathBuf>,

        /// Write the packaged HTML artifact here
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Show the handoff values stored in a packaged artifact
    Inspect {
        /// Packaged HTML artifact
        artifact: PathBuf,
    },

    /// Render every page of a packaged artifact to PNG
    Read {
        /// Packaged HTML artifact
        artifact: PathBuf,

        /// Directory receiving page-N.png files
        #[arg(long)]
        out_dir: PathBuf,

        /// Directory containing the pdfium library
        #[arg(long)]
        pdfium_dir: Option<PathBuf>,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum PlatformArg {
    Ios,
    Android,
    Other,
}

impl From<PlatformArg> for Platform {
    fn from(arg: PlatformArg) -> Self {
        match arg {
            PlatformArg::Ios => Self::Ios,
            PlatformArg::Android => Self::Android,
            PlatformArg::Other => Self::Other,
        }
    }
}

fn parse_header(raw: &str) -> std::result::Result<(String, String), String> {
    match raw.split_once('=') {
        Some((name, value)) if !name.trim().is_empty() => {
            Ok((name.trim().to_string(), value.to_string()))
        }
        _ => Err(format!("expected NAME=VALUE, got '{}'", raw)),
    }
}

/// Prints alerts to stderr
struct ConsoleAlerts;

impl AlertSink for ConsoleAlerts {
    fn alert(&self, message: &str) {
        eprintln!("alert: {}", message);
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    StderrLogger::from_verbosity(cli.verbose).init()?;

    match cli.command {
        Commands::Resolve {
            uri,
            base64,
            pdf,
            headers,
            config,
            platform,
            width,
            bundle,
            output,
        } => {
            let mut options = match &config {
                Some(path) => ViewerOptions::load(path)
                    .await
                    .with_context(|| format!("loading {}", path.display()))?,
                None => ViewerOptions::default(),
            };
            if let Some(platform) = platform {
                options.platform = platform.into();
            }
            if width.is_some() {
                options.viewport_width = width;
            }
            if bundle.is_some() {
                options.bundle = bundle;
            }

            let base64 = match pdf {
                Some(path) => Some(pdf_to_data_url(&path).await?),
                None => base64,
            };
            let mut source = SourceDescriptor {
                uri,
                base64,
                ..Default::default()
            };
            for (name, value) in headers {
                source = source.with_header(name, value);
            }

            let mut shell = HostShell::new(source, DefaultTransport::new(), options)?
                .with_alerts(ConsoleAlerts)
                .on_ready(|| log::info!("Viewer ready"));

            match shell.resolve().await {
                ShellState::Ready(Presentation::Uri(uri)) => {
                    println!("Direct URI → {}", uri);
                }
                ShellState::Ready(Presentation::Html(artifact)) => {
                    let handoff = artifact.handoff();
                    println!("Packaged inline payload:");
                    println!("  Viewport width: {}", handoff.viewport_width);
                    println!("  Payload length: {}", handoff.payload.len());
                    println!("  Artifact size: {} bytes", artifact.html().len());
                    if let Some(path) = &output {
                        tokio::fs::write(path, artifact.html()).await?;
                        println!("Artifact → {}", path.display());
                    }
                }
                ShellState::Failed(e) => bail!("Failed to resolve source: {}", e),
                ShellState::Initializing | ShellState::Resolving => {
                    bail!("Shell did not finish resolving")
                }
            }
        }

        Commands::Inspect { artifact } => {
            let html = tokio::fs::read_to_string(&artifact)
                .await
                .with_context(|| format!("reading {}", artifact.display()))?;
            let handoff = Handoff::from_html(&html)?;

            let header = handoff
                .payload
                .split_once(',')
                .map(|(header, _)| header)
                .unwrap_or(&*handoff.payload);
            println!("Handoff:");
            println!("  Viewport width: {}", handoff.viewport_width);
            println!("  Payload header: {}", header);
            println!("  Payload length: {}", handoff.payload.len());
        }

        Commands::Read {
            artifact,
            out_dir,
            pdfium_dir,
        } => {
            read(&artifact, &out_dir, pdfium_dir).await?;
        }
    }

    Ok(())
}

async fn pdf_to_data_url(path: &Path) -> Result<String> {
    let bytes = tokio::fs::read(path)
        .await
        .with_context(|| format!("reading {}", path.display()))?;
    let body = FetchedBody {
        content_type: Some(DEFAULT_MEDIA_TYPE.to_string()),
        bytes,
    };
    Ok(encode_data_url(&body)?)
}

#[cfg(feature = "pdfium")]
async fn read(artifact: &Path, out_dir: &Path, pdfium_dir: Option<PathBuf>) -> Result<()> {
    use pdf_bridge_reader::{PdfiumRenderer, reader_task};
    use pdf_bridge_runtime::{PageNumber, ReaderUpdate};

    let html = tokio::fs::read_to_string(artifact)
        .await
        .with_context(|| format!("reading {}", artifact.display()))?;
    let handoff = Handoff::from_html(&html)?;

    let (update_tx, mut update_rx) = tokio::sync::mpsc::unbounded_channel();
    let task = reader_task(handoff, PdfiumRenderer::new(pdfium_dir), update_tx);
    let drain = async {
        while let Some(update) = update_rx.recv().await {
            match update {
                ReaderUpdate::DocumentLoaded { num_pages } => {
                    println!("Document loaded: {} pages", num_pages)
                }
                ReaderUpdate::PageCached { page } => log::info!("Cached page {}", page),
                ReaderUpdate::Alert { message, fatal } => {
                    let kind = if fatal { "error" } else { "warning" };
                    eprintln!("{}: {}", kind, message);
                }
                ReaderUpdate::Settled => break,
            }
        }
    };
    let (reader, ()) = tokio::join!(task, drain);

    if reader.is_halted() {
        bail!("Document could not be loaded");
    }

    tokio::fs::create_dir_all(out_dir).await?;
    let num_pages = reader.session().num_pages.unwrap_or(0);
    let mut written = 0;
    for page in PageNumber::range(num_pages) {
        let Some(image) = reader.cache().read(page) else {
            log::warn!("Page {} was not cached", page);
            continue;
        };
        let path = out_dir.join(format!("page-{}.png", page));
        tokio::fs::write(&path, image.png()).await?;
        written += 1;
    }

    println!("Wrote {} of {} pages → {}", written, num_pages, out_dir.display());
    Ok(())
}

#[cfg(not(feature = "pdfium"))]
async fn read(_artifact: &Path, _out_dir: &Path, _pdfium_dir: Option<PathBuf>) -> Result<()> {
    bail!("pdfb was built without the `pdfium` feature; rebuild with --features pdfium")
}
