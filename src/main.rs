//! ansimirc - Convert ANSI art to mIRC art and back, or render either to PNG

use ansimirc::config::Config;
use ansimirc::format::{self, Format};
use ansimirc::render::{self, GlyphSource};
use ansimirc::sauce::Record;
use ansimirc::{font, Canvas};
use anyhow::{bail, Context, Result};
use clap::{Parser, ValueEnum};
use std::io::{Cursor, Read, Write};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum InputFormat {
    Ansi,
    Mirc,
}

impl From<InputFormat> for Format {
    fn from(format: InputFormat) -> Self {
        match format {
            InputFormat::Ansi => Format::Ansi,
            InputFormat::Mirc => Format::Mirc,
        }
    }
}

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Input file (default: stdin)
    #[arg(short, long = "in")]
    input: Option<PathBuf>,
    /// Output file (default: stdout); a .png extension renders an image
    #[arg(short, long = "out")]
    output: Option<PathBuf>,
    /// Canvas width in columns (default: SAUCE width, then the config)
    #[arg(short, long)]
    width: Option<usize>,
    /// Input format, skipping detection
    #[arg(long, value_enum)]
    from: Option<InputFormat>,
    /// Render a PNG image instead of converting
    #[arg(long)]
    png: bool,
    /// Also write a thumbnail rendered at SCALE
    #[arg(long, value_name = "SCALE")]
    thumb: Option<f32>,
    /// Reduce mIRC colors to the 16-color palette
    #[arg(long = "16")]
    force_16: bool,
    /// Write all 99 mIRC colors instead of the classic 16
    #[arg(long)]
    extended: bool,
    /// Config file (default: platform config directory)
    #[arg(long)]
    config: Option<PathBuf>,
}

impl Cli {
    fn wants_png(&self) -> bool {
        self.png || self.thumb.is_some() || self.output.as_deref().is_some_and(is_png_path)
    }
}

fn is_png_path(path: &Path) -> bool {
    path.extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("png"))
}

/// "art.png" becomes "art_thumb.png"
fn thumb_path(path: &Path) -> PathBuf {
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    path.with_file_name(format!("{}_thumb.png", stem))
}

fn load_config(cli: &Cli) -> Result<Config> {
    let mut config = match &cli.config {
        Some(path) => Config::load_from(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => Config::load_or_default(),
    };

    if cli.force_16 {
        config.mirc.force_16 = true;
    }
    if cli.extended {
        config.mirc.extended_colors = true;
    }
    if let Some(scale) = cli.thumb {
        config.render.thumb_scale = scale;
    }
    Ok(config)
}

fn read_input(path: Option<&Path>) -> Result<Vec<u8>> {
    match path {
        Some(path) => {
            std::fs::read(path).with_context(|| format!("Failed to read {}", path.display()))
        }
        None => {
            let mut data = Vec::new();
            std::io::stdin()
                .read_to_end(&mut data)
                .context("Failed to read stdin")?;
            Ok(data)
        }
    }
}

fn write_png(canvas: &Canvas, glyphs: &dyn GlyphSource, config: &Config, thumbnail: bool, path: &Path) -> Result<()> {
    let image = render::rasterize(canvas, glyphs, &config.render_options(thumbnail));
    image
        .save(path)
        .with_context(|| format!("Failed to write {}", path.display()))?;
    eprintln!("Generated {}: {}", if thumbnail { "thumbnail" } else { "PNG" }, path.display());
    Ok(())
}

fn render_images(cli: &Cli, canvas: &Canvas, config: &Config) -> Result<()> {
    let Some(output) = &cli.output else {
        bail!("An output path (-o) is required for image output");
    };
    let output = if is_png_path(output) {
        output.clone()
    } else {
        output.with_extension("png")
    };

    let glyphs = font::load_font(&config.font).context("Failed to load a font for rendering")?;

    // A bare --thumb writes only the thumbnail
    if cli.png || cli.thumb.is_none() {
        write_png(canvas, &glyphs, config, false, &output)?;
    }
    if cli.thumb.is_some() {
        write_png(canvas, &glyphs, config, true, &thumb_path(&output))?;
    }
    Ok(())
}

fn write_text(cli: &Cli, data: &[u8]) -> Result<()> {
    match &cli.output {
        Some(path) => {
            std::fs::write(path, data)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            eprintln!("Generated text file: {}", path.display());
        }
        None => {
            let mut stdout = std::io::stdout().lock();
            stdout.write_all(data).context("Failed to write stdout")?;
            stdout.flush()?;
        }
    }
    Ok(())
}

fn run(cli: Cli) -> Result<()> {
    let config = load_config(&cli)?;

    let mut reader = Cursor::new(read_input(cli.input.as_deref())?);
    let record = Record::read(&mut reader).context("Failed to probe SAUCE record")?;

    let width = cli
        .width
        .or_else(|| record.as_ref().and_then(Record::width))
        .unwrap_or(config.canvas.width);
    let byte_limit = record.as_ref().and_then(Record::byte_limit);

    let format = match cli.from {
        Some(from) => from.into(),
        None => format::detect_format(reader.get_ref()),
    };
    if format == Format::Unknown {
        bail!("Could not detect the input format; pass --from ansi or --from mirc");
    }
    tracing::info!(?format, width, "converting");

    let mut canvas = Canvas::new(width);
    format::decode(format, &mut canvas, &mut reader, &config.decode_options(byte_limit))
        .context("Failed to decode input")?;

    if cli.wants_png() {
        render_images(&cli, &canvas, &config)
    } else {
        let data = format::encode(format.opposite(), &canvas, &config.encode_options());
        write_text(&cli, &data)
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    run(Cli::parse())
}
