//! fukidashi - group the OCR lines of manga pages into speech bubbles
//!
//! Reads page records (`{"width", "height", "lines": [...]}`) and writes
//! the resulting groups in reading order, optionally applying manual merges
//! and deletes and fitting a font size to every box.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use clap::{ArgAction, Parser, ValueEnum};
use fukidashi_core::fit::{Extent, FontFitSizer, HeuristicMeasurer};
use fukidashi_core::overlay::{MergeOutcome, PageOverlay, SizedLine};
use fukidashi_core::{Config, GroupId, Orientation, RawPage, TextOrientation};
use serde::Serialize;
use serde_json::{Value, json};
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

/// Orientation policy for fitted text.
#[derive(Debug, Clone, Copy, ValueEnum)]
enum OrientationArg {
    /// Whichever orientation renders larger
    Smart,
    ForceHorizontal,
    ForceVertical,
}

impl From<OrientationArg> for TextOrientation {
    fn from(o: OrientationArg) -> Self {
        match o {
            OrientationArg::Smart => TextOrientation::Smart,
            OrientationArg::ForceHorizontal => TextOrientation::ForceHorizontal,
            OrientationArg::ForceVertical => TextOrientation::ForceVertical,
        }
    }
}

/// Group the OCR lines of manga pages into speech bubbles.
#[derive(Parser, Debug)]
#[command(name = "fukidashi")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// One or more page JSON files
    #[arg(required = true)]
    files: Vec<PathBuf>,

    /// Use debug logging level
    #[arg(short = 'd', long, action = ArgAction::SetTrue)]
    debug: bool,

    /// JSON settings file (camelCase keys, missing keys take defaults)
    #[arg(short = 'c', long)]
    config: Option<PathBuf>,

    // === Grouping options ===
    /// Put every line in its own group
    #[arg(short = 'n', long = "no-auto-merge", action = ArgAction::SetTrue)]
    no_auto_merge: bool,

    /// Maximum reading-axis gap, in median line sizes
    #[arg(long = "dist-k")]
    dist_k: Option<f64>,

    /// Maximum size ratio between two merged lines
    #[arg(long = "font-ratio")]
    font_ratio: Option<f64>,

    /// Minimum perpendicular overlap of two merged lines
    #[arg(long = "overlap-min")]
    overlap_min: Option<f64>,

    /// Comma-separated group ids to merge after grouping (repeatable)
    #[arg(short = 'm', long = "merge")]
    merge: Vec<String>,

    /// Comma-separated group ids to delete after merging
    #[arg(short = 'x', long = "delete")]
    delete: Option<String>,

    // === Fitting options ===
    /// Fit font sizes for the page shown this many pixels wide
    #[arg(short = 'w', long = "display-width")]
    display_width: Option<f64>,

    /// Orientation policy for fitted text
    #[arg(long, value_enum)]
    orientation: Option<OrientationArg>,

    // === Output options ===
    /// Path to file where output is written, or "-" for stdout
    #[arg(short = 'o', long, default_value = "-")]
    outfile: String,

    /// Pretty-print the JSON output
    #[arg(long, action = ArgAction::SetTrue)]
    pretty: bool,
}

fn init_logging(debug: bool) {
    let filter = if debug {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

/// Build the settings from the config file and command line overrides.
fn build_config(args: &Args) -> Result<Config> {
    let mut config = match &args.config {
        Some(path) => {
            let s = std::fs::read_to_string(path)
                .with_context(|| format!("failed to read config {}", path.display()))?;
            Config::from_json_str(&s)
                .with_context(|| format!("invalid config {}", path.display()))?
        }
        None => Config::default(),
    };
    if args.no_auto_merge {
        config.auto_merge_enabled = false;
    }
    if let Some(v) = args.dist_k {
        config.auto_merge_dist_k = v;
    }
    if let Some(v) = args.font_ratio {
        config.auto_merge_font_ratio = v;
    }
    if let Some(v) = args.overlap_min {
        config.auto_merge_overlap_min = v;
    }
    if let Some(o) = args.orientation {
        config.text_orientation = o.into();
    }
    config.validate()?;
    Ok(config)
}

/// Parse a comma-separated list of group ids.
fn parse_ids(s: &str) -> Result<Vec<GroupId>> {
    s.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| {
            s.parse::<u32>()
                .map(GroupId)
                .with_context(|| format!("invalid group id: {s}"))
        })
        .collect()
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct LineOut<'a> {
    index: u32,
    text: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    font_size: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    fit_orientation: Option<&'static str>,
}

fn orientation_name(orientation: Orientation) -> &'static str {
    match orientation {
        Orientation::Horizontal => "horizontal",
        Orientation::Vertical => "vertical",
    }
}

fn render_page(
    path: &Path,
    overlay: &PageOverlay,
    sized: &[SizedLine],
    rejected: Value,
) -> Value {
    let size = overlay.size();
    let groups: Vec<Value> = overlay
        .groups()
        .iter()
        .map(|group| {
            let lines: Vec<LineOut<'_>> = group
                .lines
                .iter()
                .map(|line| {
                    let fit = sized.iter().find(|s| s.line == line.id).map(|s| s.fit);
                    LineOut {
                        index: line.id.0,
                        text: &line.text,
                        font_size: fit.map(|f| f.font_size),
                        fit_orientation: fit.map(|f| orientation_name(f.orientation)),
                    }
                })
                .collect();
            json!({
                "id": group.id.0,
                "bbox": group.bbox,
                "orientation": group.bbox.orientation(size),
                "merged": group.is_merged(),
                "lines": lines,
            })
        })
        .collect();
    json!({
        "file": path.display().to_string(),
        "width": size.width,
        "height": size.height,
        "groups": groups,
        "rejected": rejected,
    })
}

/// Process a single page file.
fn process_file<W: Write>(
    path: &Path,
    writer: &mut W,
    args: &Args,
    config: &Config,
) -> Result<()> {
    let page = RawPage::read(path)?;
    let (size, ingested) = page.ingest()?;
    info!(
        file = %path.display(),
        lines = ingested.lines.len(),
        rejected = ingested.rejected.len(),
        "loaded page"
    );
    let rejected: Vec<Value> = ingested
        .rejected
        .iter()
        .map(|r| json!({ "index": r.index, "reason": r.error.to_string() }))
        .collect();

    let mut overlay = PageOverlay::new(size, ingested.lines, config);

    for list in &args.merge {
        let ids = parse_ids(list)?;
        match overlay.merge_groups(&ids, config) {
            MergeOutcome::Merged(id) => debug!(group = id.0, "merged"),
            MergeOutcome::Skipped(reason) => {
                warn!(file = %path.display(), ids = %list, ?reason, "merge skipped")
            }
        }
    }
    if let Some(list) = &args.delete {
        for id in parse_ids(list)? {
            if !overlay.delete_group(id) {
                warn!(file = %path.display(), group = id.0, "no such group to delete");
            }
        }
    }

    let sized = match args.display_width {
        Some(_) if !size.is_known() => {
            warn!(
                file = %path.display(),
                "skipping font fitting: unknown image dimensions"
            );
            Vec::new()
        }
        Some(width) => {
            let display = Extent::new(width, width * size.height as f64 / size.width as f64);
            let mut sizer = FontFitSizer::new(HeuristicMeasurer::default(), config);
            overlay.size_boxes(display, &mut sizer)
        }
        None => Vec::new(),
    };

    let out = render_page(path, &overlay, &sized, Value::Array(rejected));
    if args.pretty {
        serde_json::to_writer_pretty(&mut *writer, &out)?;
    } else {
        serde_json::to_writer(&mut *writer, &out)?;
    }
    writeln!(writer)?;
    Ok(())
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.debug);

    let config = build_config(&args)?;

    // Open output file or use stdout
    let mut output: Box<dyn Write> = if args.outfile == "-" {
        Box::new(BufWriter::new(io::stdout()))
    } else {
        let file = File::create(&args.outfile)
            .with_context(|| format!("failed to create output file {}", args.outfile))?;
        Box::new(BufWriter::new(file))
    };

    for path in &args.files {
        if !path.exists() {
            bail!("file not found: {}", path.display());
        }
        process_file(path, &mut output, &args, &config)
            .with_context(|| format!("error processing {}", path.display()))?;
    }

    output.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_id_lists() {
        let ids = parse_ids("3, 1,,7").unwrap();
        assert_eq!(ids, vec![GroupId(3), GroupId(1), GroupId(7)]);
        assert!(parse_ids("a").is_err());
    }

    #[test]
    fn overrides_apply_on_top_of_defaults() {
        let args = Args::parse_from([
            "fukidashi",
            "--no-auto-merge",
            "--dist-k",
            "2.5",
            "--orientation",
            "force-vertical",
            "page.json",
        ]);
        let config = build_config(&args).unwrap();
        assert!(!config.auto_merge_enabled);
        assert_eq!(config.auto_merge_dist_k, 2.5);
        assert_eq!(config.text_orientation, TextOrientation::ForceVertical);
        assert_eq!(config.auto_merge_font_ratio, 1.3);
    }

    #[test]
    fn negative_override_is_rejected() {
        let args = Args::parse_from(["fukidashi", "--overlap-min=-1", "page.json"]);
        assert!(build_config(&args).is_err());
    }

    #[test]
    fn page_without_dimensions_is_printed_unsized() {
        let path = std::env::temp_dir().join(format!(
            "fukidashi-no-dims-{}.json",
            std::process::id()
        ));
        let page = json!({
            "lines": [{
                "text": "おい",
                "tightBoundingBox": { "x": 0.1, "y": 0.1, "width": 0.3, "height": 0.05 }
            }]
        });
        std::fs::write(&path, page.to_string()).unwrap();

        let args = Args::parse_from(["fukidashi", "-w", "500", "page.json"]);
        let config = build_config(&args).unwrap();
        let mut buf = Vec::new();
        let result = process_file(&path, &mut buf, &args, &config);
        std::fs::remove_file(&path).unwrap();
        result.unwrap();

        let out: Value = serde_json::from_slice(&buf).unwrap();
        let groups = out["groups"].as_array().unwrap();
        assert_eq!(groups.len(), 1);
        let line = &groups[0]["lines"][0];
        assert_eq!(line["index"], 0);
        assert!(line.get("fontSize").is_none());
    }
}
