use flowsankey::hierarchy::{HierarchyItem, level_list};
use flowsankey::raster::{RasterError, export_png};
use flowsankey::{
    Catalog, DiagramRenderer, FlowGraph, FlowSankeyView, InputBundle, ViewState, Viewport,
};
use serde::Serialize;
use std::io::Read;
use std::path::PathBuf;

#[derive(Debug)]
enum CliError {
    Usage(&'static str),
    Io(std::io::Error),
    Sankey(flowsankey::Error),
    Raster(RasterError),
    Json(serde_json::Error),
    NoData,
}

impl std::fmt::Display for CliError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CliError::Usage(msg) => write!(f, "{msg}"),
            CliError::Io(err) => write!(f, "I/O error: {err}"),
            CliError::Sankey(err) => write!(f, "{err}"),
            CliError::Raster(err) => write!(f, "{err}"),
            CliError::Json(err) => write!(f, "JSON error: {err}"),
            CliError::NoData => write!(f, "No flow data found for applied filters."),
        }
    }
}

impl From<std::io::Error> for CliError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<flowsankey::Error> for CliError {
    fn from(value: flowsankey::Error) -> Self {
        Self::Sankey(value)
    }
}

impl From<RasterError> for CliError {
    fn from(value: RasterError) -> Self {
        match value {
            RasterError::View(flowsankey::Error::NothingRendered { .. }) => Self::NoData,
            other => Self::Raster(other),
        }
    }
}

impl From<serde_json::Error> for CliError {
    fn from(value: serde_json::Error) -> Self {
        Self::Json(value)
    }
}

#[derive(Debug, Clone, Copy, Default)]
enum Command {
    #[default]
    Build,
    Csv,
    Png,
    Levels,
}

#[derive(Debug, Default)]
struct Args {
    command: Command,
    input: Option<String>,
    pretty: bool,
    hide_unconnected: bool,
    side_by_side: bool,
    no_stocks: bool,
    language: Option<String>,
    catalog: Option<String>,
    svg: Option<String>,
    out: Option<String>,
}

fn usage() -> &'static str {
    "flowsankey-cli\n\
\n\
USAGE:\n\
  flowsankey-cli [build] [--pretty] [FILTERS] [<path>|-]\n\
  flowsankey-cli csv [--out <path>] [FILTERS] [<path>|-]\n\
  flowsankey-cli png --svg <rendered.svg> [--out <path>] [FILTERS] [<path>|-]\n\
  flowsankey-cli levels [--pretty] [<path>|-]\n\
\n\
FILTERS:\n\
  --hide-unconnected  --side-by-side  --no-stocks  --language <tag>  --catalog <messages.json>\n\
\n\
NOTES:\n\
  - If <path> is omitted or '-', input is read from stdin.\n\
  - build/csv/png read an input bundle: {origins, destinations, flows, stocks, materials, config}.\n\
  - levels reads a JSON array of {id, name, parent} items.\n\
  - csv prints to stdout unless --out is given.\n\
  - png rasterizes the renderer's SVG at 2x on white; it defaults to ./sankey-diagram.png.\n\
  - Exit code 3 means the filters left no flow to draw.\n\
"
}

fn parse_args(argv: &[String]) -> Result<Args, CliError> {
    let mut args = Args::default();

    let mut it = argv.iter().skip(1);
    while let Some(a) = it.next() {
        match a.as_str() {
            "--help" | "-h" => return Err(CliError::Usage(usage())),
            "build" => args.command = Command::Build,
            "csv" => args.command = Command::Csv,
            "png" => args.command = Command::Png,
            "levels" => args.command = Command::Levels,
            "--pretty" => args.pretty = true,
            "--hide-unconnected" => args.hide_unconnected = true,
            "--side-by-side" => args.side_by_side = true,
            "--no-stocks" => args.no_stocks = true,
            "--language" => {
                let Some(lang) = it.next() else {
                    return Err(CliError::Usage(usage()));
                };
                args.language = Some(lang.clone());
            }
            "--catalog" => {
                let Some(path) = it.next() else {
                    return Err(CliError::Usage(usage()));
                };
                args.catalog = Some(path.clone());
            }
            "--svg" => {
                let Some(path) = it.next() else {
                    return Err(CliError::Usage(usage()));
                };
                args.svg = Some(path.clone());
            }
            "--out" => {
                let Some(out) = it.next() else {
                    return Err(CliError::Usage(usage()));
                };
                args.out = Some(out.clone());
            }
            other if other.starts_with('-') && other != "-" => {
                return Err(CliError::Usage(usage()));
            }
            path => {
                if args.input.is_some() {
                    return Err(CliError::Usage(usage()));
                }
                args.input = Some(path.to_string());
            }
        }
    }

    if matches!(args.command, Command::Png) && args.svg.is_none() {
        return Err(CliError::Usage(usage()));
    }
    Ok(args)
}

fn read_input(input: Option<&str>) -> Result<String, CliError> {
    match input {
        None | Some("-") => {
            let mut buf = String::new();
            std::io::stdin().read_to_string(&mut buf)?;
            Ok(buf)
        }
        Some(path) => Ok(std::fs::read_to_string(path)?),
    }
}

fn write_json(value: &impl Serialize, pretty: bool) -> Result<(), CliError> {
    if pretty {
        serde_json::to_writer_pretty(std::io::stdout().lock(), value)?;
    } else {
        serde_json::to_writer(std::io::stdout().lock(), value)?;
    }
    Ok(())
}

/// Stands in for the interactive renderer: it "draws" by holding on to an SVG produced
/// elsewhere, so snapshots can be taken headlessly.
#[derive(Debug, Default)]
struct SvgFileRenderer {
    svg: Option<String>,
    drawn: bool,
}

impl DiagramRenderer for SvgFileRenderer {
    fn render(&mut self, _graph: &FlowGraph, _viewport: Viewport) {
        self.drawn = true;
    }

    fn show_message(&mut self, _message: &str) {
        self.drawn = false;
    }

    fn set_size(&mut self, _viewport: Viewport) {}

    fn set_all_selected(&mut self, _selected: bool) {}

    fn svg_snapshot(&self) -> Option<String> {
        if self.drawn { self.svg.clone() } else { None }
    }

    fn clear(&mut self) {
        self.drawn = false;
    }
}

/// An empty catalog leaves every message untranslated.
fn load_catalog(path: Option<&str>) -> Result<Catalog, CliError> {
    match path {
        None => Ok(Catalog::default()),
        Some(path) => {
            let text = std::fs::read_to_string(path)?;
            Ok(Catalog::from_json(&text)?)
        }
    }
}

fn run(args: Args) -> Result<(), CliError> {
    let text = read_input(args.input.as_deref())?;

    if let Command::Levels = args.command {
        let items: Vec<HierarchyItem> = serde_json::from_str(&text)?;
        write_json(&level_list(&items), args.pretty)?;
        return Ok(());
    }

    let (inputs, mut config) = InputBundle::from_json(&text)?.into_parts();
    config.hide_unconnected |= args.hide_unconnected;
    config.force_side_by_side |= args.side_by_side;
    if args.no_stocks {
        config.render_stocks = false;
    }
    if let Some(language) = args.language.clone() {
        config.language = language;
    }

    let renderer = SvgFileRenderer {
        svg: match args.svg.as_deref() {
            Some(path) => Some(std::fs::read_to_string(path)?),
            None => None,
        },
        drawn: false,
    };
    let catalog = load_catalog(args.catalog.as_deref())?;
    let mut view = FlowSankeyView::new(inputs, config, renderer).with_localizer(catalog);
    let graph = view.render();
    tracing::info!(
        nodes = graph.nodes.len(),
        links = graph.links.len(),
        "graph built"
    );

    match args.command {
        Command::Build => {
            if view.state() == ViewState::NoData {
                return Err(CliError::NoData);
            }
            write_json(&view.graph(), args.pretty)?;
            Ok(())
        }
        Command::Csv => {
            let csv = view.export_csv()?;
            match args.out.as_deref() {
                None => print!("{}", csv.text),
                Some(path) => std::fs::write(path, csv.text)?,
            }
            Ok(())
        }
        Command::Png => {
            let png = export_png(&view)?;
            let out = args
                .out
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(png.filename));
            std::fs::write(&out, png.bytes)?;
            tracing::info!(path = %out.display(), "wrote snapshot");
            Ok(())
        }
        Command::Levels => Ok(()),
    }
}

fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    init_tracing();

    let args = match parse_args(&std::env::args().collect::<Vec<_>>()) {
        Ok(v) => v,
        Err(CliError::Usage(msg)) => {
            eprintln!("{msg}");
            std::process::exit(2);
        }
        Err(err) => {
            eprintln!("{err}");
            std::process::exit(1);
        }
    };

    match run(args) {
        Ok(()) => {}
        Err(CliError::NoData) => {
            eprintln!("{}", CliError::NoData);
            std::process::exit(3);
        }
        Err(err) => {
            eprintln!("{err}");
            std::process::exit(1);
        }
    }
}
