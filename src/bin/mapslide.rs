use std::{
    collections::BTreeSet,
    io::Write as _,
    path::{Path, PathBuf},
};

use anyhow::Context as _;
use clap::{Args, Parser, Subcommand};
use mapslide::{
    CartogramGrid, CatalogSource, FeedConfig, FrameTemplate, GridSize, Interpolate, MapProvider,
    MapRenderer, OutputKind, OverlayConfig, PngSequenceSink, RenderRequest, Rgb8,
    SimplificationPolicy, StyleConfig, Stylesheet, ViewportConfig, decode_background,
};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "mapslide", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render an SVG document, animated between the true and cartogram shapes by default.
    Svg(SvgArgs),
    /// Render a JSON object of region name to path data.
    Json(JsonArgs),
    /// Render a PNG, or a numbered PNG sequence with `--anim-frames`.
    Png(PngArgs),
}

#[derive(Args, Debug)]
struct CommonArgs {
    /// Catalog JSON holding maps, region geometry, datasets and point tables.
    #[arg(long)]
    catalog: PathBuf,

    /// Name of the map to render.
    #[arg(long)]
    map: String,

    /// Cartogram grid file for the map.
    #[arg(long)]
    cart: Option<PathBuf>,

    /// Dataset used to mark which regions have data.
    #[arg(long)]
    dataset: Option<String>,

    /// Simplification tolerance for every region.
    #[arg(long, default_value_t = 1000.0)]
    simplification: f64,

    /// Tolerance for the regions listed in `--alternate-simplification-regions`.
    #[arg(long, requires = "alternate_simplification_regions")]
    alternate_simplification: Option<f64>,

    /// Regions using the alternate tolerance (comma-separated).
    #[arg(long, value_delimiter = ',')]
    alternate_simplification_regions: Vec<String>,

    /// JSON object of region name to tolerance, applied last.
    #[arg(long)]
    simplification_json: Option<String>,

    /// Render just this region.
    #[arg(long)]
    region: Option<String>,

    /// Regions to leave out (comma-separated).
    #[arg(long, value_delimiter = ',')]
    exclude_regions: Vec<String>,

    /// Drop polygons much smaller than each region's largest.
    #[arg(long)]
    omit_small_islands: bool,

    /// Percentage of the largest polygon's area below which a polygon is dropped.
    #[arg(long, default_value_t = 10.0)]
    small_island_threshold: f64,

    /// Override the map's SRID.
    #[arg(long)]
    srid: Option<i32>,

    /// Output size, `<width>x<height>`.
    #[arg(long)]
    output_grid: Option<GridSize>,

    /// Fit the output inside a box, `<width>x<height>`, keeping the aspect ratio.
    #[arg(long = "box")]
    fit_box: Option<GridSize>,

    /// Output width; the height follows the aspect ratio unless given too.
    #[arg(long)]
    width: Option<u32>,

    /// Output height; the width follows the aspect ratio unless given too.
    #[arg(long)]
    height: Option<u32>,

    /// Output file (stdout when omitted).
    #[arg(short, long)]
    output: Option<PathBuf>,
}

#[derive(Args, Debug)]
struct OverlayArgs {
    /// Point table to plot as circles.
    #[arg(long)]
    circles: Option<String>,

    /// Circle radius in output units.
    #[arg(long, default_value_t = 2.0)]
    circle_radius: f64,

    /// Circle opacity.
    #[arg(long, default_value_t = 0.1)]
    circle_opacity: f64,

    /// Circle fill colour.
    #[arg(long, default_value = "FF0000")]
    circle_fill_colour: Rgb8,
}

impl OverlayArgs {
    fn config(&self) -> Option<OverlayConfig> {
        self.circles.as_ref().map(|table| OverlayConfig {
            table: table.clone(),
            radius: self.circle_radius,
            opacity: self.circle_opacity,
            fill: self.circle_fill_colour,
        })
    }
}

#[derive(Args, Debug)]
struct SvgArgs {
    #[command(flatten)]
    common: CommonArgs,

    #[command(flatten)]
    overlay: OverlayArgs,

    /// Do not animate.
    #[arg(long = "static")]
    static_only: bool,

    /// Pin the static pose (0 = true shape, 1 = cartogram).
    #[arg(long)]
    slide: Option<f64>,

    /// Decimal places in coordinates.
    #[arg(long, default_value_t = 0)]
    decimal_places: usize,

    /// Stroke width in output units.
    #[arg(long, default_value_t = 1.0)]
    stroke_width: f64,

    /// Extra classes for every region path (comma-separated).
    #[arg(long, value_delimiter = ',')]
    classes: Vec<String>,

    /// Replace the default inline stylesheet.
    #[arg(long, conflicts_with = "no_inline_style")]
    inline_style: Option<String>,

    /// Leave out the inline stylesheet.
    #[arg(long)]
    no_inline_style: bool,

    /// Stylesheet file appended to the inline styles.
    #[arg(long)]
    style: Option<PathBuf>,

    /// Leave out the bounds rectangle.
    #[arg(long)]
    no_bounds: bool,

    /// Draw the world outline under the regions.
    #[arg(long)]
    outline: bool,
}

#[derive(Args, Debug)]
struct JsonArgs {
    #[command(flatten)]
    common: CommonArgs,

    /// Decimal places in coordinates.
    #[arg(long, default_value_t = 0)]
    decimal_places: usize,
}

#[derive(Args, Debug)]
struct PngArgs {
    #[command(flatten)]
    common: CommonArgs,

    #[command(flatten)]
    overlay: OverlayArgs,

    /// Number of animation frames; `--output` must then contain `%d`.
    #[arg(long)]
    anim_frames: Option<u32>,

    /// Pin the single frame's slide (0 = true shape, 1 = cartogram).
    #[arg(long, conflicts_with = "anim_frames")]
    slide: Option<f64>,

    #[arg(long, default_value = "F7D3AA")]
    fill_colour: Rgb8,

    /// Fill for regions outside the dataset.
    #[arg(long, default_value = "FFFFFF")]
    fill_colour_no_data: Rgb8,

    #[arg(long, default_value = "A08070")]
    stroke_colour: Rgb8,

    /// Fill regions without stroking them.
    #[arg(long)]
    no_stroke: bool,

    /// Stroke width in pixels.
    #[arg(long, default_value_t = 1.0)]
    stroke_width: f64,

    #[arg(long, default_value = "9EC7F3")]
    background_colour: Rgb8,

    /// Draw over this image instead of the background colour; it must match the output size.
    #[arg(long)]
    overlay_on: Option<PathBuf>,

    /// Stroke the world outline under the regions.
    #[arg(long)]
    outline: bool,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.cmd {
        Command::Svg(args) => cmd_svg(args),
        Command::Json(args) => cmd_json(args),
        Command::Png(args) => cmd_png(args),
    }
}

fn base_request(common: &CommonArgs, output: OutputKind) -> anyhow::Result<RenderRequest> {
    let mut simplification = SimplificationPolicy::new(common.simplification);
    if let Some(tolerance) = common.alternate_simplification {
        simplification =
            simplification.with_alternate(tolerance, &common.alternate_simplification_regions);
    }
    if let Some(json) = common.simplification_json.as_deref() {
        simplification = simplification.with_json(json)?;
    }

    Ok(RenderRequest {
        map: common.map.clone(),
        output,
        feed: FeedConfig {
            simplification,
            dataset: common.dataset.clone(),
            region: common.region.clone(),
            exclude: common.exclude_regions.iter().cloned().collect::<BTreeSet<_>>(),
            small_island_threshold: common
                .omit_small_islands
                .then_some(common.small_island_threshold),
            srid: common.srid,
        },
        viewport: ViewportConfig {
            output_grid: common.output_grid,
            fit_box: common.fit_box,
            width: common.width,
            height: common.height,
        },
        ..Default::default()
    })
}

fn read_text(path: &Path) -> anyhow::Result<String> {
    std::fs::read_to_string(path).with_context(|| format!("read '{}'", path.display()))
}

fn write_output(path: Option<&Path>, bytes: &[u8]) -> anyhow::Result<()> {
    match path {
        Some(path) => {
            std::fs::write(path, bytes).with_context(|| format!("write '{}'", path.display()))
        }
        None => {
            let mut out = std::io::stdout().lock();
            out.write_all(bytes).context("write stdout")?;
            out.flush().context("flush stdout")
        }
    }
}

/// Loads the catalog, map and cartogram grid, then hands a renderer to `f`.
fn with_renderer<T>(
    common: &CommonArgs,
    request: &RenderRequest,
    f: impl FnOnce(&MapRenderer<'_>) -> anyhow::Result<T>,
) -> anyhow::Result<T> {
    request.validate(common.cart.is_some())?;

    let source = CatalogSource::from_path(&common.catalog)?;
    let map = source.load_map(&request.map)?;
    let grid = common
        .cart
        .as_deref()
        .map(|path| CartogramGrid::from_path(path, &map))
        .transpose()?;
    let interp = grid.as_ref().map(|g| g as &dyn Interpolate);

    let renderer = MapRenderer::new(map, &source, request, interp)?;
    f(&renderer)
}

fn cmd_svg(args: SvgArgs) -> anyhow::Result<()> {
    let mut request = base_request(&args.common, OutputKind::Svg)?;
    request.animation.animate = !args.static_only;
    request.animation.slide = args.slide;
    request.decimal_places = args.decimal_places;
    request.bounds_rect = !args.no_bounds;
    request.outline = args.outline;
    request.overlay = args.overlay.config();
    request.style = StyleConfig {
        stylesheet: match (args.no_inline_style, args.inline_style) {
            (true, _) => Stylesheet::Omitted,
            (false, Some(css)) => Stylesheet::Inline(css),
            (false, None) => Stylesheet::Default,
        },
        external_stylesheet: args.style.as_deref().map(read_text).transpose()?,
        classes: args.classes,
        stroke_width: args.stroke_width,
        ..Default::default()
    };
    if request.animation.slide.is_some() {
        request.animation.animate = false;
    }

    let svg = with_renderer(&args.common, &request, |r| Ok(r.render_svg()?))?;
    write_output(args.common.output.as_deref(), svg.as_bytes())
}

fn cmd_json(args: JsonArgs) -> anyhow::Result<()> {
    let mut request = base_request(&args.common, OutputKind::Json)?;
    request.decimal_places = args.decimal_places;

    let json = with_renderer(&args.common, &request, |r| Ok(r.render_json()?))?;
    write_output(args.common.output.as_deref(), json.as_bytes())
}

fn cmd_png(args: PngArgs) -> anyhow::Result<()> {
    let mut request = base_request(&args.common, OutputKind::Raster)?;
    request.animation.frames = args.anim_frames;
    request.animation.slide = args.slide;
    request.outline = args.outline;
    request.overlay = args.overlay.config();
    request.style = StyleConfig {
        fill: args.fill_colour,
        fill_no_data: args.fill_colour_no_data,
        stroke: (!args.no_stroke).then_some(args.stroke_colour),
        stroke_width: args.stroke_width,
        background: args.background_colour,
        ..Default::default()
    };

    let template = match args.anim_frames {
        Some(_) => {
            let output = args.common.output.as_deref().ok_or_else(|| {
                mapslide::MapError::configuration(
                    "animation frames need an output file template containing %d",
                )
            })?;
            Some(output.to_string_lossy().parse::<FrameTemplate>()?)
        }
        None => None,
    };

    if let Some(path) = args.overlay_on.as_deref() {
        let bytes = std::fs::read(path).with_context(|| format!("read '{}'", path.display()))?;
        request.style.background_image = Some(decode_background(&bytes)?);
    }

    with_renderer(&args.common, &request, |r| match template {
        Some(template) => {
            let mut sink = PngSequenceSink::new(template);
            r.render_frames(&mut sink)?;
            Ok(())
        }
        None => {
            let png = r.render_still()?.encode_png()?;
            write_output(args.common.output.as_deref(), &png)
        }
    })
}
