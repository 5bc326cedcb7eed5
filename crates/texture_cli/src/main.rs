use std::collections::HashMap;
use std::io::{self, BufWriter, Write};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use image::GenericImageView;
use log::{info, warn};
use rand::rngs::StdRng;
use rand::SeedableRng;
use texture_sheet::board::{Board, Reveal, BOARD_HEIGHT, BOARD_WIDTH, BOMB_CHANCE};
use texture_sheet::layout::{BACKGROUND_COLOR, SHEET_HEIGHT, TILE_COUNT};
use texture_sheet::{
    decorations, tile_rect, Color, Decoration, Surface, TextureSheetRenderer, TileKind,
};

#[derive(Parser, Debug)]
#[command(author, version, about = "Render the numbered placeholder tile sheet in the terminal")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Print the sheet as character art, one cell per pixel
    Preview(PreviewArgs),
    /// List every tile with its decorations and colors
    Inspect(InspectArgs),
    /// Play moves on a minesweeper board and print it with the sheet's tiles
    Play(PlayArgs),
}

#[derive(Parser, Debug)]
struct PreviewArgs {
    /// Only show this tile (0-11)
    #[arg(long, value_parser = clap::value_parser!(u32).range(0..TILE_COUNT as i64))]
    tile: Option<u32>,
    /// Gradient preset used to map luminance to characters
    #[arg(long, value_enum, default_value = "standard")]
    gradient: GradientPreset,
    /// Color each cell with 24-bit ANSI escapes
    #[arg(long, default_value_t = false)]
    color: bool,
}

#[derive(Parser, Debug)]
struct InspectArgs {
    /// Only inspect this tile (0-11)
    #[arg(long, value_parser = clap::value_parser!(u32).range(0..TILE_COUNT as i64))]
    tile: Option<u32>,
}

#[derive(Parser, Debug)]
struct PlayArgs {
    /// Seed for bomb placement; random when omitted
    #[arg(long)]
    seed: Option<u64>,
    /// Board width in cells
    #[arg(long, default_value_t = BOARD_WIDTH)]
    width: usize,
    /// Board height in cells
    #[arg(long, default_value_t = BOARD_HEIGHT)]
    height: usize,
    /// Probability of a cell holding a bomb
    #[arg(long, default_value_t = BOMB_CHANCE)]
    bomb_chance: f64,
    /// Toggle a flag on X,Y before opening cells (repeatable)
    #[arg(long = "flag", value_parser = parse_cell)]
    flags: Vec<(usize, usize)>,
    /// Open the cell at X,Y (repeatable, applied in order)
    #[arg(long = "open", value_parser = parse_cell)]
    opens: Vec<(usize, usize)>,
    /// Color each cell with its tile's accent color
    #[arg(long, default_value_t = false)]
    color: bool,
}

fn parse_cell(value: &str) -> Result<(usize, usize), String> {
    let (x, y) = value.split_once(',').ok_or_else(|| format!("expected X,Y, got {value:?}"))?;
    let coordinate = |part: &str| {
        part.trim().parse::<usize>().map_err(|err| format!("bad coordinate {part:?}: {err}"))
    };
    Ok((coordinate(x)?, coordinate(y)?))
}

#[derive(Copy, Clone, Debug, ValueEnum)]
enum GradientPreset {
    Detailed,
    Standard,
    Blocks,
}

impl GradientPreset {
    /// Characters ordered from darkest to lightest.
    fn chars(self) -> Vec<char> {
        let ramp = match self {
            GradientPreset::Detailed => {
                "$@B%8&WM#*oahkbdpqwmZO0QLCJUYXzcvunxrjft/\\|()1{}[]?-_+~<>i!lI;:,\"^`'. "
            },
            GradientPreset::Standard => "@%#*+=-:. ",
            GradientPreset::Blocks => "█▓▒░ ",
        };
        ramp.chars().collect()
    }
}

fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Preview(args) => preview(args),
        Commands::Inspect(args) => inspect(args),
        Commands::Play(args) => play(args),
    }
}

fn render() -> Result<Surface> {
    let surface = TextureSheetRenderer.render().context("failed to render texture sheet")?;
    info!("rendered {}x{} texture sheet", surface.width(), surface.height());
    Ok(surface)
}

fn selected_tiles(tile: Option<u32>) -> Vec<u32> {
    match tile {
        Some(index) => vec![index],
        None => (0..TILE_COUNT).collect(),
    }
}

fn preview(args: PreviewArgs) -> Result<()> {
    let surface = render()?;
    let chars = args.gradient.chars();
    let rows = match args.tile {
        Some(index) => {
            let rect = tile_rect(index)?;
            rect.y..rect.y + rect.height
        },
        None => 0..SHEET_HEIGHT,
    };

    let stdout = io::stdout();
    let mut out = BufWriter::new(stdout.lock());
    for y in rows {
        let mut line = String::new();
        for x in 0..surface.width() {
            let Some(pixel) = surface.pixel(x, y) else {
                continue;
            };
            // Terminal cells are roughly twice as tall as wide.
            let cell = shade(&chars, pixel).to_string().repeat(2);
            if args.color {
                line.push_str(&format!(
                    "\x1b[38;2;{};{};{}m{cell}\x1b[0m",
                    pixel.r, pixel.g, pixel.b
                ));
            } else {
                line.push_str(&cell);
            }
        }
        writeln!(out, "{line}")?;
    }
    out.flush()?;

    Ok(())
}

fn shade(chars: &[char], pixel: Color) -> char {
    let levels = chars.len() - 1;
    let index = (pixel.luminance().clamp(0.0, 1.0) * levels as f32).round() as usize;
    chars[index.min(levels)]
}

fn inspect(args: InspectArgs) -> Result<()> {
    let surface = render()?;

    let stdout = io::stdout();
    let mut out = BufWriter::new(stdout.lock());
    for index in selected_tiles(args.tile) {
        let kind = TileKind::from_index(index)?;
        let rules: Vec<String> = decorations(index).iter().map(describe).collect();
        let rules = if rules.is_empty() { "-".to_owned() } else { rules.join(", ") };

        let colors = tile_colors(&surface, index)?
            .into_iter()
            .map(|(color, count)| format!("{color}x{count}"))
            .collect::<Vec<_>>()
            .join(" ");

        writeln!(out, "{index:>2}  {:<8}  {rules:<20}  {colors}", kind.to_string())?;
    }
    out.flush()?;

    Ok(())
}

fn describe(rule: &Decoration) -> String {
    match rule {
        Decoration::Outline => "outline".to_owned(),
        Decoration::Marker => "marker".to_owned(),
        Decoration::Inset => "inset".to_owned(),
        Decoration::Digit { label, color } => format!("digit {label} ({color})"),
    }
}

fn play(args: PlayArgs) -> Result<()> {
    let mut rng = match args.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let mut board = Board::generate(args.width, args.height, args.bomb_chance, &mut rng);

    for &(x, y) in &args.flags {
        if board.toggle_flag(x, y)?.is_none() {
            warn!("({x}, {y}) is already open");
        }
    }

    let mut exploded = false;
    for &(x, y) in &args.opens {
        match board.reveal(x, y)? {
            Reveal::Opened(count) => info!("opened {count} cells from ({x}, {y})"),
            Reveal::Exploded => {
                exploded = true;
                break;
            },
            Reveal::AlreadyOpen => warn!("({x}, {y}) is already open"),
            Reveal::Flagged => warn!("({x}, {y}) is flagged"),
        }
    }

    let accents = tile_accents(&render()?)?;
    let stdout = io::stdout();
    let mut out = BufWriter::new(stdout.lock());
    for y in 0..board.height() {
        let mut line = String::new();
        for x in 0..board.width() {
            let kind = board.tile(x, y)?;
            let cell = format!("{} ", symbol(kind));
            if args.color {
                let accent = accents[kind.index() as usize];
                line.push_str(&format!(
                    "\x1b[38;2;{};{};{}m{cell}\x1b[0m",
                    accent.r, accent.g, accent.b
                ));
            } else {
                line.push_str(&cell);
            }
        }
        writeln!(out, "{}", line.trim_end())?;
    }

    let status = if exploded { "game over" } else { "in play" };
    writeln!(
        out,
        "{status}: {} of {} cells open, {} bombs",
        board.opened_count(),
        board.width() * board.height(),
        board.bomb_count()
    )?;
    out.flush()?;

    Ok(())
}

/// Character standing in for a tile when printing a board.
fn symbol(kind: TileKind) -> char {
    match kind {
        TileKind::Unknown => '#',
        TileKind::Count(count) => char::from(b'0' + count.get()),
        TileKind::Bomb => '*',
        TileKind::Empty => '.',
        TileKind::Flag => 'F',
    }
}

/// Most frequent non-background color of every tile, indexed by tile.
fn tile_accents(surface: &Surface) -> Result<Vec<Color>> {
    let background = Color::parse(BACKGROUND_COLOR)?;
    (0..TILE_COUNT)
        .map(|index| {
            let colors = tile_colors(surface, index)?;
            let accent = colors.into_iter().map(|(color, _)| color).find(|c| *c != background);
            Ok(accent.unwrap_or(background))
        })
        .collect()
}

/// Distinct colors in a tile, most frequent first.
fn tile_colors(surface: &Surface, index: u32) -> Result<Vec<(Color, usize)>> {
    let view = surface.tile_view(index).with_context(|| format!("no tile {index}"))?;

    let mut counts: HashMap<Color, usize> = HashMap::new();
    for (_, _, pixel) in view.pixels() {
        *counts.entry(Color::from(pixel)).or_default() += 1;
    }

    let mut counts: Vec<_> = counts.into_iter().collect();
    counts.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.to_string().cmp(&b.0.to_string())));
    Ok(counts)
}
