//! BLO CLI Utility
//!
//! A command-line tool for inspecting BLO archives and rendering the CFS sprite
//! animations they contain.
//!
//! # Features
//!
//! - **info**: Display the directory, sprites and audio clips of an archive
//! - **list**: Load several archives into a library and list or search their contents
//! - **extract**: Write the raw payload of every entry to a directory
//! - **render**: Compose one frame of a sprite onto a PNG surface
//! - **sheet**: Export every cell of a sprite as PNG with JSON metadata
//! - **thumbnail**: Write square previews of every sprite in an archive
//! - **scan**: Walk a directory tree and summarize the archives found
//!
//! # Configuration
//!
//! Render and library settings are read from an optional TOML file
//! (`--config`, default `blo.toml`) and from `BLO_` environment variables,
//! e.g. `BLO_RENDER__ZOOM=4`. Command-line flags take precedence.
//!
//! ```toml
//! [render]
//! surface_width = 512
//! surface_height = 512
//! zoom = 3.0
//! background = [0, 0, 0, 255]
//!
//! [library]
//! max_loaded = 4
//! ```
//!
//! # Metadata Format
//!
//! ```json
//! {
//!   "name": "walk_N.cfs",
//!   "version": 4,
//!   "width": 64,
//!   "height": 96,
//!   "rows": 2,
//!   "columns": 4,
//!   "animation_time": 120,
//!   "frames": [
//!     { "index": 0, "row": 0, "column": 0, "x": 3, "y": 8, "width": 40, "height": 80, "filename": "cell_00_00.png" }
//!   ]
//! }
//! ```
//!
//! # Usage
//!
//! ```bash
//! # Show archive information
//! cargo run --example blo_utils -- info GFX_MEN.BLO --detailed
//!
//! # Render the frame at row 1, column 2 at 4x zoom
//! cargo run --example blo_utils -- render GFX_MEN.BLO walk_N.cfs --row 1 --column 2 --zoom 4
//!
//! # Export a sprite sheet
//! cargo run --example blo_utils -- sheet GFX_MEN.BLO walk_N.cfs -o walk/
//!
//! # Search several archives
//! cargo run --example blo_utils -- list data/*.BLO --search walk
//!
//! # Summarize a game directory
//! cargo run --example blo_utils -- scan data/
//! ```

use std::{
	fs,
	path::{Path, PathBuf},
};

use anyhow::{Context, Result, anyhow, bail};
use blo_rs::prelude::*;
use clap::{Parser, Subcommand};
use config::{Config, Environment};
use image::RgbaImage;
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use walkdir::WalkDir;

#[derive(Parser)]
#[command(name = "blo_utils")]
#[command(version = "1.0")]
#[command(about = "BLO archive utility - inspect, extract and render CFS sprites", long_about = None)]
struct Cli {
	/// Settings file (TOML)
	#[arg(short, long, global = true, value_name = "CONFIG", env = "BLO_CONFIG", default_value = "blo.toml")]
	config: PathBuf,

	#[command(subcommand)]
	command: Commands,
}

#[derive(Subcommand)]
enum Commands {
	/// Display information about a BLO archive
	Info {
		/// Input BLO file path
		#[arg(value_name = "INPUT_BLO")]
		input: PathBuf,

		/// Show per-frame information for every sprite
		#[arg(short, long)]
		detailed: bool,
	},

	/// Load archives into a library and list or search their contents
	List {
		/// Input BLO file paths
		#[arg(value_name = "INPUT_BLO", required = true)]
		inputs: Vec<PathBuf>,

		/// Case-insensitive name filter
		#[arg(short, long, value_name = "QUERY")]
		search: Option<String>,

		/// Archives kept in memory
		#[arg(short, long, value_name = "COUNT")]
		max_loaded: Option<usize>,
	},

	/// Write the payload of every entry to a directory
	Extract {
		/// Input BLO file path
		#[arg(value_name = "INPUT_BLO")]
		input: PathBuf,

		/// Output directory path (optional, defaults to `input_entries/`)
		#[arg(short, long, value_name = "OUTPUT_DIR")]
		output: Option<PathBuf>,

		/// Show verbose output
		#[arg(short, long)]
		verbose: bool,
	},

	/// Render one frame of a sprite to PNG
	Render {
		/// Input BLO file path
		#[arg(value_name = "INPUT_BLO")]
		input: PathBuf,

		/// Sprite entry name
		#[arg(value_name = "SPRITE")]
		sprite: String,

		/// Grid row
		#[arg(short, long, default_value_t = 0)]
		row: usize,

		/// Grid column
		#[arg(short = 'C', long, default_value_t = 0)]
		column: usize,

		/// Frame index, overrides row and column
		#[arg(short, long)]
		frame: Option<usize>,

		/// Zoom factor (0.5 - 20)
		#[arg(short, long)]
		zoom: Option<f64>,

		/// Hue shift in degrees
		#[arg(long, allow_hyphen_values = true)]
		hue: Option<f64>,

		/// Saturation delta (-100 - 100)
		#[arg(long, allow_hyphen_values = true)]
		saturation: Option<f64>,

		/// Value delta (-100 - 100)
		#[arg(long, allow_hyphen_values = true)]
		value: Option<f64>,

		/// Output PNG path (optional, defaults to `<sprite>_<frame>.png`)
		#[arg(short, long, value_name = "OUTPUT_PNG")]
		output: Option<PathBuf>,
	},

	/// Export every cell of a sprite as PNG with JSON metadata
	Sheet {
		/// Input BLO file path
		#[arg(value_name = "INPUT_BLO")]
		input: PathBuf,

		/// Sprite entry name
		#[arg(value_name = "SPRITE")]
		sprite: String,

		/// Output directory path (optional, defaults to `<sprite>_cells/`)
		#[arg(short, long, value_name = "OUTPUT_DIR")]
		output: Option<PathBuf>,
	},

	/// Write a square preview of every sprite
	Thumbnail {
		/// Input BLO file path
		#[arg(value_name = "INPUT_BLO")]
		input: PathBuf,

		/// Edge length in pixels
		#[arg(short, long, default_value_t = 70)]
		size: u32,

		/// Output directory path (optional, defaults to `input_thumbs/`)
		#[arg(short, long, value_name = "OUTPUT_DIR")]
		output: Option<PathBuf>,
	},

	/// Summarize every BLO archive below a directory
	Scan {
		/// Root directory
		#[arg(value_name = "DIR")]
		root: PathBuf,
	},
}

/// Settings merged from the config file and the environment.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
struct Settings {
	/// Compositing settings
	render: RenderSettings,
	/// Library limits
	library: LibraryConfig,
}

impl Settings {
	fn load(path: &Path) -> Result<Self> {
		let settings: Self = Config::builder()
			.add_source(config::File::from(path).required(false))
			.add_source(Environment::with_prefix("BLO").prefix_separator("_").separator("__").try_parsing(true))
			.build()
			.with_context(|| format!("Failed to read settings from {}", path.display()))?
			.try_deserialize()
			.context("Invalid settings")?;
		debug!("Settings: {settings:?}");
		Ok(settings)
	}
}

/// Cell metadata for JSON serialization
#[derive(Debug, Clone, Serialize, Deserialize)]
struct CellMetadata {
	/// Frame index
	index: usize,
	/// Grid row
	row: usize,
	/// Grid column
	column: usize,
	/// Horizontal offset inside the cell
	x: i32,
	/// Vertical offset inside the cell
	y: i32,
	/// Frame width in pixels
	width: u16,
	/// Frame height in pixels
	height: u16,
	/// Cell PNG filename
	filename: String,
}

/// Complete sprite sheet metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
struct SheetMetadata {
	/// Sprite entry name
	name: String,
	/// CFS version
	version: u16,
	/// Logical cell width
	width: u16,
	/// Logical cell height
	height: u16,
	/// Inferred grid rows
	rows: usize,
	/// Inferred grid columns
	columns: usize,
	/// Milliseconds per frame
	animation_time: u16,
	/// Exported cells
	frames: Vec<CellMetadata>,
}

/// Reads and decodes an archive from disk.
fn open_archive(path: &Path) -> Result<Archive> {
	let data = fs::read(path).with_context(|| format!("Failed to read {}", path.display()))?;
	Archive::load(file_name(path), data).with_context(|| format!("Failed to load {}", path.display()))
}

fn file_name(path: &Path) -> String {
	path.file_name().map_or_else(|| path.display().to_string(), |name| name.to_string_lossy().into_owned())
}

fn find_sprite<'a>(archive: &'a Archive, name: &str) -> Result<&'a SpriteRecord> {
	archive
		.sprite(name)
		.or_else(|| archive.sprites().iter().find(|sprite| sprite.name().eq_ignore_ascii_case(name)))
		.ok_or_else(|| anyhow!("Sprite \"{name}\" not found in {}", archive.name()))
}

/// Default output directory next to the input, e.g. `GFX.BLO` -> `GFX_entries/`.
fn sibling_dir(input: &Path, suffix: &str) -> PathBuf {
	let stem = input.file_stem().map_or_else(|| "output".to_string(), |stem| stem.to_string_lossy().into_owned());
	input.with_file_name(format!("{stem}_{suffix}"))
}

fn sprite_stem(name: &str) -> &str {
	name.rsplit_once('.').map_or(name, |(stem, _)| stem)
}

/// Save surface as RGBA PNG
fn save_png(surface: Surface, path: &Path) -> Result<()> {
	let (width, height) = (surface.width(), surface.height());
	let img = RgbaImage::from_raw(width, height, surface.into_raw()).context("Failed to create image")?;
	img.save(path).with_context(|| format!("Failed to write {}", path.display()))?;
	Ok(())
}

/// Handle info command
fn handle_info(input: &Path, detailed: bool) -> Result<()> {
	let archive = open_archive(input)?;

	println!("{archive}");
	println!("\nEntries ({}):", archive.entries().len());
	for entry in archive.entries() {
		println!("  {entry}");
	}

	println!("\nSprites ({}):", archive.sprites().len());
	for sprite in archive.sprites() {
		println!("  {sprite}");
		if sprite.is_fallback() {
			println!("    (placeholder, record could not be decoded)");
			continue;
		}
		println!(
			"    grid {}, {} ms/frame, light {}, shadow {}, max solid {}, y-sort {}",
			sprite.grid(),
			sprite.animation_time(),
			sprite.light_count(),
			sprite.shadow_count(),
			sprite.max_solid_index(),
			sprite.y_sort_adjust()
		);

		if detailed {
			for (index, frame) in sprite.frames().iter().enumerate() {
				let shadow = if sprite.is_legacy_shadow_frame(index) {
					" [shadow]"
				} else {
					""
				};
				println!(
					"    [{index:3}] {}x{} at ({}, {}), {} opaque{shadow}",
					frame.width(),
					frame.height(),
					frame.x(),
					frame.y(),
					frame.opaque_pixel_count()
				);
			}
		}
	}

	println!("\nAudio ({}):", archive.audio_clips().count());
	for clip in archive.audio_clips() {
		match clip.duration_ms() {
			Ok(duration) => println!("  {clip}, {duration} ms"),
			Err(err) => println!("  {clip} ({err})"),
		}
	}

	Ok(())
}

/// Handle list command
fn handle_list(inputs: &[PathBuf], search: Option<&str>, mut config: LibraryConfig) -> Result<()> {
	if inputs.len() > config.max_loaded {
		warn!("{} archives requested, only the last {} stay loaded", inputs.len(), config.max_loaded);
	}
	config.max_loaded = config.max_loaded.max(1);

	let mut library = Library::new(config);
	for input in inputs {
		let data = fs::read(input).with_context(|| format!("Failed to read {}", input.display()))?;
		match library.load(file_name(input), data) {
			Ok(evicted) => {
				for name in evicted {
					info!("Evicted {name}");
				}
			}
			Err(err) => warn!("Skipping {}: {err}", input.display()),
		}
	}

	if let Some(query) = search {
		let results = library.search(query);
		println!("{} matches for \"{query}\"", results.len());
		for (archive, sprite) in &results.sprites {
			println!("  {archive}: {sprite}");
		}
		for (archive, clip) in &results.audio {
			println!("  {archive}: {clip}");
		}
	} else {
		for archive in library.archives() {
			println!("{archive}");
			for sprite in archive.sprites() {
				println!("  {}", sprite.name());
			}
			for clip in archive.audio_clips() {
				println!("  {}", clip.name());
			}
		}
	}

	println!("\n{}", library.status());
	Ok(())
}

/// Handle extract command
fn handle_extract(input: &Path, output: Option<PathBuf>, verbose: bool) -> Result<()> {
	let output_dir = output.unwrap_or_else(|| sibling_dir(input, "entries"));
	let data = fs::read(input).with_context(|| format!("Failed to read {}", input.display()))?;
	let container = BloFile::from_vec(data).with_context(|| format!("Failed to parse {}", input.display()))?;

	fs::create_dir_all(&output_dir)?;
	if verbose {
		println!("Extracting {container}");
		println!("   Output: {}", output_dir.display());
	}

	let mut written = 0;
	for (entry, payload) in &container {
		let payload = match payload {
			Ok(payload) => payload,
			Err(err) => {
				warn!("{}: {err}", entry.name);
				continue;
			}
		};
		// directory names come from the archive, keep only the last component
		let Some(name) = Path::new(entry.name()).file_name() else {
			warn!("Skipping entry with empty name");
			continue;
		};
		let path = output_dir.join(name);
		fs::write(&path, payload).with_context(|| format!("Failed to write {}", path.display()))?;
		written += 1;
		if verbose {
			println!("   {} ({}, {} bytes)", entry.name, entry.kind(), payload.len());
		}
	}

	println!("Extracted {written} of {} entries to {}", container.entries().len(), output_dir.display());
	Ok(())
}

/// Handle render command
fn handle_render(
	input: &Path,
	sprite_name: &str,
	position: (usize, usize),
	frame: Option<usize>,
	settings: &RenderSettings,
	output: Option<PathBuf>,
) -> Result<()> {
	let archive = open_archive(input)?;
	let sprite = find_sprite(&archive, sprite_name)?;
	if sprite.is_fallback() {
		warn!("{} could not be decoded, rendering placeholder", sprite.name());
	}

	let index = frame.unwrap_or_else(|| sprite.grid().frame_index(position.0, position.1));
	if sprite.frame(index).is_none() {
		warn!("{} has no frame {index} ({} decoded), output is blank", sprite.name(), sprite.frames().len());
	}

	let surface = compose_frame(sprite, index, &settings.clamped());
	let path = output.unwrap_or_else(|| PathBuf::from(format!("{}_{index:03}.png", sprite_stem(sprite.name()))));
	save_png(surface, &path)?;
	println!("Rendered {} frame {index} -> {}", sprite.name(), path.display());
	Ok(())
}

/// Handle sheet command
fn handle_sheet(input: &Path, sprite_name: &str, output: Option<PathBuf>) -> Result<()> {
	let archive = open_archive(input)?;
	let sprite = find_sprite(&archive, sprite_name)?;
	let output_dir =
		output.unwrap_or_else(|| input.with_file_name(format!("{}_cells", sprite_stem(sprite.name()))));
	fs::create_dir_all(&output_dir)?;

	let grid = sprite.grid();
	let mut metadata = SheetMetadata {
		name: sprite.name().to_string(),
		version: sprite.version(),
		width: sprite.width(),
		height: sprite.height(),
		rows: grid.rows,
		columns: grid.columns,
		animation_time: sprite.animation_time(),
		frames: Vec::new(),
	};

	for row in 0..grid.rows {
		for column in 0..grid.columns {
			let index = grid.frame_index(row, column);
			let (Some(frame), Some(cell)) = (sprite.frame(index), compose_cell(sprite, index, ColorAdjust::default()))
			else {
				continue;
			};

			let filename = format!("cell_{row:02}_{column:02}.png");
			save_png(cell, &output_dir.join(&filename))?;
			metadata.frames.push(CellMetadata {
				index,
				row,
				column,
				x: frame.x(),
				y: frame.y(),
				width: frame.width(),
				height: frame.height(),
				filename,
			});
		}
	}

	let metadata_path = output_dir.join("metadata.json");
	fs::write(&metadata_path, serde_json::to_string_pretty(&metadata)?)?;
	println!(
		"Exported {} cells of {} ({grid}) to {}",
		metadata.frames.len(),
		sprite.name(),
		output_dir.display()
	);
	Ok(())
}

/// Handle thumbnail command
fn handle_thumbnail(input: &Path, size: u32, output: Option<PathBuf>) -> Result<()> {
	if size == 0 {
		bail!("Thumbnail size must be positive");
	}
	let archive = open_archive(input)?;
	let output_dir = output.unwrap_or_else(|| sibling_dir(input, "thumbs"));
	fs::create_dir_all(&output_dir)?;

	for sprite in archive.sprites() {
		let path = output_dir.join(format!("{}.png", sprite_stem(sprite.name())));
		save_png(thumbnail(sprite, size), &path)?;
		debug!("{} -> {}", sprite.name(), path.display());
	}

	println!("Wrote {} thumbnails to {}", archive.sprites().len(), output_dir.display());
	Ok(())
}

/// Handle scan command
fn handle_scan(root: &Path) -> Result<()> {
	let mut found = 0;
	let mut failed = 0;

	for entry in WalkDir::new(root).sort_by_file_name() {
		let entry = entry?;
		let path = entry.path();
		let is_blo = path.extension().is_some_and(|ext| ext.eq_ignore_ascii_case("blo"));
		if !entry.file_type().is_file() || !is_blo {
			continue;
		}

		found += 1;
		match open_archive(path) {
			Ok(archive) => {
				let placeholders = archive.sprites().iter().filter(|sprite| sprite.is_fallback()).count();
				println!(
					"{:<9} {:<40} {:4} sprites ({placeholders} unreadable), {:4} audio",
					archive.category().to_string(),
					path.strip_prefix(root).unwrap_or(path).display().to_string(),
					archive.sprites().len(),
					archive.audio_clips().count()
				);
			}
			Err(err) => {
				failed += 1;
				warn!("{err:#}");
			}
		}
	}

	println!("\n{found} archives, {failed} unreadable");
	Ok(())
}

fn main() -> Result<()> {
	// Initialize logger with default level set to info if RUST_LOG is not set
	env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));

	let cli = Cli::parse();
	let settings = Settings::load(&cli.config)?;

	match cli.command {
		Commands::Info {
			input,
			detailed,
		} => handle_info(&input, detailed),

		Commands::List {
			inputs,
			search,
			max_loaded,
		} => {
			let mut library = settings.library;
			if let Some(max_loaded) = max_loaded {
				library.max_loaded = max_loaded;
			}
			handle_list(&inputs, search.as_deref(), library)
		}

		Commands::Extract {
			input,
			output,
			verbose,
		} => handle_extract(&input, output, verbose),

		Commands::Render {
			input,
			sprite,
			row,
			column,
			frame,
			zoom,
			hue,
			saturation,
			value,
			output,
		} => {
			let defaults = settings.render;
			let render = RenderSettings {
				zoom: zoom.unwrap_or(defaults.zoom),
				hue_shift: hue.unwrap_or(defaults.hue_shift),
				saturation_adjust: saturation.unwrap_or(defaults.saturation_adjust),
				value_adjust: value.unwrap_or(defaults.value_adjust),
				..defaults
			};
			handle_render(&input, &sprite, (row, column), frame, &render, output)
		}

		Commands::Sheet {
			input,
			sprite,
			output,
		} => handle_sheet(&input, &sprite, output),

		Commands::Thumbnail {
			input,
			size,
			output,
		} => handle_thumbnail(&input, size, output),

		Commands::Scan {
			root,
		} => handle_scan(&root),
	}
}
