use std::error::Error;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use blockforge_geom::{Aabb, Axis, Direction};
use blockforge_registry::{ContentRegistry, display_name_with};
use blockforge_shapes::{
    Shape, ShapeLibrary, flip_shape, intersect_shapes, merge_shapes, rotate_shape,
    translate_shape,
};
use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "blockforge", version, about = "Inspect block shapes, names and content files")]
struct Cli {
    /// Shapes file (TOML, pixel units)
    #[arg(long, global = true, default_value = "assets/shapes.toml")]
    shapes: PathBuf,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Orient a down-authored shape; all six facings when none is given
    Rotate {
        shape: String,
        #[arg(long)]
        facing: Option<Direction>,
    },
    /// Mirror a shape through the block center (1/16 resolution)
    Flip {
        shape: String,
        #[arg(long, default_value_t = Axis::Y)]
        axis: Axis,
    },
    /// Move a shape's bounding box by whole pixels
    Translate {
        shape: String,
        #[arg(long)]
        direction: Direction,
        #[arg(long, allow_hyphen_values = true)]
        distance: i32,
    },
    /// Union of two shapes
    Merge { a: String, b: String },
    /// Intersection of two shapes
    Intersect { a: String, b: String },
    /// Display names for description ids (e.g. block.gizmo.gizmo_lamp_block)
    Names {
        ids: Vec<String>,
        #[arg(long)]
        keep_block_suffix: bool,
    },
    /// Load a content file against the shapes file and list what it registers
    Content {
        #[arg(default_value = "assets/content.toml")]
        file: PathBuf,
    },
}

fn fmt_box(b: &Aabb) -> String {
    let [x0, y0, z0, x1, y1, z1] = b.to_pixels();
    format!("[{x0}, {y0}, {z0}] .. [{x1}, {y1}, {z1}]")
}

fn print_shape(label: &str, shape: &Shape) {
    if shape.is_empty() {
        println!("{label}: empty");
        return;
    }
    println!("{label}:");
    for b in shape.to_boxes() {
        println!("  {}", fmt_box(&b));
    }
}

fn lookup<'a>(lib: &'a ShapeLibrary, name: &str) -> Result<&'a Arc<Shape>, Box<dyn Error>> {
    lib.get(name).ok_or_else(|| {
        format!("unknown shape '{}' (known: {})", name, lib.names().join(", ")).into()
    })
}

fn load_shapes(path: &Path) -> Result<ShapeLibrary, Box<dyn Error>> {
    let lib = ShapeLibrary::from_path(path)?;
    log::debug!("loaded {} shape(s) from {}", lib.len(), path.display());
    Ok(lib)
}

fn run(cli: Cli) -> Result<(), Box<dyn Error>> {
    match cli.cmd {
        Command::Names {
            ids,
            keep_block_suffix,
        } => {
            for id in ids {
                println!("{id} => {}", display_name_with(&id, !keep_block_suffix));
            }
        }
        Command::Content { file } => {
            let reg = ContentRegistry::load_from_paths(&cli.shapes, &file)?;
            for (id, block) in reg.blocks.iter() {
                let facing = if block.settings.directional {
                    Direction::North
                } else {
                    Direction::Down
                };
                let bounds = block
                    .shape_for(facing)
                    .bounds()
                    .map_or_else(|| "empty".to_string(), |b| fmt_box(&b));
                println!("block {id} \"{}\" {bounds}", block.display_name());
            }
            for (id, item) in reg.items.iter() {
                println!("item  {id} \"{}\" x{}", item.display_name(), item.settings.max_stack);
            }
            for (id, tab) in reg.tabs.iter() {
                println!("tab   {id} {:?} slot {} icon {}", tab.row, tab.slot, tab.icon);
                for item in &tab.items {
                    println!("  {item}");
                }
            }
        }
        Command::Rotate { shape, facing } => {
            let lib = load_shapes(&cli.shapes)?;
            let base = lookup(&lib, &shape)?;
            let facings = facing.map_or_else(|| Direction::ALL.to_vec(), |f| vec![f]);
            for f in facings {
                print_shape(&format!("{shape} facing {f}"), &rotate_shape(base, f));
            }
        }
        Command::Flip { shape, axis } => {
            let lib = load_shapes(&cli.shapes)?;
            let base = lookup(&lib, &shape)?;
            print_shape(&format!("{shape} flipped on {axis}"), &flip_shape(base, axis));
        }
        Command::Translate {
            shape,
            direction,
            distance,
        } => {
            let lib = load_shapes(&cli.shapes)?;
            let moved = translate_shape(lookup(&lib, &shape)?, direction, distance);
            print_shape(&format!("{shape} moved {distance}px {direction}"), &moved);
        }
        Command::Merge { a, b } => {
            let lib = load_shapes(&cli.shapes)?;
            let out = merge_shapes(lookup(&lib, &a)?, lookup(&lib, &b)?);
            print_shape(&format!("{a} | {b}"), &out);
        }
        Command::Intersect { a, b } => {
            let lib = load_shapes(&cli.shapes)?;
            let out = intersect_shapes(lookup(&lib, &a)?, lookup(&lib, &b)?);
            print_shape(&format!("{a} & {b}"), &out);
        }
    }
    Ok(())
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();
    if let Err(e) = run(cli) {
        log::error!("{e}");
        std::process::exit(1);
    }
}
