//! CellStore CLI
//!
//! Small inspection and demo tool over the bundled file-backed engine.

use clap::{Parser, Subcommand};
use tracing_subscriber::{fmt, EnvFilter};

use cellstore::{
    ArraySchema, Attribute, Compression, Config, Dimension, FieldType, RecordBuilder,
    StorageManager, ValueCount,
};

/// CellStore CLI
#[derive(Parser, Debug)]
#[command(name = "cellstore-cli")]
#[command(about = "Inspect and exercise CellStore arrays")]
#[command(version)]
struct Args {
    /// Workspace directory holding the arrays
    #[arg(short, long, default_value = "./cellstore_workspace")]
    workspace: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Define a small demo array, write a few cells, scan them back
    Demo,

    /// Print the decoded schema of an array
    Schema {
        /// The array name
        name: String,
    },

    /// Scan all cells of an array, printing coordinates and field sizes
    Scan {
        /// The array name
        name: String,
    },
}

fn main() {
    // Initialize tracing/logging
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,cellstore=debug"));

    fmt().with_env_filter(filter).with_target(true).init();

    let args = Args::parse();

    let config = Config::builder().workspace(&args.workspace).build();
    let mut manager = match StorageManager::with_file_engine(config) {
        Ok(m) => m,
        Err(e) => {
            tracing::error!("failed to open workspace '{}': {}", args.workspace, e);
            std::process::exit(1);
        }
    };

    let result = match args.command {
        Commands::Demo => run_demo(&mut manager),
        Commands::Schema { name } => print_schema(&manager, &name),
        Commands::Scan { name } => scan_array(&mut manager, &name),
    };

    if let Err(e) = result {
        tracing::error!("{}", e);
        std::process::exit(1);
    }
}

/// Define `vars`, write two cells, scan them back
fn run_demo(manager: &mut StorageManager) -> cellstore::Result<()> {
    let schema = ArraySchema::new(
        "vars",
        vec![
            Attribute::new("count", FieldType::Int32, ValueCount::Fixed(1), Compression::None),
            Attribute::new("tags", FieldType::Char, ValueCount::Variable, Compression::Gzip),
        ],
        vec![
            Dimension::new("row", (0, 100)),
            Dimension::new("col", (0, 100)),
        ],
    );
    manager.define_array(&schema)?;

    let wd = manager
        .open("vars", "w")?
        .ok_or_else(|| cellstore::CellStoreError::Engine("open for write failed".to_string()))?;
    let first = RecordBuilder::new()
        .fixed_i32(5)
        .variable(b"AB")
        .finish(&[3, 7]);
    manager.write_cell_sorted(wd, &first)?;
    let second = RecordBuilder::new()
        .fixed_i32(9)
        .variable(b"XYZ")
        .finish(&[4, 9]);
    manager.write_cell_sorted(wd, &second)?;
    manager.close(wd)?;
    println!("wrote 2 cells to 'vars'");

    scan_array(manager, "vars")
}

fn print_schema(manager: &StorageManager, name: &str) -> cellstore::Result<()> {
    let schema = manager.load_array_schema(name)?;
    println!("array '{}'", schema.array_name());
    for attr in schema.attributes() {
        println!(
            "  attribute {} : {:?} x {:?} ({:?})",
            attr.name, attr.field_type, attr.value_count, attr.compression
        );
    }
    for dim in schema.dimensions() {
        println!("  dimension {} : [{}, {}]", dim.name, dim.domain.0, dim.domain.1);
    }
    Ok(())
}

fn scan_array(manager: &mut StorageManager, name: &str) -> cellstore::Result<()> {
    let ad = manager
        .open(name, "r")?
        .ok_or_else(|| cellstore::CellStoreError::Engine(format!("array '{}' not found", name)))?;
    let schema = manager.get_array_schema(ad)?;
    let attribute_ids: Vec<usize> = (0..schema.attribute_num()).collect();
    let range = schema.full_domain();

    let mut iter = manager.begin(ad, &range, &attribute_ids)?;
    let mut cells = 0usize;
    while !iter.is_done() {
        let cell = iter.current()?;
        let sizes: Vec<usize> = (0..cell.field_count())
            .map(|i| cell.field(i).map(<[u8]>::len).unwrap_or(0))
            .collect();
        println!("cell at {:?}: field bytes {:?}", cell.coords(), sizes);
        cells += 1;
        iter.advance()?;
    }
    println!("{} cells in '{}'", cells, name);
    manager.close(ad)
}
