//! dbcore CLI - Command-line tool for inspecting DBC game data tables.
//!
//! This is the main entry point for the dbcore command-line application.

use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use rayon::prelude::*;
use tracing::warn;
use tracing_subscriber::EnvFilter;

use dbcore::prelude::*;

/// dbcore - DBC game data table inspector
#[derive(Parser)]
#[command(name = "dbcore")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Directory of binding files (`<Table>.txt`)
    #[arg(long, global = true, env = "DBC_BINDINGS_DIRECTORY", default_value = "Bindings")]
    bindings: PathBuf,

    /// Directory searched for `<Table>.dbc` when a bare table name is given
    #[arg(long, global = true, env = "DBC_DIRECTORY", default_value = ".")]
    dbc_dir: PathBuf,

    /// Enable debug logging (RUST_LOG overrides)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the header of a DBC file
    Header {
        /// Table name or path to the DBC file
        input: String,
    },

    /// Decode a DBC file and print its records
    Dump {
        /// Table name or path to the DBC file
        input: String,

        /// Binding name (defaults to the file stem)
        #[arg(short, long)]
        binding: Option<String>,

        /// Print records as JSON
        #[arg(long)]
        json: bool,

        /// Replace string offsets with the text they point at
        #[arg(short, long)]
        resolve_strings: bool,
    },

    /// Find the first record whose field equals a value
    Find {
        /// Table name or path to the DBC file
        input: String,

        /// Value to search for
        #[arg(long)]
        value: u32,

        /// Field to search
        #[arg(short, long, default_value = dbcore::dbc::ID_FIELD)]
        field: String,

        /// Binding name (defaults to the file stem)
        #[arg(short, long)]
        binding: Option<String>,

        /// Print the record as JSON
        #[arg(long)]
        json: bool,
    },

    /// Print the string pool of a DBC file
    Strings {
        /// Table name or path to the DBC file
        input: String,
    },

    /// Decode every DBC file in the DBC directory that has a binding
    Scan {
        /// Filter pattern for file names (glob-style)
        #[arg(short, long)]
        filter: Option<String>,
    },

    /// Look up an item subclass name
    ItemSubclass {
        /// Item class
        class: u32,

        /// Item subclass
        subclass: u32,
    },

    /// List spell description variables
    SpellDescVars {
        /// Only print the list position of this id
        #[arg(long)]
        id: Option<u32>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::Header { input } => {
            let library = DbcLibrary::new(&cli.dbc_dir, BindingRegistry::new());
            cmd_header(&library.resolve(&input))?;
        }
        Commands::Strings { input } => {
            let library = DbcLibrary::new(&cli.dbc_dir, BindingRegistry::new());
            cmd_strings(&library.resolve(&input))?;
        }
        Commands::Dump {
            input,
            binding,
            json,
            resolve_strings,
        } => {
            let library = open_library(&cli.dbc_dir, &cli.bindings)?;
            cmd_dump(&library, &input, binding.as_deref(), json, resolve_strings)?;
        }
        Commands::Find {
            input,
            value,
            field,
            binding,
            json,
        } => {
            let library = open_library(&cli.dbc_dir, &cli.bindings)?;
            cmd_find(&library, &input, binding.as_deref(), &field, value, json)?;
        }
        Commands::Scan { filter } => {
            let library = open_library(&cli.dbc_dir, &cli.bindings)?;
            cmd_scan(&library, filter.as_deref())?;
        }
        Commands::ItemSubclass { class, subclass } => {
            let library = open_library(&cli.dbc_dir, &cli.bindings)?;
            cmd_item_subclass(&library, class, subclass)?;
        }
        Commands::SpellDescVars { id } => {
            let library = open_library(&cli.dbc_dir, &cli.bindings)?;
            cmd_spell_desc_vars(&library, id)?;
        }
    }

    Ok(())
}

fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}

fn open_library(dbc_dir: &Path, bindings: &Path) -> Result<DbcLibrary> {
    let library = DbcLibrary::open(dbc_dir, bindings)
        .with_context(|| format!("Failed to load bindings from {}", bindings.display()))?;
    if library.bindings().is_empty() {
        warn!(dir = %bindings.display(), "no bindings loaded");
    }
    Ok(library)
}

/// Resolve the input path and the binding used to decode it.
fn resolve_input(
    library: &DbcLibrary,
    input: &str,
    binding: Option<&str>,
) -> Result<(PathBuf, std::sync::Arc<Binding>)> {
    let path = library.resolve(input);
    let name = match binding {
        Some(name) => name.to_string(),
        None => dbcore::binding_name(&path)?,
    };
    let binding = library
        .bindings()
        .lookup(&name)
        .with_context(|| format!("No binding for {}", path.display()))?;
    Ok((path, binding))
}

fn cmd_header(path: &Path) -> Result<()> {
    let (header, _) = DbcReader::open(path)
        .and_then(|reader| reader.read_header())
        .with_context(|| format!("Failed to read header of {}", path.display()))?;

    if !header.has_valid_magic() {
        warn!(path = %path.display(), magic = header.magic, "unexpected magic");
    }

    println!("File:              {}", path.display());
    println!(
        "Magic:             {:#010x}{}",
        header.magic,
        if header.has_valid_magic() { " (WDBC)" } else { " (unexpected)" }
    );
    println!("Records:           {}", header.record_count);
    println!("Fields:            {}", header.field_count);
    println!("Record size:       {}", header.record_size);
    println!("String block size: {}", header.string_block_size);
    if let Some(size) = header.expected_file_size() {
        println!("Expected size:     {}", size);
    }

    Ok(())
}

fn cmd_strings(path: &Path) -> Result<()> {
    let (_, strings) = dbcore::dbc::read_strings(path)
        .with_context(|| format!("Failed to read string pool of {}", path.display()))?;

    for entry in strings.iter() {
        println!("{:>8}: {}", entry.byte_offset, entry.text);
    }
    println!("\nTotal: {} strings, {} bytes", strings.len(), strings.byte_len());

    Ok(())
}

/// Render one field, resolving string offsets when asked.
fn field_text(
    binding: &Binding,
    strings: &StringPool,
    name: &str,
    value: &FieldValue,
    resolve: bool,
) -> String {
    let is_string = binding
        .field(name)
        .map_or(false, |f| f.ty == BindingType::StringOffset);
    match (resolve && is_string, value.as_u32()) {
        (true, Some(offset)) => format!("{:?}", strings.get_or_empty(offset)),
        _ => value.to_string(),
    }
}

fn record_json(
    binding: &Binding,
    strings: &StringPool,
    record: &Record,
    resolve: bool,
) -> Result<serde_json::Value> {
    if !resolve {
        return Ok(serde_json::to_value(record)?);
    }

    let mut map = serde_json::Map::with_capacity(record.len());
    for (name, value) in record.iter() {
        let is_string = binding
            .field(name)
            .map_or(false, |f| f.ty == BindingType::StringOffset);
        let json = match (is_string, value.as_u32()) {
            (true, Some(offset)) => serde_json::Value::String(strings.get_or_empty(offset).to_string()),
            _ => serde_json::to_value(value)?,
        };
        map.insert(name.to_string(), json);
    }
    Ok(serde_json::Value::Object(map))
}

fn cmd_dump(
    library: &DbcLibrary,
    input: &str,
    binding: Option<&str>,
    json: bool,
    resolve: bool,
) -> Result<()> {
    let (path, binding) = resolve_input(library, input, binding)?;

    let start = Instant::now();
    let dbc = dbcore::dbc::decode_with_binding(&path, &binding)
        .with_context(|| format!("Failed to decode {}", path.display()))?;

    if json {
        let records = dbc
            .records
            .iter()
            .map(|record| record_json(&binding, &dbc.strings, record, resolve))
            .collect::<Result<Vec<_>>>()?;
        println!("{}", serde_json::to_string_pretty(&records)?);
        return Ok(());
    }

    println!("{}", dbc.records.columns().names().join("\t"));
    for record in &dbc.records {
        let row: Vec<String> = record
            .iter()
            .map(|(name, value)| field_text(&binding, &dbc.strings, name, value, resolve))
            .collect();
        println!("{}", row.join("\t"));
    }

    println!(
        "\nDecoded {} records and {} strings in {:?}",
        dbc.records.len(),
        dbc.strings.len(),
        start.elapsed()
    );

    Ok(())
}

fn cmd_find(
    library: &DbcLibrary,
    input: &str,
    binding: Option<&str>,
    field: &str,
    value: u32,
    json: bool,
) -> Result<()> {
    let (path, binding) = resolve_input(library, input, binding)?;
    let dbc = dbcore::dbc::decode_with_binding(&path, &binding)
        .with_context(|| format!("Failed to decode {}", path.display()))?;

    let Some(record) = find_by_field(&dbc.records, field, value) else {
        anyhow::bail!("No record in {} with {} = {}", path.display(), field, value);
    };

    if json {
        let json = record_json(&binding, &dbc.strings, record, true)?;
        println!("{}", serde_json::to_string_pretty(&json)?);
    } else {
        for (name, value) in record.iter() {
            println!("{:>24}: {}", name, field_text(&binding, &dbc.strings, name, value, true));
        }
    }

    Ok(())
}

enum ScanOutcome {
    Decoded { records: usize },
    NoBinding,
    Failed(String),
}

fn cmd_scan(library: &DbcLibrary, filter: Option<&str>) -> Result<()> {
    let files = library
        .files(filter)
        .with_context(|| format!("Failed to list {}", library.dir().display()))?;

    println!("Scanning {} files in {}...", files.len(), library.dir().display());

    let pb = ProgressBar::new(files.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({eta})")?
            .progress_chars("#>-"),
    );

    let start = Instant::now();
    let outcomes: Vec<(PathBuf, ScanOutcome)> = files
        .into_par_iter()
        .map(|path| {
            let outcome = match dbcore::binding_name(&path)
                .ok()
                .and_then(|name| library.bindings().get(&name).cloned())
            {
                None => ScanOutcome::NoBinding,
                Some(binding) => match dbcore::dbc::decode_with_binding(&path, &binding) {
                    Ok(dbc) => ScanOutcome::Decoded {
                        records: dbc.records.len(),
                    },
                    Err(e) => ScanOutcome::Failed(e.to_string()),
                },
            };
            pb.inc(1);
            (path, outcome)
        })
        .collect();
    pb.finish_with_message("Done");

    let mut decoded = 0;
    let mut records = 0;
    let mut skipped = 0;
    let mut errors = 0;
    for (path, outcome) in &outcomes {
        match outcome {
            ScanOutcome::Decoded { records: count } => {
                decoded += 1;
                records += count;
            }
            ScanOutcome::NoBinding => skipped += 1,
            ScanOutcome::Failed(message) => {
                eprintln!("Error decoding {}: {}", path.display(), message);
                errors += 1;
            }
        }
    }

    println!(
        "Decoded {} files ({} records) in {:?} ({} without binding, {} errors)",
        decoded,
        records,
        start.elapsed(),
        skipped,
        errors
    );

    Ok(())
}

fn cmd_item_subclass(library: &DbcLibrary, class: u32, subclass: u32) -> Result<()> {
    let dbc = library.load("ItemSubClass").context("Failed to load ItemSubClass")?;
    let lookups = ItemSubClassLookups::build(&dbc.records, &dbc.strings)?;

    match lookups.get(class, subclass) {
        Some(entry) => println!("{}-{}: {}", class, entry.id, entry.name),
        None => println!("{}-{}: not found", class, subclass),
    }

    Ok(())
}

fn cmd_spell_desc_vars(library: &DbcLibrary, id: Option<u32>) -> Result<()> {
    let dbc = library
        .load("SpellDescriptionVariables")
        .context("Failed to load SpellDescriptionVariables")?;
    let vars = DescriptionVariables::build(&dbc.records, &dbc.strings)?;

    if let Some(id) = id {
        println!("{}", vars.index_of(id));
        return Ok(());
    }

    for var in vars.iter() {
        println!("{:>5}  {}", var.index, var.label);
    }

    Ok(())
}
