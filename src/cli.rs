use anyhow::{Result, bail};
use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::{Path, PathBuf};

use crate::diff;
use crate::export::{self, ExportFormat, ExportMode, ExportOptions};
use crate::loader::{self, FileKind, LoadOptions};
use crate::schema::SchemaDocument;
use crate::table_model::TableModel;

/// Top level command line arguments
#[derive(Parser)]
#[command(author, version, about)]
pub struct Cli {
    /// Without a subcommand the desktop window is opened
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Print the first rows of a file
    Show(ShowArgs),
    /// Print row and column counts
    Info(FileArgs),
    /// Print or export the schema of a file
    Schema(SchemaArgs),
    /// Compare two JSON schema documents
    Diff(DiffArgs),
    /// Export a sample of a file
    Export(ExportArgs),
}

/// Options for reading delimited text
#[derive(Args, Clone, Default)]
pub struct TextArgs {
    /// Field separator, defaults to `,` for CSV and `|` for TXT
    #[arg(long)]
    pub separator: Option<char>,
    /// The first line holds data, not column names
    #[arg(long)]
    pub no_header: bool,
    /// Read every column as a string
    #[arg(long)]
    pub no_infer: bool,
}

impl TextArgs {
    fn load_options(&self) -> Result<LoadOptions> {
        Ok(LoadOptions {
            separator: self.separator.map(separator_byte).transpose()?,
            has_header: !self.no_header,
            infer_types: !self.no_infer,
            ..LoadOptions::default()
        })
    }
}

#[derive(Args)]
pub struct FileArgs {
    /// File to read
    pub file: PathBuf,
    #[command(flatten)]
    pub text: TextArgs,
}

#[derive(Args)]
pub struct ShowArgs {
    /// File to read
    pub file: PathBuf,
    /// Number of rows to print
    #[arg(long, default_value_t = 20)]
    pub rows: usize,
    /// Only print rows containing this text
    #[arg(long)]
    pub filter: Option<String>,
    #[command(flatten)]
    pub text: TextArgs,
}

#[derive(Args)]
pub struct SchemaArgs {
    /// File to read
    pub file: PathBuf,
    /// Write the schema as JSON
    #[arg(long)]
    pub json: Option<PathBuf>,
    /// Write the schema as an Excel workbook
    #[arg(long)]
    pub excel: Option<PathBuf>,
    #[command(flatten)]
    pub text: TextArgs,
}

#[derive(Args)]
pub struct DiffArgs {
    /// First schema document
    pub left: PathBuf,
    /// Second schema document
    pub right: PathBuf,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum ModeArg {
    Head,
    Tail,
    Random,
    All,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum FormatArg {
    Csv,
    CsvGz,
    Parquet,
}

impl From<FormatArg> for ExportFormat {
    fn from(arg: FormatArg) -> Self {
        match arg {
            FormatArg::Csv => ExportFormat::Csv,
            FormatArg::CsvGz => ExportFormat::CsvGzip,
            FormatArg::Parquet => ExportFormat::Parquet,
        }
    }
}

#[derive(Args)]
pub struct ExportArgs {
    /// Input file
    pub input: PathBuf,
    /// Output file
    pub output: PathBuf,
    /// Which rows to export
    #[arg(long, value_enum, default_value_t = ModeArg::All)]
    pub mode: ModeArg,
    /// Sample size for head, tail and random
    #[arg(long, default_value_t = 100)]
    pub rows: usize,
    /// Output format, guessed from the output extension when omitted
    #[arg(long, value_enum)]
    pub format: Option<FormatArg>,
    /// Separator for CSV output
    #[arg(long, default_value_t = ',')]
    pub out_separator: char,
    /// Comma separated columns to leave out
    #[arg(long, value_delimiter = ',')]
    pub exclude: Vec<String>,
    /// Seed for random samples
    #[arg(long)]
    pub seed: Option<u64>,
    #[command(flatten)]
    pub text: TextArgs,
}

impl ExportArgs {
    fn mode(&self) -> ExportMode {
        match self.mode {
            ModeArg::Head => ExportMode::Head(self.rows),
            ModeArg::Tail => ExportMode::Tail(self.rows),
            ModeArg::Random => ExportMode::Random(self.rows),
            ModeArg::All => ExportMode::All,
        }
    }
}

/// Run a subcommand. A `diff` that finds differences is reported as an error
/// so the process exits nonzero.
pub fn run(command: Commands) -> Result<()> {
    match command {
        Commands::Show(args) => cmd_show(&args),
        Commands::Info(args) => cmd_info(&args.file, &args.text),
        Commands::Schema(args) => cmd_schema(&args),
        Commands::Diff(args) => cmd_diff(&args.left, &args.right),
        Commands::Export(args) => cmd_export(&args),
    }
}

fn separator_byte(c: char) -> Result<u8> {
    if !c.is_ascii() {
        bail!("separator {c:?} is not an ASCII character");
    }
    Ok(c as u8)
}

fn cmd_show(args: &ShowArgs) -> Result<()> {
    let frame = loader::read_table(&args.file, &args.text.load_options()?)?;
    let mut model = TableModel::new(frame);
    if let Some(term) = &args.filter {
        model.set_filter(term);
    }
    println!("{}", model.column_names().join("\t"));
    for row in model.rows(0..args.rows) {
        println!("{}", row.join("\t"));
    }
    println!(
        "({} of {} rows shown)",
        args.rows.min(model.row_count()),
        model.row_count()
    );
    Ok(())
}

fn cmd_info(file: &Path, text: &TextArgs) -> Result<()> {
    if FileKind::detect(file)? == FileKind::Parquet {
        let info = loader::parquet_info(file)?;
        println!("rows: {}", info.rows);
        println!("columns: {}", info.columns);
        println!("row groups: {}", info.row_groups);
        if let Some(created_by) = info.created_by {
            println!("created by: {created_by}");
        }
        return Ok(());
    }
    let frame = loader::read_table(file, &text.load_options()?)?;
    println!("rows: {}", frame.height());
    println!("columns: {}", frame.width());
    Ok(())
}

fn cmd_schema(args: &SchemaArgs) -> Result<()> {
    let frame = loader::read_table(&args.file, &args.text.load_options()?)?;
    let (stem, ext) = loader::split_file_name(&args.file);
    let source = format!("{stem}.{ext}");
    let schema = SchemaDocument::from_frame(&frame, Some(&source));
    if args.json.is_none() && args.excel.is_none() {
        println!("{}", schema.to_json_string()?);
    }
    if let Some(path) = &args.json {
        schema.write_json(path)?;
        println!("Wrote {}", path.display());
    }
    if let Some(path) = &args.excel {
        schema.write_excel(path)?;
        println!("Wrote {}", path.display());
    }
    Ok(())
}

fn cmd_diff(left: &Path, right: &Path) -> Result<()> {
    let report = diff::diff_files(left, right)?;
    print!("{report}");
    if !report.is_empty() {
        bail!("schemas differ");
    }
    Ok(())
}

fn cmd_export(args: &ExportArgs) -> Result<()> {
    let frame = loader::read_table(&args.input, &args.text.load_options()?)?;
    let format = match args.format {
        Some(f) => f.into(),
        None => match ExportFormat::from_path(&args.output) {
            Some(f) => f,
            None => bail!("cannot guess export format of {}", args.output.display()),
        },
    };
    let options = ExportOptions {
        separator: separator_byte(args.out_separator)?,
        exclude_columns: args.exclude.clone(),
        seed: args.seed,
    };
    let written = export::export(&frame, args.mode(), format, &args.output, &options)?;
    println!("Wrote {written} rows to {}", args.output.display());
    Ok(())
}
