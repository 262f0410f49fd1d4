//! fb2md - FB2 to Markdown converter

use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::Parser;
use rayon::prelude::*;
use serde::Serialize;

use fb2md::export::{AssetTable, batch_output_path, default_images_dir, is_fb2};
use fb2md::markdown::FootnoteTable;
use fb2md::{ConvertOptions, FictionBook, Metadata, convert_file};

#[derive(Parser)]
#[command(name = "fb2md")]
#[command(version, about = "Convert FB2 ebooks to Markdown", long_about = None)]
#[command(after_help = "EXAMPLES:
    fb2md book.fb2              Convert to book.md in the current directory
    fb2md book.fb2 output.md    Convert to an explicit output path
    fb2md books/                Convert every .fb2 file under books/
    fb2md -o out/ books/        Batch convert into out/
    fb2md -i book.fb2           Convert and extract images
    fb2md --info book.fb2       Show book metadata")]
struct Cli {
    /// Input FB2 file, or a directory to convert recursively
    #[arg(value_name = "INPUT")]
    input: PathBuf,

    /// Output Markdown file (single-file mode only)
    #[arg(value_name = "OUTPUT")]
    output: Option<PathBuf>,

    /// Extract embedded images
    #[arg(short, long)]
    images: bool,

    /// Directory for extracted images [default: <output stem>_images]
    #[arg(long, value_name = "DIR")]
    images_dir: Option<PathBuf>,

    /// Output directory [default: current directory]
    #[arg(short, long, value_name = "DIR")]
    output_dir: Option<PathBuf>,

    /// Suppress progress messages
    #[arg(short, long)]
    quiet: bool,

    /// Show book metadata without converting
    #[arg(long)]
    info: bool,

    /// Print --info output as JSON
    #[arg(long, requires = "info")]
    json: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let level = if cli.quiet { "error" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    let result = if cli.info {
        show_info(&cli.input, cli.json)
    } else if cli.input.is_dir() {
        convert_directory(&cli)
    } else {
        convert_single(&cli)
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

#[derive(Serialize)]
struct BookInfo<'a> {
    file: &'a Path,
    metadata: Option<Metadata>,
    bodies: usize,
    notes: usize,
    binaries: usize,
}

fn show_info(path: &Path, json: bool) -> Result<(), String> {
    let bytes = fs::read(path).map_err(|e| format!("{}: {e}", path.display()))?;
    let book = FictionBook::from_bytes(&bytes).map_err(|e| e.to_string())?;

    let notes = FootnoteTable::collect(book.note_bodies(), &AssetTable::default(), None);
    let info = BookInfo {
        file: path,
        metadata: Metadata::from_book(&book),
        bodies: book.main_bodies().count(),
        notes: notes.len(),
        binaries: book.binaries().count(),
    };

    if json {
        let out = serde_json::to_string_pretty(&info).map_err(|e| e.to_string())?;
        println!("{out}");
        return Ok(());
    }

    println!("File: {}", path.display());
    if let Some(meta) = &info.metadata {
        if let Some(title) = &meta.title {
            println!("Title: {title}");
        }
        if !meta.authors.is_empty() {
            println!("Authors: {}", meta.authors.join(", "));
        }
        if !meta.genres.is_empty() {
            println!("Genres: {}", meta.genres.join(", "));
        }
        for series in &meta.series {
            match &series.number {
                Some(n) => println!("Series: {}, #{n}", series.name),
                None => println!("Series: {}", series.name),
            }
        }
        if let Some(date) = &meta.date {
            println!("Date: {date}");
        }
        if let Some(annotation) = &meta.annotation {
            if annotation.chars().count() > 200 {
                let short: String = annotation.chars().take(200).collect();
                println!("Annotation: {short}...");
            } else {
                println!("Annotation: {annotation}");
            }
        }
    }
    println!("Bodies: {}", info.bodies);
    println!("Notes: {}", info.notes);
    println!("Binaries: {}", info.binaries);

    Ok(())
}

fn options_for(cli: &Cli, output: &Path) -> ConvertOptions {
    if !cli.images {
        return ConvertOptions::new();
    }
    let dir = cli
        .images_dir
        .clone()
        .unwrap_or_else(|| default_images_dir(output));
    ConvertOptions::new().with_images(dir)
}

fn create_output_dir(dir: &Path) -> Result<(), String> {
    fs::create_dir_all(dir)
        .map_err(|e| format!("cannot create output directory {}: {e}", dir.display()))
}

fn convert_single(cli: &Cli) -> Result<(), String> {
    let output = match &cli.output {
        Some(output) => output.clone(),
        None => {
            let stem = cli
                .input
                .file_stem()
                .map(|s| s.to_string_lossy().into_owned())
                .unwrap_or_default();
            let file_name = format!("{stem}.md");
            match &cli.output_dir {
                Some(dir) => {
                    create_output_dir(dir)?;
                    dir.join(file_name)
                }
                None => PathBuf::from(file_name),
            }
        }
    };

    let options = options_for(cli, &output);
    convert_file(&cli.input, &output, &options).map_err(|e| e.to_string())?;

    if !cli.quiet {
        println!("{} -> {}", cli.input.display(), output.display());
    }
    Ok(())
}

fn convert_directory(cli: &Cli) -> Result<(), String> {
    let out_dir = cli.output_dir.clone().unwrap_or_else(|| PathBuf::from("."));
    create_output_dir(&out_dir)?;

    let mut files: Vec<PathBuf> = walkdir::WalkDir::new(&cli.input)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file() && is_fb2(e.path()))
        .map(|e| e.into_path())
        .collect();
    files.sort();

    let converted = files
        .par_iter()
        .filter(|path| {
            let output = batch_output_path(&cli.input, path, &out_dir);
            let options = options_for(cli, &output);
            match convert_file(path, &output, &options) {
                Ok(_) => {
                    if !cli.quiet {
                        println!("{} -> {}", path.display(), output.display());
                    }
                    true
                }
                Err(e) => {
                    eprintln!("warning: {}: {e}", path.display());
                    false
                }
            }
        })
        .count();

    println!("converted {converted} file(s)");
    Ok(())
}
