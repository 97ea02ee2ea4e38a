//! signreel CLI - play PDF notes back as sign-language clips

use std::fs;
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};

use signreel::playback::{event_channel, MediaSurface};
use signreel::store::Upload;
use signreel::{
    open_session, ClipResolver, DirMedia, DocumentStore, ExtractOptions, FileKv, NoteId,
    NoteRecord, NoteStore, PageSelection, PlaybackController, PlaybackDriver, PlaybackState,
    SubjectId, TextExtractor,
};

type CliResult = Result<(), Box<dyn std::error::Error>>;

#[derive(Parser)]
#[command(name = "signreel")]
#[command(version)]
#[command(about = "Play PDF notes back as sign-language word clips", long_about = None)]
struct Cli {
    /// Note library directory
    #[arg(long, global = true, env = "SIGNREEL_LIBRARY", default_value = ".signreel")]
    library: PathBuf,

    /// Media root containing the clip namespace
    #[arg(long, global = true, env = "SIGNREEL_MEDIA", default_value = "media")]
    media: PathBuf,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the extracted text of a PDF
    Text {
        /// Input PDF file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Page range (e.g., "1-10", "1,3,5")
        #[arg(long)]
        pages: Option<String>,

        /// Also list pages that could not be read
        #[arg(long)]
        report: bool,
    },

    /// Print the playable tokens of a PDF
    Tokens {
        /// Input PDF file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Output a JSON array
        #[arg(long)]
        json: bool,
    },

    /// Add a PDF to a subject's notes
    Upload {
        /// Input PDF file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Subject id
        #[arg(short, long)]
        subject: u32,

        /// Note title (defaults to the file name without `.pdf`)
        #[arg(short, long)]
        title: Option<String>,

        /// Uploader display name
        #[arg(long, default_value = "You")]
        by: String,
    },

    /// List a subject's notes
    Notes {
        /// Subject id
        #[arg(short, long)]
        subject: u32,

        /// Output JSON
        #[arg(long)]
        json: bool,
    },

    /// Restore a subject's note list exported with `notes --json`
    Import {
        /// JSON file holding the note list
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Subject id
        #[arg(short, long)]
        subject: u32,
    },

    /// Save a note's stored PDF
    Download {
        /// Note id
        #[arg(value_name = "ID")]
        id: u64,

        /// Output file (defaults to "<title>.pdf")
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Delete a note and its stored PDF
    Delete {
        /// Note id
        #[arg(value_name = "ID")]
        id: u64,
    },

    /// Play a stored note (or a PDF file) clip by clip
    Play {
        /// Note id
        #[arg(value_name = "ID", required_unless_present = "file")]
        id: Option<u64>,

        /// Play a PDF file directly instead of a stored note
        #[arg(long, value_name = "FILE", conflicts_with = "id")]
        file: Option<PathBuf>,

        /// Clip namespace under the media root
        #[arg(long, default_value = ClipResolver::DEFAULT_NAMESPACE)]
        namespace: String,
    },

    /// Show version information
    Version,
}

fn main() {
    env_logger::init();

    let cli = Cli::parse();

    let result = match cli.command {
        Some(Commands::Text {
            input,
            pages,
            report,
        }) => cmd_text(&input, pages.as_deref(), report),
        Some(Commands::Tokens { input, json }) => cmd_tokens(&input, json),
        Some(Commands::Upload {
            input,
            subject,
            title,
            by,
        }) => cmd_upload(&cli.library, &input, subject, title.as_deref(), &by),
        Some(Commands::Notes { subject, json }) => cmd_notes(&cli.library, subject, json),
        Some(Commands::Import { input, subject }) => cmd_import(&cli.library, &input, subject),
        Some(Commands::Download { id, output }) => cmd_download(&cli.library, id, output.as_deref()),
        Some(Commands::Delete { id }) => cmd_delete(&cli.library, id),
        Some(Commands::Play {
            id,
            file,
            namespace,
        }) => cmd_play(&cli.library, &cli.media, id, file.as_deref(), &namespace),
        Some(Commands::Version) => {
            cmd_version();
            Ok(())
        }
        None => {
            println!("{}", "Usage: signreel <COMMAND>".yellow());
            println!("       signreel --help for more information");
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("{}: {}", "Error".red().bold(), e);
        std::process::exit(1);
    }
}

fn open_library(library: &Path) -> signreel::Result<NoteStore<FileKv>> {
    NoteStore::open(FileKv::open(library)?)
}

fn cmd_text(input: &Path, pages: Option<&str>, report: bool) -> CliResult {
    let page_selection = if let Some(p) = pages {
        PageSelection::parse(p).map_err(|e| format!("Invalid page range: {}", e))?
    } else {
        PageSelection::All
    };

    let data = fs::read(input)?;
    let extractor = TextExtractor::with_options(ExtractOptions::new().with_pages(page_selection));
    let extraction = extractor.extract_with_report(&data);

    println!("{}", extraction.text);

    if report {
        eprintln!();
        eprintln!(
            "{}: {} of {}",
            "Pages read".bold(),
            extraction.pages.len(),
            extraction.page_count
        );
        for warning in &extraction.warnings {
            eprintln!("  {} {}", "!".yellow(), warning);
        }
    }

    Ok(())
}

fn cmd_tokens(input: &Path, json: bool) -> CliResult {
    let tokens = signreel::tokenize_file(input)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&tokens)?);
    } else {
        println!("{}", tokens.words().join(" "));
        eprintln!("{} {} tokens", "Done!".green().bold(), tokens.len());
    }

    Ok(())
}

fn cmd_upload(library: &Path, input: &Path, subject: u32, title: Option<&str>, by: &str) -> CliResult {
    let data = fs::read(input)?;
    if !signreel::is_pdf_bytes(&data) {
        return Err(format!("{} is not a PDF", input.display()).into());
    }

    let file_stem = input.file_stem().unwrap_or_default().to_string_lossy();
    let title = title.unwrap_or(&*file_stem);

    let kv = FileKv::open(library)?;
    let _lock = kv.lock_uploads()?;

    let pb = ProgressBar::new_spinner();
    pb.set_style(ProgressStyle::default_spinner().template("{spinner:.green} {msg}")?);
    pb.set_message("Extracting text...");

    let mut store = NoteStore::open(kv)?;
    let note = store.upload(
        Upload {
            subject: SubjectId(subject),
            title,
            content: &data,
            uploaded_by: Some(by),
        },
        &TextExtractor::new(),
    )?;

    pb.finish_with_message("Done!");

    let words = note
        .extracted_text
        .as_deref()
        .map(|t| signreel::tokenize(t).len())
        .unwrap_or(0);
    println!("{} {} ({})", "Uploaded".green(), note.title, note.id);
    println!("  {} subject {}", "├─".dimmed(), subject);
    println!("  {} {} playable words", "└─".dimmed(), words);

    Ok(())
}

fn cmd_notes(library: &Path, subject: u32, json: bool) -> CliResult {
    let store = open_library(library)?;
    let notes = store.list_notes(SubjectId(subject))?;

    if json {
        println!("{}", serde_json::to_string_pretty(&notes)?);
        return Ok(());
    }

    println!("{} {}", "Subject".cyan().bold(), subject);
    println!("{}", "─".repeat(40).dimmed());

    if notes.is_empty() {
        println!("{}", "No notes".dimmed());
    }
    for note in &notes {
        let by = note.uploaded_by.as_deref().unwrap_or("-");
        let cached = if note.extracted_text.is_some() {
            "text".green()
        } else {
            "no text".dimmed()
        };
        println!(
            "{:>14}  {}  {}  {}  [{}]",
            note.id,
            note.date,
            note.title.bold(),
            by.dimmed(),
            cached
        );
    }

    Ok(())
}

fn cmd_import(library: &Path, input: &Path, subject: u32) -> CliResult {
    let notes: Vec<NoteRecord> = serde_json::from_slice(&fs::read(input)?)?;
    let count = notes.len();

    let mut store = open_library(library)?;
    if !store.seed(SubjectId(subject), notes)? {
        return Err(format!("Subject {} already has notes", subject).into());
    }

    println!("{} {} notes into subject {}", "Imported".green(), count, subject);
    Ok(())
}

fn cmd_download(library: &Path, id: u64, output: Option<&Path>) -> CliResult {
    let store = open_library(library)?;
    let (_, note) = store.find(NoteId(id))?;
    let data = store.raw_content(note.id)?;

    let output = match output {
        Some(path) => path.to_path_buf(),
        None => PathBuf::from(format!("{}.pdf", note.title.replace(['/', '\\'], "_"))),
    };
    fs::write(&output, &data)?;

    println!(
        "{} {} → {} ({} bytes)",
        "Saved".green(),
        note.title,
        output.display(),
        data.len()
    );
    Ok(())
}

fn cmd_delete(library: &Path, id: u64) -> CliResult {
    let mut store = open_library(library)?;
    let note = store.delete_note(NoteId(id))?;
    println!("{} {} ({})", "Deleted".green(), note.title, note.id);
    Ok(())
}

fn cmd_play(
    library: &Path,
    media: &Path,
    id: Option<u64>,
    file: Option<&Path>,
    namespace: &str,
) -> CliResult {
    let (sink, source) = event_channel();
    let surface = MediaSurface::new(DirMedia::new(media), sink);
    let resolver = ClipResolver::new().with_namespace(namespace);
    let mut driver = PlaybackDriver::new(PlaybackController::with_surface(resolver, surface), source);

    let extractor = TextExtractor::new();
    match (id, file) {
        (_, Some(path)) => {
            let data = fs::read(path)?;
            driver.start(signreel::tokenize(&extractor.extract(&data)));
        }
        (Some(id), None) => {
            let mut store = open_library(library)?;
            open_session(driver.controller_mut(), &mut store, NoteId(id), &extractor)?;
        }
        (None, None) => return Err("Either a note id or --file is required".into()),
    }

    let total = driver.controller().snapshot().total as u64;
    let pb = ProgressBar::new(total);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:40.cyan/blue}] {msg}")?
            .progress_chars("#>-"),
    );
    pb.set_message(driver.controller().snapshot().label());

    let state = driver.run(|snapshot| {
        if let PlaybackState::Playing { index } = snapshot.state {
            pb.set_position(index as u64 + 1);
        }
        pb.set_message(snapshot.label());
    });

    match state {
        PlaybackState::Complete => {
            pb.set_position(total);
            pb.finish_with_message("Translation complete");
        }
        other => pb.abandon_with_message(format!("Stopped: {}", other)),
    }

    let missing = driver.controller().surface().missing();
    if !missing.is_empty() {
        println!();
        println!(
            "{} {} of {} clips missing under {}",
            "Skipped".yellow().bold(),
            missing.len(),
            total,
            media.display()
        );
        for resource in missing {
            println!("  {} {}", "─".dimmed(), resource);
        }
    }

    Ok(())
}

fn cmd_version() {
    println!("{} {}", "signreel".cyan().bold(), env!("CARGO_PKG_VERSION"));
    println!("PDF notes to sign-language clip playback");
    println!();
    println!("License: MIT");
}
