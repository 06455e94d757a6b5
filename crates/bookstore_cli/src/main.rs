//! Command-line front end for the configured bookstore.
//!
//! # Responsibility
//! - Map subcommands onto `BookstoreApi` endpoints.
//! - Print every response envelope as JSON on stdout.
//!
//! # Invariants
//! - Exit code is non-zero whenever the response status is 400 or above, or
//!   the store could not be bootstrapped.

use bookstore_api::{ApiConfig, ApiResponse, BookstoreApi};
use bookstore_core::init_logging;
use clap::{Parser, Subcommand};
use serde::Serialize;
use serde_json::json;
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Debug, Parser)]
#[command(name = "bookstore")]
#[command(about = "Bookstore catalog - manage the books of the configured store", long_about = None)]
struct Cli {
    /// SQLite database file; overrides BOOKSTORE_DB_PATH
    #[arg(long, global = true)]
    db: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Print the store name
    Name,
    /// Print the store greeting
    Welcome,
    /// List the books held by the store
    List {
        /// Print full book records instead of titles
        #[arg(long)]
        details: bool,
    },
    /// Add a book to the store
    Add {
        title: String,
        #[arg(long)]
        author: Option<String>,
        #[arg(long)]
        isbn: Option<String>,
        #[arg(long)]
        year: Option<i32>,
    },
    /// Remove a book from the store by title
    Remove { title: String },
    /// Search the whole catalog by title or author
    Search { term: String },
    /// Check storage readiness
    Health,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let mut config = ApiConfig::from_env();
    if let Some(db) = cli.db {
        config.db_path = db;
    }
    if let Some(log_dir) = &config.log_dir {
        if let Err(err) = init_logging(&config.log_level, &log_dir.to_string_lossy()) {
            eprintln!("Error: {err}");
            return ExitCode::FAILURE;
        }
    }

    let api = match BookstoreApi::bootstrap(&config) {
        Ok(api) => api,
        Err(err) => {
            log::error!("event=cli_bootstrap module=cli status=error error={err}");
            eprintln!("Error: {err}");
            return ExitCode::FAILURE;
        }
    };

    match cli.command {
        Commands::Name => emit(api.store_name()),
        Commands::Welcome => emit(api.welcome()),
        Commands::List { details: false } => emit(api.list_books()),
        Commands::List { details: true } => emit(api.list_book_details()),
        Commands::Add {
            title,
            author,
            isbn,
            year,
        } => {
            let payload = json!({ "title": title, "author": author, "isbn": isbn, "year": year });
            emit(api.add_book(&payload.to_string()))
        }
        Commands::Remove { title } => {
            emit(api.remove_book(&json!({ "title": title }).to_string()))
        }
        Commands::Search { term } => emit(api.search_books(Some(&term))),
        Commands::Health => emit(api.health()),
    }
}

fn emit<T: Serialize>(response: ApiResponse<T>) -> ExitCode {
    match serde_json::to_string_pretty(&response) {
        Ok(rendered) => println!("{rendered}"),
        Err(err) => {
            eprintln!("Error: failed to render response: {err}");
            return ExitCode::FAILURE;
        }
    }

    if response.status >= 400 {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}
