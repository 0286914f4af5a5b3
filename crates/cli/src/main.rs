//! Bookshelf CLI
//!
//! Command-line client for a running bookshelf API: browse, filter and edit
//! the catalog, and move it in and out of JSON files.

use std::path::PathBuf;

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};

mod catalog;
mod client;

use catalog::{BookFilter, Statistics};
use client::{Book, BookFields, BooksClient};

#[derive(Parser)]
#[command(name = "bookshelf-cli")]
#[command(about = "Manage the bookshelf catalog over its HTTP API")]
#[command(version)]
#[command(propagate_version = true)]
struct Cli {
    /// Base URL of the bookshelf API
    #[arg(
        long,
        global = true,
        env = "BOOKSHELF_API_URL",
        default_value = "http://localhost:3000"
    )]
    api_url: String,

    /// Output as JSON
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List books, optionally filtered
    #[command(alias = "ls")]
    List {
        /// Case-insensitive substring of the title
        #[arg(short, long)]
        title: Option<String>,
        /// Case-insensitive substring of the author
        #[arg(short, long)]
        author: Option<String>,
        /// Exact publication year
        #[arg(short, long)]
        year: Option<i32>,
    },
    /// Show catalog statistics
    Stats,
    /// Show one book
    Get {
        /// Book ID (24 hex characters)
        id: String,
    },
    /// Add a book
    Add {
        #[arg(short, long)]
        title: String,
        #[arg(short, long)]
        author: Option<String>,
        #[arg(short, long)]
        year: Option<i32>,
    },
    /// Bulk insert books from a JSON file holding an array of books
    Import {
        file: PathBuf,
    },
    /// Write every book as JSON to a file, or stdout when omitted
    Export {
        file: Option<PathBuf>,
    },
    /// Change the given fields of a book
    Update {
        /// Book ID (24 hex characters)
        id: String,
        #[arg(short, long)]
        title: Option<String>,
        #[arg(short, long)]
        author: Option<String>,
        #[arg(short, long)]
        year: Option<i32>,
    },
    /// Delete a book
    #[command(alias = "rm")]
    Delete {
        /// Book ID (24 hex characters)
        id: String,
    },
    /// Delete every book
    DeleteAll {
        /// Confirm the deletion
        #[arg(long)]
        yes: bool,
    },
    /// Insert a handful of classic books
    Sample,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .try_init()
        .ok();

    let cli = Cli::parse();
    let client = BooksClient::new(&cli.api_url);

    match cli.command {
        Commands::List {
            title,
            author,
            year,
        } => {
            let books = client.list().await?;
            let criteria = BookFilter {
                title,
                author,
                year,
            };
            let matched: Vec<Book> = catalog::filter(&books, &criteria)
                .into_iter()
                .cloned()
                .collect();
            print_books(&matched, cli.json)?;
        }
        Commands::Stats => {
            let books = client.list().await?;
            print_stats(&books, cli.json)?;
        }
        Commands::Get { id } => {
            let book = client.get(&id).await?;
            print_book(&book, cli.json)?;
        }
        Commands::Add {
            title,
            author,
            year,
        } => {
            let fields = BookFields {
                title: Some(title),
                author,
                published_year: year,
            };
            let book = client.create(&fields).await?;
            print_book(&book, cli.json)?;
        }
        Commands::Import { file } => {
            let raw = std::fs::read_to_string(&file)
                .with_context(|| format!("failed to read {}", file.display()))?;
            let entries: Vec<BookFields> = serde_json::from_str(&raw)
                .with_context(|| format!("{} must hold a JSON array of books", file.display()))?;
            let created = client.create_many(&entries).await?;
            println!("Imported {} books", created.len());
        }
        Commands::Export { file } => {
            let books = client.list().await?;
            let entries: Vec<BookFields> = books.into_iter().map(BookFields::from).collect();
            let rendered = serde_json::to_string_pretty(&entries)?;
            match file {
                Some(path) => {
                    std::fs::write(&path, rendered)
                        .with_context(|| format!("failed to write {}", path.display()))?;
                    println!("Exported {} books to {}", entries.len(), path.display());
                }
                None => println!("{rendered}"),
            }
        }
        Commands::Update {
            id,
            title,
            author,
            year,
        } => {
            let fields = BookFields {
                title,
                author,
                published_year: year,
            };
            if fields.is_empty() {
                bail!("nothing to update: pass --title, --author or --year");
            }
            let book = client.update(&id, &fields).await?;
            print_book(&book, cli.json)?;
        }
        Commands::Delete { id } => {
            println!("{}", client.delete(&id).await?);
        }
        Commands::DeleteAll { yes } => {
            if !yes {
                bail!("refusing to delete every book without --yes");
            }
            println!("{}", client.delete_all().await?);
        }
        Commands::Sample => {
            let created = client.create_many(&sample_books()).await?;
            println!("Added {} sample books", created.len());
        }
    }

    Ok(())
}

fn sample_books() -> Vec<BookFields> {
    [
        ("The Great Gatsby", "F. Scott Fitzgerald", 1925),
        ("To Kill a Mockingbird", "Harper Lee", 1960),
        ("1984", "George Orwell", 1949),
        ("Pride and Prejudice", "Jane Austen", 1813),
        ("The Catcher in the Rye", "J.D. Salinger", 1951),
    ]
    .into_iter()
    .map(|(title, author, year)| BookFields {
        title: Some(title.to_string()),
        author: Some(author.to_string()),
        published_year: Some(year),
    })
    .collect()
}

fn print_book(book: &Book, json: bool) -> anyhow::Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(book)?);
        return Ok(());
    }

    println!("ID:        {}", book.id);
    println!("Title:     {}", book.title);
    println!("Author:    {}", book.author.as_deref().unwrap_or("Unknown Author"));
    match book.published_year {
        Some(year) => println!("Published: {year}"),
        None => println!("Published: -"),
    }
    Ok(())
}

fn print_books(books: &[Book], json: bool) -> anyhow::Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(books)?);
        return Ok(());
    }

    if books.is_empty() {
        println!("No books found");
        return Ok(());
    }

    for book in books {
        let year = book
            .published_year
            .map(|y| y.to_string())
            .unwrap_or_else(|| "-".to_string());
        println!(
            "{}  {:<40}  {:<25}  {}",
            book.id,
            book.title,
            book.author.as_deref().unwrap_or("Unknown Author"),
            year
        );
    }
    println!("{} book(s)", books.len());
    Ok(())
}

fn print_stats(books: &[Book], json: bool) -> anyhow::Result<()> {
    let stats = Statistics::from_books(books);
    let years = catalog::year_options(books);

    if json {
        let value = serde_json::json!({
            "total": stats.total,
            "uniqueAuthors": stats.unique_authors,
            "latestYear": stats.latest_year,
            "oldestYear": stats.oldest_year,
            "years": years,
        });
        println!("{}", serde_json::to_string_pretty(&value)?);
        return Ok(());
    }

    let show = |year: Option<i32>| year.map_or_else(|| "-".to_string(), |y| y.to_string());
    println!("Total books:    {}", stats.total);
    println!("Unique authors: {}", stats.unique_authors);
    println!("Latest year:    {}", show(stats.latest_year));
    println!("Oldest year:    {}", show(stats.oldest_year));
    if !years.is_empty() {
        let listed: Vec<String> = years.iter().map(i32::to_string).collect();
        println!("Years:          {}", listed.join(", "));
    }
    Ok(())
}
