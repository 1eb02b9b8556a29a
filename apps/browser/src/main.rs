use std::io::{self, BufRead, Write};
use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use client_core::{
    HttpRecipeProvider, ListController, ListSnapshot, QueryMode, DEFAULT_BASE_URL,
    DEFAULT_PAGE_SIZE,
};
use shared::domain::Recipe;

#[derive(Parser, Debug)]
struct Args {
    /// Base URL of the recipe backend.
    #[arg(long, default_value = DEFAULT_BASE_URL)]
    server_url: String,
    /// Rows per page to start with.
    #[arg(long, default_value_t = DEFAULT_PAGE_SIZE)]
    page_size: u32,
}

#[derive(Debug, Clone, PartialEq)]
enum Command {
    Next,
    Prev,
    Page(u32),
    Size(u32),
    Search(String),
    Clear,
    Reload,
    Help,
    Quit,
}

fn parse_command(line: &str) -> Result<Command, String> {
    let line = line.trim();
    let (word, rest) = match line.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim()),
        None => (line, ""),
    };
    match word {
        "next" | "n" => Ok(Command::Next),
        "prev" | "p" => Ok(Command::Prev),
        "page" => rest
            .parse()
            .map(Command::Page)
            .map_err(|_| "usage: page <number>".to_string()),
        "size" => rest
            .parse()
            .map(Command::Size)
            .map_err(|_| "usage: size <rows>".to_string()),
        "search" | "s" if !rest.is_empty() => Ok(Command::Search(rest.to_string())),
        "search" | "s" => Err("usage: search <title>".to_string()),
        "clear" | "c" => Ok(Command::Clear),
        "reload" | "r" => Ok(Command::Reload),
        "help" | "h" | "?" => Ok(Command::Help),
        "quit" | "q" | "exit" => Ok(Command::Quit),
        other => Err(format!("unknown command '{other}' (try 'help')")),
    }
}

fn print_help() {
    println!("commands:");
    println!("  next / prev        move one page");
    println!("  page <number>      jump to a page (1-based)");
    println!("  size <rows>        change rows per page");
    println!("  search <title>     filter by title");
    println!("  clear              drop the search filter");
    println!("  reload             refetch the current page");
    println!("  quit               exit");
}

fn truncated(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let kept: String = text.chars().take(max_chars.saturating_sub(3)).collect();
    format!("{kept}...")
}

fn format_row(recipe: &Recipe) -> String {
    let rating = recipe
        .rating
        .map(|r| format!("{r:.1}"))
        .unwrap_or_else(|| "N/A".to_string());
    let total_time = recipe
        .total_time
        .map(|t| format!("{t} min"))
        .unwrap_or_else(|| "N/A".to_string());
    let serves = recipe
        .serves
        .map(|s| s.to_string())
        .unwrap_or_else(|| "N/A".to_string());
    let cuisine = recipe.cuisine.as_deref().unwrap_or("N/A");
    format!(
        "{:<42} {:<18} {:>4} {:>8} {:>6}",
        truncated(&recipe.title, 42),
        truncated(cuisine, 18),
        rating,
        total_time,
        serves
    )
}

fn format_footer(snapshot: &ListSnapshot) -> String {
    let page = snapshot.query.page_index as u64 + 1;
    let pages = snapshot.page_count().max(1);
    let mut footer = format!("page {page}/{pages} ({} recipes)", snapshot.row_count());
    if let QueryMode::Search { term } = &snapshot.query.mode {
        footer.push_str(&format!(", searching \"{term}\""));
    }
    footer
}

fn render(snapshot: &ListSnapshot) {
    if let Some(message) = snapshot.error_message() {
        println!("error: {message}");
    }
    if snapshot.rows().is_empty() {
        println!("(no recipes on this page)");
    } else {
        println!(
            "{:<42} {:<18} {:>4} {:>8} {:>6}",
            "title", "cuisine", "rate", "time", "serves"
        );
        for recipe in snapshot.rows() {
            println!("{}", format_row(recipe));
        }
    }
    println!("{}", format_footer(snapshot));
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt().with_env_filter("info").init();
    let args = Args::parse();

    let provider = Arc::new(HttpRecipeProvider::new(args.server_url.clone()));
    let controller = ListController::with_page_size(provider, args.page_size);

    println!("recipe browser, backend {}", args.server_url);
    println!("type 'help' for commands");

    controller.initialize().await;
    render(&controller.snapshot().await);

    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();
    loop {
        print!("> ");
        io::stdout().flush()?;
        let Some(line) = lines.next() else { break };
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let command = match parse_command(&line) {
            Ok(command) => command,
            Err(message) => {
                println!("{message}");
                continue;
            }
        };
        match command {
            Command::Quit => break,
            Command::Help => {
                print_help();
                continue;
            }
            Command::Next => {
                let page_index = controller.snapshot().await.query.page_index;
                controller.set_page(page_index.saturating_add(1)).await;
            }
            Command::Prev => {
                let page_index = controller.snapshot().await.query.page_index;
                if page_index == 0 {
                    println!("already on the first page");
                    continue;
                }
                controller.set_page(page_index - 1).await;
            }
            Command::Page(number) => controller.set_page(number.saturating_sub(1)).await,
            Command::Size(rows) => controller.set_page_size(rows).await,
            Command::Search(term) => {
                controller.set_search_term(term).await;
                controller.submit_search().await;
            }
            Command::Clear => controller.clear_search().await,
            Command::Reload => controller.initialize().await,
        }
        render(&controller.snapshot().await);
    }

    Ok(())
}
