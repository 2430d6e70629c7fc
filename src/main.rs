//! # chatarchive CLI
//!
//! Command-line interface for the chatarchive library.

use std::io::{self, BufRead, Write};
use std::path::Path;
use std::process;
use std::time::Instant;

use clap::Parser as ClapParser;
use env_logger::Env;

use chatarchive::ChatArchiveError;
use chatarchive::archive::open_extractor;
use chatarchive::cli::Args;
use chatarchive::core::{Conversation, SearchIndex, UserPrompt};
use chatarchive::format::write_to_format;
use chatarchive::session::{PrimaryUserOutcome, Session};

fn main() {
    let args = <Args as ClapParser>::parse();

    env_logger::Builder::from_env(Env::default().default_filter_or(args.log_level()))
        .target(env_logger::Target::Stderr)
        .init();

    if let Err(e) = run(&args) {
        eprintln!("❌ Error: {}", e);
        process::exit(1);
    }
}

/// Reads the answer to the sender prompt from stdin; EOF cancels.
struct StdinPrompt;

impl UserPrompt for StdinPrompt {
    fn prompt(&self, message: &str) -> Option<String> {
        print!("{message}> ");
        io::stdout().flush().ok()?;

        let mut answer = String::new();
        match io::stdin().lock().read_line(&mut answer) {
            Ok(0) | Err(_) => None,
            Ok(_) => Some(answer.trim_end().to_string()),
        }
    }
}

fn run(args: &Args) -> Result<(), ChatArchiveError> {
    let total_start = Instant::now();
    let archive_config = args.archive_config();

    // Print header
    println!("📦 chatarchive v{}", env!("CARGO_PKG_VERSION"));
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    println!("📂 Input:   {}", args.input);
    if !args.list {
        println!("💾 Output:  {}", args.output_path());
        println!("📄 Format:  {}", args.output_format());
    }
    println!();

    // Step 1: Extract and parse
    let extractor = open_extractor(Path::new(&args.input), &archive_config)?;
    println!("⏳ Reading {}...", extractor.name());
    let load_start = Instant::now();
    let extracted = extractor.extract()?;
    let mut session = Session::load(extracted, &archive_config, &args.parser_config());

    if session.is_empty() {
        return Err(ChatArchiveError::invalid_format(
            "input",
            format!("no chat transcripts found in '{}'", args.input),
        ));
    }

    println!(
        "   Found {} chats, {} media files ({:.2}s)",
        session.conversations().len(),
        session.media().len(),
        load_start.elapsed().as_secs_f64()
    );
    println!();

    // Step 2: Who am I
    resolve_primary_user(&mut session, args);
    println!();

    // Step 3: Summary
    println!("💬 Chats:");
    for conv in session.conversations() {
        print_summary(&session, conv);
    }
    println!();

    let conv = match &args.chat {
        Some(name) => session.conversation(name).ok_or_else(|| {
            ChatArchiveError::invalid_format("input", format!("no chat named '{name}'"))
        })?,
        None => &session.conversations()[0],
    };

    // Step 4: Search
    if let Some(query) = &args.search {
        print_search(&session, conv, SearchIndex::build(conv, query));
        println!();
    }

    // Step 5: Export
    if !args.list {
        let output_path = args.output_path();
        let format = args.output_format();
        println!("💾 Writing {} from {}...", format, conv.name);
        let write_start = Instant::now();
        write_to_format(
            &conv.all_messages,
            &output_path,
            format,
            &args.output_config(),
            Some(session.media()),
        )?;
        println!("   Written in {:.2}s", write_start.elapsed().as_secs_f64());
        println!();
        println!("✅ Done! Output saved to {}", output_path);
    }

    println!();
    println!("⚡ Total time: {:.2}s", total_start.elapsed().as_secs_f64());

    Ok(())
}

fn resolve_primary_user(session: &mut Session, args: &Args) {
    if args.auto_me {
        let first = session.conversations()[0].id.clone();
        match session.auto_detect_primary_user(&first) {
            Some(user) => println!("👤 You:     {} (most messages)", user),
            None => println!("👤 You:     nobody (no messages)"),
        }
        return;
    }

    let outcome = match &args.me {
        Some(answer) => {
            let answer = answer.clone();
            session.choose_primary_user(&move |_: &str| Some(answer.clone()))
        }
        None => session.choose_primary_user(&StdinPrompt),
    };

    match outcome {
        PrimaryUserOutcome::Selected(user) => println!("👤 You:     {}", user),
        PrimaryUserOutcome::AutoDetected { user, reason } => println!(
            "👤 You:     {} (auto-detected, {})",
            user.as_deref().unwrap_or("nobody"),
            reason
        ),
        PrimaryUserOutcome::NoSenders => println!("👤 You:     nobody (no senders)"),
    }
}

fn print_summary(session: &Session, conv: &Conversation) {
    let media = conv
        .all_messages
        .iter()
        .filter(|msg| session.resolve_media(msg).is_media())
        .count();
    let mine = conv
        .all_messages
        .iter()
        .filter(|msg| session.is_mine(msg))
        .count();

    println!("   • {}", conv.name);
    println!(
        "     {} messages ({} yours), {} days, {} media",
        conv.len(),
        mine,
        conv.messages_by_date.len(),
        media
    );
    println!("     Senders: {}", conv.unique_senders.join(", "));
}

fn print_search(session: &Session, conv: &Conversation, mut index: SearchIndex) {
    println!(
        "🔍 {} matches for '{}' in {}",
        index.len(),
        index.query(),
        conv.name
    );

    for _ in 0..index.len() {
        let Some(id) = index.current() else { break };
        let position = index.position();
        index.next();

        let Some(msg) = conv.message(id) else { continue };
        let who = if session.is_mine(msg) { " (you)" } else { "" };
        let first_line = msg.text.lines().next().unwrap_or_default();
        println!(
            "   [{}/{}] {} {} {}{}: {}",
            position,
            index.len(),
            msg.date,
            msg.display_time(),
            msg.sender,
            who,
            first_line
        );
    }
}
