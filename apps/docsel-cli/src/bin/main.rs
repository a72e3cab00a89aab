use std::env;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use docsel_core::config::Config;
use docsel_core::fixture::FixtureRetrieval;
use docsel_core::traits::GenerationService;
use docsel_core::types::{ChatRole, Document, GenerationRequest};
use docsel_engine::Session;

/// Stands in for the model endpoint: answers with the prompt it would send.
struct DryRunGenerator;

impl GenerationService for DryRunGenerator {
    fn generate(&self, request: &GenerationRequest) -> anyhow::Result<String> {
        let mut out = format!("(dry run over {} documents)\n", request.document_uris.len());
        for message in &request.messages {
            let role = match message.role {
                ChatRole::User => "user",
                ChatRole::Assistant => "assistant",
            };
            out.push_str(&format!("--- {}\n{}\n", role, message.content));
        }
        Ok(out)
    }
}

fn init_logging() {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(env_filter).with_target(false).with_writer(io::stderr).init();
}

fn print_help() {
    println!("Commands:");
    println!("  search <term>         run a search");
    println!("  clear                 drop results, keep selections");
    println!("  select <uri>          select a document");
    println!("  deselect <uri>        deselect a document");
    println!("  type <name> on|off    toggle a document type filter");
    println!("  ask <question>        generate over the selected documents");
    println!("  show                  print the current view");
    println!("  json                  print the current view as JSON");
    println!("  selected              list selected documents");
    println!("  help | quit");
}

fn print_document(doc: &Document) {
    let mark = if doc.selected { "[x]" } else { "[ ]" };
    println!(
        "  {} {} ({}) {} citation(s), best {:.1}%",
        mark,
        doc.title,
        doc.document_type,
        doc.citation_count,
        doc.best_score() * 100.0
    );
    if let Some(uri) = &doc.uri {
        println!("      {}", uri);
    }
}

fn show<R, G>(session: &Session<R, G>)
where
    R: docsel_core::traits::RetrievalService,
    G: GenerationService,
{
    let view = session.view();
    if let Some(notice) = view.notice {
        println!("⚠️  {}", notice);
    }
    if !view.type_state.is_empty() {
        println!("📂 Document Types");
        for (doc_type, info) in view.type_state {
            let mark = if info.selected { "[x]" } else { "[ ]" };
            println!("  {} {} ({})", mark, doc_type, info.count);
        }
    }
    if !view.documents.selected.is_empty() {
        println!("✅ Selected");
        for doc in &view.documents.selected {
            print_document(doc);
        }
    }
    if !view.documents.unselected.is_empty() {
        println!("🔍 Results");
        for doc in &view.documents.unselected {
            print_document(doc);
        }
    }
    if !view.unaddressable.is_empty() {
        println!("📝 Unlinked passages");
        for citation in view.unaddressable {
            println!("  - {} ({}) {}", citation.document_title, citation.document_type, citation.relevance_percent());
        }
    }
    if view.documents.is_empty() && view.unaddressable.is_empty() {
        println!("Enter a search term to see results");
    }
}

fn parse_toggle(word: &str) -> Option<bool> {
    match word {
        "on" => Some(true),
        "off" => Some(false),
        _ => None,
    }
}

fn main() -> anyhow::Result<()> {
    init_logging();
    let config = Config::load().map_err(|e| {
        eprintln!("Error loading config: {}", e);
        e
    })?;
    let settings = config.settings()?;
    let fixture_path = match env::args().nth(1) {
        Some(p) => PathBuf::from(p),
        None => config.fixture_path()?,
    };
    let retrieval = FixtureRetrieval::load(&fixture_path)?;
    tracing::info!(path = %fixture_path.display(), terms = retrieval.terms().len(), "retrieval fixture ready");

    let mut session = Session::new(retrieval, DryRunGenerator, &settings);
    println!("📚 docsel - document search and selection");
    print_help();

    let stdin = io::stdin();
    loop {
        print!("> ");
        io::stdout().flush()?;
        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            break;
        }
        let line = line.trim();
        let (cmd, rest) = line.split_once(' ').unwrap_or((line, ""));
        let rest = rest.trim();
        match cmd {
            "" => continue,
            "search" => {
                session.search(rest);
                show(&session);
            }
            "clear" => {
                session.clear();
                show(&session);
            }
            "select" | "deselect" => {
                session.toggle_document(rest, cmd == "select");
                show(&session);
            }
            "type" => {
                let (name, flag) = rest.rsplit_once(' ').unwrap_or((rest, ""));
                match parse_toggle(flag.trim()) {
                    Some(checked) => {
                        session.toggle_type(name.trim(), checked);
                        show(&session);
                    }
                    None => println!("Usage: type <name> on|off"),
                }
            }
            "ask" => match session.generate(rest) {
                Ok(answer) => println!("{}", answer),
                Err(e) => println!("⚠️  {}", e),
            },
            "show" => show(&session),
            "json" => println!("{}", serde_json::to_string_pretty(&session.view())?),
            "selected" => {
                for selected in session.current_selections() {
                    println!("  {} [{}] {}", selected.title, selected.document_type, selected.uri);
                }
            }
            "help" => print_help(),
            "quit" | "exit" => break,
            other => println!("Unknown command: {} (try 'help')", other),
        }
    }
    Ok(())
}
