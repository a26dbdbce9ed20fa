use clap::{Parser, Subcommand};
use procflow::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Compile procedure documents to workflow graphs and back
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    /// Log structural warnings and compiler phases at debug level
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Check a procedure document and list every error and warning
    Validate {
        /// Procedure document, as markup (.md) or JSON
        document: PathBuf,
    },
    /// Compile a procedure document into a workflow graph
    Compile {
        /// Procedure document, as markup (.md) or JSON
        document: PathBuf,
        /// Write the graph JSON here instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Name of the generated workflow (defaults to the document title)
        #[arg(short, long)]
        name: Option<String>,
    },
    /// Read a workflow graph back into a procedure document
    Decompile {
        /// Workflow graph JSON
        graph: PathBuf,
        /// Print the document as markup instead of JSON
        #[arg(short, long)]
        markup: bool,
    },
    /// Re-emit a procedure document in normalized markup
    Format {
        /// Procedure document, as markup (.md) or JSON
        document: PathBuf,
    },
}

fn main() {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .without_time()
                .with_writer(std::io::stderr),
        )
        .init();

    match cli.command {
        Command::Validate { document } => run_validate(&document),
        Command::Compile {
            document,
            output,
            name,
        } => run_compile(&document, output.as_deref(), name),
        Command::Decompile { graph, markup } => run_decompile(&graph, markup),
        Command::Format { document } => {
            let document = load_document(&document);
            print!("{}", serialize_to_markup(&document));
        }
    }
}

fn run_validate(path: &Path) {
    let document = load_document(path);
    let report = validate(&document);

    for error in &report.errors {
        println!("error   {}", error);
    }
    for warning in &report.warnings {
        println!("warning {}", warning);
    }

    if report.valid {
        println!(
            "'{}' is valid ({} warning(s))",
            document.title,
            report.warnings.len()
        );
    } else {
        exit_with_error(&format!(
            "'{}' has {} validation error(s)",
            document.title,
            report.errors.len()
        ));
    }
}

fn run_compile(path: &Path, output: Option<&Path>, name: Option<String>) {
    let document = load_document(path);

    let mut builder = Compiler::builder(&document);
    if let Some(name) = name {
        builder = builder.with_workflow_name(name);
    }
    let compilation = builder
        .build()
        .compile()
        .unwrap_or_else(|e| exit_with_error(&format!("Compilation failed: {}", e)));

    let json = compilation
        .graph
        .to_json_pretty()
        .unwrap_or_else(|e| exit_with_error(&format!("Failed to write graph JSON: {}", e)));

    match output {
        Some(output) => {
            fs::write(output, json).unwrap_or_else(|e| {
                exit_with_error(&format!("Failed to write '{}': {}", output.display(), e))
            });
            eprintln!(
                "Compiled {} node(s) into '{}'",
                compilation.graph.nodes.len(),
                output.display()
            );
        }
        None => println!("{}", json),
    }
}

fn run_decompile(path: &Path, markup: bool) {
    let text = read_file(path);
    let graph = WorkflowGraph::from_json(&text)
        .unwrap_or_else(|e| exit_with_error(&format!("Invalid workflow graph: {}", e)));

    let document = decompile(&graph)
        .unwrap_or_else(|e| exit_with_error(&format!("Decompilation failed: {}", e)));

    if markup {
        print!("{}", serialize_to_markup(&document));
    } else {
        let json = document
            .to_json_pretty()
            .unwrap_or_else(|e| exit_with_error(&format!("Failed to write document JSON: {}", e)));
        println!("{}", json);
    }
}

/// Markup for `.md`/`.markdown`/`.txt` files, JSON for everything else.
fn load_document(path: &Path) -> ProcedureDocument {
    let text = read_file(path);
    let is_markup = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| matches!(ext.to_ascii_lowercase().as_str(), "md" | "markdown" | "txt"));

    if is_markup {
        parse_markup(&text)
    } else {
        ProcedureDocument::from_json(&text)
            .unwrap_or_else(|e| exit_with_error(&format!("Invalid procedure document: {}", e)))
    }
}

fn read_file(path: &Path) -> String {
    fs::read_to_string(path).unwrap_or_else(|e| {
        exit_with_error(&format!("Failed to read '{}': {}", path.display(), e))
    })
}

fn exit_with_error(message: &str) -> ! {
    eprintln!("\nError: {}", message);
    std::process::exit(1);
}
