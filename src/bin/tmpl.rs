use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use colored::Colorize;
use std::io::IsTerminal;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use tmpl::lsp::TemplateDocument;
use tmpl::parser::parse_template_bindings;
use tmpl::{Project, Reporter};

/// Type-check templates and answer editor queries from a project file.
#[derive(Parser, Debug)]
#[command(name = "tmpl", version, about)]
struct Cli {
    /// When to color output.
    #[arg(long, value_enum, default_value_t = ColorChoice::Auto, global = true)]
    color: ColorChoice,

    #[command(subcommand)]
    command: Command,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum ColorChoice {
    Auto,
    Always,
    Never,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Report diagnostics for every template of a project.
    Check {
        /// Project JSON file.
        project: PathBuf,
        /// Print diagnostics as JSON.
        #[arg(long)]
        json: bool,
    },
    /// List completions at a position.
    Complete(PositionArgs),
    /// Show quick info for the symbol at a position.
    Hover(PositionArgs),
    /// Print the bindings of a structural attribute value.
    Bindings {
        /// Template key, e.g. `ngFor`.
        key: String,
        /// Attribute value, e.g. `let item of items; trackBy: byId`.
        value: String,
        #[arg(long)]
        json: bool,
    },
}

#[derive(Args, Debug)]
struct PositionArgs {
    /// Project JSON file.
    project: PathBuf,
    /// File holding the template.
    #[arg(long)]
    file: String,
    /// Byte offset in that file.
    #[arg(long)]
    offset: u32,
    /// Print the answer as JSON.
    #[arg(long)]
    json: bool,
}

fn main() -> Result<ExitCode> {
    tmpl::tracing_config::init_tracing();

    let cli = Cli::parse();
    let color = match cli.color {
        ColorChoice::Always => true,
        ColorChoice::Never => false,
        ColorChoice::Auto => std::io::stdout().is_terminal(),
    };
    colored::control::set_override(color);

    match cli.command {
        Command::Check { project, json } => check(&project, json, color),
        Command::Complete(args) => complete(&args),
        Command::Hover(args) => hover(&args),
        Command::Bindings { key, value, json } => bindings(&key, &value, json),
    }
}

fn check(path: &Path, json: bool, color: bool) -> Result<ExitCode> {
    let project = Project::load(path)?;
    let reports = project.check_all();
    let errors: usize = reports.iter().map(|r| r.error_count()).sum();

    if json {
        let files: Vec<serde_json::Value> = reports
            .iter()
            .map(|r| {
                serde_json::json!({
                    "fileName": r.document.file_name(),
                    "diagnostics": r.diagnostics,
                })
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&files)?);
    } else {
        let reporter = Reporter::new(color);
        for report in reports.iter().filter(|r| !r.diagnostics.is_empty()) {
            println!("{}\n", reporter.render(report.document, &report.diagnostics));
        }
        let templates = reports.iter().filter(|r| r.error_count() > 0).count();
        let summary = match errors {
            0 => format!("No errors in {} templates.", reports.len()).green().to_string(),
            1 => "Found 1 error.".red().bold().to_string(),
            n => format!("Found {n} errors in {templates} templates.").red().bold().to_string(),
        };
        println!("{summary}");
    }

    Ok(if errors == 0 {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

fn template_at<'p>(project: &'p Project, args: &PositionArgs) -> Result<&'p TemplateDocument> {
    project
        .document_at(&args.file, args.offset)
        .with_context(|| format!("no template of '{}' covers offset {}", args.file, args.offset))
}

fn complete(args: &PositionArgs) -> Result<ExitCode> {
    let project = Project::load(&args.project)?;
    let document = template_at(&project, args)?;
    let completions = project.service().completions_at(document, args.offset);

    if args.json {
        println!("{}", serde_json::to_string_pretty(&completions)?);
        return Ok(ExitCode::SUCCESS);
    }
    let Some(completions) = completions else {
        println!("{}", "no completions".dimmed());
        return Ok(ExitCode::SUCCESS);
    };
    let width = completions.entries.iter().map(|e| e.name.len()).max().unwrap_or(0);
    for entry in &completions.entries {
        println!("{:width$}  {}", entry.name, entry.kind.to_string().cyan());
    }
    Ok(ExitCode::SUCCESS)
}

fn hover(args: &PositionArgs) -> Result<ExitCode> {
    let project = Project::load(&args.project)?;
    let document = template_at(&project, args)?;
    let info = project.service().hover_at(document, args.offset);

    if args.json {
        println!("{}", serde_json::to_string_pretty(&info)?);
        return Ok(ExitCode::SUCCESS);
    }
    match info {
        Some(info) => {
            println!("{}", info.display().bold());
            if let Some(docs) = &info.documentation {
                println!("\n{docs}");
            }
        }
        None => println!("{}", "no symbol".dimmed()),
    }
    Ok(ExitCode::SUCCESS)
}

fn bindings(key: &str, value: &str, json: bool) -> Result<ExitCode> {
    let parsed = parse_template_bindings(key, value, &format!("*{key}"), 0);
    if json {
        println!("{}", serde_json::to_string_pretty(&parsed)?);
        return Ok(ExitCode::SUCCESS);
    }
    for binding in &parsed.bindings {
        let text = binding.span.slice(value).unwrap_or_default();
        if binding.key_is_var {
            let name = binding.name.as_deref().unwrap_or_default();
            println!("{} {} = {}    {}", "let".magenta(), binding.key, name, text.dimmed());
        } else {
            let value_text = binding
                .value_span
                .and_then(|span| span.slice(value))
                .unwrap_or_default();
            println!("{}: {}    {}", binding.key.bold(), value_text, text.dimmed());
        }
    }
    for error in &parsed.errors {
        println!("{} {}", "error:".red().bold(), error.message_text());
    }
    Ok(if parsed.errors.is_empty() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}
