mod calc;
mod config;
mod error;
mod form;
mod invoice_gen;
mod logo;
mod models;
mod print;
mod render;
mod ui;

use std::fs::{self, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use anyhow::{Context, Result};
use chrono::Local;
use clap::{Parser, Subcommand};
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyEventKind},
    execute,
    terminal::{self, EnterAlternateScreen, LeaveAlternateScreen},
};
use serde_json::json;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;
use tui::{
    backend::{Backend, CrosstermBackend},
    Terminal,
};

use crate::config::Config;
use crate::form::FormCommand;
use crate::invoice_gen::InvoiceGenerator;
use crate::models::InvoiceData;
use crate::print::Printer;
use crate::render::RenderOptions;
use crate::ui::invoice_form::{handle_input, render_invoice_form, FormAction, InvoiceFormState};

#[derive(Parser)]
#[command(name = "invoice_maker", version, about = "Fill in, preview, export and print invoices")]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Open the invoice form with a live preview (default)
    Edit,
    /// Spell an amount in words
    Words {
        #[arg(allow_negative_numbers = true)]
        amount: f64,
        /// Name of the fractional unit, `INVOICE_SUBUNIT_NAME` when omitted
        #[arg(long)]
        subunit: Option<String>,
    },
    /// Render a JSON draft to Markdown and print its totals
    Render {
        #[arg(long)]
        draft: PathBuf,
        /// Also convert the Markdown to PDF
        #[arg(long)]
        pdf: bool,
        /// Send the PDF to the printer (implies --pdf)
        #[arg(long)]
        print: bool,
    },
}

fn init_tracing(config: &Config, to_file: bool) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.log_filter));

    if to_file {
        // The alternate screen owns the terminal, so the form logs to a file.
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&config.log_file)
            .with_context(|| format!("could not open log file {}", config.log_file.display()))?;
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_ansi(false)
            .with_writer(Mutex::new(file))
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(io::stderr)
            .init();
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load configuration
    let config = config::init()?;

    match cli.command.unwrap_or(Command::Edit) {
        Command::Edit => {
            init_tracing(&config, true)?;
            edit(&config).await
        }
        Command::Words { amount, subunit } => {
            init_tracing(&config, false)?;
            let subunit = subunit.as_deref().unwrap_or(config.subunit_name.as_str());
            println!("{}", spell_amount(amount, subunit)?);
            Ok(())
        }
        Command::Render { draft, pdf, print } => {
            init_tracing(&config, false)?;
            render_draft(&config, &draft, pdf || print, print).await
        }
    }
}

fn spell_amount(amount: f64, subunit: &str) -> Result<String> {
    let words = match subunit {
        calc::DEFAULT_SUBUNIT => calc::amount_to_words(amount)?,
        other => calc::amount_to_words_with_subunit(amount, other)?,
    };
    Ok(words)
}

async fn render_draft(config: &Config, draft: &Path, pdf: bool, print: bool) -> Result<()> {
    let json = fs::read_to_string(draft)
        .with_context(|| format!("could not read draft {}", draft.display()))?;
    let mut data = InvoiceData::from_draft_json(&json)?;
    if data.company_address.trim().is_empty() {
        data.company_address = config.company_address.clone();
    }

    let options = RenderOptions::from_config(config, true);
    let markdown = render::render_markdown(&data, &config.company_profile(), &options)?;
    let generator = InvoiceGenerator::from_config(config)?;
    let md_path = generator.write_markdown(&data, &markdown)?;

    let pdf_path = if pdf {
        Some(generator.export_pdf(&md_path).await?)
    } else {
        None
    };
    if print {
        if let Some(path) = &pdf_path {
            Printer::new(&config.print_command).print(path).await?;
        }
    }

    let totals = data.totals();
    let summary = json!({
        "markdown": md_path,
        "pdf": pdf_path,
        "totals": totals,
        "amount_in_words": render::amount_in_words_line(totals.grand_total(), &options)?,
    });
    println!("{}", serde_json::to_string_pretty(&summary)?);
    Ok(())
}

async fn edit(config: &Config) -> Result<()> {
    let data = InvoiceData::new(config.company_address.clone(), Local::now().date_naive());
    let mut state = InvoiceFormState::new(
        data,
        config.company_profile(),
        RenderOptions::from_config(config, true),
    );
    let generator = InvoiceGenerator::from_config(config)?;
    let printer = Printer::new(&config.print_command);
    info!(output_dir = %config.output_dir.display(), "invoice form opened");

    // Setup terminal
    terminal::enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Run the main app loop
    let result = run_app(&mut terminal, &mut state, config, &generator, &printer).await;

    // Restore terminal
    terminal::disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    // Show any error message
    if let Err(err) = &result {
        error!(error = %err, "invoice form stopped");
        println!("Error: {}", err);
    }

    result
}

async fn run_app<B: Backend>(
    terminal: &mut Terminal<B>,
    state: &mut InvoiceFormState,
    config: &Config,
    generator: &InvoiceGenerator,
    printer: &Printer,
) -> Result<()> {
    loop {
        terminal.draw(|f| render_invoice_form(f, state))?;

        let Event::Key(key) = event::read()? else {
            continue;
        };
        if key.kind != KeyEventKind::Press {
            continue;
        }

        match handle_input(state, key) {
            Some(FormAction::Quit) => break,
            Some(FormAction::ExportPdf) => match export(state, generator).await {
                Ok(path) => state.set_notice(format!("Saved {}", path.display()), false),
                Err(e) => state.set_notice(format!("Failed to download PDF: {:#}", e), true),
            },
            Some(FormAction::Print) => {
                let printed: Result<PathBuf> = match export(state, generator).await {
                    Ok(path) => printer.print(&path).await.map(|_| path).map_err(Into::into),
                    Err(e) => Err(e),
                };
                match printed {
                    Ok(path) => state.set_notice(format!("Sent {} to the printer", path.display()), false),
                    Err(e) => state.set_notice(format!("Failed to print: {:#}", e), true),
                }
            }
            Some(FormAction::LoadLogo(path)) => match logo::load_logo(&path, config.max_logo_bytes) {
                Ok(logo) => {
                    state.dispatch(FormCommand::SetLogo(logo));
                    state.set_notice(format!("Logo loaded from {}", path.display()), false);
                }
                Err(e) => state.set_notice(format!("Logo not loaded: {}", e), true),
            },
            None => {}
        }
    }

    Ok(())
}

async fn export(state: &InvoiceFormState, generator: &InvoiceGenerator) -> Result<PathBuf> {
    let markdown = state.document()?;
    let (_, pdf_path) = generator.generate_invoice(state.data(), &markdown).await?;
    Ok(pdf_path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spell_amount_default_subunit() {
        assert_eq!(
            spell_amount(1234.56, "paise").unwrap(),
            "one thousand two hundred thirty four and fifty six paise"
        );
    }

    #[test]
    fn test_spell_amount_custom_subunit() {
        assert_eq!(spell_amount(-3.5, "cents").unwrap(), "minus three and fifty cents");
    }

    #[test]
    fn test_spell_amount_rejects_infinity() {
        assert!(spell_amount(f64::INFINITY, "paise").is_err());
    }
}
