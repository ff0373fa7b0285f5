use std::path::PathBuf;

use chrono::{Datelike, Local};
use clap::{builder::ArgAction, Parser, Subcommand};
use console::{style, Emoji};
use errors::JatsctlError;
use jatsgen::{
  config::Config,
  conversion::{ConversionState, Converter, RawInputs},
  date::parse_date,
  history::{manual_year_choices, History, ManualDate, MONTH_NAMES},
  splice::splice,
};
use tracing::{debug, trace};
use tracing_subscriber::EnvFilter;

pub mod errors;

static LOOKING_GLASS: Emoji<'_, '_> = Emoji("🔍 ", "");
static CALENDAR: Emoji<'_, '_> = Emoji("📅 ", "");
static PAPER: Emoji<'_, '_> = Emoji("📄 ", "");
static SAVE: Emoji<'_, '_> = Emoji("💾 ", "");
static WARNING: Emoji<'_, '_> = Emoji("⚠️  ", "");
static SUCCESS: Emoji<'_, '_> = Emoji("✨ ", "");

#[derive(Parser)]
#[command(author, version, about = "Builds normalized JATS front matter for journal articles")]
struct Cli {
  /// Verbose mode (-v, -vv, -vvv)
  #[arg(
        short,
        long,
        action = ArgAction::Count,
        global = true,
        help = "Increase logging verbosity"
    )]
  verbose: u8,

  /// Configuration file (defaults to the user config directory)
  #[arg(long, global = true)]
  config: Option<PathBuf>,

  #[command(subcommand)]
  command: Commands,
}

#[derive(Subcommand)]
enum Commands {
  /// Convert an article's PDF, source record and webpage into front matter
  Convert {
    /// Article PDF
    #[arg(long)]
    pdf:      PathBuf,
    /// Bibliographic source record
    #[arg(long)]
    xml:      PathBuf,
    /// URL of the article webpage
    #[arg(long)]
    url:      String,
    /// URL of the article PDF
    #[arg(long)]
    pdf_link: Option<String>,
    /// Directory the output files are written to
    #[arg(long, short, default_value = ".")]
    output:   PathBuf,
    /// Template whose <front> region receives the result
    #[arg(long, short)]
    template: Option<PathBuf>,
    /// Received date, used when the PDF gives none
    #[arg(long, requires = "accepted")]
    received: Option<String>,
    /// Accepted date, used when the PDF gives none
    #[arg(long, requires = "received")]
    accepted: Option<String>,
    /// Write a JSON conversion report to this path
    #[arg(long)]
    report:   Option<PathBuf>,
  },
  /// Splice an existing front-matter fragment into a template
  Combine {
    /// Previously converted front matter
    #[arg(long)]
    fragment: PathBuf,
    /// Template containing a <front> region
    #[arg(long, short)]
    template: PathBuf,
    /// Output file (stdout if omitted)
    #[arg(long, short)]
    output:   Option<PathBuf>,
  },
  /// Normalize a free-text date
  Date {
    /// Date text, e.g. "2 February 2023"
    text: String,
  },
}

/// Setup logging with the specified verbosity level
fn setup_logging(verbosity: u8) {
  let filter = match verbosity {
    0 => "warn",
    1 => "info",
    2 => "debug",
    _ => "trace",
  };

  let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));

  tracing_subscriber::fmt()
    .with_env_filter(filter)
    .with_writer(std::io::stderr)
    .with_file(true)
    .with_line_number(true)
    .with_thread_ids(true)
    .with_target(true)
    .init();
}

/// Asks the operator to pick one of `items`. Escape cancels the conversion.
fn pick<T: ToString>(prompt: &str, items: &[T], default: usize) -> Result<usize, JatsctlError> {
  dialoguer::Select::new()
    .with_prompt(prompt)
    .items(items)
    .default(default)
    .interact_opt()?
    .ok_or(JatsctlError::ManualEntryCancelled)
}

/// Asks the operator for one date as day, month and year picks.
fn prompt_date(label: &str, years: &[i32]) -> Result<ManualDate, JatsctlError> {
  println!("{} {}", style(CALENDAR).cyan(), style(label).bold());
  let days: Vec<u32> = (1..=31).collect();
  let day = pick("Day", &days, 0)?;
  let month = pick("Month", &MONTH_NAMES, 0)?;
  let year = pick("Year", years, years.len().saturating_sub(1))?;
  Ok(ManualDate { day: days[day], month: month as u32 + 1, year: years[year] })
}

#[tokio::main]
async fn main() -> Result<(), JatsctlError> {
  let cli = Cli::parse();
  setup_logging(cli.verbose);

  match cli.command {
    Commands::Convert {
      pdf,
      xml,
      url,
      pdf_link,
      output,
      template,
      received,
      accepted,
      report,
    } => {
      let config = Config::load(cli.config.as_deref())?;
      trace!("Using config: {:?}", config);
      let years = manual_year_choices(config.earliest_manual_year, Local::now().year());

      println!(
        "{} Reading {} and {}",
        style(LOOKING_GLASS).cyan(),
        style(pdf.display()).yellow(),
        style(xml.display()).yellow()
      );
      let inputs = RawInputs {
        pdf: std::fs::read(&pdf)?,
        xml: std::fs::read_to_string(&xml)?,
        article_url: url,
        pdf_link,
      };
      let template = template.map(std::fs::read_to_string).transpose()?;

      let document = match Converter::with_config(config).convert(inputs).await? {
        ConversionState::Complete(document) => {
          for warning in &document.report().warnings {
            println!("{} {}", style(WARNING).yellow(), warning);
          }
          println!("{} History dates found in the PDF", style(SUCCESS).green());
          document
        },
        ConversionState::AwaitingHistory(pending) => {
          for warning in pending.warnings() {
            println!("{} {}", style(WARNING).yellow(), warning);
          }
          let history = match (received, accepted) {
            (Some(received), Some(accepted)) => {
              debug!("Using history dates from the command line");
              History::from_text(&received, &accepted)
            },
            _ if console::user_attended() => {
              println!("{} Please select the history dates", style(CALENDAR).cyan());
              let received = prompt_date("Received Date", &years)?;
              let accepted = prompt_date("Accepted Date", &years)?;
              History::from_manual(received, accepted)
            },
            _ => return Err(JatsctlError::MissingManualDates(pending.reason().to_string())),
          };
          pending.resume(history)
        },
      };

      let combined = template.map(|template| document.splice_into(&template)).transpose()?;

      std::fs::create_dir_all(&output)?;
      let path = output.join(document.filename());
      std::fs::write(&path, document.xml())?;
      println!(
        "{} Saved front matter to {}",
        style(SAVE).green(),
        style(path.display()).yellow()
      );

      if let Some(combined) = combined {
        let path = output.join(document.combined_filename());
        std::fs::write(&path, combined)?;
        println!(
          "{} Saved combined document to {}",
          style(SAVE).green(),
          style(path.display()).yellow()
        );
      }

      if let Some(report) = report {
        std::fs::write(&report, document.report().to_json()?)?;
        println!(
          "{} Saved report to {}",
          style(PAPER).green(),
          style(report.display()).yellow()
        );
      }
      Ok(())
    },

    Commands::Combine { fragment, template, output } => {
      let fragment = std::fs::read_to_string(&fragment)?;
      let template = std::fs::read_to_string(&template)?;
      let combined = splice(&fragment, &template)?;

      match output {
        Some(path) => {
          std::fs::write(&path, combined)?;
          println!(
            "{} Saved combined document to {}",
            style(SAVE).green(),
            style(path.display()).yellow()
          );
        },
        None => print!("{combined}"),
      }
      Ok(())
    },

    Commands::Date { text } => {
      let date = parse_date(&text);
      if date.is_unknown() {
        println!("{} Not a recognized date: {}", style(WARNING).yellow(), style(&text).yellow());
      }
      println!("   {} {}", style("Year:").green().bold(), date.year());
      println!("   {} {}", style("Month:").green().bold(), date.month());
      println!("   {} {}", style("Day:").green().bold(), date.day());
      Ok(())
    },
  }
}
