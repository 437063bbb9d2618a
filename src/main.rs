//! Varaus admin - command line front end
//!
//! Drives the reservation admin core from a terminal: inspect and edit the
//! persisted reservation filters, list units, and run a reservation save.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use varaus_admin::{
    config::AppConfig,
    models::{FieldFeedback, FilterKind, Reservation, ReservationDraft, ResourceCatalog, Unit},
    repository::{catalog, Repository},
    services::reservations::{derive_end_from_begin, parse_display, AttemptState},
    AdminContext,
};

#[derive(Parser, Debug)]
#[command(name = "varaus-admin", version, about = "Berth reservation admin")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Inspect or change the persisted reservation filters
    Filters {
        #[command(subcommand)]
        action: FilterAction,
    },
    /// List units with their boat resource counts
    Units,
    /// Print the default end date for a begin date (D.M.YYYY HH:mm)
    EndDate { begin: String },
    /// Validate and save a reservation from form fields
    Save {
        /// Existing reservation id; omitted for a new reservation
        #[arg(long)]
        id: Option<i64>,
        /// Form field as name=value, repeatable
        #[arg(long = "field", value_parser = parse_key_val)]
        fields: Vec<(String, String)>,
        /// Mandatory field name, repeatable
        #[arg(long = "required")]
        required: Vec<String>,
    },
}

#[derive(Subcommand, Debug)]
enum FilterAction {
    Show,
    Set {
        name: String,
        value: String,
        #[arg(long, value_enum, default_value_t = KindArg::Text)]
        kind: KindArg,
    },
    Toggle,
    Clear,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum KindArg {
    Text,
    Integer,
    Float,
}

impl From<KindArg> for FilterKind {
    fn from(kind: KindArg) -> Self {
        match kind {
            KindArg::Text => FilterKind::Text,
            KindArg::Integer => FilterKind::Integer,
            KindArg::Float => FilterKind::Float,
        }
    }
}

fn parse_key_val(s: &str) -> Result<(String, String), String> {
    let (key, value) = s
        .split_once('=')
        .ok_or_else(|| format!("expected name=value, got '{}'", s))?;
    Ok((key.to_string(), value.to_string()))
}

async fn load_catalog(config: &AppConfig) -> Result<(ResourceCatalog, Vec<Unit>)> {
    let resources = match &config.catalog.resources_path {
        Some(path) => catalog::load_resources(path).await?,
        None => ResourceCatalog::default(),
    };
    let units = match &config.catalog.units_path {
        Some(path) => catalog::load_units(path).await?,
        None => Vec::new(),
    };
    Ok((resources, units))
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let config = AppConfig::load().context("Failed to load configuration")?;

    // Initialize tracing
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| format!("varaus_admin={}", config.logging.level).into());
    let registry = tracing_subscriber::registry().with(filter);
    if config.logging.format == "json" {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }

    let (resources, units) = load_catalog(&config).await?;
    let repository = Repository::from_config(&config)?;
    let context = AdminContext::new(config, repository, resources, units)?;

    context.bus().subscribe(|event| {
        tracing::info!(event = event.name(), "Notification");
    });

    match cli.command {
        Command::Filters { action } => {
            let filters = &context.services.filters;
            match action {
                FilterAction::Show => {}
                FilterAction::Set { name, value, kind } => {
                    filters.set_filter(&name, &value, kind.into())?;
                }
                FilterAction::Toggle => {
                    let shown = filters.toggle_visibility()?;
                    println!("filters {}", if shown { "shown" } else { "hidden" });
                }
                FilterAction::Clear => filters.clear()?,
            }
            let snapshot = filters.snapshot();
            for (name, value) in snapshot.iter() {
                println!("{}={}", name, value);
            }
        }
        Command::Units => {
            for row in context.services.units.rows(&context.units, &context.catalog) {
                println!("{}\t{}\t{}", row.unit_id, row.name, row.boat_resource_count);
            }
        }
        Command::EndDate { begin } => {
            let begin = parse_display(&begin)
                .with_context(|| format!("'{}' is not a D.M.YYYY HH:mm date", begin))?;
            match derive_end_from_begin(begin) {
                Some(end) => println!("{}", end),
                None => anyhow::bail!("End date out of range"),
            }
        }
        Command::Save { id, fields, required } => {
            let draft = ReservationDraft::from_pairs(fields).with_required(required);
            let mut reservation = Reservation {
                id,
                ..Default::default()
            };
            let mut feedback = FieldFeedback::new();

            let state = context
                .save_reservation(&mut reservation, &draft, &mut feedback)
                .await;
            match state {
                AttemptState::Committed(id) => println!("saved reservation {}", id),
                other => {
                    for field in feedback.invalid_fields() {
                        println!("{}: {}", field, feedback.message(field).unwrap_or("invalid"));
                    }
                    anyhow::bail!("Reservation not saved: {:?}", other);
                }
            }
        }
    }

    Ok(())
}
