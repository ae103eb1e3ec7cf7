//! synergy-maker CLI.
//!
//! Regenerates TypeScript entity classes (and optionally Vue edit forms) from
//! a JSON metadata export.

use std::path::PathBuf;

use clap::{ArgAction, Parser};
use console::Term;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use synergy_maker::{
    BuildSummary, Generator, GeneratorConfig, GeneratorToggles, JsonMetadataSource, MetadataSource,
    CONFIG_FILE_NAME,
};

mod ui;

/// Environment variable holding a tracing filter; overrides `-v`.
const LOG_ENV: &str = "SYNERGY_MAKER_LOG";

#[derive(Parser)]
#[command(name = "synergy-maker", version)]
#[command(about = "Generate TypeScript entities and Vue edit forms from entity metadata")]
struct Cli {
    /// Entity names (short or fully-qualified). Prompts for names when empty.
    names: Vec<String>,

    /// Generate every entity of the metadata export
    #[arg(long)]
    all: bool,

    /// Generate everything (entity and form)
    #[arg(long)]
    full: bool,

    /// Generate the TypeScript entity (default)
    #[arg(long, overrides_with = "no_entity")]
    entity: bool,

    /// Skip the TypeScript entity
    #[arg(long, overrides_with = "entity")]
    no_entity: bool,

    /// Generate the Vue edit form (default with --full)
    #[arg(long, overrides_with = "no_form")]
    form: bool,

    /// Skip the Vue edit form
    #[arg(long, overrides_with = "form")]
    no_form: bool,

    /// Write over existing edit forms instead of creating `-generated` copies
    #[arg(long)]
    overwrite_crud: bool,

    /// Configuration file
    #[arg(short, long, default_value = CONFIG_FILE_NAME)]
    config: PathBuf,

    /// Metadata export (overrides the configuration)
    #[arg(short, long)]
    metadata: Option<PathBuf>,

    /// Output directory of the entity classes (overrides the configuration)
    #[arg(short, long)]
    out_dir: Option<PathBuf>,

    /// Output directory of the edit forms (overrides the configuration)
    #[arg(long)]
    forms_dir: Option<PathBuf>,

    /// More logging (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

impl Cli {
    fn toggles(&self) -> GeneratorToggles {
        let entity = flag(self.entity, self.no_entity);
        let form = flag(self.form, self.no_form);
        GeneratorToggles {
            entity: entity.unwrap_or(true),
            crud_form: form.unwrap_or(self.full),
        }
    }
}

fn flag(on: bool, off: bool) -> Option<bool> {
    match (on, off) {
        (true, _) => Some(true),
        (_, true) => Some(false),
        _ => None,
    }
}

fn init_logging(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false),
        )
        .init();
}

fn main() -> miette::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let mut config = GeneratorConfig::load_or_default(&cli.config)?;
    if let Some(metadata) = &cli.metadata {
        config.metadata_path = metadata.clone();
    }
    if let Some(out_dir) = &cli.out_dir {
        config.out_dir = out_dir.clone();
    }
    if let Some(forms_dir) = &cli.forms_dir {
        config.forms_dir = forms_dir.clone();
    }
    if cli.overwrite_crud {
        config.overwrite_forms = true;
    }
    tracing::debug!(
        "entities to {}, forms to {}",
        config.out_dir.display(),
        config.forms_dir.display()
    );

    ui::header(env!("CARGO_PKG_VERSION"));

    let spinner = ui::spinner("Loading metadata...");
    let metadata = JsonMetadataSource::load(&config.metadata_path);
    spinner.finish_and_clear();
    let metadata = metadata?;

    let mut generator = Generator::new(&config, &metadata, cli.toggles())?;

    let summary = if cli.all {
        generate_all(&mut generator, &metadata)
    } else if cli.names.is_empty() {
        generate_interactive(&mut generator)?
    } else {
        generate_named(&mut generator, &cli.names)
    };

    ui::summary(summary.built.len(), summary.failed.len());
    if summary.is_success() {
        Ok(())
    } else {
        Err(miette::miette!("{} entities failed", summary.failed.len()))
    }
}

fn generate_all(generator: &mut Generator<'_>, metadata: &JsonMetadataSource) -> BuildSummary {
    let entity_types = metadata.entity_types();
    let pb = ui::progress_bar(entity_types.len() as u64);

    let mut started = 0;
    let summary = generator.build_all(&entity_types, |entity_type| {
        if started > 0 {
            pb.inc(1);
        }
        started += 1;
        pb.set_message(entity_type.to_string());
    });
    pb.finish_and_clear();

    print_summary(&summary);
    summary
}

fn generate_named(generator: &mut Generator<'_>, names: &[String]) -> BuildSummary {
    let mut summary = BuildSummary::default();
    for name in names {
        build_one(generator, name, &mut summary);
    }
    summary
}

/// Prompts for entity names until an empty line.
fn generate_interactive(generator: &mut Generator<'_>) -> miette::Result<BuildSummary> {
    let term = Term::stdout();
    let mut summary = BuildSummary::default();

    ui::info("Enter entity names, an empty line to finish.");
    loop {
        term.write_str("  entity: ")
            .map_err(|e| miette::miette!("Failed to write prompt: {}", e))?;
        let name = term
            .read_line()
            .map_err(|e| miette::miette!("Failed to read entity name: {}", e))?;
        if name.trim().is_empty() {
            break;
        }
        build_one(generator, &name, &mut summary);
    }

    Ok(summary)
}

fn build_one(generator: &mut Generator<'_>, name: &str, summary: &mut BuildSummary) {
    let result = generator
        .resolve(name)
        .and_then(|entity_type| generator.build(&entity_type));
    match result {
        Ok(report) => {
            ui::build_report(&report);
            summary.built.push(report);
        }
        Err(e) => {
            ui::error(&format!("{}: {}", name.trim(), e));
            summary.failed.push((name.trim().to_string(), e));
        }
    }
}

fn print_summary(summary: &BuildSummary) {
    for report in &summary.built {
        ui::build_report(report);
    }
    for (entity_type, e) in &summary.failed {
        ui::error(&format!("{}: {}", entity_type, e));
    }
}
