use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use phonoclass::alphabet::Alphabet;
use phonoclass::notation;
use phonoclass::projection::Projection;
use phonoclass::reader::read_feature_matrix;
use phonoclass::settings::Settings;
use phonoclass::Result;

#[derive(Parser)]
#[command(name = "phonoclass")]
#[command(author, version, about = "List the natural classes of a feature matrix")]
struct Cli {
    /// Tab-separated feature matrix, one segment per row
    features: PathBuf,

    /// Configuration file (TOML)
    #[arg(short, long, default_value = "phonoclass.toml")]
    config: PathBuf,

    /// Add the complement of every natural class
    #[arg(long)]
    complement_classes: bool,

    /// Keep concepts that observed segments cannot distinguish
    #[arg(long)]
    no_prune: bool,

    /// Register the full segment set before building the lattice
    #[arg(long)]
    topped: bool,

    /// Projection descriptor: name<TAB>segments<TAB>features[<TAB>min]<TAB>max
    #[arg(short, long = "projection")]
    projections: Vec<String>,
}

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::from_default_env().add_directive(tracing::Level::WARN.into()))
        .init();

    let cli = Cli::parse();
    let mut settings = Settings::load(Some(cli.config.as_path()))?;
    settings.complement_classes |= cli.complement_classes;
    settings.prune &= !cli.no_prune;
    settings.topped |= cli.topped;
    settings.projections.extend(cli.projections);

    let mut alphabet = read_feature_matrix(&cli.features)?;
    set_word_boundaries(&mut alphabet, &settings)?;
    let alphabet = Arc::new(alphabet);

    let mut projection = Projection::new(alphabet.clone()).with_complement_classes(settings.complement_classes);
    print_classes(&mut projection, &settings)?;

    for descriptor in &settings.projections {
        let mut projection =
            Projection::from_descriptor(alphabet.clone(), descriptor)?.with_complement_classes(settings.complement_classes);
        println!();
        println!("# {}", projection.name());
        print_classes(&mut projection, &settings)?;
    }
    Ok(())
}

// word boundaries default to the first two symbols of the feature matrix
fn set_word_boundaries(alphabet: &mut Alphabet, settings: &Settings) -> Result<()> {
    let word_begin = settings.word_begin.clone().or_else(|| alphabet.syms().symbol(0).map(str::to_owned));
    let word_end = settings.word_end.clone().or_else(|| alphabet.syms().symbol(1).map(str::to_owned));
    if let Some(symbol) = word_begin {
        alphabet.syms_mut().set_word_begin(&symbol)?;
    }
    if let Some(symbol) = word_end {
        alphabet.syms_mut().set_word_end(&symbol)?;
    }
    Ok(())
}

fn print_classes(projection: &mut Projection, settings: &Settings) -> Result<()> {
    projection.build_natural_classes(settings.lattice_options())?;
    let Some(classes) = projection.natural_classes() else {
        return Ok(());
    };
    info!(projection = projection.name(), classes = classes.len(), "printing natural classes");
    println!("id\tfeatures\tsegments");
    for class in classes.iter() {
        println!(
            "{}\t{}\t{}",
            class.id().unwrap_or_default(),
            class,
            notation::symbol_disjunction(projection.alphabet(), class.segs())
        );
    }
    Ok(())
}
