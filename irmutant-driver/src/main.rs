use clap::Parser;
use tracing_subscriber::EnvFilter;

use irmutant_driver::cli::Cli;
use irmutant_driver::CancellationToken;

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let default_filter = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)))
        .init();

    let json = cli.json;
    let config = cli.into_config()?;

    let context = irmutant_ir::Context::create();
    let loader = irmutant_ir::FileModuleLoader;
    let cancel = CancellationToken::new();

    let results = irmutant_driver::run(&context, &config, &loader, &cancel)?;

    if json {
        println!("{}", irmutant_driver::report::to_json(&results)?);
    } else {
        print!("{}", irmutant_driver::report::render_text(&results));
    }

    Ok(())
}
