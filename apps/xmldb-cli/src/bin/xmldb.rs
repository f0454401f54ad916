use std::env;
use std::io;

use tracing_subscriber::EnvFilter;
use xmldb_core::{FieldSchema, Settings};
use xmldb_cli::Invocation;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(io::stderr)
        .init();

    let settings = Settings::load().map_err(|e| {
        eprintln!("Error loading config: {}", e);
        e
    })?;

    let args: Vec<String> = env::args().skip(1).collect();
    let invocation = match Invocation::from_args(&args) {
        Ok(invocation) => invocation,
        Err(e) => {
            eprintln!("{}", e);
            std::process::exit(2);
        }
    };

    let schema = FieldSchema::quotes()?;
    xmldb_cli::run(&invocation, &schema, &settings, io::stdin().lock(), io::stdout().lock())?;
    println!("Finished");
    Ok(())
}
