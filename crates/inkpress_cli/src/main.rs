//! CLI smoke entry point.
//!
//! # Responsibility
//! - Load store configuration, start logging and open the database.
//! - Print deterministic `key=value` lines for quick local sanity checks.
//!
//! Usage: `inkpress_cli [CONFIG_DIR]` (defaults to the working directory).

use inkpress_core::db::migrations::current_version;
use inkpress_core::{
    core_version, init_from_config, open_db_with_config, ping, OpContext, Queries, StoreConfig,
};
use log::{error, info};
use std::error::Error;
use std::process::ExitCode;

fn main() -> ExitCode {
    let config_dir = std::env::args().nth(1).unwrap_or_else(|| ".".to_string());
    match run(&config_dir) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("event=cli_run module=cli status=error error={err}");
            eprintln!("inkpress_cli error={err}");
            ExitCode::FAILURE
        }
    }
}

fn run(config_dir: &str) -> Result<(), Box<dyn Error>> {
    let config = StoreConfig::load(config_dir)?;
    let file_logging = init_from_config(&config)?;

    println!("inkpress_core ping={}", ping());
    println!("inkpress_core version={}", core_version());
    println!("db_source={}", config.db_source);
    println!("file_logging={file_logging}");

    let conn = open_db_with_config(&config)?;
    println!("schema_version={}", current_version(&conn)?);

    let ctx = OpContext::new();
    let q = Queries::new(&conn, &ctx);
    println!("users={}", q.count_users()?);
    println!("posts={}", q.count_posts()?);
    println!("media={}", q.count_media()?);
    println!("taxonomies={}", q.count_taxonomies()?);

    info!("event=cli_run module=cli status=ok");
    Ok(())
}
