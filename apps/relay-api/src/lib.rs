pub mod cli;
pub mod routes;
pub mod session;
pub mod state;

use std::{net::SocketAddr, path::PathBuf};

use clap::Parser;
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

use crate::state::AppState;

#[derive(Debug, Parser)]
#[command(version = cli::VERSION, rename_all = "kebab", styles = cli::styles())]
pub struct Args {
	#[arg(long, short = 'c', value_name = "FILE")]
	pub config: PathBuf,
}

pub async fn run(args: Args) -> color_eyre::Result<()> {
	let config = relay_config::load(&args.config)?;

	init_tracing(&config);

	let http_addr: SocketAddr = config.service.http_bind.parse()?;
	let state = AppState::new(config).await?;
	let app = routes::router(state);
	let listener = TcpListener::bind(http_addr).await?;

	tracing::info!(%http_addr, "Chat relay listening.");

	axum::serve(listener, app).await?;

	Ok(())
}

fn init_tracing(config: &relay_config::Config) {
	let filter =
		EnvFilter::try_new(&config.service.log_level).unwrap_or_else(|_| EnvFilter::new("info"));

	tracing_subscriber::fmt().with_env_filter(filter).init();
}
