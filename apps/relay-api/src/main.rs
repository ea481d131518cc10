use clap::Parser;

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
	color_eyre::install()?;

	let args = relay_api::Args::parse();

	relay_api::run(args).await
}
