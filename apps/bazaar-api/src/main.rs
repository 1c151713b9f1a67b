use clap::Parser;

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
	color_eyre::install()?;

	let args = bazaar_api::Args::parse();

	bazaar_api::run(args).await
}
