use clap::Parser;

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
	color_eyre::install()?;

	let args = finch_api::Args::parse();

	finch_api::run(args).await
}
