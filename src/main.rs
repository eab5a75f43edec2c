#![recursion_limit = "256"]

use anyhow::Result;
use clap::Parser;
use seq2seq_dialogue::cli::DecoderCli;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("seq2seq_dialogue=info".parse()?),
        )
        .init();

    let cli = DecoderCli::parse();
    cli.run()
}
