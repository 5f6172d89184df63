use clap::Parser;
use quizcard_generator::Cli;

fn main() -> anyhow::Result<()> {
    quizcard_generator::run(Cli::parse())
}
