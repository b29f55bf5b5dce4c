use anyhow::Context;
use camino::Utf8PathBuf;
use clap::{Parser, ValueHint};
use ls8_emulator::parse;
use tracing::{debug, info};

#[derive(Parser, Debug)]
pub struct PrintOpt {
    /// Input file
    #[clap(value_parser, value_hint = ValueHint::FilePath)]
    input: Utf8PathBuf,
}

impl PrintOpt {
    pub fn exec(&self) -> anyhow::Result<()> {
        info!(path = %self.input, "Reading program");
        let source = std::fs::read_to_string(&self.input)
            .with_context(|| format!("could not read program {}", self.input))?;

        debug!("Parsing program");
        let program = parse(&source);
        print!("{program}");

        Ok(())
    }
}
