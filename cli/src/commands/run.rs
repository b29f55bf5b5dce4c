use anyhow::Context;
use camino::Utf8PathBuf;
use clap::{ArgAction, Parser, ValueHint};
use ls8_emulator::parse;
use ls8_emulator::runtime::Machine;
use tracing::{debug, info};

#[derive(Parser, Debug)]
pub struct RunOpt {
    /// Input file
    #[clap(value_parser, value_hint = ValueHint::FilePath)]
    input: Utf8PathBuf,

    /// Treat invalid instructions as fatal instead of skipping over them
    #[clap(short, long, action = ArgAction::SetTrue)]
    strict: bool,

    /// Print a trace line before every cycle
    #[clap(short, long, action = ArgAction::SetTrue)]
    trace: bool,
}

impl RunOpt {
    pub fn exec(self) -> anyhow::Result<()> {
        info!(path = %self.input, "Reading program");
        let source = std::fs::read_to_string(&self.input)
            .with_context(|| format!("could not read program {}", self.input))?;

        debug!("Parsing program");
        let program = parse(&source);

        debug!(bytes = program.len(), "Loading program");
        let mut machine = Machine::new();
        machine.halt_on_invalid = self.strict;
        machine.load(&program)?;

        info!("Running program");
        if self.trace {
            while !machine.halted() {
                println!("{}", machine.trace_line());
                machine.step()?;
            }
        } else {
            machine.run()?;
        }

        info!(cycles = machine.cycles(), registers = %machine.registers, "End of program");

        Ok(())
    }
}
