use std::io::{self, BufRead, Write};
use std::process::ExitCode;

use clap::Parser;
use dice_notation::{Roller, RollerConfig, DEFAULT_DICE_LIMIT};

/// Roll tabletop dice notation such as 3d6+2, 4b2d6, 2d6! or 4dF.
#[derive(Debug, Parser)]
#[command(name = "dice", version, about)]
struct Cli {
    /// Expressions to roll. Starts an interactive shell when none are given.
    expressions: Vec<String>,

    /// Seed the random stream to get reproducible rolls.
    #[arg(long, allow_negative_numbers = true)]
    seed: Option<i64>,

    /// Most dice a single operator may roll.
    #[arg(long, default_value_t = DEFAULT_DICE_LIMIT)]
    dice_limit: u32,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let mut config = RollerConfig::default().with_dice_limit(cli.dice_limit);
    if let Some(seed) = cli.seed {
        config = config.with_seed(seed);
    }
    let mut roller = Roller::with_config(config);

    if cli.expressions.is_empty() {
        return match shell(&mut roller, io::stdin().lock(), io::stdout().lock()) {
            Ok(()) => ExitCode::SUCCESS,
            Err(err) => {
                eprintln!("{err}");
                ExitCode::FAILURE
            }
        };
    }

    for expression in &cli.expressions {
        match roller.roll(expression) {
            Ok(rolled) => println!("{rolled}"),
            Err(err) => {
                eprintln!("{err}");
                return ExitCode::FAILURE;
            }
        }
    }
    ExitCode::SUCCESS
}

fn shell(roller: &mut Roller, input: impl BufRead, mut output: impl Write) -> io::Result<()> {
    writeln!(output, "Dice Roller Shell")?;
    writeln!(output, "---------------------")?;

    let mut lines = input.lines();
    loop {
        write!(output, "-> ")?;
        output.flush()?;

        let Some(line) = lines.next().transpose()? else {
            return Ok(());
        };
        if is_exit(&line) {
            return Ok(());
        }

        match roller.roll(&line) {
            Ok(rolled) => writeln!(output, "<- {rolled}")?,
            Err(err) => writeln!(output, "<- ERROR {err}")?,
        }
    }
}

fn is_exit(line: &str) -> bool {
    let line = line.trim_start();
    ["exit", "quit", "q"].iter().any(|word| line.starts_with(word))
}
