use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use tracing::{error, info, Level};

use modbus_crc16::source::{
    checksum_input, validate_chunk_size, wire_bytes, Input, DEFAULT_CHUNK_SIZE, MAX_CHUNK_SIZE,
};
use modbus_crc16::table;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Args, Debug)]
struct InputArgs {
    /// Treat inputs as literal strings
    #[arg(long, conflicts_with = "hex")]
    text: bool,

    /// Treat inputs as hex strings, e.g. "01 03 00 00 00 0A"
    #[arg(long)]
    hex: bool,

    /// Read size for files and standard input
    #[arg(long, default_value_t = DEFAULT_CHUNK_SIZE, value_parser = parse_chunk_size)]
    chunk_size: usize,
}

impl InputArgs {
    fn resolve(&self, raw: &str) -> Input {
        if self.text {
            Input::Text(raw.to_string())
        } else if self.hex {
            Input::Hex(raw.to_string())
        } else if raw == "-" {
            Input::Stdin
        } else {
            Input::File(PathBuf::from(raw))
        }
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Print the checksum of each input (files by default, stdin if none)
    Sum {
        inputs: Vec<String>,

        #[command(flatten)]
        input: InputArgs,

        #[arg(long, value_enum, default_value_t = Format::Hex)]
        format: Format,
    },
    /// Compare the checksum of one input against an expected value
    Check {
        input: String,

        /// Expected checksum, hex with 0x prefix or decimal
        #[arg(long, value_parser = parse_crc)]
        expected: u16,

        #[command(flatten)]
        args: InputArgs,
    },
    /// Print the lookup table
    Table {
        #[arg(long, default_value_t = 8)]
        columns: usize,
    },
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
enum Format {
    /// 0x4B37
    Hex,
    /// 19255
    Dec,
    /// Low byte first, as carried in a frame: 37 4B
    Wire,
}

fn parse_crc(raw: &str) -> Result<u16> {
    let value = if let Some(digits) = raw.strip_prefix("0x").or_else(|| raw.strip_prefix("0X")) {
        u16::from_str_radix(digits, 16)
    } else {
        raw.parse::<u16>()
    };
    value.with_context(|| format!("Invalid checksum {:?}", raw))
}

fn parse_chunk_size(raw: &str) -> Result<usize> {
    let size = raw
        .parse::<usize>()
        .with_context(|| format!("Invalid chunk size {:?}", raw))?;
    validate_chunk_size(size).with_context(|| format!("Chunk size must be 1..={}", MAX_CHUNK_SIZE))
}

fn format_crc(crc: u16, format: Format) -> String {
    match format {
        Format::Hex => format!("0x{:04X}", crc),
        Format::Dec => crc.to_string(),
        Format::Wire => {
            let [lo, hi] = wire_bytes(crc);
            format!("{:02X} {:02X}", lo, hi)
        }
    }
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);
    run(args).await
}

async fn run(args: Args) -> Result<()> {
    match args.command {
        Commands::Sum { inputs, input, format } => {
            let inputs: Vec<Input> = if inputs.is_empty() {
                if input.text || input.hex {
                    bail!("--text and --hex need at least one input");
                }
                vec![Input::Stdin]
            } else {
                inputs.iter().map(|raw| input.resolve(raw)).collect()
            };

            let mut failed = 0;
            for item in &inputs {
                match checksum_input(item, input.chunk_size).await {
                    Ok(crc) => println!("{}  {}", format_crc(crc, format), item),
                    Err(e) => {
                        error!("{:#}", e);
                        failed += 1;
                    }
                }
            }
            if failed > 0 {
                bail!("{} of {} inputs failed", failed, inputs.len());
            }
        }
        Commands::Check { input, expected, args } => {
            let item = args.resolve(&input);
            let crc = checksum_input(&item, args.chunk_size).await?;
            if crc != expected {
                bail!(
                    "Checksum mismatch for {}: expected {}, got {}",
                    item,
                    format_crc(expected, Format::Hex),
                    format_crc(crc, Format::Hex)
                );
            }
            info!("Checksum verified for {}", item);
            println!("OK  {}", item);
        }
        Commands::Table { columns } => {
            let columns = columns.max(1);
            for row in table().chunks(columns) {
                let line: Vec<String> = row.iter().map(|v| format!("0x{:04X}", v)).collect();
                println!("{}", line.join(", "));
            }
        }
    }

    Ok(())
}
