//! `pfor32` command line tool: PFor-encode a file of integers into a single encoded block, and back.
//!
//! Integer files are text, decimal `u32` values separated by whitespace.
//! Encoded files use the layout of [`pfor32::container`].
use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Args, Parser, Subcommand, ValueEnum};
use pfor32::pfor::{self, EncodedBlock, ExceptionBudget};
use pfor32::CodecError;
use tracing::info;

#[derive(Debug, thiserror::Error)]
enum Error {
    #[error(transparent)]
    Codec(#[from] CodecError),
    #[error("{path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("line {line}: not an unsigned 32-bit integer: {token:?}")]
    Parse { line: usize, token: String },
}

impl Error {
    fn exit_code(&self) -> u8 {
        match self {
            Error::Codec(e) => e.exit_code(),
            Error::Io { .. } => 10,
            Error::Parse { .. } => 11,
        }
    }

    fn io(path: &Path) -> impl FnOnce(std::io::Error) -> Error + '_ {
        move |source| Error::Io { path: path.to_path_buf(), source }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum LogOutputFormat {
    Json,
    Pretty,
}

#[derive(Debug, Parser)]
#[clap(name = "pfor32", version, about = "PFor compression of u32 integer blocks")]
struct CliArgs {
    #[clap(subcommand)]
    command: CliCommand,

    /// Format of the log output (on stderr)
    #[clap(short = 'o', long = "output-format", default_value = "pretty", global = true)]
    output_format: LogOutputFormat,
}

#[derive(Debug, Subcommand)]
enum CliCommand {
    /// Encode a text file of integers into an encoded block
    Encode(EncodeArgs),
    /// Decode an encoded block back into a text file of integers
    Decode(DecodeArgs),
}

#[derive(Debug, Args)]
struct EncodeArgs {
    /// Whitespace separated integers
    input: PathBuf,
    /// Where to write the encoded block
    output: PathBuf,
    /// Maximum number of exceptions. Defaults to 1/8 of the input
    #[clap(long)]
    budget: Option<usize>,
}

#[derive(Debug, Args)]
struct DecodeArgs {
    /// Encoded block
    input: PathBuf,
    /// Where to write the integers, one per line
    output: PathBuf,
    /// Number of integers stored in the block
    count: usize,
}

/// parse whitespace separated u32s; `path` only labels I/O errors
fn read_ints(reader: impl BufRead, path: &Path) -> Result<Vec<u32>, Error> {
    let mut ints = Vec::new();
    for (i, line) in reader.lines().enumerate() {
        let line = line.map_err(Error::io(path))?;
        for token in line.split_whitespace() {
            let x = token
                .parse::<u32>()
                .map_err(|_| Error::Parse { line: i + 1, token: token.to_string() })?;
            ints.push(x);
        }
    }
    Ok(ints)
}

fn write_ints(mut writer: impl Write, ints: &[u32]) -> std::io::Result<()> {
    for x in ints {
        writeln!(writer, "{x}")?;
    }
    writer.flush()
}

fn run_encode(args: &EncodeArgs) -> Result<(), Error> {
    let file = File::open(&args.input).map_err(Error::io(&args.input))?;
    let block = read_ints(BufReader::new(file), &args.input)?;

    let budget = args.budget.map(ExceptionBudget::Count).unwrap_or_default();
    let encoded = pfor::encode(&block, budget)?;
    let bytes = encoded.to_bytes();
    std::fs::write(&args.output, &bytes).map_err(Error::io(&args.output))?;

    info!(
        n_elements = block.len(),
        base_width = encoded.base_width,
        n_exceptions = encoded.exceptions.len(),
        n_bytes = bytes.len(),
        "encoded {}",
        args.input.display()
    );
    Ok(())
}

fn run_decode(args: &DecodeArgs) -> Result<(), Error> {
    let bytes = std::fs::read(&args.input).map_err(Error::io(&args.input))?;
    let (encoded, bytes_consumed) = EncodedBlock::from_bytes(&bytes, args.count)?;
    if bytes_consumed < bytes.len() {
        tracing::warn!(trailing_bytes = bytes.len() - bytes_consumed, "ignoring data after the encoded block");
    }
    let block = pfor::decode(&encoded, args.count)?;

    let file = File::create(&args.output).map_err(Error::io(&args.output))?;
    write_ints(BufWriter::new(file), &block).map_err(Error::io(&args.output))?;

    info!(n_elements = block.len(), base_width = encoded.base_width, "decoded {}", args.input.display());
    Ok(())
}

fn main() -> ExitCode {
    let args = CliArgs::parse();
    pfor32::logging::setup_logging(matches!(args.output_format, LogOutputFormat::Pretty));

    let result = match &args.command {
        CliCommand::Encode(a) => run_encode(a),
        CliCommand::Decode(a) => run_decode(a),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::from(e.exit_code())
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_read_ints() {
        let input = "0 1 2\n  3\t4\n\n4294967295\n";
        assert_eq!(read_ints(input.as_bytes(), Path::new("ints.txt")).unwrap(), vec![0, 1, 2, 3, 4, u32::MAX]);
    }

    #[test]
    fn test_read_ints_rejects_garbage() {
        for (input, bad, line) in [("1 2\n3 x", "x", 2), ("-1", "-1", 1), ("4294967296", "4294967296", 1)] {
            match read_ints(input.as_bytes(), Path::new("ints.txt")) {
                Err(Error::Parse { line: l, token }) => {
                    assert_eq!(token, bad);
                    assert_eq!(l, line);
                }
                other => panic!("expected parse error, got {other:?}"),
            }
        }
    }

    #[test]
    fn test_read_ints_io_error_names_file() {
        // invalid utf-8 makes `lines()` fail
        let input: &[u8] = &[b'1', b' ', 0xff, 0xfe, b'\n'];
        match read_ints(input, Path::new("data/ints.txt")) {
            Err(e @ Error::Io { .. }) => {
                assert_eq!(e.exit_code(), 10);
                assert!(e.to_string().starts_with("data/ints.txt: "));
            }
            other => panic!("expected io error, got {other:?}"),
        }
    }

    #[test]
    fn test_write_ints() {
        let mut out = Vec::new();
        write_ints(&mut out, &[3, 0, 1_000_000]).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "3\n0\n1000000\n");
    }

    #[test]
    fn test_exit_codes() {
        let e = Error::from(CodecError::PositionOutOfRange { position: 3, count: 2 });
        assert_eq!(e.exit_code(), 6);
        let e = Error::Parse { line: 1, token: "x".into() };
        assert_eq!(e.exit_code(), 11);
    }

    #[test]
    fn test_cli_parsing() {
        let args = CliArgs::parse_from(["pfor32", "encode", "in.txt", "out.bin", "--budget", "3"]);
        match args.command {
            CliCommand::Encode(a) => {
                assert_eq!(a.budget, Some(3));
                assert_eq!(a.input, PathBuf::from("in.txt"));
            }
            _ => panic!("expected encode"),
        }

        let args = CliArgs::parse_from(["pfor32", "decode", "in.bin", "out.txt", "128", "-o", "json"]);
        assert!(matches!(args.output_format, LogOutputFormat::Json));
        match args.command {
            CliCommand::Decode(a) => assert_eq!(a.count, 128),
            _ => panic!("expected decode"),
        }
    }

    #[test]
    fn test_encode_decode_files() {
        let dir = std::env::temp_dir().join(format!("pfor32-cli-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let ints = dir.join("ints.txt");
        let encoded = dir.join("block.bin");
        let decoded = dir.join("decoded.txt");

        let mut block = vec![0_u32; 128];
        block[50] = 1_000_000;
        let text = block.iter().map(|x| x.to_string()).collect::<Vec<_>>().join(" ");
        std::fs::write(&ints, text).unwrap();

        run_encode(&EncodeArgs { input: ints.clone(), output: encoded.clone(), budget: Some(1) }).unwrap();
        // header + one exception, no packed bytes
        assert_eq!(std::fs::read(&encoded).unwrap().len(), 5 + 8);

        run_decode(&DecodeArgs { input: encoded.clone(), output: decoded.clone(), count: 128 }).unwrap();
        let roundtrip = read_ints(std::fs::read_to_string(&decoded).unwrap().as_bytes(), &decoded).unwrap();
        assert_eq!(roundtrip, block);

        // too many elements requested for the stored block
        let err = run_decode(&DecodeArgs { input: encoded, output: decoded, count: 10 }).unwrap_err();
        assert_eq!(err.exit_code(), CodecError::PositionOutOfRange { position: 50, count: 10 }.exit_code());

        std::fs::remove_dir_all(&dir).unwrap();
    }
}
