use clap::Parser;
use draconic::{Config, Interpreter};
use std::path::PathBuf;

#[derive(Parser)]
#[command(author, version, about = "Run a sandboxed script", long_about = None)]
struct Cli {
	/// Script file to run. Omitted if `--eval` is given instead.
	script: Option<PathBuf>,

	/// Evaluate SOURCE directly instead of reading a file.
	#[arg(short, long, value_name = "SOURCE", conflicts_with = "script")]
	eval: Option<String>,

	/// Bit width for integer arithmetic.
	#[arg(long, value_name = "BITS", default_value_t = 64)]
	max_int_size: u32,

	/// Maximum length for any list/set/dict/string.
	#[arg(long, value_name = "LEN", default_value_t = 10_000)]
	max_const_len: usize,

	/// Maximum total loop iterations.
	#[arg(long, value_name = "N", default_value_t = 1_000_000)]
	max_loops: u64,

	/// Maximum total statement executions.
	#[arg(long, value_name = "N", default_value_t = 1_000_000)]
	max_statements: u64,
}

fn main() {
	let cli = Cli::parse();

	let source = match (&cli.eval, &cli.script) {
		(Some(source), _) => source.clone(),
		(None, Some(path)) => std::fs::read_to_string(path).unwrap_or_else(|err| {
			eprintln!("error: couldn't read {}: {err}", path.display());
			std::process::exit(1);
		}),
		(None, None) => {
			eprintln!("error: pass a script file or --eval SOURCE");
			std::process::exit(1);
		}
	};

	let config = Config::builder()
		.max_int_size(cli.max_int_size)
		.max_const_len(cli.max_const_len)
		.max_loops(cli.max_loops)
		.max_statements(cli.max_statements)
		.build();

	match Interpreter::new(config).execute(&source) {
		Ok(value) => println!("{value:?}"),
		Err(err) => {
			eprintln!("error: {err}");
			std::process::exit(1);
		}
	}
}
