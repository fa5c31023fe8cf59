//! scratchpad CLI - run study scripts against a test case from the terminal

use std::io::Read;
use std::panic;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Args, Parser, Subcommand};
use scratchpad_core::config::RunnerConfigBuilder;
use scratchpad_core::{RunnerConfig, compare, judge, preprocess, protocol};

#[derive(Parser)]
#[command(name = "scratchpad")]
#[command(author, version, about = "Run algorithm-study scripts and diff their output")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a script against an input and optionally an expected output
    Run {
        /// Script file (or - for stdin)
        code: PathBuf,

        /// Input file fed to `input` / `readline()`
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Expected output file
        #[arg(short, long)]
        expected: Option<PathBuf>,

        /// Print the verdict as JSON
        #[arg(long)]
        json: bool,

        #[command(flatten)]
        limits: LimitArgs,
    },

    /// Print the script with stdin idioms rewritten
    Preprocess {
        /// Script file (or - for stdin)
        code: PathBuf,

        /// List removed statements on stderr
        #[arg(long)]
        report: bool,
    },

    /// Diff two output files
    Compare {
        /// Actual output file
        actual: PathBuf,

        /// Expected output file
        expected: PathBuf,
    },

    /// Read one JSON run request from stdin, write the JSON verdict to stdout
    Exec {
        #[command(flatten)]
        limits: LimitArgs,
    },
}

#[derive(Args, Debug, Default)]
struct LimitArgs {
    /// Skip stdin idiom rewriting
    #[arg(long)]
    no_preprocess: bool,

    /// Maximum iterations of a single loop (0 disables)
    #[arg(long)]
    loop_limit: Option<u64>,

    /// Maximum call depth (0 disables)
    #[arg(long)]
    recursion_limit: Option<usize>,

    /// Run without any engine bounds
    #[arg(long, conflicts_with_all = ["loop_limit", "recursion_limit"])]
    unbounded: bool,
}

impl LimitArgs {
    /// Environment defaults overridden by flags
    fn to_config(&self) -> Result<RunnerConfig, Box<dyn std::error::Error>> {
        let base = if self.unbounded {
            RunnerConfig::unbounded()
        } else {
            RunnerConfig::from_env()?
        };

        let mut builder = RunnerConfigBuilder::from_config(base).preprocess(!self.no_preprocess);
        if let Some(limit) = self.loop_limit {
            builder = builder.loop_iteration_limit((limit > 0).then_some(limit));
        }
        if let Some(limit) = self.recursion_limit {
            builder = builder.recursion_limit((limit > 0).then_some(limit));
        }

        Ok(builder.build())
    }
}

fn main() -> Result<ExitCode, Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("scratchpad=warn".parse()?)
                .add_directive("scratchpad_core=warn".parse()?),
        )
        .init();
    set_panic_hook();

    let cli = Cli::parse();

    match cli.command {
        Commands::Run {
            code,
            input,
            expected,
            json,
            limits,
        } => {
            let config = limits.to_config()?;
            let source = read_source(&code)?;
            let raw_input = input.as_deref().map(std::fs::read_to_string).transpose()?;
            let expected = expected.as_deref().map(std::fs::read_to_string).transpose()?;

            tracing::debug!(?config, "running script");
            let verdict = judge(
                &source,
                raw_input.as_deref().unwrap_or_default(),
                expected.as_deref(),
                &config,
            );

            if json {
                println!("{}", protocol::encode(&verdict)?);
            } else {
                print!("{verdict}");
            }

            Ok(exit_code(verdict.passed()))
        }

        Commands::Preprocess { code, report } => {
            let source = read_source(&code)?;
            let rewrite = preprocess::rewrite(&source);

            if report {
                for removal in &rewrite.removed {
                    eprintln!("line {}: {}", removal.line, removal.idiom.marker());
                }
            }
            print!("{}", rewrite.code);

            Ok(ExitCode::SUCCESS)
        }

        Commands::Compare { actual, expected } => {
            let actual = std::fs::read_to_string(actual)?;
            let expected = std::fs::read_to_string(expected)?;
            let comparison = compare(&actual, &expected);

            match &comparison.diff {
                Some(diff) => println!("{diff}"),
                None => println!("match"),
            }

            Ok(exit_code(comparison.is_match))
        }

        Commands::Exec { limits } => {
            let config = limits.to_config()?;
            let mut raw = String::new();
            std::io::stdin().read_to_string(&mut raw)?;

            let request = protocol::decode_request(&raw)?;
            let verdict = judge(
                &request.source_code,
                &request.raw_input,
                request.expected_output.as_deref(),
                &config,
            );
            println!("{}", protocol::encode(&verdict)?);

            Ok(exit_code(verdict.passed()))
        }
    }
}

fn read_source(path: &Path) -> std::io::Result<String> {
    if path.as_os_str() == "-" {
        let mut source = String::new();
        std::io::stdin().read_to_string(&mut source)?;
        Ok(source)
    } else {
        std::fs::read_to_string(path)
    }
}

fn exit_code(passed: bool) -> ExitCode {
    if passed {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}

/// Engine panics are contained and reported by the executor, so the hook
/// only keeps the panic location for debugging.
fn set_panic_hook() {
    panic::set_hook(Box::new(|panic_info| {
        tracing::debug!(
            message = "panic occurred",
            panic = %panic_info
        );
    }));
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_run_with_files_and_limits() {
        let cli = Cli::try_parse_from([
            "scratchpad",
            "run",
            "main.js",
            "-i",
            "in.txt",
            "--expected",
            "out.txt",
            "--loop-limit",
            "0",
            "--json",
        ])
        .unwrap();

        let Commands::Run {
            code,
            input,
            expected,
            json,
            limits,
        } = cli.command
        else {
            panic!("expected run command");
        };
        assert_eq!(code, PathBuf::from("main.js"));
        assert_eq!(input, Some(PathBuf::from("in.txt")));
        assert_eq!(expected, Some(PathBuf::from("out.txt")));
        assert!(json);
        assert_eq!(limits.loop_limit, Some(0));
    }

    #[test]
    fn unbounded_conflicts_with_explicit_limits() {
        let parsed = Cli::try_parse_from(["scratchpad", "exec", "--unbounded", "--loop-limit", "5"]);
        assert!(parsed.is_err());
    }

    #[test]
    fn limit_flags_override_config() {
        let limits = LimitArgs {
            no_preprocess: true,
            loop_limit: Some(0),
            recursion_limit: Some(99),
            unbounded: false,
        };
        let config = limits.to_config().unwrap();

        assert!(!config.preprocess);
        assert_eq!(config.loop_iteration_limit, None);
        assert_eq!(config.recursion_limit, Some(99));
    }

    #[derive(Clone, Default)]
    struct SharedLog(std::sync::Arc<std::sync::Mutex<Vec<u8>>>);

    impl std::io::Write for SharedLog {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn panic_hook_logs_at_debug() {
        let log = SharedLog::default();
        let writer = log.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_ansi(false)
            .with_max_level(tracing::Level::TRACE)
            .with_writer(move || writer.clone())
            .finish();

        tracing::subscriber::with_default(subscriber, || {
            set_panic_hook();
            let caught: std::thread::Result<()> = panic::catch_unwind(|| panic!("engine blew up"));
            assert!(caught.is_err());
            let _ = panic::take_hook();
        });

        let output = String::from_utf8(log.0.lock().unwrap().clone()).unwrap();
        assert!(output.contains("DEBUG"), "{output}");
        assert!(output.contains("engine blew up"), "{output}");
        assert!(!output.contains("ERROR"), "{output}");
    }

    #[test]
    fn unbounded_flag_clears_limits() {
        let limits = LimitArgs {
            unbounded: true,
            ..LimitArgs::default()
        };
        let config = limits.to_config().unwrap();

        assert_eq!(config.loop_iteration_limit, None);
        assert_eq!(config.recursion_limit, None);
        assert!(config.preprocess);
    }
}
