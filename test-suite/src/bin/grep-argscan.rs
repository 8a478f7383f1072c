//! A table-driven program using `derive(Options)` and value places.
#![forbid(unsafe_code)]
use argscan::values::{place_for_counter, place_for_flag, place_for_value, place_for_vec};
use argscan::{DashDash, OptionSet, Options, Tokenizer, dispatch_set};

#[derive(Debug, Clone, Copy, Options)]
enum Opt {
    /// Print this help.
    #[opt(short, long)]
    Help,
    /// Ignore case distinctions.
    #[opt(short, long)]
    IgnoreCase,
    /// Increase verbosity.
    #[opt(short, long)]
    Verbose,
    /// Stop after NUM matches.
    #[opt(short, long, value)]
    MaxCount,
    /// Skip files matching these globs.
    #[opt(long, values)]
    Exclude,
    /// Pattern, then files to search.
    Arg,
}

#[derive(Debug, Default)]
struct Cli {
    help: Option<bool>,
    ignore_case: Option<bool>,
    verbose: u8,
    max_count: Option<u64>,
    exclude: Vec<String>,
    args: Vec<String>,
}

fn usage() -> String {
    let mut out = String::from("Usage: grep [OPTIONS] PATTERN [FILE]...\n\nOptions:\n");
    for desc in Opt::OPTIONS.iter().filter(|d| !d.is_positional()) {
        out.push_str("  ");
        out.push_str(&desc.to_string());
        out.push('\n');
    }
    out
}

fn parse(args: &[String]) -> argscan::Result<Cli> {
    let mut cli = Cli::default();
    let mut t = Tokenizer::new(args).dash_dash(DashDash::Values);
    dispatch_set::<_, Opt>(&mut t, |m| {
        let place = match m.id() {
            Opt::Help => place_for_flag(&mut cli.help),
            Opt::IgnoreCase => place_for_flag(&mut cli.ignore_case),
            Opt::Verbose => place_for_counter(&mut cli.verbose),
            Opt::MaxCount => place_for_value(&mut cli.max_count),
            Opt::Exclude => place_for_vec(&mut cli.exclude),
            Opt::Arg => place_for_vec(&mut cli.args),
        };
        place.feed(&m.values)
    })?;
    Ok(cli)
}

fn main() {
    let args = argscan::args_from_env().unwrap_or_else(|err| err.exit());
    let cli = parse(&args).unwrap_or_else(|err| err.exit());
    if cli.help.is_some() {
        print!("{}", usage());
        return;
    }
    let Some((pattern, files)) = cli.args.split_first() else {
        argscan::Error::missing_value("PATTERN").exit();
    };
    println!("pattern: {pattern:?}");
    println!("files: {files:?}");
    println!("ignore case: {}, verbosity: {}", cli.ignore_case.is_some(), cli.verbose);
    if let Some(max) = cli.max_count {
        println!("max count: {max}");
    }
    if !cli.exclude.is_empty() {
        println!("exclude: {:?}", cli.exclude);
    }
}

#[test]
fn usage_lists_options() {
    let usage = usage();
    assert!(usage.contains("  -h, --help  Print this help.\n"));
    assert!(usage.contains("  -m, --max-count <VALUE>  Stop after NUM matches.\n"));
    assert!(usage.contains("      --exclude <VALUE>...  Skip files matching these globs.\n"));
    assert!(!usage.contains("Pattern"));
}

#[test]
fn parse_grep() {
    let args = ["grep", "-ivm", "2", "foo", "--exclude", "*.o", "-v", "a.c", "--", "-b.c"];
    let cli = parse(&args.map(String::from)).unwrap();
    assert_eq!(cli.ignore_case, Some(true));
    assert_eq!(cli.verbose, 2);
    assert_eq!(cli.max_count, Some(2));
    assert_eq!(cli.exclude, ["*.o"]);
    assert_eq!(cli.args, ["foo", "a.c", "-b.c"]);
}
