#[derive(argscan::Options)]
enum Opt {
    #[opt(short, long)]
    Verbose,
    #[opt(short, long = "verbose")]
    Version,
    #[opt(short, short = 'x')]
    Twice,
    #[opt(long, value, values)]
    Arity,
    #[opt(lnog)]
    Typo,
}

fn main() {}
