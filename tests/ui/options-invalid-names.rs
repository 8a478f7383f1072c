#[derive(argscan::Options)]
enum Opt {
    #[opt(long = "")]
    LongEmpty,
    #[opt(long = "-foo")]
    LongDash,
    #[opt(long = "a=b")]
    LongEq,

    #[opt(short = '-')]
    ShortDash,
    #[opt(short = ' ')]
    ShortSpace,
    #[opt(short = '\0')]
    ShortControl,
}

fn main() {}
