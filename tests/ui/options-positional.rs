#[derive(argscan::Options)]
enum Opt {
    #[opt(short)]
    Quiet,
    #[opt(value)]
    File,
    Rest,
}

fn main() {}
