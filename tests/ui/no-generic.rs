#[derive(argscan::Options)]
pub enum Opt<T> {
    #[opt(short)]
    A,
    B(T),
}

fn main() {}
