#[derive(argscan::Options)]
struct Unit;

#[derive(argscan::Options)]
union Union {
    a: (),
}

#[derive(argscan::Options)]
enum Fields {
    #[opt(long)]
    Tuple(u8),
    #[opt(long)]
    Named { a: u8 },
}

fn main() {}
