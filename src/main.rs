use popcorn::flow;

fn main() -> anyhow::Result<()> {
    flow::run()
}
