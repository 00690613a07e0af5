use anyhow::Result;

pub fn run() -> Result<()> {
    println!("glctl {}", env!("CARGO_PKG_VERSION"));
    Ok(())
}
