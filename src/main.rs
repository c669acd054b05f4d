use anyhow::{Context, Result};
use nophoton_icons::{config, generator, logger};

fn main() -> Result<()> {
    logger::init();

    let mut cfg = config::load_config().context("loading configuration")?;
    cfg.apply_args(std::env::args_os().skip(1));

    generator::generate_all(&cfg)
        .with_context(|| format!("generating icons in {}", cfg.out_dir.display()))?;
    println!("    Icons generated successfully.");
    Ok(())
}
