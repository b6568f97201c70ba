use std::io;

use anyhow::{Context, Result};
use clap::Parser;
use lg_ascii::engine::BrightnessEngine;
use lg_core::config::AppConfig;
use lg_core::frame::PixelSource;
use lg_glyph::rasterizer::{FontRasterizer, FontRegistry};
use lg_source::padded::PaddedImage;

pub mod app;
pub mod cli;

fn main() -> Result<()> {
    // 1. Parser CLI
    let cli = cli::Cli::parse();

    // 2. Initialiser le logging
    env_logger::Builder::new()
        .filter_level(cli.log_level.parse().unwrap_or(log::LevelFilter::Warn))
        .init();

    // 3. Charger la config, appliquer les overrides CLI
    let mut config = resolve_config(&cli)?;
    cli.apply_overrides(&mut config);
    config.validate()?;

    // 4. Police : repli sur une police système connue, sinon échec immédiat
    let registry = FontRegistry::with_paths(config.fonts.clone());
    if let Some(family) = registry.resolve_family(&config.font) {
        config.font = family;
    }
    let rasterizer = FontRasterizer::new(registry);
    rasterizer
        .preload(&config.font)
        .with_context(|| format!("Police indisponible : {}", config.font))?;

    // 5. Image source, complétée en carré de puissance de deux
    let source = lg_source::image::load_image(&cli.image)?;
    let image = PaddedImage::new(&source).context("Image inutilisable")?;
    let (w, h) = image.original_size();
    log::info!("Image {w}x{h} complétée en {}x{}", image.width(), image.height());

    // 6. Moteur + boucle de commandes
    let engine = BrightnessEngine::new(rasterizer, config.font.clone())
        .with_resolution(config.glyph_resolution)
        .with_policy(config.normalization);
    let mut app_instance = app::App::new(image, engine, &config);
    app_instance.run(io::stdin().lock(), io::stdout())?;
    log::info!(
        "Session terminée : {} colonnes, {} caractères actifs, {} en cache",
        app_instance.chars_in_row(),
        app_instance.charset().len(),
        app_instance.engine().all_time().len()
    );
    Ok(())
}

fn resolve_config(cli: &cli::Cli) -> Result<AppConfig> {
    if cli.config.exists() {
        lg_core::config::load_config(&cli.config)
    } else {
        log::warn!(
            "Config introuvable : {}. Utilisation des défauts.",
            cli.config.display()
        );
        Ok(AppConfig::default())
    }
}
