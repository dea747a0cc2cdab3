//! Implementação dos comandos CLI do geoplot.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::orchestrator::PlotService;
use crate::render::{write_document, DescriptionRenderer};
use crate::server::PlotServer;
use crate::types::config::Config;
use crate::types::requests::SurfaceRequest;
use crate::types::responses::ArtifactBody;
use crate::GeoplotResult;

/// Nome do arquivo de configuração criado pelo `init`.
pub const CONFIG_FILE: &str = "geoplot.toml";

fn service(config: &Config) -> GeoplotResult<PlotService> {
    PlotService::new(config.clone(), Arc::new(DescriptionRenderer::new().pretty()))
}

/// Creates the default configuration file in the specified directory.
pub fn init(path: Option<PathBuf>) -> GeoplotResult<()> {
    let target_dir = path.unwrap_or_else(|| PathBuf::from("."));

    if !target_dir.exists() {
        std::fs::create_dir_all(&target_dir)?;
        tracing::info!("Directory created: {}", target_dir.display());
    }

    let config_path = target_dir.join(CONFIG_FILE);

    if config_path.exists() {
        println!("Configuration already exists at: {}", config_path.display());
        return Ok(());
    }

    Config::default_config().save(&config_path)?;

    println!("geoplot initialized successfully!");
    println!("Configuration created at: {}", config_path.display());

    Ok(())
}

/// Inicia o servidor via stdio.
pub async fn serve(config: &Config) -> GeoplotResult<()> {
    tracing::debug!(
        capacity = config.cache.capacity,
        strict = config.surface.strict,
        "Starting server"
    );

    let mut server = PlotServer::new(config.clone())?;
    server.run_stdio().await
}

/// Imprime a descrição JSON do gráfico.
pub fn chart(first_term: f64, ratio: f64, config: &Config) -> GeoplotResult<()> {
    let artifact = service(config)?.chart(first_term, ratio)?;

    if let ArtifactBody::Chart { report, .. } = &artifact.body {
        tracing::info!(convergence = %report.convergence, "Chart computed");
    }

    println!("{}", String::from_utf8_lossy(artifact.bytes()));
    Ok(())
}

/// Avalia a superfície e mostra um resumo.
pub fn surface(
    equation: &str,
    strict: bool,
    output: Option<&Path>,
    config: &Config,
) -> GeoplotResult<()> {
    let strict = strict || config.surface.strict;
    let artifact =
        service(config)?.surface_with(SurfaceRequest::new(equation).with_strict(strict))?;

    if let ArtifactBody::Surface {
        equation,
        shape,
        non_finite,
        ..
    } = &artifact.body
    {
        println!("Equation: {}", equation);
        println!("Grid: {}x{}", shape.0, shape.1);
        println!("Undefined points: {}", non_finite);
    }

    if let Some(path) = output {
        std::fs::write(path, artifact.bytes())?;
        println!("Surface description written to: {}", path.display());
    }

    Ok(())
}

/// Grava o documento LaTeX da série.
pub fn latex(first_term: f64, ratio: f64, output: &Path, config: &Config) -> GeoplotResult<()> {
    let artifact = service(config)?.document(first_term, ratio)?;

    if let ArtifactBody::Document { latex } = &artifact.body {
        write_document(output, latex)?;
    }

    println!("LaTeX document written to: {}", output.display());
    Ok(())
}

/// Mostra versão.
pub fn version() {
    println!("geoplot {}", env!("CARGO_PKG_VERSION"));
    println!();
    println!("Geometric series charts, 3D surfaces and LaTeX export");
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_init_creates_config_once() {
        let dir = TempDir::new().unwrap();
        let target = dir.path().join("nested");

        init(Some(target.clone())).unwrap();
        let path = target.join(CONFIG_FILE);
        assert!(path.exists());

        std::fs::write(&path, "[cache]\ncapacity = 3\n").unwrap();
        init(Some(target)).unwrap();
        assert_eq!(Config::load(&path).unwrap().cache.capacity, 3);
    }

    #[test]
    fn test_latex_writes_file() {
        let dir = TempDir::new().unwrap();
        let output = dir.path().join("out.tex");

        latex(1.0, 0.5, &output, &Config::default()).unwrap();

        let content = std::fs::read_to_string(&output).unwrap();
        assert!(content.contains(r"\section*{Sequence Formula}"));
    }

    #[test]
    fn test_surface_rejects_unknown_symbol() {
        let result = surface("os.system(1)", false, None, &Config::default());
        assert!(result.is_err());
    }
}
