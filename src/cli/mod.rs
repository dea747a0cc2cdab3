//! Interface de linha de comando do geoplot.

pub mod commands;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// geoplot - séries geométricas, superfícies 3D e exportação LaTeX.
#[derive(Parser, Debug)]
#[command(name = "geoplot")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Arquivo de configuração.
    #[arg(short, long, default_value = "geoplot.toml")]
    pub config: PathBuf,

    /// Modo verbose.
    #[arg(short, long)]
    pub verbose: bool,

    /// Modo silencioso.
    #[arg(short, long)]
    pub quiet: bool,

    /// Comando a executar.
    #[command(subcommand)]
    pub command: Commands,
}

/// Comandos disponíveis.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Cria geoplot.toml com os valores padrão.
    Init {
        /// Diretório de destino (padrão: diretório atual).
        #[arg(short, long)]
        path: Option<PathBuf>,
    },

    /// Inicia o servidor JSON-RPC em stdin/stdout.
    Serve,

    /// Descrição JSON do gráfico das somas parciais.
    Chart {
        /// Primeiro termo (a).
        #[arg(allow_negative_numbers = true)]
        first_term: f64,

        /// Razão (r).
        #[arg(allow_negative_numbers = true)]
        ratio: f64,
    },

    /// Avalia uma equação em x e y sobre a malha 400x400.
    Surface {
        /// Equação, por exemplo "sin(x) * cos(y)".
        equation: String,

        /// Rejeita pontos não finitos.
        #[arg(long)]
        strict: bool,

        /// Grava a descrição JSON completa neste arquivo.
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Gera o documento LaTeX da série.
    Latex {
        /// Primeiro termo (a).
        #[arg(allow_negative_numbers = true)]
        first_term: f64,

        /// Razão (r).
        #[arg(allow_negative_numbers = true)]
        ratio: f64,

        /// Arquivo de saída.
        #[arg(short, long, default_value = crate::render::DEFAULT_LATEX_FILE)]
        output: PathBuf,
    },

    /// Mostra versão.
    Version,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_chart_with_negative_ratio() {
        let cli = Cli::try_parse_from(["geoplot", "chart", "1", "-0.5"]).unwrap();
        match cli.command {
            Commands::Chart { first_term, ratio } => {
                assert_eq!(first_term, 1.0);
                assert_eq!(ratio, -0.5);
            }
            other => panic!("unexpected command: {:?}", other),
        }
        assert_eq!(cli.config, PathBuf::from("geoplot.toml"));
    }

    #[test]
    fn test_parse_latex_default_output() {
        let cli = Cli::try_parse_from(["geoplot", "-q", "latex", "2", "0.25"]).unwrap();
        assert!(cli.quiet);
        match cli.command {
            Commands::Latex { output, .. } => assert_eq!(output, PathBuf::from("sequence.tex")),
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_parse_surface_flags() {
        let cli =
            Cli::try_parse_from(["geoplot", "surface", "x * y", "--strict", "-o", "z.json"]).unwrap();
        match cli.command {
            Commands::Surface {
                equation,
                strict,
                output,
            } => {
                assert_eq!(equation, "x * y");
                assert!(strict);
                assert_eq!(output, Some(PathBuf::from("z.json")));
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }
}
