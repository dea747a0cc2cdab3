//! # geoplot
//!
//! Gráficos de séries geométricas, superfícies 3D e exportação LaTeX.
//!
//! Todo artefato gerado passa por um cache LRU de capacidade fixa, então a
//! mesma requisição nunca é calculada duas vezes enquanto estiver em cache.
//! As equações de superfície são texto não confiável e passam por uma
//! gramática fechada, nunca por execução de código.
//!
//! ## Módulos
//!
//! - [`cache`] - Cache LRU de artefatos
//! - [`sequence`] - Somas parciais, convergência e faixa de ±8%
//! - [`surface`] - Avaliador de equações sobre a malha 400×400
//! - [`render`] - Descrições JSON de gráficos e documento LaTeX
//! - [`orchestrator`] - Serviço que une tudo
//! - [`server`] - Servidor JSON-RPC sobre stdio
//! - [`cli`] - Interface de linha de comando
//! - [`types`] - Tipos compartilhados

pub mod cache;
#[cfg(feature = "cli")]
pub mod cli;
pub mod orchestrator;
pub mod render;
pub mod sequence;
pub mod server;
pub mod surface;
pub mod types;

pub use types::config::Config;
pub use types::errors::{GeoplotError, GeoplotResult};
