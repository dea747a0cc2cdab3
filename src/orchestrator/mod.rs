//! Orquestração das requisições de plotagem.
//!
//! O [`PlotService`] é o único ponto que combina o modelo de séries, o
//! avaliador de superfícies, o renderizador e o cache de artefatos.
//!
//! ## Exemplo
//!
//! ```rust
//! use geoplot::orchestrator::PlotService;
//! use geoplot::Config;
//!
//! let service = PlotService::with_default_renderer(Config::default()).unwrap();
//! let chart = service.chart(1.0, 0.5).unwrap();
//! assert_eq!(chart.kind(), "chart");
//! ```

mod service;

pub use service::PlotService;
