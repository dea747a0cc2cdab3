//! Cache LRU de artefatos.
//!
//! Este módulo implementa um cache Least Recently Used (LRU) genérico, de
//! capacidade fixa, que memoriza artefatos já calculados (gráficos,
//! superfícies e documentos) pela chave dos parâmetros da requisição.
//!
//! ## Exemplo
//!
//! ```rust
//! use geoplot::cache::ArtifactCache;
//!
//! let cache: ArtifactCache<String, u32> = ArtifactCache::new(2).unwrap();
//! cache.put("a".to_string(), 1);
//! cache.put("b".to_string(), 2);
//! cache.get("a");
//! cache.put("c".to_string(), 3);
//!
//! assert!(!cache.contains("b"));
//! ```

mod key;
mod lru;

pub use self::key::{ArtifactKey, ExactF64};
pub use self::lru::{ArtifactCache, CacheStats};
