//! Tipos de erro do geoplot.

use thiserror::Error;

/// Tipo de resultado padrão do geoplot.
pub type GeoplotResult<T> = Result<T, GeoplotError>;

/// Erros possíveis no geoplot.
#[derive(Error, Debug)]
pub enum GeoplotError {
    #[error("Erro de configuração: {0}")]
    Config(String),

    #[error("Erro de IO: {0}")]
    Io(#[from] std::io::Error),

    #[error("Erro ao parsear TOML: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("Erro ao serializar TOML: {0}")]
    TomlSerialize(#[from] toml::ser::Error),

    #[error("Erro de JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Erro no cache: {0}")]
    Cache(#[from] CacheError),

    #[error("Erro ao avaliar a equação: {0}")]
    Eval(#[from] EvalError),

    #[error("Parâmetro inválido '{name}': {reason}")]
    InvalidInput { name: String, reason: String },

    #[error("Erro de renderização: {0}")]
    Render(String),

    #[error("Erro no servidor: {0}")]
    Server(String),

    #[error("{0}")]
    Other(String),
}

impl GeoplotError {
    /// Cria um erro genérico.
    pub fn other<S: Into<String>>(msg: S) -> Self {
        Self::Other(msg.into())
    }

    /// Cria um erro de configuração.
    pub fn config<S: Into<String>>(msg: S) -> Self {
        Self::Config(msg.into())
    }

    /// Cria um erro de parâmetro inválido.
    pub fn invalid_input<N: Into<String>, R: Into<String>>(name: N, reason: R) -> Self {
        Self::InvalidInput {
            name: name.into(),
            reason: reason.into(),
        }
    }
}

/// Erro de construção do cache.
///
/// É o único erro que o cache reporta: operações sobre um cache
/// bem formado nunca falham.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CacheError {
    #[error("capacidade inválida: {0} (deve ser >= 1)")]
    InvalidCapacity(usize),
}

/// Erros do avaliador de superfícies.
///
/// Nenhum grid parcial acompanha um erro.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EvalError {
    /// O texto não segue a gramática.
    #[error("erro de sintaxe na posição {position}: {message}")]
    Parse { position: usize, message: String },

    /// Identificador fora da lista permitida.
    #[error("símbolo desconhecido '{name}' na posição {position}")]
    UnknownSymbol { name: String, position: usize },

    /// Valores não finitos em modo estrito.
    #[error("{count} ponto(s) com valor não finito")]
    Domain { count: usize },

    /// Grids de entrada com formatos diferentes.
    #[error("grids com formatos incompatíveis: {left:?} vs {right:?}")]
    ShapeMismatch {
        left: (usize, usize),
        right: (usize, usize),
    },
}

impl EvalError {
    /// Cria um erro de sintaxe.
    pub fn parse<S: Into<String>>(position: usize, message: S) -> Self {
        Self::Parse {
            position,
            message: message.into(),
        }
    }

    /// Verifica se o erro veio da análise do texto (e não da avaliação).
    pub fn is_rejection(&self) -> bool {
        matches!(self, Self::Parse { .. } | Self::UnknownSymbol { .. })
    }
}
