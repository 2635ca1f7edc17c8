//! Tipos de erro para o modelo de geração de texto.
//!
//! Define [`TextModelError`] com variantes para rate limiting, erros da API,
//! erros de rede e respostas sem texto. O [`DescriptionClient`] nunca propaga
//! esses erros: qualquer variante leva ao template de fallback.
//!
//! [`DescriptionClient`]: crate::description::DescriptionClient

use thiserror::Error;

/// Erros que podem ocorrer ao gerar texto com o modelo remoto.
#[derive(Debug, Error)]
pub enum TextModelError {
    /// O servidor retornou HTTP 429 (rate limit).
    #[error("rate limited, retry after {retry_after_ms}ms")]
    RateLimited { retry_after_ms: u64 },

    /// Erro retornado pela API (ex.: 401 chave inválida, 500 erro interno).
    #[error("API error (status {status}): {message}")]
    ApiError { status: u16, message: String },

    /// Falha de rede subjacente (DNS, conexão recusada, timeout).
    #[error("network error: {0}")]
    NetworkError(#[from] reqwest::Error),

    /// A resposta não continha nenhum bloco de texto.
    #[error("model returned no text")]
    EmptyCompletion,
}
