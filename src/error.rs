// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// ERROS
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//
// Taxonomia única de erros do núcleo. Vetores zerados NÃO são erro: viram
// score -inf no searcher. Nenhuma operação faz retry interno.
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Erros do núcleo de seleção e busca.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SenseError {
    /// Capacidade do seletor precisa ser >= 1.
    #[error("Invalid top-k capacity: {0} (must be >= 1)")]
    InvalidCapacity(usize),

    /// Vetor de consulta (ou registro) com dimensão diferente da store.
    #[error("Dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch {
        /// Dimensão da store
        expected: usize,
        /// Dimensão recebida
        actual: usize,
    },

    /// Chave ausente na store.
    ///
    /// Só é retornado por APIs de chave única (`try_get`). APIs em batch
    /// usam `Option` para que uma chave ausente não aborte o batch inteiro.
    #[error("Sense key not found: {0}")]
    NotFound(String),

    /// Chave repetida durante a construção da store.
    #[error("Duplicate sense key: {0}")]
    DuplicateKey(String),

    /// Store construída com dimensão zero.
    #[error("Vector dimension must be >= 1")]
    InvalidDimension,

    /// Deadline externo estourado durante o scan; nenhum resultado parcial.
    #[error("Deadline exceeded after scanning {scanned} records")]
    DeadlineExceeded {
        /// Registros processados antes do corte
        scanned: usize,
    },

    /// Valor de configuração inválido.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Alias de `Result` usado em todo o crate.
pub type SenseResult<T> = Result<T, SenseError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        assert_eq!(
            SenseError::InvalidCapacity(0).to_string(),
            "Invalid top-k capacity: 0 (must be >= 1)"
        );
        assert_eq!(
            SenseError::DimensionMismatch { expected: 300, actual: 128 }.to_string(),
            "Dimension mismatch: expected 300, got 128"
        );
        assert_eq!(
            SenseError::NotFound("duck|NOUN".into()).to_string(),
            "Sense key not found: duck|NOUN"
        );
    }
}
