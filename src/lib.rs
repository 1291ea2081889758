//! # Sense Search
//!
//! Seleção top-K limitada sobre espaços de embeddings de sentidos
//! (`palavra|TAG`): os N sentidos mais frequentes e os K sentidos mais
//! similares a um vetor de consulta.
//!
//! ## O problema
//!
//! Vocabulários de milhões de sentidos com vetores de centenas de dimensões,
//! consultados repetidamente sob orçamento apertado de latência. Ordenar o
//! vocabulário inteiro a cada consulta está fora de questão: as duas
//! operações fazem UMA passada sobre a store com memória auxiliar O(K).
//!
//! ## Arquitetura
//!
//! ### 1. Seletor Top-K (`selection`)
//! Primitiva compartilhada: retém os K melhores de um stream.
//! - **Linear**: mínimo corrente, ideal para K pequeno
//! - **Heap**: min-heap binário, O(log K) para K grande
//!
//! ### 2. Store (`store`)
//! Registros `(chave, frequência opcional, vetor)` imutáveis após o build,
//! normas L2 em cache, publicação atômica de snapshots.
//!
//! ### 3. Ranking por frequência (`ranking`)
//! Seletor com score = frequência; registros sem frequência ficam de fora.
//!
//! ### 4. Busca por similaridade (`search`)
//! Seletor com score = cosseno (ou produto escalar), kernels AVX2, batch
//! fundido e consultas paralelas com Rayon.
//!
//! ## Exemplo de Uso
//!
//! ```rust
//! use sense_search::prelude::*;
//!
//! let store = SenseStore::from_records(2, vec![
//!     Record::new("A", Some(10), vec![1.0, 0.0]),
//!     Record::new("B", Some(5), vec![0.0, 1.0]),
//!     Record::new("C", Some(20), vec![0.9, 0.1]),
//! ]).unwrap();
//!
//! let ranked = rank_top_n(&store, 2).unwrap();
//! assert_eq!(ranked[0].item.as_str(), "C");
//!
//! let similar = most_similar(&store, &[1.0, 0.0], 2, None).unwrap();
//! assert_eq!(similar[1].item.as_str(), "C");
//! ```

#![warn(missing_docs)]
#![warn(rust_2018_idioms)]

/// Taxonomia de erros do núcleo.
pub mod error;

/// Tipos fundamentais compartilhados por todo o sistema.
///
/// - [`SenseKey`]: chave `palavra|TAG`
/// - [`Record`] / [`RecordRef`]: registro owned e visão emprestada
/// - [`ScoredItem`]: candidato pontuado
pub mod types;

/// Seletor top-K limitado, genérico no item e no score.
pub mod selection;

/// Store de vetores: trait mínima, implementação em memória e snapshots.
pub mod store;

/// Otimizações de performance de baixo nível.
///
/// - Produto escalar com SIMD (AVX2 + FMA)
/// - Normalização e norma L2
pub mod performance;

/// Métricas de similaridade (cosseno, produto escalar).
pub mod metric;

/// Ranking dos N sentidos mais frequentes.
pub mod ranking;

/// Busca dos K sentidos mais similares.
pub mod search;

/// Configuração via variáveis de ambiente.
///
/// **Busca:**
/// - `SENSE_METRIC`: "cosine" ou "dot" (padrão: cosine)
/// - `SENSE_TOPK_STRATEGY`: "linear", "heap" ou "auto" (padrão: auto)
/// - `SENSE_TIE_BREAK`: "first_seen" ou "key" (padrão: first_seen)
/// - `SENSE_EXCLUDE_SELF`: exclui a chave consultada (padrão: true)
///
/// **Pool Rayon:**
/// - `SENSE_THREADS`: Número fixo de threads
/// - `SENSE_MAX_THREADS`: Máximo de threads (padrão: 16)
pub mod config;

/// Stores sintéticas reprodutíveis para benchmarks e testes.
pub mod synthetic;

/// Benchmark de similaridade sobre os termos mais frequentes.
pub mod benchmark;

/// Utilitários diversos (timing).
pub mod utils;

// Re-exports principais
pub use config::{
    build_thread_pool, load_runtime_config, load_search_config, RuntimeConfig,
};
pub use error::{SenseError, SenseResult};
pub use ranking::{rank_top_n, FrequencyRanker};
pub use search::{most_similar, SearchConfig, SimilaritySearcher};
pub use selection::{SelectionStrategy, TieBreak, TopKSelector};
pub use store::{SenseStore, StoreBuilder, StoreSnapshot, VectorStore};
pub use types::*;

/// Versão da biblioteca.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Prelude com imports comuns para uso rápido.
///
/// ```rust
/// use sense_search::prelude::*;
/// ```
pub mod prelude {
    pub use crate::error::{SenseError, SenseResult};
    pub use crate::metric::Metric;
    pub use crate::ranking::{rank_top_n, FrequencyRanker};
    pub use crate::search::{most_similar, BatchQuery, Query, SearchConfig, SimilaritySearcher};
    pub use crate::selection::{SelectionStrategy, TieBreak, TopKSelector};
    pub use crate::store::{SenseStore, StoreBuilder, StoreSnapshot, VectorStore};
    pub use crate::types::*;
}
