//! Módulo de otimizações de performance.
//!
//! A busca por similaridade varre a store inteira a cada consulta:
//! O(V · D) multiplicações para V sentidos de D dimensões. Com milhões de
//! sentidos e D na casa das centenas, o produto escalar é o gargalo.
//!
//! ## Técnicas Utilizadas
//!
//! - **SIMD (AVX2 + FMA)**: 8 floats por instrução, detecção em runtime
//! - **Normas em cache**: calculadas uma vez na construção da store
//! - **Cache-friendly**: vetores contíguos, acesso sequencial

/// Kernels vetoriais otimizados com SIMD.
///
/// - [`dot_product`]: Produto escalar (caminho quente)
/// - [`cosine_similarity`]: Cosseno com tratamento de vetor zerado
/// - [`normalize`]: Normalização L2 in-place
///
/// Usa instruções AVX2 quando disponíveis (x86_64),
/// com fallback para implementação escalar.
pub mod simd;

pub use simd::{cosine_from_parts, cosine_similarity, dot_product, l2_norm, normalize};
