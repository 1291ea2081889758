// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// MÉTRICAS DE SIMILARIDADE
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//
// Pontuação de um candidato da store contra um vetor de consulta. A norma do
// candidato vem do cache da store; a da consulta é calculada uma vez por
// consulta (PreparedQuery), nunca por candidato.
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

use std::fmt;

use crate::performance::simd::{cosine_from_parts, dot_product, l2_norm};
use crate::types::RecordRef;

/// Métrica usada para pontuar candidatos.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Metric {
    /// Cosseno: dot / (||q|| × ||c||), vetor zerado → -inf
    #[default]
    Cosine,
    /// Produto escalar bruto
    DotProduct,
}

impl Metric {
    /// Converte string de configuração (case-insensitive).
    ///
    /// - "dot" / "dot_product" → DotProduct
    /// - qualquer outro valor → Cosine
    pub fn from_env(value: &str) -> Self {
        match value.to_lowercase().trim() {
            "dot" | "dot_product" | "dotproduct" => Self::DotProduct,
            _ => Self::Cosine,
        }
    }

    /// Nome legível para logs
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Cosine => "Cosine",
            Self::DotProduct => "Dot product",
        }
    }

    /// Pontua um candidato contra uma consulta preparada.
    #[inline]
    pub fn score(&self, query: &PreparedQuery<'_>, candidate: &RecordRef<'_>) -> f32 {
        let dot = dot_product(query.vector, candidate.vector);
        match self {
            Self::Cosine => cosine_from_parts(dot, query.norm, candidate.norm),
            // Dot product com NaN (entrada corrompida) também perde sempre
            Self::DotProduct if dot.is_nan() => f32::NEG_INFINITY,
            Self::DotProduct => dot,
        }
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// Vetor de consulta com norma pré-calculada.
#[derive(Debug, Clone, Copy)]
pub struct PreparedQuery<'a> {
    /// Vetor original
    pub vector: &'a [f32],
    /// Norma L2 do vetor
    pub norm: f32,
}

impl<'a> PreparedQuery<'a> {
    /// Calcula a norma uma única vez
    pub fn new(vector: &'a [f32]) -> Self {
        Self {
            vector,
            norm: l2_norm(vector),
        }
    }
}
