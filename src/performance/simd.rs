// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// SIMD - SINGLE INSTRUCTION, MULTIPLE DATA
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//
// Kernels vetoriais do caminho quente da busca por similaridade.
//
// A busca é O(V · D) por consulta e o custo dominante é o produto escalar.
// Como as normas da store são pré-calculadas na construção, o laço interno
// só precisa de UM acumulador (dot), e não três como um cosseno ingênuo.
//
// - AVX2 + FMA (256-bit): 8 floats por instrução
// - Fallback escalar em qualquer outra CPU
//
// Para vetores de 300 dimensões (sense2vec):
// - Loop escalar: 300 iterações
// - AVX2: 18 blocos de 16 + 1 bloco de 8 + 4 de resto
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[cfg(target_arch = "x86_64")]
use std::arch::x86_64::*;

/// Produto escalar - implementação simples (fallback)
///
/// # Complexidade
/// O(n) onde n é o tamanho dos vetores
pub fn dot_product_scalar(a: &[f32], b: &[f32]) -> f32 {
    debug_assert_eq!(a.len(), b.len(), "Vectors must have the same length");
    a.iter().zip(b.iter()).map(|(x, y)| x * y).sum()
}

/// Produto escalar com AVX2 (256-bit SIMD)
///
/// # Safety
///
/// O caller deve garantir que a CPU suporta AVX2 e FMA.
#[cfg(target_arch = "x86_64")]
#[target_feature(enable = "avx2", enable = "fma")]
pub unsafe fn dot_product_avx2(a: &[f32], b: &[f32]) -> f32 {
    debug_assert_eq!(a.len(), b.len(), "Vectors must have the same length");
    let len = a.len().min(b.len());

    // Dois acumuladores independentes escondem a latência do FMA
    let mut acc0 = _mm256_setzero_ps();
    let mut acc1 = _mm256_setzero_ps();

    let pairs = len / 16;
    for i in 0..pairs {
        let offset = i * 16;
        let va0 = _mm256_loadu_ps(a.as_ptr().add(offset));
        let vb0 = _mm256_loadu_ps(b.as_ptr().add(offset));
        let va1 = _mm256_loadu_ps(a.as_ptr().add(offset + 8));
        let vb1 = _mm256_loadu_ps(b.as_ptr().add(offset + 8));
        acc0 = _mm256_fmadd_ps(va0, vb0, acc0);
        acc1 = _mm256_fmadd_ps(va1, vb1, acc1);
    }

    let mut offset = pairs * 16;
    if offset + 8 <= len {
        let va = _mm256_loadu_ps(a.as_ptr().add(offset));
        let vb = _mm256_loadu_ps(b.as_ptr().add(offset));
        acc0 = _mm256_fmadd_ps(va, vb, acc0);
        offset += 8;
    }

    let mut result = hsum_avx2(_mm256_add_ps(acc0, acc1));

    // Resto (len % 8)
    for i in offset..len {
        result += a[i] * b[i];
    }

    result
}

/// Soma horizontal de 8 floats em um registro AVX2
#[cfg(target_arch = "x86_64")]
#[inline]
#[target_feature(enable = "avx2")]
unsafe fn hsum_avx2(v: __m256) -> f32 {
    let low = _mm256_castps256_ps128(v);
    let high = _mm256_extractf128_ps(v, 1);
    let sum128 = _mm_add_ps(low, high);
    let shuf = _mm_movehdup_ps(sum128);
    let sums = _mm_add_ps(sum128, shuf);
    let shuf = _mm_movehl_ps(shuf, sums);
    _mm_cvtss_f32(_mm_add_ss(sums, shuf))
}

/// Se a CPU atual suporta o kernel AVX2 + FMA
pub fn simd_available() -> bool {
    #[cfg(target_arch = "x86_64")]
    {
        is_x86_feature_detected!("avx2") && is_x86_feature_detected!("fma")
    }
    #[cfg(not(target_arch = "x86_64"))]
    {
        false
    }
}

/// Produto escalar com seleção automática da melhor implementação
pub fn dot_product(a: &[f32], b: &[f32]) -> f32 {
    #[cfg(target_arch = "x86_64")]
    {
        if is_x86_feature_detected!("avx2") && is_x86_feature_detected!("fma") {
            return unsafe { dot_product_avx2(a, b) };
        }
    }

    dot_product_scalar(a, b)
}

/// Norma L2 (magnitude do vetor)
pub fn l2_norm(v: &[f32]) -> f32 {
    dot_product(v, v).sqrt()
}

/// Normaliza um vetor para norma L2 = 1. Vetores zerados ficam intactos.
///
/// Retorna a norma original.
pub fn normalize(v: &mut [f32]) -> f32 {
    let norm = l2_norm(v);
    if norm > 0.0 {
        for x in v.iter_mut() {
            *x /= norm;
        }
    }
    norm
}

/// Cosseno a partir do produto escalar e das duas normas.
///
/// Norma zero (ou não finita) em qualquer lado vira `-inf`: o candidato
/// sempre perde e nunca propaga NaN para o ranking.
#[inline]
pub fn cosine_from_parts(dot: f32, norm_a: f32, norm_b: f32) -> f32 {
    let denom = norm_a * norm_b;
    if denom > 0.0 && denom.is_finite() {
        dot / denom
    } else {
        f32::NEG_INFINITY
    }
}

/// Similaridade cosseno entre dois vetores.
///
/// # Fórmula
/// ```text
/// cos(θ) = (A · B) / (||A|| × ||B||)
/// ```
///
/// Retorna `-inf` se algum dos vetores for zerado.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    cosine_from_parts(dot_product(a, b), l2_norm(a), l2_norm(b))
}
