// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// STORES SINTÉTICAS
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//
// Stores reprodutíveis (mesma seed → mesma store) para benchmarks e testes,
// já que o carregamento de modelos reais fica fora do crate.
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::error::SenseResult;
use crate::store::{SenseStore, StoreBuilder};
use crate::types::SenseKey;

/// Tags de sentido usadas nas chaves geradas.
pub const SENSE_TAGS: [&str; 8] = ["NOUN", "VERB", "ADJ", "ADV", "PROPN", "ORG", "GPE", "PERSON"];

/// Fração aproximada de registros gerados sem frequência.
pub const UNKNOWN_FREQUENCY_RATE: f64 = 0.05;

/// Vetor aleatório uniforme em [-1, 1)
pub fn random_vector<R: Rng>(rng: &mut R, dimension: usize) -> Vec<f32> {
    (0..dimension).map(|_| rng.gen_range(-1.0..1.0)).collect()
}

/// Chave sintética `w{idx}|TAG`
pub fn synthetic_key(idx: usize) -> SenseKey {
    SenseKey::new(&format!("w{}", idx), SENSE_TAGS[idx % SENSE_TAGS.len()])
}

/// Gera uma store com `vocab_size` sentidos de dimensão `dimension`.
///
/// Frequências seguem uma cauda longa (poucos sentidos muito frequentes);
/// cerca de 5% dos registros ficam sem frequência.
pub fn random_store(vocab_size: usize, dimension: usize, seed: u64) -> SenseResult<SenseStore> {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut builder = StoreBuilder::new(dimension)?.with_capacity(vocab_size);

    for idx in 0..vocab_size {
        let frequency = if rng.gen_bool(UNKNOWN_FREQUENCY_RATE) {
            None
        } else {
            let u: f64 = rng.gen();
            Some((u.powi(4) * 1_000_000.0) as u64 + 1)
        };
        let vector = random_vector(&mut rng, dimension);
        builder.push(synthetic_key(idx), frequency, vector)?;
    }

    Ok(builder.build())
}
