//! # Testes de Integração
//!
//! Valida o fluxo completo pela API pública:
//! - Store → Ranking: os N sentidos mais frequentes
//! - Store → Busca: os K mais similares por vetor e por chave
//! - Snapshot → Busca: leitores continuam na store antiga após a troca
//! - Batch: scan fundido e Rayon idênticos às consultas isoladas

use std::sync::Arc;
use std::time::{Duration, Instant};

use sense_search::benchmark::{self, BenchmarkConfig, BenchmarkMode};
use sense_search::config::load_search_config_from;
use sense_search::prelude::*;
use sense_search::synthetic::random_store;

fn sample_store() -> SenseStore {
    SenseStore::from_records(
        2,
        vec![
            Record::new("A", Some(10), vec![1.0, 0.0]),
            Record::new("B", Some(5), vec![0.0, 1.0]),
            Record::new("C", Some(20), vec![0.9, 0.1]),
        ],
    )
    .unwrap()
}

fn keys(results: &[ScoredSense]) -> Vec<&str> {
    results.iter().map(|r| r.item.as_str()).collect()
}

// ============================================================================
// TESTE 1: Store → Ranking
// ============================================================================

#[test]
fn test_rank_top_n_integration() {
    let store = sample_store();

    let ranked = rank_top_n(&store, 2).unwrap();
    let pairs: Vec<(&str, u64)> = ranked.iter().map(|r| (r.item.as_str(), r.score)).collect();
    assert_eq!(pairs, vec![("C", 20), ("A", 10)]);

    // n maior que o vocabulário: todos, ordenados
    let all = rank_top_n(&store, 10).unwrap();
    assert_eq!(all.len(), 3);
    assert_eq!(all[2].item.as_str(), "B");

    assert!(matches!(
        rank_top_n(&store, 0),
        Err(SenseError::InvalidCapacity(0))
    ));
}

// ============================================================================
// TESTE 2: Store → Busca
// ============================================================================

#[test]
fn test_most_similar_integration() {
    let store = sample_store();

    let results = most_similar(&store, &[1.0, 0.0], 2, None).unwrap();
    assert_eq!(keys(&results), vec!["A", "C"]);
    assert!((results[0].score - 1.0).abs() < 1e-6);
    assert!((results[1].score - 0.9939).abs() < 1e-3);

    // Exclusão da própria chave
    let results = most_similar(&store, &[1.0, 0.0], 2, Some("A")).unwrap();
    assert_eq!(keys(&results), vec!["C", "B"]);
}

#[test]
fn test_search_by_key_integration() {
    let store = sample_store();
    let searcher = SimilaritySearcher::new(&store);

    let results = searcher.most_similar_to_key("A", 5).unwrap().unwrap();
    assert_eq!(keys(&results), vec!["C", "B"]);

    assert!(searcher.most_similar_to_key("Z", 5).unwrap().is_none());
    assert!(matches!(
        store.try_get("Z"),
        Err(SenseError::NotFound(ref key)) if key == "Z"
    ));
}

#[test]
fn test_search_errors_integration() {
    let store = sample_store();
    let searcher = SimilaritySearcher::new(&store);

    assert!(matches!(
        searcher.most_similar(&[1.0, 0.0, 0.0], 2, None),
        Err(SenseError::DimensionMismatch {
            expected: 2,
            actual: 3
        })
    ));
    assert!(matches!(
        searcher.most_similar(&[1.0, 0.0], 0, None),
        Err(SenseError::InvalidCapacity(0))
    ));
}

#[test]
fn test_zero_vectors_integration() {
    let store = SenseStore::from_records(
        2,
        vec![
            Record::new("zero", Some(1), vec![0.0, 0.0]),
            Record::new("x", Some(1), vec![1.0, 0.0]),
        ],
    )
    .unwrap();

    // Vetor zero na store fica no fim
    let results = most_similar(&store, &[1.0, 0.0], 2, None).unwrap();
    assert_eq!(keys(&results), vec!["x", "zero"]);
    assert_eq!(results[1].score, f32::NEG_INFINITY);

    // Consulta zero: todos com -inf, ordem de chegada
    let results = most_similar(&store, &[0.0, 0.0], 2, None).unwrap();
    assert_eq!(keys(&results), vec!["zero", "x"]);
    assert!(results.iter().all(|r| r.score == f32::NEG_INFINITY));
}

#[test]
fn test_deterministic_results_integration() {
    let store = random_store(5_000, 16, 3).unwrap();
    let query = store.record_at(17).unwrap().vector.to_vec();

    let first = most_similar(&store, &query, 25, None).unwrap();
    let second = most_similar(&store, &query, 25, None).unwrap();
    assert_eq!(first, second);

    // Estratégias diferentes, mesmo resultado
    for strategy in [SelectionStrategy::Linear, SelectionStrategy::Heap] {
        let config = SearchConfig {
            strategy,
            ..SearchConfig::default()
        };
        let searcher = SimilaritySearcher::with_config(&store, config);
        assert_eq!(searcher.most_similar(&query, 25, None).unwrap(), first);
    }

    assert_eq!(first[0].item, store.keys()[17]);
    assert!(first.windows(2).all(|w| w[0].score >= w[1].score));
}

#[test]
fn test_deadline_integration() {
    let store = random_store(10_000, 8, 5).unwrap();
    let searcher = SimilaritySearcher::new(&store);
    let query = vec![0.5; 8];

    // Deadline já vencido: falha na primeira verificação
    let past = Instant::now() - Duration::from_millis(1);
    assert!(matches!(
        searcher.most_similar_with_deadline(&query, 5, None, past),
        Err(SenseError::DeadlineExceeded { scanned: 0 })
    ));

    let later = Instant::now() + Duration::from_secs(60);
    let results = searcher
        .most_similar_with_deadline(&query, 5, None, later)
        .unwrap();
    assert_eq!(results, searcher.most_similar(&query, 5, None).unwrap());
}

// ============================================================================
// TESTE 3: Snapshot → Busca
// ============================================================================

#[test]
fn test_snapshot_swap_integration() {
    let snapshot = StoreSnapshot::new(sample_store());
    let before: Arc<SenseStore> = snapshot.load();

    let mut builder = StoreBuilder::new(2).unwrap();
    builder.push("D", Some(99), vec![1.0, 0.0]).unwrap();
    builder.push("A", Some(1), vec![0.0, 1.0]).unwrap();
    snapshot.publish(builder.build());

    // Leitor antigo continua consistente
    let old = most_similar(before.as_ref(), &[1.0, 0.0], 1, None).unwrap();
    assert_eq!(keys(&old), vec!["A"]);

    // Novos leitores veem a store nova
    let current = snapshot.load();
    let new = most_similar(current.as_ref(), &[1.0, 0.0], 1, None).unwrap();
    assert_eq!(keys(&new), vec!["D"]);
    assert_eq!(rank_top_n(current.as_ref(), 1).unwrap()[0].item.as_str(), "D");
    assert_eq!(snapshot.generation(), 1);
}

// ============================================================================
// TESTE 4: Batch
// ============================================================================

#[test]
fn test_batch_matches_single_queries_integration() {
    let store = random_store(3_000, 12, 21).unwrap();
    let searcher = SimilaritySearcher::new(&store);

    let owned: Vec<(String, Vec<f32>)> = (0..10)
        .map(|idx| {
            let record = store.record_at(idx * 7).unwrap();
            (record.key.as_str().to_string(), record.vector.to_vec())
        })
        .collect();
    let queries: Vec<BatchQuery<'_>> = owned
        .iter()
        .map(|(key, vector)| BatchQuery::new(vector).excluding(key))
        .collect();

    let expected: Vec<Vec<ScoredSense>> = owned
        .iter()
        .map(|(key, vector)| searcher.most_similar(vector, 15, Some(key)).unwrap())
        .collect();

    assert_eq!(searcher.most_similar_batch(&queries, 15).unwrap(), expected);
    assert_eq!(searcher.most_similar_par(&queries, 15).unwrap(), expected);
}

#[test]
fn test_batch_keys_with_missing_integration() {
    let store = sample_store();
    let searcher = SimilaritySearcher::new(&store);

    let results = searcher.most_similar_keys(&["A", "missing", "B"], 1).unwrap();
    assert_eq!(results.len(), 3);
    assert_eq!(keys(results[0].as_ref().unwrap()), vec!["C"]);
    assert!(results[1].is_none());
    assert_eq!(keys(results[2].as_ref().unwrap()), vec!["C"]);
}

// ============================================================================
// TESTE 5: Configuração → Benchmark
// ============================================================================

#[test]
fn test_config_to_benchmark_integration() {
    let search = load_search_config_from(|name| match name {
        "SENSE_TOPK_STRATEGY" => Some("heap".to_string()),
        "SENSE_TIE_BREAK" => Some("key".to_string()),
        _ => None,
    });
    assert_eq!(search.strategy, SelectionStrategy::Heap);
    assert_eq!(search.tie_break, TieBreak::ByKey);

    let store = random_store(400, 8, 13).unwrap();
    for mode in [
        BenchmarkMode::Sequential,
        BenchmarkMode::Fused,
        BenchmarkMode::Parallel,
    ] {
        let config = BenchmarkConfig {
            sizes: vec![10, 50],
            num_most_similar: 5,
            mode,
        };
        let report = benchmark::run(&store, &config, search).unwrap();
        assert_eq!(report.mode, mode);
        assert_eq!(report.timings[1].similarity_calculations, 250);
    }
}
