use evobias::engines::generation::{Gene, ParameterVector, GENE_COUNT, GENE_TABLE};
use evobias::EvobiasError;
use rand::rngs::StdRng;
use rand::SeedableRng;

fn in_range(vector: &ParameterVector) -> bool {
    vector
        .genes()
        .iter()
        .zip(GENE_TABLE.iter())
        .all(|(&value, spec)| spec.contains(value))
}

#[test]
fn test_genes_stay_in_range_through_operators() {
    let mut rng = StdRng::seed_from_u64(11);
    let mut a = ParameterVector::random(&mut rng);
    let mut b = ParameterVector::random(&mut rng);

    for _ in 0..200 {
        a.mutate(1.0, &mut rng);
        b.mutate(0.5, &mut rng);
        let child = a.crossover(&b, &mut rng);

        assert_eq!(child.len(), GENE_COUNT);
        assert!(in_range(&a));
        assert!(in_range(&b));
        assert!(in_range(&child));
    }
}

#[test]
fn test_crossover_leaves_parents_untouched() {
    let mut rng = StdRng::seed_from_u64(12);
    let a = ParameterVector::random(&mut rng);
    let b = ParameterVector::random(&mut rng);
    let (a_before, b_before) = (a.clone(), b.clone());

    for _ in 0..50 {
        let child = a.crossover(&b, &mut rng);
        // every gene comes from one of the parents
        for i in 0..GENE_COUNT {
            let gene = child.get(i).unwrap();
            assert!(gene == a.get(i).unwrap() || gene == b.get(i).unwrap());
        }
        assert_eq!(child.metrics().trade_count, 0);
    }

    assert_eq!(a, a_before);
    assert_eq!(b, b_before);
}

#[test]
fn test_mutate_rate_zero_is_identity() {
    let mut rng = StdRng::seed_from_u64(13);
    let mut vector = ParameterVector::random(&mut rng);
    let before = vector.clone();

    vector.mutate(0.0, &mut rng);
    assert_eq!(vector, before);
}

#[test]
fn test_mutate_rate_one_moves_genes() {
    let mut rng = StdRng::seed_from_u64(14);
    let mut vector = ParameterVector::random(&mut rng);
    let before = vector.clone();

    vector.mutate(1.0, &mut rng);

    let changed = (0..GENE_COUNT)
        .filter(|&i| vector.get(i).unwrap() != before.get(i).unwrap())
        .count();
    assert!(changed > GENE_COUNT / 2);
    assert!(in_range(&vector));
}

#[test]
fn test_set_clamps_and_checks_index() {
    let mut rng = StdRng::seed_from_u64(15);
    let mut vector = ParameterVector::random(&mut rng);

    vector.set(Gene::BrainThreshold.index(), 5.0).unwrap();
    assert_eq!(vector.gene(Gene::BrainThreshold), 0.9);

    vector.set(Gene::RiskSlAtr.index(), -3.0).unwrap();
    assert_eq!(vector.gene(Gene::RiskSlAtr), 0.5);

    assert!(matches!(
        vector.set(GENE_COUNT, 1.0),
        Err(EvobiasError::InvalidIndex { index: 40, .. })
    ));
    assert!(matches!(vector.get(99), Err(EvobiasError::InvalidIndex { .. })));
}

#[test]
fn test_extract_named() {
    let mut rng = StdRng::seed_from_u64(16);
    let vector = ParameterVector::random(&mut rng);

    assert_eq!(vector.extract_named("RSI_PERIOD").unwrap(), vector.get(2).unwrap());
    assert_eq!(vector.extract_named("WEIGHT_HYBRID").unwrap(), vector.get(39).unwrap());
    assert!(matches!(
        vector.extract_named("NOT_A_GENE"),
        Err(EvobiasError::UnknownParameter(name)) if name == "NOT_A_GENE"
    ));
}

#[test]
fn test_json_snapshot_clamps_on_load() {
    let mut genes = vec![0.0; GENE_COUNT];
    genes[Gene::MacdSlow.index()] = 99.0;
    let json = serde_json::json!({ "genes": genes }).to_string();

    let vector: ParameterVector = serde_json::from_str(&json).unwrap();
    assert_eq!(vector.gene(Gene::MacdSlow), 30.0);
    assert!(in_range(&vector));
}
