use proptest::prelude::*;
use std::collections::BTreeMap;

use sitesearch_query::similarity::sparse_dot;

fn sparse() -> impl Strategy<Value = BTreeMap<u32, f64>> {
    prop::collection::btree_map(0u32..64, -10.0f64..10.0, 0..24)
}

fn dense(v: &BTreeMap<u32, f64>) -> Vec<f64> {
    let mut out = vec![0.0; 64];
    for (&i, &x) in v {
        out[i as usize] = x;
    }
    out
}

proptest! {
    #[test]
    fn merge_join_matches_dense_dot(a in sparse(), b in sparse()) {
        let (ai, av): (Vec<u32>, Vec<f64>) = a.iter().map(|(&i, &v)| (i, v)).unzip();
        let (bi, bv): (Vec<u32>, Vec<f64>) = b.iter().map(|(&i, &v)| (i, v)).unzip();
        let expected: f64 = dense(&a).iter().zip(dense(&b)).map(|(x, y)| x * y).sum();
        let got = sparse_dot(&ai, &av, &bi, &bv);
        prop_assert!((got - expected).abs() < 1e-9, "{} vs {}", got, expected);
    }

    #[test]
    fn dot_is_symmetric(a in sparse(), b in sparse()) {
        let (ai, av): (Vec<u32>, Vec<f64>) = a.iter().map(|(&i, &v)| (i, v)).unzip();
        let (bi, bv): (Vec<u32>, Vec<f64>) = b.iter().map(|(&i, &v)| (i, v)).unzip();
        prop_assert!((sparse_dot(&ai, &av, &bi, &bv) - sparse_dot(&bi, &bv, &ai, &av)).abs() < 1e-9);
    }
}
