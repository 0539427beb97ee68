use vizij_keyframe_core::{
    extend_curve, extend_selected_objects, CurveError, CurveId, CurveStore, CycleOutcome,
    Keyframe, MemoryCurveStore, ObjectId, TangentInfo,
};
use vizij_test_fixtures::{curves, FixtureKey};

fn to_keyframe(key: &FixtureKey) -> Keyframe {
    let mut out = Keyframe::new(key.time, key.value);
    if let Some(t) = &key.tangent {
        out.tangent = TangentInfo::new(
            t.in_angle,
            t.out_angle,
            t.in_weight,
            t.out_weight,
            t.in_type.parse().expect("known tangent type"),
            t.out_type.parse().expect("known tangent type"),
        );
    }
    out
}

fn load_curve(store: &mut MemoryCurveStore, name: &str) -> (ObjectId, CurveId) {
    let fx = curves::fixture(name).expect("curve fixture");
    let obj = store.add_object(fx.object.clone());
    let keys = fx.keys.iter().map(to_keyframe).collect();
    let curve = store
        .add_curve(obj, fx.attribute.clone(), keys)
        .expect("fixture keys are ordered");
    (obj, curve)
}

fn times_of(store: &MemoryCurveStore, curve: CurveId) -> Vec<f64> {
    store.keyframes(curve).unwrap().iter().map(|k| k.time).collect()
}

fn values_of(store: &MemoryCurveStore, curve: CurveId) -> Vec<f64> {
    store.keyframes(curve).unwrap().iter().map(|k| k.value).collect()
}

#[test]
fn ramp_one_loop_continues_the_motion() {
    let mut store = MemoryCurveStore::new();
    let (_, curve) = load_curve(&mut store, "ramp");

    let outcome = extend_curve(&mut store, curve, 1).expect("extend");
    assert_eq!(
        outcome,
        CycleOutcome::Extended {
            curve,
            keys_added: 2
        }
    );
    assert_eq!(times_of(&store, curve), vec![0.0, 1.0, 2.0, 3.0, 4.0]);
    assert_eq!(values_of(&store, curve), vec![0.0, 2.0, 3.0, 5.0, 6.0]);
}

#[test]
fn key_count_grows_by_n_minus_one_per_loop() {
    for n in 2..7usize {
        for loops in 1..5usize {
            let mut store = MemoryCurveStore::new();
            let obj = store.add_object("ctrl");
            // Irregular but strictly increasing spacing.
            let keys = (0..n)
                .map(|k| Keyframe::new((k * k + k) as f64 * 0.5, (k as f64).sin()))
                .collect();
            let curve = store.add_curve(obj, "tx", keys).unwrap();

            extend_curve(&mut store, curve, loops).unwrap();

            let times = times_of(&store, curve);
            assert_eq!(times.len(), n + loops * (n - 1), "n={n} loops={loops}");
            assert!(
                times.windows(2).all(|w| w[1] > w[0]),
                "times must strictly increase for n={n} loops={loops}: {times:?}"
            );
        }
    }
}

#[test]
fn appended_values_follow_the_continuation_law() {
    let mut store = MemoryCurveStore::new();
    let (_, curve) = load_curve(&mut store, "bounce");
    let original = values_of(&store, curve);
    let n = original.len();

    extend_curve(&mut store, curve, 1).unwrap();
    let values = values_of(&store, curve);
    let appended = &values[n..];
    assert_eq!(appended.len(), n - 1);
    assert_eq!(appended[0], original[n - 1] + (original[1] - original[0]));
    for j in 1..appended.len() {
        let step = appended[j] - appended[j - 1];
        assert!((step - (original[j + 1] - original[j])).abs() < 1e-12);
    }
    assert_eq!(appended, &[11.0, 1.5, 5.0, 2.0]);
    assert_eq!(&times_of(&store, curve)[n..], &[27.0, 33.0, 37.0, 41.0]);
}

#[test]
fn later_loops_chain_from_the_latest_tail() {
    let mut store = MemoryCurveStore::new();
    let (_, curve) = load_curve(&mut store, "ramp");
    extend_curve(&mut store, curve, 3).unwrap();
    assert_eq!(
        times_of(&store, curve),
        vec![0.0, 1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0]
    );
    assert_eq!(
        values_of(&store, curve),
        vec![0.0, 2.0, 3.0, 5.0, 6.0, 8.0, 9.0, 11.0, 12.0]
    );
}

#[test]
fn seam_and_offset_tangents_are_written_for_every_loop() {
    let mut store = MemoryCurveStore::new();
    let (_, curve) = load_curve(&mut store, "bounce");
    let original: Vec<TangentInfo> = store
        .keyframes(curve)
        .unwrap()
        .iter()
        .map(|k| k.tangent)
        .collect();
    let n = original.len();
    let loops = 3;

    extend_curve(&mut store, curve, loops).unwrap();

    for index in 0..n {
        assert_eq!(store.query_tangent(curve, index).unwrap(), original[index]);
    }
    for i in 0..loops {
        let base = n + i * (n - 1);
        let seam = store.query_tangent(curve, base).unwrap();
        assert_eq!(seam.incoming, original[n - 1].incoming, "loop {i} seam in-side");
        assert_eq!(seam.outgoing, original[0].outgoing, "loop {i} seam out-side");
        for j in 1..(n - 1) {
            assert_eq!(
                store.query_tangent(curve, base + j).unwrap(),
                original[j],
                "loop {i} offset {j}"
            );
        }
    }
}

#[test]
fn curves_with_a_single_key_are_skipped() {
    let mut store = MemoryCurveStore::new();
    let (_, curve) = load_curve(&mut store, "single_key");
    let outcome = extend_curve(&mut store, curve, 2).unwrap();
    assert_eq!(outcome, CycleOutcome::Skipped { curve, found: 1 });
    assert_eq!(times_of(&store, curve), vec![4.0]);
    assert_eq!(store.undo_len(), 0, "nothing written");
}

#[test]
fn zero_loops_is_a_no_op() {
    let mut store = MemoryCurveStore::new();
    let (_, curve) = load_curve(&mut store, "ramp");
    let outcome = extend_curve(&mut store, curve, 0).unwrap();
    assert_eq!(
        outcome,
        CycleOutcome::Extended {
            curve,
            keys_added: 0
        }
    );
    assert_eq!(times_of(&store, curve).len(), 3);
}

#[test]
fn selected_objects_extend_in_one_undo_step() {
    let mut store = MemoryCurveStore::new();
    let (ramp_obj, ramp) = load_curve(&mut store, "ramp");
    let (single_obj, single) = load_curve(&mut store, "single_key");
    let (_, bounce) = load_curve(&mut store, "bounce");
    store.select_objects([ramp_obj, single_obj]);

    let report = extend_selected_objects(&mut store, 2).expect("batch");
    assert_eq!(report.extended, vec![ramp]);
    assert_eq!(report.skipped, vec![single]);
    assert_eq!(report.keys_added, 4);
    assert_eq!(times_of(&store, ramp).len(), 7);
    assert_eq!(times_of(&store, bounce).len(), 5, "unselected object untouched");

    assert_eq!(store.undo_len(), 1);
    assert!(store.undo());
    assert_eq!(times_of(&store, ramp), vec![0.0, 1.0, 2.0]);
}

#[test]
fn empty_object_selection_is_a_recoverable_warning() {
    let mut store = MemoryCurveStore::new();
    load_curve(&mut store, "ramp");
    let err = extend_selected_objects(&mut store, 1).unwrap_err();
    assert!(matches!(err, CurveError::NoSelection { .. }));
    assert!(err.is_recoverable());
    assert_eq!(store.undo_len(), 0);
}
