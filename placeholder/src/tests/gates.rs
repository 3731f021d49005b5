use crate::{
    circuits::{
        expr::{constant, EvaluationMap, Expr},
        gate::{Gate, LookupConstraint},
        variable::{ColumnType, Variable},
    },
    gates_argument::{verify_eval, DegreeBuckets},
    tests::framework::{TestFramework, TestRunner},
    transcript::{Blake2Transcript, Transcript},
};
use ark_bn254::Fr;
use ark_ff::{Field, One, UniformRand, Zero};
use ark_poly::{EvaluationDomain, Polynomial};
use rand::{rngs::StdRng, SeedableRng};

fn w(i: usize, rot: i32) -> Expr<Fr> {
    Variable::witness(i, rot).into()
}

fn c(i: usize) -> Expr<Fr> {
    Variable::constant(i, 0).into()
}

fn column(values: &[u64]) -> Vec<Fr> {
    values.iter().map(|x| Fr::from(*x)).collect()
}

fn addition_runner(sum: Vec<Fr>) -> TestRunner<Fr> {
    TestFramework::default()
        .gates(vec![Gate::new(0, vec![w(0, 0) + w(1, 0) - w(2, 0)])])
        .witnesses(vec![column(&[1, 2, 3, 4]), column(&[5, 6, 7, 8]), sum])
        .selectors(vec![column(&[1, 1, 1, 1])])
        .setup()
}

#[test]
fn addition_gate_vanishes_on_rows() {
    let runner = addition_runner(column(&[6, 8, 10, 12]));
    let f = runner.gate_evaluations();

    // degree 2 once selected: a single bucket twice as large as the rows
    assert_eq!(f.domain().size(), 8);
    for row in 0..4 {
        assert!(f.evals[2 * row].is_zero(), "row {row}");
    }
    assert_eq!(runner.prove_and_verify(), Ok(()));
}

#[test]
fn addition_gate_detects_violated_row() {
    let runner = addition_runner(column(&[6, 9, 10, 12]));
    let f = runner.gate_evaluations();

    assert!(!f.evals[2].is_zero());
    for row in [0, 2, 3] {
        assert!(f.evals[2 * row].is_zero(), "row {row}");
    }
    assert!(runner.prove_and_verify().is_err());
}

#[test]
fn no_gates() {
    let runner = TestFramework::default()
        .witnesses(vec![column(&[1, 2, 3, 4])])
        .selectors(vec![column(&[0, 0, 0, 0])])
        .setup();
    let f = runner.gate_evaluations();
    assert_eq!(f.domain().size(), 4);
    assert!(f.evals.iter().all(|x| x.is_zero()));
    assert_eq!(runner.prove_and_verify(), Ok(()));
}

/// A boolean check, a cube, a product with a constant read one row ahead and
/// a linear check on the constant. Spans both buckets of the default
/// configuration.
fn mixed_degree_framework(rng: &mut StdRng) -> TestFramework<Fr> {
    const ROWS: usize = 8;
    let bits = column(&[0, 1, 1, 0, 1, 0, 0, 1]);
    let cubed_base: Vec<Fr> = (0..ROWS).map(|_| Fr::rand(rng)).collect();
    let cubes = cubed_base.iter().map(|x| x.pow([3])).collect();
    let shifted_bits = (0..ROWS).map(|row| bits[(row + 1) % ROWS]).collect();

    let gates = vec![
        Gate::new(
            0,
            vec![
                w(1, 0) * (w(1, 0) - Expr::one()),
                w(2, 0).pow(3) - w(3, 0),
            ],
        ),
        Gate::new(1, vec![w(0, 0) * c(0) - w(1, 1), c(0) - Expr::one()]),
    ];

    TestFramework::default()
        .gates(gates)
        .witnesses(vec![shifted_bits, bits, cubed_base, cubes])
        .constants(vec![vec![Fr::one(); ROWS]])
        .selectors(vec![vec![Fr::one(); ROWS], vec![Fr::one(); ROWS]])
}

#[test]
fn mixed_degrees() {
    let mut rng = StdRng::seed_from_u64(0);
    let runner = mixed_degree_framework(&mut rng).setup();
    assert_eq!(runner.cs().max_gates_degree(), 4);

    let buckets = DegreeBuckets::new(runner.cs().max_gates_degree(), 2);
    assert_eq!(buckets.limits(), &[4, 2]);
    assert_eq!(runner.gate_evaluations().domain().size(), 32);
    assert_eq!(runner.prove_and_verify(), Ok(()));
}

#[test]
fn bucket_count_does_not_change_the_polynomial() {
    let reference = {
        let mut rng = StdRng::seed_from_u64(1);
        mixed_degree_framework(&mut rng).setup().gate_polynomial()
    };
    for buckets in [1, 3, 5] {
        let mut rng = StdRng::seed_from_u64(1);
        let runner = mixed_degree_framework(&mut rng).buckets(buckets).setup();
        assert_eq!(runner.gate_polynomial(), reference, "{buckets} buckets");
        assert_eq!(runner.prove_and_verify(), Ok(()));
    }
}

#[test]
fn verifier_matches_prover_on_invalid_witness() {
    let mut rng = StdRng::seed_from_u64(2);
    let runner = mixed_degree_framework(&mut rng)
        .witnesses(vec![
            (0..8).map(|_| Fr::rand(&mut rng)).collect(),
            (0..8).map(|_| Fr::rand(&mut rng)).collect(),
            (0..8).map(|_| Fr::rand(&mut rng)).collect(),
            (0..8).map(|_| Fr::rand(&mut rng)).collect(),
        ])
        .setup();

    let poly = runner.gate_polynomial();
    let zeta = Fr::rand(&mut rng);
    let [expected] = verify_eval(
        runner.cs().gates(),
        &runner.evaluation_map(zeta),
        zeta,
        &mut runner.transcript(),
    );
    assert_eq!(poly.evaluate(&zeta), expected);
    assert!(runner.prove_and_verify().is_err());
}

#[test]
fn lookups_are_not_part_of_the_gate_argument() {
    let mut rng = StdRng::seed_from_u64(3);
    let without = mixed_degree_framework(&mut rng).setup();

    let mut rng = StdRng::seed_from_u64(3);
    let lookup = Gate::new(
        0,
        vec![LookupConstraint::new(
            vec![w(2, 0) * w(2, 0) * w(2, 0)],
            vec![Variable::witness(3, 0)],
        )],
    );
    let with = mixed_degree_framework(&mut rng)
        .lookup_gates(vec![lookup])
        .setup();

    assert_eq!(with.cs().max_gates_degree(), without.cs().max_gates_degree());
    let theta_free = |runner: &TestRunner<Fr>| {
        let mut transcript = Blake2Transcript::new(b"fixed");
        let [f] = crate::gates_argument::prove_eval(
            runner.cs(),
            &runner.polynomial_table(),
            runner.domain(),
            &Default::default(),
            &mut transcript,
        );
        f
    };
    assert_eq!(theta_free(&with), theta_free(&without));
}

#[test]
#[should_panic(expected = "no evaluation provided for selector 1")]
fn missing_selector_evaluation() {
    let mut rng = StdRng::seed_from_u64(4);
    let runner = mixed_degree_framework(&mut rng).setup();
    let zeta = Fr::rand(&mut rng);
    let mut evaluations = runner.evaluation_map(zeta);
    evaluations.remove(&(1, 0, ColumnType::Selector));
    verify_eval(
        runner.cs().gates(),
        &evaluations,
        zeta,
        &mut Blake2Transcript::new(b"fixed"),
    );
}

#[test]
fn verifier_weights_constraints_by_theta() {
    // with all constraints evaluating to 1 and selectors to 1, the verifier
    // returns 1 + theta + theta^2 + ...
    let gates = vec![
        Gate::new(0, vec![constant(Fr::one()), constant(Fr::one())]),
        Gate::new(1, vec![constant(Fr::one())]),
    ];
    let evaluations: EvaluationMap<Fr> = [
        ((0, 0, ColumnType::Selector), Fr::one()),
        ((1, 0, ColumnType::Selector), Fr::one()),
    ]
    .into_iter()
    .collect();

    let mut transcript = Blake2Transcript::new(b"theta");
    let theta: Fr = transcript.clone().challenge();
    let [f] = verify_eval(&gates, &evaluations, Fr::zero(), &mut transcript);
    assert_eq!(f, Fr::one() + theta + theta.square());
}

#[test]
fn many_gates() {
    // one single-constraint gate per term, all under selector 0
    const GATES: usize = 5000;
    let gates = (0..GATES)
        .map(|i| {
            let scale = Expr::from((i + 1) as u64);
            Gate::new(0, vec![w(i % 4, (i % 3) as i32) * scale - w((i + 1) % 4, 0)])
        })
        .collect();

    let mut rng = StdRng::seed_from_u64(5);
    let runner = TestFramework::default()
        .gates(gates)
        .witnesses(
            (0..4)
                .map(|_| (0..4).map(|_| Fr::rand(&mut rng)).collect())
                .collect(),
        )
        .selectors(vec![column(&[1, 1, 1, 0])])
        .setup();
    assert_eq!(runner.cs().num_gates(), GATES);

    let poly = runner.gate_polynomial();
    let zeta = Fr::rand(&mut rng);
    let [expected] = verify_eval(
        runner.cs().gates(),
        &runner.evaluation_map(zeta),
        zeta,
        &mut runner.transcript(),
    );
    assert_eq!(poly.evaluate(&zeta), expected);
}
