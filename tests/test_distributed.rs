use std::sync::mpsc;
use std::thread;
use std::time::Duration;

use genbit::{
    crossover::UniformCrossover,
    distributed::{LocalGroup, ProcessGroup},
    error::{GeneticError, Result},
    evolution::{Engine, EvolutionOptions, FitnessStore, GenerationObserver, LogLevel},
    individual::{Individual, ValueRange},
    mutation::FlipBitMutation,
    population::Population,
    rng::RandomNumberGenerator,
    selection::{Parents, RouletteWheelSelection, SelectionStrategy, TournamentSelection},
};

fn shared_start(size: usize) -> Population {
    let ranges = [ValueRange::new(0.0, 10.0), ValueRange::new(-1.0, 1.0)];
    let mut rng = RandomNumberGenerator::from_seed(2024);
    let individuals = (0..size)
        .map(|_| Individual::random_with_rng(&ranges, &[0.001, 0.01], &mut rng).unwrap())
        .collect();
    Population::new(individuals, |indv: &Individual| {
        let (x, y) = (indv.solution()[0], indv.solution()[1]);
        x + 10.0 * (5.0 * x).sin() + 7.0 * (4.0 * x).cos() - y * y
    })
    .unwrap()
}

/// Best fitness after every generation, recorded on every rank.
struct BestHistory(Vec<f64>);

impl GenerationObserver for BestHistory {
    fn leader_only(&self) -> bool {
        false
    }

    fn register_step(&mut self, _generation: usize, population: &Population) {
        self.0.push(population.best_fitness());
    }
}

struct RankOutcome {
    rank: usize,
    individuals: Vec<Individual>,
    best_history: Vec<f64>,
    records: usize,
}

/// Runs one engine per rank on its own thread.
fn run_ranks(
    ranks: usize,
    size: usize,
    generations: usize,
    options: EvolutionOptions,
) -> Vec<Result<RankOutcome>> {
    let groups = LocalGroup::create(ranks).unwrap();
    std::thread::scope(|scope| {
        let handles: Vec<_> = groups
            .iter()
            .map(|group| {
                let options = options.clone();
                scope.spawn(move || -> Result<RankOutcome> {
                    let mut population = shared_start(size);
                    let selection = RouletteWheelSelection::new();
                    let crossover = UniformCrossover::new(0.8, 0.5)?;
                    let mutation = FlipBitMutation::new(0.1)?;
                    let mut store = FitnessStore::new();

                    let mut history = BestHistory(vec![population.best_fitness()]);
                    Engine::new(&mut population, &selection, &crossover, &mutation)
                        .with_group(group)
                        .with_options(options)
                        .with_observer(&mut store)
                        .with_observer(&mut history)
                        .run(generations)?;

                    Ok(RankOutcome {
                        rank: group.rank(),
                        individuals: population.individuals().to_vec(),
                        best_history: history.0,
                        records: store.records().len(),
                    })
                })
            })
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    })
}

fn assert_ranks_agree(outcomes: &[RankOutcome]) {
    let reference = &outcomes[0];
    for outcome in &outcomes[1..] {
        assert_eq!(outcome.individuals, reference.individuals);
        assert_eq!(outcome.best_history, reference.best_history);
    }
}

#[test]
fn test_ranks_end_with_identical_populations() {
    let outcomes: Vec<_> = run_ranks(3, 24, 10, EvolutionOptions::default())
        .into_iter()
        .collect::<Result<_>>()
        .unwrap();

    assert_eq!(outcomes.len(), 3);
    assert_ranks_agree(&outcomes);
    for window in outcomes[0].best_history.windows(2) {
        assert!(window[1] >= window[0]);
    }
}

#[test]
fn test_odd_population_across_ranks() {
    let outcomes: Vec<_> = run_ranks(2, 11, 6, EvolutionOptions::default())
        .into_iter()
        .collect::<Result<_>>()
        .unwrap();

    assert_ranks_agree(&outcomes);
    assert_eq!(outcomes[0].individuals.len(), 11);
    let start = shared_start(11);
    let carried = &outcomes[0].individuals[10];
    assert_eq!(carried.chromosome(), start.individuals()[10].chromosome());
    assert_eq!(carried.solution(), start.individuals()[10].solution());
}

#[test]
fn test_more_ranks_than_pairs() {
    let outcomes: Vec<_> = run_ranks(4, 4, 3, EvolutionOptions::default())
        .into_iter()
        .collect::<Result<_>>()
        .unwrap();
    assert_ranks_agree(&outcomes);
}

#[test]
fn test_rayon_inside_each_rank() {
    let options = EvolutionOptions::new_with_threshold(5, LogLevel::Minimal, 1);
    let outcomes: Vec<_> = run_ranks(2, 40, 5, options)
        .into_iter()
        .collect::<Result<_>>()
        .unwrap();
    assert_ranks_agree(&outcomes);
}

#[test]
fn test_only_the_leader_observes() {
    let outcomes: Vec<_> = run_ranks(3, 12, 4, EvolutionOptions::default())
        .into_iter()
        .collect::<Result<_>>()
        .unwrap();
    for outcome in outcomes {
        let expected = if outcome.rank == 0 { 4 } else { 0 };
        assert_eq!(outcome.records, expected);
    }
}

#[test]
fn test_diverging_population_sizes_abort_every_rank() {
    let groups = LocalGroup::create(2).unwrap();
    let results: Vec<Result<()>> = std::thread::scope(|scope| {
        let handles: Vec<_> = groups
            .iter()
            .map(|group| {
                scope.spawn(move || -> Result<()> {
                    let mut population = shared_start(if group.is_leader() { 6 } else { 8 });
                    let before = population.individuals().to_vec();
                    let selection = RouletteWheelSelection::new();
                    let crossover = UniformCrossover::new(0.8, 0.5)?;
                    let mutation = FlipBitMutation::new(0.1)?;

                    let result = Engine::new(&mut population, &selection, &crossover, &mutation)
                        .with_group(group)
                        .run(1);
                    assert_eq!(population.individuals(), before.as_slice());
                    result
                })
            })
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });

    assert_eq!(results.len(), 2);
    for result in results {
        assert!(matches!(result, Err(GeneticError::Distributed(_))));
    }
}

/// Refuses to pick parents, standing in for an operator that breaks on one rank.
#[derive(Debug)]
struct RefusingSelection;

impl SelectionStrategy for RefusingSelection {
    fn select(&self, _population: &Population) -> Result<Parents> {
        Err(GeneticError::Evolution("selection refused".to_string()))
    }
}

fn oversized_tournament(_rank: usize) -> Box<dyn SelectionStrategy> {
    Box::new(TournamentSelection::new(4).unwrap())
}

fn refusing_leader(rank: usize) -> Box<dyn SelectionStrategy> {
    if rank == 0 {
        Box::new(RefusingSelection)
    } else {
        Box::new(RouletteWheelSelection::new())
    }
}

/// Runs one generation per rank on detached threads and collects each rank's
/// result, failing the test if any rank is still blocked after the timeout.
fn run_detached(
    ranks: usize,
    size: usize,
    selection_for: fn(usize) -> Box<dyn SelectionStrategy>,
) -> Vec<Result<()>> {
    let (sender, receiver) = mpsc::channel();
    for group in LocalGroup::create(ranks).unwrap() {
        let sender = sender.clone();
        thread::spawn(move || {
            let rank = group.rank();
            let result = (|| -> Result<()> {
                let mut population = shared_start(size);
                let before = population.individuals().to_vec();
                let selection = selection_for(rank);
                let crossover = UniformCrossover::new(0.8, 0.5)?;
                let mutation = FlipBitMutation::new(0.1)?;

                let result = Engine::new(&mut population, &*selection, &crossover, &mutation)
                    .with_group(&group)
                    .run(1);
                assert_eq!(population.individuals(), before.as_slice());
                result
            })();
            let _ = sender.send((rank, result));
        });
    }
    drop(sender);

    let mut results: Vec<Option<Result<()>>> = (0..ranks).map(|_| None).collect();
    for _ in 0..ranks {
        let (rank, result) = receiver
            .recv_timeout(Duration::from_secs(20))
            .expect("a rank is still blocked in the generation");
        results[rank] = Some(result);
    }
    results.into_iter().map(|result| result.unwrap()).collect()
}

#[test]
fn test_operator_error_with_an_idle_rank_does_not_hang() {
    // Four individuals give two pairs over three ranks: rank 2 breeds nothing.
    // A tournament as large as the population fails on both breeding ranks.
    let results = run_detached(3, 4, oversized_tournament);

    assert!(matches!(results[0], Err(GeneticError::InvalidConfiguration(_))));
    assert!(matches!(results[1], Err(GeneticError::InvalidConfiguration(_))));
    assert!(matches!(results[2], Err(GeneticError::Distributed(_))));
}

#[test]
fn test_single_failing_rank_releases_its_peers() {
    let results = run_detached(3, 4, refusing_leader);

    assert_eq!(
        results[0],
        Err(GeneticError::Evolution("selection refused".to_string()))
    );
    assert!(matches!(results[1], Err(GeneticError::Distributed(_))));
    assert!(matches!(results[2], Err(GeneticError::Distributed(_))));
}
