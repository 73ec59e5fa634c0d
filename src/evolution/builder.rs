use crate::{
    crossover::CrossoverStrategy,
    distributed::ProcessGroup,
    error::{GeneticError, Result},
    mutation::MutationStrategy,
    population::Population,
    selection::SelectionStrategy,
};

use super::{analysis::GenerationObserver, options::EvolutionOptions, Engine};

/// Assembles an [`Engine`] part by part.
///
/// The population and the three operators are required. The process group
/// defaults to a single process and the options to `EvolutionOptions::default()`.
pub struct EngineBuilder<'a> {
    population: Option<&'a mut Population>,
    selection: Option<&'a dyn SelectionStrategy>,
    crossover: Option<&'a dyn CrossoverStrategy>,
    mutation: Option<&'a dyn MutationStrategy>,
    group: Option<&'a dyn ProcessGroup>,
    options: Option<EvolutionOptions>,
    observers: Vec<&'a mut dyn GenerationObserver>,
}

impl<'a> EngineBuilder<'a> {
    pub fn new() -> Self {
        Self {
            population: None,
            selection: None,
            crossover: None,
            mutation: None,
            group: None,
            options: None,
            observers: Vec::new(),
        }
    }

    pub fn with_population(mut self, population: &'a mut Population) -> Self {
        self.population = Some(population);
        self
    }

    pub fn with_selection(mut self, selection: &'a dyn SelectionStrategy) -> Self {
        self.selection = Some(selection);
        self
    }

    pub fn with_crossover(mut self, crossover: &'a dyn CrossoverStrategy) -> Self {
        self.crossover = Some(crossover);
        self
    }

    pub fn with_mutation(mut self, mutation: &'a dyn MutationStrategy) -> Self {
        self.mutation = Some(mutation);
        self
    }

    pub fn with_group(mut self, group: &'a dyn ProcessGroup) -> Self {
        self.group = Some(group);
        self
    }

    pub fn with_options(mut self, options: EvolutionOptions) -> Self {
        self.options = Some(options);
        self
    }

    pub fn with_observer(mut self, observer: &'a mut dyn GenerationObserver) -> Self {
        self.observers.push(observer);
        self
    }

    pub fn build(self) -> Result<Engine<'a>> {
        let population = self.population.ok_or_else(|| {
            GeneticError::InvalidConfiguration("Population not specified".to_string())
        })?;

        let selection = self.selection.ok_or_else(|| {
            GeneticError::InvalidConfiguration("Selection strategy not specified".to_string())
        })?;

        let crossover = self.crossover.ok_or_else(|| {
            GeneticError::InvalidConfiguration("Crossover strategy not specified".to_string())
        })?;

        let mutation = self.mutation.ok_or_else(|| {
            GeneticError::InvalidConfiguration("Mutation strategy not specified".to_string())
        })?;

        let options = self.options.unwrap_or_default();
        options.validate()?;

        let mut engine = Engine::new(population, selection, crossover, mutation).with_options(options);
        if let Some(group) = self.group {
            engine = engine.with_group(group);
        }
        for observer in self.observers {
            engine = engine.with_observer(observer);
        }
        Ok(engine)
    }
}

impl Default for EngineBuilder<'_> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        crossover::UniformCrossover,
        evolution::{analysis::FitnessStore, LogLevel},
        individual::{Individual, ValueRange},
        mutation::FlipBitMutation,
        selection::RouletteWheelSelection,
    };

    fn population() -> Population {
        let template = Individual::broadcast(&[0.5], ValueRange::new(0.0, 1.0), 0.125).unwrap();
        Population::from_template(&template, 6, |indv: &Individual| indv.solution()[0]).unwrap()
    }

    #[test]
    fn test_missing_parts_are_reported() {
        let mut pop = population();
        let selection = RouletteWheelSelection::new();
        let crossover = UniformCrossover::new(0.5, 0.5).unwrap();

        let result = EngineBuilder::new()
            .with_population(&mut pop)
            .with_selection(&selection)
            .with_crossover(&crossover)
            .build();
        match result {
            Err(GeneticError::InvalidConfiguration(message)) => {
                assert!(message.contains("Mutation"))
            }
            other => panic!("expected a configuration error, got {:?}", other.map(|_| ())),
        }
    }

    #[test]
    fn test_missing_population() {
        assert!(matches!(
            EngineBuilder::default().build(),
            Err(GeneticError::InvalidConfiguration(_))
        ));
    }

    #[test]
    fn test_invalid_options_rejected() {
        let mut pop = population();
        let selection = RouletteWheelSelection::new();
        let crossover = UniformCrossover::new(0.5, 0.5).unwrap();
        let mutation = FlipBitMutation::new(0.1).unwrap();

        let result = EngineBuilder::new()
            .with_population(&mut pop)
            .with_selection(&selection)
            .with_crossover(&crossover)
            .with_mutation(&mutation)
            .with_options(EvolutionOptions::new_with_threshold(5, LogLevel::None, 0))
            .build();
        assert!(matches!(result, Err(GeneticError::InvalidConfiguration(_))));
    }

    #[test]
    fn test_complete_build_runs() {
        let mut pop = population();
        let selection = RouletteWheelSelection::new();
        let crossover = UniformCrossover::new(0.5, 0.5).unwrap();
        let mutation = FlipBitMutation::new(0.1).unwrap();
        let mut store = FitnessStore::new();

        let mut engine = EngineBuilder::new()
            .with_population(&mut pop)
            .with_selection(&selection)
            .with_crossover(&crossover)
            .with_mutation(&mutation)
            .with_options(EvolutionOptions::new(3, LogLevel::None))
            .with_observer(&mut store)
            .build()
            .unwrap();
        let result = engine.evolve().unwrap();
        assert_eq!(engine.generation(), 3);
        assert!((0.0..=1.0).contains(&result.individual.solution()[0]));
        drop(engine);

        assert_eq!(store.records().len(), 3);
    }
}
