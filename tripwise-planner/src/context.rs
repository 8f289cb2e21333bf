use std::sync::Arc;

use tripwise_core::{Llm, Retrying, SimilaritySearch};

use crate::{FlightLookup, PlannerConfig, PlannerPrompts, StubFlightLookup, StubWeatherLookup, WeatherLookup};

/// Everything the workflow nodes call out to, built once and shared.
///
/// The LLM and similarity search are wrapped in the configured retry policy
/// when the context is created.
pub struct PlannerContext {
    pub(crate) llm: Arc<dyn Llm>,
    pub(crate) search: Arc<dyn SimilaritySearch>,
    pub(crate) flight: Arc<dyn FlightLookup>,
    pub(crate) weather: Arc<dyn WeatherLookup>,
    pub(crate) prompts: PlannerPrompts,
    pub(crate) config: PlannerConfig,
}

impl PlannerContext {
    pub fn new<L, S>(llm: L, search: S, config: PlannerConfig) -> Self
    where
        L: Llm + 'static,
        S: SimilaritySearch + 'static,
    {
        Self {
            llm: Arc::new(Retrying::new(llm, config.retry)),
            search: Arc::new(Retrying::new(search, config.retry)),
            flight: Arc::new(StubFlightLookup),
            weather: Arc::new(StubWeatherLookup),
            prompts: PlannerPrompts::default(),
            config,
        }
    }

    pub fn with_flight_lookup(mut self, flight: impl FlightLookup + 'static) -> Self {
        self.flight = Arc::new(flight);
        self
    }

    pub fn with_weather_lookup(mut self, weather: impl WeatherLookup + 'static) -> Self {
        self.weather = Arc::new(weather);
        self
    }

    pub fn with_prompts(mut self, prompts: PlannerPrompts) -> Self {
        self.prompts = prompts;
        self
    }

    pub fn config(&self) -> &PlannerConfig {
        &self.config
    }
}
