use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use super::dataset::{DatasetError, DatasetProvider, DatasetRequest, DatasetResults, RawDataset};
use super::{
    builtin_recipes, Recipe, RecipeAlias, RecipeError, RecipeOutput, RecipeParameters,
};

#[derive(Debug, thiserror::Error)]
pub enum RecipeManagerError {
    #[error("recipe '{0}' is not registered")]
    UnknownRecipe(RecipeAlias),
    #[error(transparent)]
    Dataset(#[from] DatasetError),
    #[error("recipe '{alias}' failed: {source}")]
    Recipe {
        alias: RecipeAlias,
        #[source]
        source: RecipeError,
    },
}

/// Runs recipes: resolves the declared datasets through the provider, caches
/// them by cache key, then transforms.
pub struct RecipeManager<P> {
    provider: Arc<P>,
    recipes: HashMap<RecipeAlias, Box<dyn Recipe>>,
    cache: Mutex<HashMap<String, Arc<RawDataset>>>,
}

impl<P> RecipeManager<P>
where
    P: DatasetProvider,
{
    /// Manager with every built-in recipe registered.
    pub fn new(provider: Arc<P>) -> Self {
        let mut manager = Self::empty(provider);
        for recipe in builtin_recipes() {
            manager.register(recipe);
        }
        manager
    }

    pub fn empty(provider: Arc<P>) -> Self {
        Self {
            provider,
            recipes: HashMap::new(),
            cache: Mutex::new(HashMap::new()),
        }
    }

    /// Registers `recipe`, replacing any recipe with the same alias.
    pub fn register(&mut self, recipe: Box<dyn Recipe>) {
        self.recipes.insert(recipe.alias(), recipe);
    }

    pub fn aliases(&self) -> Vec<RecipeAlias> {
        let mut aliases: Vec<RecipeAlias> = self.recipes.keys().copied().collect();
        aliases.sort();
        aliases
    }

    fn recipe(&self, alias: RecipeAlias) -> Result<&dyn Recipe, RecipeManagerError> {
        self.recipes
            .get(&alias)
            .map(Box::as_ref)
            .ok_or(RecipeManagerError::UnknownRecipe(alias))
    }

    fn requests(
        &self,
        alias: RecipeAlias,
        parameters: &RecipeParameters,
    ) -> Result<Vec<DatasetRequest>, RecipeManagerError> {
        self.recipe(alias)?
            .extract(parameters)
            .map_err(|source| RecipeManagerError::Recipe { alias, source })
    }

    fn dataset(&self, request: &DatasetRequest) -> Result<Arc<RawDataset>, RecipeManagerError> {
        let cache_key = request.cache_key();
        if let Some(hit) = self
            .cache
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&cache_key)
            .cloned()
        {
            tracing::debug!(cache_key = %cache_key, "dataset cache hit");
            return Ok(hit);
        }

        tracing::debug!(cache_key = %cache_key, "dataset cache miss");
        let fetched = Arc::new(self.provider.fetch(request)?);
        self.cache
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(cache_key, Arc::clone(&fetched));
        Ok(fetched)
    }

    pub fn run(
        &self,
        alias: RecipeAlias,
        parameters: &RecipeParameters,
    ) -> Result<RecipeOutput, RecipeManagerError> {
        let span = tracing::info_span!("recipe", alias = %alias);
        let _entered = span.enter();

        let requests = self.requests(alias, parameters)?;
        let mut datasets = DatasetResults::new();
        for request in &requests {
            datasets.insert(request.alias, self.dataset(request)?);
        }

        let output = self
            .recipe(alias)?
            .transform(&datasets, parameters)
            .map_err(|source| RecipeManagerError::Recipe { alias, source })?;
        tracing::info!(
            datasets = requests.len(),
            output = output.kind(),
            "recipe completed"
        );
        Ok(output)
    }

    /// Drops the cached datasets `alias` would read with `parameters`.
    pub fn clean(
        &self,
        alias: RecipeAlias,
        parameters: &RecipeParameters,
    ) -> Result<usize, RecipeManagerError> {
        let requests = self.requests(alias, parameters)?;
        let mut cache = self.cache.lock().unwrap_or_else(PoisonError::into_inner);
        let removed = requests
            .iter()
            .filter(|request| cache.remove(&request.cache_key()).is_some())
            .count();
        tracing::debug!(alias = %alias, removed, "dataset cache cleaned");
        Ok(removed)
    }

    pub fn cached_keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = self
            .cache
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .keys()
            .cloned()
            .collect();
        keys.sort();
        keys
    }
}
