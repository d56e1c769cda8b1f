use std::time::Instant;

use chrono::NaiveDate;
use rand::SeedableRng;
use rand::distr::Distribution;
use rand::distr::weighted::WeightedIndex;
use rand::seq::IndexedRandom;
use rand_chacha::ChaCha8Rng;
use tracing::{info, warn};

use landreg_core::{Application, ApplicationTypeDefinition, CatalogError, TypeCatalog};

use crate::builder::ApplicationBuilder;
use crate::errors::GenerationError;
use crate::model::{GenerateOptions, GenerationReport, GenerationResult, TypeWeighting};
use crate::reference::ReferenceGenerator;
use crate::synthesizers::SynthesizerRegistry;

/// Entry point for generating batches of applications from a type catalog.
///
/// Each call to `generate_random` or `generate_by_type` is an independent
/// session with its own seeded RNG and reference generator.
#[derive(Debug)]
pub struct GenerationEngine<'a> {
    catalog: &'a TypeCatalog,
    builder: ApplicationBuilder,
    options: GenerateOptions,
    /// Per-type selection weights, in catalog order; `None` for uniform.
    type_index: Option<WeightedIndex<f64>>,
}

impl<'a> GenerationEngine<'a> {
    pub fn new(catalog: &'a TypeCatalog, options: GenerateOptions) -> Result<Self, GenerationError> {
        Self::with_registry(catalog, SynthesizerRegistry::new(), options)
    }

    pub fn with_registry(
        catalog: &'a TypeCatalog,
        registry: SynthesizerRegistry,
        options: GenerateOptions,
    ) -> Result<Self, GenerationError> {
        let type_index = type_index(catalog, &options.weighting)?;
        let builder = ApplicationBuilder::new(catalog, registry)?;
        Ok(Self {
            catalog,
            builder,
            options,
            type_index,
        })
    }

    pub fn options(&self) -> &GenerateOptions {
        &self.options
    }

    /// Generate `total` applications, picking each type per the configured
    /// weighting.
    pub fn generate_random(&self, total: usize) -> Result<GenerationResult, GenerationError> {
        self.run("random", |session| {
            info!(total, "generating random applications");
            for _ in 0..total {
                let definition = self.pick_type(&mut session.rng)?;
                session.build(&self.builder, definition)?;
            }
            Ok(())
        })
    }

    /// Generate exactly `count` applications for each `(type name, count)`
    /// pair, in the given order.
    ///
    /// Every name is resolved before anything is generated; an unknown name
    /// fails the whole call.
    pub fn generate_by_type<S: AsRef<str>>(
        &self,
        counts: &[(S, usize)],
    ) -> Result<GenerationResult, GenerationError> {
        let resolved = counts
            .iter()
            .map(|(name, count)| Ok((self.catalog.lookup_by_name(name.as_ref())?, *count)))
            .collect::<Result<Vec<_>, CatalogError>>()?;

        self.run("by_type", |session| {
            for (definition, count) in &resolved {
                session
                    .report
                    .record_requested(definition.id, &definition.name, *count as u64);
            }
            for (definition, count) in resolved {
                info!(
                    application_type = %definition.name,
                    count,
                    "generating applications"
                );
                for _ in 0..count {
                    session.build(&self.builder, definition)?;
                }
            }
            Ok(())
        })
    }

    fn run<F>(&self, mode: &str, body: F) -> Result<GenerationResult, GenerationError>
    where
        F: FnOnce(&mut Session) -> Result<(), GenerationError>,
    {
        let start = Instant::now();
        let run_id = uuid::Uuid::new_v4().to_string();
        let seed = self.options.seed.unwrap_or_else(rand::random);
        let today = self
            .options
            .today
            .unwrap_or_else(|| chrono::Local::now().date_naive());

        info!(run_id = %run_id, seed, %today, mode, "generation started");

        let mut session = Session {
            rng: ChaCha8Rng::seed_from_u64(seed),
            references: ReferenceGenerator::new(self.options.max_reference_attempts),
            report: GenerationReport::new(run_id.clone(), seed, today, mode),
            applications: Vec::new(),
            today,
        };

        if let Err(err) = body(&mut session) {
            warn!(run_id = %run_id, error = %err, "generation failed");
            return Err(err);
        }

        let Session {
            applications,
            mut report,
            references,
            ..
        } = session;
        report.references_issued = references.issued() as u64;
        report.duration_ms = start.elapsed().as_millis() as u64;

        info!(
            run_id = %run_id,
            applications = applications.len(),
            duration_ms = report.duration_ms,
            "generation completed"
        );

        Ok(GenerationResult {
            applications,
            report,
        })
    }

    fn pick_type(&self, rng: &mut ChaCha8Rng) -> Result<&'a ApplicationTypeDefinition, GenerationError> {
        let types = self.catalog.all();
        let picked = match &self.type_index {
            None => types.choose(rng),
            Some(index) => types.get(index.sample(rng)),
        };
        picked.ok_or_else(|| {
            GenerationError::Catalog(CatalogError::InvalidCatalog(
                "no application type can be selected".to_string(),
            ))
        })
    }
}

struct Session {
    rng: ChaCha8Rng,
    references: ReferenceGenerator,
    report: GenerationReport,
    applications: Vec<Application>,
    today: NaiveDate,
}

impl Session {
    fn build(
        &mut self,
        builder: &ApplicationBuilder,
        definition: &ApplicationTypeDefinition,
    ) -> Result<(), GenerationError> {
        let application = builder.build(definition, &mut self.references, &mut self.rng, self.today)?;
        self.report.record_application(&definition.name, &application);
        self.applications.push(application);
        Ok(())
    }
}

fn type_index(
    catalog: &TypeCatalog,
    weighting: &TypeWeighting,
) -> Result<Option<WeightedIndex<f64>>, GenerationError> {
    let TypeWeighting::Category { core, additional } = weighting else {
        return Ok(None);
    };
    for (label, weight) in [("core", core), ("additional", additional)] {
        if !weight.is_finite() || *weight < 0.0 {
            return Err(GenerationError::InvalidParams(format!(
                "weighting: {label} weight must be a non-negative number"
            )));
        }
    }

    let weights: Vec<f64> = catalog
        .all()
        .iter()
        .map(|definition| {
            let members = catalog.list_by_category(definition.category).len().max(1);
            weighting.category_weight(definition.category) / members as f64
        })
        .collect();
    if !weights.iter().any(|weight| *weight > 0.0) {
        return Err(GenerationError::InvalidParams(
            "weighting: no application type has a positive weight".to_string(),
        ));
    }
    // WeightedIndex panics rather than erroring on an infinite total.
    if !weights.iter().sum::<f64>().is_finite() {
        return Err(GenerationError::InvalidParams(
            "weighting: combined weight is too large".to_string(),
        ));
    }

    WeightedIndex::new(&weights)
        .map(Some)
        .map_err(|err| GenerationError::InvalidParams(format!("weighting: {err}")))
}
