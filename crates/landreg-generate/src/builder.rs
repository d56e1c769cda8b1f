use std::collections::HashMap;

use chrono::NaiveDate;
use rand::seq::IndexedRandom;
use serde_json::Value;
use tracing::debug;

use landreg_core::{
    Application, ApplicationField, ApplicationStatus, ApplicationTypeDefinition, CatalogError,
    TypeCatalog,
};

use crate::errors::GenerationError;
use crate::reference::ReferenceGenerator;
use crate::synthesizers::primitives::{DateAnchor, date_anchor, int_range_bounds};
use crate::synthesizers::{FieldValue, SynthesisContext, SynthesizerRegistry, ValueKind};

const PRIORITY_MIN: i64 = 1;
const PRIORITY_MAX: i64 = 5;

/// Composes catalog entries and synthesized fields into applications.
///
/// Every type in the catalog is checked against the synthesizer registry
/// when the builder is created, so schema problems surface here.
#[derive(Debug)]
pub struct ApplicationBuilder {
    registry: SynthesizerRegistry,
    plans: HashMap<u32, TypePlan>,
}

#[derive(Debug)]
struct TypePlan {
    name: String,
    fields: Vec<FieldPlan>,
}

#[derive(Debug)]
struct FieldPlan {
    field: ApplicationField,
    synthesizer: &'static str,
    params: Option<Value>,
}

impl ApplicationBuilder {
    pub fn new(catalog: &TypeCatalog, registry: SynthesizerRegistry) -> Result<Self, GenerationError> {
        let mut plans = HashMap::with_capacity(catalog.len());
        for definition in catalog.all() {
            let plan = compile_plan(catalog, &registry, definition)?;
            debug!(
                application_type = %definition.name,
                fields = plan.fields.len(),
                "synthesis plan compiled"
            );
            plans.insert(definition.id, plan);
        }
        Ok(Self { registry, plans })
    }

    /// Build one complete application of the given type.
    ///
    /// Either every field is synthesized and a reference issued, or an error
    /// is returned and nothing escapes.
    pub fn build(
        &self,
        definition: &ApplicationTypeDefinition,
        references: &mut ReferenceGenerator,
        rng: &mut dyn rand::RngCore,
        today: NaiveDate,
    ) -> Result<Application, GenerationError> {
        let plan = self
            .plans
            .get(&definition.id)
            .filter(|plan| plan.name == definition.name)
            .ok_or_else(|| CatalogError::UnknownType(definition.name.clone()))?;

        let mut draft = Draft::default();
        for field_plan in &plan.fields {
            let synthesizer = self.registry.synthesizer(field_plan.synthesizer).ok_or_else(|| {
                CatalogError::SchemaViolation(format!(
                    "synthesizer '{}' disappeared from the registry",
                    field_plan.synthesizer
                ))
            })?;
            let ctx = SynthesisContext {
                type_name: &definition.name,
                field: field_plan.field,
                today,
                submission_date: draft.submission_date,
            };
            let value = synthesizer.synthesize(&ctx, field_plan.params.as_ref(), rng)?;
            draft.assign(field_plan.field, value)?;
        }

        let form_used = definition
            .forms
            .choose(rng)
            .cloned()
            .ok_or_else(|| {
                CatalogError::InvalidCatalog(format!(
                    "application type '{}' has no forms",
                    definition.name
                ))
            })?;
        let reference = references.next(rng)?;

        draft.finish(reference, definition.id, form_used)
    }
}

fn compile_plan(
    catalog: &TypeCatalog,
    registry: &SynthesizerRegistry,
    definition: &ApplicationTypeDefinition,
) -> Result<TypePlan, GenerationError> {
    let violation = |field: ApplicationField, message: String| {
        GenerationError::Catalog(CatalogError::SchemaViolation(format!(
            "{}.{field}: {message}",
            definition.name
        )))
    };

    let schema = catalog.effective_schema(definition)?;
    let mut fields = Vec::with_capacity(schema.len());
    for (field, spec) in schema {
        let synthesizer = registry.synthesizer(&spec.synthesizer).ok_or_else(|| {
            violation(
                field,
                format!("no synthesizer registered as '{}'", spec.synthesizer),
            )
        })?;

        let expected = expected_kind(field);
        if synthesizer.value_kind() != expected {
            return Err(violation(
                field,
                format!(
                    "synthesizer '{}' produces {:?}, field needs {:?}",
                    spec.synthesizer,
                    synthesizer.value_kind(),
                    expected
                ),
            ));
        }

        synthesizer
            .validate_params(spec.params.as_ref())
            .map_err(|err| violation(field, err.to_string()))?;

        match field {
            ApplicationField::SubmissionDate
                if date_anchor(spec.params.as_ref()) != Some(DateAnchor::Today) =>
            {
                return Err(violation(field, "must be anchored on today".to_string()));
            }
            ApplicationField::ExpectedCompletionDate
                if date_anchor(spec.params.as_ref()) != Some(DateAnchor::SubmissionDate) =>
            {
                return Err(violation(
                    field,
                    "must be anchored on submission_date".to_string(),
                ));
            }
            ApplicationField::Priority => {
                let (min, max) = int_range_bounds(spec.params.as_ref())
                    .map_err(|err| violation(field, err.to_string()))?;
                if min < PRIORITY_MIN || max > PRIORITY_MAX {
                    return Err(violation(
                        field,
                        format!("bounds must lie within {PRIORITY_MIN}..={PRIORITY_MAX}"),
                    ));
                }
            }
            _ => {}
        }

        fields.push(FieldPlan {
            field,
            synthesizer: synthesizer.id(),
            params: spec.params,
        });
    }

    Ok(TypePlan {
        name: definition.name.clone(),
        fields,
    })
}

fn expected_kind(field: ApplicationField) -> ValueKind {
    match field {
        ApplicationField::PropertyAddress
        | ApplicationField::Lender
        | ApplicationField::ReasonForCorrection => ValueKind::Text,
        ApplicationField::Applicants => ValueKind::TextList,
        ApplicationField::SubmissionDate | ApplicationField::ExpectedCompletionDate => {
            ValueKind::Date
        }
        ApplicationField::Status => ValueKind::Status,
        ApplicationField::Priority => ValueKind::Int,
        ApplicationField::LoanAmount => ValueKind::Money,
    }
}

/// Field values collected while an application is being built.
#[derive(Debug, Default)]
struct Draft {
    property_address: Option<String>,
    applicants: Option<Vec<String>>,
    submission_date: Option<NaiveDate>,
    expected_completion_date: Option<NaiveDate>,
    status: Option<ApplicationStatus>,
    priority: Option<u8>,
    lender: Option<String>,
    loan_amount: Option<u64>,
    reason_for_correction: Option<String>,
}

impl Draft {
    fn assign(&mut self, field: ApplicationField, value: FieldValue) -> Result<(), GenerationError> {
        match (field, value) {
            (ApplicationField::PropertyAddress, FieldValue::Text(value)) => {
                self.property_address = Some(value)
            }
            (ApplicationField::Applicants, FieldValue::TextList(value)) => {
                if value.is_empty() {
                    return Err(GenerationError::Synthesis(
                        "applicants must not be empty".to_string(),
                    ));
                }
                self.applicants = Some(value)
            }
            (ApplicationField::SubmissionDate, FieldValue::Date(value)) => {
                self.submission_date = Some(value)
            }
            (ApplicationField::ExpectedCompletionDate, FieldValue::Date(value)) => {
                self.expected_completion_date = Some(value)
            }
            (ApplicationField::Status, FieldValue::Status(value)) => self.status = Some(value),
            (ApplicationField::Priority, FieldValue::Int(value)) => {
                let priority = u8::try_from(value)
                    .ok()
                    .filter(|p| (PRIORITY_MIN..=PRIORITY_MAX).contains(&i64::from(*p)))
                    .ok_or_else(|| {
                        GenerationError::Synthesis(format!("priority {value} out of range"))
                    })?;
                self.priority = Some(priority)
            }
            (ApplicationField::Lender, FieldValue::Text(value)) => self.lender = Some(value),
            (ApplicationField::LoanAmount, FieldValue::Money(value)) => {
                self.loan_amount = Some(value)
            }
            (ApplicationField::ReasonForCorrection, FieldValue::Text(value)) => {
                self.reason_for_correction = Some(value)
            }
            (field, value) => {
                return Err(GenerationError::Synthesis(format!(
                    "{field}: unexpected {:?} value",
                    value.kind()
                )));
            }
        }
        Ok(())
    }

    fn finish(
        self,
        reference: String,
        application_type_id: u32,
        form_used: String,
    ) -> Result<Application, GenerationError> {
        let submission_date = required(self.submission_date, ApplicationField::SubmissionDate)?;
        let expected_completion_date = required(
            self.expected_completion_date,
            ApplicationField::ExpectedCompletionDate,
        )?;
        if expected_completion_date <= submission_date {
            return Err(GenerationError::Synthesis(format!(
                "completion {expected_completion_date} does not follow submission {submission_date}"
            )));
        }

        Ok(Application {
            reference,
            application_type_id,
            property_address: required(self.property_address, ApplicationField::PropertyAddress)?,
            applicants: required(self.applicants, ApplicationField::Applicants)?,
            submission_date,
            expected_completion_date,
            status: required(self.status, ApplicationField::Status)?,
            priority: required(self.priority, ApplicationField::Priority)?,
            form_used,
            lender: self.lender,
            loan_amount: self.loan_amount,
            reason_for_correction: self.reason_for_correction,
        })
    }
}

fn required<T>(value: Option<T>, field: ApplicationField) -> Result<T, GenerationError> {
    value.ok_or_else(|| {
        GenerationError::Catalog(CatalogError::SchemaViolation(format!(
            "required field '{field}' was not synthesized"
        )))
    })
}
