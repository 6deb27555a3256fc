use std::collections::BTreeMap;

use tracing::{debug, trace};

use stakepick_core_types::{
    AccountId, AddressEncoder, Criteria, EncodeError, Exclusion, ExposureRecord, IdentityRecord,
    ReportRow, SlashFlags, SuperOfRecord, Table, ValidatorRecord,
};

use crate::eligibility;
use crate::identity::IdentityResolver;

/// All tables of one run, already shaped.
///
/// The staking tables are read at a single block; the identity tables may
/// come from another chain and are used as-is.
#[derive(Clone, Debug, Default)]
pub struct Tables {
    pub validators: Vec<ValidatorRecord>,
    pub exposures: Table<ExposureRecord>,
    pub slashes: SlashFlags,
    pub identities: Table<IdentityRecord>,
    pub super_of: Table<SuperOfRecord>,
}

#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error("failed to encode address of validator {account_id}: {source}")]
    Encode {
        account_id: AccountId,
        source: EncodeError,
    },
}

/// A validator that passed the filter, with its display name and address.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EnrichedValidator {
    pub record: ValidatorRecord,
    pub display_name: Option<String>,
    pub address: String,
}

impl From<EnrichedValidator> for ReportRow {
    fn from(validator: EnrichedValidator) -> Self {
        ReportRow {
            display_name: validator.display_name,
            commission: validator.record.commission,
            address: validator.address,
            account_id: validator.record.account_id,
        }
    }
}

/// Counters describing one selection.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SelectionStats {
    /// Registered validators.
    pub total: usize,
    /// Validators with an exposure in the current era.
    pub active: usize,
    /// Validators that passed the filter.
    pub selected: usize,
    /// How many validators each rule excluded. A validator failing several
    /// rules is counted under each of them.
    pub exclusions: BTreeMap<Exclusion, usize>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Selection {
    pub rows: Vec<ReportRow>,
    pub stats: SelectionStats,
}

/// Filters, enriches and orders validators.
#[derive(Clone, Debug)]
pub struct Pipeline<E> {
    criteria: Criteria,
    encoder: E,
    network_prefix: u16,
}

impl<E> Pipeline<E>
where
    E: AddressEncoder,
{
    pub fn new(criteria: Criteria, encoder: E, network_prefix: u16) -> Self {
        Self {
            criteria,
            encoder,
            network_prefix,
        }
    }

    pub fn criteria(&self) -> &Criteria {
        &self.criteria
    }

    /// Validators that meet the criteria, in input order.
    pub fn filter<'a>(
        &self,
        tables: &'a Tables,
        stats: &mut SelectionStats,
    ) -> Vec<&'a ValidatorRecord> {
        let mut survivors = Vec::new();

        for validator in &tables.validators {
            let exposure = tables.exposures.lookup(&validator.account_id);
            let slashed = tables.slashes.is_slashed(&validator.account_id);

            if exposure.is_found() {
                stats.active += 1;
            }

            let reasons = eligibility::exclusions(&self.criteria, validator, exposure, slashed);
            if reasons.is_empty() {
                survivors.push(validator);
                continue;
            }

            debug!(account_id = %validator.account_id, ?reasons, "Excluding validator");
            for reason in reasons {
                *stats.exclusions.entry(reason).or_default() += 1;
            }
        }

        survivors
    }

    /// Attach the display name and address to a validator.
    pub fn enrich(
        &self,
        validator: &ValidatorRecord,
        identities: &IdentityResolver<'_>,
    ) -> Result<EnrichedValidator, PipelineError> {
        let display_name = identities.display_name(&validator.account_id);

        let address = self
            .encoder
            .encode(&validator.account_id, self.network_prefix)
            .map_err(|source| PipelineError::Encode {
                account_id: validator.account_id,
                source,
            })?;

        trace!(account_id = %validator.account_id, ?display_name, %address, "Enriched validator");

        Ok(EnrichedValidator {
            record: validator.clone(),
            display_name,
            address,
        })
    }

    /// Run the whole selection: filter, enrich, project and sort by commission.
    ///
    /// Validators with equal commission keep their input order.
    pub fn select(&self, tables: &Tables) -> Result<Selection, PipelineError> {
        let mut stats = SelectionStats {
            total: tables.validators.len(),
            ..SelectionStats::default()
        };

        let survivors = self.filter(tables, &mut stats);
        stats.selected = survivors.len();

        let identities = IdentityResolver::new(&tables.identities, &tables.super_of);

        let mut rows = survivors
            .into_iter()
            .map(|validator| self.enrich(validator, &identities).map(ReportRow::from))
            .collect::<Result<Vec<_>, _>>()?;

        rows.sort_by_key(|row| row.commission);

        Ok(Selection { rows, stats })
    }
}
