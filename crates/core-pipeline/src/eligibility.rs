//! Health criteria a validator must meet to be selected.

use stakepick_core_types::{Criteria, Exclusion, ExposureRecord, Lookup, ValidatorRecord};

/// Every reason the given validator fails the criteria. Empty when eligible.
///
/// The conditions are independent: all applicable reasons are reported, in
/// the order of [`Exclusion::ALL`].
pub fn exclusions(
    criteria: &Criteria,
    validator: &ValidatorRecord,
    exposure: Lookup<'_, ExposureRecord>,
    slashed: bool,
) -> Vec<Exclusion> {
    let mut reasons = Vec::new();

    if validator.blocked {
        reasons.push(Exclusion::BlockedNominations);
    }

    if validator.commission > criteria.max_commission {
        reasons.push(Exclusion::UnhealthyCommission);
    }

    match exposure {
        Lookup::Absent => reasons.push(Exclusion::NotActive),
        Lookup::Found(exposure) => {
            if exposure.nominator_count >= criteria.max_nominators {
                reasons.push(Exclusion::OverSubscribed);
            }
            if exposure.own < criteria.min_own_stake {
                reasons.push(Exclusion::UnhealthyOwnStake);
            }
        }
    }

    if slashed {
        reasons.push(Exclusion::SlashedBefore);
    }

    reasons.sort();
    reasons
}

/// Whether the validator meets the given criteria.
pub fn meets(
    criteria: &Criteria,
    validator: &ValidatorRecord,
    exposure: Lookup<'_, ExposureRecord>,
    slashed: bool,
) -> bool {
    exclusions(criteria, validator, exposure, slashed).is_empty()
}

/// Whether the validator meets the default criteria.
pub fn is_eligible(
    validator: &ValidatorRecord,
    exposure: Option<&ExposureRecord>,
    slashed: bool,
) -> bool {
    meets(&Criteria::default(), validator, exposure.into(), slashed)
}

#[cfg(test)]
mod tests {
    use stakepick_core_types::{AccountId, UNIT};

    use super::*;
    use Exclusion::*;

    fn validator(commission: u32, blocked: bool) -> ValidatorRecord {
        ValidatorRecord {
            account_id: AccountId::new([1; 32]),
            commission,
            blocked,
        }
    }

    fn exposure(own: u128, nominator_count: u32) -> ExposureRecord {
        ExposureRecord {
            own,
            nominator_count,
        }
    }

    const HEALTHY_OWN: u128 = 20_000 * UNIT;

    struct TestCase {
        name: &'static str,
        validator: ValidatorRecord,
        exposure: Option<ExposureRecord>,
        slashed: bool,
        expected: &'static [Exclusion],
    }

    #[test]
    fn exclusion_rules() {
        let cases = [
            TestCase {
                name: "healthy",
                validator: validator(10_000_000, false),
                exposure: Some(exposure(HEALTHY_OWN, 5)),
                slashed: false,
                expected: &[],
            },
            TestCase {
                name: "zero commission is healthy",
                validator: validator(0, false),
                exposure: Some(exposure(HEALTHY_OWN, 5)),
                slashed: false,
                expected: &[],
            },
            TestCase {
                name: "commission at the limit",
                validator: validator(50_000_000, false),
                exposure: Some(exposure(HEALTHY_OWN, 5)),
                slashed: false,
                expected: &[],
            },
            TestCase {
                name: "commission above the limit",
                validator: validator(50_000_001, false),
                exposure: Some(exposure(HEALTHY_OWN, 5)),
                slashed: false,
                expected: &[UnhealthyCommission],
            },
            TestCase {
                name: "219 nominators",
                validator: validator(0, false),
                exposure: Some(exposure(HEALTHY_OWN, 219)),
                slashed: false,
                expected: &[],
            },
            TestCase {
                name: "220 nominators",
                validator: validator(0, false),
                exposure: Some(exposure(HEALTHY_OWN, 220)),
                slashed: false,
                expected: &[OverSubscribed],
            },
            TestCase {
                name: "own stake just below minimum",
                validator: validator(0, false),
                exposure: Some(exposure(10_000 * UNIT - 1, 5)),
                slashed: false,
                expected: &[UnhealthyOwnStake],
            },
            TestCase {
                name: "own stake at minimum",
                validator: validator(0, false),
                exposure: Some(exposure(10_000 * UNIT, 5)),
                slashed: false,
                expected: &[],
            },
            TestCase {
                name: "not active",
                validator: validator(0, false),
                exposure: None,
                slashed: false,
                expected: &[NotActive],
            },
            TestCase {
                name: "slashed",
                validator: validator(0, false),
                exposure: Some(exposure(HEALTHY_OWN, 5)),
                slashed: true,
                expected: &[SlashedBefore],
            },
            TestCase {
                name: "everything wrong",
                validator: validator(60_000_000, true),
                exposure: None,
                slashed: true,
                expected: &[NotActive, BlockedNominations, UnhealthyCommission, SlashedBefore],
            },
            TestCase {
                name: "blocked and crowded",
                validator: validator(0, true),
                exposure: Some(exposure(0, 500)),
                slashed: false,
                expected: &[BlockedNominations, OverSubscribed, UnhealthyOwnStake],
            },
        ];

        let criteria = Criteria::default();

        for case in cases {
            let actual = exclusions(
                &criteria,
                &case.validator,
                case.exposure.as_ref().into(),
                case.slashed,
            );
            assert_eq!(actual, case.expected, "Test '{}' failed", case.name);
            assert_eq!(
                is_eligible(&case.validator, case.exposure.as_ref(), case.slashed),
                case.expected.is_empty(),
                "Test '{}' failed",
                case.name
            );
        }
    }

    #[test]
    fn inactive_is_never_eligible() {
        for commission in [0, 1, 50_000_000, u32::MAX] {
            for blocked in [false, true] {
                assert!(!is_eligible(&validator(commission, blocked), None, false));
            }
        }
    }

    #[test]
    fn custom_criteria() {
        let criteria = Criteria {
            max_commission: 100_000_000,
            max_nominators: 512,
            min_own_stake: 0,
        };

        assert!(meets(
            &criteria,
            &validator(80_000_000, false),
            Lookup::Found(&exposure(0, 300)),
            false
        ));
    }
}
