//! ABO/Rh compatibility table.

use entities::BloodType;

/// Receiver blood types a donor of `donor` type can supply.
pub fn compatible_recipients(donor: BloodType) -> &'static [BloodType] {
    use BloodType::*;

    match donor {
        ONegative => &[
            ONegative, OPositive, ANegative, APositive, BNegative, BPositive, AbNegative,
            AbPositive,
        ],
        OPositive => &[OPositive, APositive, BPositive, AbPositive],
        ANegative => &[ANegative, APositive, AbNegative, AbPositive],
        APositive => &[APositive, AbPositive],
        BNegative => &[BNegative, BPositive, AbNegative, AbPositive],
        BPositive => &[BPositive, AbPositive],
        AbNegative => &[AbNegative, AbPositive],
        AbPositive => &[AbPositive],
    }
}

/// Whether blood of type `donor` can be given to a receiver of type `receiver`.
pub fn is_compatible(donor: BloodType, receiver: BloodType) -> bool {
    compatible_recipients(donor).contains(&receiver)
}

/// String form of [`is_compatible`]. Unrecognized labels are never compatible.
pub fn can_donate_to(donor: &str, receiver: &str) -> bool {
    match (BloodType::parse(donor), BloodType::parse(receiver)) {
        (Some(donor), Some(receiver)) => is_compatible(donor, receiver),
        _ => false,
    }
}

/// Whether `s` names one of the eight blood types, ignoring case.
pub fn validate_blood_type(s: &str) -> bool {
    BloodType::parse(s).is_some()
}
