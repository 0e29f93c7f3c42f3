//! Finding the open requests a donor can serve.

use entities::{BloodRequest, User};

use crate::compatibility::is_compatible;

/// Whether two free-text locations name the same place, ignoring case.
pub fn same_location(a: &str, b: &str) -> bool {
    a.to_lowercase() == b.to_lowercase()
}

/// Returns the requests `donor` can give to: compatible blood type, same
/// hospital area as the donor's location, and still open.
///
/// Input order is preserved.
pub fn find_compatible_requests<'a>(
    donor: &User,
    requests: &'a [BloodRequest],
) -> Vec<&'a BloodRequest> {
    requests
        .iter()
        .filter(|r| {
            is_compatible(donor.blood_type, r.blood_type)
                && same_location(&r.hospital_area, &donor.location)
                && r.is_open()
        })
        .collect()
}
