use crate::models::Supplement;

/// Keeps the supplements whose age restrictions admit `age`, in catalog order.
///
/// `age` comes from a validated `Profile`; invalid ages never reach this point.
pub fn eligible_supplements(age: u32, catalog: &[Supplement]) -> Vec<&Supplement> {
    catalog
        .iter()
        .filter(|supplement| supplement.is_eligible_for(age))
        .collect()
}
