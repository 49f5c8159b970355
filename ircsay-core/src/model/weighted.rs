use rand::Rng;

use crate::error::{Error, Result};

/// Picks one item with probability proportional to its weight.
///
/// Draws `r` uniformly in `[0, total)` and walks `choices` in order,
/// returning the first item whose cumulative weight exceeds `r`.
///
/// This method performs:
/// - an O(n) pass to compute the total weight
/// - an O(n) cumulative scan to select a bucket
///
/// # Errors
/// Returns `Error::WeightedChoiceExhausted` if the total weight is not
/// strictly positive, or if the scan ends without a pick (floating-point edge).
pub fn weighted_choice<'a, T, R>(choices: &'a [(T, f64)], rng: &mut R) -> Result<&'a T>
where
	R: Rng + ?Sized,
{
	let total: f64 = choices.iter().map(|(_, weight)| weight).sum();
	if !total.is_finite() || total <= 0.0 {
		return Err(Error::WeightedChoiceExhausted(total));
	}

	let r = rng.random_range(0.0..total);

	let mut upto = 0.0;
	for (item, weight) in choices {
		if upto + weight > r {
			return Ok(item);
		}
		upto += weight;
	}

	Err(Error::WeightedChoiceExhausted(total))
}
