//! Shape checks shared by the raw score parsers.

use serde_json::Value;

/// Upper bound for any single counter in a raw score.
pub(crate) const MAX_COUNTER: u64 = 999;

pub(crate) fn non_negative(value: &Value, what: &str) -> Result<u32, String> {
    match value.as_u64() {
        Some(n) if n <= MAX_COUNTER => Ok(n as u32),
        Some(n) => Err(format!("{} is too large ({})", what, n)),
        None if value.as_i64().is_some() => Err(format!("{} must not be negative", what)),
        None => Err(format!("{} must be a non-negative integer", what)),
    }
}

pub(crate) fn field<'a>(score: &'a Value, key: &str) -> Result<&'a Value, String> {
    score
        .as_object()
        .ok_or_else(|| "score must be an object".to_string())?
        .get(key)
        .ok_or_else(|| format!("score is missing '{}'", key))
}

/// Reads `score[key]` as a list of `[team1, team2]` pairs, bounded in length.
pub(crate) fn pairs(
    score: &Value,
    key: &str,
    unit: &str,
    max: usize,
) -> Result<Vec<(u32, u32)>, String> {
    let list = field(score, key)?
        .as_array()
        .ok_or_else(|| format!("'{}' must be a list", key))?;

    if list.is_empty() || list.len() > max {
        return Err(format!(
            "a match must have between 1 and {} {}s, got {}",
            max,
            unit,
            list.len()
        ));
    }

    list.iter()
        .enumerate()
        .map(|(idx, entry)| {
            let label = format!("{} {}", unit, idx + 1);
            match entry.as_array().map(Vec::as_slice) {
                Some([a, b]) => Ok((non_negative(a, &label)?, non_negative(b, &label)?)),
                _ => Err(format!("{} must be a pair of scores", label)),
            }
        })
        .collect()
}

/// Counts units won by each side; ties count for neither.
pub(crate) fn tally(units: &[(u32, u32)]) -> (u32, u32) {
    units.iter().fold((0, 0), |(t1, t2), &(a, b)| {
        (t1 + u32::from(a > b), t2 + u32::from(b > a))
    })
}

/// Rejects units played once either side already held a majority of `max`.
pub(crate) fn check_decided(units: &[(u32, u32)], max: usize, unit: &str) -> Result<(), String> {
    let needed = (max / 2 + 1) as u32;
    let mut won = (0, 0);
    for (idx, &(a, b)) in units.iter().enumerate() {
        if won.0 >= needed || won.1 >= needed {
            return Err(format!(
                "{} {} was played after the match was decided",
                unit,
                idx + 1
            ));
        }
        won = (won.0 + u32::from(a > b), won.1 + u32::from(b > a));
    }
    Ok(())
}

pub(crate) fn totals(units: &[(u32, u32)]) -> (u32, u32) {
    units
        .iter()
        .fold((0, 0), |(t1, t2), &(a, b)| (t1 + a, t2 + b))
}
