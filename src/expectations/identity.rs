use std::ops::Range;

use arrow::array::{Array, StringArray};
use regex::Regex;

use crate::config::ExpectationConfig;
use crate::errors::ExpectationError;
use crate::expectations::Verdict;
use crate::results::{CellValue, UnexpectedValue};

/// Multicolumn identity condition over (customer_id, user_id, device_id).
///
/// Satisfied iff the customer id is non-null and either equals a non-null
/// user id, or the user id is null and the customer id equals a device id
/// matching `device_id_regex`.
#[derive(Debug)]
pub struct IdentityRule {
    pub(crate) columns: [String; 3],
    pub(crate) pattern: Regex,
}

impl IdentityRule {
    pub(crate) fn from_config(config: &ExpectationConfig) -> Result<Self, ExpectationError> {
        let raw = config
            .string_kwarg("device_id_regex")?
            .ok_or_else(|| config.config_error("device_id_regex parameter must be set"))?;
        let pattern = Regex::new(raw).map_err(|e| {
            config.config_error(format!("invalid device_id_regex '{}': {}", raw, e))
        })?;
        Ok(Self {
            columns: [
                config.columns[0].clone(),
                config.columns[1].clone(),
                config.columns[2].clone(),
            ],
            pattern,
        })
    }

    pub(crate) fn evaluate_rows(
        &self,
        customer: &StringArray,
        user: &StringArray,
        device: &StringArray,
        rows: Range<usize>,
    ) -> Vec<Verdict> {
        rows.map(|i| {
            let customer_id = (!customer.is_null(i)).then(|| customer.value(i));
            let user_id = (!user.is_null(i)).then(|| user.value(i));
            let device_id = (!device.is_null(i)).then(|| device.value(i));

            let satisfied = match (customer_id, user_id) {
                (None, _) => false,
                (Some(c), Some(u)) => c == u,
                (Some(c), None) => {
                    matches!(device_id, Some(d) if self.pattern.is_match(d) && c == d)
                }
            };

            if satisfied {
                Verdict::Satisfied
            } else {
                Verdict::Unsatisfied(UnexpectedValue::Row(vec![
                    cell(customer_id),
                    cell(user_id),
                    cell(device_id),
                ]))
            }
        })
        .collect()
    }
}

fn cell(value: Option<&str>) -> CellValue {
    value
        .map(|s| CellValue::Str(s.to_string()))
        .unwrap_or(CellValue::Null)
}
