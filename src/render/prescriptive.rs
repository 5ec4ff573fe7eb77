//! Prescriptive renderers: expectation configuration to human-readable
//! rule statements.

use serde_json::{Map, Value, json};

use crate::config::ExpectationConfig;
use crate::render::content::RenderedContent;
use crate::utils::numbers::num_to_str;

const MOSTLY_PRECISION: u32 = 5;

/// Fills the shared `mostly` parameters and returns the template suffix.
/// The suffix is only present when `mostly` was explicitly configured.
fn mostly_suffix(config: &ExpectationConfig, params: &mut Map<String, Value>) -> &'static str {
    match config.mostly {
        Some(mostly) => {
            params.insert("mostly".to_string(), json!(mostly));
            params.insert(
                "mostly_pct".to_string(),
                json!(num_to_str(mostly * 100.0, MOSTLY_PRECISION)),
            );
            ", at least $mostly_pct % of the time"
        }
        None => "",
    }
}

pub(crate) fn length_match(config: &ExpectationConfig) -> RenderedContent {
    let mut params = Map::new();
    params.insert("column".to_string(), json!(config.columns[0]));
    if let Some(length) = config.kwarg("length") {
        params.insert("length".to_string(), length.clone());
    }
    let mostly = mostly_suffix(config, &mut params);
    RenderedContent::Text {
        template: format!("values length must match the input length of $length{}.", mostly),
        params,
        styling: None,
    }
}

pub(crate) fn approx_leq(config: &ExpectationConfig) -> RenderedContent {
    let mut params = Map::new();
    params.insert("column_A".to_string(), json!(config.columns[0]));
    params.insert("column_B".to_string(), json!(config.columns[1]));
    let approximate = config.kwarg("n_approximate").filter(|v| !v.is_null());
    if let Some(value) = approximate {
        params.insert("n_approximate".to_string(), value.clone());
    }
    let mostly = mostly_suffix(config, &mut params);
    let template = if approximate.is_some() {
        format!(
            "$column_A must always be smaller or equal than $column_B plus $n_approximate{}.",
            mostly
        )
    } else {
        format!("$column_A must be smaller or equal than $column_B{}.", mostly)
    };
    RenderedContent::Text {
        template,
        params,
        styling: None,
    }
}

pub(crate) fn identity_rule(config: &ExpectationConfig) -> RenderedContent {
    let mut params = Map::new();
    params.insert(
        "column_list_customer_id".to_string(),
        json!(config.columns[0]),
    );
    params.insert("column_list_user_id".to_string(), json!(config.columns[1]));
    params.insert(
        "column_list_device_id".to_string(),
        json!(config.columns[2]),
    );
    if let Some(regex) = config.kwarg("device_id_regex") {
        params.insert("device_id_regex".to_string(), regex.clone());
    }
    let mostly = mostly_suffix(config, &mut params);
    RenderedContent::Text {
        template: format!(
            "$column_list_customer_id must be equal to $column_list_user_id when this is not \
             empty, or equal to $column_list_device_id and match the regex $device_id_regex \
             when $column_list_user_id is empty{}.",
            mostly
        ),
        params,
        styling: None,
    }
}
